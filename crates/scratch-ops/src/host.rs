//! Host-provided input snapshot: keyboard, mouse, and timer state.
//!
//! `sensing_*` primitives read this; nothing else in the interpreter does.
//! The runtime facade is responsible for keeping it current between
//! `update()` calls — see the active-keys index described in the data
//! model.

use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Arc;

/// A read-only snapshot of host input state for one interpreter pass.
///
/// `timer` is the one field primitives themselves mutate (`
/// sensing_resettimer`), so it is the one field behind interior
/// mutability: every other field is advanced by the runtime's frame loop
/// between `update()` calls, but resetting the timer has to take effect
/// immediately, mid-frame, from inside a primitive holding only `&HostState`.
#[derive(Debug, Default)]
pub struct HostState {
    /// Currently held keys, normalized via `scratch_model::keys::normalize`.
    pub keys_down: HashSet<Arc<str>>,
    /// Mouse X in stage coordinates.
    pub mouse_x: f64,
    /// Mouse Y in stage coordinates.
    pub mouse_y: f64,
    /// Whether the mouse button is currently held.
    pub mouse_down: bool,
    /// Seconds elapsed since the last `resetTimer` (or since start).
    timer: Cell<f64>,
}

impl Clone for HostState {
    fn clone(&self) -> Self {
        Self {
            keys_down: self.keys_down.clone(),
            mouse_x: self.mouse_x,
            mouse_y: self.mouse_y,
            mouse_down: self.mouse_down,
            timer: Cell::new(self.timer.get()),
        }
    }
}

impl HostState {
    /// Whether a (already-normalized) key name is currently down.
    ///
    /// `"any"` matches if any key at all is held, mirroring Scratch's
    /// `sensing_keyoptions` special case.
    pub fn is_key_down(&self, key: &str) -> bool {
        if key.eq_ignore_ascii_case("any") {
            return !self.keys_down.is_empty();
        }
        self.keys_down.contains(key)
    }

    /// Seconds elapsed since the last reset (or since construction).
    pub fn timer(&self) -> f64 {
        self.timer.get()
    }

    /// Advance the timer by `dt`, called once per frame by the runtime's
    /// frame loop before the scheduler runs.
    pub fn advance_timer(&self, dt: f64) {
        self.timer.set(self.timer.get() + dt);
    }

    /// `sensing_resettimer`: zero the clock immediately, from inside a
    /// primitive holding only a shared reference.
    pub fn reset_timer(&self) {
        self.timer.set(0.0);
    }
}
