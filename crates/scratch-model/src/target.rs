//! Targets: the Stage and Sprites.

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::id::{ListId, ProcCode, VariableId};

use crate::block::BlockHandle;
use crate::script::Script;
use crate::variable::{ListVar, Variable};

/// A custom block's call signature: where its body starts and the
/// parameter names its `argument_reporter_*` blocks read by.
///
/// Built once at load time from the `procedures_prototype` block's
/// inputs (each naming an `argument_reporter_string_number`/
/// `argument_reporter_boolean` shadow whose `VALUE` field is the
/// parameter's display name), in the same order as the call site's
/// `ProcMutation::argument_ids`.
#[derive(Clone, Debug)]
pub struct ProcedureSignature {
    /// First block of the procedure's body, or `None` for an empty
    /// definition (a custom block with no blocks snapped into it).
    pub body: Option<BlockHandle>,
    /// Parameter names, positional — `argument_ids[i]` at the call site
    /// binds to `arg_names[i]` inside the body.
    pub arg_names: Vec<Arc<str>>,
}

/// The Stage or a Sprite.
///
/// Owns a variable table (by id), a script table, and enough pose/costume
/// state for the `motion`/`looks` opcode groups to operate on — never the
/// rendered pixels themselves (Non-goal: pixel-accurate rendering).
///
/// Scripts are stored behind an `Arc<[Script]>` so that spawning a clone
/// (which duplicates variable/list *contents* but never redefines
/// behavior) is a cheap pointer clone rather than a deep copy of the
/// block graph.
#[derive(Clone, Debug)]
pub struct Target {
    /// Display name. Sprite names are unique within a project; the Stage
    /// is conventionally named `"Stage"`.
    pub name: Arc<str>,
    /// Whether this is the (unique) Stage target.
    pub is_stage: bool,
    /// Scalar variables owned by this target, keyed by id.
    pub variables: HashMap<VariableId, Variable>,
    /// Lists owned by this target, keyed by id.
    pub lists: HashMap<ListId, ListVar>,
    /// Scripts (hat-rooted block chains) defined on this target.
    pub scripts: Arc<[Script]>,
    /// Index into the (opaque) costume list; advanced by
    /// `looks_changecostumeto` et al.
    pub current_costume: u32,
    /// Number of costumes, for wraparound — contents are opaque (Non-goal:
    /// asset decoding belongs to the external SB3 archive reader).
    pub costume_count: u32,
    /// Output volume in `[0, 100]`.
    pub volume: f64,
    /// X position, a pure numeric scalar — not wired to any renderer.
    pub x: f64,
    /// Y position, a pure numeric scalar.
    pub y: f64,
    /// Heading in degrees, Scratch convention (`0` = up, clockwise).
    pub direction: f64,
    /// Size as a percentage (`100` = original size).
    pub size: f64,
    /// Whether the sprite is shown. Stage is always "visible".
    pub visible: bool,
    /// The last `looks_say`/`looks_think` message, if any is pending.
    pub say_text: Option<Arc<str>>,
    /// Whether this Target is a runtime-spawned clone rather than one of
    /// the project's original sprites.
    pub is_clone: bool,
    /// Custom blocks defined on this target, by `proccode`.
    pub procedures: HashMap<ProcCode, ProcedureSignature>,
    /// Set once a clone runs `control_delete_this_clone`.
    ///
    /// Targets are addressed by a stable `Vec` index from thread
    /// creation onward, so a deleted clone is tombstoned rather than
    /// removed — removing it would shift every other thread's target
    /// index. A removed target holds no live thread and is excluded
    /// from the 300-clone cap and from by-name lookups.
    pub removed: bool,
}

impl Target {
    /// Construct a fresh Stage or Sprite target from loaded definitions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<Arc<str>>,
        is_stage: bool,
        variables: HashMap<VariableId, Variable>,
        lists: HashMap<ListId, ListVar>,
        scripts: Arc<[Script]>,
        costume_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            is_stage,
            variables,
            lists,
            scripts,
            current_costume: 0,
            costume_count,
            volume: 100.0,
            x: 0.0,
            y: 0.0,
            direction: 90.0,
            size: 100.0,
            visible: true,
            say_text: None,
            is_clone: false,
            procedures: HashMap::new(),
            removed: false,
        }
    }

    /// Look up a custom block's call signature by `proccode`.
    pub fn procedure(&self, proc_code: &ProcCode) -> Option<&ProcedureSignature> {
        self.procedures.get(proc_code)
    }

    /// Find a scalar variable defined directly on this target by name.
    pub fn variable_by_name(&self, name: &str) -> Option<&Variable> {
        self.variables.values().find(|v| v.name.as_ref() == name)
    }

    /// Find a scalar variable defined directly on this target by name
    /// (mutable).
    pub fn variable_by_name_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.values_mut().find(|v| v.name.as_ref() == name)
    }

    /// Find a list defined directly on this target by name.
    pub fn list_by_name(&self, name: &str) -> Option<&ListVar> {
        self.lists.values().find(|l| l.name.as_ref() == name)
    }

    /// Find a list defined directly on this target by name (mutable).
    pub fn list_by_name_mut(&mut self, name: &str) -> Option<&mut ListVar> {
        self.lists.values_mut().find(|l| l.name.as_ref() == name)
    }

    /// Produce a runtime clone of this target: a fresh copy of variable
    /// and list *contents* and pose state, sharing the same `scripts`
    /// pointer (clones never get new behavior).
    pub fn spawn_clone(&self) -> Target {
        let mut clone = self.clone();
        clone.is_clone = true;
        clone
    }
}
