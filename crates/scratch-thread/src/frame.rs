//! [`Frame`]: one level of a thread's continuation stack.
//!
//! A primitive's [`scratch_ops::Flow`] only ever describes *one* step —
//! "enter this substack", "repeat N times", "call this procedure". The
//! frame stack is what remembers that decision across the many scheduler
//! passes it takes to actually walk the loop or the call out to
//! completion, matching the `Primitive` contract's stateless-primitives
//! rule: loop counters and call bindings live here, never inside a block's
//! own `step()`.

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::Value;
use scratch_model::BlockHandle;

/// A single continuation on a [`crate::thread::Thread`]'s stack.
#[derive(Clone, Debug)]
pub enum Frame {
    /// Resume at `next` once the current chain runs out. Used for
    /// `if`/`if_else` substacks, which execute once and then fall
    /// through to whatever followed the `if` itself.
    Sequence {
        /// Block to resume at once this frame's chain is exhausted.
        next: Option<BlockHandle>,
    },
    /// `control_repeat`: re-enter `body` `remaining` more times, then
    /// resume at `next`.
    RepeatTimes {
        /// Iterations left, decremented each time `body`'s chain runs out.
        remaining: i64,
        /// First block of the loop body.
        body: BlockHandle,
        /// Block to resume at once `remaining` reaches zero.
        next: Option<BlockHandle>,
    },
    /// `control_forever`: re-enter `body` indefinitely. No `next` — the
    /// only way out is a stop/delete-clone flow unwinding the stack, or
    /// the whole thread ending.
    Forever {
        /// First block of the loop body.
        body: BlockHandle,
    },
    /// `control_repeat_until`: re-evaluate `condition` before every pass
    /// (including the first); resume at `next` once it evaluates true.
    RepeatUntil {
        /// First block of the loop body.
        body: BlockHandle,
        /// Reporter re-evaluated before each pass.
        condition: BlockHandle,
        /// Block to resume at once `condition` is true.
        next: Option<BlockHandle>,
    },
    /// A custom block call: `args` are in scope for
    /// `argument_reporter_string_number`/`argument_reporter_boolean` for
    /// the duration of this frame; resume at `next` (the call site's own
    /// `next`) once the body's chain runs out.
    Call {
        /// Parameter bindings, by the callee's argument display name.
        args: HashMap<Arc<str>, Value>,
        /// Block to resume at (the `procedures_call`'s own `next`) once
        /// the procedure body completes.
        next: Option<BlockHandle>,
    },
}
