//! [`Flow`]: what a primitive asks the scheduler to do next.
//!
//! Reporters resolve to [`Flow::Value`]; every other opcode group returns
//! a control signal that `scratch-thread`'s frame stack interprets. A
//! single enum keeps [`crate::Primitive::step`]'s signature uniform across
//! reporters, statements, and C-shaped control blocks, mirroring how the
//! teacher's propagator pipeline gives every step the same `Result<(), _>`
//! shape regardless of what a given propagator actually computes.

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::id::BroadcastId;
use scratch_core::Value;
use scratch_model::BlockHandle;

/// Control signal returned by a primitive's `step`.
#[derive(Clone, Debug)]
pub enum Flow {
    /// A reporter produced a value for its parent's input slot.
    Value(Value),
    /// A statement completed; continue to the block's `next`.
    Next,
    /// `control_if`/`control_if_else`: enter this substack, or fall
    /// through to `next` if `None` (condition false, no else branch).
    Branch(Option<BlockHandle>),
    /// `control_repeat`: run `body` `count` times. `count` is resolved
    /// once, at loop entry, matching Scratch's behavior of latching the
    /// `TIMES` input rather than re-reading it every iteration.
    RepeatTimes { body: BlockHandle, count: i64 },
    /// `control_forever`: run `body` indefinitely; the only way out is a
    /// `control_stop`/`control_delete_this_clone` flow from inside it.
    Forever { body: BlockHandle },
    /// `control_repeat_until`: run `body` repeatedly, re-evaluating
    /// `condition` as a reporter before each iteration (including the
    /// first) and stopping once it's true.
    RepeatUntil {
        body: BlockHandle,
        condition: BlockHandle,
    },
    /// `control_wait`: suspend the thread for this many seconds.
    Wait(f64),
    /// `control_wait_until`: suspend until `condition` evaluates true;
    /// the scheduler re-evaluates it directly once per frame rather than
    /// re-invoking this primitive, mirroring [`Self::RepeatUntil`].
    WaitUntil { condition: BlockHandle },
    /// `event_broadcast`: fire a broadcast and continue immediately.
    Broadcast(BroadcastId),
    /// `event_broadcastandwait`: suspend until every thread started by
    /// this broadcast has halted.
    BroadcastAndWait(BroadcastId),
    /// `control_stop` with the `"this script"` target.
    StopThisScript,
    /// `control_stop` with the `"other scripts in sprite"` target: halts
    /// every other thread running on the same target.
    StopOtherScriptsInSprite,
    /// `control_stop` with the `"all"` target.
    StopAll,
    /// `control_create_clone_of`: spawn a clone of the named target
    /// (`"_myself_"` clones the running target).
    CreateClone(Arc<str>),
    /// `control_delete_this_clone`: halts the clone and removes it.
    DeleteThisClone,
    /// `procedures_call`: push a call frame running `body` with `args`
    /// bound by parameter name, returning to the caller's `next` once the
    /// body's chain runs out. `body` is `None` for a custom block with an
    /// empty definition (nothing snapped into it), which completes
    /// immediately.
    Call {
        body: Option<BlockHandle>,
        args: HashMap<Arc<str>, Value>,
    },
}
