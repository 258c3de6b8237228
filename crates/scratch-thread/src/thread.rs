//! [`Thread`]: one running script, its frame stack, and its suspension
//! state.

use scratch_core::to_bool;
use scratch_model::BlockHandle;
use scratch_ops::{BlockContext, Flow};

use crate::error::ThreadFault;
use crate::frame::Frame;

/// Identifies a [`Thread`] for as long as it lives, independent of its
/// position in the scheduler's thread list (which shifts as finished
/// threads are pruned).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThreadId(pub(crate) u64);

/// What a thread is doing right now.
#[derive(Clone, Debug, PartialEq)]
pub enum ThreadStatus {
    /// Eligible to run this frame.
    Running,
    /// Suspended by `control_wait`; resumes once `remaining` (seconds)
    /// reaches zero, decremented by the caller-supplied `dt` each frame.
    WaitingTimer(f64),
    /// Suspended by `control_wait_until`; resumes once `condition`
    /// evaluates true. Re-evaluated once per frame, not once per thread
    /// step.
    WaitingCondition(BlockHandle),
    /// Suspended by `event_broadcastandwait`; resumes once every thread
    /// in this list has ended (an id absent from the scheduler's thread
    /// list counts as ended).
    WaitingOn(Vec<ThreadId>),
    /// Finished, stopped, or deleted. Pruned from the scheduler's thread
    /// list at the end of the frame it was set in.
    Done,
}

/// An effect a [`Thread`]'s own flow cannot resolve by itself because it
/// reaches beyond this one thread — spawning other threads, halting
/// siblings, or mutating the live target list. The scheduler applies
/// these; [`Thread::step_once`] only ever reports them.
#[derive(Clone, Debug)]
pub enum ThreadAction {
    /// Fire this broadcast; the scheduler (re)starts every thread whose
    /// hat matches it.
    Broadcast(scratch_core::id::BroadcastId),
    /// Fire this broadcast and suspend the calling thread on the threads
    /// it spawns.
    BroadcastAndWait(scratch_core::id::BroadcastId),
    /// Halt every other thread running on `target`.
    StopOtherScriptsInSprite {
        /// Index of the target whose other threads should stop.
        target: usize,
    },
    /// Halt every thread in the project, including this one.
    StopAll,
    /// Spawn a clone of the named target (`"_myself_"` clones the
    /// running target).
    CreateClone(std::sync::Arc<str>),
    /// Remove the running (clone) target and end this thread.
    DeleteThisClone,
}

/// One level of call/loop nesting's worth of progress through a script.
///
/// A thread's recursion depth is bounded to guard against runaway custom
/// block recursion; this is a generous ceiling, not a tuned budget —
/// legitimate Scratch projects rarely nest more than a few frames deep.
const MAX_FRAME_DEPTH: usize = 4096;

/// What happened when [`Thread::step_once`] ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One primitive executed; the thread may still have more to do this
    /// frame if its work budget allows.
    Ran,
    /// A loop body just completed one full pass and is about to restart.
    /// The thread yields the rest of this frame's turn even though it
    /// remains [`ThreadStatus::Running`] — matching a non-warp loop's
    /// once-per-frame yield.
    LoopYielded,
}

/// A single running script: its position in the block graph, its
/// enclosing loop/call frames, the target it belongs to, and its
/// suspension state.
#[derive(Clone, Debug)]
pub struct Thread {
    id: ThreadId,
    /// Index into the scheduler's `targets` slice.
    pub target: usize,
    /// The hat block this thread started from — the activation-dedup key
    /// (green-flag and broadcast hats restart the existing thread for
    /// the same `(target, top_block)` pair rather than spawning a
    /// duplicate).
    pub top_block: BlockHandle,
    current: Option<BlockHandle>,
    stack: Vec<Frame>,
    status: ThreadStatus,
}

impl Thread {
    pub(crate) fn new(id: ThreadId, target: usize, top_block: BlockHandle) -> Self {
        Self {
            id,
            target,
            top_block,
            current: Some(top_block),
            stack: Vec::new(),
            status: ThreadStatus::Running,
        }
    }

    /// This thread's stable identity.
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Current suspension state.
    pub fn status(&self) -> &ThreadStatus {
        &self.status
    }

    /// Force this thread to [`ThreadStatus::Done`] and drop its frame
    /// stack, for `control_stop`'s `"all"`/`"other scripts in sprite"`
    /// targets and clone deletion.
    pub fn halt(&mut self) {
        self.status = ThreadStatus::Done;
        self.current = None;
        self.stack.clear();
    }

    pub(crate) fn set_status(&mut self, status: ThreadStatus) {
        self.status = status;
    }

    /// The parameter bindings in scope right now, from the innermost
    /// `Call` frame on the stack — `None` outside of any custom block
    /// call.
    pub fn proc_args(&self) -> Option<&std::collections::HashMap<std::sync::Arc<str>, scratch_core::Value>> {
        self.stack.iter().rev().find_map(|f| match f {
            Frame::Call { args, .. } => Some(args),
            _ => None,
        })
    }

    /// Execute exactly one block, advancing `current`/the frame stack and
    /// reporting any effect the scheduler must apply.
    ///
    /// Only meaningful while [`Self::status`] is [`ThreadStatus::Running`]
    /// — the scheduler is responsible for not calling this otherwise.
    pub fn step_once(
        &mut self,
        ctx: &mut BlockContext<'_>,
    ) -> Result<(StepOutcome, Option<ThreadAction>), ThreadFault> {
        if self.current.is_none() {
            if self.unwind(ctx)? {
                return Ok((StepOutcome::LoopYielded, None));
            }
            if self.current.is_none() {
                self.status = ThreadStatus::Done;
                return Ok((StepOutcome::Ran, None));
            }
        }

        let handle = self.current.take().expect("checked above");
        let flow = ctx.step(handle)?;
        let next = ctx.block(handle).next;

        let action = match flow {
            Flow::Value(_) => {
                return Err(ThreadFault::Block(scratch_core::BlockError::failed(
                    "a statement opcode produced a bare reporter value",
                )));
            }
            Flow::Next => {
                self.current = next;
                None
            }
            Flow::Branch(target) => {
                self.stack.push(Frame::Sequence { next });
                self.current = target;
                None
            }
            Flow::RepeatTimes { body, count } => {
                if count > 0 {
                    self.push_frame(Frame::RepeatTimes {
                        remaining: count - 1,
                        body,
                        next,
                    })?;
                    self.current = Some(body);
                } else {
                    self.current = next;
                }
                None
            }
            Flow::Forever { body } => {
                self.push_frame(Frame::Forever { body })?;
                self.current = Some(body);
                None
            }
            Flow::RepeatUntil { body, condition } => {
                let done = to_bool(&ctx.eval(condition)?);
                if done {
                    self.current = next;
                } else {
                    self.push_frame(Frame::RepeatUntil {
                        body,
                        condition,
                        next,
                    })?;
                    self.current = Some(body);
                }
                None
            }
            Flow::Wait(secs) => {
                self.status = ThreadStatus::WaitingTimer(secs);
                self.current = next;
                None
            }
            Flow::WaitUntil { condition } => {
                self.status = ThreadStatus::WaitingCondition(condition);
                self.current = next;
                None
            }
            Flow::Broadcast(id) => {
                self.current = next;
                Some(ThreadAction::Broadcast(id))
            }
            Flow::BroadcastAndWait(id) => {
                self.current = next;
                Some(ThreadAction::BroadcastAndWait(id))
            }
            Flow::StopThisScript => {
                self.halt();
                None
            }
            Flow::StopOtherScriptsInSprite => {
                self.current = next;
                Some(ThreadAction::StopOtherScriptsInSprite {
                    target: self.target,
                })
            }
            Flow::StopAll => Some(ThreadAction::StopAll),
            Flow::CreateClone(name) => {
                self.current = next;
                Some(ThreadAction::CreateClone(name))
            }
            Flow::DeleteThisClone => {
                self.halt();
                Some(ThreadAction::DeleteThisClone)
            }
            Flow::Call { body, args } => {
                self.push_frame(Frame::Call { args, next })?;
                self.current = body;
                None
            }
        };

        Ok((StepOutcome::Ran, action))
    }

    fn push_frame(&mut self, frame: Frame) -> Result<(), ThreadFault> {
        if self.stack.len() >= MAX_FRAME_DEPTH {
            return Err(ThreadFault::StackOverflow {
                depth: self.stack.len(),
            });
        }
        self.stack.push(frame);
        Ok(())
    }

    /// Pop frames until a real next block is found, a loop frame decides
    /// to re-enter its body (returns `true`), or the stack runs dry
    /// (leaves `current` as `None`).
    fn unwind(&mut self, ctx: &mut BlockContext<'_>) -> Result<bool, ThreadFault> {
        while self.current.is_none() {
            let Some(frame) = self.stack.pop() else {
                return Ok(false);
            };
            match frame {
                Frame::RepeatTimes {
                    remaining,
                    body,
                    next,
                } => {
                    if remaining > 0 {
                        self.stack.push(Frame::RepeatTimes {
                            remaining: remaining - 1,
                            body,
                            next,
                        });
                        self.current = Some(body);
                        return Ok(true);
                    }
                    self.current = next;
                }
                Frame::Forever { body } => {
                    self.stack.push(Frame::Forever { body });
                    self.current = Some(body);
                    return Ok(true);
                }
                Frame::RepeatUntil {
                    body,
                    condition,
                    next,
                } => {
                    let done = to_bool(&ctx.eval(condition)?);
                    if done {
                        self.current = next;
                    } else {
                        self.stack.push(Frame::RepeatUntil {
                            body,
                            condition,
                            next,
                        });
                        self.current = Some(body);
                        return Ok(true);
                    }
                }
                Frame::Sequence { next } | Frame::Call { next, .. } => {
                    self.current = next;
                }
            }
        }
        Ok(false)
    }
}
