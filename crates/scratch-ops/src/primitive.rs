//! The [`Primitive`] trait: one opcode's behavior.

use scratch_core::BlockError;
use scratch_model::Block;

use crate::context::BlockContext;
use crate::flow::Flow;

/// A single opcode's implementation.
///
/// # Contract
///
/// - `step()` must be deterministic given its inputs and the target/Stage
///   state it reads — the only sanctioned source of nondeterminism is
///   [`BlockContext::rng`], which is itself seeded deterministically by
///   the runtime.
/// - Stateless: a `Primitive` value carries no per-invocation state of its
///   own. Any state a block needs across calls (loop counters, timers)
///   lives on the [`crate::flow::Flow`] contract or on the calling
///   `scratch-thread` frame, never inside the primitive.
///
/// # Object safety
///
/// This trait is object-safe; [`crate::table::OpTable`] stores primitives
/// as `Box<dyn Primitive>` keyed by opcode name.
pub trait Primitive: Send + Sync + 'static {
    /// Execute this block for one interpreter step.
    ///
    /// `block` is the specific block instance being executed (carrying
    /// its resolved inputs/fields); `ctx` provides access to target
    /// state, nested reporter evaluation, and ambient resources.
    fn step(&self, ctx: &mut BlockContext<'_>, block: &Block) -> Result<Flow, BlockError>;
}

impl<F> Primitive for F
where
    F: Fn(&mut BlockContext<'_>, &Block) -> Result<Flow, BlockError> + Send + Sync + 'static,
{
    fn step(&self, ctx: &mut BlockContext<'_>, block: &Block) -> Result<Flow, BlockError> {
        self(ctx, block)
    }
}
