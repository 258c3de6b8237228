//! Errors a single thread can raise without affecting any other thread.

use scratch_core::BlockError;

/// A fault that ends one thread. The scheduler logs it, marks the thread
/// done, and keeps every other thread running — a fault on one script
/// never takes down the rest of the project.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ThreadFault {
    /// The frame stack grew past the configured recursion depth, almost
    /// always unbounded custom-block recursion.
    #[error("stack overflow in procedure recursion at depth {depth}")]
    StackOverflow {
        /// Depth at which the overflow was detected.
        depth: usize,
    },
    /// A primitive reported a failure with no defined Scratch fallback.
    #[error(transparent)]
    Block(#[from] BlockError),
}
