//! Thread execution: the frame stack that drives a block chain to
//! completion across many scheduler passes, and the round-robin scheduler
//! that owns every thread in a running project.
//!
//! `scratch-ops`/`scratch-ops-lib` define what a single block does
//! ([`scratch_ops::Flow`]); this crate is what turns a sequence of those
//! one-block decisions into a suspended, resumable script, and what gives
//! every script in a project its turn each frame.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod frame;
pub mod scheduler;
pub mod thread;

pub use error::ThreadFault;
pub use frame::Frame;
pub use scheduler::Scheduler;
pub use thread::{StepOutcome, Thread, ThreadAction, ThreadId, ThreadStatus};
