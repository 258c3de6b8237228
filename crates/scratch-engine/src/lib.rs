//! Hat activation, the active-keys index, and the [`Runtime`] facade that
//! ties every interpreter subsystem together into the single entry point
//! a host program drives.
//!
//! `scratch-thread` knows how to run a thread once told where to start it;
//! this crate knows *which* scripts to start and when — green-flag
//! presses, broadcasts, key presses, and clone-start hats all funnel
//! through [`Runtime`]'s activation methods before the scheduler ever sees
//! them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig, MAX_CLONE_CAP};
pub use error::RuntimeError;
pub use runtime::Runtime;
