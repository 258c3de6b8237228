//! Core types for the Scratch runtime.
//!
//! This is the leaf crate with zero internal dependencies on the rest of
//! the workspace. It defines the Scratch value domain and its coercions,
//! string-backed identifiers for everything the SB3 format names by id,
//! and the error enums shared across the other crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod value;

pub use error::{BlockError, LoadError};
pub use id::{BlockId, BroadcastId, ListId, ProcCode, VariableId};
pub use value::{compare, equals, to_bool, to_number, to_text, Value};
