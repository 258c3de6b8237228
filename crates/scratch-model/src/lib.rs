//! In-memory representation of a parsed SB3 project.
//!
//! Covers targets (Stage and Sprites), the block arena, scripts, and
//! variable/list storage — "Project Model" in the architecture overview.
//! Parsing SB3 JSON text into this model lives in the `scratch-sb3` crate;
//! this crate only defines the model and the handle-resolving builder
//! that turns string-addressed raw blocks into an arena.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod keys;
pub mod project;
pub mod script;
pub mod target;
pub mod variable;

pub use block::{Block, BlockArena, BlockArenaBuilder, BlockHandle, FieldLiteral, InputLink, ProcMutation, RawBlock, RawInput};
pub use project::Project;
pub use script::{HatKind, Script};
pub use target::{ProcedureSignature, Target};
pub use variable::{ListVar, Variable};
