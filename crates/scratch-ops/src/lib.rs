//! The block interpreter's execution seam: the [`Primitive`] trait,
//! [`BlockContext`] split-borrow execution state, the [`Flow`] control
//! contract, and the [`OpTable`] dispatch table.
//!
//! Opcode implementations themselves live in `scratch-ops-lib`; this
//! crate only defines the machinery they plug into, mirroring how the
//! teacher splits the `Propagator` trait/context from the propagator
//! implementations that use it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod flow;
pub mod host;
pub mod primitive;
pub mod table;

pub use context::{field_text, BlockContext};
pub use flow::Flow;
pub use host::HostState;
pub use primitive::Primitive;
pub use table::OpTable;
