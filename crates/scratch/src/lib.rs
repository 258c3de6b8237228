//! scratch: a from-scratch Scratch 3 (SB3) project execution engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from every sub-crate. For most users, adding `scratch` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use scratch::prelude::*;
//!
//! let json = r#"{
//!   "targets": [
//!     {
//!       "isStage": true,
//!       "name": "Stage",
//!       "variables": {},
//!       "lists": {},
//!       "broadcasts": {},
//!       "blocks": {}
//!     },
//!     {
//!       "isStage": false,
//!       "name": "Sprite1",
//!       "variables": { "var1": ["counter", 0] },
//!       "lists": {},
//!       "broadcasts": {},
//!       "blocks": {
//!         "hat": {
//!           "opcode": "event_whenflagclicked",
//!           "next": "set",
//!           "parent": null,
//!           "inputs": {},
//!           "fields": {},
//!           "topLevel": true
//!         },
//!         "set": {
//!           "opcode": "data_setvariableto",
//!           "next": null,
//!           "parent": "hat",
//!           "inputs": { "VALUE": [1, [4, "5"]] },
//!           "fields": { "VARIABLE": ["counter", "var1"] },
//!           "topLevel": false
//!         }
//!       }
//!     }
//!   ]
//! }"#;
//!
//! let mut runtime = Runtime::load(json, RuntimeConfig::default()).unwrap();
//! runtime.broadcast_green_flag();
//! for _ in 0..10 {
//!     if runtime.active_thread_count() == 0 {
//!         break;
//!     }
//!     runtime.update(1.0 / 60.0);
//! }
//! let counter = runtime.variable_by_name(1, "counter").unwrap();
//! assert_eq!(scratch::core::to_number(&counter.value), 5.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `scratch-core` | `Value`, coercions, ids, core error types |
//! | [`model`] | `scratch-model` | `Project`, `Target`, `Script`, the block arena |
//! | [`sb3`] | `scratch-sb3` | SB3 JSON parsing and validation |
//! | [`ops`] | `scratch-ops` | The opcode table, `BlockContext`, `Flow` |
//! | [`ops_lib`] | `scratch-ops-lib` | Every built-in primitive's implementation |
//! | [`thread`] | `scratch-thread` | Threads, frame stacks, the scheduler |
//! | [`engine`] | `scratch-engine` | Hat activation, active-keys, `Runtime` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Value domain, coercions, and ids (`scratch-core`).
pub use scratch_core as core;

/// Project model: targets, scripts, and the block arena (`scratch-model`).
pub use scratch_model as model;

/// SB3 JSON parsing and validation (`scratch-sb3`).
pub use scratch_sb3 as sb3;

/// The opcode table and per-block execution context (`scratch-ops`).
pub use scratch_ops as ops;

/// Every built-in primitive's implementation (`scratch-ops-lib`).
pub use scratch_ops_lib as ops_lib;

/// Threads, frame stacks, and the round-robin scheduler (`scratch-thread`).
pub use scratch_thread as thread;

/// Hat activation, the active-keys index, and the `Runtime` facade
/// (`scratch-engine`).
pub use scratch_engine as engine;

/// Common imports for typical `scratch` usage.
///
/// ```rust
/// use scratch::prelude::*;
/// ```
pub mod prelude {
    // Core value domain and ids
    pub use scratch_core::{to_bool, to_number, to_text, Value};

    // Project model
    pub use scratch_model::{HatKind, Project, Script, Target};

    // SB3 loading
    pub use scratch_sb3::load_project;

    // Errors
    pub use scratch_core::LoadError;
    pub use scratch_engine::RuntimeError;

    // Engine
    pub use scratch_engine::{Runtime, RuntimeConfig};
}
