//! Error types shared across the workspace.
//!
//! Mirrors the per-subsystem enum style used throughout: one `thiserror`
//! enum per failure surface, with `Display` messages suitable for logs
//! and `source()` wiring for nested causes.

use std::fmt;

/// A malformed SB3 project detected while building the [`Project`
/// model](https://docs.rs/scratch-model) from parsed JSON.
///
/// Returned by `Project::from_sb3` / `Runtime::initialize`; construction
/// refuses to proceed past this error — a malformed project never starts.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoadError {
    /// The input text was not valid JSON, or did not match the SB3 schema.
    #[error("invalid SB3 JSON: {0}")]
    InvalidJson(String),
    /// A block's `next` pointer, substack, or input references a block id
    /// that does not exist in the target's block table.
    #[error("block '{from}' references dangling block id '{to}'")]
    DanglingBlockRef {
        /// The block that holds the dangling reference.
        from: String,
        /// The missing block id it points to.
        to: String,
    },
    /// More than one Stage target was present, or none was.
    #[error("project must have exactly one Stage target, found {count}")]
    StageCount {
        /// The number of Stage targets found.
        count: usize,
    },
    /// A block graph edge forms a cycle along `next`/substack links.
    #[error("cycle detected in block graph starting at '{block}'")]
    CyclicBlockGraph {
        /// A block id on the cycle.
        block: String,
    },
}

/// Reserved error surface for block primitive execution.
///
/// Per the runtime's forgiving-coercion contract, every `to_number`/
/// `to_bool`/`to_text` conversion and every list index operation has a
/// defined fallback and never produces one of these — the variant exists
/// so [`scratch_ops::Primitive::step`]'s signature stays uniform for any
/// primitive that genuinely can fail (for example a future extension
/// opcode backed by an external resource).
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlockError {
    /// A primitive's invariant was violated in a way that has no defined
    /// Scratch fallback.
    #[error("block execution failed: {reason}")]
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl BlockError {
    /// Construct a [`BlockError::Failed`] from any displayable reason.
    pub fn failed(reason: impl fmt::Display) -> Self {
        BlockError::Failed {
            reason: reason.to_string(),
        }
    }
}
