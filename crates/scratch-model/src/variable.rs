//! Scalar variables and lists.

use scratch_core::id::{ListId, VariableId};
use scratch_core::Value;
use std::sync::Arc;

/// A scalar variable: `{ name, id, value }` per the data model.
#[derive(Clone, Debug)]
pub struct Variable {
    /// Display name, as authored in the editor.
    pub name: Arc<str>,
    /// Stable id.
    pub id: VariableId,
    /// Current value.
    pub value: Value,
}

impl Variable {
    /// Construct a new scalar variable.
    pub fn new(id: VariableId, name: impl Into<Arc<str>>, value: Value) -> Self {
        Self {
            name: name.into(),
            id,
            value,
        }
    }
}

/// A list variable: an ordered sequence of [`Value`]s, addressed
/// 1-indexed externally by the `data_*` opcodes.
#[derive(Clone, Debug)]
pub struct ListVar {
    /// Display name, as authored in the editor.
    pub name: Arc<str>,
    /// Stable id.
    pub id: ListId,
    /// Backing storage — 0-indexed internally; opcodes translate.
    pub items: Vec<Value>,
}

impl ListVar {
    /// Construct a new list with the given initial contents.
    pub fn new(id: ListId, name: impl Into<Arc<str>>, items: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            id,
            items,
        }
    }
}
