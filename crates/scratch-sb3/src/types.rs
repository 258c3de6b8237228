//! The SB3 wire schema, deserialized with `serde`.
//!
//! Grounded in the retrieved `lewisfm-scratch-vm` reference
//! (`other_examples/*-sb3.rs.rs`): SB3 encodes inputs and fields as
//! loosely-typed positional JSON arrays rather than self-describing
//! objects, so most of them are deserialized as raw `serde_json::Value`
//! tuples and interpreted in `crate::loader` rather than through a rigid
//! derive — the wire format simply isn't regular enough for one.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as Json;

/// Top-level SB3 project JSON.
#[derive(Debug, Deserialize)]
pub struct Sb3Project {
    /// Every target (Stage first, by editor convention, but not assumed).
    pub targets: Vec<Sb3Target>,
}

/// One target (the Stage or a Sprite) in SB3 JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sb3Target {
    /// Whether this is the Stage.
    pub is_stage: bool,
    /// Target name.
    pub name: Arc<str>,
    /// Variable id → `[name, value]`.
    #[serde(default)]
    pub variables: HashMap<Arc<str>, Sb3NamedValue>,
    /// List id → `[name, [elements]]`.
    #[serde(default)]
    pub lists: HashMap<Arc<str>, Sb3NamedList>,
    /// Broadcast id → name.
    #[serde(default)]
    pub broadcasts: HashMap<Arc<str>, Arc<str>>,
    /// Block id → block.
    #[serde(default)]
    pub blocks: HashMap<Arc<str>, Sb3Block>,
    /// Costume descriptors. Never decoded — only the count matters to
    /// the core (Non-goal: asset decoding belongs to the SB3 archive
    /// reader).
    #[serde(default)]
    pub costumes: Vec<Json>,
    /// Sound descriptors. Opaque, like `costumes`.
    #[serde(default)]
    pub sounds: Vec<Json>,
    /// Index of the currently selected costume.
    #[serde(default)]
    pub current_costume: u32,
    /// Output volume, `0..=100`.
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_volume() -> f64 {
    100.0
}

/// `[name, value]`, as SB3 encodes a scalar variable. A third element
/// (the cloud-variable flag) may be present; cloud variables are a
/// Non-goal, so it is ignored rather than rejected.
#[derive(Debug, Deserialize)]
pub struct Sb3NamedValue(pub Vec<Json>);

/// `[name, [elements]]`, as SB3 encodes a list.
#[derive(Debug, Deserialize)]
pub struct Sb3NamedList(pub Vec<Json>);

/// One block.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sb3Block {
    /// Opcode name, e.g. `"operator_add"`.
    pub opcode: Arc<str>,
    /// Next block's id in the same stack.
    #[serde(default)]
    pub next: Option<Arc<str>>,
    /// Parent block's id.
    #[serde(default)]
    pub parent: Option<Arc<str>>,
    /// Input name → input slot.
    #[serde(default)]
    pub inputs: HashMap<Arc<str>, Sb3Input>,
    /// Field name → field literal.
    #[serde(default)]
    pub fields: HashMap<Arc<str>, Sb3Field>,
    /// Whether this is a top-level (hat) block.
    #[serde(default)]
    pub top_level: bool,
    /// Whether this is a shadow (default-literal) block.
    #[serde(default)]
    pub shadow: bool,
    /// Procedure call/prototype metadata.
    #[serde(default)]
    pub mutation: Option<Sb3Mutation>,
}

/// An input slot: `[status, primary, shadow?]`.
///
/// `primary` is either `null`, a block-id string (a reporter or substack
/// reference), or a 2-4 element array encoding an inline shadow literal
/// (`[type, value, broadcastId?]`) — see
/// [`crate::loader::parse_inline_literal`].
#[derive(Debug, Deserialize)]
pub struct Sb3Input(pub Vec<Json>);

/// A field literal: `[value, id?]`.
#[derive(Debug, Deserialize)]
pub struct Sb3Field(pub Vec<Json>);

impl Sb3Field {
    /// The field's primary text value (a name or literal token).
    pub fn value_str(&self) -> &str {
        self.0.first().and_then(|v| v.as_str()).unwrap_or("")
    }

    /// The field's id, if it references a variable/list/broadcast.
    pub fn id_str(&self) -> Option<&str> {
        self.0.get(1).and_then(|v| v.as_str())
    }
}

/// Procedure call/prototype mutation data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sb3Mutation {
    /// The custom block's signature string.
    #[serde(rename = "proccode")]
    pub proc_code: Arc<str>,
    /// JSON-encoded array of argument ids, e.g. `"[\"arg0\"]"`.
    #[serde(rename = "argumentids", default)]
    pub argument_ids: Option<Arc<str>>,
    /// `true`/`false`, sometimes encoded as a JSON string rather than a
    /// JSON boolean — kept raw and interpreted in the loader.
    #[serde(default)]
    pub warp: Option<Json>,
}
