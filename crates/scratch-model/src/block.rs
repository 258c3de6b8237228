//! The block arena: blocks addressed by a compact handle rather than by
//! the SB3 source's string ids.
//!
//! "Block graph pointers → arena + ids": the SB3 wire format references
//! blocks by string id, which is convenient for JSON but means every
//! `next`/substack/reporter traversal would otherwise be a hash lookup.
//! [`BlockArena`] resolves every reference once at load time into a
//! [`BlockHandle`] — a plain `u32` index into a flat `Vec<Block>` — so the
//! interpreter's hot path (walking a script) never touches a hash map.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use scratch_core::id::{BlockId, BroadcastId, ListId, ProcCode, VariableId};
use scratch_core::{LoadError, Value};

/// A compact handle into a [`BlockArena`].
///
/// Generation-free: the arena is built once at load time and never
/// mutates its block list afterward (only `Variable`/`List` *contents*
/// and the runtime's separate clone-target list mutate post-load), so
/// there is no staleness to detect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHandle(pub(crate) u32);

impl BlockHandle {
    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A resolved input slot: either a literal shadow value, a nested
/// reporter block, the body of a C-shaped block, or absent.
#[derive(Clone, Debug)]
pub enum InputLink {
    /// A literal value baked in at load time (a shadow block or inline
    /// primitive with no reporter attached).
    Literal(Value),
    /// A nested reporter block to evaluate for this input.
    Reporter(BlockHandle),
    /// The first block of a substack (the body of an `if`/`repeat`/…).
    Substack(BlockHandle),
    /// No value was provided and there is no default shadow.
    Empty,
}

/// A resolved field literal: a constant token carried directly on the
/// block rather than through an input slot.
#[derive(Clone, Debug)]
pub enum FieldLiteral {
    /// A plain text token (e.g. a key name, a math-op selector).
    Text(Arc<str>),
    /// A reference to a variable by id.
    Variable(VariableId),
    /// A reference to a list by id.
    List(ListId),
    /// A reference to a broadcast channel by id.
    Broadcast(BroadcastId),
}

impl FieldLiteral {
    /// Borrow the field as plain text, regardless of which variant it is.
    ///
    /// Used by opcodes (e.g. `sensing_keypressed`'s constant-key fast
    /// path) that only care about the literal token, not what kind of
    /// reference it is.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldLiteral::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Mutation data carried on `procedures_call`/`procedures_prototype`
/// blocks, decoded from SB3's `proccode`/`argumentdefaults`/`warp` triple.
///
/// Without this, custom block dispatch cannot bind call-site arguments to
/// the callee's parameter names.
#[derive(Clone, Debug)]
pub struct ProcMutation {
    /// The custom block's signature, e.g. `"move %n steps"`.
    pub proc_code: ProcCode,
    /// Ids of the argument reporter blocks, in declaration order. Present
    /// on the `procedures_prototype` block; mirrored onto matching
    /// `procedures_call` blocks so argument binding is positional.
    pub argument_ids: Vec<Arc<str>>,
    /// Whether the procedure runs "without screen refresh" (warp mode).
    /// The scheduler does not special-case this — retained so loaders
    /// round-trip it faithfully.
    pub warp: bool,
}

/// One block: an opcode, its resolved inputs and fields, and its place in
/// the block graph.
#[derive(Clone, Debug)]
pub struct Block {
    /// The original SB3 string id, kept for diagnostics.
    pub source_id: BlockId,
    /// The opcode name, e.g. `"operator_add"`.
    pub opcode: Arc<str>,
    /// Resolved input slots, keyed by SB3 input name (e.g. `"NUM1"`).
    pub inputs: HashMap<Arc<str>, InputLink>,
    /// Resolved field literals, keyed by SB3 field name (e.g. `"VARIABLE"`).
    pub fields: HashMap<Arc<str>, FieldLiteral>,
    /// The next block in the same stack, if any.
    pub next: Option<BlockHandle>,
    /// The parent block (stack or substack owner), if any.
    pub parent: Option<BlockHandle>,
    /// Whether this block is a top-level (hat) block.
    pub top_level: bool,
    /// Whether this block is a shadow (default-literal) block.
    pub shadow: bool,
    /// Procedure call/definition metadata, if this is a `procedures_*` block.
    pub mutation: Option<ProcMutation>,
}

impl Block {
    /// Look up a resolved input by SB3 name, defaulting to `Empty`.
    pub fn input(&self, name: &str) -> &InputLink {
        self.inputs.get(name).unwrap_or(&InputLink::Empty)
    }

    /// Look up a resolved field by SB3 name.
    pub fn field(&self, name: &str) -> Option<&FieldLiteral> {
        self.fields.get(name)
    }
}

/// Flat storage for all blocks in a project, addressed by [`BlockHandle`].
#[derive(Clone, Debug, Default)]
pub struct BlockArena {
    blocks: Vec<Block>,
}

impl BlockArena {
    /// Resolve a handle to its block.
    pub fn get(&self, handle: BlockHandle) -> &Block {
        &self.blocks[handle.index()]
    }

    /// Number of blocks in the arena.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the arena holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over every `(handle, block)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (BlockHandle, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (BlockHandle(i as u32), b))
    }
}

/// A single raw (string-addressed) block, as produced by a loader before
/// arena resolution.
#[derive(Clone, Debug)]
pub struct RawBlock {
    /// See [`Block::source_id`].
    pub source_id: BlockId,
    /// See [`Block::opcode`].
    pub opcode: Arc<str>,
    /// Unresolved input slots: either a literal, a reference to another
    /// raw block id (reporter), a substack reference, or empty.
    pub inputs: HashMap<Arc<str>, RawInput>,
    /// See [`Block::fields`].
    pub fields: HashMap<Arc<str>, FieldLiteral>,
    /// See [`Block::next`], by source id.
    pub next: Option<BlockId>,
    /// See [`Block::parent`], by source id.
    pub parent: Option<BlockId>,
    /// See [`Block::top_level`].
    pub top_level: bool,
    /// See [`Block::shadow`].
    pub shadow: bool,
    /// See [`Block::mutation`].
    pub mutation: Option<ProcMutation>,
}

/// An unresolved input slot, as produced by a loader.
#[derive(Clone, Debug)]
pub enum RawInput {
    /// See [`InputLink::Literal`].
    Literal(Value),
    /// A reference to another raw block by source id (reporter or substack
    /// — resolved to the right [`InputLink`] variant based on whether the
    /// referenced block is itself a hat/statement chain or a reporter).
    Reporter(BlockId),
    /// Explicitly a substack reference.
    Substack(BlockId),
    /// See [`InputLink::Empty`].
    Empty,
}

/// Builds a [`BlockArena`] from string-addressed [`RawBlock`]s, resolving
/// every cross-reference to a [`BlockHandle`] and validating the graph.
#[derive(Default)]
pub struct BlockArenaBuilder {
    order: Vec<BlockId>,
    raw: HashMap<BlockId, RawBlock>,
}

impl BlockArenaBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw block under its source id.
    pub fn insert(&mut self, block: RawBlock) {
        let id = block.source_id.clone();
        if !self.raw.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.raw.insert(id, block);
    }

    /// Resolve all string references to handles and validate the graph.
    ///
    /// Blocks are assigned handles in insertion order, so handle order is
    /// stable and deterministic across loads of the same JSON. Returns
    /// [`LoadError::DanglingBlockRef`] for any reference to an id that was
    /// never inserted, and [`LoadError::CyclicBlockGraph`] if `next`/
    /// substack edges form a cycle.
    pub fn build(self) -> Result<(BlockArena, HashMap<BlockId, BlockHandle>), LoadError> {
        let mut index: HashMap<BlockId, BlockHandle> = HashMap::with_capacity(self.order.len());
        for (i, id) in self.order.iter().enumerate() {
            index.insert(id.clone(), BlockHandle(i as u32));
        }

        let resolve = |id: &BlockId, from: &BlockId| -> Result<BlockHandle, LoadError> {
            index.get(id).copied().ok_or_else(|| LoadError::DanglingBlockRef {
                from: from.to_string(),
                to: id.to_string(),
            })
        };

        let mut blocks = Vec::with_capacity(self.order.len());
        for id in &self.order {
            let raw = self.raw.get(id).expect("id came from self.order");
            let mut inputs = HashMap::with_capacity(raw.inputs.len());
            for (name, raw_input) in &raw.inputs {
                let resolved = match raw_input {
                    RawInput::Literal(v) => InputLink::Literal(v.clone()),
                    RawInput::Reporter(target) => InputLink::Reporter(resolve(target, id)?),
                    RawInput::Substack(target) => InputLink::Substack(resolve(target, id)?),
                    RawInput::Empty => InputLink::Empty,
                };
                inputs.insert(name.clone(), resolved);
            }
            let next = raw.next.as_ref().map(|n| resolve(n, id)).transpose()?;
            let parent = raw.parent.as_ref().map(|p| resolve(p, id)).transpose()?;

            blocks.push(Block {
                source_id: raw.source_id.clone(),
                opcode: raw.opcode.clone(),
                inputs,
                fields: raw.fields.clone(),
                next,
                parent,
                top_level: raw.top_level,
                shadow: raw.shadow,
                mutation: raw.mutation.clone(),
            });
        }

        let arena = BlockArena { blocks };
        check_acyclic(&arena, &index)?;
        Ok((arena, index))
    }
}

/// Walk every `next`/substack edge from every top-level block, rejecting
/// cycles. Reporter edges are excluded per the invariant that only
/// `next`/substack edges are required to be acyclic.
fn check_acyclic(
    arena: &BlockArena,
    index: &HashMap<BlockId, BlockHandle>,
) -> Result<(), LoadError> {
    let mut globally_visited: HashSet<BlockHandle> = HashSet::new();

    for handle in index.values().copied() {
        if globally_visited.contains(&handle) {
            continue;
        }
        let mut on_stack: HashSet<BlockHandle> = HashSet::new();
        let mut stack = vec![handle];
        while let Some(cur) = stack.pop() {
            if on_stack.contains(&cur) {
                continue;
            }
            // Depth-first walk along next and substack edges.
            let mut frontier = vec![cur];
            let mut path = HashSet::new();
            while let Some(node) = frontier.pop() {
                if !path.insert(node) {
                    return Err(LoadError::CyclicBlockGraph {
                        block: arena.get(node).source_id.to_string(),
                    });
                }
                globally_visited.insert(node);
                let block = arena.get(node);
                if let Some(next) = block.next {
                    frontier.push(next);
                }
                for link in block.inputs.values() {
                    if let InputLink::Substack(h) = link {
                        frontier.push(*h);
                    }
                }
                on_stack.insert(node);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_block(id: &str, next: Option<&str>) -> RawBlock {
        RawBlock {
            source_id: BlockId::from(id),
            opcode: Arc::from("control_stop"),
            inputs: HashMap::new(),
            fields: HashMap::new(),
            next: next.map(BlockId::from),
            parent: None,
            top_level: next.is_none(),
            shadow: false,
            mutation: None,
        }
    }

    #[test]
    fn resolves_chain_in_order() {
        let mut b = BlockArenaBuilder::new();
        b.insert(literal_block("a", Some("b")));
        b.insert(literal_block("b", None));
        let (arena, index) = b.build().unwrap();
        let a = index[&BlockId::from("a")];
        let block_a = arena.get(a);
        let next = block_a.next.unwrap();
        assert_eq!(arena.get(next).source_id, BlockId::from("b"));
    }

    #[test]
    fn dangling_next_is_rejected() {
        let mut b = BlockArenaBuilder::new();
        b.insert(literal_block("a", Some("missing")));
        let err = b.build().unwrap_err();
        assert!(matches!(err, LoadError::DanglingBlockRef { .. }));
    }

    #[test]
    fn self_loop_next_is_rejected() {
        let mut b = BlockArenaBuilder::new();
        b.insert(literal_block("a", Some("a")));
        let err = b.build().unwrap_err();
        assert!(matches!(err, LoadError::CyclicBlockGraph { .. }));
    }
}
