//! [`BlockContext`]: split-borrow execution state passed to every
//! primitive's `step`.
//!
//! A single struct threading read access, write access, and ambient
//! resources through one call, with the two "views" (here: current target
//! vs. the Stage's globals) resolved by the context rather than by the
//! caller.

use std::collections::HashMap;
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use scratch_core::id::{ListId, VariableId};
use scratch_core::{BlockError, Value};
use scratch_model::{Block, BlockArena, BlockHandle, FieldLiteral, InputLink, Target};

use crate::flow::Flow;
use crate::host::HostState;
use crate::table::OpTable;

/// Execution context for one primitive invocation.
///
/// Holds a mutable slice of every live target (so a primitive can affect
/// targets other than its own, e.g. `sensing_distanceto`) plus the index
/// of the target the running thread belongs to. Variable and list lookups
/// fall back from the current target to the Stage, matching Scratch's
/// local-then-global resolution for names that aren't disambiguated by id
/// at the block-graph level.
pub struct BlockContext<'a> {
    ops: &'a OpTable,
    arena: &'a BlockArena,
    targets: &'a mut [Target],
    current: usize,
    stage_index: usize,
    host: &'a HostState,
    rng: &'a mut ChaCha8Rng,
    proc_args: Option<&'a HashMap<Arc<str>, Value>>,
    dynamic_keys: &'a mut std::collections::HashSet<Arc<str>>,
    unknown_opcodes: &'a mut std::collections::HashSet<Arc<str>>,
}

impl<'a> BlockContext<'a> {
    /// Construct a new context. Typically called by `scratch-thread`, not
    /// directly by primitives.
    ///
    /// `proc_args` is `Some` only while executing inside a custom block's
    /// call frame, and carries the bindings `procedures_call` attached to
    /// that frame; `argument_reporter_string_number`/`_boolean` read from
    /// it by parameter name.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ops: &'a OpTable,
        arena: &'a BlockArena,
        targets: &'a mut [Target],
        current: usize,
        stage_index: usize,
        host: &'a HostState,
        rng: &'a mut ChaCha8Rng,
        proc_args: Option<&'a HashMap<Arc<str>, Value>>,
        dynamic_keys: &'a mut std::collections::HashSet<Arc<str>>,
        unknown_opcodes: &'a mut std::collections::HashSet<Arc<str>>,
    ) -> Self {
        Self {
            ops,
            arena,
            targets,
            current,
            stage_index,
            host,
            rng,
            proc_args,
            dynamic_keys,
            unknown_opcodes,
        }
    }

    /// Register `key` (already normalized) in the dynamic active-keys
    /// set, for a `sensing_keypressed` evaluation whose `KEY_OPTION`
    /// resolved through a non-shadow (dynamically computed) reporter.
    /// Cleared at the start of every scheduler frame.
    pub fn register_dynamic_key(&mut self, key: Arc<str>) {
        self.dynamic_keys.insert(key);
    }

    /// Read a custom block parameter by name, for
    /// `argument_reporter_string_number`/`argument_reporter_boolean`.
    /// `None` outside of a procedure call frame (a malformed project that
    /// places an argument reporter directly in a top-level script).
    pub fn proc_arg(&self, name: &str) -> Option<&Value> {
        self.proc_args.and_then(|args| args.get(name))
    }

    /// The target the running thread belongs to.
    pub fn target(&self) -> &Target {
        &self.targets[self.current]
    }

    /// Mutable access to the running thread's target.
    pub fn target_mut(&mut self) -> &mut Target {
        &mut self.targets[self.current]
    }

    /// The Stage target.
    pub fn stage(&self) -> &Target {
        &self.targets[self.stage_index]
    }

    /// All live targets, for primitives that scan by name (`sensing_of`,
    /// `sensing_distanceto`).
    pub fn targets(&self) -> &[Target] {
        self.targets
    }

    /// Index of the running thread's target within [`Self::targets`].
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Host input snapshot (keyboard, mouse, timer).
    pub fn host(&self) -> &HostState {
        self.host
    }

    /// The shared deterministic RNG, for `operator_random` and
    /// `data_itemoflist`'s `"random"` keyword index.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        self.rng
    }

    /// Read a scalar variable by id, checking the current target before
    /// falling back to the Stage's globals.
    pub fn variable(&self, id: &VariableId) -> Option<&Value> {
        self.targets[self.current]
            .variables
            .get(id)
            .or_else(|| {
                if self.current == self.stage_index {
                    None
                } else {
                    self.targets[self.stage_index].variables.get(id)
                }
            })
            .map(|v| &v.value)
    }

    /// Mutable access to a scalar variable's value by id, same fallback
    /// order as [`Self::variable`].
    pub fn variable_mut(&mut self, id: &VariableId) -> Option<&mut Value> {
        if self.targets[self.current].variables.contains_key(id) {
            return self.targets[self.current]
                .variables
                .get_mut(id)
                .map(|v| &mut v.value);
        }
        if self.current != self.stage_index {
            return self.targets[self.stage_index]
                .variables
                .get_mut(id)
                .map(|v| &mut v.value);
        }
        None
    }

    /// Read a list's contents by id, with the same local-then-global
    /// fallback as [`Self::variable`].
    pub fn list(&self, id: &ListId) -> Option<&Vec<Value>> {
        self.targets[self.current]
            .lists
            .get(id)
            .or_else(|| {
                if self.current == self.stage_index {
                    None
                } else {
                    self.targets[self.stage_index].lists.get(id)
                }
            })
            .map(|l| &l.items)
    }

    /// Mutable access to a list's contents by id.
    pub fn list_mut(&mut self, id: &ListId) -> Option<&mut Vec<Value>> {
        if self.targets[self.current].lists.contains_key(id) {
            return self.targets[self.current]
                .lists
                .get_mut(id)
                .map(|l| &mut l.items);
        }
        if self.current != self.stage_index {
            return self.targets[self.stage_index]
                .lists
                .get_mut(id)
                .map(|l| &mut l.items);
        }
        None
    }

    /// Resolve a block handle to its definition.
    pub fn block(&self, handle: BlockHandle) -> &Block {
        self.arena.get(handle)
    }

    /// Evaluate a block as a reporter, dispatching through the opcode
    /// table.
    ///
    /// An unknown opcode follows the UnknownOpcode policy: it reports the
    /// empty string rather than failing, with one warning logged per
    /// opcode for the life of this context's [`Self::unknown_opcodes`]
    /// set. Returns [`BlockError::Failed`] only if a *registered*
    /// primitive returns a non-`Value` flow (a statement opcode used in
    /// reporter position — malformed input the loader should have
    /// rejected, but defended here since projects are not re-validated
    /// after load).
    pub fn eval(&mut self, handle: BlockHandle) -> Result<Value, BlockError> {
        let opcode = self.arena.get(handle).opcode.clone();
        if self.ops.get(&opcode).is_none() {
            self.warn_unknown_opcode(&opcode);
            return Ok(Value::default());
        }
        match self.step(handle)? {
            Flow::Value(v) => Ok(v),
            _ => Err(BlockError::failed(format!(
                "'{opcode}' used as a reporter but did not produce a value",
            ))),
        }
    }

    /// Dispatch `handle` through the opcode table for one execution step,
    /// returning whatever control signal the primitive produces.
    ///
    /// Used by `scratch-thread`'s stepping loop to run statement and
    /// control-flow opcodes, which return a [`Flow`] variant other than
    /// `Value`; reporters in expression position go through [`Self::eval`]
    /// instead, which additionally requires the result back as a `Value`.
    ///
    /// An unknown opcode follows the UnknownOpcode policy: it is a no-op
    /// that advances to `next`, per [`Self::eval`]'s doc.
    pub fn step(&mut self, handle: BlockHandle) -> Result<Flow, BlockError> {
        let block = self.arena.get(handle);
        let Some(prim) = self.ops.get(&block.opcode) else {
            self.warn_unknown_opcode(&block.opcode);
            return Ok(Flow::Next);
        };
        prim.step(self, block)
    }

    /// Log once (for the life of this set) that `opcode` has no
    /// registered primitive: a single logged warning per opcode per
    /// project, never a hard error.
    fn warn_unknown_opcode(&mut self, opcode: &Arc<str>) {
        if self.unknown_opcodes.insert(opcode.clone()) {
            log::warn!("unknown opcode '{opcode}', treating as a no-op");
        }
    }

    /// Resolve one of `block`'s input slots to a [`Value`]: a literal
    /// resolves directly, a reporter is evaluated recursively, and an
    /// absent or substack slot defaults to the empty string (Scratch's
    /// default for an unset reporter input).
    pub fn eval_input(&mut self, block: &Block, name: &str) -> Result<Value, BlockError> {
        match block.input(name) {
            InputLink::Literal(v) => Ok(v.clone()),
            InputLink::Reporter(h) => self.eval(*h),
            InputLink::Substack(_) | InputLink::Empty => Ok(Value::default()),
        }
    }

    /// Resolve an input slot that is expected to hold a substack, for
    /// control blocks (`control_if`'s `SUBSTACK`, etc). Returns `None` if
    /// the slot is empty (an empty C-block body).
    pub fn substack(&self, block: &Block, name: &str) -> Option<BlockHandle> {
        match block.input(name) {
            InputLink::Substack(h) => Some(*h),
            _ => None,
        }
    }

    /// Borrow a field literal by name, for opcodes that read a constant
    /// token directly (`sensing_keypressed`'s `KEY_OPTION`, `data_*`'s
    /// `VARIABLE`/`LIST`, `operator_mathop`'s `OPERATOR`).
    pub fn field<'b>(&self, block: &'b Block, name: &str) -> Option<&'b FieldLiteral> {
        block.field(name)
    }
}

/// Convert a field name into the `Arc<str>` shadow-text it carries, for
/// opcodes whose only signal is a plain token (e.g. `operator_mathop`'s
/// `OPERATOR` field).
pub fn field_text<'b>(block: &'b Block, name: &str) -> &'b str {
    block
        .field(name)
        .and_then(FieldLiteral::as_text)
        .unwrap_or("")
}
