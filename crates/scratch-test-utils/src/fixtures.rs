//! Reusable block-graph fixtures for exercising the scheduler and
//! engine without hand-building a `BlockArena` in every test module.
//!
//! - [`counter_loop`] — a `repeat`/`forever` loop incrementing one
//!   variable, the shape every scheduler timing test reaches for.
//! - [`set_variable_script`] — a single `data_setvariableto` statement
//!   behind a green-flag hat.
//! - [`full_op_table`] — an [`OpTable`] with every `scratch-ops-lib`
//!   primitive registered, ready to drive either fixture.

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::id::{BlockId, VariableId};
use scratch_core::Value;
use scratch_model::{BlockArena, BlockArenaBuilder, BlockHandle, FieldLiteral, RawBlock, RawInput};
use scratch_ops::OpTable;

/// An [`OpTable`] with every primitive `scratch-ops-lib` registers.
pub fn full_op_table() -> OpTable {
    let mut ops = OpTable::new();
    scratch_ops_lib::register_all(&mut ops);
    ops
}

/// A `repeat <count>` (or `forever`, if `count` is `None`) loop whose
/// body increments `var_name` by one per pass. Returns the built arena,
/// the loop's top-level handle, and the variable's id.
pub fn counter_loop(count: Option<f64>, var_name: &str) -> (BlockArena, BlockHandle, VariableId) {
    let var_id = VariableId::from(var_name);
    let inc_id = BlockId::from("counter_loop_inc");
    let loop_id = BlockId::from("counter_loop_body");

    let mut builder = BlockArenaBuilder::new();
    builder.insert(RawBlock {
        source_id: inc_id.clone(),
        opcode: Arc::from("data_changevariableby"),
        inputs: HashMap::from([(Arc::from("VALUE"), RawInput::Literal(Value::Number(1.0)))]),
        fields: HashMap::from([(Arc::from("VARIABLE"), FieldLiteral::Variable(var_id.clone()))]),
        next: None,
        parent: Some(loop_id.clone()),
        top_level: false,
        shadow: false,
        mutation: None,
    });

    let mut loop_inputs = HashMap::from([(Arc::from("SUBSTACK"), RawInput::Substack(inc_id))]);
    let opcode = match count {
        Some(n) => {
            loop_inputs.insert(Arc::from("TIMES"), RawInput::Literal(Value::Number(n)));
            "control_repeat"
        }
        None => "control_forever",
    };
    builder.insert(RawBlock {
        source_id: loop_id.clone(),
        opcode: Arc::from(opcode),
        inputs: loop_inputs,
        fields: HashMap::new(),
        next: None,
        parent: None,
        top_level: true,
        shadow: false,
        mutation: None,
    });

    let (arena, index) = builder.build().expect("counter_loop fixture is well-formed");
    let handle = index[&loop_id];
    (arena, handle, var_id)
}

/// `event_whenflagclicked -> set <var_name> to <value>`. Returns the
/// built arena, the hat's handle (callers activate at `arena.get(hat).next`,
/// matching how `event_*` hats carry no primitive of their own), and the
/// variable's id.
pub fn set_variable_script(var_name: &str, value: Value) -> (BlockArena, BlockHandle, VariableId) {
    let var_id = VariableId::from(var_name);
    let hat_id = BlockId::from("set_var_hat");
    let set_id = BlockId::from("set_var_set");

    let mut builder = BlockArenaBuilder::new();
    builder.insert(RawBlock {
        source_id: set_id.clone(),
        opcode: Arc::from("data_setvariableto"),
        inputs: HashMap::from([(Arc::from("VALUE"), RawInput::Literal(value))]),
        fields: HashMap::from([(Arc::from("VARIABLE"), FieldLiteral::Variable(var_id.clone()))]),
        next: None,
        parent: Some(hat_id.clone()),
        top_level: false,
        shadow: false,
        mutation: None,
    });
    builder.insert(RawBlock {
        source_id: hat_id.clone(),
        opcode: Arc::from("event_whenflagclicked"),
        inputs: HashMap::new(),
        fields: HashMap::new(),
        next: Some(set_id),
        parent: None,
        top_level: true,
        shadow: false,
        mutation: None,
    });

    let (arena, index) = builder.build().expect("set_variable_script fixture is well-formed");
    let handle = index[&hat_id];
    (arena, handle, var_id)
}
