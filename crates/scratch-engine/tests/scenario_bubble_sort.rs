//! S8 from the spec's end-to-end scenarios, and invariant 6: a
//! user-level bubble sort over the block set terminates and leaves the
//! list sorted ascending as a permutation of the input.
//!
//! The script is the unoptimized (full-pass-every-time) variant: an
//! outer `repeat (n-1)`, an inner `repeat until j > n-1` walking the
//! list with index variable `j`, comparing `item j` and `item j+1` and
//! swapping through a `temp` scalar when out of order.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::id::{BlockId, ListId, VariableId};
use scratch_core::Value;
use scratch_engine::{Runtime, RuntimeConfig};
use scratch_model::{
    BlockArenaBuilder, FieldLiteral, HatKind, ListVar, Project, RawBlock, RawInput, Script,
    Target, Variable,
};

fn id(s: &str) -> BlockId {
    BlockId::from(s)
}

fn lit(v: f64) -> RawInput {
    RawInput::Literal(Value::Number(v))
}

fn reporter(s: &str) -> RawInput {
    RawInput::Reporter(id(s))
}

fn substack(s: &str) -> RawInput {
    RawInput::Substack(id(s))
}

fn insert(
    builder: &mut BlockArenaBuilder,
    source_id: &str,
    opcode: &str,
    inputs: Vec<(&str, RawInput)>,
    fields: Vec<(&str, FieldLiteral)>,
    next: Option<&str>,
    parent: Option<&str>,
    top_level: bool,
) {
    builder.insert(RawBlock {
        source_id: id(source_id),
        opcode: Arc::from(opcode),
        inputs: inputs.into_iter().map(|(k, v)| (Arc::from(k), v)).collect(),
        fields: fields.into_iter().map(|(k, v)| (Arc::from(k), v)).collect(),
        next: next.map(id),
        parent: parent.map(id),
        top_level,
        shadow: false,
        mutation: None,
    });
}

/// Build the bubble-sort project over `items`, run it to quiescence (or
/// panic past `max_frames`), and return the sorted list's final contents.
fn bubble_sort(items: Vec<f64>, max_frames: usize) -> Vec<f64> {
    let list_id = ListId::from("nums");
    let j_id = VariableId::from("j");
    let temp_id = VariableId::from("temp");
    let n = items.len() as f64;

    let mut b = BlockArenaBuilder::new();

    // hat -> set j to 1 -> outer repeat (n-1) times { inner } -> (end)
    insert(&mut b, "hat", "event_whenflagclicked", vec![], vec![], Some("set_j_outer"), None, true);
    insert(
        &mut b,
        "set_j_outer",
        "data_setvariableto",
        vec![("VALUE", lit(1.0))],
        vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))],
        Some("outer_repeat"),
        None,
        false,
    );
    insert(
        &mut b,
        "outer_repeat",
        "control_repeat",
        vec![("TIMES", lit(n - 1.0)), ("SUBSTACK", substack("reset_j"))],
        vec![],
        None,
        None,
        false,
    );

    // Outer body: reset j to 1, then inner repeat-until loop.
    insert(
        &mut b,
        "reset_j",
        "data_setvariableto",
        vec![("VALUE", lit(1.0))],
        vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))],
        Some("inner_loop"),
        Some("outer_repeat"),
        false,
    );
    insert(
        &mut b,
        "inner_loop",
        "control_repeat_until",
        vec![
            ("CONDITION", reporter("j_gt_limit")),
            ("SUBSTACK", substack("compare_if")),
        ],
        vec![],
        None,
        Some("outer_repeat"),
        false,
    );
    insert(
        &mut b,
        "j_gt_limit",
        "operator_gt",
        vec![("OPERAND1", reporter("read_j_cond")), ("OPERAND2", lit(n - 1.0))],
        vec![],
        None,
        Some("inner_loop"),
        false,
    );
    insert(&mut b, "read_j_cond", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))], None, Some("j_gt_limit"), false);

    // Inner body: if item(j) > item(j+1) { swap } ; change j by 1.
    insert(
        &mut b,
        "compare_if",
        "control_if",
        vec![
            ("CONDITION", reporter("should_swap")),
            ("SUBSTACK", substack("save_temp")),
        ],
        vec![],
        Some("inc_j"),
        Some("inner_loop"),
        false,
    );
    insert(
        &mut b,
        "should_swap",
        "operator_gt",
        vec![("OPERAND1", reporter("item_j")), ("OPERAND2", reporter("item_j_plus_1_a"))],
        vec![],
        None,
        Some("compare_if"),
        false,
    );
    insert(&mut b, "item_j", "data_itemoflist", vec![("INDEX", reporter("read_j_a"))], vec![("LIST", FieldLiteral::List(list_id.clone()))], None, Some("should_swap"), false);
    insert(&mut b, "read_j_a", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))], None, Some("item_j"), false);
    insert(&mut b, "item_j_plus_1_a", "data_itemoflist", vec![("INDEX", reporter("j_plus_1_a"))], vec![("LIST", FieldLiteral::List(list_id.clone()))], None, Some("should_swap"), false);
    insert(&mut b, "j_plus_1_a", "operator_add", vec![("NUM1", reporter("read_j_b")), ("NUM2", lit(1.0))], vec![], None, Some("item_j_plus_1_a"), false);
    insert(&mut b, "read_j_b", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))], None, Some("j_plus_1_a"), false);

    // save_temp = item(j); replace item(j) with item(j+1); replace item(j+1) with temp.
    insert(
        &mut b,
        "save_temp",
        "data_setvariableto",
        vec![("VALUE", reporter("item_j_b"))],
        vec![("VARIABLE", FieldLiteral::Variable(temp_id.clone()))],
        Some("replace_j"),
        Some("compare_if"),
        false,
    );
    insert(&mut b, "item_j_b", "data_itemoflist", vec![("INDEX", reporter("read_j_c"))], vec![("LIST", FieldLiteral::List(list_id.clone()))], None, Some("save_temp"), false);
    insert(&mut b, "read_j_c", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))], None, Some("item_j_b"), false);

    insert(
        &mut b,
        "replace_j",
        "data_replaceitemoflist",
        vec![("INDEX", reporter("read_j_d")), ("ITEM", reporter("item_j_plus_1_b"))],
        vec![("LIST", FieldLiteral::List(list_id.clone()))],
        Some("replace_j_plus_1"),
        Some("save_temp"),
        false,
    );
    insert(&mut b, "read_j_d", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))], None, Some("replace_j"), false);
    insert(&mut b, "item_j_plus_1_b", "data_itemoflist", vec![("INDEX", reporter("j_plus_1_b"))], vec![("LIST", FieldLiteral::List(list_id.clone()))], None, Some("replace_j"), false);
    insert(&mut b, "j_plus_1_b", "operator_add", vec![("NUM1", reporter("read_j_e")), ("NUM2", lit(1.0))], vec![], None, Some("item_j_plus_1_b"), false);
    insert(&mut b, "read_j_e", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))], None, Some("j_plus_1_b"), false);

    insert(
        &mut b,
        "replace_j_plus_1",
        "data_replaceitemoflist",
        vec![("INDEX", reporter("j_plus_1_c")), ("ITEM", reporter("read_temp"))],
        vec![("LIST", FieldLiteral::List(list_id.clone()))],
        None,
        Some("replace_j"),
        false,
    );
    insert(&mut b, "j_plus_1_c", "operator_add", vec![("NUM1", reporter("read_j_f")), ("NUM2", lit(1.0))], vec![], None, Some("replace_j_plus_1"), false);
    insert(&mut b, "read_j_f", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))], None, Some("j_plus_1_c"), false);
    insert(&mut b, "read_temp", "data_variable", vec![], vec![("VARIABLE", FieldLiteral::Variable(temp_id.clone()))], None, Some("replace_j_plus_1"), false);

    insert(
        &mut b,
        "inc_j",
        "data_changevariableby",
        vec![("VALUE", lit(1.0))],
        vec![("VARIABLE", FieldLiteral::Variable(j_id.clone()))],
        None,
        Some("inner_loop"),
        false,
    );

    let (arena, index) = b.build().expect("hand-built bubble sort fixture is well-formed");
    let arena = Arc::new(arena);
    let hat_handle = index[&id("hat")];

    let values: Vec<Value> = items.iter().map(|&n| Value::Number(n)).collect();
    let mut lists = HashMap::new();
    lists.insert(list_id.clone(), ListVar::new(list_id.clone(), "nums", values));
    let mut variables = HashMap::new();
    variables.insert(j_id.clone(), Variable::new(j_id, "j", Value::Number(0.0)));
    variables.insert(temp_id.clone(), Variable::new(temp_id, "temp", Value::Number(0.0)));

    let scripts: Arc<[Script]> = Arc::from(vec![Script {
        top_block: hat_handle,
        hat: HatKind::GreenFlag,
    }]);
    let sprite = Target::new("Sprite1", false, variables, lists, scripts, 1);
    let stage = Target::new("Stage", true, HashMap::new(), HashMap::new(), Arc::from([]), 1);

    let project = Project {
        arena,
        targets: vec![stage, sprite],
        stage_index: 0,
        broadcasts: HashMap::new(),
    };

    let mut runtime = Runtime::new(project, RuntimeConfig::default()).unwrap();
    runtime.broadcast_green_flag();
    let mut frames = 0;
    while runtime.active_thread_count() > 0 {
        runtime.update(1.0 / 60.0);
        frames += 1;
        assert!(frames <= max_frames, "bubble sort did not terminate within {max_frames} frames");
    }

    runtime
        .list_by_name(1, "nums")
        .unwrap()
        .items
        .iter()
        .map(scratch_core::to_number)
        .collect()
}

#[test]
fn s8_bubble_sort_terminates_and_sorts() {
    let input = vec![8.0, 3.0, 9.0, 1.0, 6.0, 2.0, 10.0, 4.0, 7.0, 5.0];
    let mut expected = input.clone();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let sorted = bubble_sort(input.clone(), 2000);
    assert_eq!(sorted, expected);

    // Invariant 6, the permutation half: same multiset of values.
    let mut sorted_copy = sorted.clone();
    let mut input_copy = input.clone();
    sorted_copy.sort_by(|a, b| a.partial_cmp(b).unwrap());
    input_copy.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(sorted_copy, input_copy);
}

#[test]
fn s8_bubble_sort_handles_already_sorted_and_reverse_sorted() {
    let ascending: Vec<f64> = (1..=10).map(|n| n as f64).collect();
    assert_eq!(bubble_sort(ascending.clone(), 2000), ascending);

    let descending: Vec<f64> = (1..=10).rev().map(|n| n as f64).collect();
    assert_eq!(bubble_sort(descending, 2000), ascending);
}
