//! S1-S3 from the spec's end-to-end scenarios: `data_setvariableto` and
//! `data_changevariableby`, including Scratch's string-to-number coercion
//! on change.

mod common;

use scratch_core::Value;
use scratch_engine::{Runtime, RuntimeConfig};
use scratch_model::RawInput;

use common::BlockSpec;

fn run_to_quiescence(runtime: &mut Runtime) {
    runtime.broadcast_green_flag();
    for _ in 0..100 {
        if runtime.active_thread_count() == 0 {
            return;
        }
        runtime.update(1.0 / 60.0);
    }
    panic!("script did not reach quiescence within 100 frames");
}

/// S1 — set variable: Stage has `counter=0`. Script sets it to 5.
#[test]
fn s1_set_variable() {
    let specs = vec![
        BlockSpec::new("hat", "event_whenflagclicked"),
        BlockSpec::new("set", "data_setvariableto")
            .input("VALUE", RawInput::Literal(Value::Number(5.0)))
            .field(
                "VARIABLE",
                scratch_model::FieldLiteral::Variable(scratch_core::id::VariableId::from(
                    "counter",
                )),
            ),
    ];
    let (project, ids) =
        common::single_sprite_green_flag(specs, vec![("counter", Value::Number(0.0))], vec![]);

    let mut runtime = Runtime::new(project, RuntimeConfig::default()).unwrap();
    run_to_quiescence(&mut runtime);

    let value = runtime.variable_by_name(1, "counter").unwrap().value.clone();
    assert_eq!(scratch_core::to_number(&value), 5.0);
    let _ = ids;
}

/// S2 — change with coercion: `var="10"`, script changes it by 5.
/// Expect numeric 15 (invariant 5: `changeVariableBy("10", 5) == 15`).
#[test]
fn s2_change_with_coercion() {
    let specs = vec![
        BlockSpec::new("hat", "event_whenflagclicked"),
        BlockSpec::new("change", "data_changevariableby")
            .input("VALUE", RawInput::Literal(Value::Number(5.0)))
            .field(
                "VARIABLE",
                scratch_model::FieldLiteral::Variable(scratch_core::id::VariableId::from("var")),
            ),
    ];
    let (project, _ids) =
        common::single_sprite_green_flag(specs, vec![("var", Value::text("10"))], vec![]);

    let mut runtime = Runtime::new(project, RuntimeConfig::default()).unwrap();
    run_to_quiescence(&mut runtime);

    let value = runtime.variable_by_name(1, "var").unwrap().value.clone();
    assert_eq!(scratch_core::to_number(&value), 15.0);
    assert!(matches!(value, Value::Number(n) if n == 15.0));
}

/// S3 — change twice: `counter=10`, changed by 5 then by -3.
#[test]
fn s3_change_twice() {
    let var_id = scratch_core::id::VariableId::from("counter");
    let specs = vec![
        BlockSpec::new("hat", "event_whenflagclicked"),
        BlockSpec::new("inc", "data_changevariableby")
            .input("VALUE", RawInput::Literal(Value::Number(5.0)))
            .field("VARIABLE", scratch_model::FieldLiteral::Variable(var_id.clone())),
        BlockSpec::new("dec", "data_changevariableby")
            .input("VALUE", RawInput::Literal(Value::Number(-3.0)))
            .field("VARIABLE", scratch_model::FieldLiteral::Variable(var_id)),
    ];
    let (project, _ids) =
        common::single_sprite_green_flag(specs, vec![("counter", Value::Number(10.0))], vec![]);

    let mut runtime = Runtime::new(project, RuntimeConfig::default()).unwrap();
    run_to_quiescence(&mut runtime);

    let value = runtime.variable_by_name(1, "counter").unwrap().value.clone();
    assert_eq!(scratch_core::to_number(&value), 12.0);
}
