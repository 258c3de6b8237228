//! S6-S7 from the spec's end-to-end scenarios, plus invariants 3 and 4:
//! the static active-keys set is built once at `initialize`, and
//! `broadcastKey` is a no-op unless the key is in static ∪ dynamic.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::id::BlockId;
use scratch_core::Value;
use scratch_engine::{Runtime, RuntimeConfig};
use scratch_model::{
    BlockArenaBuilder, FieldLiteral, HatKind, RawBlock, RawInput, Script, Target, Variable,
};

/// A single `event_whenkeypressed(key) → change spaceCount by 1` script
/// on its own sprite, returning the project and the count variable's id.
fn project_with_key_hats(keys: &[(&str, &str)]) -> (scratch_model::Project, Vec<BlockId>) {
    let mut builder = BlockArenaBuilder::new();
    let mut hat_ids = Vec::new();
    for (sprite_name, _) in keys {
        let hat_id = BlockId::from(format!("hat_{sprite_name}"));
        let inc_id = BlockId::from(format!("inc_{sprite_name}"));
        builder.insert(RawBlock {
            source_id: inc_id.clone(),
            opcode: Arc::from("data_changevariableby"),
            inputs: HashMap::from([(Arc::from("VALUE"), RawInput::Literal(Value::Number(1.0)))]),
            fields: HashMap::from([(
                Arc::from("VARIABLE"),
                FieldLiteral::Variable(scratch_core::id::VariableId::from("count")),
            )]),
            next: None,
            parent: Some(hat_id.clone()),
            top_level: false,
            shadow: false,
            mutation: None,
        });
        builder.insert(RawBlock {
            source_id: hat_id.clone(),
            opcode: Arc::from("event_whenkeypressed"),
            inputs: HashMap::new(),
            fields: HashMap::new(),
            next: Some(inc_id),
            parent: None,
            top_level: true,
            shadow: false,
            mutation: None,
        });
        hat_ids.push(hat_id);
    }

    let (arena, index) = builder.build().expect("hand-built fixture is well-formed");
    let arena = Arc::new(arena);

    let mut targets = vec![Target::new("Stage", true, HashMap::new(), HashMap::new(), Arc::from([]), 1)];
    for ((sprite_name, key), hat_id) in keys.iter().zip(&hat_ids) {
        let hat_handle = index[hat_id];
        let count_id = scratch_core::id::VariableId::from("count");
        let variables = HashMap::from([(
            count_id.clone(),
            Variable::new(count_id, "count", Value::Number(0.0)),
        )]);
        let scripts: Arc<[Script]> = Arc::from(vec![Script {
            top_block: hat_handle,
            hat: HatKind::KeyPressed(scratch_model::keys::normalize(key)),
        }]);
        targets.push(Target::new(*sprite_name, false, variables, HashMap::new(), scripts, 1));
    }

    let project = scratch_model::Project {
        arena,
        targets,
        stage_index: 0,
        broadcasts: HashMap::new(),
    };
    (project, hat_ids)
}

/// S6 — static key collection: Stage `whenKeyPressed("space")`, Sprite1
/// `whenKeyPressed("a")`, Sprite2 `whenKeyPressed("up arrow")`.
#[test]
fn s6_static_key_collection() {
    let (project, _) = project_with_key_hats(&[
        ("Stage", "space"),
        ("Sprite1", "a"),
        ("Sprite2", "up arrow"),
    ]);
    let runtime = Runtime::new(project, RuntimeConfig::default()).unwrap();

    let keys = runtime.static_active_keys();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&Arc::<str>::from("space")));
    assert!(keys.contains(&Arc::<str>::from("A")));
    assert!(keys.contains(&Arc::<str>::from("up arrow")));
}

/// Invariant 3: `initialize()` adds nothing to the static set beyond the
/// hats actually present.
#[test]
fn invariant3_initialize_adds_only_hat_keys() {
    let (project, _) = project_with_key_hats(&[("Sprite1", "x")]);
    let runtime = Runtime::new(project, RuntimeConfig::default()).unwrap();
    let keys = runtime.static_active_keys();
    assert_eq!(keys.len(), 1);
    assert!(keys.contains(&Arc::<str>::from("X")));
}

/// S7 / invariant 4 — key dispatch optimization: the only hat is
/// `whenKeyPressed("space")`. `broadcastKey("A")` must not start a
/// thread; `broadcastKey("space")` must.
#[test]
fn s7_key_dispatch_optimization() {
    let (project, _) = project_with_key_hats(&[("Sprite1", "space")]);
    let mut runtime = Runtime::new(project, RuntimeConfig::default()).unwrap();

    runtime.broadcast_key("A");
    assert_eq!(runtime.active_thread_count(), 0);
    let count = runtime.variable_by_name(1, "count").unwrap().value.clone();
    assert_eq!(scratch_core::to_number(&count), 0.0);

    runtime.broadcast_key("space");
    assert_eq!(runtime.active_thread_count(), 1);
    runtime.update(1.0 / 60.0);

    let count = runtime.variable_by_name(1, "count").unwrap().value.clone();
    assert_eq!(scratch_core::to_number(&count), 1.0);
}
