//! Hand-built `Project` fixtures for end-to-end scenario tests.
//!
//! Scripts are assembled directly through `BlockArenaBuilder` rather than
//! through SB3 JSON text, the way `scratch-thread`'s own scheduler tests
//! build their fixtures — it keeps each scenario's block graph legible
//! without a JSON fixture file alongside it.

use std::collections::HashMap;
use std::sync::Arc;

use scratch_core::id::{BlockId, ListId, VariableId};
use scratch_core::Value;
use scratch_model::{
    BlockArenaBuilder, FieldLiteral, HatKind, ListVar, Project, RawBlock, RawInput, Script,
    Target, Variable,
};

/// One statement or hat block to be chained into a script, in source
/// order. `id` must be unique within the whole fixture.
pub struct BlockSpec {
    pub id: &'static str,
    pub opcode: &'static str,
    pub inputs: Vec<(&'static str, RawInput)>,
    pub fields: Vec<(&'static str, FieldLiteral)>,
}

impl BlockSpec {
    pub fn new(id: &'static str, opcode: &'static str) -> Self {
        Self {
            id,
            opcode,
            inputs: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn input(mut self, name: &'static str, input: RawInput) -> Self {
        self.inputs.push((name, input));
        self
    }

    pub fn field(mut self, name: &'static str, field: FieldLiteral) -> Self {
        self.fields.push((name, field));
        self
    }
}

/// Chain `specs` in order (each block's `next` points at the following
/// one) and insert them into `builder`. The first spec is assumed to be
/// the hat; returns its [`scratch_model::BlockHandle`] once the arena is
/// built, recovered by the caller via the returned id map.
pub fn chain(builder: &mut BlockArenaBuilder, specs: Vec<BlockSpec>) {
    let ids: Vec<BlockId> = specs.iter().map(|s| BlockId::from(s.id)).collect();
    for (i, spec) in specs.into_iter().enumerate() {
        let mut inputs = HashMap::new();
        for (name, input) in spec.inputs {
            inputs.insert(Arc::from(name), input);
        }
        let mut fields = HashMap::new();
        for (name, field) in spec.fields {
            fields.insert(Arc::from(name), field);
        }
        builder.insert(RawBlock {
            source_id: ids[i].clone(),
            opcode: Arc::from(spec.opcode),
            inputs,
            fields,
            next: ids.get(i + 1).cloned(),
            parent: None,
            top_level: i == 0,
            shadow: false,
            mutation: None,
        });
    }
}

/// A one-sprite, one-Stage project with a single green-flag script built
/// from `specs` (the first spec's opcode should be `event_whenflagclicked`),
/// the given scalar variables, and the given lists, all owned by the
/// sprite.
pub fn single_sprite_green_flag(
    specs: Vec<BlockSpec>,
    variables: Vec<(&str, Value)>,
    lists: Vec<(&str, Vec<Value>)>,
) -> (Project, VariableIds) {
    let mut builder = BlockArenaBuilder::new();
    let hat_id = BlockId::from(specs[0].id);
    chain(&mut builder, specs);
    let (arena, index) = builder.build().expect("hand-built fixture is well-formed");
    let arena = Arc::new(arena);
    let hat_handle = index[&hat_id];

    let mut var_map = HashMap::new();
    let mut var_ids = HashMap::new();
    for (name, seed) in variables {
        let id = VariableId::from(name);
        var_map.insert(id.clone(), Variable::new(id.clone(), name, seed));
        var_ids.insert(name.to_string(), id);
    }

    let mut list_map = HashMap::new();
    let mut list_ids = HashMap::new();
    for (name, items) in lists {
        let id = ListId::from(name);
        list_map.insert(id.clone(), ListVar::new(id.clone(), name, items));
        list_ids.insert(name.to_string(), id);
    }

    let scripts: Arc<[Script]> = Arc::from(vec![Script {
        top_block: hat_handle,
        hat: HatKind::GreenFlag,
    }]);
    let sprite = Target::new("Sprite1", false, var_map, list_map, scripts, 1);
    let stage = Target::new("Stage", true, HashMap::new(), HashMap::new(), Arc::from([]), 1);

    let project = Project {
        arena,
        targets: vec![stage, sprite],
        stage_index: 0,
        broadcasts: HashMap::new(),
    };

    (project, VariableIds { vars: var_ids, lists: list_ids })
}

/// Name → id lookup for the variables/lists a fixture created, so test
/// bodies can read results back by the same name they wrote the fixture
/// with.
pub struct VariableIds {
    vars: HashMap<String, VariableId>,
    lists: HashMap<String, ListId>,
}

impl VariableIds {
    pub fn var(&self, name: &str) -> &VariableId {
        &self.vars[name]
    }

    pub fn list(&self, name: &str) -> &ListId {
        &self.lists[name]
    }
}

/// Build a multi-target fixture: several sprites (and the Stage) sharing
/// one arena, each with its own scripts/variables, for scenarios that
/// need more than one target (active-keys collection across targets,
/// broadcast fan-out).
pub fn multi_target_project(
    stage_scripts: Vec<Script>,
    sprites: Vec<(&str, Vec<Script>)>,
    arena: scratch_model::BlockArena,
) -> Project {
    let arena = Arc::new(arena);
    let stage = Target::new(
        "Stage",
        true,
        HashMap::new(),
        HashMap::new(),
        Arc::from(stage_scripts),
        1,
    );
    let mut targets = vec![stage];
    for (name, scripts) in sprites {
        targets.push(Target::new(
            name,
            false,
            HashMap::new(),
            HashMap::new(),
            Arc::from(scripts),
            1,
        ));
    }
    Project {
        arena,
        targets,
        stage_index: 0,
        broadcasts: HashMap::new(),
    }
}
