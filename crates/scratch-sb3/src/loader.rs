//! Converts the SB3 wire schema ([`crate::types`]) into
//! [`scratch_model::Project`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as Json;

use scratch_core::id::{BlockId, BroadcastId, ListId, VariableId};
use scratch_core::{LoadError, Value};
use scratch_model::{
    BlockArenaBuilder, FieldLiteral, HatKind, InputLink, ListVar, ProcMutation, ProcedureSignature,
    Project, RawBlock, RawInput, Script, Target, Variable,
};

use crate::types::{Sb3Block, Sb3Field, Sb3Input, Sb3Mutation, Sb3Project};

/// Parse SB3 JSON text and build a validated [`Project`].
pub fn load_project(json: &str) -> Result<Project, LoadError> {
    let parsed: Sb3Project =
        serde_json::from_str(json).map_err(|e| LoadError::InvalidJson(e.to_string()))?;
    build_project(parsed)
}

/// Build a [`Project`] from an already-deserialized [`Sb3Project`].
pub fn build_project(parsed: Sb3Project) -> Result<Project, LoadError> {
    let mut builder = BlockArenaBuilder::new();
    let mut broadcasts: HashMap<BroadcastId, Arc<str>> = HashMap::new();
    // (target index, block ids that are top-level in that target)
    let mut target_top_levels: Vec<Vec<BlockId>> = Vec::with_capacity(parsed.targets.len());

    for target in &parsed.targets {
        for (id, name) in &target.broadcasts {
            broadcasts.insert(BroadcastId::from(id.clone()), name.clone());
        }

        let mut top_levels = Vec::new();
        for (block_id, block) in &target.blocks {
            if block.top_level {
                top_levels.push(BlockId::from(block_id.clone()));
            }
            builder.insert(raw_block(block_id, block));
        }
        target_top_levels.push(top_levels);
    }

    let (arena, index) = builder.build()?;
    let arena = Arc::new(arena);

    let mut targets = Vec::with_capacity(parsed.targets.len());
    for (ti, sb3_target) in parsed.targets.iter().enumerate() {
        let mut variables = HashMap::with_capacity(sb3_target.variables.len());
        for (id, named) in &sb3_target.variables {
            let name = named.0.first().and_then(|v| v.as_str()).unwrap_or("");
            let value = named.0.get(1).map(json_to_value).unwrap_or_default();
            let var_id = VariableId::from(id.clone());
            variables.insert(var_id.clone(), Variable::new(var_id, name, value));
        }

        let mut lists = HashMap::with_capacity(sb3_target.lists.len());
        for (id, named) in &sb3_target.lists {
            let name = named.0.first().and_then(|v| v.as_str()).unwrap_or("");
            let items: Vec<Value> = named
                .0
                .get(1)
                .and_then(|v| v.as_array())
                .map(|arr| arr.iter().map(json_to_value).collect())
                .unwrap_or_default();
            let list_id = ListId::from(id.clone());
            lists.insert(list_id.clone(), ListVar::new(list_id, name, items));
        }

        let mut scripts = Vec::new();
        let mut procedures = HashMap::new();
        for top_id in &target_top_levels[ti] {
            let handle = *index.get(top_id).expect("top-level id was just inserted");
            let block = arena.get(handle);
            if block.opcode.as_ref() == "procedures_definition" {
                // Not itself scheduled — a custom block's body only runs
                // via `procedures_call`. Indexed by proccode instead.
                if let Some((code, sig)) = procedure_signature(&arena, block) {
                    procedures.insert(code, sig);
                }
                continue;
            }
            if let Some(hat) = classify_hat(&block.opcode, block) {
                scripts.push(Script {
                    top_block: handle,
                    hat,
                });
            }
            // Opcodes that are top-level but not a recognized hat (rare,
            // malformed projects aside) are simply not scheduled — this
            // is the UnknownOpcode policy applied at the script-collection
            // level rather than the per-primitive level.
        }

        let mut t = Target::new(
            sb3_target.name.clone(),
            sb3_target.is_stage,
            variables,
            lists,
            Arc::from(scripts),
            sb3_target.costumes.len() as u32,
        );
        t.current_costume = sb3_target.current_costume;
        t.volume = sb3_target.volume;
        t.procedures = procedures;
        targets.push(t);
    }

    let stage_index = Project::validate(&targets)?;

    Ok(Project {
        arena,
        targets,
        stage_index,
        broadcasts,
    })
}

fn raw_block(id: &str, block: &Sb3Block) -> RawBlock {
    let mut inputs = HashMap::with_capacity(block.inputs.len());
    let mut fields = HashMap::with_capacity(block.fields.len() + 1);

    for (name, input) in &block.inputs {
        // `event_broadcast{,andwait}` encode their target as an inline
        // input literal (`[11, name, id]`) rather than a field, unlike
        // the hat's `BROADCAST_OPTION`. Route the literal case into
        // `fields` so every broadcast-target opcode reads it the same
        // way; a reporter-driven (dynamic) broadcast target input falls
        // through to the normal input path and is resolved as plain text
        // at call time instead (dynamic broadcast names are not resolved
        // to an id — Non-goal: Scratch's own editor rarely produces one).
        if name.as_ref() == "BROADCAST_INPUT" {
            if let Some(lit) = broadcast_field_literal(input) {
                fields.insert(name.clone(), lit);
                continue;
            }
        }
        inputs.insert(name.clone(), parse_input(name, input));
    }

    for (name, field) in &block.fields {
        fields.insert(name.clone(), classify_field(name, field));
    }

    RawBlock {
        source_id: BlockId::from(id),
        opcode: block.opcode.clone(),
        inputs,
        fields,
        next: block.next.as_ref().map(|n| BlockId::from(n.clone())),
        parent: block.parent.as_ref().map(|p| BlockId::from(p.clone())),
        top_level: block.top_level,
        shadow: block.shadow,
        mutation: block.mutation.as_ref().map(parse_mutation),
    }
}

/// Parse one `[status, primary, shadow?]` input slot.
///
/// `primary` is resolved first; if it is `null` (e.g. only a shadow
/// default is present, normal input form not yet filled in) the shadow
/// slot is used instead. Substack inputs are recognized by SB3's naming
/// convention (`SUBSTACK`, `SUBSTACK2`) — the wire format otherwise gives
/// no structural signal distinguishing a statement-stack reference from
/// a reporter reference.
fn parse_input(name: &str, input: &Sb3Input) -> RawInput {
    let slot = input
        .0
        .get(1)
        .filter(|v| !v.is_null())
        .or_else(|| input.0.get(2))
        .cloned()
        .unwrap_or(Json::Null);

    match slot {
        Json::Null => RawInput::Empty,
        Json::String(block_id) => {
            if name.starts_with("SUBSTACK") {
                RawInput::Substack(BlockId::from(block_id))
            } else {
                RawInput::Reporter(BlockId::from(block_id))
            }
        }
        Json::Array(arr) => RawInput::Literal(parse_inline_literal(&arr)),
        other => RawInput::Literal(json_to_value(&other)),
    }
}

/// Decode an inline shadow literal `[type, value, broadcastId?]`.
///
/// `type` follows the Sb3InlineBlockType encoding used by the Scratch
/// editor (4=Number .. 13=List); see the retrieved scratch-vm reference.
/// Variable/List inline shadows (12/13) are rare in practice (dragging a
/// reporter always produces a real reporter block, not an inline shadow)
/// and are approximated here as their display-name text.
pub fn parse_inline_literal(arr: &[Json]) -> Value {
    let type_num = arr.first().and_then(|v| v.as_u64()).unwrap_or(10);
    let raw = arr.get(1);
    match type_num {
        4..=9 => {
            let text = raw
                .and_then(|v| v.as_str().map(str::to_string))
                .or_else(|| raw.and_then(|v| v.as_f64()).map(|f| f.to_string()))
                .unwrap_or_default();
            Value::Number(scratch_core::to_number(&Value::text(text)))
        }
        _ => Value::text(raw.and_then(|v| v.as_str()).unwrap_or("")),
    }
}

/// Extract a broadcast-target field literal from an inline `[11, name, id]`
/// input slot. Returns `None` for a reporter (block-id string) slot or an
/// unrecognized shape.
fn broadcast_field_literal(input: &Sb3Input) -> Option<FieldLiteral> {
    let slot = input
        .0
        .get(1)
        .filter(|v| !v.is_null())
        .or_else(|| input.0.get(2))?;
    let arr = slot.as_array()?;
    let id = arr.get(2).and_then(|v| v.as_str())?;
    Some(FieldLiteral::Broadcast(BroadcastId::from(id)))
}

fn classify_field(name: &str, field: &Sb3Field) -> FieldLiteral {
    match name {
        "VARIABLE" => FieldLiteral::Variable(VariableId::from(
            field.id_str().unwrap_or_else(|| field.value_str()),
        )),
        "LIST" => FieldLiteral::List(ListId::from(
            field.id_str().unwrap_or_else(|| field.value_str()),
        )),
        "BROADCAST_OPTION" | "BROADCAST_INPUT" => FieldLiteral::Broadcast(BroadcastId::from(
            field.id_str().unwrap_or_else(|| field.value_str()),
        )),
        _ => FieldLiteral::Text(Arc::from(field.value_str())),
    }
}

fn classify_hat(opcode: &str, block: &scratch_model::Block) -> Option<HatKind> {
    match opcode {
        "event_whenflagclicked" => Some(HatKind::GreenFlag),
        "event_whenbroadcastreceived" => block
            .field("BROADCAST_OPTION")
            .and_then(|f| match f {
                FieldLiteral::Broadcast(id) => Some(id.clone()),
                _ => None,
            })
            .map(HatKind::BroadcastReceived),
        "event_whenkeypressed" => block
            .field("KEY_OPTION")
            .and_then(FieldLiteral::as_text)
            .map(|k| HatKind::KeyPressed(scratch_model::keys::normalize(k))),
        "event_whenthisspriteclicked" => Some(HatKind::SpriteClicked),
        "control_start_as_clone" => Some(HatKind::CloneStart),
        "event_whenbackdropswitchesto" => block
            .field("BACKDROP")
            .and_then(FieldLiteral::as_text)
            .map(|b| HatKind::BackdropSwitches(Arc::from(b))),
        "event_whengreaterthan" => Some(HatKind::GreaterThan),
        other => {
            log::warn!("unrecognized top-level opcode '{other}', script will never be scheduled");
            None
        }
    }
}

/// Build a custom block's [`ProcedureSignature`] from its
/// `procedures_definition` hat: resolve the `custom_block` input to the
/// `procedures_prototype` block for the mutation, then resolve each of
/// its argument-id inputs to the `argument_reporter_*` shadow's `VALUE`
/// field for the parameter's display name.
fn procedure_signature(
    arena: &scratch_model::BlockArena,
    definition: &scratch_model::Block,
) -> Option<(scratch_core::id::ProcCode, ProcedureSignature)> {
    let prototype_handle = match definition.input("custom_block") {
        InputLink::Reporter(h) => *h,
        _ => {
            log::warn!("procedures_definition with no custom_block prototype, skipping");
            return None;
        }
    };
    let prototype = arena.get(prototype_handle);
    let mutation = prototype.mutation.as_ref()?;

    let arg_names = mutation
        .argument_ids
        .iter()
        .map(|arg_id| argument_name(arena, prototype, arg_id))
        .collect();

    Some((
        mutation.proc_code.clone(),
        ProcedureSignature {
            body: definition.next,
            arg_names,
        },
    ))
}

fn argument_name(
    arena: &scratch_model::BlockArena,
    prototype: &scratch_model::Block,
    arg_id: &str,
) -> Arc<str> {
    match prototype.input(arg_id) {
        InputLink::Reporter(h) => arena
            .get(*h)
            .field("VALUE")
            .and_then(FieldLiteral::as_text)
            .map(Arc::from)
            .unwrap_or_else(|| Arc::from(arg_id)),
        _ => Arc::from(arg_id),
    }
}

fn parse_mutation(m: &Sb3Mutation) -> ProcMutation {
    let argument_ids = m
        .argument_ids
        .as_ref()
        .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
        .into_iter()
        .map(|s| Arc::from(s.as_str()))
        .collect();

    let warp = match &m.warp {
        Some(Json::Bool(b)) => *b,
        Some(Json::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    };

    ProcMutation {
        proc_code: m.proc_code.clone().into(),
        argument_ids,
        warp,
    }
}

fn json_to_value(v: &Json) -> Value {
    match v {
        Json::String(s) => Value::text(s.as_str()),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
        Json::Bool(b) => Value::Bool(*b),
        Json::Null => Value::default(),
        other => Value::text(other.to_string()),
    }
}
