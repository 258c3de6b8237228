//! `data_*`: scalar variables and lists.
//!
//! Lists are 1-indexed externally and accept the keyword indices
//! `"last"`, `"random"`, and `"any"` (the latter two both mean "pick a
//! random element") in addition to a numeric string. [`resolve_index`]
//! is the single place that translates any of those into a 0-indexed
//! `Vec` position.

use rand::Rng;

use scratch_core::id::{ListId, VariableId};
use scratch_core::{to_number, to_text, BlockError, Value};
use scratch_model::{Block, FieldLiteral};
use scratch_ops::{BlockContext, Flow, OpTable};

fn variable_id(block: &Block) -> Option<VariableId> {
    match block.field("VARIABLE") {
        Some(FieldLiteral::Variable(id)) => Some(id.clone()),
        _ => None,
    }
}

fn list_id(block: &Block) -> Option<ListId> {
    match block.field("LIST") {
        Some(FieldLiteral::List(id)) => Some(id.clone()),
        _ => None,
    }
}

/// Resolve a 1-indexed/keyword list index to a 0-indexed `Vec` position.
/// Returns `None` for an out-of-range or unparseable index, or for an
/// empty list (no valid index exists).
pub fn resolve_index(ctx: &mut BlockContext<'_>, index: &Value, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let text = to_text(index);
    match text.as_ref() {
        "last" => Some(len - 1),
        "random" | "any" => Some(ctx.rng().gen_range(0..len)),
        _ => {
            let n = to_number(index);
            if n.fract() != 0.0 || n < 1.0 {
                return None;
            }
            let i = n as usize;
            if i > len {
                None
            } else {
                Some(i - 1)
            }
        }
    }
}

/// Register every `data_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    table.register("data_variable", |ctx, b| {
        let id = variable_id(b).ok_or_else(|| BlockError::failed("data_variable missing VARIABLE field"))?;
        let value = ctx.variable(&id).cloned().unwrap_or_default();
        Ok(Flow::Value(value))
    });

    table.register("data_setvariableto", |ctx, b| {
        let id = variable_id(b).ok_or_else(|| BlockError::failed("data_setvariableto missing VARIABLE field"))?;
        let value = ctx.eval_input(b, "VALUE")?;
        if let Some(slot) = ctx.variable_mut(&id) {
            *slot = value;
        }
        Ok(Flow::Next)
    });

    table.register("data_changevariableby", |ctx, b| {
        let id = variable_id(b).ok_or_else(|| BlockError::failed("data_changevariableby missing VARIABLE field"))?;
        let delta = to_number(&ctx.eval_input(b, "VALUE")?);
        if let Some(slot) = ctx.variable_mut(&id) {
            let current = to_number(slot);
            // NaN never accumulates into a stored variable (the one place
            // `to_number`'s NaN-passthrough is deliberately overridden).
            *slot = Value::Number(if current.is_nan() { delta } else { current + delta });
        }
        Ok(Flow::Next)
    });

    // Monitor visibility is a stage-UI concern with no effect on
    // execution semantics (Non-goal: rendering); accepted as a no-op so
    // projects that use them still load and run.
    table.register("data_showvariable", |_ctx, _b| Ok(Flow::Next));
    table.register("data_hidevariable", |_ctx, _b| Ok(Flow::Next));

    table.register("data_addtolist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_addtolist missing LIST field"))?;
        let item = ctx.eval_input(b, "ITEM")?;
        if let Some(items) = ctx.list_mut(&id) {
            items.push(item);
        }
        Ok(Flow::Next)
    });

    table.register("data_deleteoflist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_deleteoflist missing LIST field"))?;
        let index_value = ctx.eval_input(b, "INDEX")?;
        let len = ctx.list(&id).map(|l| l.len()).unwrap_or(0);
        if let Some(i) = resolve_index(ctx, &index_value, len) {
            if let Some(items) = ctx.list_mut(&id) {
                items.remove(i);
            }
        }
        Ok(Flow::Next)
    });

    table.register("data_deletealloflist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_deletealloflist missing LIST field"))?;
        if let Some(items) = ctx.list_mut(&id) {
            items.clear();
        }
        Ok(Flow::Next)
    });

    table.register("data_insertatlist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_insertatlist missing LIST field"))?;
        let item = ctx.eval_input(b, "ITEM")?;
        let index_value = ctx.eval_input(b, "INDEX")?;
        let len = ctx.list(&id).map(|l| l.len()).unwrap_or(0);
        // Insertion allows one past the end (appending), unlike replace/
        // delete/item-lookup which require an existing slot.
        let n = to_number(&index_value);
        let i = if to_text(&index_value).as_ref() == "last" {
            len
        } else if n.fract() == 0.0 && n >= 1.0 && (n as usize) <= len + 1 {
            n as usize - 1
        } else {
            return Ok(Flow::Next);
        };
        if let Some(items) = ctx.list_mut(&id) {
            items.insert(i, item);
        }
        Ok(Flow::Next)
    });

    table.register("data_replaceitemoflist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_replaceitemoflist missing LIST field"))?;
        let index_value = ctx.eval_input(b, "INDEX")?;
        let item = ctx.eval_input(b, "ITEM")?;
        let len = ctx.list(&id).map(|l| l.len()).unwrap_or(0);
        if let Some(i) = resolve_index(ctx, &index_value, len) {
            if let Some(items) = ctx.list_mut(&id) {
                items[i] = item;
            }
        }
        Ok(Flow::Next)
    });

    table.register("data_itemoflist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_itemoflist missing LIST field"))?;
        let index_value = ctx.eval_input(b, "INDEX")?;
        let len = ctx.list(&id).map(|l| l.len()).unwrap_or(0);
        let value = match resolve_index(ctx, &index_value, len) {
            Some(i) => ctx.list(&id).map(|l| l[i].clone()).unwrap_or_default(),
            None => Value::default(),
        };
        Ok(Flow::Value(value))
    });

    table.register("data_itemnumoflist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_itemnumoflist missing LIST field"))?;
        let needle = ctx.eval_input(b, "ITEM")?;
        let pos = ctx
            .list(&id)
            .and_then(|items| items.iter().position(|v| scratch_core::equals(v, &needle)))
            .map(|i| (i + 1) as f64)
            .unwrap_or(0.0);
        Ok(Flow::Value(Value::Number(pos)))
    });

    table.register("data_lengthoflist", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_lengthoflist missing LIST field"))?;
        let len = ctx.list(&id).map(|l| l.len()).unwrap_or(0);
        Ok(Flow::Value(Value::Number(len as f64)))
    });

    table.register("data_listcontainsitem", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_listcontainsitem missing LIST field"))?;
        let needle = ctx.eval_input(b, "ITEM")?;
        let found = ctx
            .list(&id)
            .map(|items| items.iter().any(|v| scratch_core::equals(v, &needle)))
            .unwrap_or(false);
        Ok(Flow::Value(Value::Bool(found)))
    });

    table.register("data_listcontents", |ctx, b| {
        let id = list_id(b).ok_or_else(|| BlockError::failed("data_listcontents missing LIST field"))?;
        let joined = ctx
            .list(&id)
            .map(|items| {
                // Scratch joins with no separator when every item is a
                // single character, else with a space — matches the
                // stage-monitor rendering rule for list contents.
                let texts: Vec<_> = items.iter().map(to_text).collect();
                if texts.iter().all(|t| t.chars().count() <= 1) {
                    texts.concat()
                } else {
                    texts
                        .iter()
                        .map(|t| t.as_ref())
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            })
            .unwrap_or_default();
        Ok(Flow::Value(Value::text(joined)))
    });
}
