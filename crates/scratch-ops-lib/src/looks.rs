//! `looks_*`: costume index, size, visibility, and say/think text — all
//! pure scalar state on [`scratch_model::Target`]. Costume contents
//! (names, images) are opaque (Non-goal: asset decoding), so lookups by
//! costume name fall back to a logged no-op rather than failing the
//! script.

use scratch_core::{to_number, to_text, Value};
use scratch_ops::{field_text, BlockContext, Flow, OpTable};

/// Register every `looks_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    table.register("looks_costume", |_ctx, b| {
        Ok(Flow::Value(Value::text(field_text(b, "COSTUME"))))
    });

    table.register("looks_show", |ctx, _b| {
        ctx.target_mut().visible = true;
        Ok(Flow::Next)
    });
    table.register("looks_hide", |ctx, _b| {
        ctx.target_mut().visible = false;
        Ok(Flow::Next)
    });

    table.register("looks_switchcostumeto", |ctx, b| {
        let name = to_text(&ctx.eval_input(b, "COSTUME")?);
        let count = ctx.target().costume_count;
        if count == 0 {
            return Ok(Flow::Next);
        }
        if let Ok(n) = name.parse::<i64>() {
            let idx = (n - 1).rem_euclid(count as i64) as u32;
            ctx.target_mut().current_costume = idx;
        } else {
            log::debug!("looks_switchcostumeto: costume name '{name}' not resolvable, no asset table");
        }
        Ok(Flow::Next)
    });

    table.register("looks_nextcostume", |ctx, _b| {
        let t = ctx.target_mut();
        if t.costume_count > 0 {
            t.current_costume = (t.current_costume + 1) % t.costume_count;
        }
        Ok(Flow::Next)
    });

    table.register("looks_costumenumbername", |ctx, b| {
        if field_text(b, "NUMBER_NAME") == "name" {
            log::debug!("looks_costumenumbername: no costume-name table, reporting index instead");
        }
        Ok(Flow::Value(Value::Number(
            (ctx.target().current_costume + 1) as f64,
        )))
    });

    table.register("looks_say", |ctx, b| {
        let msg = to_text(&ctx.eval_input(b, "MESSAGE")?);
        ctx.target_mut().say_text = Some(msg);
        Ok(Flow::Next)
    });
    table.register("looks_think", |ctx, b| {
        let msg = to_text(&ctx.eval_input(b, "MESSAGE")?);
        ctx.target_mut().say_text = Some(msg);
        Ok(Flow::Next)
    });

    table.register("looks_size", |ctx, _b| {
        Ok(Flow::Value(Value::Number(ctx.target().size)))
    });
    table.register("looks_changesizeby", |ctx, b| {
        let delta = to_number(&ctx.eval_input(b, "CHANGE")?);
        ctx.target_mut().size += delta;
        Ok(Flow::Next)
    });
    table.register("looks_setsizeto", |ctx, b| {
        let size = to_number(&ctx.eval_input(b, "SIZE")?);
        ctx.target_mut().size = size;
        Ok(Flow::Next)
    });
}
