//! `sensing_*`: keyboard, mouse, timer, and target distance.
//!
//! `sensing_of` is a deliberate stub (see its registration below): a
//! faithful implementation would need to read arbitrary properties of
//! arbitrary targets by name, a scope the interpreter's pixel/render-free
//! design doesn't otherwise require.

use scratch_core::{to_text, BlockError, Value};
use scratch_ops::{field_text, BlockContext, Flow, OpTable};

/// Register every `sensing_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    // Menu shadow blocks resolve to their own field's literal text.
    table.register("sensing_keyoptions", |_ctx, b| {
        Ok(Flow::Value(Value::text(field_text(b, "KEY_OPTION"))))
    });
    table.register("sensing_distancetomenu", |_ctx, b| {
        Ok(Flow::Value(Value::text(field_text(b, "DISTANCETOMENU"))))
    });
    table.register("sensing_of_object_menu", |_ctx, b| {
        Ok(Flow::Value(Value::text(field_text(b, "OBJECT"))))
    });

    table.register("sensing_keypressed", |ctx, b| {
        let raw = to_text(&ctx.eval_input(b, "KEY_OPTION")?);
        let key = scratch_model::keys::normalize(&raw);
        // A non-shadow KEY_OPTION means the user snapped in a reporter in
        // place of the constant dropdown — the key name isn't known until
        // this evaluation, so it's registered dynamically for this frame.
        if let scratch_model::InputLink::Reporter(h) = b.input("KEY_OPTION") {
            if !ctx.block(*h).shadow {
                ctx.register_dynamic_key(key.clone());
            }
        }
        Ok(Flow::Value(Value::Bool(ctx.host().is_key_down(&key))))
    });

    table.register("sensing_timer", |ctx, _b| {
        Ok(Flow::Value(Value::Number(ctx.host().timer())))
    });

    // The clock itself is host-owned state (the runtime's frame loop
    // advances it by `dt` every frame); resetting it takes effect
    // immediately through `HostState`'s interior mutability rather than
    // going through `BlockContext`'s exclusive-borrow target/list access.
    table.register("sensing_resettimer", |ctx, _b| {
        ctx.host().reset_timer();
        Ok(Flow::Next)
    });

    table.register("sensing_mousex", |ctx, _b| {
        Ok(Flow::Value(Value::Number(ctx.host().mouse_x)))
    });
    table.register("sensing_mousey", |ctx, _b| {
        Ok(Flow::Value(Value::Number(ctx.host().mouse_y)))
    });
    table.register("sensing_mousedown", |ctx, _b| {
        Ok(Flow::Value(Value::Bool(ctx.host().mouse_down)))
    });

    table.register("sensing_distanceto", |ctx, b| {
        let target_name = to_text(&ctx.eval_input(b, "DISTANCETOMENU")?);
        let (tx, ty) = if target_name.as_ref() == "_mouse_" {
            (ctx.host().mouse_x, ctx.host().mouse_y)
        } else {
            ctx.targets()
                .iter()
                .find(|t| t.name.as_ref() == target_name.as_ref())
                .map(|t| (t.x, t.y))
                .unwrap_or((0.0, 0.0))
        };
        let (sx, sy) = (ctx.target().x, ctx.target().y);
        let dist = ((tx - sx).powi(2) + (ty - sy).powi(2)).sqrt();
        Ok(Flow::Value(Value::Number(dist)))
    });

    // Stub: arbitrary cross-target property lookup is out of scope.
    // Always reports the empty string, matching Scratch's own fallback
    // for an unrecognized OBJECT/PROPERTY combination.
    table.register("sensing_of", |_ctx, _b| -> Result<Flow, BlockError> {
        log::debug!("sensing_of is a stub and always reports the empty string");
        Ok(Flow::Value(Value::default()))
    });
}
