//! `motion_*`: pose as pure numeric scalars on [`scratch_model::Target`],
//! never wired to a renderer (Non-goal: pixel-accurate rendering).

use scratch_core::{to_number, Value};
use scratch_ops::{BlockContext, Flow, OpTable};

/// Register every `motion_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    table.register("motion_movesteps", |ctx, b| {
        let steps = to_number(&ctx.eval_input(b, "STEPS")?);
        let rad = ctx.target().direction.to_radians();
        // Scratch's heading convention: 0 is up, clockwise.
        let (dx, dy) = (rad.sin() * steps, rad.cos() * steps);
        let t = ctx.target_mut();
        t.x += dx;
        t.y += dy;
        Ok(Flow::Next)
    });

    table.register("motion_gotoxy", |ctx, b| {
        let x = to_number(&ctx.eval_input(b, "X")?);
        let y = to_number(&ctx.eval_input(b, "Y")?);
        let t = ctx.target_mut();
        t.x = x;
        t.y = y;
        Ok(Flow::Next)
    });

    table.register("motion_changexby", |ctx, b| {
        let dx = to_number(&ctx.eval_input(b, "DX")?);
        ctx.target_mut().x += dx;
        Ok(Flow::Next)
    });

    table.register("motion_changeyby", |ctx, b| {
        let dy = to_number(&ctx.eval_input(b, "DY")?);
        ctx.target_mut().y += dy;
        Ok(Flow::Next)
    });

    table.register("motion_setx", |ctx, b| {
        let x = to_number(&ctx.eval_input(b, "X")?);
        ctx.target_mut().x = x;
        Ok(Flow::Next)
    });

    table.register("motion_sety", |ctx, b| {
        let y = to_number(&ctx.eval_input(b, "Y")?);
        ctx.target_mut().y = y;
        Ok(Flow::Next)
    });

    table.register("motion_xposition", |ctx, _b| {
        Ok(Flow::Value(Value::Number(ctx.target().x)))
    });
    table.register("motion_yposition", |ctx, _b| {
        Ok(Flow::Value(Value::Number(ctx.target().y)))
    });
    table.register("motion_direction", |ctx, _b| {
        Ok(Flow::Value(Value::Number(ctx.target().direction)))
    });

    table.register("motion_pointindirection", |ctx, b| {
        let dir = to_number(&ctx.eval_input(b, "DIRECTION")?);
        ctx.target_mut().direction = normalize_direction(dir);
        Ok(Flow::Next)
    });

    table.register("motion_turnright", |ctx, b| {
        let delta = to_number(&ctx.eval_input(b, "DEGREES")?);
        let t = ctx.target_mut();
        t.direction = normalize_direction(t.direction + delta);
        Ok(Flow::Next)
    });

    table.register("motion_turnleft", |ctx, b| {
        let delta = to_number(&ctx.eval_input(b, "DEGREES")?);
        let t = ctx.target_mut();
        t.direction = normalize_direction(t.direction - delta);
        Ok(Flow::Next)
    });
}

/// Wrap a heading into Scratch's `(-180, 180]` range.
fn normalize_direction(deg: f64) -> f64 {
    let wrapped = ((deg + 180.0).rem_euclid(360.0)) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_direction;

    #[test]
    fn normalize_direction_wraps_into_range() {
        assert_eq!(normalize_direction(180.0), 180.0);
        assert_eq!(normalize_direction(270.0), -90.0);
        assert_eq!(normalize_direction(-270.0), 90.0);
        assert_eq!(normalize_direction(0.0), 0.0);
    }
}
