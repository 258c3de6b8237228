//! `control_*`: branching, looping, waiting, stopping, and cloning.
//!
//! Loop primitives are called exactly once per loop *entry*, not once per
//! iteration — they hand `scratch-thread` the body handle (and, for
//! `repeat`, the iteration count or, for `repeat until`, the condition
//! handle to re-check) and the thread's frame stack owns the iteration
//! from there. See [`scratch_ops::Flow`].

use scratch_core::{to_bool, to_number, to_text, BlockError};
use scratch_model::Block;
use scratch_ops::{field_text, BlockContext, Flow, OpTable};

/// Register every `control_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    // Menu shadow block: resolves to its own field's literal text.
    table.register("control_create_clone_of_menu", |_ctx, b| {
        Ok(Flow::Value(scratch_core::Value::text(field_text(
            b,
            "CLONE_OPTION",
        ))))
    });

    table.register("control_if", |ctx, b| {
        let cond = to_bool(&ctx.eval_input(b, "CONDITION")?);
        let body = ctx.substack(b, "SUBSTACK");
        Ok(Flow::Branch(if cond { body } else { None }))
    });

    table.register("control_if_else", |ctx, b| {
        let cond = to_bool(&ctx.eval_input(b, "CONDITION")?);
        let body = if cond {
            ctx.substack(b, "SUBSTACK")
        } else {
            ctx.substack(b, "SUBSTACK2")
        };
        Ok(Flow::Branch(body))
    });

    table.register("control_repeat", |ctx, b| {
        let count = to_number(&ctx.eval_input(b, "TIMES")?).floor().max(0.0) as i64;
        let body = ctx.substack(b, "SUBSTACK").ok_or_else(empty_body)?;
        Ok(Flow::RepeatTimes { body, count })
    });

    table.register("control_forever", |ctx, b| {
        let body = ctx.substack(b, "SUBSTACK").ok_or_else(empty_body)?;
        Ok(Flow::Forever { body })
    });

    table.register("control_repeat_until", |ctx, b| {
        let body = ctx.substack(b, "SUBSTACK").ok_or_else(empty_body)?;
        let condition = condition_handle(b)?;
        Ok(Flow::RepeatUntil { body, condition })
    });

    table.register("control_wait", |ctx, b| {
        let secs = to_number(&ctx.eval_input(b, "DURATION")?).max(0.0);
        Ok(Flow::Wait(secs))
    });

    table.register("control_wait_until", |_ctx, b| {
        Ok(Flow::WaitUntil {
            condition: condition_handle(b)?,
        })
    });

    table.register("control_stop", |_ctx, b| {
        let target = scratch_ops::field_text(b, "STOP_OPTION");
        Ok(match target {
            "this script" => Flow::StopThisScript,
            "other scripts in sprite" => Flow::StopOtherScriptsInSprite,
            _ => Flow::StopAll,
        })
    });

    table.register("control_create_clone_of", |ctx, b| {
        let name = to_text(&ctx.eval_input(b, "CLONE_OPTION")?);
        Ok(Flow::CreateClone(name))
    });

    table.register("control_delete_this_clone", |_ctx, _b| {
        Ok(Flow::DeleteThisClone)
    });
}

fn empty_body() -> BlockError {
    BlockError::failed("control block has no body")
}

/// `control_repeat_until`'s `CONDITION` input must be a reporter, not a
/// literal — re-evaluating a baked-in literal every pass would make the
/// loop either never run or never terminate, neither of which is a valid
/// project: the loader always resolves a filled `CONDITION` slot to a
/// `Reporter`.
fn condition_handle(block: &Block) -> Result<scratch_model::BlockHandle, BlockError> {
    match block.input("CONDITION") {
        scratch_model::InputLink::Reporter(h) => Ok(*h),
        _ => Err(BlockError::failed(
            "control_repeat_until CONDITION must be a reporter block",
        )),
    }
}
