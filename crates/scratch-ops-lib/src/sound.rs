//! `sound_*`: no-ops (Non-goal: audio playback/decoding). Registered so
//! dispatch never fails for an otherwise-valid project; a host embedding
//! the engine for actual playback intercepts these opcodes upstream of
//! the table the same way a renderer intercepts `motion`/`looks` state.

use scratch_ops::{field_text, BlockContext, Flow, OpTable};

/// Register every `sound_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    table.register("sound_sounds_menu", |_ctx, b| {
        Ok(Flow::Value(scratch_core::Value::text(field_text(
            b,
            "SOUND_MENU",
        ))))
    });

    table.register("sound_play", |_ctx, _b| Ok(Flow::Next));
    table.register("sound_playuntildone", |_ctx, _b| Ok(Flow::Next));
    table.register("sound_stopallsounds", |_ctx, _b| Ok(Flow::Next));
}
