//! `event_*`: broadcasting. The hat opcodes (`whenflagclicked`,
//! `whenbroadcastreceived`, `whenkeypressed`, `whenthisspriteclicked`)
//! have no primitive of their own — `scratch-engine` starts a thread at
//! the hat's `next` block directly, it never dispatches the hat itself.

use scratch_core::id::BroadcastId;
use scratch_core::BlockError;
use scratch_model::FieldLiteral;
use scratch_ops::{BlockContext, Flow, OpTable};

fn broadcast_id(block: &scratch_model::Block) -> Result<BroadcastId, BlockError> {
    match block.field("BROADCAST_INPUT") {
        Some(FieldLiteral::Broadcast(id)) => Ok(id.clone()),
        _ => Err(BlockError::failed(
            "broadcast target must be a literal dropdown selection",
        )),
    }
}

/// Register every `event_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    table.register("event_broadcast", |_ctx: &mut BlockContext<'_>, b| {
        Ok(Flow::Broadcast(broadcast_id(b)?))
    });

    table.register("event_broadcastandwait", |_ctx: &mut BlockContext<'_>, b| {
        Ok(Flow::BroadcastAndWait(broadcast_id(b)?))
    });
}
