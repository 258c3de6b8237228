//! Opcode group implementations, one module per SB3 block category,
//! registered into a single [`scratch_ops::OpTable`] by [`register_all`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod control;
pub mod data;
pub mod events;
pub mod looks;
pub mod motion;
pub mod operators;
pub mod procedures;
pub mod sensing;
pub mod sound;

use scratch_ops::OpTable;

/// Build a fully populated dispatch table covering every opcode group.
///
/// Any opcode a loaded project references that isn't registered here
/// falls through to `scratch-engine`'s UnknownOpcode policy (a logged
/// warning plus a no-op statement / empty-string reporter fallback) —
/// this function doesn't need to enumerate every SB3 opcode that exists,
/// only the ones this engine implements.
pub fn register_all(table: &mut OpTable) {
    operators::register(table);
    data::register(table);
    control::register(table);
    events::register(table);
    motion::register(table);
    looks::register(table);
    sound::register(table);
    sensing::register(table);
    procedures::register(table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_populates_every_group() {
        let mut table = OpTable::new();
        register_all(&mut table);
        assert!(table.get("operator_add").is_some());
        assert!(table.get("data_setvariableto").is_some());
        assert!(table.get("control_repeat").is_some());
        assert!(table.get("event_broadcast").is_some());
        assert!(table.get("motion_movesteps").is_some());
        assert!(table.get("looks_say").is_some());
        assert!(table.get("sound_play").is_some());
        assert!(table.get("sensing_timer").is_some());
        assert!(table.get("procedures_call").is_some());
        assert!(table.get("argument_reporter_boolean").is_some());
    }
}
