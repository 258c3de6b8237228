//! `procedures_*`: custom block dispatch.
//!
//! `procedures_prototype` never actually runs (it only ever sits on a
//! `procedures_definition`'s `custom_block` input, never in a `next`
//! chain) but is registered as a no-op so the dispatch table stays total.
//! The definition hat itself isn't an opcode a script ever reaches —
//! `scratch-sb3` indexes it into `Target::procedures` at load time instead
//! of scheduling it (see `scratch_model::ProcedureSignature`).

use std::collections::HashMap;

use scratch_core::{to_bool, BlockError};
use scratch_ops::{field_text, BlockContext, Flow, OpTable};

/// Register every `procedures_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    table.register("procedures_prototype", |_ctx, _b| Ok(Flow::Next));

    table.register("procedures_call", |ctx, b| {
        let mutation = b
            .mutation
            .as_ref()
            .ok_or_else(|| BlockError::failed("procedures_call has no mutation"))?;
        let signature = ctx
            .target()
            .procedure(&mutation.proc_code)
            .cloned()
            .ok_or_else(|| {
                BlockError::failed(format!(
                    "no definition for custom block '{}'",
                    mutation.proc_code
                ))
            })?;

        let mut args = HashMap::with_capacity(mutation.argument_ids.len());
        for (i, arg_id) in mutation.argument_ids.iter().enumerate() {
            let value = ctx.eval_input(b, arg_id)?;
            let name = signature
                .arg_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| arg_id.clone());
            args.insert(name, value);
        }

        Ok(Flow::Call {
            body: signature.body,
            args,
        })
    });

    table.register("argument_reporter_string_number", |ctx, b| {
        let name = field_text(b, "VALUE");
        Ok(Flow::Value(
            ctx.proc_arg(name).cloned().unwrap_or_default(),
        ))
    });

    table.register("argument_reporter_boolean", |ctx, b| {
        let name = field_text(b, "VALUE");
        let value = ctx.proc_arg(name).map(to_bool).unwrap_or(false);
        Ok(Flow::Value(scratch_core::Value::Bool(value)))
    });
}
