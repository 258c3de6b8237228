//! `operator_*`: arithmetic, comparison, boolean logic, and string ops.

use rand::Rng;

use scratch_core::{compare, equals, to_bool, to_number, to_text, BlockError, Value};
use scratch_model::Block;
use scratch_ops::{field_text, BlockContext, Flow, OpTable};
use std::cmp::Ordering;
use std::sync::Arc;

fn num(ctx: &mut BlockContext<'_>, block: &Block, name: &str) -> Result<f64, BlockError> {
    Ok(to_number(&ctx.eval_input(block, name)?))
}

fn text(ctx: &mut BlockContext<'_>, block: &Block, name: &str) -> Result<std::sync::Arc<str>, BlockError> {
    Ok(to_text(&ctx.eval_input(block, name)?))
}

fn bool_in(ctx: &mut BlockContext<'_>, block: &Block, name: &str) -> Result<bool, BlockError> {
    Ok(to_bool(&ctx.eval_input(block, name)?))
}

/// Register every `operator_*` primitive into `table`.
pub fn register(table: &mut OpTable) {
    table.register("operator_add", |ctx, b| {
        Ok(Flow::Value(Value::Number(num(ctx, b, "NUM1")? + num(ctx, b, "NUM2")?)))
    });
    table.register("operator_subtract", |ctx, b| {
        Ok(Flow::Value(Value::Number(num(ctx, b, "NUM1")? - num(ctx, b, "NUM2")?)))
    });
    table.register("operator_multiply", |ctx, b| {
        Ok(Flow::Value(Value::Number(num(ctx, b, "NUM1")? * num(ctx, b, "NUM2")?)))
    });
    table.register("operator_divide", |ctx, b| {
        let (a, d) = (num(ctx, b, "NUM1")?, num(ctx, b, "NUM2")?);
        Ok(Flow::Value(Value::Number(a / d)))
    });
    table.register("operator_mod", |ctx, b| {
        let (a, m) = (num(ctx, b, "NUM1")?, num(ctx, b, "NUM2")?);
        Ok(Flow::Value(Value::Number(scratch_mod(a, m))))
    });
    table.register("operator_random", |ctx, b| {
        let (from, to) = (num(ctx, b, "FROM")?, num(ctx, b, "TO")?);
        Ok(Flow::Value(Value::Number(pick_random(ctx, from, to))))
    });
    table.register("operator_equals", |ctx, b| {
        let (a, c) = (ctx.eval_input(b, "OPERAND1")?, ctx.eval_input(b, "OPERAND2")?);
        Ok(Flow::Value(Value::Bool(equals(&a, &c))))
    });
    table.register("operator_gt", |ctx, b| {
        let (a, c) = (ctx.eval_input(b, "OPERAND1")?, ctx.eval_input(b, "OPERAND2")?);
        Ok(Flow::Value(Value::Bool(compare(&a, &c) == Ordering::Greater)))
    });
    table.register("operator_lt", |ctx, b| {
        let (a, c) = (ctx.eval_input(b, "OPERAND1")?, ctx.eval_input(b, "OPERAND2")?);
        Ok(Flow::Value(Value::Bool(compare(&a, &c) == Ordering::Less)))
    });
    table.register("operator_and", |ctx, b| {
        Ok(Flow::Value(Value::Bool(bool_in(ctx, b, "OPERAND1")? && bool_in(ctx, b, "OPERAND2")?)))
    });
    table.register("operator_or", |ctx, b| {
        Ok(Flow::Value(Value::Bool(bool_in(ctx, b, "OPERAND1")? || bool_in(ctx, b, "OPERAND2")?)))
    });
    table.register("operator_not", |ctx, b| {
        Ok(Flow::Value(Value::Bool(!bool_in(ctx, b, "OPERAND")?)))
    });
    table.register("operator_join", |ctx, b| {
        let (s1, s2) = (text(ctx, b, "STRING1")?, text(ctx, b, "STRING2")?);
        Ok(Flow::Value(Value::text(format!("{s1}{s2}"))))
    });
    table.register("operator_letter_of", |ctx, b| {
        let index = num(ctx, b, "LETTER")?;
        let s = text(ctx, b, "STRING")?;
        let letter = letter_of(&s, index);
        Ok(Flow::Value(Value::text(letter)))
    });
    table.register("operator_length", |ctx, b| {
        let s = text(ctx, b, "STRING")?;
        Ok(Flow::Value(Value::Number(s.chars().count() as f64)))
    });
    table.register("operator_contains", |ctx, b| {
        let (s1, s2) = (text(ctx, b, "STRING1")?, text(ctx, b, "STRING2")?);
        Ok(Flow::Value(Value::Bool(
            s1.to_lowercase().contains(&s2.to_lowercase()),
        )))
    });
    table.register("operator_mathop", |ctx, b| {
        let op = field_text(b, "OPERATOR").to_string();
        let n = num(ctx, b, "NUM")?;
        Ok(Flow::Value(Value::Number(mathop(&op, n))))
    });
}

/// Scratch's `mod`: result always takes the sign of the divisor, unlike
/// Rust's `%` which takes the sign of the dividend.
fn scratch_mod(a: f64, m: f64) -> f64 {
    if m == 0.0 {
        return f64::NAN;
    }
    let r = a % m;
    if r != 0.0 && (r < 0.0) != (m < 0.0) {
        r + m
    } else {
        r
    }
}

fn pick_random(ctx: &mut BlockContext<'_>, from: f64, to: f64) -> f64 {
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    let both_integral = lo.fract() == 0.0 && hi.fract() == 0.0;
    let rng = ctx.rng();
    if both_integral {
        let (lo, hi) = (lo as i64, hi as i64);
        rng.gen_range(lo..=hi) as f64
    } else {
        rng.gen_range(lo..=hi)
    }
}

fn letter_of(s: &str, index: f64) -> Arc<str> {
    if index < 1.0 || index.fract() != 0.0 {
        return Arc::from("");
    }
    match s.chars().nth(index as usize - 1) {
        Some(c) => Arc::from(c.to_string().as_str()),
        None => Arc::from(""),
    }
}

fn mathop(op: &str, n: f64) -> f64 {
    match op {
        "abs" => n.abs(),
        "floor" => n.floor(),
        "ceiling" => n.ceil(),
        "sqrt" => n.sqrt(),
        "sin" => (n.to_radians()).sin(),
        "cos" => (n.to_radians()).cos(),
        "tan" => (n.to_radians()).tan(),
        "asin" => n.asin().to_degrees(),
        "acos" => n.acos().to_degrees(),
        "atan" => n.atan().to_degrees(),
        "ln" => n.ln(),
        "log" => n.log10(),
        "e ^" => n.exp(),
        "10 ^" => 10f64.powf(n),
        _ => {
            log::warn!("unknown mathop operator '{op}'");
            f64::NAN
        }
    }
}
