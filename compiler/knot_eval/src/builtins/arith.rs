//! Arithmetic and bitwise operators.
//!
//! Arithmetic is on doubles. Bitwise operators work on integers; `~`, `<<`
//! and `>>` mask their result to 53 bits so it stays exact as a double.

use std::fmt::Write as _;

use knot_ir::NodeId;

use super::{eval_args, floats, BuiltinRegistry};
use crate::errors::{invalid_cast, Arity, EvalError, EvalResult};
use crate::interpreter::Runner;
use crate::value::Value;

const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("+", add, false);
    registry.register("-", subtract, false);
    registry.register("*", multiply, false);
    registry.register("/", divide, false);
    registry.register("%", remainder, false);
    registry.register("&", bit_and, false);
    registry.register("|", bit_or, false);
    registry.register("^", bit_xor, false);
    registry.register("~", bit_not, false);
    registry.register("<<", shift_left, false);
    registry.register(">>", shift_right, false);
}

/// Concatenation when the first argument is a string, otherwise a sum.
fn add(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "+", Arity::AtLeast(2))?;
    match &args[0] {
        Value::Str(_) => {
            let mut out = String::new();
            for arg in &args {
                let _ = write!(out, "{arg}");
            }
            Ok(Value::from(out))
        }
        Value::Unassigned | Value::Int(_) | Value::Float(_) => fold(&args, |a, b| a + b),
        other => Err(invalid_cast(other.type_name(), "number")),
    }
}

/// Difference, or negation with one argument.
fn subtract(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "-", Arity::AtLeast(1))?;
    if args.len() == 1 {
        return Ok(Value::Float(-args[0].to_float()?));
    }
    fold(&args, |a, b| a - b)
}

fn multiply(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "*", Arity::AtLeast(2))?;
    fold(&args, |a, b| a * b)
}

fn divide(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "/", Arity::AtLeast(2))?;
    fold(&args, |a, b| a / b)
}

fn remainder(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "%", Arity::AtLeast(2))?;
    fold(&args, |a, b| a % b)
}

fn fold(args: &[Value], op: impl Fn(f64, f64) -> f64) -> EvalResult {
    let numbers = floats(args)?;
    let mut acc = numbers[0];
    for &x in &numbers[1..] {
        acc = op(acc, x);
    }
    Ok(Value::Float(acc))
}

// Bitwise

fn bit_and(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "&", Arity::AtLeast(2))?;
    fold_int(&args, |a, b| a & b)
}

fn bit_or(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "|", Arity::AtLeast(2))?;
    fold_int(&args, |a, b| a | b)
}

fn bit_xor(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "^", Arity::AtLeast(2))?;
    fold_int(&args, |a, b| a ^ b)
}

fn fold_int(args: &[Value], op: impl Fn(i64, i64) -> i64) -> EvalResult {
    let mut acc = args[0].to_int()?;
    for arg in &args[1..] {
        acc = op(acc, arg.to_int()?);
    }
    Ok(Value::Int(acc))
}

fn bit_not(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "~", Arity::Exactly(1))?;
    Ok(Value::Int(!args[0].to_int()? & MAX_SAFE_INTEGER))
}

fn shift_left(runner: &mut Runner, node: NodeId) -> EvalResult {
    let (value, amount) = shift_operands(runner, node, "<<")?;
    Ok(Value::Int(value.wrapping_shl(amount) & MAX_SAFE_INTEGER))
}

fn shift_right(runner: &mut Runner, node: NodeId) -> EvalResult {
    let (value, amount) = shift_operands(runner, node, ">>")?;
    Ok(Value::Int(value.wrapping_shr(amount) & MAX_SAFE_INTEGER))
}

/// The value and a shift amount reduced to `0..64`.
fn shift_operands(runner: &mut Runner, node: NodeId, name: &str) -> Result<(i64, u32), EvalError> {
    let args = eval_args(runner, node, name, Arity::Exactly(2))?;
    let value = args[0].to_int()?;
    let amount = u32::try_from(args[1].to_int()?.rem_euclid(64)).unwrap_or(0);
    Ok((value, amount))
}
