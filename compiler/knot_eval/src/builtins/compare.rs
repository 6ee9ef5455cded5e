//! Equality and ordering. Results are `1` or `0`.

use knot_ir::NodeId;

use super::{eval_args, floats, BuiltinRegistry};
use crate::errors::{Arity, EvalResult};
use crate::interpreter::Runner;
use crate::value::Value;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("==", equal, false);
    registry.register("!=", not_equal, false);
    registry.register("<", less, false);
    registry.register("<=", less_equal, false);
    registry.register(">", greater, false);
    registry.register(">=", greater_equal, false);
}

/// Every later argument equals the first.
fn equal(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "==", Arity::AtLeast(2))?;
    let first = &args[0];
    Ok(Value::bool(args[1..].iter().all(|v| first.loose_eq(v))))
}

/// Negation of `==`: some later argument differs from the first.
fn not_equal(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "!=", Arity::AtLeast(2))?;
    let first = &args[0];
    Ok(Value::bool(!args[1..].iter().all(|v| first.loose_eq(v))))
}

fn less(runner: &mut Runner, node: NodeId) -> EvalResult {
    chain(runner, node, "<", |a, b| a < b)
}

fn less_equal(runner: &mut Runner, node: NodeId) -> EvalResult {
    chain(runner, node, "<=", |a, b| a <= b)
}

fn greater(runner: &mut Runner, node: NodeId) -> EvalResult {
    chain(runner, node, ">", |a, b| a > b)
}

fn greater_equal(runner: &mut Runner, node: NodeId) -> EvalResult {
    chain(runner, node, ">=", |a, b| a >= b)
}

/// `op` holds for every adjacent pair, e.g. `<(1, 2, 3)`.
fn chain(runner: &mut Runner, node: NodeId, name: &str, op: fn(f64, f64) -> bool) -> EvalResult {
    let args = eval_args(runner, node, name, Arity::AtLeast(2))?;
    let numbers = floats(&args)?;
    Ok(Value::bool(numbers.windows(2).all(|pair| op(pair[0], pair[1]))))
}
