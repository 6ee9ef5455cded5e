//! Container builtins and type inspection.

use knot_ir::NodeId;

use super::{eval_args, BuiltinRegistry};
use crate::errors::{index_out_of_bounds, invalid_cast, wrong_arity, Arity, EvalResult};
use crate::interpreter::Runner;
use crate::value::Value;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("", array, false);
    registry.register("typeof", type_of, false);
    registry.register("length", length, false);
    registry.register("any", any, false);
    registry.register("delete", delete, false);
    registry.register("slice", slice, false);
}

/// A nameless call builds an array: `(1, 2, 3)`.
fn array(runner: &mut Runner, node: NodeId) -> EvalResult {
    let items = eval_args(runner, node, "", Arity::AtLeast(0))?;
    Ok(Value::array(items.into_vec()))
}

fn type_of(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "typeof", Arity::Exactly(1))?;
    Ok(Value::from(args[0].type_name()))
}

fn length(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "length", Arity::Exactly(1))?;
    Ok(Value::Int(i64::try_from(args[0].count()).unwrap_or(i64::MAX)))
}

/// `any(container, item)`: membership test.
fn any(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "any", Arity::Exactly(2))?;
    Ok(Value::bool(args[0].contains(&args[1])))
}

/// `delete(array, index[, count])` or `delete(object, key...)`; yields the
/// container.
fn delete(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "delete", Arity::AtLeast(2))?;
    match &args[0] {
        Value::Array(items) => {
            if args.len() > 3 {
                return Err(wrong_arity("delete", Arity::Between(2, 3), args.len()));
            }
            let mut items = items.borrow_mut();
            let len = items.len();
            let index = args[1].to_int()?;
            let start = resolve_bound(index, len).filter(|&start| start < len);
            let Some(start) = start else {
                return Err(index_out_of_bounds(index, len));
            };
            let count = match args.get(2) {
                Some(count) => usize::try_from(count.to_int()?).unwrap_or(0),
                None => 1,
            };
            let end = start.saturating_add(count).min(len);
            items.drain(start..end);
        }
        Value::Object(fields) => {
            let mut fields = fields.borrow_mut();
            for key in &args[1..] {
                fields.remove(key.to_string().as_str());
            }
        }
        other => return Err(invalid_cast(other.type_name(), "container")),
    }
    Ok(args[0].clone())
}

/// `slice(source, start[, end])` on strings and arrays. Negative `start`
/// counts from the end; an `end` of zero or less is relative to the end.
fn slice(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "slice", Arity::Between(2, 3))?;
    let len = args[0].count();
    let start = resolve_bound(args[1].to_int()?, len).unwrap_or(0).min(len);
    let end = match args.get(2) {
        Some(end) => match end.to_int()? {
            0 => len,
            end if end < 0 => resolve_bound(end, len).unwrap_or(0),
            end => usize::try_from(end).unwrap_or(len).min(len),
        },
        None => len,
    };
    let end = end.max(start);

    match &args[0] {
        Value::Str(s) => {
            let text: String = s.chars().skip(start).take(end - start).collect();
            Ok(Value::from(text))
        }
        Value::Array(items) => Ok(Value::array(items.borrow()[start..end].to_vec())),
        other => Err(invalid_cast(other.type_name(), "string or array")),
    }
}

/// `index`, counting from the end when negative; `None` if still negative.
fn resolve_bound(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        return usize::try_from(index).ok();
    }
    let back = usize::try_from(index.unsigned_abs()).ok()?;
    len.checked_sub(back)
}
