//! Conversions between strings and character codes.

use knot_ir::NodeId;

use super::{eval_args, BuiltinRegistry};
use crate::errors::{
    index_out_of_bounds, invalid_cast, invalid_char_code, Arity, EvalError, EvalResult,
};
use crate::interpreter::Runner;
use crate::value::Value;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("tochar", to_char, false);
    registry.register("tochars", to_chars, false);
    registry.register("fromchar", from_char, false);
    registry.register("fromchars", from_chars, false);
}

/// `tochar(text, index)`: the code point at `index`; negative counts from
/// the end.
fn to_char(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "tochar", Arity::Exactly(2))?;
    let text = args[0].to_string();
    let len = text.chars().count();
    let index = args[1].to_int()?;
    let position = if index < 0 {
        i64::try_from(len).ok().map(|len| len + index)
    } else {
        Some(index)
    };
    position
        .and_then(|p| usize::try_from(p).ok())
        .and_then(|p| text.chars().nth(p))
        .map(|c| Value::Int(i64::from(u32::from(c))))
        .ok_or_else(|| index_out_of_bounds(index, len))
}

/// `tochars(text)`: array of code points.
fn to_chars(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "tochars", Arity::Exactly(1))?;
    let codes = args[0]
        .to_string()
        .chars()
        .map(|c| Value::Int(i64::from(u32::from(c))))
        .collect();
    Ok(Value::array(codes))
}

/// `fromchar(code...)`: string of the given code points.
fn from_char(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "fromchar", Arity::AtLeast(1))?;
    collect_chars(&args)
}

/// `fromchars(array)`: string of the array's code points.
fn from_chars(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "fromchars", Arity::Exactly(1))?;
    match &args[0] {
        Value::Array(items) => {
            let items = items.borrow().clone();
            collect_chars(&items)
        }
        other => Err(invalid_cast(other.type_name(), "array")),
    }
}

fn collect_chars(codes: &[Value]) -> EvalResult {
    let text = codes
        .iter()
        .map(to_code_point)
        .collect::<Result<String, EvalError>>()?;
    Ok(Value::from(text))
}

fn to_code_point(value: &Value) -> Result<char, EvalError> {
    let code = value.to_int()?;
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| invalid_char_code(code))
}
