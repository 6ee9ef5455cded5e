//! Variable and path access: `@` reads, `=` writes.
//!
//! A path is a variable name followed by keys. Every step except the last
//! auto-vivifies: an `Unassigned` slot becomes an array when the next key
//! is a number and an object when it is a string.

use knot_ir::NodeId;

use super::{eval_args, BuiltinRegistry};
use crate::environment::Environment;
use crate::errors::{Arity, EvalError, EvalResult};
use crate::interpreter::Runner;
use crate::value::{Key, Value};

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("@", get, false);
    registry.register("=", set, false);
}

/// `@(name, key...)`
fn get(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "@", Arity::AtLeast(1))?;
    read_path(runner.env_mut(), &args[0].to_string(), &args[1..])
}

/// `=(name, key..., value)`; yields the value.
fn set(runner: &mut Runner, node: NodeId) -> EvalResult {
    let mut args = eval_args(runner, node, "=", Arity::AtLeast(2))?;
    let value = args.pop().unwrap_or_default();
    write_path(runner.env_mut(), &args[0].to_string(), &args[1..], value.clone())?;
    Ok(value)
}

/// Read `name[key]...`. With no keys this is a plain lookup and creates no
/// binding; unbound names read as `Unassigned`.
pub fn read_path(env: &mut Environment, name: &str, keys: &[Value]) -> EvalResult {
    if keys.is_empty() {
        return Ok(env.lookup(name).cloned().unwrap_or_default());
    }
    let keys = to_keys(keys)?;
    let (container, last) = container_of(env, name, &keys)?;
    container.get_key(last)
}

/// Write `name[key]... = value`.
pub fn write_path(
    env: &mut Environment,
    name: &str,
    keys: &[Value],
    value: Value,
) -> Result<(), EvalError> {
    if keys.is_empty() {
        *env.slot(name) = value;
        return Ok(());
    }
    let keys = to_keys(keys)?;
    let (container, last) = container_of(env, name, &keys)?;
    container.set_key(last, value)
}

fn to_keys(values: &[Value]) -> Result<Vec<Key>, EvalError> {
    values.iter().map(Key::from_value).collect()
}

/// Walk every key but the last, vivifying on the way. Returns the final
/// container and the key to apply to it.
fn container_of<'k>(
    env: &mut Environment,
    name: &str,
    keys: &'k [Key],
) -> Result<(Value, &'k Key), EvalError> {
    let slot = env.slot(name);
    slot.vivify(&keys[0]);
    let mut current = slot.clone();
    for step in keys.windows(2) {
        current = current.descend(&step[0], &step[1])?;
    }
    Ok((current, &keys[keys.len() - 1]))
}
