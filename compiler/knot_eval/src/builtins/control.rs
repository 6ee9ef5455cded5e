//! Control flow. Everything here except `return` defers its children.

use std::rc::Rc;

use knot_ir::NodeId;

use super::{check_arity, eval_args, write_path, BuiltinRegistry};
use crate::errors::{Arity, EvalResult};
use crate::interpreter::{FrameKind, Runner};
use crate::value::{Closure, Value};

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.register("$", sequence, true);
    registry.register("&&", and_then, true);
    registry.register("||", or_else, true);
    registry.register("?", conditional, true);
    registry.register("while", while_loop, true);
    registry.register("function", function, true);
    registry.register("try", try_catch, true);
    registry.register("return", return_value, false);
}

/// Evaluate children in order and yield the last, stopping early at a
/// child that calls `return`.
fn sequence(runner: &mut Runner, node: NodeId) -> EvalResult {
    let children = check_arity(runner, node, "$", Arity::AtLeast(1))?;
    let mut last = Value::Unassigned;
    for child in children {
        if runner.calls_builtin(child, "return") {
            if runner.tree().is_leaf(child) {
                return Ok(Value::Unassigned);
            }
            return runner.eval(child);
        }
        last = runner.eval(child)?;
    }
    Ok(last)
}

/// The first falsy child, else the last.
fn and_then(runner: &mut Runner, node: NodeId) -> EvalResult {
    let children = check_arity(runner, node, "&&", Arity::AtLeast(1))?;
    let mut last = Value::Unassigned;
    for child in children {
        last = runner.eval(child)?;
        if !last.is_truthy() {
            break;
        }
    }
    Ok(last)
}

/// The first truthy child, else the last.
fn or_else(runner: &mut Runner, node: NodeId) -> EvalResult {
    let children = check_arity(runner, node, "||", Arity::AtLeast(1))?;
    let mut last = Value::Unassigned;
    for child in children {
        last = runner.eval(child)?;
        if last.is_truthy() {
            break;
        }
    }
    Ok(last)
}

/// `?(cond, then[, else])`
fn conditional(runner: &mut Runner, node: NodeId) -> EvalResult {
    let children = check_arity(runner, node, "?", Arity::Between(2, 3))?;
    if runner.eval(children[0])?.is_truthy() {
        runner.eval(children[1])
    } else if let Some(&otherwise) = children.get(2) {
        runner.eval(otherwise)
    } else {
        Ok(Value::Unassigned)
    }
}

/// `while(cond, body)`: the last body value, or `Unassigned` if the body
/// never ran.
fn while_loop(runner: &mut Runner, node: NodeId) -> EvalResult {
    let children = check_arity(runner, node, "while", Arity::Exactly(2))?;
    let (cond, body) = (children[0], children[1]);
    let mut last = Value::Unassigned;
    loop {
        // Leaf-only loops never reach the work-stack's own check.
        runner.check_interrupt()?;
        if !runner.eval(cond)?.is_truthy() {
            return Ok(last);
        }
        last = runner.eval(body)?;
    }
}

/// `function(path..., params, body)`: store a closure at `path` and yield it.
fn function(runner: &mut Runner, node: NodeId) -> EvalResult {
    let children = check_arity(runner, node, "function", Arity::AtLeast(3))?;
    let (path, rest) = children.split_at(children.len() - 2);
    let closure = Value::Closure(Rc::new(Closure {
        params: rest[0],
        body: rest[1],
    }));

    let mut keys = Vec::with_capacity(path.len());
    for &step in path {
        keys.push(runner.eval(step)?);
    }
    let name = keys[0].to_string();
    write_path(runner.env_mut(), &name, &keys[1..], closure.clone())?;
    Ok(closure)
}

/// `try(expr[, name, handler])`: on failure, bind the message to `name` in
/// a new local frame and evaluate `handler`. Host interrupts pass through.
fn try_catch(runner: &mut Runner, node: NodeId) -> EvalResult {
    let children = check_arity(runner, node, "try", Arity::Either(1, 3))?;
    let err = match runner.eval(children[0]) {
        Ok(value) => return Ok(value),
        Err(err) if !err.is_catchable() => return Err(err),
        Err(err) => err,
    };
    tracing::trace!(error = %err, "caught");

    let &[_, name, handler] = children.as_slice() else {
        return Ok(Value::Unassigned);
    };
    let name = runner.eval(name)?.to_string();
    let message = Value::from(err.to_string());
    runner.with_frame(FrameKind::Handler, |scoped| {
        scoped.env_mut().define_local(name, message);
        scoped.eval(handler)
    })
}

/// `return(value)`; the enclosing `$` stops at it.
fn return_value(runner: &mut Runner, node: NodeId) -> EvalResult {
    let mut args = eval_args(runner, node, "return", Arity::Between(0, 1))?;
    Ok(args.pop().unwrap_or_default())
}
