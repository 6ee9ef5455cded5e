//! Builtin dispatch table and the standard library.
//!
//! Every builtin is a plain `fn(&mut Runner, NodeId) -> EvalResult` plus a
//! flag saying whether it defers child evaluation. Eager builtins read
//! their arguments through [`eval_args`], which is served from the cache
//! frame the runner filled before the call.

mod access;
mod arith;
mod collections;
mod compare;
mod control;
mod math;
mod text;

use knot_ir::NodeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{wrong_arity, Arity, EvalError};
use crate::interpreter::Runner;
use crate::value::{Builtin, BuiltinFn, Value};

pub use access::{read_path, write_path};

/// Name to builtin.
#[derive(Clone, Default)]
pub struct BuiltinRegistry {
    table: FxHashMap<&'static str, Builtin>,
}

impl BuiltinRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The full standard library.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        access::register(&mut registry);
        arith::register(&mut registry);
        collections::register(&mut registry);
        compare::register(&mut registry);
        control::register(&mut registry);
        math::register(&mut registry);
        text::register(&mut registry);
        registry
    }

    /// Add or replace `name`.
    pub fn register(&mut self, name: &'static str, func: BuiltinFn, defers: bool) -> Builtin {
        let builtin = Builtin { name, func, defers };
        self.table.insert(name, builtin);
        builtin
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.table.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.table.values()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// Argument helpers

/// The children of `node`, or an arity error naming `name`.
pub fn check_arity(
    runner: &Runner,
    node: NodeId,
    name: &str,
    arity: Arity,
) -> Result<SmallVec<[NodeId; 4]>, EvalError> {
    let children = runner.children(node);
    if arity.accepts(children.len()) {
        Ok(children)
    } else {
        Err(wrong_arity(name, arity, children.len()))
    }
}

/// Arity-checked values of every child of `node`.
pub fn eval_args(
    runner: &mut Runner,
    node: NodeId,
    name: &str,
    arity: Arity,
) -> Result<SmallVec<[Value; 4]>, EvalError> {
    let children = check_arity(runner, node, name, arity)?;
    let mut values = SmallVec::with_capacity(children.len());
    for child in children {
        values.push(runner.eval(child)?);
    }
    Ok(values)
}

/// Exactly `N` arguments, as numbers.
fn float_args<const N: usize>(
    runner: &mut Runner,
    node: NodeId,
    name: &str,
) -> Result<[f64; N], EvalError> {
    let values = eval_args(runner, node, name, Arity::Exactly(N))?;
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(&values) {
        *slot = value.to_float()?;
    }
    Ok(out)
}

/// All arguments as numbers.
fn floats(values: &[Value]) -> Result<SmallVec<[f64; 4]>, EvalError> {
    values.iter().map(Value::to_float).collect()
}
