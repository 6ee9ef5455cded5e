//! Knot Eval - evaluator for knot node trees.
//!
//! # Architecture
//!
//! - [`Runner`]: owns a [`Tree`](knot_ir::Tree) and evaluates it; eager
//!   calls run on an explicit work-stack, deferred builtins and closures
//!   re-enter evaluation under `ensure_sufficient_stack`
//! - [`Environment`]: global frame plus pooled call frames
//! - [`EvalCache`]: per-eager-call memo of node results, so a shared
//!   subtree is evaluated once per window
//! - [`Value`]: the dynamic value model, with auto-vivifying containers
//! - [`BuiltinRegistry`]: name to builtin, built per runner and installed
//!   into the global frame by [`Runner::install_builtins`]
//!
//! ```text
//! let mut runner = Runner::from_source("+(1, *(2, 2.5))")?;
//! runner.install_builtins();
//! assert_eq!(runner.run()?, Value::Float(6.0));
//! ```

pub mod builtins;
mod cache;
mod config;
mod environment;
pub mod errors;
mod interpreter;
mod value;

pub use builtins::BuiltinRegistry;
pub use cache::EvalCache;
pub use config::{RunnerConfig, MAX_CALL_DEPTH_VAR};
pub use environment::Environment;
pub use errors::{Arity, Error, EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{InterruptHook, Runner};
pub use value::{Array, Builtin, BuiltinFn, Closure, Key, Object, Shared, Value};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
