//! Script-level tests, one file per builtin family.

mod arith_tests;
mod text_tests;

use crate::{EvalErrorKind, EvalResult, Runner, Value};

/// A runner for `source` with the standard builtins installed.
pub(crate) fn runner(source: &str) -> Runner {
    let mut runner = Runner::from_source(source).unwrap_or_else(|e| panic!("{e}: {source}"));
    runner.install_builtins();
    runner
}

pub(crate) fn run(source: &str) -> EvalResult {
    runner(source).run()
}

/// The value of `source`, which must evaluate without error.
pub(crate) fn eval(source: &str) -> Value {
    run(source).unwrap_or_else(|e| panic!("{e}: {source}"))
}

/// The error kind `source` fails with.
pub(crate) fn eval_err(source: &str) -> EvalErrorKind {
    match run(source) {
        Ok(value) => panic!("expected an error from {source}, got {value:?}"),
        Err(err) => err.kind,
    }
}
