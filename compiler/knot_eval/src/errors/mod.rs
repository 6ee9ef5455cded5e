//! Runtime error types.
//!
//! `EvalErrorKind` is the typed category; factory functions
//! (`wrong_arity()`, `invalid_cast()`, ...) are the construction API.
//! `EvalError` wraps a kind with the chain of closures it escaped through.

use std::fmt;

use knot_ir::TreeError;
use knot_syntax::SyntaxError;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// How many child expressions a builtin accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Between(usize, usize),
    Either(usize, usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::Between(lo, hi) => (lo..=hi).contains(&count),
            Arity::Either(a, b) => count == a || count == b,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (text, last) = match *self {
            Arity::Exactly(n) => (n.to_string(), n),
            Arity::AtLeast(n) => (format!("at least {n}"), n),
            Arity::Between(lo, hi) => (format!("{lo} to {hi}"), hi),
            Arity::Either(a, b) => (format!("{a} or {b}"), b),
        };
        let noun = if last == 1 { "argument" } else { "arguments" };
        write!(f, "{text} {noun}")
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("`{name}` expects {expected}, got {got}")]
    Arity {
        name: String,
        expected: Arity,
        got: usize,
    },

    #[error("invalid cast from {from} to {to}")]
    InvalidCast { from: &'static str, to: &'static str },

    #[error("`{name}` is {type_name}, not a function")]
    NotCallable { name: String, type_name: &'static str },

    #[error("cannot index into {type_name}")]
    NotIndexable { type_name: &'static str },

    #[error("invalid {container} key: {key:?}")]
    InvalidKey { key: String, container: &'static str },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("{code} is not a valid character code")]
    InvalidCharCode { code: i64 },

    #[error("maximum call depth exceeded (limit: {depth})")]
    RecursionLimit { depth: usize },

    #[error("evaluation interrupted by host")]
    Interrupted,

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Closures the error propagated out of, innermost first.
    pub backtrace: Vec<String>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            backtrace: Vec::new(),
        }
    }

    /// Record that the error left the closure called as `name`.
    #[must_use]
    pub fn with_frame(mut self, name: impl Into<String>) -> Self {
        self.backtrace.push(name.into());
        self
    }

    /// Host interrupts bypass the script-level `try`.
    pub fn is_catchable(&self) -> bool {
        !matches!(self.kind, EvalErrorKind::Interrupted)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::from_kind(kind)
    }
}

impl From<TreeError> for EvalError {
    fn from(err: TreeError) -> Self {
        EvalError::from_kind(EvalErrorKind::Tree(err))
    }
}

/// Failure of a host-level entry point that may parse as well as evaluate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

// Factory functions

#[cold]
pub fn wrong_arity(name: &str, expected: Arity, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Arity {
        name: name.to_owned(),
        expected,
        got,
    })
}

#[cold]
pub fn invalid_cast(from: &'static str, to: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidCast { from, to })
}

#[cold]
pub fn not_callable(name: &str, type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        name: name.to_owned(),
        type_name,
    })
}

#[cold]
pub fn not_indexable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable { type_name })
}

#[cold]
pub fn invalid_key(key: &str, container: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidKey {
        key: key.to_owned(),
        container,
    })
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

#[cold]
pub fn invalid_char_code(code: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidCharCode { code })
}

#[cold]
pub fn recursion_limit(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

#[cold]
pub fn interrupted() -> EvalError {
    EvalError::from_kind(EvalErrorKind::Interrupted)
}

#[cfg(test)]
mod tests;
