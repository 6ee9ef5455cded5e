//! Runtime values.
//!
//! A `Value` is what evaluating a node produces and what variables hold.
//! Scalars are immutable; arrays and objects are [`Shared`] handles so a
//! container assigned to two variables is one container.
//!
//! Coercions follow a small fixed table:
//!
//! | value        | truthy                          | number            |
//! |--------------|---------------------------------|-------------------|
//! | `Unassigned` | false                           | 0                 |
//! | `Int`/`Float`| non-zero (NaN is false)         | itself            |
//! | `Str`        | `true`/`false` text, else non-empty | parsed, or NaN |
//! | containers   | true                            | cast error        |

mod index;
mod shared;

use std::fmt;
use std::rc::Rc;

use knot_ir::{NodeId, Scalar};
use rustc_hash::FxHashMap;

use crate::errors::{invalid_cast, EvalResult};
use crate::interpreter::Runner;

pub use index::Key;
pub use shared::Shared;

/// Signature shared by every builtin: the runner and the call node.
pub type BuiltinFn = fn(&mut Runner, NodeId) -> EvalResult;

/// A host-provided function bound to a global name.
#[derive(Copy, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
    /// Deferred builtins receive their children unevaluated and decide
    /// what to evaluate themselves; eager builtins find every child already
    /// evaluated in the current cache frame.
    pub defers: bool,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.defers { "deferred" } else { "eager" };
        write!(f, "Builtin({}, {mode})", self.name)
    }
}

/// A user function: the parameter-list node and the body node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    pub params: NodeId,
    pub body: NodeId,
}

pub type Array = Shared<Vec<Value>>;
pub type Object = Shared<FxHashMap<String, Value>>;

#[derive(Clone, Default)]
pub enum Value {
    /// No value: unbound names, missing object keys, padding array slots.
    #[default]
    Unassigned,
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Array(Array),
    Object(Object),
    Closure(Rc<Closure>),
    Builtin(Builtin),
}

impl Value {
    // Factory methods

    #[inline]
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Int(i64::from(b))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Shared::new(items))
    }

    pub fn object() -> Self {
        Value::Object(Shared::new(FxHashMap::default()))
    }

    /// The literal value of a node tag. `nil` is `Unassigned` and booleans
    /// are the integers 1 and 0.
    pub fn from_tag(tag: &Scalar) -> Self {
        match tag {
            Scalar::Nil => Value::Unassigned,
            Scalar::Bool(b) => Value::bool(*b),
            Scalar::Int(n) => Value::Int(*n),
            Scalar::Float(x) => Value::Float(*x),
            Scalar::Str(s) => Value::string(s.as_str()),
        }
    }

    // Inspection

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unassigned => "unassigned",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Closure(_) => "function",
            Value::Builtin(_) => "builtin",
        }
    }

    #[inline]
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Value::Unassigned)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Unassigned => false,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0 && !x.is_nan(),
            Value::Str(s) => parse_bool(s).unwrap_or(!s.is_empty()),
            Value::Array(_) | Value::Object(_) | Value::Closure(_) | Value::Builtin(_) => true,
        }
    }

    /// Numeric view of the value. Text that is not a number is NaN.
    pub fn to_float(&self) -> Result<f64, crate::EvalError> {
        match self {
            Value::Unassigned => Ok(0.0),
            Value::Int(n) => Ok(int_to_float(*n)),
            Value::Float(x) => Ok(*x),
            Value::Str(s) => Ok(s.trim().parse().unwrap_or(f64::NAN)),
            other => Err(invalid_cast(other.type_name(), "number")),
        }
    }

    /// Integer view of the value. Floats truncate toward zero.
    pub fn to_int(&self) -> Result<i64, crate::EvalError> {
        match self {
            Value::Unassigned => Ok(0),
            Value::Int(n) => Ok(*n),
            Value::Float(x) => Ok(truncate(*x)),
            Value::Str(s) => {
                let text = s.trim();
                if let Ok(n) = text.parse::<i64>() {
                    return Ok(n);
                }
                match text.parse::<f64>() {
                    Ok(x) if x.is_finite() => Ok(truncate(x)),
                    _ => Err(invalid_cast("string", "integer")),
                }
            }
            other => Err(invalid_cast(other.type_name(), "integer")),
        }
    }

    /// Element count of a container, character count of a string, zero
    /// for everything else.
    pub fn count(&self) -> usize {
        match self {
            Value::Str(s) => s.chars().count(),
            Value::Array(items) => items.borrow().len(),
            Value::Object(fields) => fields.borrow().len(),
            Value::Unassigned
            | Value::Int(_)
            | Value::Float(_)
            | Value::Closure(_)
            | Value::Builtin(_) => 0,
        }
    }

    /// Membership: array element, object key, or substring.
    pub fn contains(&self, item: &Value) -> bool {
        match self {
            Value::Array(items) => items.borrow().iter().any(|v| v.loose_eq(item)),
            Value::Object(fields) => fields.borrow().contains_key(item.to_string().as_str()),
            Value::Str(s) => s.contains(item.to_string().as_str()),
            _ => self.loose_eq(item),
        }
    }

    /// Script-level equality, used by `==` and `any`.
    ///
    /// Two strings compare as text. Otherwise two numeric values compare as
    /// doubles (NaN equals nothing), `Unassigned` equals only itself, and
    /// containers and closures compare by identity.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Unassigned, Value::Unassigned) => true,
            (Value::Unassigned, _) | (_, Value::Unassigned) => false,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(_) | Value::Float(_) | Value::Str(_) => self.to_float().ok(),
            _ => None,
        }
    }

    fn write_to(
        &self,
        out: &mut impl fmt::Write,
        nested: bool,
        path: &mut Vec<*const ()>,
    ) -> fmt::Result {
        match self {
            Value::Unassigned if nested => out.write_str("unassigned"),
            Value::Unassigned => Ok(()),
            Value::Int(n) => write!(out, "{n}"),
            Value::Float(x) => write_float(out, *x),
            Value::Str(s) if nested => write!(out, "{:?}", &**s),
            Value::Str(s) => out.write_str(s),
            Value::Array(items) => {
                if path.contains(&items.addr()) {
                    return out.write_str("[...]");
                }
                path.push(items.addr());
                out.write_char('[')?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    item.write_to(out, true, path)?;
                }
                path.pop();
                out.write_char(']')
            }
            Value::Object(fields) => {
                if path.contains(&fields.addr()) {
                    return out.write_str("{...}");
                }
                path.push(fields.addr());
                let fields = fields.borrow();
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort_unstable();
                out.write_char('{')?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    write!(out, "{key}: ")?;
                    fields[key].write_to(out, true, path)?;
                }
                path.pop();
                out.write_char('}')
            }
            Value::Closure(_) => out.write_str("<function>"),
            Value::Builtin(b) => write!(out, "<builtin {}>", b.name),
        }
    }
}

#[expect(clippy::cast_precision_loss, reason = "script numbers are doubles")]
pub(crate) fn int_to_float(n: i64) -> f64 {
    n as f64
}

/// Truncate toward zero, saturating at the `i64` range; NaN is 0.
#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating truncation is the conversion"
)]
pub(crate) fn truncate(x: f64) -> i64 {
    x.trunc() as i64
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn write_float(out: &mut impl fmt::Write, x: f64) -> fmt::Result {
    if x.is_nan() {
        out.write_str("NaN")
    } else if x.is_infinite() {
        out.write_str(if x > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(out, "{x}")
    }
}

/// Text form: strings are bare at the top level and quoted inside
/// containers; `Unassigned` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, false, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unassigned => f.write_str("Unassigned"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Builtin(b) => write!(f, "{b:?}"),
            Value::Closure(c) => write!(f, "Closure({:?}, {:?})", c.params, c.body),
            container => {
                let mut text = String::new();
                container.write_to(&mut text, true, &mut Vec::new())?;
                let kind = if matches!(container, Value::Array(_)) {
                    "Array"
                } else {
                    "Object"
                };
                write!(f, "{kind}({text})")
            }
        }
    }
}

/// Structural equality for host code and tests. Containers compare by
/// contents, floats by IEEE equality; scripts use [`Value::loose_eq`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unassigned, Value::Unassigned) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (Value::Closure(a), Value::Closure(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
