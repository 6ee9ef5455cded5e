//! Scalar tags carried by nodes.

use std::borrow::Cow;

/// The payload attached directly to a node.
///
/// Leaves evaluate to their tag; calls use the tag as the callee name.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Scalar {
    /// `nil` / `null`, or an explicit empty argument.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Scalar::Nil)
    }

    /// The string used to resolve this tag as a callee.
    ///
    /// `Nil` resolves as the empty name, which is how `(a, b)` reaches the
    /// array constructor.
    pub fn callee_name(&self) -> Cow<'_, str> {
        match self {
            Scalar::Nil => Cow::Borrowed(""),
            Scalar::Bool(true) => Cow::Borrowed("true"),
            Scalar::Bool(false) => Cow::Borrowed("false"),
            Scalar::Int(n) => Cow::Owned(n.to_string()),
            Scalar::Float(x) => Cow::Owned(x.to_string()),
            Scalar::Str(s) => Cow::Borrowed(s),
        }
    }

    /// Structural equality where NaN matches NaN.
    pub fn same_as(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Float(a), Scalar::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}
