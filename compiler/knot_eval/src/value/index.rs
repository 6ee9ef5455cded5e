//! Keyed access into arrays and objects, with auto-vivification.
//!
//! Reading or writing past the end of an array grows it with `Unassigned`
//! padding. Negative indices count from the end. Missing object keys read
//! as `Unassigned` without being inserted.

use crate::errors::{index_out_of_bounds, invalid_cast, invalid_key, not_indexable, EvalError};

use super::{truncate, Value};

/// Arrays never grow past this many elements.
const MAX_ARRAY_LEN: usize = 1 << 22;

/// A subscript, decided by the type of the key value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Key {
    /// Numbers index arrays, strings name object fields.
    pub fn from_value(value: &Value) -> Result<Key, EvalError> {
        match value {
            Value::Int(n) => Ok(Key::Index(*n)),
            Value::Float(x) => Ok(Key::Index(truncate(*x))),
            Value::Str(s) => Ok(Key::Name(s.to_string())),
            other => Err(invalid_cast(other.type_name(), "key")),
        }
    }

    /// The container an unassigned slot becomes when indexed by this key.
    pub fn empty_container(&self) -> Value {
        match self {
            Key::Index(_) => Value::array(Vec::new()),
            Key::Name(_) => Value::object(),
        }
    }

    fn as_index(&self) -> Result<i64, EvalError> {
        match self {
            Key::Index(n) => Ok(*n),
            Key::Name(name) => name
                .trim()
                .parse()
                .map_err(|_| invalid_key(name, "array")),
        }
    }

    fn as_name(&self) -> String {
        match self {
            Key::Index(n) => n.to_string(),
            Key::Name(name) => name.clone(),
        }
    }
}

/// Absolute position for `index` in an array of `len`, growing allowed.
fn resolve_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let signed_len = i64::try_from(len).map_err(|_| index_out_of_bounds(index, len))?;
    let absolute = if index < 0 { index + signed_len } else { index };
    match usize::try_from(absolute) {
        Ok(position) if position < MAX_ARRAY_LEN => Ok(position),
        _ => Err(index_out_of_bounds(index, len)),
    }
}

impl Value {
    /// Replace `Unassigned` with the empty container `key` calls for.
    pub fn vivify(&mut self, key: &Key) {
        if self.is_unassigned() {
            *self = key.empty_container();
        }
    }

    /// Read `self[key]`.
    pub fn get_key(&self, key: &Key) -> Result<Value, EvalError> {
        match self {
            Value::Array(items) => {
                let mut items = items.borrow_mut();
                let position = resolve_index(key.as_index()?, items.len())?;
                if position >= items.len() {
                    items.resize(position + 1, Value::Unassigned);
                }
                Ok(items[position].clone())
            }
            Value::Object(fields) => Ok(fields
                .borrow()
                .get(key.as_name().as_str())
                .cloned()
                .unwrap_or_default()),
            other => Err(not_indexable(other.type_name())),
        }
    }

    /// Write `self[key] = value`.
    pub fn set_key(&self, key: &Key, value: Value) -> Result<(), EvalError> {
        match self {
            Value::Array(items) => {
                let mut items = items.borrow_mut();
                let position = resolve_index(key.as_index()?, items.len())?;
                if position >= items.len() {
                    items.resize(position + 1, Value::Unassigned);
                }
                items[position] = value;
                Ok(())
            }
            Value::Object(fields) => {
                fields.borrow_mut().insert(key.as_name(), value);
                Ok(())
            }
            other => Err(not_indexable(other.type_name())),
        }
    }

    /// Handle to `self[key]`, vivified for indexing by `next`.
    ///
    /// The element is stored back before the handle is returned, so the
    /// borrow on `self` is released before the caller descends further.
    pub fn descend(&self, key: &Key, next: &Key) -> Result<Value, EvalError> {
        let mut child = self.get_key(key)?;
        if child.is_unassigned() {
            child.vivify(next);
            self.set_key(key, child.clone())?;
        }
        Ok(child)
    }
}
