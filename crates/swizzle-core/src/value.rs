//! Runtime values stored in object fields, side tables and method arguments.

use std::fmt;

use crate::runtime::ObjectHandle;

/// A dynamic value.
///
/// Values are what object fields hold and what methods receive and return.
/// Objects are referenced through [`ObjectHandle`]s, never by pointer.
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// Void/empty
    #[default]
    Void,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// String value (owned)
    String(String),
    /// Handle to a heap object
    Object(ObjectHandle),
    /// Null object reference
    Null,
}

impl Value {
    /// The kind of this value, or `None` for `Void`.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Void => None,
            Value::Int(_) => Some(ValueKind::Int),
            Value::Float(_) => Some(ValueKind::Float),
            Value::Bool(_) => Some(ValueKind::Bool),
            Value::String(_) => Some(ValueKind::String),
            Value::Object(_) | Value::Null => Some(ValueKind::Object),
        }
    }

    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Null => "null",
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            Value::Object(h) => Some(*h),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Object(h) => write!(f, "Object({:?})", h),
            Value::Null => write!(f, "Null"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<ObjectHandle> for Value {
    fn from(v: ObjectHandle) -> Self {
        Value::Object(v)
    }
}

/// Declared kind of a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    String,
    /// Object reference (nullable)
    Object,
}

impl ValueKind {
    /// The value a freshly allocated field of this kind holds.
    pub fn default_value(self) -> Value {
        match self {
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::String => Value::String(String::new()),
            ValueKind::Object => Value::Null,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_an_object_kind() {
        assert_eq!(Value::Null.kind(), Some(ValueKind::Object));
        assert_eq!(Value::Void.kind(), None);
    }

    #[test]
    fn defaults_match_kind() {
        for kind in [
            ValueKind::Int,
            ValueKind::Float,
            ValueKind::Bool,
            ValueKind::String,
            ValueKind::Object,
        ] {
            assert_eq!(kind.default_value().kind(), Some(kind));
        }
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from(3i64).as_int(), Some(3));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Int(1).as_str(), None);
    }
}
