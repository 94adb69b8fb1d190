use std::collections::HashMap;
use std::fmt;

/// A value bound to a placeholder.
///
/// `Null` is distinct from an absent binding: a map that contains a key with
/// a `Null` value triggers the null-value policy, while a key that is not in
/// the map at all triggers the missing-key policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Renders the value as replacement text, or `None` for `Null`.
    pub(crate) fn render(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Where a named template looks up values during formatting.
pub enum ValueSource<'a> {
    /// Values consumed left to right, one per placeholder occurrence.
    Sequence(&'a [Value]),
    /// Values addressed by zero-based index from `{0}`-style placeholders.
    Indexed(&'a [Value]),
    /// Values looked up by placeholder name.
    Named(&'a HashMap<String, Value>),
    /// Values produced by an arbitrary accessor, e.g. struct field getters.
    Record(&'a dyn Fn(&str) -> Option<Value>),
}

impl fmt::Debug for ValueSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Sequence(values) => f.debug_tuple("Sequence").field(values).finish(),
            ValueSource::Indexed(values) => f.debug_tuple("Indexed").field(values).finish(),
            ValueSource::Named(map) => f.debug_tuple("Named").field(map).finish(),
            ValueSource::Record(_) => f.debug_tuple("Record").field(&"<fn>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(Value::Null.render(), None);
        assert_eq!(Value::Bool(true).render(), Some("true".to_string()));
        assert_eq!(Value::Int(-3).render(), Some("-3".to_string()));
        assert_eq!(Value::Float(1.5).render(), Some("1.5".to_string()));
        assert_eq!(Value::from("abc").render(), Some("abc".to_string()));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Str("x".to_string()));
    }
}
