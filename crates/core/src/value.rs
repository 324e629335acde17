//! Typed scalar values and configured defaults

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Value
// ============================================================================

/// A converted scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Uuid(Uuid),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Check if null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Invariant string form, used for keys, display and SQL parameters
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::Time(v) => write!(f, "{}", v.format("%H:%M:%S")),
            Value::Uuid(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "[{} bytes]", v.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

// ============================================================================
// DefaultValue
// ============================================================================

/// Values computed by the store or the clock rather than given up front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultBehavior {
    /// Current timestamp on every save
    Now,
    /// Current timestamp on create only
    NowOnCreate,
    /// Current timestamp on update only
    NowOnUpdate,
}

/// Default configured for a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// Installed when no value was bound
    Fixed(Value),
    /// Always installed, whatever was bound
    Behavior(DefaultBehavior),
}

impl DefaultValue {
    /// Check if this default is a behaviour marker
    pub fn is_behavior(&self) -> bool {
        matches!(self, DefaultValue::Behavior(_))
    }
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Fixed(v) => write!(f, "{}", v),
            DefaultValue::Behavior(DefaultBehavior::Now) => write!(f, "NOW()"),
            DefaultValue::Behavior(DefaultBehavior::NowOnCreate) => write!(f, "NOW() on create"),
            DefaultValue::Behavior(DefaultBehavior::NowOnUpdate) => write!(f, "NOW() on update"),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(v: Value) -> Self {
        DefaultValue::Fixed(v)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Text("Speedy".into()).to_string(), "Speedy");
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-01-10");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Int(3).as_real(), Some(3.0));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::default().is_null());
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
    }

    #[test]
    fn test_default_value() {
        let fixed: DefaultValue = Value::Int(5).into();
        assert!(!fixed.is_behavior());
        assert_eq!(fixed.to_string(), "5");
        let now = DefaultValue::Behavior(DefaultBehavior::Now);
        assert!(now.is_behavior());
        assert_eq!(now.to_string(), "NOW()");
    }
}
