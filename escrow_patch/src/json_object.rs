//! Extension trait for JSON field access on records and response envelopes
//!
//! Keys can be passed as anything implementing `AsRef<str>`, so the wire
//! names in [`crate::constants`] work directly.

use serde_json::{Map, Value};

/// Extension trait for type-safe JSON field access
pub trait JsonObjectAccess {
    /// Get field value using any type that can be a string reference
    fn get_field<T: AsRef<str>>(&self, field: T) -> Option<&Value>;

    /// Get field value as string
    fn get_field_str<T: AsRef<str>>(&self, field: T) -> Option<&str> {
        self.get_field(field).and_then(Value::as_str)
    }

    /// Get field value, treating JSON `null` the same as an absent key
    fn get_present<T: AsRef<str>>(&self, field: T) -> Option<&Value> {
        self.get_field(field).filter(|value| !value.is_null())
    }
}

impl JsonObjectAccess for Value {
    fn get_field<T: AsRef<str>>(&self, field: T) -> Option<&Self> {
        self.get(field.as_ref())
    }
}

impl JsonObjectAccess for Map<String, Value> {
    fn get_field<T: AsRef<str>>(&self, field: T) -> Option<&Value> {
        self.get(field.as_ref())
    }
}
