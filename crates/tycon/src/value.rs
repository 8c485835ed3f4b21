// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property value types.

use crate::descriptor::PropertyType;

/// A value held by a configuration property.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Unset / explicit null.
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl ConfigValue {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I64(_) => "int",
            Self::F64(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Whether this value is an instance of the given property type.
    ///
    /// `Null` matches no type; nullability is decided by the property, not
    /// the value.
    pub fn matches(&self, ty: PropertyType) -> bool {
        matches!(
            (self, ty),
            (Self::Bool(_), PropertyType::Bool)
                | (Self::I64(_), PropertyType::Int)
                | (Self::F64(_), PropertyType::Float)
                | (Self::String(_), PropertyType::Str)
        )
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        Self::I64(v.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let v = ConfigValue::from(42i64);
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(v.as_bool(), None);

        let v = ConfigValue::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.kind_name(), "string");
    }

    #[test]
    fn test_type_match() {
        assert!(ConfigValue::from(true).matches(PropertyType::Bool));
        assert!(ConfigValue::from("x").matches(PropertyType::Str));
        assert!(!ConfigValue::from(1i64).matches(PropertyType::Str));
        assert!(!ConfigValue::Null.matches(PropertyType::Int));
    }
}
