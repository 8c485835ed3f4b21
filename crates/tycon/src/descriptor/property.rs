// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-property schema: name, type, multiplicity, constraints.

use crate::error::ConfigError;
use crate::value::ConfigValue;
use std::fmt;
use std::sync::Arc;

/// Value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Bool,
    Int,
    Float,
    Str,
}

impl PropertyType {
    /// Type name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
        }
    }

    /// The type's zero value, used when no default is declared.
    pub fn zero(&self) -> ConfigValue {
        match self {
            Self::Bool => ConfigValue::Bool(false),
            Self::Int => ConfigValue::I64(0),
            Self::Float => ConfigValue::F64(0.0),
            Self::Str => ConfigValue::String(String::new()),
        }
    }
}

/// Multiplicity of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Single value.
    Plain,
    /// Ordered collection, stored in an observable list.
    List,
    /// Keyed collection, stored in an observable map.
    Map,
}

/// Externally supplied element constraint.
///
/// Returns a message describing the violation; the framework wraps it into
/// [`ConfigError::ConstraintViolation`].
pub type ElementCheck = dyn Fn(&ConfigValue) -> Result<(), String> + Send + Sync;

/// Derives the collection key from an element value.
pub type KeyMapping = dyn Fn(&ConfigValue) -> String + Send + Sync;

/// Schema for one property of a configuration type.
///
/// Immutable; owned by its [`ConfigDescriptor`](super::ConfigDescriptor)
/// and shared via `Arc` with the collections bound to it.
pub struct PropertyDescriptor {
    name: String,
    kind: PropertyKind,
    value_type: PropertyType,
    default: ConfigValue,
    check: Option<Arc<ElementCheck>>,
    key_mapping: Option<Arc<KeyMapping>>,
}

impl PropertyDescriptor {
    /// Create a plain (single-valued) property.
    pub fn plain(name: impl Into<String>, value_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Plain,
            value_type,
            default: value_type.zero(),
            check: None,
            key_mapping: None,
        }
    }

    /// Create a list-valued property.
    pub fn list(name: impl Into<String>, element_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::List,
            value_type: element_type,
            default: ConfigValue::Null,
            check: None,
            key_mapping: None,
        }
    }

    /// Create a map-valued property.
    pub fn map(name: impl Into<String>, element_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Map,
            value_type: element_type,
            default: ConfigValue::Null,
            check: None,
            key_mapping: None,
        }
    }

    /// Set the declared default (plain properties).
    #[must_use]
    pub fn with_default(mut self, default: impl Into<ConfigValue>) -> Self {
        self.default = default.into();
        self
    }

    /// Attach an externally supplied element constraint.
    #[must_use]
    pub fn with_check(
        mut self,
        check: impl Fn(&ConfigValue) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.check = Some(Arc::new(check));
        self
    }

    /// Attach a key mapping (map-valued and keyed list-valued properties).
    #[must_use]
    pub fn with_key_mapping(
        mut self,
        mapping: impl Fn(&ConfigValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.key_mapping = Some(Arc::new(mapping));
        self
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Multiplicity.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Value type (element type for collections).
    pub fn value_type(&self) -> PropertyType {
        self.value_type
    }

    /// Declared default for plain properties; `Null` for collections.
    pub fn default_value(&self) -> ConfigValue {
        self.default.clone()
    }

    /// Whether a key mapping is attached.
    pub fn has_key_mapping(&self) -> bool {
        self.key_mapping.is_some()
    }

    /// Derive the collection key for an element.
    pub fn key_of(&self, element: &ConfigValue) -> Result<String, ConfigError> {
        match &self.key_mapping {
            Some(mapping) => Ok(mapping(element)),
            None => Err(ConfigError::NoKeyMapping(self.name.clone())),
        }
    }

    /// Check a value assigned to a plain property.
    ///
    /// `Null` is accepted (resets to unset); non-null values must match the
    /// property type and pass the external constraint.
    pub fn check_value(&self, value: &ConfigValue) -> Result<(), ConfigError> {
        if value.is_null() {
            return Ok(());
        }
        self.check_element(value)
    }

    /// Check one collection element: non-null, right type, constraint ok.
    pub fn check_element(&self, element: &ConfigValue) -> Result<(), ConfigError> {
        if element.is_null() {
            return Err(ConfigError::NotNullable {
                property: self.name.clone(),
            });
        }
        if !element.matches(self.value_type) {
            return Err(ConfigError::TypeMismatch {
                property: self.name.clone(),
                expected: self.value_type.name(),
                got: element.kind_name(),
            });
        }
        if let Some(check) = &self.check {
            check(element).map_err(|message| ConfigError::ConstraintViolation {
                property: self.name.clone(),
                message,
            })?;
        }
        Ok(())
    }

    /// Check that `to_add` can join the current list contents once
    /// `to_remove` is taken out, without violating any constraint.
    ///
    /// No-op for an empty `to_add`. With a key mapping attached, added
    /// elements must not collide with each other or with surviving current
    /// elements.
    pub fn check_list_values(
        &self,
        current: &[ConfigValue],
        to_remove: &[ConfigValue],
        to_add: &[ConfigValue],
    ) -> Result<(), ConfigError> {
        if to_add.is_empty() {
            return Ok(());
        }

        for element in to_add {
            self.check_element(element)?;
        }

        if let Some(mapping) = &self.key_mapping {
            let mut removed_left: Vec<&ConfigValue> = to_remove.iter().collect();
            let mut known_keys: Vec<String> = Vec::with_capacity(current.len() + to_add.len());
            for element in current {
                // One removal cancels one occurrence.
                if let Some(pos) = removed_left.iter().position(|r| *r == element) {
                    removed_left.swap_remove(pos);
                    continue;
                }
                known_keys.push(mapping(element));
            }
            for element in to_add {
                let key = mapping(element);
                if known_keys.contains(&key) {
                    return Err(ConfigError::DuplicateKey {
                        property: self.name.clone(),
                        key,
                    });
                }
                known_keys.push(key);
            }
        }
        Ok(())
    }

    /// Check map entries: element type/constraint plus key consistency
    /// against the key mapping (key uniqueness is implicit in the map).
    pub fn check_map_values(&self, entries: &[(String, ConfigValue)]) -> Result<(), ConfigError> {
        for (key, value) in entries {
            self.check_element(value)?;
            if let Some(mapping) = &self.key_mapping {
                let expected = mapping(value);
                if *key != expected {
                    return Err(ConfigError::KeyMismatch {
                        property: self.name.clone(),
                        key: key.clone(),
                        expected,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .field("default", &self.default)
            .field("has_check", &self.check.is_some())
            .field("has_key_mapping", &self.key_mapping.is_some())
            .finish()
    }
}
