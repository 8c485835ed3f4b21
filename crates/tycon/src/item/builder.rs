// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Staged property values for copy construction.

use crate::descriptor::{ConfigDescriptor, PropertyDescriptor, PropertyKind};
use crate::error::ConfigError;
use crate::location::Location;
use crate::value::ConfigValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Staged value for one property.
#[derive(Debug, Clone)]
enum Staged {
    Plain(ConfigValue),
    List(Vec<ConfigValue>),
    Map(Vec<(String, ConfigValue)>),
}

/// Collects explicitly-set property values for `create_copy`.
///
/// Values are type-checked at staging time, so a builder handed to a
/// factory holds only values its descriptor accepts; the factory re-runs
/// collection constraints only where staged batches interact (keyed
/// uniqueness). A property never staged keeps its declared default, and
/// the resulting collection starts unmodified.
pub struct ItemBuilder {
    descriptor: Arc<ConfigDescriptor>,
    location: Location,
    staged: HashMap<String, Staged>,
}

impl ItemBuilder {
    pub fn new(descriptor: Arc<ConfigDescriptor>) -> Self {
        Self {
            descriptor,
            location: Location::none(),
            staged: HashMap::new(),
        }
    }

    /// Attach the source location for the instance to be built.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn descriptor(&self) -> &Arc<ConfigDescriptor> {
        &self.descriptor
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    fn property(&self, name: &str) -> Result<&Arc<PropertyDescriptor>, ConfigError> {
        self.descriptor
            .property(name)
            .ok_or_else(|| ConfigError::NoSuchProperty(name.to_string()))
    }

    /// Stage a plain property value.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<(), ConfigError> {
        let property = self.property(name)?;
        if property.kind() != PropertyKind::Plain {
            return Err(ConfigError::NotPlain(name.to_string()));
        }
        let value = value.into();
        property.check_value(&value)?;
        self.staged.insert(name.to_string(), Staged::Plain(value));
        Ok(())
    }

    /// Append an element to a staged list property.
    pub fn push(
        &mut self,
        name: &str,
        element: impl Into<ConfigValue>,
    ) -> Result<(), ConfigError> {
        let property = self.property(name)?.clone();
        if property.kind() != PropertyKind::List {
            return Err(ConfigError::NotAList(name.to_string()));
        }
        let element = element.into();
        let entry = self
            .staged
            .entry(name.to_string())
            .or_insert_with(|| Staged::List(Vec::new()));
        match entry {
            Staged::List(elements) => {
                property.check_list_values(elements, &[], std::slice::from_ref(&element))?;
                elements.push(element);
                Ok(())
            }
            _ => Err(ConfigError::NotAList(name.to_string())),
        }
    }

    /// Stage an entry of a map property. Re-staging a key replaces the
    /// staged value.
    pub fn put(
        &mut self,
        name: &str,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Result<(), ConfigError> {
        let property = self.property(name)?.clone();
        if property.kind() != PropertyKind::Map {
            return Err(ConfigError::NotAMap(name.to_string()));
        }
        let key = key.into();
        let value = value.into();
        property.check_map_values(std::slice::from_ref(&(key.clone(), value.clone())))?;
        let entry = self
            .staged
            .entry(name.to_string())
            .or_insert_with(|| Staged::Map(Vec::new()));
        match entry {
            Staged::Map(entries) => {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = value,
                    None => entries.push((key, value)),
                }
                Ok(())
            }
            _ => Err(ConfigError::NotAMap(name.to_string())),
        }
    }

    /// Stage a map entry under the key derived by the property's key
    /// mapping.
    pub fn put_value(
        &mut self,
        name: &str,
        value: impl Into<ConfigValue>,
    ) -> Result<(), ConfigError> {
        let value = value.into();
        let key = self.property(name)?.key_of(&value)?;
        self.put(name, key, value)
    }

    /// Whether the property was explicitly staged.
    pub fn is_set(&self, name: &str) -> bool {
        self.staged.contains_key(name)
    }

    /// Effective plain value: staged if set, declared default otherwise.
    pub fn plain_value(&self, property: &PropertyDescriptor) -> ConfigValue {
        match self.staged.get(property.name()) {
            Some(Staged::Plain(value)) => value.clone(),
            _ => property.default_value(),
        }
    }

    /// Staged list elements; empty when the property was never staged.
    pub fn list_values(&self, name: &str) -> &[ConfigValue] {
        match self.staged.get(name) {
            Some(Staged::List(elements)) => elements,
            _ => &[],
        }
    }

    /// Staged map entries; empty when the property was never staged.
    pub fn map_entries(&self, name: &str) -> &[(String, ConfigValue)] {
        match self.staged.get(name) {
            Some(Staged::Map(entries)) => entries,
            _ => &[],
        }
    }
}

impl fmt::Debug for ItemBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemBuilder")
            .field("descriptor", &self.descriptor.name())
            .field("location", &self.location)
            .field("staged", &self.staged.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PropertyDescriptor, PropertyType};

    fn descriptor() -> Arc<ConfigDescriptor> {
        ConfigDescriptor::builder("example.Server")
            .property(PropertyDescriptor::plain("port", PropertyType::Int).with_default(8080i64))
            .property(PropertyDescriptor::list("hosts", PropertyType::Str))
            .property(PropertyDescriptor::map("labels", PropertyType::Str))
            .build()
            .expect("descriptor")
    }

    #[test]
    fn test_staging_is_type_checked() {
        let mut builder = ItemBuilder::new(descriptor());
        assert!(builder.set("port", 9000i64).is_ok());
        assert!(matches!(
            builder.set("port", "nine thousand"),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!(matches!(
            builder.set("hosts", "a"),
            Err(ConfigError::NotPlain(_))
        ));
        assert!(matches!(
            builder.push("port", 1i64),
            Err(ConfigError::NotAList(_))
        ));
        assert!(matches!(
            builder.set("missing", 1i64),
            Err(ConfigError::NoSuchProperty(_))
        ));
    }

    #[test]
    fn test_unstaged_falls_back_to_default() {
        let builder = ItemBuilder::new(descriptor());
        let desc = builder.descriptor().clone();
        let port = desc.property("port").expect("port");
        assert_eq!(builder.plain_value(port), ConfigValue::I64(8080));
        assert!(!builder.is_set("port"));
        assert!(builder.list_values("hosts").is_empty());
    }

    #[test]
    fn test_put_replaces_staged_key() {
        let mut builder = ItemBuilder::new(descriptor());
        builder.put("labels", "env", "dev").expect("put");
        builder.put("labels", "env", "prod").expect("put");
        assert_eq!(builder.map_entries("labels").len(), 1);
        assert_eq!(
            builder.map_entries("labels")[0].1,
            ConfigValue::from("prod")
        );
    }
}
