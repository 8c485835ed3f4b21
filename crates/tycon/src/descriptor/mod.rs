// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configuration type descriptors.
//!
//! A [`ConfigDescriptor`] is the immutable schema of one configuration
//! type: its ordered, unique-named properties, its super-descriptors
//! (an acyclic inheritance graph) and the marker that forces the generic
//! representation. Descriptors are created once per type and shared via
//! `Arc` for the process lifetime.

mod property;

pub use property::{ElementCheck, KeyMapping, PropertyDescriptor, PropertyKind, PropertyType};

use crate::error::ConfigError;
use std::collections::HashMap;
use std::sync::Arc;

/// Schema for one configuration type.
#[derive(Debug)]
pub struct ConfigDescriptor {
    name: String,
    supers: Vec<Arc<ConfigDescriptor>>,
    properties: Vec<Arc<PropertyDescriptor>>,
    index: HashMap<String, usize>,
    no_generation: bool,
}

impl ConfigDescriptor {
    /// Start building a descriptor.
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(name)
    }

    /// Qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Super-descriptors, in declaration order.
    pub fn supers(&self) -> &[Arc<ConfigDescriptor>] {
        &self.supers
    }

    /// All properties in resolved order: inherited first, then own;
    /// a redeclaration overrides the inherited property in place.
    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.properties
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// Index of a property within [`Self::properties`].
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether implementation generation is disabled for this type.
    pub fn is_no_generation(&self) -> bool {
        self.no_generation
    }

    /// Deterministic implementation type name, usable as a Rust identifier
    /// and as the generation cache key.
    pub fn impl_name(&self) -> String {
        let lead = self
            .name
            .rsplit(|c: char| !c.is_alphanumeric() && c != '_')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("Config");
        // A leading digit would not lex as an identifier.
        let prefix = if lead.starts_with(|c: char| c.is_ascii_digit()) {
            "T"
        } else {
            ""
        };
        format!("{prefix}{}Impl{:08X}", lead, fnv1a(&self.name))
    }
}

/// Compute FNV-1a hash (32-bit) for the implementation name.
fn fnv1a(s: &str) -> u32 {
    let mut hash = 2_166_136_261_u32;
    for byte in s.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

/// Builder for [`ConfigDescriptor`] instances.
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    name: String,
    supers: Vec<Arc<ConfigDescriptor>>,
    own: Vec<PropertyDescriptor>,
    no_generation: bool,
}

impl DescriptorBuilder {
    /// Create a builder for the given type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Inherit from another descriptor. The graph stays acyclic by
    /// construction: a super must be fully built before it can be named.
    #[must_use]
    pub fn extends(mut self, descriptor: Arc<ConfigDescriptor>) -> Self {
        self.supers.push(descriptor);
        self
    }

    /// Declare a property.
    #[must_use]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.own.push(property);
        self
    }

    /// Mark the type: never generate an implementation, always use the
    /// generic representation.
    #[must_use]
    pub fn no_generation(mut self) -> Self {
        self.no_generation = true;
        self
    }

    /// Resolve inheritance and validate name uniqueness.
    pub fn build(self) -> Result<Arc<ConfigDescriptor>, ConfigError> {
        let mut properties: Vec<Arc<PropertyDescriptor>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut inherited: std::collections::HashSet<String> = std::collections::HashSet::new();

        // Inherited properties keep their inherited position.
        for sup in &self.supers {
            for property in sup.properties() {
                if !index.contains_key(property.name()) {
                    index.insert(property.name().to_string(), properties.len());
                    inherited.insert(property.name().to_string());
                    properties.push(property.clone());
                }
            }
        }

        for property in self.own {
            let name = property.name().to_string();
            match index.get(&name).copied() {
                // Redeclaration overrides the inherited property in place.
                Some(i) if inherited.remove(&name) => {
                    properties[i] = Arc::new(property);
                }
                Some(_) => {
                    return Err(ConfigError::DuplicateProperty {
                        descriptor: self.name,
                        property: name,
                    });
                }
                None => {
                    index.insert(name, properties.len());
                    properties.push(Arc::new(property));
                }
            }
        }

        Ok(Arc::new(ConfigDescriptor {
            name: self.name,
            supers: self.supers,
            properties,
            index,
            no_generation: self.no_generation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_order_and_lookup() {
        let desc = ConfigDescriptor::builder("example.Server")
            .property(PropertyDescriptor::plain("host", PropertyType::Str))
            .property(PropertyDescriptor::plain("port", PropertyType::Int).with_default(8080i64))
            .build()
            .expect("build");

        assert_eq!(desc.properties().len(), 2);
        assert_eq!(desc.property_index("host"), Some(0));
        assert_eq!(desc.property_index("port"), Some(1));
        assert!(desc.property("missing").is_none());
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let result = ConfigDescriptor::builder("example.Bad")
            .property(PropertyDescriptor::plain("x", PropertyType::Int))
            .property(PropertyDescriptor::plain("x", PropertyType::Int))
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateProperty { .. })));
    }

    #[test]
    fn test_inheritance_order_and_override() {
        let base = ConfigDescriptor::builder("example.Base")
            .property(PropertyDescriptor::plain("name", PropertyType::Str))
            .property(PropertyDescriptor::plain("retries", PropertyType::Int).with_default(1i64))
            .build()
            .expect("base");

        let derived = ConfigDescriptor::builder("example.Derived")
            .extends(base.clone())
            .property(PropertyDescriptor::plain("retries", PropertyType::Int).with_default(5i64))
            .property(PropertyDescriptor::plain("extra", PropertyType::Bool))
            .build()
            .expect("derived");

        // Inherited position is kept, override takes effect.
        assert_eq!(derived.property_index("name"), Some(0));
        assert_eq!(derived.property_index("retries"), Some(1));
        assert_eq!(derived.property_index("extra"), Some(2));
        assert_eq!(
            derived
                .property("retries")
                .expect("retries")
                .default_value(),
            crate::value::ConfigValue::I64(5)
        );
        assert_eq!(derived.supers().len(), 1);
    }

    #[test]
    fn test_impl_name_is_deterministic_ident() {
        let a = ConfigDescriptor::builder("example.Server")
            .build()
            .expect("a");
        let b = ConfigDescriptor::builder("example.Server")
            .build()
            .expect("b");
        assert_eq!(a.impl_name(), b.impl_name());
        assert!(a.impl_name().starts_with("ServerImpl"));
        assert!(a.impl_name().chars().all(|c| c.is_alphanumeric() || c == '_'));

        let other = ConfigDescriptor::builder("other.Server").build().expect("c");
        assert_ne!(a.impl_name(), other.impl_name());
    }

    #[test]
    fn test_impl_name_survives_digit_leading_segment() {
        let descriptor = ConfigDescriptor::builder("example.9Lives")
            .build()
            .expect("descriptor");
        let name = descriptor.impl_name();
        assert!(name.starts_with("T9LivesImpl"));
        assert!(!name.starts_with(|c: char| c.is_ascii_digit()));
    }
}
