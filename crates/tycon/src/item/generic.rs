// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic, slot-backed item representation.
//!
//! Works for every descriptor without generated code: one slot per
//! property, indexed in descriptor order. The fallback whenever no
//! compiled implementation exists, and the mandatory representation for
//! no-generation types.

use crate::change::ListenerHandle;
use crate::descriptor::{ConfigDescriptor, PropertyDescriptor, PropertyKind};
use crate::error::ConfigError;
use crate::item::{ConfigItem, ItemBuilder};
use crate::location::Location;
use crate::observable::{ObservableList, ObservableMap};
use crate::value::ConfigValue;
use std::fmt;
use std::sync::Arc;

/// Storage for one property.
#[derive(Debug, PartialEq)]
enum Slot {
    Plain(ConfigValue),
    List(ObservableList),
    Map(ObservableMap),
}

/// Slot-backed implementation of [`ConfigItem`].
pub struct GenericItem {
    descriptor: Arc<ConfigDescriptor>,
    location: Location,
    listeners: ListenerHandle,
    // Parallel to descriptor.properties().
    slots: Vec<Slot>,
}

impl GenericItem {
    /// Default instance: plain properties at their declared defaults,
    /// collections empty and unmodified.
    pub fn new(descriptor: Arc<ConfigDescriptor>, location: Location) -> Self {
        let listeners = ListenerHandle::new();
        let slots = descriptor
            .properties()
            .iter()
            .map(|property| Self::default_slot(property, &listeners))
            .collect();
        Self {
            descriptor,
            location,
            listeners,
            slots,
        }
    }

    /// Copy construction: explicitly-set builder values win, everything
    /// else defaults; a collection's modified flag reflects whether the
    /// builder staged the property.
    pub fn from_builder(
        descriptor: Arc<ConfigDescriptor>,
        builder: &ItemBuilder,
    ) -> Result<Self, ConfigError> {
        let listeners = ListenerHandle::new();
        let mut slots = Vec::with_capacity(descriptor.properties().len());
        for property in descriptor.properties() {
            let name = property.name();
            let slot = match property.kind() {
                PropertyKind::Plain => Slot::Plain(builder.plain_value(property)),
                PropertyKind::List => {
                    let mut list = ObservableList::new(property.clone(), listeners.handler());
                    list.replace(builder.list_values(name).to_vec(), builder.is_set(name))?;
                    Slot::List(list)
                }
                PropertyKind::Map => {
                    let mut map = ObservableMap::new(property.clone(), listeners.handler());
                    map.replace(builder.map_entries(name).to_vec(), builder.is_set(name))?;
                    Slot::Map(map)
                }
            };
            slots.push(slot);
        }
        Ok(Self {
            descriptor,
            location: builder.location().clone(),
            listeners,
            slots,
        })
    }

    fn default_slot(property: &Arc<PropertyDescriptor>, listeners: &ListenerHandle) -> Slot {
        match property.kind() {
            PropertyKind::Plain => Slot::Plain(property.default_value()),
            PropertyKind::List => {
                Slot::List(ObservableList::new(property.clone(), listeners.handler()))
            }
            PropertyKind::Map => {
                Slot::Map(ObservableMap::new(property.clone(), listeners.handler()))
            }
        }
    }

    fn slot(&self, name: &str) -> Result<(&Arc<PropertyDescriptor>, &Slot), ConfigError> {
        let index = self
            .descriptor
            .property_index(name)
            .ok_or_else(|| ConfigError::NoSuchProperty(name.to_string()))?;
        Ok((&self.descriptor.properties()[index], &self.slots[index]))
    }

    fn slot_mut(
        &mut self,
        name: &str,
    ) -> Result<(&Arc<PropertyDescriptor>, &mut Slot), ConfigError> {
        let index = self
            .descriptor
            .property_index(name)
            .ok_or_else(|| ConfigError::NoSuchProperty(name.to_string()))?;
        Ok((&self.descriptor.properties()[index], &mut self.slots[index]))
    }
}

impl ConfigItem for GenericItem {
    fn descriptor(&self) -> &Arc<ConfigDescriptor> {
        &self.descriptor
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn value(&self, name: &str) -> Result<ConfigValue, ConfigError> {
        match self.slot(name)? {
            (_, Slot::Plain(value)) => Ok(value.clone()),
            _ => Err(ConfigError::NotPlain(name.to_string())),
        }
    }

    fn update(&mut self, name: &str, value: ConfigValue) -> Result<ConfigValue, ConfigError> {
        let listeners = self.listeners.clone();
        let (property, slot) = self.slot_mut(name)?;
        match slot {
            Slot::Plain(current) => {
                property.check_value(&value)?;
                let old = std::mem::replace(current, value.clone());
                listeners
                    .handler()
                    .lock()
                    .notify_update(property, &old, &value);
                Ok(old)
            }
            _ => Err(ConfigError::NotPlain(name.to_string())),
        }
    }

    fn list(&self, name: &str) -> Result<&ObservableList, ConfigError> {
        match self.slot(name)? {
            (_, Slot::List(list)) => Ok(list),
            _ => Err(ConfigError::NotAList(name.to_string())),
        }
    }

    fn list_mut(&mut self, name: &str) -> Result<&mut ObservableList, ConfigError> {
        match self.slot_mut(name)? {
            (_, Slot::List(list)) => Ok(list),
            _ => Err(ConfigError::NotAList(name.to_string())),
        }
    }

    fn map(&self, name: &str) -> Result<&ObservableMap, ConfigError> {
        match self.slot(name)? {
            (_, Slot::Map(map)) => Ok(map),
            _ => Err(ConfigError::NotAMap(name.to_string())),
        }
    }

    fn map_mut(&mut self, name: &str) -> Result<&mut ObservableMap, ConfigError> {
        match self.slot_mut(name)? {
            (_, Slot::Map(map)) => Ok(map),
            _ => Err(ConfigError::NotAMap(name.to_string())),
        }
    }

    fn listeners(&self) -> &ListenerHandle {
        &self.listeners
    }
}

/// Content equality: descriptor name plus property values. Modified flags
/// and locations do not participate.
impl PartialEq for GenericItem {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name() == other.descriptor.name() && self.slots == other.slots
    }
}

impl fmt::Debug for GenericItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericItem")
            .field("descriptor", &self.descriptor.name())
            .field("location", &self.location)
            .field("slots", &self.slots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyType;

    fn descriptor() -> Arc<ConfigDescriptor> {
        ConfigDescriptor::builder("example.Server")
            .property(PropertyDescriptor::plain("port", PropertyType::Int).with_default(8080i64))
            .property(PropertyDescriptor::plain("host", PropertyType::Str))
            .property(PropertyDescriptor::list("aliases", PropertyType::Str))
            .build()
            .expect("descriptor")
    }

    #[test]
    fn test_default_instance() {
        let item = GenericItem::new(descriptor(), Location::none());
        assert_eq!(item.value("port").expect("port"), ConfigValue::I64(8080));
        assert_eq!(
            item.value("host").expect("host"),
            ConfigValue::String(String::new())
        );
        let aliases = item.list("aliases").expect("aliases");
        assert!(aliases.is_empty());
        assert!(!aliases.is_modified());
    }

    #[test]
    fn test_update_notifies_and_returns_old() {
        let mut item = GenericItem::new(descriptor(), Location::none());
        let seen: Arc<parking_lot::Mutex<Vec<crate::change::PropertyEvent>>> = Default::default();
        let sink = seen.clone();
        item.add_listener(Box::new(move |event| sink.lock().push(event.clone())));

        let old = item
            .update("port", ConfigValue::I64(9000))
            .expect("update");
        assert_eq!(old, ConfigValue::I64(8080));
        assert_eq!(item.value("port").expect("port"), ConfigValue::I64(9000));
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_update_rejects_wrong_type() {
        let mut item = GenericItem::new(descriptor(), Location::none());
        assert!(matches!(
            item.update("port", ConfigValue::from("x")),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!(matches!(
            item.update("aliases", ConfigValue::from("x")),
            Err(ConfigError::NotPlain(_))
        ));
    }

    #[test]
    fn test_from_builder_set_wins_over_default() {
        let desc = descriptor();
        let mut builder = ItemBuilder::new(desc.clone());
        builder.set("host", "db1").expect("set");
        builder.push("aliases", "primary").expect("push");

        let item = GenericItem::from_builder(desc, &builder).expect("copy");
        assert_eq!(item.value("port").expect("port"), ConfigValue::I64(8080));
        assert_eq!(item.value("host").expect("host"), ConfigValue::from("db1"));
        let aliases = item.list("aliases").expect("aliases");
        assert_eq!(aliases.len(), 1);
        assert!(aliases.is_modified());
    }

    #[test]
    fn test_equality_ignores_modified_flag() {
        let desc = descriptor();
        let mut a = GenericItem::new(desc.clone(), Location::none());
        let b = GenericItem::new(desc, Location::none());
        assert_eq!(a, b);

        a.list_mut("aliases").expect("list").push("x").expect("push");
        assert_ne!(a, b);

        a.list_mut("aliases")
            .expect("list")
            .remove(&ConfigValue::from("x"))
            .expect("remove");
        // Content is back to equal although the modified flag differs.
        assert!(a.list("aliases").expect("list").is_modified());
        assert_eq!(a, b);
    }
}
