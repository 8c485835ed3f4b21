// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Observable map storage for one map-valued property.

use crate::change::{HandlerRef, MAP_INDEX};
use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::value::ConfigValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Mutable keyed collection bound to one property and one change handler.
///
/// Keys are strings; with a key mapping attached to the property, entry
/// keys must agree with the mapping. Notifications carry the
/// [`MAP_INDEX`] sentinel since maps have no positional order. `BTreeMap`
/// storage keeps iteration and batch-event order deterministic.
pub struct ObservableMap {
    property: Arc<PropertyDescriptor>,
    handler: HandlerRef,
    entries: BTreeMap<String, ConfigValue>,
    modified: bool,
}

impl ObservableMap {
    /// Create an empty, unmodified map.
    pub fn new(property: Arc<PropertyDescriptor>, handler: HandlerRef) -> Self {
        Self {
            property,
            handler,
            entries: BTreeMap::new(),
            modified: false,
        }
    }

    /// The property this map belongs to.
    pub fn property(&self) -> &Arc<PropertyDescriptor> {
        &self.property
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Insert an entry, returning the replaced value if the key existed.
    ///
    /// Replacing fires a remove notification for the old value before the
    /// add notification for the new one: a put is a remove-plus-add at the
    /// sentinel index.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        let key = key.into();
        let value = value.into();
        self.property
            .check_map_values(std::slice::from_ref(&(key.clone(), value.clone())))?;

        let old = self.entries.insert(key.clone(), value);
        {
            let mut handler = self.handler.lock();
            if let Some(old) = &old {
                handler.notify_remove(&self.property, MAP_INDEX, old);
            }
            handler.notify_add(&self.property, MAP_INDEX, &self.entries[&key]);
        }
        self.modified = true;
        Ok(old)
    }

    /// Insert a value under the key derived by the property's key mapping.
    pub fn insert_value(
        &mut self,
        value: impl Into<ConfigValue>,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        let value = value.into();
        let key = self.property.key_of(&value)?;
        self.insert(key, value)
    }

    /// Insert a batch of entries. No-op for an empty batch; the whole
    /// batch is validated before the first entry is applied.
    pub fn extend(&mut self, entries: Vec<(String, ConfigValue)>) -> Result<(), ConfigError> {
        if entries.is_empty() {
            return Ok(());
        }
        self.property.check_map_values(&entries)?;

        for (key, value) in entries {
            let old = self.entries.insert(key.clone(), value);
            let mut handler = self.handler.lock();
            if let Some(old) = &old {
                handler.notify_remove(&self.property, MAP_INDEX, old);
            }
            handler.notify_add(&self.property, MAP_INDEX, &self.entries[&key]);
        }
        self.modified = true;
        Ok(())
    }

    /// Remove an entry. Returns `None` (and changes nothing) for an
    /// absent key.
    pub fn remove(&mut self, key: &str) -> Result<Option<ConfigValue>, ConfigError> {
        match self.entries.remove(key) {
            Some(removed) => {
                self.handler
                    .lock()
                    .notify_remove(&self.property, MAP_INDEX, &removed);
                self.modified = true;
                Ok(Some(removed))
            }
            None => Ok(None),
        }
    }

    /// Remove all entries, one remove notification per entry. No-op when
    /// empty.
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Ok(());
        }
        while let Some((_, removed)) = self.entries.pop_first() {
            self.handler
                .lock()
                .notify_remove(&self.property, MAP_INDEX, &removed);
        }
        self.modified = true;
        Ok(())
    }

    /// Bulk replace: clear, re-add `entries`, then force the modified flag
    /// to exactly `modified`.
    pub fn replace(
        &mut self,
        entries: Vec<(String, ConfigValue)>,
        modified: bool,
    ) -> Result<(), ConfigError> {
        self.property.check_map_values(&entries)?;
        self.clear()?;
        self.extend(entries)?;
        self.modified = modified;
        Ok(())
    }

    /// Whether the map was structurally changed since construction or the
    /// last [`Self::mark_unmodified`].
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Force the modified flag.
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Reset the modified flag without altering content.
    pub fn mark_unmodified(&mut self) {
        self.modified = false;
    }
}

/// Content equality; the modified flag is not part of it.
impl PartialEq for ObservableMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for ObservableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableMap")
            .field("property", &self.property.name())
            .field("entries", &self.entries)
            .field("modified", &self.modified)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::null_handler;
    use crate::descriptor::{PropertyDescriptor, PropertyType};

    fn string_map() -> ObservableMap {
        let property = Arc::new(PropertyDescriptor::map("entries", PropertyType::Str));
        ObservableMap::new(property, null_handler())
    }

    #[test]
    fn test_insert_and_replace_entry() {
        let mut map = string_map();
        assert_eq!(map.insert("k", "v1").expect("insert"), None);
        let old = map.insert("k", "v2").expect("replace");
        assert_eq!(old.and_then(|v| v.as_str().map(String::from)), Some("v1".into()));
        assert_eq!(map.len(), 1);
        assert!(map.is_modified());
    }

    #[test]
    fn test_insert_value_derives_key() {
        let property = Arc::new(
            PropertyDescriptor::map("entries", PropertyType::Str)
                .with_key_mapping(|v| v.as_str().unwrap_or_default().to_uppercase()),
        );
        let mut map = ObservableMap::new(property, null_handler());
        map.insert_value("abc").expect("insert");
        assert!(map.contains_key("ABC"));

        // Explicit keys must agree with the mapping.
        assert!(matches!(
            map.insert("wrong", "abc"),
            Err(ConfigError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut map = string_map();
        map.insert("k", "v").expect("insert");
        map.mark_unmodified();
        assert_eq!(map.remove("missing").expect("remove"), None);
        assert!(!map.is_modified());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_batch_rejection_is_atomic() {
        let property = Arc::new(
            PropertyDescriptor::map("entries", PropertyType::Str)
                .with_check(|v| match v.as_str() {
                    Some("bad") => Err("rejected".into()),
                    _ => Ok(()),
                }),
        );
        let mut map = ObservableMap::new(property, null_handler());
        let err = map.extend(vec![
            ("a".into(), "ok".into()),
            ("b".into(), "bad".into()),
        ]);
        assert!(err.is_err());
        assert!(map.is_empty());
        assert!(!map.is_modified());
    }

    #[test]
    fn test_replace_forces_flag() {
        let mut map = string_map();
        map.insert("k", "v").expect("insert");
        map.replace(vec![("x".into(), "y".into())], false)
            .expect("replace");
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("x"));
        assert!(!map.is_modified());
    }
}
