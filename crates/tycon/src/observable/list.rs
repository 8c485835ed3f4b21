// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Observable list storage for one list-valued property.

use crate::change::HandlerRef;
use crate::descriptor::PropertyDescriptor;
use crate::error::ConfigError;
use crate::value::ConfigValue;
use std::fmt;
use std::slice;
use std::sync::Arc;

/// Mutable list bound to one property and one change handler.
pub struct ObservableList {
    property: Arc<PropertyDescriptor>,
    handler: HandlerRef,
    items: Vec<ConfigValue>,
    modified: bool,
    revision: u64,
}

impl ObservableList {
    /// Create an empty, unmodified list.
    pub fn new(property: Arc<PropertyDescriptor>, handler: HandlerRef) -> Self {
        Self {
            property,
            handler,
            items: Vec::new(),
            modified: false,
            revision: 0,
        }
    }

    /// The property this list belongs to.
    pub fn property(&self) -> &Arc<PropertyDescriptor> {
        &self.property
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ConfigValue> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[ConfigValue] {
        &self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, ConfigValue> {
        self.items.iter()
    }

    /// Structural revision counter. Inserts and removals bump it;
    /// [`Self::set`] deliberately does not, so a replacement is observable
    /// as exactly one logical change, never as insert-plus-delete.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append one element.
    pub fn push(&mut self, element: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        let index = self.items.len();
        self.insert(index, element)
    }

    /// Insert one element at `index`.
    pub fn insert(
        &mut self,
        index: usize,
        element: impl Into<ConfigValue>,
    ) -> Result<(), ConfigError> {
        let element = element.into();
        self.check_index(index, true)?;
        self.property
            .check_list_values(&self.items, &[], slice::from_ref(&element))?;

        self.items.insert(index, element);
        self.revision += 1;
        self.handler
            .lock()
            .notify_add(&self.property, index, &self.items[index]);
        self.modified = true;
        Ok(())
    }

    /// Append a batch. No-op for an empty batch; the whole batch is
    /// validated before the first element is inserted.
    pub fn extend(&mut self, elements: Vec<ConfigValue>) -> Result<(), ConfigError> {
        let index = self.items.len();
        self.insert_all(index, elements)
    }

    /// Insert a batch at `index`, firing one add notification per element
    /// at increasing indices.
    pub fn insert_all(
        &mut self,
        index: usize,
        elements: Vec<ConfigValue>,
    ) -> Result<(), ConfigError> {
        if elements.is_empty() {
            return Ok(());
        }
        self.check_index(index, true)?;
        self.property.check_list_values(&self.items, &[], &elements)?;

        for (offset, element) in elements.into_iter().enumerate() {
            let at = index + offset;
            self.items.insert(at, element);
            self.revision += 1;
            self.handler
                .lock()
                .notify_add(&self.property, at, &self.items[at]);
        }
        self.modified = true;
        Ok(())
    }

    /// Remove the element at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> Result<ConfigValue, ConfigError> {
        self.check_index(index, false)?;
        self.property
            .check_list_values(&self.items, slice::from_ref(&self.items[index]), &[])?;

        let removed = self.items.remove(index);
        self.revision += 1;
        self.handler
            .lock()
            .notify_remove(&self.property, index, &removed);
        self.modified = true;
        Ok(removed)
    }

    /// Remove the first occurrence of `element`. Returns `false` (and
    /// changes nothing) when absent.
    pub fn remove(&mut self, element: &ConfigValue) -> Result<bool, ConfigError> {
        match self.items.iter().position(|e| e == element) {
            Some(index) => {
                self.remove_at(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every present element of the batch, each with its own
    /// notification. The batch is validated as a whole first.
    pub fn remove_all(&mut self, elements: &[ConfigValue]) -> Result<(), ConfigError> {
        self.property.check_list_values(&self.items, elements, &[])?;
        for element in elements {
            self.remove(element)?;
        }
        Ok(())
    }

    /// Replace the element at `index`, returning the old element.
    ///
    /// Validated as a combined remove-then-add against the same index.
    /// Fires a remove and an add notification for the replacement but does
    /// not bump [`Self::revision`]: a `set` is one logical replacement,
    /// not two structural changes.
    pub fn set(
        &mut self,
        index: usize,
        element: impl Into<ConfigValue>,
    ) -> Result<ConfigValue, ConfigError> {
        let element = element.into();
        self.check_index(index, false)?;
        self.property.check_list_values(
            &self.items,
            slice::from_ref(&self.items[index]),
            slice::from_ref(&element),
        )?;

        let old = std::mem::replace(&mut self.items[index], element);
        {
            let mut handler = self.handler.lock();
            handler.notify_remove(&self.property, index, &old);
            handler.notify_add(&self.property, index, &self.items[index]);
        }
        self.modified = true;
        Ok(old)
    }

    /// Remove all elements, from the end toward the start (keeps the
    /// notified indices stable during removal). No-op when empty.
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        if self.items.is_empty() {
            return Ok(());
        }
        self.property
            .check_list_values(&self.items, &self.items, &[])?;

        while let Some(removed) = self.items.pop() {
            let index = self.items.len();
            self.revision += 1;
            self.handler
                .lock()
                .notify_remove(&self.property, index, &removed);
        }
        self.modified = true;
        Ok(())
    }

    /// Bulk replace: clear, re-add `elements`, then force the modified
    /// flag to exactly `modified` — used when loading parsed state, where
    /// the flag must reflect whether the source specified the value, not
    /// the mechanical clear-plus-add.
    pub fn replace(
        &mut self,
        elements: Vec<ConfigValue>,
        modified: bool,
    ) -> Result<(), ConfigError> {
        // Validate the new contents up front so a rejection leaves the
        // current contents untouched.
        self.property.check_list_values(&[], &[], &elements)?;
        self.clear()?;
        self.insert_all(0, elements)?;
        self.modified = modified;
        Ok(())
    }

    /// Whether the list was structurally changed since construction or the
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

    fn check_index(&self, index: usize, inclusive: bool) -> Result<(), ConfigError> {
        let len = self.items.len();
        let ok = if inclusive { index <= len } else { index < len };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::IndexOutOfBounds {
                property: self.property.name().to_string(),
                index,
                len,
            })
        }
    }
}

/// Content equality; the modified flag and revision are not part of it.
impl PartialEq for ObservableList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl fmt::Debug for ObservableList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("property", &self.property.name())
            .field("items", &self.items)
            .field("modified", &self.modified)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::null_handler;
    use crate::descriptor::{PropertyDescriptor, PropertyType};

    fn string_list() -> ObservableList {
        let property = Arc::new(PropertyDescriptor::list("items", PropertyType::Str));
        ObservableList::new(property, null_handler())
    }

    #[test]
    fn test_push_and_get() {
        let mut list = string_list();
        list.push("a").expect("push a");
        list.push("b").expect("push b");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).and_then(ConfigValue::as_str), Some("a"));
        assert!(list.is_modified());
    }

    #[test]
    fn test_insert_all_empty_is_noop() {
        let mut list = string_list();
        list.extend(Vec::new()).expect("empty extend");
        assert!(list.is_empty());
        assert!(!list.is_modified());
        assert_eq!(list.revision(), 0);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list = string_list();
        list.push("a").expect("push");
        list.mark_unmodified();
        let removed = list.remove(&"missing".into()).expect("remove");
        assert!(!removed);
        assert_eq!(list.len(), 1);
        assert!(!list.is_modified());
    }

    #[test]
    fn test_set_keeps_revision() {
        let mut list = string_list();
        list.push("a").expect("push");
        let before = list.revision();
        let old = list.set(0, "b").expect("set");
        assert_eq!(old.as_str(), Some("a"));
        assert_eq!(list.revision(), before);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_rejection_is_atomic() {
        let property = Arc::new(
            PropertyDescriptor::list("items", PropertyType::Str)
                .with_check(|v| match v.as_str() {
                    Some("bad") => Err("rejected".into()),
                    _ => Ok(()),
                }),
        );
        let mut list = ObservableList::new(property, null_handler());
        list.push("a").expect("push");
        list.mark_unmodified();
        let revision = list.revision();

        // Batch with one bad element: nothing of it is applied.
        let err = list.extend(vec!["b".into(), "bad".into()]);
        assert!(err.is_err());
        assert_eq!(list.len(), 1);
        assert!(!list.is_modified());
        assert_eq!(list.revision(), revision);
    }

    #[test]
    fn test_replace_forces_flag() {
        let mut list = string_list();
        list.push("a").expect("push");
        list.replace(vec!["x".into(), "y".into()], false)
            .expect("replace");
        assert_eq!(list.len(), 2);
        assert!(!list.is_modified());

        list.replace(Vec::new(), true).expect("replace empty");
        assert!(list.is_empty());
        assert!(list.is_modified());
    }
}
