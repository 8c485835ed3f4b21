// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Change-handler protocol.
//!
//! The sole channel through which observable collections report structural
//! changes back to their owning item. Validation happens *before* any
//! notification; handlers must not reject values and return nothing.
//!
//! An item owns its collections; the collections hold a shared, non-owning
//! [`HandlerRef`] to the item's listener set, used purely for notification.

use crate::descriptor::PropertyDescriptor;
use crate::value::ConfigValue;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Sentinel index for map-valued properties, which have no positional
/// order.
pub const MAP_INDEX: usize = usize::MAX;

/// Callback contract implemented by every configuration item.
pub trait ChangeHandler {
    /// A plain property was replaced.
    fn notify_update(&mut self, property: &PropertyDescriptor, old: &ConfigValue, new: &ConfigValue);

    /// An element was added at `index` (or [`MAP_INDEX`] for maps).
    fn notify_add(&mut self, property: &PropertyDescriptor, index: usize, element: &ConfigValue);

    /// An element was removed from `index` (or [`MAP_INDEX`] for maps).
    fn notify_remove(&mut self, property: &PropertyDescriptor, index: usize, element: &ConfigValue);
}

/// Shared, non-owning handle to an item's change handler.
pub type HandlerRef = Arc<Mutex<dyn ChangeHandler + Send>>;

/// A change event as delivered to registered listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEvent {
    Update {
        property: String,
        old: ConfigValue,
        new: ConfigValue,
    },
    Add {
        property: String,
        index: usize,
        element: ConfigValue,
    },
    Remove {
        property: String,
        index: usize,
        element: ConfigValue,
    },
}

impl PropertyEvent {
    /// Name of the property the event belongs to.
    pub fn property(&self) -> &str {
        match self {
            Self::Update { property, .. }
            | Self::Add { property, .. }
            | Self::Remove { property, .. } => property,
        }
    }
}

/// Listener callback registered on an item.
pub type Listener = Box<dyn Fn(&PropertyEvent) + Send>;

/// The standard change handler of an item: fans events out to registered
/// listeners.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Listener>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn dispatch(&self, event: &PropertyEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl ChangeHandler for ListenerSet {
    fn notify_update(
        &mut self,
        property: &PropertyDescriptor,
        old: &ConfigValue,
        new: &ConfigValue,
    ) {
        self.dispatch(&PropertyEvent::Update {
            property: property.name().to_string(),
            old: old.clone(),
            new: new.clone(),
        });
    }

    fn notify_add(&mut self, property: &PropertyDescriptor, index: usize, element: &ConfigValue) {
        self.dispatch(&PropertyEvent::Add {
            property: property.name().to_string(),
            index,
            element: element.clone(),
        });
    }

    fn notify_remove(&mut self, property: &PropertyDescriptor, index: usize, element: &ConfigValue) {
        self.dispatch(&PropertyEvent::Remove {
            property: property.name().to_string(),
            index,
            element: element.clone(),
        });
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Owning handle to an item's [`ListenerSet`].
///
/// The item keeps one `ListenerHandle`; its collections receive coerced
/// [`HandlerRef`] clones for notification only.
#[derive(Clone, Default)]
pub struct ListenerHandle(Arc<Mutex<ListenerSet>>);

impl ListenerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notification handle handed to collections.
    pub fn handler(&self) -> HandlerRef {
        let handler: HandlerRef = self.0.clone();
        handler
    }

    /// Register a listener on the owning item.
    pub fn add_listener(&self, listener: Listener) {
        self.0.lock().add(listener);
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListenerHandle").field(&*self.0.lock()).finish()
    }
}

/// Handler that discards all notifications (builder contexts).
#[derive(Debug, Default)]
pub struct NullHandler;

impl ChangeHandler for NullHandler {
    fn notify_update(&mut self, _: &PropertyDescriptor, _: &ConfigValue, _: &ConfigValue) {}
    fn notify_add(&mut self, _: &PropertyDescriptor, _: usize, _: &ConfigValue) {}
    fn notify_remove(&mut self, _: &PropertyDescriptor, _: usize, _: &ConfigValue) {}
}

/// A [`HandlerRef`] that discards all notifications.
pub fn null_handler() -> HandlerRef {
    Arc::new(Mutex::new(NullHandler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PropertyDescriptor, PropertyType};

    #[test]
    fn test_listener_dispatch() {
        let handle = ListenerHandle::new();
        let seen: Arc<Mutex<Vec<PropertyEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        handle.add_listener(Box::new(move |event| sink.lock().push(event.clone())));

        let property = PropertyDescriptor::plain("port", PropertyType::Int);
        handle
            .handler()
            .lock()
            .notify_update(&property, &ConfigValue::I64(0), &ConfigValue::I64(8080));

        let events = seen.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].property(), "port");
    }

    #[test]
    fn test_null_handler_ignores() {
        let handler = null_handler();
        let property = PropertyDescriptor::list("items", PropertyType::Str);
        handler
            .lock()
            .notify_add(&property, 0, &ConfigValue::from("a"));
    }
}
