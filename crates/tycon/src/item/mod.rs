// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Live configuration instances.
//!
//! A [`ConfigItem`] is one live instance of a configuration type: plain
//! property storage plus one observable collection per list/map property,
//! all wired to the item's listener set. The generic representation
//! ([`GenericItem`]) and every generated implementation expose the same
//! trait surface; callers never see which one they hold.

mod builder;
mod generic;

pub use builder::ItemBuilder;
pub use generic::GenericItem;

use crate::change::{Listener, ListenerHandle};
use crate::descriptor::{ConfigDescriptor, PropertyKind};
use crate::error::ConfigError;
use crate::location::Location;
use crate::observable::{ObservableList, ObservableMap};
use crate::value::ConfigValue;
use std::fmt;
use std::sync::Arc;

/// One live configuration instance.
pub trait ConfigItem: fmt::Debug + Send {
    /// Schema of this instance.
    fn descriptor(&self) -> &Arc<ConfigDescriptor>;

    /// Source location the instance was created from.
    fn location(&self) -> &Location;

    /// Read a plain property.
    fn value(&self, name: &str) -> Result<ConfigValue, ConfigError>;

    /// Replace a plain property: validate, swap, notify, return the old
    /// value.
    fn update(&mut self, name: &str, value: ConfigValue) -> Result<ConfigValue, ConfigError>;

    /// Borrow a list-valued property.
    fn list(&self, name: &str) -> Result<&ObservableList, ConfigError>;

    /// Mutably borrow a list-valued property.
    fn list_mut(&mut self, name: &str) -> Result<&mut ObservableList, ConfigError>;

    /// Borrow a map-valued property.
    fn map(&self, name: &str) -> Result<&ObservableMap, ConfigError>;

    /// Mutably borrow a map-valued property.
    fn map_mut(&mut self, name: &str) -> Result<&mut ObservableMap, ConfigError>;

    /// The item's listener set, for change-listener registration.
    fn listeners(&self) -> &ListenerHandle;

    /// Register a change listener on this instance.
    fn add_listener(&self, listener: Listener) {
        self.listeners().add_listener(listener);
    }
}

/// Content equality across representations: same descriptor name, same
/// property values. Modified flags and locations are not part of it.
pub fn items_equal(a: &dyn ConfigItem, b: &dyn ConfigItem) -> bool {
    if a.descriptor().name() != b.descriptor().name() {
        return false;
    }
    for property in a.descriptor().properties() {
        let name = property.name();
        let same = match property.kind() {
            PropertyKind::Plain => a.value(name).ok() == b.value(name).ok(),
            PropertyKind::List => match (a.list(name), b.list(name)) {
                (Ok(x), Ok(y)) => x == y,
                _ => false,
            },
            PropertyKind::Map => match (a.map(name), b.map(name)) {
                (Ok(x), Ok(y)) => x == y,
                _ => false,
            },
        };
        if !same {
            return false;
        }
    }
    true
}
