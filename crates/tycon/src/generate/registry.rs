// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide registry of linked implementations.
//!
//! Generated code calls [`register_impl`] from its `register()` function
//! (typically at host startup); the compiler calls [`lookup_impl`] to
//! decide between "already linked" and "emit for the next build".

use crate::descriptor::ConfigDescriptor;
use crate::error::ConfigError;
use crate::item::{ConfigItem, ItemBuilder};
use crate::location::Location;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::OnceLock;

/// Standard default constructor of a generated implementation.
pub type CtorNew = fn(&Arc<ConfigDescriptor>, Location) -> Box<dyn ConfigItem>;

/// Standard copy constructor of a generated implementation.
pub type CtorCopy =
    fn(&Arc<ConfigDescriptor>, &ItemBuilder) -> Result<Box<dyn ConfigItem>, ConfigError>;

/// The two standard constructors of one linked implementation.
#[derive(Debug, Clone, Copy)]
pub struct ImplBinary {
    pub ctor_new: CtorNew,
    pub ctor_copy: CtorCopy,
}

static REGISTRY: OnceLock<DashMap<String, ImplBinary>> = OnceLock::new();

fn registry() -> &'static DashMap<String, ImplBinary> {
    REGISTRY.get_or_init(DashMap::new)
}

/// Register a linked implementation under its deterministic name.
/// Re-registration replaces the previous entry.
pub fn register_impl(impl_name: impl Into<String>, ctor_new: CtorNew, ctor_copy: CtorCopy) {
    let impl_name = impl_name.into();
    log::debug!("[registry] registering implementation '{}'", impl_name);
    registry().insert(
        impl_name,
        ImplBinary {
            ctor_new,
            ctor_copy,
        },
    );
}

/// Look up a linked implementation by its deterministic name.
pub fn lookup_impl(impl_name: &str) -> Option<ImplBinary> {
    registry().get(impl_name).map(|entry| *entry.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::GenericItem;

    fn stub_new(descriptor: &Arc<ConfigDescriptor>, location: Location) -> Box<dyn ConfigItem> {
        Box::new(GenericItem::new(descriptor.clone(), location))
    }

    fn stub_copy(
        descriptor: &Arc<ConfigDescriptor>,
        builder: &ItemBuilder,
    ) -> Result<Box<dyn ConfigItem>, ConfigError> {
        Ok(Box::new(GenericItem::from_builder(
            descriptor.clone(),
            builder,
        )?))
    }

    #[test]
    fn test_register_and_lookup() {
        assert!(lookup_impl("registry.test.Absent").is_none());
        register_impl("registry.test.Present", stub_new, stub_copy);
        let binary = lookup_impl("registry.test.Present").expect("registered");

        let descriptor = ConfigDescriptor::builder("registry.test.Type")
            .build()
            .expect("descriptor");
        let item = (binary.ctor_new)(&descriptor, Location::none());
        assert_eq!(item.descriptor().name(), "registry.test.Type");
    }
}
