// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Item factories: two instantiation strategies behind one surface.
//!
//! The compiled strategy dispatches to a generated implementation's
//! standard constructors; the generic strategy builds slot-backed items
//! from the descriptor alone. Selection and fallback live in
//! [`FactoryContext`]; callers only ever see [`ItemFactory`].

mod compiled;
mod context;
mod generic;

pub use compiled::CompiledFactory;
pub use context::FactoryContext;
pub use generic::GenericFactory;

use crate::descriptor::ConfigDescriptor;
use crate::error::ConfigError;
use crate::item::{ConfigItem, ItemBuilder};
use crate::location::Location;
use std::sync::Arc;

/// Instantiation strategy for one descriptor.
#[derive(Debug)]
pub enum ItemFactory {
    Compiled(CompiledFactory),
    Generic(GenericFactory),
}

impl ItemFactory {
    pub fn descriptor(&self) -> &Arc<ConfigDescriptor> {
        match self {
            Self::Compiled(f) => f.descriptor(),
            Self::Generic(f) => f.descriptor(),
        }
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, Self::Compiled(_))
    }

    /// Default instance. Cannot fail: a linked implementation that cannot
    /// instantiate its own descriptor is a framework bug and panics.
    pub fn create_new(&self, location: Location) -> Box<dyn ConfigItem> {
        match self {
            Self::Compiled(f) => f.create_new(location),
            Self::Generic(f) => f.create_new(location),
        }
    }

    /// Instance from explicitly-staged builder values.
    pub fn create_copy(&self, builder: &ItemBuilder) -> Result<Box<dyn ConfigItem>, ConfigError> {
        match self {
            Self::Compiled(f) => f.create_copy(builder),
            Self::Generic(f) => f.create_copy(builder),
        }
    }
}

/// A builder staged for one descriptor must not reach the factory of
/// another.
fn check_builder(
    descriptor: &Arc<ConfigDescriptor>,
    builder: &ItemBuilder,
) -> Result<(), ConfigError> {
    if descriptor.name() == builder.descriptor().name() {
        Ok(())
    } else {
        Err(ConfigError::DescriptorMismatch {
            expected: descriptor.name().to_string(),
            got: builder.descriptor().name().to_string(),
        })
    }
}
