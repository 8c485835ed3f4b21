// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic instantiation strategy.

use crate::descriptor::ConfigDescriptor;
use crate::error::ConfigError;
use crate::item::{ConfigItem, GenericItem, ItemBuilder};
use crate::location::Location;
use std::sync::Arc;

/// Builds slot-backed [`GenericItem`] instances straight from the
/// descriptor. Works for every descriptor; the fallback strategy and the
/// only one for no-generation types.
#[derive(Debug)]
pub struct GenericFactory {
    descriptor: Arc<ConfigDescriptor>,
}

impl GenericFactory {
    pub fn new(descriptor: Arc<ConfigDescriptor>) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &Arc<ConfigDescriptor> {
        &self.descriptor
    }

    pub fn create_new(&self, location: Location) -> Box<dyn ConfigItem> {
        Box::new(GenericItem::new(self.descriptor.clone(), location))
    }

    pub fn create_copy(&self, builder: &ItemBuilder) -> Result<Box<dyn ConfigItem>, ConfigError> {
        super::check_builder(&self.descriptor, builder)?;
        Ok(Box::new(GenericItem::from_builder(
            self.descriptor.clone(),
            builder,
        )?))
    }
}
