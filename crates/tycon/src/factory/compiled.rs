// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled instantiation strategy.

use crate::descriptor::ConfigDescriptor;
use crate::error::{ConfigError, GenerationError};
use crate::factory::ItemFactory;
use crate::generate::{ImplBinary, ImplCompiler};
use crate::item::{ConfigItem, ItemBuilder};
use crate::location::Location;
use std::fmt;
use std::sync::Arc;

/// Dispatches instantiation to a generated implementation's two standard
/// constructors.
pub struct CompiledFactory {
    descriptor: Arc<ConfigDescriptor>,
    binary: ImplBinary,
}

impl CompiledFactory {
    /// Compile the descriptor and bind its standard constructors.
    ///
    /// Generated implementations build on their supertype's generated
    /// implementation, so every super-descriptor is ensured first via
    /// `ensure_super`; a super that ends up generic fails generation for
    /// this type. A compiled module missing either standard constructor
    /// is rejected.
    pub fn new(
        descriptor: Arc<ConfigDescriptor>,
        compiler: &dyn ImplCompiler,
        ensure_super: &mut dyn FnMut(&Arc<ConfigDescriptor>) -> Arc<ItemFactory>,
    ) -> Result<Self, GenerationError> {
        for sup in descriptor.supers() {
            if !ensure_super(sup).is_compiled() {
                return Err(GenerationError::SuperNotCompiled {
                    type_name: descriptor.name().to_string(),
                    super_name: sup.name().to_string(),
                });
            }
        }

        let module = compiler.compile(&descriptor)?;
        let impl_name = module.impl_name;
        let ctor_new = module
            .ctor_new
            .ok_or_else(|| GenerationError::MissingConstructor {
                impl_name: impl_name.clone(),
                constructor: "new",
            })?;
        let ctor_copy = module
            .ctor_copy
            .ok_or(GenerationError::MissingConstructor {
                impl_name,
                constructor: "copy",
            })?;

        Ok(Self {
            descriptor,
            binary: ImplBinary {
                ctor_new,
                ctor_copy,
            },
        })
    }

    pub fn descriptor(&self) -> &Arc<ConfigDescriptor> {
        &self.descriptor
    }

    pub fn create_new(&self, location: Location) -> Box<dyn ConfigItem> {
        (self.binary.ctor_new)(&self.descriptor, location)
    }

    pub fn create_copy(&self, builder: &ItemBuilder) -> Result<Box<dyn ConfigItem>, ConfigError> {
        super::check_builder(&self.descriptor, builder)?;
        (self.binary.ctor_copy)(&self.descriptor, builder)
    }
}

impl fmt::Debug for CompiledFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFactory")
            .field("descriptor", &self.descriptor.name())
            .field("impl_name", &self.descriptor.impl_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::ImplModule;
    use crate::item::GenericItem;

    struct FixedCompiler {
        module: ImplModule,
    }

    impl ImplCompiler for FixedCompiler {
        fn compile(
            &self,
            _descriptor: &Arc<ConfigDescriptor>,
        ) -> Result<ImplModule, GenerationError> {
            Ok(self.module.clone())
        }
    }

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
    fn test_missing_constructor_rejected() {
        let descriptor = ConfigDescriptor::builder("compiled.test.Partial")
            .build()
            .expect("descriptor");
        let compiler = FixedCompiler {
            module: ImplModule {
                impl_name: descriptor.impl_name(),
                ctor_new: Some(stub_new),
                ctor_copy: None,
            },
        };
        let mut ensure =
            |_: &Arc<ConfigDescriptor>| -> Arc<ItemFactory> { unreachable!("no supers") };

        let err = CompiledFactory::new(descriptor, &compiler, &mut ensure);
        assert!(matches!(
            err,
            Err(GenerationError::MissingConstructor {
                constructor: "copy",
                ..
            })
        ));
    }

    #[test]
    fn test_constructors_dispatched() {
        let descriptor = ConfigDescriptor::builder("compiled.test.Full")
            .build()
            .expect("descriptor");
        let compiler = FixedCompiler {
            module: ImplModule {
                impl_name: descriptor.impl_name(),
                ctor_new: Some(stub_new),
                ctor_copy: Some(stub_copy),
            },
        };
        let mut ensure =
            |_: &Arc<ConfigDescriptor>| -> Arc<ItemFactory> { unreachable!("no supers") };

        let factory = CompiledFactory::new(descriptor, &compiler, &mut ensure).expect("factory");
        let item = factory.create_new(Location::none());
        assert_eq!(item.descriptor().name(), "compiled.test.Full");
    }
}
