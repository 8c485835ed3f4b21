// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Factory selection, memoization and fallback.

use crate::descriptor::ConfigDescriptor;
use crate::error::ConfigError;
use crate::factory::{CompiledFactory, GenericFactory, ItemFactory};
use crate::generate::{GenDirCompiler, ImplCompiler};
use crate::item::{ConfigItem, ItemBuilder};
use crate::location::Location;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Environment switch enabling the compiled strategy.
pub const ENV_GENERATED: &str = "TYCON_GENERATED";
/// Environment override for the generation output directory.
pub const ENV_GEN_DIR: &str = "TYCON_GEN_DIR";

const DEFAULT_GEN_DIR: &str = "target/tycon-gen";

/// Entry point for instantiation: picks the strategy per descriptor,
/// memoizes it, and degrades to generic on any generation failure.
///
/// The strategy is fixed at construction: without a compiler the context
/// is pinned to the generic representation for every descriptor.
/// `factory()` never fails; generation problems are logged and answered
/// with a generic factory for the affected descriptor only.
pub struct FactoryContext {
    compiler: Option<Box<dyn ImplCompiler>>,
    // One flat lock over the cache also serializes compilation, so
    // concurrent first requests for a descriptor compile exactly once.
    cache: Mutex<HashMap<String, Arc<ItemFactory>>>,
}

impl FactoryContext {
    /// Context configured from the environment: compiled strategy when
    /// `TYCON_GENERATED` is set truthy, generation directory from
    /// `TYCON_GEN_DIR`. Any setup failure logs a warning and pins the
    /// context to generic.
    pub fn new() -> Self {
        if !env_flag(ENV_GENERATED) {
            return Self::generic_only();
        }
        let gen_dir =
            std::env::var(ENV_GEN_DIR).unwrap_or_else(|_| DEFAULT_GEN_DIR.to_string());
        match GenDirCompiler::new(gen_dir) {
            Ok(compiler) => Self::with_compiler(Box::new(compiler)),
            Err(err) => {
                log::warn!(
                    "[factory] cannot set up code generation, using generic representations: {}",
                    err
                );
                Self::generic_only()
            }
        }
    }

    /// Context with an explicit compiler.
    pub fn with_compiler(compiler: Box<dyn ImplCompiler>) -> Self {
        Self {
            compiler: Some(compiler),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Context pinned to the generic representation.
    pub fn generic_only() -> Self {
        Self {
            compiler: None,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Process-wide context, initialized from the environment on first
    /// use.
    pub fn global() -> &'static FactoryContext {
        static GLOBAL: OnceLock<FactoryContext> = OnceLock::new();
        GLOBAL.get_or_init(FactoryContext::new)
    }

    /// The factory for a descriptor. Never fails: no-generation types and
    /// generation failures answer with the generic strategy.
    pub fn factory(&self, descriptor: &Arc<ConfigDescriptor>) -> Arc<ItemFactory> {
        let mut cache = self.cache.lock();
        self.factory_locked(&mut cache, descriptor)
    }

    fn factory_locked(
        &self,
        cache: &mut HashMap<String, Arc<ItemFactory>>,
        descriptor: &Arc<ConfigDescriptor>,
    ) -> Arc<ItemFactory> {
        if let Some(factory) = cache.get(descriptor.name()) {
            return factory.clone();
        }
        let factory = Arc::new(self.build_factory(cache, descriptor));
        cache.insert(descriptor.name().to_string(), factory.clone());
        factory
    }

    fn build_factory(
        &self,
        cache: &mut HashMap<String, Arc<ItemFactory>>,
        descriptor: &Arc<ConfigDescriptor>,
    ) -> ItemFactory {
        if descriptor.is_no_generation() {
            return ItemFactory::Generic(GenericFactory::new(descriptor.clone()));
        }
        let Some(compiler) = &self.compiler else {
            return ItemFactory::Generic(GenericFactory::new(descriptor.clone()));
        };

        let mut ensure_super =
            |sup: &Arc<ConfigDescriptor>| self.factory_locked(cache, sup);
        match CompiledFactory::new(descriptor.clone(), compiler.as_ref(), &mut ensure_super) {
            Ok(factory) => ItemFactory::Compiled(factory),
            Err(err) => {
                log::warn!(
                    "[factory] '{}': using generic representation: {}",
                    descriptor.name(),
                    err
                );
                ItemFactory::Generic(GenericFactory::new(descriptor.clone()))
            }
        }
    }

    /// Default instance of a configuration type.
    pub fn new_item(
        &self,
        descriptor: &Arc<ConfigDescriptor>,
        location: Location,
    ) -> Box<dyn ConfigItem> {
        self.factory(descriptor).create_new(location)
    }

    /// Instance from explicitly-staged builder values.
    pub fn copy_item(
        &self,
        descriptor: &Arc<ConfigDescriptor>,
        builder: &ItemBuilder,
    ) -> Result<Box<dyn ConfigItem>, ConfigError> {
        self.factory(descriptor).create_copy(builder)
    }
}

impl Default for FactoryContext {
    fn default() -> Self {
        Self::new()
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::generate::ImplModule;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Compiler stub that counts calls and always fails.
    struct CountingCompiler {
        calls: Arc<AtomicUsize>,
    }

    impl ImplCompiler for CountingCompiler {
        fn compile(
            &self,
            descriptor: &Arc<ConfigDescriptor>,
        ) -> Result<ImplModule, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::NotLinked {
                impl_name: descriptor.impl_name(),
            })
        }
    }

    fn counting_context() -> (FactoryContext, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let context = FactoryContext::with_compiler(Box::new(CountingCompiler {
            calls: calls.clone(),
        }));
        (context, calls)
    }

    #[test]
    fn test_factory_is_memoized() {
        let (context, calls) = counting_context();
        let descriptor = ConfigDescriptor::builder("context.test.Memo")
            .build()
            .expect("descriptor");

        let first = context.factory(&descriptor);
        let second = context.factory(&descriptor);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_falls_back_to_generic() {
        let (context, _) = counting_context();
        let descriptor = ConfigDescriptor::builder("context.test.Fallback")
            .build()
            .expect("descriptor");

        let factory = context.factory(&descriptor);
        assert!(!factory.is_compiled());
        let item = factory.create_new(Location::none());
        assert_eq!(item.descriptor().name(), "context.test.Fallback");
    }

    #[test]
    fn test_no_generation_never_reaches_compiler() {
        let (context, calls) = counting_context();
        let descriptor = ConfigDescriptor::builder("context.test.NoGen")
            .no_generation()
            .build()
            .expect("descriptor");

        let factory = context.factory(&descriptor);
        assert!(!factory.is_compiled());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_generic_super_fails_subtype_generation() {
        let (context, calls) = counting_context();
        let sup = ConfigDescriptor::builder("context.test.GenericBase")
            .no_generation()
            .build()
            .expect("base");
        let descriptor = ConfigDescriptor::builder("context.test.Derived")
            .extends(sup)
            .build()
            .expect("derived");

        let factory = context.factory(&descriptor);
        assert!(!factory.is_compiled());
        // The super short-circuits generation before any compile call.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_generic_only_context() {
        let context = FactoryContext::generic_only();
        let descriptor = ConfigDescriptor::builder("context.test.Plain")
            .build()
            .expect("descriptor");
        assert!(!context.factory(&descriptor).is_compiled());
    }
}
