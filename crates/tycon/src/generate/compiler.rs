// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compilation step: descriptor to linked implementation module.

use crate::descriptor::ConfigDescriptor;
use crate::error::GenerationError;
use crate::generate::registry::{lookup_impl, CtorCopy, CtorNew};
use crate::generate::source::emit_item_impl;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One source-level error, with a position inside the emitted file.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: error: {}",
            self.file, self.line, self.column, self.message
        )
    }
}

/// Result of a successful compilation: the implementation name and
/// whichever standard constructors the implementation exposes. The
/// factory layer rejects a module with a missing constructor.
#[derive(Debug, Clone)]
pub struct ImplModule {
    pub impl_name: String,
    pub ctor_new: Option<CtorNew>,
    pub ctor_copy: Option<CtorCopy>,
}

/// Turns a descriptor into a linked implementation module.
///
/// Compilation is blocking and attempted once per factory creation; a
/// failure is terminal for the call and triggers the generic fallback
/// upstream. Implementations must be cheap on the cache-hit path.
pub trait ImplCompiler: Send + Sync {
    fn compile(&self, descriptor: &Arc<ConfigDescriptor>) -> Result<ImplModule, GenerationError>;
}

/// Production compiler backed by the linked-implementation registry and
/// a generation output directory.
///
/// Registry hit: the implementation is compiled into this binary, done.
/// Miss: emit the source, verify it with `syn`, write it into the
/// generation directory for the next `tycon-gen` build, and report
/// [`GenerationError::NotLinked`] so the factory falls back for now.
pub struct GenDirCompiler {
    gen_dir: PathBuf,
}

impl GenDirCompiler {
    /// Create the compiler, creating the generation directory if needed.
    pub fn new(gen_dir: impl Into<PathBuf>) -> Result<Self, GenerationError> {
        let gen_dir = gen_dir.into();
        fs::create_dir_all(&gen_dir)?;
        log::info!("[codegen] generation directory: {}", gen_dir.display());
        Ok(Self { gen_dir })
    }

    pub fn gen_dir(&self) -> &Path {
        &self.gen_dir
    }

    fn diagnostics(err: syn::Error, file: &str) -> Vec<Diagnostic> {
        err.into_iter()
            .map(|e| {
                let start = e.span().start();
                Diagnostic {
                    message: e.to_string(),
                    file: file.to_string(),
                    line: start.line,
                    column: start.column,
                }
            })
            .collect()
    }
}

impl ImplCompiler for GenDirCompiler {
    fn compile(&self, descriptor: &Arc<ConfigDescriptor>) -> Result<ImplModule, GenerationError> {
        let impl_name = descriptor.impl_name();

        if let Some(binary) = lookup_impl(&impl_name) {
            log::debug!(
                "[codegen] '{}': implementation '{}' already linked",
                descriptor.name(),
                impl_name
            );
            return Ok(ImplModule {
                impl_name,
                ctor_new: Some(binary.ctor_new),
                ctor_copy: Some(binary.ctor_copy),
            });
        }

        let file_name = format!("{}.rs", impl_name);
        let source = emit_item_impl(descriptor);
        if let Err(err) = syn::parse_file(&source) {
            let diagnostics = Self::diagnostics(err, &file_name);
            for diagnostic in &diagnostics {
                log::error!("[codegen] {}", diagnostic);
            }
            return Err(GenerationError::SourceInvalid {
                type_name: descriptor.name().to_string(),
                diagnostics,
            });
        }

        let path = self.gen_dir.join(&file_name);
        fs::write(&path, &source)?;
        log::info!(
            "[codegen] '{}': emitted {} for the next build",
            descriptor.name(),
            path.display()
        );
        Err(GenerationError::NotLinked { impl_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PropertyDescriptor, PropertyType};
    use crate::generate::registry::register_impl;
    use crate::item::GenericItem;
    use crate::location::Location;

    #[test]
    fn test_diagnostic_renders_position_and_message() {
        let diagnostic = Diagnostic {
            message: "unexpected token".to_string(),
            file: "ServerImplDEADBEEF.rs".to_string(),
            line: 12,
            column: 4,
        };
        assert_eq!(
            diagnostic.to_string(),
            "ServerImplDEADBEEF.rs:12:4: error: unexpected token"
        );
    }

    #[test]
    fn test_miss_emits_source_and_reports_not_linked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let compiler = GenDirCompiler::new(dir.path()).expect("compiler");
        let descriptor = ConfigDescriptor::builder("compiler.test.Miss")
            .property(PropertyDescriptor::plain("port", PropertyType::Int))
            .build()
            .expect("descriptor");

        let err = compiler.compile(&descriptor);
        assert!(matches!(err, Err(GenerationError::NotLinked { .. })));

        let emitted = dir.path().join(format!("{}.rs", descriptor.impl_name()));
        let written = fs::read_to_string(emitted).expect("emitted file");
        syn::parse_file(&written).expect("emitted file parses");
    }

    #[test]
    fn test_registry_hit_short_circuits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let compiler = GenDirCompiler::new(dir.path()).expect("compiler");
        let descriptor = ConfigDescriptor::builder("compiler.test.Hit")
            .build()
            .expect("descriptor");

        register_impl(
            descriptor.impl_name(),
            |descriptor, location| Box::new(GenericItem::new(descriptor.clone(), location)),
            |descriptor, builder| {
                Ok(Box::new(GenericItem::from_builder(
                    descriptor.clone(),
                    builder,
                )?))
            },
        );

        let module = compiler.compile(&descriptor).expect("hit");
        assert_eq!(module.impl_name, descriptor.impl_name());
        assert!(module.ctor_new.is_some());
        assert!(module.ctor_copy.is_some());

        // Nothing is emitted on a hit.
        let emitted = dir.path().join(format!("{}.rs", descriptor.impl_name()));
        assert!(!emitted.exists());

        let item = (module.ctor_new.expect("ctor"))(&descriptor, Location::none());
        assert_eq!(item.descriptor().name(), "compiler.test.Hit");
    }
}
