// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Implementation Generator
//
// Emits strongly-typed configuration implementations from:
// - a YAML manifest of configuration types (names, supers, properties)
// - the tycon source emitter
//
// Constraints and key mappings are code, not data; types that need them
// attach them at descriptor-construction time in the host and regenerate
// from the same manifest.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tycon::generate::source::emit_item_impl;
use tycon::{ConfigDescriptor, ConfigValue, PropertyDescriptor, PropertyType};

/// One property in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    #[serde(default)]
    pub kind: KindSpec,
    #[serde(rename = "type")]
    pub value_type: TypeSpec,
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    #[default]
    Plain,
    List,
    Map,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypeSpec {
    Bool,
    Int,
    Float,
    String,
}

impl TypeSpec {
    fn to_property_type(self) -> PropertyType {
        match self {
            Self::Bool => PropertyType::Bool,
            Self::Int => PropertyType::Int,
            Self::Float => PropertyType::Float,
            Self::String => PropertyType::Str,
        }
    }
}

/// One configuration type in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigTypeSpec {
    pub name: String,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub no_generation: bool,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

/// Complete manifest structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub types: Vec<ConfigTypeSpec>,
}

/// Generator state.
pub struct ImplGenerator {
    manifest: Manifest,
    out_dir: PathBuf,
}

impl ImplGenerator {
    /// Load the manifest and initialize the generator.
    pub fn new(manifest_path: PathBuf, out_dir: PathBuf) -> Result<Self> {
        tracing::info!("Loading manifest from: {:?}", manifest_path);
        let content = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let manifest: Manifest =
            serde_yaml::from_str(&content).context("Failed to parse manifest")?;
        Ok(Self { manifest, out_dir })
    }

    /// Emit one implementation file per generatable type, plus a module
    /// file with a `register_all()` entry point.
    pub fn generate(&self) -> Result<GenerationReport> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create {}", self.out_dir.display()))?;

        let descriptors = self.resolve_descriptors()?;
        let mut report = GenerationReport::new();
        let mut modules: Vec<String> = Vec::new();

        for descriptor in &descriptors {
            if descriptor.is_no_generation() {
                tracing::info!("[SKIP] {} (no_generation)", descriptor.name());
                report.skipped.push(descriptor.name().to_string());
                continue;
            }
            let module = descriptor.impl_name().to_lowercase();
            let source = emit_item_impl(descriptor);
            let path = self.out_dir.join(format!("{}.rs", module));
            fs::write(&path, format!("{}{}", file_header(), source))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("[OK] Generated {}", path.display());
            report.files_generated.push(path.display().to_string());
            modules.push(module);
        }

        self.write_module_file(&modules)?;
        Ok(report)
    }

    /// Build descriptors in manifest order; supers must be declared
    /// before the types extending them.
    fn resolve_descriptors(&self) -> Result<Vec<Arc<ConfigDescriptor>>> {
        let mut by_name: HashMap<String, Arc<ConfigDescriptor>> = HashMap::new();
        let mut ordered = Vec::with_capacity(self.manifest.types.len());

        for spec in &self.manifest.types {
            let mut builder = ConfigDescriptor::builder(spec.name.as_str());
            for sup in &spec.extends {
                match by_name.get(sup) {
                    Some(descriptor) => builder = builder.extends(descriptor.clone()),
                    None => bail!(
                        "Type '{}' extends '{}', which is not declared earlier in the manifest",
                        spec.name,
                        sup
                    ),
                }
            }
            if spec.no_generation {
                builder = builder.no_generation();
            }
            for property in &spec.properties {
                builder = builder.property(build_property(&spec.name, property)?);
            }
            let descriptor = builder
                .build()
                .with_context(|| format!("Invalid type '{}'", spec.name))?;
            by_name.insert(spec.name.clone(), descriptor.clone());
            ordered.push(descriptor);
        }
        Ok(ordered)
    }

    fn write_module_file(&self, modules: &[String]) -> Result<()> {
        let mut out = file_header();
        for module in modules {
            out.push_str(&format!("pub mod {};\n", module));
        }
        out.push_str("\n/// Register every generated implementation.\npub fn register_all() {\n");
        for module in modules {
            out.push_str(&format!("    {}::register();\n", module));
        }
        out.push_str("}\n");

        let path = self.out_dir.join("mod.rs");
        fs::write(&path, out).context("Failed to write mod.rs")?;
        tracing::info!("[OK] Generated {}", path.display());
        Ok(())
    }
}

fn build_property(type_name: &str, spec: &PropertySpec) -> Result<PropertyDescriptor> {
    let value_type = spec.value_type.to_property_type();
    let property = match spec.kind {
        KindSpec::Plain => PropertyDescriptor::plain(spec.name.as_str(), value_type),
        KindSpec::List => PropertyDescriptor::list(spec.name.as_str(), value_type),
        KindSpec::Map => PropertyDescriptor::map(spec.name.as_str(), value_type),
    };
    match &spec.default {
        None => Ok(property),
        Some(_) if spec.kind != KindSpec::Plain => bail!(
            "Type '{}', property '{}': defaults are only supported for plain properties",
            type_name,
            spec.name
        ),
        Some(value) => Ok(property.with_default(convert_default(type_name, spec, value)?)),
    }
}

fn convert_default(
    type_name: &str,
    spec: &PropertySpec,
    value: &serde_yaml::Value,
) -> Result<ConfigValue> {
    let converted = match (spec.value_type, value) {
        (TypeSpec::Bool, serde_yaml::Value::Bool(b)) => Some(ConfigValue::Bool(*b)),
        (TypeSpec::Int, serde_yaml::Value::Number(n)) => n.as_i64().map(ConfigValue::I64),
        (TypeSpec::Float, serde_yaml::Value::Number(n)) => n.as_f64().map(ConfigValue::F64),
        (TypeSpec::String, serde_yaml::Value::String(s)) => {
            Some(ConfigValue::String(s.clone()))
        }
        _ => None,
    };
    match converted {
        Some(value) => Ok(value),
        None => bail!(
            "Type '{}', property '{}': default does not match the declared type",
            type_name,
            spec.name
        ),
    }
}

fn file_header() -> String {
    format!(
        "// Generated by tycon-gen on {}. Do not edit by hand.\n\n",
        chrono::Utc::now().to_rfc3339()
    )
}

/// Generation report.
#[derive(Default)]
pub struct GenerationReport {
    pub files_generated: Vec<String>,
    pub skipped: Vec<String>,
}

impl GenerationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  Implementation Generation Report");
        println!("{}", "=".repeat(60));
        println!();
        println!(
            "  [OK] Implementations: {} files",
            self.files_generated.len()
        );
        println!("  [OK] Skipped:         {} (no_generation)", self.skipped.len());
        println!();
        println!("{}", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
types:
  - name: example.Base
    properties:
      - name: id
        type: string
  - name: example.Server
    extends: [example.Base]
    properties:
      - name: port
        type: int
        default: 8080
      - name: hosts
        kind: list
        type: string
  - name: example.Opaque
    no_generation: true
"#;

    #[test]
    fn test_generate_from_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest_path = dir.path().join("types.yaml");
        fs::write(&manifest_path, MANIFEST).expect("write manifest");

        let out_dir = dir.path().join("gen");
        let generator = ImplGenerator::new(manifest_path, out_dir.clone()).expect("generator");
        let report = generator.generate().expect("generate");

        assert_eq!(report.files_generated.len(), 2);
        assert_eq!(report.skipped, vec!["example.Opaque".to_string()]);

        let module_file = fs::read_to_string(out_dir.join("mod.rs")).expect("mod.rs");
        assert!(module_file.contains("pub fn register_all()"));

        // Every emitted file is valid Rust.
        for file in &report.files_generated {
            let source = fs::read_to_string(file).expect("generated file");
            syn_check(&source);
        }
    }

    fn syn_check(source: &str) {
        assert!(source.contains("impl ::tycon::ConfigItem for"));
        if let Err(err) = syn::parse_file(source) {
            panic!("emitted source does not parse: {err}");
        }
    }

    #[test]
    fn test_forward_extends_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest_path = dir.path().join("types.yaml");
        fs::write(
            &manifest_path,
            "types:\n  - name: example.Orphan\n    extends: [example.Missing]\n",
        )
        .expect("write manifest");

        let generator =
            ImplGenerator::new(manifest_path, dir.path().join("gen")).expect("generator");
        assert!(generator.generate().is_err());
    }

    #[test]
    fn test_mismatched_default_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest_path = dir.path().join("types.yaml");
        fs::write(
            &manifest_path,
            "types:\n  - name: example.Bad\n    properties:\n      - name: port\n        type: int\n        default: not-a-number\n",
        )
        .expect("write manifest");

        let generator =
            ImplGenerator::new(manifest_path, dir.path().join("gen")).expect("generator");
        assert!(generator.generate().is_err());
    }
}
