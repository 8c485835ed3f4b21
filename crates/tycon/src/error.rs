// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the configuration core.
//!
//! Two recoverable families exist:
//!
//! - [`ConfigError`]: domain/value-level errors. Surfaced to callers of
//!   `create_copy`, builder staging and collection mutation; expected and
//!   handled by applications.
//! - [`GenerationError`]: implementation generation failed for one
//!   descriptor. Always caught by the factory context and converted into a
//!   generic fallback; never escapes to the application.
//!
//! Invariant violations (a successfully compiled implementation that cannot
//! be driven through the standard constructor ABI) are framework bugs and
//! panic loudly instead of being modeled here.

use crate::generate::Diagnostic;
use std::fmt;
use std::io;

/// Domain/value-level configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// No property with the given name exists on the descriptor.
    NoSuchProperty(String),
    /// Value has the wrong type for the property.
    TypeMismatch {
        property: String,
        expected: &'static str,
        got: &'static str,
    },
    /// Externally supplied constraint rejected the value.
    ConstraintViolation { property: String, message: String },
    /// Null value for a context that does not allow null.
    NotNullable { property: String },
    /// Property is not list-valued.
    NotAList(String),
    /// Property is not map-valued.
    NotAMap(String),
    /// Property is not plain-valued (use the list/map accessors).
    NotPlain(String),
    /// Descriptor declares the same property name twice.
    DuplicateProperty {
        descriptor: String,
        property: String,
    },
    /// Adding the value would duplicate a key in a keyed collection.
    DuplicateKey { property: String, key: String },
    /// Map entry key disagrees with the property's key mapping.
    KeyMismatch {
        property: String,
        key: String,
        expected: String,
    },
    /// Property has no key mapping but one is required.
    NoKeyMapping(String),
    /// Builder and factory descriptors disagree.
    DescriptorMismatch { expected: String, got: String },
    /// Index outside the collection bounds.
    IndexOutOfBounds {
        property: String,
        index: usize,
        len: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchProperty(name) => write!(f, "No such property: '{}'", name),
            Self::TypeMismatch {
                property,
                expected,
                got,
            } => write!(
                f,
                "Property '{}': expected {} value, got {}",
                property, expected, got
            ),
            Self::ConstraintViolation { property, message } => {
                write!(f, "Property '{}': {}", property, message)
            }
            Self::NotNullable { property } => {
                write!(f, "Property '{}': null value is not allowed", property)
            }
            Self::NotAList(name) => write!(f, "Property '{}' is not list-valued", name),
            Self::NotAMap(name) => write!(f, "Property '{}' is not map-valued", name),
            Self::NotPlain(name) => write!(
                f,
                "Property '{}' is collection-valued, use the list/map accessors",
                name
            ),
            Self::DuplicateProperty {
                descriptor,
                property,
            } => write!(
                f,
                "Descriptor '{}' declares property '{}' twice",
                descriptor, property
            ),
            Self::DuplicateKey { property, key } => write!(
                f,
                "Property '{}': value has the same key '{}' as an existing value",
                property, key
            ),
            Self::KeyMismatch {
                property,
                key,
                expected,
            } => write!(
                f,
                "Property '{}': key of value is expected to be '{}' but was '{}'",
                property, expected, key
            ),
            Self::NoKeyMapping(name) => {
                write!(f, "Property '{}' has no key mapping", name)
            }
            Self::DescriptorMismatch { expected, got } => write!(
                f,
                "Builder for descriptor '{}' passed to factory for '{}'",
                got, expected
            ),
            Self::IndexOutOfBounds {
                property,
                index,
                len,
            } => write!(
                f,
                "Property '{}': index {} out of bounds (len {})",
                property, index, len
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Implementation generation failed for one descriptor.
///
/// Recoverable: the factory context degrades to the generic representation
/// for the affected descriptor (or, for [`GenerationError::Unavailable`],
/// for the whole process).
#[derive(Debug)]
pub enum GenerationError {
    /// The generation toolchain cannot be set up at all.
    Unavailable(String),
    /// Emitted source does not parse; diagnostics carry file/line/column.
    SourceInvalid {
        type_name: String,
        diagnostics: Vec<Diagnostic>,
    },
    /// Source was emitted but no implementation is linked into this binary.
    NotLinked { impl_name: String },
    /// Registered implementation lacks one of the two standard constructors.
    MissingConstructor {
        impl_name: String,
        constructor: &'static str,
    },
    /// A super-descriptor fell back to the generic representation.
    SuperNotCompiled {
        type_name: String,
        super_name: String,
    },
    /// I/O failure in the generation output directory.
    Io(io::Error),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Code generation unavailable: {}", msg),
            Self::SourceInvalid {
                type_name,
                diagnostics,
            } => write!(
                f,
                "Generated source for '{}' is invalid ({} error(s))",
                type_name,
                diagnostics.len()
            ),
            Self::NotLinked { impl_name } => write!(
                f,
                "No implementation '{}' is linked into this binary",
                impl_name
            ),
            Self::MissingConstructor {
                impl_name,
                constructor,
            } => write!(
                f,
                "Implementation '{}' is missing the standard {} constructor",
                impl_name, constructor
            ),
            Self::SuperNotCompiled {
                type_name,
                super_name,
            } => write!(
                f,
                "Cannot compile '{}': super type '{}' has no compiled implementation",
                type_name, super_name
            ),
            Self::Io(err) => write!(f, "Generation directory I/O error: {}", err),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for GenerationError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
