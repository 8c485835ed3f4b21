// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Source locations for configuration items.

use std::fmt;
use std::sync::Arc;

/// Position in a configuration source, attached to every item.
///
/// Items created programmatically carry [`Location::none`]; items created
/// from parsed input carry the position reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    source: Option<Arc<str>>,
    line: u32,
    column: u32,
}

impl Location {
    /// Location for items without a configuration source.
    pub fn none() -> Self {
        Self {
            source: None,
            line: 0,
            column: 0,
        }
    }

    /// Location at a concrete position in a named source.
    pub fn at(source: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            source: Some(source.into()),
            line,
            column,
        }
    }

    /// The source name, if known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Line in the source (1-based, 0 when unknown).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column in the source (1-based, 0 when unknown).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Whether this is the no-location sentinel.
    pub fn is_none(&self) -> bool {
        self.source.is_none()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}:{}", source, self.line, self.column),
            None => write!(f, "<unknown location>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_location() {
        let loc = Location::none();
        assert!(loc.is_none());
        assert_eq!(loc.to_string(), "<unknown location>");
    }

    #[test]
    fn test_concrete_location() {
        let loc = Location::at("server.yaml", 12, 3);
        assert!(!loc.is_none());
        assert_eq!(loc.source(), Some("server.yaml"));
        assert_eq!(loc.to_string(), "server.yaml:12:3");
    }
}
