//! Parser configuration.
//!
//! SAML messages arrive from untrusted peers, so the parser enforces limits
//! on document size and nesting depth before building any tree.

use serde::{Deserialize, Serialize};

/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum document size in bytes (1 MiB).
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 1024 * 1024;

/// Limits and switches applied when parsing XML input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum element nesting depth (the root element has depth 1).
    pub max_depth: usize,
    /// Maximum input size in bytes.
    pub max_document_size: usize,
    /// Keep comment nodes in the tree. When `false` they are dropped.
    pub preserve_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            preserve_comments: true,
        }
    }
}

impl ParseOptions {
    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum document size in bytes.
    #[must_use]
    pub const fn with_max_document_size(mut self, max_document_size: usize) -> Self {
        self.max_document_size = max_document_size;
        self
    }

    /// Sets whether comments are kept.
    #[must_use]
    pub const fn preserve_comments(mut self, preserve: bool) -> Self {
        self.preserve_comments = preserve;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.max_depth, 64);
        assert_eq!(options.max_document_size, 1024 * 1024);
        assert!(options.preserve_comments);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.max_document_size, DEFAULT_MAX_DOCUMENT_SIZE);
        assert!(options.preserve_comments);
    }
}
