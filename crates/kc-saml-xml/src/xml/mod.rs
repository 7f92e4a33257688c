//! Namespace-aware XML element tree.
//!
//! This is the small DOM the SAML types are marshalled to and from:
//!
//! - [`XmlDocument::parse`] turns bytes into an owned tree, resolving every
//!   element and attribute to its namespace URI
//! - [`XmlElement::children_ns`] is the namespace-scoped child lookup
//! - [`XmlElement::new_qualified`] and [`XmlElement::append_child`] build trees
//! - [`XmlElement::import`] deep-copies a subtree for use in another document
//! - [`XmlDocument::to_xml_string`] writes the tree back out, declaring any
//!   namespace a moved subtree still needs
//!
//! DOCTYPE declarations are rejected outright, which rules out entity
//! expansion attacks.

mod namespace;
mod node;
mod parser;
mod writer;

pub use node::{
    clark_name, split_qualified_name, NamespaceDeclaration, XmlAttribute, XmlElement, XmlNode,
};

use crate::config::ParseOptions;
use crate::error::{SamlError, SamlResult};

/// A document owning a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Creates a document with `root` as its document element.
    #[must_use]
    pub const fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// Parses a document with the default [`ParseOptions`].
    pub fn parse(input: &str) -> SamlResult<Self> {
        Self::parse_with(input, &ParseOptions::default())
    }

    /// Parses a document from raw bytes, which must be UTF-8.
    pub fn parse_bytes(input: &[u8]) -> SamlResult<Self> {
        let input = std::str::from_utf8(input)?;
        Self::parse(input)
    }

    /// Parses a document with explicit limits.
    pub fn parse_with(input: &str, options: &ParseOptions) -> SamlResult<Self> {
        match parser::parse_root(input, options) {
            Ok(root) => {
                tracing::trace!(root = %root.qualified_name(), "parsed XML document");
                Ok(Self { root })
            }
            Err(err) => {
                tracing::debug!(error = %err, "rejected XML document");
                Err(err)
            }
        }
    }

    /// The document element.
    #[must_use]
    pub const fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Mutable access to the document element.
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Consumes the document, returning its root element.
    #[must_use]
    pub fn into_root(self) -> XmlElement {
        self.root
    }

    /// Serializes the document with an XML declaration.
    pub fn to_xml_string(&self) -> SamlResult<String> {
        writer::write_element(&self.root, true)
    }

    /// Builds a document from the element last appended to `scratch`.
    pub(crate) fn from_scratch(mut scratch: XmlElement) -> SamlResult<Self> {
        scratch
            .pop_child_element()
            .map(Self::new)
            .ok_or_else(|| SamlError::XmlWrite("no element was produced".to_string()))
    }
}
