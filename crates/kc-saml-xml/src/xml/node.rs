//! Owned XML element tree.

use serde::{Deserialize, Serialize};

use crate::error::SamlResult;

use super::writer;

/// Splits `prefix:local` into its parts.
#[must_use]
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Formats a namespace-qualified name in Clark notation (`{uri}local`).
#[must_use]
pub fn clark_name(namespace: Option<&str>, local_name: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{ns}}}{local_name}"),
        None => local_name.to_string(),
    }
}

/// A node in an element's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmlNode {
    /// A child element.
    Element(XmlElement),
    /// Character data (unescaped).
    Text(String),
    /// A CDATA section.
    CData(String),
    /// A comment.
    Comment(String),
}

/// An attribute on an element. `xmlns` declarations are not attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlAttribute {
    prefix: Option<String>,
    local_name: String,
    namespace: Option<String>,
    value: String,
}

impl XmlAttribute {
    /// The prefix as written, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The local part of the attribute name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The namespace URI the attribute belongs to.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The attribute name as written (`prefix:local` or `local`).
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// The unescaped attribute value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An `xmlns` or `xmlns:prefix` declaration carried by an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDeclaration {
    /// The declared prefix, `None` for the default namespace.
    pub prefix: Option<String>,
    /// The namespace URI.
    pub uri: String,
}

/// A namespace-qualified element and its subtree.
///
/// Every element records its resolved namespace, so a subtree stays
/// meaningful when it is moved into another document. The writer emits
/// whatever `xmlns` declarations the destination lacks.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    prefix: Option<String>,
    local_name: String,
    namespace: Option<String>,
    namespace_declarations: Vec<NamespaceDeclaration>,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

// Structural equality: where a namespace happens to be declared is not part
// of an element's value.
impl PartialEq for XmlElement {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
            && self.local_name == other.local_name
            && self.namespace == other.namespace
            && self.attributes == other.attributes
            && self.children == other.children
    }
}

impl XmlElement {
    /// Creates an element with no namespace.
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local_name: local_name.into(),
            namespace: None,
            namespace_declarations: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element in `namespace` named `qualified_name`
    /// (`prefix:local`, or `local` for the default namespace).
    #[must_use]
    pub fn new_qualified(namespace: &str, qualified_name: &str) -> Self {
        let (prefix, local) = split_qualified_name(qualified_name);
        Self {
            prefix: prefix.map(str::to_string),
            local_name: local.to_string(),
            namespace: Some(namespace.to_string()),
            namespace_declarations: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        prefix: Option<String>,
        local_name: String,
        namespace: Option<String>,
        namespace_declarations: Vec<NamespaceDeclaration>,
    ) -> Self {
        Self {
            prefix,
            local_name,
            namespace,
            namespace_declarations,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn push_parsed_attribute(
        &mut self,
        prefix: Option<String>,
        local_name: String,
        namespace: Option<String>,
        value: String,
    ) {
        self.attributes.push(XmlAttribute {
            prefix,
            local_name,
            namespace,
            value,
        });
    }

    pub(crate) fn push_node(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    /// Appends a text node and returns the element.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.append_text(text);
        self
    }

    /// The prefix as written, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The local part of the element name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The namespace URI of the element.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The element name as written (`prefix:local` or `local`).
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Returns `true` if the element is `{namespace}local_name`.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// Namespace declarations written on this element.
    #[must_use]
    pub fn namespace_declarations(&self) -> &[NamespaceDeclaration] {
        &self.namespace_declarations
    }

    /// Adds an explicit namespace declaration.
    pub fn declare_namespace(&mut self, prefix: Option<&str>, uri: &str) {
        self.namespace_declarations.retain(|d| d.prefix.as_deref() != prefix);
        self.namespace_declarations.push(NamespaceDeclaration {
            prefix: prefix.map(str::to_string),
            uri: uri.to_string(),
        });
    }

    /// All attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Looks up an attribute by the name it was written with
    /// (e.g. `Format` or `xml:lang`).
    #[must_use]
    pub fn attribute(&self, qualified_name: &str) -> Option<&str> {
        let (prefix, local) = split_qualified_name(qualified_name);
        self.attributes
            .iter()
            .find(|a| a.prefix.as_deref() == prefix && a.local_name == local)
            .map(|a| a.value.as_str())
    }

    /// Looks up an attribute by namespace and local name.
    #[must_use]
    pub fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Returns `true` if an unqualified or prefixed attribute with this name exists.
    #[must_use]
    pub fn has_attribute(&self, qualified_name: &str) -> bool {
        self.attribute(qualified_name).is_some()
    }

    /// Sets an attribute that is not in any namespace, replacing an existing one.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.set_attribute_inner(None, name, None, value.into());
    }

    /// Sets a namespaced attribute (`prefix:local`), replacing an existing one.
    pub fn set_attribute_ns(&mut self, namespace: &str, qualified_name: &str, value: impl Into<String>) {
        let (prefix, local) = split_qualified_name(qualified_name);
        self.set_attribute_inner(prefix, local, Some(namespace), value.into());
    }

    fn set_attribute_inner(
        &mut self,
        prefix: Option<&str>,
        local_name: &str,
        namespace: Option<&str>,
        value: String,
    ) {
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name == local_name)
        {
            existing.prefix = prefix.map(str::to_string);
            existing.value = value;
            return;
        }
        self.attributes.push(XmlAttribute {
            prefix: prefix.map(str::to_string),
            local_name: local_name.to_string(),
            namespace: namespace.map(str::to_string),
            value,
        });
    }

    /// All child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Direct children named `{namespace}local_name`, in document order.
    #[must_use]
    pub fn children_ns(&self, namespace: &str, local_name: &str) -> Vec<&XmlElement> {
        self.child_elements()
            .filter(|child| child.is(namespace, local_name))
            .collect()
    }

    /// Appends `child` as the last child and returns a reference to it.
    pub fn append_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(XmlNode::Element(child));
        match self.children.last_mut() {
            Some(XmlNode::Element(element)) => element,
            _ => unreachable!("an element was just appended"),
        }
    }

    /// Appends a text node.
    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Removes and returns the last child element, if the last child is one.
    pub fn pop_child_element(&mut self) -> Option<XmlElement> {
        match self.children.pop() {
            Some(XmlNode::Element(element)) => Some(element),
            Some(other) => {
                self.children.push(other);
                None
            }
            None => None,
        }
    }

    /// Concatenation of all descendant text and CDATA, like DOM `textContent`.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                XmlNode::Element(element) => element.collect_text(out),
                XmlNode::Comment(_) => {}
            }
        }
    }

    /// Deep copy of this subtree, detached from its document, ready to be
    /// appended elsewhere.
    #[must_use]
    pub fn import(&self) -> XmlElement {
        self.clone()
    }

    /// Serializes this subtree without an XML declaration.
    pub fn to_xml_string(&self) -> SamlResult<String> {
        writer::write_element(self, false)
    }
}
