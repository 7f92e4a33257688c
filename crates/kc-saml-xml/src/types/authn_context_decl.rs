//! `saml:AuthnContextDecl`.

use serde::{Deserialize, Serialize};

use crate::convert::{expect_element, XmlConvertible, XmlRoot};
use crate::error::SamlResult;
use crate::xml::XmlElement;

use super::SAML_NS;

/// An authentication context declaration carried by value.
///
/// The content is never interpreted. The whole `saml:AuthnContextDecl`
/// element is kept as an owned copy, with its attributes (typically
/// `xsi:type`), text and every child node, and is reproduced verbatim.
/// Declarations come either wrapped in a single foreign element or inline as
/// several `ac:*` children of a schema-typed wrapper; both are carried alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnContextDecl {
    content: XmlElement,
}

impl AuthnContextDecl {
    /// Wraps a single declaration element.
    #[must_use]
    pub fn new(declaration: XmlElement) -> Self {
        let mut content = Self::create_element();
        content.append_child(declaration);
        Self { content }
    }

    /// The `saml:AuthnContextDecl` element as read or built.
    #[must_use]
    pub const fn content(&self) -> &XmlElement {
        &self.content
    }

    /// The element children of the declaration, in document order.
    pub fn declarations(&self) -> impl Iterator<Item = &XmlElement> {
        self.content.child_elements()
    }

    /// The first element child, which is the declaration itself when it
    /// is wrapped in a single foreign element.
    #[must_use]
    pub fn decl(&self) -> Option<&XmlElement> {
        self.declarations().next()
    }

    /// Replaces the content with a single declaration element. Attributes
    /// on the wrapper are kept.
    pub fn set_decl(&mut self, declaration: XmlElement) {
        let mut content = Self::create_element();
        for namespace in self.content.namespace_declarations() {
            content.declare_namespace(namespace.prefix.as_deref(), &namespace.uri);
        }
        for attribute in self.content.attributes() {
            match attribute.namespace() {
                Some(ns) => content.set_attribute_ns(ns, &attribute.qualified_name(), attribute.value()),
                None => content.set_attribute(attribute.local_name(), attribute.value()),
            }
        }
        content.append_child(declaration);
        self.content = content;
    }

    /// Reads an optional `saml:AuthnContextDecl`; an absent element is not an
    /// error.
    pub fn from_optional(element: Option<&XmlElement>) -> SamlResult<Option<Self>> {
        element.map(Self::from_xml).transpose()
    }
}

impl XmlConvertible for AuthnContextDecl {
    const NAMESPACE: &'static str = SAML_NS;
    const QUALIFIED_NAME: &'static str = "saml:AuthnContextDecl";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;
        Ok(Self {
            content: element.import(),
        })
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        Ok(parent.append_child(self.content.import()))
    }
}

impl XmlRoot for AuthnContextDecl {}
