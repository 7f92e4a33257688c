//! SAML Name ID types.
//!
//! `saml:NameID` and `saml:Issuer` share the `NameIDType` schema type. The
//! shared content lives in [`NameIdType`]; [`NameId`] and [`Issuer`] are thin
//! wrappers that only fix the element name, selected through [`NameIdTag`].

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::convert::{expect_element, XmlConvertible, XmlRoot};
use crate::error::{SamlError, SamlResult};
use crate::xml::XmlElement;

use super::{NameIdFormat, SAML_NS};

/// Elements whose content is a `NameIDType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameIdTag {
    /// `saml:NameID`.
    NameId,
    /// `saml:Issuer`.
    Issuer,
}

impl NameIdTag {
    /// Returns the qualified element name for this tag.
    #[must_use]
    pub const fn qualified_name(&self) -> &'static str {
        match self {
            Self::NameId => "saml:NameID",
            Self::Issuer => "saml:Issuer",
        }
    }

    /// Returns the local element name for this tag.
    #[must_use]
    pub const fn local_name(&self) -> &'static str {
        match self {
            Self::NameId => "NameID",
            Self::Issuer => "Issuer",
        }
    }
}

/// The content of a `NameIDType` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIdType {
    /// The actual identifier value (element text, possibly empty).
    pub value: String,

    /// The format URI. Defaults to the entity format.
    pub format: String,

    /// The security or administrative domain that qualifies the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_qualifier: Option<String>,

    /// The service provider's entity ID that qualifies the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_name_qualifier: Option<String>,

    /// A provider identifier for the SP that was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_provided_id: Option<String>,
}

impl NameIdType {
    /// Creates a name ID with the given value and the default format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: NameIdFormat::default().uri().to_string(),
            name_qualifier: None,
            sp_name_qualifier: None,
            sp_provided_id: None,
        }
    }

    /// Sets the format.
    #[must_use]
    pub fn with_format(mut self, format: NameIdFormat) -> Self {
        self.format = format.uri().to_string();
        self
    }

    /// Sets a format URI that has no [`NameIdFormat`] variant.
    #[must_use]
    pub fn with_format_uri(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the name qualifier.
    #[must_use]
    pub fn with_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.name_qualifier = Some(qualifier.into());
        self
    }

    /// Sets the SP name qualifier.
    #[must_use]
    pub fn with_sp_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.sp_name_qualifier = Some(qualifier.into());
        self
    }

    /// Sets the SP provided ID.
    #[must_use]
    pub fn with_sp_provided_id(mut self, id: impl Into<String>) -> Self {
        self.sp_provided_id = Some(id.into());
        self
    }

    /// Returns the parsed name ID format, if it is a well-known one.
    #[must_use]
    pub fn parsed_format(&self) -> Option<NameIdFormat> {
        NameIdFormat::from_uri(&self.format)
    }

    /// Reads the content of a `tag` element.
    pub fn from_xml_tagged(element: &XmlElement, tag: NameIdTag) -> SamlResult<Self> {
        if !element.is(SAML_NS, tag.local_name()) {
            return Err(SamlError::UnexpectedElement {
                expected: crate::xml::clark_name(Some(SAML_NS), tag.local_name()),
                found: crate::xml::clark_name(element.namespace(), element.local_name()),
            });
        }

        let format = element
            .attribute("Format")
            .map_or_else(|| NameIdFormat::default().uri().to_string(), str::to_string);

        Ok(Self {
            value: element.text_content(),
            format,
            name_qualifier: element.attribute("NameQualifier").map(str::to_string),
            sp_name_qualifier: element.attribute("SPNameQualifier").map(str::to_string),
            sp_provided_id: element.attribute("SPProvidedID").map(str::to_string),
        })
    }

    /// Appends this content as a `tag` element to `parent`.
    pub fn to_xml_tagged<'p>(
        &self,
        tag: NameIdTag,
        parent: &'p mut XmlElement,
    ) -> SamlResult<&'p mut XmlElement> {
        if self.format.trim().is_empty() {
            return Err(SamlError::empty(format!("{} Format", tag.qualified_name())));
        }

        let mut element = XmlElement::new_qualified(SAML_NS, tag.qualified_name());
        element.set_attribute("Format", self.format.as_str());
        if let Some(qualifier) = &self.name_qualifier {
            element.set_attribute("NameQualifier", qualifier.as_str());
        }
        if let Some(qualifier) = &self.sp_name_qualifier {
            element.set_attribute("SPNameQualifier", qualifier.as_str());
        }
        if let Some(id) = &self.sp_provided_id {
            element.set_attribute("SPProvidedID", id.as_str());
        }
        if !self.value.is_empty() {
            element.append_text(self.value.as_str());
        }

        Ok(parent.append_child(element))
    }
}

/// SAML Name ID (`saml:NameID`).
///
/// Represents the identifier of a subject in a SAML assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameId(pub NameIdType);

impl NameId {
    /// Creates a new name ID with the given value and the entity format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(NameIdType::new(value))
    }

    /// Creates a new email name ID.
    #[must_use]
    pub fn email(email: impl Into<String>) -> Self {
        Self(NameIdType::new(email).with_format(NameIdFormat::Email))
    }

    /// Creates a new persistent name ID.
    #[must_use]
    pub fn persistent(value: impl Into<String>) -> Self {
        Self(NameIdType::new(value).with_format(NameIdFormat::Persistent))
    }

    /// Creates a new transient name ID.
    #[must_use]
    pub fn transient(value: impl Into<String>) -> Self {
        Self(NameIdType::new(value).with_format(NameIdFormat::Transient))
    }
}

/// SAML Issuer (`saml:Issuer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issuer(pub NameIdType);

impl Issuer {
    /// Creates an issuer for the given entity ID.
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self(NameIdType::new(entity_id))
    }
}

impl Deref for NameId {
    type Target = NameIdType;

    fn deref(&self) -> &NameIdType {
        &self.0
    }
}

impl DerefMut for NameId {
    fn deref_mut(&mut self) -> &mut NameIdType {
        &mut self.0
    }
}

impl Deref for Issuer {
    type Target = NameIdType;

    fn deref(&self) -> &NameIdType {
        &self.0
    }
}

impl DerefMut for Issuer {
    fn deref_mut(&mut self) -> &mut NameIdType {
        &mut self.0
    }
}

impl XmlConvertible for NameId {
    const NAMESPACE: &'static str = SAML_NS;
    const QUALIFIED_NAME: &'static str = "saml:NameID";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;
        NameIdType::from_xml_tagged(element, NameIdTag::NameId).map(Self)
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        self.0.to_xml_tagged(NameIdTag::NameId, parent)
    }
}

impl XmlRoot for NameId {}

impl XmlConvertible for Issuer {
    const NAMESPACE: &'static str = SAML_NS;
    const QUALIFIED_NAME: &'static str = "saml:Issuer";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;
        NameIdType::from_xml_tagged(element, NameIdTag::Issuer).map(Self)
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        self.0.to_xml_tagged(NameIdTag::Issuer, parent)
    }
}

impl XmlRoot for Issuer {}
