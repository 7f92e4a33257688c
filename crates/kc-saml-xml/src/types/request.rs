//! Attributes and children shared by every SAML protocol request.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::{parse_optional_child, required_attribute, XmlConvertible};
use crate::error::{SamlError, SamlResult};
use crate::xml::XmlElement;

use super::{Issuer, SAML_VERSION};

/// The common part of a SAML protocol request (`RequestAbstractType`).
///
/// Concrete requests such as [`ArtifactResolve`](super::ArtifactResolve)
/// embed an envelope and add their own children after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Unique identifier for this request.
    pub id: String,

    /// Version of the SAML protocol (always "2.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Timestamp when this request was issued.
    pub issue_instant: DateTime<Utc>,

    /// URI the request was sent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Consent obtained from the principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent: Option<String>,

    /// The entity that generated the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,
}

fn default_version() -> String {
    SAML_VERSION.to_string()
}

impl Default for RequestEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestEnvelope {
    /// Creates an envelope with a fresh ID, issued now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: format!("_id{}", uuid::Uuid::new_v4()),
            version: default_version(),
            issue_instant: Utc::now().trunc_subsecs(0),
            destination: None,
            consent: None,
            issuer: None,
        }
    }

    /// Replaces the generated ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the issue instant.
    #[must_use]
    pub const fn with_issue_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.issue_instant = instant;
        self
    }

    /// Sets the destination.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Sets the consent URI.
    #[must_use]
    pub fn with_consent(mut self, consent: impl Into<String>) -> Self {
        self.consent = Some(consent.into());
        self
    }

    /// Sets the issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// Validates the basic structure of this envelope.
    pub fn validate(&self) -> SamlResult<()> {
        if self.id.trim().is_empty() {
            return Err(SamlError::empty("request ID"));
        }
        if self.version != SAML_VERSION {
            return Err(SamlError::malformed(
                "Version",
                format!("unsupported SAML version '{}'", self.version),
            ));
        }
        Ok(())
    }

    /// Reads the envelope attributes and the optional `saml:Issuer` of a
    /// request element. The caller has already checked the element name.
    pub fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        let id = required_attribute(element, "ID")?;
        let version = required_attribute(element, "Version")?;
        let issue_instant = required_attribute(element, "IssueInstant")?;

        let envelope = Self {
            id: id.to_string(),
            version: version.to_string(),
            issue_instant: parse_instant(issue_instant)?,
            destination: element.attribute("Destination").map(str::to_string),
            consent: element.attribute("Consent").map(str::to_string),
            issuer: parse_optional_child::<Issuer>(element)?,
        };
        envelope.validate()?;
        Ok(envelope)
    }

    /// Builds the request element `qualified_name` in `namespace`, carrying
    /// the envelope attributes and the `saml:Issuer` child.
    pub fn create_element(&self, namespace: &str, qualified_name: &str) -> SamlResult<XmlElement> {
        self.validate()?;

        let mut element = XmlElement::new_qualified(namespace, qualified_name);
        element.set_attribute("ID", self.id.as_str());
        element.set_attribute("Version", self.version.as_str());
        element.set_attribute("IssueInstant", format_instant(&self.issue_instant));
        if let Some(destination) = &self.destination {
            element.set_attribute("Destination", destination.as_str());
        }
        if let Some(consent) = &self.consent {
            element.set_attribute("Consent", consent.as_str());
        }
        if let Some(issuer) = &self.issuer {
            issuer.to_xml(&mut element)?;
        }
        Ok(element)
    }
}

fn parse_instant(value: &str) -> SamlResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| SamlError::malformed("IssueInstant", format!("'{value}': {e}")))
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
