//! `samlp:ArtifactResolve`.
//!
//! Sent by a relying party to exchange an artifact received through the
//! artifact binding for the protocol message it stands for.

use serde::{Deserialize, Serialize};

use crate::convert::{expect_element, XmlConvertible, XmlRoot};
use crate::error::{SamlError, SamlResult};
use crate::xml::XmlElement;

use super::{RequestEnvelope, SAMLP_NS};

const ARTIFACT: &str = "samlp:Artifact";

/// SAML artifact resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactResolve {
    #[serde(flatten)]
    envelope: RequestEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
}

impl Default for ArtifactResolve {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactResolve {
    /// Creates a request with a fresh envelope and no artifact.
    #[must_use]
    pub fn new() -> Self {
        Self::with_envelope(RequestEnvelope::new())
    }

    /// Creates a request around an existing envelope.
    #[must_use]
    pub const fn with_envelope(envelope: RequestEnvelope) -> Self {
        Self {
            envelope,
            artifact: None,
        }
    }

    /// Sets the artifact, rejecting an empty value.
    pub fn with_artifact(mut self, artifact: &str) -> SamlResult<Self> {
        self.set_artifact(artifact)?;
        Ok(self)
    }

    /// The request envelope.
    #[must_use]
    pub const fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }

    /// Mutable access to the request envelope.
    pub fn envelope_mut(&mut self) -> &mut RequestEnvelope {
        &mut self.envelope
    }

    /// The artifact to resolve.
    ///
    /// # Errors
    ///
    /// Fails with [`SamlError::EmptyRequiredValue`] when no artifact is set.
    pub fn artifact(&self) -> SamlResult<&str> {
        self.artifact
            .as_deref()
            .filter(|artifact| !artifact.is_empty())
            .ok_or_else(|| SamlError::empty(ARTIFACT))
    }

    /// Sets the artifact. Surrounding whitespace is removed; an empty value
    /// is rejected and the previous artifact kept.
    pub fn set_artifact(&mut self, artifact: &str) -> SamlResult<()> {
        let artifact = artifact.trim();
        if artifact.is_empty() {
            return Err(SamlError::empty(ARTIFACT));
        }
        self.artifact = Some(artifact.to_string());
        Ok(())
    }

    fn parse(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;
        let envelope = RequestEnvelope::from_xml(element)?;

        let artifacts = element.children_ns(SAMLP_NS, "Artifact");
        let artifact = match artifacts.as_slice() {
            [] => {
                return Err(SamlError::MissingRequiredChild {
                    element: element.qualified_name(),
                    child: ARTIFACT.to_string(),
                })
            }
            [artifact] => artifact.text_content(),
            _ => {
                return Err(SamlError::CardinalityViolation {
                    element: element.qualified_name(),
                    child: ARTIFACT.to_string(),
                    max: 1,
                    found: artifacts.len(),
                })
            }
        };

        let mut request = Self::with_envelope(envelope);
        request.set_artifact(&artifact)?;
        Ok(request)
    }
}

impl XmlConvertible for ArtifactResolve {
    const NAMESPACE: &'static str = SAMLP_NS;
    const QUALIFIED_NAME: &'static str = "samlp:ArtifactResolve";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        match Self::parse(element) {
            Ok(request) => {
                tracing::trace!(id = %request.envelope.id, "parsed ArtifactResolve");
                Ok(request)
            }
            Err(error) => {
                tracing::debug!(%error, "rejected ArtifactResolve");
                Err(error)
            }
        }
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        let artifact = self.artifact()?;

        let mut element = self
            .envelope
            .create_element(Self::NAMESPACE, Self::QUALIFIED_NAME)?;
        element.append_child(XmlElement::new_qualified(SAMLP_NS, ARTIFACT).with_text(artifact));

        tracing::trace!(id = %self.envelope.id, artifact, "serialized ArtifactResolve");
        Ok(parent.append_child(element))
    }
}

impl XmlRoot for ArtifactResolve {}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{Issuer, SAML_NS};

    const ARTIFACT_VALUE: &str = "AAQAADWNEw5VT47wcO4zX/iEzMmFQvGknDfws2ZtqSGdkNSbsW1cmVR0bzU=";

    fn request() -> ArtifactResolve {
        let envelope = RequestEnvelope::new()
            .with_id("_6c3a4f8b9c2d")
            .with_issue_instant(Utc.with_ymd_and_hms(2004, 1, 21, 19, 0, 49).unwrap())
            .with_issuer(Issuer::new("https://ServiceProvider.com/SAML"));
        ArtifactResolve::with_envelope(envelope)
            .with_artifact(ARTIFACT_VALUE)
            .unwrap()
    }

    #[test]
    fn artifact_accessors() {
        let mut request = ArtifactResolve::new();
        assert!(matches!(request.artifact(), Err(SamlError::EmptyRequiredValue(_))));
        assert!(request.set_artifact("  ").is_err());
        request.set_artifact(" abc ").unwrap();
        assert_eq!(request.artifact().unwrap(), "abc");
    }

    #[test]
    fn marshalling() {
        let document = request().to_document().unwrap();
        let root = document.root();
        assert!(root.is(SAMLP_NS, "ArtifactResolve"));
        assert_eq!(root.attribute("ID"), Some("_6c3a4f8b9c2d"));
        assert_eq!(root.attribute("IssueInstant"), Some("2004-01-21T19:00:49Z"));

        let names: Vec<String> = root.child_elements().map(XmlElement::qualified_name).collect();
        assert_eq!(names, ["saml:Issuer", "samlp:Artifact"]);
        assert_eq!(root.children_ns(SAMLP_NS, "Artifact")[0].text_content(), ARTIFACT_VALUE);
    }

    #[test]
    fn marshalling_without_artifact_creates_nothing() {
        let mut parent = XmlElement::new("Body");
        let err = ArtifactResolve::new().to_xml(&mut parent).unwrap_err();
        assert!(matches!(err, SamlError::EmptyRequiredValue(_)));
        assert!(parent.children().is_empty());
        assert!(ArtifactResolve::new().to_document().is_err());
    }

    #[test]
    fn unmarshalling() {
        let xml = format!(
            r#"<samlp:ArtifactResolve xmlns:samlp="{SAMLP_NS}" xmlns:saml="{SAML_NS}"
    ID="_6c3a4f8b9c2d" Version="2.0" IssueInstant="2004-01-21T19:00:49Z">
  <saml:Issuer>https://ServiceProvider.com/SAML</saml:Issuer>
  <samlp:Artifact>
    {ARTIFACT_VALUE}
  </samlp:Artifact>
</samlp:ArtifactResolve>"#
        );
        let parsed = ArtifactResolve::from_xml_str(&xml).unwrap();
        assert_eq!(parsed.artifact().unwrap(), ARTIFACT_VALUE);
        assert_eq!(
            parsed.envelope().issuer.as_ref().map(|issuer| issuer.value.as_str()),
            Some("https://ServiceProvider.com/SAML")
        );
        assert_eq!(parsed, request());
    }

    #[test]
    fn unmarshalling_requires_one_artifact() {
        let missing = format!(
            r#"<samlp:ArtifactResolve xmlns:samlp="{SAMLP_NS}" ID="_1" Version="2.0" IssueInstant="2004-01-21T19:00:49Z"/>"#
        );
        assert!(matches!(
            ArtifactResolve::from_xml_str(&missing),
            Err(SamlError::MissingRequiredChild { .. })
        ));

        let two = format!(
            r#"<samlp:ArtifactResolve xmlns:samlp="{SAMLP_NS}" ID="_1" Version="2.0" IssueInstant="2004-01-21T19:00:49Z"><samlp:Artifact>a</samlp:Artifact><samlp:Artifact>b</samlp:Artifact></samlp:ArtifactResolve>"#
        );
        assert!(matches!(
            ArtifactResolve::from_xml_str(&two),
            Err(SamlError::CardinalityViolation { found: 2, .. })
        ));

        let empty = format!(
            r#"<samlp:ArtifactResolve xmlns:samlp="{SAMLP_NS}" ID="_1" Version="2.0" IssueInstant="2004-01-21T19:00:49Z"><samlp:Artifact> </samlp:Artifact></samlp:ArtifactResolve>"#
        );
        assert!(matches!(
            ArtifactResolve::from_xml_str(&empty),
            Err(SamlError::EmptyRequiredValue(_))
        ));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let xml = format!(r#"<samlp:ArtifactResponse xmlns:samlp="{SAMLP_NS}"/>"#);
        assert!(matches!(
            ArtifactResolve::from_xml_str(&xml),
            Err(SamlError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn roundtrip() {
        let request = request();
        let xml = request.to_xml_string().unwrap();
        assert_eq!(ArtifactResolve::from_xml_str(&xml).unwrap(), request);
    }
}
