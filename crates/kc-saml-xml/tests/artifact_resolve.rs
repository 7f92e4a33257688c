//! `samlp:ArtifactResolve` end to end.

use chrono::{TimeZone, Utc};
use kc_saml_xml::{
    ArtifactResolve, Issuer, NameIdFormat, RequestEnvelope, SamlError, XmlConvertible,
    XmlDocument, XmlElement, XmlRoot, SAMLP_NS,
};

use crate::common::{artifact_resolve_xml, init_tracing, ARTIFACT};

/// Parses the reference message and checks every envelope field.
#[test]
fn test_parse_artifact_resolve() -> anyhow::Result<()> {
    init_tracing();

    let request = ArtifactResolve::from_xml_str(&artifact_resolve_xml())?;
    let envelope = request.envelope();

    assert_eq!(request.artifact()?, ARTIFACT);
    assert_eq!(envelope.id, "_cce4ee769ed970b501d680f697989d14");
    assert_eq!(envelope.version, "2.0");
    assert_eq!(
        envelope.issue_instant,
        Utc.with_ymd_and_hms(2004, 12, 5, 9, 21, 59).unwrap()
    );
    assert_eq!(
        envelope.destination.as_deref(),
        Some("https://idp.example.org/SAML2/ArtifactResolution")
    );
    assert_eq!(envelope.consent, None);

    let issuer = envelope.issuer.as_ref().expect("issuer");
    assert_eq!(issuer.value, "https://sp.example.com/SAML2");
    assert_eq!(issuer.parsed_format(), Some(NameIdFormat::Entity));

    Ok(())
}

/// A message built in code survives serialization unchanged.
#[test]
fn test_build_and_reparse() -> anyhow::Result<()> {
    init_tracing();

    let envelope = RequestEnvelope::new()
        .with_destination("https://idp.example.org/SAML2/ArtifactResolution")
        .with_consent("urn:oasis:names:tc:SAML:2.0:consent:obtained")
        .with_issuer(Issuer::new("https://sp.example.com/SAML2"));
    let request = ArtifactResolve::with_envelope(envelope).with_artifact(ARTIFACT)?;

    let xml = request.to_xml_string()?;
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(ArtifactResolve::from_xml_str(&xml)?, request);

    Ok(())
}

/// The request can be embedded in a caller-owned parent such as a SOAP body.
#[test]
fn test_embed_in_soap_body() -> anyhow::Result<()> {
    const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

    let request = ArtifactResolve::new().with_artifact(ARTIFACT)?;
    let mut soap = XmlElement::new_qualified(SOAP_NS, "SOAP-ENV:Envelope");
    let body = soap.append_child(XmlElement::new_qualified(SOAP_NS, "SOAP-ENV:Body"));
    request.to_xml(body)?;

    let reparsed = XmlDocument::parse(&XmlDocument::new(soap).to_xml_string()?)?;
    let body = reparsed.root().children_ns(SOAP_NS, "Body")[0];
    let inner = body.children_ns(SAMLP_NS, "ArtifactResolve")[0];
    assert_eq!(ArtifactResolve::from_xml(inner)?, request);

    Ok(())
}

/// Serializing without an artifact fails and leaves the parent untouched.
#[test]
fn test_missing_artifact_is_rejected() -> anyhow::Result<()> {
    let mut parent = XmlElement::new("Body");
    let err = ArtifactResolve::new().to_xml(&mut parent).unwrap_err();

    assert!(matches!(err, SamlError::EmptyRequiredValue(_)));
    assert!(err.is_validation_error());
    assert!(parent.children().is_empty());

    Ok(())
}

/// A request with the wrong protocol version is refused.
#[test]
fn test_version_mismatch() -> anyhow::Result<()> {
    init_tracing();

    let xml = artifact_resolve_xml().replace(r#"Version="2.0""#, r#"Version="1.1""#);
    let err = ArtifactResolve::from_xml_str(&xml).unwrap_err();
    assert!(matches!(err, SamlError::MalformedValue { .. }));

    Ok(())
}
