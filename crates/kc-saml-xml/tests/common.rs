//! Common test utilities and fixtures.

use kc_saml_xml::{SAMLP_NS, SAML_NS};

/// Installs a test subscriber once so `debug!` rejections show up with
/// `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kc_saml_xml=trace")
        .with_test_writer()
        .try_init();
}

/// Artifact value from the SAML 2.0 bindings examples.
pub const ARTIFACT: &str = "AAQAADWNEw5VT47wcO4zX/iEzMmFQvGknDfws2ZtqSGdkNSbsW1cmVR0bzU=";

/// A complete `samlp:ArtifactResolve` as a service provider would send it.
pub fn artifact_resolve_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<samlp:ArtifactResolve xmlns:samlp="{SAMLP_NS}" xmlns:saml="{SAML_NS}"
    ID="_cce4ee769ed970b501d680f697989d14" Version="2.0"
    IssueInstant="2004-12-05T09:21:59Z"
    Destination="https://idp.example.org/SAML2/ArtifactResolution">
  <saml:Issuer>https://sp.example.com/SAML2</saml:Issuer>
  <samlp:Artifact>{ARTIFACT}</samlp:Artifact>
</samlp:ArtifactResolve>"#
    )
}

/// An `saml:AuthnContext` carrying a declaration by value and by reference.
pub fn authn_context_with_decl_xml() -> String {
    format!(
        r#"<saml:AuthnContext xmlns:saml="{SAML_NS}">
  <saml:AuthnContextDecl>
    <ac:AuthenticationContextDeclaration xmlns:ac="urn:oasis:names:tc:SAML:2.0:ac">
      <ac:AuthnMethod>
        <ac:Authenticator>
          <ac:RestrictedPassword>
            <ac:Length min="4"/>
          </ac:RestrictedPassword>
        </ac:Authenticator>
      </ac:AuthnMethod>
    </ac:AuthenticationContextDeclaration>
  </saml:AuthnContextDecl>
  <saml:AuthnContextDeclRef>https://idp.example.org/decls/password.xml</saml:AuthnContextDeclRef>
  <saml:AuthenticatingAuthority>https://idp.example.org</saml:AuthenticatingAuthority>
  <saml:AuthenticatingAuthority>https://proxy.example.org</saml:AuthenticatingAuthority>
</saml:AuthnContext>"#
    )
}
