//! `saml:AuthenticatingAuthority`.

use serde::{Deserialize, Serialize};

use crate::convert::{append_text_element, expect_element, non_empty_trimmed, XmlConvertible, XmlRoot};
use crate::error::{SamlError, SamlResult};
use crate::xml::XmlElement;

use super::SAML_NS;

/// An authority that took part in authenticating the subject.
///
/// The authority is always a non-empty, trimmed URI: [`Self::new`],
/// [`Self::set_authority`] and [`XmlConvertible::from_xml`] all go through
/// the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthenticatingAuthority {
    authority: String,
}

impl AuthenticatingAuthority {
    /// Creates an authority, trimming surrounding whitespace.
    pub fn new(authority: &str) -> SamlResult<Self> {
        let mut this = Self {
            authority: String::new(),
        };
        this.set_authority(authority)?;
        Ok(this)
    }

    /// The authority URI.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Replaces the authority URI. On error the value is left unchanged.
    pub fn set_authority(&mut self, authority: &str) -> SamlResult<()> {
        self.authority = non_empty_trimmed(authority, Self::QUALIFIED_NAME)?;
        Ok(())
    }
}

impl TryFrom<String> for AuthenticatingAuthority {
    type Error = SamlError;

    fn try_from(value: String) -> SamlResult<Self> {
        Self::new(&value)
    }
}

impl From<AuthenticatingAuthority> for String {
    fn from(value: AuthenticatingAuthority) -> Self {
        value.authority
    }
}

impl XmlConvertible for AuthenticatingAuthority {
    const NAMESPACE: &'static str = SAML_NS;
    const QUALIFIED_NAME: &'static str = "saml:AuthenticatingAuthority";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;
        Self::new(&element.text_content())
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        if self.authority.is_empty() {
            return Err(SamlError::empty(Self::QUALIFIED_NAME));
        }
        Ok(append_text_element::<Self>(parent, &self.authority))
    }
}

impl XmlRoot for AuthenticatingAuthority {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_blank() {
        for input in ["", "   ", "\n\t"] {
            let err = AuthenticatingAuthority::new(input).unwrap_err();
            assert!(matches!(err, SamlError::EmptyRequiredValue(_)), "{input:?}");
        }
    }

    #[test]
    fn trims_on_every_path() {
        let authority = AuthenticatingAuthority::new(" https://idp.example/ ").unwrap();
        assert_eq!(authority.authority(), "https://idp.example/");

        let mut authority = authority;
        authority.set_authority("\n  https://other.example/\n").unwrap();
        assert_eq!(authority.authority(), "https://other.example/");

        assert!(authority.set_authority("  ").is_err());
        assert_eq!(authority.authority(), "https://other.example/");
    }

    #[test]
    fn marshalling() {
        let authority = AuthenticatingAuthority::new("https://sp.example.com/SAML2").unwrap();
        let mut root = XmlElement::new("root");
        let element = authority.to_xml(&mut root).unwrap();
        assert_eq!(element.text_content(), "https://sp.example.com/SAML2");

        let found = root.children_ns(SAML_NS, "AuthenticatingAuthority");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn unmarshalling_trims_text() {
        let xml = format!(
            "<saml:AuthenticatingAuthority xmlns:saml=\"{SAML_NS}\">\n    https://sp.example.com/SAML2\n</saml:AuthenticatingAuthority>"
        );
        let authority = AuthenticatingAuthority::from_xml_str(&xml).unwrap();
        assert_eq!(authority.authority(), "https://sp.example.com/SAML2");
    }

    #[test]
    fn unmarshalling_rejects_blank_text() {
        let xml = format!(r#"<saml:AuthenticatingAuthority xmlns:saml="{SAML_NS}">  </saml:AuthenticatingAuthority>"#);
        assert!(matches!(
            AuthenticatingAuthority::from_xml_str(&xml),
            Err(SamlError::EmptyRequiredValue(_))
        ));
    }

    #[test]
    fn serde_goes_through_validation() {
        let authority: AuthenticatingAuthority =
            serde_json::from_str(r#"" https://idp.example/ ""#).unwrap();
        assert_eq!(authority.authority(), "https://idp.example/");
        assert!(serde_json::from_str::<AuthenticatingAuthority>(r#""  ""#).is_err());
    }
}
