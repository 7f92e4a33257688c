//! `saml:AuthnContext` and its reference children.

use serde::{Deserialize, Serialize};

use crate::convert::{
    append_text_element, expect_element, non_empty_trimmed, optional_child, parse_children,
    XmlConvertible, XmlRoot,
};
use crate::error::{SamlError, SamlResult};
use crate::xml::XmlElement;

use super::{AuthenticatingAuthority, AuthnContextClass, AuthnContextDecl, SAML_NS};

/// Authentication context class reference (`saml:AuthnContextClassRef`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthnContextClassRef {
    class_ref: String,
}

impl AuthnContextClassRef {
    /// Creates a class reference from a URI, trimming surrounding whitespace.
    pub fn new(class_ref: &str) -> SamlResult<Self> {
        let mut this = Self {
            class_ref: String::new(),
        };
        this.set_class_ref(class_ref)?;
        Ok(this)
    }

    /// Creates a class reference for a well-known class.
    #[must_use]
    pub fn from_class(class: AuthnContextClass) -> Self {
        Self {
            class_ref: class.uri().to_string(),
        }
    }

    /// The class reference URI.
    #[must_use]
    pub fn class_ref(&self) -> &str {
        &self.class_ref
    }

    /// Replaces the class reference URI. On error the value is left unchanged.
    pub fn set_class_ref(&mut self, class_ref: &str) -> SamlResult<()> {
        self.class_ref = non_empty_trimmed(class_ref, Self::QUALIFIED_NAME)?;
        Ok(())
    }

    /// Returns the well-known class this reference names, if any.
    #[must_use]
    pub fn parsed_class(&self) -> Option<AuthnContextClass> {
        AuthnContextClass::from_uri(&self.class_ref)
    }
}

impl TryFrom<String> for AuthnContextClassRef {
    type Error = SamlError;

    fn try_from(value: String) -> SamlResult<Self> {
        Self::new(&value)
    }
}

impl From<AuthnContextClassRef> for String {
    fn from(value: AuthnContextClassRef) -> Self {
        value.class_ref
    }
}

impl XmlConvertible for AuthnContextClassRef {
    const NAMESPACE: &'static str = SAML_NS;
    const QUALIFIED_NAME: &'static str = "saml:AuthnContextClassRef";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;
        Self::new(&element.text_content())
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        if self.class_ref.is_empty() {
            return Err(SamlError::empty(Self::QUALIFIED_NAME));
        }
        Ok(append_text_element::<Self>(parent, &self.class_ref))
    }
}

impl XmlRoot for AuthnContextClassRef {}

/// Authentication context declaration reference (`saml:AuthnContextDeclRef`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthnContextDeclRef {
    decl_ref: String,
}

impl AuthnContextDeclRef {
    /// Creates a declaration reference, trimming surrounding whitespace.
    pub fn new(decl_ref: &str) -> SamlResult<Self> {
        let mut this = Self {
            decl_ref: String::new(),
        };
        this.set_decl_ref(decl_ref)?;
        Ok(this)
    }

    /// The declaration reference URI.
    #[must_use]
    pub fn decl_ref(&self) -> &str {
        &self.decl_ref
    }

    /// Replaces the declaration reference. On error the value is left unchanged.
    pub fn set_decl_ref(&mut self, decl_ref: &str) -> SamlResult<()> {
        self.decl_ref = non_empty_trimmed(decl_ref, Self::QUALIFIED_NAME)?;
        Ok(())
    }
}

impl TryFrom<String> for AuthnContextDeclRef {
    type Error = SamlError;

    fn try_from(value: String) -> SamlResult<Self> {
        Self::new(&value)
    }
}

impl From<AuthnContextDeclRef> for String {
    fn from(value: AuthnContextDeclRef) -> Self {
        value.decl_ref
    }
}

impl XmlConvertible for AuthnContextDeclRef {
    const NAMESPACE: &'static str = SAML_NS;
    const QUALIFIED_NAME: &'static str = "saml:AuthnContextDeclRef";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;
        Self::new(&element.text_content())
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        if self.decl_ref.is_empty() {
            return Err(SamlError::empty(Self::QUALIFIED_NAME));
        }
        Ok(append_text_element::<Self>(parent, &self.decl_ref))
    }
}

impl XmlRoot for AuthnContextDeclRef {}

/// Checks the `AuthnContext` choice group.
///
/// With a class reference neither a declaration nor a declaration reference
/// may be present. Without one, at least one of them must be; both together
/// are accepted.
fn check_exclusivity(class_ref: bool, decl: bool, decl_ref: bool) -> SamlResult<()> {
    if class_ref {
        if decl || decl_ref {
            return Err(SamlError::MutualExclusionViolation(
                "AuthnContextClassRef cannot be combined with AuthnContextDecl or AuthnContextDeclRef"
                    .to_string(),
            ));
        }
    } else if !decl && !decl_ref {
        return Err(SamlError::MutualExclusionViolation(
            "either an AuthnContextClassRef, an AuthnContextDecl or an AuthnContextDeclRef is required"
                .to_string(),
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
struct AuthnContextParts {
    class_ref: Option<AuthnContextClassRef>,
    decl: Option<AuthnContextDecl>,
    decl_ref: Option<AuthnContextDeclRef>,
    #[serde(default)]
    authorities: Vec<AuthenticatingAuthority>,
}

/// Authentication context (`saml:AuthnContext`).
///
/// Describes how the subject was authenticated: either by class reference,
/// or by declaration and/or declaration reference. The choice is validated
/// on every construction path and once more before serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthnContextParts")]
pub struct AuthnContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    class_ref: Option<AuthnContextClassRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decl: Option<AuthnContextDecl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decl_ref: Option<AuthnContextDeclRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authorities: Vec<AuthenticatingAuthority>,
}

impl AuthnContext {
    /// Creates an authentication context, validating the choice group.
    pub fn new(
        class_ref: Option<AuthnContextClassRef>,
        decl: Option<AuthnContextDecl>,
        decl_ref: Option<AuthnContextDeclRef>,
        authorities: Vec<AuthenticatingAuthority>,
    ) -> SamlResult<Self> {
        check_exclusivity(class_ref.is_some(), decl.is_some(), decl_ref.is_some())?;
        Ok(Self {
            class_ref,
            decl,
            decl_ref,
            authorities,
        })
    }

    /// Creates a context identified by a class reference.
    #[must_use]
    pub fn with_class_ref(class_ref: AuthnContextClassRef) -> Self {
        Self {
            class_ref: Some(class_ref),
            decl: None,
            decl_ref: None,
            authorities: Vec::new(),
        }
    }

    /// Creates a context for a well-known authentication class.
    #[must_use]
    pub fn with_class(class: AuthnContextClass) -> Self {
        Self::with_class_ref(AuthnContextClassRef::from_class(class))
    }

    /// Adds an authenticating authority.
    #[must_use]
    pub fn with_authority(mut self, authority: AuthenticatingAuthority) -> Self {
        self.authorities.push(authority);
        self
    }

    /// The class reference, if any.
    #[must_use]
    pub const fn class_ref(&self) -> Option<&AuthnContextClassRef> {
        self.class_ref.as_ref()
    }

    /// The declaration, if any.
    #[must_use]
    pub const fn decl(&self) -> Option<&AuthnContextDecl> {
        self.decl.as_ref()
    }

    /// The declaration reference, if any.
    #[must_use]
    pub const fn decl_ref(&self) -> Option<&AuthnContextDeclRef> {
        self.decl_ref.as_ref()
    }

    /// The authenticating authorities in document order.
    #[must_use]
    pub fn authorities(&self) -> &[AuthenticatingAuthority] {
        &self.authorities
    }

    /// Replaces the class reference. Fails, leaving the context unchanged, if
    /// the result would break the choice group.
    pub fn set_class_ref(&mut self, class_ref: Option<AuthnContextClassRef>) -> SamlResult<()> {
        check_exclusivity(class_ref.is_some(), self.decl.is_some(), self.decl_ref.is_some())?;
        self.class_ref = class_ref;
        Ok(())
    }

    /// Replaces the declaration. Fails, leaving the context unchanged, if the
    /// result would break the choice group.
    pub fn set_decl(&mut self, decl: Option<AuthnContextDecl>) -> SamlResult<()> {
        check_exclusivity(self.class_ref.is_some(), decl.is_some(), self.decl_ref.is_some())?;
        self.decl = decl;
        Ok(())
    }

    /// Replaces the declaration reference. Fails, leaving the context
    /// unchanged, if the result would break the choice group.
    pub fn set_decl_ref(&mut self, decl_ref: Option<AuthnContextDeclRef>) -> SamlResult<()> {
        check_exclusivity(self.class_ref.is_some(), self.decl.is_some(), decl_ref.is_some())?;
        self.decl_ref = decl_ref;
        Ok(())
    }

    /// Replaces the authenticating authorities.
    pub fn set_authorities(&mut self, authorities: Vec<AuthenticatingAuthority>) {
        self.authorities = authorities;
    }

    /// Appends an authenticating authority.
    pub fn add_authority(&mut self, authority: AuthenticatingAuthority) {
        self.authorities.push(authority);
    }

    /// Re-checks the choice group.
    pub fn validate(&self) -> SamlResult<()> {
        check_exclusivity(
            self.class_ref.is_some(),
            self.decl.is_some(),
            self.decl_ref.is_some(),
        )
    }
}

impl TryFrom<AuthnContextParts> for AuthnContext {
    type Error = SamlError;

    fn try_from(parts: AuthnContextParts) -> SamlResult<Self> {
        Self::new(parts.class_ref, parts.decl, parts.decl_ref, parts.authorities)
    }
}

impl XmlConvertible for AuthnContext {
    const NAMESPACE: &'static str = SAML_NS;
    const QUALIFIED_NAME: &'static str = "saml:AuthnContext";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;

        let class_ref = optional_child::<AuthnContextClassRef>(element)?;
        let decl_ref = optional_child::<AuthnContextDeclRef>(element)?;
        let decl = optional_child::<AuthnContextDecl>(element)?;
        check_exclusivity(class_ref.is_some(), decl.is_some(), decl_ref.is_some())?;

        Self::new(
            class_ref.map(AuthnContextClassRef::from_xml).transpose()?,
            AuthnContextDecl::from_optional(decl)?,
            decl_ref.map(AuthnContextDeclRef::from_xml).transpose()?,
            parse_children::<AuthenticatingAuthority>(element)?,
        )
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        self.validate()?;

        let mut element = Self::create_element();
        if let Some(class_ref) = &self.class_ref {
            class_ref.to_xml(&mut element)?;
        }
        if let Some(decl) = &self.decl {
            decl.to_xml(&mut element)?;
        }
        if let Some(decl_ref) = &self.decl_ref {
            decl_ref.to_xml(&mut element)?;
        }
        for authority in &self.authorities {
            authority.to_xml(&mut element)?;
        }

        Ok(parent.append_child(element))
    }
}

impl XmlRoot for AuthnContext {}
