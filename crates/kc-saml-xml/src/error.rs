//! SAML marshalling error types.
//!
//! Every failure raised while reading or writing a SAML element is reported
//! through [`SamlError`]. Callers are expected to treat any of them as a
//! permanent rejection of the enclosing message.

use thiserror::Error;

use crate::types::status_codes;

/// Result type for SAML marshalling operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML marshalling errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamlError {
    /// A mandatory attribute is absent.
    #[error("missing required attribute '{attribute}' on {element}")]
    MissingRequiredAttribute {
        /// Qualified name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: String,
    },

    /// A mandatory child element is absent.
    #[error("missing required child {child} in {element}")]
    MissingRequiredChild {
        /// Qualified name of the parent element.
        element: String,
        /// Qualified name of the missing child.
        child: String,
    },

    /// A value that must not be empty is empty (after trimming).
    #[error("empty value for {0}")]
    EmptyRequiredValue(String),

    /// A mutually exclusive group of children is violated.
    #[error("mutually exclusive elements: {0}")]
    MutualExclusionViolation(String),

    /// A value is present but cannot be coerced or fails format validation.
    #[error("malformed {what}: {reason}")]
    MalformedValue {
        /// What was being validated.
        what: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An element occurs more often than the schema allows.
    #[error("{element} allows at most {max} {child}, found {found}")]
    CardinalityViolation {
        /// Qualified name of the parent element.
        element: String,
        /// Qualified name of the repeated child.
        child: String,
        /// Maximum number of occurrences allowed.
        max: usize,
        /// Number of occurrences found.
        found: usize,
    },

    /// The element handed to `from_xml` is not the one the type maps to.
    #[error("unexpected element: expected {expected}, found {found}")]
    UnexpectedElement {
        /// Expected `{namespace}local` name.
        expected: String,
        /// Actual `{namespace}local` name.
        found: String,
    },

    /// The input is not well-formed or not acceptable XML.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// The element tree could not be written out.
    #[error("XML serialization error: {0}")]
    XmlWrite(String),
}

impl SamlError {
    /// Creates a [`SamlError::MalformedValue`].
    pub fn malformed(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedValue {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`SamlError::EmptyRequiredValue`].
    pub fn empty(what: impl Into<String>) -> Self {
        Self::EmptyRequiredValue(what.into())
    }

    /// Returns `true` for errors caused by the content of the message rather
    /// than by the XML layer.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        !matches!(self, Self::XmlParse(_) | Self::XmlWrite(_))
    }

    /// Returns the SAML status code a responder should use when this error
    /// causes a message to be rejected.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        match self {
            Self::XmlWrite(_) => status_codes::RESPONDER,
            _ => status_codes::REQUESTER,
        }
    }
}

impl From<quick_xml::Error> for SamlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SamlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<std::str::Utf8Error> for SamlError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::XmlParse(format!("invalid UTF-8: {err}"))
    }
}
