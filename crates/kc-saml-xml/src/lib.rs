//! SAML 2.0 XML element marshalling for Keycloak Rust.
//!
//! This crate maps a set of SAML 2.0 elements onto Rust types and back:
//!
//! - **Leaf elements** - `saml:NameID`, `saml:Issuer`,
//!   `saml:AuthenticatingAuthority`, `saml:AuthnContextClassRef`,
//!   `saml:AuthnContextDeclRef` and `mdui:Logo`
//! - **Authentication context** - `saml:AuthnContext` with its choice group,
//!   and `saml:AuthnContextDecl` carried as an opaque foreign subtree
//! - **Protocol messages** - `samlp:ArtifactResolve` on top of the shared
//!   request envelope
//!
//! Everything is validated on the way in and on the way out. A value that
//! fails validation is never turned into XML, and a failed `to_xml` leaves
//! the parent element untouched.
//!
//! # Architecture
//!
//! - [`xml`] - A small owned XML tree with namespace resolution, built on `quick-xml`
//! - [`convert`] - The [`XmlConvertible`] and [`XmlRoot`] traits and parsing helpers
//! - [`types`] - The SAML element types
//! - [`config`] - Parser limits
//! - [`error`] - Error types for SAML operations
//!
//! # Example
//!
//! ```rust
//! use kc_saml_xml::{ArtifactResolve, Issuer, RequestEnvelope, XmlRoot};
//!
//! let request = ArtifactResolve::with_envelope(
//!     RequestEnvelope::new().with_issuer(Issuer::new("https://sp.example.com")),
//! )
//! .with_artifact("AAQAADWNEw5VT47wcO4zX/iEzMmFQvGknDfws2ZtqSGdkNSbsW1cmVR0bzU=")?;
//!
//! let xml = request.to_xml_string()?;
//! let parsed = ArtifactResolve::from_xml_str(&xml)?;
//! assert_eq!(parsed, request);
//! # Ok::<(), kc_saml_xml::SamlError>(())
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Metadata UI](https://docs.oasis-open.org/security/saml/Post2.0/sstc-saml-metadata-ui/v1.0/sstc-saml-metadata-ui-v1.0.pdf)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod convert;
pub mod error;
pub mod types;
pub mod xml;

pub use config::ParseOptions;
pub use convert::{XmlConvertible, XmlRoot};
pub use error::{SamlError, SamlResult};
pub use types::*;
pub use xml::{XmlDocument, XmlElement};
