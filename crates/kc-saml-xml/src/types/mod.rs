//! Typed SAML 2.0 elements.
//!
//! Each type maps to one namespace-qualified element through
//! [`XmlConvertible`](crate::XmlConvertible). Types that can stand alone as
//! a document also implement [`XmlRoot`](crate::XmlRoot).

mod artifact_resolve;
mod authenticating_authority;
mod authn_context;
mod authn_context_decl;
mod constants;
mod logo;
mod name_id;
mod request;

pub use artifact_resolve::*;
pub use authenticating_authority::*;
pub use authn_context::*;
pub use authn_context_decl::*;
pub use constants::*;
pub use logo::*;
pub use name_id::*;
pub use request::*;
