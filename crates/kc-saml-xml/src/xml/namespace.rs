//! Stack-based namespace scopes shared by the parser and the writer.

use crate::types::{XMLNS_NS, XML_NS};

#[derive(Debug, Clone)]
struct Binding {
    prefix: Option<String>,
    uri: String,
    depth: usize,
}

/// Prefix to URI bindings, scoped by element depth.
///
/// A default namespace is stored under the `None` prefix. An empty URI bound
/// to `None` undeclares the default namespace.
#[derive(Debug)]
pub(crate) struct NamespaceScopes {
    bindings: Vec<Binding>,
    depth: usize,
}

impl NamespaceScopes {
    pub(crate) fn new() -> Self {
        Self {
            bindings: vec![
                Binding {
                    prefix: Some("xml".to_string()),
                    uri: XML_NS.to_string(),
                    depth: 0,
                },
                Binding {
                    prefix: Some("xmlns".to_string()),
                    uri: XMLNS_NS.to_string(),
                    depth: 0,
                },
            ],
            depth: 0,
        }
    }

    /// Enter a new element scope.
    pub(crate) fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, removing any bindings declared in it.
    pub(crate) fn pop_scope(&mut self) {
        while self
            .bindings
            .last()
            .is_some_and(|binding| binding.depth >= self.depth)
        {
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn bind(&mut self, prefix: Option<&str>, uri: &str) {
        self.bindings.push(Binding {
            prefix: prefix.map(str::to_string),
            uri: uri.to_string(),
            depth: self.depth,
        });
    }

    /// Returns the URI currently bound to `prefix`, innermost first.
    pub(crate) fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|binding| binding.prefix.as_deref() == prefix)
            .map(|binding| binding.uri.as_str())
    }

    /// Resolves the namespace of an element name.
    ///
    /// Unprefixed names take the default namespace; `None` means "no
    /// namespace". An unbound prefix yields `Err` with the prefix.
    pub(crate) fn resolve_element<'p>(
        &self,
        prefix: Option<&'p str>,
    ) -> Result<Option<String>, &'p str> {
        match prefix {
            None => Ok(self
                .lookup(None)
                .filter(|uri| !uri.is_empty())
                .map(str::to_string)),
            Some(p) => self.lookup(Some(p)).map(|uri| Some(uri.to_string())).ok_or(p),
        }
    }

    /// Resolves the namespace of an attribute name. Unprefixed attributes are
    /// never in a namespace.
    pub(crate) fn resolve_attribute<'p>(
        &self,
        prefix: Option<&'p str>,
    ) -> Result<Option<String>, &'p str> {
        match prefix {
            None => Ok(None),
            Some(p) => self.resolve_element(Some(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_prefix_is_prebound() {
        let scopes = NamespaceScopes::new();
        assert_eq!(scopes.lookup(Some("xml")), Some(XML_NS));
        assert_eq!(scopes.lookup(None), None);
    }

    #[test]
    fn bindings_are_scoped() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.bind(Some("saml"), "urn:outer");
        scopes.push_scope();
        scopes.bind(Some("saml"), "urn:inner");
        assert_eq!(scopes.lookup(Some("saml")), Some("urn:inner"));
        scopes.pop_scope();
        assert_eq!(scopes.lookup(Some("saml")), Some("urn:outer"));
        scopes.pop_scope();
        assert_eq!(scopes.lookup(Some("saml")), None);
    }

    #[test]
    fn empty_default_namespace_means_none() {
        let mut scopes = NamespaceScopes::new();
        scopes.push_scope();
        scopes.bind(None, "urn:default");
        scopes.push_scope();
        scopes.bind(None, "");
        assert_eq!(scopes.resolve_element(None), Ok(None));
        assert_eq!(scopes.resolve_element(Some("nope")), Err("nope"));
    }
}
