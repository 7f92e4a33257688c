//! XML serialization on top of `quick-xml`.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{SamlError, SamlResult};

use super::namespace::NamespaceScopes;
use super::node::{XmlElement, XmlNode};

/// Serializes `element` and its subtree, optionally preceded by an XML declaration.
pub(crate) fn write_element(element: &XmlElement, with_declaration: bool) -> SamlResult<String> {
    let mut out = ElementWriter {
        writer: Writer::new(Vec::new()),
        scopes: NamespaceScopes::new(),
    };
    if with_declaration {
        out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    out.write(element)?;
    String::from_utf8(out.writer.into_inner()).map_err(|e| SamlError::XmlWrite(e.to_string()))
}

struct ElementWriter {
    writer: Writer<Vec<u8>>,
    scopes: NamespaceScopes,
}

impl ElementWriter {
    fn emit(&mut self, event: Event<'_>) -> SamlResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| SamlError::XmlWrite(e.to_string()))
    }

    fn write(&mut self, element: &XmlElement) -> SamlResult<()> {
        self.scopes.push_scope();

        let declarations = self.declarations_for(element);
        let name = element.qualified_name();
        let mut start = BytesStart::new(name.as_str());
        for (key, uri) in &declarations {
            start.push_attribute((key.as_str(), uri.as_str()));
        }
        let attribute_names: Vec<String> = element
            .attributes()
            .iter()
            .map(super::node::XmlAttribute::qualified_name)
            .collect();
        for (attribute, key) in element.attributes().iter().zip(&attribute_names) {
            start.push_attribute((key.as_str(), attribute.value()));
        }

        if element.children().is_empty() {
            self.emit(Event::Empty(start))?;
        } else {
            self.emit(Event::Start(start))?;
            for child in element.children() {
                match child {
                    XmlNode::Element(child) => self.write(child)?,
                    XmlNode::Text(text) => self.emit(Event::Text(BytesText::new(text)))?,
                    XmlNode::CData(text) => self.emit(Event::CData(BytesCData::new(text.as_str())))?,
                    XmlNode::Comment(text) => {
                        self.emit(Event::Comment(BytesText::from_escaped(text.as_str())))?;
                    }
                }
            }
            self.emit(Event::End(BytesEnd::new(name.as_str())))?;
        }

        self.scopes.pop_scope();
        Ok(())
    }

    /// Binds and returns the `xmlns` attributes `element` needs: its explicit
    /// declarations plus any binding the names it uses are missing.
    fn declarations_for(&mut self, element: &XmlElement) -> Vec<(String, String)> {
        let mut declarations = Vec::new();

        for declaration in element.namespace_declarations() {
            let prefix = declaration.prefix.as_deref();
            if self.scopes.lookup(prefix) != Some(declaration.uri.as_str()) {
                self.declare(prefix, &declaration.uri, &mut declarations);
            }
        }

        let prefix = element.prefix();
        let bound = self.scopes.lookup(prefix);
        match element.namespace() {
            Some(ns) if bound != Some(ns) => self.declare(prefix, ns, &mut declarations),
            None if prefix.is_none() && bound.is_some_and(|uri| !uri.is_empty()) => {
                self.declare(None, "", &mut declarations);
            }
            _ => {}
        }

        for attribute in element.attributes() {
            if let (Some(prefix), Some(ns)) = (attribute.prefix(), attribute.namespace()) {
                if self.scopes.lookup(Some(prefix)) != Some(ns) {
                    self.declare(Some(prefix), ns, &mut declarations);
                }
            }
        }

        declarations
    }

    fn declare(&mut self, prefix: Option<&str>, uri: &str, out: &mut Vec<(String, String)>) {
        let key = match prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        self.scopes.bind(prefix, uri);
        out.push((key, uri.to_string()));
    }
}
