//! XML parsing on top of `quick-xml`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::ParseOptions;
use crate::error::{SamlError, SamlResult};

use super::namespace::NamespaceScopes;
use super::node::{split_qualified_name, NamespaceDeclaration, XmlElement, XmlNode};

/// Parses `input` into its root element.
pub(crate) fn parse_root(input: &str, options: &ParseOptions) -> SamlResult<XmlElement> {
    if input.len() > options.max_document_size {
        return Err(SamlError::XmlParse(format!(
            "document of {} bytes exceeds the limit of {} bytes",
            input.len(),
            options.max_document_size
        )));
    }

    let mut reader = Reader::from_str(input);
    let mut scopes = NamespaceScopes::new();
    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                check_new_element(&open, root.as_ref(), options)?;
                let element = open_element(&start, &mut scopes)?;
                open.push(element);
            }
            Event::Empty(start) => {
                check_new_element(&open, root.as_ref(), options)?;
                let element = open_element(&start, &mut scopes)?;
                scopes.pop_scope();
                attach(&mut open, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml has already checked the end tag matches.
                let element = open
                    .pop()
                    .ok_or_else(|| SamlError::XmlParse("unexpected end tag".to_string()))?;
                scopes.pop_scope();
                attach(&mut open, &mut root, element);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match open.last_mut() {
                    Some(parent) => parent.push_node(XmlNode::Text(text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(SamlError::XmlParse(
                            "text content outside of the root element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)?.to_string();
                match open.last_mut() {
                    Some(parent) => parent.push_node(XmlNode::CData(text)),
                    None => {
                        return Err(SamlError::XmlParse(
                            "CDATA outside of the root element".to_string(),
                        ))
                    }
                }
            }
            Event::Comment(comment) => {
                if options.preserve_comments {
                    if let Some(parent) = open.last_mut() {
                        let text = std::str::from_utf8(&comment)?.to_string();
                        parent.push_node(XmlNode::Comment(text));
                    }
                }
            }
            Event::DocType(_) => {
                return Err(SamlError::XmlParse(
                    "DOCTYPE declarations are not allowed".to_string(),
                ));
            }
            Event::Decl(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(SamlError::XmlParse(format!(
            "unexpected end of document inside <{}>",
            unclosed.qualified_name()
        )));
    }
    root.ok_or_else(|| SamlError::XmlParse("document has no root element".to_string()))
}

fn check_new_element(
    open: &[XmlElement],
    root: Option<&XmlElement>,
    options: &ParseOptions,
) -> SamlResult<()> {
    if open.is_empty() && root.is_some() {
        return Err(SamlError::XmlParse(
            "document has more than one root element".to_string(),
        ));
    }
    if open.len() >= options.max_depth {
        return Err(SamlError::XmlParse(format!(
            "element nesting exceeds the limit of {}",
            options.max_depth
        )));
    }
    Ok(())
}

fn attach(open: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match open.last_mut() {
        Some(parent) => parent.push_node(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

/// Builds an element from a start tag, pushing a namespace scope for it.
fn open_element(start: &BytesStart<'_>, scopes: &mut NamespaceScopes) -> SamlResult<XmlElement> {
    scopes.push_scope();

    let mut declarations = Vec::new();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?;
        let value = attribute.unescape_value()?.into_owned();
        if key == "xmlns" {
            declarations.push(NamespaceDeclaration { prefix: None, uri: value });
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            if value.is_empty() {
                return Err(SamlError::XmlParse(format!(
                    "prefix '{prefix}' cannot be bound to an empty namespace"
                )));
            }
            declarations.push(NamespaceDeclaration {
                prefix: Some(prefix.to_string()),
                uri: value,
            });
        } else {
            attributes.push((key.to_string(), value));
        }
    }

    for declaration in &declarations {
        scopes.bind(declaration.prefix.as_deref(), &declaration.uri);
    }

    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref())?;
    let (prefix, local_name) = split_qualified_name(name);
    let namespace = scopes
        .resolve_element(prefix)
        .map_err(|p| SamlError::XmlParse(format!("unbound namespace prefix '{p}' on <{name}>")))?;

    let mut element = XmlElement::from_parts(
        prefix.map(str::to_string),
        local_name.to_string(),
        namespace,
        declarations,
    );

    for (key, value) in attributes {
        let (prefix, local_name) = split_qualified_name(&key);
        let namespace = scopes.resolve_attribute(prefix).map_err(|p| {
            SamlError::XmlParse(format!("unbound namespace prefix '{p}' on attribute '{key}'"))
        })?;
        element.push_parsed_attribute(
            prefix.map(str::to_string),
            local_name.to_string(),
            namespace,
            value,
        );
    }
    declare_value_prefixes(&mut element, scopes);

    Ok(element)
}

/// Pins the bindings of prefixes used inside QName-valued attributes (such as
/// `xsi:type="ac:AuthnContextDeclarationBaseType"`) onto the element, so the
/// value still resolves after the subtree is moved to another document.
fn declare_value_prefixes(element: &mut XmlElement, scopes: &NamespaceScopes) {
    let mut pinned = Vec::new();
    for attribute in element.attributes() {
        let Some((prefix, local)) = attribute.value().split_once(':') else {
            continue;
        };
        if prefix.is_empty() || local.is_empty() || local.contains([':', '/']) {
            continue;
        }
        let declared = element
            .namespace_declarations()
            .iter()
            .any(|d| d.prefix.as_deref() == Some(prefix));
        if declared {
            continue;
        }
        if let Some(uri) = scopes.lookup(Some(prefix)) {
            pinned.push((prefix.to_string(), uri.to_string()));
        }
    }
    for (prefix, uri) in pinned {
        element.declare_namespace(Some(&prefix), &uri);
    }
}
