//! The contract shared by every typed SAML element.
//!
//! A type implementing [`XmlConvertible`] maps to exactly one
//! namespace-qualified XML element. Reading validates everything before a
//! value is returned; writing validates everything before a node is created,
//! so a failed `to_xml` never leaves a partial subtree behind.

use crate::error::{SamlError, SamlResult};
use crate::xml::{clark_name, split_qualified_name, XmlDocument, XmlElement};

/// Bidirectional mapping between a typed value and one XML element.
pub trait XmlConvertible: Sized {
    /// Namespace URI of the element.
    const NAMESPACE: &'static str;

    /// Name (with its conventional prefix) used when building the element.
    const QUALIFIED_NAME: &'static str;

    /// Reads and validates a value from `element`.
    fn from_xml(element: &XmlElement) -> SamlResult<Self>;

    /// Appends this value as the last child of `parent` and returns the new
    /// element.
    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement>;

    /// The local part of [`Self::QUALIFIED_NAME`].
    #[must_use]
    fn local_name() -> &'static str {
        split_qualified_name(Self::QUALIFIED_NAME).1
    }

    /// Creates an empty element with this type's name.
    #[must_use]
    fn create_element() -> XmlElement {
        XmlElement::new_qualified(Self::NAMESPACE, Self::QUALIFIED_NAME)
    }
}

/// Elements that may be serialized without a parent, as the root of a new
/// document.
///
/// Types that only make sense nested inside another element do not
/// implement this trait, so calling [`XmlRoot::to_document`] on them does
/// not compile.
pub trait XmlRoot: XmlConvertible {
    /// Serializes this value as the root of a fresh document.
    fn to_document(&self) -> SamlResult<XmlDocument> {
        let mut scratch = XmlElement::new("scratch");
        self.to_xml(&mut scratch)?;
        XmlDocument::from_scratch(scratch)
    }

    /// Serializes this value to a standalone XML string.
    fn to_xml_string(&self) -> SamlResult<String> {
        self.to_document()?.to_xml_string()
    }

    /// Parses a standalone XML string whose root is this element.
    fn from_xml_str(xml: &str) -> SamlResult<Self> {
        let document = XmlDocument::parse(xml)?;
        Self::from_xml(document.root())
    }
}

/// Fails unless `element` is the element `T` maps to.
pub fn expect_element<T: XmlConvertible>(element: &XmlElement) -> SamlResult<()> {
    if element.is(T::NAMESPACE, T::local_name()) {
        Ok(())
    } else {
        Err(SamlError::UnexpectedElement {
            expected: clark_name(Some(T::NAMESPACE), T::local_name()),
            found: clark_name(element.namespace(), element.local_name()),
        })
    }
}

/// Returns the single `T` child of `element`, if present.
pub fn optional_child<'e, T: XmlConvertible>(
    element: &'e XmlElement,
) -> SamlResult<Option<&'e XmlElement>> {
    let children = element.children_ns(T::NAMESPACE, T::local_name());
    match children.as_slice() {
        [] => Ok(None),
        [child] => Ok(Some(*child)),
        _ => Err(SamlError::CardinalityViolation {
            element: element.qualified_name(),
            child: T::QUALIFIED_NAME.to_string(),
            max: 1,
            found: children.len(),
        }),
    }
}

/// Returns the single `T` child of `element`, failing if it is absent.
pub fn required_child<'e, T: XmlConvertible>(element: &'e XmlElement) -> SamlResult<&'e XmlElement> {
    optional_child::<T>(element)?.ok_or_else(|| SamlError::MissingRequiredChild {
        element: element.qualified_name(),
        child: T::QUALIFIED_NAME.to_string(),
    })
}

/// Parses the optional single `T` child of `element`.
pub fn parse_optional_child<T: XmlConvertible>(element: &XmlElement) -> SamlResult<Option<T>> {
    optional_child::<T>(element)?.map(T::from_xml).transpose()
}

/// Parses every `T` child of `element`, in document order.
pub fn parse_children<T: XmlConvertible>(element: &XmlElement) -> SamlResult<Vec<T>> {
    element
        .children_ns(T::NAMESPACE, T::local_name())
        .into_iter()
        .map(T::from_xml)
        .collect()
}

/// Returns the value of a mandatory attribute.
pub fn required_attribute<'e>(element: &'e XmlElement, name: &str) -> SamlResult<&'e str> {
    element
        .attribute(name)
        .ok_or_else(|| SamlError::MissingRequiredAttribute {
            element: element.qualified_name(),
            attribute: name.to_string(),
        })
}

/// Trims `value`, failing if nothing is left.
pub(crate) fn non_empty_trimmed(value: &str, what: &str) -> SamlResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SamlError::empty(what));
    }
    Ok(trimmed.to_string())
}

/// Appends a `T` element holding only `text` to `parent`.
pub(crate) fn append_text_element<'p, T: XmlConvertible>(
    parent: &'p mut XmlElement,
    text: &str,
) -> &'p mut XmlElement {
    parent.append_child(T::create_element().with_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:example";

    #[derive(Debug, PartialEq)]
    struct Label(String);

    impl XmlConvertible for Label {
        const NAMESPACE: &'static str = NS;
        const QUALIFIED_NAME: &'static str = "ex:Label";

        fn from_xml(element: &XmlElement) -> SamlResult<Self> {
            expect_element::<Self>(element)?;
            Ok(Self(non_empty_trimmed(&element.text_content(), "ex:Label")?))
        }

        fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
            Ok(append_text_element::<Self>(parent, &self.0))
        }
    }

    impl XmlRoot for Label {}

    #[test]
    fn local_name_strips_prefix() {
        assert_eq!(Label::local_name(), "Label");
    }

    #[test]
    fn root_serialization_roundtrip() {
        let label = Label("hello".to_string());
        let xml = label.to_xml_string().unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><ex:Label xmlns:ex="urn:example">hello</ex:Label>"#
        );
        assert_eq!(Label::from_xml_str(&xml).unwrap(), label);
    }

    #[test]
    fn wrong_element_is_rejected() {
        let element = XmlElement::new_qualified("urn:other", "o:Label");
        let err = Label::from_xml(&element).unwrap_err();
        assert_eq!(
            err,
            SamlError::UnexpectedElement {
                expected: "{urn:example}Label".to_string(),
                found: "{urn:other}Label".to_string(),
            }
        );
    }

    #[test]
    fn optional_child_enforces_cardinality() {
        let mut parent = XmlElement::new("parent");
        assert_eq!(parse_optional_child::<Label>(&parent).unwrap(), None);

        Label("a".to_string()).to_xml(&mut parent).unwrap();
        assert_eq!(
            parse_optional_child::<Label>(&parent).unwrap(),
            Some(Label("a".to_string()))
        );

        Label("b".to_string()).to_xml(&mut parent).unwrap();
        let err = parse_optional_child::<Label>(&parent).unwrap_err();
        assert!(matches!(err, SamlError::CardinalityViolation { found: 2, .. }));
        assert_eq!(parse_children::<Label>(&parent).unwrap().len(), 2);
    }

    #[test]
    fn required_child_reports_missing() {
        let parent = XmlElement::new("parent");
        assert_eq!(
            required_child::<Label>(&parent).unwrap_err(),
            SamlError::MissingRequiredChild {
                element: "parent".to_string(),
                child: "ex:Label".to_string(),
            }
        );
    }

    #[test]
    fn required_attribute_reports_element() {
        let element = XmlElement::new_qualified(NS, "ex:Label");
        let err = required_attribute(&element, "width").unwrap_err();
        assert_eq!(
            err,
            SamlError::MissingRequiredAttribute {
                element: "ex:Label".to_string(),
                attribute: "width".to_string(),
            }
        );
    }

    #[test]
    fn non_empty_trimmed_rejects_whitespace() {
        assert_eq!(non_empty_trimmed("  x ", "v").unwrap(), "x");
        assert_eq!(non_empty_trimmed("   ", "v").unwrap_err(), SamlError::empty("v"));
    }
}
