//! `mdui:Logo` from the metadata UI extension.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::convert::{expect_element, required_attribute, XmlConvertible};
use crate::error::{SamlError, SamlResult};
use crate::xml::XmlElement;

use super::{MDUI_NS, XML_NS};

/// A logo advertised in entity metadata.
///
/// `Logo` only appears inside `mdui:UIInfo`, so it has no
/// [`XmlRoot`](crate::XmlRoot) implementation and must be written into a
/// parent element.
///
/// A logo can start empty and be filled in through the setters; writing one
/// that still lacks its URL, width or height fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LogoParts")]
pub struct Logo {
    url: Option<String>,
    width: Option<NonZeroU32>,
    height: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
}

impl Logo {
    /// Creates a logo, validating every field.
    pub fn new(url: &str, width: u32, height: u32) -> SamlResult<Self> {
        let mut logo = Self::default();
        logo.set_url(url)?;
        logo.set_width(width)?;
        logo.set_height(height)?;
        Ok(logo)
    }

    /// Sets the `xml:lang` of the logo.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// The logo URL, if set.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The width in pixels, if set.
    #[must_use]
    pub fn width(&self) -> Option<u32> {
        self.width.map(NonZeroU32::get)
    }

    /// The height in pixels, if set.
    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.height.map(NonZeroU32::get)
    }

    /// The language of the logo, if any.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Sets the URL.
    ///
    /// The value is trimmed and must either be a `data:` URI or an absolute
    /// URL with a host. Anything else (including `javascript:` URLs) is
    /// rejected and the previous value is kept.
    pub fn set_url(&mut self, url: &str) -> SamlResult<()> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SamlError::empty("mdui:Logo"));
        }
        if !url.starts_with("data:") {
            let parsed = Url::parse(url).map_err(|e| SamlError::malformed("mdui:Logo URL", e.to_string()))?;
            if !parsed.has_host() {
                return Err(SamlError::malformed(
                    "mdui:Logo URL",
                    format!("'{}' URLs are not allowed", parsed.scheme()),
                ));
            }
        }
        self.url = Some(url.to_string());
        Ok(())
    }

    /// Sets the width in pixels. Zero is rejected.
    pub fn set_width(&mut self, width: u32) -> SamlResult<()> {
        self.width = Some(non_zero(width, "width")?);
        Ok(())
    }

    /// Sets the height in pixels. Zero is rejected.
    pub fn set_height(&mut self, height: u32) -> SamlResult<()> {
        self.height = Some(non_zero(height, "height")?);
        Ok(())
    }

    /// Sets or clears the language.
    pub fn set_lang(&mut self, lang: Option<String>) {
        self.lang = lang;
    }
}

#[derive(Deserialize)]
struct LogoParts {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    lang: Option<String>,
}

impl TryFrom<LogoParts> for Logo {
    type Error = SamlError;

    fn try_from(parts: LogoParts) -> SamlResult<Self> {
        let mut logo = Self::default();
        if let Some(url) = &parts.url {
            logo.set_url(url)?;
        }
        if let Some(width) = parts.width {
            logo.set_width(width)?;
        }
        if let Some(height) = parts.height {
            logo.set_height(height)?;
        }
        logo.lang = parts.lang;
        Ok(logo)
    }
}

fn non_zero(value: u32, attribute: &str) -> SamlResult<NonZeroU32> {
    NonZeroU32::new(value)
        .ok_or_else(|| SamlError::malformed(format!("mdui:Logo {attribute}"), "must be greater than zero"))
}

fn parse_dimension(element: &XmlElement, attribute: &str) -> SamlResult<u32> {
    let raw = required_attribute(element, attribute)?;
    raw.trim().parse::<u32>().map_err(|e| {
        SamlError::malformed(format!("mdui:Logo {attribute}"), format!("'{raw}': {e}"))
    })
}

fn missing(attribute: &str) -> SamlError {
    SamlError::MissingRequiredAttribute {
        element: Logo::QUALIFIED_NAME.to_string(),
        attribute: attribute.to_string(),
    }
}

impl XmlConvertible for Logo {
    const NAMESPACE: &'static str = MDUI_NS;
    const QUALIFIED_NAME: &'static str = "mdui:Logo";

    fn from_xml(element: &XmlElement) -> SamlResult<Self> {
        expect_element::<Self>(element)?;

        let width = parse_dimension(element, "width")?;
        let height = parse_dimension(element, "height")?;

        let mut logo = Self::new(&element.text_content(), width, height)?;
        logo.lang = element.attribute_ns(XML_NS, "lang").map(str::to_string);
        Ok(logo)
    }

    fn to_xml<'p>(&self, parent: &'p mut XmlElement) -> SamlResult<&'p mut XmlElement> {
        let url = self.url.as_deref().ok_or_else(|| SamlError::empty(Self::QUALIFIED_NAME))?;
        let width = self.width.ok_or_else(|| missing("width"))?;
        let height = self.height.ok_or_else(|| missing("height"))?;

        let mut element = Self::create_element().with_text(url);
        element.set_attribute("width", width.to_string());
        element.set_attribute("height", height.to_string());
        if let Some(lang) = &self.lang {
            element.set_attribute_ns(XML_NS, "xml:lang", lang.as_str());
        }
        Ok(parent.append_child(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    fn parse(xml: &str) -> SamlResult<Logo> {
        let document = XmlDocument::parse(xml)?;
        Logo::from_xml(document.root())
    }

    #[test]
    fn unmarshalling() {
        let logo = parse(&format!(
            r#"<mdui:Logo xmlns:mdui="{MDUI_NS}" xml:lang="nl" width="300" height="200">
  https://static.example.org/images/logos/logo300x200.png
</mdui:Logo>"#
        ))
        .unwrap();
        assert_eq!(logo.url(), Some("https://static.example.org/images/logos/logo300x200.png"));
        assert_eq!(logo.width(), Some(300));
        assert_eq!(logo.height(), Some(200));
        assert_eq!(logo.lang(), Some("nl"));
    }

    #[test]
    fn missing_dimensions_are_reported() {
        let err = parse(&format!(
            r#"<mdui:Logo xmlns:mdui="{MDUI_NS}" height="200">https://example.org/logo.png</mdui:Logo>"#
        ))
        .unwrap_err();
        assert_eq!(
            err,
            SamlError::MissingRequiredAttribute {
                element: "mdui:Logo".to_string(),
                attribute: "width".to_string(),
            }
        );

        let err = parse(&format!(
            r#"<mdui:Logo xmlns:mdui="{MDUI_NS}" width="200">https://example.org/logo.png</mdui:Logo>"#
        ))
        .unwrap_err();
        assert!(matches!(err, SamlError::MissingRequiredAttribute { ref attribute, .. } if attribute == "height"));
    }

    #[test]
    fn bad_dimensions_are_malformed() {
        for (width, height) in [("wide", "200"), ("300", "0"), ("-1", "200")] {
            let err = parse(&format!(
                r#"<mdui:Logo xmlns:mdui="{MDUI_NS}" width="{width}" height="{height}">https://example.org/logo.png</mdui:Logo>"#
            ))
            .unwrap_err();
            assert!(matches!(err, SamlError::MalformedValue { .. }), "{width}x{height}");
        }
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = parse(&format!(
            r#"<mdui:Logo xmlns:mdui="{MDUI_NS}" width="1" height="1">   </mdui:Logo>"#
        ))
        .unwrap_err();
        assert!(matches!(err, SamlError::EmptyRequiredValue(_)));
    }

    #[test]
    fn url_schemes() {
        let mut logo = Logo::default();
        assert!(matches!(
            logo.set_url("javascript:alert(1)"),
            Err(SamlError::MalformedValue { .. })
        ));
        assert!(matches!(logo.set_url("not a url"), Err(SamlError::MalformedValue { .. })));
        assert_eq!(logo.url(), None);

        logo.set_url("data:image/png;base64,AAAA").unwrap();
        assert_eq!(logo.url(), Some("data:image/png;base64,AAAA"));
        logo.set_url(" https://example.org/logo.png ").unwrap();
        assert_eq!(logo.url(), Some("https://example.org/logo.png"));
    }

    #[test]
    fn marshalling_requires_all_fields() {
        let mut parent = XmlElement::new("UIInfo");
        let mut logo = Logo::default();
        assert!(logo.to_xml(&mut parent).is_err());
        logo.set_url("https://example.org/logo.png").unwrap();
        logo.set_width(16).unwrap();
        assert!(matches!(
            logo.to_xml(&mut parent),
            Err(SamlError::MissingRequiredAttribute { .. })
        ));
        assert!(parent.children().is_empty());

        logo.set_height(16).unwrap();
        logo.to_xml(&mut parent).unwrap();
        assert_eq!(parent.children_ns(MDUI_NS, "Logo").len(), 1);
    }

    #[test]
    fn roundtrip_with_lang() {
        let logo = Logo::new("https://example.org/logo.png", 64, 32)
            .unwrap()
            .with_lang("en");
        let mut parent = XmlElement::new_qualified(MDUI_NS, "mdui:UIInfo");
        let element = logo.to_xml(&mut parent).unwrap();
        assert_eq!(element.attribute("xml:lang"), Some("en"));
        assert_eq!(element.attribute("width"), Some("64"));

        let xml = parent.to_xml_string().unwrap();
        let reparsed = XmlDocument::parse(&xml).unwrap();
        let child = reparsed.root().children_ns(MDUI_NS, "Logo")[0];
        assert_eq!(Logo::from_xml(child).unwrap(), logo);
    }

    #[test]
    fn serde_goes_through_validation() {
        let logo: Logo =
            serde_json::from_str(r#"{"url": "https://example.org/l.png", "width": 10, "height": 20}"#)
                .unwrap();
        assert_eq!(logo.height(), Some(20));
        assert!(serde_json::from_str::<Logo>(r#"{"url": "javascript:alert(1)"}"#).is_err());
        assert!(serde_json::from_str::<Logo>(r#"{"width": 0}"#).is_err());
    }

    #[test]
    fn zero_dimensions_rejected_by_setters() {
        let mut logo = Logo::default();
        assert!(logo.set_width(0).is_err());
        assert!(logo.set_height(0).is_err());
        assert_eq!(logo.width(), None);
    }
}
