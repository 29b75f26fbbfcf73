//! Gallery videos.

use crate::compare::is_trimmed_non_empty;
use crate::error::CatalogError;
use crate::json::{require_non_empty_string, require_u64, warn_unknown_properties};
use crate::xml::XmlElement;
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &["url", "title", "width", "height"];
const XML_ATTRIBUTES: &[&str] = &["url", "title", "width", "height"];

pub(crate) const XML_ELEMENT_NAME: &str = "video";

/// An embedded video in a mod's gallery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModVideo {
    pub url: String,
    pub title: String,
    pub width: u64,
    pub height: u64,
}

impl ModVideo {
    pub fn new(url: impl Into<String>, title: impl Into<String>, width: u64, height: u64) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            width,
            height,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_trimmed_non_empty(&self.url)
            && url::Url::parse(&self.url).is_ok()
            && is_trimmed_non_empty(&self.title)
            && self.width > 0
            && self.height > 0
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert("url".to_string(), Value::String(self.url.clone()));
        object.insert("title".to_string(), Value::String(self.title.clone()));
        object.insert("width".to_string(), Value::from(self.width));
        object.insert("height".to_string(), Value::from(self.height));

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        Ok(Self {
            url: require_non_empty_string(object, "url", path)?,
            title: require_non_empty_string(object, "title", path)?,
            width: require_u64(object, "width", path)?,
            height: require_u64(object, "height", path)?,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        XmlElement::new(XML_ELEMENT_NAME)
            .attribute("url", &self.url)
            .attribute("title", &self.title)
            .attribute("width", self.width.to_string())
            .attribute("height", self.height.to_string())
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        if element.name != XML_ELEMENT_NAME {
            return Err(CatalogError::schema(
                path,
                format!("expected '{XML_ELEMENT_NAME}' element, found '{}'", element.name),
            ));
        }

        element.warn_unknown_attributes(XML_ATTRIBUTES, path);

        let parse_u64 = |name: &str| -> Result<u64, CatalogError> {
            let raw = element.require_attribute(name, path)?;
            crate::mod_download::parse_xml_u64(&raw, &format!("{path}@{name}"))
        };

        Ok(Self {
            url: element.require_attribute("url", path)?,
            title: element.require_attribute("title", path)?,
            width: parse_u64("width")?,
            height: parse_u64("height")?,
        })
    }
}

impl std::fmt::Display for ModVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModVideo {
        ModVideo::new(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "Playthrough",
            640,
            360,
        )
    }

    #[test]
    fn validity_requires_parseable_url() {
        assert!(sample().is_valid());
        assert!(!ModVideo::new("not a url", "Playthrough", 640, 360).is_valid());
        assert!(!ModVideo::new("https://example.com", "", 640, 360).is_valid());
        assert!(!ModVideo::new("https://example.com", "T", 0, 360).is_valid());
    }

    #[test]
    fn json_round_trip() {
        let video = sample();
        assert_eq!(video, ModVideo::from_json(&video.to_json(), "video").unwrap());
    }

    #[test]
    fn xml_round_trip() {
        let video = sample();
        assert_eq!(video, ModVideo::from_xml(&video.to_xml(), "video").unwrap());
    }
}
