//! Gallery images and screenshots.

use crate::compare::is_trimmed_non_empty;
use crate::error::CatalogError;
use crate::json::{
    optional_string, put_optional, require_non_empty_string, require_u64, warn_unknown_properties,
};
use crate::xml::XmlElement;
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &[
    "fileName",
    "fileSize",
    "type",
    "subfolder",
    "caption",
    "width",
    "height",
    "sha1",
];
const XML_ATTRIBUTES: &[&str] = &[
    "filename",
    "filesize",
    "type",
    "subfolder",
    "caption",
    "width",
    "height",
    "sha1",
];

pub(crate) const XML_IMAGE_ELEMENT_NAME: &str = "image";
pub(crate) const XML_SCREENSHOT_ELEMENT_NAME: &str = "screenshot";

/// An image in a mod's gallery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModImage {
    pub file_name: String,
    pub file_size: u64,
    pub image_type: Option<String>,
    pub subfolder: Option<String>,
    pub caption: Option<String>,
    pub width: u64,
    pub height: u64,
    pub sha1: String,
}

impl ModImage {
    pub fn new(
        file_name: impl Into<String>,
        file_size: u64,
        width: u64,
        height: u64,
        sha1: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_size,
            width,
            height,
            sha1: sha1.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, image_type: impl Into<String>) -> Self {
        self.image_type = Some(image_type.into());
        self
    }

    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = Some(subfolder.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        is_trimmed_non_empty(&self.file_name)
            && is_trimmed_non_empty(&self.sha1)
            && self.file_size > 0
            && self.width > 0
            && self.height > 0
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert(
            "fileName".to_string(),
            Value::String(self.file_name.clone()),
        );
        object.insert("fileSize".to_string(), Value::from(self.file_size));
        put_optional(&mut object, "type", self.image_type.as_deref());
        put_optional(&mut object, "subfolder", self.subfolder.as_deref());
        put_optional(&mut object, "caption", self.caption.as_deref());
        object.insert("width".to_string(), Value::from(self.width));
        object.insert("height".to_string(), Value::from(self.height));
        object.insert("sha1".to_string(), Value::String(self.sha1.clone()));

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        Ok(Self {
            file_name: require_non_empty_string(object, "fileName", path)?,
            file_size: require_u64(object, "fileSize", path)?,
            image_type: optional_string(object, "type", path)?,
            subfolder: optional_string(object, "subfolder", path)?,
            caption: optional_string(object, "caption", path)?,
            width: require_u64(object, "width", path)?,
            height: require_u64(object, "height", path)?,
            sha1: require_non_empty_string(object, "sha1", path)?,
        })
    }

    pub fn to_xml_named(&self, element_name: &str) -> XmlElement {
        XmlElement::new(element_name)
            .attribute("filename", &self.file_name)
            .attribute("filesize", self.file_size.to_string())
            .optional_attribute("type", self.image_type.as_deref())
            .optional_attribute("subfolder", self.subfolder.as_deref())
            .optional_attribute("caption", self.caption.as_deref())
            .attribute("width", self.width.to_string())
            .attribute("height", self.height.to_string())
            .attribute("sha1", &self.sha1)
    }

    pub fn from_xml_named(
        element: &XmlElement,
        element_name: &str,
        path: &str,
    ) -> Result<Self, CatalogError> {
        if element.name != element_name {
            return Err(CatalogError::schema(
                path,
                format!("expected '{element_name}' element, found '{}'", element.name),
            ));
        }

        element.warn_unknown_attributes(XML_ATTRIBUTES, path);

        let parse_u64 = |name: &str| -> Result<u64, CatalogError> {
            let raw = element.require_attribute(name, path)?;
            crate::mod_download::parse_xml_u64(&raw, &format!("{path}@{name}"))
        };

        Ok(Self {
            file_name: element.require_attribute("filename", path)?,
            file_size: parse_u64("filesize")?,
            image_type: element.attribute_value("type").map(str::to_string),
            subfolder: element.attribute_value("subfolder").map(str::to_string),
            caption: element.attribute_value("caption").map(str::to_string),
            width: parse_u64("width")?,
            height: parse_u64("height")?,
            sha1: element.require_attribute("sha1", path)?,
        })
    }
}

/// A screenshot: an image captured in-game, serialized under the
/// `screenshots` list instead of `images`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModScreenshot(pub ModImage);

impl ModScreenshot {
    pub fn new(image: ModImage) -> Self {
        Self(image)
    }

    pub fn image(&self) -> &ModImage {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }

    pub fn to_json(&self) -> Value {
        self.0.to_json()
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        ModImage::from_json(value, path).map(Self)
    }

    pub fn to_xml(&self) -> XmlElement {
        self.0.to_xml_named(XML_SCREENSHOT_ELEMENT_NAME)
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        ModImage::from_xml_named(element, XML_SCREENSHOT_ELEMENT_NAME, path).map(Self)
    }
}
