//! A single file belonging to a mod's per-engine file list.

use crate::compare::{eq_ignore_case, is_trimmed_non_empty};
use crate::error::CatalogError;
use crate::json::{
    optional_bool, put_non_empty, put_optional_bool, require_non_empty_string, require_string,
    warn_unknown_properties,
};
use crate::xml::XmlElement;
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &["fileName", "type", "sha1", "shared"];
const XML_ATTRIBUTES: &[&str] = &["filename", "type", "sha1", "shared"];

pub(crate) const XML_ELEMENT_NAME: &str = "file";

/// One file shipped by a [`ModGameVersion`](crate::ModGameVersion).
///
/// `file_type` is the lowercase extension taxonomy used throughout the
/// catalog: `grp`, `zip`, `con`, `def`, `map`, `dmo`, `rts`, and so on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModFile {
    pub file_name: String,
    pub file_type: String,
    pub sha1: String,

    /// Set when the same physical file is legitimately referenced by more
    /// than one version of the owning mod.
    pub shared: Option<bool>,
}

impl ModFile {
    pub fn new(
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        sha1: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: file_type.into(),
            sha1: sha1.into(),
            shared: None,
        }
    }

    /// Mark the file as shared between versions.
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = Some(shared);
        self
    }

    /// Case-insensitive file name comparison.
    pub fn has_file_name(&self, file_name: &str) -> bool {
        eq_ignore_case(&self.file_name, file_name)
    }

    pub fn is_valid(&self) -> bool {
        is_trimmed_non_empty(&self.file_name)
            && is_trimmed_non_empty(&self.file_type)
            && self.file_type.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            && is_trimmed_non_empty(&self.sha1)
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        put_non_empty(&mut object, "fileName", &self.file_name);
        put_non_empty(&mut object, "type", &self.file_type);
        put_non_empty(&mut object, "sha1", &self.sha1);
        put_optional_bool(&mut object, "shared", self.shared);

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        Ok(Self {
            file_name: require_non_empty_string(object, "fileName", path)?,
            file_type: require_non_empty_string(object, "type", path)?,
            sha1: require_string(object, "sha1", path)?,
            shared: optional_bool(object, "shared", path)?,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        XmlElement::new(XML_ELEMENT_NAME)
            .attribute("filename", &self.file_name)
            .attribute("type", &self.file_type)
            .attribute("sha1", &self.sha1)
            .optional_attribute("shared", self.shared.map(|shared| shared.to_string()))
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        if element.name != XML_ELEMENT_NAME {
            return Err(CatalogError::schema(
                path,
                format!("expected '{XML_ELEMENT_NAME}' element, found '{}'", element.name),
            ));
        }

        element.warn_unknown_attributes(XML_ATTRIBUTES, path);

        let shared = match element.attribute_value("shared") {
            Some(value) => Some(parse_xml_bool(value, path)?),
            None => None,
        };

        Ok(Self {
            file_name: element.require_attribute("filename", path)?,
            file_type: element.require_attribute("type", path)?,
            sha1: element.attribute_value("sha1").unwrap_or_default().to_string(),
            shared,
        })
    }
}

pub(crate) fn parse_xml_bool(value: &str, path: &str) -> Result<bool, CatalogError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CatalogError::schema(
            path,
            format!("expected 'true' or 'false', found '{value}'"),
        )),
    }
}

impl std::fmt::Display for ModFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name)
    }
}
