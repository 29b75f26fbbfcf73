//! Downloadable package metadata for a mod.

use crate::compare::{eq_ignore_case, is_trimmed_non_empty};
use crate::error::CatalogError;
use crate::json::{
    optional_bool, optional_string, optional_u64, put_optional, put_optional_bool,
    require_non_empty_string, warn_unknown_properties,
};
use crate::xml::XmlElement;
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &[
    "fileName",
    "type",
    "version",
    "versionType",
    "gameVersion",
    "sha1",
    "partNumber",
    "partCount",
    "repaired",
];
const XML_ATTRIBUTES: &[&str] = &[
    "filename",
    "type",
    "version",
    "version_type",
    "gameversion",
    "sha1",
    "part",
    "numparts",
    "repaired",
];

pub(crate) const XML_ELEMENT_NAME: &str = "download";

/// Download type for the original, as-released package.
pub const DOWNLOAD_TYPE_ORIGINAL_FILES: &str = "Original Files";

/// Download type for the repackaged archives this manager consumes.
pub const DOWNLOAD_TYPE_MOD_MANAGER_FILES: &str = "Mod Manager Files";

/// One downloadable archive associated with a mod.
///
/// Multi-part archives carry `part_number`/`part_count`; all parts of one
/// archive share the same `version`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModDownload {
    pub file_name: String,
    pub download_type: String,
    pub version: Option<String>,
    pub version_type: Option<String>,
    pub game_version_id: Option<String>,
    pub sha1: String,
    pub part_number: Option<u64>,
    pub part_count: Option<u64>,
    pub repaired: Option<bool>,
}

impl ModDownload {
    pub fn new(
        file_name: impl Into<String>,
        download_type: impl Into<String>,
        sha1: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            download_type: download_type.into(),
            sha1: sha1.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_version_type(mut self, version_type: impl Into<String>) -> Self {
        self.version_type = Some(version_type.into());
        self
    }

    pub fn with_game_version_id(mut self, game_version_id: impl Into<String>) -> Self {
        self.game_version_id = Some(game_version_id.into());
        self
    }

    pub fn with_parts(mut self, part_number: u64, part_count: u64) -> Self {
        self.part_number = Some(part_number);
        self.part_count = Some(part_count);
        self
    }

    pub fn with_repaired(mut self, repaired: bool) -> Self {
        self.repaired = Some(repaired);
        self
    }

    pub fn is_original_files(&self) -> bool {
        eq_ignore_case(&self.download_type, DOWNLOAD_TYPE_ORIGINAL_FILES)
    }

    pub fn is_mod_manager_files(&self) -> bool {
        eq_ignore_case(&self.download_type, DOWNLOAD_TYPE_MOD_MANAGER_FILES)
    }

    /// True when this download carries the given mod version string.
    ///
    /// An absent `version` matches only the empty (base) version.
    pub fn matches_version(&self, version: &str) -> bool {
        eq_ignore_case(self.version.as_deref().unwrap_or(""), version)
    }

    pub fn is_valid(&self) -> bool {
        if !is_trimmed_non_empty(&self.file_name)
            || !is_trimmed_non_empty(&self.download_type)
            || !is_trimmed_non_empty(&self.sha1)
        {
            return false;
        }

        match (self.part_number, self.part_count) {
            (None, None) => true,
            (Some(part_number), Some(part_count)) => {
                part_number >= 1 && part_count >= 1 && part_number <= part_count
            }
            _ => false,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert(
            "fileName".to_string(),
            Value::String(self.file_name.clone()),
        );
        object.insert(
            "type".to_string(),
            Value::String(self.download_type.clone()),
        );
        put_optional(&mut object, "version", self.version.as_deref());
        put_optional(&mut object, "versionType", self.version_type.as_deref());
        put_optional(&mut object, "gameVersion", self.game_version_id.as_deref());
        object.insert("sha1".to_string(), Value::String(self.sha1.clone()));

        if let Some(part_number) = self.part_number {
            object.insert("partNumber".to_string(), Value::from(part_number));
        }
        if let Some(part_count) = self.part_count {
            object.insert("partCount".to_string(), Value::from(part_count));
        }

        put_optional_bool(&mut object, "repaired", self.repaired);

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        Ok(Self {
            file_name: require_non_empty_string(object, "fileName", path)?,
            download_type: require_non_empty_string(object, "type", path)?,
            version: optional_string(object, "version", path)?,
            version_type: optional_string(object, "versionType", path)?,
            game_version_id: optional_string(object, "gameVersion", path)?,
            sha1: require_non_empty_string(object, "sha1", path)?,
            part_number: optional_u64(object, "partNumber", path)?,
            part_count: optional_u64(object, "partCount", path)?,
            repaired: optional_bool(object, "repaired", path)?,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        XmlElement::new(XML_ELEMENT_NAME)
            .attribute("filename", &self.file_name)
            .attribute("type", &self.download_type)
            .optional_attribute("version", self.version.as_deref())
            .optional_attribute("version_type", self.version_type.as_deref())
            .optional_attribute("gameversion", self.game_version_id.as_deref())
            .attribute("sha1", &self.sha1)
            .optional_attribute("part", self.part_number.map(|part| part.to_string()))
            .optional_attribute("numparts", self.part_count.map(|count| count.to_string()))
            .optional_attribute("repaired", self.repaired.map(|repaired| repaired.to_string()))
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        if element.name != XML_ELEMENT_NAME {
            return Err(CatalogError::schema(
                path,
                format!("expected '{XML_ELEMENT_NAME}' element, found '{}'", element.name),
            ));
        }

        element.warn_unknown_attributes(XML_ATTRIBUTES, path);

        let part_number = element
            .attribute_value("part")
            .map(|raw| parse_xml_u64(raw, &format!("{path}@part")))
            .transpose()?;
        let part_count = element
            .attribute_value("numparts")
            .map(|raw| parse_xml_u64(raw, &format!("{path}@numparts")))
            .transpose()?;
        let repaired = element
            .attribute_value("repaired")
            .map(|raw| crate::mod_file::parse_xml_bool(raw, &format!("{path}@repaired")))
            .transpose()?;

        Ok(Self {
            file_name: element.require_attribute("filename", path)?,
            download_type: element.require_attribute("type", path)?,
            version: element.attribute_value("version").map(str::to_string),
            version_type: element.attribute_value("version_type").map(str::to_string),
            game_version_id: element.attribute_value("gameversion").map(str::to_string),
            sha1: element.require_attribute("sha1", path)?,
            part_number,
            part_count,
            repaired,
        })
    }
}

pub(crate) fn parse_xml_u64(value: &str, path: &str) -> Result<u64, CatalogError> {
    value.parse::<u64>().map_err(|error| {
        CatalogError::schema(path, format!("expected an unsigned integer, found '{value}': {error}"))
    })
}

impl std::fmt::Display for ModDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.file_name, self.download_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModDownload {
        ModDownload::new("dukedc.zip", DOWNLOAD_TYPE_MOD_MANAGER_FILES, "abc123")
            .with_version("v2")
            .with_game_version_id("atomic")
    }

    #[test]
    fn type_predicates() {
        assert!(sample().is_mod_manager_files());
        assert!(!sample().is_original_files());
        assert!(
            ModDownload::new("dukedc13.zip", "original files", "ddd").is_original_files(),
            "type comparison must ignore case"
        );
    }

    #[test]
    fn version_matching_treats_absent_as_base() {
        assert!(sample().matches_version("V2"));
        assert!(!sample().matches_version(""));
        assert!(ModDownload::new("base.zip", DOWNLOAD_TYPE_ORIGINAL_FILES, "e").matches_version(""));
    }

    #[test]
    fn part_fields_validate_together() {
        assert!(sample().is_valid());
        assert!(sample().with_parts(1, 2).is_valid());
        assert!(!sample().with_parts(3, 2).is_valid());
        assert!(!sample().with_parts(0, 2).is_valid());

        let mut half = sample();
        half.part_number = Some(1);
        assert!(!half.is_valid(), "part number without part count");
    }

    #[test]
    fn json_round_trip() {
        let download = sample().with_parts(2, 3).with_repaired(true);
        assert_eq!(
            download,
            ModDownload::from_json(&download.to_json(), "download").unwrap()
        );
    }

    #[test]
    fn xml_round_trip() {
        let download = sample().with_parts(1, 3);
        assert_eq!(
            download,
            ModDownload::from_xml(&download.to_xml(), "download").unwrap()
        );
    }

    #[test]
    fn bad_part_attribute_names_property() {
        let mut element = sample().to_xml();
        element.attributes.push(("part".into(), "two".into()));

        let error = ModDownload::from_xml(&element, "download").unwrap_err();
        assert!(error.to_string().contains("download@part"), "{error}");
    }
}
