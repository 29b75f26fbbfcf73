//! Mod version specialization ("Full", "Demo", ...).

use crate::compare::eq_ignore_case;
use crate::error::CatalogError;
use crate::json::{optional_string, warn_unknown_properties};
use crate::mod_game_version::ModGameVersion;
use crate::xml::XmlElement;
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &["type", "gameVersions"];
const XML_ATTRIBUTES: &[&str] = &["id"];

pub(crate) const XML_ELEMENT_NAME: &str = "type";

/// A variant of one mod version.
///
/// `type_name` may be empty for mods without variants; the empty type is
/// displayed using the owning version's name alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModVersionType {
    pub type_name: String,
    pub game_versions: Vec<ModGameVersion>,
}

impl ModVersionType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            game_versions: Vec::new(),
        }
    }

    pub fn with_game_version(mut self, game_version: ModGameVersion) -> Self {
        self.game_versions.push(game_version);
        self
    }

    /// Display name: `version_full_name` plus the type, when present.
    pub fn full_name(&self, version_full_name: &str) -> String {
        if self.type_name.is_empty() {
            version_full_name.to_string()
        } else {
            format!("{version_full_name} {}", self.type_name)
        }
    }

    /// Find the file list targeting a specific engine id.
    pub fn game_version_with_id(&self, game_version_id: &str) -> Option<&ModGameVersion> {
        self.game_versions
            .iter()
            .find(|game_version| eq_ignore_case(&game_version.game_version_id, game_version_id))
    }

    pub fn is_valid(&self) -> bool {
        if self.type_name.trim() != self.type_name {
            return false;
        }

        if self.game_versions.is_empty()
            || !self.game_versions.iter().all(ModGameVersion::is_valid)
        {
            return false;
        }

        // Target engines are unique within one type.
        for (index, game_version) in self.game_versions.iter().enumerate() {
            if self.game_versions[index + 1..].iter().any(|other| {
                eq_ignore_case(&other.game_version_id, &game_version.game_version_id)
            }) {
                return false;
            }
        }

        true
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        crate::json::put_non_empty(&mut object, "type", &self.type_name);
        object.insert(
            "gameVersions".to_string(),
            Value::Array(self.game_versions.iter().map(ModGameVersion::to_json).collect()),
        );

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        let type_name = optional_string(object, "type", path)?.unwrap_or_default();

        let game_versions_path = format!("{path}.gameVersions");
        let game_versions_value = object.get("gameVersions").ok_or_else(|| {
            CatalogError::schema(&game_versions_path, "missing required property")
        })?;

        let mut game_versions = Vec::new();

        for (index, game_version_value) in
            crate::json::as_array(game_versions_value, &game_versions_path)?
                .iter()
                .enumerate()
        {
            game_versions.push(ModGameVersion::from_json(
                game_version_value,
                &format!("{game_versions_path}[{index}]"),
            )?);
        }

        Ok(Self {
            type_name,
            game_versions,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(XML_ELEMENT_NAME);

        if !self.type_name.is_empty() {
            element = element.attribute("id", &self.type_name);
        }

        for game_version in &self.game_versions {
            element.children.push(game_version.to_xml());
        }

        element
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        if element.name != XML_ELEMENT_NAME {
            return Err(CatalogError::schema(
                path,
                format!("expected '{XML_ELEMENT_NAME}' element, found '{}'", element.name),
            ));
        }

        element.warn_unknown_attributes(XML_ATTRIBUTES, path);

        let type_name = element.attribute_value("id").unwrap_or_default().to_string();
        let mut game_versions = Vec::new();

        for (index, child) in element
            .children_named(crate::mod_game_version::XML_ELEMENT_NAME)
            .enumerate()
        {
            game_versions.push(ModGameVersion::from_xml(
                child,
                &format!("{path}.gameversion[{index}]"),
            )?);
        }

        Ok(Self {
            type_name,
            game_versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_file::ModFile;

    fn sample() -> ModVersionType {
        ModVersionType::new("Full").with_game_version(
            ModGameVersion::new("atomic").with_file(ModFile::new("EXAMPLE.GRP", "grp", "aaa")),
        )
    }

    #[test]
    fn full_name_with_and_without_type() {
        assert_eq!(sample().full_name("Example Mod v2"), "Example Mod v2 Full");
        assert_eq!(
            ModVersionType::default().full_name("Example Mod v2"),
            "Example Mod v2"
        );
    }

    #[test]
    fn game_version_lookup_ignores_case() {
        let version_type = sample();
        assert!(version_type.game_version_with_id("Atomic").is_some());
        assert!(version_type.game_version_with_id("eduke32").is_none());
    }

    #[test]
    fn duplicate_target_engines_invalidate() {
        let version_type = ModVersionType::new("Full")
            .with_game_version(
                ModGameVersion::new("atomic").with_file(ModFile::new("A.GRP", "grp", "aaa")),
            )
            .with_game_version(
                ModGameVersion::new("Atomic").with_file(ModFile::new("B.GRP", "grp", "bbb")),
            );

        assert!(!version_type.is_valid());
    }

    #[test]
    fn json_round_trip_including_empty_type() {
        let with_type = sample();
        assert_eq!(
            with_type,
            ModVersionType::from_json(&with_type.to_json(), "type").unwrap()
        );

        let empty_type = ModVersionType::new("").with_game_version(
            ModGameVersion::new("atomic").with_file(ModFile::new("A.GRP", "grp", "aaa")),
        );
        let value = empty_type.to_json();
        assert!(value.get("type").is_none(), "empty type must be omitted");
        assert_eq!(
            empty_type,
            ModVersionType::from_json(&value, "type").unwrap()
        );
    }

    #[test]
    fn xml_round_trip() {
        let version_type = sample();
        assert_eq!(
            version_type,
            ModVersionType::from_xml(&version_type.to_xml(), "type").unwrap()
        );
    }
}
