//! One release of a mod.

use crate::compare::eq_ignore_case;
use crate::error::CatalogError;
use crate::json::{optional_bool, optional_string, warn_unknown_properties};
use crate::mod_version_type::ModVersionType;
use crate::xml::XmlElement;
use chrono::NaiveDate;
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &["version", "releaseDate", "repaired", "types"];
const XML_ATTRIBUTES: &[&str] = &["id", "releasedate", "repaired"];

pub(crate) const XML_ELEMENT_NAME: &str = "version";

/// Release dates are stored as `YYYY-MM-DD`.
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A specific release of a mod.
///
/// `version` may be empty to denote the base (unversioned) release.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModVersion {
    pub version: String,
    pub release_date: Option<NaiveDate>,

    /// Set when this release is a repaired re-upload of a broken original.
    pub repaired: Option<bool>,

    pub types: Vec<ModVersionType>,
}

impl ModVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_release_date(mut self, release_date: NaiveDate) -> Self {
        self.release_date = Some(release_date);
        self
    }

    pub fn with_repaired(mut self, repaired: bool) -> Self {
        self.repaired = Some(repaired);
        self
    }

    pub fn with_type(mut self, version_type: ModVersionType) -> Self {
        self.types.push(version_type);
        self
    }

    /// Display name: the owning mod's name plus the version, when present.
    pub fn full_name(&self, mod_name: &str) -> String {
        if self.version.is_empty() {
            mod_name.to_string()
        } else {
            format!("{mod_name} {}", self.version)
        }
    }

    pub fn type_with_name(&self, type_name: &str) -> Option<&ModVersionType> {
        self.types
            .iter()
            .find(|version_type| eq_ignore_case(&version_type.type_name, type_name))
    }

    pub fn index_of_type(&self, type_name: &str) -> Option<usize> {
        self.types
            .iter()
            .position(|version_type| eq_ignore_case(&version_type.type_name, type_name))
    }

    pub fn is_valid(&self) -> bool {
        if self.version.trim() != self.version {
            return false;
        }

        if self.types.is_empty() || !self.types.iter().all(ModVersionType::is_valid) {
            return false;
        }

        // Type names are unique within one version.
        for (index, version_type) in self.types.iter().enumerate() {
            if self.types[index + 1..]
                .iter()
                .any(|other| eq_ignore_case(&other.type_name, &version_type.type_name))
            {
                return false;
            }
        }

        true
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        crate::json::put_non_empty(&mut object, "version", &self.version);

        if let Some(release_date) = self.release_date {
            object.insert(
                "releaseDate".to_string(),
                Value::String(release_date.format(RELEASE_DATE_FORMAT).to_string()),
            );
        }

        crate::json::put_optional_bool(&mut object, "repaired", self.repaired);

        object.insert(
            "types".to_string(),
            Value::Array(self.types.iter().map(ModVersionType::to_json).collect()),
        );

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        let version = optional_string(object, "version", path)?.unwrap_or_default();

        let release_date = optional_string(object, "releaseDate", path)?
            .map(|raw| parse_release_date(&raw, &format!("{path}.releaseDate")))
            .transpose()?;

        let types_path = format!("{path}.types");
        let types_value = object
            .get("types")
            .ok_or_else(|| CatalogError::schema(&types_path, "missing required property"))?;

        let mut types = Vec::new();

        for (index, type_value) in crate::json::as_array(types_value, &types_path)?
            .iter()
            .enumerate()
        {
            types.push(ModVersionType::from_json(
                type_value,
                &format!("{types_path}[{index}]"),
            )?);
        }

        Ok(Self {
            version,
            release_date,
            repaired: optional_bool(object, "repaired", path)?,
            types,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(XML_ELEMENT_NAME);

        if !self.version.is_empty() {
            element = element.attribute("id", &self.version);
        }

        element = element
            .optional_attribute(
                "releasedate",
                self.release_date
                    .map(|date| date.format(RELEASE_DATE_FORMAT).to_string()),
            )
            .optional_attribute("repaired", self.repaired.map(|repaired| repaired.to_string()));

        for version_type in &self.types {
            element.children.push(version_type.to_xml());
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

        let version = element.attribute_value("id").unwrap_or_default().to_string();

        let release_date = element
            .attribute_value("releasedate")
            .map(|raw| parse_release_date(raw, &format!("{path}@releasedate")))
            .transpose()?;

        let repaired = element
            .attribute_value("repaired")
            .map(|raw| crate::mod_file::parse_xml_bool(raw, &format!("{path}@repaired")))
            .transpose()?;

        let mut types = Vec::new();

        for (index, child) in element
            .children_named(crate::mod_version_type::XML_ELEMENT_NAME)
            .enumerate()
        {
            types.push(ModVersionType::from_xml(
                child,
                &format!("{path}.type[{index}]"),
            )?);
        }

        Ok(Self {
            version,
            release_date,
            repaired,
            types,
        })
    }
}

fn parse_release_date(raw: &str, path: &str) -> Result<NaiveDate, CatalogError> {
    NaiveDate::parse_from_str(raw, RELEASE_DATE_FORMAT)
        .map_err(|error| CatalogError::schema(path, format!("bad release date '{raw}': {error}")))
}
