//! Per-engine file list for one mod version type.

use crate::compare::eq_ignore_case;
use crate::error::CatalogError;
use crate::json::{require_non_empty_string, warn_unknown_properties};
use crate::mod_file::ModFile;
use crate::xml::XmlElement;
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &["gameVersion", "files"];
const XML_ATTRIBUTES: &[&str] = &["id"];

pub(crate) const XML_ELEMENT_NAME: &str = "gameversion";

/// The id of the engine whose zip files are treated as group containers.
const EDUKE32_GAME_VERSION_ID: &str = "eduke32";

/// The files a mod ships for one specific engine build.
///
/// `game_version_id` links into the
/// [`GameVersionCollection`](crate::GameVersionCollection) by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModGameVersion {
    pub game_version_id: String,
    pub files: Vec<ModFile>,
}

impl ModGameVersion {
    pub fn new(game_version_id: impl Into<String>) -> Self {
        Self {
            game_version_id: game_version_id.into(),
            files: Vec::new(),
        }
    }

    /// Append a file, returning self for chaining.
    pub fn with_file(mut self, file: ModFile) -> Self {
        self.files.push(file);
        self
    }

    /// True when the linked engine treats zip files as group files.
    pub fn is_eduke32(&self) -> bool {
        eq_ignore_case(&self.game_version_id, EDUKE32_GAME_VERSION_ID)
    }

    /// First file of the given type, in file order.
    pub fn first_file_of_type(&self, file_type: &str) -> Option<&ModFile> {
        self.files
            .iter()
            .find(|file| eq_ignore_case(&file.file_type, file_type))
    }

    /// All files of the given type, in file order.
    pub fn files_of_type<'a>(&'a self, file_type: &'a str) -> impl Iterator<Item = &'a ModFile> {
        self.files
            .iter()
            .filter(move |file| eq_ignore_case(&file.file_type, file_type))
    }

    /// First file name of the given type.
    pub fn first_file_name_of_type(&self, file_type: &str) -> Option<&str> {
        self.first_file_of_type(file_type)
            .map(|file| file.file_name.as_str())
    }

    pub fn is_valid(&self) -> bool {
        use crate::compare::is_trimmed_non_empty;

        if !is_trimmed_non_empty(&self.game_version_id) || self.files.is_empty() {
            return false;
        }

        if !self.files.iter().all(ModFile::is_valid) {
            return false;
        }

        // File names are unique within one game version.
        for (index, file) in self.files.iter().enumerate() {
            if self.files[index + 1..]
                .iter()
                .any(|other| eq_ignore_case(&other.file_name, &file.file_name))
            {
                return false;
            }
        }

        true
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert(
            "gameVersion".to_string(),
            Value::String(self.game_version_id.clone()),
        );
        object.insert(
            "files".to_string(),
            Value::Array(self.files.iter().map(ModFile::to_json).collect()),
        );

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        let game_version_id = require_non_empty_string(object, "gameVersion", path)?;

        let files_path = format!("{path}.files");
        let files_value = object
            .get("files")
            .ok_or_else(|| CatalogError::schema(&files_path, "missing required property"))?;

        let mut files = Vec::new();

        for (index, file_value) in crate::json::as_array(files_value, &files_path)?
            .iter()
            .enumerate()
        {
            files.push(ModFile::from_json(
                file_value,
                &format!("{files_path}[{index}]"),
            )?);
        }

        Ok(Self {
            game_version_id,
            files,
        })
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(XML_ELEMENT_NAME).attribute("id", &self.game_version_id);

        for file in &self.files {
            element.children.push(file.to_xml());
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

        let game_version_id = element.require_attribute("id", path)?;
        let mut files = Vec::new();

        for (index, child) in element
            .children_named(crate::mod_file::XML_ELEMENT_NAME)
            .enumerate()
        {
            files.push(ModFile::from_xml(child, &format!("{path}.file[{index}]"))?);
        }

        Ok(Self {
            game_version_id,
            files,
        })
    }
}
