//! The owning catalog of mods.

use crate::compare::eq_ignore_case;
use crate::error::CatalogError;
use crate::game_version_collection::GameVersionCollection;
use crate::json::warn_unknown_properties;
use crate::mod_info::Mod;
use crate::signal::Signal;
use crate::xml::XmlElement;
use serde_json::{Map, Value};
use std::path::Path;

const FILE_TYPE: &str = "Mods";
const FILE_FORMAT_VERSION: &str = "1.0.0";
const ENVELOPE_PROPERTIES: &[&str] = &["fileType", "fileFormatVersion", "mods"];
const XML_ROOT_ELEMENT_NAME: &str = "mods";

/// Owning container of every [`Mod`] in the catalog.
///
/// Loads and saves both on-disk formats, dispatching on file extension.
/// Loads are atomic: a parse failure anywhere leaves the collection
/// untouched.
#[derive(Debug, Default)]
pub struct ModCollection {
    mods: Vec<Mod>,

    /// Fires after any structural change has committed.
    pub updated: Signal,
}

impl ModCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn mods(&self) -> &[Mod] {
        &self.mods
    }

    pub fn has_mod_with_id(&self, id: &str) -> bool {
        self.index_of_mod_with_id(id).is_some()
    }

    pub fn has_mod_with_name(&self, name: &str) -> bool {
        self.index_of_mod_with_name(name).is_some()
    }

    pub fn index_of_mod_with_id(&self, id: &str) -> Option<usize> {
        self.mods.iter().position(|entry| eq_ignore_case(&entry.id, id))
    }

    pub fn index_of_mod_with_name(&self, name: &str) -> Option<usize> {
        self.mods
            .iter()
            .position(|entry| eq_ignore_case(&entry.name, name))
    }

    pub fn get_mod(&self, index: usize) -> Option<&Mod> {
        self.mods.get(index)
    }

    pub fn get_mod_with_id(&self, id: &str) -> Option<&Mod> {
        self.index_of_mod_with_id(id).map(|index| &self.mods[index])
    }

    pub fn get_mod_with_name(&self, name: &str) -> Option<&Mod> {
        self.index_of_mod_with_name(name).map(|index| &self.mods[index])
    }

    /// Append a mod, rejecting invalid entries and duplicate ids or names.
    pub fn add_mod(&mut self, entry: Mod) -> Result<(), CatalogError> {
        if !entry.is_valid() {
            return Err(CatalogError::Integrity(format!(
                "mod '{}' is not valid",
                entry.id
            )));
        }

        if self.has_mod_with_id(&entry.id) {
            return Err(CatalogError::Integrity(format!(
                "duplicate mod id '{}'",
                entry.id
            )));
        }

        if self.has_mod_with_name(&entry.name) {
            return Err(CatalogError::Integrity(format!(
                "duplicate mod name '{}'",
                entry.name
            )));
        }

        self.mods.push(entry);
        self.updated.emit();

        Ok(())
    }

    pub fn remove_mod_with_id(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of_mod_with_id(id) else {
            return false;
        };

        self.mods.remove(index);
        self.updated.emit();

        true
    }

    pub fn clear(&mut self) {
        self.mods.clear();
        self.updated.emit();
    }

    /// Run a maintenance pass over the owned mods (rehashing, repairs).
    ///
    /// The pass works on a copy; if the result fails validation the
    /// collection is left untouched and an error is returned. `updated`
    /// fires once after a successful pass.
    pub fn update_mods<F>(&mut self, update: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut [Mod]),
    {
        let mut mods = self.mods.clone();
        update(&mut mods);

        self.replace_all(mods)
    }

    /// Invariant 8 across the whole catalog: every
    /// `ModGameVersion.game_version_id` resolves in the registry. Returns
    /// the number of dangling references, logging each.
    pub fn check_game_versions(&self, registry: &GameVersionCollection) -> usize {
        let mut missing = 0;

        for entry in &self.mods {
            for version in &entry.versions {
                for version_type in &version.types {
                    for game_version in &version_type.game_versions {
                        if !registry.has_game_version_with_id(&game_version.game_version_id) {
                            tracing::warn!(
                                "mod '{}' references unknown game version '{}'",
                                entry.full_name(0, 0),
                                game_version.game_version_id
                            );
                            missing += 1;
                        }
                    }
                }
            }
        }

        missing
    }

    pub fn is_valid(&self) -> bool {
        for (index, entry) in self.mods.iter().enumerate() {
            if !entry.is_valid() {
                return false;
            }

            if self.mods[index + 1..].iter().any(|other| {
                eq_ignore_case(&other.id, &entry.id) || eq_ignore_case(&other.name, &entry.name)
            }) {
                return false;
            }
        }

        true
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert("fileType".to_string(), Value::String(FILE_TYPE.to_string()));
        object.insert(
            "fileFormatVersion".to_string(),
            Value::String(FILE_FORMAT_VERSION.to_string()),
        );
        object.insert(
            "mods".to_string(),
            Value::Array(self.mods.iter().map(Mod::to_json).collect()),
        );

        Value::Object(object)
    }

    pub fn parse_from_json(&mut self, value: &Value) -> Result<(), CatalogError> {
        let object = crate::json::as_object(value, "mods")?;

        warn_unknown_properties(object, ENVELOPE_PROPERTIES, "mods");

        crate::envelope::check(object, FILE_TYPE, FILE_FORMAT_VERSION, "mods")?;

        let list_value = object
            .get("mods")
            .ok_or_else(|| CatalogError::schema("mods.mods", "missing required property"))?;

        let mut mods = Vec::new();

        for (index, item) in crate::json::as_array(list_value, "mods.mods")?.iter().enumerate() {
            mods.push(Mod::from_json(item, &format!("mods.mods[{index}]"))?);
        }

        self.replace_all(mods)
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut root = XmlElement::new(XML_ROOT_ELEMENT_NAME);

        for entry in &self.mods {
            root.children.push(entry.to_xml());
        }

        root
    }

    pub fn parse_from_xml(&mut self, root: &XmlElement) -> Result<(), CatalogError> {
        if root.name != XML_ROOT_ELEMENT_NAME {
            return Err(CatalogError::schema(
                "mods",
                format!("expected '{XML_ROOT_ELEMENT_NAME}' root element, found '{}'", root.name),
            ));
        }

        let mut mods = Vec::new();

        for (index, child) in root.children_named(crate::mod_info::XML_ELEMENT_NAME).enumerate() {
            mods.push(Mod::from_xml(child, &format!("mods.mod[{index}]"))?);
        }

        self.replace_all(mods)
    }

    /// Swap in a fully parsed mod list; the current contents survive any
    /// failure.
    fn replace_all(&mut self, mods: Vec<Mod>) -> Result<(), CatalogError> {
        let replacement = ModCollection {
            mods,
            updated: Signal::new(),
        };

        if !replacement.is_valid() {
            return Err(CatalogError::Integrity(
                "parsed mod collection failed validation".to_string(),
            ));
        }

        self.mods = replacement.mods;
        self.updated.emit();

        Ok(())
    }

    /// Load a catalog file, dispatching on its extension.
    pub fn load_from(&mut self, path: &Path) -> Result<(), CatalogError> {
        match file_extension(path).as_deref() {
            Some("json") => {
                let data = std::fs::read_to_string(path)?;
                let value: Value = serde_json::from_str(&data).map_err(|error| {
                    CatalogError::schema(
                        path.display().to_string(),
                        format!("malformed JSON: {error}"),
                    )
                })?;

                self.parse_from_json(&value)
            }
            Some("xml") => {
                let data = std::fs::read_to_string(path)?;
                let root = XmlElement::parse_document(&data)?;

                self.parse_from_xml(&root)
            }
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Save the catalog, dispatching on the target extension. Refuses to
    /// persist an invalid collection.
    pub fn save_to(&self, path: &Path) -> Result<(), CatalogError> {
        if !self.is_valid() {
            return Err(CatalogError::Integrity(
                "refusing to save invalid mod collection".to_string(),
            ));
        }

        match file_extension(path).as_deref() {
            Some("json") => {
                let data = serde_json::to_string_pretty(&self.to_json()).map_err(|error| {
                    CatalogError::Integrity(format!("serialization failed: {error}"))
                })?;
                std::fs::write(path, data)?;
                Ok(())
            }
            Some("xml") => {
                let data = self.to_xml().to_document_string()?;
                std::fs::write(path, data)?;
                Ok(())
            }
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
}
