//! The `.duke3d_mod.json` sidecar record.

use crate::error::JournalError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// `fileType` tag of every journal sidecar.
pub const FILE_TYPE: &str = "Installed Mod Information";

/// Format version this build reads and writes.
pub const FILE_FORMAT_VERSION: &str = "1.0.0";

/// File name of the sidecar within a game directory.
pub const DEFAULT_FILE_NAME: &str = ".duke3d_mod.json";

/// Which mod currently occupies a game directory, and which files belong
/// to whom.
///
/// `original_files` lists files that existed before the install (restored
/// on uninstall); `mod_files` lists files the install created (deleted on
/// uninstall). Both lists are ordered and de-duplicated case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledModInfo {
    pub mod_id: String,
    pub mod_name: String,
    pub mod_version: String,
    pub installed_timestamp: DateTime<Utc>,
    original_files: Vec<String>,
    mod_files: Vec<String>,
}

impl InstalledModInfo {
    pub fn new(
        mod_id: impl Into<String>,
        mod_name: impl Into<String>,
        mod_version: impl Into<String>,
        installed_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            mod_id: mod_id.into(),
            mod_name: mod_name.into(),
            mod_version: mod_version.into(),
            installed_timestamp,
            original_files: Vec::new(),
            mod_files: Vec::new(),
        }
    }

    /// Display name: mod name plus version, when present.
    pub fn full_mod_name(&self) -> String {
        if self.mod_version.is_empty() {
            self.mod_name.clone()
        } else {
            format!("{} {}", self.mod_name, self.mod_version)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.original_files.is_empty() && self.mod_files.is_empty()
    }

    pub fn original_files(&self) -> &[String] {
        &self.original_files
    }

    pub fn mod_files(&self) -> &[String] {
        &self.mod_files
    }

    pub fn has_original_file(&self, file_path: &str) -> bool {
        Self::contains(&self.original_files, file_path)
    }

    pub fn has_mod_file(&self, file_path: &str) -> bool {
        Self::contains(&self.mod_files, file_path)
    }

    /// Record a pre-existing file. Empty paths and case-insensitive
    /// duplicates are rejected.
    pub fn add_original_file(&mut self, file_path: impl Into<String>) -> bool {
        Self::add(&mut self.original_files, file_path.into())
    }

    /// Record a file the install created.
    pub fn add_mod_file(&mut self, file_path: impl Into<String>) -> bool {
        Self::add(&mut self.mod_files, file_path.into())
    }

    pub fn remove_original_file(&mut self, file_path: &str) -> bool {
        Self::remove(&mut self.original_files, file_path)
    }

    pub fn remove_mod_file(&mut self, file_path: &str) -> bool {
        Self::remove(&mut self.mod_files, file_path)
    }

    fn contains(files: &[String], file_path: &str) -> bool {
        files.iter().any(|file| file.eq_ignore_ascii_case(file_path))
    }

    fn add(files: &mut Vec<String>, file_path: String) -> bool {
        if file_path.trim().is_empty() || Self::contains(files, &file_path) {
            return false;
        }

        files.push(file_path);
        true
    }

    fn remove(files: &mut Vec<String>, file_path: &str) -> bool {
        match files.iter().position(|file| file.eq_ignore_ascii_case(file_path)) {
            Some(index) => {
                files.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        if self.mod_id.trim().is_empty() || self.mod_name.trim().is_empty() {
            return false;
        }

        fn no_duplicates(files: &[String]) -> bool {
            for (index, file) in files.iter().enumerate() {
                if file.trim().is_empty() {
                    return false;
                }

                if files[index + 1..]
                    .iter()
                    .any(|other| other.eq_ignore_ascii_case(file))
                {
                    return false;
                }
            }

            true
        }

        no_duplicates(&self.original_files) && no_duplicates(&self.mod_files)
    }

    // ------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------

    pub fn to_json(&self) -> Value {
        let mut mod_object = Map::new();
        mod_object.insert("id".to_string(), Value::String(self.mod_id.clone()));
        mod_object.insert("name".to_string(), Value::String(self.mod_name.clone()));

        if !self.mod_version.is_empty() {
            mod_object.insert(
                "version".to_string(),
                Value::String(self.mod_version.clone()),
            );
        }

        let mut object = Map::new();
        object.insert("fileType".to_string(), Value::String(FILE_TYPE.to_string()));
        object.insert(
            "fileFormatVersion".to_string(),
            Value::String(FILE_FORMAT_VERSION.to_string()),
        );
        object.insert("mod".to_string(), Value::Object(mod_object));
        object.insert(
            "installedTimestamp".to_string(),
            Value::String(
                self.installed_timestamp
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        );
        object.insert(
            "originalFiles".to_string(),
            Value::Array(self.original_files.iter().cloned().map(Value::String).collect()),
        );
        object.insert(
            "modFiles".to_string(),
            Value::Array(self.mod_files.iter().cloned().map(Value::String).collect()),
        );

        Value::Object(object)
    }

    pub fn from_json(value: &Value) -> Result<Self, JournalError> {
        let object = value
            .as_object()
            .ok_or_else(|| JournalError::schema("journal", "expected an object"))?;

        let file_type = require_string(object, "fileType", "journal")?;
        if !file_type.eq_ignore_ascii_case(FILE_TYPE) {
            return Err(JournalError::UnexpectedFileType(file_type));
        }

        let format_version = require_string(object, "fileFormatVersion", "journal")?;
        let found = semver::Version::parse(&format_version).map_err(|error| {
            JournalError::schema(
                "journal.fileFormatVersion",
                format!("bad semver '{format_version}': {error}"),
            )
        })?;
        let supported =
            semver::Version::parse(FILE_FORMAT_VERSION).expect("supported version is valid semver");

        if found != supported {
            return Err(JournalError::UnsupportedFormatVersion {
                found: format_version,
                supported: FILE_FORMAT_VERSION.to_string(),
            });
        }

        let mod_value = object
            .get("mod")
            .ok_or_else(|| JournalError::schema("journal.mod", "missing required property"))?;
        let mod_object = mod_value
            .as_object()
            .ok_or_else(|| JournalError::schema("journal.mod", "expected an object"))?;

        let raw_timestamp = require_string(object, "installedTimestamp", "journal")?;
        let installed_timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|error| {
                JournalError::schema(
                    "journal.installedTimestamp",
                    format!("bad timestamp '{raw_timestamp}': {error}"),
                )
            })?;

        let mut info = InstalledModInfo::new(
            require_string(mod_object, "id", "journal.mod")?,
            require_string(mod_object, "name", "journal.mod")?,
            match mod_object.get("version") {
                Some(Value::String(version)) => version.clone(),
                Some(_) => {
                    return Err(JournalError::schema("journal.mod.version", "expected a string"));
                }
                None => String::new(),
            },
            installed_timestamp,
        );

        for file_path in parse_file_list(object, "originalFiles")? {
            if !info.add_original_file(file_path.clone()) {
                return Err(JournalError::schema(
                    "journal.originalFiles",
                    format!("empty or duplicate file path '{file_path}'"),
                ));
            }
        }

        for file_path in parse_file_list(object, "modFiles")? {
            if !info.add_mod_file(file_path.clone()) {
                return Err(JournalError::schema(
                    "journal.modFiles",
                    format!("empty or duplicate file path '{file_path}'"),
                ));
            }
        }

        Ok(info)
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// The sidecar path for a game directory.
    pub fn path_in_game_directory(game_path: &Path) -> PathBuf {
        game_path.join(DEFAULT_FILE_NAME)
    }

    /// Load the sidecar from a game directory. A missing sidecar is not an
    /// error: the directory simply has no installed mod.
    pub fn load_from_game_directory(game_path: &Path) -> Result<Option<Self>, JournalError> {
        let path = Self::path_in_game_directory(game_path);

        if !path.is_file() {
            return Ok(None);
        }

        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, JournalError> {
        let data = std::fs::read_to_string(path)?;

        let value: Value = serde_json::from_str(&data).map_err(|error| {
            JournalError::schema(path.display().to_string(), format!("malformed JSON: {error}"))
        })?;

        Self::from_json(&value)
    }

    pub fn save_to_game_directory(&self, game_path: &Path) -> Result<(), JournalError> {
        self.save_to(&Self::path_in_game_directory(game_path))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), JournalError> {
        if !self.is_valid() {
            return Err(JournalError::schema(
                "journal",
                "refusing to save an invalid journal",
            ));
        }

        let data = serde_json::to_string_pretty(&self.to_json())
            .expect("journal JSON is always serializable");

        std::fs::write(path, data)?;

        Ok(())
    }

    /// Delete the sidecar from a game directory. Absent is fine.
    pub fn remove_from_game_directory(game_path: &Path) -> Result<bool, JournalError> {
        let path = Self::path_in_game_directory(game_path);

        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&path)?;
        Ok(true)
    }
}

fn parse_file_list(
    object: &Map<String, Value>,
    name: &str,
) -> Result<Vec<String>, JournalError> {
    let Some(list_value) = object.get(name) else {
        return Ok(Vec::new());
    };

    let items = list_value
        .as_array()
        .ok_or_else(|| JournalError::schema(format!("journal.{name}"), "expected an array"))?;

    let mut files = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(file_path) => files.push(file_path.clone()),
            _ => {
                return Err(JournalError::schema(
                    format!("journal.{name}[{index}]"),
                    "expected a string",
                ));
            }
        }
    }

    Ok(files)
}

fn require_string(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<String, JournalError> {
    match object.get(name) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => Err(JournalError::schema(
            format!("{path}.{name}"),
            "property must not be empty",
        )),
        Some(_) => Err(JournalError::schema(format!("{path}.{name}"), "expected a string")),
        None => Err(JournalError::schema(
            format!("{path}.{name}"),
            "missing required property",
        )),
    }
}
