//! A supported engine build: original DOS executable, source port, or
//! re-release.

use crate::compare::{eq_ignore_case, is_trimmed_non_empty};
use crate::error::CatalogError;
use crate::json::{
    optional_bool, optional_string, optional_string_array, optional_u64, put_optional,
    put_optional_bool, require_non_empty_string, warn_unknown_properties,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const JSON_PROPERTIES: &[&str] = &[
    "id",
    "longName",
    "shortName",
    "installed",
    "lastPlayed",
    "standAlone",
    "base",
    "gamePath",
    "gameExecutableName",
    "setupExecutableName",
    "groupFileInstallPath",
    "localWorkingDirectory",
    "relativeConFilePath",
    "supportsSubdirectories",
    "worldTourGroupSupported",
    "conFileArgumentFlag",
    "extraConFileArgumentFlag",
    "groupFileArgumentFlag",
    "defFileArgumentFlag",
    "extraDefFileArgumentFlag",
    "mapFileArgumentFlag",
    "episodeArgumentFlag",
    "levelArgumentFlag",
    "skillArgumentFlag",
    "skillStartValue",
    "recordDemoArgumentFlag",
    "playDemoArgumentFlag",
    "respawnModeArgumentFlag",
    "weaponSwitchOrderArgumentFlag",
    "disableMonstersArgumentFlag",
    "disableSoundArgumentFlag",
    "disableMusicArgumentFlag",
    "requiresCombinedGroup",
    "requiresGroupFileExtraction",
    "requiresDOSBox",
    "modDirectoryName",
    "website",
    "sourceCodeURL",
    "supportedOperatingSystems",
    "compatibleGameVersions",
    "notes",
];

/// Host operating systems an engine build runs on natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystem {
    Dos,
    Windows,
    Linux,
    MacOs,
}

impl OperatingSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingSystem::Dos => "DOS",
            OperatingSystem::Windows => "Windows",
            OperatingSystem::Linux => "Linux",
            OperatingSystem::MacOs => "MacOS",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            value if eq_ignore_case(value, "DOS") => Some(OperatingSystem::Dos),
            value if eq_ignore_case(value, "Windows") => Some(OperatingSystem::Windows),
            value if eq_ignore_case(value, "Linux") => Some(OperatingSystem::Linux),
            value if eq_ignore_case(value, "MacOS") => Some(OperatingSystem::MacOs),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata and command-line dialect for one engine build.
///
/// Argument flag strings are stored verbatim, trailing space included: the
/// command generator concatenates `flag` and value without inserting its
/// own separator, so `"-g "` produces `-g FILE.GRP` while `"/g"` produces
/// `/gFILE.GRP`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameVersion {
    pub id: String,
    pub long_name: String,
    pub short_name: String,
    pub game_executable_name: String,
    pub setup_executable_name: Option<String>,

    /// Filesystem directory of the installed engine; empty when the engine
    /// has not been configured by the user.
    pub game_path: String,

    /// Where the base game group file must exist for this engine, relative
    /// to `game_path`, when the engine cannot locate it itself.
    pub group_file_install_path: Option<String>,

    /// Sub-path within the mod cache holding this engine's mod files.
    pub mod_directory_name: String,

    pub con_file_argument_flag: Option<String>,
    pub extra_con_file_argument_flag: Option<String>,
    pub group_file_argument_flag: Option<String>,
    pub def_file_argument_flag: Option<String>,
    pub extra_def_file_argument_flag: Option<String>,
    pub map_file_argument_flag: Option<String>,
    pub episode_argument_flag: Option<String>,
    pub level_argument_flag: Option<String>,
    pub skill_argument_flag: Option<String>,

    /// Value the engine's easiest skill maps to; engines disagree on
    /// whether skill counting starts at 0 or 1.
    pub skill_start_value: u8,

    pub record_demo_argument_flag: Option<String>,
    pub play_demo_argument_flag: Option<String>,
    pub respawn_mode_argument_flag: Option<String>,
    pub weapon_switch_order_argument_flag: Option<String>,
    pub disable_monsters_argument_flag: Option<String>,
    pub disable_sound_argument_flag: Option<String>,
    pub disable_music_argument_flag: Option<String>,

    pub local_working_directory: bool,
    pub relative_con_file_path: bool,
    pub supports_subdirectories: bool,
    pub world_tour_group_supported: Option<bool>,
    pub requires_combined_group: Option<bool>,
    pub requires_group_file_extraction: Option<bool>,
    pub requires_dosbox: Option<bool>,

    pub website: Option<String>,
    pub source_code_url: Option<String>,
    pub supported_operating_systems: Vec<OperatingSystem>,
    pub compatible_game_version_ids: Vec<String>,
    pub notes: Vec<String>,

    // Runtime bookkeeping, persisted alongside the static metadata.
    pub installed_time_point: Option<DateTime<Utc>>,
    pub last_played_time_point: Option<DateTime<Utc>>,
    pub stand_alone: bool,
    pub base: Option<String>,
}

impl GameVersion {
    pub fn new(
        id: impl Into<String>,
        long_name: impl Into<String>,
        short_name: impl Into<String>,
        game_executable_name: impl Into<String>,
        mod_directory_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            long_name: long_name.into(),
            short_name: short_name.into(),
            game_executable_name: game_executable_name.into(),
            mod_directory_name: mod_directory_name.into(),
            skill_start_value: 1,
            ..Self::default()
        }
    }

    pub fn requires_dosbox(&self) -> bool {
        self.requires_dosbox.unwrap_or(false)
    }

    /// An engine is configured once its `game_path` points at an existing
    /// directory.
    pub fn is_configured(&self) -> bool {
        !self.game_path.is_empty() && std::path::Path::new(&self.game_path).is_dir()
    }

    pub fn has_compatible_game_version(&self, game_version_id: &str) -> bool {
        self.compatible_game_version_ids
            .iter()
            .any(|id| eq_ignore_case(id, game_version_id))
    }

    pub fn is_valid(&self) -> bool {
        is_trimmed_non_empty(&self.id)
            && is_trimmed_non_empty(&self.long_name)
            && is_trimmed_non_empty(&self.short_name)
            && is_trimmed_non_empty(&self.game_executable_name)
            && is_trimmed_non_empty(&self.mod_directory_name)
            && self
                .setup_executable_name
                .as_deref()
                .map_or(true, is_trimmed_non_empty)
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert("id".to_string(), Value::String(self.id.clone()));
        object.insert("longName".to_string(), Value::String(self.long_name.clone()));
        object.insert(
            "shortName".to_string(),
            Value::String(self.short_name.clone()),
        );

        if let Some(installed) = self.installed_time_point {
            object.insert(
                "installed".to_string(),
                Value::String(installed.to_rfc3339()),
            );
        }
        if let Some(last_played) = self.last_played_time_point {
            object.insert(
                "lastPlayed".to_string(),
                Value::String(last_played.to_rfc3339()),
            );
        }
        if self.stand_alone {
            object.insert("standAlone".to_string(), Value::Bool(true));
        }
        put_optional(&mut object, "base", self.base.as_deref());

        object.insert("gamePath".to_string(), Value::String(self.game_path.clone()));
        object.insert(
            "gameExecutableName".to_string(),
            Value::String(self.game_executable_name.clone()),
        );
        put_optional(
            &mut object,
            "setupExecutableName",
            self.setup_executable_name.as_deref(),
        );
        put_optional(
            &mut object,
            "groupFileInstallPath",
            self.group_file_install_path.as_deref(),
        );

        object.insert(
            "localWorkingDirectory".to_string(),
            Value::Bool(self.local_working_directory),
        );
        object.insert(
            "relativeConFilePath".to_string(),
            Value::Bool(self.relative_con_file_path),
        );
        object.insert(
            "supportsSubdirectories".to_string(),
            Value::Bool(self.supports_subdirectories),
        );
        put_optional_bool(
            &mut object,
            "worldTourGroupSupported",
            self.world_tour_group_supported,
        );

        put_optional(&mut object, "conFileArgumentFlag", self.con_file_argument_flag.as_deref());
        put_optional(
            &mut object,
            "extraConFileArgumentFlag",
            self.extra_con_file_argument_flag.as_deref(),
        );
        put_optional(
            &mut object,
            "groupFileArgumentFlag",
            self.group_file_argument_flag.as_deref(),
        );
        put_optional(&mut object, "defFileArgumentFlag", self.def_file_argument_flag.as_deref());
        put_optional(
            &mut object,
            "extraDefFileArgumentFlag",
            self.extra_def_file_argument_flag.as_deref(),
        );
        put_optional(&mut object, "mapFileArgumentFlag", self.map_file_argument_flag.as_deref());
        put_optional(&mut object, "episodeArgumentFlag", self.episode_argument_flag.as_deref());
        put_optional(&mut object, "levelArgumentFlag", self.level_argument_flag.as_deref());
        put_optional(&mut object, "skillArgumentFlag", self.skill_argument_flag.as_deref());
        object.insert(
            "skillStartValue".to_string(),
            Value::from(u64::from(self.skill_start_value)),
        );
        put_optional(
            &mut object,
            "recordDemoArgumentFlag",
            self.record_demo_argument_flag.as_deref(),
        );
        put_optional(
            &mut object,
            "playDemoArgumentFlag",
            self.play_demo_argument_flag.as_deref(),
        );
        put_optional(
            &mut object,
            "respawnModeArgumentFlag",
            self.respawn_mode_argument_flag.as_deref(),
        );
        put_optional(
            &mut object,
            "weaponSwitchOrderArgumentFlag",
            self.weapon_switch_order_argument_flag.as_deref(),
        );
        put_optional(
            &mut object,
            "disableMonstersArgumentFlag",
            self.disable_monsters_argument_flag.as_deref(),
        );
        put_optional(
            &mut object,
            "disableSoundArgumentFlag",
            self.disable_sound_argument_flag.as_deref(),
        );
        put_optional(
            &mut object,
            "disableMusicArgumentFlag",
            self.disable_music_argument_flag.as_deref(),
        );

        put_optional_bool(&mut object, "requiresCombinedGroup", self.requires_combined_group);
        put_optional_bool(
            &mut object,
            "requiresGroupFileExtraction",
            self.requires_group_file_extraction,
        );
        put_optional_bool(&mut object, "requiresDOSBox", self.requires_dosbox);

        object.insert(
            "modDirectoryName".to_string(),
            Value::String(self.mod_directory_name.clone()),
        );
        put_optional(&mut object, "website", self.website.as_deref());
        put_optional(&mut object, "sourceCodeURL", self.source_code_url.as_deref());

        object.insert(
            "supportedOperatingSystems".to_string(),
            Value::Array(
                self.supported_operating_systems
                    .iter()
                    .map(|os| Value::String(os.to_string()))
                    .collect(),
            ),
        );

        if !self.compatible_game_version_ids.is_empty() {
            object.insert(
                "compatibleGameVersions".to_string(),
                Value::Array(
                    self.compatible_game_version_ids
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }

        if !self.notes.is_empty() {
            object.insert(
                "notes".to_string(),
                Value::Array(self.notes.iter().cloned().map(Value::String).collect()),
            );
        }

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        let parse_time = |name: &str| -> Result<Option<DateTime<Utc>>, CatalogError> {
            optional_string(object, name, path)?
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|time| time.with_timezone(&Utc))
                        .map_err(|error| {
                            CatalogError::schema(
                                format!("{path}.{name}"),
                                format!("bad timestamp '{raw}': {error}"),
                            )
                        })
                })
                .transpose()
        };

        let mut supported_operating_systems = Vec::new();
        for raw in optional_string_array(object, "supportedOperatingSystems", path)? {
            match OperatingSystem::parse(&raw) {
                Some(os) => supported_operating_systems.push(os),
                None => {
                    return Err(CatalogError::schema(
                        format!("{path}.supportedOperatingSystems"),
                        format!("unknown operating system '{raw}'"),
                    ));
                }
            }
        }

        let skill_start_value = optional_u64(object, "skillStartValue", path)?.unwrap_or(1);
        let skill_start_value = u8::try_from(skill_start_value).map_err(|_| {
            CatalogError::schema(
                format!("{path}.skillStartValue"),
                format!("value {skill_start_value} exceeds 255"),
            )
        })?;

        Ok(Self {
            id: require_non_empty_string(object, "id", path)?,
            long_name: require_non_empty_string(object, "longName", path)?,
            short_name: require_non_empty_string(object, "shortName", path)?,
            game_executable_name: require_non_empty_string(object, "gameExecutableName", path)?,
            setup_executable_name: optional_string(object, "setupExecutableName", path)?,
            game_path: optional_string(object, "gamePath", path)?.unwrap_or_default(),
            group_file_install_path: optional_string(object, "groupFileInstallPath", path)?,
            mod_directory_name: require_non_empty_string(object, "modDirectoryName", path)?,
            con_file_argument_flag: optional_string(object, "conFileArgumentFlag", path)?,
            extra_con_file_argument_flag: optional_string(object, "extraConFileArgumentFlag", path)?,
            group_file_argument_flag: optional_string(object, "groupFileArgumentFlag", path)?,
            def_file_argument_flag: optional_string(object, "defFileArgumentFlag", path)?,
            extra_def_file_argument_flag: optional_string(object, "extraDefFileArgumentFlag", path)?,
            map_file_argument_flag: optional_string(object, "mapFileArgumentFlag", path)?,
            episode_argument_flag: optional_string(object, "episodeArgumentFlag", path)?,
            level_argument_flag: optional_string(object, "levelArgumentFlag", path)?,
            skill_argument_flag: optional_string(object, "skillArgumentFlag", path)?,
            skill_start_value,
            record_demo_argument_flag: optional_string(object, "recordDemoArgumentFlag", path)?,
            play_demo_argument_flag: optional_string(object, "playDemoArgumentFlag", path)?,
            respawn_mode_argument_flag: optional_string(object, "respawnModeArgumentFlag", path)?,
            weapon_switch_order_argument_flag: optional_string(
                object,
                "weaponSwitchOrderArgumentFlag",
                path,
            )?,
            disable_monsters_argument_flag: optional_string(
                object,
                "disableMonstersArgumentFlag",
                path,
            )?,
            disable_sound_argument_flag: optional_string(object, "disableSoundArgumentFlag", path)?,
            disable_music_argument_flag: optional_string(object, "disableMusicArgumentFlag", path)?,
            local_working_directory: optional_bool(object, "localWorkingDirectory", path)?
                .unwrap_or(false),
            relative_con_file_path: optional_bool(object, "relativeConFilePath", path)?
                .unwrap_or(false),
            supports_subdirectories: optional_bool(object, "supportsSubdirectories", path)?
                .unwrap_or(false),
            world_tour_group_supported: optional_bool(object, "worldTourGroupSupported", path)?,
            requires_combined_group: optional_bool(object, "requiresCombinedGroup", path)?,
            requires_group_file_extraction: optional_bool(
                object,
                "requiresGroupFileExtraction",
                path,
            )?,
            requires_dosbox: optional_bool(object, "requiresDOSBox", path)?,
            website: optional_string(object, "website", path)?,
            source_code_url: optional_string(object, "sourceCodeURL", path)?,
            supported_operating_systems,
            compatible_game_version_ids: optional_string_array(
                object,
                "compatibleGameVersions",
                path,
            )?,
            notes: optional_string_array(object, "notes", path)?,
            installed_time_point: parse_time("installed")?,
            last_played_time_point: parse_time("lastPlayed")?,
            stand_alone: optional_bool(object, "standAlone", path)?.unwrap_or(false),
            base: optional_string(object, "base", path)?,
        })
    }
}

impl std::fmt::Display for GameVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.long_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample() -> GameVersion {
        let mut atomic = GameVersion::new(
            "atomic",
            "Duke Nukem 3D: Atomic Edition 1.5",
            "Atomic Edition",
            "DUKE3D.EXE",
            "Atomic",
        );
        atomic.setup_executable_name = Some("SETUP.EXE".into());
        atomic.con_file_argument_flag = Some("/x ".into());
        atomic.group_file_argument_flag = Some("/g".into());
        atomic.map_file_argument_flag = Some("-map ".into());
        atomic.requires_dosbox = Some(true);
        atomic.local_working_directory = true;
        atomic.relative_con_file_path = true;
        atomic.supported_operating_systems = vec![OperatingSystem::Dos];
        atomic.compatible_game_version_ids = vec!["plutonium".into()];
        atomic
    }

    #[test]
    fn validity_requires_names_and_mod_directory() {
        assert!(sample().is_valid());

        let mut nameless = sample();
        nameless.long_name.clear();
        assert!(!nameless.is_valid());

        let mut no_mod_dir = sample();
        no_mod_dir.mod_directory_name.clear();
        assert!(!no_mod_dir.is_valid());
    }

    #[test]
    fn configuration_requires_existing_directory() {
        let mut engine = sample();
        assert!(!engine.is_configured(), "empty path is unconfigured");

        engine.game_path = "/nonexistent/duke3d".into();
        assert!(!engine.is_configured());

        let temp = tempfile::tempdir().unwrap();
        engine.game_path = temp.path().display().to_string();
        assert!(engine.is_configured());
    }

    #[test]
    fn compatibility_lookup_ignores_case() {
        let engine = sample();
        assert!(engine.has_compatible_game_version("Plutonium"));
        assert!(!engine.has_compatible_game_version("regular"));
    }

    #[test]
    fn json_round_trip_preserves_flag_spacing() {
        let engine = sample();
        let value = engine.to_json();

        assert_eq!(
            value.get("conFileArgumentFlag").and_then(Value::as_str),
            Some("/x "),
            "trailing flag space must survive serialization"
        );

        let parsed = GameVersion::from_json(&value, "gameVersion").unwrap();
        assert_eq!(engine, parsed);
    }

    #[test]
    fn skill_start_value_over_255_is_schema_error() {
        let mut value = sample().to_json();
        value["skillStartValue"] = Value::from(300);

        let error = GameVersion::from_json(&value, "gameVersion").unwrap_err();
        assert!(error.to_string().contains("skillStartValue"), "{error}");
    }

    #[test]
    fn unknown_operating_system_is_schema_error() {
        let mut value = sample().to_json();
        value["supportedOperatingSystems"] = serde_json::json!(["BeOS"]);

        assert!(GameVersion::from_json(&value, "gameVersion").is_err());
    }
}
