//! The registry of supported engine builds.

use crate::compare::eq_ignore_case;
use crate::error::CatalogError;
use crate::game_version::{GameVersion, OperatingSystem};
use crate::json::warn_unknown_properties;
use crate::mod_game_version::ModGameVersion;
use crate::signal::Signal;
use serde_json::{Map, Value};
use std::path::Path;

const FILE_TYPE: &str = "Game Versions";
const FILE_FORMAT_VERSION: &str = "1.0.0";
const ENVELOPE_PROPERTIES: &[&str] = &["fileType", "fileFormatVersion", "gameVersions"];

/// Mutable ordered collection of [`GameVersion`] entries.
///
/// Ids and mod directory names are unique (case-insensitive). Loading a
/// registry file merges in any missing built-in defaults so new engine
/// entries reach existing installations.
#[derive(Debug, Default)]
pub struct GameVersionCollection {
    game_versions: Vec<GameVersion>,

    /// Fires after any structural change (add/remove/clear/load).
    pub updated: Signal,

    /// Fires after an entry is modified in place via
    /// [`GameVersionCollection::update_game_version`].
    pub modified: Signal,
}

impl GameVersionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every built-in engine entry.
    pub fn with_defaults() -> Self {
        let mut collection = Self::new();

        for game_version in default_game_versions() {
            // Defaults are constructed valid and unique.
            let _ = collection.add_game_version(game_version);
        }

        collection
    }

    pub fn len(&self) -> usize {
        self.game_versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.game_versions.is_empty()
    }

    pub fn game_versions(&self) -> &[GameVersion] {
        &self.game_versions
    }

    pub fn has_game_version_with_id(&self, id: &str) -> bool {
        self.index_of_game_version_with_id(id).is_some()
    }

    pub fn index_of_game_version_with_id(&self, id: &str) -> Option<usize> {
        self.game_versions
            .iter()
            .position(|game_version| eq_ignore_case(&game_version.id, id))
    }

    pub fn game_version_with_id(&self, id: &str) -> Option<&GameVersion> {
        self.index_of_game_version_with_id(id)
            .map(|index| &self.game_versions[index])
    }

    pub fn game_version(&self, index: usize) -> Option<&GameVersion> {
        self.game_versions.get(index)
    }

    /// Append an engine entry, rejecting invalid entries and duplicate ids
    /// or mod directory names.
    pub fn add_game_version(&mut self, game_version: GameVersion) -> Result<(), CatalogError> {
        if !game_version.is_valid() {
            return Err(CatalogError::Integrity(format!(
                "game version '{}' is not valid",
                game_version.id
            )));
        }

        if self.has_game_version_with_id(&game_version.id) {
            return Err(CatalogError::Integrity(format!(
                "duplicate game version id '{}'",
                game_version.id
            )));
        }

        if self
            .game_versions
            .iter()
            .any(|existing| eq_ignore_case(&existing.mod_directory_name, &game_version.mod_directory_name))
        {
            return Err(CatalogError::Integrity(format!(
                "duplicate mod directory name '{}'",
                game_version.mod_directory_name
            )));
        }

        self.game_versions.push(game_version);
        self.updated.emit();

        Ok(())
    }

    pub fn remove_game_version_with_id(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of_game_version_with_id(id) else {
            return false;
        };

        self.game_versions.remove(index);
        self.updated.emit();

        true
    }

    pub fn clear(&mut self) {
        self.game_versions.clear();
        self.updated.emit();
    }

    /// Replace the entry with `update`'s id in place and fire `modified`.
    pub fn update_game_version(&mut self, update: GameVersion) -> Result<(), CatalogError> {
        if !update.is_valid() {
            return Err(CatalogError::Integrity(format!(
                "game version '{}' is not valid",
                update.id
            )));
        }

        let Some(index) = self.index_of_game_version_with_id(&update.id) else {
            return Err(CatalogError::Integrity(format!(
                "no game version with id '{}'",
                update.id
            )));
        };

        self.game_versions[index] = update;
        self.modified.emit();

        Ok(())
    }

    /// Append any built-in default whose id is not yet present. Returns the
    /// number of entries added.
    pub fn merge_missing_defaults(&mut self) -> usize {
        let mut added = 0;

        for default in default_game_versions() {
            if !self.has_game_version_with_id(&default.id) {
                self.game_versions.push(default);
                added += 1;
            }
        }

        if added != 0 {
            self.updated.emit();
        }

        added
    }

    // ------------------------------------------------------------------
    // Compatibility queries
    // ------------------------------------------------------------------

    /// True when `engine` can load files targeting `target_id`, checking
    /// both directions of the compatibility graph: either side listing the
    /// other suffices.
    pub fn is_compatible(&self, engine: &GameVersion, target_id: &str) -> bool {
        if eq_ignore_case(&engine.id, target_id) || engine.has_compatible_game_version(target_id) {
            return true;
        }

        self.game_version_with_id(target_id)
            .map_or(false, |target| target.has_compatible_game_version(&engine.id))
    }

    /// Every registered engine compatible with `game_version`.
    pub fn game_versions_compatible_with(
        &self,
        game_version: &GameVersion,
        include_self: bool,
        only_configured: bool,
    ) -> Vec<&GameVersion> {
        self.game_versions_compatible_with_id(&game_version.id, include_self, only_configured)
    }

    /// Every registered engine compatible with the engine id `id`.
    pub fn game_versions_compatible_with_id(
        &self,
        id: &str,
        include_self: bool,
        only_configured: bool,
    ) -> Vec<&GameVersion> {
        self.game_versions
            .iter()
            .filter(|engine| {
                if eq_ignore_case(&engine.id, id) {
                    include_self
                } else {
                    self.is_compatible(engine, id)
                }
            })
            .filter(|engine| !only_configured || engine.is_configured())
            .collect()
    }

    /// Every registered engine compatible with the engine targeted by
    /// `mod_game_version`.
    pub fn game_versions_compatible_with_mod_game_version(
        &self,
        mod_game_version: &ModGameVersion,
        include_self: bool,
        only_configured: bool,
    ) -> Vec<&GameVersion> {
        self.game_versions_compatible_with_id(
            &mod_game_version.game_version_id,
            include_self,
            only_configured,
        )
    }

    /// Pair each matching engine with the mod game versions it can load.
    ///
    /// Used to present a fallback prompt: each candidate engine carries the
    /// indices into `mod_game_versions` of the file lists it supports.
    pub fn game_versions_compatible_with_mod_game_versions<'a>(
        &'a self,
        mod_game_versions: &[ModGameVersion],
        only_configured: bool,
    ) -> Vec<(&'a GameVersion, Vec<usize>)> {
        self.game_versions
            .iter()
            .filter(|engine| !only_configured || engine.is_configured())
            .filter_map(|engine| {
                let loadable: Vec<usize> = mod_game_versions
                    .iter()
                    .enumerate()
                    .filter(|(_, mod_game_version)| {
                        self.is_compatible(engine, &mod_game_version.game_version_id)
                    })
                    .map(|(index, _)| index)
                    .collect();

                if loadable.is_empty() {
                    None
                } else {
                    Some((engine, loadable))
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn is_valid(&self) -> bool {
        for (index, game_version) in self.game_versions.iter().enumerate() {
            if !game_version.is_valid() {
                return false;
            }

            if self.game_versions[index + 1..].iter().any(|other| {
                eq_ignore_case(&other.id, &game_version.id)
                    || eq_ignore_case(&other.mod_directory_name, &game_version.mod_directory_name)
            }) {
                return false;
            }
        }

        true
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert("fileType".to_string(), Value::String(FILE_TYPE.to_string()));
        object.insert(
            "fileFormatVersion".to_string(),
            Value::String(FILE_FORMAT_VERSION.to_string()),
        );
        object.insert(
            "gameVersions".to_string(),
            Value::Array(self.game_versions.iter().map(GameVersion::to_json).collect()),
        );

        Value::Object(object)
    }

    /// Parse a registry document, replacing the current contents on
    /// success only.
    pub fn parse_from(&mut self, value: &Value) -> Result<(), CatalogError> {
        let object = crate::json::as_object(value, "gameVersions")?;

        warn_unknown_properties(object, ENVELOPE_PROPERTIES, "gameVersions");

        crate::envelope::check(object, FILE_TYPE, FILE_FORMAT_VERSION, "gameVersions")?;

        let list_value = object.get("gameVersions").ok_or_else(|| {
            CatalogError::schema("gameVersions.gameVersions", "missing required property")
        })?;

        let mut game_versions = Vec::new();

        for (index, item) in crate::json::as_array(list_value, "gameVersions.gameVersions")?
            .iter()
            .enumerate()
        {
            game_versions.push(GameVersion::from_json(
                item,
                &format!("gameVersions.gameVersions[{index}]"),
            )?);
        }

        let replacement = GameVersionCollection {
            game_versions,
            updated: Signal::new(),
            modified: Signal::new(),
        };

        if !replacement.is_valid() {
            return Err(CatalogError::Integrity(
                "parsed game version collection failed validation".to_string(),
            ));
        }

        self.game_versions = replacement.game_versions;
        self.updated.emit();

        Ok(())
    }

    /// Load a registry file, then merge in missing built-in defaults.
    pub fn load_from(&mut self, path: &Path) -> Result<(), CatalogError> {
        let data = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&data).map_err(|error| {
            CatalogError::schema(path.display().to_string(), format!("malformed JSON: {error}"))
        })?;

        self.parse_from(&value)?;
        let merged = self.merge_missing_defaults();

        if merged != 0 {
            tracing::info!(
                "merged {merged} missing default game version(s) into '{}'",
                path.display()
            );
        }

        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CatalogError> {
        if !self.is_valid() {
            return Err(CatalogError::Integrity(
                "refusing to save invalid game version collection".to_string(),
            ));
        }

        let data = serde_json::to_string_pretty(&self.to_json())
            .map_err(|error| CatalogError::Integrity(format!("serialization failed: {error}")))?;

        std::fs::write(path, data)?;

        Ok(())
    }
}

// ----------------------------------------------------------------------
// Built-in engine table
// ----------------------------------------------------------------------

fn dos_argument_flags(game_version: &mut GameVersion) {
    game_version.con_file_argument_flag = Some("/x ".into());
    game_version.group_file_argument_flag = Some("/g".into());
    game_version.map_file_argument_flag = Some("-map ".into());
    game_version.episode_argument_flag = Some("/v".into());
    game_version.level_argument_flag = Some("/l".into());
    game_version.skill_argument_flag = Some("/s".into());
    game_version.record_demo_argument_flag = Some("/r".into());
    game_version.play_demo_argument_flag = Some("/d".into());
    game_version.respawn_mode_argument_flag = Some("/t".into());
    game_version.weapon_switch_order_argument_flag = Some("/u".into());
    game_version.disable_monsters_argument_flag = Some("/m".into());
    game_version.disable_sound_argument_flag = Some("/ns".into());
    game_version.disable_music_argument_flag = Some("/nm".into());
}

fn eduke_argument_flags(game_version: &mut GameVersion) {
    game_version.con_file_argument_flag = Some("-x ".into());
    game_version.extra_con_file_argument_flag = Some("-mx ".into());
    game_version.group_file_argument_flag = Some("-g ".into());
    game_version.def_file_argument_flag = Some("-h ".into());
    game_version.extra_def_file_argument_flag = Some("-mh ".into());
    game_version.map_file_argument_flag = Some("-map ".into());
    game_version.episode_argument_flag = Some("-v".into());
    game_version.level_argument_flag = Some("-l".into());
    game_version.skill_argument_flag = Some("-s".into());
    game_version.record_demo_argument_flag = Some("-r".into());
    game_version.play_demo_argument_flag = Some("-d ".into());
    game_version.respawn_mode_argument_flag = Some("-t".into());
    game_version.weapon_switch_order_argument_flag = Some("-u".into());
    game_version.disable_monsters_argument_flag = Some("-m".into());
    game_version.disable_sound_argument_flag = Some("-ns".into());
    game_version.disable_music_argument_flag = Some("-nm".into());
}

/// The engines this manager knows out of the box.
pub fn default_game_versions() -> Vec<GameVersion> {
    let mut lameduke = GameVersion::new(
        "lameduke",
        "Duke Nukem 3D Beta 1.3.95 (LameDuke)",
        "LameDuke",
        "D3D.EXE",
        "LameDuke",
    );
    lameduke.setup_executable_name = Some("SETUP.EXE".into());
    lameduke.episode_argument_flag = Some("/v".into());
    lameduke.level_argument_flag = Some("/l".into());
    lameduke.skill_argument_flag = Some("/s".into());
    lameduke.record_demo_argument_flag = Some("/r".into());
    lameduke.skill_start_value = 0;
    lameduke.requires_dosbox = Some(true);
    lameduke.local_working_directory = true;
    lameduke.relative_con_file_path = true;
    lameduke.requires_combined_group = Some(true);
    lameduke.requires_group_file_extraction = Some(true);
    lameduke.website = Some("https://www.dukenukem.com".into());
    lameduke.supported_operating_systems = vec![OperatingSystem::Dos];

    let mut beta = GameVersion::new(
        "beta",
        "Duke Nukem 3D Beta 0.99",
        "Duke 3D Beta 0.99",
        "DUKE3D.EXE",
        "Beta",
    );
    beta.setup_executable_name = Some("SETUP.EXE".into());
    beta.episode_argument_flag = Some("/v".into());
    beta.level_argument_flag = Some("/l".into());
    beta.skill_argument_flag = Some("/s".into());
    beta.record_demo_argument_flag = Some("/r".into());
    beta.respawn_mode_argument_flag = Some("/t".into());
    beta.disable_monsters_argument_flag = Some("/m".into());
    beta.skill_start_value = 0;
    beta.requires_dosbox = Some(true);
    beta.local_working_directory = true;
    beta.relative_con_file_path = true;
    beta.requires_combined_group = Some(true);
    beta.website = Some("https://www.dukenukem.com".into());
    beta.supported_operating_systems = vec![OperatingSystem::Dos];
    beta.compatible_game_version_ids = vec!["regular".into()];
    beta.notes = vec![
        "Has extremely poor support for mods.".into(),
        "Does not function properly out of the box.".into(),
    ];

    let mut regular = GameVersion::new(
        "regular",
        "Duke Nukem 3D 1.3D",
        "Duke 3D 1.3D",
        "DUKE3D.EXE",
        "Regular",
    );
    regular.setup_executable_name = Some("SETUP.EXE".into());
    dos_argument_flags(&mut regular);
    regular.play_demo_argument_flag = None;
    regular.requires_dosbox = Some(true);
    regular.local_working_directory = true;
    regular.relative_con_file_path = true;
    regular.website = Some("https://www.dukenukem.com".into());
    regular.supported_operating_systems = vec![OperatingSystem::Dos];
    regular.compatible_game_version_ids = vec!["beta".into()];

    let mut plutonium = GameVersion::new(
        "plutonium",
        "Duke Nukem 3D: Plutonium Pak 1.4",
        "Plutonium Pak",
        "DUKE3D.EXE",
        "PlutPak",
    );
    plutonium.setup_executable_name = Some("SETUP.EXE".into());
    dos_argument_flags(&mut plutonium);
    plutonium.requires_dosbox = Some(true);
    plutonium.local_working_directory = true;
    plutonium.relative_con_file_path = true;
    plutonium.website = Some("https://www.dukenukem.com".into());
    plutonium.supported_operating_systems = vec![OperatingSystem::Dos];
    plutonium.compatible_game_version_ids = vec!["atomic".into()];
    plutonium.notes = vec!["Virtually identical to Duke Nukem 3D Atomic Edition.".into()];

    let mut atomic = GameVersion::new(
        "atomic",
        "Duke Nukem 3D: Atomic Edition 1.5",
        "Atomic Edition",
        "DUKE3D.EXE",
        "Atomic",
    );
    atomic.setup_executable_name = Some("SETUP.EXE".into());
    dos_argument_flags(&mut atomic);
    atomic.requires_dosbox = Some(true);
    atomic.local_working_directory = true;
    atomic.relative_con_file_path = true;
    atomic.website = Some("https://www.dukenukem.com".into());
    atomic.supported_operating_systems = vec![OperatingSystem::Dos];
    atomic.compatible_game_version_ids = vec!["plutonium".into()];

    let mut jfduke3d = GameVersion::new("jfduke3d", "JFDuke3D", "JFDuke3D", "duke3d.exe", "JFDuke3D");
    dos_argument_flags(&mut jfduke3d);
    jfduke3d.local_working_directory = true;
    jfduke3d.relative_con_file_path = true;
    jfduke3d.supports_subdirectories = true;
    jfduke3d.website = Some("http://www.jonof.id.au/jfduke3d".into());
    jfduke3d.source_code_url = Some("https://github.com/jonof/jfduke3d".into());
    jfduke3d.supported_operating_systems = vec![OperatingSystem::Windows, OperatingSystem::MacOs];
    jfduke3d.compatible_game_version_ids =
        vec!["regular".into(), "plutonium".into(), "atomic".into()];

    let mut eduke32 = GameVersion::new("eduke32", "eDuke32", "eDuke32", "eduke32.exe", "eDuke32");
    eduke_argument_flags(&mut eduke32);
    eduke32.supports_subdirectories = true;
    eduke32.world_tour_group_supported = Some(true);
    eduke32.website = Some("https://www.eduke32.com".into());
    eduke32.source_code_url = Some("https://voidpoint.io/terminx/eduke32".into());
    eduke32.supported_operating_systems = vec![OperatingSystem::Windows];
    eduke32.compatible_game_version_ids = vec![
        "regular".into(),
        "plutonium".into(),
        "atomic".into(),
        "jfduke3d".into(),
    ];

    let mut netduke32 = GameVersion::new(
        "netduke32",
        "NetDuke32",
        "NetDuke32",
        "netduke32.exe",
        "NetDuke",
    );
    eduke_argument_flags(&mut netduke32);
    netduke32.supports_subdirectories = true;
    netduke32.world_tour_group_supported = Some(true);
    netduke32.website = Some("https://wiki.eduke32.com/wiki/NetDuke32".into());
    netduke32.source_code_url =
        Some("https://voidpoint.io/StrikerTheHedgefox/eduke32-csrefactor/-/tree/master".into());
    netduke32.supported_operating_systems = vec![OperatingSystem::Windows];
    netduke32.compatible_game_version_ids = vec![
        "regular".into(),
        "plutonium".into(),
        "atomic".into(),
        "jfduke3d".into(),
        "eduke32".into(),
    ];

    let mut raze = GameVersion::new("raze", "Raze", "Raze", "raze.exe", "Raze");
    eduke_argument_flags(&mut raze);
    raze.extra_con_file_argument_flag = None;
    raze.extra_def_file_argument_flag = None;
    raze.local_working_directory = true;
    raze.relative_con_file_path = true;
    raze.supports_subdirectories = true;
    raze.world_tour_group_supported = Some(true);
    raze.website = Some("https://raze.zdoom.org/about".into());
    raze.source_code_url = Some("https://github.com/coelckers/Raze".into());
    raze.supported_operating_systems = vec![
        OperatingSystem::Windows,
        OperatingSystem::Linux,
        OperatingSystem::MacOs,
    ];
    raze.compatible_game_version_ids =
        vec!["plutonium".into(), "atomic".into(), "jfduke3d".into()];

    let mut rednukem = GameVersion::new("rednukem", "RedNukem", "RedNukem", "rednukem.exe", "RedNukem");
    eduke_argument_flags(&mut rednukem);
    rednukem.supports_subdirectories = true;
    rednukem.world_tour_group_supported = Some(true);
    rednukem.website = Some("https://lerppu.net/wannabethesis".into());
    rednukem.source_code_url = Some("https://github.com/nukeykt/NRedneck".into());
    rednukem.supported_operating_systems = vec![OperatingSystem::Windows];
    rednukem.compatible_game_version_ids =
        vec!["plutonium".into(), "atomic".into(), "jfduke3d".into()];

    let mut belgian = GameVersion::new(
        "belgian",
        "Belgian Chocolate Duke Nukem 3D",
        "Belgian Chocolate Duke3D",
        "ChocoDuke3D.64.exe",
        "Belgian",
    );
    dos_argument_flags(&mut belgian);
    belgian.local_working_directory = true;
    belgian.relative_con_file_path = true;
    belgian.source_code_url = Some("https://github.com/GPSnoopy/BelgianChocolateDuke3D".into());
    belgian.supported_operating_systems = vec![
        OperatingSystem::Windows,
        OperatingSystem::Linux,
        OperatingSystem::MacOs,
    ];
    belgian.compatible_game_version_ids =
        vec!["regular".into(), "plutonium".into(), "atomic".into()];

    let mut duke3dw = GameVersion::new("duke3dw", "Duke3dw", "Duke3dw", "Duke3dw.exe", "Duke3dw");
    dos_argument_flags(&mut duke3dw);
    duke3dw.def_file_argument_flag = Some("/h".into());
    duke3dw.local_working_directory = true;
    duke3dw.relative_con_file_path = true;
    duke3dw.supports_subdirectories = true;
    duke3dw.website = Some("http://www.proasm.com/duke/Duke3dw.html".into());
    duke3dw.supported_operating_systems = vec![OperatingSystem::Windows];
    duke3dw.compatible_game_version_ids = vec![
        "regular".into(),
        "plutonium".into(),
        "atomic".into(),
        "jfduke3d".into(),
    ];

    let mut pkduke3d = GameVersion::new("pkduke3d", "pkDuke3D", "pkDuke3D", "pkDuke3d.exe", "pkDuke3D");
    dos_argument_flags(&mut pkduke3d);
    pkduke3d.local_working_directory = true;
    pkduke3d.relative_con_file_path = true;
    pkduke3d.supports_subdirectories = true;
    pkduke3d.website = Some("https://bitbucket.org/pogokeen/pkduke3d/downloads".into());
    pkduke3d.source_code_url = Some("https://bitbucket.org/pogokeen/pkduke3d".into());
    pkduke3d.supported_operating_systems = vec![OperatingSystem::Windows];
    pkduke3d.compatible_game_version_ids = vec![
        "regular".into(),
        "plutonium".into(),
        "atomic".into(),
        "jfduke3d".into(),
    ];
    pkduke3d.notes = vec!["Has some issues running mods, such as missing episode names.".into()];

    let mut xduke = GameVersion::new("xduke", "xDuke", "xDuke", "duke3d_w32.exe", "xDuke");
    dos_argument_flags(&mut xduke);
    xduke.local_working_directory = true;
    xduke.relative_con_file_path = true;
    xduke.website = Some("http://vision.gel.ulaval.ca/~klein/duke3d".into());
    xduke.supported_operating_systems = vec![OperatingSystem::Windows];
    xduke.compatible_game_version_ids = vec!["plutonium".into(), "atomic".into()];

    let mut rduke = GameVersion::new("rduke", "rDuke", "rDuke", "rduke_r10.exe", "rDuke");
    dos_argument_flags(&mut rduke);
    rduke.local_working_directory = true;
    rduke.relative_con_file_path = true;
    rduke.source_code_url = Some("https://github.com/radar-duker/radars-xduke-fork".into());
    rduke.supported_operating_systems = vec![OperatingSystem::Windows];
    rduke.compatible_game_version_ids = vec!["plutonium".into(), "atomic".into()];

    let mut duke3d_w32 = GameVersion::new(
        "duke3d_w32",
        "Duke3d_w32",
        "Duke3d_w32",
        "duke3d_w32.exe",
        "Duke_w32",
    );
    dos_argument_flags(&mut duke3d_w32);
    duke3d_w32.local_working_directory = true;
    duke3d_w32.relative_con_file_path = true;
    duke3d_w32.website = Some("http://www.rancidmeat.com/project.php3?id=1".into());
    duke3d_w32.supported_operating_systems = vec![OperatingSystem::Windows];
    duke3d_w32.compatible_game_version_ids = vec!["plutonium".into(), "atomic".into()];

    vec![
        lameduke, beta, regular, plutonium, atomic, jfduke3d, eduke32, netduke32, raze, rednukem,
        belgian, duke3dw, pkduke3d, xduke, rduke, duke3d_w32,
    ]
}
