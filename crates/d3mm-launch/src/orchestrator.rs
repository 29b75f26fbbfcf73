//! The launch orchestrator: from an abstract selection to a running
//! engine and back to a clean game directory.

use crate::arguments::LaunchArguments;
use crate::collaborators::{
    AlternativeGameVersionPrompt, FileHasher, GroupOpener, ModDownloadManager, ProcessRunner,
};
use crate::error::LaunchError;
use crate::game_type::GameType;
use crate::nocd::NoCdCracker;
use crate::script::{escape_unescaped_quotes, Script, ScriptArguments};
use crate::settings::Settings;
use crate::staging;
use d3mm_core::{
    resolver, GameVersion, GameVersionCollection, Mod, ModCollection, ModGameVersion,
};
use d3mm_journal::InstalledModInfo;
use std::path::{Path, PathBuf};

/// Base game group file every engine needs.
const BASE_GAME_GROUP_FILE_NAME: &str = "DUKE3D.GRP";

/// Suffix parked originals carry while a mod occupies their name.
const ORIGINAL_FILE_BACKUP_SUFFIX: &str = "_";

/// A (mod, version, version type) pick out of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ModSelection<'a> {
    pub mod_entry: &'a Mod,
    pub version_index: usize,
    pub version_type_index: usize,
}

impl<'a> ModSelection<'a> {
    pub fn full_name(&self) -> String {
        self.mod_entry
            .full_name(self.version_index, self.version_type_index)
    }

    fn game_versions(&self) -> &'a [ModGameVersion] {
        self.mod_entry
            .versions
            .get(self.version_index)
            .and_then(|version| version.types.get(self.version_type_index))
            .map(|version_type| version_type.game_versions.as_slice())
            .unwrap_or(&[])
    }
}

/// Everything one launch needs to know.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    pub selection: Option<ModSelection<'a>>,
    pub host_game_version_id: &'a str,
    pub arguments: &'a LaunchArguments,
    pub game_type: GameType,
}

/// A fully generated invocation.
#[derive(Debug, Clone)]
pub struct GeneratedCommand {
    pub command: String,
    pub script_arguments: ScriptArguments,

    /// Explicit `-g`/`-x`/`-h` files replaced the catalog selection.
    pub custom_mod: bool,

    /// User map passed on the command line, when any.
    pub custom_map: Option<String>,
}

/// Drives validation, resolution, command generation, staging, process
/// hand-off, and unstaging.
pub struct Orchestrator<'a> {
    settings: &'a Settings,
    registry: &'a GameVersionCollection,
    process_runner: &'a dyn ProcessRunner,
    download_manager: Option<&'a dyn ModDownloadManager>,
    hasher: &'a dyn FileHasher,
    group_opener: &'a dyn GroupOpener,
    prompt: &'a dyn AlternativeGameVersionPrompt,
}

impl<'a> Orchestrator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: &'a Settings,
        registry: &'a GameVersionCollection,
        process_runner: &'a dyn ProcessRunner,
        download_manager: Option<&'a dyn ModDownloadManager>,
        hasher: &'a dyn FileHasher,
        group_opener: &'a dyn GroupOpener,
        prompt: &'a dyn AlternativeGameVersionPrompt,
    ) -> Self {
        Self {
            settings,
            registry,
            process_runner,
            download_manager,
            hasher,
            group_opener,
            prompt,
        }
    }

    /// The mod cache directory for one engine.
    pub fn mods_directory_for(&self, game_version: &GameVersion) -> PathBuf {
        self.settings
            .mods_directory_path
            .join(&game_version.mod_directory_name)
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Count (and log) the files a mod is missing on disk.
    ///
    /// Files known to live inside an eDuke32 zip container are skipped:
    /// only the container itself must exist.
    pub fn check_mod_for_missing_files(
        &self,
        mod_entry: &Mod,
        version_index: Option<usize>,
        version_type_index: Option<usize>,
    ) -> usize {
        let mut missing = 0;

        for (current_version_index, version) in mod_entry.versions.iter().enumerate() {
            if version_index.is_some_and(|wanted| wanted != current_version_index) {
                continue;
            }

            for (current_type_index, version_type) in version.types.iter().enumerate() {
                if version_type_index.is_some_and(|wanted| wanted != current_type_index) {
                    continue;
                }

                for mod_game_version in &version_type.game_versions {
                    let Some(game_version) = self
                        .registry
                        .game_version_with_id(&mod_game_version.game_version_id)
                    else {
                        tracing::warn!(
                            "skipping file check for '{}': unknown game version '{}'",
                            mod_entry.name,
                            mod_game_version.game_version_id
                        );
                        continue;
                    };

                    let mods_directory = self.mods_directory_for(game_version);

                    for file in &mod_game_version.files {
                        let file_path = mods_directory.join(&file.file_name);

                        if file_path.is_file() {
                            continue;
                        }

                        // Loose files shipped inside the zip container.
                        if mod_game_version.is_eduke32()
                            && file.file_type != "zip"
                            && file.file_type != "grp"
                        {
                            continue;
                        }

                        tracing::warn!(
                            "mod '{}' is missing {} {} file: '{}'",
                            mod_entry.full_name(current_version_index, current_type_index),
                            mod_game_version.game_version_id,
                            file.file_type,
                            file.file_name
                        );

                        missing += 1;
                    }
                }
            }
        }

        missing
    }

    fn resolve_host(&self, request: &LaunchRequest<'_>) -> Result<&'a GameVersion, LaunchError> {
        let host = match request.arguments.game_version.as_deref() {
            Some(query) => self
                .registry
                .game_version_with_id(query)
                .or_else(|| {
                    self.registry.game_versions().iter().find(|game_version| {
                        game_version.long_name.eq_ignore_ascii_case(query)
                            || game_version.short_name.eq_ignore_ascii_case(query)
                    })
                })
                .ok_or_else(|| {
                    LaunchError::Configuration(format!("unknown game version override '{query}'"))
                })?,
            None => self
                .registry
                .game_version_with_id(request.host_game_version_id)
                .ok_or_else(|| {
                    LaunchError::Configuration(format!(
                        "unknown game version '{}'",
                        request.host_game_version_id
                    ))
                })?,
        };

        if !host.is_valid() {
            return Err(LaunchError::Configuration(format!(
                "game version '{}' is not valid",
                host.id
            )));
        }

        if !host.is_configured() {
            return Err(LaunchError::Configuration(format!(
                "game version '{}' is not configured",
                host.long_name
            )));
        }

        Ok(host)
    }

    // ------------------------------------------------------------------
    // Script arguments & command generation
    // ------------------------------------------------------------------

    /// The substitution dictionary for one launch.
    pub fn build_script_arguments(
        &self,
        request: &LaunchRequest<'_>,
        host: &GameVersion,
        mod_game_version: Option<&ModGameVersion>,
    ) -> ScriptArguments {
        let mut script_arguments = ScriptArguments::new();

        if let Some(passthrough) = request.arguments.passthrough_string() {
            script_arguments.add_argument("ARGUMENTS", passthrough);
        }

        script_arguments.add_argument("GAMEPATH", &host.game_path);
        script_arguments.add_argument("DUKE3D", &host.game_executable_name);

        if let Some(setup_executable_name) = &host.setup_executable_name {
            script_arguments.add_argument("SETUP", setup_executable_name);
        }

        if let Some(flag) = &host.group_file_argument_flag {
            script_arguments.add_argument("GROUPFLAG", flag);
        }
        if let Some(flag) = &host.con_file_argument_flag {
            script_arguments.add_argument("CONFLAG", flag);
        }
        if let Some(flag) = &host.map_file_argument_flag {
            script_arguments.add_argument("MAPFLAG", flag);
        }
        if let Some(flag) = &host.def_file_argument_flag {
            script_arguments.add_argument("DEFFLAG", flag);
        }

        script_arguments.add_argument("MODSDIR", &self.settings.mods_symlink_name);
        script_arguments.add_argument("MAPSDIR", &self.settings.maps_symlink_name);

        if let Some(mod_game_version) = mod_game_version {
            if let Some(con) = mod_game_version.first_file_name_of_type("con") {
                script_arguments.add_argument("CON", con);
            }

            for group in mod_game_version.files_of_type("grp") {
                script_arguments.add_argument("GROUP", &group.file_name);
            }

            for zip in mod_game_version.files_of_type("zip") {
                script_arguments.add_argument("GROUP", &zip.file_name);
            }

            if let Some(def) = mod_game_version.first_file_name_of_type("def") {
                script_arguments.add_argument("DEF", def);
            }
        }

        match request.game_type {
            GameType::Client => {
                let ip = request
                    .arguments
                    .ip
                    .clone()
                    .unwrap_or_else(|| self.settings.dosbox_server_ip_address.clone());
                let port = request
                    .arguments
                    .port
                    .unwrap_or(self.settings.dosbox_remote_server_port);

                script_arguments.add_argument("IP", ip);
                script_arguments.add_argument("PORT", port.to_string());
            }
            GameType::Server => {
                let port = request
                    .arguments
                    .port
                    .unwrap_or(self.settings.dosbox_local_server_port);

                script_arguments.add_argument("PORT", port.to_string());
            }
            GameType::Game | GameType::Setup => {}
        }

        script_arguments
    }

    /// Build the engine invocation for a resolved selection.
    pub fn generate_command(
        &self,
        request: &LaunchRequest<'_>,
        host: &GameVersion,
        mod_game_version: Option<&ModGameVersion>,
    ) -> Result<GeneratedCommand, LaunchError> {
        if !host.is_configured() {
            return Err(LaunchError::Configuration(format!(
                "game version '{}' is not configured",
                host.long_name
            )));
        }

        if host.requires_dosbox() {
            if self.settings.dosbox_directory_path.as_os_str().is_empty() {
                return Err(LaunchError::Configuration("empty DOSBox path".to_string()));
            }

            if self.settings.data_directory_path.as_os_str().is_empty() {
                return Err(LaunchError::Configuration("empty data path".to_string()));
            }
        }

        if self.settings.mods_symlink_name.is_empty() {
            return Err(LaunchError::Configuration(
                "empty mods directory symbolic link name".to_string(),
            ));
        }

        let target_game_version = match mod_game_version {
            Some(mod_game_version) => {
                if !self
                    .registry
                    .is_compatible(host, &mod_game_version.game_version_id)
                {
                    return Err(LaunchError::Configuration(format!(
                        "game version '{}' is not compatible with '{}'",
                        host.long_name, mod_game_version.game_version_id
                    )));
                }

                self.registry
                    .game_version_with_id(&mod_game_version.game_version_id)
                    .ok_or_else(|| {
                        LaunchError::Configuration(format!(
                            "missing game configuration for '{}'",
                            mod_game_version.game_version_id
                        ))
                    })?
            }
            None => host,
        };

        let executable_name = match request.game_type {
            GameType::Setup => host.setup_executable_name.as_deref().ok_or_else(|| {
                LaunchError::Configuration(format!(
                    "game version '{}' does not have a setup executable",
                    host.long_name
                ))
            })?,
            _ => host.game_executable_name.as_str(),
        };

        let mut script_arguments = self.build_script_arguments(request, host, mod_game_version);
        let mut suffix = String::new();

        let custom_group_files = &request.arguments.group;
        let custom_mod = !custom_group_files.is_empty();

        if custom_mod {
            for group in custom_group_files {
                script_arguments.add_argument("GROUP", group);
            }

            if let Some(con) = &request.arguments.con {
                script_arguments.add_argument("CON", con);
            }
            if let Some(def) = &request.arguments.def {
                script_arguments.add_argument("DEF", def);
            }
        }

        if mod_game_version.is_some() || custom_mod {
            let mod_path = join_paths(
                &self.settings.mods_symlink_name,
                &target_game_version.mod_directory_name,
            );

            let group_flag = || {
                host.group_file_argument_flag.as_deref().ok_or_else(|| {
                    LaunchError::Configuration(format!(
                        "game version '{}' does not have a group file argument flag",
                        host.long_name
                    ))
                })
            };

            if custom_mod {
                for group in custom_group_files {
                    suffix.push(' ');
                    suffix.push_str(group_flag()?);
                    suffix.push_str(&join_paths(&mod_path, group));
                }
            } else if let Some(mod_game_version) = mod_game_version {
                for group in mod_game_version.files_of_type("grp") {
                    suffix.push(' ');
                    suffix.push_str(group_flag()?);
                    suffix.push_str(&join_paths(&mod_path, &group.file_name));
                }
            }

            // Zip containers and def files only apply to the eDuke32
            // family, or when explicit files were given.
            let eduke32_style = custom_mod
                || mod_game_version.is_some_and(ModGameVersion::is_eduke32);

            if eduke32_style {
                if !custom_mod {
                    if let Some(mod_game_version) = mod_game_version {
                        for zip in mod_game_version.files_of_type("zip") {
                            suffix.push(' ');
                            suffix.push_str(group_flag()?);
                            suffix.push_str(&join_paths(&mod_path, &zip.file_name));
                        }
                    }
                }

                let def_file_name = if custom_mod {
                    request.arguments.def.clone()
                } else {
                    mod_game_version
                        .and_then(|mod_game_version| {
                            mod_game_version.first_file_name_of_type("def")
                        })
                        .map(str::to_string)
                };

                if let Some(def_file_name) = def_file_name.filter(|name| !name.is_empty()) {
                    let def_flag = host.def_file_argument_flag.as_deref().ok_or_else(|| {
                        LaunchError::Configuration(format!(
                            "game version '{}' does not have a def file argument flag",
                            host.long_name
                        ))
                    })?;

                    suffix.push(' ');
                    suffix.push_str(def_flag);
                    suffix.push_str(&def_file_name);
                }
            }

            let con_file_name = if custom_mod {
                request.arguments.con.clone()
            } else {
                mod_game_version
                    .and_then(|mod_game_version| mod_game_version.first_file_name_of_type("con"))
                    .map(str::to_string)
            };

            if let Some(con_file_name) = con_file_name.filter(|name| !name.is_empty()) {
                let con_flag = host.con_file_argument_flag.as_deref().ok_or_else(|| {
                    LaunchError::Configuration(format!(
                        "game version '{}' does not have a con file argument flag",
                        host.long_name
                    ))
                })?;

                suffix.push(' ');
                suffix.push_str(con_flag);

                if host.relative_con_file_path {
                    suffix.push_str(&con_file_name);
                } else {
                    suffix.push_str(&join_paths(&mod_path, &con_file_name));
                }
            }
        }

        let mut custom_map = None;

        if let Some(user_map) = request.arguments.map.as_deref().filter(|map| !map.is_empty()) {
            if self.settings.maps_symlink_name.is_empty() {
                return Err(LaunchError::Configuration(
                    "maps directory symbolic link name is empty".to_string(),
                ));
            }

            let map_flag = host.map_file_argument_flag.as_deref().ok_or_else(|| {
                LaunchError::Configuration(format!(
                    "game version '{}' does not have a map file argument flag",
                    host.long_name
                ))
            })?;

            script_arguments.add_argument("MAP", user_map);
            custom_map = Some(user_map.to_string());

            suffix.push(' ');
            suffix.push_str(map_flag);

            // Prefer a map sitting in the game directory; fall back to
            // the maps directory through its symlink.
            if Path::new(&host.game_path).join(user_map).is_file() {
                suffix.push_str(user_map);
            } else if self.settings.maps_directory_path.join(user_map).is_file() {
                suffix.push_str(&join_paths(&self.settings.maps_symlink_name, user_map));
            } else {
                tracing::warn!("map '{user_map}' does not exist in game or maps directories");
                suffix.push_str(user_map);
            }
        }

        if let Some(passthrough) = request.arguments.passthrough_string() {
            suffix.push(' ');
            suffix.push_str(&passthrough);
        }

        let command = if host.requires_dosbox() {
            script_arguments.add_argument("COMMAND", format!("{executable_name}{suffix}"));

            let script_file_name = match request.game_type {
                GameType::Game => &self.settings.dosbox_game_script_file_name,
                GameType::Setup => &self.settings.dosbox_setup_script_file_name,
                GameType::Client => &self.settings.dosbox_client_script_file_name,
                GameType::Server => &self.settings.dosbox_server_script_file_name,
            };

            let script_path = self.settings.dosbox_data_directory_path().join(script_file_name);
            let script = Script::load_from(&script_path).map_err(|error| {
                LaunchError::Configuration(format!(
                    "failed to load DOSBox script file '{}': {error}",
                    script_path.display()
                ))
            })?;

            generate_dosbox_command(
                &script,
                &script_arguments,
                &self.settings.dosbox_executable_path(),
                &self.settings.dosbox_arguments,
            )
        } else {
            format!(
                "\"{}\"{suffix}",
                join_paths(&host.game_path, executable_name)
            )
        };

        Ok(GeneratedCommand {
            command,
            script_arguments,
            custom_mod,
            custom_map,
        })
    }

    // ------------------------------------------------------------------
    // The launch itself
    // ------------------------------------------------------------------

    /// Run a launch end to end. Returns the engine's exit code, which is
    /// reported but never interpreted; unstaging runs on every exit path.
    pub fn run(&self, request: &LaunchRequest<'_>) -> Result<i32, LaunchError> {
        let host = self.resolve_host(request)?;

        let mut selected_game_version = host;
        let mut selected_mod_game_version: Option<&ModGameVersion> = None;

        if let Some(selection) = &request.selection {
            let missing =
                self.check_mod_for_missing_files(
                    selection.mod_entry,
                    Some(selection.version_index),
                    Some(selection.version_type_index),
                );

            if missing != 0 {
                return Err(LaunchError::Integrity(format!(
                    "mod '{}' is missing {missing} file(s)",
                    selection.full_name()
                )));
            }

            let resolution = resolver::resolve(
                self.registry,
                selection.mod_entry,
                selection.version_index,
                selection.version_type_index,
                host,
                self.prompt,
            )?;

            selected_game_version = self
                .registry
                .game_version(resolution.game_version_index)
                .expect("resolver returns registry indices");
            selected_mod_game_version =
                selection.game_versions().get(resolution.mod_game_version_index);

            if !std::ptr::eq(selected_game_version, host) {
                tracing::info!(
                    "using game version '{}' since '{}' does not support '{}'",
                    selected_game_version.long_name,
                    host.long_name,
                    selection.full_name()
                );
            }

            if !selected_game_version.is_configured() {
                return Err(LaunchError::Configuration(format!(
                    "game version '{}' is not configured",
                    selected_game_version.long_name
                )));
            }
        }

        if !self.settings.local_mode {
            if let (Some(download_manager), Some(mod_game_version), Some(selection)) = (
                self.download_manager,
                selected_mod_game_version,
                &request.selection,
            ) {
                if !download_manager
                    .download_mod_game_version(&selection.full_name(), mod_game_version)
                {
                    return Err(LaunchError::Configuration(format!(
                        "failed to download mod '{}'",
                        selection.full_name()
                    )));
                }
            }
        }

        let generated =
            self.generate_command(request, selected_game_version, selected_mod_game_version)?;

        // ---- stage ----

        staging::create_symlinks(self.settings, selected_game_version)?;

        let mut guard = staging::StagingGuard::new(self.settings, selected_game_version, false);
        let game_path = PathBuf::from(&selected_game_version.game_path);

        if request.selection.is_some() {
            staging::rename_files_with_extension(
                &game_path,
                staging::DEMO_FILE_EXTENSION,
                staging::DEMO_SHADOW_FILE_EXTENSION,
            )?;
            guard.enable_demo_shuffle();

            if let Some(mod_game_version) = selected_mod_game_version {
                self.extract_demos(mod_game_version, &game_path)?;
            }
        }

        self.apply_no_cd_patch_if_needed(selected_game_version)?;
        self.check_group_file_install(selected_game_version)?;

        // ---- invoke ----

        let working_directory = if selected_game_version.local_working_directory {
            game_path.clone()
        } else {
            std::env::current_dir()?
        };

        tracing::debug!("executing command: {}", generated.command);

        let exit_code = self
            .process_runner
            .run_process(&generated.command, &working_directory)?;

        if exit_code != 0 {
            tracing::warn!("engine exited with code {exit_code}");
        }

        // ---- unstage (also runs on every early return above the guard) ----

        drop(guard);

        Ok(exit_code)
    }

    fn extract_demos(
        &self,
        mod_game_version: &ModGameVersion,
        game_path: &Path,
    ) -> Result<(), LaunchError> {
        let Some(target_game_version) = self
            .registry
            .game_version_with_id(&mod_game_version.game_version_id)
        else {
            return Ok(());
        };

        let mods_directory = self.mods_directory_for(target_game_version);

        for group_file in mod_game_version.files_of_type("grp") {
            let group_path = mods_directory.join(&group_file.file_name);

            let mut group = self.group_opener.open_group(&group_path).map_err(|error| {
                LaunchError::Staging(format!(
                    "failed to open group file '{}': {error}",
                    group_path.display()
                ))
            })?;

            let extracted = group
                .extract_all_entries_with_extension(staging::DEMO_FILE_EXTENSION, game_path)
                .map_err(|error| {
                    LaunchError::Staging(format!(
                        "failed to extract demos from '{}': {error}",
                        group_path.display()
                    ))
                })?;

            tracing::debug!(
                "extracted {extracted} demo(s) from group file '{}' to '{}'",
                group_path.display(),
                game_path.display()
            );
        }

        Ok(())
    }

    fn apply_no_cd_patch_if_needed(
        &self,
        game_version: &GameVersion,
    ) -> Result<(), LaunchError> {
        if !game_version.id.eq_ignore_ascii_case("atomic") {
            return Ok(());
        }

        let executable_path =
            Path::new(&game_version.game_path).join(&game_version.game_executable_name);

        if NoCdCracker::is_game_executable_crackable(self.hasher, &executable_path) {
            NoCdCracker::crack_game_executable(self.hasher, &executable_path)?;
        }

        Ok(())
    }

    fn check_group_file_install(&self, game_version: &GameVersion) -> Result<(), LaunchError> {
        let Some(install_path) = &game_version.group_file_install_path else {
            return Ok(());
        };

        let group_path = Path::new(&game_version.game_path)
            .join(install_path)
            .join(BASE_GAME_GROUP_FILE_NAME);

        if !group_path.is_file() {
            return Err(LaunchError::Configuration(format!(
                "base game group file is missing at '{}'; run the game installer first",
                group_path.display()
            )));
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Mod install / uninstall (journal-backed)
    // ------------------------------------------------------------------

    /// Copy a mod's files into the game directory and record the install
    /// in the journal sidecar. A directory already holding an installed
    /// mod is refused; uninstall it first.
    pub fn install_mod_files(
        &self,
        selection: &ModSelection<'_>,
        mod_game_version: &ModGameVersion,
        game_version: &GameVersion,
    ) -> Result<InstalledModInfo, LaunchError> {
        let game_path = PathBuf::from(&game_version.game_path);

        if let Some(existing) = InstalledModInfo::load_from_game_directory(&game_path)? {
            return Err(LaunchError::Configuration(format!(
                "'{}' is already installed in '{}'; uninstall it first",
                existing.full_mod_name(),
                game_path.display()
            )));
        }

        let mods_directory = self.mods_directory_for(
            self.registry
                .game_version_with_id(&mod_game_version.game_version_id)
                .unwrap_or(game_version),
        );

        let version = selection
            .mod_entry
            .versions
            .get(selection.version_index)
            .map(|version| version.version.clone())
            .unwrap_or_default();

        let mut journal = InstalledModInfo::new(
            selection.mod_entry.id.as_str(),
            selection.mod_entry.name.as_str(),
            version,
            chrono::Utc::now(),
        );

        for file in &mod_game_version.files {
            let source = mods_directory.join(&file.file_name);
            let destination = game_path.join(&file.file_name);

            if destination.exists() {
                let backup = game_path.join(format!(
                    "{}{ORIGINAL_FILE_BACKUP_SUFFIX}",
                    file.file_name
                ));
                std::fs::rename(&destination, &backup).map_err(|error| {
                    LaunchError::Staging(format!(
                        "failed to park original '{}': {error}",
                        destination.display()
                    ))
                })?;
                journal.add_original_file(&file.file_name);
            }

            std::fs::copy(&source, &destination).map_err(|error| {
                LaunchError::Staging(format!(
                    "failed to install '{}': {error}",
                    source.display()
                ))
            })?;
            journal.add_mod_file(&file.file_name);
        }

        journal.save_to_game_directory(&game_path)?;

        Ok(journal)
    }

    /// Undo [`Orchestrator::install_mod_files`]: delete the installed
    /// files, restore parked originals, and remove the journal.
    pub fn uninstall_mod_files(&self, game_version: &GameVersion) -> Result<(), LaunchError> {
        let game_path = PathBuf::from(&game_version.game_path);

        let Some(journal) = InstalledModInfo::load_from_game_directory(&game_path)? else {
            return Err(LaunchError::Configuration(format!(
                "no mod is installed in '{}'",
                game_path.display()
            )));
        };

        for file_name in journal.mod_files() {
            let path = game_path.join(file_name);

            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }

        for file_name in journal.original_files() {
            let backup = game_path.join(format!("{file_name}{ORIGINAL_FILE_BACKUP_SUFFIX}"));
            let destination = game_path.join(file_name);

            if backup.exists() {
                std::fs::rename(&backup, &destination)?;
            } else {
                tracing::warn!("parked original '{}' is missing", backup.display());
            }
        }

        InstalledModInfo::remove_from_game_directory(&game_path)?;

        Ok(())
    }

    /// The journal of the mod currently occupying a game directory.
    pub fn installed_mod_info(
        &self,
        game_version: &GameVersion,
    ) -> Result<Option<InstalledModInfo>, LaunchError> {
        Ok(InstalledModInfo::load_from_game_directory(Path::new(
            &game_version.game_path,
        ))?)
    }

    // ------------------------------------------------------------------
    // Hash maintenance
    // ------------------------------------------------------------------

    /// Recompute mod file hashes from the cache on disk.
    ///
    /// With `only_new`, files that already carry a hash are skipped
    /// (`--hash-new`); otherwise every present file is rehashed
    /// (`--hash-all`). Returns the number of hashes written.
    pub fn update_file_hashes(
        &self,
        catalog: &mut ModCollection,
        only_new: bool,
    ) -> Result<usize, LaunchError> {
        let mut updated = 0;

        let registry = self.registry;
        let settings = self.settings;
        let hasher = self.hasher;

        catalog
            .update_mods(|mods| {
                for mod_entry in mods.iter_mut() {
                    for version in &mut mod_entry.versions {
                        for version_type in &mut version.types {
                            for mod_game_version in &mut version_type.game_versions {
                                let Some(game_version) = registry
                                    .game_version_with_id(&mod_game_version.game_version_id)
                                else {
                                    continue;
                                };

                                let mods_directory = settings
                                    .mods_directory_path
                                    .join(&game_version.mod_directory_name);

                                for file in &mut mod_game_version.files {
                                    if only_new && !file.sha1.is_empty() {
                                        continue;
                                    }

                                    let path = mods_directory.join(&file.file_name);

                                    if !path.is_file() {
                                        continue;
                                    }

                                    match hasher.compute_file_sha1(&path) {
                                        Ok(sha1) => {
                                            if file.sha1 != sha1 {
                                                file.sha1 = sha1;
                                            }
                                            updated += 1;
                                        }
                                        Err(error) => {
                                            tracing::warn!(
                                                "failed to hash '{}': {error}",
                                                path.display()
                                            );
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            })
            .map_err(|error| LaunchError::Integrity(error.to_string()))?;

        Ok(updated)
    }
}

/// Join path segments with forward slashes, the way every supported
/// engine and DOSBox accept them.
fn join_paths(base: &str, tail: &str) -> String {
    let base = base.trim_end_matches(['/', '\\']);

    if base.is_empty() {
        tail.to_string()
    } else {
        format!("{base}/{tail}")
    }
}

/// Render the `CALL "<dosbox>" <args>` wrapper with one `-c "<line>"` per
/// non-empty substituted script line.
fn generate_dosbox_command(
    script: &Script,
    script_arguments: &ScriptArguments,
    dosbox_path: &Path,
    dosbox_arguments: &str,
) -> String {
    let mut command = format!("CALL \"{}\" {dosbox_arguments}", dosbox_path.display());

    for line in script.lines() {
        let substituted = script_arguments.apply(line);
        let escaped = escape_unescaped_quotes(&substituted);

        if !escaped.is_empty() {
            command.push_str(" -c \"");
            command.push_str(&escaped);
            command.push('"');
        }
    }

    command.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_paths_inserts_a_single_separator() {
        assert_eq!(join_paths("DUKE3DMODS", "Atomic"), "DUKE3DMODS/Atomic");
        assert_eq!(join_paths("DUKE3DMODS/", "Atomic"), "DUKE3DMODS/Atomic");
        assert_eq!(join_paths("", "Atomic"), "Atomic");
    }

    #[test]
    fn dosbox_command_skips_empty_lines() {
        let script = Script::parse("mount c $GAMEPATH$\n\n$COMMAND$\nexit\n");

        let mut script_arguments = ScriptArguments::new();
        script_arguments.add_argument("GAMEPATH", "/games/duke3d");
        script_arguments.add_argument("COMMAND", "DUKE3D.EXE /gX.GRP");

        let command = generate_dosbox_command(
            &script,
            &script_arguments,
            Path::new("/opt/dosbox/dosbox"),
            "-noconsole",
        );

        assert_eq!(
            command,
            "CALL \"/opt/dosbox/dosbox\" -noconsole -c \"mount c /games/duke3d\" \
             -c \"DUKE3D.EXE /gX.GRP\" -c \"exit\""
        );
    }

    #[test]
    fn dosbox_command_escapes_quotes_inside_lines() {
        let script = Script::parse("mount c \"$GAMEPATH$\"\n");

        let mut script_arguments = ScriptArguments::new();
        script_arguments.add_argument("GAMEPATH", "/games/duke nukem");

        let command = generate_dosbox_command(
            &script,
            &script_arguments,
            Path::new("dosbox"),
            "",
        );

        assert!(command.contains(r#"-c "mount c \"/games/duke nukem\"""#), "{command}");
    }
}
