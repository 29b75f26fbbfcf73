//! End-to-end launch scenarios: command generation, staging cleanup,
//! no-CD patching, compatibility fallback, and the install journal.

use crate::{symlinks_supported, MockGameInstall};
use d3mm_core::resolver::AlternativeGameVersionPrompt;
use d3mm_core::{
    GameVersion, GameVersionCollection, Mod, ModDownload, ModFile, ModGameVersion, ModVersion,
    ModVersionType, DOWNLOAD_TYPE_MOD_MANAGER_FILES, DOWNLOAD_TYPE_ORIGINAL_FILES,
};
use d3mm_launch::collaborators::{FileHasher, ProcessRunner};
use d3mm_launch::{
    write_group_file, GameType, LaunchArguments, LaunchError, LaunchRequest, ModSelection,
    NativeGroupOpener, Orchestrator, Sha1FileHasher,
};
use predicates::prelude::*;
use std::cell::{Cell, RefCell};
use std::io;
use std::path::{Path, PathBuf};

// Retail Atomic Edition facts, restated from the published table.
const ATOMIC_UNCRACKED_SHA1: &str = "f0dc7f1ca810aa517fcad544a3bf5af623a3e44e";
const ATOMIC_EXECUTABLE_SIZE: usize = 1_246_231;
const ATOMIC_CRACK_BYTE_INDEX: usize = 556_947;

/// Records the command instead of spawning anything, and snapshots the
/// staged state at invocation time.
struct RecordingRunner {
    commands: RefCell<Vec<String>>,
    exit_code: i32,
    observe: Option<PathBuf>,
    staged_demo_seen: Cell<bool>,
    symlink_seen: Cell<bool>,
}

impl RecordingRunner {
    fn new() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            exit_code: 0,
            observe: None,
            staged_demo_seen: Cell::new(false),
            symlink_seen: Cell::new(false),
        }
    }

    fn observing(game_path: PathBuf) -> Self {
        Self {
            observe: Some(game_path),
            ..Self::new()
        }
    }
}

impl ProcessRunner for RecordingRunner {
    fn run_process(&self, command_line: &str, _working_directory: &Path) -> io::Result<i32> {
        self.commands.borrow_mut().push(command_line.to_string());

        if let Some(game_path) = &self.observe {
            self.staged_demo_seen.set(game_path.join("INTRO.DMO").is_file());
            self.symlink_seen.set(game_path.join("DUKE3DMODS").is_symlink());
        }

        Ok(self.exit_code)
    }
}

/// Fails every launch, simulating an engine that cannot start.
struct FailingRunner;

impl ProcessRunner for FailingRunner {
    fn run_process(&self, _command_line: &str, _working_directory: &Path) -> io::Result<i32> {
        Err(io::Error::new(io::ErrorKind::NotFound, "engine missing"))
    }
}

/// Reports a fixed digest for the game executable, standing in for the
/// non-redistributable retail binary.
struct FixedDigestHasher {
    digest: String,
}

impl FileHasher for FixedDigestHasher {
    fn compute_file_sha1(&self, _path: &Path) -> io::Result<String> {
        Ok(self.digest.clone())
    }
}

struct Decline;

impl AlternativeGameVersionPrompt for Decline {
    fn prompt<'a>(
        &self,
        _mod_full_name: &str,
        _candidates: &[(&'a GameVersion, Vec<&'a ModGameVersion>)],
    ) -> Option<(usize, usize)> {
        None
    }
}

struct PickFirst;

impl AlternativeGameVersionPrompt for PickFirst {
    fn prompt<'a>(
        &self,
        _mod_full_name: &str,
        candidates: &[(&'a GameVersion, Vec<&'a ModGameVersion>)],
    ) -> Option<(usize, usize)> {
        candidates.first().map(|_| (0, 0))
    }
}

fn registry_with_configured(install: &MockGameInstall, ids: &[&str]) -> GameVersionCollection {
    let mut registry = GameVersionCollection::with_defaults();

    for id in ids {
        let mut engine = registry.game_version_with_id(id).unwrap().clone();
        engine.game_path = install.game_path().display().to_string();
        registry.update_game_version(engine).unwrap();
    }

    registry
}

/// A single-version mod shipping EXAMPLE.GRP and GAME.CON for the Atomic
/// Edition, with its files present in the mod cache.
fn example_mod(install: &MockGameInstall) -> Mod {
    write_group_file(
        &install.atomic_mods_dir().join("EXAMPLE.GRP"),
        &[("INTRO.DMO", b"demo payload".as_slice()), ("E1L1.MAP", b"map".as_slice())],
    )
    .unwrap();
    std::fs::write(install.atomic_mods_dir().join("GAME.CON"), b"con").unwrap();

    Mod::new("example", "Example Mod", "Total Conversion")
        .with_version(ModVersion::new("").with_type(
            ModVersionType::new("").with_game_version(
                ModGameVersion::new("atomic")
                    .with_file(ModFile::new("EXAMPLE.GRP", "grp", "g1"))
                    .with_file(ModFile::new("GAME.CON", "con", "c1")),
            ),
        ))
        .with_download(ModDownload::new(
            "example_original.zip",
            DOWNLOAD_TYPE_ORIGINAL_FILES,
            "d1",
        ))
        .with_download(
            ModDownload::new("example.zip", DOWNLOAD_TYPE_MOD_MANAGER_FILES, "d2")
                .with_game_version_id("atomic"),
        )
}

fn request<'a>(
    selection: Option<ModSelection<'a>>,
    host: &'a str,
    arguments: &'a LaunchArguments,
    game_type: GameType,
) -> LaunchRequest<'a> {
    LaunchRequest {
        selection,
        host_game_version_id: host,
        arguments,
        game_type,
    }
}

// ---------------------------------------------------------------------------
// DOSBox command generation
// ---------------------------------------------------------------------------

#[test]
fn dosbox_command_mounts_the_game_directory_and_flags_the_mod() {
    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);
    let mod_entry = example_mod(&install);

    let runner = RecordingRunner::new();
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let arguments = LaunchArguments::default();
    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };
    let launch_request = request(Some(selection), "atomic", &arguments, GameType::Game);

    let host = registry.game_version_with_id("atomic").unwrap();
    let mod_game_version = &mod_entry.versions[0].types[0].game_versions[0];

    let generated = orchestrator
        .generate_command(&launch_request, host, Some(mod_game_version))
        .unwrap();

    let dosbox = install.settings.dosbox_executable_path();
    let expected_prefix = format!(
        "CALL \"{}\" -noconsole -c \"mount c {}\"",
        dosbox.display(),
        host.game_path
    );
    assert!(
        generated.command.starts_with(&expected_prefix),
        "command '{}' must start with '{expected_prefix}'",
        generated.command
    );

    assert!(
        generated
            .command
            .contains("-c \"DUKE3D.EXE /gDUKE3DMODS/Atomic/EXAMPLE.GRP /x GAME.CON\""),
        "unexpected command: {}",
        generated.command
    );

    assert!(!generated.custom_mod);
    assert_eq!(
        generated.script_arguments.value_string("GROUP").as_deref(),
        Some("EXAMPLE.GRP")
    );
    assert_eq!(
        generated.script_arguments.value_string("CON").as_deref(),
        Some("GAME.CON")
    );
}

#[test]
fn client_sessions_route_ip_and_port_through_the_script() {
    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);

    let runner = RecordingRunner::new();
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let mut arguments = LaunchArguments::default();
    arguments.ip = Some("198.51.100.7".to_string());
    arguments.port = Some(26000);

    let launch_request = request(None, "atomic", &arguments, GameType::Client);
    let host = registry.game_version_with_id("atomic").unwrap();

    let generated = orchestrator
        .generate_command(&launch_request, host, None)
        .unwrap();

    assert!(
        generated
            .command
            .contains("-c \"ipxnet connect 198.51.100.7 26000\""),
        "unexpected command: {}",
        generated.command
    );
}

// ---------------------------------------------------------------------------
// Full launches
// ---------------------------------------------------------------------------

#[test]
fn launch_stages_demos_and_cleans_up_afterwards() {
    if !symlinks_supported() {
        eprintln!("SKIPPED: symlinks not supported on this platform/configuration");
        return;
    }

    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);
    let mod_entry = example_mod(&install);
    let game_path = install.game_path();

    // A pre-existing demo recording the engine must not clobber.
    std::fs::write(game_path.join("ORIG.DMO"), b"original recording").unwrap();

    let runner = RecordingRunner::observing(game_path.clone());
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let arguments = LaunchArguments::default();
    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };

    let exit_code = orchestrator
        .run(&request(Some(selection), "atomic", &arguments, GameType::Game))
        .unwrap();

    assert_eq!(exit_code, 0);
    assert_eq!(runner.commands.borrow().len(), 1);

    // During the run, the demo from the group file and the mods symlink
    // were visible to the engine.
    assert!(runner.staged_demo_seen.get(), "INTRO.DMO must be staged during the run");
    assert!(runner.symlink_seen.get(), "mods symlink must exist during the run");

    // Afterwards the directory is back to its original state.
    assert_eq!(
        std::fs::read(game_path.join("ORIG.DMO")).unwrap(),
        b"original recording"
    );
    assert!(!game_path.join("INTRO.DMO").exists());
    assert!(!game_path.join("ORIG.DMO_").exists());
    assert!(!game_path.join("DUKE3DMODS").exists());
    assert!(!game_path.join("DUKE3DMAPS").exists());
}

#[test]
fn failed_launch_still_unstages() {
    if !symlinks_supported() {
        eprintln!("SKIPPED: symlinks not supported on this platform/configuration");
        return;
    }

    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);
    let mod_entry = example_mod(&install);
    let game_path = install.game_path();

    std::fs::write(game_path.join("ORIG.DMO"), b"original recording").unwrap();

    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &FailingRunner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let arguments = LaunchArguments::default();
    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };

    let error = orchestrator
        .run(&request(Some(selection), "atomic", &arguments, GameType::Game))
        .unwrap_err();
    assert!(matches!(error, LaunchError::Io(_)));

    assert_eq!(
        std::fs::read(game_path.join("ORIG.DMO")).unwrap(),
        b"original recording"
    );
    assert!(!game_path.join("INTRO.DMO").exists());
    assert!(!game_path.join("ORIG.DMO_").exists());
    assert!(!game_path.join("DUKE3DMODS").exists());
}

#[test]
fn default_scripts_are_seeded_into_the_data_directory() {
    use assert_fs::prelude::*;

    let temp = assert_fs::TempDir::new().unwrap();

    let mut settings = d3mm_launch::Settings::default();
    settings.data_directory_path = temp.path().to_path_buf();

    d3mm_launch::ensure_default_scripts(&settings).unwrap();

    temp.child("DOSBox/duke3d.script")
        .assert(predicate::path::exists());
    temp.child("DOSBox/duke3d_client.script")
        .assert(predicate::str::contains("ipxnet connect $IP$ $PORT$"));
    temp.child("DOSBox/duke3d_server.script")
        .assert(predicate::str::contains("ipxnet startserver $PORT$"));
}

#[test]
fn missing_mod_files_abort_before_any_staging() {
    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);
    let mod_entry = example_mod(&install);
    let game_path = install.game_path();

    // Remove a required file from the cache.
    std::fs::remove_file(install.atomic_mods_dir().join("GAME.CON")).unwrap();

    let runner = RecordingRunner::new();
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let arguments = LaunchArguments::default();
    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };

    let error = orchestrator
        .run(&request(Some(selection), "atomic", &arguments, GameType::Game))
        .unwrap_err();

    assert!(matches!(error, LaunchError::Integrity(_)));
    assert!(runner.commands.borrow().is_empty(), "engine must not run");
    assert!(!game_path.join("DUKE3DMODS").exists(), "no staging happened");
}

// ---------------------------------------------------------------------------
// No-CD patching
// ---------------------------------------------------------------------------

#[test]
fn uncracked_atomic_executable_is_patched_during_launch() {
    if !symlinks_supported() {
        eprintln!("SKIPPED: symlinks not supported on this platform/configuration");
        return;
    }

    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);
    let mod_entry = example_mod(&install);
    let game_path = install.game_path();

    // Stand-in for the retail binary: exact size, recognized digest via
    // the scripted hasher.
    let executable_path = game_path.join("DUKE3D.EXE");
    std::fs::write(&executable_path, vec![0x90u8; ATOMIC_EXECUTABLE_SIZE]).unwrap();

    let runner = RecordingRunner::new();
    let hasher = FixedDigestHasher {
        digest: ATOMIC_UNCRACKED_SHA1.to_string(),
    };
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let arguments = LaunchArguments::default();
    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };

    orchestrator
        .run(&request(Some(selection), "atomic", &arguments, GameType::Game))
        .unwrap();

    let patched = std::fs::read(&executable_path).unwrap();
    assert_eq!(patched.len(), ATOMIC_EXECUTABLE_SIZE);
    assert_eq!(patched[ATOMIC_CRACK_BYTE_INDEX], 0x2a, "no-CD byte must be set");
    assert_eq!(
        patched.iter().filter(|&&byte| byte != 0x90).count(),
        1,
        "exactly one byte differs from the original"
    );
}

// ---------------------------------------------------------------------------
// Compatibility fallback
// ---------------------------------------------------------------------------

#[test]
fn unsupported_host_falls_back_to_a_prompted_engine() {
    if !symlinks_supported() {
        eprintln!("SKIPPED: symlinks not supported on this platform/configuration");
        return;
    }

    let install = MockGameInstall::new().unwrap();
    // lameduke cannot load atomic mods; atomic itself is configured and
    // becomes the prompted alternative.
    let registry = registry_with_configured(&install, &["atomic", "lameduke"]);
    let mod_entry = example_mod(&install);

    let runner = RecordingRunner::new();
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &PickFirst,
    );

    let arguments = LaunchArguments::default();
    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };

    orchestrator
        .run(&request(Some(selection), "lameduke", &arguments, GameType::Game))
        .unwrap();

    let command = runner.commands.borrow()[0].clone();
    assert!(
        command.contains("DUKE3D.EXE"),
        "fallback engine's executable expected in '{command}'"
    );
    assert!(command.contains("/gDUKE3DMODS/Atomic/EXAMPLE.GRP"), "{command}");
}

#[test]
fn declined_fallback_prompt_cancels_the_launch() {
    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic", "lameduke"]);
    let mod_entry = example_mod(&install);

    let runner = RecordingRunner::new();
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let arguments = LaunchArguments::default();
    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };

    let error = orchestrator
        .run(&request(Some(selection), "lameduke", &arguments, GameType::Game))
        .unwrap_err();

    assert!(matches!(error, LaunchError::UserCancelled));
    assert_eq!(error.exit_code(), 5);
    assert!(runner.commands.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Install journal
// ---------------------------------------------------------------------------

#[test]
fn install_and_uninstall_round_trip_through_the_journal() {
    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);
    let mod_entry = example_mod(&install);
    let game_path = install.game_path();

    // A pre-existing file the install will shadow.
    std::fs::write(game_path.join("GAME.CON"), b"stock con").unwrap();

    let runner = RecordingRunner::new();
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    let selection = ModSelection {
        mod_entry: &mod_entry,
        version_index: 0,
        version_type_index: 0,
    };
    let atomic = registry.game_version_with_id("atomic").unwrap();
    let mod_game_version = &mod_entry.versions[0].types[0].game_versions[0];

    let journal = orchestrator
        .install_mod_files(&selection, mod_game_version, atomic)
        .unwrap();

    assert_eq!(journal.mod_files().len(), 2);
    assert_eq!(journal.original_files(), ["GAME.CON"]);
    assert!(game_path.join("EXAMPLE.GRP").is_file());
    assert_eq!(std::fs::read(game_path.join("GAME.CON")).unwrap(), b"con");

    // Double installs are refused while the journal is present.
    let error = orchestrator
        .install_mod_files(&selection, mod_game_version, atomic)
        .unwrap_err();
    assert!(matches!(error, LaunchError::Configuration(_)));

    let active = orchestrator.installed_mod_info(atomic).unwrap().unwrap();
    assert_eq!(active.full_mod_name(), "Example Mod");

    orchestrator.uninstall_mod_files(atomic).unwrap();

    assert!(!game_path.join("EXAMPLE.GRP").exists());
    assert_eq!(
        std::fs::read(game_path.join("GAME.CON")).unwrap(),
        b"stock con",
        "the original file is restored"
    );
    assert!(orchestrator.installed_mod_info(atomic).unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Hash maintenance
// ---------------------------------------------------------------------------

#[test]
fn hash_refresh_rewrites_catalog_hashes_from_disk() {
    let install = MockGameInstall::new().unwrap();
    let registry = registry_with_configured(&install, &["atomic"]);
    let mod_entry = example_mod(&install);

    let mut catalog = d3mm_core::ModCollection::new();
    catalog.add_mod(mod_entry).unwrap();

    let runner = RecordingRunner::new();
    let hasher = Sha1FileHasher::new();
    let opener = NativeGroupOpener;
    let orchestrator = Orchestrator::new(
        &install.settings,
        &registry,
        &runner,
        None,
        &hasher,
        &opener,
        &Decline,
    );

    // --hash-new: every file already carries a placeholder hash.
    let updated = orchestrator.update_file_hashes(&mut catalog, true).unwrap();
    assert_eq!(updated, 0);

    // --hash-all: both files rehash to their real digests.
    let updated = orchestrator.update_file_hashes(&mut catalog, false).unwrap();
    assert_eq!(updated, 2);

    let expected = Sha1FileHasher::new()
        .compute_file_sha1(&install.atomic_mods_dir().join("GAME.CON"))
        .unwrap();
    let refreshed = catalog.get_mod_with_id("example").unwrap();
    assert_eq!(
        refreshed.versions[0].types[0].game_versions[0].files[1].sha1,
        expected
    );
}
