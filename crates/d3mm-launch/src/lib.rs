//! Launch orchestration for the Duke Nukem 3D mod manager.
//!
//! This crate turns an abstract (mod, version, version type, engine)
//! selection into a concrete process invocation:
//!
//! - [`Orchestrator`] - validation, compatibility resolution, command
//!   generation, staging, process hand-off, and guaranteed unstaging
//! - [`ScriptArguments`] / [`Script`] - the `$TOKEN$` substitution
//!   language behind the DOSBox wrapper scripts
//! - [`NoCdCracker`] - byte-exact identification and patching of the
//!   retail executables
//! - [`GroupFile`] / [`ZipGroupArchive`] - the group-style containers
//!   demos are extracted from
//! - [`collaborators`] - the contracts the host application fulfills
//!   (process runner, downloader, hasher, prompts)
//!
//! The orchestrator is single-threaded and blocking; two runs against the
//! same game directory must not overlap.

mod arguments;
pub mod collaborators;
mod error;
mod game_type;
mod group;
mod hasher;
mod nocd;
mod orchestrator;
mod script;
pub mod staging;
mod settings;

pub use arguments::LaunchArguments;
pub use error::LaunchError;
pub use game_type::GameType;
pub use group::{write_group_file, GroupFile, NativeGroupOpener, ZipGroupArchive};
pub use hasher::Sha1FileHasher;
pub use nocd::{GameExecutableStatus, NoCdCracker};
pub use orchestrator::{GeneratedCommand, LaunchRequest, ModSelection, Orchestrator};
pub use script::{
    ensure_default_scripts, escape_unescaped_quotes, Script, ScriptArguments,
    DEFAULT_CLIENT_SCRIPT, DEFAULT_GAME_SCRIPT, DEFAULT_SERVER_SCRIPT, DEFAULT_SETUP_SCRIPT,
};
pub use settings::Settings;
