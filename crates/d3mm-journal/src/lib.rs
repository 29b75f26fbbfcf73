//! Installed-mod journal for the Duke Nukem 3D mod manager.
//!
//! When a mod's files are installed directly into a game directory, a
//! JSON sidecar named `.duke3d_mod.json` records which files existed
//! beforehand and which the install created. The launcher uses it to
//! refuse double-installs, restore originals on uninstall, and report
//! which mod is currently active.
//!
//! Readers tolerate a missing sidecar (no mod installed) but reject a
//! sidecar with the wrong `fileType` or `fileFormatVersion`.

pub mod error;
mod installed_mod_info;

pub use error::JournalError;
pub use installed_mod_info::{
    InstalledModInfo, DEFAULT_FILE_NAME, FILE_FORMAT_VERSION, FILE_TYPE,
};
