//! Core catalog and registry types for the Duke Nukem 3D mod manager.
//!
//! This crate defines the data model and query layer shared by the rest of
//! the workspace:
//!
//! - [`Mod`] and its owned tree ([`ModVersion`] / [`ModVersionType`] /
//!   [`ModGameVersion`] / [`ModFile`]) plus gallery and authorship
//!   entities - the catalog entity model
//! - [`ModCollection`], [`FavouriteModCollection`],
//!   [`OrganizedModCollection`] - the owning catalog and its views
//! - [`GameVersion`] / [`GameVersionCollection`] - the engine registry and
//!   compatibility graph
//! - [`resolver`] - picking an engine that can load a selected mod
//!
//! Catalog documents round-trip through JSON and XML; both parsers are
//! total, reporting schema violations with the offending property path and
//! warning (never failing) on unknown properties.
//!
//! # Example
//!
//! ```rust
//! use d3mm_core::{GameVersionCollection, ModCollection};
//!
//! let registry = GameVersionCollection::with_defaults();
//! let catalog = ModCollection::new();
//!
//! // Every mod's engine references must resolve in the registry.
//! assert_eq!(catalog.check_game_versions(&registry), 0);
//! ```

pub mod compare;
mod envelope;
mod error;
mod favourites;
mod game_version;
mod game_version_collection;
mod json;
mod mod_collection;
mod mod_download;
mod mod_file;
mod mod_game_version;
mod mod_identifier;
mod mod_image;
mod mod_info;
mod mod_team;
mod mod_version;
mod mod_version_type;
mod mod_video;
mod organized;
pub mod resolver;
mod signal;
pub mod xml;

pub use error::*;
pub use favourites::FavouriteModCollection;
pub use game_version::{GameVersion, OperatingSystem};
pub use game_version_collection::{default_game_versions, GameVersionCollection};
pub use mod_collection::ModCollection;
pub use mod_download::{
    ModDownload, DOWNLOAD_TYPE_MOD_MANAGER_FILES, DOWNLOAD_TYPE_ORIGINAL_FILES,
};
pub use mod_file::ModFile;
pub use mod_game_version::ModGameVersion;
pub use mod_identifier::ModIdentifier;
pub use mod_image::{ModImage, ModScreenshot};
pub use mod_info::Mod;
pub use mod_team::{ModTeam, ModTeamMember};
pub use mod_version::ModVersion;
pub use mod_version_type::ModVersionType;
pub use mod_video::ModVideo;
pub use organized::{search_mods, GroupMode, ModGroup, ModMatch, OrganizedModCollection};
pub use signal::{Signal, Subscription};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        search_mods, CatalogError, FavouriteModCollection, GameVersion, GameVersionCollection,
        GroupMode, Mod, ModCollection, ModDownload, ModFile, ModGameVersion, ModIdentifier,
        ModImage, ModMatch, ModScreenshot, ModTeam, ModTeamMember, ModVersion, ModVersionType,
        ModVideo, OperatingSystem, OrganizedModCollection, ResolveError,
    };
}
