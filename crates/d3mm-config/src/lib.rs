//! Engine configuration file handling for the Duke Nukem 3D mod manager.
//!
//! The engine's own setup file is a custom INI variant with attached
//! comment blocks, a `~` empty-value marker, hex integers, and
//! multi-string tuples. This crate parses and serializes that format
//! byte-exactly, generates the known-good default documents for v1.3D and
//! the Atomic Edition, and retargets existing documents to DOSBox-hosted
//! defaults.
//!
//! # Example
//!
//! ```rust
//! use d3mm_config::GameConfiguration;
//!
//! let mut config =
//!     GameConfiguration::generate_default("Duke Nukem 3D: Atomic Edition 1.5").unwrap();
//! config.update_for_dosbox().unwrap();
//!
//! assert_eq!(
//!     config.entry_with_name("MixRate").unwrap().value.as_integer(),
//!     Some(44000)
//! );
//! ```

mod error;
mod game_config;
mod generator;

pub use error::GameConfigError;
pub use game_config::{
    Entry, EntryValue, GameConfiguration, Section, ASSIGNMENT_CHARACTER, COMMENT_CHARACTER,
    EMPTY_VALUE_CHARACTER, SECTION_NAME_END_CHARACTER, SECTION_NAME_START_CHARACTER,
};
pub use generator::{
    ATOMIC_EDITION_GAME_NAME, ATOMIC_EDITION_SETUP_VERSION, COMM_SETUP_SECTION_NAME,
    CONTROLS_SECTION_NAME, FX_DEVICE_ENTRY_NAME, KEY_DEFINITIONS_SECTION_NAME,
    MIX_RATE_ENTRY_NAME, MUSIC_DEVICE_ENTRY_NAME, NUM_BITS_ENTRY_NAME,
    REGULAR_VERSION_GAME_NAME, REGULAR_VERSION_SETUP_VERSION, SCREEN_HEIGHT_ENTRY_NAME,
    SCREEN_MODE_ENTRY_NAME, SCREEN_SETUP_SECTION_NAME, SCREEN_WIDTH_ENTRY_NAME,
    SETUP_SECTION_NAME, SETUP_VERSION_ENTRY_NAME, SOUND_SETUP_SECTION_NAME,
};
