//! Contracts for the host application's external collaborators.
//!
//! The orchestrator never talks to the network, spawns processes, or
//! hashes files itself; it depends on these traits. Default
//! implementations exist where the concern is local and mechanical
//! ([`crate::Sha1FileHasher`], [`crate::NativeGroupOpener`]); HTTP and
//! process execution are always host-supplied.

use std::io;
use std::path::Path;

pub use d3mm_core::resolver::AlternativeGameVersionPrompt;

/// Runs the generated command line and blocks until the engine exits.
pub trait ProcessRunner {
    /// Returns the process exit code. The orchestrator reports the code
    /// but never interprets it.
    fn run_process(&self, command_line: &str, working_directory: &Path) -> io::Result<i32>;
}

/// Fetches a remote file to a local destination.
///
/// Local mode never invokes this.
pub trait FileDownloader {
    fn download_file(&self, url: &str, destination: &Path) -> bool;
}

/// Ensures a mod's package for one engine is present in the mod cache.
///
/// Backed by the download-manager collaborator; local mode skips it.
pub trait ModDownloadManager {
    fn download_mod_game_version(
        &self,
        mod_full_name: &str,
        mod_game_version: &d3mm_core::ModGameVersion,
    ) -> bool;
}

/// Computes the lowercase hex SHA-1 digest of a file.
pub trait FileHasher {
    fn compute_file_sha1(&self, path: &Path) -> io::Result<String>;
}

/// An opened group-style container (GRP, or zip for the engines that
/// treat zips as group files).
pub trait GroupArchive {
    /// Entry names in container order.
    fn entry_names(&self) -> Vec<String>;

    /// Index of the first entry with the given name (case-insensitive).
    fn first_entry_with_name(&self, name: &str) -> Option<usize>;

    /// Extract every entry into `destination`, returning the count.
    fn extract_all_entries(&mut self, destination: &Path) -> io::Result<usize>;

    /// Extract every entry whose extension matches (case-insensitive),
    /// returning the count.
    fn extract_all_entries_with_extension(
        &mut self,
        extension: &str,
        destination: &Path,
    ) -> io::Result<usize>;
}

/// Opens group-style containers.
pub trait GroupOpener {
    fn open_group(&self, path: &Path) -> io::Result<Box<dyn GroupArchive>>;
    fn open_zip(&self, path: &Path) -> io::Result<Box<dyn GroupArchive>>;
}
