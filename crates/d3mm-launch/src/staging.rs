//! Working-directory staging: symlinks and demo-file shuffling.
//!
//! The mods and maps trees are exposed to the engine through two
//! directory symlinks inside the game directory, and any `*.DMO` demo
//! files the engine might overwrite are shadowed to `*.DMO_` for the
//! duration of a launch. Every staged change is bounded by a single
//! launch: [`StagingGuard`] unwinds on drop, on every exit path.

use crate::error::LaunchError;
use crate::settings::Settings;
use d3mm_core::GameVersion;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of demo recordings inside a game directory.
pub const DEMO_FILE_EXTENSION: &str = "DMO";

/// Extension demo shadows are parked under during a launch.
pub const DEMO_SHADOW_FILE_EXTENSION: &str = "DMO_";

/// Create one directory symlink, replacing a stale symlink of the same
/// name. A non-symlink occupying the name is never touched.
pub fn create_symlink(
    target: &Path,
    link_name: &str,
    destination_directory: &Path,
) -> Result<(), LaunchError> {
    if link_name.is_empty() {
        return Err(LaunchError::Configuration(
            "symlink name must not be empty".to_string(),
        ));
    }

    if !target.is_dir() {
        return Err(LaunchError::Staging(format!(
            "symlink target '{}' is not a directory",
            target.display()
        )));
    }

    let link_path = destination_directory.join(link_name);

    if link_path.symlink_metadata().is_ok() {
        if !link_path.is_symlink() {
            return Err(LaunchError::Staging(format!(
                "refusing to replace non-symlink '{}'",
                link_path.display()
            )));
        }

        tracing::debug!("removing existing symlink '{}'", link_path.display());
        remove_link(&link_path)?;
    }

    tracing::debug!(
        "creating symlink '{}' -> '{}'",
        link_path.display(),
        target.display()
    );

    make_directory_symlink(target, &link_path).map_err(|error| {
        LaunchError::Staging(format!(
            "failed to create symlink '{}': {error}",
            link_path.display()
        ))
    })
}

/// Remove a previously created symlink. Absent links are fine; a
/// non-symlink occupying the name is an error.
pub fn remove_symlink(
    link_name: &str,
    destination_directory: &Path,
) -> Result<(), LaunchError> {
    if link_name.is_empty() {
        return Err(LaunchError::Configuration(
            "symlink name must not be empty".to_string(),
        ));
    }

    let link_path = destination_directory.join(link_name);

    if link_path.symlink_metadata().is_err() {
        return Ok(());
    }

    if !link_path.is_symlink() {
        return Err(LaunchError::Staging(format!(
            "refusing to remove non-symlink '{}'",
            link_path.display()
        )));
    }

    remove_link(&link_path)
}

fn remove_link(link_path: &Path) -> Result<(), LaunchError> {
    std::fs::remove_file(link_path).map_err(|error| {
        LaunchError::Staging(format!(
            "failed to remove symlink '{}': {error}",
            link_path.display()
        ))
    })
}

#[cfg(unix)]
fn make_directory_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_directory_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Create the mods and maps symlinks inside the game directory, unwinding
/// the mods link if the maps link fails.
pub fn create_symlinks(
    settings: &Settings,
    game_version: &GameVersion,
) -> Result<(), LaunchError> {
    let game_path = PathBuf::from(&game_version.game_path);

    create_symlink(
        &settings.mods_directory_path,
        &settings.mods_symlink_name,
        &game_path,
    )?;

    if !settings.maps_symlink_name.is_empty() && settings.maps_directory_path.is_dir() {
        if let Err(error) = create_symlink(
            &settings.maps_directory_path,
            &settings.maps_symlink_name,
            &game_path,
        ) {
            let _ = remove_symlink(&settings.mods_symlink_name, &game_path);
            return Err(error);
        }
    }

    Ok(())
}

/// Remove the mods and maps symlinks from the game directory.
pub fn remove_symlinks(
    settings: &Settings,
    game_version: &GameVersion,
) -> Result<(), LaunchError> {
    let game_path = PathBuf::from(&game_version.game_path);

    let mods = remove_symlink(&settings.mods_symlink_name, &game_path);
    let maps = if settings.maps_symlink_name.is_empty() {
        Ok(())
    } else {
        remove_symlink(&settings.maps_symlink_name, &game_path)
    };

    mods.and(maps)
}

fn files_with_extension(directory: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|found| found.to_str())
                .map(|found| found.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Rename every `*.{from}` file at the top of `directory` to `*.{to}`.
/// Returns the number of files renamed.
pub fn rename_files_with_extension(
    directory: &Path,
    from: &str,
    to: &str,
) -> Result<usize, LaunchError> {
    let mut renamed = 0;

    for path in files_with_extension(directory, from) {
        let target = path.with_extension(to);

        std::fs::rename(&path, &target).map_err(|error| {
            LaunchError::Staging(format!(
                "failed to rename '{}' to '{}': {error}",
                path.display(),
                target.display()
            ))
        })?;

        renamed += 1;
    }

    if renamed != 0 {
        tracing::debug!("renamed {renamed} *.{from} file(s) to *.{to} in '{}'", directory.display());
    }

    Ok(renamed)
}

/// Delete every `*.{extension}` file at the top of `directory`. Returns
/// the number of files deleted.
pub fn delete_files_with_extension(
    directory: &Path,
    extension: &str,
) -> Result<usize, LaunchError> {
    let mut deleted = 0;

    for path in files_with_extension(directory, extension) {
        std::fs::remove_file(&path).map_err(|error| {
            LaunchError::Staging(format!("failed to delete '{}': {error}", path.display()))
        })?;

        deleted += 1;
    }

    Ok(deleted)
}

/// Unwinds staged state when dropped: deletes freshly produced demos,
/// restores the shadowed originals, and removes both symlinks.
///
/// Hold one across the engine run; it fires on success, engine crash, and
/// orchestrator error alike. Unwind failures are logged, not raised - a
/// drop cannot fail usefully.
pub struct StagingGuard<'a> {
    settings: &'a Settings,
    game_version: &'a GameVersion,
    shuffle_demos: bool,
}

impl<'a> StagingGuard<'a> {
    pub fn new(settings: &'a Settings, game_version: &'a GameVersion, shuffle_demos: bool) -> Self {
        Self {
            settings,
            game_version,
            shuffle_demos,
        }
    }

    /// Arm the demo-shuffle unwind. Called once the `*.DMO` -> `*.DMO_`
    /// renames have all succeeded; before that point deleting `*.DMO`
    /// files would destroy originals.
    pub fn enable_demo_shuffle(&mut self) {
        self.shuffle_demos = true;
    }

    fn unstage(&self) {
        let game_path = PathBuf::from(&self.game_version.game_path);

        if self.shuffle_demos {
            if let Err(error) =
                delete_files_with_extension(&game_path, DEMO_FILE_EXTENSION)
            {
                tracing::warn!("failed to delete staged demo files: {error}");
            }

            if let Err(error) = rename_files_with_extension(
                &game_path,
                DEMO_SHADOW_FILE_EXTENSION,
                DEMO_FILE_EXTENSION,
            ) {
                tracing::warn!("failed to restore shadowed demo files: {error}");
            }
        }

        if let Err(error) = remove_symlinks(self.settings, self.game_version) {
            tracing::warn!("failed to remove symlinks: {error}");
        }
    }
}

impl Drop for StagingGuard<'_> {
    fn drop(&mut self) {
        self.unstage();
    }
}
