#[cfg(test)]
mod catalog_tests;
#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod launch_tests;

use d3mm_launch::Settings;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary game installation plus the launcher's directory layout.
///
/// ```text
/// <root>/
/// ├── game/
/// │   └── DUKE3D.EXE
/// ├── mods/
/// │   └── Atomic/
/// ├── maps/
/// ├── data/DOSBox/          (script templates)
/// └── dosbox/dosbox
/// ```
pub struct MockGameInstall {
    _temp: TempDir,
    root: PathBuf,
    pub settings: Settings,
}

impl MockGameInstall {
    pub fn new() -> std::io::Result<Self> {
        let temp = TempDir::new()?;
        let root = temp.path().to_path_buf();

        std::fs::create_dir_all(root.join("game"))?;
        std::fs::write(root.join("game/DUKE3D.EXE"), b"")?;
        std::fs::create_dir_all(root.join("mods/Atomic"))?;
        std::fs::create_dir_all(root.join("maps"))?;
        std::fs::create_dir_all(root.join("dosbox"))?;
        std::fs::write(root.join("dosbox/dosbox"), b"")?;

        let mut settings = Settings::default();
        settings.mods_directory_path = root.join("mods");
        settings.maps_directory_path = root.join("maps");
        settings.data_directory_path = root.join("data");
        settings.dosbox_directory_path = root.join("dosbox");
        settings.local_mode = true;

        d3mm_launch::ensure_default_scripts(&settings)?;

        Ok(Self {
            _temp: temp,
            root,
            settings,
        })
    }

    /// The game installation directory.
    pub fn game_path(&self) -> PathBuf {
        self.root.join("game")
    }

    /// The mod cache directory for the Atomic Edition.
    pub fn atomic_mods_dir(&self) -> PathBuf {
        self.root.join("mods/Atomic")
    }
}

/// Return the path to the `fixtures/` directory bundled with this test
/// crate.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Probe whether the current platform supports creating symlinks without
/// elevated privileges. On Windows this requires Developer Mode; on Unix
/// it is unconditionally available.
pub fn symlinks_supported() -> bool {
    let temp = match TempDir::new() {
        Ok(t) => t,
        Err(_) => return false,
    };

    let target = temp.path().join("target");
    let link = temp.path().join("link");

    if std::fs::create_dir(&target).is_err() {
        return false;
    }

    make_dir_symlink(&target, &link).is_ok()
}

#[cfg(target_os = "windows")]
fn make_dir_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(not(target_os = "windows"))]
fn make_dir_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}
