//! No-CD identification and patching for the retail DOS executables.
//!
//! Identification is by exact SHA-1 against a fixed table of known
//! builds; anything unrecognized is reported as invalid and never
//! patched. The patch itself writes a single byte at a build-specific
//! offset after verifying the exact executable size.

use crate::collaborators::FileHasher;
use crate::error::LaunchError;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::path::Path;

const REGULAR_VERSION_GAME_EXECUTABLE_SHA1: &str = "a64cc5b61cba728427cfcc537aa2f74438ea4c65";
const PLUTONIUM_PAK_GAME_EXECUTABLE_UNCRACKED_SHA1: &str =
    "772d922b16f7b0b11305f1aa7a3fcbb534f884d1";
const PLUTONIUM_PAK_GAME_EXECUTABLE_CRACKED_SHA1: &str =
    "b440dd343df1ce318a03991a056db95a43d5d30c";
const ATOMIC_EDITION_GAME_EXECUTABLE_UNCRACKED_SHA1: &str =
    "f0dc7f1ca810aa517fcad544a3bf5af623a3e44e";
const ATOMIC_EDITION_GAME_EXECUTABLE_CRACKED_SHA1: &str =
    "a849e1e00ac58c0271498dd302d5c5f2819ab2e9";

const PLUTONIUM_PAK_EXECUTABLE_SIZE: u64 = 1_240_151;
const PLUTONIUM_PAK_NO_CD_CRACK_BYTE_INDEX: usize = 553_795;
const ATOMIC_EDITION_EXECUTABLE_SIZE: u64 = 1_246_231;
const ATOMIC_EDITION_NO_CD_CRACK_BYTE_INDEX: usize = 556_947;
const NO_CD_CRACK_BYTE_VALUE: u8 = 0x2a;

/// Bitset describing what an executable file turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameExecutableStatus(u8);

impl GameExecutableStatus {
    pub const MISSING: Self = Self(0);
    pub const EXISTS: Self = Self(1);
    pub const INVALID: Self = Self(1 << 1);
    pub const REGULAR_VERSION: Self = Self(1 << 2);
    pub const PLUTONIUM_PAK: Self = Self(1 << 3);
    pub const ATOMIC_EDITION: Self = Self(1 << 4);
    pub const CRACKED: Self = Self(1 << 5);

    pub fn contains(&self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    pub fn intersects(&self, flags: Self) -> bool {
        self.0 & flags.0 != 0
    }

    pub fn is_missing(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for GameExecutableStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for GameExecutableStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for GameExecutableStatus {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Identifies and patches the known retail executables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCdCracker;

impl NoCdCracker {
    /// Classify an executable file by its SHA-1.
    pub fn game_executable_status(
        hasher: &dyn FileHasher,
        game_executable_path: &Path,
    ) -> GameExecutableStatus {
        if !game_executable_path.is_file() {
            return GameExecutableStatus::MISSING;
        }

        let sha1 = match hasher.compute_file_sha1(game_executable_path) {
            Ok(sha1) => sha1,
            Err(error) => {
                tracing::warn!(
                    "failed to hash game executable '{}': {error}",
                    game_executable_path.display()
                );
                return GameExecutableStatus::MISSING;
            }
        };

        let mut status = GameExecutableStatus::EXISTS;

        status |= match sha1.as_str() {
            PLUTONIUM_PAK_GAME_EXECUTABLE_UNCRACKED_SHA1 => GameExecutableStatus::PLUTONIUM_PAK,
            PLUTONIUM_PAK_GAME_EXECUTABLE_CRACKED_SHA1 => {
                GameExecutableStatus::PLUTONIUM_PAK | GameExecutableStatus::CRACKED
            }
            ATOMIC_EDITION_GAME_EXECUTABLE_UNCRACKED_SHA1 => GameExecutableStatus::ATOMIC_EDITION,
            ATOMIC_EDITION_GAME_EXECUTABLE_CRACKED_SHA1 => {
                GameExecutableStatus::ATOMIC_EDITION | GameExecutableStatus::CRACKED
            }
            REGULAR_VERSION_GAME_EXECUTABLE_SHA1 => GameExecutableStatus::REGULAR_VERSION,
            _ => GameExecutableStatus::INVALID,
        };

        status
    }

    pub fn is_game_executable_crackable(
        hasher: &dyn FileHasher,
        game_executable_path: &Path,
    ) -> bool {
        let status = Self::game_executable_status(hasher, game_executable_path);

        status.intersects(GameExecutableStatus::PLUTONIUM_PAK | GameExecutableStatus::ATOMIC_EDITION)
            && !status.contains(GameExecutableStatus::CRACKED)
    }

    pub fn is_game_executable_cracked(
        hasher: &dyn FileHasher,
        game_executable_path: &Path,
    ) -> bool {
        let status = Self::game_executable_status(hasher, game_executable_path);

        status.intersects(GameExecutableStatus::PLUTONIUM_PAK | GameExecutableStatus::ATOMIC_EDITION)
            && status.contains(GameExecutableStatus::CRACKED)
    }

    /// Patch an executable in place.
    pub fn crack_game_executable(
        hasher: &dyn FileHasher,
        game_executable_path: &Path,
    ) -> Result<(), LaunchError> {
        Self::crack_game_executable_to(hasher, game_executable_path, game_executable_path)
    }

    /// Patch `input` and write the result to `output`.
    ///
    /// Refuses to operate on anything but a known uncracked Plutonium Pak
    /// or Atomic Edition build of the expected size.
    pub fn crack_game_executable_to(
        hasher: &dyn FileHasher,
        input_game_executable_path: &Path,
        output_game_executable_path: &Path,
    ) -> Result<(), LaunchError> {
        let status = Self::game_executable_status(hasher, input_game_executable_path);

        if status.is_missing() {
            return Err(LaunchError::Configuration(format!(
                "game executable '{}' does not exist",
                input_game_executable_path.display()
            )));
        }

        if status.contains(GameExecutableStatus::CRACKED) {
            return Err(LaunchError::Integrity(
                "game executable is already cracked".to_string(),
            ));
        }

        let (expected_size, crack_byte_index) =
            if status.contains(GameExecutableStatus::ATOMIC_EDITION) {
                (ATOMIC_EDITION_EXECUTABLE_SIZE, ATOMIC_EDITION_NO_CD_CRACK_BYTE_INDEX)
            } else if status.contains(GameExecutableStatus::PLUTONIUM_PAK) {
                (PLUTONIUM_PAK_EXECUTABLE_SIZE, PLUTONIUM_PAK_NO_CD_CRACK_BYTE_INDEX)
            } else {
                return Err(LaunchError::Integrity(
                    "game executable is not a known Plutonium Pak or Atomic Edition build"
                        .to_string(),
                ));
            };

        let mut data = std::fs::read(input_game_executable_path)?;

        if data.len() as u64 != expected_size {
            return Err(LaunchError::Integrity(format!(
                "unexpected game executable size {} (expected {expected_size})",
                data.len()
            )));
        }

        data[crack_byte_index] = NO_CD_CRACK_BYTE_VALUE;

        std::fs::write(output_game_executable_path, data)?;

        tracing::info!(
            "applied no-CD patch: '{}'",
            output_game_executable_path.display()
        );

        Ok(())
    }
}

/// Fabricate executables with the retail layout for tests: correct size,
/// deterministic filler. The real files are not redistributable.
#[cfg(test)]
pub(crate) fn write_fake_atomic_executable(path: &Path) -> std::io::Result<String> {
    let data = vec![0x90u8; ATOMIC_EDITION_EXECUTABLE_SIZE as usize];
    std::fs::write(path, &data)?;
    Ok(crate::hasher::Sha1FileHasher::hash_bytes(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Sha1FileHasher;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    /// A hasher returning scripted digests so the status table can be
    /// exercised without the retail binaries.
    struct ScriptedHasher {
        digests: Mutex<HashMap<std::path::PathBuf, String>>,
    }

    impl ScriptedHasher {
        fn new() -> Self {
            Self {
                digests: Mutex::new(HashMap::new()),
            }
        }

        fn script(&self, path: &Path, digest: &str) {
            self.digests
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), digest.to_string());
        }
    }

    impl FileHasher for ScriptedHasher {
        fn compute_file_sha1(&self, path: &Path) -> io::Result<String> {
            self.digests
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "unscripted path"))
        }
    }

    #[test]
    fn status_flags_compose() {
        let status = GameExecutableStatus::EXISTS | GameExecutableStatus::ATOMIC_EDITION;

        assert!(status.contains(GameExecutableStatus::EXISTS));
        assert!(status.contains(GameExecutableStatus::ATOMIC_EDITION));
        assert!(!status.contains(GameExecutableStatus::CRACKED));
        assert!(status.intersects(
            GameExecutableStatus::PLUTONIUM_PAK | GameExecutableStatus::ATOMIC_EDITION
        ));
    }

    #[test]
    fn missing_file_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let status = NoCdCracker::game_executable_status(
            &Sha1FileHasher::new(),
            &dir.path().join("DUKE3D.EXE"),
        );

        assert!(status.is_missing());
    }

    #[test]
    fn table_classifies_every_known_build() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DUKE3D.EXE");
        std::fs::write(&path, b"placeholder").unwrap();

        let hasher = ScriptedHasher::new();
        let cases = [
            (
                REGULAR_VERSION_GAME_EXECUTABLE_SHA1,
                GameExecutableStatus::EXISTS | GameExecutableStatus::REGULAR_VERSION,
            ),
            (
                PLUTONIUM_PAK_GAME_EXECUTABLE_UNCRACKED_SHA1,
                GameExecutableStatus::EXISTS | GameExecutableStatus::PLUTONIUM_PAK,
            ),
            (
                PLUTONIUM_PAK_GAME_EXECUTABLE_CRACKED_SHA1,
                GameExecutableStatus::EXISTS
                    | GameExecutableStatus::PLUTONIUM_PAK
                    | GameExecutableStatus::CRACKED,
            ),
            (
                ATOMIC_EDITION_GAME_EXECUTABLE_UNCRACKED_SHA1,
                GameExecutableStatus::EXISTS | GameExecutableStatus::ATOMIC_EDITION,
            ),
            (
                ATOMIC_EDITION_GAME_EXECUTABLE_CRACKED_SHA1,
                GameExecutableStatus::EXISTS
                    | GameExecutableStatus::ATOMIC_EDITION
                    | GameExecutableStatus::CRACKED,
            ),
            (
                "0000000000000000000000000000000000000000",
                GameExecutableStatus::EXISTS | GameExecutableStatus::INVALID,
            ),
        ];

        for (digest, expected) in cases {
            hasher.script(&path, digest);
            assert_eq!(
                NoCdCracker::game_executable_status(&hasher, &path),
                expected,
                "digest {digest}"
            );
        }
    }

    #[test]
    fn crack_refuses_unknown_and_cracked_builds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DUKE3D.EXE");
        std::fs::write(&path, b"placeholder").unwrap();

        let hasher = ScriptedHasher::new();

        hasher.script(&path, "0000000000000000000000000000000000000000");
        assert!(NoCdCracker::crack_game_executable(&hasher, &path).is_err());
        assert!(!NoCdCracker::is_game_executable_crackable(&hasher, &path));

        hasher.script(&path, ATOMIC_EDITION_GAME_EXECUTABLE_CRACKED_SHA1);
        assert!(NoCdCracker::crack_game_executable(&hasher, &path).is_err());
        assert!(NoCdCracker::is_game_executable_cracked(&hasher, &path));
    }

    #[test]
    fn crack_verifies_exact_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DUKE3D.EXE");

        // Right hash (scripted), wrong size: refuse.
        std::fs::write(&path, b"tiny").unwrap();
        let hasher = ScriptedHasher::new();
        hasher.script(&path, ATOMIC_EDITION_GAME_EXECUTABLE_UNCRACKED_SHA1);

        let error = NoCdCracker::crack_game_executable(&hasher, &path).unwrap_err();
        assert!(matches!(error, LaunchError::Integrity(_)));
    }

    #[test]
    fn crack_writes_the_single_byte() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("DUKE3D.EXE");
        let output = dir.path().join("DUKE3D_CRACKED.EXE");

        write_fake_atomic_executable(&input).unwrap();

        let hasher = ScriptedHasher::new();
        hasher.script(&input, ATOMIC_EDITION_GAME_EXECUTABLE_UNCRACKED_SHA1);

        NoCdCracker::crack_game_executable_to(&hasher, &input, &output).unwrap();

        let original = std::fs::read(&input).unwrap();
        let patched = std::fs::read(&output).unwrap();

        assert_eq!(original.len(), patched.len());
        assert_eq!(patched[ATOMIC_EDITION_NO_CD_CRACK_BYTE_INDEX], NO_CD_CRACK_BYTE_VALUE);

        let differing = original
            .iter()
            .zip(&patched)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(differing, 1, "exactly one byte changes");
    }
}
