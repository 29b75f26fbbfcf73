//! Picking an engine that can load a selected mod.

use crate::error::ResolveError;
use crate::game_version::GameVersion;
use crate::game_version_collection::GameVersionCollection;
use crate::mod_game_version::ModGameVersion;
use crate::mod_info::Mod;

/// Host-supplied prompt used when the preferred engine cannot load the
/// selection. `candidates` pairs each alternative engine with the mod game
/// versions it can load; returning `None` aborts the launch.
pub trait AlternativeGameVersionPrompt {
    fn prompt<'a>(
        &self,
        mod_full_name: &str,
        candidates: &[(&'a GameVersion, Vec<&'a ModGameVersion>)],
    ) -> Option<(usize, usize)>;
}

/// The resolver's answer: indices identifying the engine in the registry
/// and the file list within the selected version type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub game_version_index: usize,
    pub mod_game_version_index: usize,
}

/// The mod game versions within `mod_game_versions` that `host` can load,
/// preserving order.
///
/// Compatibility is symmetric: either the host listing the target engine
/// or the target engine listing the host suffices.
pub fn compatible_mod_game_versions<'a>(
    registry: &GameVersionCollection,
    host: &GameVersion,
    mod_game_versions: &'a [ModGameVersion],
) -> Vec<&'a ModGameVersion> {
    mod_game_versions
        .iter()
        .filter(|mod_game_version| registry.is_compatible(host, &mod_game_version.game_version_id))
        .collect()
}

/// First mod game version the host engine can load, if any.
pub fn first_compatible_mod_game_version<'a>(
    registry: &GameVersionCollection,
    host: &GameVersion,
    mod_game_versions: &'a [ModGameVersion],
) -> Option<&'a ModGameVersion> {
    mod_game_versions
        .iter()
        .find(|mod_game_version| registry.is_compatible(host, &mod_game_version.game_version_id))
}

/// Resolve a (mod, version, type) selection against a host engine.
///
/// When the host can load one of the selection's file lists, the first
/// such list wins and the host is kept. Otherwise every *configured*
/// registered engine able to load at least one file list is offered to
/// `prompt`; the user's pick is returned, and declining maps to
/// [`ResolveError::UserCancelled`]. No state is mutated.
pub fn resolve(
    registry: &GameVersionCollection,
    mod_entry: &Mod,
    version_index: usize,
    version_type_index: usize,
    host: &GameVersion,
    prompt: &dyn AlternativeGameVersionPrompt,
) -> Result<Resolution, ResolveError> {
    let version = mod_entry.versions.get(version_index).ok_or_else(|| {
        ResolveError::InvalidSelection(format!(
            "mod '{}' has no version index {version_index}",
            mod_entry.name
        ))
    })?;

    let version_type = version.types.get(version_type_index).ok_or_else(|| {
        ResolveError::InvalidSelection(format!(
            "mod '{}' has no version type index {version_type_index}",
            mod_entry.name
        ))
    })?;

    let host_index = registry
        .index_of_game_version_with_id(&host.id)
        .ok_or_else(|| {
            ResolveError::InvalidSelection(format!("game version '{}' is not registered", host.id))
        })?;

    // Preferred path: the host engine loads the mod directly.
    if let Some(direct) = version_type
        .game_versions
        .iter()
        .position(|mod_game_version| {
            registry.is_compatible(host, &mod_game_version.game_version_id)
        })
    {
        return Ok(Resolution {
            game_version_index: host_index,
            mod_game_version_index: direct,
        });
    }

    // Fallback: configured engines able to load at least one file list.
    let candidates =
        registry.game_versions_compatible_with_mod_game_versions(&version_type.game_versions, true);

    if candidates.is_empty() {
        return Err(ResolveError::NoCompatibleGameVersion(
            mod_entry.full_name(version_index, version_type_index),
        ));
    }

    let prompt_candidates: Vec<(&GameVersion, Vec<&ModGameVersion>)> = candidates
        .iter()
        .map(|(engine, loadable)| {
            (
                *engine,
                loadable
                    .iter()
                    .map(|&index| &version_type.game_versions[index])
                    .collect(),
            )
        })
        .collect();

    let mod_full_name = mod_entry.full_name(version_index, version_type_index);

    let (candidate_index, loadable_index) = prompt
        .prompt(&mod_full_name, &prompt_candidates)
        .ok_or(ResolveError::UserCancelled)?;

    let (engine, loadable) = candidates
        .get(candidate_index)
        .ok_or(ResolveError::UserCancelled)?;

    let mod_game_version_index = *loadable.get(loadable_index).ok_or(ResolveError::UserCancelled)?;

    let game_version_index = registry
        .index_of_game_version_with_id(&engine.id)
        .expect("candidate engines come from the registry");

    Ok(Resolution {
        game_version_index,
        mod_game_version_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_download::{
        ModDownload, DOWNLOAD_TYPE_MOD_MANAGER_FILES, DOWNLOAD_TYPE_ORIGINAL_FILES,
    };
    use crate::mod_file::ModFile;
    use crate::mod_version::ModVersion;
    use crate::mod_version_type::ModVersionType;

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

    fn atomic_only_mod() -> Mod {
        Mod::new("dukedc", "Duke It Out in D.C.", "Expansion")
            .with_version(ModVersion::new("").with_type(
                ModVersionType::new("").with_game_version(
                    ModGameVersion::new("atomic")
                        .with_file(ModFile::new("DUKEDC.GRP", "grp", "a")),
                ),
            ))
            .with_download(ModDownload::new(
                "dukedc_orig.zip",
                DOWNLOAD_TYPE_ORIGINAL_FILES,
                "d1",
            ))
            .with_download(
                ModDownload::new("dukedc.zip", DOWNLOAD_TYPE_MOD_MANAGER_FILES, "d2")
                    .with_game_version_id("atomic"),
            )
    }

    /// A registry whose `atomic` entry has a configured game path.
    fn registry_with_configured_atomic(dir: &std::path::Path) -> GameVersionCollection {
        let mut registry = GameVersionCollection::with_defaults();
        let mut atomic = registry.game_version_with_id("atomic").unwrap().clone();
        atomic.game_path = dir.display().to_string();
        registry.update_game_version(atomic).unwrap();
        registry
    }

    #[test]
    fn direct_compatibility_keeps_the_host() {
        let registry = GameVersionCollection::with_defaults();
        let mod_entry = atomic_only_mod();

        // eduke32 lists atomic as compatible.
        let host = registry.game_version_with_id("eduke32").unwrap();
        let resolution = resolve(&registry, &mod_entry, 0, 0, host, &Decline).unwrap();

        assert_eq!(
            resolution.game_version_index,
            registry.index_of_game_version_with_id("eduke32").unwrap()
        );
        assert_eq!(resolution.mod_game_version_index, 0);
    }

    #[test]
    fn fallback_prompts_with_configured_engines() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_with_configured_atomic(dir.path());
        let mod_entry = atomic_only_mod();

        // lameduke cannot load atomic mods in either direction.
        let host = registry.game_version_with_id("lameduke").unwrap();
        let resolution = resolve(&registry, &mod_entry, 0, 0, host, &PickFirst).unwrap();

        assert_eq!(
            resolution.game_version_index,
            registry.index_of_game_version_with_id("atomic").unwrap()
        );
    }

    #[test]
    fn declined_prompt_is_user_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_with_configured_atomic(dir.path());
        let mod_entry = atomic_only_mod();

        let host = registry.game_version_with_id("lameduke").unwrap();
        let error = resolve(&registry, &mod_entry, 0, 0, host, &Decline).unwrap_err();

        assert!(matches!(error, ResolveError::UserCancelled));
    }

    #[test]
    fn no_configured_engine_is_an_error() {
        // Nothing configured: the candidate set is empty.
        let registry = GameVersionCollection::with_defaults();
        let mod_entry = atomic_only_mod();

        let host = registry.game_version_with_id("lameduke").unwrap();
        let error = resolve(&registry, &mod_entry, 0, 0, host, &PickFirst).unwrap_err();

        assert!(matches!(error, ResolveError::NoCompatibleGameVersion(_)));
    }

    #[test]
    fn invalid_selection_indices_are_reported() {
        let registry = GameVersionCollection::with_defaults();
        let mod_entry = atomic_only_mod();
        let host = registry.game_version_with_id("atomic").unwrap();

        assert!(matches!(
            resolve(&registry, &mod_entry, 3, 0, host, &Decline),
            Err(ResolveError::InvalidSelection(_))
        ));
        assert!(matches!(
            resolve(&registry, &mod_entry, 0, 3, host, &Decline),
            Err(ResolveError::InvalidSelection(_))
        ));
    }
}
