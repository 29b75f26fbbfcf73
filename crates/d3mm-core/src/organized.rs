//! Grouped, searchable views over the catalog.
//!
//! `OrganizedModCollection` never owns mods or game versions; it carries
//! group names and indices into the underlying collections and is rebuilt
//! whenever they report a change.

use crate::compare::{
    cmp_ignore_case, contains_ignore_case, eq_ignore_case, starts_with_ignore_case,
};
use crate::game_version_collection::GameVersionCollection;
use crate::mod_collection::ModCollection;
use crate::mod_info::Mod;
use crate::mod_version::ModVersion;
use crate::mod_version_type::ModVersionType;
use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;

/// How mods are grouped in the organized view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    #[default]
    GameVersion,
    Team,
    Author,
}

/// One group: a display name plus the catalog indices of its members.
#[derive(Debug, Clone, PartialEq)]
pub struct ModGroup {
    pub name: String,
    pub mod_indices: Vec<usize>,
}

/// A fully resolved search hit: the mod plus the version and type the
/// query selected (falling back to the mod's preferred version and default
/// type for mod-level hits).
#[derive(Debug, Clone, Copy)]
pub struct ModMatch<'a> {
    pub mod_entry: &'a Mod,
    pub version: &'a ModVersion,
    pub version_type: &'a ModVersionType,
    pub mod_index: usize,
    pub version_index: usize,
    pub version_type_index: usize,
}

impl<'a> ModMatch<'a> {
    fn resolve(
        catalog: &'a ModCollection,
        mod_index: usize,
        version_index: usize,
        version_type_index: usize,
    ) -> Option<Self> {
        let mod_entry = catalog.get_mod(mod_index)?;
        let version = mod_entry.versions.get(version_index)?;
        let version_type = version.types.get(version_type_index)?;

        Some(Self {
            mod_entry,
            version,
            version_type,
            mod_index,
            version_index,
            version_type_index,
        })
    }

    /// Mod-level hit: resolve through the preferred version and default
    /// type.
    fn resolve_mod_level(catalog: &'a ModCollection, mod_index: usize) -> Option<Self> {
        let mod_entry = catalog.get_mod(mod_index)?;
        let version_index = mod_entry.preferred_version_index();
        let version_type_index = mod_entry.default_version_type_index(version_index);

        Self::resolve(catalog, mod_index, version_index, version_type_index)
    }

    pub fn full_name(&self) -> String {
        self.mod_entry.full_name(self.version_index, self.version_type_index)
    }
}

/// Non-owning grouped view over the catalog.
#[derive(Debug, Default)]
pub struct OrganizedModCollection {
    mode: GroupMode,
    groups: Vec<ModGroup>,
    selected_group: Option<usize>,
    selected_mod: Option<usize>,
    stale: Rc<Cell<bool>>,
}

impl OrganizedModCollection {
    pub fn new(mode: GroupMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// A shared flag the owning collections' `updated` signals should set;
    /// the next [`OrganizedModCollection::rebuild`] clears it.
    ///
    /// ```ignore
    /// let stale = view.stale_flag();
    /// catalog.updated.subscribe(move || stale.set(true));
    /// ```
    pub fn stale_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.stale)
    }

    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GroupMode) {
        if self.mode != mode {
            self.mode = mode;
            self.stale.set(true);
        }
    }

    pub fn groups(&self) -> &[ModGroup] {
        &self.groups
    }

    pub fn group_with_name(&self, name: &str) -> Option<&ModGroup> {
        self.groups.iter().find(|group| eq_ignore_case(&group.name, name))
    }

    pub fn selected_group(&self) -> Option<&ModGroup> {
        self.selected_group.and_then(|index| self.groups.get(index))
    }

    pub fn select_group(&mut self, name: &str) -> bool {
        match self.groups.iter().position(|group| eq_ignore_case(&group.name, name)) {
            Some(index) => {
                self.selected_group = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_group_selection(&mut self) {
        self.selected_group = None;
    }

    pub fn selected_mod_index(&self) -> Option<usize> {
        self.selected_mod
    }

    pub fn select_mod_index(&mut self, index: usize) {
        self.selected_mod = Some(index);
    }

    pub fn clear_mod_selection(&mut self) {
        self.selected_mod = None;
    }

    /// Rebuild the group index from the underlying collections and clear
    /// the stale flag. Group and selection indices are invalidated.
    pub fn rebuild(&mut self, catalog: &ModCollection, registry: &GameVersionCollection) {
        self.groups = match self.mode {
            GroupMode::GameVersion => Self::group_by_game_version(catalog, registry),
            GroupMode::Team => Self::group_by_team(catalog),
            GroupMode::Author => Self::group_by_author(catalog),
        };

        self.selected_group = None;
        self.selected_mod = None;
        self.stale.set(false);
    }

    fn group_by_game_version(
        catalog: &ModCollection,
        registry: &GameVersionCollection,
    ) -> Vec<ModGroup> {
        let mut groups: Vec<ModGroup> = registry
            .game_versions()
            .iter()
            .map(|game_version| {
                let mod_indices = catalog
                    .mods()
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| {
                        entry.versions.iter().any(|version| {
                            version.types.iter().any(|version_type| {
                                version_type
                                    .game_version_with_id(&game_version.id)
                                    .is_some()
                            })
                        })
                    })
                    .map(|(index, _)| index)
                    .collect();

                ModGroup {
                    name: game_version.long_name.clone(),
                    mod_indices,
                }
            })
            .collect();

        groups.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        groups
    }

    fn group_by_team(catalog: &ModCollection) -> Vec<ModGroup> {
        let mut groups: Vec<ModGroup> = Vec::new();

        for (index, entry) in catalog.mods().iter().enumerate() {
            let Some(team) = &entry.team else {
                continue;
            };

            if team.name.is_empty() {
                continue;
            }

            match groups
                .iter_mut()
                .find(|group| eq_ignore_case(&group.name, &team.name))
            {
                Some(group) => group.mod_indices.push(index),
                None => groups.push(ModGroup {
                    name: team.name.clone(),
                    mod_indices: vec![index],
                }),
            }
        }

        groups.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        groups
    }

    fn group_by_author(catalog: &ModCollection) -> Vec<ModGroup> {
        let mut groups: Vec<ModGroup> = Vec::new();

        for (index, entry) in catalog.mods().iter().enumerate() {
            let Some(team) = &entry.team else {
                continue;
            };

            for member in &team.members {
                match groups
                    .iter_mut()
                    .find(|group| eq_ignore_case(&group.name, &member.name))
                {
                    Some(group) => {
                        if !group.mod_indices.contains(&index) {
                            group.mod_indices.push(index);
                        }
                    }
                    None => groups.push(ModGroup {
                        name: member.name.clone(),
                        mod_indices: vec![index],
                    }),
                }
            }
        }

        groups.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        groups
    }

    /// Draw a uniformly random mod index, restricted to the selected group
    /// when one is active.
    pub fn random_mod_index(&self, catalog: &ModCollection) -> Option<usize> {
        let mut rng = rand::rng();

        match self.selected_group() {
            Some(group) => {
                if group.mod_indices.is_empty() {
                    return None;
                }
                Some(group.mod_indices[rng.random_range(0..group.mod_indices.len())])
            }
            None => {
                if catalog.is_empty() {
                    return None;
                }
                Some(rng.random_range(0..catalog.len()))
            }
        }
    }
}

// ----------------------------------------------------------------------
// Search
// ----------------------------------------------------------------------

/// Search the catalog with the precedence ladder: an exact whole-string
/// match wins outright, then prefix matches, then substring matches. Hits
/// on a version or type are only reported when the enclosing mod or
/// version name itself did not match, so the most specific unique hit
/// survives.
pub fn search_mods<'a>(catalog: &'a ModCollection, query: &str) -> Vec<ModMatch<'a>> {
    let query = query.trim();

    if query.is_empty() {
        return Vec::new();
    }

    // Exact pass: mod name first, then version full names, then type full
    // names. The first hit is the single result.
    for (mod_index, entry) in catalog.mods().iter().enumerate() {
        if eq_ignore_case(&entry.name, query) {
            return ModMatch::resolve_mod_level(catalog, mod_index)
                .into_iter()
                .collect();
        }
    }

    for (mod_index, entry) in catalog.mods().iter().enumerate() {
        for (version_index, version) in entry.versions.iter().enumerate() {
            if eq_ignore_case(&version.full_name(&entry.name), query) {
                let type_index = entry.default_version_type_index(version_index).min(
                    version.types.len().saturating_sub(1),
                );
                return ModMatch::resolve(catalog, mod_index, version_index, type_index)
                    .into_iter()
                    .collect();
            }
        }
    }

    for (mod_index, entry) in catalog.mods().iter().enumerate() {
        for (version_index, version) in entry.versions.iter().enumerate() {
            let version_full_name = version.full_name(&entry.name);

            for (type_index, version_type) in version.types.iter().enumerate() {
                if eq_ignore_case(&version_type.full_name(&version_full_name), query) {
                    return ModMatch::resolve(catalog, mod_index, version_index, type_index)
                        .into_iter()
                        .collect();
                }
            }
        }
    }

    // Tolerant passes: prefix beats substring.
    for pass in [
        starts_with_ignore_case as fn(&str, &str) -> bool,
        contains_ignore_case as fn(&str, &str) -> bool,
    ] {
        let matches = tolerant_pass(catalog, query, pass);

        if !matches.is_empty() {
            return matches;
        }
    }

    Vec::new()
}

fn tolerant_pass<'a>(
    catalog: &'a ModCollection,
    query: &str,
    hit: fn(&str, &str) -> bool,
) -> Vec<ModMatch<'a>> {
    let mut matches = Vec::new();

    for (mod_index, entry) in catalog.mods().iter().enumerate() {
        let name_hit = hit(&entry.name, query);

        if name_hit {
            matches.extend(ModMatch::resolve_mod_level(catalog, mod_index));
            continue;
        }

        for (version_index, version) in entry.versions.iter().enumerate() {
            let version_full_name = version.full_name(&entry.name);
            let version_hit = hit(&version_full_name, query);

            if version_hit {
                matches.extend(ModMatch::resolve(catalog, mod_index, version_index, 0));
                continue;
            }

            for (type_index, version_type) in version.types.iter().enumerate() {
                if hit(&version_type.full_name(&version_full_name), query) {
                    matches.extend(ModMatch::resolve(
                        catalog,
                        mod_index,
                        version_index,
                        type_index,
                    ));
                }
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_download::{
        ModDownload, DOWNLOAD_TYPE_MOD_MANAGER_FILES, DOWNLOAD_TYPE_ORIGINAL_FILES,
    };
    use crate::mod_file::ModFile;
    use crate::mod_game_version::ModGameVersion;
    use crate::mod_team::{ModTeam, ModTeamMember};
    use crate::mod_version::ModVersion;
    use crate::mod_version_type::ModVersionType;

    fn version(version: &str, types: &[&str], engine: &str) -> ModVersion {
        let mut result = ModVersion::new(version);

        for type_name in types {
            result = result.with_type(ModVersionType::new(*type_name).with_game_version(
                ModGameVersion::new(engine).with_file(ModFile::new(
                    format!("{}.GRP", if version.is_empty() { "BASE" } else { version }),
                    "grp",
                    "a",
                )),
            ));
        }

        result
    }

    fn downloads_for(id: &str, versions: &[&str], engine: &str) -> Vec<ModDownload> {
        let mut downloads = Vec::new();

        for v in versions {
            let mut original = ModDownload::new(
                format!("{id}_{v}_orig.zip"),
                DOWNLOAD_TYPE_ORIGINAL_FILES,
                "d1",
            );
            let mut manager = ModDownload::new(
                format!("{id}_{v}.zip"),
                DOWNLOAD_TYPE_MOD_MANAGER_FILES,
                "d2",
            )
            .with_game_version_id(engine);

            if !v.is_empty() {
                original = original.with_version(*v);
                manager = manager.with_version(*v);
            }

            downloads.push(original);
            downloads.push(manager);
        }

        downloads
    }

    fn sample_catalog() -> ModCollection {
        let mut catalog = ModCollection::new();

        let mut dc = Mod::new("dukedc", "Duke It Out in D.C.", "Expansion")
            .with_preferred_version("v2")
            .with_team(
                ModTeam::new("Sunstorm Interactive")
                    .with_member(ModTeamMember::new("Sverre Kvernmo")),
            )
            .with_version(version("v1", &[""], "atomic"))
            .with_version(version("v2", &[""], "atomic"));
        for download in downloads_for("dukedc", &["v1", "v2"], "atomic") {
            dc = dc.with_download(download);
        }
        catalog.add_mod(dc).unwrap();

        let mut carib = Mod::new("dukecarib", "Duke Caribbean", "Expansion")
            .with_team(
                ModTeam::new("Sunstorm Interactive")
                    .with_member(ModTeamMember::new("Charlie Wiederhold")),
            )
            .with_version(version("", &["Full", "Demo"], "eduke32"));
        for download in downloads_for("dukecarib", &[""], "eduke32") {
            carib = carib.with_download(download);
        }
        catalog.add_mod(carib).unwrap();

        catalog
    }

    #[test]
    fn exact_name_match_resolves_preferred_version() {
        let catalog = sample_catalog();
        let matches = search_mods(&catalog, "Duke It Out in D.C.");

        assert_eq!(matches.len(), 1);
        let hit = &matches[0];
        assert_eq!(hit.mod_index, 0);
        assert_eq!(hit.version_index, 1, "preferred version v2");
        assert_eq!(hit.version_type_index, 0);
        assert_eq!(hit.full_name(), "Duke It Out in D.C. v2");
    }

    #[test]
    fn exact_version_match_beats_prefix_matches() {
        let catalog = sample_catalog();
        let matches = search_mods(&catalog, "duke it out in d.c. v1");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].version_index, 0);
    }

    #[test]
    fn exact_type_match_is_most_specific() {
        let catalog = sample_catalog();
        let matches = search_mods(&catalog, "Duke Caribbean Demo");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].mod_index, 1);
        assert_eq!(matches[0].version_type_index, 1);
    }

    #[test]
    fn prefix_beats_substring() {
        let catalog = sample_catalog();

        // "Duke" is a prefix of both mod names: two prefix hits, no
        // substring dilution.
        let matches = search_mods(&catalog, "duke");
        assert_eq!(matches.len(), 2);

        // "Caribbean" is a substring hit only.
        let matches = search_mods(&catalog, "caribbean");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].mod_index, 1);
    }

    #[test]
    fn no_match_returns_empty() {
        let catalog = sample_catalog();
        assert!(search_mods(&catalog, "Penguin").is_empty());
        assert!(search_mods(&catalog, "   ").is_empty());
    }

    #[test]
    fn grouping_by_game_version_uses_registry_names() {
        let catalog = sample_catalog();
        let registry = GameVersionCollection::with_defaults();

        let mut view = OrganizedModCollection::new(GroupMode::GameVersion);
        view.rebuild(&catalog, &registry);

        let atomic = view.group_with_name("Duke Nukem 3D: Atomic Edition 1.5").unwrap();
        assert_eq!(atomic.mod_indices, vec![0]);

        let eduke32 = view.group_with_name("eDuke32").unwrap();
        assert_eq!(eduke32.mod_indices, vec![1]);

        let lameduke = view
            .group_with_name("Duke Nukem 3D Beta 1.3.95 (LameDuke)")
            .unwrap();
        assert!(lameduke.mod_indices.is_empty());
    }

    #[test]
    fn grouping_by_team_and_author() {
        let catalog = sample_catalog();
        let registry = GameVersionCollection::with_defaults();

        let mut view = OrganizedModCollection::new(GroupMode::Team);
        view.rebuild(&catalog, &registry);
        assert_eq!(view.groups().len(), 1);
        assert_eq!(view.groups()[0].mod_indices, vec![0, 1]);

        view.set_mode(GroupMode::Author);
        assert!(view.is_stale());
        view.rebuild(&catalog, &registry);
        assert_eq!(view.groups().len(), 2);
        assert!(view.group_with_name("Sverre Kvernmo").is_some());
        assert!(view.group_with_name("Charlie Wiederhold").is_some());
    }

    #[test]
    fn stale_flag_wiring() {
        let mut catalog = sample_catalog();
        let registry = GameVersionCollection::with_defaults();

        let mut view = OrganizedModCollection::new(GroupMode::Team);
        view.rebuild(&catalog, &registry);

        let stale = view.stale_flag();
        catalog.updated.subscribe(move || stale.set(true));

        assert!(!view.is_stale());
        catalog.remove_mod_with_id("dukecarib");
        assert!(view.is_stale());

        view.rebuild(&catalog, &registry);
        assert!(!view.is_stale());
        assert_eq!(view.groups()[0].mod_indices, vec![0]);
    }

    #[test]
    fn random_selection_respects_group() {
        let catalog = sample_catalog();
        let registry = GameVersionCollection::with_defaults();

        let mut view = OrganizedModCollection::new(GroupMode::GameVersion);
        view.rebuild(&catalog, &registry);

        assert!(view.select_group("eDuke32"));
        for _ in 0..16 {
            assert_eq!(view.random_mod_index(&catalog), Some(1));
        }

        view.clear_group_selection();
        for _ in 0..16 {
            let index = view.random_mod_index(&catalog).unwrap();
            assert!(index < catalog.len());
        }
    }
}
