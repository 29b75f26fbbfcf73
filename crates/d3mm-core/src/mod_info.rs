//! The mod entity: a user-created content package and everything the
//! catalog knows about it.
//!
//! A `Mod` exclusively owns its versions, downloads, gallery entries, and
//! team; a version owns its types; a type its per-engine file lists; a
//! file list its files. The tree is plain owned data, so deep copy is
//! `Clone` and there are no parent pointers to re-link; code that needs
//! parent context carries `(mod, version index, type index)` instead.

use crate::compare::{eq_ignore_case, is_trimmed_non_empty};
use crate::error::CatalogError;
use crate::json::{optional_string, warn_unknown_properties};
use crate::mod_download::{
    ModDownload, DOWNLOAD_TYPE_MOD_MANAGER_FILES, DOWNLOAD_TYPE_ORIGINAL_FILES,
};
use crate::mod_image::{ModImage, ModScreenshot, XML_IMAGE_ELEMENT_NAME};
use crate::mod_team::ModTeam;
use crate::mod_version::ModVersion;
use crate::mod_video::ModVideo;
use crate::xml::XmlElement;
use serde_json::{Map, Value};
use std::collections::HashMap;

const JSON_PROPERTIES: &[&str] = &[
    "id",
    "name",
    "type",
    "preferredVersion",
    "defaultVersionType",
    "website",
    "team",
    "versions",
    "downloads",
    "screenshots",
    "images",
    "videos",
    "notes",
    "relatedMods",
];
const XML_ATTRIBUTES: &[&str] = &["id", "name", "type", "version", "version_type", "website"];

pub(crate) const XML_ELEMENT_NAME: &str = "mod";

/// A user-created content package for one of the supported engines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mod {
    /// Unique, stable catalog identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Genre tag ("Total Conversion", "Episode", "Map Pack", ...).
    pub mod_type: String,

    /// Version string preselected when the mod is chosen.
    pub preferred_version: Option<String>,

    /// Version type preselected when the preferred version has variants.
    pub default_version_type: Option<String>,

    pub website: Option<String>,
    pub team: Option<ModTeam>,
    pub versions: Vec<ModVersion>,
    pub downloads: Vec<ModDownload>,
    pub screenshots: Vec<ModScreenshot>,
    pub images: Vec<ModImage>,
    pub videos: Vec<ModVideo>,
    pub notes: Vec<String>,

    /// Ids of related catalog entries (sequels, prequels, spiritual kin).
    pub related_mods: Vec<String>,
}

impl Mod {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mod_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mod_type: mod_type.into(),
            ..Self::default()
        }
    }

    pub fn with_preferred_version(mut self, version: impl Into<String>) -> Self {
        self.preferred_version = Some(version.into());
        self
    }

    pub fn with_default_version_type(mut self, version_type: impl Into<String>) -> Self {
        self.default_version_type = Some(version_type.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_team(mut self, team: ModTeam) -> Self {
        self.team = Some(team);
        self
    }

    pub fn with_version(mut self, version: ModVersion) -> Self {
        self.versions.push(version);
        self
    }

    pub fn with_download(mut self, download: ModDownload) -> Self {
        self.downloads.push(download);
        self
    }

    pub fn with_screenshot(mut self, screenshot: ModScreenshot) -> Self {
        self.screenshots.push(screenshot);
        self
    }

    pub fn with_image(mut self, image: ModImage) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_video(mut self, video: ModVideo) -> Self {
        self.videos.push(video);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_related_mod(mut self, id: impl Into<String>) -> Self {
        self.related_mods.push(id.into());
        self
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn version_with_name(&self, version: &str) -> Option<&ModVersion> {
        self.versions
            .iter()
            .find(|candidate| eq_ignore_case(&candidate.version, version))
    }

    pub fn index_of_version(&self, version: &str) -> Option<usize> {
        self.versions
            .iter()
            .position(|candidate| eq_ignore_case(&candidate.version, version))
    }

    /// Index of the preferred version, defaulting to the first.
    pub fn preferred_version_index(&self) -> usize {
        self.preferred_version
            .as_deref()
            .and_then(|preferred| self.index_of_version(preferred))
            .unwrap_or(0)
    }

    /// Index of the default version type within `version_index`, defaulting
    /// to the first.
    pub fn default_version_type_index(&self, version_index: usize) -> usize {
        self.default_version_type
            .as_deref()
            .and_then(|default| self.versions.get(version_index)?.index_of_type(default))
            .unwrap_or(0)
    }

    /// Display name for a (version, type) selection, e.g.
    /// `"Duke It Out in D.C. v2 Full"`.
    pub fn full_name(&self, version_index: usize, type_index: usize) -> String {
        let Some(version) = self.versions.get(version_index) else {
            return self.name.clone();
        };

        let version_full_name = version.full_name(&self.name);

        match version.types.get(type_index) {
            Some(version_type) => version_type.full_name(&version_full_name),
            None => version_full_name,
        }
    }

    /// Downloads of the given type for the given version string.
    pub fn downloads_of_type<'a>(
        &'a self,
        download_type: &'a str,
        version: &'a str,
    ) -> impl Iterator<Item = &'a ModDownload> {
        self.downloads.iter().filter(move |download| {
            eq_ignore_case(&download.download_type, download_type)
                && download.matches_version(version)
        })
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Check the mod's local and cross-referential invariants.
    ///
    /// This covers everything checkable without the game-version registry;
    /// the registry cross-check lives on
    /// [`ModCollection::check_game_versions`](crate::ModCollection::check_game_versions).
    pub fn is_valid(&self) -> bool {
        if !is_trimmed_non_empty(&self.id)
            || !is_trimmed_non_empty(&self.name)
            || !is_trimmed_non_empty(&self.mod_type)
        {
            return false;
        }

        if self.versions.is_empty() || !self.versions.iter().all(ModVersion::is_valid) {
            return false;
        }

        if !self.unique_version_strings()
            || !self.unique_file_names()
            || !self.unique_video_urls()
        {
            return false;
        }

        // preferredVersion / defaultVersionType must resolve.
        if let Some(preferred) = &self.preferred_version {
            if self.index_of_version(preferred).is_none() {
                return false;
            }
        }

        if let Some(default_type) = &self.default_version_type {
            let exists = self
                .versions
                .iter()
                .any(|version| version.index_of_type(default_type).is_some());

            if !exists {
                return false;
            }
        }

        if let Some(team) = &self.team {
            if !team.is_valid() {
                return false;
            }
        }

        if !self.downloads.iter().all(ModDownload::is_valid)
            || !self.screenshots.iter().all(ModScreenshot::is_valid)
            || !self.images.iter().all(ModImage::is_valid)
            || !self.videos.iter().all(ModVideo::is_valid)
        {
            return false;
        }

        self.versions_have_download_rows() && self.download_parts_complete()
    }

    fn unique_version_strings(&self) -> bool {
        for (index, version) in self.versions.iter().enumerate() {
            if self.versions[index + 1..]
                .iter()
                .any(|other| eq_ignore_case(&other.version, &version.version))
            {
                return false;
            }
        }

        true
    }

    fn unique_file_names(&self) -> bool {
        fn all_unique<'a>(names: impl Iterator<Item = &'a str>) -> bool {
            let mut seen: Vec<String> = Vec::new();

            for name in names {
                let folded = name.to_ascii_lowercase();
                if seen.contains(&folded) {
                    return false;
                }
                seen.push(folded);
            }

            true
        }

        all_unique(self.downloads.iter().map(|download| download.file_name.as_str()))
            && all_unique(
                self.screenshots
                    .iter()
                    .map(|screenshot| screenshot.image().file_name.as_str()),
            )
            && all_unique(self.images.iter().map(|image| image.file_name.as_str()))
    }

    fn unique_video_urls(&self) -> bool {
        for (index, video) in self.videos.iter().enumerate() {
            if self.videos[index + 1..]
                .iter()
                .any(|other| eq_ignore_case(&other.url, &video.url))
            {
                return false;
            }
        }

        true
    }

    /// Invariants 5 and 6: every version has both an `Original Files` and a
    /// `Mod Manager Files` download of matching version (with the repaired
    /// flag mirrored), and every (version, game version) pair is backed by
    /// a `Mod Manager Files` row for that engine.
    fn versions_have_download_rows(&self) -> bool {
        for version in &self.versions {
            let has_original = self
                .downloads_of_type(DOWNLOAD_TYPE_ORIGINAL_FILES, &version.version)
                .next()
                .is_some();
            let has_mod_manager = self
                .downloads_of_type(DOWNLOAD_TYPE_MOD_MANAGER_FILES, &version.version)
                .next()
                .is_some();

            if !has_original || !has_mod_manager {
                return false;
            }

            if version.repaired == Some(true) {
                let has_repaired = self
                    .downloads
                    .iter()
                    .any(|download| download.matches_version(&version.version)
                        && download.repaired == Some(true));

                if !has_repaired {
                    return false;
                }
            }

            for version_type in &version.types {
                for game_version in &version_type.game_versions {
                    let has_row = self
                        .downloads_of_type(DOWNLOAD_TYPE_MOD_MANAGER_FILES, &version.version)
                        .any(|download| match &download.game_version_id {
                            Some(id) => eq_ignore_case(id, &game_version.game_version_id),
                            // A row without an engine id covers every engine
                            // of its version.
                            None => true,
                        });

                    if !has_row {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Invariant 7: every multi-part download group carries parts 1..=N of
    /// a single version.
    fn download_parts_complete(&self) -> bool {
        let mut groups: HashMap<(String, String), (u64, Vec<u64>)> = HashMap::new();

        for download in &self.downloads {
            let (Some(part_number), Some(part_count)) = (download.part_number, download.part_count)
            else {
                continue;
            };

            let key = (
                download.download_type.to_ascii_lowercase(),
                download
                    .version
                    .as_deref()
                    .unwrap_or("")
                    .to_ascii_lowercase(),
            );

            let entry = groups.entry(key).or_insert((part_count, Vec::new()));

            if entry.0 != part_count {
                return false;
            }

            entry.1.push(part_number);
        }

        groups.values().all(|(part_count, part_numbers)| {
            let mut sorted = part_numbers.clone();
            sorted.sort_unstable();
            sorted.dedup();

            sorted.len() as u64 == *part_count
                && sorted.first() == Some(&1)
                && sorted.last() == Some(part_count)
        })
    }

    // ------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();

        object.insert("id".to_string(), Value::String(self.id.clone()));
        object.insert("name".to_string(), Value::String(self.name.clone()));
        object.insert("type".to_string(), Value::String(self.mod_type.clone()));
        crate::json::put_optional(
            &mut object,
            "preferredVersion",
            self.preferred_version.as_deref(),
        );
        crate::json::put_optional(
            &mut object,
            "defaultVersionType",
            self.default_version_type.as_deref(),
        );
        crate::json::put_optional(&mut object, "website", self.website.as_deref());

        if let Some(team) = &self.team {
            object.insert("team".to_string(), team.to_json());
        }

        object.insert(
            "versions".to_string(),
            Value::Array(self.versions.iter().map(ModVersion::to_json).collect()),
        );
        object.insert(
            "downloads".to_string(),
            Value::Array(self.downloads.iter().map(ModDownload::to_json).collect()),
        );

        if !self.screenshots.is_empty() {
            object.insert(
                "screenshots".to_string(),
                Value::Array(self.screenshots.iter().map(ModScreenshot::to_json).collect()),
            );
        }

        if !self.images.is_empty() {
            object.insert(
                "images".to_string(),
                Value::Array(self.images.iter().map(ModImage::to_json).collect()),
            );
        }

        if !self.videos.is_empty() {
            object.insert(
                "videos".to_string(),
                Value::Array(self.videos.iter().map(ModVideo::to_json).collect()),
            );
        }

        if !self.notes.is_empty() {
            object.insert(
                "notes".to_string(),
                Value::Array(self.notes.iter().cloned().map(Value::String).collect()),
            );
        }

        if !self.related_mods.is_empty() {
            object.insert(
                "relatedMods".to_string(),
                Value::Array(self.related_mods.iter().cloned().map(Value::String).collect()),
            );
        }

        Value::Object(object)
    }

    pub fn from_json(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let object = crate::json::as_object(value, path)?;

        warn_unknown_properties(object, JSON_PROPERTIES, path);

        let team = object
            .get("team")
            .map(|team_value| ModTeam::from_json(team_value, &format!("{path}.team")))
            .transpose()?;

        fn parse_list<T>(
            object: &Map<String, Value>,
            name: &str,
            path: &str,
            required: bool,
            parse: impl Fn(&Value, &str) -> Result<T, CatalogError>,
        ) -> Result<Vec<T>, CatalogError> {
            let list_path = format!("{path}.{name}");

            let Some(list_value) = object.get(name) else {
                if required {
                    return Err(CatalogError::schema(&list_path, "missing required property"));
                }
                return Ok(Vec::new());
            };

            let mut items = Vec::new();

            for (index, item_value) in crate::json::as_array(list_value, &list_path)?
                .iter()
                .enumerate()
            {
                items.push(parse(item_value, &format!("{list_path}[{index}]"))?);
            }

            Ok(items)
        }

        Ok(Self {
            id: crate::json::require_non_empty_string(object, "id", path)?,
            name: crate::json::require_non_empty_string(object, "name", path)?,
            mod_type: crate::json::require_non_empty_string(object, "type", path)?,
            preferred_version: optional_string(object, "preferredVersion", path)?,
            default_version_type: optional_string(object, "defaultVersionType", path)?,
            website: optional_string(object, "website", path)?,
            team,
            versions: parse_list(object, "versions", path, true, ModVersion::from_json)?,
            downloads: parse_list(object, "downloads", path, false, ModDownload::from_json)?,
            screenshots: parse_list(object, "screenshots", path, false, ModScreenshot::from_json)?,
            images: parse_list(object, "images", path, false, ModImage::from_json)?,
            videos: parse_list(object, "videos", path, false, ModVideo::from_json)?,
            notes: crate::json::optional_string_array(object, "notes", path)?,
            related_mods: crate::json::optional_string_array(object, "relatedMods", path)?,
        })
    }

    // ------------------------------------------------------------------
    // XML
    // ------------------------------------------------------------------

    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(XML_ELEMENT_NAME)
            .attribute("id", &self.id)
            .attribute("name", &self.name)
            .attribute("type", &self.mod_type)
            .optional_attribute("version", self.preferred_version.as_deref())
            .optional_attribute("version_type", self.default_version_type.as_deref())
            .optional_attribute("website", self.website.as_deref());

        if let Some(team) = &self.team {
            element.children.push(team.to_xml());
        }

        let mut files = XmlElement::new("files");
        for version in &self.versions {
            files.children.push(version.to_xml());
        }
        element.children.push(files);

        let mut downloads = XmlElement::new("downloads");
        for download in &self.downloads {
            downloads.children.push(download.to_xml());
        }
        element.children.push(downloads);

        if !self.screenshots.is_empty() {
            let mut screenshots = XmlElement::new("screenshots");
            for screenshot in &self.screenshots {
                screenshots.children.push(screenshot.to_xml());
            }
            element.children.push(screenshots);
        }

        if !self.images.is_empty() {
            let mut images = XmlElement::new("images");
            for image in &self.images {
                images.children.push(image.to_xml_named(XML_IMAGE_ELEMENT_NAME));
            }
            element.children.push(images);
        }

        if !self.videos.is_empty() {
            let mut videos = XmlElement::new("videos");
            for video in &self.videos {
                videos.children.push(video.to_xml());
            }
            element.children.push(videos);
        }

        if !self.related_mods.is_empty() {
            let mut related = XmlElement::new("related");
            for id in &self.related_mods {
                related
                    .children
                    .push(XmlElement::new("mod").attribute("id", id));
            }
            element.children.push(related);
        }

        if !self.notes.is_empty() {
            let mut notes = XmlElement::new("notes");
            for note in &self.notes {
                notes.children.push(XmlElement::new("note").with_text(note));
            }
            element.children.push(notes);
        }

        element
    }

    pub fn from_xml(element: &XmlElement, path: &str) -> Result<Self, CatalogError> {
        if element.name != XML_ELEMENT_NAME {
            return Err(CatalogError::schema(
                path,
                format!("expected '{XML_ELEMENT_NAME}' element, found '{}'", element.name),
            ));
        }

        element.warn_unknown_attributes(XML_ATTRIBUTES, path);

        const KNOWN_CHILDREN: &[&str] = &[
            "team",
            "files",
            "downloads",
            "screenshots",
            "images",
            "videos",
            "related",
            "notes",
        ];

        for child in &element.children {
            if !KNOWN_CHILDREN.contains(&child.name.as_str()) {
                tracing::warn!("element '{path}' has unexpected child element '{}'", child.name);
            }
        }

        let team = element
            .first_child("team")
            .map(|team_element| ModTeam::from_xml(team_element, &format!("{path}.team")))
            .transpose()?;

        let files = element
            .first_child("files")
            .ok_or_else(|| CatalogError::schema(format!("{path}.files"), "missing required element"))?;

        let mut versions = Vec::new();
        for (index, child) in files
            .children_named(crate::mod_version::XML_ELEMENT_NAME)
            .enumerate()
        {
            versions.push(ModVersion::from_xml(
                child,
                &format!("{path}.files.version[{index}]"),
            )?);
        }

        let mut downloads = Vec::new();
        if let Some(downloads_element) = element.first_child("downloads") {
            for (index, child) in downloads_element
                .children_named(crate::mod_download::XML_ELEMENT_NAME)
                .enumerate()
            {
                downloads.push(ModDownload::from_xml(
                    child,
                    &format!("{path}.downloads.download[{index}]"),
                )?);
            }
        }

        let mut screenshots = Vec::new();
        if let Some(screenshots_element) = element.first_child("screenshots") {
            for (index, child) in screenshots_element.children.iter().enumerate() {
                screenshots.push(ModScreenshot::from_xml(
                    child,
                    &format!("{path}.screenshots.screenshot[{index}]"),
                )?);
            }
        }

        let mut images = Vec::new();
        if let Some(images_element) = element.first_child("images") {
            for (index, child) in images_element.children.iter().enumerate() {
                images.push(ModImage::from_xml_named(
                    child,
                    XML_IMAGE_ELEMENT_NAME,
                    &format!("{path}.images.image[{index}]"),
                )?);
            }
        }

        let mut videos = Vec::new();
        if let Some(videos_element) = element.first_child("videos") {
            for (index, child) in videos_element.children.iter().enumerate() {
                videos.push(ModVideo::from_xml(
                    child,
                    &format!("{path}.videos.video[{index}]"),
                )?);
            }
        }

        let mut related_mods = Vec::new();
        if let Some(related_element) = element.first_child("related") {
            for (index, child) in related_element.children_named("mod").enumerate() {
                related_mods.push(
                    child.require_attribute("id", &format!("{path}.related.mod[{index}]"))?,
                );
            }
        }

        let mut notes = Vec::new();
        if let Some(notes_element) = element.first_child("notes") {
            for child in notes_element.children_named("note") {
                notes.push(child.text.clone());
            }
        }

        Ok(Self {
            id: element.require_attribute("id", path)?,
            name: element.require_attribute("name", path)?,
            mod_type: element.require_attribute("type", path)?,
            preferred_version: element.attribute_value("version").map(str::to_string),
            default_version_type: element.attribute_value("version_type").map(str::to_string),
            website: element.attribute_value("website").map(str::to_string),
            team,
            versions,
            downloads,
            screenshots,
            images,
            videos,
            notes,
            related_mods,
        })
    }
}

impl std::fmt::Display for Mod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_file::ModFile;
    use crate::mod_game_version::ModGameVersion;
    use crate::mod_version_type::ModVersionType;

    /// A structurally complete single-version mod satisfying the download
    /// row invariants.
    pub(crate) fn sample_mod() -> Mod {
        Mod::new("dukedc", "Duke It Out in D.C.", "Expansion")
            .with_version(
                ModVersion::new("").with_type(ModVersionType::new("").with_game_version(
                    ModGameVersion::new("atomic")
                        .with_file(ModFile::new("DUKEDC.GRP", "grp", "a1"))
                        .with_file(ModFile::new("DUKEDC.CON", "con", "a2")),
                )),
            )
            .with_download(
                ModDownload::new("dukedc_original.zip", DOWNLOAD_TYPE_ORIGINAL_FILES, "d1"),
            )
            .with_download(
                ModDownload::new("dukedc.zip", DOWNLOAD_TYPE_MOD_MANAGER_FILES, "d2")
                    .with_game_version_id("atomic"),
            )
    }

    #[test]
    fn sample_is_valid() {
        assert!(sample_mod().is_valid());
    }

    #[test]
    fn duplicate_versions_invalidate() {
        let mut duplicated = sample_mod();
        duplicated.versions.push(duplicated.versions[0].clone());
        assert!(!duplicated.is_valid());
    }

    #[test]
    fn missing_download_row_invalidates() {
        let mut no_original = sample_mod();
        no_original.downloads.remove(0);
        assert!(!no_original.is_valid());

        let mut wrong_engine = sample_mod();
        wrong_engine.downloads[1].game_version_id = Some("eduke32".into());
        assert!(!wrong_engine.is_valid());

        let mut engine_agnostic = sample_mod();
        engine_agnostic.downloads[1].game_version_id = None;
        assert!(engine_agnostic.is_valid(), "row without engine id covers all");
    }

    #[test]
    fn repaired_version_requires_repaired_download() {
        let mut repaired = sample_mod();
        repaired.versions[0].repaired = Some(true);
        assert!(!repaired.is_valid());

        repaired.downloads[1].repaired = Some(true);
        assert!(repaired.is_valid());
    }

    #[test]
    fn incomplete_part_sets_invalidate() {
        let mut parts = sample_mod();
        parts.downloads.push(
            ModDownload::new("big.part1.zip", DOWNLOAD_TYPE_MOD_MANAGER_FILES, "p1")
                .with_parts(1, 3),
        );
        parts.downloads.push(
            ModDownload::new("big.part2.zip", DOWNLOAD_TYPE_MOD_MANAGER_FILES, "p2")
                .with_parts(2, 3),
        );
        assert!(!parts.is_valid(), "part 3 of 3 is missing");

        parts.downloads.push(
            ModDownload::new("big.part3.zip", DOWNLOAD_TYPE_MOD_MANAGER_FILES, "p3")
                .with_parts(3, 3),
        );
        assert!(parts.is_valid());
    }

    #[test]
    fn dangling_preferred_version_invalidates() {
        let dangling = sample_mod().with_preferred_version("v9");
        assert!(!dangling.is_valid());
    }

    #[test]
    fn preferred_version_and_default_type_resolve() {
        let mod_info = sample_mod();
        assert_eq!(mod_info.preferred_version_index(), 0);
        assert_eq!(mod_info.default_version_type_index(0), 0);
    }

    #[test]
    fn full_name_concatenates_selection() {
        let mut mod_info = sample_mod();
        mod_info.versions[0].version = "v2".into();
        mod_info.versions[0].types[0].type_name = "Full".into();

        assert_eq!(mod_info.full_name(0, 0), "Duke It Out in D.C. v2 Full");
        assert_eq!(mod_info.full_name(9, 9), "Duke It Out in D.C.");
    }

    #[test]
    fn json_round_trip() {
        let mod_info = sample_mod()
            .with_website("https://dukedc.example")
            .with_note("Requires the Atomic Edition.")
            .with_related_mod("dukecarib");

        let parsed = Mod::from_json(&mod_info.to_json(), "mod").unwrap();
        assert_eq!(mod_info, parsed);
    }

    #[test]
    fn xml_round_trip() {
        let mod_info = sample_mod()
            .with_team(ModTeam::new("Sunstorm Interactive"))
            .with_video(ModVideo::new("https://youtube.example/watch?v=1", "Intro", 640, 360))
            .with_note("Requires the Atomic Edition.")
            .with_related_mod("dukecarib");

        let parsed = Mod::from_xml(&mod_info.to_xml(), "mod").unwrap();
        assert_eq!(mod_info, parsed);
    }

    #[test]
    fn missing_files_element_is_schema_error() {
        let element = XmlElement::new("mod")
            .attribute("id", "x")
            .attribute("name", "X")
            .attribute("type", "Map Pack");

        let error = Mod::from_xml(&element, "mod").unwrap_err();
        assert!(error.to_string().contains("mod.files"), "{error}");
    }
}
