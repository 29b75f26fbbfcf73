//! The engine's own configuration file format.
//!
//! A custom INI variant:
//!
//! - `;` begins a comment line; the text after the marker is preserved
//!   verbatim. Comments attach to a section either before its `[Name]`
//!   line or immediately after it.
//! - `[SectionName]` opens a section; section names are unique,
//!   case-insensitive.
//! - `Name = Value` inside a section, where the value is the empty marker
//!   `~`, a decimal integer, a C-style `0x` hex integer, one quoted
//!   string, or a tuple of quoted strings. Entry names are unique across
//!   the whole document, case-insensitive. A value never spans lines.
//! - An entry before the first section header is a hard error.
//!
//! Serialization reproduces section order, entry order, and comment
//! blocks; a parsed document saves back byte-for-byte (hex digits are
//! canonically lowercase, as the engine writes them).

use crate::error::GameConfigError;
use std::path::{Path, PathBuf};

pub const COMMENT_CHARACTER: char = ';';
pub const SECTION_NAME_START_CHARACTER: char = '[';
pub const SECTION_NAME_END_CHARACTER: char = ']';
pub const ASSIGNMENT_CHARACTER: char = '=';
pub const EMPTY_VALUE_CHARACTER: char = '~';

/// One entry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    /// The `~` placeholder.
    Empty,
    Integer(i64),
    Hexadecimal(i64),
    Str(String),
    MultiString(Vec<String>),
}

impl EntryValue {
    /// Non-zero integers read as true.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_integer().map(|value| value != 0)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            EntryValue::Integer(value) | EntryValue::Hexadecimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntryValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_multi_string(&self) -> Option<&[String]> {
        match self {
            EntryValue::MultiString(values) => Some(values),
            _ => None,
        }
    }

    fn render(&self) -> String {
        match self {
            EntryValue::Empty => EMPTY_VALUE_CHARACTER.to_string(),
            EntryValue::Integer(value) => value.to_string(),
            EntryValue::Hexadecimal(value) => format!("0x{value:x}"),
            EntryValue::Str(value) => format!("\"{value}\""),
            EntryValue::MultiString(values) => values
                .iter()
                .map(|value| format!("\"{value}\""))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// One `Name = Value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub value: EntryValue,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: EntryValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn is_name_valid(name: &str) -> bool {
        !name.is_empty()
            && name.trim() == name
            && !name.contains(ASSIGNMENT_CHARACTER)
            && !name.starts_with(COMMENT_CHARACTER)
            && !name.starts_with(SECTION_NAME_START_CHARACTER)
    }

    fn render(&self) -> String {
        format!("{} {} {}", self.name, ASSIGNMENT_CHARACTER, self.value.render())
    }
}

/// One `[Name]` section with its attached comment blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,

    /// Comment lines rendered before the `[Name]` line, text after `;`
    /// verbatim.
    pub preceding_comments: Vec<String>,

    /// Comment lines rendered between the `[Name]` line and the first
    /// entry.
    pub following_comments: Vec<String>,

    entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_preceding_comments(mut self, comments: &[&str]) -> Self {
        self.preceding_comments = comments.iter().map(|comment| comment.to_string()).collect();
        self
    }

    pub fn with_following_comments(mut self, comments: &[&str]) -> Self {
        self.following_comments = comments.iter().map(|comment| comment.to_string()).collect();
        self
    }

    pub fn is_name_valid(name: &str) -> bool {
        !name.is_empty()
            && name.trim() == name
            && !name.contains(SECTION_NAME_START_CHARACTER)
            && !name.contains(SECTION_NAME_END_CHARACTER)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn has_entry_with_name(&self, name: &str) -> bool {
        self.entry_with_name(name).is_some()
    }

    pub fn entry_with_name(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn entry_with_name_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    fn render(&self, output: &mut String) {
        for comment in &self.preceding_comments {
            output.push(COMMENT_CHARACTER);
            output.push_str(comment);
            output.push('\n');
        }

        output.push(SECTION_NAME_START_CHARACTER);
        output.push_str(&self.name);
        output.push(SECTION_NAME_END_CHARACTER);
        output.push('\n');

        for comment in &self.following_comments {
            output.push(COMMENT_CHARACTER);
            output.push_str(comment);
            output.push('\n');
        }

        for entry in &self.entries {
            output.push_str(&entry.render());
            output.push('\n');
        }
    }
}

/// A parsed engine configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameConfiguration {
    file_path: Option<PathBuf>,
    sections: Vec<Section>,
}

impl GameConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, file_path: impl Into<PathBuf>) {
        self.file_path = Some(file_path.into());
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn has_section_with_name(&self, name: &str) -> bool {
        self.section_with_name(name).is_some()
    }

    pub fn section_with_name(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }

    pub fn section_with_name_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections
            .iter_mut()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }

    /// Entry lookup is document-global; names are unique across sections.
    pub fn has_entry_with_name(&self, name: &str) -> bool {
        self.entry_with_name(name).is_some()
    }

    pub fn entry_with_name(&self, name: &str) -> Option<&Entry> {
        self.sections
            .iter()
            .find_map(|section| section.entry_with_name(name))
    }

    pub fn entry_with_name_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.sections
            .iter_mut()
            .find_map(|section| section.entry_with_name_mut(name))
    }

    /// Append a section, enforcing unique section names and document-wide
    /// unique entry names.
    pub fn add_section(&mut self, section: Section) -> Result<(), GameConfigError> {
        if !Section::is_name_valid(&section.name) {
            return Err(GameConfigError::Integrity(format!(
                "invalid section name '{}'",
                section.name
            )));
        }

        if self.has_section_with_name(&section.name) {
            return Err(GameConfigError::Integrity(format!(
                "duplicate section name '{}'",
                section.name
            )));
        }

        for entry in &section.entries {
            if self.has_entry_with_name(&entry.name) {
                return Err(GameConfigError::Integrity(format!(
                    "duplicate entry name '{}'",
                    entry.name
                )));
            }
        }

        self.sections.push(section);

        Ok(())
    }

    /// Append an entry to a named section, enforcing document-wide name
    /// uniqueness.
    pub fn add_entry_to_section(
        &mut self,
        section_name: &str,
        entry: Entry,
    ) -> Result<(), GameConfigError> {
        if !Entry::is_name_valid(&entry.name) {
            return Err(GameConfigError::Integrity(format!(
                "invalid entry name '{}'",
                entry.name
            )));
        }

        if self.has_entry_with_name(&entry.name) {
            return Err(GameConfigError::Integrity(format!(
                "duplicate entry name '{}'",
                entry.name
            )));
        }

        let section = self.section_with_name_mut(section_name).ok_or_else(|| {
            GameConfigError::Integrity(format!("no section named '{section_name}'"))
        })?;

        section.entries.push(entry);

        Ok(())
    }

    /// Set an entry's value inside a named section, optionally creating
    /// the entry when missing.
    pub fn set_entry_value(
        &mut self,
        section_name: &str,
        entry_name: &str,
        value: EntryValue,
        create_if_missing: bool,
    ) -> Result<(), GameConfigError> {
        let section_exists = self.has_section_with_name(section_name);

        if !section_exists {
            return Err(GameConfigError::Integrity(format!(
                "no section named '{section_name}'"
            )));
        }

        let owned_by_section = self
            .section_with_name(section_name)
            .map(|section| section.has_entry_with_name(entry_name))
            .unwrap_or(false);

        if owned_by_section {
            let section = self.section_with_name_mut(section_name).expect("checked above");
            section.entry_with_name_mut(entry_name).expect("checked above").value = value;
            return Ok(());
        }

        if self.has_entry_with_name(entry_name) {
            return Err(GameConfigError::Integrity(format!(
                "entry '{entry_name}' exists outside section '{section_name}'"
            )));
        }

        if !create_if_missing {
            return Err(GameConfigError::Integrity(format!(
                "no entry named '{entry_name}' in section '{section_name}'"
            )));
        }

        self.add_entry_to_section(section_name, Entry::new(entry_name, value))
    }

    pub fn remove_entry_with_name(&mut self, name: &str) -> bool {
        for section in &mut self.sections {
            if let Some(index) = section
                .entries
                .iter()
                .position(|entry| entry.name.eq_ignore_ascii_case(name))
            {
                section.entries.remove(index);
                return true;
            }
        }

        false
    }

    // ------------------------------------------------------------------
    // Parse / serialize
    // ------------------------------------------------------------------

    pub fn parse_from(data: &str) -> Result<Self, GameConfigError> {
        let mut document = GameConfiguration::new();
        let mut pending_comments: Vec<String> = Vec::new();
        let mut current_section: Option<Section> = None;
        let mut entries_started = false;

        for (index, raw_line) in data.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim_end_matches('\r');

            if line.trim().is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix(COMMENT_CHARACTER) {
                match current_section.as_mut() {
                    Some(section) if !entries_started => {
                        section.following_comments.push(comment.to_string());
                    }
                    Some(_) => {
                        // A comment after a section's entries belongs to
                        // the next section header.
                        pending_comments.push(comment.to_string());
                    }
                    None => pending_comments.push(comment.to_string()),
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix(SECTION_NAME_START_CHARACTER) {
                let Some(name) = rest.strip_suffix(SECTION_NAME_END_CHARACTER) else {
                    return Err(GameConfigError::parse(
                        line_number,
                        format!("unterminated section header '{line}'"),
                    ));
                };

                if !Section::is_name_valid(name) {
                    return Err(GameConfigError::parse(
                        line_number,
                        format!("invalid section name '{name}'"),
                    ));
                }

                if let Some(finished) = current_section.take() {
                    document.commit_section(finished, line_number)?;
                }

                let mut section = Section::new(name);
                section.preceding_comments = std::mem::take(&mut pending_comments);
                current_section = Some(section);
                entries_started = false;
                continue;
            }

            // Anything else must be an entry line inside a section.
            let Some(section) = current_section.as_mut() else {
                return Err(GameConfigError::parse(
                    line_number,
                    format!("entry '{line}' appears before any section header"),
                ));
            };

            let entry = parse_entry_line(line, line_number)?;
            section.entries.push(entry);
            entries_started = true;
        }

        if !pending_comments.is_empty() {
            tracing::warn!("dropping {} trailing comment line(s)", pending_comments.len());
        }

        if let Some(finished) = current_section.take() {
            let line_number = data.lines().count();
            document.commit_section(finished, line_number)?;
        }

        Ok(document)
    }

    fn commit_section(
        &mut self,
        section: Section,
        line_number: usize,
    ) -> Result<(), GameConfigError> {
        if self.has_section_with_name(&section.name) {
            return Err(GameConfigError::parse(
                line_number,
                format!("duplicate section name '{}'", section.name),
            ));
        }

        for entry in &section.entries {
            if self.has_entry_with_name(&entry.name) {
                return Err(GameConfigError::parse(
                    line_number,
                    format!("duplicate entry name '{}'", entry.name),
                ));
            }
        }

        self.sections.push(section);
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self, GameConfigError> {
        let data = std::fs::read_to_string(path)?;
        let mut document = Self::parse_from(&data)?;
        document.file_path = Some(path.to_path_buf());

        Ok(document)
    }

    pub fn save(&self) -> Result<(), GameConfigError> {
        let path = self.file_path.clone().ok_or_else(|| {
            GameConfigError::Integrity("configuration has no file path".to_string())
        })?;

        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GameConfigError> {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl std::fmt::Display for GameConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = String::new();

        for (index, section) in self.sections.iter().enumerate() {
            if index != 0 {
                output.push('\n');
            }

            section.render(&mut output);
        }

        f.write_str(&output)
    }
}

fn parse_entry_line(line: &str, line_number: usize) -> Result<Entry, GameConfigError> {
    let Some(assignment) = line.find(ASSIGNMENT_CHARACTER) else {
        return Err(GameConfigError::parse(
            line_number,
            format!("expected '{ASSIGNMENT_CHARACTER}' in entry line '{line}'"),
        ));
    };

    let name = line[..assignment].trim();
    let raw_value = line[assignment + 1..].trim();

    if !Entry::is_name_valid(name) {
        return Err(GameConfigError::parse(
            line_number,
            format!("invalid entry name '{name}'"),
        ));
    }

    let value = parse_entry_value(raw_value, line_number)?;

    Ok(Entry::new(name, value))
}

fn parse_entry_value(raw: &str, line_number: usize) -> Result<EntryValue, GameConfigError> {
    if raw == EMPTY_VALUE_CHARACTER.to_string() {
        return Ok(EntryValue::Empty);
    }

    if raw.starts_with('"') {
        let values = parse_quoted_strings(raw, line_number)?;

        return Ok(if values.len() == 1 {
            EntryValue::Str(values.into_iter().next().expect("length checked"))
        } else {
            EntryValue::MultiString(values)
        });
    }

    if let Some(digits) = raw.strip_prefix("0x") {
        let value = i64::from_str_radix(digits, 16).map_err(|error| {
            GameConfigError::parse(line_number, format!("bad hex value '{raw}': {error}"))
        })?;

        return Ok(EntryValue::Hexadecimal(value));
    }

    let value = raw.parse::<i64>().map_err(|error| {
        GameConfigError::parse(line_number, format!("bad value '{raw}': {error}"))
    })?;

    Ok(EntryValue::Integer(value))
}

fn parse_quoted_strings(raw: &str, line_number: usize) -> Result<Vec<String>, GameConfigError> {
    let mut values = Vec::new();
    let mut rest = raw;

    loop {
        rest = rest.trim_start();

        if rest.is_empty() {
            break;
        }

        let Some(after_open) = rest.strip_prefix('"') else {
            return Err(GameConfigError::parse(
                line_number,
                format!("expected opening quote in '{raw}'"),
            ));
        };

        let Some(close) = after_open.find('"') else {
            return Err(GameConfigError::parse(
                line_number,
                format!("unterminated string in '{raw}'"),
            ));
        };

        values.push(after_open[..close].to_string());
        rest = &after_open[close + 1..];
    }

    if values.is_empty() {
        return Err(GameConfigError::parse(
            line_number,
            format!("expected at least one quoted string in '{raw}'"),
        ));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[Setup]
;Setup File for Duke Nukem 3D
SetupVersion = \"1.4\"

;
;
[Sound Setup]
FXDevice = 13
MixRate = 11000
MidiPort = 0x330
IrqNumber = ~
Move_Forward = \"Up\" \"Kpad8\"
";

    #[test]
    fn parse_recognizes_every_value_kind() {
        let document = GameConfiguration::parse_from(SAMPLE).unwrap();

        assert_eq!(
            document.entry_with_name("SetupVersion").unwrap().value,
            EntryValue::Str("1.4".into())
        );
        assert_eq!(
            document.entry_with_name("FXDevice").unwrap().value,
            EntryValue::Integer(13)
        );
        assert_eq!(
            document.entry_with_name("MidiPort").unwrap().value,
            EntryValue::Hexadecimal(0x330)
        );
        assert_eq!(
            document.entry_with_name("IrqNumber").unwrap().value,
            EntryValue::Empty
        );
        assert_eq!(
            document.entry_with_name("Move_Forward").unwrap().value,
            EntryValue::MultiString(vec!["Up".into(), "Kpad8".into()])
        );
    }

    #[test]
    fn round_trip_is_byte_exact() {
        let document = GameConfiguration::parse_from(SAMPLE).unwrap();
        assert_eq!(document.to_string(), SAMPLE);

        let again = GameConfiguration::parse_from(&document.to_string()).unwrap();
        assert_eq!(document, again);
    }

    #[test]
    fn comments_attach_to_the_right_section() {
        let document = GameConfiguration::parse_from(SAMPLE).unwrap();

        let setup = document.section_with_name("Setup").unwrap();
        assert!(setup.preceding_comments.is_empty());
        assert_eq!(setup.following_comments, vec!["Setup File for Duke Nukem 3D"]);

        let sound = document.section_with_name("Sound Setup").unwrap();
        assert_eq!(sound.preceding_comments, vec![" ", " "]);
        assert!(sound.following_comments.is_empty());
    }

    #[test]
    fn lookups_ignore_case() {
        let document = GameConfiguration::parse_from(SAMPLE).unwrap();

        assert!(document.has_section_with_name("sound setup"));
        assert!(document.has_entry_with_name("fxdevice"));
        assert!(!document.has_entry_with_name("Unknown"));
    }

    #[test]
    fn entry_outside_section_is_a_hard_error() {
        let error = GameConfiguration::parse_from("Orphan = 1\n[Setup]\n").unwrap_err();
        assert!(matches!(error, GameConfigError::Parse { line: 1, .. }));
    }

    #[test]
    fn duplicate_entry_names_across_sections_are_rejected() {
        let data = "[A]\nName = 1\n\n[B]\nNAME = 2\n";
        assert!(GameConfiguration::parse_from(data).is_err());
    }

    #[test]
    fn duplicate_section_names_are_rejected() {
        let data = "[A]\nX = 1\n\n[a]\nY = 2\n";
        assert!(GameConfiguration::parse_from(data).is_err());
    }

    #[test]
    fn unterminated_header_and_strings_are_rejected() {
        assert!(GameConfiguration::parse_from("[Setup\n").is_err());
        assert!(GameConfiguration::parse_from("[Setup]\nX = \"open\n").is_err());
        assert!(GameConfiguration::parse_from("[Setup]\nX = banana\n").is_err());
    }

    #[test]
    fn set_entry_value_updates_and_creates() {
        let mut document = GameConfiguration::parse_from(SAMPLE).unwrap();

        document
            .set_entry_value("Sound Setup", "MixRate", EntryValue::Integer(44000), false)
            .unwrap();
        assert_eq!(
            document.entry_with_name("MixRate").unwrap().value.as_integer(),
            Some(44000)
        );

        assert!(document
            .set_entry_value("Sound Setup", "Shadows", EntryValue::Integer(1), false)
            .is_err());

        document
            .set_entry_value("Sound Setup", "Shadows", EntryValue::Integer(1), true)
            .unwrap();
        assert!(document.has_entry_with_name("Shadows"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let document = GameConfiguration::parse_from(SAMPLE).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DUKE3D.CFG");
        document.save_to(&path).unwrap();

        let loaded = GameConfiguration::load_from(&path).unwrap();
        assert_eq!(document.sections(), loaded.sections());
        assert_eq!(loaded.file_path(), Some(path.as_path()));
    }

    #[test]
    fn crlf_input_is_tolerated() {
        let data = SAMPLE.replace('\n', "\r\n");
        let document = GameConfiguration::parse_from(&data).unwrap();
        assert!(document.has_entry_with_name("SetupVersion"));
    }
}
