//! Group-file containers: the game's native GRP format and the zip
//! containers the eDuke32 family accepts in its place.
//!
//! A GRP file is a 16-byte header (`KenSilverman` plus a little-endian
//! entry count) followed by one 16-byte record per entry (12-byte
//! zero-padded name, little-endian size) and the raw payloads
//! concatenated in record order.

use crate::collaborators::{GroupArchive, GroupOpener};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

const GRP_SIGNATURE: &[u8; 12] = b"KenSilverman";
const GRP_ENTRY_NAME_LENGTH: usize = 12;

#[derive(Debug, Clone)]
struct GroupEntry {
    name: String,
    size: u64,
    offset: u64,
}

/// A parsed GRP container.
#[derive(Debug)]
pub struct GroupFile {
    path: PathBuf,
    entries: Vec<GroupEntry>,
}

impl GroupFile {
    /// Open and index a GRP file. The payloads stay on disk until
    /// extraction.
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut file = std::fs::File::open(path)?;

        let mut signature = [0u8; 12];
        file.read_exact(&mut signature)?;

        if &signature != GRP_SIGNATURE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("'{}' is not a group file", path.display()),
            ));
        }

        let mut count_bytes = [0u8; 4];
        file.read_exact(&mut count_bytes)?;
        let entry_count = u32::from_le_bytes(count_bytes) as usize;

        let mut entries = Vec::with_capacity(entry_count);
        let mut record = [0u8; 16];

        for _ in 0..entry_count {
            file.read_exact(&mut record)?;

            let name_bytes = &record[..GRP_ENTRY_NAME_LENGTH];
            let name_end = name_bytes
                .iter()
                .position(|&byte| byte == 0)
                .unwrap_or(GRP_ENTRY_NAME_LENGTH);
            let name = String::from_utf8_lossy(&name_bytes[..name_end]).into_owned();

            let size = u32::from_le_bytes([record[12], record[13], record[14], record[15]]);

            entries.push(GroupEntry {
                name,
                size: u64::from(size),
                offset: 0,
            });
        }

        // Payloads start immediately after the record table.
        let mut offset = 16 + 16 * entry_count as u64;
        for entry in &mut entries {
            entry.offset = offset;
            offset += entry.size;
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn extract_entry(&self, entry: &GroupEntry, destination: &Path) -> io::Result<()> {
        let mut file = std::fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start(entry.offset))?;

        let mut payload = vec![0u8; entry.size as usize];
        file.read_exact(&mut payload)?;

        std::fs::write(destination.join(&entry.name), payload)
    }
}

impl GroupArchive for GroupFile {
    fn entry_names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    fn first_entry_with_name(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    fn extract_all_entries(&mut self, destination: &Path) -> io::Result<usize> {
        let entries = self.entries.clone();

        for entry in &entries {
            self.extract_entry(entry, destination)?;
        }

        Ok(entries.len())
    }

    fn extract_all_entries_with_extension(
        &mut self,
        extension: &str,
        destination: &Path,
    ) -> io::Result<usize> {
        let matching: Vec<GroupEntry> = self
            .entries
            .iter()
            .filter(|entry| has_extension(&entry.name, extension))
            .cloned()
            .collect();

        for entry in &matching {
            self.extract_entry(entry, destination)?;
        }

        Ok(matching.len())
    }
}

/// Build a GRP container in memory. Test and tooling helper.
pub fn write_group_file(path: &Path, entries: &[(&str, &[u8])]) -> io::Result<()> {
    let mut data = Vec::new();

    data.extend_from_slice(GRP_SIGNATURE);
    data.extend_from_slice(&(entries.len() as u32).to_le_bytes());

    for (name, payload) in entries {
        let mut record = [0u8; 16];
        let name_bytes = name.as_bytes();

        if name_bytes.len() > GRP_ENTRY_NAME_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("entry name '{name}' exceeds {GRP_ENTRY_NAME_LENGTH} bytes"),
            ));
        }

        record[..name_bytes.len()].copy_from_slice(name_bytes);
        record[12..].copy_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&record);
    }

    for (_, payload) in entries {
        data.extend_from_slice(payload);
    }

    std::fs::write(path, data)
}

/// A zip container adapted to the group interface.
pub struct ZipGroupArchive {
    archive: zip::ZipArchive<std::fs::File>,
}

impl ZipGroupArchive {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let archive = zip::ZipArchive::new(file)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;

        Ok(Self { archive })
    }
}

impl GroupArchive for ZipGroupArchive {
    fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    fn first_entry_with_name(&self, name: &str) -> Option<usize> {
        self.archive
            .file_names()
            .position(|entry| entry.eq_ignore_ascii_case(name))
    }

    fn extract_all_entries(&mut self, destination: &Path) -> io::Result<usize> {
        self.extract_matching(destination, |_| true)
    }

    fn extract_all_entries_with_extension(
        &mut self,
        extension: &str,
        destination: &Path,
    ) -> io::Result<usize> {
        self.extract_matching(destination, |name| has_extension(name, extension))
    }
}

impl ZipGroupArchive {
    fn extract_matching(
        &mut self,
        destination: &Path,
        matches: impl Fn(&str) -> bool,
    ) -> io::Result<usize> {
        let mut extracted = 0;

        for index in 0..self.archive.len() {
            let mut entry = self
                .archive
                .by_index(index)
                .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;

            if entry.is_dir() || !matches(entry.name()) {
                continue;
            }

            // Flatten into the destination; group containers have no
            // directory structure.
            let file_name = entry
                .name()
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or(entry.name())
                .to_string();

            let mut payload = Vec::new();
            entry.read_to_end(&mut payload)?;
            std::fs::write(destination.join(file_name), payload)?;

            extracted += 1;
        }

        Ok(extracted)
    }
}

fn has_extension(name: &str, extension: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, found)) => found.eq_ignore_ascii_case(extension),
        None => false,
    }
}

/// Default opener backed by [`GroupFile`] and [`ZipGroupArchive`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeGroupOpener;

impl GroupOpener for NativeGroupOpener {
    fn open_group(&self, path: &Path) -> io::Result<Box<dyn GroupArchive>> {
        Ok(Box::new(GroupFile::open(path)?))
    }

    fn open_zip(&self, path: &Path) -> io::Result<Box<dyn GroupArchive>> {
        Ok(Box::new(ZipGroupArchive::open(path)?))
    }
}
