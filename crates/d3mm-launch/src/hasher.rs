//! Default SHA-1 hasher.

use crate::collaborators::FileHasher;
use sha1::{Digest, Sha1};
use std::io::{self, Read};
use std::path::Path;

/// Streaming SHA-1 over local files, emitting lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1FileHasher;

impl Sha1FileHasher {
    pub fn new() -> Self {
        Self
    }

    /// Digest an in-memory buffer.
    pub fn hash_bytes(data: &[u8]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(data);
        to_hex(&hasher.finalize())
    }
}

impl FileHasher for Sha1FileHasher {
    fn compute_file_sha1(&self, path: &Path) -> io::Result<String> {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha1::new();
        let mut buffer = [0u8; 64 * 1024];

        loop {
            let read = file.read(&mut buffer)?;

            if read == 0 {
                break;
            }

            hasher.update(&buffer[..read]);
        }

        Ok(to_hex(&hasher.finalize()))
    }
}

fn to_hex(digest: &[u8]) -> String {
    let mut hex = String::with_capacity(digest.len() * 2);

    for byte in digest {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }

    hex
}
