//! In-memory zip archive writer.
//!
//! Entries are accumulated in insertion order and only encoded when the
//! archive is finished, so an aborted generation leaves nothing behind.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::Result;

#[derive(Debug, Default)]
pub struct ArchiveWriter {
    entries: Vec<(String, Vec<u8>)>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Putting an existing path replaces its contents in place.
    pub fn put(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let path = path.into();
        let bytes = bytes.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = bytes,
            None => self.entries.push((path, bytes)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// Encode the archive. Timestamps are pinned so identical input gives
    /// byte-identical output.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, bytes) in &self.entries {
            writer.start_file(path.as_str(), options)?;
            writer.write_all(bytes).map_err(ZipError::Io)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

/// A finished archive plus the metadata the transport needs to return it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArchive {
    pub file_name: String,
    pub files: Vec<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl GeneratedArchive {
    pub const CONTENT_TYPE: &'static str = "application/zip";

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.file_name)
    }

    /// Hex SHA-256 of the archive bytes.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }
}
