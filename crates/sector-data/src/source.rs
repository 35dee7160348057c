//! Where raw sector text comes from.
//!
//! The pipeline only needs "give me the text for this source key"; the
//! [`RecordSource`] trait is that seam. [`DirectorySource`] reads one file per
//! sector from disk, [`MemorySource`] holds blobs handed over by a caller.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sector_core::error::{Result, SectorError};
use sector_core::models::Sector;
use tracing::{debug, warn};

/// Default file extension for on-disk sources.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Supplies the raw, line-oriented text for a source key.
pub trait RecordSource {
    /// Full text of the source. Must fail with
    /// [`SectorError::SourceNotFound`] when the source does not exist.
    fn read(&self, key: &str) -> Result<String>;

    /// Whether a source exists for `key`.
    fn contains(&self, key: &str) -> bool;
}

// ── DirectorySource ───────────────────────────────────────────────────────────

/// Reads `<root>/<key>.<extension>` for each key.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, self.extension))
    }
}

impl RecordSource for DirectorySource {
    fn read(&self, key: &str) -> Result<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Read {} bytes from {}", text.len(), path.display());
                Ok(text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SectorError::SourceNotFound {
                key: key.to_string(),
                path,
            }),
            Err(e) => Err(SectorError::SourceRead {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }
}

// ── MemorySource ──────────────────────────────────────────────────────────────

/// Raw text blobs keyed by source key, e.g. handed over after a fetch.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    blobs: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the blob for `key`.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.blobs.insert(key.into(), text.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }
}

impl RecordSource for MemorySource {
    fn read(&self, key: &str) -> Result<String> {
        self.blobs
            .get(key)
            .cloned()
            .ok_or_else(|| SectorError::SourceNotFound {
                key: key.to_string(),
                path: PathBuf::from(key),
            })
    }

    fn contains(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }
}

// ── Presence check ────────────────────────────────────────────────────────────

/// Sectors whose source is absent, in display order.
///
/// Callers run this before building a catalog to decide whether the data
/// still has to be fetched.
pub fn missing_sources<S: RecordSource + ?Sized>(source: &S) -> Vec<Sector> {
    let missing: Vec<Sector> = Sector::ALL
        .into_iter()
        .filter(|s| !source.contains(s.symbol()))
        .collect();
    if !missing.is_empty() {
        warn!(
            "{} of {} sector sources missing",
            missing.len(),
            Sector::ALL.len()
        );
    }
    missing
}

/// `true` when every known sector has a source.
pub fn all_sources_present<S: RecordSource + ?Sized>(source: &S) -> bool {
    missing_sources(source).is_empty()
}
