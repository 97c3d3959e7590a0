//! Durable local catalog: path -> TrackRecord, persisted as one JSON
//! document.
//!
//! Loaded wholesale at startup, mutated in memory, and written back by
//! whole-state atomic rewrite (serialize to a temp file, then rename over
//! the target). Callers own the checkpoint cadence.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::error::CatalogError,
    domain::{id::TrackId, track::TrackRecord},
};

pub const CATALOG_FILE: &str = "catalog.json";
pub const ARTWORK_DIR: &str = "artwork";

const CATALOG_VERSION: u32 = 1;

/// The local, authoritative, resumable database of all discovered files.
///
/// Keyed by original path: resume skips any path already present, so a
/// renamed duplicate is reprocessed as new (the sync engine dedups it by
/// content id at upload time).
#[derive(Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    pub generated: Option<String>,
    pub tracks: BTreeMap<String, TrackRecord>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            generated: None,
            tracks: BTreeMap::new(),
        }
    }
}

impl Catalog {
    /// Loads the catalog, failing fast if the file is unreadable or corrupt.
    /// A structurally broken catalog must abort the run before anything is
    /// mutated.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| CatalogError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the catalog if present; a missing file yields an empty catalog.
    /// Corruption is still fatal.
    pub fn load_or_default(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Whole-state atomic rewrite: temp file in the same directory, then
    /// rename over the target. Refreshes `generated`.
    pub fn save(&mut self, path: &Path) -> Result<(), CatalogError> {
        self.generated = Some(now_utc());

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Internal(e.into()))?;

        let tmp = tmp_path(path);
        fs::write(&tmp, json).map_err(|source| CatalogError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.tracks.contains_key(path)
    }

    pub fn insert(&mut self, record: TrackRecord) {
        self.tracks.insert(record.original_path.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Remote path of any already-uploaded record carrying this content id.
    /// Used by the sync engine to avoid transferring the same bytes twice
    /// under two catalog entries.
    pub fn uploaded_remote_path(&self, id: &TrackId) -> Option<String> {
        self.tracks
            .values()
            .find(|rec| rec.uploaded && rec.id == *id)
            .and_then(|rec| rec.remote_path.clone())
    }
}

/// UTC timestamp in the "2026-01-01T00:00:00Z" shape used by the catalog and
/// the manifest.
pub fn now_utc() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}
