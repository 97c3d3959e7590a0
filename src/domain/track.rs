use serde::{Deserialize, Serialize};

use super::id::TrackId;

/// Canonical merged metadata unit for one audio file's content.
///
/// Created the first time a content hash is seen, mutated in place by the
/// resolver (tag/heuristic merge), the sync engine (upload state) and the
/// enrichment pass (backfill of missing fields). Never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: TrackId,
    pub original_path: String,
    pub original_filename: String,
    pub file_size: u64,

    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub track_num: Option<u32>,
    pub genre: Option<String>,

    /// Duration in whole seconds, from the audio stream.
    pub duration: Option<u64>,
    pub bitrate: Option<u32>,
    pub sample_rate: Option<u32>,

    /// Local path of the extracted cover image, set at most once.
    pub artwork_path: Option<String>,

    /// Derived: true iff `artist` is present. Recomputed after every merge,
    /// never set directly.
    pub tagged: bool,

    #[serde(default)]
    pub uploaded: bool,
    #[serde(default)]
    pub remote_path: Option<String>,
    #[serde(default)]
    pub remote_artwork_path: Option<String>,

    pub extracted_at: String,
    /// Timestamp of the last metadata mutation, not of creation.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl TrackRecord {
    pub fn new(
        id: TrackId,
        original_path: String,
        original_filename: String,
        file_size: u64,
        extracted_at: String,
    ) -> Self {
        Self {
            id,
            original_path,
            original_filename,
            file_size,
            artist: None,
            album: None,
            title: None,
            year: None,
            track_num: None,
            genre: None,
            duration: None,
            bitrate: None,
            sample_rate: None,
            artwork_path: None,
            tagged: false,
            uploaded: false,
            remote_path: None,
            remote_artwork_path: None,
            extracted_at,
            updated_at: None,
        }
    }

    /// Marks the record uploaded. The remote path is required so that
    /// `uploaded == true` always implies a non-null remote path.
    pub fn mark_uploaded(&mut self, remote_path: String) {
        self.remote_path = Some(remote_path);
        self.uploaded = true;
    }
}
