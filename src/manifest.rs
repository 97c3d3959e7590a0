//! The publish-facing manifest: a derived projection of the catalog's
//! uploaded subset.
//!
//! Always rebuilt wholesale from catalog state and overwritten remotely as
//! one document; it is never patched incrementally and never edited by hand,
//! which keeps it consistent with the local catalog by construction.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::store::{Catalog, now_utc},
    domain::resolve::is_tagged,
    enrich::Candidate,
};

pub const MANIFEST_KEY: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub generated: String,
    pub tracks: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub path: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<u64>,
    pub artwork: Option<String>,
    pub tagged: bool,
}

impl Manifest {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            generated: now_utc(),
            tracks: Vec::new(),
        }
    }

    /// Pure projection over every record with `uploaded == true`. Records
    /// without a confirmed remote write never appear.
    pub fn project(catalog: &Catalog) -> Self {
        let tracks = catalog
            .tracks
            .values()
            .filter(|rec| rec.uploaded)
            .filter_map(|rec| {
                let Some(path) = rec.remote_path.clone() else {
                    // uploaded implies a remote path; a violation means the
                    // catalog was edited by hand.
                    log::warn!("record {} marked uploaded without remote path", rec.id);
                    return None;
                };
                Some(ManifestEntry {
                    id: rec.id.to_string(),
                    path,
                    artist: rec.artist.clone(),
                    album: rec.album.clone(),
                    title: rec.title.clone(),
                    year: rec.year,
                    duration: rec.duration,
                    artwork: rec.remote_artwork_path.clone(),
                    tagged: rec.tagged,
                })
            })
            .collect();

        Self {
            version: MANIFEST_VERSION,
            generated: now_utc(),
            tracks,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl ManifestEntry {
    /// Fill-only-if-missing backfill from an enrichment candidate, the same
    /// precedence rule the catalog-side resolver applies. Recomputes
    /// `tagged`; returns whether anything changed.
    pub fn fill_missing(&mut self, candidate: &Candidate) -> bool {
        let mut changed = false;
        changed |= fill(&mut self.artist, &candidate.artist);
        changed |= fill(&mut self.album, &candidate.album);
        changed |= fill(&mut self.title, &candidate.title);
        changed |= fill(&mut self.year, &candidate.year);
        self.tagged = is_tagged(self.artist.as_deref());
        changed
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) -> bool {
    if slot.is_none() && value.is_some() {
        *slot = value.clone();
        true
    } else {
        false
    }
}
