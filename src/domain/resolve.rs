//! Fill-only-if-missing metadata merging.
//!
//! Every metadata source (embedded tags, filename heuristics, external
//! lookup) produces a [`PartialMeta`]; the same reducer applies them all, so
//! precedence is purely the order in which sources are merged. A field that
//! already holds a value is never overwritten by a later source.

use super::{filename::FilenameGuess, track::TrackRecord};

/// A partial view of the describable metadata fields, as produced by one
/// source. All fields optional; absent means "this source has no opinion".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMeta {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub track_num: Option<u32>,
    pub genre: Option<String>,
}

impl From<FilenameGuess> for PartialMeta {
    fn from(guess: FilenameGuess) -> Self {
        Self {
            artist: guess.artist,
            album: guess.album,
            title: guess.title,
            track_num: guess.track_num,
            ..Default::default()
        }
    }
}

fn fill<T>(slot: &mut Option<T>, value: &Option<T>) -> bool
where
    T: Clone,
{
    if slot.is_none() && value.is_some() {
        *slot = value.clone();
        true
    } else {
        false
    }
}

/// Merges `src` into `record`, filling only fields that are still null.
/// Recomputes `tagged` and returns whether anything changed.
pub fn merge_missing(record: &mut TrackRecord, src: &PartialMeta) -> bool {
    let mut changed = false;
    changed |= fill(&mut record.artist, &src.artist);
    changed |= fill(&mut record.album, &src.album);
    changed |= fill(&mut record.title, &src.title);
    changed |= fill(&mut record.year, &src.year);
    changed |= fill(&mut record.track_num, &src.track_num);
    changed |= fill(&mut record.genre, &src.genre);
    record.tagged = is_tagged(record.artist.as_deref());
    changed
}

/// Canonical `tagged` predicate: a record counts as tagged once it has an
/// artist. Titles always exist (the filename stem fallback), so they carry
/// no signal.
pub fn is_tagged(artist: Option<&str>) -> bool {
    artist.is_some_and(|a| !a.trim().is_empty())
}
