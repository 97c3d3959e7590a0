//! Embedded tag and audio property extraction.
//!
//! Wraps lofty so the rest of the pipeline only sees `PartialMeta` plus
//! audio properties. Extraction never fails a record: unreadable or untagged
//! files degrade to an empty partial result with a logged warning.
//!
//! A single mapping table drives text extraction: logical field -> ordered
//! candidate tag keys. Lofty normalizes ID3v2 / Vorbis / MP4 keys into
//! `ItemKey`, so the same table covers every supported container.

use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::MimeType;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::domain::resolve::PartialMeta;

/// Embedded images below this size are placeholder icons, not cover art.
const MIN_ARTWORK_BYTES: usize = 1024;

/// Candidate tag keys per text field, in priority order.
const ARTIST_KEYS: &[ItemKey] = &[ItemKey::TrackArtist, ItemKey::AlbumArtist];
const ALBUM_KEYS: &[ItemKey] = &[ItemKey::AlbumTitle];
const TITLE_KEYS: &[ItemKey] = &[ItemKey::TrackTitle];
const GENRE_KEYS: &[ItemKey] = &[ItemKey::Genre];
const YEAR_KEYS: &[ItemKey] = &[
    ItemKey::RecordingDate,
    ItemKey::Year,
    ItemKey::OriginalReleaseDate,
];
const TRACK_KEYS: &[ItemKey] = &[ItemKey::TrackNumber];

/// Everything the container exposed for one file. All fields optional;
/// missing or malformed tags simply leave them unset.
#[derive(Debug, Default)]
pub struct Extracted {
    pub meta: PartialMeta,
    pub duration: Option<u64>,
    pub bitrate: Option<u32>,
    pub sample_rate: Option<u32>,
    pub artwork: Option<ArtworkBlob>,
}

/// First qualifying embedded cover image.
#[derive(Debug)]
pub struct ArtworkBlob {
    pub data: Vec<u8>,
    pub ext: &'static str,
}

/// Reads whatever the file exposes. Never errors: probe/parse failures are
/// recoverable-per-record and produce an empty partial.
pub fn read_partial(path: &Path) -> Extracted {
    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("could not read tags from {}: {e}", path.display());
            return Extracted::default();
        }
    };

    let props = tagged_file.properties();
    let mut extracted = Extracted {
        duration: Some(props.duration().as_secs()),
        bitrate: props.audio_bitrate(),
        sample_rate: props.sample_rate(),
        ..Default::default()
    };

    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());
    let Some(tag) = tag else {
        log::debug!("no tags in {}", path.display());
        return extracted;
    };

    extracted.meta = PartialMeta {
        artist: first_string(tag, ARTIST_KEYS),
        album: first_string(tag, ALBUM_KEYS),
        title: first_string(tag, TITLE_KEYS),
        genre: first_string(tag, GENRE_KEYS),
        year: first_string(tag, YEAR_KEYS).as_deref().and_then(parse_year),
        track_num: first_string(tag, TRACK_KEYS)
            .as_deref()
            .and_then(parse_track_number),
    };
    extracted.artwork = pick_artwork(tag);

    extracted
}

fn first_string(tag: &Tag, keys: &[ItemKey]) -> Option<String> {
    keys.iter()
        .find_map(|key| tag.get_string(key))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Year values arrive as "1994", "1994-05-01", or full timestamps; the first
/// four characters are the year. Stricter than a bare prefix parse: values
/// shorter than four characters ("19") are rejected instead of being kept as
/// tiny year numbers. Parse failures leave the field null.
pub fn parse_year(value: &str) -> Option<i32> {
    let prefix: String = value.chars().take(4).collect();
    if prefix.chars().count() < 4 {
        return None;
    }
    prefix.parse().ok()
}

/// Track numbers arrive as "3" or "3/12"; keep the numerator.
pub fn parse_track_number(value: &str) -> Option<u32> {
    value.split('/').next()?.trim().parse().ok()
}

/// First embedded picture at or above the size floor, across whatever
/// embedding convention the container uses.
fn pick_artwork(tag: &Tag) -> Option<ArtworkBlob> {
    tag.pictures()
        .iter()
        .find(|pic| pic.data().len() >= MIN_ARTWORK_BYTES)
        .map(|pic| ArtworkBlob {
            data: pic.data().to_vec(),
            ext: match pic.mime_type() {
                Some(MimeType::Jpeg) => "jpg",
                _ => "png",
            },
        })
}
