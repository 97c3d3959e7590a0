//! External metadata lookup over a MusicBrainz-style recording search.
//!
//! The service is an unreliable collaborator: every transport, HTTP, and
//! parse failure degrades to "no enrichment result" with a logged warning.
//! Queries are spaced by a fixed minimum delay to respect the service's
//! rate limit.

use std::{
    cell::RefCell,
    thread,
    time::{Duration, Instant},
};

use serde::Deserialize;

use crate::{config::EnrichConfig, domain::resolve::PartialMeta, extract::parse_year};

/// Best-guess metadata for one recording, as returned by the lookup service.
/// Only the first candidate of a search is ever used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
}

impl From<Candidate> for PartialMeta {
    fn from(c: Candidate) -> Self {
        Self {
            artist: c.artist,
            album: c.album,
            title: c.title,
            year: c.year,
            ..Default::default()
        }
    }
}

/// Seam over the lookup service so sync logic can run against a stub.
pub trait Lookup {
    fn best_match(&self, artist: Option<&str>, title: Option<&str>) -> Option<Candidate>;
}

pub struct LookupClient {
    agent: ureq::Agent,
    endpoint: String,
    user_agent: String,
    min_delay: Duration,
    last_query: RefCell<Option<Instant>>,
}

impl LookupClient {
    pub fn new(config: &EnrichConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();

        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            min_delay: Duration::from_millis(config.min_delay_ms),
            last_query: RefCell::new(None),
        }
    }

    /// Searches for a best-match recording. Prefers a combined artist+title
    /// query; falls back to title-only when the artist is unknown. Returns
    /// `None` when neither search term exists, nothing matched, or the
    /// service misbehaved.
    pub fn best_match(&self, artist: Option<&str>, title: Option<&str>) -> Option<Candidate> {
        let query = match (artist, title) {
            (Some(artist), Some(title)) => {
                format!("artist:\"{artist}\" AND recording:\"{title}\"")
            }
            (None, Some(title)) => format!("recording:\"{title}\""),
            _ => return None,
        };

        self.throttle();

        match self.search(&query) {
            Ok(candidate) => candidate,
            Err(e) => {
                log::warn!("lookup service error for {query:?}: {e}");
                None
            }
        }
    }

    /// Enforces the minimum spacing between consecutive queries.
    fn throttle(&self) {
        let mut last = self.last_query.borrow_mut();
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.min_delay {
                thread::sleep(self.min_delay - elapsed);
            }
        }
        *last = Some(Instant::now());
    }

    fn search(&self, query: &str) -> anyhow::Result<Option<Candidate>> {
        let url = format!("{}/recording", self.endpoint);
        let response: SearchResponse = self
            .agent
            .get(&url)
            .set("User-Agent", &self.user_agent)
            .query("query", query)
            .query("fmt", "json")
            .query("limit", "5")
            .call()?
            .into_json()?;

        Ok(response.recordings.into_iter().next().map(Candidate::from))
    }
}

impl Lookup for LookupClient {
    fn best_match(&self, artist: Option<&str>, title: Option<&str>) -> Option<Candidate> {
        LookupClient::best_match(self, artist, title)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    recordings: Vec<Recording>,
}

#[derive(Debug, Deserialize)]
struct Recording {
    title: Option<String>,
    #[serde(rename = "artist-credit", default)]
    artist_credit: Vec<ArtistCredit>,
    #[serde(default)]
    releases: Vec<Release>,
}

#[derive(Debug, Deserialize)]
struct ArtistCredit {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Release {
    title: Option<String>,
    date: Option<String>,
}

impl From<Recording> for Candidate {
    fn from(rec: Recording) -> Self {
        let release = rec.releases.into_iter().next();
        Self {
            artist: rec.artist_credit.into_iter().next().and_then(|c| c.name),
            album: release.as_ref().and_then(|r| r.title.clone()),
            year: release
                .as_ref()
                .and_then(|r| r.date.as_deref())
                .and_then(parse_year),
            title: rec.title,
        }
    }
}
