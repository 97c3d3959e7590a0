use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub library: Library,
    pub output: Output,
    pub remote: Remote,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub enrich: EnrichConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "failed to parse config TOML")
    }
}

#[derive(Debug, Deserialize)]
pub struct Library {
    /// Directory scanned for audio files.
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Output {
    /// Directory holding the catalog file and extracted artwork.
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Remote {
    /// Root of the object store the uploads and the manifest go to.
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// 0 disables periodic checkpoints; the final save always runs.
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,
    #[serde(default)]
    pub delete_after_upload: bool,
    #[serde(default)]
    pub skip_artwork: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            checkpoint_every: default_checkpoint_every(),
            delete_after_upload: false,
            skip_artwork: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Minimum delay between consecutive lookup queries.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            min_delay_ms: default_min_delay_ms(),
        }
    }
}

fn default_checkpoint_every() -> usize {
    50
}

fn default_endpoint() -> String {
    "https://musicbrainz.org/ws/2".to_string()
}

fn default_user_agent() -> String {
    format!("waxcrate/{}", env!("CARGO_PKG_VERSION"))
}

fn default_min_delay_ms() -> u64 {
    1000
}
