use std::{fmt, fs::File, io, path::Path};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// Number of hex characters kept from the digest (48 bits).
const ID_HEX_LEN: usize = 12;

/// Stable, content-derived track identity.
///
/// Derived purely from file bytes, never from path or filesystem metadata,
/// so byte-identical files collapse to the same id wherever they live.
/// Collisions at 48 bits are treated as "same logical track" by design;
/// the id doubles as the deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(truncate_hex(blake3::hash(bytes)))
    }

    /// Hashes the full byte stream of the file without loading it into memory.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let mut file = File::open(path)
            .with_context(|| format!("failed to open {} for hashing", path.display()))?;
        let mut hasher = blake3::Hasher::new();
        io::copy(&mut file, &mut hasher)
            .with_context(|| format!("failed to read {} for hashing", path.display()))?;
        Ok(Self(truncate_hex(hasher.finalize())))
    }

    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        if hex.len() != ID_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid track id '{hex}'");
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn truncate_hex(hash: blake3::Hash) -> String {
    hash.to_hex().as_str()[..ID_HEX_LEN].to_string()
}
