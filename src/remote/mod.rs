//! Object-store collaborator contract.
//!
//! The transport itself is not this crate's business: anything that can put
//! and get named blobs in a bucket satisfies [`ObjectStore`]. [`DirStore`]
//! maps keys onto a local directory tree; it backs tests and local mirrors.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use thiserror::Error;

pub const CACHE_LONG: &str = "public, max-age=31536000, immutable";
pub const CACHE_NONE: &str = "no-cache";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to store object '{key}': {source}")]
    Put {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to fetch object '{key}': {source}")]
    Get {
        key: String,
        source: std::io::Error,
    },
}

/// Write-time object attributes. A filesystem store has nowhere to put
/// these; HTTP-fronted stores translate them into headers.
#[derive(Debug, Clone)]
pub struct PutOptions {
    pub content_type: String,
    pub cache_control: &'static str,
}

impl PutOptions {
    /// Long-lived caching for immutable blobs (audio, artwork).
    pub fn blob(path: &Path) -> Self {
        Self {
            content_type: content_type_for(path),
            cache_control: CACHE_LONG,
        }
    }

    /// No-cache for documents rewritten in place (the manifest).
    pub fn document() -> Self {
        Self {
            content_type: "application/json".to_string(),
            cache_control: CACHE_NONE,
        }
    }
}

/// Extension -> content-type, fixed for the formats the catalog handles and
/// delegated to `mime_guess` for anything else.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("wav", "audio/wav"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

pub fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    if let Some(ext) = ext {
        if let Some((_, ct)) = CONTENT_TYPES.iter().find(|(known, _)| *known == ext) {
            return ct.to_string();
        }
    }
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub trait ObjectStore {
    fn put_file(&self, key: &str, local: &Path, opts: &PutOptions) -> Result<(), RemoteError>;
    fn put_bytes(&self, key: &str, body: &[u8], opts: &PutOptions) -> Result<(), RemoteError>;
    /// `Ok(None)` when the object does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RemoteError>;
}

/// Filesystem-rooted object store. Keys become paths under `root`.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn target(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn prepare_parent(&self, key: &str) -> Result<PathBuf, RemoteError> {
        let target = self.target(key);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| RemoteError::Put {
                key: key.to_string(),
                source,
            })?;
        }
        Ok(target)
    }
}

impl ObjectStore for DirStore {
    fn put_file(&self, key: &str, local: &Path, _opts: &PutOptions) -> Result<(), RemoteError> {
        let target = self.prepare_parent(key)?;
        fs::copy(local, &target)
            .map(|_| ())
            .map_err(|source| RemoteError::Put {
                key: key.to_string(),
                source,
            })
    }

    fn put_bytes(&self, key: &str, body: &[u8], _opts: &PutOptions) -> Result<(), RemoteError> {
        let target = self.prepare_parent(key)?;
        fs::write(&target, body).map_err(|source| RemoteError::Put {
            key: key.to_string(),
            source,
        })
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RemoteError> {
        match fs::read(self.target(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(RemoteError::Get {
                key: key.to_string(),
                source,
            }),
        }
    }
}
