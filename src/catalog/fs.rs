//! Module to discover audio files in the library directory

use walkdir::WalkDir;

use std::path::{Path, PathBuf};

use crate::catalog::error::CatalogError;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "ogg", "flac", "wav"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collects all audio files under `root`, sorted by path so that
/// repeated scans visit files in a deterministic order.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let root_str = root.to_string_lossy();

    let mut paths = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("error while scanning {root_str}, skipping an entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| is_audio_file(p))
        .collect::<Vec<_>>();

    paths.sort();
    paths.dedup();
    Ok(paths)
}
