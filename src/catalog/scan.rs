//! Ingestion pipeline: discovered files -> resolved catalog records.
//!
//! Resume semantics are path-keyed: any path already present in the catalog
//! is skipped wholesale, with no re-hashing and no re-extraction. Progress is
//! checkpointed by whole-catalog rewrite every N processed records and once
//! unconditionally at the end, so a crash loses at most one batch.

use std::{fs, path::Path};

use crate::{
    catalog::{
        error::CatalogError,
        fs::discover_files,
        store::{ARTWORK_DIR, Catalog, now_utc},
    },
    domain::{filename::parse_filename, id::TrackId, resolve::merge_missing, track::TrackRecord},
    extract,
};

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 0 disables periodic checkpoints.
    pub checkpoint_every: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { checkpoint_every: 50 }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub found: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Scanner<'a> {
    output_dir: &'a Path,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(output_dir: &'a Path, options: ScanOptions) -> Self {
        Self { output_dir, options }
    }

    /// Scans `library_root` and extends the catalog with every audio file
    /// not already present, persisting to `catalog_path` as it goes.
    pub fn scan(
        &self,
        library_root: &Path,
        catalog: &mut Catalog,
        catalog_path: &Path,
    ) -> Result<ScanReport, CatalogError> {
        let artwork_dir = self.output_dir.join(ARTWORK_DIR);
        // Output layout must exist before any record is produced.
        fs::create_dir_all(&artwork_dir)?;

        let files = discover_files(library_root)?;
        let mut report = ScanReport {
            found: files.len(),
            ..Default::default()
        };
        println!("Found {} audio files", files.len());

        for (i, path) in files.iter().enumerate() {
            let key = path.to_string_lossy().into_owned();
            if catalog.contains_path(&key) {
                report.skipped += 1;
                continue;
            }

            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("[{}/{}] Processing: {}", i + 1, files.len(), filename);

            match self.process_file(path, &key, &filename, &artwork_dir) {
                Ok(record) => {
                    catalog.insert(record);
                    report.processed += 1;
                    // 0 disables periodic checkpoints; the final save still
                    // runs.
                    if self.options.checkpoint_every > 0
                        && report.processed % self.options.checkpoint_every == 0
                    {
                        catalog.save(catalog_path)?;
                        println!(
                            "  Checkpoint saved ({} new, {} skipped)",
                            report.processed, report.skipped
                        );
                    }
                }
                Err(e) => {
                    log::warn!("failed to process {}: {e:#}", path.display());
                    report.failed += 1;
                }
            }
        }

        catalog.save(catalog_path)?;
        Ok(report)
    }

    /// Builds one record: content id, tag extraction, filename heuristics,
    /// fill-only merge in that order, plus artwork spill to disk. Tag and
    /// artwork trouble stays per-record; only an unreadable source file is
    /// an error here, and the caller treats that as per-file too.
    fn process_file(
        &self,
        path: &Path,
        key: &str,
        filename: &str,
        artwork_dir: &Path,
    ) -> anyhow::Result<TrackRecord> {
        let id = TrackId::from_file(path)?;
        let file_size = fs::metadata(path)?.len();

        let mut record = TrackRecord::new(
            id,
            key.to_string(),
            filename.to_string(),
            file_size,
            now_utc(),
        );

        let extracted = extract::read_partial(path);
        record.duration = extracted.duration;
        record.bitrate = extracted.bitrate;
        record.sample_rate = extracted.sample_rate;

        merge_missing(&mut record, &extracted.meta);
        merge_missing(&mut record, &parse_filename(filename).into());

        if let Some(blob) = extracted.artwork {
            let artwork_path = artwork_dir.join(format!("{}.{}", record.id, blob.ext));
            match fs::write(&artwork_path, &blob.data) {
                Ok(()) => {
                    record.artwork_path = Some(artwork_path.to_string_lossy().into_owned());
                }
                Err(e) => {
                    log::warn!(
                        "could not write artwork {}: {e}",
                        artwork_path.display()
                    );
                }
            }
        }

        Ok(record)
    }
}
