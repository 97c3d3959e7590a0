//! Reconciles the local catalog against the remote store: uploads pending
//! audio and artwork, maintains upload state, and rebuilds the remote
//! manifest from catalog state.
//!
//! Per-record state machine: not-uploaded -> uploading -> uploaded. The
//! uploaded transition happens only on a confirmed audio transfer; artwork
//! is best-effort and never gates it. Both the catalog and the manifest are
//! checkpointed every N successful transfers and once unconditionally at the
//! end, so a crash loses at most one batch of upload state.

use std::{fs, path::Path};

use thiserror::Error;

use crate::{
    catalog::{
        error::CatalogError,
        store::{Catalog, now_utc},
    },
    enrich::Lookup,
    manifest::{MANIFEST_KEY, Manifest},
    remote::{ObjectStore, PutOptions, RemoteError},
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    // Failures here are structural (manifest or catalog unwritable), not
    // per-file transfer trouble, which stays inside the run loop.
    #[error("remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("remote manifest is corrupt: {0}")]
    CorruptManifest(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub dry_run: bool,
    pub delete_originals: bool,
    pub skip_artwork: bool,
    /// 0 means unlimited.
    pub limit: usize,
    /// 0 disables periodic checkpoints.
    pub checkpoint_every: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            delete_originals: false,
            skip_artwork: false,
            limit: 0,
            checkpoint_every: 50,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    pub reused: usize,
    pub failed: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub dry_run: bool,
    /// Process every manifest entry, not just under-tagged ones.
    pub all: bool,
    /// 0 means unlimited.
    pub limit: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub examined: usize,
    pub updated: usize,
    pub skipped: usize,
}

pub struct SyncEngine<'a, S: ObjectStore> {
    store: &'a S,
    options: SyncOptions,
}

impl<'a, S: ObjectStore> SyncEngine<'a, S> {
    pub fn new(store: &'a S, options: SyncOptions) -> Self {
        Self { store, options }
    }

    /// Uploads every un-uploaded record, in catalog (path) order.
    ///
    /// Per-file failures (missing source, failed transfer) are counted and
    /// skipped with state unchanged, so the next run retries them. A record
    /// whose content id was already uploaded under another path reuses that
    /// remote object instead of transferring the bytes again.
    pub fn upload_pending(
        &self,
        catalog: &mut Catalog,
        catalog_path: &Path,
    ) -> Result<SyncReport, SyncError> {
        let mut pending: Vec<String> = catalog
            .tracks
            .iter()
            .filter(|(_, rec)| !rec.uploaded)
            .map(|(path, _)| path.clone())
            .collect();
        if self.options.limit > 0 {
            pending.truncate(self.options.limit);
        }

        println!("Tracks to upload: {}", pending.len());
        let mut report = SyncReport::default();

        for (i, key) in pending.iter().enumerate() {
            let Some(snapshot) = catalog.tracks.get(key).cloned() else {
                continue;
            };
            println!("[{}/{}] {}", i + 1, pending.len(), snapshot.original_filename);

            // Content dedup: same bytes already live remotely under another
            // catalog entry.
            if let Some(remote_path) = catalog.uploaded_remote_path(&snapshot.id) {
                if self.options.dry_run {
                    println!("  [dry-run] would reuse {remote_path}");
                } else if let Some(rec) = catalog.tracks.get_mut(key) {
                    rec.mark_uploaded(remote_path.clone());
                    rec.updated_at = Some(now_utc());
                    println!("  Reused {remote_path}");
                }
                report.reused += 1;
                self.maybe_checkpoint(&report, catalog, catalog_path)?;
                continue;
            }

            let source = Path::new(&snapshot.original_path);
            if !source.exists() {
                println!("  SKIP: source file not found");
                report.failed += 1;
                continue;
            }

            let ext = source
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_else(|| "mp3".to_string());
            let audio_key = format!("audio/{}.{}", snapshot.id, ext);

            if self.options.dry_run {
                println!("  [dry-run] would upload -> {audio_key}");
                if let Some(artwork) = &snapshot.artwork_path {
                    if !self.options.skip_artwork {
                        println!("  [dry-run] would upload artwork {artwork}");
                    }
                }
                report.uploaded += 1;
                continue;
            }

            if let Err(e) = self
                .store
                .put_file(&audio_key, source, &PutOptions::blob(source))
            {
                log::warn!("upload failed for {}: {e}", source.display());
                report.failed += 1;
                continue;
            }

            let remote_artwork = self.upload_artwork(&snapshot.artwork_path);

            if let Some(rec) = catalog.tracks.get_mut(key) {
                rec.mark_uploaded(audio_key);
                rec.remote_artwork_path = remote_artwork;
                rec.updated_at = Some(now_utc());
            }
            report.uploaded += 1;

            // Deletion strictly follows the uploaded transition, and a
            // failed delete never reverts it.
            if self.options.delete_originals {
                match fs::remove_file(source) {
                    Ok(()) => {
                        report.deleted += 1;
                        println!("  Uploaded and deleted");
                    }
                    Err(e) => {
                        log::warn!("could not delete {}: {e}", source.display());
                        println!("  Uploaded (delete failed)");
                    }
                }
            } else {
                println!("  Uploaded");
            }

            self.maybe_checkpoint(&report, catalog, catalog_path)?;
        }

        if !self.options.dry_run {
            self.checkpoint(catalog, catalog_path)?;
        }
        Ok(report)
    }

    /// Best-effort: a missing or unwritable cover leaves the record without
    /// artwork but never blocks the upload.
    fn upload_artwork(&self, artwork_path: &Option<String>) -> Option<String> {
        if self.options.skip_artwork {
            return None;
        }
        let local = Path::new(artwork_path.as_deref()?);
        if !local.exists() {
            log::warn!("artwork file missing: {}", local.display());
            return None;
        }
        let filename = local.file_name()?.to_string_lossy();
        let key = format!("artwork/{filename}");
        match self.store.put_file(&key, local, &PutOptions::blob(local)) {
            Ok(()) => Some(key),
            Err(e) => {
                log::warn!("artwork upload failed for {}: {e}", local.display());
                None
            }
        }
    }

    fn maybe_checkpoint(
        &self,
        report: &SyncReport,
        catalog: &mut Catalog,
        catalog_path: &Path,
    ) -> Result<(), SyncError> {
        // checkpoint_every == 0 disables periodic checkpoints; the final
        // save still runs.
        let successes = report.uploaded + report.reused;
        if !self.options.dry_run
            && self.options.checkpoint_every > 0
            && successes > 0
            && successes % self.options.checkpoint_every == 0
        {
            println!("  Checkpoint: saving catalog and manifest");
            self.checkpoint(catalog, catalog_path)?;
        }
        Ok(())
    }

    /// Durable write of both sides: the catalog locally, the manifest
    /// remotely. The manifest is always the full projection, overwritten
    /// wholesale.
    fn checkpoint(&self, catalog: &mut Catalog, catalog_path: &Path) -> Result<(), SyncError> {
        catalog.save(catalog_path)?;
        self.push_manifest(&Manifest::project(catalog))
    }

    fn push_manifest(&self, manifest: &Manifest) -> Result<(), SyncError> {
        let body = manifest.to_json().map_err(SyncError::CorruptManifest)?;
        self.store
            .put_bytes(MANIFEST_KEY, &body, &PutOptions::document())?;
        Ok(())
    }

    /// Enrichment re-scan: walks the remote manifest (not the local catalog)
    /// looking for under-tagged entries, backfills them from the lookup
    /// service, and re-uploads only the manifest when anything changed.
    /// Audio bytes are never touched.
    pub fn enrich_manifest<L: Lookup>(
        &self,
        lookup: &L,
        options: &EnrichOptions,
    ) -> Result<EnrichReport, SyncError> {
        let mut manifest = match self.store.get(MANIFEST_KEY)? {
            Some(bytes) => Manifest::from_json(&bytes).map_err(SyncError::CorruptManifest)?,
            None => Manifest::empty(),
        };
        println!("Manifest has {} track(s)", manifest.tracks.len());

        let mut report = EnrichReport::default();

        for entry in manifest.tracks.iter_mut() {
            if !options.all && entry.tagged && entry.artist.is_some() && entry.title.is_some() {
                continue;
            }
            if options.limit > 0 && report.examined >= options.limit {
                break;
            }
            report.examined += 1;

            if entry.artist.is_none() && entry.title.is_none() {
                // Nothing to search with; the manifest carries no filename.
                log::info!("no search terms for {}, skipping", entry.id);
                report.skipped += 1;
                continue;
            }

            println!(
                "Looking up: {} - {}",
                entry.artist.as_deref().unwrap_or("???"),
                entry.title.as_deref().unwrap_or("???"),
            );

            match lookup.best_match(entry.artist.as_deref(), entry.title.as_deref()) {
                Some(candidate) => {
                    if entry.fill_missing(&candidate) {
                        report.updated += 1;
                        println!(
                            "  Found: {} - {}",
                            entry.artist.as_deref().unwrap_or("???"),
                            entry.title.as_deref().unwrap_or("???"),
                        );
                    } else {
                        println!("  No new fields");
                    }
                }
                None => println!("  No results"),
            }
        }

        if report.updated > 0 {
            if self.options.dry_run || options.dry_run {
                println!("[dry-run] would update {} manifest entries", report.updated);
            } else {
                manifest.generated = now_utc();
                self.push_manifest(&manifest)?;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::store::CATALOG_FILE,
        domain::{id::TrackId, track::TrackRecord},
        enrich::Candidate,
        remote::DirStore,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Fixture {
        music: TempDir,
        output: TempDir,
        bucket: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                music: TempDir::new().unwrap(),
                output: TempDir::new().unwrap(),
                bucket: TempDir::new().unwrap(),
            }
        }

        fn store(&self) -> DirStore {
            DirStore::new(self.bucket.path().to_path_buf())
        }

        fn catalog_path(&self) -> PathBuf {
            self.output.path().join(CATALOG_FILE)
        }

        /// Creates a source file and its catalog record.
        fn add_track(&self, catalog: &mut Catalog, name: &str, contents: &[u8]) -> String {
            let path = self.music.path().join(name);
            std::fs::write(&path, contents).unwrap();
            let key = path.to_string_lossy().into_owned();

            let mut rec = TrackRecord::new(
                TrackId::from_bytes(contents),
                key.clone(),
                name.to_string(),
                contents.len() as u64,
                "2026-01-01T00:00:00Z".into(),
            );
            rec.artist = Some("Artist".into());
            rec.title = Some(name.trim_end_matches(".mp3").to_string());
            rec.tagged = true;
            catalog.insert(rec);
            key
        }
    }

    fn engine_options(checkpoint_every: usize) -> SyncOptions {
        SyncOptions {
            checkpoint_every,
            ..Default::default()
        }
    }

    #[test]
    fn upload_marks_records_and_rebuilds_manifest() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let key = fx.add_track(&mut catalog, "song.mp3", b"audio bytes");

        let engine = SyncEngine::new(&store, engine_options(50));
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.uploaded, 1);
        assert_eq!(report.failed, 0);

        let rec = &catalog.tracks[&key];
        assert!(rec.uploaded);
        let remote_path = rec.remote_path.clone().unwrap();
        assert!(remote_path.starts_with("audio/"));
        assert!(remote_path.ends_with(".mp3"));
        assert_eq!(store.get(&remote_path).unwrap(), Some(b"audio bytes".to_vec()));

        let manifest = Manifest::from_json(&store.get(MANIFEST_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(manifest.tracks.len(), 1);
        assert_eq!(manifest.tracks[0].path, remote_path);

        // Catalog checkpointed with the new state.
        let persisted = Catalog::load(&fx.catalog_path()).unwrap();
        assert!(persisted.tracks[&key].uploaded);
    }

    #[test]
    fn missing_source_is_skipped_and_stays_retryable() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let key = fx.add_track(&mut catalog, "gone.mp3", b"bytes");
        std::fs::remove_file(fx.music.path().join("gone.mp3")).unwrap();

        let engine = SyncEngine::new(&store, engine_options(50));
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.uploaded, 0);
        assert!(!catalog.tracks[&key].uploaded);
        assert!(catalog.tracks[&key].remote_path.is_none());
    }

    #[test]
    fn artwork_failure_does_not_gate_upload() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let key = fx.add_track(&mut catalog, "cover.mp3", b"bytes");
        // Points at a cover image that no longer exists.
        catalog.tracks.get_mut(&key).unwrap().artwork_path =
            Some("/nonexistent/cover.jpg".to_string());

        let engine = SyncEngine::new(&store, engine_options(50));
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.uploaded, 1);
        let rec = &catalog.tracks[&key];
        assert!(rec.uploaded);
        assert!(rec.remote_artwork_path.is_none());
    }

    #[test]
    fn artwork_uploads_alongside_audio() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let key = fx.add_track(&mut catalog, "withart.mp3", b"bytes");

        let art = fx.output.path().join("abc123.jpg");
        std::fs::write(&art, b"jpeg bytes").unwrap();
        catalog.tracks.get_mut(&key).unwrap().artwork_path =
            Some(art.to_string_lossy().into_owned());

        let engine = SyncEngine::new(&store, engine_options(50));
        engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        let rec = &catalog.tracks[&key];
        assert_eq!(rec.remote_artwork_path.as_deref(), Some("artwork/abc123.jpg"));
        assert_eq!(
            store.get("artwork/abc123.jpg").unwrap(),
            Some(b"jpeg bytes".to_vec())
        );
    }

    #[test]
    fn dry_run_mutates_nothing() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let key = fx.add_track(&mut catalog, "song.mp3", b"bytes");

        let engine = SyncEngine::new(
            &store,
            SyncOptions {
                dry_run: true,
                ..Default::default()
            },
        );
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.uploaded, 1);
        assert!(!catalog.tracks[&key].uploaded);
        assert!(!fx.catalog_path().exists());
        assert!(store.get(MANIFEST_KEY).unwrap().is_none());
        // Bucket untouched entirely.
        assert_eq!(std::fs::read_dir(fx.bucket.path()).unwrap().count(), 0);
    }

    #[test]
    fn duplicate_content_reuses_remote_object() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let first = fx.add_track(&mut catalog, "original.mp3", b"same bytes");
        let second = fx.add_track(&mut catalog, "renamed copy.mp3", b"same bytes");

        let engine = SyncEngine::new(&store, engine_options(50));
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.uploaded, 1);
        assert_eq!(report.reused, 1);

        let first_remote = catalog.tracks[&first].remote_path.clone().unwrap();
        let second_remote = catalog.tracks[&second].remote_path.clone().unwrap();
        assert_eq!(first_remote, second_remote);

        // Exactly one audio object in the bucket.
        let audio_objects = std::fs::read_dir(fx.bucket.path().join("audio"))
            .unwrap()
            .count();
        assert_eq!(audio_objects, 1);
    }

    #[test]
    fn delete_originals_removes_source_after_upload() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let key = fx.add_track(&mut catalog, "song.mp3", b"bytes");

        let engine = SyncEngine::new(
            &store,
            SyncOptions {
                delete_originals: true,
                ..Default::default()
            },
        );
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.deleted, 1);
        assert!(catalog.tracks[&key].uploaded);
        assert!(!fx.music.path().join("song.mp3").exists());
    }

    #[test]
    fn limit_caps_the_batch() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        fx.add_track(&mut catalog, "a.mp3", b"aaa");
        fx.add_track(&mut catalog, "b.mp3", b"bbb");
        fx.add_track(&mut catalog, "c.mp3", b"ccc");

        let engine = SyncEngine::new(
            &store,
            SyncOptions {
                limit: 2,
                ..Default::default()
            },
        );
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.uploaded, 2);
        assert_eq!(catalog.tracks.values().filter(|r| r.uploaded).count(), 2);
    }

    #[test]
    fn zero_checkpoint_interval_disables_periodic_saves_but_not_the_final_one() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut catalog = Catalog::default();
        let key = fx.add_track(&mut catalog, "song.mp3", b"bytes");

        let engine = SyncEngine::new(&store, engine_options(0));
        let report = engine.upload_pending(&mut catalog, &fx.catalog_path()).unwrap();

        assert_eq!(report.uploaded, 1);
        let persisted = Catalog::load(&fx.catalog_path()).unwrap();
        assert!(persisted.tracks[&key].uploaded);
    }

    /// Crash between checkpoints loses only the in-flight batch: with a
    /// checkpoint interval of 2 and a crash on the fifth transfer, the
    /// persisted catalog holds four uploaded records and the fifth stays
    /// retryable.
    #[test]
    fn crash_between_checkpoints_keeps_checkpointed_uploads() {
        use std::cell::Cell;
        use std::panic::{AssertUnwindSafe, catch_unwind};

        struct PanickyStore {
            inner: DirStore,
            audio_puts: Cell<usize>,
            panic_on: usize,
        }

        impl ObjectStore for PanickyStore {
            fn put_file(
                &self,
                key: &str,
                local: &Path,
                opts: &PutOptions,
            ) -> Result<(), RemoteError> {
                if key.starts_with("audio/") {
                    let n = self.audio_puts.get() + 1;
                    self.audio_puts.set(n);
                    if n == self.panic_on {
                        panic!("simulated crash mid-transfer");
                    }
                }
                self.inner.put_file(key, local, opts)
            }

            fn put_bytes(
                &self,
                key: &str,
                body: &[u8],
                opts: &PutOptions,
            ) -> Result<(), RemoteError> {
                self.inner.put_bytes(key, body, opts)
            }

            fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RemoteError> {
                self.inner.get(key)
            }
        }

        let fx = Fixture::new();
        let store = PanickyStore {
            inner: fx.store(),
            audio_puts: Cell::new(0),
            panic_on: 5,
        };

        let mut catalog = Catalog::default();
        for i in 0..5 {
            fx.add_track(&mut catalog, &format!("track{i}.mp3"), format!("bytes {i}").as_bytes());
        }

        let engine = SyncEngine::new(&store, engine_options(2));
        let crashed = catch_unwind(AssertUnwindSafe(|| {
            let _ = engine.upload_pending(&mut catalog, &fx.catalog_path());
        }));
        assert!(crashed.is_err());

        let persisted = Catalog::load(&fx.catalog_path()).unwrap();
        let uploaded = persisted.tracks.values().filter(|r| r.uploaded).count();
        assert_eq!(uploaded, 4);

        // The fifth record is still pending and would be retried.
        let pending = persisted.tracks.values().filter(|r| !r.uploaded).count();
        assert_eq!(pending, 1);
    }

    struct StubLookup {
        candidate: Option<Candidate>,
    }

    impl Lookup for StubLookup {
        fn best_match(&self, _artist: Option<&str>, _title: Option<&str>) -> Option<Candidate> {
            self.candidate.clone()
        }
    }

    fn seeded_manifest(store: &DirStore, entries: Vec<crate::manifest::ManifestEntry>) {
        let mut manifest = Manifest::empty();
        manifest.tracks = entries;
        store
            .put_bytes(MANIFEST_KEY, &manifest.to_json().unwrap(), &PutOptions::document())
            .unwrap();
    }

    fn untagged_entry(id: &str, title: Option<&str>) -> crate::manifest::ManifestEntry {
        crate::manifest::ManifestEntry {
            id: id.into(),
            path: format!("audio/{id}.mp3"),
            artist: None,
            album: None,
            title: title.map(Into::into),
            year: None,
            duration: None,
            artwork: None,
            tagged: false,
        }
    }

    #[test]
    fn enrich_backfills_manifest_and_reuploads_only_manifest() {
        let fx = Fixture::new();
        let store = fx.store();
        seeded_manifest(&store, vec![untagged_entry("aaa111bbb222", Some("Echoes"))]);

        let lookup = StubLookup {
            candidate: Some(Candidate {
                artist: Some("Jane Doe".into()),
                album: Some("First Album".into()),
                title: Some("Echoes (remaster)".into()),
                year: Some(1999),
            }),
        };

        let engine = SyncEngine::new(&store, SyncOptions::default());
        let report = engine
            .enrich_manifest(
                &lookup,
                &EnrichOptions {
                    dry_run: false,
                    all: false,
                    limit: 0,
                },
            )
            .unwrap();

        assert_eq!(report.examined, 1);
        assert_eq!(report.updated, 1);

        let manifest = Manifest::from_json(&store.get(MANIFEST_KEY).unwrap().unwrap()).unwrap();
        let entry = &manifest.tracks[0];
        assert_eq!(entry.artist.as_deref(), Some("Jane Doe"));
        // Existing title survives the merge.
        assert_eq!(entry.title.as_deref(), Some("Echoes"));
        assert!(entry.tagged);

        // Only the manifest lives in the bucket: no audio was re-uploaded.
        let top_level: Vec<_> = std::fs::read_dir(fx.bucket.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(top_level, vec![std::ffi::OsString::from(MANIFEST_KEY)]);
    }

    #[test]
    fn enrich_skips_entries_without_search_terms() {
        let fx = Fixture::new();
        let store = fx.store();
        seeded_manifest(&store, vec![untagged_entry("cafef00dcafe", None)]);

        let lookup = StubLookup { candidate: None };
        let engine = SyncEngine::new(&store, SyncOptions::default());
        let report = engine
            .enrich_manifest(
                &lookup,
                &EnrichOptions {
                    dry_run: false,
                    all: false,
                    limit: 0,
                },
            )
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.updated, 0);
    }

    #[test]
    fn enrich_with_missing_manifest_is_a_noop() {
        let fx = Fixture::new();
        let store = fx.store();

        let lookup = StubLookup { candidate: None };
        let engine = SyncEngine::new(&store, SyncOptions::default());
        let report = engine
            .enrich_manifest(
                &lookup,
                &EnrichOptions {
                    dry_run: false,
                    all: false,
                    limit: 0,
                },
            )
            .unwrap();

        assert_eq!(report, EnrichReport::default());
        assert!(store.get(MANIFEST_KEY).unwrap().is_none());
    }

    #[test]
    fn enrich_dry_run_leaves_remote_manifest_untouched() {
        let fx = Fixture::new();
        let store = fx.store();
        seeded_manifest(&store, vec![untagged_entry("deadbeef0000", Some("Echoes"))]);
        let before = store.get(MANIFEST_KEY).unwrap().unwrap();

        let lookup = StubLookup {
            candidate: Some(Candidate {
                artist: Some("Jane Doe".into()),
                ..Default::default()
            }),
        };
        let engine = SyncEngine::new(&store, SyncOptions::default());
        let report = engine
            .enrich_manifest(
                &lookup,
                &EnrichOptions {
                    dry_run: true,
                    all: false,
                    limit: 0,
                },
            )
            .unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(store.get(MANIFEST_KEY).unwrap().unwrap(), before);
    }
}
