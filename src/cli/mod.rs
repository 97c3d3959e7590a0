use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{
    catalog::{
        scan::{ScanOptions, Scanner},
        store::{CATALOG_FILE, Catalog},
    },
    config::Config,
    enrich::LookupClient,
    remote::DirStore,
    sync::{EnrichOptions, SyncEngine, SyncOptions},
};

#[derive(Parser)]
#[command(name = "waxcrate")]
#[command(version)]
#[command(about = "Audio library cataloger and remote sync")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "waxcrate.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk the library, extract metadata and artwork, build the catalog
    Scan {
        /// Rebuild the catalog from scratch instead of resuming
        #[arg(long)]
        no_resume: bool,
    },
    /// Upload pending tracks and rebuild the remote manifest
    Upload {
        /// Report planned actions without uploading anything
        #[arg(long)]
        dry_run: bool,
        /// Upload at most this many tracks
        #[arg(long, default_value_t = 0)]
        limit: usize,
        /// Keep local files even when the config says to delete them
        #[arg(long)]
        no_delete: bool,
        /// Do not upload cover art
        #[arg(long)]
        skip_artwork: bool,
    },
    /// Backfill missing tags in the remote manifest from the lookup service
    Enrich {
        /// Report planned updates without rewriting the manifest
        #[arg(long)]
        dry_run: bool,
        /// Examine at most this many entries
        #[arg(long, default_value_t = 0)]
        limit: usize,
        /// Examine every entry, not just under-tagged ones
        #[arg(long)]
        all: bool,
    },
    /// Show catalog counts
    Status,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let catalog_path = cfg.output.dir.join(CATALOG_FILE);

    match cli.command {
        Commands::Scan { no_resume } => {
            let mut catalog = if no_resume {
                Catalog::default()
            } else {
                Catalog::load_or_default(&catalog_path)?
            };
            let scanner = Scanner::new(
                &cfg.output.dir,
                ScanOptions {
                    checkpoint_every: cfg.sync.checkpoint_every,
                },
            );
            let report = scanner.scan(&cfg.library.root, &mut catalog, &catalog_path)?;
            println!(
                "Scan complete: {} found, {} processed, {} skipped, {} failed",
                report.found, report.processed, report.skipped, report.failed
            );
        }
        Commands::Upload {
            dry_run,
            limit,
            no_delete,
            skip_artwork,
        } => {
            let mut catalog = Catalog::load(&catalog_path)?;
            let store = DirStore::new(cfg.remote.root.clone());
            let engine = SyncEngine::new(
                &store,
                SyncOptions {
                    dry_run,
                    delete_originals: cfg.sync.delete_after_upload && !no_delete,
                    skip_artwork: cfg.sync.skip_artwork || skip_artwork,
                    limit,
                    checkpoint_every: cfg.sync.checkpoint_every,
                },
            );
            let report = engine.upload_pending(&mut catalog, &catalog_path)?;
            println!(
                "Upload complete: {} uploaded, {} reused, {} failed, {} deleted",
                report.uploaded, report.reused, report.failed, report.deleted
            );
        }
        Commands::Enrich { dry_run, limit, all } => {
            let store = DirStore::new(cfg.remote.root.clone());
            let client = LookupClient::new(&cfg.enrich);
            let engine = SyncEngine::new(&store, SyncOptions::default());
            let report =
                engine.enrich_manifest(&client, &EnrichOptions { dry_run, all, limit })?;
            println!(
                "Enrich complete: {} examined, {} updated, {} skipped",
                report.examined, report.updated, report.skipped
            );
        }
        Commands::Status => {
            let catalog = Catalog::load_or_default(&catalog_path)?;
            let tagged = catalog.tracks.values().filter(|r| r.tagged).count();
            let uploaded = catalog.tracks.values().filter(|r| r.uploaded).count();
            println!("Catalog: {}", catalog_path.display());
            if let Some(generated) = &catalog.generated {
                println!("Last written: {generated}");
            }
            println!("Tracks: {}", catalog.len());
            println!("  tagged:   {tagged}");
            println!("  uploaded: {uploaded}");
            println!("  pending:  {}", catalog.len() - uploaded);
        }
    }

    Ok(())
}
