//! sigris CLI
//!
//! Local execution entry point for the portal crawler.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use clap::{Parser, Subcommand};
use sigris::{
    error::Result,
    models::Config,
    pipeline::Orchestrator,
    services::HttpFetchClient,
    storage::{CheckpointStore, OutputStore},
};

/// sigris - Academic Portal Directory Crawler
#[derive(Parser, Debug)]
#[command(
    name = "sigris",
    version,
    about = "Resumable crawler for university academic portal directories"
)]
struct Cli {
    /// Path to data directory (config, checkpoint, and output live here)
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the crawl, resuming from the checkpoint if one exists
    Run,

    /// Show checkpoint progress and output counts
    Status,

    /// Delete the checkpoint so the next run starts from scratch
    ClearCheckpoint,

    /// Summarize the output file (lines, unique ids, null-id records)
    Stats,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.data_dir.join("config.toml");
    let config = Arc::new(Config::load_or_default(&config_path));

    let checkpoint_path = cli.data_dir.join("checkpoint.json");
    let output_path = cli.data_dir.join("records.jsonl");

    match cli.command {
        Command::Run => {
            config.validate()?;
            log::info!("Crawling {}", config.portal.search_url);

            let fetcher = Arc::new(HttpFetchClient::new(&config.crawler)?);
            let orchestrator =
                Orchestrator::new(Arc::clone(&config), fetcher, &cli.data_dir).await?;

            // Ctrl-C finishes the current entity, checkpoints, and exits.
            let shutdown = orchestrator.shutdown_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Shutdown requested; finishing current entity...");
                    shutdown.store(true, Ordering::Relaxed);
                }
            });

            let summary = orchestrator.run().await?;
            if summary.interrupted {
                log::info!("Interrupted; run again to resume");
            } else {
                log::info!("Output written to {}", output_path.display());
            }
        }

        Command::Status => {
            match CheckpointStore::new(&checkpoint_path).load().await? {
                Some(checkpoint) => {
                    log::info!(
                        "Checkpoint: unit {}/{} ({:.1}%), {} entities queued",
                        checkpoint.current_unit_index,
                        checkpoint.total_units,
                        checkpoint.progress_percent(),
                        checkpoint.queued_entities.len()
                    );
                    if let Some(saved) = chrono::DateTime::from_timestamp(checkpoint.timestamp, 0) {
                        log::info!("Last saved: {}", saved.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                }
                None => log::info!("No checkpoint found; next run starts from scratch"),
            }

            let stats = OutputStore::stats(&output_path).await?;
            log::info!(
                "Output: {} records, {} unique ids",
                stats.lines,
                stats.unique_ids
            );
        }

        Command::ClearCheckpoint => {
            if CheckpointStore::new(&checkpoint_path).clear().await? {
                log::info!("Checkpoint deleted");
            } else {
                log::info!("No checkpoint to delete");
            }
        }

        Command::Stats => {
            let stats = OutputStore::stats(&output_path).await?;
            log::info!("Records: {}", stats.lines);
            log::info!("Unique entity ids: {}", stats.unique_ids);
            if stats.null_id_records > 0 {
                log::warn!(
                    "{} records have no entity id and cannot be deduplicated",
                    stats.null_id_records
                );
            }
            let duplicates = stats.lines - stats.unique_ids - stats.null_id_records;
            if duplicates > 0 {
                log::warn!("{} duplicate lines detected", duplicates);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!(
                "Config OK ({} listing fields, {} detail fields)",
                config.portal.listing_fields.len(),
                config.portal.detail_fields.len()
            );
        }
    }

    Ok(())
}
