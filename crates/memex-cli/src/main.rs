//! Memex CLI: preview backfill, single-key previews, directory ingest and
//! catalog listing.
//!
//! Configuration comes from the environment (or a `.env` file); see
//! `memex_core::Config`. Set RUST_LOG to change verbosity.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use memex_cli::{connect, init_tracing, listing};
use memex_core::Config;
use memex_services::{BackfillPolicy, DirectoryIngest, ItemOutcome, PreviewBackfill};

#[derive(Parser)]
#[command(name = "memex", about = "Media catalog maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate previews for every catalog record that lacks one
    BackfillPreviews,
    /// Generate previews for specific records
    Preview {
        /// File keys, e.g. images/1709294400-cat.png
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Upload the images in a local directory and record them
    Ingest {
        /// Directory to upload (defaults to UPLOAD_DIR)
        dir: Option<PathBuf>,
    },
    /// List catalog records
    List {
        /// Only records uploaded by this identity
        #[arg(long)]
        uploaded_by: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Maximum number of records
        #[arg(long, default_value = "100")]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let clients = connect(&config).await?;

    match cli.command {
        Commands::BackfillPreviews => {
            let backfill = PreviewBackfill::new(
                clients.storage,
                clients.table,
                BackfillPolicy::from(&config.preview),
            );
            backfill.run().await.context("Preview backfill aborted")?;
        }
        Commands::Preview { keys } => {
            let backfill = PreviewBackfill::new(
                clients.storage,
                clients.table,
                BackfillPolicy::from(&config.preview),
            );
            for key in keys {
                match backfill.process_key(&key).await {
                    Ok(ItemOutcome::Updated { preview_key }) => {
                        tracing::info!(file_key = %key, preview_key = %preview_key, "Preview generated")
                    }
                    Ok(ItemOutcome::Skipped(reason)) => {
                        tracing::info!(file_key = %key, reason = %reason, "Preview not generated")
                    }
                    // Already reported through the observer.
                    Ok(ItemOutcome::Failed(_)) => {}
                    Err(e) => {
                        tracing::error!(file_key = %key, error = %e, "Failed to load record")
                    }
                }
            }
        }
        Commands::Ingest { dir } => {
            let dir = dir.unwrap_or_else(|| config.ingest.upload_dir.clone());
            let ingest = DirectoryIngest::from_config(
                clients.storage,
                clients.table,
                config.preview.source_prefix.clone(),
                &config.ingest,
            );
            ingest
                .run(&dir)
                .await
                .with_context(|| format!("Failed to ingest {}", dir.display()))?;
        }
        Commands::List {
            uploaded_by,
            format,
            limit,
        } => {
            let records =
                listing::collect_records(clients.table.as_ref(), uploaded_by.as_deref(), limit)
                    .await
                    .context("Failed to scan catalog")?;
            match format {
                OutputFormat::Json => {
                    let out = serde_json::to_string_pretty(&records).context("Serialize records")?;
                    println!("{}", out);
                }
                OutputFormat::Table => print!("{}", listing::render_table(&records)),
            }
        }
    }

    Ok(())
}
