//! safebaby-import - Disclosure data import tool
//!
//! One-off seeding utility: reads manufacturer disclosure CSVs (and FDA
//! recall CSVs) into the SafeBaby database. Run manually; not part of the
//! live service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use safebaby_common::config;
use safebaby_common::db::init::init_database;
use safebaby_import::{disclosure, importer};

#[derive(Parser)]
#[command(name = "safebaby-import", about = "Import disclosure data into the SafeBaby database")]
struct Cli {
    /// Data folder holding safebaby.db (falls back to SAFEBABY_DATA, then defaults)
    #[arg(long)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import products with lab results from a disclosure CSV
    Import {
        /// Path to the disclosure CSV
        csv_path: PathBuf,
    },
    /// Import recalls from an FDA recall CSV
    ImportRecalls {
        /// Path to the recall CSV
        csv_path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref());
    config::ensure_data_dir(&data_dir)?;

    let db_path = config::database_path(&data_dir);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    match cli.command {
        Command::Import { csv_path } => {
            let records = disclosure::read_disclosures(&csv_path)?;
            info!("Read {} disclosure rows from {}", records.len(), csv_path.display());

            let summary = importer::import_products(&pool, &records).await?;
            info!(
                "Import complete: {} imported, {} skipped",
                summary.imported, summary.skipped
            );
        }
        Command::ImportRecalls { csv_path } => {
            let records = disclosure::read_recalls(&csv_path)?;
            info!("Read {} recall rows from {}", records.len(), csv_path.display());

            let summary = importer::import_recalls(&pool, &records).await?;
            info!(
                "Import complete: {} imported, {} skipped",
                summary.imported, summary.skipped
            );
        }
    }

    Ok(())
}
