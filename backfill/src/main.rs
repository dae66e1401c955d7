use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing::info;

use shared::{get_db_connection, init_tracing, Config, IngestionService};

/// One-shot historical load of `[start, end)` for every configured symbol.
#[derive(Debug, Parser)]
#[command(name = "backfill", version)]
struct Args {
    #[arg(long, default_value = "2024-01-01")]
    start: NaiveDate,

    /// Exclusive.
    #[arg(long, default_value = "2025-08-23")]
    end: NaiveDate,

    /// Bar interval; overrides INGEST_INTERVAL.
    #[arg(long, default_value = "1h")]
    interval: String,

    /// Comma-separated symbols; overrides CRYPTO_SYMBOLS.
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    if args.start >= args.end {
        bail!("--start {} must be before --end {}", args.start, args.end);
    }

    let mut config = Config::from_env()?;
    config.interval = args.interval;
    if !args.symbols.is_empty() {
        config.symbols = args.symbols.iter().map(|s| s.trim().to_string()).collect();
    }
    let config = Arc::new(config);

    let db = Arc::new(get_db_connection(&config.database_url, config.db_connect_timeout).await?);
    Migrator::up(db.as_ref(), None).await?;
    info!("Schema is up to date");

    let service = IngestionService::from_config(config, db)?;
    let summary = service.backfill(args.start, args.end).await?;
    info!(inserted = summary.total_inserted(), "Backfill complete");

    if summary.has_failures() {
        bail!("{} symbol(s) failed", summary.failures().len());
    }
    Ok(())
}
