use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing::{error, info};

use shared::services::truncate_to_hour;
use shared::{get_db_connection, init_tracing, Config, IngestionService};

/// Hourly incremental load of crypto OHLCV bars.
#[derive(Debug, Parser)]
#[command(name = "ingest", version)]
struct Args {
    /// Stay resident and run again at the top of every hour.
    #[arg(long)]
    hourly: bool,

    /// Apply pending schema migrations before the first run.
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    info!(
        git_hash = env!("GIT_HASH"),
        git_branch = env!("GIT_BRANCH"),
        build_time = env!("BUILD_TIME"),
        "Starting crypto ingestion"
    );

    let config = Arc::new(Config::from_env()?);
    info!(symbols = ?config.symbols, interval = %config.interval, policy = ?config.failure_policy, "Config loaded");

    let db = Arc::new(get_db_connection(&config.database_url, config.db_connect_timeout).await?);
    if args.migrate {
        Migrator::up(db.as_ref(), None).await?;
        info!("Migrations applied");
    }

    let service = IngestionService::from_config(config, db)?;

    if !args.hourly {
        let summary = service.run(Utc::now()).await?;
        if summary.has_failures() {
            bail!("{} symbol(s) failed", summary.failures().len());
        }
        return Ok(());
    }

    loop {
        match service.run(Utc::now()).await {
            Ok(summary) if summary.has_failures() => {
                error!(failed = summary.failures().len(), "Run finished with failures")
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "Run aborted"),
        }

        let next = truncate_to_hour(Utc::now()) + Duration::hours(1);
        let wait = (next - Utc::now()).to_std().unwrap_or_default();
        info!(next_run = %next, "Sleeping until next hour");
        tokio::time::sleep(wait).await;
    }
}
