//! Per-symbol high-watermark.
//!
//! The watermark is the later of the `IngestionMetadata` record and the newest
//! bucket in `CryptoPrice`, so a run whose metadata write was lost still
//! resumes from the data actually stored.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, EntityTrait};
use tracing::debug;

use super::price_repository;
use crate::entity::ingestion_metadata;
use crate::error::Result;

pub async fn last_success<C: ConnectionTrait>(db: &C, symbol: &str) -> Result<Option<DateTime<Utc>>> {
    let record = ingestion_metadata::Entity::find_by_id(symbol.to_string())
        .one(db)
        .await?;
    Ok(record.map(|r| r.last_success.and_utc()))
}

/// Resume point for `symbol`; `default` when nothing has been ingested yet.
pub async fn resolve_watermark<C: ConnectionTrait>(
    db: &C,
    symbol: &str,
    default: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let recorded = last_success(db, symbol).await?;
    let stored = price_repository::latest_bucket(db, symbol).await?;
    debug!(symbol = %symbol, ?recorded, ?stored, "Watermark candidates");
    Ok(recorded.max(stored).unwrap_or(default))
}

/// Move the watermark forward to `ts`. Never moves it back; returns whether
/// the record changed.
pub async fn advance_watermark<C: ConnectionTrait>(db: &C, symbol: &str, ts: DateTime<Utc>) -> Result<bool> {
    if let Some(current) = last_success(db, symbol).await? {
        if current >= ts {
            return Ok(false);
        }
    }

    let record = ingestion_metadata::ActiveModel {
        source: ActiveValue::Set(symbol.to_string()),
        last_success: ActiveValue::Set(ts.naive_utc()),
        updated_at: ActiveValue::Set(Some(Utc::now().naive_utc())),
    };
    ingestion_metadata::Entity::insert(record)
        .on_conflict(
            OnConflict::column(ingestion_metadata::Column::Source)
                .update_columns([
                    ingestion_metadata::Column::LastSuccess,
                    ingestion_metadata::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(true)
}
