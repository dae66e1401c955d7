//! Curated upsert writer for `CryptoPrice`.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QueryTrait, Statement,
};
use tracing::debug;

use crate::entity::crypto_price;
use crate::error::Result;
use crate::models::PriceBar;

fn to_active_model(symbol: &str, bar: &PriceBar) -> crypto_price::ActiveModel {
    crypto_price::ActiveModel {
        date: ActiveValue::Set(bar.date),
        hourx: ActiveValue::Set(bar.hour as i32),
        crypto: ActiveValue::Set(symbol.to_string()),
        open: ActiveValue::Set(bar.open),
        high: ActiveValue::Set(bar.high),
        low: ActiveValue::Set(bar.low),
        close: ActiveValue::Set(bar.close),
        volume: ActiveValue::Set(bar.volume),
        ..Default::default()
    }
}

/// Insert-if-absent statement for one batch.
///
/// MySQL gets `INSERT IGNORE`: its `ON DUPLICATE KEY UPDATE` form reports
/// every matched duplicate as an affected row under `CLIENT_FOUND_ROWS`.
/// Other backends use `ON CONFLICT (date, hourx, crypto) DO NOTHING`.
fn insert_statement(backend: DbBackend, symbol: &str, batch: &[PriceBar]) -> Statement {
    let insert = crypto_price::Entity::insert_many(batch.iter().map(|bar| to_active_model(symbol, bar)));
    match backend {
        DbBackend::MySql => {
            let mut stmt = insert.build(backend);
            stmt.sql = stmt.sql.replacen("INSERT INTO", "INSERT IGNORE INTO", 1);
            stmt
        }
        _ => insert
            .on_conflict(
                OnConflict::columns([
                    crypto_price::Column::Date,
                    crypto_price::Column::Hourx,
                    crypto_price::Column::Crypto,
                ])
                .do_nothing()
                .to_owned(),
            )
            .build(backend),
    }
}

/// Insert bars that are not stored yet, keyed on `(date, hourx, crypto)`.
///
/// Existing rows are left untouched; the unique constraint decides, so
/// duplicates inside one batch keep the first row. Returns the number of rows
/// actually inserted.
pub async fn upsert_bars<C: ConnectionTrait>(
    db: &C,
    symbol: &str,
    bars: &[PriceBar],
    batch_size: usize,
) -> Result<u64> {
    let backend = db.get_database_backend();
    let mut inserted = 0u64;
    for (i, batch) in bars.chunks(batch_size.max(1)).enumerate() {
        let rows = db.execute(insert_statement(backend, symbol, batch)).await?.rows_affected();
        debug!(symbol = %symbol, batch = i, size = batch.len(), inserted = rows, "Upserted batch");
        inserted += rows;
    }
    Ok(inserted)
}

/// Start of the latest hour bucket stored for `symbol`.
pub async fn latest_bucket<C: ConnectionTrait>(db: &C, symbol: &str) -> Result<Option<DateTime<Utc>>> {
    let latest = crypto_price::Entity::find()
        .filter(crypto_price::Column::Crypto.eq(symbol))
        .order_by_desc(crypto_price::Column::Date)
        .order_by_desc(crypto_price::Column::Hourx)
        .one(db)
        .await?;
    Ok(latest.and_then(|row| {
        u32::try_from(row.hourx)
            .ok()
            .and_then(|hour| row.date.and_hms_opt(hour, 0, 0))
            .map(|naive| naive.and_utc())
    }))
}

pub async fn count_for_symbol<C: ConnectionTrait>(db: &C, symbol: &str) -> Result<u64> {
    let count = crypto_price::Entity::find()
        .filter(crypto_price::Column::Crypto.eq(symbol))
        .count(db)
        .await?;
    Ok(count)
}

/// All stored rows for `symbol`, oldest bucket first.
pub async fn find_by_symbol<C: ConnectionTrait>(db: &C, symbol: &str) -> Result<Vec<crypto_price::Model>> {
    let rows = crypto_price::Entity::find()
        .filter(crypto_price::Column::Crypto.eq(symbol))
        .order_by_asc(crypto_price::Column::Date)
        .order_by_asc(crypto_price::Column::Hourx)
        .all(db)
        .await?;
    Ok(rows)
}
