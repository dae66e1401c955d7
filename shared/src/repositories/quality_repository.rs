//! `DataQualityIssues` log. Not written by the ingestion flow yet.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::data_quality_issues;
use crate::error::Result;

pub async fn record_issue<C: ConnectionTrait>(
    db: &C,
    ticker: &str,
    datetime: Option<DateTime<Utc>>,
    issue_type: &str,
    raw_data: &serde_json::Value,
) -> Result<i32> {
    let issue = data_quality_issues::ActiveModel {
        ticker: ActiveValue::Set(Some(ticker.to_string())),
        datetime: ActiveValue::Set(datetime.map(|ts| ts.naive_utc())),
        issue_type: ActiveValue::Set(Some(issue_type.to_string())),
        raw_data: ActiveValue::Set(Some(raw_data.to_string())),
        ..Default::default()
    };
    let result = data_quality_issues::Entity::insert(issue).exec(db).await?;
    Ok(result.last_insert_id)
}

pub async fn issues_for_ticker<C: ConnectionTrait>(db: &C, ticker: &str) -> Result<Vec<data_quality_issues::Model>> {
    let issues = data_quality_issues::Entity::find()
        .filter(data_quality_issues::Column::Ticker.eq(ticker))
        .order_by_asc(data_quality_issues::Column::Id)
        .all(db)
        .await?;
    Ok(issues)
}
