use thiserror::Error;

/// Errors raised by the ingestion pipeline.
///
/// An empty fetch is not an error; it is reported as an outcome. A missing
/// time column is raised by normalization but absorbed by the fetch adapter.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("no time column found for {symbol}")]
    NoTimeColumn { symbol: String },

    #[error("archive error: {0}")]
    Archive(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
