pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;
pub mod storage;

pub use config::{Config, FailurePolicy};
pub use database::get_db_connection;
pub use error::IngestError;
pub use fetcher::{FetchAdapter, PriceProvider, YahooProvider};
pub use logging::init_tracing;
pub use models::*;
pub use services::{IngestionService, RunSummary, SymbolOutcome};
pub use storage::{ObjectStore, RawArchiver};
