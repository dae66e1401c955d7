pub mod crypto_price;
pub mod data_quality_issues;
pub mod ingestion_metadata;
