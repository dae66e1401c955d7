pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_crypto_price;
mod m20240101_000002_create_ingestion_metadata;
mod m20240101_000003_create_data_quality_issues;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_crypto_price::Migration),
            Box::new(m20240101_000002_create_ingestion_metadata::Migration),
            Box::new(m20240101_000003_create_data_quality_issues::Migration),
        ]
    }
}
