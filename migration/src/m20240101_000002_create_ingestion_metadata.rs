use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Per-source high-watermark (source = ticker symbol)
        manager
            .create_table(
                Table::create()
                    .table(IngestionMetadata::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IngestionMetadata::Source).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(IngestionMetadata::LastSuccess).date_time().not_null())
                    .col(ColumnDef::new(IngestionMetadata::UpdatedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IngestionMetadata::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IngestionMetadata {
    #[sea_orm(iden = "IngestionMetadata")]
    Table,
    Source,
    LastSuccess,
    UpdatedAt,
}
