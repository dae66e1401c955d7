use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Curated hourly bars, one row per (date, hourx, crypto)
        manager
            .create_table(
                Table::create()
                    .table(CryptoPrice::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CryptoPrice::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(CryptoPrice::Date).date().not_null())
                    .col(ColumnDef::new(CryptoPrice::Hourx).integer().not_null())
                    .col(ColumnDef::new(CryptoPrice::Crypto).string_len(20).not_null())
                    .col(ColumnDef::new(CryptoPrice::Open).double().null())
                    .col(ColumnDef::new(CryptoPrice::High).double().null())
                    .col(ColumnDef::new(CryptoPrice::Low).double().null())
                    .col(ColumnDef::new(CryptoPrice::Close).double().null())
                    .col(ColumnDef::new(CryptoPrice::Volume).big_integer().null())
                    .col(ColumnDef::new(CryptoPrice::InsertedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .index(
                        Index::create()
                            .name("uq_crypto")
                            .table(CryptoPrice::Table)
                            .col(CryptoPrice::Date)
                            .col(CryptoPrice::Hourx)
                            .col(CryptoPrice::Crypto)
                            .unique()
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CryptoPrice::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CryptoPrice {
    #[sea_orm(iden = "CryptoPrice")]
    Table,
    Id,
    Date,
    Hourx,
    Crypto,
    #[sea_orm(iden = "Open")]
    Open,
    #[sea_orm(iden = "High")]
    High,
    #[sea_orm(iden = "Low")]
    Low,
    #[sea_orm(iden = "Close")]
    Close,
    #[sea_orm(iden = "Volume")]
    Volume,
    InsertedAt,
}
