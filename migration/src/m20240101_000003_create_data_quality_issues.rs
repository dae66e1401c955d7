use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DataQualityIssues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DataQualityIssues::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(DataQualityIssues::Ticker).string_len(20).null())
                    .col(ColumnDef::new(DataQualityIssues::Datetime).date_time().null())
                    .col(ColumnDef::new(DataQualityIssues::IssueType).string_len(255).null())
                    .col(ColumnDef::new(DataQualityIssues::RawData).text().null())
                    .col(ColumnDef::new(DataQualityIssues::LoggedAt).timestamp().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataQualityIssues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DataQualityIssues {
    #[sea_orm(iden = "DataQualityIssues")]
    Table,
    Id,
    Ticker,
    Datetime,
    IssueType,
    RawData,
    LoggedAt,
}
