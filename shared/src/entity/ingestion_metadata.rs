//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "IngestionMetadata")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub source: String, // ticker symbol
    pub last_success: DateTime, // UTC, hour aligned
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
