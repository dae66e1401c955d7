//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "DataQualityIssues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(nullable)]
    pub ticker: Option<String>,
    #[sea_orm(nullable)]
    pub datetime: Option<DateTime>,
    #[sea_orm(nullable)]
    pub issue_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub raw_data: Option<String>,
    pub logged_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
