//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "CryptoPrice")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: Date,
    pub hourx: i32, // 0..=23, UTC
    pub crypto: String,
    #[sea_orm(column_name = "Open", nullable)]
    pub open: Option<f64>,
    #[sea_orm(column_name = "High", nullable)]
    pub high: Option<f64>,
    #[sea_orm(column_name = "Low", nullable)]
    pub low: Option<f64>,
    #[sea_orm(column_name = "Close", nullable)]
    pub close: Option<f64>,
    #[sea_orm(column_name = "Volume", nullable)]
    pub volume: Option<i64>,
    pub inserted_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
