use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Event name
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub event: String,

    /// Structured payload
    #[sea_orm(column_type = "Json")]
    pub log: Json,

    /// Acting user, null for system events
    pub user_id: Option<i64>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
