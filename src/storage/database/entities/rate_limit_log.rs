use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rate limit log database model (append-only)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_limit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Counter identifier key
    pub identifier: String,

    /// Request path that was evaluated
    pub endpoint: String,

    /// `allowed`, `blocked_ip` or `blocked_global`
    #[sea_orm(column_type = "String(StringLen::N(32))")]
    pub action: String,

    pub global_count: i32,

    /// Reserved for per-address limiting
    pub ip_count: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,

    #[sea_orm(column_type = "String(StringLen::N(8))", nullable)]
    pub country: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
