use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::rate_limiter;

/// Rate limit counter database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_limit_counters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Counter identifier key
    pub identifier: String,

    /// Counter endpoint key
    pub endpoint: String,

    /// Admitted requests in the current window
    pub request_count: i32,

    /// End of the current window
    pub window_reset_at: DateTimeUtc,

    /// First alert of the window has fired
    pub is_over_threshold: bool,

    pub last_alert_sent_at: Option<DateTimeUtc>,

    pub alert_count: i32,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for rate_limiter::RateLimitCounter {
    fn from(model: Model) -> Self {
        Self {
            identifier: model.identifier,
            endpoint: model.endpoint,
            request_count: model.request_count,
            window_reset_at: model.window_reset_at,
            is_over_threshold: model.is_over_threshold,
            last_alert_sent_at: model.last_alert_sent_at,
            alert_count: model.alert_count,
            updated_at: model.updated_at,
        }
    }
}
