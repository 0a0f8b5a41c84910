use crate::core::rate_limiter::{LogAction, NewLogEntry, RateLimitLogEntry, RateLimitLogStore};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use sea_orm::*;

use super::super::entities::{self, rate_limit_log};
use super::types::SeaOrmDatabase;

#[async_trait]
impl RateLimitLogStore for SeaOrmDatabase {
    async fn append(&self, entry: NewLogEntry) -> Result<()> {
        let active_model = rate_limit_log::ActiveModel {
            id: NotSet,
            identifier: Set(entry.identifier),
            endpoint: Set(entry.endpoint),
            action: Set(entry.action.as_str().to_string()),
            global_count: Set(entry.global_count),
            ip_count: Set(entry.ip_count),
            user_agent: Set(entry.user_agent),
            country: Set(entry.country),
            created_at: Set(entry.created_at),
        };

        entities::RateLimitLog::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(PortalError::Database)?;

        Ok(())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<RateLimitLogEntry>> {
        let models = entities::RateLimitLog::find()
            .order_by_desc(rate_limit_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(PortalError::Database)?;

        models.into_iter().map(to_log_entry).collect()
    }
}

fn to_log_entry(model: rate_limit_log::Model) -> Result<RateLimitLogEntry> {
    let action = LogAction::parse(&model.action).ok_or_else(|| {
        PortalError::Storage(format!("Unknown rate limit log action: {}", model.action))
    })?;

    Ok(RateLimitLogEntry {
        id: i64::from(model.id),
        identifier: model.identifier,
        endpoint: model.endpoint,
        action,
        global_count: model.global_count,
        ip_count: model.ip_count,
        user_agent: model.user_agent,
        country: model.country,
        created_at: model.created_at,
    })
}
