use crate::core::rate_limiter::{CounterStore, CounterUpdate, RateLimitCounter};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, rate_limit_counter};
use super::types::SeaOrmDatabase;

#[async_trait]
impl CounterStore for SeaOrmDatabase {
    async fn get(&self, identifier: &str, endpoint: &str) -> Result<Option<RateLimitCounter>> {
        let model = entities::RateLimitCounter::find()
            .filter(rate_limit_counter::Column::Identifier.eq(identifier))
            .filter(rate_limit_counter::Column::Endpoint.eq(endpoint))
            .one(&self.db)
            .await
            .map_err(PortalError::Database)?;

        Ok(model.map(Into::into))
    }

    async fn create(
        &self,
        identifier: &str,
        endpoint: &str,
        initial_count: i32,
        reset_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RateLimitCounter> {
        debug!("Creating rate limit counter: {}/{}", identifier, endpoint);

        let active_model = rate_limit_counter::ActiveModel {
            id: NotSet,
            identifier: Set(identifier.to_string()),
            endpoint: Set(endpoint.to_string()),
            request_count: Set(initial_count),
            window_reset_at: Set(reset_at),
            is_over_threshold: Set(false),
            last_alert_sent_at: Set(None),
            alert_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(PortalError::Database)?;

        Ok(model.into())
    }

    async fn update(&self, identifier: &str, endpoint: &str, update: CounterUpdate) -> Result<()> {
        let mut query = entities::RateLimitCounter::update_many()
            .col_expr(
                rate_limit_counter::Column::UpdatedAt,
                Expr::value(update.updated_at.unwrap_or_else(Utc::now)),
            );

        if let Some(count) = update.request_count {
            query = query.col_expr(rate_limit_counter::Column::RequestCount, Expr::value(count));
        }
        if let Some(reset_at) = update.window_reset_at {
            query = query.col_expr(
                rate_limit_counter::Column::WindowResetAt,
                Expr::value(reset_at),
            );
        }
        if let Some(over) = update.is_over_threshold {
            query = query.col_expr(
                rate_limit_counter::Column::IsOverThreshold,
                Expr::value(over),
            );
        }
        if let Some(sent_at) = update.last_alert_sent_at {
            query = query.col_expr(
                rate_limit_counter::Column::LastAlertSentAt,
                Expr::value(sent_at),
            );
        }
        if let Some(alerts) = update.alert_count {
            query = query.col_expr(rate_limit_counter::Column::AlertCount, Expr::value(alerts));
        }

        query
            .filter(rate_limit_counter::Column::Identifier.eq(identifier))
            .filter(rate_limit_counter::Column::Endpoint.eq(endpoint))
            .exec(&self.db)
            .await
            .map_err(PortalError::Database)?;

        Ok(())
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64> {
        let result = entities::RateLimitCounter::delete_many()
            .filter(rate_limit_counter::Column::WindowResetAt.lt(before))
            .exec(&self.db)
            .await
            .map_err(PortalError::Database)?;

        Ok(result.rows_affected)
    }
}
