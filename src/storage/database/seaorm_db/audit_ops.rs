use crate::core::audit::{AuditEvent, AuditSink, StoredAuditEvent};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, audit_event};
use super::types::SeaOrmDatabase;

#[async_trait]
impl AuditSink for SeaOrmDatabase {
    async fn record(&self, event: AuditEvent) -> Result<()> {
        debug!("Recording audit event: {}", event.event);

        let active_model = audit_event::ActiveModel {
            id: NotSet,
            event: Set(event.event),
            log: Set(event.log),
            user_id: Set(event.user_id),
            created_at: Set(chrono::Utc::now()),
        };

        entities::AuditEvent::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(PortalError::Database)?;

        Ok(())
    }

    async fn events_named(&self, event: &str) -> Result<Vec<StoredAuditEvent>> {
        let models = entities::AuditEvent::find()
            .filter(audit_event::Column::Event.eq(event))
            .order_by_asc(audit_event::Column::Id)
            .all(&self.db)
            .await
            .map_err(PortalError::Database)?;

        Ok(models
            .into_iter()
            .map(|m| StoredAuditEvent {
                id: i64::from(m.id),
                event: m.event,
                log: m.log,
                user_id: m.user_id,
                created_at: m.created_at,
            })
            .collect())
    }
}
