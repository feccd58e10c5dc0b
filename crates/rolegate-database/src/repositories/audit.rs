//! Audit log repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use rolegate_core::error::{AppError, ErrorKind};
use rolegate_core::result::AppResult;
use rolegate_entity::audit::AuditRecord;

use crate::stores::AuditStore;

/// Append-only repository for the audit log table.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditRepository {
    async fn record(
        &self,
        user_id: Option<Uuid>,
        action: &str,
        ip_address: &str,
    ) -> AppResult<()> {
        let entry = AuditRecord {
            id: Uuid::new_v4(),
            user_id,
            action: action.to_string(),
            ip_address: ip_address.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO audit_logs (id, user_id, action, ip_address, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.ip_address)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record audit entry", e))?;

        Ok(())
    }
}
