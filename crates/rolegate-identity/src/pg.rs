//! PostgreSQL-backed identity bridge.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use rolegate_core::error::{AppError, ErrorKind};
use rolegate_core::result::AppResult;
use rolegate_entity::identity::{IdentityInfo, NewIdentity};
use rolegate_entity::refresh_token::RefreshToken;

use crate::bridge::IdentityBridge;
use crate::password::PasswordHasher;

/// Role automatically attached to every newly created identity.
const DEFAULT_ROLE: &str = "User";

/// Credential store implementation over the identity tables.
#[derive(Debug, Clone)]
pub struct PgIdentityBridge {
    pool: PgPool,
    hasher: PasswordHasher,
}

/// Raw identity row. Stays private to this module; the hash never
/// leaves the bridge.
#[derive(Debug, Clone, FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    full_name: String,
    password_hash: String,
}

impl PgIdentityBridge {
    /// Create a new bridge over the given pool.
    pub fn new(pool: PgPool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    async fn find_row_by_email(&self, email: &str) -> AppResult<Option<IdentityRow>> {
        sqlx::query_as::<_, IdentityRow>(
            "SELECT id, email, full_name, password_hash FROM identities \
             WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find identity by email", e)
        })
    }

    async fn roles_of(&self, identity_id: Uuid) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM identity_roles r \
             JOIN identity_role_members m ON m.role_id = r.id \
             WHERE m.identity_id = $1 \
             ORDER BY r.name",
        )
        .bind(identity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list identity roles", e)
        })
    }

    async fn info_for(&self, row: IdentityRow) -> AppResult<IdentityInfo> {
        let roles = self.roles_of(row.id).await?;
        Ok(IdentityInfo {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            roles,
        })
    }
}

#[async_trait]
impl IdentityBridge for PgIdentityBridge {
    async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Option<IdentityInfo>> {
        let Some(row) = self.find_row_by_email(email).await? else {
            return Ok(None);
        };

        if !self.hasher.verify_password(password, &row.password_hash)? {
            return Ok(None);
        }

        Ok(Some(self.info_for(row).await?))
    }

    async fn create_identity(&self, data: &NewIdentity) -> AppResult<Option<IdentityInfo>> {
        if self.email_exists(&data.email).await? {
            return Ok(None);
        }

        let id = Uuid::new_v4();
        let password_hash = self.hasher.hash_password(&data.password)?;

        let inserted = sqlx::query(
            "INSERT INTO identities (id, email, full_name, password_hash) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(&data.email)
        .bind(&data.full_name)
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create identity", e))?;

        // A concurrent registration can win the race between the
        // existence check and the insert; report it as taken.
        if inserted.rows_affected() == 0 {
            return Ok(None);
        }

        self.assign_role(id, DEFAULT_ROLE).await?;

        debug!(identity_id = %id, "Identity created");

        Ok(Some(IdentityInfo {
            id,
            email: data.email.clone(),
            full_name: data.full_name.clone(),
            roles: vec![DEFAULT_ROLE.to_string()],
        }))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<IdentityInfo>> {
        match self.find_row_by_email(email).await? {
            Some(row) => Ok(Some(self.info_for(row).await?)),
            None => Ok(None),
        }
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM identities WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check email", e))
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<IdentityInfo>> {
        let stored = sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve refresh token", e)
        })?;

        let Some(stored) = stored.filter(RefreshToken::is_usable) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, email, full_name, password_hash FROM identities WHERE id = $1",
        )
        .bind(stored.identity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find identity", e))?;

        match row {
            Some(row) => Ok(Some(self.info_for(row).await?)),
            None => Ok(None),
        }
    }

    async fn store_refresh_token(
        &self,
        identity_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token, identity_id, expiry_date) VALUES ($1, $2, $3)",
        )
        .bind(token)
        .bind(identity_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store refresh token", e)
        })?;

        Ok(())
    }

    async fn revoke_refresh_token(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE refresh_tokens SET is_revoked = TRUE WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to revoke refresh token", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn consume_refresh_token(&self, token: &str) -> AppResult<bool> {
        // Conditional update: of two concurrent refresh calls, only the
        // first flips the flag and wins the rotation.
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = TRUE \
             WHERE token = $1 AND is_revoked = FALSE AND expiry_date > NOW()",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume refresh token", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_role(&self, role_name: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO identity_roles (id, name) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(role_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to ensure identity role", e)
        })?;

        Ok(())
    }

    async fn assign_role(&self, identity_id: Uuid, role_name: &str) -> AppResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM identities WHERE id = $1)")
                .bind(identity_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to find identity", e)
                })?;

        if !exists {
            return Ok(false);
        }

        self.ensure_role(role_name).await?;

        sqlx::query(
            "INSERT INTO identity_role_members (identity_id, role_id) \
             SELECT $1, id FROM identity_roles WHERE name = $2 \
             ON CONFLICT DO NOTHING",
        )
        .bind(identity_id)
        .bind(role_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to assign identity role", e)
        })?;

        Ok(true)
    }

    async fn remove_role(&self, identity_id: Uuid, role_name: &str) -> AppResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM identities WHERE id = $1)")
                .bind(identity_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to find identity", e)
                })?;

        if !exists {
            return Ok(false);
        }

        sqlx::query(
            "DELETE FROM identity_role_members m USING identity_roles r \
             WHERE m.role_id = r.id AND m.identity_id = $1 AND r.name = $2",
        )
        .bind(identity_id)
        .bind(role_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to remove identity role", e)
        })?;

        Ok(true)
    }

    async fn delete_identity(&self, identity_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(identity_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete identity", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_identity_by_email(&self, email: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM identities WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete identity", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
