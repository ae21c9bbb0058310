//! Refresh token repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use chirpy_core::result::AppResult;
use chirpy_core::types::id::UserId;
use chirpy_entity::RefreshToken;

use super::{RefreshTokenStore, map_sqlx_error};

/// PostgreSQL-backed [`RefreshTokenStore`].
#[derive(Debug, Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenRepository {
    async fn create(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (token, created_at, updated_at, user_id, expires_at, revoked_at) \
             VALUES ($1, NOW(), NOW(), $2, $3, NULL) RETURNING *",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to save refresh token"))
    }

    async fn find(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find refresh token"))
    }

    async fn revoke(&self, token: &str, revoked_at: DateTime<Utc>) -> AppResult<bool> {
        // Single statement, so concurrent revokes cannot both win.
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = $2, updated_at = $2 \
             WHERE token = $1 AND revoked_at IS NULL",
        )
        .bind(token)
        .bind(revoked_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to revoke refresh token"))?;
        Ok(result.rows_affected() > 0)
    }
}
