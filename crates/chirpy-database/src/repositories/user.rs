//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use chirpy_core::result::AppResult;
use chirpy_core::types::id::UserId;
use chirpy_entity::{CreateUser, UpdateUser, User};

use super::{UserStore, map_sqlx_error};

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, created_at, updated_at, email, hashed_password) \
             VALUES ($1, NOW(), NOW(), $2, $3) RETURNING *",
        )
        .bind(UserId::new())
        .bind(&input.email)
        .bind(&input.hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create user"))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find user by id"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find user by email"))
    }

    async fn update(&self, input: UpdateUser) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = $2, hashed_password = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(input.id)
        .bind(&input.email)
        .bind(&input.hashed_password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update user"))
    }

    async fn upgrade_to_red(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_chirpy_red = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to upgrade user"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete users"))?;
        Ok(result.rows_affected())
    }
}
