//! Chirp repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use chirpy_core::result::AppResult;
use chirpy_core::types::id::ChirpId;
use chirpy_entity::{Chirp, CreateChirp};

use super::{ChirpStore, map_sqlx_error};

/// PostgreSQL-backed [`ChirpStore`].
#[derive(Debug, Clone)]
pub struct PgChirpRepository {
    pool: PgPool,
}

impl PgChirpRepository {
    /// Create a new chirp repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChirpStore for PgChirpRepository {
    async fn create(&self, input: CreateChirp) -> AppResult<Chirp> {
        sqlx::query_as::<_, Chirp>(
            "INSERT INTO chirps (id, created_at, updated_at, body, user_id) \
             VALUES ($1, NOW(), NOW(), $2, $3) RETURNING *",
        )
        .bind(ChirpId::new())
        .bind(&input.body)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create chirp"))
    }

    async fn find_by_id(&self, id: ChirpId) -> AppResult<Option<Chirp>> {
        sqlx::query_as::<_, Chirp>("SELECT * FROM chirps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find chirp"))
    }

    async fn list_all(&self) -> AppResult<Vec<Chirp>> {
        sqlx::query_as::<_, Chirp>("SELECT * FROM chirps ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to list chirps"))
    }

    async fn delete(&self, id: ChirpId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete chirp"))?;
        Ok(result.rows_affected() > 0)
    }
}
