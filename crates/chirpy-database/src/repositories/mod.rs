//! Storage contract consumed by the auth core and services.
//!
//! Each trait is implemented by a PostgreSQL repository in this module and
//! by [`MemoryStore`](crate::memory::MemoryStore). Row-level atomicity
//! (for example of a revoke) is the implementation's responsibility.

pub mod chirp;
pub mod refresh_token;
pub mod user;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use chirpy_core::error::{AppError, ErrorKind};
use chirpy_core::result::AppResult;
use chirpy_core::types::id::{ChirpId, UserId};
use chirpy_entity::{Chirp, CreateChirp, CreateUser, RefreshToken, UpdateUser, User};

use crate::memory::MemoryStore;

pub use chirp::PgChirpRepository;
pub use refresh_token::PgRefreshTokenRepository;
pub use user::PgUserRepository;

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a new user. A duplicate email is a `Conflict`.
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by login email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Replace a user's email and password hash. `None` if the user is gone.
    async fn update(&self, input: UpdateUser) -> AppResult<Option<User>>;

    /// Mark a user as a paid member. Returns `false` if no such user.
    async fn upgrade_to_red(&self, id: UserId) -> AppResult<bool>;

    /// Delete every user, cascading to chirps and refresh tokens.
    async fn delete_all(&self) -> AppResult<u64>;
}

/// Chirp persistence.
#[async_trait]
pub trait ChirpStore: Send + Sync + 'static {
    /// Insert a new chirp.
    async fn create(&self, input: CreateChirp) -> AppResult<Chirp>;

    /// Find a chirp by primary key.
    async fn find_by_id(&self, id: ChirpId) -> AppResult<Option<Chirp>>;

    /// All chirps, oldest first.
    async fn list_all(&self) -> AppResult<Vec<Chirp>>;

    /// Delete a chirp. Returns `false` if it did not exist.
    async fn delete(&self, id: ChirpId) -> AppResult<bool>;
}

/// Refresh token persistence.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a freshly generated token.
    async fn create(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken>;

    /// Look a token up regardless of its state.
    async fn find(&self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// Set `revoked_at` on a token that is not revoked yet.
    ///
    /// Returns `false` when the token is unknown or already revoked; the
    /// first revocation timestamp is never overwritten.
    async fn revoke(&self, token: &str, revoked_at: DateTime<Utc>) -> AppResult<bool>;
}

/// The three stores, bundled for wiring.
#[derive(Clone)]
pub struct Stores {
    /// User store.
    pub users: Arc<dyn UserStore>,
    /// Chirp store.
    pub chirps: Arc<dyn ChirpStore>,
    /// Refresh token store.
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl Stores {
    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            chirps: Arc::new(PgChirpRepository::new(pool.clone())),
            refresh_tokens: Arc::new(PgRefreshTokenRepository::new(pool)),
        }
    }

    /// Stores sharing one in-memory state.
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            chirps: Arc::new(store.clone()),
            refresh_tokens: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// Maps a sqlx error, turning unique violations into `Conflict`.
pub(crate) fn map_sqlx_error(err: sqlx::Error, context: &str) -> AppError {
    let unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if unique {
        AppError::with_source(ErrorKind::Conflict, format!("{context}: already exists"), err)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}
