//! Chirp entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use chirpy_core::types::id::{ChirpId, UserId};

/// A short text post owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chirp {
    /// Unique chirp identifier.
    pub id: ChirpId,
    /// When the chirp was created.
    pub created_at: DateTime<Utc>,
    /// When the chirp was last updated.
    pub updated_at: DateTime<Utc>,
    /// Post content.
    pub body: String,
    /// Author and owner.
    pub user_id: UserId,
}

/// Data required to create a new chirp.
#[derive(Debug, Clone)]
pub struct CreateChirp {
    /// Post content, already validated.
    pub body: String,
    /// Authenticated author.
    pub user_id: UserId,
}
