//! Refresh token row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use chirpy_core::types::id::UserId;

/// A persisted opaque refresh token.
///
/// Rows are written once at login and afterwards only mutated by
/// revocation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// The 64-character hex token itself (primary key).
    pub token: String,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// When the row was last touched.
    pub updated_at: DateTime<Utc>,
    /// Principal the token resolves to.
    pub user_id: UserId,
    /// Hard expiry.
    pub expires_at: DateTime<Utc>,
    /// Set once the token has been revoked.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Whether the token has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
