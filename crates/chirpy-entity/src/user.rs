//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use chirpy_core::types::id::UserId;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier; never reused.
    pub id: UserId,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Login email, unique across users.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// Whether the user holds a paid membership.
    pub is_chirpy_red: bool,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub hashed_password: String,
}

/// Replacement credentials for an existing user.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    /// The user to update.
    pub id: UserId,
    /// New login email.
    pub email: String,
    /// New pre-hashed password.
    pub hashed_password: String,
}
