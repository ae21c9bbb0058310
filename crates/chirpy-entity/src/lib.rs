//! # chirpy-entity
//!
//! Domain entity models for Chirpy. Every struct in this crate represents
//! a database table row or the input for creating/updating one. Row types
//! derive `sqlx::FromRow`.

pub mod chirp;
pub mod refresh_token;
pub mod user;

pub use chirp::{Chirp, CreateChirp};
pub use refresh_token::RefreshToken;
pub use user::{CreateUser, UpdateUser, User};
