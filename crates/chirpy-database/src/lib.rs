//! # chirpy-database
//!
//! The storage service the auth core consumes: store traits, their
//! PostgreSQL implementations, an in-memory implementation, and pool
//! and migration management.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::{ChirpStore, RefreshTokenStore, UserStore};
