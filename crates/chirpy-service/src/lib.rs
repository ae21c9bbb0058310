//! # chirpy-service
//!
//! Business flows for Chirpy. Each service receives the raw
//! `Authorization` header value from the transport layer, resolves the
//! caller through the [`AuthorizationGate`](chirpy_auth::AuthorizationGate),
//! and returns either a response DTO or an [`AppError`](chirpy_core::AppError)
//! whose kind maps to a status code.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod chirp;
pub mod dto;
pub mod session;
pub mod state;
pub mod user;
pub mod webhook;

pub use chirp::ChirpService;
pub use session::SessionService;
pub use state::Services;
pub use user::UserService;
pub use webhook::{WebhookOutcome, WebhookService};
