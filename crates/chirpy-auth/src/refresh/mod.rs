//! Opaque refresh tokens and their stored lifecycle.

pub mod generator;
pub mod issuer;

pub use generator::generate_refresh_token;
pub use issuer::RefreshTokenIssuer;
