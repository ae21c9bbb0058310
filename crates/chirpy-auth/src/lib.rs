//! # chirpy-auth
//!
//! Authentication and session lifecycle for Chirpy.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and verification
//! - `jwt`: signed, short-lived access tokens
//! - `refresh`: opaque refresh token generation and stored lifecycle
//! - `credential`: `Authorization` header parsing
//! - `gate`: "who is the caller?" and "may they touch this resource?"
//! - `error`: the authentication error taxonomy

pub mod credential;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod refresh;

pub use error::AuthError;
pub use gate::AuthorizationGate;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use refresh::RefreshTokenIssuer;
