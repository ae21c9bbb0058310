//! Access token creation with HMAC-SHA256 signing.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use chirpy_core::config::auth::AuthConfig;
use chirpy_core::types::id::UserId;

use crate::error::AuthError;

use super::claims::Claims;

/// Creates signed access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// `iss` claim value.
    issuer: String,
    /// Default token lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(
            config.jwt_secret.as_bytes(),
            &config.jwt_issuer,
            config.access_ttl(),
        )
    }

    /// Creates an encoder from a raw secret.
    pub fn from_secret(secret: &[u8], issuer: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            issuer: issuer.to_string(),
            ttl,
        }
    }

    /// Issues an access token for `user_id` with the configured lifetime.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    /// Issues an access token valid for `ttl` from now.
    ///
    /// A negative `ttl` yields a token that is already expired.
    pub fn issue_with_ttl(&self, user_id: UserId, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now(), ttl)
    }

    /// Issues an access token with an explicit issue time.
    ///
    /// Identical inputs produce identical tokens.
    pub fn issue_at(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(&self.issuer, user_id, issued_at, ttl);
        self.encode_claims(&claims)
    }

    /// Signs arbitrary claims.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}
