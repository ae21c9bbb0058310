//! Authentication and ownership checks at the edge of every protected
//! operation.

use tracing::warn;

use chirpy_core::types::id::UserId;

use crate::credential::extract_bearer;
use crate::error::AuthError;
use crate::jwt::JwtDecoder;
use crate::refresh::RefreshTokenIssuer;

/// Answers "who is the caller?" and "may they touch this resource?".
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    /// Access token verification.
    decoder: JwtDecoder,
    /// Refresh token lookup.
    refresh: RefreshTokenIssuer,
}

impl AuthorizationGate {
    /// Creates a gate from its two token checkers.
    pub fn new(decoder: JwtDecoder, refresh: RefreshTokenIssuer) -> Self {
        Self { decoder, refresh }
    }

    /// Resolves an `Authorization` header carrying an access token.
    pub fn authenticate(&self, header: Option<&str>) -> Result<UserId, AuthError> {
        extract_bearer(header)
            .and_then(|token| self.decoder.verify(token))
            .inspect_err(|e| warn!(reason = e.kind_name(), "Access token rejected"))
    }

    /// Resolves an `Authorization` header carrying a refresh token.
    pub async fn authenticate_refresh(&self, header: Option<&str>) -> Result<UserId, AuthError> {
        let result = match extract_bearer(header) {
            Ok(token) => self.refresh.resolve(token).await,
            Err(e) => Err(e),
        };
        result.inspect_err(|e| warn!(reason = e.kind_name(), "Refresh token rejected"))
    }

    /// Requires that `principal` owns the resource.
    ///
    /// A mismatch is `Forbidden`, not an authentication failure: the
    /// caller's identity is known.
    pub fn authorize_ownership(
        &self,
        principal: UserId,
        resource_owner: UserId,
    ) -> Result<(), AuthError> {
        if principal == resource_owner {
            Ok(())
        } else {
            warn!(
                principal = %principal,
                owner = %resource_owner,
                "Ownership check failed"
            );
            Err(AuthError::Forbidden)
        }
    }

    /// Access token verifier.
    pub fn decoder(&self) -> &JwtDecoder {
        &self.decoder
    }

    /// Refresh token issuer.
    pub fn refresh_tokens(&self) -> &RefreshTokenIssuer {
        &self.refresh
    }
}
