//! JWT claims structure used in access tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use chirpy_core::types::id::UserId;

use crate::error::AuthError;

/// Registered claims embedded in every access token.
///
/// There is no token-type claim: refresh tokens are opaque
/// hex strings and can never parse as a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, always the configured service name.
    pub iss: String,
    /// Subject, the user ID as a string.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` issued at `issued_at` and valid for `ttl`.
    pub fn new(issuer: &str, user_id: UserId, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Parses the subject back into a user ID.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub.parse().map_err(|_| AuthError::TokenMalformed)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_window() {
        let now = Utc::now();
        let user = UserId::new();
        let claims = Claims::new("chirpy", user, now, Duration::hours(1));

        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.user_id().unwrap(), user);
        assert_eq!(claims.expires_at().unwrap().timestamp(), claims.exp);
    }

    #[test]
    fn test_bad_subject_is_malformed() {
        let mut claims = Claims::new("chirpy", UserId::new(), Utc::now(), Duration::hours(1));
        claims.sub = "user-42".to_string();
        assert!(matches!(claims.user_id(), Err(AuthError::TokenMalformed)));
    }
}
