//! Access token verification.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use chirpy_core::config::auth::AuthConfig;
use chirpy_core::types::id::UserId;

use crate::error::AuthError;

use super::claims::Claims;

/// Verifies access tokens against the shared secret.
///
/// Stateless: no store is consulted, so any number of requests may use
/// one decoder concurrently.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(config.jwt_secret.as_bytes(), &config.jwt_issuer)
    }

    /// Creates a decoder from a raw secret.
    pub fn from_secret(secret: &[u8], issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact: a token is valid only while now < exp.
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verifies `token` and returns the user it was issued to.
    ///
    /// The signature is checked before expiry, so a forged token reports
    /// `SignatureInvalid` even when it is also expired.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        self.decode_claims(token)?.user_id()
    }

    /// Verifies `token` and returns its claims.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Access token rejected");
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    JwtErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                    _ => AuthError::TokenMalformed,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::jwt::encoder::JwtEncoder;

    const SECRET: &[u8] = b"supersecret";

    fn pair() -> (JwtEncoder, JwtDecoder) {
        (
            JwtEncoder::from_secret(SECRET, "chirpy", Duration::minutes(1)),
            JwtDecoder::from_secret(SECRET, "chirpy"),
        )
    }

    #[test]
    fn test_issue_then_verify() {
        let (encoder, decoder) = pair();
        let user = UserId::new();
        let token = encoder.issue(user).unwrap();
        assert_eq!(decoder.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let (_, decoder) = pair();
        assert!(matches!(
            decoder.verify("invalid.token.here"),
            Err(AuthError::TokenMalformed)
        ));
        assert!(matches!(decoder.verify(""), Err(AuthError::TokenMalformed)));
    }

    #[test]
    fn test_expired_token() {
        let (encoder, decoder) = pair();
        let token = encoder
            .issue_with_ttl(UserId::new(), -Duration::minutes(1))
            .unwrap();
        assert!(matches!(decoder.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret() {
        let (encoder, _) = pair();
        let other = JwtDecoder::from_secret(b"another-secret", "chirpy");
        let token = encoder.issue(UserId::new()).unwrap();
        assert!(matches!(other.verify(&token), Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn test_wrong_secret_wins_over_expiry() {
        let (encoder, _) = pair();
        let other = JwtDecoder::from_secret(b"another-secret", "chirpy");
        let token = encoder
            .issue_with_ttl(UserId::new(), -Duration::minutes(1))
            .unwrap();
        assert!(matches!(other.verify(&token), Err(AuthError::SignatureInvalid)));
    }

    #[test]
    fn test_non_uuid_subject_is_malformed() {
        let (encoder, decoder) = pair();
        let mut claims = Claims::new("chirpy", UserId::new(), Utc::now(), Duration::minutes(1));
        claims.sub = "not-a-uuid".to_string();
        let token = encoder.encode_claims(&claims).unwrap();
        assert!(matches!(decoder.verify(&token), Err(AuthError::TokenMalformed)));
    }

    #[test]
    fn test_foreign_issuer_is_malformed() {
        let (_, decoder) = pair();
        let foreign = JwtEncoder::from_secret(SECRET, "someone-else", Duration::minutes(1));
        let token = foreign.issue(UserId::new()).unwrap();
        assert!(matches!(decoder.verify(&token), Err(AuthError::TokenMalformed)));
    }

    #[test]
    fn test_refresh_token_shape_is_rejected() {
        let (_, decoder) = pair();
        let opaque = "a".repeat(64);
        assert!(matches!(
            decoder.verify(&opaque),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn test_tampered_payload() {
        let (encoder, decoder) = pair();
        let token = encoder.issue(UserId::new()).unwrap();
        let other = encoder.issue(UserId::new()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(
            decoder.verify(&spliced),
            Err(AuthError::SignatureInvalid)
        ));
    }
}
