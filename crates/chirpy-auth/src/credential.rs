//! `Authorization` header parsing.
//!
//! Two schemes are accepted: `Bearer <token>` from clients and
//! `ApiKey <key>` from the payment provider's webhook. Both use the same
//! shape: the scheme keyword, exactly one space, then a non-empty value.

use crate::error::AuthError;

/// Scheme used by clients for access and refresh tokens.
pub const BEARER_SCHEME: &str = "Bearer";

/// Scheme used by the payment provider's webhook.
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Extracts the token from a `Bearer <token>` header value.
///
/// An absent or empty header is `CredentialMissing`. Any other shape
/// (missing or wrong scheme, extra segments, empty token) is
/// `CredentialMalformed`. The scheme keyword matches case-insensitively.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    extract_scheme(header, BEARER_SCHEME)
}

/// Extracts the key from an `ApiKey <key>` header value.
pub fn extract_api_key(header: Option<&str>) -> Result<&str, AuthError> {
    extract_scheme(header, API_KEY_SCHEME)
}

fn extract_scheme<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, AuthError> {
    let value = match header {
        None | Some("") => return Err(AuthError::CredentialMissing),
        Some(value) => value,
    };

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [given, token] if given.eq_ignore_ascii_case(scheme) && !token.is_empty() => Ok(*token),
        _ => Err(AuthError::CredentialMalformed),
    }
}

/// Compares two secrets without short-circuiting on the first differing
/// byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_ok() {
        assert_eq!(extract_bearer(Some("Bearer abc123")).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_bearer(Some("bearer abc123")).unwrap(), "abc123");
        assert_eq!(extract_bearer(Some("BEARER abc123")).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_token_is_case_sensitive() {
        assert_eq!(extract_bearer(Some("Bearer AbC")).unwrap(), "AbC");
    }

    #[test]
    fn test_bearer_missing() {
        assert!(matches!(extract_bearer(None), Err(AuthError::CredentialMissing)));
        assert!(matches!(
            extract_bearer(Some("")),
            Err(AuthError::CredentialMissing)
        ));
    }

    #[test]
    fn test_bearer_malformed() {
        for value in [
            "Basic xyz",
            "Bearer a b",
            "Bearer",
            "Bearer ",
            "abc123",
            "Bearer  abc123",
            " Bearer abc123",
            "ApiKey abc123",
        ] {
            assert!(
                matches!(
                    extract_bearer(Some(value)),
                    Err(AuthError::CredentialMalformed)
                ),
                "expected malformed for {value:?}"
            );
        }
    }

    #[test]
    fn test_api_key() {
        assert_eq!(extract_api_key(Some("ApiKey f271c81f")).unwrap(), "f271c81f");
        assert_eq!(extract_api_key(Some("apikey f271c81f")).unwrap(), "f271c81f");
        assert!(matches!(
            extract_api_key(Some("Bearer f271c81f")),
            Err(AuthError::CredentialMalformed)
        ));
        assert!(matches!(
            extract_api_key(None),
            Err(AuthError::CredentialMissing)
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("f271c81f", "f271c81f"));
        assert!(!constant_time_eq("f271c81f", "f271c81e"));
        assert!(!constant_time_eq("f271c81f", "f271c81"));
        assert!(constant_time_eq("", ""));
    }
}
