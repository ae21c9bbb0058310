//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString,
        rand_core::{OsRng, RngCore},
    },
};

use crate::error::AuthError;

/// Salt length in bytes.
const SALT_LEN: usize = 16;

/// Handles password hashing and verification using Argon2id.
///
/// Hashes are PHC strings carrying their own salt and cost parameters, so
/// verification always uses the parameters a hash was created with.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Cost parameters for new hashes.
    params: Params,
    /// Hash checked against when the account does not exist.
    dummy_hash: OnceLock<String>,
}

impl PasswordHasher {
    /// Creates a hasher with the Argon2id default cost (tens of milliseconds).
    pub fn new() -> Self {
        Self::with_params(Params::default())
    }

    /// Creates a hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Creates a hasher from raw Argon2 costs: memory in KiB, iterations,
    /// and lanes.
    pub fn with_cost(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self::with_params(params))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    ///
    /// A failing random source is reported as `Hashing`.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| AuthError::Hashing(format!("salt generation failed: {e}")))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hashing(e.to_string()))?;

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not, and
    /// an error only when the stored hash cannot be parsed or checked.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

        match self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }

    /// Like [`verify_password`](Self::verify_password), but a mismatch is
    /// `AuthError::PasswordMismatch`.
    pub fn require_password(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        if self.verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AuthError::PasswordMismatch)
        }
    }

    /// Spends the same work as a real verification and always fails.
    ///
    /// Used when the account does not exist, so an unknown email and a
    /// wrong password take comparable time.
    pub fn reject_unknown_account(&self, password: &str) -> AuthError {
        let dummy = match self.dummy_hash.get() {
            Some(hash) => hash.clone(),
            None => match self.hash_password("chirpy-unknown-account") {
                Ok(hash) => self.dummy_hash.get_or_init(|| hash).clone(),
                Err(e) => return e,
            },
        };
        let _ = self.verify_password(password, &dummy);
        AuthError::PasswordMismatch
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        assert!(matches!(
            PasswordHasher::with_cost(1, 1, 1),
            Err(AuthError::Hashing(_))
        ));
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash_password("testPassword").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("testPassword", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_is_mismatch() {
        let hasher = fast_hasher();
        let hash = hasher.hash_password("testPassword").unwrap();
        assert!(!hasher.verify_password("wrongPassword", &hash).unwrap());
        assert!(matches!(
            hasher.require_password("wrongPassword", &hash),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = fast_hasher();
        let a = hasher.hash_password("testPassword").unwrap();
        let b = hasher.hash_password("testPassword").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_not_a_mismatch() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.verify_password("testPassword", "not-a-phc-string"),
            Err(AuthError::Hashing(_))
        ));
    }

    #[test]
    fn test_verify_uses_hash_parameters() {
        let hash = fast_hasher().hash_password("testPassword").unwrap();
        // A hasher configured differently still verifies older hashes.
        let other = PasswordHasher::with_params(Params::new(2048, 2, 1, None).unwrap());
        assert!(other.verify_password("testPassword", &hash).unwrap());
    }

    #[test]
    fn test_unknown_account_always_rejected() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.reject_unknown_account("chirpy-unknown-account"),
            AuthError::PasswordMismatch
        ));
    }
}
