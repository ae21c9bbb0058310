//! Authentication error taxonomy.
//!
//! Every variant is distinguishable for tests and logs, but callers
//! outside the auth boundary only see the collapsed [`AppError`]: all
//! credential and token failures become the same `Unauthorized`.

use thiserror::Error;

use chirpy_core::error::{AppError, ErrorKind};

/// Failure of an authentication or authorization step.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential was presented.
    #[error("missing credential")]
    CredentialMissing,
    /// The `Authorization` header does not have the expected shape.
    #[error("malformed credential")]
    CredentialMalformed,
    /// The access token signature does not verify with our secret.
    #[error("invalid token signature")]
    SignatureInvalid,
    /// The access token is not a well-formed signed token.
    #[error("malformed token")]
    TokenMalformed,
    /// The token is past its expiry.
    #[error("token has expired")]
    TokenExpired,
    /// The refresh token was revoked.
    #[error("token has been revoked")]
    TokenRevoked,
    /// The refresh token is not known to the store.
    #[error("token not found")]
    TokenNotFound,
    /// The password does not match the stored hash.
    #[error("password does not match")]
    PasswordMismatch,
    /// The caller is authenticated but does not own the resource.
    #[error("caller does not own this resource")]
    Forbidden,
    /// The storage service failed.
    #[error("storage failure: {0}")]
    Storage(#[from] AppError),
    /// The system random source failed.
    #[error("entropy source failure: {0}")]
    Entropy(String),
    /// Hashing or parsing a password hash failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// Signing an access token failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Whether this failure is surfaced to clients as "unauthorized".
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::CredentialMissing
                | Self::CredentialMalformed
                | Self::SignatureInvalid
                | Self::TokenMalformed
                | Self::TokenExpired
                | Self::TokenRevoked
                | Self::TokenNotFound
                | Self::PasswordMismatch
        )
    }

    /// Short machine-readable name, safe to log.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::CredentialMissing => "credential_missing",
            Self::CredentialMalformed => "credential_malformed",
            Self::SignatureInvalid => "signature_invalid",
            Self::TokenMalformed => "token_malformed",
            Self::TokenExpired => "token_expired",
            Self::TokenRevoked => "token_revoked",
            Self::TokenNotFound => "token_not_found",
            Self::PasswordMismatch => "password_mismatch",
            Self::Forbidden => "forbidden",
            Self::Storage(_) => "storage_failure",
            Self::Entropy(_) => "entropy_failure",
            Self::Hashing(_) => "hashing_failure",
            Self::Signing(_) => "signing_failure",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PasswordMismatch => AppError::with_source(
                ErrorKind::Unauthorized,
                "Incorrect email or password",
                err,
            ),
            e if e.is_unauthorized() => {
                AppError::with_source(ErrorKind::Unauthorized, "Unauthorized", e)
            }
            AuthError::Forbidden => AppError::with_source(
                ErrorKind::Forbidden,
                "You do not have permission to modify this resource",
                err,
            ),
            AuthError::Storage(inner) if inner.kind == ErrorKind::Database => inner,
            e => AppError::with_source(ErrorKind::Internal, "Something went wrong", e),
        }
    }
}
