//! Authentication configuration.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted access token lifetime: one year.
pub const MAX_ACCESS_TTL_MINUTES: u64 = 60 * 24 * 365;

/// Longest accepted refresh token lifetime: ten years.
pub const MAX_REFRESH_TTL_DAYS: u64 = 365 * 10;

/// Authentication and credential configuration.
///
/// Read once at startup and shared read-only between requests.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access token signing (HMAC-SHA256).
    #[serde(default)]
    pub jwt_secret: String,
    /// Value of the `iss` claim on issued access tokens.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Shared key the payment provider presents on webhook calls.
    #[serde(default)]
    pub polka_key: String,
}

impl AuthConfig {
    /// Configuration with the given signing secret and default lifetimes.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            jwt_issuer: default_issuer(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            polka_key: String::new(),
        }
    }

    /// Access token lifetime, or `None` when `access_ttl_minutes` is zero
    /// or above [`MAX_ACCESS_TTL_MINUTES`].
    pub fn try_access_ttl(&self) -> Option<Duration> {
        bounded(self.access_ttl_minutes, MAX_ACCESS_TTL_MINUTES).and_then(Duration::try_minutes)
    }

    /// Refresh token lifetime, or `None` when `refresh_ttl_days` is zero or
    /// above [`MAX_REFRESH_TTL_DAYS`].
    pub fn try_refresh_ttl(&self) -> Option<Duration> {
        bounded(self.refresh_ttl_days, MAX_REFRESH_TTL_DAYS).and_then(Duration::try_days)
    }

    /// Access token lifetime. Out-of-range values are clamped; [`validate`]
    /// rejects them at load time.
    ///
    /// [`validate`]: Self::validate
    pub fn access_ttl(&self) -> Duration {
        let minutes = self.access_ttl_minutes.clamp(1, MAX_ACCESS_TTL_MINUTES);
        Duration::minutes(minutes as i64)
    }

    /// Refresh token lifetime, clamped like [`access_ttl`](Self::access_ttl).
    pub fn refresh_ttl(&self) -> Duration {
        let days = self.refresh_ttl_days.clamp(1, MAX_REFRESH_TTL_DAYS);
        Duration::days(days as i64)
    }

    /// Rejects a missing secret and token lifetimes outside their bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must be set"));
        }
        if self.try_access_ttl().is_none() {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must be between 1 and {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if self.try_refresh_ttl().is_none() {
            return Err(AppError::configuration(format!(
                "auth.refresh_ttl_days must be between 1 and {MAX_REFRESH_TTL_DAYS}"
            )));
        }
        Ok(())
    }
}

/// `value` as an `i64` when it lies in `1..=max`.
fn bounded(value: u64, max: u64) -> Option<i64> {
    if (1..=max).contains(&value) {
        i64::try_from(value).ok()
    } else {
        None
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("polka_key", &"<redacted>")
            .finish()
    }
}

fn default_issuer() -> String {
    "chirpy".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    60
}
