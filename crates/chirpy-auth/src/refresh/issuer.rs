//! Refresh token lifecycle: issue, resolve, revoke.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use chirpy_core::config::auth::AuthConfig;
use chirpy_core::types::id::UserId;
use chirpy_database::repositories::RefreshTokenStore;
use chirpy_entity::refresh_token::RefreshToken;

use crate::error::AuthError;

use super::generator::generate_refresh_token;

/// Issues refresh tokens and checks them against the store.
///
/// The store is the only shared state; concurrent revocations of the same
/// token settle on the first timestamp written.
#[derive(Clone)]
pub struct RefreshTokenIssuer {
    /// Token persistence.
    store: Arc<dyn RefreshTokenStore>,
    /// Default lifetime of newly issued tokens.
    ttl: Duration,
}

impl std::fmt::Debug for RefreshTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl RefreshTokenIssuer {
    /// Creates an issuer over `store` using the configured refresh TTL.
    pub fn new(store: Arc<dyn RefreshTokenStore>, config: &AuthConfig) -> Self {
        Self::with_ttl(store, config.refresh_ttl())
    }

    /// Creates an issuer with an explicit TTL.
    pub fn with_ttl(store: Arc<dyn RefreshTokenStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Default lifetime of new tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generates a token string without persisting it.
    pub fn generate(&self) -> Result<String, AuthError> {
        generate_refresh_token()
    }

    /// Persists `token` for `user_id`, expiring `ttl` from now.
    pub async fn save(
        &self,
        user_id: UserId,
        token: &str,
        ttl: Duration,
    ) -> Result<RefreshToken, AuthError> {
        let expires_at = Utc::now() + ttl;
        let record = self.store.create(token, user_id, expires_at).await?;

        debug!(user_id = %user_id, expires_at = %record.expires_at, "Refresh token stored");
        Ok(record)
    }

    /// Generates and persists a token with the default lifetime.
    pub async fn issue(&self, user_id: UserId) -> Result<RefreshToken, AuthError> {
        let token = self.generate()?;
        self.save(user_id, &token, self.ttl).await
    }

    /// Resolves a presented token to the user it was issued to.
    ///
    /// Revocation is checked before expiry, so a token that is both
    /// revoked and expired reports `TokenRevoked`.
    pub async fn resolve(&self, token: &str) -> Result<UserId, AuthError> {
        let record = self
            .store
            .find(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if record.is_revoked() {
            return Err(AuthError::TokenRevoked);
        }
        if record.is_expired_at(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(record.user_id)
    }

    /// Marks a token revoked.
    ///
    /// Revoking an unknown or already revoked token succeeds and leaves
    /// the stored state unchanged.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        if self.store.revoke(token, Utc::now()).await? {
            info!("Refresh token revoked");
        } else {
            debug!("Refresh token revoke was a no-op");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_database::MemoryStore;
    use chirpy_database::repositories::UserStore;
    use chirpy_entity::user::CreateUser;

    async fn setup() -> (RefreshTokenIssuer, MemoryStore, UserId) {
        let store = MemoryStore::new();
        let user = UserStore::create(
            &store,
            CreateUser {
                email: "walt@breakingbad.com".to_string(),
                hashed_password: "$argon2id$stub".to_string(),
            },
        )
        .await
        .unwrap();
        let issuer = RefreshTokenIssuer::with_ttl(Arc::new(store.clone()), Duration::days(60));
        (issuer, store, user.id)
    }

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let (issuer, _, user) = setup().await;
        let record = issuer.issue(user).await.unwrap();

        assert_eq!(record.token.len(), 64);
        assert!(record.revoked_at.is_none());
        assert_eq!(issuer.resolve(&record.token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (issuer, _, _) = setup().await;
        assert!(matches!(
            issuer.resolve("deadbeef").await,
            Err(AuthError::TokenNotFound)
        ));
    }

    #[tokio::test]
    async fn test_revoked_token() {
        let (issuer, _, user) = setup().await;
        let record = issuer.issue(user).await.unwrap();

        issuer.revoke(&record.token).await.unwrap();
        assert!(matches!(
            issuer.resolve(&record.token).await,
            Err(AuthError::TokenRevoked)
        ));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let (issuer, _, user) = setup().await;
        let token = issuer.generate().unwrap();
        issuer
            .save(user, &token, -Duration::seconds(1))
            .await
            .unwrap();

        assert!(matches!(
            issuer.resolve(&token).await,
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_revoked_wins_over_expired() {
        let (issuer, _, user) = setup().await;
        let token = issuer.generate().unwrap();
        issuer
            .save(user, &token, -Duration::seconds(1))
            .await
            .unwrap();
        issuer.revoke(&token).await.unwrap();

        assert!(matches!(
            issuer.resolve(&token).await,
            Err(AuthError::TokenRevoked)
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (issuer, store, user) = setup().await;
        let record = issuer.issue(user).await.unwrap();

        issuer.revoke(&record.token).await.unwrap();
        let first = RefreshTokenStore::find(&store, &record.token)
            .await
            .unwrap()
            .unwrap()
            .revoked_at;

        issuer.revoke(&record.token).await.unwrap();
        let second = RefreshTokenStore::find(&store, &record.token)
            .await
            .unwrap()
            .unwrap()
            .revoked_at;

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_revoke_unknown_is_ok() {
        let (issuer, _, _) = setup().await;
        assert!(issuer.revoke("not-a-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_save_for_missing_user_is_storage_error() {
        let (issuer, _, _) = setup().await;
        let token = issuer.generate().unwrap();
        assert!(matches!(
            issuer.save(UserId::new(), &token, Duration::days(1)).await,
            Err(AuthError::Storage(_))
        ));
    }
}
