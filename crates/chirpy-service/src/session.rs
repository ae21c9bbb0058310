//! Login, access token refresh, and refresh token revocation.

use std::sync::Arc;

use tracing::{error, info, warn};

use chirpy_auth::credential::extract_bearer;
use chirpy_auth::{AuthError, AuthorizationGate, JwtEncoder, PasswordHasher};
use chirpy_core::error::AppError;
use chirpy_database::repositories::UserStore;

use crate::dto::{LoginRequest, LoginResult, RefreshResponse, validate};

/// Manages the session lifecycle.
#[derive(Clone)]
pub struct SessionService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Access token encoder.
    encoder: Arc<JwtEncoder>,
    /// Credential checks and refresh token lifecycle.
    gate: Arc<AuthorizationGate>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        gate: Arc<AuthorizationGate>,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
            gate,
        }
    }

    /// Checks the password and issues an access token and a refresh token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResult, AppError> {
        validate(&req)?;

        let user = match self.users.find_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                let err = self.hasher.reject_unknown_account(&req.password);
                warn!(reason = err.kind_name(), "Login rejected");
                return Err(err.into());
            }
        };

        match self
            .hasher
            .require_password(&req.password, &user.hashed_password)
        {
            Ok(()) => {}
            Err(AuthError::Hashing(reason)) => {
                error!(user_id = %user.id, reason = %reason, "Stored password hash is unusable");
                return Err(AuthError::PasswordMismatch.into());
            }
            Err(e) => {
                warn!(user_id = %user.id, reason = e.kind_name(), "Login rejected");
                return Err(e.into());
            }
        }

        let token = self.encoder.issue(user.id)?;
        let refresh = self.gate.refresh_tokens().issue(user.id).await?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            user: user.into(),
            token,
            refresh_token: refresh.token,
        })
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// The refresh token stays valid; it is not rotated.
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<RefreshResponse, AppError> {
        let user_id = self.gate.authenticate_refresh(authorization).await?;
        let token = self.encoder.issue(user_id)?;

        info!(user_id = %user_id, "Access token refreshed");
        Ok(RefreshResponse { token })
    }

    /// Revokes the presented refresh token.
    ///
    /// Unknown and already revoked tokens succeed without changes.
    pub async fn revoke(&self, authorization: Option<&str>) -> Result<(), AppError> {
        let token = extract_bearer(authorization)
            .inspect_err(|e| warn!(reason = e.kind_name(), "Revoke rejected"))?;
        self.gate.refresh_tokens().revoke(token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use chirpy_auth::{JwtDecoder, RefreshTokenIssuer};
    use chirpy_core::error::ErrorKind;
    use chirpy_database::repositories::Stores;
    use chirpy_entity::user::CreateUser;

    const SECRET: &[u8] = b"session-secret";

    struct Fixture {
        sessions: SessionService,
        decoder: JwtDecoder,
        stores: Stores,
    }

    async fn fixture() -> Fixture {
        let stores = Stores::memory();
        let hasher = Arc::new(PasswordHasher::with_cost(1024, 1, 1).unwrap());
        let hash = hasher.hash_password("testPassword").unwrap();
        stores
            .users
            .create(CreateUser {
                email: "walt@breakingbad.com".to_string(),
                hashed_password: hash,
            })
            .await
            .unwrap();

        let decoder = JwtDecoder::from_secret(SECRET, "chirpy");
        let refresh = RefreshTokenIssuer::with_ttl(stores.refresh_tokens.clone(), Duration::days(60));
        let gate = Arc::new(AuthorizationGate::new(decoder.clone(), refresh));
        let encoder = Arc::new(JwtEncoder::from_secret(SECRET, "chirpy", Duration::hours(1)));

        Fixture {
            sessions: SessionService::new(stores.users.clone(), hasher, encoder, gate),
            decoder,
            stores,
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_both_tokens() {
        let f = fixture().await;
        let result = f
            .sessions
            .login(login_req("walt@breakingbad.com", "testPassword"))
            .await
            .unwrap();

        assert_eq!(f.decoder.verify(&result.token).unwrap(), result.user.id);
        assert_eq!(result.refresh_token.len(), 64);

        let stored = f
            .stores
            .refresh_tokens
            .find(&result.refresh_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, result.user.id);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let f = fixture().await;
        let unknown = f
            .sessions
            .login(login_req("jesse@breakingbad.com", "testPassword"))
            .await
            .unwrap_err();
        let wrong = f
            .sessions
            .login(login_req("walt@breakingbad.com", "wrongPassword"))
            .await
            .unwrap_err();

        assert_eq!(unknown.kind, ErrorKind::Unauthorized);
        assert_eq!(wrong.kind, ErrorKind::Unauthorized);
        assert_eq!(unknown.message, wrong.message);
        assert_eq!(wrong.message, "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let f = fixture().await;
        let err = f.sessions.login(login_req("", "")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_refresh_then_revoke() {
        let f = fixture().await;
        let login = f
            .sessions
            .login(login_req("walt@breakingbad.com", "testPassword"))
            .await
            .unwrap();
        let header = format!("Bearer {}", login.refresh_token);

        let refreshed = f.sessions.refresh(Some(&header)).await.unwrap();
        assert_eq!(f.decoder.verify(&refreshed.token).unwrap(), login.user.id);

        // Not rotated: the same refresh token keeps working.
        assert!(f.sessions.refresh(Some(&header)).await.is_ok());

        f.sessions.revoke(Some(&header)).await.unwrap();
        let err = f.sessions.refresh(Some(&header)).await.unwrap_err();
        assert_eq!(err.http_status(), 401);

        // Revoking twice is fine.
        assert!(f.sessions.revoke(Some(&header)).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_with_access_token_fails() {
        let f = fixture().await;
        let login = f
            .sessions
            .login(login_req("walt@breakingbad.com", "testPassword"))
            .await
            .unwrap();
        let header = format!("Bearer {}", login.token);

        let err = f.sessions.refresh(Some(&header)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_revoke_requires_header() {
        let f = fixture().await;
        let err = f.sessions.revoke(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
