//! User registration and profile updates.

use std::sync::Arc;

use tracing::{debug, info};

use chirpy_auth::PasswordHasher;
use chirpy_core::error::AppError;
use chirpy_core::types::id::UserId;
use chirpy_database::repositories::UserStore;
use chirpy_entity::user::{CreateUser, UpdateUser, User};

use crate::dto::{UserCredentials, validate};

/// Handles user registration and self-service updates.
#[derive(Clone)]
pub struct UserService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Registers a new user. A duplicate email is a `Conflict`.
    pub async fn create_user(&self, req: UserCredentials) -> Result<User, AppError> {
        validate(&req)?;

        let hashed_password = self.hasher.hash_password(&req.password)?;
        let user = self
            .users
            .create(CreateUser {
                email: req.email,
                hashed_password,
            })
            .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Replaces the caller's email and password.
    ///
    /// `principal` must already be authenticated by the gate.
    pub async fn update_user(
        &self,
        principal: UserId,
        req: UserCredentials,
    ) -> Result<User, AppError> {
        validate(&req)?;

        let hashed_password = self.hasher.hash_password(&req.password)?;
        let user = self
            .users
            .update(UpdateUser {
                id: principal,
                email: req.email,
                hashed_password,
            })
            .await?
            // The token outlived its user.
            .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;

        info!(user_id = %user.id, "User credentials updated");
        Ok(user)
    }

    /// Looks a user up by ID.
    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        debug!(user_id = %id, "Looking up user");
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Looks a user up by email.
    pub async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Deletes every user. Chirps and refresh tokens go with them.
    pub async fn reset(&self) -> Result<u64, AppError> {
        let deleted = self.users.delete_all().await?;
        info!(deleted, "All users deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_core::error::ErrorKind;
    use chirpy_database::MemoryStore;

    fn service() -> UserService {
        let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
        UserService::new(Arc::new(MemoryStore::new()), Arc::new(hasher))
    }

    fn creds(email: &str, password: &str) -> UserCredentials {
        UserCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let svc = service();
        let user = svc
            .create_user(creds("walt@breakingbad.com", "04234"))
            .await
            .unwrap();

        assert_ne!(user.hashed_password, "04234");
        assert!(user.hashed_password.starts_with("$argon2id$"));
        assert!(!user.is_chirpy_red);
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let svc = service();
        let err = svc.create_user(creds("", "")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let svc = service();
        svc.create_user(creds("walt@breakingbad.com", "04234"))
            .await
            .unwrap();
        let err = svc
            .create_user(creds("walt@breakingbad.com", "other"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_replaces_credentials() {
        let svc = service();
        let user = svc
            .create_user(creds("walt@breakingbad.com", "04234"))
            .await
            .unwrap();

        let updated = svc
            .update_user(user.id, creds("heisenberg@breakingbad.com", "losPollos"))
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, "heisenberg@breakingbad.com");
        assert_ne!(updated.hashed_password, user.hashed_password);
        assert!(svc.find_by_email("walt@breakingbad.com").await.is_err());
    }

    #[tokio::test]
    async fn test_update_unknown_principal() {
        let svc = service();
        let err = svc
            .update_user(UserId::new(), creds("ghost@breakingbad.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
