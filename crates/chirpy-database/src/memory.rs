//! In-memory store using a Tokio lock, for tests and single-process runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use chirpy_core::error::AppError;
use chirpy_core::result::AppResult;
use chirpy_core::types::id::{ChirpId, UserId};
use chirpy_entity::{Chirp, CreateChirp, CreateUser, RefreshToken, UpdateUser, User};

use crate::repositories::{ChirpStore, RefreshTokenStore, UserStore};

/// Table contents.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

/// In-memory implementation of every store trait.
///
/// Clones share the same tables. Foreign keys and cascades behave like
/// the PostgreSQL schema.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == input.email) {
            return Err(AppError::conflict("Failed to create user: already exists"));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            created_at: now,
            updated_at: now,
            email: input.email,
            hashed_password: input.hashed_password,
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, input: UpdateUser) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.email == input.email && u.id != input.id)
        {
            return Err(AppError::conflict("Failed to update user: already exists"));
        }

        let Some(user) = tables.users.get_mut(&input.id) else {
            return Ok(None);
        };
        user.email = input.email;
        user.hashed_password = input.hashed_password;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn upgrade_to_red(&self, id: UserId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let count = tables.users.len() as u64;
        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(count)
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create(&self, input: CreateChirp) -> AppResult<Chirp> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&input.user_id) {
            return Err(AppError::database(
                "Failed to create chirp: unknown user_id",
            ));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: ChirpId::new(),
            created_at: now,
            updated_at: now,
            body: input.body,
            user_id: input.user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn find_by_id(&self, id: ChirpId) -> AppResult<Option<Chirp>> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Chirp>> {
        // Insertion order is creation order.
        Ok(self.tables.read().await.chirps.clone())
    }

    async fn delete(&self, id: ChirpId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() < before)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn create(
        &self,
        token: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user_id) {
            return Err(AppError::database(
                "Failed to save refresh token: unknown user_id",
            ));
        }
        if tables.refresh_tokens.contains_key(token) {
            return Err(AppError::conflict(
                "Failed to save refresh token: already exists",
            ));
        }

        let now = Utc::now();
        let row = RefreshToken {
            token: token.to_string(),
            created_at: now,
            updated_at: now,
            user_id,
            expires_at,
            revoked_at: None,
        };
        tables.refresh_tokens.insert(row.token.clone(), row.clone());
        Ok(row)
    }

    async fn find(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self.tables.read().await.refresh_tokens.get(token).cloned())
    }

    async fn revoke(&self, token: &str, revoked_at: DateTime<Utc>) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.refresh_tokens.get_mut(token) {
            Some(row) if row.revoked_at.is_none() => {
                row.revoked_at = Some(revoked_at);
                row.updated_at = revoked_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_core::error::ErrorKind;
    use chrono::Duration;

    async fn seeded() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = UserStore::create(
            &store,
            CreateUser {
                email: "saul@bettercall.com".to_string(),
                hashed_password: "hash".to_string(),
            },
        )
        .await
        .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (store, _) = seeded().await;
        let err = UserStore::create(
            &store,
            CreateUser {
                email: "saul@bettercall.com".to_string(),
                hashed_password: "other".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_revoke_keeps_first_timestamp() {
        let (store, user) = seeded().await;
        let expires = Utc::now() + Duration::days(60);
        RefreshTokenStore::create(&store, "tok", user.id, expires)
            .await
            .unwrap();

        let first = Utc::now();
        assert!(store.revoke("tok", first).await.unwrap());
        assert!(!store.revoke("tok", first + Duration::minutes(5)).await.unwrap());
        assert!(!store.revoke("missing", first).await.unwrap());

        let row = store.find("tok").await.unwrap().unwrap();
        assert_eq!(row.revoked_at, Some(first));
    }

    #[tokio::test]
    async fn test_refresh_token_requires_user() {
        let store = MemoryStore::new();
        let err = RefreshTokenStore::create(&store, "tok", UserId::new(), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_delete_all_cascades() {
        let (store, user) = seeded().await;
        ChirpStore::create(
            &store,
            CreateChirp {
                body: "I'm the one who knocks!".to_string(),
                user_id: user.id,
            },
        )
        .await
        .unwrap();
        RefreshTokenStore::create(&store, "tok", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert!(store.list_all().await.unwrap().is_empty());
        assert!(store.find("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chirps_listed_in_creation_order() {
        let (store, user) = seeded().await;
        for body in ["first", "second", "third"] {
            ChirpStore::create(
                &store,
                CreateChirp {
                    body: body.to_string(),
                    user_id: user.id,
                },
            )
            .await
            .unwrap();
        }

        let bodies: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.body)
            .collect();
        assert_eq!(bodies, ["first", "second", "third"]);
    }
}
