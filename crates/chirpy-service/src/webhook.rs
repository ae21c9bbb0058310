//! Payment provider webhook.

use std::sync::Arc;

use tracing::{debug, info, warn};

use chirpy_auth::credential::{constant_time_eq, extract_api_key};
use chirpy_core::error::AppError;
use chirpy_database::repositories::UserStore;

use crate::dto::PolkaEvent;

/// Event that upgrades a user to the paid tier.
pub const USER_UPGRADED: &str = "user.upgraded";

/// What a webhook call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The user was marked as a paid member.
    Upgraded,
    /// The event is not one we act on.
    Ignored,
}

/// Handles events posted by the payment provider.
#[derive(Clone)]
pub struct WebhookService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Key the provider must present.
    api_key: String,
}

impl std::fmt::Debug for WebhookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookService")
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl WebhookService {
    /// Creates a webhook service accepting `api_key`.
    ///
    /// An empty key rejects every call.
    pub fn new(users: Arc<dyn UserStore>, api_key: impl Into<String>) -> Self {
        Self {
            users,
            api_key: api_key.into(),
        }
    }

    /// Authenticates the provider and applies the event.
    pub async fn handle(
        &self,
        authorization: Option<&str>,
        event: PolkaEvent,
    ) -> Result<WebhookOutcome, AppError> {
        let key = extract_api_key(authorization)
            .inspect_err(|e| warn!(reason = e.kind_name(), "Webhook credential rejected"))?;

        if self.api_key.is_empty() || !constant_time_eq(key, &self.api_key) {
            warn!("Webhook API key mismatch");
            return Err(AppError::unauthorized("Unauthorized"));
        }

        if event.event != USER_UPGRADED {
            debug!(event = %event.event, "Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored);
        }

        let user_id = event
            .data
            .user_id
            .ok_or_else(|| AppError::validation("user_id is required"))?;

        if !self.users.upgrade_to_red(user_id).await? {
            return Err(AppError::not_found("User not found"));
        }

        info!(user_id = %user_id, "User upgraded to Chirpy Red");
        Ok(WebhookOutcome::Upgraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpy_core::error::ErrorKind;
    use chirpy_core::types::id::UserId;
    use chirpy_database::MemoryStore;
    use chirpy_entity::user::CreateUser;

    const KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

    async fn setup() -> (WebhookService, Arc<MemoryStore>, UserId) {
        let store = Arc::new(MemoryStore::new());
        let user = UserStore::create(
            store.as_ref(),
            CreateUser {
                email: "walt@breakingbad.com".to_string(),
                hashed_password: "$argon2id$stub".to_string(),
            },
        )
        .await
        .unwrap();
        (WebhookService::new(store.clone(), KEY), store, user.id)
    }

    fn upgraded(user_id: UserId) -> PolkaEvent {
        PolkaEvent {
            event: USER_UPGRADED.to_string(),
            data: crate::dto::PolkaEventData {
                user_id: Some(user_id),
            },
        }
    }

    #[tokio::test]
    async fn test_upgrade() {
        let (svc, store, user) = setup().await;
        let header = format!("ApiKey {KEY}");

        let outcome = svc.handle(Some(&header), upgraded(user)).await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Upgraded);

        let stored = UserStore::find_by_id(store.as_ref(), user)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_chirpy_red);
    }

    #[tokio::test]
    async fn test_other_events_are_ignored() {
        let (svc, _, user) = setup().await;
        let header = format!("ApiKey {KEY}");
        let mut event = upgraded(user);
        event.event = "user.payment_failed".to_string();

        assert_eq!(
            svc.handle(Some(&header), event).await.unwrap(),
            WebhookOutcome::Ignored
        );
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (svc, _, _) = setup().await;
        let header = format!("ApiKey {KEY}");
        let err = svc
            .handle(Some(&header), upgraded(UserId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_bad_key() {
        let (svc, _, user) = setup().await;
        let bearer = format!("Bearer {KEY}");

        for header in [None, Some("ApiKey wrong"), Some(bearer.as_str())] {
            let err = svc.handle(header, upgraded(user)).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Unauthorized);
        }
    }

    #[tokio::test]
    async fn test_empty_configured_key_rejects_everything() {
        let store = Arc::new(MemoryStore::new());
        let svc = WebhookService::new(store, "");
        let err = svc
            .handle(Some("ApiKey anything"), upgraded(UserId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
