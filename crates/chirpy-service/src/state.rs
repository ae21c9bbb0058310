//! Service wiring.

use std::sync::Arc;

use chirpy_auth::{AuthorizationGate, JwtDecoder, JwtEncoder, PasswordHasher, RefreshTokenIssuer};
use chirpy_core::config::AppConfig;
use chirpy_database::repositories::Stores;

use crate::chirp::ChirpService;
use crate::session::SessionService;
use crate::user::UserService;
use crate::webhook::WebhookService;

/// Every service, built once at startup and shared between requests.
#[derive(Debug, Clone)]
pub struct Services {
    /// Registration and profile updates.
    pub users: UserService,
    /// Login, refresh, revoke.
    pub sessions: SessionService,
    /// Chirps.
    pub chirps: ChirpService,
    /// Payment webhook.
    pub webhooks: WebhookService,
    /// Credential checks, for callers outside the services.
    pub gate: Arc<AuthorizationGate>,
    /// Access token encoder.
    pub encoder: Arc<JwtEncoder>,
}

impl Services {
    /// Wires every service from configuration and stores.
    pub fn new(config: &AppConfig, stores: Stores) -> Self {
        Self::with_hasher(config, stores, PasswordHasher::new())
    }

    /// Like [`new`](Self::new) with a custom password hasher.
    pub fn with_hasher(config: &AppConfig, stores: Stores, hasher: PasswordHasher) -> Self {
        let hasher = Arc::new(hasher);
        let encoder = Arc::new(JwtEncoder::new(&config.auth));
        let refresh = RefreshTokenIssuer::new(stores.refresh_tokens.clone(), &config.auth);
        let gate = Arc::new(AuthorizationGate::new(
            JwtDecoder::new(&config.auth),
            refresh,
        ));

        Self {
            users: UserService::new(stores.users.clone(), hasher.clone()),
            sessions: SessionService::new(
                stores.users.clone(),
                hasher,
                encoder.clone(),
                gate.clone(),
            ),
            chirps: ChirpService::new(
                stores.chirps.clone(),
                stores.users.clone(),
                gate.clone(),
                config.chirps.clone(),
            ),
            webhooks: WebhookService::new(stores.users, config.auth.polka_key.clone()),
            gate,
            encoder,
        }
    }
}
