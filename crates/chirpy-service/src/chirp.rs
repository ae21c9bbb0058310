//! Chirp creation, listing, lookup, and owner-only deletion.

use std::sync::Arc;

use tracing::{debug, info};

use chirpy_auth::AuthorizationGate;
use chirpy_core::config::chirp::ChirpConfig;
use chirpy_core::error::AppError;
use chirpy_core::types::id::ChirpId;
use chirpy_database::repositories::{ChirpStore, UserStore};
use chirpy_entity::chirp::{Chirp, CreateChirp};

use crate::dto::CreateChirpRequest;

/// Handles chirp operations.
#[derive(Clone)]
pub struct ChirpService {
    /// Chirp store.
    chirps: Arc<dyn ChirpStore>,
    /// User store, to confirm the author still exists.
    users: Arc<dyn UserStore>,
    /// Credential checks.
    gate: Arc<AuthorizationGate>,
    /// Content limits.
    config: ChirpConfig,
}

impl std::fmt::Debug for ChirpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChirpService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChirpService {
    /// Creates a new chirp service.
    pub fn new(
        chirps: Arc<dyn ChirpStore>,
        users: Arc<dyn UserStore>,
        gate: Arc<AuthorizationGate>,
        config: ChirpConfig,
    ) -> Self {
        Self {
            chirps,
            users,
            gate,
            config,
        }
    }

    /// Posts a chirp as the authenticated caller.
    ///
    /// The body is stored verbatim and may not exceed the configured
    /// number of characters.
    pub async fn create(
        &self,
        authorization: Option<&str>,
        req: CreateChirpRequest,
    ) -> Result<Chirp, AppError> {
        let principal = self.gate.authenticate(authorization)?;

        if req.body.is_empty() {
            return Err(AppError::validation("Body is required"));
        }
        if req.body.chars().count() > self.config.max_length {
            return Err(AppError::validation("Chirp is too long"));
        }

        if self.users.find_by_id(principal).await?.is_none() {
            return Err(AppError::unauthorized("Unauthorized"));
        }

        let chirp = self
            .chirps
            .create(CreateChirp {
                body: req.body,
                user_id: principal,
            })
            .await?;

        info!(chirp_id = %chirp.id, user_id = %principal, "Chirp created");
        Ok(chirp)
    }

    /// All chirps, oldest first.
    pub async fn list(&self) -> Result<Vec<Chirp>, AppError> {
        self.chirps.list_all().await
    }

    /// A single chirp.
    pub async fn get(&self, id: ChirpId) -> Result<Chirp, AppError> {
        debug!(chirp_id = %id, "Looking up chirp");
        self.chirps
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Chirp not found"))
    }

    /// Deletes a chirp. Only its author may do so.
    pub async fn delete(&self, authorization: Option<&str>, id: ChirpId) -> Result<(), AppError> {
        let principal = self.gate.authenticate(authorization)?;
        let chirp = self.get(id).await?;

        self.gate.authorize_ownership(principal, chirp.user_id)?;

        if !self.chirps.delete(chirp.id).await? {
            // Deleted concurrently by the same author.
            return Err(AppError::not_found("Chirp not found"));
        }

        info!(chirp_id = %chirp.id, user_id = %principal, "Chirp deleted");
        Ok(())
    }
}

/// Parses a chirp ID taken from a request path.
pub fn parse_chirp_id(raw: &str) -> Result<ChirpId, AppError> {
    if raw.is_empty() {
        return Err(AppError::validation("Chirp ID is required"));
    }
    raw.parse()
        .map_err(|_| AppError::validation(format!("Invalid chirp ID: {raw}")))
}
