//! Access and refresh token tools.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use chirpy_auth::{AuthError, JwtDecoder};
use chirpy_core::config::AppConfig;
use chirpy_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue an access token for a user
    Issue {
        /// Login email
        email: String,
    },
    /// Verify an access token
    Verify {
        /// The access token
        token: String,
    },
    /// Revoke a refresh token
    Revoke {
        /// The refresh token
        token: String,
    },
}

/// Verified access token display row
#[derive(Debug, Serialize, Tabled)]
struct ClaimsRow {
    /// Principal
    user_id: String,
    /// Issuer
    issuer: String,
    /// Issued at
    issued_at: String,
    /// Expires at
    expires_at: String,
}

/// Checks an access token offline; only the signing secret is needed.
///
/// A rejection carries the failure kind, e.g. `Token rejected: token_expired`.
fn verify(config: &AppConfig, token: &str) -> Result<ClaimsRow, AppError> {
    let rejected =
        |e: AuthError| AppError::unauthorized(format!("Token rejected: {}", e.kind_name()));

    let claims = JwtDecoder::new(&config.auth)
        .decode_claims(token)
        .map_err(rejected)?;
    let user_id = claims.user_id().map_err(rejected)?;

    let stamp = |ts: i64| {
        chrono::DateTime::from_timestamp(ts, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| ts.to_string())
    };
    Ok(ClaimsRow {
        user_id: user_id.to_string(),
        issuer: claims.iss,
        issued_at: stamp(claims.iat),
        expires_at: stamp(claims.exp),
    })
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Issue { email } => {
            let (pool, services) = super::connect(config).await?;
            let user = services.users.find_by_email(email).await?;
            let token = services.encoder.issue(user.id)?;
            pool.close().await;

            output::print_value("token", &token, format);
        }
        TokenCommand::Verify { token } => {
            let row = verify(config, token)?;
            output::print_item(&row, format);
        }
        TokenCommand::Revoke { token } => {
            let (pool, services) = super::connect(config).await?;
            services.gate.refresh_tokens().revoke(token).await?;
            pool.close().await;

            output::print_success("Refresh token revoked.");
        }
    }

    Ok(())
}
