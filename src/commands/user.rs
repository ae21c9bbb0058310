//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use chirpy_core::config::AppConfig;
use chirpy_core::error::AppError;
use chirpy_entity::user::User;
use chirpy_service::dto::UserCredentials;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user
    Create {
        /// Login email
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show a user
    Show {
        /// Login email
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct UserRow {
    /// User ID
    id: String,
    /// Email
    email: String,
    /// Chirpy Red member
    chirpy_red: bool,
    /// Created at
    created_at: String,
    /// Updated at
    updated_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            chirpy_red: u.is_chirpy_red,
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
            updated_at: u.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (pool, services) = super::connect(config).await?;

    match &args.command {
        UserCommand::Create { email, password } => {
            let password = match password {
                Some(password) => password.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let user = services
                .users
                .create_user(UserCredentials {
                    email: email.clone(),
                    password,
                })
                .await?;

            output::print_item(&UserRow::from(&user), format);
            output::print_success(&format!("User '{email}' created"));
        }
        UserCommand::Show { email } => {
            let user = services.users.find_by_email(email).await?;
            output::print_item(&UserRow::from(&user), format);
        }
    }

    pool.close().await;
    Ok(())
}
