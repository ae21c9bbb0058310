//! CLI command definitions and dispatch.

pub mod migrate;
pub mod reset;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};

use chirpy_core::config::AppConfig;
use chirpy_core::error::AppError;
use chirpy_database::DatabasePool;
use chirpy_service::Services;

use crate::output::OutputFormat;

/// Chirpy administration
#[derive(Debug, Parser)]
#[command(name = "chirpy", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Delete every user, with their chirps and tokens
    Reset(reset::ResetArgs),
    /// User management
    User(user::UserArgs),
    /// Access and refresh token tools
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Reset(args) => reset::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Token(args) => token::execute(args, &config, self.format).await,
        }
    }
}

/// Helper: connect to the database and wire the services on top of it
pub async fn connect(config: &AppConfig) -> Result<(DatabasePool, Services), AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    let services = Services::new(config, pool.stores());
    Ok((pool, services))
}
