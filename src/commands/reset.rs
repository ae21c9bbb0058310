//! Development reset: removes every user.

use clap::Args;

use chirpy_core::config::AppConfig;
use chirpy_core::error::AppError;

use crate::output;

/// Arguments for the reset command
#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Execute the reset command
pub async fn execute(args: &ResetArgs, config: &AppConfig) -> Result<(), AppError> {
    if !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("This will DELETE all users, chirps, and refresh tokens. Continue?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let (pool, services) = super::connect(config).await?;
    let deleted = services.users.reset().await?;
    pool.close().await;

    output::print_success(&format!("Deleted {deleted} user(s)."));
    Ok(())
}
