//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use serde_json::Value;

use super::handlers::{AuthCommandHandler, CatalogCommandHandler, CheckCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::models::PaginationParams;
use crate::state::AppState;

/// Execute a CLI command and print its result as pretty JSON on stdout
///
/// Without a subcommand the influencer catalog's first page is shown.
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    let output = run_command(cli, settings).await?;
    let rendered =
        serde_json::to_string_pretty(&output).map_err(|e| AppError::Internal { source: e.into() })?;
    println!("{rendered}");
    Ok(())
}

/// Dispatch to the handler for `cli.command` and return its JSON output
pub async fn run_command(cli: &Cli, settings: Settings) -> AppResult<Value> {
    validate_command_args(cli)?;

    if let Some(Commands::Check) = cli.command {
        return CheckCommandHandler::new(settings).execute();
    }

    let state = AppState::new(settings)?;
    dispatch(cli, state).await
}

async fn dispatch(cli: &Cli, state: AppState) -> AppResult<Value> {
    state.auth.initialize().await;

    match &cli.command {
        None => {
            CatalogCommandHandler::new(state)
                .influencers(&Default::default(), PaginationParams::default())
                .await
        }
        Some(command @ Commands::Influencers { page, .. }) => {
            let filter = command.influencer_filter().unwrap_or_default();
            CatalogCommandHandler::new(state)
                .influencers(&filter, (*page).into())
                .await
        }
        Some(command @ Commands::Packages { page, .. }) => {
            let filter = command.package_filter().unwrap_or_default();
            CatalogCommandHandler::new(state)
                .packages(&filter, (*page).into())
                .await
        }
        Some(Commands::Users { page }) => CatalogCommandHandler::new(state).users((*page).into()).await,
        Some(Commands::Register {
            email,
            password,
            role,
        }) => {
            AuthCommandHandler::new(state)
                .register(email, password, (*role).into())
                .await
        }
        Some(Commands::Login { email, password }) => {
            AuthCommandHandler::new(state).login(email, password).await
        }
        Some(Commands::Check) => Err(AppError::Validation {
            field: "command".to_string(),
            reason: "check does not need backend state".to_string(),
        }),
    }
}

/// Validate command arguments before execution
fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|msg| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason: msg,
    })
}
