//! CLI interface module
//!
//! This module provides command-line interface functionality for smart-utm.

pub mod commands;

use crate::cli::{Commands, ConfigCommands, PresetCommands, TokenCommands};
use crate::errors::UtmError;
use crate::runtime::lifetime::startup::StartupContext;
use crate::storage::StorageFactory;
use commands::{config_generate, issue_token, list_presets, run_bulk};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<UtmError> for CliError {
    fn from(err: UtmError) -> Self {
        match &err {
            UtmError::Validation(msg) => CliError::ParseError(msg.clone()),
            UtmError::DatabaseConfig(_)
            | UtmError::DatabaseConnection(_)
            | UtmError::DatabaseOperation(_) => CliError::StorageError(err.to_string()),
            _ => CliError::CommandError(err.message().to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        // 以下命令不需要数据库
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force).await,

        Commands::Token {
            action: TokenCommands::Issue {
                user,
                role,
                minutes,
            },
        } => issue_token(&user, &role, minutes),

        Commands::Bulk { action } => {
            let context = build_context().await?;
            run_bulk(&context, &action).await
        }

        Commands::Presets {
            action: PresetCommands::List { json },
        } => {
            let context = build_context().await?;
            list_presets(&context, json).await
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by server mode".to_string(),
        )),
    }
}

async fn build_context() -> Result<StartupContext, CliError> {
    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;
    StartupContext::build(storage)
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))
}
