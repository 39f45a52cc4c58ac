//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for smart-utm using clap's derive macros.

use clap::{Parser, Subcommand};

/// SmartUTM - UTM link builder service
#[derive(Parser)]
#[command(name = "smart-utm")]
#[command(version)]
#[command(about = "UTM link builder with presets, templates and bulk generation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Issue access tokens and nonces
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Run a bulk pass against the configured database
    ///
    /// Actions: generate_all, refresh_all, delete_all
    Bulk {
        /// Bulk action name
        action: String,
    },

    /// Manage UTM presets
    Presets {
        #[command(subcommand)]
        action: PresetCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Token commands
#[derive(Subcommand)]
pub enum TokenCommands {
    /// Issue an access token plus REST and bulk nonces
    Issue {
        /// User the token is bound to
        #[arg(long)]
        user: String,

        /// Role (administrator, editor, author, contributor, subscriber)
        #[arg(long, default_value = "administrator")]
        role: String,

        /// Access token lifetime in minutes (default: auth.access_token_minutes)
        #[arg(long)]
        minutes: Option<u64>,
    },
}

/// Preset commands
#[derive(Subcommand)]
pub enum PresetCommands {
    /// List all presets
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_has_no_command() {
        let cli = Cli::try_parse_from(["smart-utm"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_token_issue_args() {
        let cli = Cli::try_parse_from([
            "smart-utm", "token", "issue", "--user", "alice", "--role", "editor", "--minutes", "5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Token {
                action: TokenCommands::Issue { user, role, minutes },
            }) => {
                assert_eq!(user, "alice");
                assert_eq!(role, "editor");
                assert_eq!(minutes, Some(5));
            }
            _ => panic!("expected token issue"),
        }
    }

    #[test]
    fn test_bulk_requires_action() {
        assert!(Cli::try_parse_from(["smart-utm", "bulk"]).is_err());
        let cli = Cli::try_parse_from(["smart-utm", "bulk", "delete_all"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Bulk { action }) if action == "delete_all"));
    }
}
