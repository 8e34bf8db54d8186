//! Storefront customer CLI - database migrations and configuration checks.
//!
//! # Usage
//!
//! ```bash
//! # Apply the customer schema migrations
//! customer-cli migrate
//!
//! # Validate the environment configuration without connecting
//! customer-cli config check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use thiserror::Error;

use storefront_customer::config::{ConfigError, CustomerConfig};

mod commands;

#[derive(Parser)]
#[command(name = "customer-cli")]
#[command(author, version, about = "Storefront customer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate configuration from the environment
    Check,
}

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CustomerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Invalid configuration: {e}");
            }
            std::process::exit(2);
        }
    };

    let _sentry_guard = storefront_customer::telemetry::init(&config);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CustomerConfig) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run(config).await?,
        Commands::Config { action } => match action {
            ConfigAction::Check => commands::config::check(config),
        },
    }
    Ok(())
}
