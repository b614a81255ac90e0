//! CLI command definitions and dispatch.

pub mod migrate;
pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use campus_core::config::{AppConfig, LoggingConfig};
use campus_core::error::AppError;

/// Realtime two-party messaging with presence
#[derive(Debug, Parser)]
#[command(name = "campus-server", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}`
    #[arg(short, long, env = "CAMPUS_ENV", default_value = "development")]
    pub env: String,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP and WebSocket server
    Serve(serve::ServeArgs),
    /// Apply pending database migrations
    Migrate,
    /// Mint a development token for an actor
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;

        match &self.command {
            Some(Commands::Serve(args)) => serve::execute(args, config).await,
            None => serve::execute(&serve::ServeArgs::default(), config).await,
            Some(Commands::Migrate) => migrate::execute(config).await,
            Some(Commands::Token(args)) => token::execute(args, &config),
        }
    }
}

/// Initialize tracing from the logging section. `RUST_LOG` takes precedence.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = match config.format.as_str() {
        "json" => builder.json().with_thread_ids(true).try_init(),
        _ => builder.pretty().try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}
