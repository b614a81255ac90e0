//! Start the server.

use clap::Args;
use tracing::info;

use campus_core::config::{AppConfig, StoreProvider};
use campus_core::error::AppError;
use campus_database::{DatabasePool, Stores, migration};

/// Arguments for the serve command
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    super::init_logging(&config.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting campus messaging server");

    let stores = match config.store.provider {
        StoreProvider::Postgres => {
            let db = DatabasePool::connect(&config.database).await?;
            if !args.no_migrate {
                migration::run_migrations(db.pool()).await?;
            }
            Stores::postgres(db)
        }
        StoreProvider::Memory => {
            info!("Using in-memory stores; state is lost on restart");
            Stores::memory()
        }
    };

    campus_api::run_server(config, stores).await
}
