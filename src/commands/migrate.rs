//! Apply database migrations.

use campus_core::config::AppConfig;
use campus_core::error::AppError;
use campus_database::{DatabasePool, migration};

/// Execute the migrate command
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    super::init_logging(&config.logging);

    let db = DatabasePool::connect(&config.database).await?;
    migration::run_migrations(db.pool()).await?;
    db.close().await;

    println!("All migrations applied successfully.");
    Ok(())
}
