//! Pooled database handle shared by every repository.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

/// Build the connection pool without touching the network. Connections are
/// opened on first use, so an unreachable database does not stop the server
/// from starting.
///
/// # Errors
///
/// Returns `DbErr` if the URL cannot be parsed or names an unsupported backend.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(&config.database_url);
    opt.max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .connect_lazy(true)
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// One round trip to check connectivity. Logs the outcome and reports it.
pub async fn probe(db: &DatabaseConnection) -> bool {
    match db.ping().await {
        Ok(()) => {
            tracing::info!("Database connection established");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Database connectivity probe failed");
            false
        }
    }
}

/// Apply pending migrations.
///
/// # Errors
///
/// Propagates any migration failure.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    tracing::info!("Running migrations...");
    migration::Migrator::up(db, None).await?;
    tracing::info!("Migrations completed");
    Ok(())
}
