use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Connects to a fresh in-memory SQLite database and applies the real
/// migrations. A single pooled connection keeps the in-memory database
/// alive for the whole test.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
