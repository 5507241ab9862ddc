use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::atomic::{AtomicU64, Ordering};

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Connects to a fresh named in-memory SQLite database and runs all migrations.
///
/// The database uses `cache=shared` so every pooled connection sees the same
/// schema and data; each call gets a unique name so tests stay isolated.
pub async fn setup_test_db() -> DatabaseConnection {
    let n = DB_COUNTER.fetch_add(1, Ordering::Relaxed);
    let url = format!("sqlite:file:testdb_{n}?mode=memory&cache=shared");

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
