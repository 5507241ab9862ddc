//! Application state container shared across Axum route handlers.
//!
//! This struct holds shared resources such as the database connection.
//! It is cheap to clone and passed into route handlers via Axum's `State<T>` extractor.

use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// Currently this is just a cloned, thread-safe database connection for use
/// with SeaORM; the connection pool lives behind it.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    ///
    /// This is ideal when the caller does not need ownership.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
