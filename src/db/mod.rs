//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

/// Error for a column whose stored text does not decode into the model type
pub(crate) fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, message.into())
}

/// Fresh in-memory database with the full schema
#[cfg(test)]
pub(crate) fn test_connection() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().expect("in-memory database");
    migrations::run_migrations(&conn).expect("migrations");
    conn
}

/// Pooled database in a temporary directory, migrated
#[cfg(test)]
pub(crate) fn test_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = Database::new(dir.path().join("nutrilog.db")).expect("database");
    db.with_conn(migrations::run_migrations).expect("migrations");
    (dir, db)
}
