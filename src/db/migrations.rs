//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEAL ENTRIES
        -- Absolute nutrients, never updated after insert
        -- ============================================
        CREATE TABLE meal_entries (
            id TEXT PRIMARY KEY,                 -- uuid v4
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            food_name TEXT NOT NULL,
            calories REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            protein REAL NOT NULL DEFAULT 0,     -- grams
            fat REAL NOT NULL DEFAULT 0,         -- grams
            portion_label TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL             -- RFC 3339, UTC
        );

        CREATE INDEX idx_meal_entries_date ON meal_entries(date);

        -- ============================================
        -- WATER LOGS
        -- One row per day
        -- ============================================
        CREATE TABLE water_logs (
            date TEXT PRIMARY KEY,
            glasses_count INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- GOALS
        -- ============================================
        CREATE TABLE goals (
            id TEXT PRIMARY KEY,                 -- uuid v4
            goal_type TEXT NOT NULL,
            target_value REAL NOT NULL,
            current_value REAL NOT NULL DEFAULT 0,
            description TEXT NOT NULL DEFAULT '',
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            completed_at TEXT
        );

        -- ============================================
        -- PROFILE
        -- Single row (id = 1)
        -- ============================================
        CREATE TABLE profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            name TEXT NOT NULL DEFAULT '',
            age INTEGER,
            weight_kg REAL,
            height_cm REAL,
            gender TEXT,
            activity_level TEXT NOT NULL DEFAULT 'moderate',
            goal TEXT NOT NULL DEFAULT 'healthy_eating',
            daily_calories_target REAL NOT NULL DEFAULT 2000,
            streak_count INTEGER NOT NULL DEFAULT 0,
            last_activity_date TEXT,
            badges TEXT NOT NULL DEFAULT '[]',   -- JSON array of badge ids
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO profile (id) VALUES (1);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());

        let profiles: i64 = conn
            .query_row("SELECT COUNT(*) FROM profile", [], |row| row.get(0))
            .unwrap();
        assert_eq!(profiles, 1);
    }
}
