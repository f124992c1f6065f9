//! Water log model
//!
//! Glasses of water per day.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Daily glasses target shown next to the counter
pub const WATER_TARGET_GLASSES: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterLog {
    pub date: String,
    pub glasses_count: u32,
    pub target: u32,
}

impl WaterLog {
    /// Glasses logged on a date; zero when nothing was logged
    pub fn get(conn: &Connection, date: &str) -> DbResult<Self> {
        let result = conn.query_row(
            "SELECT glasses_count FROM water_logs WHERE date = ?1",
            [date],
            |row| row.get::<_, u32>(0),
        );

        let glasses_count = match result {
            Ok(count) => count,
            Err(rusqlite::Error::QueryReturnedNoRows) => 0,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            date: date.to_string(),
            glasses_count,
            target: WATER_TARGET_GLASSES,
        })
    }

    /// Add glasses to a day, creating its row on first use
    pub fn add_glasses(conn: &Connection, date: &str, glasses: u32) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO water_logs (date, glasses_count)
            VALUES (?1, ?2)
            ON CONFLICT(date) DO UPDATE SET
                glasses_count = glasses_count + excluded.glasses_count,
                updated_at = datetime('now')
            "#,
            params![date, glasses],
        )?;

        Self::get(conn, date)
    }
}
