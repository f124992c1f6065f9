//! Goal model
//!
//! User-defined targets (e.g. "drink 8 glasses", "lose 3 kg").

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{conversion_error, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub goal_type: String,
    pub target_value: f64,
    pub current_value: f64,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Data for creating a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalCreate {
    pub goal_type: String,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub description: String,
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, format!("bad timestamp {}: {}", raw, e)))
}

impl Goal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let created_at: String = row.get("created_at")?;
        let completed_at: Option<String> = row.get("completed_at")?;

        Ok(Self {
            id: row.get("id")?,
            goal_type: row.get("goal_type")?,
            target_value: row.get("target_value")?,
            current_value: row.get("current_value")?,
            description: row.get("description")?,
            completed: row.get("completed")?,
            created_at: parse_timestamp(6, &created_at)?,
            completed_at: completed_at
                .as_deref()
                .map(|raw| parse_timestamp(7, raw))
                .transpose()?,
        })
    }

    pub fn create(conn: &Connection, data: &GoalCreate) -> DbResult<Self> {
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO goals (id, goal_type, target_value, current_value, description, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id,
                data.goal_type,
                data.target_value,
                data.current_value,
                data.description,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Self::get_by_id(conn, &id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All goals, oldest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goals ORDER BY created_at, id")?;

        let goals = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Mark a goal completed. Returns None if no open goal has that id.
    pub fn complete(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            "UPDATE goals SET completed = 1, completed_at = ?1 WHERE id = ?2 AND completed = 0",
            params![Utc::now().to_rfc3339(), id],
        )?;

        if rows == 0 {
            return Ok(None);
        }

        Self::get_by_id(conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    #[test]
    fn test_create_and_complete() {
        let conn = test_connection();
        let goal = Goal::create(
            &conn,
            &GoalCreate {
                goal_type: "water".to_string(),
                target_value: 8.0,
                current_value: 0.0,
                description: "Beber 8 copos".to_string(),
            },
        )
        .unwrap();
        assert!(!goal.completed);
        assert!(goal.completed_at.is_none());

        let done = Goal::complete(&conn, &goal.id).unwrap().unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        // Completing twice finds no open goal
        assert!(Goal::complete(&conn, &goal.id).unwrap().is_none());
        assert_eq!(Goal::list(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_complete_unknown_goal() {
        let conn = test_connection();
        assert!(Goal::complete(&conn, "missing").unwrap().is_none());
    }
}
