//! Meal Entry model
//!
//! One recorded food consumption with absolute (already scaled) nutrients.
//! Entries are never updated in place; they are only created or deleted.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{conversion_error, DbResult};
use super::Macros;

/// Meal type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// A logged meal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: String,
    /// ISO date the entry belongs to: "2025-01-09"
    pub date: String,
    pub meal_type: MealType,
    pub food_name: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub portion_label: String,
    pub created_at: DateTime<Utc>,
}

/// Body of a meal creation, identical to the backend's `POST /meals` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntryCreate {
    pub meal_type: MealType,
    pub food_name: String,
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub portion_size: String,
}

impl MealEntryCreate {
    /// Build a creation payload from a scaled nutrient record
    pub fn from_macros(
        meal_type: MealType,
        food_name: impl Into<String>,
        macros: Macros,
        portion_size: impl Into<String>,
    ) -> Self {
        Self {
            meal_type,
            food_name: food_name.into(),
            calories: macros.calories,
            carbs: macros.carbs,
            protein: macros.protein,
            fat: macros.fat,
            portion_size: portion_size.into(),
        }
    }

    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            carbs: self.carbs,
            protein: self.protein,
            fat: self.fat,
        }
    }
}

impl MealEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        let meal_type = MealType::parse(&meal_type_str)
            .ok_or_else(|| conversion_error(2, format!("unknown meal type: {}", meal_type_str)))?;

        let created_at_str: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| conversion_error(9, format!("bad created_at {}: {}", created_at_str, e)))?
            .with_timezone(&Utc);

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal_type,
            food_name: row.get("food_name")?,
            calories: row.get("calories")?,
            carbs: row.get("carbs")?,
            protein: row.get("protein")?,
            fat: row.get("fat")?,
            portion_label: row.get("portion_label")?,
            created_at,
        })
    }

    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            carbs: self.carbs,
            protein: self.protein,
            fat: self.fat,
        }
    }

    /// Insert a new meal entry for the given date
    pub fn create(conn: &Connection, date: &str, data: &MealEntryCreate) -> DbResult<Self> {
        Self::create_at(conn, date, data, Utc::now())
    }

    /// Insert a new meal entry with an explicit creation time
    pub fn create_at(
        conn: &Connection,
        date: &str,
        data: &MealEntryCreate,
        created_at: DateTime<Utc>,
    ) -> DbResult<Self> {
        let id = Uuid::new_v4().to_string();

        conn.execute(
            r#"
            INSERT INTO meal_entries (
                id, date, meal_type, food_name,
                calories, carbs, protein, fat,
                portion_label, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                id,
                date,
                data.meal_type.as_str(),
                data.food_name,
                data.calories,
                data.carbs,
                data.protein,
                data.fat,
                data.portion_size,
                created_at.to_rfc3339(),
            ],
        )?;

        Self::get_by_id(conn, &id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All entries for a date, newest first
    pub fn get_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_entries WHERE date = ?1 ORDER BY created_at DESC, id",
        )?;

        let entries = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// All entries with `start <= date <= end`, newest first
    pub fn get_range(conn: &Connection, start_date: &str, end_date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meal_entries
            WHERE date >= ?1 AND date <= ?2
            ORDER BY created_at DESC, id
            "#,
        )?;

        let entries = stmt
            .query_map(params![start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Total number of entries ever logged
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM meal_entries", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
