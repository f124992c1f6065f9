//! Profile model
//!
//! Single-row table holding body data, the calorie target and gamification
//! state (streak and earned badges).

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{conversion_error, DbResult};
use crate::nutrition::energy::{daily_calorie_target, ActivityLevel, Gender, WeightGoal};
use super::{Badge, DailyTarget};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: ActivityLevel,
    pub goal: WeightGoal,
    pub daily_calories_target: f64,
    pub streak_count: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub badges: Vec<Badge>,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<WeightGoal>,
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: Option<String> = row.get("gender")?;
        let activity_level: String = row.get("activity_level")?;
        let goal: String = row.get("goal")?;
        let last_activity: Option<String> = row.get("last_activity_date")?;
        let badges_json: String = row.get("badges")?;

        let last_activity_date = last_activity
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|e| conversion_error(10, format!("bad date {}: {}", raw, e)))
            })
            .transpose()?;

        let badge_ids: Vec<String> = serde_json::from_str(&badges_json)
            .map_err(|e| conversion_error(11, format!("bad badges {}: {}", badges_json, e)))?;

        Ok(Self {
            name: row.get("name")?,
            age: row.get("age")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            gender: gender.as_deref().and_then(Gender::parse),
            activity_level: ActivityLevel::parse(&activity_level),
            goal: WeightGoal::parse(&goal),
            daily_calories_target: row.get("daily_calories_target")?,
            streak_count: row.get("streak_count")?,
            last_activity_date,
            // Unknown ids from an older catalog are dropped
            badges: badge_ids.iter().filter_map(|id| Badge::parse(id)).collect(),
        })
    }

    pub fn get(conn: &Connection) -> DbResult<Self> {
        let profile = conn.query_row("SELECT * FROM profile WHERE id = 1", [], Self::from_row)?;
        Ok(profile)
    }

    pub fn target(&self) -> DailyTarget {
        DailyTarget::new(self.daily_calories_target)
    }

    /// Target from body data, or the default when any input is missing
    pub fn computed_target(&self) -> f64 {
        match (self.weight_kg, self.height_cm, self.age, self.gender) {
            (Some(weight), Some(height), Some(age), Some(gender)) => daily_calorie_target(
                weight,
                height,
                age,
                gender,
                self.activity_level,
                self.goal,
            ),
            _ => DailyTarget::DEFAULT_CALORIES,
        }
    }

    /// Apply an update and recompute the calorie target
    pub fn update(conn: &Connection, data: &ProfileUpdate) -> DbResult<Self> {
        let mut profile = Self::get(conn)?;

        if let Some(ref name) = data.name {
            profile.name = name.trim().to_string();
        }
        if data.age.is_some() {
            profile.age = data.age;
        }
        if data.weight_kg.is_some() {
            profile.weight_kg = data.weight_kg;
        }
        if data.height_cm.is_some() {
            profile.height_cm = data.height_cm;
        }
        if data.gender.is_some() {
            profile.gender = data.gender;
        }
        if let Some(level) = data.activity_level {
            profile.activity_level = level;
        }
        if let Some(goal) = data.goal {
            profile.goal = goal;
        }
        profile.daily_calories_target = profile.computed_target();

        conn.execute(
            r#"
            UPDATE profile SET
                name = ?1,
                age = ?2,
                weight_kg = ?3,
                height_cm = ?4,
                gender = ?5,
                activity_level = ?6,
                goal = ?7,
                daily_calories_target = ?8,
                updated_at = datetime('now')
            WHERE id = 1
            "#,
            params![
                profile.name,
                profile.age,
                profile.weight_kg,
                profile.height_cm,
                profile.gender.map(|g| g.as_str()),
                profile.activity_level.as_str(),
                profile.goal.as_str(),
                profile.daily_calories_target,
            ],
        )?;

        Ok(profile)
    }

    /// Store the streak after activity on `date`
    pub fn set_streak(conn: &Connection, streak: u32, date: NaiveDate) -> DbResult<()> {
        conn.execute(
            r#"
            UPDATE profile SET
                streak_count = ?1,
                last_activity_date = ?2,
                updated_at = datetime('now')
            WHERE id = 1
            "#,
            params![streak, date.format(DATE_FORMAT).to_string()],
        )?;
        Ok(())
    }

    /// Append badges to the earned list, skipping ones already present
    pub fn add_badges(conn: &Connection, new_badges: &[Badge]) -> DbResult<Vec<Badge>> {
        let mut badges = Self::get(conn)?.badges;
        for badge in new_badges {
            if !badges.contains(badge) {
                badges.push(*badge);
            }
        }

        let ids: Vec<&str> = badges.iter().map(|b| b.id()).collect();
        conn.execute(
            "UPDATE profile SET badges = ?1, updated_at = datetime('now') WHERE id = 1",
            [serde_json::to_string(&ids)?],
        )?;

        Ok(badges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;

    #[test]
    fn test_default_profile() {
        let conn = test_connection();
        let profile = Profile::get(&conn).unwrap();
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
        assert_eq!(profile.goal, WeightGoal::HealthyEating);
        assert_eq!(profile.target(), DailyTarget::new(2000.0));
        assert_eq!(profile.streak_count, 0);
        assert!(profile.badges.is_empty());
    }

    #[test]
    fn test_update_recomputes_target() {
        let conn = test_connection();
        let profile = Profile::update(
            &conn,
            &ProfileUpdate {
                name: Some(" Ana ".to_string()),
                age: Some(30),
                weight_kg: Some(70.0),
                height_cm: Some(175.0),
                gender: Some(Gender::Male),
                activity_level: Some(ActivityLevel::Sedentary),
                goal: Some(WeightGoal::LoseWeight),
            },
        )
        .unwrap();
        assert_eq!(profile.name, "Ana");
        assert!((profile.daily_calories_target - (1648.75 * 1.2 - 500.0)).abs() < 1e-9);
        assert_eq!(Profile::get(&conn).unwrap(), profile);
    }

    #[test]
    fn test_partial_update_keeps_default_target() {
        let conn = test_connection();
        let profile = Profile::update(
            &conn,
            &ProfileUpdate { weight_kg: Some(80.0), ..Default::default() },
        )
        .unwrap();
        assert_eq!(profile.weight_kg, Some(80.0));
        assert_eq!(profile.daily_calories_target, 2000.0);
    }

    #[test]
    fn test_streak_and_badges_persist() {
        let conn = test_connection();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        Profile::set_streak(&conn, 3, date).unwrap();
        Profile::add_badges(&conn, &[Badge::FirstMeal]).unwrap();
        let badges = Profile::add_badges(&conn, &[Badge::FirstMeal, Badge::TenMeals]).unwrap();
        assert_eq!(badges, vec![Badge::FirstMeal, Badge::TenMeals]);

        let profile = Profile::get(&conn).unwrap();
        assert_eq!(profile.streak_count, 3);
        assert_eq!(profile.last_activity_date, Some(date));
        assert_eq!(profile.badges, badges);
    }
}
