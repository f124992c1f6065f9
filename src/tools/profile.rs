//! Profile and badge tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{Badge, BadgeStatus, Profile, ProfileUpdate};

#[derive(Debug, Serialize)]
pub struct BadgesResponse {
    pub badges: Vec<BadgeStatus>,
    pub earned: usize,
    pub streak_count: u32,
}

pub fn get_profile(db: &Database) -> Result<Profile, String> {
    db.with_conn(Profile::get)
        .map_err(|e| format!("Database error: {}", e))
}

fn validate_update(data: &ProfileUpdate) -> Result<(), String> {
    if let Some(age) = data.age {
        if !(1..=120).contains(&age) {
            return Err("age must be between 1 and 120".to_string());
        }
    }
    for (field, value) in [("weight_kg", data.weight_kg), ("height_cm", data.height_cm)] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("{} must be a positive number", field));
            }
        }
    }
    Ok(())
}

/// Update body data; the calorie target is recomputed from it
pub fn set_profile(db: &Database, data: ProfileUpdate) -> Result<Profile, String> {
    validate_update(&data)?;
    let profile = db
        .with_conn(|conn| Profile::update(conn, &data))
        .map_err(|e| format!("Failed to update profile: {}", e))?;

    tracing::info!(target_kcal = profile.daily_calories_target, "profile updated");
    Ok(profile)
}

/// Full badge catalog with earned flags
pub fn get_badges(db: &Database) -> Result<BadgesResponse, String> {
    let profile = get_profile(db)?;
    let badges: Vec<BadgeStatus> = Badge::ALL
        .into_iter()
        .map(|b| BadgeStatus::new(b, profile.badges.contains(&b)))
        .collect();

    Ok(BadgesResponse {
        earned: badges.iter().filter(|b| b.earned).count(),
        badges,
        streak_count: profile.streak_count,
    })
}
