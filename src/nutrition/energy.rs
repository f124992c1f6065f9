//! Daily energy target
//!
//! Mifflin-St Jeor basal metabolic rate, scaled by an activity multiplier and
//! shifted by 500 kcal for weight loss or gain.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Unknown levels fall back to moderate
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Moderate,
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    LoseWeight,
    GainWeight,
    #[default]
    HealthyEating,
}

impl WeightGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightGoal::LoseWeight => "lose_weight",
            WeightGoal::GainWeight => "gain_weight",
            WeightGoal::HealthyEating => "healthy_eating",
        }
    }

    /// Anything other than lose/gain is treated as maintenance
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lose_weight" => WeightGoal::LoseWeight,
            "gain_weight" => WeightGoal::GainWeight,
            _ => WeightGoal::HealthyEating,
        }
    }

    /// kcal added to the maintenance energy
    pub fn adjustment(&self) -> f64 {
        match self {
            WeightGoal::LoseWeight => -500.0,
            WeightGoal::GainWeight => 500.0,
            WeightGoal::HealthyEating => 0.0,
        }
    }
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor)
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        // Non-male profiles use the female constant
        Gender::Female | Gender::Other => base - 161.0,
    }
}

/// Daily calorie target in kcal
pub fn daily_calorie_target(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity: ActivityLevel,
    goal: WeightGoal,
) -> f64 {
    let tdee = basal_metabolic_rate(weight_kg, height_cm, age, gender) * activity.multiplier();
    tdee + goal.adjustment()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_male_and_female() {
        // 10*70 + 6.25*175 - 5*30 + 5 = 1648.75
        assert!((basal_metabolic_rate(70.0, 175.0, 30, Gender::Male) - 1648.75).abs() < 1e-9);
        assert!((basal_metabolic_rate(70.0, 175.0, 30, Gender::Female) - 1482.75).abs() < 1e-9);
    }

    #[test]
    fn test_target_with_goal_adjustment() {
        let maintain = daily_calorie_target(
            70.0, 175.0, 30, Gender::Male, ActivityLevel::Moderate, WeightGoal::HealthyEating,
        );
        assert!((maintain - 1648.75 * 1.55).abs() < 1e-9);

        let lose = daily_calorie_target(
            70.0, 175.0, 30, Gender::Male, ActivityLevel::Moderate, WeightGoal::LoseWeight,
        );
        assert!((maintain - lose - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_activity_is_moderate() {
        assert_eq!(ActivityLevel::parse("couch"), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::parse("very_active").multiplier(), 1.9);
    }

    #[test]
    fn test_goal_parse() {
        assert_eq!(WeightGoal::parse("gain_weight"), WeightGoal::GainWeight);
        assert_eq!(WeightGoal::parse("whatever"), WeightGoal::HealthyEating);
    }
}
