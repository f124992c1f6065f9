//! Badge catalog
//!
//! Achievements awarded for logging activity.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstMeal,
    WeekStreak,
    MonthStreak,
    TenMeals,
    FiftyMeals,
}

impl Badge {
    /// Catalog order, also the order in which new badges are awarded
    pub const ALL: [Badge; 5] = [
        Badge::FirstMeal,
        Badge::WeekStreak,
        Badge::MonthStreak,
        Badge::TenMeals,
        Badge::FiftyMeals,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Badge::FirstMeal => "first_meal",
            Badge::WeekStreak => "week_streak",
            Badge::MonthStreak => "month_streak",
            Badge::TenMeals => "ten_meals",
            Badge::FiftyMeals => "fifty_meals",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Badge::FirstMeal => "Primeira Refeição",
            Badge::WeekStreak => "Semana Completa",
            Badge::MonthStreak => "Mês Dedicado",
            Badge::TenMeals => "10 Refeições",
            Badge::FiftyMeals => "50 Refeições",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::FirstMeal => "Registrou sua primeira refeição!",
            Badge::WeekStreak => "7 dias consecutivos registrando refeições!",
            Badge::MonthStreak => "30 dias consecutivos! Incrível!",
            Badge::TenMeals => "Registrou 10 refeições!",
            Badge::FiftyMeals => "Registrou 50 refeições! Você é dedicado!",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Badge::FirstMeal => "🍽️",
            Badge::WeekStreak => "🔥",
            Badge::MonthStreak => "⭐",
            Badge::TenMeals => "📊",
            Badge::FiftyMeals => "🏆",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.id() == id)
    }
}

/// A catalog badge with the user's earned flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned: bool,
}

impl BadgeStatus {
    pub fn new(badge: Badge, earned: bool) -> Self {
        Self {
            id: badge.id().to_string(),
            name: badge.name().to_string(),
            description: badge.description().to_string(),
            icon: badge.icon().to_string(),
            earned,
        }
    }
}
