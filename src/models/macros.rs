//! Shared macronutrient record
//!
//! Used for meal entries, scaled portions and daily totals.

use serde::{Deserialize, Serialize};

/// Calories plus the three macronutrients
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64, // kcal
    pub carbs: f64,    // grams
    pub protein: f64,  // grams
    pub fat: f64,      // grams
}

/// Daily totals are a plain fold of meal entry macros
pub type DailyTotals = Macros;

impl Macros {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every field by the same multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            carbs: self.carbs * multiplier,
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
        }
    }

    pub fn add(&self, other: &Macros) -> Self {
        Self {
            calories: self.calories + other.calories,
            carbs: self.carbs + other.carbs,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

/// The user's daily calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTarget {
    pub calories: f64,
}

impl DailyTarget {
    pub const DEFAULT_CALORIES: f64 = 2000.0;

    pub fn new(calories: f64) -> Self {
        Self { calories }
    }
}

impl Default for DailyTarget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CALORIES)
    }
}
