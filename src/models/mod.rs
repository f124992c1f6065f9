//! Data models
//!
//! Rust structs for catalog records and journal entities.

mod badge;
mod food_reference;
mod goal;
mod macros;
mod meal_entry;
mod profile;
mod water;

pub use badge::{Badge, BadgeStatus};
pub use food_reference::{CategoryFilter, FoodCategory, FoodReference};
pub use goal::{Goal, GoalCreate};
pub use macros::{DailyTarget, DailyTotals, Macros};
pub use meal_entry::{MealEntry, MealEntryCreate, MealType};
pub use profile::{Profile, ProfileUpdate};
pub use water::{WaterLog, WATER_TARGET_GLASSES};
