//! Nutrition calculation module
//!
//! Aggregation, portion handling, energy targets and gamification rules.

pub mod aggregator;
pub mod energy;
pub mod gamification;
pub mod portion;

pub use aggregator::{
    compute_progress, compute_totals, display_percent, filter_foods, group_by_meal_type,
    history_by_date, macro_split, period_statistics, progress_percent, scale_portion,
    DayCalories, HistoryDay, MacroSplit, MealsByType, PeriodStatistics, Progress,
};
pub use portion::{clamp_grams, parse_grams, portion_label, PortionError};
