//! Meal logging tools
//!
//! Log catalog foods by portion, log arbitrary nutrient records, and read
//! back a day with its totals and progress.

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::catalog;
use crate::db::{Database, DbResult};
use crate::models::{
    Badge, BadgeStatus, DailyTarget, DailyTotals, MealEntry, MealEntryCreate, MealType, Profile,
    WaterLog,
};
use crate::nutrition::gamification::{newly_earned_badges, next_streak};
use crate::nutrition::{
    compute_progress, compute_totals, group_by_meal_type, history_by_date, macro_split,
    parse_grams, period_statistics, portion_label, scale_portion, HistoryDay, MacroSplit,
    MealsByType, PeriodStatistics, Progress,
};
use super::{iso, resolve_date};

/// Longest history window served
pub(crate) const MAX_HISTORY_DAYS: u32 = 90;

const WEEKLY_DAYS: u32 = 7;
const MONTHLY_DAYS: u32 = 30;

/// Response for log_food / log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub entry: MealEntry,
    pub streak_count: u32,
    /// Badges earned by this entry
    pub new_badges: Vec<BadgeStatus>,
}

/// Full day view
#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub meals: MealsByType,
    pub meal_count: usize,
    pub totals: DailyTotals,
    pub target: DailyTarget,
    pub progress: Progress,
    pub macro_split: MacroSplit,
    pub water: WaterLog,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub days: Vec<HistoryDay>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteMealEntryResponse {
    pub success: bool,
    pub deleted_id: String,
    pub date: String,
    pub totals: DailyTotals,
}

fn parse_meal_type(meal_type: &str) -> Result<MealType, String> {
    MealType::parse(meal_type).ok_or_else(|| {
        format!(
            "Invalid meal_type '{}', expected breakfast, lunch, dinner or snack",
            meal_type
        )
    })
}

fn validate_create(data: &MealEntryCreate) -> Result<(), String> {
    if data.food_name.trim().is_empty() {
        return Err("food_name cannot be empty".to_string());
    }
    let m = data.macros();
    for (field, value) in [
        ("calories", m.calories),
        ("carbs", m.carbs),
        ("protein", m.protein),
        ("fat", m.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must be a non-negative number", field));
        }
    }
    Ok(())
}

/// Insert an entry, then advance the streak and award badges
///
/// `today` is the activity date used for the streak, which may differ from
/// the date the entry is filed under.
pub(crate) fn record_meal(
    conn: &Connection,
    date: NaiveDate,
    data: &MealEntryCreate,
    today: NaiveDate,
) -> DbResult<LogMealResponse> {
    let entry = MealEntry::create(conn, &iso(date), data)?;

    let profile = Profile::get(conn)?;
    let streak = next_streak(profile.streak_count, profile.last_activity_date, today);
    Profile::set_streak(conn, streak, today)?;

    let meal_count = MealEntry::count(conn)?;
    let earned: Vec<Badge> = newly_earned_badges(meal_count, streak, &profile.badges);
    if !earned.is_empty() {
        Profile::add_badges(conn, &earned)?;
        tracing::info!(badges = ?earned, "badges earned");
    }

    Ok(LogMealResponse {
        entry,
        streak_count: streak,
        new_badges: earned.into_iter().map(|b| BadgeStatus::new(b, true)).collect(),
    })
}

/// Log a catalog food by name and portion, e.g. ("Arroz branco", "150g")
pub fn log_food(
    db: &Database,
    food_name: &str,
    portion: &str,
    meal_type: &str,
    date: Option<&str>,
) -> Result<LogMealResponse, String> {
    let meal_type = parse_meal_type(meal_type)?;
    let date = resolve_date(date)?;
    let food = catalog::find(food_name)
        .ok_or_else(|| format!("Food '{}' is not in the catalog", food_name))?;
    let grams = parse_grams(portion).map_err(|e| e.to_string())?;

    let data = MealEntryCreate::from_macros(
        meal_type,
        food.name.clone(),
        scale_portion(food, grams),
        portion_label(grams),
    );

    db.with_transaction(|tx| record_meal(tx, date, &data, Utc::now().date_naive()))
        .map_err(|e| format!("Failed to log food: {}", e))
}

/// Log an arbitrary nutrient record (scanner result, manual entry)
pub fn log_meal(
    db: &Database,
    data: MealEntryCreate,
    date: Option<&str>,
) -> Result<LogMealResponse, String> {
    validate_create(&data)?;
    let date = resolve_date(date)?;
    let data = MealEntryCreate {
        food_name: data.food_name.trim().to_string(),
        ..data
    };

    db.with_transaction(|tx| record_meal(tx, date, &data, Utc::now().date_naive()))
        .map_err(|e| format!("Failed to log meal: {}", e))
}

pub(crate) fn build_day_summary(conn: &Connection, date: &str) -> DbResult<DaySummary> {
    let entries = MealEntry::get_for_date(conn, date)?;
    let target = Profile::get(conn)?.target();
    let totals = compute_totals(&entries);

    Ok(DaySummary {
        date: date.to_string(),
        meal_count: entries.len(),
        meals: group_by_meal_type(&entries),
        progress: compute_progress(&totals, &target),
        macro_split: macro_split(&totals),
        totals,
        target,
        water: WaterLog::get(conn, date)?,
    })
}

/// Day view with meals by type, totals and progress
pub fn get_day(db: &Database, date: Option<&str>) -> Result<DaySummary, String> {
    let date = iso(resolve_date(date)?);
    db.with_conn(|conn| build_day_summary(conn, &date))
        .map_err(|e| format!("Failed to load day: {}", e))
}

/// Meals of the last `days` days (ending `end_date`, default today)
pub fn get_history(
    db: &Database,
    days: u32,
    end_date: Option<&str>,
) -> Result<HistoryResponse, String> {
    let days = days.clamp(1, MAX_HISTORY_DAYS);
    let end = resolve_date(end_date)?;
    let start = end - Duration::days(i64::from(days) - 1);

    let entries = db
        .with_conn(|conn| MealEntry::get_range(conn, &iso(start), &iso(end)))
        .map_err(|e| format!("Failed to load history: {}", e))?;

    Ok(HistoryResponse {
        days: history_by_date(&entries),
        start_date: iso(start),
        end_date: iso(end),
    })
}

/// Window length for "weekly" or "monthly"
pub(crate) fn statistics_days(period: &str) -> Result<u32, String> {
    match period.trim().to_lowercase().as_str() {
        "weekly" | "week" => Ok(WEEKLY_DAYS),
        "monthly" | "month" => Ok(MONTHLY_DAYS),
        other => Err(format!("Invalid period '{}', expected weekly or monthly", other)),
    }
}

pub(crate) fn build_statistics(
    conn: &Connection,
    end: NaiveDate,
    days: u32,
) -> DbResult<PeriodStatistics> {
    let start = end - Duration::days(i64::from(days) - 1);
    let entries = MealEntry::get_range(conn, &iso(start), &iso(end))?;
    let target = Profile::get(conn)?.target();
    Ok(period_statistics(&entries, &target, end, days))
}

/// Weekly (7 days) or monthly (30 days) calorie statistics ending `end_date`
pub fn get_statistics(
    db: &Database,
    period: &str,
    end_date: Option<&str>,
) -> Result<PeriodStatistics, String> {
    let days = statistics_days(period)?;
    let end = resolve_date(end_date)?;
    db.with_conn(|conn| build_statistics(conn, end, days))
        .map_err(|e| format!("Failed to load statistics: {}", e))
}

pub fn delete_meal_entry(db: &Database, id: &str) -> Result<Option<DeleteMealEntryResponse>, String> {
    db.with_transaction(|tx| {
        let Some(entry) = MealEntry::get_by_id(tx, id)? else {
            return Ok(None);
        };
        MealEntry::delete(tx, id)?;
        let remaining = MealEntry::get_for_date(tx, &entry.date)?;

        Ok(Some(DeleteMealEntryResponse {
            success: true,
            deleted_id: entry.id,
            totals: compute_totals(&remaining),
            date: entry.date,
        }))
    })
    .map_err(|e| format!("Failed to delete meal entry: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::Macros;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn banana() -> MealEntryCreate {
        MealEntryCreate::from_macros(
            MealType::Snack,
            "Banana",
            Macros { calories: 89.0, carbs: 23.0, protein: 1.1, fat: 0.3 },
            "unidade",
        )
    }

    #[test]
    fn test_first_meal_starts_streak_and_awards_badge() {
        let conn = test_connection();
        let response = record_meal(&conn, day(1), &banana(), day(1)).unwrap();
        assert_eq!(response.streak_count, 1);
        assert_eq!(response.new_badges.len(), 1);
        assert_eq!(response.new_badges[0].id, "first_meal");

        let second = record_meal(&conn, day(1), &banana(), day(1)).unwrap();
        assert_eq!(second.streak_count, 1);
        assert!(second.new_badges.is_empty());
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        let conn = test_connection();
        record_meal(&conn, day(1), &banana(), day(1)).unwrap();
        let response = record_meal(&conn, day(2), &banana(), day(2)).unwrap();
        assert_eq!(response.streak_count, 2);
        let response = record_meal(&conn, day(5), &banana(), day(5)).unwrap();
        assert_eq!(response.streak_count, 1);
    }

    #[test]
    fn test_day_summary_totals_and_progress() {
        let conn = test_connection();
        let rice = catalog::find("Arroz branco").unwrap();
        let lunch = MealEntryCreate::from_macros(
            MealType::Lunch,
            rice.name.clone(),
            scale_portion(rice, 150.0),
            portion_label(150.0),
        );
        record_meal(&conn, day(1), &lunch, day(1)).unwrap();
        record_meal(&conn, day(1), &banana(), day(1)).unwrap();
        record_meal(&conn, day(2), &banana(), day(2)).unwrap();

        let summary = build_day_summary(&conn, "2025-03-01").unwrap();
        assert_eq!(summary.meal_count, 2);
        assert!((summary.totals.calories - 284.0).abs() < 1e-9);
        assert_eq!(summary.meals.lunch.len(), 1);
        assert_eq!(summary.meals.lunch[0].portion_label, "150g");
        assert_eq!(summary.meals.snack.len(), 1);
        assert_eq!(summary.target, DailyTarget::new(2000.0));
        assert!((summary.progress.raw_percent - 14.2).abs() < 1e-9);
        assert_eq!(summary.water.glasses_count, 0);
    }

    #[test]
    fn test_weekly_statistics_from_journal() {
        let conn = test_connection();
        record_meal(&conn, day(3), &banana(), day(3)).unwrap();
        record_meal(&conn, day(3), &banana(), day(3)).unwrap();
        record_meal(&conn, day(7), &banana(), day(7)).unwrap();
        record_meal(&conn, day(8), &banana(), day(8)).unwrap();

        let stats = build_statistics(&conn, day(7), statistics_days("weekly").unwrap()).unwrap();
        assert_eq!(stats.daily.len(), 7);
        assert_eq!(stats.total_meals, 3);
        assert!((stats.total_calories - 267.0).abs() < 1e-9);
        assert!((stats.avg_calories - 267.0 / 7.0).abs() < 1e-9);
        assert_eq!(stats.daily[0].calories, 0.0);
        assert_eq!(stats.target_calories, 2000.0);
    }

    #[test]
    fn test_statistics_period_names() {
        assert_eq!(statistics_days("Monthly"), Ok(30));
        assert_eq!(statistics_days("week"), Ok(7));
        assert!(statistics_days("yearly").is_err());
    }

    #[test]
    fn test_validate_create_rejects_bad_values() {
        let mut data = banana();
        data.calories = -1.0;
        assert!(validate_create(&data).is_err());

        let mut data = banana();
        data.fat = f64::NAN;
        assert!(validate_create(&data).is_err());

        let mut data = banana();
        data.food_name = "  ".to_string();
        assert!(validate_create(&data).is_err());

        assert!(validate_create(&banana()).is_ok());
    }

    #[test]
    fn test_parse_meal_type_error() {
        assert_eq!(parse_meal_type("Dinner"), Ok(MealType::Dinner));
        assert!(parse_meal_type("brunch").is_err());
    }
}
