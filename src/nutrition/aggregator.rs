//! Nutrition aggregation
//!
//! Pure functions over immutable inputs: daily totals, progress against the
//! calorie target, portion scaling and catalog filtering.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{
    CategoryFilter, DailyTarget, DailyTotals, FoodReference, Macros, MealEntry, MealType,
};
use super::portion::{clamp_grams, REFERENCE_GRAMS};

const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Flat sum of every entry's macros, regardless of meal type
pub fn compute_totals(entries: &[MealEntry]) -> DailyTotals {
    entries.iter().map(MealEntry::macros).sum()
}

/// Raw percentage of the calorie target reached, unclamped
///
/// A zero target yields 0 instead of dividing by zero.
pub fn progress_percent(totals: &DailyTotals, target: &DailyTarget) -> f64 {
    if target.calories == 0.0 {
        return 0.0;
    }
    totals.calories / target.calories * 100.0
}

/// Progress value clamped to [0, 100] for a progress bar
pub fn display_percent(raw_percent: f64) -> f64 {
    if raw_percent.is_nan() {
        return 0.0;
    }
    raw_percent.clamp(0.0, 100.0)
}

/// Both the reported and the displayed progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub raw_percent: f64,
    pub display_percent: f64,
}

pub fn compute_progress(totals: &DailyTotals, target: &DailyTarget) -> Progress {
    let raw_percent = progress_percent(totals, target);
    Progress {
        raw_percent,
        display_percent: display_percent(raw_percent),
    }
}

/// Nutrients for `grams` of a food, after clamping grams into the portion range
pub fn scale_portion(food: &FoodReference, grams: f64) -> Macros {
    let multiplier = clamp_grams(grams) / REFERENCE_GRAMS;
    food.per_100g().scale(multiplier)
}

/// Foods whose name contains `search_term` (case-insensitive) in the selected
/// category, in catalog order
///
/// Only the empty term matches everything; whitespace is part of the term.
pub fn filter_foods<'a>(
    catalog: &'a [FoodReference],
    search_term: &str,
    category: CategoryFilter,
) -> Vec<&'a FoodReference> {
    let needle = search_term.to_lowercase();
    catalog
        .iter()
        .filter(|food| category.matches(food.category))
        .filter(|food| needle.is_empty() || food.name.to_lowercase().contains(&needle))
        .collect()
}

/// Entries split into the four meal sections, input order kept in each
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealsByType {
    pub breakfast: Vec<MealEntry>,
    pub lunch: Vec<MealEntry>,
    pub dinner: Vec<MealEntry>,
    pub snack: Vec<MealEntry>,
}

impl MealsByType {
    pub fn get(&self, meal_type: MealType) -> &[MealEntry] {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
            MealType::Snack => &self.snack,
        }
    }
}

pub fn group_by_meal_type(entries: &[MealEntry]) -> MealsByType {
    let mut grouped = MealsByType::default();
    for entry in entries {
        let section = match entry.meal_type {
            MealType::Breakfast => &mut grouped.breakfast,
            MealType::Lunch => &mut grouped.lunch,
            MealType::Dinner => &mut grouped.dinner,
            MealType::Snack => &mut grouped.snack,
        };
        section.push(entry.clone());
    }
    grouped
}

/// Share of macro energy coming from each macronutrient, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroSplit {
    pub carbs_percent: f64,
    pub protein_percent: f64,
    pub fat_percent: f64,
}

pub fn macro_split(totals: &DailyTotals) -> MacroSplit {
    let carbs = totals.carbs * KCAL_PER_GRAM_CARBS;
    let protein = totals.protein * KCAL_PER_GRAM_PROTEIN;
    let fat = totals.fat * KCAL_PER_GRAM_FAT;
    let energy = carbs + protein + fat;

    if energy <= 0.0 {
        return MacroSplit::default();
    }

    MacroSplit {
        carbs_percent: carbs / energy * 100.0,
        protein_percent: protein / energy * 100.0,
        fat_percent: fat / energy * 100.0,
    }
}

/// One day of the meal history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub meals: Vec<MealEntry>,
    pub total_calories: f64,
}

/// Entries grouped by date, most recent date first
pub fn history_by_date(entries: &[MealEntry]) -> Vec<HistoryDay> {
    let mut by_date: BTreeMap<&str, Vec<MealEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date.as_str()).or_default().push(entry.clone());
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, meals)| HistoryDay {
            date: date.to_string(),
            total_calories: compute_totals(&meals).calories,
            meals,
        })
        .collect()
}

/// Calories and meal count of one day in a statistics window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCalories {
    pub date: String,
    pub calories: f64,
    pub meal_count: usize,
}

/// Calorie statistics over a window of consecutive days
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStatistics {
    pub start_date: String,
    pub end_date: String,
    /// One point per day, oldest first; days without meals are zero
    pub daily: Vec<DayCalories>,
    pub total_calories: f64,
    /// Total divided by every day of the window, empty days included
    pub avg_calories: f64,
    pub target_calories: f64,
    pub total_meals: usize,
}

/// Fold entries into a `days`-long window ending on `end`
///
/// Entries dated outside the window are ignored. `days` below 1 is treated as 1.
pub fn period_statistics(
    entries: &[MealEntry],
    target: &DailyTarget,
    end: NaiveDate,
    days: u32,
) -> PeriodStatistics {
    let days = days.max(1);
    let start = end - Duration::days(i64::from(days) - 1);

    let mut daily: Vec<DayCalories> = (0..i64::from(days))
        .map(|offset| DayCalories {
            date: (start + Duration::days(offset)).format("%Y-%m-%d").to_string(),
            calories: 0.0,
            meal_count: 0,
        })
        .collect();

    for entry in entries {
        let Ok(date) = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d") else {
            continue;
        };
        let offset = (date - start).num_days();
        if let Some(day) = usize::try_from(offset).ok().and_then(|i| daily.get_mut(i)) {
            day.calories += entry.calories;
            day.meal_count += 1;
        }
    }

    let total_calories: f64 = daily.iter().map(|d| d.calories).sum();
    let total_meals = daily.iter().map(|d| d.meal_count).sum();

    PeriodStatistics {
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: end.format("%Y-%m-%d").to_string(),
        avg_calories: total_calories / f64::from(days),
        target_calories: target.calories,
        total_calories,
        total_meals,
        daily,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodCategory;
    use chrono::Utc;

    fn entry(meal_type: MealType, date: &str, calories: f64, carbs: f64, protein: f64, fat: f64) -> MealEntry {
        MealEntry {
            id: format!("{}-{}-{}", date, meal_type.as_str(), calories),
            date: date.to_string(),
            meal_type,
            food_name: "food".to_string(),
            calories,
            carbs,
            protein,
            fat,
            portion_label: "100g".to_string(),
            created_at: Utc::now(),
        }
    }

    fn food(name: &str, category: FoodCategory, calories: f64) -> FoodReference {
        FoodReference {
            name: name.to_string(),
            calories_per_100g: calories,
            carbs_per_100g: 28.0,
            protein_per_100g: 2.5,
            fat_per_100g: 0.3,
            category,
            base_portion_label: "100g".to_string(),
        }
    }

    fn catalog() -> Vec<FoodReference> {
        vec![
            food("Arroz branco", FoodCategory::Grains, 130.0),
            food("Feijão preto", FoodCategory::Legumes, 77.0),
            food("Arroz integral", FoodCategory::Grains, 124.0),
            food("Banana", FoodCategory::Fruits, 89.0),
        ]
    }

    #[test]
    fn test_totals_of_empty_day() {
        assert_eq!(compute_totals(&[]), Macros::zero());
    }

    #[test]
    fn test_totals_flat_sum_across_meal_types() {
        let entries = vec![
            entry(MealType::Breakfast, "2025-03-01", 300.0, 40.0, 10.0, 8.0),
            entry(MealType::Lunch, "2025-03-01", 650.0, 70.0, 35.0, 20.0),
            entry(MealType::Snack, "2025-03-01", 89.0, 23.0, 1.1, 0.3),
        ];
        let totals = compute_totals(&entries);
        assert!((totals.calories - 1039.0).abs() < 1e-9);
        assert!((totals.carbs - 133.0).abs() < 1e-9);
        assert!((totals.protein - 46.1).abs() < 1e-9);
        assert!((totals.fat - 28.3).abs() < 1e-9);
    }

    #[test]
    fn test_totals_independent_of_order() {
        let mut entries = vec![
            entry(MealType::Breakfast, "2025-03-01", 300.0, 40.0, 10.0, 8.0),
            entry(MealType::Lunch, "2025-03-01", 650.5, 70.25, 35.0, 20.0),
            entry(MealType::Snack, "2025-03-01", 89.0, 23.0, 1.1, 0.3),
            entry(MealType::Dinner, "2025-03-01", 412.75, 30.0, 28.4, 17.6),
        ];
        let forward = compute_totals(&entries);
        entries.reverse();
        let backward = compute_totals(&entries);
        entries.swap(0, 2);
        let shuffled = compute_totals(&entries);

        for other in [backward, shuffled] {
            assert!((forward.calories - other.calories).abs() < 1e-9);
            assert!((forward.carbs - other.carbs).abs() < 1e-9);
            assert!((forward.protein - other.protein).abs() < 1e-9);
            assert!((forward.fat - other.fat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_progress_half_target() {
        let totals = Macros { calories: 1000.0, ..Macros::zero() };
        assert_eq!(progress_percent(&totals, &DailyTarget::new(2000.0)), 50.0);
    }

    #[test]
    fn test_progress_zero_target() {
        let totals = Macros { calories: 500.0, ..Macros::zero() };
        assert_eq!(progress_percent(&totals, &DailyTarget::new(0.0)), 0.0);
    }

    #[test]
    fn test_progress_raw_vs_display() {
        let totals = Macros { calories: 2500.0, ..Macros::zero() };
        let progress = compute_progress(&totals, &DailyTarget::new(2000.0));
        assert_eq!(progress.raw_percent, 125.0);
        assert_eq!(progress.display_percent, 100.0);

        let negative = compute_progress(&totals, &DailyTarget::new(-2000.0));
        assert_eq!(negative.raw_percent, -125.0);
        assert_eq!(negative.display_percent, 0.0);
    }

    #[test]
    fn test_scale_identity_at_reference_portion() {
        let rice = food("Arroz", FoodCategory::Grains, 130.0);
        assert_eq!(scale_portion(&rice, 100.0), rice.per_100g());
    }

    #[test]
    fn test_scale_rice_150g() {
        let rice = food("Arroz", FoodCategory::Grains, 130.0);
        let scaled = scale_portion(&rice, 150.0);
        assert!((scaled.calories - 195.0).abs() < 1e-9);
        assert!((scaled.carbs - 42.0).abs() < 1e-9);
        assert!((scaled.protein - 3.75).abs() < 1e-9);
        assert!((scaled.fat - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_scale_clamps_grams() {
        let rice = food("Arroz", FoodCategory::Grains, 130.0);
        assert!((scale_portion(&rice, 1.0).calories - 13.0).abs() < 1e-9);
        assert!((scale_portion(&rice, 5000.0).calories - 1300.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_at_exact_bounds() {
        let rice = food("Arroz", FoodCategory::Grains, 130.0);
        assert_eq!(scale_portion(&rice, 10.0), scale_portion(&rice, 9.999));
        assert!((scale_portion(&rice, 10.0).calories - 13.0).abs() < 1e-9);
        assert_eq!(scale_portion(&rice, 1000.0), scale_portion(&rice, 1000.001));
        assert!((scale_portion(&rice, 1000.0).calories - 1300.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_negative_and_nan_use_minimum() {
        let rice = food("Arroz", FoodCategory::Grains, 130.0);
        let minimum = scale_portion(&rice, 10.0);
        assert_eq!(scale_portion(&rice, -50.0), minimum);
        assert_eq!(scale_portion(&rice, f64::NAN), minimum);
        assert!(!scale_portion(&rice, f64::NAN).calories.is_nan());
    }

    #[test]
    fn test_filter_empty_term_returns_catalog_in_order() {
        let catalog = catalog();
        let result = filter_foods(&catalog, "", CategoryFilter::All);
        let expected: Vec<&FoodReference> = catalog.iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_filter_case_insensitive_substring() {
        let catalog = catalog();
        let names: Vec<&str> = filter_foods(&catalog, "ARROZ", CategoryFilter::All)
            .into_iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Arroz branco", "Arroz integral"]);
    }

    #[test]
    fn test_filter_whitespace_is_part_of_term() {
        let catalog = catalog();
        let names = |term: &str| -> Vec<String> {
            filter_foods(&catalog, term, CategoryFilter::All)
                .into_iter()
                .map(|f| f.name.clone())
                .collect()
        };
        assert_eq!(names(" "), vec!["Arroz branco", "Feijão preto", "Arroz integral"]);
        assert_eq!(names("arroz "), vec!["Arroz branco", "Arroz integral"]);
        assert_eq!(names("branco "), Vec::<String>::new());
        assert_eq!(names(" banana"), Vec::<String>::new());
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = catalog();
        let result = filter_foods(&catalog, "", CategoryFilter::Only(FoodCategory::Fruits));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Banana");

        let none = filter_foods(&catalog, "arroz", CategoryFilter::Only(FoodCategory::Legumes));
        assert!(none.is_empty());
    }

    #[test]
    fn test_group_by_meal_type_keeps_order() {
        let entries = vec![
            entry(MealType::Lunch, "2025-03-01", 1.0, 0.0, 0.0, 0.0),
            entry(MealType::Breakfast, "2025-03-01", 2.0, 0.0, 0.0, 0.0),
            entry(MealType::Lunch, "2025-03-01", 3.0, 0.0, 0.0, 0.0),
        ];
        let grouped = group_by_meal_type(&entries);
        let lunch: Vec<f64> = grouped.get(MealType::Lunch).iter().map(|e| e.calories).collect();
        assert_eq!(lunch, vec![1.0, 3.0]);
        assert_eq!(grouped.breakfast.len(), 1);
        assert!(grouped.dinner.is_empty());
        assert!(grouped.snack.is_empty());
    }

    #[test]
    fn test_macro_split() {
        let totals = Macros { calories: 0.0, carbs: 50.0, protein: 25.0, fat: 0.0 };
        let split = macro_split(&totals);
        assert!((split.carbs_percent - 200.0 / 3.0).abs() < 1e-9);
        assert!((split.protein_percent - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(split.fat_percent, 0.0);
        assert_eq!(macro_split(&Macros::zero()), MacroSplit::default());
    }

    fn march(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_statistics_fill_empty_days() {
        let entries = vec![
            entry(MealType::Lunch, "2025-03-02", 500.0, 0.0, 0.0, 0.0),
            entry(MealType::Dinner, "2025-03-02", 700.0, 0.0, 0.0, 0.0),
            entry(MealType::Snack, "2025-03-07", 200.0, 0.0, 0.0, 0.0),
        ];
        let stats = period_statistics(&entries, &DailyTarget::new(2000.0), march(7), 7);

        assert_eq!(stats.start_date, "2025-03-01");
        assert_eq!(stats.end_date, "2025-03-07");
        assert_eq!(stats.daily.len(), 7);
        let calories: Vec<f64> = stats.daily.iter().map(|d| d.calories).collect();
        assert_eq!(calories, vec![0.0, 1200.0, 0.0, 0.0, 0.0, 0.0, 200.0]);
        assert_eq!(stats.daily[1].meal_count, 2);
        assert_eq!(stats.total_calories, 1400.0);
        assert_eq!(stats.avg_calories, 200.0);
        assert_eq!(stats.total_meals, 3);
        assert_eq!(stats.target_calories, 2000.0);
    }

    #[test]
    fn test_statistics_without_meals() {
        let stats = period_statistics(&[], &DailyTarget::default(), march(31), 30);
        assert_eq!(stats.daily.len(), 30);
        assert_eq!(stats.start_date, "2025-03-02");
        assert!(stats.daily.iter().all(|d| d.calories == 0.0 && d.meal_count == 0));
        assert_eq!(stats.total_calories, 0.0);
        assert_eq!(stats.avg_calories, 0.0);
        assert_eq!(stats.total_meals, 0);
    }

    #[test]
    fn test_statistics_ignore_entries_outside_window() {
        let entries = vec![
            entry(MealType::Lunch, "2025-02-28", 500.0, 0.0, 0.0, 0.0),
            entry(MealType::Lunch, "2025-03-03", 300.0, 0.0, 0.0, 0.0),
            entry(MealType::Lunch, "2025-03-08", 900.0, 0.0, 0.0, 0.0),
        ];
        let stats = period_statistics(&entries, &DailyTarget::default(), march(7), 7);
        assert_eq!(stats.total_calories, 300.0);
        assert_eq!(stats.total_meals, 1);

        let single = period_statistics(&entries, &DailyTarget::default(), march(3), 0);
        assert_eq!(single.daily.len(), 1);
        assert_eq!(single.avg_calories, 300.0);
    }

    #[test]
    fn test_history_newest_date_first() {
        let entries = vec![
            entry(MealType::Lunch, "2025-03-01", 500.0, 0.0, 0.0, 0.0),
            entry(MealType::Dinner, "2025-03-02", 700.0, 0.0, 0.0, 0.0),
            entry(MealType::Snack, "2025-03-01", 100.0, 0.0, 0.0, 0.0),
        ];
        let history = history_by_date(&entries);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, "2025-03-02");
        assert_eq!(history[0].total_calories, 700.0);
        assert_eq!(history[1].date, "2025-03-01");
        assert_eq!(history[1].total_calories, 600.0);
        assert_eq!(history[1].meals.len(), 2);
    }
}
