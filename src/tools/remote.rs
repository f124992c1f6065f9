//! Tools backed by the remote nutrition service
//!
//! Every payload is validated by the client before it reaches these functions.
//! Totals and progress are always recomputed locally from the entries; the
//! server's own totals are only reported alongside for comparison.

use serde::Serialize;

use crate::api::types::{BadgesResponse, CreateMealResponse};
use crate::api::{ApiClient, ApiError, FoodAnalysis, RemoteDay, ScannedProduct};
use crate::catalog;
use crate::models::{
    DailyTarget, DailyTotals, FoodCategory, FoodReference, GoalCreate, Macros, MealEntryCreate,
    MealType, WaterLog,
};
use crate::nutrition::{
    compute_progress, compute_totals, filter_foods, group_by_meal_type, history_by_date,
    macro_split, parse_grams, portion_label, scale_portion, HistoryDay, MacroSplit, MealsByType,
    Progress,
};
use super::foods::{parse_category, SearchFoodsResponse};
use super::goals::{summarize_goals, validate_goal, ListGoalsResponse};
use super::meals::MAX_HISTORY_DAYS;
use super::tips::{in_category, TipsResponse};
use super::water::glasses_to_log;
use super::resolve_date;

/// Calorie difference below which local and server totals are considered equal
const TOTALS_TOLERANCE_KCAL: f64 = 0.5;

#[derive(Debug, Serialize)]
pub struct RemoteDaySummary {
    pub date: Option<String>,
    pub meals: MealsByType,
    pub meal_count: usize,
    pub totals: DailyTotals,
    pub server_totals: DailyTotals,
    pub totals_match: bool,
    pub target: DailyTarget,
    pub progress: Progress,
    pub macro_split: MacroSplit,
}

#[derive(Debug, Serialize)]
pub struct RemoteLogResponse {
    pub meal_id: String,
    pub food_name: String,
    pub meal_type: MealType,
    pub portion_label: String,
    pub nutrients: Macros,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeFoodResponse {
    pub analysis: FoodAnalysis,
    pub suggested_meal_type: Option<MealType>,
    /// Sum of the analyzed foods
    pub totals: Macros,
}

#[derive(Debug, Serialize)]
pub struct ScanBarcodeResponse {
    pub found: bool,
    pub product: Option<ScannedProduct>,
    /// Set when the product was logged as a meal
    pub logged: Option<CreateMealResponse>,
}

#[derive(Debug, Serialize)]
pub struct RemoteHistoryResponse {
    pub days: Vec<HistoryDay>,
    pub requested_days: u32,
    pub meal_count: usize,
}

#[derive(Debug, Serialize)]
pub struct RemoteGoalResponse {
    pub success: bool,
    pub goal_id: String,
}

fn require(client: Option<&ApiClient>) -> Result<&ApiClient, String> {
    client.ok_or_else(|| ApiError::NotConfigured.to_string())
}

fn api_error(context: &str, e: ApiError) -> String {
    format!("{}: {}", context, e)
}

pub(crate) fn summarize_remote_day(date: Option<String>, day: RemoteDay) -> RemoteDaySummary {
    let totals = compute_totals(&day.entries);
    let totals_match = (totals.calories - day.server_totals.calories).abs() < TOTALS_TOLERANCE_KCAL;
    if !totals_match {
        tracing::warn!(
            local = totals.calories,
            server = day.server_totals.calories,
            "server totals differ from entries"
        );
    }

    RemoteDaySummary {
        date,
        meal_count: day.entries.len(),
        meals: group_by_meal_type(&day.entries),
        progress: compute_progress(&totals, &day.target),
        macro_split: macro_split(&totals),
        server_totals: day.server_totals,
        target: day.target,
        totals,
        totals_match,
    }
}

/// The server leaves categories out; known foods get the local catalog's
pub(crate) fn fill_categories(foods: &mut [FoodReference]) {
    for food in foods.iter_mut().filter(|f| f.category == FoodCategory::Other) {
        if let Some(known) = catalog::find(&food.name) {
            food.category = known.category;
        }
    }
}

pub(crate) fn find_exact<'a>(foods: &'a [FoodReference], name: &str) -> Option<&'a FoodReference> {
    let wanted = name.trim().to_lowercase();
    foods.iter().find(|f| f.name.to_lowercase() == wanted)
}

pub(crate) fn analysis_totals(analysis: &FoodAnalysis) -> Macros {
    analysis
        .foods
        .iter()
        .map(|f| Macros {
            calories: f.calories,
            carbs: f.carbs,
            protein: f.protein,
            fat: f.fat,
        })
        .sum()
}

pub async fn remote_get_day(
    client: Option<&ApiClient>,
    date: Option<&str>,
) -> Result<RemoteDaySummary, String> {
    let client = require(client)?;
    let date = date
        .filter(|d| !d.trim().is_empty())
        .map(|d| resolve_date(Some(d)).map(super::iso))
        .transpose()?;

    let day = client
        .get_meals(date.as_deref())
        .await
        .map_err(|e| api_error("Failed to fetch meals", e))?;

    Ok(summarize_remote_day(date, day))
}

pub async fn remote_search_foods(
    client: Option<&ApiClient>,
    query: Option<&str>,
    category: Option<&str>,
) -> Result<SearchFoodsResponse, String> {
    let client = require(client)?;
    let filter = parse_category(category)?;

    let mut foods = client
        .get_food_database(query, filter)
        .await
        .map_err(|e| api_error("Failed to fetch food database", e))?;
    fill_categories(&mut foods);

    // The server may ignore the category parameter
    let foods: Vec<FoodReference> = filter_foods(&foods, query.unwrap_or(""), filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(SearchFoodsResponse {
        count: foods.len(),
        foods,
    })
}

/// Look up a food on the server, scale it and post the meal
pub async fn remote_log_food(
    client: Option<&ApiClient>,
    food_name: &str,
    portion: &str,
    meal_type: &str,
) -> Result<RemoteLogResponse, String> {
    let client = require(client)?;
    let meal_type = MealType::parse(meal_type)
        .ok_or_else(|| format!("Invalid meal_type '{}'", meal_type))?;
    let grams = parse_grams(portion).map_err(|e| e.to_string())?;

    let foods = client
        .get_food_database(Some(food_name), Default::default())
        .await
        .map_err(|e| api_error("Failed to fetch food database", e))?;
    let food = find_exact(&foods, food_name)
        .ok_or_else(|| format!("Food '{}' not found on the server", food_name))?;

    let nutrients = scale_portion(food, grams);
    let label = portion_label(grams);
    let meal = MealEntryCreate::from_macros(meal_type, food.name.clone(), nutrients, label.clone());

    let created = client
        .create_meal(&meal)
        .await
        .map_err(|e| api_error("Failed to create meal", e))?;

    tracing::info!(meal_id = %created.meal_id, food = %meal.food_name, "remote meal logged");
    Ok(RemoteLogResponse {
        meal_id: created.meal_id,
        food_name: meal.food_name,
        meal_type,
        portion_label: label,
        nutrients,
        message: created.message,
    })
}

pub async fn analyze_food_image(
    client: Option<&ApiClient>,
    image_base64: &str,
) -> Result<AnalyzeFoodResponse, String> {
    let client = require(client)?;
    if image_base64.trim().is_empty() {
        return Err("image_base64 cannot be empty".to_string());
    }

    let analysis = client
        .analyze_food(image_base64)
        .await
        .map_err(|e| api_error("Food analysis failed", e))?;

    Ok(AnalyzeFoodResponse {
        suggested_meal_type: analysis.suggested_meal_type(),
        totals: analysis_totals(&analysis),
        analysis,
    })
}

/// Look up a barcode; when `meal_type` is given, log the product as a meal
pub async fn scan_barcode(
    client: Option<&ApiClient>,
    barcode: &str,
    meal_type: Option<&str>,
) -> Result<ScanBarcodeResponse, String> {
    let client = require(client)?;
    let barcode = barcode.trim();
    if barcode.is_empty() || !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid barcode '{}'", barcode));
    }
    let meal_type = meal_type
        .map(|m| MealType::parse(m).ok_or_else(|| format!("Invalid meal_type '{}'", m)))
        .transpose()?;

    let Some(product) = client
        .scan_barcode(barcode)
        .await
        .map_err(|e| api_error("Barcode lookup failed", e))?
    else {
        return Ok(ScanBarcodeResponse {
            found: false,
            product: None,
            logged: None,
        });
    };

    let logged = match meal_type {
        Some(meal_type) => {
            let meal = MealEntryCreate::from_macros(
                meal_type,
                product.name.clone(),
                Macros {
                    calories: product.calories,
                    carbs: product.carbs,
                    protein: product.protein,
                    fat: product.fat,
                },
                product.portion.clone(),
            );
            let created = client
                .create_meal(&meal)
                .await
                .map_err(|e| api_error("Failed to create meal", e))?;
            Some(created)
        }
        None => None,
    };

    Ok(ScanBarcodeResponse {
        found: true,
        product: Some(product),
        logged,
    })
}

/// Recent meals from the server, grouped by date (newest first)
pub async fn remote_get_history(
    client: Option<&ApiClient>,
    days: u32,
) -> Result<RemoteHistoryResponse, String> {
    let client = require(client)?;
    let days = days.clamp(1, MAX_HISTORY_DAYS);

    let entries = client
        .get_history(days)
        .await
        .map_err(|e| api_error("Failed to fetch history", e))?;

    Ok(RemoteHistoryResponse {
        meal_count: entries.len(),
        days: history_by_date(&entries),
        requested_days: days,
    })
}

/// The server always files water under its own today
pub async fn remote_log_water(
    client: Option<&ApiClient>,
    glasses: Option<u32>,
) -> Result<WaterLog, String> {
    let client = require(client)?;
    let glasses = glasses_to_log(glasses)?;

    client
        .log_water(glasses)
        .await
        .map_err(|e| api_error("Failed to log water", e))?;
    client
        .get_water_log(None)
        .await
        .map_err(|e| api_error("Failed to fetch water log", e))
}

pub async fn remote_get_water(
    client: Option<&ApiClient>,
    date: Option<&str>,
) -> Result<WaterLog, String> {
    let client = require(client)?;
    let date = date
        .filter(|d| !d.trim().is_empty())
        .map(|d| resolve_date(Some(d)).map(super::iso))
        .transpose()?;

    client
        .get_water_log(date.as_deref())
        .await
        .map_err(|e| api_error("Failed to fetch water log", e))
}

pub async fn remote_list_goals(
    client: Option<&ApiClient>,
    include_completed: bool,
) -> Result<ListGoalsResponse, String> {
    let client = require(client)?;
    let goals = client
        .get_goals()
        .await
        .map_err(|e| api_error("Failed to fetch goals", e))?;
    Ok(summarize_goals(goals, include_completed))
}

pub async fn remote_create_goal(
    client: Option<&ApiClient>,
    data: GoalCreate,
) -> Result<RemoteGoalResponse, String> {
    let client = require(client)?;
    validate_goal(&data)?;

    let goal_id = client
        .create_goal(&data)
        .await
        .map_err(|e| api_error("Failed to create goal", e))?;
    tracing::info!(%goal_id, goal_type = %data.goal_type, "remote goal created");

    Ok(RemoteGoalResponse {
        success: true,
        goal_id,
    })
}

pub async fn remote_complete_goal(
    client: Option<&ApiClient>,
    goal_id: &str,
) -> Result<RemoteGoalResponse, String> {
    let client = require(client)?;
    let goal_id = goal_id.trim();
    if goal_id.is_empty() {
        return Err("goal id cannot be empty".to_string());
    }

    client
        .complete_goal(goal_id)
        .await
        .map_err(|e| api_error("Failed to complete goal", e))?;

    Ok(RemoteGoalResponse {
        success: true,
        goal_id: goal_id.to_string(),
    })
}

pub async fn remote_get_badges(client: Option<&ApiClient>) -> Result<BadgesResponse, String> {
    let client = require(client)?;
    client
        .get_badges()
        .await
        .map_err(|e| api_error("Failed to fetch badges", e))
}

pub async fn remote_get_tips(
    client: Option<&ApiClient>,
    category: Option<&str>,
) -> Result<TipsResponse, String> {
    let client = require(client)?;
    let tips = client
        .get_tips()
        .await
        .map_err(|e| api_error("Failed to fetch tips", e))?;

    Ok(TipsResponse {
        tips: in_category(tips, category),
    })
}

/// None without a backend; an unreachable backend counts as unhealthy
pub async fn backend_health(client: Option<&ApiClient>) -> Option<bool> {
    let client = client?;
    match client.health().await {
        Ok(healthy) => Some(healthy),
        Err(e) => {
            tracing::warn!(error = %e, "backend health check failed");
            Some(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::AnalyzedFood;
    use crate::models::MealEntry;
    use chrono::Utc;

    fn entry(meal_type: MealType, calories: f64) -> MealEntry {
        MealEntry {
            id: uuid::Uuid::new_v4().to_string(),
            date: "2025-03-01".to_string(),
            meal_type,
            food_name: "Tapioca".to_string(),
            calories,
            carbs: 10.0,
            protein: 1.0,
            fat: 0.5,
            portion_label: "100g".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_recomputes_totals() {
        let day = RemoteDay {
            entries: vec![entry(MealType::Breakfast, 300.0), entry(MealType::Dinner, 700.0)],
            server_totals: Macros { calories: 900.0, ..Macros::zero() },
            target: DailyTarget::new(2000.0),
        };
        let summary = summarize_remote_day(None, day);
        assert_eq!(summary.totals.calories, 1000.0);
        assert!(!summary.totals_match);
        assert_eq!(summary.progress.raw_percent, 50.0);
        assert_eq!(summary.meals.breakfast.len(), 1);
        assert_eq!(summary.meals.dinner.len(), 1);
    }

    #[test]
    fn test_summary_empty_day() {
        let day = RemoteDay {
            entries: vec![],
            server_totals: Macros::zero(),
            target: DailyTarget::new(0.0),
        };
        let summary = summarize_remote_day(Some("2025-03-01".to_string()), day);
        assert!(summary.totals_match);
        assert_eq!(summary.progress.raw_percent, 0.0);
        assert_eq!(summary.progress.display_percent, 0.0);
    }

    #[test]
    fn test_fill_categories_and_find_exact() {
        let mut foods: Vec<FoodReference> = catalog::foods()
            .iter()
            .take(2)
            .cloned()
            .map(|mut f| {
                f.category = FoodCategory::Other;
                f
            })
            .collect();
        fill_categories(&mut foods);
        assert_eq!(foods[0].category, FoodCategory::Grains);
        assert_eq!(foods[1].category, FoodCategory::Legumes);

        assert!(find_exact(&foods, "arroz BRANCO").is_some());
        assert!(find_exact(&foods, "Arroz").is_none());
    }

    #[test]
    fn test_analysis_totals() {
        let analysis = FoodAnalysis {
            foods: vec![
                AnalyzedFood {
                    name: "Arroz".to_string(),
                    portion_size: "150g".to_string(),
                    calories: 195.0,
                    carbs: 42.0,
                    protein: 3.75,
                    fat: 0.45,
                },
                AnalyzedFood {
                    name: "Feijão".to_string(),
                    portion_size: "100g".to_string(),
                    calories: 77.0,
                    carbs: 14.0,
                    protein: 4.5,
                    fat: 0.5,
                },
            ],
            total_calories: 272.0,
            total_carbs: 56.0,
            total_protein: 8.25,
            total_fat: 0.95,
            meal_type_suggestion: Some("lunch".to_string()),
        };
        let totals = analysis_totals(&analysis);
        assert_eq!(totals.calories, 272.0);
        assert_eq!(analysis.suggested_meal_type(), Some(MealType::Lunch));
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let err = remote_get_day(None, None).await.unwrap_err();
        assert!(err.contains("NUTRILOG_API_URL"));
        assert!(scan_barcode(None, "789", None).await.is_err());
        assert!(remote_get_history(None, 7).await.is_err());
        assert!(remote_get_water(None, None).await.is_err());
        assert!(remote_list_goals(None, false).await.is_err());
        assert!(remote_get_badges(None).await.is_err());
        assert!(remote_get_tips(None, None).await.is_err());
        assert!(remote_complete_goal(None, "g1").await.is_err());
    }

    #[tokio::test]
    async fn test_health_without_backend() {
        assert_eq!(backend_health(None).await, None);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unhealthy() {
        let client = ApiClient::new(&crate::config::ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            token: None,
            timeout: std::time::Duration::from_millis(200),
        })
        .unwrap();
        assert_eq!(backend_health(Some(&client)).await, Some(false));
    }

    #[tokio::test]
    async fn test_remote_writes_validate_before_sending() {
        let client = ApiClient::new(&crate::config::ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            token: None,
            timeout: std::time::Duration::from_millis(200),
        })
        .unwrap();

        let err = remote_log_water(Some(&client), Some(0)).await.unwrap_err();
        assert!(err.contains("glasses must be between"));

        let goal = GoalCreate {
            goal_type: "water".to_string(),
            target_value: 0.0,
            current_value: 0.0,
            description: String::new(),
        };
        let err = remote_create_goal(Some(&client), goal).await.unwrap_err();
        assert!(err.contains("target_value"));

        let err = remote_complete_goal(Some(&client), "  ").await.unwrap_err();
        assert!(err.contains("cannot be empty"));
    }
}
