//! Backend payload shapes
//!
//! Wire structs mirror the JSON the backend sends. Each one is converted into
//! a domain type through a `validate`/`into_*` step that rejects non-finite or
//! negative nutrient values, so the aggregator only ever sees clean numbers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    BadgeStatus, DailyTarget, FoodCategory, FoodReference, Goal, Macros, MealEntry, MealType,
    WaterLog,
};
use super::error::{ApiError, ApiResult};

fn check_amount(context: &str, field: &str, value: f64) -> ApiResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::InvalidPayload(format!(
            "{}: {} must be a non-negative number, got {}",
            context, field, value
        )));
    }
    Ok(value)
}

fn check_macros(context: &str, m: Macros) -> ApiResult<Macros> {
    Ok(Macros {
        calories: check_amount(context, "calories", m.calories)?,
        carbs: check_amount(context, "carbs", m.carbs)?,
        protein: check_amount(context, "protein", m.protein)?,
        fat: check_amount(context, "fat", m.fat)?,
    })
}

/// Timestamps come either as RFC 3339 or as naive UTC ("2025-03-01T12:00:00.123456")
fn parse_timestamp(raw: &str) -> ApiResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ApiError::InvalidPayload(format!("unparseable timestamp: {}", raw)))
}

// ============================================================================
// Meals
// ============================================================================

/// A meal document as stored by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMeal {
    pub meal_id: String,
    pub meal_type: String,
    pub food_name: String,
    pub calories: f64,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub portion_size: Option<String>,
    pub date: String,
    pub timestamp: String,
}

impl RemoteMeal {
    pub fn into_entry(self) -> ApiResult<MealEntry> {
        let context = format!("meal {}", self.meal_id);
        let meal_type = MealType::parse(&self.meal_type).ok_or_else(|| {
            ApiError::InvalidPayload(format!("{}: unknown meal type {}", context, self.meal_type))
        })?;
        let macros = check_macros(
            &context,
            Macros {
                calories: self.calories,
                carbs: self.carbs.unwrap_or(0.0),
                protein: self.protein.unwrap_or(0.0),
                fat: self.fat.unwrap_or(0.0),
            },
        )?;

        Ok(MealEntry {
            id: self.meal_id,
            date: self.date,
            meal_type,
            food_name: self.food_name,
            calories: macros.calories,
            carbs: macros.carbs,
            protein: macros.protein,
            fat: macros.fat,
            portion_label: self.portion_size.unwrap_or_default(),
            created_at: parse_timestamp(&self.timestamp)?,
        })
    }
}

/// `GET /api/meals`
#[derive(Debug, Clone, Deserialize)]
pub struct MealsResponse {
    pub meals: Vec<RemoteMeal>,
    pub totals: Macros,
    pub daily_target: f64,
}

/// Validated content of `GET /api/meals`
#[derive(Debug, Clone, Serialize)]
pub struct RemoteDay {
    pub entries: Vec<MealEntry>,
    /// Totals as reported by the server, kept for comparison
    pub server_totals: Macros,
    pub target: DailyTarget,
}

impl MealsResponse {
    pub fn validate(self) -> ApiResult<RemoteDay> {
        let entries = self
            .meals
            .into_iter()
            .map(RemoteMeal::into_entry)
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(RemoteDay {
            entries,
            server_totals: check_macros("totals", self.totals)?,
            target: DailyTarget::new(check_amount("daily_target", "calories", self.daily_target)?),
        })
    }
}

/// `POST /api/meals`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMealResponse {
    pub success: bool,
    pub meal_id: String,
    #[serde(default)]
    pub message: String,
}

/// `GET /api/meals/history`, entries keyed by date
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub history: std::collections::BTreeMap<String, HistoryBucket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryBucket {
    pub meals: Vec<RemoteMeal>,
    pub total_calories: f64,
}

impl HistoryResponse {
    /// Flatten into entries; per-day totals are recomputed locally
    pub fn into_entries(self) -> ApiResult<Vec<MealEntry>> {
        self.history
            .into_values()
            .flat_map(|bucket| bucket.meals)
            .map(RemoteMeal::into_entry)
            .collect()
    }
}

// ============================================================================
// Foods
// ============================================================================

/// A catalog food as served by `GET /api/food-database`; values are per 100 g
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFood {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub portion: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl RemoteFood {
    pub fn into_reference(self) -> ApiResult<FoodReference> {
        let context = format!("food {}", self.name);
        let per_100g = check_macros(
            &context,
            Macros {
                calories: self.calories,
                carbs: self.carbs,
                protein: self.protein,
                fat: self.fat,
            },
        )?;

        Ok(FoodReference {
            category: self
                .category
                .as_deref()
                .and_then(FoodCategory::parse)
                .unwrap_or_default(),
            name: self.name,
            calories_per_100g: per_100g.calories,
            carbs_per_100g: per_100g.carbs,
            protein_per_100g: per_100g.protein,
            fat_per_100g: per_100g.fat,
            base_portion_label: self.portion,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodDatabaseResponse {
    pub foods: Vec<RemoteFood>,
}

impl FoodDatabaseResponse {
    pub fn validate(self) -> ApiResult<Vec<FoodReference>> {
        self.foods.into_iter().map(RemoteFood::into_reference).collect()
    }
}

/// A packaged product found by barcode; values are for the stated portion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedProduct {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub portion: String,
}

/// `POST /api/scan-barcode`
#[derive(Debug, Clone, Deserialize)]
pub struct BarcodeResponse {
    pub success: bool,
    #[serde(default)]
    pub product: Option<ScannedProduct>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BarcodeResponse {
    /// The product, or None when the barcode is unknown
    pub fn validate(self) -> ApiResult<Option<ScannedProduct>> {
        match (self.success, self.product) {
            (true, Some(product)) => {
                let context = format!("product {}", product.name);
                check_macros(
                    &context,
                    Macros {
                        calories: product.calories,
                        carbs: product.carbs,
                        protein: product.protein,
                        fat: product.fat,
                    },
                )?;
                Ok(Some(product))
            }
            (true, None) => Err(ApiError::InvalidPayload(
                "barcode lookup succeeded without a product".to_string(),
            )),
            (false, _) => Ok(None),
        }
    }
}

// ============================================================================
// Image analysis
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedFood {
    pub name: String,
    #[serde(default)]
    pub portion_size: String,
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodAnalysis {
    pub foods: Vec<AnalyzedFood>,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub meal_type_suggestion: Option<String>,
}

impl FoodAnalysis {
    /// Suggested meal type, if the analysis named a known one
    pub fn suggested_meal_type(&self) -> Option<MealType> {
        self.meal_type_suggestion.as_deref().and_then(MealType::parse)
    }
}

/// `POST /api/analyze-food`
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeFoodResponse {
    pub success: bool,
    #[serde(default)]
    pub analysis: Option<FoodAnalysis>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalyzeFoodResponse {
    pub fn validate(self) -> ApiResult<FoodAnalysis> {
        let analysis = match (self.success, self.analysis) {
            (true, Some(analysis)) => analysis,
            _ => {
                return Err(ApiError::InvalidPayload(
                    self.error.unwrap_or_else(|| "food analysis returned no data".to_string()),
                ))
            }
        };

        for food in &analysis.foods {
            check_macros(
                &format!("analyzed food {}", food.name),
                Macros {
                    calories: food.calories,
                    carbs: food.carbs,
                    protein: food.protein,
                    fat: food.fat,
                },
            )?;
        }

        Ok(analysis)
    }
}

// ============================================================================
// Water, goals, badges, tips
// ============================================================================

/// `GET /api/water-log`
pub type WaterLogResponse = WaterLog;

#[derive(Debug, Clone, Serialize)]
pub struct WaterLogRequest {
    pub glasses: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteGoal {
    pub goal_id: String,
    pub goal_type: String,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl RemoteGoal {
    pub fn into_goal(self) -> ApiResult<Goal> {
        Ok(Goal {
            created_at: parse_timestamp(&self.created_at)?,
            completed_at: self.completed_at.as_deref().map(parse_timestamp).transpose()?,
            id: self.goal_id,
            goal_type: self.goal_type,
            target_value: self.target_value,
            current_value: self.current_value,
            description: self.description,
            completed: self.completed,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalsResponse {
    pub goals: Vec<RemoteGoal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoalResponse {
    pub success: bool,
    pub goal_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgesResponse {
    pub badges: Vec<BadgeStatus>,
    #[serde(default)]
    pub streak_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tip {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TipsResponse {
    pub tips: Vec<Tip>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body FastAPI-style backends send with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}
