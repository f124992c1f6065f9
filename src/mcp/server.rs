//! NutriLog MCP Server Implementation
//!
//! Implements the MCP server with all NutriLog tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::db::Database;
use crate::models::{GoalCreate, MealEntryCreate, MealType, ProfileUpdate};
use crate::nutrition::energy::{ActivityLevel, Gender, WeightGoal};
use crate::tools::status::StatusTracker;
use crate::tools::{foods, goals, meals, profile, remote, tips, water};

/// NutriLog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    api: Option<ApiClient>,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(
        database_path: PathBuf,
        database: Database,
        api: Option<ApiClient>,
        api_url: Option<String>,
        dark_mode: bool,
    ) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path, api_url, dark_mode)),
            database,
            api,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn tool_error(e: String) -> McpError {
    McpError::internal_error(e, None)
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Substring of the food name (case-insensitive, optional)
    pub query: Option<String>,
    /// Category: all, grains, legumes, proteins, fruits, vegetables, dairy, bakery, other
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleFoodParams {
    /// Exact catalog name, e.g. "Arroz branco"
    pub food_name: String,
    /// Portion in grams, e.g. "150g"
    pub portion: String,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Exact catalog name
    pub food_name: String,
    /// Portion in grams, e.g. "150g" (clamped to 10..1000)
    pub portion: String,
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    /// ISO date (YYYY-MM-DD), default today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    pub food_name: String,
    /// kcal for the whole portion
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    /// Free-form portion label, e.g. "1 unidade"
    #[serde(default)]
    pub portion_size: String,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// ISO date (YYYY-MM-DD), default today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetHistoryParams {
    /// Number of days back, including the end date (default 7, max 90)
    #[serde(default = "default_history_days")]
    pub days: u32,
    /// Last day of the window, default today
    pub end_date: Option<String>,
}

fn default_history_days() -> u32 { 7 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetStatisticsParams {
    /// weekly (7 days) or monthly (30 days)
    #[serde(default = "default_period")]
    pub period: String,
    /// Last day of the window, default today
    pub end_date: Option<String>,
}

fn default_period() -> String { "weekly".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealEntryParams {
    /// Meal entry ID
    pub id: String,
}

// ============================================================================
// Water / Goal / Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWaterParams {
    /// Glasses to add (default 1)
    pub glasses: Option<u32>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateGoalParams {
    /// Free-form type, e.g. "water", "calories", "weight"
    pub goal_type: String,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListGoalsParams {
    /// Include completed goals (default false)
    #[serde(default)]
    pub include_completed: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompleteGoalParams {
    /// Goal ID
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetTipsParams {
    /// Tip category, e.g. "Frutas" (optional)
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    /// male, female or other
    pub gender: Option<String>,
    /// sedentary, light, moderate, active or very_active
    pub activity_level: Option<String>,
    /// lose_weight, gain_weight or healthy_eating
    pub goal: Option<String>,
}

// ============================================================================
// Remote Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoteLogFoodParams {
    /// Food name as served by the backend food database
    pub food_name: String,
    /// Portion in grams, e.g. "150g"
    pub portion: String,
    pub meal_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoteHistoryParams {
    /// Number of days back (default 7, max 90)
    #[serde(default = "default_history_days")]
    pub days: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoteLogWaterParams {
    /// Glasses to add to the backend's current day (default 1)
    pub glasses: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodImageParams {
    /// Base64-encoded photo of the meal
    pub image_base64: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScanBarcodeParams {
    /// EAN/UPC digits
    pub barcode: String,
    /// When set, the product is logged as a meal of this type
    pub meal_type: Option<String>,
}

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriLog service including build info, database status, and process information")]
    async fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        let mut status = self.status_tracker.get_status();
        status.api_healthy = remote::backend_health(self.api.as_ref()).await;
        to_json(&status)
    }

    #[tool(description = "Get instructions for logging food, reading days and using the remote tools. Call this when starting a food logging session.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Foods ---

    #[tool(description = "Search the food catalog by name substring and category")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_foods(p.query.as_deref(), p.category.as_deref()).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Compute the nutrients of a catalog food for a gram portion without logging it")]
    fn scale_food(&self, Parameters(p): Parameters<ScaleFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::scale_food(&p.food_name, &p.portion).map_err(tool_error)?;
        to_json(&result)
    }

    // --- Meals ---

    #[tool(description = "Log a catalog food with a gram portion. Nutrients are scaled from the per-100g values. Updates the streak and awards badges.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let result = meals::log_food(&self.database, &p.food_name, &p.portion, &p.meal_type, p.date.as_deref())
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Log a meal with absolute nutrient values (for foods outside the catalog)")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let meal_type = MealType::parse(&p.meal_type)
            .ok_or_else(|| tool_error(format!("Invalid meal_type '{}'", p.meal_type)))?;
        let data = MealEntryCreate {
            meal_type,
            food_name: p.food_name,
            calories: p.calories,
            carbs: p.carbs,
            protein: p.protein,
            fat: p.fat,
            portion_size: p.portion_size,
        };
        let result = meals::log_meal(&self.database, data, p.date.as_deref()).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get a day's meals grouped by type, with totals, calorie target, progress and water")]
    fn get_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_day(&self.database, p.date.as_deref()).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get meals for the last N days grouped by date, newest first")]
    fn get_history(&self, Parameters(p): Parameters<GetHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_history(&self.database, p.days, p.end_date.as_deref()).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Weekly or monthly calorie statistics: one value per day (zero for days without meals), total and daily average")]
    fn get_statistics(&self, Parameters(p): Parameters<GetStatisticsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_statistics(&self.database, &p.period, p.end_date.as_deref()).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Delete a meal entry and return the day's new totals")]
    fn delete_meal_entry(&self, Parameters(p): Parameters<DeleteMealEntryParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal_entry(&self.database, &p.id).map_err(tool_error)?;
        let json = match result {
            Some(deleted) => serde_json::to_string_pretty(&deleted),
            None => Ok(format!(r#"{{"error": "Meal entry not found", "id": "{}"}}"#, p.id)),
        }
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Water ---

    #[tool(description = "Add glasses of water to a day (target is 8 glasses)")]
    fn log_water(&self, Parameters(p): Parameters<LogWaterParams>) -> Result<CallToolResult, McpError> {
        let result = water::log_water(&self.database, p.glasses, p.date.as_deref()).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get glasses of water logged on a day")]
    fn get_water(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = water::get_water(&self.database, p.date.as_deref()).map_err(tool_error)?;
        to_json(&result)
    }

    // --- Goals ---

    #[tool(description = "Create a goal")]
    fn create_goal(&self, Parameters(p): Parameters<CreateGoalParams>) -> Result<CallToolResult, McpError> {
        let data = GoalCreate {
            goal_type: p.goal_type,
            target_value: p.target_value,
            current_value: p.current_value,
            description: p.description,
        };
        let result = goals::create_goal(&self.database, data).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "List goals, open ones only unless include_completed is set")]
    fn list_goals(&self, Parameters(p): Parameters<ListGoalsParams>) -> Result<CallToolResult, McpError> {
        let result = goals::list_goals(&self.database, p.include_completed).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Mark a goal as completed")]
    fn complete_goal(&self, Parameters(p): Parameters<CompleteGoalParams>) -> Result<CallToolResult, McpError> {
        let result = goals::complete_goal(&self.database, &p.id).map_err(tool_error)?;
        let json = match result {
            Some(goal) => serde_json::to_string_pretty(&goal),
            None => Ok(format!(r#"{{"error": "Open goal not found", "id": "{}"}}"#, p.id)),
        }
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Profile & Gamification ---

    #[tool(description = "Get all badges with earned flags and the current streak")]
    fn get_badges(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_badges(&self.database).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get nutrition tips, optionally for one category")]
    fn get_tips(&self, Parameters(p): Parameters<GetTipsParams>) -> Result<CallToolResult, McpError> {
        to_json(&tips::get_tips(p.category.as_deref()))
    }

    #[tool(description = "Get the user profile with the daily calorie target, streak and badges")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database).map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Update body data and goal. The daily calorie target is recomputed (Mifflin-St Jeor).")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let gender = match p.gender.as_deref() {
            Some(raw) => Some(
                Gender::parse(raw).ok_or_else(|| tool_error(format!("Invalid gender '{}'", raw)))?,
            ),
            None => None,
        };
        let data = ProfileUpdate {
            name: p.name,
            age: p.age,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            gender,
            activity_level: p.activity_level.as_deref().map(ActivityLevel::parse),
            goal: p.goal.as_deref().map(WeightGoal::parse),
        };
        let result = profile::set_profile(&self.database, data).map_err(tool_error)?;
        to_json(&result)
    }

    // --- Remote backend ---

    #[tool(description = "Fetch a day's meals from the nutrition backend; totals and progress are recomputed locally")]
    async fn remote_get_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_get_day(self.api.as_ref(), p.date.as_deref()).await.map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Search the backend food database by name and category")]
    async fn remote_search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_search_foods(self.api.as_ref(), p.query.as_deref(), p.category.as_deref())
            .await
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Scale a backend food to a gram portion and post it as a meal")]
    async fn remote_log_food(&self, Parameters(p): Parameters<RemoteLogFoodParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_log_food(self.api.as_ref(), &p.food_name, &p.portion, &p.meal_type)
            .await
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Fetch recent meals from the backend grouped by date")]
    async fn remote_get_history(&self, Parameters(p): Parameters<RemoteHistoryParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_get_history(self.api.as_ref(), p.days).await.map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Add glasses of water to the backend's current day")]
    async fn remote_log_water(&self, Parameters(p): Parameters<RemoteLogWaterParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_log_water(self.api.as_ref(), p.glasses).await.map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get glasses of water logged on the backend for a day")]
    async fn remote_get_water(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_get_water(self.api.as_ref(), p.date.as_deref()).await.map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "List goals stored on the backend")]
    async fn remote_list_goals(&self, Parameters(p): Parameters<ListGoalsParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_list_goals(self.api.as_ref(), p.include_completed)
            .await
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Create a goal on the backend")]
    async fn remote_create_goal(&self, Parameters(p): Parameters<CreateGoalParams>) -> Result<CallToolResult, McpError> {
        let data = GoalCreate {
            goal_type: p.goal_type,
            target_value: p.target_value,
            current_value: p.current_value,
            description: p.description,
        };
        let result = remote::remote_create_goal(self.api.as_ref(), data).await.map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Mark a backend goal as completed")]
    async fn remote_complete_goal(&self, Parameters(p): Parameters<CompleteGoalParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_complete_goal(self.api.as_ref(), &p.id).await.map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get badges and streak from the backend")]
    async fn remote_get_badges(&self) -> Result<CallToolResult, McpError> {
        let result = remote::remote_get_badges(self.api.as_ref()).await.map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Get nutrition tips from the backend, optionally for one category")]
    async fn remote_get_tips(&self, Parameters(p): Parameters<GetTipsParams>) -> Result<CallToolResult, McpError> {
        let result = remote::remote_get_tips(self.api.as_ref(), p.category.as_deref())
            .await
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Send a meal photo to the backend for food recognition")]
    async fn analyze_food_image(&self, Parameters(p): Parameters<AnalyzeFoodImageParams>) -> Result<CallToolResult, McpError> {
        let result = remote::analyze_food_image(self.api.as_ref(), &p.image_base64)
            .await
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Look up a product barcode on the backend, optionally logging it as a meal")]
    async fn scan_barcode(&self, Parameters(p): Parameters<ScanBarcodeParams>) -> Result<CallToolResult, McpError> {
        let result = remote::scan_barcode(self.api.as_ref(), &p.barcode, p.meal_type.as_deref())
            .await
            .map_err(tool_error)?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriLog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriLog - meal journal and nutrition tracking. \
                 Call usage_instructions before logging food. \
                 Foods: search_foods, scale_food. \
                 Meals: log_food (catalog food + grams), log_meal (absolute values), get_day, get_history, \
                 get_statistics (weekly/monthly), delete_meal_entry. \
                 Water: log_water, get_water. Goals: create_goal, list_goals, complete_goal. \
                 Profile: get_profile, set_profile, get_badges, get_tips. \
                 Backend (needs NUTRILOG_API_URL): remote_get_day, remote_get_history, remote_search_foods, \
                 remote_log_food, remote_log_water, remote_get_water, remote_list_goals, remote_create_goal, \
                 remote_complete_goal, remote_get_badges, remote_get_tips, analyze_food_image, scan_barcode."
                    .into(),
            ),
        }
    }
}
