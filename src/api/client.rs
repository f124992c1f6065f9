//! REST client for the nutrition backend

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::models::{CategoryFilter, FoodReference, Goal, GoalCreate, MealEntry, MealEntryCreate};
use super::error::{ApiError, ApiResult};
use super::types::{
    AnalyzeFoodResponse, BadgesResponse, BarcodeResponse, CreateGoalResponse, CreateMealResponse,
    ErrorBody, FoodAnalysis, FoodDatabaseResponse, GoalsResponse, HealthResponse,
    HistoryResponse, MealsResponse, RemoteDay, ScannedProduct, Tip, TipsResponse,
    WaterLogRequest, WaterLogResponse,
};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode a 2xx JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.with_auth(request).send().await?;
        let response = check_status(response).await?;
        let body = response.json::<T>().await?;
        Ok(body)
    }

    // ========================================================================
    // Meals
    // ========================================================================

    /// Meals for a date (server's "today" when None)
    pub async fn get_meals(&self, date: Option<&str>) -> ApiResult<RemoteDay> {
        let mut request = self.client.get(self.url("/meals"));
        if let Some(date) = date {
            request = request.query(&[("date", date)]);
        }
        let response: MealsResponse = self.send(request).await?;
        response.validate()
    }

    pub async fn get_history(&self, days: u32) -> ApiResult<Vec<MealEntry>> {
        let request = self
            .client
            .get(self.url("/meals/history"))
            .query(&[("days", days)]);
        let response: HistoryResponse = self.send(request).await?;
        response.into_entries()
    }

    pub async fn create_meal(&self, meal: &MealEntryCreate) -> ApiResult<CreateMealResponse> {
        tracing::debug!(food = %meal.food_name, calories = meal.calories, "posting meal");
        let request = self.client.post(self.url("/meals")).json(meal);
        self.send(request).await
    }

    // ========================================================================
    // Foods
    // ========================================================================

    pub async fn get_food_database(
        &self,
        search: Option<&str>,
        category: CategoryFilter,
    ) -> ApiResult<Vec<FoodReference>> {
        let mut request = self.client.get(self.url("/food-database"));
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            request = request.query(&[("search", search)]);
        }
        if let Some(category) = category.as_query() {
            request = request.query(&[("category", category)]);
        }
        let response: FoodDatabaseResponse = self.send(request).await?;
        response.validate()
    }

    pub async fn scan_barcode(&self, barcode: &str) -> ApiResult<Option<ScannedProduct>> {
        let request = self
            .client
            .post(self.url("/scan-barcode"))
            .form(&[("barcode", barcode)]);
        let response: BarcodeResponse = self.send(request).await?;
        response.validate()
    }

    pub async fn analyze_food(&self, image_base64: &str) -> ApiResult<FoodAnalysis> {
        let request = self
            .client
            .post(self.url("/analyze-food"))
            .form(&[("image_base64", image_base64)]);
        let response: AnalyzeFoodResponse = self.send(request).await?;
        response.validate()
    }

    // ========================================================================
    // Water, goals, badges, tips
    // ========================================================================

    pub async fn log_water(&self, glasses: u32) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url("/water-log"))
            .json(&WaterLogRequest { glasses });
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }

    pub async fn get_water_log(&self, date: Option<&str>) -> ApiResult<WaterLogResponse> {
        let mut request = self.client.get(self.url("/water-log"));
        if let Some(date) = date {
            request = request.query(&[("date", date)]);
        }
        self.send(request).await
    }

    pub async fn get_goals(&self) -> ApiResult<Vec<Goal>> {
        let response: GoalsResponse = self.send(self.client.get(self.url("/goals"))).await?;
        response.goals.into_iter().map(|g| g.into_goal()).collect()
    }

    pub async fn create_goal(&self, goal: &GoalCreate) -> ApiResult<String> {
        let request = self.client.post(self.url("/goals")).json(goal);
        let response: CreateGoalResponse = self.send(request).await?;
        Ok(response.goal_id)
    }

    pub async fn complete_goal(&self, goal_id: &str) -> ApiResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/goals/{}/complete", goal_id)));
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }

    pub async fn get_badges(&self) -> ApiResult<BadgesResponse> {
        self.send(self.client.get(self.url("/badges"))).await
    }

    pub async fn get_tips(&self) -> ApiResult<Vec<Tip>> {
        let response: TipsResponse = self.send(self.client.get(self.url("/tips"))).await?;
        Ok(response.tips)
    }

    pub async fn health(&self) -> ApiResult<bool> {
        let response: HealthResponse = self.send(self.client.get(self.url("/health"))).await?;
        Ok(response.status == "healthy")
    }
}

/// Turn a non-2xx response into `ApiError::Status`, using the body's `detail`
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = error_detail(&text).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    tracing::warn!(status = status.as_u16(), %detail, "backend request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
    })
}

/// `detail` is a string for HTTPException and a list of issues for validation errors
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_url_joins_api_prefix() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:8001".to_string(),
            token: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(client.url("/meals"), "http://localhost:8001/api/meals");
    }

    #[test]
    fn test_error_detail_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Token has expired"}"#),
            Some("Token has expired".to_string())
        );
    }

    #[test]
    fn test_error_detail_list() {
        let detail = error_detail(r#"{"detail": [{"loc": ["body", "calories"], "msg": "field required"}]}"#)
            .unwrap();
        assert!(detail.contains("field required"));
    }

    #[test]
    fn test_error_detail_not_json() {
        assert_eq!(error_detail("<html>502</html>"), None);
    }
}
