//! Goal tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{Goal, GoalCreate};

#[derive(Debug, Serialize)]
pub struct ListGoalsResponse {
    pub goals: Vec<Goal>,
    pub open: usize,
    pub completed: usize,
}

pub(crate) fn validate_goal(data: &GoalCreate) -> Result<(), String> {
    if data.goal_type.trim().is_empty() {
        return Err("goal_type cannot be empty".to_string());
    }
    if !data.target_value.is_finite() || data.target_value <= 0.0 {
        return Err("target_value must be a positive number".to_string());
    }
    if !data.current_value.is_finite() || data.current_value < 0.0 {
        return Err("current_value must be a non-negative number".to_string());
    }
    Ok(())
}

pub fn create_goal(db: &Database, data: GoalCreate) -> Result<Goal, String> {
    validate_goal(&data)?;
    db.with_conn(|conn| Goal::create(conn, &data))
        .map_err(|e| format!("Failed to create goal: {}", e))
}

pub fn list_goals(db: &Database, include_completed: bool) -> Result<ListGoalsResponse, String> {
    let all = db
        .with_conn(Goal::list)
        .map_err(|e| format!("Database error: {}", e))?;
    Ok(summarize_goals(all, include_completed))
}

pub(crate) fn summarize_goals(all: Vec<Goal>, include_completed: bool) -> ListGoalsResponse {
    let completed = all.iter().filter(|g| g.completed).count();
    let open = all.len() - completed;
    let goals = if include_completed {
        all
    } else {
        all.into_iter().filter(|g| !g.completed).collect()
    };

    ListGoalsResponse { goals, open, completed }
}

/// None when the goal does not exist or is already completed
pub fn complete_goal(db: &Database, id: &str) -> Result<Option<Goal>, String> {
    db.with_conn(|conn| Goal::complete(conn, id))
        .map_err(|e| format!("Database error: {}", e))
}
