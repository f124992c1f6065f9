//! NutriLog Status Tool
//!
//! Provides runtime status information about the NutriLog service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Meal logging instructions for AI assistants
pub const USAGE_INSTRUCTIONS: &str = r#"
# NutriLog Usage

## Logging food

Catalog foods are stored per 100g. Log them with a gram portion and the
server scales every nutrient:

```
log_food(food_name: "Arroz branco", portion: "150g", meal_type: "lunch")
```

- `portion` accepts "150", "150g" or "150 grams"
- Portions are clamped to 10g..1000g; anything that is not a number is rejected
- `meal_type` is one of breakfast, lunch, dinner, snack
- `date` is optional (YYYY-MM-DD, default today in UTC)

Use `search_foods` to find exact catalog names and `scale_food` to preview a
portion without logging it.

For packaged products or manual entries with absolute values, use `log_meal`
with calories, carbs, protein and fat for the whole portion.

## Reading a day

`get_day` returns the meals grouped by type, the totals, the calorie target and
progress. `progress.raw_percent` can exceed 100; `progress.display_percent` is
clamped to 0..100 for progress bars.

## Profile and target

`set_profile` with age, weight_kg, height_cm and gender recomputes the daily
calorie target (Mifflin-St Jeor, activity multiplier, +/-500 kcal for weight
goals). Without body data the target is 2000 kcal.

## Remote backend

The `remote_*`, `analyze_food_image` and `scan_barcode` tools need
NUTRILOG_API_URL. Totals for remote days are recomputed from the entries.
`remote_log_water` always adds to the backend's current day.
`nutrilog_status` reports `api_healthy` from the backend's health endpoint.

## Statistics

`get_statistics` with period "weekly" (7 days) or "monthly" (30 days) returns
one calorie value per day, zero for days without meals, plus the total and the
average over every day of the window.
"#;

/// Runtime status of the NutriLog service
#[derive(Debug, Clone, Serialize)]
pub struct NutrilogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Remote backend, if configured
    pub api_url: Option<String>,
    /// Result of the backend health check, None without a backend
    pub api_healthy: Option<bool>,
    pub dark_mode: bool,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    api_url: Option<String>,
    dark_mode: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, api_url: Option<String>, dark_mode: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            api_url,
            dark_mode,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NutrilogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            api_url: self.api_url.clone(),
            api_healthy: None,
            dark_mode: self.dark_mode,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/nutrilog.db"), None, true);
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert!(status.dark_mode);
        assert!(status.api_url.is_none());
        assert!(status.api_healthy.is_none());
    }
}
