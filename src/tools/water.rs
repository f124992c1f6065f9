//! Water intake tools

use crate::db::Database;
use crate::models::WaterLog;
use super::{iso, resolve_date};

/// Upper bound for a single log call
const MAX_GLASSES_PER_CALL: u32 = 20;

/// Glasses for one log call, default one
pub(crate) fn glasses_to_log(glasses: Option<u32>) -> Result<u32, String> {
    let glasses = glasses.unwrap_or(1);
    if glasses == 0 || glasses > MAX_GLASSES_PER_CALL {
        return Err(format!(
            "glasses must be between 1 and {}",
            MAX_GLASSES_PER_CALL
        ));
    }
    Ok(glasses)
}

/// Add glasses to a day (default one glass, today)
pub fn log_water(db: &Database, glasses: Option<u32>, date: Option<&str>) -> Result<WaterLog, String> {
    let glasses = glasses_to_log(glasses)?;
    let date = iso(resolve_date(date)?);

    let log = db
        .with_conn(|conn| WaterLog::add_glasses(conn, &date, glasses))
        .map_err(|e| format!("Database error: {}", e))?;

    tracing::debug!(date = %log.date, glasses = log.glasses_count, "water logged");
    Ok(log)
}

pub fn get_water(db: &Database, date: Option<&str>) -> Result<WaterLog, String> {
    let date = iso(resolve_date(date)?);
    db.with_conn(|conn| WaterLog::get(conn, &date))
        .map_err(|e| format!("Database error: {}", e))
}
