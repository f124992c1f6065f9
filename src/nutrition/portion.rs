//! Portion size input
//!
//! Gram quantities are clamped into [`MIN_PORTION_GRAMS`, `MAX_PORTION_GRAMS`]
//! rather than rejected. Only input that is not a number at all is an error.

use thiserror::Error;

pub const MIN_PORTION_GRAMS: f64 = 10.0;
pub const MAX_PORTION_GRAMS: f64 = 1000.0;
/// Grams every catalog value is expressed against
pub const REFERENCE_GRAMS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortionError {
    #[error("Portion size is empty")]
    Empty,

    #[error("Portion size is not a number: {0}")]
    Malformed(String),
}

/// Clamp a gram amount into the accepted portion range
///
/// NaN maps to the lower bound.
pub fn clamp_grams(grams: f64) -> f64 {
    if grams.is_nan() {
        return MIN_PORTION_GRAMS;
    }
    grams.clamp(MIN_PORTION_GRAMS, MAX_PORTION_GRAMS)
}

/// Parse user input such as "150", "150g", "150.5 g" or "-20" into clamped grams
pub fn parse_grams(input: &str) -> Result<f64, PortionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PortionError::Empty);
    }

    let lower = trimmed.to_lowercase();
    let number = ["grams", "gram", "g"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(&lower)
        .trim();

    let grams: f64 = number
        .parse()
        .map_err(|_| PortionError::Malformed(trimmed.to_string()))?;

    if !grams.is_finite() {
        return Err(PortionError::Malformed(trimmed.to_string()));
    }

    Ok(clamp_grams(grams))
}

/// Label stored with a meal entry, e.g. "150g" or "62.5g"
pub fn portion_label(grams: f64) -> String {
    if grams.fract() == 0.0 {
        format!("{}g", grams as i64)
    } else {
        format!("{}g", grams)
    }
}
