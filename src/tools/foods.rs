//! Food catalog tools

use serde::Serialize;

use crate::catalog;
use crate::models::{CategoryFilter, FoodReference, Macros};
use crate::nutrition::{parse_grams, portion_label, scale_portion};

#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub foods: Vec<FoodReference>,
    pub count: usize,
}

/// One food scaled to a portion
#[derive(Debug, Serialize)]
pub struct ScaledFood {
    pub name: String,
    /// Grams after clamping into the portion range
    pub grams: f64,
    pub portion_label: String,
    pub nutrients: Macros,
    pub per_100g: Macros,
}

pub(crate) fn parse_category(category: Option<&str>) -> Result<CategoryFilter, String> {
    let raw = category.unwrap_or("all");
    CategoryFilter::parse(raw).ok_or_else(|| format!("Unknown category '{}'", raw))
}

/// Catalog search by name substring and category
pub fn search_foods(query: Option<&str>, category: Option<&str>) -> Result<SearchFoodsResponse, String> {
    let filter = parse_category(category)?;
    let foods: Vec<FoodReference> = catalog::search(query.unwrap_or(""), filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(SearchFoodsResponse {
        count: foods.len(),
        foods,
    })
}

/// Nutrients of a catalog food for a portion like "150g"
pub fn scale_food(food_name: &str, portion: &str) -> Result<ScaledFood, String> {
    let food = catalog::find(food_name)
        .ok_or_else(|| format!("Food '{}' is not in the catalog", food_name))?;
    let grams = parse_grams(portion).map_err(|e| e.to_string())?;

    Ok(ScaledFood {
        name: food.name.clone(),
        grams,
        portion_label: portion_label(grams),
        nutrients: scale_portion(food, grams),
        per_100g: food.per_100g(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_by_category() {
        let response = search_foods(None, Some("dairy")).unwrap();
        assert_eq!(response.count, 3);
        assert!(response.foods.iter().all(|f| f.category.as_str() == "dairy"));
    }

    #[test]
    fn test_search_by_name_is_case_insensitive() {
        let response = search_foods(Some("ARROZ"), None).unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.foods[0].name, "Arroz branco");
    }

    #[test]
    fn test_search_unknown_category() {
        assert!(search_foods(None, Some("snacks")).is_err());
    }

    #[test]
    fn test_scale_food() {
        let scaled = scale_food("Frango grelhado", "200g").unwrap();
        assert_eq!(scaled.grams, 200.0);
        assert!((scaled.nutrients.calories - 330.0).abs() < 1e-9);
        assert!((scaled.nutrients.protein - 62.0).abs() < 1e-9);
        assert_eq!(scaled.portion_label, "200g");
    }

    #[test]
    fn test_scale_food_clamps_portion() {
        let scaled = scale_food("Banana", "5000").unwrap();
        assert_eq!(scaled.grams, 1000.0);
        assert!((scaled.nutrients.calories - 890.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_food_errors() {
        assert!(scale_food("Pizza", "100g").is_err());
        assert!(scale_food("Banana", "lots").is_err());
    }
}
