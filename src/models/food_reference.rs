//! Food reference model
//!
//! A catalog record with nutrient density per 100 grams.

use serde::{Deserialize, Serialize};

use super::Macros;

/// Food category used by the catalog filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Grains,
    Legumes,
    Proteins,
    Fruits,
    Vegetables,
    Dairy,
    Bakery,
    #[default]
    Other,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 8] = [
        FoodCategory::Grains,
        FoodCategory::Legumes,
        FoodCategory::Proteins,
        FoodCategory::Fruits,
        FoodCategory::Vegetables,
        FoodCategory::Dairy,
        FoodCategory::Bakery,
        FoodCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Grains => "grains",
            FoodCategory::Legumes => "legumes",
            FoodCategory::Proteins => "proteins",
            FoodCategory::Fruits => "fruits",
            FoodCategory::Vegetables => "vegetables",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Bakery => "bakery",
            FoodCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == lower)
    }
}

/// Category selector: either every category or exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(FoodCategory),
}

impl CategoryFilter {
    /// Parse "all" (or an empty string) or a category name
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        FoodCategory::parse(trimmed).map(CategoryFilter::Only)
    }

    pub fn matches(&self, category: FoodCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    /// Query parameter value, None for `All`
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(c) => Some(c.as_str()),
        }
    }
}

/// A food record from the catalog. Values are per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodReference {
    pub name: String,
    pub calories_per_100g: f64,
    pub carbs_per_100g: f64,
    pub protein_per_100g: f64,
    pub fat_per_100g: f64,
    pub category: FoodCategory,
    /// Portion the catalog shows next to the food, e.g. "100g" or "unidade"
    pub base_portion_label: String,
}

impl FoodReference {
    pub fn per_100g(&self) -> Macros {
        Macros {
            calories: self.calories_per_100g,
            carbs: self.carbs_per_100g,
            protein: self.protein_per_100g,
            fat: self.fat_per_100g,
        }
    }
}
