//! Built-in food catalog
//!
//! Common Brazilian foods with per-100g nutrient values, the same list the
//! backend serves from `GET /food-database`.

use std::sync::OnceLock;

use crate::models::{CategoryFilter, FoodCategory, FoodReference};
use crate::nutrition::filter_foods;

// (name, kcal, carbs, protein, fat, category, portion label)
const FOODS: &[(&str, f64, f64, f64, f64, FoodCategory, &str)] = &[
    ("Arroz branco", 130.0, 28.0, 2.5, 0.3, FoodCategory::Grains, "100g"),
    ("Feijão preto", 77.0, 14.0, 4.5, 0.5, FoodCategory::Legumes, "100g"),
    ("Frango grelhado", 165.0, 0.0, 31.0, 3.6, FoodCategory::Proteins, "100g"),
    ("Carne bovina", 250.0, 0.0, 26.0, 17.0, FoodCategory::Proteins, "100g"),
    ("Ovo cozido", 155.0, 1.1, 13.0, 11.0, FoodCategory::Proteins, "unidade"),
    ("Banana", 89.0, 23.0, 1.1, 0.3, FoodCategory::Fruits, "unidade"),
    ("Maçã", 52.0, 14.0, 0.3, 0.2, FoodCategory::Fruits, "unidade"),
    ("Pão francês", 300.0, 58.0, 9.0, 3.5, FoodCategory::Bakery, "unidade"),
    ("Batata doce", 86.0, 20.0, 1.6, 0.1, FoodCategory::Vegetables, "100g"),
    ("Macarrão", 131.0, 25.0, 5.0, 1.1, FoodCategory::Grains, "100g"),
    ("Leite integral", 61.0, 4.7, 3.2, 3.3, FoodCategory::Dairy, "200ml"),
    ("Iogurte natural", 61.0, 4.7, 3.5, 3.3, FoodCategory::Dairy, "100g"),
    ("Queijo minas", 264.0, 3.5, 17.0, 21.0, FoodCategory::Dairy, "100g"),
    ("Tapioca", 152.0, 37.0, 0.2, 0.1, FoodCategory::Bakery, "unidade"),
    ("Açaí", 70.0, 6.2, 1.5, 5.0, FoodCategory::Fruits, "100g"),
];

/// The full catalog, built once
pub fn foods() -> &'static [FoodReference] {
    static CATALOG: OnceLock<Vec<FoodReference>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        FOODS
            .iter()
            .map(|&(name, calories, carbs, protein, fat, category, portion)| FoodReference {
                name: name.to_string(),
                calories_per_100g: calories,
                carbs_per_100g: carbs,
                protein_per_100g: protein,
                fat_per_100g: fat,
                category,
                base_portion_label: portion.to_string(),
            })
            .collect()
    })
}

/// Catalog entries matching the search term and category, catalog order
pub fn search(term: &str, category: CategoryFilter) -> Vec<&'static FoodReference> {
    filter_foods(foods(), term, category)
}

/// Exact (case-insensitive) name lookup
pub fn find(name: &str) -> Option<&'static FoodReference> {
    let wanted = name.trim().to_lowercase();
    foods().iter().find(|food| food.name.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size_and_order() {
        let all = search("", CategoryFilter::All);
        assert_eq!(all.len(), 15);
        assert_eq!(all[0].name, "Arroz branco");
        assert_eq!(all[14].name, "Açaí");
    }

    #[test]
    fn test_search_arroz() {
        let result = search("arroz", CategoryFilter::All);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].calories_per_100g, 130.0);
    }

    #[test]
    fn test_search_single_space_matches_multiword_names() {
        let names: Vec<&str> = search(" ", CategoryFilter::All)
            .into_iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Arroz branco",
                "Feijão preto",
                "Frango grelhado",
                "Carne bovina",
                "Ovo cozido",
                "Pão francês",
                "Batata doce",
                "Leite integral",
                "Iogurte natural",
                "Queijo minas",
            ]
        );
        assert!(search(" banana", CategoryFilter::All).is_empty());
        assert_eq!(search("arroz ", CategoryFilter::All).len(), 1);
    }

    #[test]
    fn test_search_dairy() {
        let names: Vec<&str> = search("", CategoryFilter::Only(FoodCategory::Dairy))
            .into_iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Leite integral", "Iogurte natural", "Queijo minas"]);
    }

    #[test]
    fn test_find_ignores_case() {
        assert!(find("banana").is_some());
        assert!(find("pizza").is_none());
    }
}
