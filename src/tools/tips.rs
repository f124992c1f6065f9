//! Nutrition tips

use serde::Serialize;

use crate::api::Tip;

// (category, title, description, icon)
const TIPS: &[(&str, &str, &str, &str)] = &[
    (
        "Hidratação",
        "Beba pelo menos 2 litros de água por dia",
        "A água ajuda na digestão e mantém seu corpo hidratado.",
        "💧",
    ),
    (
        "Carboidratos",
        "Escolha carboidratos integrais",
        "Arroz integral, pão integral e aveia são ótimas opções.",
        "🌾",
    ),
    (
        "Bebidas",
        "Evite bebidas açucaradas",
        "Refrigerantes e sucos industrializados têm muito açúcar.",
        "🥤",
    ),
    (
        "Proteínas",
        "Inclua proteínas em cada refeição",
        "Frango, ovos, feijão e peixes são excelentes fontes.",
        "🍗",
    ),
    (
        "Frutas",
        "Coma pelo menos 3 frutas por dia",
        "Frutas são ricas em vitaminas e fibras.",
        "🍎",
    ),
    (
        "Horários",
        "Não pule refeições",
        "Faça pelo menos 3 refeições principais por dia.",
        "⏰",
    ),
    (
        "Lanches",
        "Prepare lanches saudáveis",
        "Castanhas, frutas e iogurte são ótimas opções.",
        "🥜",
    ),
    (
        "Economia",
        "Planeje suas compras",
        "Fazer lista de compras evita desperdício e economiza.",
        "💰",
    ),
];

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: Vec<Tip>,
}

/// Keep the tips of one category (case-insensitive); blank keeps all
pub(crate) fn in_category(tips: Vec<Tip>, category: Option<&str>) -> Vec<Tip> {
    let wanted = category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());

    match wanted {
        Some(wanted) => tips
            .into_iter()
            .filter(|t| t.category.to_lowercase() == wanted)
            .collect(),
        None => tips,
    }
}

/// Built-in tips, optionally limited to one category
pub fn get_tips(category: Option<&str>) -> TipsResponse {
    let all = TIPS
        .iter()
        .enumerate()
        .map(|(i, &(category, title, description, icon))| Tip {
            id: (i + 1).to_string(),
            category: category.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        })
        .collect();

    TipsResponse {
        tips: in_category(all, category),
    }
}
