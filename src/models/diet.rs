use serde::{Deserialize, Serialize};

/// Entry in the shared food library
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FoodItem {
    pub id: u64,
    pub name: String,
    pub calories_per_100g: f64,
}

/// Parent container for meal items, unique per (date, meal type)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Meal {
    pub id: u64,
    pub meal_type: String,
    pub record_date: String,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub meal_items: Vec<MealItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MealItem {
    pub id: u64,
    pub meal: u64,
    pub food_item: u64,
    #[serde(default)]
    pub food_item_name: String,
    /// Grams
    pub portion: f64,
    #[serde(default)]
    pub calories_calculated: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "早餐",
            MealType::Lunch => "午餐",
            MealType::Dinner => "晚餐",
            MealType::Snack => "加餐/零食",
        }
    }

    /// Label for a raw server value, falling back for unknown types
    pub fn label_for(value: &str) -> &'static str {
        Self::parse(value).map(|t| t.label()).unwrap_or("未知餐次")
    }
}

/// Payload of `/api/recommendations/diet/`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DietRecommendations {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<DietRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DietRecommendation {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "message")]
    pub description: String,
    #[serde(default)]
    pub foods: Vec<String>,
}
