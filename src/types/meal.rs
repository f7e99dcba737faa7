//! Meal library types
//!
//! A meal is a named recipe with a list of ingredients. Ingredients carry
//! a free-form unit; consolidation later groups them by name and unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PlannerError;

/// Single ingredient line of a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }

    /// Grouping key used by consolidation and by checklist persistence
    pub fn key(&self) -> String {
        format!("{}|{}", self.name, self.unit)
    }
}

/// A meal stored in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Meal {
    /// Writable part of the meal, e.g. as the starting point for an edit
    pub fn to_input(&self) -> MealInput {
        MealInput {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            prep_time: self.prep_time,
            servings: self.servings,
            tags: self.tags.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Fields a caller may set when creating or updating a meal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealInput {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Calendar slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// All slots in display order
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }

    /// Lower-case identifier used in records and URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MealType {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(PlannerError::InvalidInput(format!(
                "Unknown meal slot '{}' (expected breakfast, lunch or dinner)",
                other
            ))),
        }
    }
}

/// Format a preparation time as `45m`, `1h` or `1h 30m`
pub fn format_prep_time(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining > 0 {
        format!("{}h {}m", hours, remaining)
    } else {
        format!("{}h", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_prep_time_minutes_only() {
        assert_eq!(format_prep_time(0), "0m");
        assert_eq!(format_prep_time(45), "45m");
        assert_eq!(format_prep_time(59), "59m");
    }

    #[test]
    fn test_format_prep_time_hours() {
        assert_eq!(format_prep_time(60), "1h");
        assert_eq!(format_prep_time(90), "1h 30m");
        assert_eq!(format_prep_time(125), "2h 5m");
    }

    #[test]
    fn test_meal_type_labels() {
        assert_eq!(MealType::Breakfast.label(), "Breakfast");
        assert_eq!(MealType::Dinner.to_string(), "Dinner");
        assert_eq!(MealType::Lunch.as_str(), "lunch");
    }

    #[test]
    fn test_meal_type_parse() {
        assert_eq!("LUNCH".parse::<MealType>().unwrap(), MealType::Lunch);
        assert_eq!(" dinner ".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_meal_type_serde_lowercase() {
        let json = serde_json::to_string(&MealType::Breakfast).unwrap();
        assert_eq!(json, "\"breakfast\"");
    }

    #[test]
    fn test_ingredient_key() {
        let ingredient = Ingredient::new("flour", 2.0, "cups");
        assert_eq!(ingredient.key(), "flour|cups");
    }

    #[test]
    fn test_meal_to_input_drops_identity() {
        let meal = Meal {
            id: 7,
            name: "Pancakes".to_string(),
            ingredients: vec![Ingredient::new("flour", 2.0, "cups")],
            prep_time: 20,
            servings: 4,
            tags: vec!["breakfast".to_string()],
            notes: String::new(),
            created_at: None,
        };
        let input = meal.to_input();
        assert_eq!(input.name, "Pancakes");
        assert_eq!(input.ingredients.len(), 1);
        assert_eq!(input.servings, 4);
    }
}
