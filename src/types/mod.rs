//! Type definitions module
//!
//! Core domain types: meals, their ingredients and the weekly plan.

pub mod meal;
pub mod plan;

// Re-export commonly used types
pub use meal::{format_prep_time, Ingredient, Meal, MealInput, MealType};
pub use plan::{DayMeals, WeekPlan};
