//! CLI module for mealplanner
//!
//! Handles command-line argument parsing and configuration management.

pub mod args;
pub mod config;

pub use args::{Args, Commands, MealFields, MealsCommand, PlanCommand, Verbosity};
pub use config::{BackendMode, Config};
