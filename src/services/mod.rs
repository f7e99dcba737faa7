//! Domain services over the record store
//!
//! Each service owns the mapping between one table's records and the
//! domain types in `crate::types`.

pub mod meals;
pub mod week_plans;

pub use meals::{MealService, MEAL_TABLE};
pub use week_plans::{WeekPlanService, WEEK_PLAN_TABLE};
