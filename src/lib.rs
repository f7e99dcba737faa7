//! mealplanner - weekly meal planning with consolidated shopping lists
//!
//! A meal library, a Sunday-started weekly calendar with breakfast, lunch
//! and dinner slots, and a shopping list that sums ingredient quantities
//! across the week.
//!
//! # Architecture
//!
//! - **store**: generic record CRUD behind `RecordStore` (hosted HTTP store
//!   or in-memory offline store)
//! - **services**: meal and week-plan records mapped to domain types
//! - **planner**: facade used by both the CLI and the HTTP API
//! - **server** / **cli**: the two front ends

// Domain
pub mod errors;
pub mod types;
pub mod dates;
pub mod shopping;
pub mod validation;

// Persistence
pub mod store;
pub mod services;
pub mod planner;

// Front ends
pub mod server;
pub mod cli;
pub mod display;
pub mod doctor;

// Re-export commonly used types
pub use errors::{PlannerError, Result};
pub use planner::Planner;
