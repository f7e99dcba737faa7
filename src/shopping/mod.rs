//! Shopping list module
//!
//! Turns a week plan into a consolidated ingredient list:
//! - Resolving scheduled meal ids against the meal library
//! - Merging ingredient lines by name and unit
//! - Tracking which lines have been checked off

pub mod checklist;
pub mod consolidate;
pub mod list;

// Re-export key types for convenience
pub use checklist::ChecklistStore;
pub use consolidate::{consolidate_ingredients, meals_for_week};
pub use list::{format_quantity, ShoppingItem, ShoppingList};
