//! Meal form validation
//! Checks user-entered meal fields and parses free-form ingredient lines

pub mod form;
pub mod ingredient;

pub use form::{FormErrors, MealForm};
pub use ingredient::{parse_ingredient, COMMON_UNITS, DEFAULT_UNIT};
