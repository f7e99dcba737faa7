//! Ingredient line parsing
//!
//! Accepts lines like `2 cups flour`, `0.5 lbs ground beef` or `3 eggs`.

use crate::errors::{PlannerError, Result};
use crate::types::Ingredient;

/// Units offered when entering ingredients
pub const COMMON_UNITS: [&str; 13] = [
    "cups", "tbsp", "tsp", "oz", "lbs", "grams", "kg", "pieces", "cloves", "slices", "bunches",
    "cans", "bottles",
];

/// Unit used when a line names none
pub const DEFAULT_UNIT: &str = "pieces";

/// Parse `<quantity> [unit] <name>` into an ingredient
pub fn parse_ingredient(line: &str) -> Result<Ingredient> {
    let mut parts = line.split_whitespace();

    let quantity_raw = parts
        .next()
        .ok_or_else(|| PlannerError::InvalidInput("Empty ingredient line".to_string()))?;
    let quantity: f64 = quantity_raw.parse().map_err(|_| {
        PlannerError::InvalidInput(format!(
            "Ingredient '{}' must start with a quantity (e.g. '2 cups flour')",
            line.trim()
        ))
    })?;
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(PlannerError::InvalidInput(format!(
            "Ingredient quantity must be greater than 0 in '{}'",
            line.trim()
        )));
    }

    let rest: Vec<&str> = parts.collect();
    let (unit, name_parts) = match rest.split_first() {
        Some((first, tail)) if is_common_unit(first) && !tail.is_empty() => {
            (first.to_lowercase(), tail)
        }
        _ => (DEFAULT_UNIT.to_string(), rest.as_slice()),
    };

    let name = name_parts.join(" ");
    if name.is_empty() {
        return Err(PlannerError::InvalidInput(format!(
            "Ingredient '{}' is missing a name",
            line.trim()
        )));
    }

    Ok(Ingredient::new(name, quantity, unit))
}

fn is_common_unit(token: &str) -> bool {
    COMMON_UNITS.iter().any(|unit| unit.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_unit() {
        let ingredient = parse_ingredient("2 cups flour").unwrap();
        assert_eq!(ingredient, Ingredient::new("flour", 2.0, "cups"));
    }

    #[test]
    fn test_parse_multi_word_name() {
        let ingredient = parse_ingredient("0.5 LBS ground beef").unwrap();
        assert_eq!(ingredient, Ingredient::new("ground beef", 0.5, "lbs"));
    }

    #[test]
    fn test_parse_without_unit_defaults_to_pieces() {
        let ingredient = parse_ingredient("3 eggs").unwrap();
        assert_eq!(ingredient, Ingredient::new("eggs", 3.0, "pieces"));
    }

    #[test]
    fn test_unit_word_as_name() {
        // "2 cans" has no name after the unit, so "cans" is the name
        let ingredient = parse_ingredient("2 cans").unwrap();
        assert_eq!(ingredient, Ingredient::new("cans", 2.0, "pieces"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_ingredient("").is_err());
        assert!(parse_ingredient("flour").is_err());
        assert!(parse_ingredient("0 cups flour").is_err());
        assert!(parse_ingredient("-1 cups flour").is_err());
        assert!(parse_ingredient("2").is_err());
    }
}
