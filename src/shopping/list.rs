//! Shopping list with check-off state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{PlannerError, Result};
use crate::shopping::consolidate::consolidate_ingredients;
use crate::types::{Ingredient, Meal};

/// One consolidated line of the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub ingredient: Ingredient,
    pub checked: bool,
}

/// Consolidated ingredients for one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub week_start: NaiveDate,
    pub items: Vec<ShoppingItem>,
}

impl ShoppingList {
    /// Build the list for the given scheduled meals
    pub fn from_meals<'a, I>(week_start: NaiveDate, meals: I) -> Self
    where
        I: IntoIterator<Item = &'a Meal>,
    {
        let items = consolidate_ingredients(meals)
            .into_iter()
            .map(|ingredient| ShoppingItem {
                ingredient,
                checked: false,
            })
            .collect();

        Self { week_start, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|item| item.checked).count()
    }

    /// Flip the checked state of the item at `index`; returns the new state
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.items.len();
        let item = self.items.get_mut(index).ok_or_else(|| {
            PlannerError::InvalidInput(format!(
                "No shopping item #{} (list has {} items)",
                index + 1,
                len
            ))
        })?;

        item.checked = !item.checked;
        Ok(item.checked)
    }

    pub fn clear_checked(&mut self) {
        for item in &mut self.items {
            item.checked = false;
        }
    }

    /// Keys of checked items, for persistence
    pub fn checked_keys(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| item.checked)
            .map(|item| item.ingredient.key())
            .collect()
    }

    /// Restore checked state from persisted keys; unknown keys are ignored
    pub fn apply_checked(&mut self, keys: &[String]) {
        let keys: HashSet<&str> = keys.iter().map(String::as_str).collect();
        for item in &mut self.items {
            item.checked = keys.contains(item.ingredient.key().as_str());
        }
    }

    /// Plain-text rendering, one bullet per line
    pub fn render_plain(&self) -> String {
        self.items
            .iter()
            .map(|item| {
                format!(
                    "• {} {} {}",
                    format_quantity(item.ingredient.quantity),
                    item.ingredient.unit,
                    item.ingredient.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Quantity without trailing zeros: `2`, `2.5`, `0.33`, `0.004`
pub fn format_quantity(quantity: f64) -> String {
    let magnitude = quantity.abs();
    // Below 0.01, keep three significant digits
    let decimals = if magnitude > 0.0 && magnitude < 0.01 {
        (-magnitude.log10().floor()) as usize + 2
    } else {
        2
    };

    let text = format!("{:.*}", decimals, quantity);
    match text.trim_end_matches('0').trim_end_matches('.') {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}
