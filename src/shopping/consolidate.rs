//! Ingredient consolidation
//!
//! Complexity: O(n log n) in the number of ingredient lines (grouping is
//! O(n), the final sort dominates).

use std::collections::HashMap;

use crate::types::{Ingredient, Meal, WeekPlan};

/// Merge ingredient lines across meals by (name, unit), summing quantities.
///
/// The first occurrence of a key supplies the stored name and unit. Output
/// is sorted by name, case-insensitively.
pub fn consolidate_ingredients<'a, I>(meals: I) -> Vec<Ingredient>
where
    I: IntoIterator<Item = &'a Meal>,
{
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut consolidated: Vec<Ingredient> = Vec::new();

    for meal in meals {
        for ingredient in &meal.ingredients {
            let key = (ingredient.name.clone(), ingredient.unit.clone());
            match index.get(&key) {
                Some(&pos) => consolidated[pos].quantity += ingredient.quantity,
                None => {
                    index.insert(key, consolidated.len());
                    consolidated.push(ingredient.clone());
                }
            }
        }
    }

    consolidated.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.unit.cmp(&b.unit))
    });
    consolidated
}

/// Meals scheduled in `plan`, in calendar order.
///
/// Ids that no longer resolve to a meal are skipped. A meal scheduled in
/// several slots is returned once per slot.
pub fn meals_for_week<'a>(plan: &WeekPlan, all_meals: &'a [Meal]) -> Vec<&'a Meal> {
    let by_id: HashMap<u64, &Meal> = all_meals.iter().map(|meal| (meal.id, meal)).collect();

    plan.meal_ids()
        .into_iter()
        .filter_map(|id| by_id.get(&id).copied())
        .collect()
}
