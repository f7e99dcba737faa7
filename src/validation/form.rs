//! Meal form type definitions and checks

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::PlannerError;
use crate::types::{Ingredient, Meal, MealInput};

/// Raw meal fields as entered by a user.
///
/// Numeric fields stay strings until validation so that "abc" and "" are
/// reported as field errors rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub servings: String,
    /// Comma separated
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub notes: String,
}

/// Field name -> message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FormErrors {
    fn add(&mut self, field: &'static str, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<FormErrors> for PlannerError {
    fn from(errors: FormErrors) -> Self {
        PlannerError::Validation(errors.to_string())
    }
}

impl MealForm {
    /// Pre-fill a form from an existing meal
    pub fn from_meal(meal: &Meal) -> Self {
        Self {
            name: meal.name.clone(),
            ingredients: meal.ingredients.clone(),
            prep_time: meal.prep_time.to_string(),
            servings: meal.servings.to_string(),
            tags: meal.tags.join(", "),
            notes: meal.notes.clone(),
        }
    }

    /// Validate and convert into a storable meal
    pub fn validate(&self) -> Result<MealInput, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Meal name is required");
        }

        let prep_time = positive(&self.prep_time);
        if prep_time.is_none() {
            errors.add("prep_time", "Prep time must be greater than 0");
        }

        let servings = positive(&self.servings);
        if servings.is_none() {
            errors.add("servings", "Servings must be greater than 0");
        }

        if self.ingredients.is_empty() {
            errors.add("ingredients", "At least one ingredient is required");
        }

        match (prep_time, servings) {
            (Some(prep_time), Some(servings)) if errors.is_empty() => Ok(MealInput {
                name: name.to_string(),
                ingredients: self.ingredients.clone(),
                prep_time,
                servings,
                tags: split_tags(&self.tags),
                notes: self.notes.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

fn positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

/// Split a comma separated tag string, dropping blanks
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}
