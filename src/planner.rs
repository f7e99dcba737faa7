//! Planner facade
//!
//! Ties the meal library and the week plans together for the CLI and the
//! HTTP API: meal search, slot assignment with meal lookup, and the weekly
//! shopping list.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

use crate::dates;
use crate::errors::{PlannerError, Result};
use crate::services::{MealService, WeekPlanService};
use crate::shopping::{meals_for_week, ShoppingList};
use crate::store::RecordStore;
use crate::types::{Meal, MealInput, MealType, WeekPlan};

/// Entry point for all planning operations
#[derive(Clone)]
pub struct Planner {
    store: Arc<dyn RecordStore>,
    meals: MealService,
    weeks: WeekPlanService,
}

impl Planner {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            meals: MealService::new(store.clone()),
            weeks: WeekPlanService::new(store.clone()),
            store,
        }
    }

    /// Name of the backing store ("remote" or "mock")
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    pub fn meals(&self) -> &MealService {
        &self.meals
    }

    pub fn weeks(&self) -> &WeekPlanService {
        &self.weeks
    }

    /// Meals whose name, tags or ingredient names contain `term`
    pub async fn search_meals(&self, term: &str) -> Result<Vec<Meal>> {
        let meals = self.meals.get_all().await?;
        Ok(filter_meals(meals, term))
    }

    pub async fn create_meal(&self, input: &MealInput) -> Result<Meal> {
        let meal = self.meals.create(input).await?;
        info!(id = meal.id, name = %meal.name, "meal added");
        Ok(meal)
    }

    /// Replace the writable fields of an existing meal
    pub async fn update_meal(&self, id: u64, input: &MealInput) -> Result<Meal> {
        self.meals.get_by_id(id).await?;
        let meal = self.meals.update(id, input).await?;
        info!(id, name = %meal.name, "meal updated");
        Ok(meal)
    }

    /// Delete an existing meal. Week plans keep the id; the calendar shows
    /// such slots as missing.
    pub async fn delete_meal(&self, id: u64) -> Result<()> {
        let meal = self.meals.get_by_id(id).await?;
        if !self.meals.delete(id).await? {
            return Err(PlannerError::Store(format!("Failed to delete meal {}", id)));
        }
        info!(id, name = %meal.name, "meal deleted");
        Ok(())
    }

    /// Schedule an existing meal on `date`, which must fall in the week of
    /// `week`; fails when the meal does not exist
    pub async fn assign_meal(
        &self,
        week: NaiveDate,
        date: NaiveDate,
        slot: MealType,
        meal_id: u64,
    ) -> Result<WeekPlan> {
        let meal = self.meals.get_by_id(meal_id).await?;
        let plan = self.weeks.assign_meal(week, date, slot, meal.id).await?;
        info!(meal = %meal.name, %date, slot = slot.as_str(), "meal scheduled");
        Ok(plan)
    }

    pub async fn remove_meal(
        &self,
        week: NaiveDate,
        date: NaiveDate,
        slot: MealType,
    ) -> Result<WeekPlan> {
        self.weeks.remove_meal(week, date, slot).await
    }

    pub async fn copy_week(&self, from: NaiveDate, to: NaiveDate) -> Result<WeekPlan> {
        self.weeks.copy_week(from, to).await
    }

    /// Week plan together with the meals it references
    pub async fn week_with_meals(&self, week: NaiveDate) -> Result<(WeekPlan, Vec<Meal>)> {
        let plan = self.weeks.get_week_plan(week).await?;
        let meals = self.meals.get_all().await?;
        Ok((plan, meals))
    }

    /// Meals scheduled in the week, in calendar order
    pub async fn week_meals(&self, week: NaiveDate) -> Result<Vec<Meal>> {
        let (plan, meals) = self.week_with_meals(week).await?;
        Ok(meals_for_week(&plan, &meals).into_iter().cloned().collect())
    }

    /// Consolidated shopping list for the week containing `week`
    pub async fn shopping_list(&self, week: NaiveDate) -> Result<ShoppingList> {
        let (plan, meals) = self.week_with_meals(week).await?;
        let scheduled = meals_for_week(&plan, &meals);
        Ok(ShoppingList::from_meals(dates::week_start(week), scheduled))
    }
}

/// Case-insensitive match on name, tags and ingredient names
pub fn filter_meals(meals: Vec<Meal>, term: &str) -> Vec<Meal> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return meals;
    }

    meals
        .into_iter()
        .filter(|meal| {
            meal.name.to_lowercase().contains(&needle)
                || meal.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
                || meal
                    .ingredients
                    .iter()
                    .any(|ingredient| ingredient.name.to_lowercase().contains(&needle))
        })
        .collect()
}
