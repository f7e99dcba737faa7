//! Meal library service
//!
//! Meals live in the `meal_c` table. Ingredients are stored as a JSON string
//! and tags as a comma separated string; decoding tolerates both the stored
//! shapes and their native JSON equivalents.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::errors::{PlannerError, Result};
use crate::store::{record_id, FetchParams, Record, RecordStore, SortDirection};
use crate::types::{Ingredient, Meal, MealInput};

pub const MEAL_TABLE: &str = "meal_c";

const NAME: &str = "Name";
const TAGS: &str = "Tags";
const INGREDIENTS: &str = "ingredients_c";
const PREP_TIME: &str = "prep_time_c";
const SERVINGS: &str = "servings_c";
const NOTES: &str = "notes_c";
const CREATED_AT: &str = "created_at_c";

const MEAL_FIELDS: [&str; 9] = [
    NAME,
    TAGS,
    INGREDIENTS,
    PREP_TIME,
    SERVINGS,
    NOTES,
    CREATED_AT,
    "CreatedOn",
    "ModifiedOn",
];

/// CRUD over the meal library
#[derive(Clone)]
pub struct MealService {
    store: Arc<dyn RecordStore>,
}

impl MealService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All meals, newest first
    pub async fn get_all(&self) -> Result<Vec<Meal>> {
        let params = FetchParams::fields(&MEAL_FIELDS).order_by("CreatedOn", SortDirection::Desc);
        let records = self
            .store
            .fetch_records(MEAL_TABLE, &params)
            .await
            .inspect_err(|e| error!("Error fetching meals: {}", e))?;

        let meals: Vec<Meal> = records.iter().filter_map(meal_from_record).collect();
        debug!(count = meals.len(), "fetched meals");
        Ok(meals)
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Meal> {
        let record = self
            .store
            .get_record(MEAL_TABLE, id, &FetchParams::fields(&MEAL_FIELDS))
            .await
            .inspect_err(|e| error!("Error fetching meal with ID {}: {}", id, e))?;

        record
            .as_ref()
            .and_then(meal_from_record)
            .ok_or_else(|| PlannerError::NotFound("Meal not found".to_string()))
    }

    pub async fn create(&self, input: &MealInput) -> Result<Meal> {
        let mut record = meal_to_record(input);
        record.insert(CREATED_AT.to_string(), json!(Utc::now().to_rfc3339()));

        let created = self
            .store
            .create_records(MEAL_TABLE, vec![record])
            .await
            .and_then(|response| response.into_first_record("create meal"))
            .inspect_err(|e| error!("Error creating meal: {}", e))?;

        decoded(&created, "create meal")
    }

    pub async fn update(&self, id: u64, input: &MealInput) -> Result<Meal> {
        let mut record = meal_to_record(input);
        record.insert("Id".to_string(), json!(id));

        let updated = self
            .store
            .update_records(MEAL_TABLE, vec![record])
            .await
            .and_then(|response| response.into_first_record("update meal"))
            .inspect_err(|e| error!("Error updating meal: {}", e))?;

        decoded(&updated, "update meal")
    }

    /// Delete a meal; `false` when the store reports it did not delete
    pub async fn delete(&self, id: u64) -> Result<bool> {
        self.store
            .delete_records(MEAL_TABLE, &[id])
            .await
            .and_then(|response| response.deleted())
            .inspect_err(|e| error!("Error deleting meal: {}", e))
    }
}

fn decoded(record: &Record, action: &str) -> Result<Meal> {
    meal_from_record(record).ok_or_else(|| PlannerError::Store(format!("Failed to {}", action)))
}

/// Encode the writable fields of a meal
pub fn meal_to_record(input: &MealInput) -> Record {
    let mut record = Record::new();
    record.insert(NAME.to_string(), json!(input.name));
    record.insert(TAGS.to_string(), json!(input.tags.join(",")));
    record.insert(
        INGREDIENTS.to_string(),
        json!(serde_json::to_string(&input.ingredients).unwrap_or_else(|_| "[]".to_string())),
    );
    record.insert(PREP_TIME.to_string(), json!(input.prep_time));
    record.insert(SERVINGS.to_string(), json!(input.servings));
    record.insert(NOTES.to_string(), json!(input.notes));
    record
}

/// Decode a meal record; `None` when it has no id
pub fn meal_from_record(record: &Record) -> Option<Meal> {
    let Some(id) = record_id(record) else {
        warn!("skipping meal record without Id");
        return None;
    };

    Some(Meal {
        id,
        name: string_field(record, NAME),
        ingredients: ingredients_field(record, id),
        prep_time: number_field(record, PREP_TIME),
        servings: number_field(record, SERVINGS),
        tags: tags_field(record),
        notes: string_field(record, NOTES),
        created_at: timestamp_field(record, CREATED_AT)
            .or_else(|| timestamp_field(record, "CreatedOn")),
    })
}

fn string_field(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_field(record: &Record, field: &str) -> u32 {
    match record.get(field) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn tags_field(record: &Record) -> Vec<String> {
    match record.get(TAGS) {
        Some(Value::String(s)) => crate::validation::form::split_tags(s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn ingredients_field(record: &Record, id: u64) -> Vec<Ingredient> {
    let parsed = match record.get(INGREDIENTS) {
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(s)) => serde_json::from_str(s),
        Some(value @ Value::Array(_)) => serde_json::from_value(value.clone()),
        _ => Ok(Vec::new()),
    };

    parsed.unwrap_or_else(|e| {
        warn!(meal_id = id, "unreadable ingredients: {}", e);
        Vec::new()
    })
}

fn timestamp_field(record: &Record, field: &str) -> Option<DateTime<Utc>> {
    record
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;

    fn input(name: &str) -> MealInput {
        MealInput {
            name: name.to_string(),
            ingredients: vec![Ingredient::new("flour", 2.0, "cups")],
            prep_time: 30,
            servings: 4,
            tags: vec!["baking".to_string(), "weekend".to_string()],
            notes: "Preheat oven".to_string(),
        }
    }

    fn service() -> MealService {
        MealService::new(Arc::new(MockStore::new()))
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_encoding() {
        let record = meal_to_record(&input("Bread"));
        assert_eq!(record[TAGS], json!("baking,weekend"));
        assert!(record[INGREDIENTS].is_string());
        assert_eq!(record[PREP_TIME], json!(30));
    }

    #[test]
    fn test_decode_tolerates_native_shapes() {
        let meal = meal_from_record(&record(json!({
            "Id": "3",
            "Name": "Tacos",
            "Tags": ["mexican", " quick "],
            "ingredients_c": [{"name": "tortillas", "quantity": 8, "unit": "pieces"}],
            "prep_time_c": "20",
            "servings_c": 4.0
        })))
        .unwrap();

        assert_eq!(meal.id, 3);
        assert_eq!(meal.tags, vec!["mexican", "quick"]);
        assert_eq!(meal.ingredients[0].quantity, 8.0);
        assert_eq!(meal.prep_time, 20);
        assert_eq!(meal.servings, 4);
    }

    #[test]
    fn test_decode_bad_ingredients_are_empty() {
        let meal = meal_from_record(&record(json!({
            "Id": 1,
            "Name": "Mystery",
            "ingredients_c": "{not json"
        })))
        .unwrap();
        assert!(meal.ingredients.is_empty());
        assert_eq!(meal.prep_time, 0);
    }

    #[test]
    fn test_decode_without_id() {
        assert!(meal_from_record(&record(json!({"Name": "Orphan"}))).is_none());
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let created = service.create(&input("Bread")).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(created.created_at.is_some());

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.name, "Bread");
        assert_eq!(fetched.ingredients, vec![Ingredient::new("flour", 2.0, "cups")]);
        assert_eq!(fetched.tags, vec!["baking", "weekend"]);
    }

    #[tokio::test]
    async fn test_get_all_newest_first() {
        let service = service();
        service.create(&input("First")).await.unwrap();
        service.create(&input("Second")).await.unwrap();

        let names: Vec<String> = service
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_get_missing_meal() {
        let err = service().get_by_id(42).await.unwrap_err();
        assert!(matches!(err, PlannerError::NotFound(ref m) if m == "Meal not found"));
    }

    #[tokio::test]
    async fn test_update() {
        let service = service();
        let created = service.create(&input("Bread")).await.unwrap();

        let mut changed = input("Sourdough");
        changed.servings = 8;
        let updated = service.update(created.id, &changed).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Sourdough");
        assert_eq!(updated.servings, 8);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_meal_fails() {
        assert!(service().update(9, &input("Ghost")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        let created = service.create(&input("Bread")).await.unwrap();
        assert!(service.delete(created.id).await.unwrap());
        assert!(service.get_all().await.unwrap().is_empty());
    }
}
