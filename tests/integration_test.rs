//! Integration tests for mealplanner
//!
//! Exercises the planner end to end over the offline store: meal library,
//! week plans and the consolidated shopping list.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use mealplanner::{
    dates,
    services::{MEAL_TABLE, WEEK_PLAN_TABLE},
    shopping::ChecklistStore,
    store::{mock::demo_meals, MockStore},
    types::{Ingredient, MealInput, MealType},
    Planner, PlannerError,
};

fn date(s: &str) -> NaiveDate {
    dates::string_to_date(s).unwrap()
}

fn input(name: &str, ingredients: Vec<Ingredient>) -> MealInput {
    MealInput {
        name: name.to_string(),
        ingredients,
        prep_time: 20,
        servings: 2,
        tags: vec!["test".to_string()],
        notes: String::new(),
    }
}

fn planner() -> Planner {
    Planner::new(Arc::new(MockStore::new()))
}

async fn assign(planner: &Planner, week: &str, day: &str, slot: MealType, meal_id: u64) {
    planner
        .assign_meal(date(week), date(day), slot, meal_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_shopping_list_consolidates_across_week() {
    let planner = planner();
    let omelette = planner
        .create_meal(&input(
            "Omelette",
            vec![
                Ingredient::new("eggs", 3.0, "pieces"),
                Ingredient::new("milk", 0.25, "cups"),
            ],
        ))
        .await
        .unwrap();
    let pancakes = planner
        .create_meal(&input(
            "Pancakes",
            vec![
                Ingredient::new("flour", 2.0, "cups"),
                Ingredient::new("eggs", 2.0, "pieces"),
                Ingredient::new("milk", 1.5, "cups"),
                Ingredient::new("milk", 100.0, "ml"),
            ],
        ))
        .await
        .unwrap();

    // Sunday breakfast and Saturday dinner of the same week, plus the
    // omelette twice
    assign(&planner, "2025-01-05", "2025-01-05", MealType::Breakfast, omelette.id).await;
    assign(&planner, "2025-01-05", "2025-01-07", MealType::Lunch, omelette.id).await;
    assign(&planner, "2025-01-05", "2025-01-11", MealType::Dinner, pancakes.id).await;
    // Next week must not leak into the list
    assign(&planner, "2025-01-12", "2025-01-12", MealType::Dinner, pancakes.id).await;

    let list = planner.shopping_list(date("2025-01-08")).await.unwrap();
    assert_eq!(list.week_start, date("2025-01-05"));

    let lines: Vec<(String, f64, String)> = list
        .items
        .iter()
        .map(|item| {
            let ingredient = &item.ingredient;
            (ingredient.name.clone(), ingredient.quantity, ingredient.unit.clone())
        })
        .collect();

    assert_eq!(
        lines,
        vec![
            ("eggs".to_string(), 8.0, "pieces".to_string()),
            ("flour".to_string(), 2.0, "cups".to_string()),
            ("milk".to_string(), 2.0, "cups".to_string()),
            ("milk".to_string(), 100.0, "ml".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_week_meals_in_calendar_order() {
    let planner = planner();
    let a = planner
        .create_meal(&input("A", vec![Ingredient::new("x", 1.0, "cups")]))
        .await
        .unwrap();
    let b = planner
        .create_meal(&input("B", vec![Ingredient::new("y", 1.0, "cups")]))
        .await
        .unwrap();

    assign(&planner, "2025-01-05", "2025-01-09", MealType::Breakfast, a.id).await;
    assign(&planner, "2025-01-05", "2025-01-06", MealType::Dinner, b.id).await;

    let names: Vec<String> = planner
        .week_meals(date("2025-01-05"))
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[tokio::test]
async fn test_copy_week_then_shop() {
    let planner = planner();
    let soup = planner
        .create_meal(&input("Soup", vec![Ingredient::new("carrots", 4.0, "pieces")]))
        .await
        .unwrap();

    assign(&planner, "2025-01-05", "2025-01-06", MealType::Lunch, soup.id).await;
    assign(&planner, "2025-01-05", "2025-01-08", MealType::Lunch, soup.id).await;

    let copied = planner.copy_week(date("2025-01-07"), date("2025-01-15")).await.unwrap();
    assert_eq!(copied.week_start, date("2025-01-12"));
    assert_eq!(copied.day(date("2025-01-13")).unwrap().lunch, Some(soup.id));

    let list = planner.shopping_list(date("2025-01-12")).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.items[0].ingredient.quantity, 8.0);
}

#[tokio::test]
async fn test_copy_from_empty_week_fails() {
    let err = planner()
        .copy_week(date("2025-03-02"), date("2025-03-09"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));
    assert_eq!(err.to_string(), "Source week plan not found");
}

#[tokio::test]
async fn test_deleted_meal_drops_out_of_shopping_list() {
    let planner = planner();
    let meal = planner
        .create_meal(&input("Toast", vec![Ingredient::new("bread", 2.0, "slices")]))
        .await
        .unwrap();
    assign(&planner, "2025-01-05", "2025-01-05", MealType::Breakfast, meal.id).await;

    planner.delete_meal(meal.id).await.unwrap();

    let (plan, meals) = planner.week_with_meals(date("2025-01-05")).await.unwrap();
    assert_eq!(plan.meal_ids(), vec![meal.id]);
    assert!(meals.is_empty());
    assert!(planner.shopping_list(date("2025-01-05")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_demo_seed_and_search() {
    let store = MockStore::new();
    let seeded = store.seed_if_empty(MEAL_TABLE, demo_meals().unwrap()).await.unwrap();
    assert_eq!(seeded, 4);
    assert_eq!(store.seed_if_empty(MEAL_TABLE, demo_meals().unwrap()).await.unwrap(), 0);

    let planner = Planner::new(Arc::new(store));
    assert_eq!(planner.meals().get_all().await.unwrap().len(), 4);

    let breakfast = planner.search_meals("breakfast").await.unwrap();
    assert_eq!(breakfast.len(), 1);
    assert_eq!(breakfast[0].name, "Overnight Oats");
    assert!(!breakfast[0].ingredients.is_empty());
}

#[tokio::test]
async fn test_offline_snapshot_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("offline.json");

    let meal_id = {
        let planner = Planner::new(Arc::new(MockStore::open(&path).await.unwrap()));
        let meal = planner
            .create_meal(&input("Chili", vec![Ingredient::new("beans", 2.0, "cans")]))
            .await
            .unwrap();
        assign(&planner, "2025-01-05", "2025-01-10", MealType::Dinner, meal.id).await;
        meal.id
    };

    let planner = Planner::new(Arc::new(MockStore::open(&path).await.unwrap()));
    let meal = planner.meals().get_by_id(meal_id).await.unwrap();
    assert_eq!(meal.name, "Chili");

    let plan = planner.weeks().get_week_plan(date("2025-01-05")).await.unwrap();
    assert_eq!(plan.day(date("2025-01-10")).unwrap().dinner, Some(meal_id));
}

#[tokio::test]
async fn test_checklist_persists_between_lists() {
    let temp = TempDir::new().unwrap();
    let planner = planner();
    let meal = planner
        .create_meal(&input(
            "Salad",
            vec![
                Ingredient::new("lettuce", 1.0, "pieces"),
                Ingredient::new("tomato", 2.0, "pieces"),
            ],
        ))
        .await
        .unwrap();
    assign(&planner, "2025-01-05", "2025-01-06", MealType::Lunch, meal.id).await;

    let checklist = ChecklistStore::new(temp.path().to_path_buf()).unwrap();
    let mut list = planner.shopping_list(date("2025-01-06")).await.unwrap();
    list.toggle(1).unwrap();
    checklist.save(&list).unwrap();

    // A new meal shifts positions but not the checked ingredient
    let extra = planner
        .create_meal(&input("Apple", vec![Ingredient::new("apple", 1.0, "pieces")]))
        .await
        .unwrap();
    assign(&planner, "2025-01-05", "2025-01-07", MealType::Breakfast, extra.id).await;

    let mut list = planner.shopping_list(date("2025-01-06")).await.unwrap();
    checklist.restore(&mut list).unwrap();
    let checked: Vec<&str> = list
        .items
        .iter()
        .filter(|item| item.checked)
        .map(|item| item.ingredient.name.as_str())
        .collect();
    assert_eq!(checked, vec!["tomato"]);
}

#[tokio::test]
async fn test_concurrent_assigns_keep_both_slots() {
    let store = Arc::new(MockStore::new().with_delay(Duration::from_millis(20)));
    let planner = Planner::new(store.clone());
    let meal = planner
        .create_meal(&input("Rice", vec![Ingredient::new("rice", 1.0, "cups")]))
        .await
        .unwrap();

    let week = date("2025-02-02");
    let (a, b) = tokio::join!(
        planner.assign_meal(week, date("2025-02-03"), MealType::Lunch, meal.id),
        planner.assign_meal(week, date("2025-02-05"), MealType::Dinner, meal.id)
    );
    a.unwrap();
    b.unwrap();

    let plan = planner.weeks().get_week_plan(week).await.unwrap();
    assert_eq!(plan.meal_ids(), vec![meal.id, meal.id]);
    assert_eq!(store.count(WEEK_PLAN_TABLE).await, 1);
}
