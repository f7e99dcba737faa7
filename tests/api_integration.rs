//! HTTP API tests
//!
//! Serves the router on a local port over the offline store and drives it
//! with reqwest.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

use mealplanner::{server, store::MockStore, Planner};

async fn spawn_api() -> String {
    let planner = Planner::new(Arc::new(MockStore::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, server::router(planner)).await.unwrap();
    });

    format!("http://{}", addr)
}

fn pancakes() -> Value {
    json!({
        "name": "Pancakes",
        "ingredients": [
            {"name": "flour", "quantity": 2, "unit": "cups"},
            {"name": "eggs", "quantity": 2, "unit": "pieces"}
        ],
        "prep_time": 20,
        "servings": "4",
        "tags": "breakfast, sweet",
        "notes": ""
    })
}

async fn create_meal(client: &Client, base: &str, body: Value) -> Value {
    let response = client.post(format!("{}/meals", base)).json(&body).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let base = spawn_api().await;
    let body: Value = reqwest::get(format!("{}/health", base)).await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({"status": "ok", "store": "mock"}));
}

#[tokio::test]
async fn test_meal_crud() {
    let base = spawn_api().await;
    let client = Client::new();

    let meal = create_meal(&client, &base, pancakes()).await;
    let id = meal["id"].as_u64().unwrap();
    assert_eq!(meal["servings"], 4);
    assert_eq!(meal["tags"], json!(["breakfast", "sweet"]));

    let fetched: Value = client
        .get(format!("{}/meals/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["name"], "Pancakes");

    let mut changed = pancakes();
    changed["name"] = json!("Fluffy Pancakes");
    let response = client
        .put(format!("{}/meals/{}", base, id))
        .json(&changed)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["name"], "Fluffy Pancakes");

    let found: Vec<Value> = client
        .get(format!("{}/meals?search=fluffy", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let response = client.delete(format!("{}/meals/{}", base, id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.get(format!("{}/meals/{}", base, id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Meal not found");
}

#[tokio::test]
async fn test_invalid_meal_is_unprocessable() {
    let base = spawn_api().await;
    let response = Client::new()
        .post(format!("{}/meals", base))
        .json(&json!({"name": "  ", "prep_time": 0, "servings": 2}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Meal name is required"));
    assert!(message.contains("At least one ingredient is required"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let base = spawn_api().await;
    let response = Client::new()
        .post(format!("{}/meals", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_week_plan_and_shopping() {
    let base = spawn_api().await;
    let client = Client::new();
    let id = create_meal(&client, &base, pancakes()).await["id"].as_u64().unwrap();

    let week: Value = client
        .get(format!("{}/weeks/2025-01-08", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(week["week_start"], "2025-01-05");
    assert_eq!(week["range"], "Jan 5 - Jan 11, 2025");
    assert_eq!(week["days"].as_array().unwrap().len(), 7);

    for (day, slot) in [("2025-01-05", "breakfast"), ("2025-01-11", "dinner")] {
        let response = client
            .put(format!("{}/weeks/2025-01-08/days/{}/{}", base, day, slot))
            .json(&json!({"meal_id": id}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let list: Value = client
        .get(format!("{}/weeks/2025-01-05/shopping", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["ingredient"]["name"], "eggs");
    assert_eq!(items[0]["ingredient"]["quantity"], 4.0);
    assert_eq!(items[1]["ingredient"]["quantity"], 4.0);

    let response = client
        .delete(format!("{}/weeks/2025-01-05/days/2025-01-11/dinner", base))
        .send()
        .await
        .unwrap();
    let week: Value = response.json().await.unwrap();
    assert!(week["days"][6]["dinner"].is_null());
    assert_eq!(week["days"][0]["breakfast"], id);
}

#[tokio::test]
async fn test_week_errors() {
    let base = spawn_api().await;
    let client = Client::new();
    let id = create_meal(&client, &base, pancakes()).await["id"].as_u64().unwrap();

    // Day outside the addressed week
    let response = client
        .put(format!("{}/weeks/2025-01-05/days/2025-01-12/lunch", base))
        .json(&json!({"meal_id": id}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown slot
    let response = client
        .put(format!("{}/weeks/2025-01-05/days/2025-01-06/brunch", base))
        .json(&json!({"meal_id": id}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown meal
    let response = client
        .put(format!("{}/weeks/2025-01-05/days/2025-01-06/lunch", base))
        .json(&json!({"meal_id": 999}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bad date
    let response = client.get(format!("{}/weeks/not-a-date", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Removing from a week that was never planned
    let response = client
        .delete(format!("{}/weeks/2025-06-01/days/2025-06-01/lunch", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Week plan not found");
}

#[tokio::test]
async fn test_copy_week() {
    let base = spawn_api().await;
    let client = Client::new();
    let id = create_meal(&client, &base, pancakes()).await["id"].as_u64().unwrap();

    client
        .put(format!("{}/weeks/2025-01-05/days/2025-01-07/lunch", base))
        .json(&json!({"meal_id": id}))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/weeks/2025-01-05/copy", base))
        .json(&json!({"to": "2025-01-14"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let copied: Value = response.json().await.unwrap();
    assert_eq!(copied["week_start"], "2025-01-12");
    assert_eq!(copied["days"][2]["lunch"], id);

    let response = client
        .post(format!("{}/weeks/2030-01-01/copy", base))
        .json(&json!({"to": "2030-01-08"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
