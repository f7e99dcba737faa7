//! Request handlers for the HTTP API

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::dates;
use crate::errors::PlannerError;
use crate::planner::Planner;
use crate::shopping::ShoppingList;
use crate::types::{Ingredient, Meal, MealType, WeekPlan};
use crate::validation::MealForm;

use super::error::ApiError;

pub type AppState = Arc<Planner>;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
pub struct SearchQuery {
    search: Option<String>,
}

/// Meal fields as sent by a client. Numbers may arrive as JSON numbers or
/// strings, tags as a comma separated string or an array.
#[derive(Deserialize)]
pub struct MealBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    prep_time: Value,
    #[serde(default)]
    servings: Value,
    #[serde(default)]
    tags: Value,
    #[serde(default)]
    notes: String,
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

impl From<MealBody> for MealForm {
    fn from(body: MealBody) -> Self {
        let tags = match &body.tags {
            Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(","),
            other => text(other),
        };

        MealForm {
            name: body.name,
            ingredients: body.ingredients,
            prep_time: text(&body.prep_time),
            servings: text(&body.servings),
            tags,
            notes: body.notes,
        }
    }
}

#[derive(Deserialize)]
pub struct AssignBody {
    meal_id: u64,
}

#[derive(Deserialize)]
pub struct CopyBody {
    to: String,
}

/// Week plan plus its display range
#[derive(Serialize)]
pub struct WeekView {
    #[serde(flatten)]
    plan: WeekPlan,
    range: String,
}

impl From<WeekPlan> for WeekView {
    fn from(plan: WeekPlan) -> Self {
        let range = dates::format_week_range(plan.week_start);
        Self { plan, range }
    }
}

pub async fn health_handler(State(planner): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "store": planner.store_name() }))
}

pub async fn list_meals_handler(
    State(planner): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Meal>>> {
    let Query(query) = query?;
    let term = query.search.unwrap_or_default();
    Ok(Json(planner.search_meals(&term).await?))
}

pub async fn create_meal_handler(
    State(planner): State<AppState>,
    body: Result<Json<MealBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Meal>)> {
    let Json(body) = body?;
    let input = MealForm::from(body).validate().map_err(PlannerError::from)?;
    let meal = planner.create_meal(&input).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn get_meal_handler(
    State(planner): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Meal>> {
    let Path(id) = id?;
    Ok(Json(planner.meals().get_by_id(id).await?))
}

pub async fn update_meal_handler(
    State(planner): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<MealBody>, JsonRejection>,
) -> ApiResult<Json<Meal>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let input = MealForm::from(body).validate().map_err(PlannerError::from)?;
    Ok(Json(planner.update_meal(id, &input).await?))
}

pub async fn delete_meal_handler(
    State(planner): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    planner.delete_meal(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_week_handler(
    State(planner): State<AppState>,
    week: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<WeekView>> {
    let Path(week) = week?;
    let week = dates::string_to_date(&week)?;
    let plan = planner.weeks().get_week_plan(week).await?;
    Ok(Json(plan.into()))
}

pub async fn assign_meal_handler(
    State(planner): State<AppState>,
    path: Result<Path<(String, String, String)>, PathRejection>,
    body: Result<Json<AssignBody>, JsonRejection>,
) -> ApiResult<Json<WeekView>> {
    let Path((week, day, slot)) = path?;
    let Json(body) = body?;

    let week = dates::string_to_date(&week)?;
    let day = dates::string_to_date(&day)?;
    let slot: MealType = slot.parse()?;

    let plan = planner.assign_meal(week, day, slot, body.meal_id).await?;
    Ok(Json(plan.into()))
}

pub async fn remove_meal_handler(
    State(planner): State<AppState>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> ApiResult<Json<WeekView>> {
    let Path((week, day, slot)) = path?;

    let week = dates::string_to_date(&week)?;
    let day = dates::string_to_date(&day)?;
    let slot: MealType = slot.parse()?;

    let plan = planner.remove_meal(week, day, slot).await?;
    Ok(Json(plan.into()))
}

pub async fn copy_week_handler(
    State(planner): State<AppState>,
    week: Result<Path<String>, PathRejection>,
    body: Result<Json<CopyBody>, JsonRejection>,
) -> ApiResult<Json<WeekView>> {
    let Path(week) = week?;
    let Json(body) = body?;

    let from = dates::string_to_date(&week)?;
    let to = dates::string_to_date(&body.to)?;
    Ok(Json(planner.copy_week(from, to).await?.into()))
}

pub async fn shopping_handler(
    State(planner): State<AppState>,
    week: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ShoppingList>> {
    let Path(week) = week?;
    let week = dates::string_to_date(&week)?;
    Ok(Json(planner.shopping_list(week).await?))
}
