//! Week plan service
//!
//! One record per week in the `week_plan_c` table. The seven days are
//! stored as a JSON array in `meals_c`; meal ids are written as strings and
//! read back from strings or numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::dates;
use crate::errors::{PlannerError, Result};
use crate::store::{record_id, FetchParams, Record, RecordStore};
use crate::types::{DayMeals, MealType, WeekPlan};

pub const WEEK_PLAN_TABLE: &str = "week_plan_c";

const NAME: &str = "Name";
const WEEK_START: &str = "week_start_c";
const MEALS: &str = "meals_c";

const PLAN_FIELDS: [&str; 3] = [NAME, WEEK_START, MEALS];

/// Stored shape of one day
#[derive(Debug, Serialize, Deserialize)]
struct StoredDay {
    date: String,
    #[serde(default)]
    breakfast: Option<Value>,
    #[serde(default)]
    lunch: Option<Value>,
    #[serde(default)]
    dinner: Option<Value>,
}

fn stored_id(value: &Option<Value>) -> Option<u64> {
    match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn stored_value(id: Option<u64>) -> Option<Value> {
    id.map(|id| Value::String(id.to_string()))
}

/// Meal assignments per week
///
/// Read-modify-write cycles on plans hold `writes` for their whole length.
#[derive(Clone)]
pub struct WeekPlanService {
    store: Arc<dyn RecordStore>,
    writes: Arc<Mutex<()>>,
}

impl WeekPlanService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Stored plan of the week containing `date`, if any
    pub async fn find_week_plan(&self, date: NaiveDate) -> Result<Option<WeekPlan>> {
        let week_start = dates::week_start(date);
        let records = self
            .store
            .fetch_records(WEEK_PLAN_TABLE, &FetchParams::fields(&PLAN_FIELDS))
            .await
            .inspect_err(|e| error!("Error fetching week plans: {}", e))?;

        // week_start_c may come back as a full timestamp
        Ok(records
            .iter()
            .filter_map(plan_from_record)
            .find(|plan| plan.week_start == week_start))
    }

    /// Plan of the week containing `date`, created empty when missing
    pub async fn get_week_plan(&self, date: NaiveDate) -> Result<WeekPlan> {
        let _guard = self.writes.lock().await;
        self.find_or_create(date).await
    }

    async fn find_or_create(&self, date: NaiveDate) -> Result<WeekPlan> {
        if let Some(plan) = self.find_week_plan(date).await? {
            return Ok(plan);
        }

        let empty = WeekPlan::empty(0, date);
        let mut record = plan_to_record(&empty);
        record.remove("Id");

        let created = self
            .store
            .create_records(WEEK_PLAN_TABLE, vec![record])
            .await
            .and_then(|response| response.into_first_record("create week plan"))
            .inspect_err(|e| error!("Error creating week plan: {}", e))?;

        info!(week_start = %empty.week_start, "created empty week plan");
        plan_from_record(&created)
            .ok_or_else(|| PlannerError::Store("Failed to create week plan".to_string()))
    }

    /// Put `meal_id` into one slot of `date`
    pub async fn assign_meal(
        &self,
        week: NaiveDate,
        date: NaiveDate,
        slot: MealType,
        meal_id: u64,
    ) -> Result<WeekPlan> {
        let _guard = self.writes.lock().await;
        let mut plan = self.find_or_create(week).await?;
        day_in(&mut plan, date)?.set(slot, Some(meal_id));

        debug!(%date, slot = slot.as_str(), meal_id, "assigning meal");
        self.save(&plan).await
    }

    /// Clear one slot of `date`
    pub async fn remove_meal(
        &self,
        week: NaiveDate,
        date: NaiveDate,
        slot: MealType,
    ) -> Result<WeekPlan> {
        let _guard = self.writes.lock().await;
        let mut plan = self
            .find_week_plan(week)
            .await?
            .ok_or_else(|| PlannerError::NotFound("Week plan not found".to_string()))?;
        day_in(&mut plan, date)?.set(slot, None);

        debug!(%date, slot = slot.as_str(), "removing meal");
        self.save(&plan).await
    }

    /// Copy every slot of the `from` week onto the `to` week, day by day
    pub async fn copy_week(&self, from: NaiveDate, to: NaiveDate) -> Result<WeekPlan> {
        let _guard = self.writes.lock().await;
        let source = self
            .find_week_plan(from)
            .await?
            .ok_or_else(|| PlannerError::NotFound("Source week plan not found".to_string()))?;
        let mut target = self.find_or_create(to).await?;

        for (target_day, source_day) in target.days.iter_mut().zip(source.days.iter()) {
            for slot in MealType::ALL {
                target_day.set(slot, source_day.get(slot));
            }
        }

        info!(from = %source.week_start, to = %target.week_start, "copied week plan");
        self.save(&target).await
    }

    async fn save(&self, plan: &WeekPlan) -> Result<WeekPlan> {
        let saved = self
            .store
            .update_records(WEEK_PLAN_TABLE, vec![plan_to_record(plan)])
            .await
            .and_then(|response| response.into_first_record("update week plan"))
            .inspect_err(|e| error!("Error saving week plan: {}", e))?;

        plan_from_record(&saved)
            .ok_or_else(|| PlannerError::Store("Failed to update week plan".to_string()))
    }
}

fn day_in(plan: &mut WeekPlan, date: NaiveDate) -> Result<&mut DayMeals> {
    let week_start = plan.week_start;
    plan.day_mut(date).ok_or_else(|| {
        PlannerError::InvalidInput(format!(
            "{} is not in the week of {}",
            dates::date_to_string(date),
            dates::format_week_range(week_start)
        ))
    })
}

/// Encode a plan, including its id
pub fn plan_to_record(plan: &WeekPlan) -> Record {
    let days: Vec<StoredDay> = plan
        .days
        .iter()
        .map(|day| StoredDay {
            date: dates::date_to_string(day.date),
            breakfast: stored_value(day.breakfast),
            lunch: stored_value(day.lunch),
            dinner: stored_value(day.dinner),
        })
        .collect();

    let mut record = Record::new();
    record.insert("Id".to_string(), json!(plan.id));
    record.insert(
        NAME.to_string(),
        json!(format!("Week of {}", dates::date_to_string(plan.week_start))),
    );
    record.insert(WEEK_START.to_string(), json!(dates::date_to_string(plan.week_start)));
    record.insert(
        MEALS.to_string(),
        json!(serde_json::to_string(&days).unwrap_or_else(|_| "[]".to_string())),
    );
    record
}

/// Decode a plan record, normalizing it to exactly seven days
pub fn plan_from_record(record: &Record) -> Option<WeekPlan> {
    let id = record_id(record)?;
    let week_start = record
        .get(WEEK_START)
        .and_then(Value::as_str)
        .and_then(|s| dates::string_to_date(s).ok())?;

    let stored: Vec<StoredDay> = match record.get(MEALS) {
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_else(|e| {
            warn!(plan_id = id, "unreadable week plan days: {}", e);
            Vec::new()
        }),
        Some(value @ Value::Array(_)) => {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }
        _ => Vec::new(),
    };

    let map: BTreeMap<NaiveDate, DayMeals> = stored
        .iter()
        .filter_map(|day| {
            let date = dates::string_to_date(&day.date).ok()?;
            let meals = DayMeals {
                date,
                breakfast: stored_id(&day.breakfast),
                lunch: stored_id(&day.lunch),
                dinner: stored_id(&day.dinner),
            };
            Some((date, meals))
        })
        .collect();

    Some(WeekPlan::from_date_map(id, week_start, &map))
}
