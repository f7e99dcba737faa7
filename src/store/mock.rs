//! In-memory record store for offline/demo mode
//!
//! Behaves like the hosted store: ids are assigned per table, audit fields
//! are stamped, projection and ordering are honored. Optional JSON snapshot
//! keeps data across CLI runs.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::Result;
use crate::store::records::{
    record_id, FetchParams, MutationResponse, Record, RecordResult, SortDirection,
    CREATED_ON_FIELD, ID_FIELD, MODIFIED_ON_FIELD,
};
use crate::store::RecordStore;

/// Demo-mode latency
pub const DEFAULT_DELAY: Duration = Duration::from_millis(250);

const DEMO_MEALS: &str = include_str!("../../data/demo_meals.json");

/// Sample meal records used to seed an empty offline store
pub fn demo_meals() -> Result<Vec<Record>> {
    Ok(serde_json::from_str(DEMO_MEALS)?)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    tables: HashMap<String, Vec<Record>>,
}

/// In-memory tables behind a lock
pub struct MockStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    delay: Duration,
    snapshot_path: Option<PathBuf>,
}

impl MockStore {
    /// Empty store with no latency and no snapshot
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            delay: Duration::ZERO,
            snapshot_path: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Load tables from `path` (if it exists) and write them back after
    /// every mutation
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let json = tokio::fs::read_to_string(&path).await?;
            let snapshot: Snapshot = serde_json::from_str(&json)?;
            info!(path = %path.display(), tables = snapshot.tables.len(), "loaded offline data");
            snapshot.tables
        } else {
            HashMap::new()
        };

        Ok(Self {
            tables: RwLock::new(tables),
            delay: Duration::ZERO,
            snapshot_path: Some(path),
        })
    }

    /// Insert `records` into `table` when it holds no records yet.
    /// Returns the number of records inserted.
    pub async fn seed_if_empty(&self, table: &str, records: Vec<Record>) -> Result<usize> {
        {
            let tables = self.tables.read().await;
            if tables.get(table).is_some_and(|rows| !rows.is_empty()) {
                return Ok(0);
            }
        }

        let count = records.len();
        self.create_records(table, records).await?.check()?;
        info!(table, count, "seeded offline store");
        Ok(count)
    }

    /// Number of records currently in `table`
    pub async fn count(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map(Vec::len).unwrap_or(0)
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Write the snapshot first, so a failed write leaves memory untouched
    async fn commit(
        &self,
        tables: &mut HashMap<String, Vec<Record>>,
        staged: HashMap<String, Vec<Record>>,
    ) -> Result<()> {
        self.persist(&staged).await?;
        *tables = staged;
        Ok(())
    }

    async fn persist(&self, tables: &HashMap<String, Vec<Record>>) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let snapshot = Snapshot {
            tables: tables.clone(),
        };
        tokio::fs::write(path, serde_json::to_string_pretty(&snapshot)?).await?;
        debug!(path = %path.display(), "offline data saved");
        Ok(())
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }

    record
        .iter()
        .filter(|(key, _)| key.as_str() == ID_FIELD || fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Order by every key in turn, then by id
fn sort_records(records: &mut [Record], params: &FetchParams) {
    if params.order_by.is_empty() {
        return;
    }

    records.sort_by(|a, b| {
        params
            .order_by
            .iter()
            .map(|order| {
                let ordering = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| record_id(a).cmp(&record_id(b)))
    });
}

#[async_trait]
impl RecordStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<Vec<Record>> {
        self.simulate_latency().await;
        let tables = self.tables.read().await;

        let mut rows: Vec<Record> = tables.get(table).cloned().unwrap_or_default();

        // Ordering fields may be projected away, so sort full rows first
        sort_records(&mut rows, params);

        Ok(rows.iter().map(|r| project(r, &params.fields)).collect())
    }

    async fn get_record(
        &self,
        table: &str,
        id: u64,
        params: &FetchParams,
    ) -> Result<Option<Record>> {
        self.simulate_latency().await;
        let tables = self.tables.read().await;

        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| record_id(r) == Some(id)))
            .map(|r| project(r, &params.fields)))
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<MutationResponse> {
        self.simulate_latency().await;
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        let rows = staged.entry(table.to_string()).or_default();

        let mut next_id = rows.iter().filter_map(record_id).max().unwrap_or(0) + 1;
        let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));
        let mut results = Vec::with_capacity(records.len());

        for mut record in records {
            record.insert(ID_FIELD.to_string(), Value::from(next_id));
            record.insert(CREATED_ON_FIELD.to_string(), now.clone());
            record.insert(MODIFIED_ON_FIELD.to_string(), now.clone());
            next_id += 1;

            rows.push(record.clone());
            results.push(RecordResult::ok(Some(record)));
        }

        self.commit(&mut tables, staged).await?;
        Ok(MutationResponse::from_results(results))
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<MutationResponse> {
        self.simulate_latency().await;
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        let rows = staged.entry(table.to_string()).or_default();
        let now = Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let Some(id) = record_id(&record) else {
                results.push(RecordResult::failed("Record is missing an Id"));
                continue;
            };

            match rows.iter_mut().find(|r| record_id(r) == Some(id)) {
                Some(existing) => {
                    for (key, value) in record {
                        if key != ID_FIELD {
                            existing.insert(key, value);
                        }
                    }
                    existing.insert(MODIFIED_ON_FIELD.to_string(), now.clone());
                    results.push(RecordResult::ok(Some(existing.clone())));
                }
                None => results.push(RecordResult::failed(format!("Record {} not found", id))),
            }
        }

        self.commit(&mut tables, staged).await?;
        Ok(MutationResponse::from_results(results))
    }

    async fn delete_records(&self, table: &str, ids: &[u64]) -> Result<MutationResponse> {
        self.simulate_latency().await;
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        let rows = staged.entry(table.to_string()).or_default();

        let results = ids
            .iter()
            .map(|id| match rows.iter().position(|r| record_id(r) == Some(*id)) {
                Some(pos) => {
                    rows.remove(pos);
                    RecordResult::ok(None)
                }
                None => RecordResult::failed(format!("Record {} not found", id)),
            })
            .collect();

        self.commit(&mut tables, staged).await?;
        Ok(MutationResponse::from_results(results))
    }
}
