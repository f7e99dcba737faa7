//! Record-store wire types
//!
//! These mirror the JSON exchanged with the hosted record store. The mock
//! store produces the same shapes so services cannot tell them apart.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{PlannerError, Result};

/// A single row: field name -> JSON value
pub type Record = Map<String, Value>;

/// Primary key field present on every record
pub const ID_FIELD: &str = "Id";
pub const CREATED_ON_FIELD: &str = "CreatedOn";
pub const MODIFIED_ON_FIELD: &str = "ModifiedOn";

/// Read the numeric id of a record (numbers or numeric strings)
pub fn record_id(record: &Record) -> Option<u64> {
    match record.get(ID_FIELD)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field: String,
    #[serde(rename = "sorttype")]
    pub direction: SortDirection,
}

/// Field projection and ordering for reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl FetchParams {
    pub fn fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            order_by: Vec::new(),
        }
    }

    pub fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }
}

/// Response to fetch-many and get-one calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Per-field problem reported for a rejected record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    #[serde(rename = "fieldLabel", default)]
    pub field_label: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome for one record of a create/update/delete call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Record>,
    #[serde(default)]
    pub errors: Vec<FieldIssue>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RecordResult {
    pub fn ok(data: Option<Record>) -> Self {
        Self {
            success: true,
            data,
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Response to create/update/delete calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<RecordResult>,
}

impl MutationResponse {
    pub fn from_results(results: Vec<RecordResult>) -> Self {
        Self {
            success: true,
            message: None,
            results,
        }
    }

    /// Collected failure messages of rejected records
    fn failure_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        for result in self.results.iter().filter(|r| !r.success) {
            for issue in &result.errors {
                messages.push(format!("{}: {}", issue.field_label, issue.message));
            }
            if let Some(message) = &result.message {
                messages.push(message.clone());
            }
        }
        messages
    }

    /// Fail on a rejected call or on any rejected record
    pub fn check(&self) -> Result<()> {
        if !self.success {
            return Err(PlannerError::Store(
                self.message.clone().unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }

        let failed = self.results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            tracing::warn!(failed, "record store rejected records");
            let messages = self.failure_messages();
            if !messages.is_empty() {
                return Err(PlannerError::Store(messages.join(", ")));
            }
        }

        Ok(())
    }

    /// Data of the first accepted record of a create/update call
    pub fn into_first_record(self, action: &str) -> Result<Record> {
        self.check()?;

        self.results
            .into_iter()
            .find(|r| r.success)
            .and_then(|r| r.data)
            .ok_or_else(|| PlannerError::Store(format!("Failed to {}", action)))
    }

    /// Outcome of a delete call: first result's success, or true when the
    /// store reported no per-record results
    pub fn deleted(&self) -> Result<bool> {
        self.check()?;
        Ok(self.results.first().map(|r| r.success).unwrap_or(true))
    }
}
