//! HTTP client for the hosted record store
//!
//! Endpoints (all JSON):
//! - `POST   {base}/tables/{table}/records/query`       fetch many
//! - `POST   {base}/tables/{table}/records/{id}/query`  fetch one
//! - `POST   {base}/tables/{table}/records`             create
//! - `PATCH  {base}/tables/{table}/records`             update
//! - `DELETE {base}/tables/{table}/records`             delete

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::{PlannerError, Result};
use crate::store::records::{FetchParams, FetchResponse, MutationResponse, Record};
use crate::store::RecordStore;

/// Connection settings for the hosted store
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    pub timeout: Duration,
}

/// HTTP client for the hosted record store
pub struct RemoteStore {
    client: Client,
    config: RemoteConfig,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn records_url(&self, table: &str) -> String {
        format!(
            "{}/tables/{}/records",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Project-Id", &self.config.project_id)
            .bearer_auth(&self.config.public_key)
    }

    /// Send and decode, surfacing the body's `message` on non-2xx replies
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(PlannerError::Store(error_message(status, response).await));
        }

        Ok(response.json::<T>().await?)
    }

    /// Check that the store answers at all
    pub async fn is_available(&self) -> bool {
        self.client
            .get(&self.config.base_url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .is_ok()
    }
}

async fn error_message(status: StatusCode, response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));

    match message {
        Some(message) => message,
        None => format!("Record store returned {}", status),
    }
}

#[async_trait]
impl RecordStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<Vec<Record>> {
        let url = format!("{}/query", self.records_url(table));
        debug!(%url, "fetching records");

        let response: FetchResponse<Vec<Record>> =
            self.send(self.client.post(&url).json(params)).await?;

        if !response.success {
            let message = response.message.unwrap_or_else(|| "Fetch failed".to_string());
            warn!(table, %message, "fetch rejected");
            return Err(PlannerError::Store(message));
        }

        Ok(response.data.unwrap_or_default())
    }

    async fn get_record(
        &self,
        table: &str,
        id: u64,
        params: &FetchParams,
    ) -> Result<Option<Record>> {
        let url = format!("{}/{}/query", self.records_url(table), id);
        debug!(%url, "fetching record");

        let request = self
            .authorize(self.client.post(&url).json(&json!({ "fields": params.fields })));
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(PlannerError::Store(error_message(status, response).await));
        }

        let body: FetchResponse<Record> = response.json().await?;
        Ok(body.data)
    }

    async fn create_records(&self, table: &str, records: Vec<Record>) -> Result<MutationResponse> {
        debug!(table, count = records.len(), "creating records");
        self.send(
            self.client
                .post(self.records_url(table))
                .json(&json!({ "records": records })),
        )
        .await
    }

    async fn update_records(&self, table: &str, records: Vec<Record>) -> Result<MutationResponse> {
        debug!(table, count = records.len(), "updating records");
        self.send(
            self.client
                .patch(self.records_url(table))
                .json(&json!({ "records": records })),
        )
        .await
    }

    async fn delete_records(&self, table: &str, ids: &[u64]) -> Result<MutationResponse> {
        debug!(table, ?ids, "deleting records");
        self.send(
            self.client
                .delete(self.records_url(table))
                .json(&json!({ "RecordIds": ids })),
        )
        .await
    }
}
