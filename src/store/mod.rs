//! Record store module
//!
//! Generic CRUD access to named tables of JSON records:
//! - `RemoteStore` talks to the hosted record store over HTTP
//! - `MockStore` keeps tables in memory for offline/demo mode

pub mod mock;
pub mod records;
pub mod remote;

use async_trait::async_trait;

use crate::errors::Result;

// Re-export key types for convenience
pub use mock::MockStore;
pub use records::{
    record_id, FetchParams, FetchResponse, FieldIssue, MutationResponse, OrderBy, Record,
    RecordResult, SortDirection,
};
pub use remote::RemoteStore;

/// CRUD operations over tables of records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name for logs and diagnostics
    fn name(&self) -> &str;

    /// All records of a table, projected and ordered per `params`
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> Result<Vec<Record>>;

    /// One record by id, `None` when it does not exist
    async fn get_record(
        &self,
        table: &str,
        id: u64,
        params: &FetchParams,
    ) -> Result<Option<Record>>;

    /// Insert records; the store assigns ids
    async fn create_records(&self, table: &str, records: Vec<Record>) -> Result<MutationResponse>;

    /// Update records identified by their `Id` field
    async fn update_records(&self, table: &str, records: Vec<Record>) -> Result<MutationResponse>;

    async fn delete_records(&self, table: &str, ids: &[u64]) -> Result<MutationResponse>;
}
