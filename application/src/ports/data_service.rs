//! Data service port
//!
//! Access to the business data sources a protocol collects from.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataServiceError {
    #[error("Connection to '{source_name}' failed: {message}")]
    Connection { source_name: String, message: String },

    #[error("Unknown data source: {0}")]
    UnknownSource(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Sync failed: {0}")]
    Sync(String),
}

/// Outcome of a sync request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub records_synced: usize,
}

#[async_trait]
pub trait DataService: Send + Sync {
    async fn connect(&self, source: &str) -> Result<(), DataServiceError>;

    /// Fetch records from `source`. `query` is source-specific (filters, table name).
    async fn fetch_data(
        &self,
        source: &str,
        query: Option<&Value>,
    ) -> Result<Vec<Value>, DataServiceError>;

    async fn sync_data(&self, source: &str) -> Result<SyncReport, DataServiceError>;

    /// `Ok(false)` means reachable but not connected yet.
    async fn validate_connection(&self, source: &str) -> Result<bool, DataServiceError>;
}
