//! In-process data service.
//!
//! Sources are named record sets, either registered directly or loaded from
//! a directory where every `<name>.json` file holds a JSON array.

use async_trait::async_trait;
use mcp_application::DataService;
use mcp_application::ports::data_service::{DataServiceError, SyncReport};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryDataService {
    sources: BTreeMap<String, Vec<Value>>,
    connected: Mutex<HashSet<String>>,
}

impl InMemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: impl Into<String>, records: Vec<Value>) -> Self {
        self.sources.insert(name.into(), records);
        self
    }

    /// Load every `*.json` file in `dir` as a source named after its stem.
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let mut service = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)?;
            let records = match serde_json::from_str(&text)? {
                Value::Array(records) => records,
                other => vec![other],
            };
            debug!("Loaded {} record(s) for source '{}'", records.len(), name);
            service.sources.insert(name.to_string(), records);
        }
        Ok(service)
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    fn records(&self, source: &str) -> Result<&Vec<Value>, DataServiceError> {
        self.sources
            .get(source)
            .ok_or_else(|| DataServiceError::UnknownSource(source.to_string()))
    }
}

/// Keep records whose fields equal every entry of an object query.
fn matches(record: &Value, query: Option<&Value>) -> bool {
    let Some(Value::Object(filter)) = query else {
        return true;
    };
    filter
        .iter()
        .all(|(key, expected)| record.get(key) == Some(expected))
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn connect(&self, source: &str) -> Result<(), DataServiceError> {
        self.records(source)?;
        if let Ok(mut connected) = self.connected.lock() {
            connected.insert(source.to_string());
        }
        Ok(())
    }

    async fn fetch_data(
        &self,
        source: &str,
        query: Option<&Value>,
    ) -> Result<Vec<Value>, DataServiceError> {
        Ok(self
            .records(source)?
            .iter()
            .filter(|record| matches(record, query))
            .cloned()
            .collect())
    }

    async fn sync_data(&self, source: &str) -> Result<SyncReport, DataServiceError> {
        Ok(SyncReport {
            records_synced: self.records(source)?.len(),
        })
    }

    async fn validate_connection(&self, source: &str) -> Result<bool, DataServiceError> {
        self.records(source)?;
        Ok(self
            .connected
            .lock()
            .map(|connected| connected.contains(source))
            .unwrap_or(false))
    }
}
