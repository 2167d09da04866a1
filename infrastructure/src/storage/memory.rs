use async_trait::async_trait;
use mcp_application::{RepositoryError, ResultRepository, RunRecord};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryResultRepository {
    records: RwLock<BTreeMap<String, RunRecord>>,
}

impl InMemoryResultRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultRepository {
    async fn save(&self, record: RunRecord) -> Result<(), RepositoryError> {
        self.records
            .write()
            .await
            .insert(record.session_id.clone(), record);
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<RunRecord, RepositoryError> {
        self.records
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(session_id.to_string()))
    }

    async fn list(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.records.read().await.keys().cloned().collect())
    }

    async fn delete(&self, session_id: &str) -> Result<(), RepositoryError> {
        self.records
            .write()
            .await
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(session_id.to_string()))
    }
}
