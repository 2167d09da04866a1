//! File-backed result repository.
//!
//! Records live at `<dir>/<session_id>.json`. Writes go to a temporary file
//! first and are renamed into place, so a reader never sees a partial record.

use async_trait::async_trait;
use mcp_application::{RepositoryError, ResultRepository, RunRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "json";

pub struct JsonFileResultRepository {
    dir: PathBuf,
}

impl JsonFileResultRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Session ids become file names, so path separators and dots are refused.
    fn path_for(&self, session_id: &str) -> Result<PathBuf, RepositoryError> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::Storage(format!(
                "session id '{}' cannot be used as a file name",
                session_id
            )));
        }
        Ok(self.dir.join(format!("{}.{}", session_id, EXTENSION)))
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl ResultRepository for JsonFileResultRepository {
    async fn save(&self, record: RunRecord) -> Result<(), RepositoryError> {
        let path = self.path_for(&record.session_id)?;
        let json = serde_json::to_vec_pretty(&record)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(&self.dir, e))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| storage_error(&path, e))?;

        debug!("Saved run record to {}", path.display());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<RunRecord, RepositoryError> {
        let path = self.path_for(session_id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(session_id.to_string()));
            }
            Err(e) => return Err(storage_error(&path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<String>, RepositoryError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&self.dir, e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn delete(&self, session_id: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(session_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(RepositoryError::NotFound(session_id.to_string()))
            }
            Err(e) => Err(storage_error(&path, e)),
        }
    }
}
