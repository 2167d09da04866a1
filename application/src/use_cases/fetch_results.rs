//! Fetch stored run results.

use crate::ports::result_repository::{RepositoryError, ResultRepository, RunRecord};
use std::sync::Arc;

pub struct FetchResultsUseCase<R: ResultRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ResultRepository + ?Sized> FetchResultsUseCase<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stored record for `session_id`; [`RepositoryError::NotFound`] if none.
    pub async fn fetch(&self, session_id: &str) -> Result<RunRecord, RepositoryError> {
        self.repository.load(session_id).await
    }

    /// Stored session ids.
    pub async fn sessions(&self) -> Result<Vec<String>, RepositoryError> {
        self.repository.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::submit::tests::MemoryRepo;

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let use_case = FetchResultsUseCase::new(Arc::new(MemoryRepo::default()));
        let err = use_case.fetch("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
