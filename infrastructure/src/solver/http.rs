//! HTTP client for the external solver service.
//!
//! `POST {base_url}/solve` with a [`SolveRequest`] body; the reply is a
//! [`SolveResponse`]. Non-2xx replies that still carry a response body with a
//! status are passed through so the agent sees INFEASIBLE/ERROR details.

use async_trait::async_trait;
use mcp_application::{SolverError, SolverService};
use mcp_domain::{SolveRequest, SolveResponse};
use std::time::Duration;
use tracing::debug;

pub struct HttpSolverClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSolverClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SolverError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SolverError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SolverService for HttpSolverClient {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolverError> {
        let url = format!("{}/solve", self.base_url);
        debug!("Solving with '{}' at {}", request.solver, url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SolverError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SolverError::RequestFailed(e.to_string()))?;

        match serde_json::from_str::<SolveResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(SolverError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            ))),
            Err(e) => Err(SolverError::InvalidResponse(e.to_string())),
        }
    }
}
