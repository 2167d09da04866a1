//! Mock ports shared by the agent, orchestrator and debate tests.

use super::AgentServices;
use crate::messaging::MessageBus;
use crate::ports::approval::{ApprovalError, ApprovalService};
use crate::ports::data_service::{DataService, DataServiceError, SyncReport};
use crate::ports::llm_gateway::{GatewayError, LlmCallConfig, LlmGateway, LlmReply};
use crate::ports::solver_service::{SolverError, SolverService};
use async_trait::async_trait;
use mcp_domain::{ReviewDecision, ReviewRequest, SolveRequest, SolveResponse};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned replies in order; errors once exhausted.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err("model offline".to_string())])),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmGateway for ScriptedLlm {
    async fn call(
        &self,
        prompt: &str,
        _config: Option<&LlmCallConfig>,
    ) -> Result<LlmReply, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(LlmReply::new(content)),
            Some(Err(e)) => Err(GatewayError::ConnectionError(e)),
            None => Err(GatewayError::Other("no scripted reply left".to_string())),
        }
    }
}

pub struct MockData {
    pub connected: Mutex<bool>,
    pub records: Vec<Value>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl MockData {
    pub fn new(records: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            connected: Mutex::new(false),
            records,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DataService for MockData {
    async fn connect(&self, _source: &str) -> Result<(), DataServiceError> {
        self.calls.lock().unwrap().push("connect");
        *self.connected.lock().unwrap() = true;
        Ok(())
    }

    async fn fetch_data(
        &self,
        source: &str,
        _query: Option<&Value>,
    ) -> Result<Vec<Value>, DataServiceError> {
        self.calls.lock().unwrap().push("fetch_data");
        if !*self.connected.lock().unwrap() {
            return Err(DataServiceError::Connection {
                source_name: source.to_string(),
                message: "not connected".to_string(),
            });
        }
        Ok(self.records.clone())
    }

    async fn sync_data(&self, _source: &str) -> Result<SyncReport, DataServiceError> {
        Ok(SyncReport {
            records_synced: self.records.len(),
        })
    }

    async fn validate_connection(&self, _source: &str) -> Result<bool, DataServiceError> {
        self.calls.lock().unwrap().push("validate_connection");
        Ok(*self.connected.lock().unwrap())
    }
}

pub struct MockSolver {
    pub response: SolveResponse,
    pub requests: Mutex<Vec<SolveRequest>>,
}

impl MockSolver {
    pub fn new(response: SolveResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl SolverService for MockSolver {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolverError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

/// Gives the same decision to every request and records what it was asked.
pub struct MockApproval {
    pub decision: ReviewDecision,
    pub requests: Mutex<Vec<ReviewRequest>>,
}

impl MockApproval {
    pub fn answering(decision: ReviewDecision) -> Arc<Self> {
        Arc::new(Self {
            decision,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ApprovalService for MockApproval {
    async fn review(&self, request: &ReviewRequest) -> Result<ReviewDecision, ApprovalError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.decision.clone())
    }
}

pub fn services(llm: Arc<ScriptedLlm>) -> AgentServices {
    AgentServices::new(llm, MessageBus::new())
}
