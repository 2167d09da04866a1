//! What an agent may touch while running a step.

use crate::messaging::MessageBus;
use crate::ports::approval::ApprovalService;
use crate::ports::data_service::DataService;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::solver_service::SolverService;
use mcp_domain::{OrchestrationResult, SolveResponse, StepOutput};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Collaborators injected at startup and shared by every agent.
#[derive(Clone)]
pub struct AgentServices {
    pub llm: Arc<dyn LlmGateway>,
    pub data: Option<Arc<dyn DataService>>,
    pub solver: Option<Arc<dyn SolverService>>,
    /// Answers `human_review` steps and approval gates.
    pub approval: Option<Arc<dyn ApprovalService>>,
    pub bus: MessageBus,
}

impl AgentServices {
    pub fn new(llm: Arc<dyn LlmGateway>, bus: MessageBus) -> Self {
        Self {
            llm,
            data: None,
            solver: None,
            approval: None,
            bus,
        }
    }

    pub fn with_data_service(mut self, data: Arc<dyn DataService>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_solver(mut self, solver: Arc<dyn SolverService>) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn with_approval(mut self, approval: Arc<dyn ApprovalService>) -> Self {
        self.approval = Some(approval);
        self
    }
}

/// Per-attempt view handed to [`Agent::run`](super::Agent::run).
pub struct AgentContext<'a> {
    pub services: &'a AgentServices,
    /// Results of the steps that already ran in this run, in order.
    pub previous: &'a [OrchestrationResult],
    /// Cancelled when the attempt times out or the run is cancelled.
    pub cancellation: CancellationToken,
}

impl<'a> AgentContext<'a> {
    pub fn new(
        services: &'a AgentServices,
        previous: &'a [OrchestrationResult],
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            services,
            previous,
            cancellation,
        }
    }

    fn latest_output<T>(&self, pick: impl Fn(&'a StepOutput) -> Option<T>) -> Option<T> {
        self.previous
            .iter()
            .rev()
            .filter(|r| r.result.success)
            .find_map(|r| r.result.output.as_ref().and_then(&pick))
    }

    /// Most recent successful solver response.
    pub fn latest_solution(&self) -> Option<&'a SolveResponse> {
        self.latest_output(|output| match output {
            StepOutput::Solution(solution) => Some(solution),
            _ => None,
        })
    }

    pub fn latest_explanation(&self) -> Option<&'a str> {
        self.latest_output(|output| match output {
            StepOutput::Explanation { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Source name and records of the most recent data collection.
    pub fn collected_data(&self) -> Option<(&'a str, &'a [Value])> {
        self.latest_output(|output| match output {
            StepOutput::CollectedData { source, records } => {
                Some((source.as_str(), records.as_slice()))
            }
            _ => None,
        })
    }

    /// Field names seen across the collected records, in first-seen order.
    pub fn collected_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        let Some((_, records)) = self.collected_data() else {
            return fields;
        };
        for record in records {
            if let Some(object) = record.as_object() {
                for key in object.keys() {
                    if !fields.contains(key) {
                        fields.push(key.clone());
                    }
                }
            }
        }
        fields
    }
}
