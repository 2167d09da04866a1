//! Application layer for mcp-orchestrator
//!
//! This crate contains the agents, the message bus, the debate subprotocol,
//! use cases and port definitions. It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod debate;
pub mod messaging;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{
    Agent, AgentContext, AgentRegistry, AgentServices, HumanReviewAgent, RegistryError,
    default_registry,
};
pub use config::{DebateParams, OrchestratorParams};
pub use debate::{
    DebateCoordinator, DebateError, DebateParticipant, DebateRequester, DebateRole,
    LlmDebateParticipant,
};
pub use messaging::{
    EventLog, EventRecord, HandlerError, MessageBus, Subscription, SubscriptionGuard,
    forward_to_logger,
};
pub use ports::{
    approval::{ApprovalError, ApprovalService},
    data_service::{DataService, DataServiceError},
    event_logger::{EventLogger, NoEventLogger, RunEvent},
    llm_gateway::{GatewayError, LlmCallConfig, LlmGateway, LlmReply},
    progress::{NoProgress, ProgressNotifier},
    result_repository::{RepositoryError, ResultRepository, RunRecord},
    solver_service::{SolverError, SolverService},
};
pub use retry::{AttemptError, Backoff, RetryError, Succeeded, retry, retry_with_timeout};
pub use use_cases::fetch_results::FetchResultsUseCase;
pub use use_cases::orchestrate::{OrchestrationRun, Orchestrator, RetryPredicate};
pub use use_cases::submit::{SubmitError, SubmitMcpUseCase, SubmitOutput, ValidationReport};
pub use use_cases::trigger_debate::TriggerDebateUseCase;
