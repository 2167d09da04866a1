//! CLI entrypoint for mcp-orchestrator
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use mcp_application::{
    AgentServices, ApprovalService, DataService, DebateCoordinator, DebateParticipant,
    DebateRequester, EventLogger, FetchResultsUseCase, LlmDebateParticipant, LlmGateway,
    MessageBus, Orchestrator, ResultRepository, SolverService, SubmitMcpUseCase,
    SubscriptionGuard, TriggerDebateUseCase, default_registry, forward_to_logger,
};
use mcp_domain::{Mcp, event_types};
use mcp_infrastructure::{
    ApprovalPolicy, ConfigLoader, FileConfig, InMemoryDataService, JsonFileResultRepository,
    JsonlEventLogger, LlmProvider, PolicyApprover, ScriptedLlmGateway, UnconfiguredSolver,
};
use mcp_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow::anyhow!("{}", e))?
    };

    let _log_guard = init_logging(cli.verbose, &config);
    info!("Starting mcp-orchestrator");

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration: {}", errors.join("; "));
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run with --help for usage.");
    };

    let mut app = App::wire(&config)?;

    match command {
        Command::Run { path } => {
            let mcp = read_mcp(&path)?;
            let orchestrator = app.orchestrator(&config, mcp.session_id())?;
            let use_case = SubmitMcpUseCase::new(Arc::new(orchestrator), app.repository.clone());

            let output = if cli.quiet || cli.json {
                use_case.submit(mcp).await?
            } else {
                let progress = ProgressReporter::new();
                use_case.submit_with_progress(mcp, &progress).await?
            };

            if cli.json {
                println!("{}", ConsoleFormatter::format_json(&output));
            } else {
                println!("{}", ConsoleFormatter::format_run(&output));
            }
        }
        Command::Show { session_id } => {
            let use_case = FetchResultsUseCase::new(app.repository.clone());
            match session_id {
                Some(id) => {
                    let record = use_case.fetch(&id).await?;
                    if cli.json {
                        println!("{}", ConsoleFormatter::format_json(&record));
                    } else {
                        println!("{}", ConsoleFormatter::format_record(&record));
                    }
                }
                None => {
                    for id in use_case.sessions().await? {
                        println!("{}", id);
                    }
                }
            }
        }
        Command::Debate {
            topic,
            output,
            session,
        } => {
            let use_case = TriggerDebateUseCase::new(app.requester.clone());
            let debate = use_case.trigger(session.as_deref(), &topic, &output).await?;
            if cli.json {
                println!("{}", ConsoleFormatter::format_json(&debate));
            } else {
                println!("{}", ConsoleFormatter::format_debate(&debate));
            }
        }
        Command::Validate { path } => {
            let mcp = read_mcp(&path)?;
            let orchestrator = app.orchestrator(&config, mcp.session_id())?;
            let use_case = SubmitMcpUseCase::new(Arc::new(orchestrator), app.repository.clone());
            let report = use_case.validate(&mcp);
            print!("{}", ConsoleFormatter::format_validation(&report));
            if !report.is_runnable() {
                bail!("{} is not runnable", path.display());
            }
        }
    }

    app.coordinator.unsubscribe();
    Ok(())
}

/// Console logging by verbosity, plus a daily file when `logging.dir` is set.
fn init_logging(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let (file_layer, guard) = match &config.logging.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "mcp-orchestrator.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn read_mcp(path: &Path) -> Result<Mcp> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    Mcp::from_json(&text).with_context(|| format!("{} is not a valid MCP document", path.display()))
}

/// Long-lived adapters shared by every command.
struct App {
    bus: MessageBus,
    llm: Arc<dyn LlmGateway>,
    data: Arc<dyn DataService>,
    solver: Arc<dyn SolverService>,
    approval: Arc<dyn ApprovalService>,
    repository: Arc<dyn ResultRepository>,
    requester: DebateRequester,
    coordinator: mcp_application::Subscription,
    /// Event-log forwarders, removed when the app is dropped.
    forwarders: SubscriptionGuard,
    cancellation: CancellationToken,
}

impl App {
    fn wire(config: &FileConfig) -> Result<Self> {
        let bus = MessageBus::new();
        let llm = build_llm(config)?;
        let data = build_data(config)?;
        let solver = build_solver(config)?;
        let approval = build_approval(config);

        let results_dir = config
            .storage
            .results_dir
            .clone()
            .unwrap_or_else(|| ConfigLoader::default_data_dir().join("results"));
        let repository: Arc<dyn ResultRepository> =
            Arc::new(JsonFileResultRepository::new(results_dir));

        let debate_params = config.debate.to_params();
        let participants: Vec<Arc<dyn DebateParticipant>> = vec![
            Arc::new(LlmDebateParticipant::challenger(llm.clone())),
            Arc::new(LlmDebateParticipant::defender(llm.clone())),
        ];
        let mut coordinator =
            DebateCoordinator::from_params(bus.clone(), participants, &debate_params)?;
        if config.debate.judge {
            coordinator = coordinator.with_judge(llm.clone());
        }
        let coordinator = Arc::new(coordinator).start();
        let requester = DebateRequester::new(bus.clone(), debate_params.timeout);

        let cancellation = CancellationToken::new();
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling run");
                token.cancel();
            }
        });

        Ok(Self {
            bus,
            llm,
            data,
            solver,
            approval,
            repository,
            requester,
            coordinator,
            forwarders: SubscriptionGuard::default(),
            cancellation,
        })
    }

    fn orchestrator(&mut self, config: &FileConfig, session_id: &str) -> Result<Orchestrator> {
        let registry = default_registry(
            config.llm.call_config(),
            &config.solver.solver,
            self.requester.clone(),
        )?;
        let services = AgentServices::new(self.llm.clone(), self.bus.clone())
            .with_data_service(self.data.clone())
            .with_solver(self.solver.clone())
            .with_approval(self.approval.clone());

        let mut orchestrator = Orchestrator::new(Arc::new(registry), services)
            .with_params(config.orchestrator.to_params())
            .with_cancellation(self.cancellation.child_token());

        if config.logging.event_log {
            let dir = config
                .logging
                .dir
                .clone()
                .unwrap_or_else(|| ConfigLoader::default_data_dir().join("logs"));
            let path = dir.join(format!("{}.events.jsonl", session_id));
            if let Some(logger) = JsonlEventLogger::try_open(&path) {
                info!("Writing run events to {}", logger.path().display());
                let logger: Arc<dyn EventLogger> = Arc::new(logger);
                // Step and run events are written by the orchestrator itself.
                self.forwarders.push(forward_to_logger(
                    &self.bus,
                    logger.clone(),
                    &[
                        event_types::STEP_STARTED,
                        event_types::STEP_COMPLETED,
                        event_types::RUN_COMPLETED,
                    ],
                ));
                orchestrator = orchestrator.with_event_logger(logger);
            }
        }

        Ok(orchestrator)
    }
}

fn build_llm(config: &FileConfig) -> Result<Arc<dyn LlmGateway>> {
    match config.llm.provider {
        LlmProvider::Offline => {
            let gateway = match &config.llm.script {
                Some(path) => ScriptedLlmGateway::from_file(path)
                    .with_context(|| format!("Could not load LLM script {}", path.display()))?,
                None => ScriptedLlmGateway::new(Vec::<String>::new()),
            };
            Ok(Arc::new(gateway))
        }
        #[cfg(feature = "http")]
        LlmProvider::OpenAi => {
            let base_url = config
                .llm
                .base_url
                .clone()
                .context("llm.base_url is required for the openai provider")?;
            let timeout = std::time::Duration::from_secs(120);
            let mut gateway = mcp_infrastructure::OpenAiGateway::new(base_url, timeout)?
                .with_api_key(config.llm.api_key());
            if let Some(model) = &config.llm.model {
                gateway = gateway.with_default_model(model.clone());
            }
            Ok(Arc::new(gateway))
        }
        #[cfg(not(feature = "http"))]
        LlmProvider::OpenAi => bail!("the openai provider needs the `http` feature"),
    }
}

fn build_data(config: &FileConfig) -> Result<Arc<dyn DataService>> {
    let service = match &config.storage.data_dir {
        Some(dir) => InMemoryDataService::from_dir(dir)
            .with_context(|| format!("Could not load data sources from {}", dir.display()))?,
        None => InMemoryDataService::new(),
    };
    Ok(Arc::new(service))
}

fn build_solver(config: &FileConfig) -> Result<Arc<dyn SolverService>> {
    let Some(url) = &config.solver.url else {
        return Ok(Arc::new(UnconfiguredSolver));
    };
    #[cfg(feature = "http")]
    {
        let timeout = std::time::Duration::from_secs(config.solver.timeout_secs);
        Ok(Arc::new(mcp_infrastructure::HttpSolverClient::new(
            url.clone(),
            timeout,
        )?))
    }
    #[cfg(not(feature = "http"))]
    {
        warn!("Ignoring solver.url {}: built without the `http` feature", url);
        Ok(Arc::new(UnconfiguredSolver))
    }
}

fn build_approval(config: &FileConfig) -> Arc<dyn ApprovalService> {
    let approver = match config.approval.policy {
        ApprovalPolicy::Approve => PolicyApprover::approve_all(),
        ApprovalPolicy::Reject => PolicyApprover::reject_all(),
    };
    Arc::new(approver.with_feedback(config.approval.feedback.clone()))
}
