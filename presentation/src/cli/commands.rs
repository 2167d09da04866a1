//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for mcp-orchestrator
#[derive(Parser, Debug)]
#[command(name = "mcp-orchestrator")]
#[command(author, version, about = "Run decision documents through a pipeline of agents")]
#[command(long_about = r#"
mcp-orchestrator carries an MCP decision document through its protocol: an
ordered list of steps, each handled by an agent (intent interpretation, data
collection and mapping, model building, solving, explanation, critique and
debate). Step results are stored by session id.

Configuration files are loaded from (in priority order):
1. MCP_* environment variables (MCP_DEBATE__ROUNDS=3)
2. --config <path>     Explicit config file
3. ./mcp.toml          Project-level config
4. ~/.config/mcp-orchestrator/config.toml   Global config

Example:
  mcp-orchestrator run plan.json
  mcp-orchestrator show plan-2024-q3
  mcp-orchestrator debate --topic "Is the plan robust?" --output "3 trucks"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate, run and store an MCP document
    Run {
        /// Path to the MCP JSON document
        path: PathBuf,
    },
    /// Show stored results for a session (all sessions when omitted)
    Show {
        session_id: Option<String>,
    },
    /// Run a standalone debate about an agent's output
    Debate {
        /// What the debate is about
        #[arg(long)]
        topic: String,
        /// The output under debate
        #[arg(long)]
        output: String,
        /// Correlation id (generated when omitted)
        #[arg(long)]
        session: Option<String>,
    },
    /// Check an MCP document without running it
    Validate {
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::parse_from(["mcp-orchestrator", "run", "plan.json", "-vv", "--json"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert!(
            matches!(cli.command, Some(Command::Run { ref path }) if path.ends_with("plan.json"))
        );
    }

    #[test]
    fn test_parse_debate() {
        let cli = Cli::parse_from([
            "mcp-orchestrator",
            "debate",
            "--topic",
            "Is it robust?",
            "--output",
            "3 trucks",
        ]);
        match cli.command {
            Some(Command::Debate {
                topic,
                output,
                session,
            }) => {
                assert_eq!(topic, "Is it robust?");
                assert_eq!(output, "3 trucks");
                assert!(session.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_show_config_without_command() {
        let cli = Cli::parse_from(["mcp-orchestrator", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }
}
