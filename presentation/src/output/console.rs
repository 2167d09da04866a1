//! Console output for runs, stored records, debates and validation reports

use colored::Colorize;
use mcp_application::{RunRecord, SubmitOutput, ValidationReport};
use mcp_domain::{
    DebateSession, McpStatus, OrchestrationResult, StepOutput, ValidationIssue,
    core::string::truncate,
};
use serde::Serialize;

const PREVIEW_CHARS: usize = 400;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a finished run
    pub fn format_run(output: &SubmitOutput) -> String {
        Self::format_results(
            &output.session_id,
            output.status,
            &output.results,
            output.aborted_at.as_deref(),
        )
    }

    /// Format a stored run record
    pub fn format_record(record: &RunRecord) -> String {
        let mut out = Self::format_results(
            &record.session_id,
            record.status,
            &record.results,
            record.aborted_at.as_deref(),
        );
        out.push_str(&format!(
            "{} {}\n",
            "Finished:".dimmed(),
            record.finished_at.to_rfc3339()
        ));
        out
    }

    fn format_results(
        session_id: &str,
        status: McpStatus,
        results: &[OrchestrationResult],
        aborted_at: Option<&str>,
    ) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("MCP Run"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), session_id));
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status(status)
        ));
        if let Some(step) = aborted_at {
            output.push_str(&format!(
                "{} {}\n",
                "Aborted at:".red().bold(),
                step
            ));
        }

        output.push_str(&Self::section_header("Steps"));
        for result in results {
            output.push_str(&Self::format_step(result));
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_step(result: &OrchestrationResult) -> String {
        let marker = if result.succeeded() {
            "v".green()
        } else {
            "x".red()
        };
        let agent = result.agent.as_deref().unwrap_or("-");
        let mut out = format!(
            "\n{} {} {}\n",
            marker,
            format!("{} ({})", result.step, result.action).bold(),
            format!("[{}, {} attempt(s)]", agent, result.attempts).dimmed()
        );

        if let Some(error) = &result.error {
            out.push_str(&format!("  {} {}\n", "Error:".red(), error));
        }
        if let Some(thought) = &result.thought_process {
            out.push_str(&format!("  {} {}\n", "Thought:".dimmed(), thought));
        }
        if let Some(output) = &result.result.output {
            out.push_str(&Self::indent(&Self::describe_output(output), "  "));
            out.push('\n');
        }
        out
    }

    fn describe_output(output: &StepOutput) -> String {
        match output {
            StepOutput::Intent {
                problem_type,
                summary,
                ..
            } => format!("{}: {}", problem_type, summary),
            StepOutput::CollectedData { source, records } => {
                format!("{} record(s) from {}", records.len(), source)
            }
            StepOutput::DataMapping { mappings, unmapped } => {
                let mut text = mappings
                    .iter()
                    .map(|(variable, field)| format!("{} <- {}", variable, field))
                    .collect::<Vec<_>>()
                    .join("\n");
                if !unmapped.is_empty() {
                    text.push_str(&format!("\nunmapped: {}", unmapped.join(", ")));
                }
                text
            }
            StepOutput::ModelBuilt {
                variables,
                constraints,
                has_objective,
            } => format!(
                "{} variable(s), {} constraint(s){}",
                variables,
                constraints,
                if *has_objective { ", objective set" } else { "" }
            ),
            StepOutput::Solution(solution) => {
                let mut text = solution.status.to_string();
                if let Some(value) = solution.objective_value {
                    text.push_str(&format!(" objective={}", value));
                }
                for (name, value) in &solution.variables {
                    text.push_str(&format!("\n{} = {}", name, value));
                }
                text
            }
            StepOutput::Explanation { text } => truncate(text, PREVIEW_CHARS),
            StepOutput::Critique { critique, score } => match score {
                Some(score) => format!("score {}: {}", score, truncate(critique, PREVIEW_CHARS)),
                None => truncate(critique, PREVIEW_CHARS),
            },
            StepOutput::Debate(session) => Self::debate_summary(session),
            StepOutput::Review {
                review_id,
                approved,
                feedback,
                summary,
            } => {
                let verdict = if *approved { "approved" } else { "rejected" };
                let mut text = format!("{} {}", review_id, verdict);
                if let Some(feedback) = feedback {
                    text.push_str(&format!(": {}", feedback));
                }
                if let Some(summary) = summary {
                    text.push_str(&format!("\n{}", truncate(summary, PREVIEW_CHARS)));
                }
                text
            }
            StepOutput::Skipped { reason } => format!("skipped: {}", reason),
            StepOutput::Custom { data } => truncate(&data.to_string(), PREVIEW_CHARS),
        }
    }

    /// Format a debate session with its full transcript
    pub fn format_debate(session: &DebateSession) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Debate"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), session.topic));
        output.push_str(&format!("{} {}\n", "Id:".dimmed(), session.debate_id));

        output.push_str(&Self::section_header("Rounds"));
        for round in session.rounds() {
            let title = match round.score {
                Some(score) => format!(
                    "── Round {}: {} (score {}) ──",
                    round.round, round.agent, score
                ),
                None => format!("── Round {}: {} ──", round.round, round.agent),
            };
            output.push_str(&format!("\n{}\n{}\n", title.yellow().bold(), round.argument));
        }

        output.push_str(&Self::section_header("Verdict"));
        output.push_str(&format!("\n{}\n", Self::debate_summary(session)));
        output.push_str(&Self::footer());
        output
    }

    fn debate_summary(session: &DebateSession) -> String {
        let winner = session.winner.as_deref().unwrap_or("undecided");
        match &session.summary {
            Some(summary) => format!("winner: {}\n{}", winner, summary),
            None => format!("winner: {}", winner),
        }
    }

    /// Format a validation report
    pub fn format_validation(report: &ValidationReport) -> String {
        let mut output = String::new();
        for issue in &report.issues {
            output.push_str(&Self::issue_line(issue));
        }
        for action in &report.unknown_actions {
            output.push_str(&format!(
                "{} no agent registered for action '{}'\n",
                "error:".red().bold(),
                action
            ));
        }
        if report.is_runnable() {
            output.push_str(&format!("{}\n", "Document is valid".green().bold()));
        }
        output
    }

    fn issue_line(issue: &ValidationIssue) -> String {
        if issue.is_error() {
            format!("{} {}\n", "error:".red().bold(), issue.message)
        } else {
            format!("{} {}\n", "warning:".yellow().bold(), issue.message)
        }
    }

    /// Format anything serializable as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn status(status: McpStatus) -> colored::ColoredString {
        match status {
            McpStatus::Completed => status.as_str().green().bold(),
            McpStatus::Failed | McpStatus::Cancelled => status.as_str().red().bold(),
            _ => status.as_str().yellow().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
