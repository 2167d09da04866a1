//! Prompt templates for each step action.
//!
//! Agents that expect structured replies ask for a single JSON object; their
//! parsers also accept the object inside a fenced block or surrounded by prose.

use crate::mcp::entities::{OptimizationModel, Variable};

/// Templates for generating prompts at each step
pub struct PromptTemplate;

impl PromptTemplate {
    // ==================== Intent ====================

    pub fn intent_system() -> &'static str {
        r#"You are an operations research analyst.
Classify the business request into an optimization problem type and an industry.
Reply with a single JSON object and nothing else."#
    }

    pub fn intent_prompt(request: &str) -> String {
        format!(
            r#"Request:
{}

Reply as JSON: {{"problemType": "...", "industry": "...", "summary": "one sentence"}}"#,
            request
        )
    }

    // ==================== Data ====================

    pub fn mapping_prompt(variables: &[Variable], fields: &[String]) -> String {
        let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
        format!(
            r#"Map each model variable to the data field that supplies it.

Variables: {}
Fields: {}

Reply as a JSON object from variable name to field name. Omit variables with no matching field."#,
            names.join(", "),
            fields.join(", ")
        )
    }

    // ==================== Model ====================

    pub fn model_system() -> &'static str {
        r#"You formulate mathematical optimization models.
Reply with one JSON object with keys "variables", "constraints" and "objective".
Variable types: CONTINUOUS, INTEGER, BINARY. Constraint types: EQUALS, LESS_THAN, GREATER_THAN, LESS_THAN_OR_EQUAL, GREATER_THAN_OR_EQUAL. Objective types: MINIMIZE, MAXIMIZE."#
    }

    pub fn model_prompt(
        problem_type: &str,
        industry: &str,
        current: &OptimizationModel,
        data_fields: &[String],
    ) -> String {
        let mut prompt = format!(
            "Problem type: {}\nIndustry: {}\n",
            or_unknown(problem_type),
            or_unknown(industry)
        );
        if !current.variables.is_empty() {
            let names: Vec<&str> = current.variables.iter().map(|v| v.name.as_str()).collect();
            prompt.push_str(&format!("Existing variables: {}\n", names.join(", ")));
        }
        if !data_fields.is_empty() {
            prompt.push_str(&format!("Available data fields: {}\n", data_fields.join(", ")));
        }
        prompt.push_str("\nFormulate the model.");
        prompt
    }

    // ==================== Explanation ====================

    pub fn explanation_prompt(solution: &str, format: &str) -> String {
        format!(
            r#"Explain this optimization result to a business stakeholder.
Format: {}

Result:
{}"#,
            format, solution
        )
    }

    // ==================== Critique ====================

    pub fn critique_system() -> &'static str {
        r#"You are a critical reviewer of optimization results.
Point out weak assumptions, missing constraints and practical risks.
End with a line "Score: N/10"."#
    }

    pub fn critique_prompt(solution: &str, explanation: Option<&str>) -> String {
        let mut prompt = format!("Result:\n{}\n", solution);
        if let Some(explanation) = explanation {
            prompt.push_str(&format!("\nExplanation given:\n{}\n", explanation));
        }
        prompt
    }

    // ==================== Review ====================

    pub fn review_prompt(data: &str) -> String {
        format!(
            r#"Summarize the following for a human reviewer who must approve or reject it.
Mention anything that looks risky or incomplete.

{}

Reply as JSON: {{"summary": "...", "concerns": ["..."]}}"#,
            data
        )
    }

    // ==================== Debate ====================

    pub fn debate_system(stance: &str) -> String {
        format!(
            r#"You take part in a structured debate about an agent's output.
Your stance: {}.
Answer the previous speakers directly. Keep it under 200 words.
End with a line "Score: N/10" rating the output."#,
            stance
        )
    }

    pub fn debate_prompt(topic: &str, agent_output: &str, transcript: &str, round: u32) -> String {
        let mut prompt = format!(
            "Topic: {}\n\nOutput under debate:\n{}\n",
            topic, agent_output
        );
        if !transcript.is_empty() {
            prompt.push_str(&format!("\nDebate so far:\n{}\n", transcript));
        }
        prompt.push_str(&format!("\nRound {}: your argument.", round));
        prompt
    }

    pub fn judge_prompt(topic: &str, transcript: &str) -> String {
        format!(
            r#"Topic: {}

Transcript:
{}

Summarize the debate in two sentences and name the participant with the stronger case."#,
            topic, transcript
        )
    }
}

fn or_unknown(s: &str) -> &str {
    if s.trim().is_empty() { "unknown" } else { s }
}
