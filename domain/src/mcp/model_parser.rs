//! Optimization model parsing from LLM responses.
//!
//! Model-building prompts ask for the model wire schema:
//!
//! ```json
//! {
//!   "variables":   [{"name": "x", "type": "INTEGER", "min": 0, "max": 10}],
//!   "constraints": [{"name": "cap", "expression": "x <= 5", "type": "LESS_THAN"}],
//!   "objective":   {"type": "MAXIMIZE", "expression": "x"}
//! }
//! ```
//!
//! Responses either wrap it in a ` ```json ` / ` ```model ` fence or return
//! bare JSON, possibly surrounded by prose.

use super::entities::OptimizationModel;
use crate::core::error::DomainError;
use serde::de::DeserializeOwned;

/// Parse an [`OptimizationModel`] out of free-form response text.
///
/// Tries fenced blocks first, then the whole response, then the outermost
/// `{...}` span. A model with no variables is rejected.
pub fn parse_model(response: &str) -> Result<OptimizationModel, DomainError> {
    let mut last_error = None;
    for candidate in json_candidates(response) {
        match serde_json::from_str::<OptimizationModel>(&candidate) {
            Ok(model) if model.variables.is_empty() => {
                last_error = Some("model declares no variables".to_string());
            }
            Ok(model) => return Ok(model),
            Err(e) => {
                last_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    Err(DomainError::InvalidModel(
        last_error.unwrap_or_else(|| "no JSON object found".to_string()),
    ))
}

/// First JSON object in `response` that deserializes as `T`, searched the same
/// way as [`parse_model`].
pub fn extract_json<T: DeserializeOwned>(response: &str) -> Option<T> {
    json_candidates(response)
        .into_iter()
        .find_map(|candidate| serde_json::from_str(&candidate).ok())
}

fn json_candidates(response: &str) -> Vec<String> {
    let mut candidates = fenced_blocks(response);
    candidates.push(response.trim().to_string());
    if let Some(start) = response.find('{')
        && let Some(end) = response.rfind('}')
        && end > start
    {
        candidates.push(response[start..=end].to_string());
    }
    candidates
}

fn fenced_blocks(response: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in response.lines() {
        let trimmed = line.trim();
        match current.as_mut() {
            None if matches!(trimmed, "```json" | "```model") => current = Some(String::new()),
            Some(_) if trimmed == "```" => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            Some(block) => {
                block.push_str(line);
                block.push('\n');
            }
            None => {}
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::value_objects::{ConstraintType, ObjectiveType, VariableType};

    const MODEL_JSON: &str = r#"{
        "variables": [
            {"name": "trucks", "type": "INTEGER", "min": 0, "max": 40},
            {"name": "use_hub", "type": "BINARY"}
        ],
        "constraints": [
            {"name": "fleet_cap", "expression": "trucks <= 40", "type": "LESS_THAN"}
        ],
        "objective": {"type": "MINIMIZE", "expression": "12 * trucks + 300 * use_hub"}
    }"#;

    #[test]
    fn test_parse_raw_json() {
        let model = parse_model(MODEL_JSON).unwrap();
        assert_eq!(model.variables.len(), 2);
        assert_eq!(model.variables[1].variable_type, VariableType::Binary);
        assert_eq!(model.constraints[0].constraint_type, ConstraintType::LessThan);
        assert_eq!(
            model.objective.unwrap().objective_type,
            ObjectiveType::Minimize
        );
    }

    #[test]
    fn test_parse_fenced_block() {
        let response = format!(
            "Here is the model:\n```json\n{}\n```\nLet me know if it needs changes.",
            MODEL_JSON
        );
        let model = parse_model(&response).unwrap();
        assert_eq!(model.variables[0].name, "trucks");
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let response = format!("The model is {} as requested.", MODEL_JSON);
        assert!(parse_model(&response).is_ok());
    }

    #[test]
    fn test_model_without_variables_rejected() {
        let err = parse_model(r#"{"variables": [], "constraints": []}"#).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidModel("model declares no variables".to_string())
        );
    }

    #[test]
    fn test_no_json_rejected() {
        assert!(matches!(
            parse_model("I could not build a model."),
            Err(DomainError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_extract_json_from_prose() {
        let value: serde_json::Value =
            extract_json("Sure! {\"problemType\": \"routing\"} Hope that helps.").unwrap();
        assert_eq!(value["problemType"], "routing");
        assert!(extract_json::<serde_json::Value>("no json here").is_none());
    }
}
