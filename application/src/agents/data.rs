//! Data collection and field mapping.

use super::context::AgentContext;
use super::contract::Agent;
use crate::ports::llm_gateway::LlmCallConfig;
use async_trait::async_trait;
use mcp_domain::{
    Mcp, PromptTemplate, Step, StepAction, StepOutput, StepResult, Variable, extract_json,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Fetches records from the data service and maps their fields onto model
/// variables.
///
/// `collect_data` reads from `config.dataSource`, or the document's first
/// internal source, with an optional `config.query`. `map_data` asks the LLM
/// for a variable-to-field mapping and falls back to name matching when the
/// reply is unusable.
#[derive(Default)]
pub struct DataAgent {
    config: LlmCallConfig,
}

impl DataAgent {
    pub fn new(config: LlmCallConfig) -> Self {
        Self { config }
    }

    async fn collect(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        let Some(data) = ctx.services.data.as_ref() else {
            return StepResult::failure("No data service configured");
        };
        let Some(source) = step
            .config_str("dataSource")
            .or_else(|| mcp.context.dataset.internal_sources.first().map(String::as_str))
            .map(str::to_string)
        else {
            return StepResult::failure("No data source given in step config or dataset");
        };

        match data.validate_connection(&source).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Data: connecting to '{}'", source);
                if let Err(e) = data.connect(&source).await {
                    return StepResult::failure(e.to_string());
                }
            }
            Err(e) => return StepResult::failure(e.to_string()),
        }

        let records = match data.fetch_data(&source, step.config_value("query")).await {
            Ok(records) => records,
            Err(e) => return StepResult::failure(e.to_string()),
        };
        info!("Data: fetched {} record(s) from '{}'", records.len(), source);

        if !mcp.context.dataset.internal_sources.contains(&source) {
            mcp.context.dataset.internal_sources.push(source.clone());
            mcp.touch();
        }

        let thought = format!("Fetched {} record(s) from '{}'", records.len(), source);
        StepResult::success(StepOutput::CollectedData { source, records }).with_thought(thought)
    }

    async fn map(&self, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        if ctx.collected_data().is_none() {
            return StepResult::failure("No collected data to map");
        }
        if mcp.model.variables.is_empty() {
            return StepResult::failure("Model has no variables to map");
        }
        let fields = ctx.collected_fields();

        let prompt = PromptTemplate::mapping_prompt(&mcp.model.variables, &fields);
        let proposed = match ctx.services.llm.call(&prompt, Some(&self.config)).await {
            Ok(reply) => extract_json::<BTreeMap<String, String>>(&reply.content),
            Err(e) => {
                warn!("Data: mapping LLM call failed, matching by name: {}", e);
                None
            }
        };

        let (mappings, method) = match proposed {
            Some(proposed) => {
                let accepted = accept_mappings(proposed, &mcp.model.variables, &fields);
                if accepted.is_empty() {
                    (match_by_name(&mcp.model.variables, &fields), "name matching")
                } else {
                    (accepted, "LLM proposal")
                }
            }
            None => (match_by_name(&mcp.model.variables, &fields), "name matching"),
        };

        let unmapped: Vec<String> = mcp
            .model
            .variables
            .iter()
            .filter(|v| !mappings.contains_key(&v.name))
            .map(|v| v.name.clone())
            .collect();

        let mut required: Vec<String> = mappings.values().cloned().collect();
        required.sort();
        required.dedup();
        mcp.context.dataset.required_fields = required;
        mcp.touch();

        let thought = format!(
            "Mapped {}/{} variable(s) by {}",
            mappings.len(),
            mcp.model.variables.len(),
            method
        );
        StepResult::success(StepOutput::DataMapping { mappings, unmapped }).with_thought(thought)
    }
}

/// Keep proposed pairs whose variable and field both exist.
fn accept_mappings(
    proposed: BTreeMap<String, String>,
    variables: &[Variable],
    fields: &[String],
) -> BTreeMap<String, String> {
    proposed
        .into_iter()
        .filter(|(variable, field)| {
            variables.iter().any(|v| &v.name == variable) && fields.contains(field)
        })
        .collect()
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn match_by_name(variables: &[Variable], fields: &[String]) -> BTreeMap<String, String> {
    variables
        .iter()
        .filter_map(|v| {
            let wanted = normalize(&v.name);
            fields
                .iter()
                .find(|f| normalize(f) == wanted)
                .map(|f| (v.name.clone(), f.clone()))
        })
        .collect()
}

#[async_trait]
impl Agent for DataAgent {
    fn name(&self) -> &str {
        "data_agent"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::CollectData, StepAction::MapData]
    }

    async fn run(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        match step.action {
            StepAction::CollectData => self.collect(step, mcp, ctx).await,
            StepAction::MapData => self.map(mcp, ctx).await,
            ref other => StepResult::failure(format!("data_agent cannot handle '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{MockData, ScriptedLlm, services};
    use mcp_domain::{McpBuilder, OrchestrationResult};
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    // ==================== Collect ====================

    #[tokio::test]
    async fn test_collect_connects_when_not_connected() {
        let data = MockData::new(vec![json!({"depot": "A", "demand": 12})]);
        let services =
            services(ScriptedLlm::new(Vec::<&str>::new())).with_data_service(data.clone());
        let mut mcp = McpBuilder::new("s1")
            .add_data_collection_step("collect", "erp")
            .build()
            .unwrap();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = DataAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(result.success);
        assert_eq!(
            *data.calls.lock().unwrap(),
            vec!["validate_connection", "connect", "fetch_data"]
        );
        assert!(matches!(
            result.output,
            Some(StepOutput::CollectedData { ref source, ref records }) if source == "erp" && records.len() == 1
        ));
        assert_eq!(mcp.context.dataset.internal_sources, vec!["erp"]);
    }

    #[tokio::test]
    async fn test_collect_without_source_fails() {
        let services = services(ScriptedLlm::new(Vec::<&str>::new()))
            .with_data_service(MockData::new(Vec::new()));
        let mut mcp = McpBuilder::new("s1")
            .add_step("collect", StepAction::CollectData)
            .build()
            .unwrap();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = DataAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(!result.success);
    }

    // ==================== Map ====================

    fn collected() -> Vec<OrchestrationResult> {
        vec![OrchestrationResult::new(
            "collect",
            StepAction::CollectData,
            Some("data_agent".to_string()),
            StepResult::success(StepOutput::CollectedData {
                source: "erp".to_string(),
                records: vec![json!({"Truck_Count": 4, "fuel_cost": 1.7})],
            }),
            1,
        )]
    }

    fn mapping_doc() -> Mcp {
        McpBuilder::new("s1")
            .add_variable(Variable::integer("truck_count"))
            .add_variable(Variable::continuous("fuel_cost"))
            .add_variable(Variable::binary("open_hub"))
            .add_mapping_step("map")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_map_uses_llm_proposal_filtered_to_known_names() {
        let services = services(ScriptedLlm::new([
            r#"{"truck_count": "Truck_Count", "open_hub": "no_such_field"}"#,
        ]));
        let mut mcp = mapping_doc();
        let step = mcp.protocol.steps[0].clone();
        let previous = collected();

        let ctx = AgentContext::new(&services, &previous, CancellationToken::new());
        let result = DataAgent::default().run(&step, &mut mcp, &ctx).await;

        let Some(StepOutput::DataMapping { mappings, unmapped }) = result.output else {
            panic!("expected mapping output");
        };
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings["truck_count"], "Truck_Count");
        assert_eq!(unmapped, vec!["fuel_cost", "open_hub"]);
        assert_eq!(mcp.context.dataset.required_fields, vec!["Truck_Count"]);
    }

    #[tokio::test]
    async fn test_map_falls_back_to_name_matching() {
        let services = services(ScriptedLlm::new(["I am not sure."]));
        let mut mcp = mapping_doc();
        let step = mcp.protocol.steps[0].clone();
        let previous = collected();

        let ctx = AgentContext::new(&services, &previous, CancellationToken::new());
        let result = DataAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(result.success);
        let Some(StepOutput::DataMapping { mappings, .. }) = result.output else {
            panic!("expected mapping output");
        };
        assert_eq!(mappings["truck_count"], "Truck_Count");
        assert_eq!(mappings["fuel_cost"], "fuel_cost");
        assert!(result.thought_process.unwrap().contains("name matching"));
    }

    #[tokio::test]
    async fn test_map_without_collected_data_fails() {
        let services = services(ScriptedLlm::new(Vec::<&str>::new()));
        let mut mcp = mapping_doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = DataAgent::default().run(&step, &mut mcp, &ctx).await;

        assert_eq!(result.error.as_deref(), Some("No collected data to map"));
    }
}
