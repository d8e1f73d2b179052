//! MCP parameter types for plan tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format of plan and step responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable Markdown report
    #[default]
    Markdown,
    /// Structured JSON
    Json,
}

/// Parameters for get_execution_plan tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetExecutionPlanParams {
    #[schemars(description = "ID of the workflow to plan")]
    pub workflow_id: String,

    #[schemars(description = "Response format: 'markdown' (default) or 'json'")]
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Parameters for get_step tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetStepParams {
    #[schemars(description = "ID of the workflow")]
    pub workflow_id: String,

    #[schemars(description = "0-based step index within the whole plan")]
    pub step_index: usize,

    #[schemars(description = "Response format: 'markdown' (default) or 'json'")]
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Parameters for get_stage_item_order tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StageItemOrderParams {
    #[schemars(description = "ID of the workflow")]
    pub workflow_id: String,

    #[schemars(description = "ID of the stage whose stored item order should be normalized")]
    pub stage_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_params_default_format() {
        let params: GetStepParams =
            serde_json::from_value(serde_json::json!({"workflow_id": "wf", "step_index": 3}))
                .unwrap();
        assert_eq!(params.step_index, 3);
        assert_eq!(params.format, None);
    }

    #[test]
    fn test_format_is_lowercase() {
        let params: GetExecutionPlanParams =
            serde_json::from_value(serde_json::json!({"workflow_id": "wf", "format": "json"}))
                .unwrap();
        assert_eq!(params.format, Some(OutputFormat::Json));
    }
}
