//! Error conversion for MCP tools
//!
//! Lookups that find nothing become `invalid_params` so the calling agent
//! sees which id was wrong. Store failures become `internal_error`.

use plan_core::PlanError;
use rmcp::ErrorData as McpError;

/// Convert an error into an MCP error
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for PlanError {
    fn into_mcp_error(self) -> McpError {
        tracing::error!("Workflow store failure: {}", self);
        McpError::internal_error(self.to_string(), None)
    }
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("JSON error: {}", self), None)
    }
}

/// Extension trait for Result types to convert to MCP errors
pub trait ResultExt<T> {
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(IntoMcpError::into_mcp_error)
    }
}

/// Error for a workflow id that does not resolve
pub fn workflow_not_found(workflow_id: &str) -> McpError {
    McpError::invalid_params(format!("Workflow not found: {}", workflow_id), None)
}

/// Error for a step index past the end of the plan
pub fn step_out_of_range(workflow_id: &str, step_index: usize, total_steps: usize) -> McpError {
    McpError::invalid_params(
        format!(
            "Step {} out of range for workflow {} ({} steps)",
            step_index, workflow_id, total_steps
        ),
        None,
    )
}

/// Error for a stage id that is not part of the workflow
pub fn stage_not_found(workflow_id: &str, stage_id: &str) -> McpError {
    McpError::invalid_params(
        format!("Stage {} not found in workflow {}", stage_id, workflow_id),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_error_is_internal() {
        let result: Result<(), PlanError> = Err(PlanError::StoreError("disk gone".to_string()));
        let err = result.to_mcp_err().unwrap_err();
        assert!(err.message.contains("disk gone"));
    }

    #[test]
    fn test_not_found_messages() {
        assert!(workflow_not_found("wf-9").message.contains("wf-9"));
        assert!(step_out_of_range("wf", 12, 4).message.contains("4 steps"));
        assert!(stage_not_found("wf", "s-3").message.contains("s-3"));
    }
}
