//! Handler implementations for workflow-plan-mcp tools
//!
//! Each handler loads what it needs through the plan builder, renders the
//! result in the requested format and wraps it in a `CallToolResult`.

use plan_core::{
    format_execution_plan, format_step, normalized_item_order, ExecutionPlan, ExecutionPlanItem,
    PlanBuilder, WorkflowStore, WorkflowSummary,
};
use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use serde::Serialize;

use crate::error::{stage_not_found, step_out_of_range, workflow_not_found, ResultExt};
use crate::params::{GetExecutionPlanParams, GetStepParams, OutputFormat, StageItemOrderParams};

// ============================================================================
// Response Types
// ============================================================================

/// Response for list_workflows
#[derive(Debug, Serialize)]
pub struct WorkflowListResponse {
    pub workflows: Vec<WorkflowSummary>,
    pub total: usize,
}

/// JSON response for get_step
#[derive(Debug, Serialize)]
pub struct StepResponse<'a> {
    pub workflow_id: &'a str,
    pub workflow_name: &'a str,
    pub total_steps: usize,
    /// Index of the following step, absent on the last step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step_index: Option<usize>,
    pub step: &'a ExecutionPlanItem,
}

/// Response for get_stage_item_order
#[derive(Debug, Serialize)]
pub struct StageItemOrderResponse {
    pub workflow_id: String,
    pub stage_id: String,
    /// Order as currently stored
    pub stored: Vec<String>,
    /// Order to write back: stale stage ids rewritten, removed items
    /// dropped, new items appended. Absent when the stage was never reordered.
    pub normalized: Option<Vec<String>>,
}

// ============================================================================
// Rendering
// ============================================================================

fn json_text<T: Serialize>(data: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(data).to_mcp_err()
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Render a whole plan
pub fn render_plan(plan: &ExecutionPlan, format: OutputFormat) -> Result<String, McpError> {
    match format {
        OutputFormat::Markdown => {
            let mut text = format_execution_plan(plan);
            if plan.total_steps > 0 {
                text.push_str(
                    "\nCall `get_step` with a step index to fetch that step's full instructions.\n",
                );
            }
            Ok(text)
        }
        OutputFormat::Json => json_text(plan),
    }
}

/// Render one step of a plan
pub fn render_step(
    plan: &ExecutionPlan,
    item: &ExecutionPlanItem,
    format: OutputFormat,
) -> Result<String, McpError> {
    match format {
        OutputFormat::Markdown => Ok(format_step(plan, item)),
        OutputFormat::Json => json_text(&StepResponse {
            workflow_id: &plan.workflow_id,
            workflow_name: &plan.workflow_name,
            total_steps: plan.total_steps,
            next_step_index: Some(item.index + 1).filter(|next| *next < plan.total_steps),
            step: item,
        }),
    }
}

// ============================================================================
// Tool Handlers
// ============================================================================

pub async fn list_workflows<S>(builder: &PlanBuilder<S>) -> Result<CallToolResult, McpError>
where
    S: WorkflowStore + ?Sized,
{
    let workflows = builder.store().list_workflows().await.to_mcp_err()?;

    let response = WorkflowListResponse {
        total: workflows.len(),
        workflows,
    };

    Ok(text_result(json_text(&response)?))
}

pub async fn get_execution_plan<S>(
    builder: &PlanBuilder<S>,
    params: GetExecutionPlanParams,
    default_format: OutputFormat,
) -> Result<CallToolResult, McpError>
where
    S: WorkflowStore + ?Sized,
{
    let plan = builder
        .build_execution_plan(&params.workflow_id)
        .await
        .to_mcp_err()?
        .ok_or_else(|| workflow_not_found(&params.workflow_id))?;

    tracing::info!(
        workflow_id = %params.workflow_id,
        total_steps = plan.total_steps,
        "Serving execution plan"
    );

    let text = render_plan(&plan, params.format.unwrap_or(default_format))?;
    Ok(text_result(text))
}

pub async fn get_step<S>(
    builder: &PlanBuilder<S>,
    params: GetStepParams,
    default_format: OutputFormat,
) -> Result<CallToolResult, McpError>
where
    S: WorkflowStore + ?Sized,
{
    // Build the whole plan rather than calling `PlanBuilder::get_step`, the
    // step rendering needs the plan's totals.
    let plan = builder
        .build_execution_plan(&params.workflow_id)
        .await
        .to_mcp_err()?
        .ok_or_else(|| workflow_not_found(&params.workflow_id))?;

    let item = plan.step(params.step_index).ok_or_else(|| {
        step_out_of_range(&params.workflow_id, params.step_index, plan.total_steps)
    })?;

    tracing::info!(
        workflow_id = %params.workflow_id,
        step_index = params.step_index,
        "Serving plan step"
    );

    let text = render_step(&plan, item, params.format.unwrap_or(default_format))?;
    Ok(text_result(text))
}

pub async fn get_stage_item_order<S>(
    builder: &PlanBuilder<S>,
    params: StageItemOrderParams,
) -> Result<CallToolResult, McpError>
where
    S: WorkflowStore + ?Sized,
{
    let workflow = builder
        .store()
        .load_workflow(&params.workflow_id)
        .await
        .to_mcp_err()?
        .ok_or_else(|| workflow_not_found(&params.workflow_id))?;

    let stage = workflow
        .stages
        .iter()
        .find(|stage| stage.id == params.stage_id)
        .ok_or_else(|| stage_not_found(&params.workflow_id, &params.stage_id))?;

    let templates = builder.load_templates().await.to_mcp_err()?;

    let response = StageItemOrderResponse {
        workflow_id: params.workflow_id.clone(),
        stage_id: params.stage_id.clone(),
        stored: stage.item_order.clone().unwrap_or_default(),
        normalized: normalized_item_order(stage, &templates),
    };

    Ok(text_result(json_text(&response)?))
}
