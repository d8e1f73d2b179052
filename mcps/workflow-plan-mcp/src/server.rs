//! Workflow Plan MCP Server implementation

use plan_core::{FileStore, PlanBuilder, WorkflowStore};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use std::sync::Arc;

use crate::config::Config;
use crate::handlers;
use crate::params::{GetExecutionPlanParams, GetStepParams, OutputFormat, StageItemOrderParams};

/// Workflow Plan MCP Server
#[derive(Clone)]
pub struct WorkflowPlanMcpServer {
    /// MCP tool router
    tool_router: ToolRouter<Self>,

    /// Builds plans from the configured store; holds no plan state
    builder: PlanBuilder<dyn WorkflowStore>,

    /// Format used when a call does not ask for one
    default_format: OutputFormat,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl WorkflowPlanMcpServer {
    /// Create a server from the configuration on disk
    pub fn new() -> Result<Self, anyhow::Error> {
        let config = Config::load()?;
        Ok(Self::from_config(&config))
    }

    /// Create a server reading from the configured file store
    pub fn from_config(config: &Config) -> Self {
        tracing::info!("Using workflow store at {}", config.store.root.display());
        let store = FileStore::new(config.store.root.clone());
        Self::with_store(Arc::new(store), config.plan.default_format)
    }

    /// Create a server over any workflow store
    pub fn with_store(store: Arc<dyn WorkflowStore>, default_format: OutputFormat) -> Self {
        Self {
            tool_router: Self::tool_router(),
            builder: PlanBuilder::new(store),
            default_format,
        }
    }

    // ========================================================================
    // MCP Tool Handlers
    // ========================================================================

    #[tool(description = "List available workflows with their IDs, names and stage counts")]
    async fn list_workflows(&self) -> Result<CallToolResult, McpError> {
        handlers::list_workflows(&self.builder).await
    }

    #[tool(
        description = "Get the full execution plan of a workflow: every step in order, grouped by stage, including auto-attached coordination and review prompts"
    )]
    async fn get_execution_plan(
        &self,
        Parameters(params): Parameters<GetExecutionPlanParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_execution_plan(&self.builder, params, self.default_format).await
    }

    #[tool(
        description = "Get a single step of a workflow's execution plan by its 0-based index, with its full instructions"
    )]
    async fn get_step(
        &self,
        Parameters(params): Parameters<GetStepParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_step(&self.builder, params, self.default_format).await
    }

    #[tool(
        description = "Show a stage's stored item order next to its normalized form (stale auto-prompt keys rewritten, removed items dropped, new items appended)"
    )]
    async fn get_stage_item_order(
        &self,
        Parameters(params): Parameters<StageItemOrderParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_stage_item_order(&self.builder, params).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for WorkflowPlanMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Workflow plan server. Call get_execution_plan to see every step of a workflow, \
                 then get_step with each index in turn to fetch and follow its instructions."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
