//! Workflow Plan MCP - execution plans for staged mini-prompt workflows
//!
//! Reads workflows and auto-prompt templates from the configured store and
//! serves their execution plans over stdio.

use rmcp::{transport::io::stdio, ServiceExt};
use workflow_plan_mcp::WorkflowPlanMcpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    workflow_plan_mcp::init_tracing()?;

    tracing::info!("Starting Workflow Plan MCP server");

    let server = WorkflowPlanMcpServer::new()?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Workflow Plan MCP server running");

    service.waiting().await?;

    tracing::info!("Workflow Plan MCP server stopped");

    Ok(())
}
