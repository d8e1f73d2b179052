//! Workflow Plan MCP Server
//!
//! Serves execution plans of staged mini-prompt workflows to AI agents over
//! the MCP protocol.
//!
//! # Features
//!
//! - List stored workflows
//! - Render a workflow's full execution plan (Markdown or JSON)
//! - Fetch single steps by global index
//! - Inspect and normalize a stage's stored item order
//!
//! # Architecture
//!
//! - `config` - Configuration loading (TOML file + environment)
//! - `handlers` - MCP tool handlers
//! - `params` - MCP parameter types
//! - `server` - MCP server implementation
//! - `error` - Conversion of plan errors into MCP errors
//! - `logging` - Tracing setup

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod params;
pub mod server;

pub use config::Config;
pub use logging::init_tracing;
pub use server::WorkflowPlanMcpServer;
