//! Plan Core - execution plans for staged mini-prompt workflows
//!
//! A workflow is an ordered list of stages, each holding mini-prompts and two
//! optional system auto-prompts (a multi-agent coordination prompt and a
//! memory-board review prompt). This crate flattens a workflow into a single,
//! globally indexed list of steps that an agent can walk one at a time.
//!
//! # Architecture
//!
//! - `types` - Workflow aggregate and execution plan types
//! - `plan` - Plan assembly and per-stage ordering
//! - `format` - Markdown rendering of plans and steps
//! - `store` - The [`WorkflowStore`] seam and its in-memory and file backends
//! - `error` - Store and plan errors
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use plan_core::{format_execution_plan, FileStore, PlanBuilder};
//!
//! let builder = PlanBuilder::new(Arc::new(FileStore::new("/srv/workflows")));
//! if let Some(plan) = builder.build_execution_plan("ship-feature").await? {
//!     println!("{}", format_execution_plan(&plan));
//! }
//! ```

pub mod error;
pub mod format;
pub mod plan;
pub mod store;
pub mod types;

// Re-export core types for convenience
pub use error::{PlanError, PlanResult};
pub use format::{format_execution_plan, format_step};
pub use plan::{build_plan, normalized_item_order, PlanBuilder};
pub use store::{FileStore, MemoryStore, WorkflowStore};
pub use types::{
    AutoPromptKind, AutoPromptTemplate, AutoPromptTemplates, ExecutionPlan, ExecutionPlanItem,
    MiniPrompt, PlanItemType, Stage, StageMiniPrompt, Workflow, WorkflowSummary,
};
