//! Workflow stores
//!
//! The plan builder reads everything it needs through [`WorkflowStore`].
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`] - in-process maps, for tests and embedding
//! - [`FileStore`] - a directory of TOML workflow and template files

mod file;

pub use file::FileStore;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::PlanResult;
use crate::types::{
    AutoPromptKind, AutoPromptTemplate, AutoPromptTemplates, Workflow, WorkflowSummary,
};

/// Source of workflow aggregates and auto-prompt templates
///
/// Implementations must return stages ascending by `order`, and each stage's
/// mini-prompts ascending by `order`.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Load a workflow aggregate, or `None` if it does not exist
    async fn load_workflow(&self, id: &str) -> PlanResult<Option<Workflow>>;

    /// Load the template of an auto-prompt kind, or `None` if not seeded
    async fn load_template(&self, kind: AutoPromptKind) -> PlanResult<Option<AutoPromptTemplate>>;

    /// List stored workflows
    async fn list_workflows(&self) -> PlanResult<Vec<WorkflowSummary>>;
}

/// In-memory workflow store
#[derive(Debug, Default)]
pub struct MemoryStore {
    workflows: RwLock<HashMap<String, Workflow>>,
    templates: RwLock<AutoPromptTemplates>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a workflow (builder style)
    pub fn with_workflow(mut self, mut workflow: Workflow) -> Self {
        workflow.normalize_ordering();
        self.workflows
            .get_mut()
            .insert(workflow.id.clone(), workflow);
        self
    }

    /// Seed a template (builder style)
    pub fn with_template(mut self, kind: AutoPromptKind, template: AutoPromptTemplate) -> Self {
        self.templates.get_mut().set(kind, Some(template));
        self
    }

    /// Insert or replace a workflow
    pub async fn save_workflow(&self, mut workflow: Workflow) {
        workflow.normalize_ordering();
        self.workflows
            .write()
            .await
            .insert(workflow.id.clone(), workflow);
    }

    /// Remove a workflow, returning it if present
    pub async fn remove_workflow(&self, id: &str) -> Option<Workflow> {
        self.workflows.write().await.remove(id)
    }

    /// Seed or clear a template
    pub async fn set_template(&self, kind: AutoPromptKind, template: Option<AutoPromptTemplate>) {
        self.templates.write().await.set(kind, template);
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn load_workflow(&self, id: &str) -> PlanResult<Option<Workflow>> {
        Ok(self.workflows.read().await.get(id).cloned())
    }

    async fn load_template(&self, kind: AutoPromptKind) -> PlanResult<Option<AutoPromptTemplate>> {
        Ok(self.templates.read().await.get(kind).cloned())
    }

    async fn list_workflows(&self) -> PlanResult<Vec<WorkflowSummary>> {
        let workflows = self.workflows.read().await;
        let mut summaries: Vec<WorkflowSummary> =
            workflows.values().map(WorkflowSummary::from).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }
}
