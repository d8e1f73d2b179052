//! Execution plan builder
//!
//! - [`build_plan`] - pure assembly of a plan from a loaded aggregate
//! - [`PlanBuilder`] - loads the aggregate and templates from a
//!   [`WorkflowStore`] on every call and builds from them
//!
//! Plans are never cached; each call re-reads the store so a plan always
//! reflects the latest saved workflow.

pub mod order;

use std::sync::Arc;

use crate::error::PlanResult;
use crate::store::WorkflowStore;
use crate::types::{
    AutoPromptKind, AutoPromptTemplates, ExecutionPlan, ExecutionPlanItem, PlanItemType, Workflow,
};

pub use order::{normalized_item_order, stage_items, ItemKey, StageItem};

impl StageItem<'_> {
    /// Materialize as a plan item at a global position
    pub fn to_plan_item(
        &self,
        index: usize,
        stage_index: usize,
        stage_name: &str,
    ) -> ExecutionPlanItem {
        match self {
            StageItem::MiniPrompt(prompt) => ExecutionPlanItem {
                index,
                item_type: PlanItemType::MiniPrompt,
                stage_index,
                stage_name: stage_name.to_string(),
                name: prompt.name.clone(),
                description: prompt.description.clone(),
                content: Some(prompt.content.clone()),
                is_auto_attached: false,
                auto_prompt_type: None,
            },
            StageItem::AutoPrompt(kind, template) => ExecutionPlanItem {
                index,
                item_type: PlanItemType::AutoPrompt,
                stage_index,
                stage_name: stage_name.to_string(),
                name: template.name.clone(),
                description: template.description.clone(),
                content: Some(template.content.clone()),
                is_auto_attached: true,
                auto_prompt_type: Some(*kind),
            },
        }
    }
}

/// Build the execution plan of a loaded workflow
///
/// Stages are taken in the order given (the store contract is ascending
/// `order`). Item indices run continuously from 0 across stage boundaries.
pub fn build_plan(workflow: &Workflow, templates: &AutoPromptTemplates) -> ExecutionPlan {
    let mut items = Vec::new();

    for (stage_index, stage) in workflow.stages.iter().enumerate() {
        for item in stage_items(stage, templates) {
            let index = items.len();
            items.push(item.to_plan_item(index, stage_index, &stage.name));
        }
    }

    let include_multi_agent_chat = workflow.include_multi_agent_chat
        || workflow
            .stages
            .iter()
            .any(|stage| stage.include_multi_agent_chat);

    ExecutionPlan {
        workflow_id: workflow.id.clone(),
        workflow_name: workflow.name.clone(),
        include_multi_agent_chat,
        total_steps: items.len(),
        items,
    }
}

/// Builds plans from a [`WorkflowStore`]
pub struct PlanBuilder<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for PlanBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: WorkflowStore + ?Sized> PlanBuilder<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch both auto-prompt templates
    pub async fn load_templates(&self) -> PlanResult<AutoPromptTemplates> {
        let (multi_agent_chat, memory_board) = tokio::join!(
            self.store.load_template(AutoPromptKind::MultiAgentChat),
            self.store.load_template(AutoPromptKind::MemoryBoard),
        );

        Ok(AutoPromptTemplates {
            multi_agent_chat: multi_agent_chat?,
            memory_board: memory_board?,
        })
    }

    /// Build the plan of a stored workflow
    ///
    /// Returns `Ok(None)` when the workflow does not exist. Store failures
    /// are returned as errors; there is no partial plan.
    pub async fn build_execution_plan(
        &self,
        workflow_id: &str,
    ) -> PlanResult<Option<ExecutionPlan>> {
        let (workflow, templates) =
            tokio::join!(self.store.load_workflow(workflow_id), self.load_templates());

        let Some(workflow) = workflow? else {
            tracing::debug!(workflow_id, "Workflow not found");
            return Ok(None);
        };
        let templates = templates?;

        let plan = build_plan(&workflow, &templates);
        tracing::debug!(
            workflow_id,
            stages = workflow.stages.len(),
            total_steps = plan.total_steps,
            "Built execution plan"
        );

        Ok(Some(plan))
    }

    /// Fetch a single step by global index
    ///
    /// Rebuilds the whole plan. Returns `Ok(None)` for a missing workflow or
    /// an out-of-range index.
    pub async fn get_step(
        &self,
        workflow_id: &str,
        step_index: usize,
    ) -> PlanResult<Option<ExecutionPlanItem>> {
        let plan = self.build_execution_plan(workflow_id).await?;
        Ok(plan.and_then(|plan| plan.items.into_iter().nth(step_index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AutoPromptTemplate, MiniPrompt, Stage};

    fn prompt(id: &str, description: Option<&str>) -> MiniPrompt {
        MiniPrompt {
            id: id.to_string(),
            name: format!("Prompt {}", id),
            description: description.map(str::to_string),
            content: format!("Content of {}", id),
        }
    }

    fn templates() -> AutoPromptTemplates {
        AutoPromptTemplates {
            multi_agent_chat: Some(AutoPromptTemplate {
                name: "Multi-Agent Chat".to_string(),
                description: Some("Coordinate with other agents".to_string()),
                content: "Post your status.".to_string(),
            }),
            memory_board: Some(AutoPromptTemplate {
                name: "Memory Board".to_string(),
                description: None,
                content: "Write a handoff note.".to_string(),
            }),
        }
    }

    fn workflow() -> Workflow {
        Workflow::new("wf-1", "Ship Feature")
            .with_stage(
                Stage::new("s1", "Plan")
                    .with_mini_prompt(prompt("p1", Some("Scope the work")))
                    .with_review(true),
            )
            .with_stage(
                Stage::new("s2", "Build")
                    .with_mini_prompt(prompt("p2", None))
                    .with_mini_prompt(prompt("p3", None))
                    .with_multi_agent_chat(true),
            )
    }

    #[test]
    fn test_indices_continue_across_stages() {
        let plan = build_plan(&workflow(), &templates());

        assert_eq!(plan.total_steps, 6);
        for (i, item) in plan.items.iter().enumerate() {
            assert_eq!(item.index, i);
        }

        let stages: Vec<usize> = plan.items.iter().map(|item| item.stage_index).collect();
        assert_eq!(stages, vec![0, 0, 1, 1, 1, 1]);
        assert_eq!(plan.items[2].stage_name, "Build");
    }

    #[test]
    fn test_plan_item_fields() {
        let plan = build_plan(&workflow(), &templates());

        let first = &plan.items[0];
        assert_eq!(first.item_type, PlanItemType::MiniPrompt);
        assert_eq!(first.description.as_deref(), Some("Scope the work"));
        assert_eq!(first.content.as_deref(), Some("Content of p1"));
        assert!(!first.is_auto_attached);
        assert_eq!(first.auto_prompt_type, None);

        let review = &plan.items[1];
        assert_eq!(review.item_type, PlanItemType::AutoPrompt);
        assert_eq!(review.name, "Memory Board");
        assert!(review.is_auto_attached);
        assert_eq!(review.auto_prompt_type, Some(AutoPromptKind::MemoryBoard));
    }

    #[test]
    fn test_multi_agent_chat_roll_up() {
        let plan = build_plan(&workflow(), &templates());
        assert!(plan.include_multi_agent_chat);

        let mut quiet = Workflow::new("wf-2", "Quiet")
            .with_stage(Stage::new("s1", "Only").with_mini_prompt(prompt("p1", None)));
        assert!(!build_plan(&quiet, &templates()).include_multi_agent_chat);

        quiet.include_multi_agent_chat = true;
        assert!(build_plan(&quiet, &templates()).include_multi_agent_chat);
    }

    #[test]
    fn test_empty_workflow() {
        let plan = build_plan(&Workflow::new("wf-3", "Empty"), &templates());
        assert_eq!(plan.total_steps, 0);
        assert!(plan.items.is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let workflow = workflow();
        let templates = templates();

        let first = build_plan(&workflow, &templates);
        let second = build_plan(&workflow, &templates);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
