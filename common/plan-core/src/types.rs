//! Core type definitions
//!
//! This module contains the workflow aggregate consumed by the plan builder
//! (workflows, stages, mini-prompts, auto-prompt templates) and the
//! execution plan it produces.

use serde::{Deserialize, Serialize};

// ============================================================================
// Workflow Aggregate
// ============================================================================

/// A reusable instruction block attached to a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniPrompt {
    /// Opaque identifier, unique within the store
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional short description
    #[serde(default)]
    pub description: Option<String>,

    /// Prompt body handed to the agent
    #[serde(default)]
    pub content: String,
}

/// A mini-prompt reference together with its position inside the stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMiniPrompt {
    /// Persisted position (ascending)
    #[serde(default)]
    pub order: i32,

    #[serde(flatten)]
    pub mini_prompt: MiniPrompt,
}

/// A named phase of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Stable identifier, used to scope auto-prompt keys
    pub id: String,

    /// Display label copied onto every plan item of this stage
    pub name: String,

    /// Persisted position (ascending)
    #[serde(default)]
    pub order: i32,

    /// Append a review (memory-board) auto-prompt at the end of the stage
    #[serde(default)]
    pub with_review: bool,

    /// Insert a coordination (multi-agent-chat) auto-prompt after prompts
    #[serde(default)]
    pub include_multi_agent_chat: bool,

    /// Mini-prompts of this stage
    #[serde(default)]
    pub mini_prompts: Vec<StageMiniPrompt>,

    /// User-customized order of item keys, if the stage was ever reordered
    #[serde(default)]
    pub item_order: Option<Vec<String>>,
}

impl Stage {
    /// Create a stage with no prompts and both auto-prompt flags off
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order: 0,
            with_review: false,
            include_multi_agent_chat: false,
            mini_prompts: Vec::new(),
            item_order: None,
        }
    }

    /// Append a mini-prompt after the current last one
    pub fn with_mini_prompt(mut self, mini_prompt: MiniPrompt) -> Self {
        let order = self.mini_prompts.last().map_or(0, |p| p.order + 1);
        self.mini_prompts.push(StageMiniPrompt { order, mini_prompt });
        self
    }

    pub fn with_review(mut self, enabled: bool) -> Self {
        self.with_review = enabled;
        self
    }

    pub fn with_multi_agent_chat(mut self, enabled: bool) -> Self {
        self.include_multi_agent_chat = enabled;
        self
    }

    /// Set a persisted custom item order
    pub fn with_item_order<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_order = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the stage flag for the given auto-prompt kind is set
    pub fn auto_prompt_enabled(&self, kind: AutoPromptKind) -> bool {
        match kind {
            AutoPromptKind::MemoryBoard => self.with_review,
            AutoPromptKind::MultiAgentChat => self.include_multi_agent_chat,
        }
    }
}

/// A workflow aggregate as loaded from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Workflow-level multi-agent chat flag (informational roll-up only)
    #[serde(default)]
    pub include_multi_agent_chat: bool,

    /// Stages of this workflow
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Workflow {
    /// Create an empty workflow
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            include_multi_agent_chat: false,
            stages: Vec::new(),
        }
    }

    /// Append a stage after the current last one
    pub fn with_stage(mut self, mut stage: Stage) -> Self {
        stage.order = self.stages.last().map_or(0, |s| s.order + 1);
        self.stages.push(stage);
        self
    }

    /// Sort stages and their mini-prompts ascending by `order`
    ///
    /// The sort is stable, so entries sharing an `order` keep their
    /// relative position.
    pub fn normalize_ordering(&mut self) {
        self.stages.sort_by_key(|s| s.order);
        for stage in &mut self.stages {
            stage.mini_prompts.sort_by_key(|p| p.order);
        }
    }
}

/// Lightweight listing entry for a stored workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub stage_count: usize,
}

impl From<&Workflow> for WorkflowSummary {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            stage_count: workflow.stages.len(),
        }
    }
}

// ============================================================================
// Auto-Prompts
// ============================================================================

/// The two system-injected prompt kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoPromptKind {
    /// Coordination prompt, placed after mini-prompts
    MultiAgentChat,
    /// Review and handoff prompt, placed at the end of a stage
    MemoryBoard,
}

impl AutoPromptKind {
    /// Both kinds, in candidate insertion order
    pub const ALL: [AutoPromptKind; 2] = [
        AutoPromptKind::MultiAgentChat,
        AutoPromptKind::MemoryBoard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultiAgentChat => "multi-agent-chat",
            Self::MemoryBoard => "memory-board",
        }
    }

    /// Prefix shared by every scoped key of this kind
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::MultiAgentChat => "multi-agent-chat-",
            Self::MemoryBoard => "memory-board-",
        }
    }

    /// Stage-scoped item key, e.g. `memory-board-<stage_id>`
    pub fn scoped_key(&self, stage_id: &str) -> String {
        format!("{}{}", self.key_prefix(), stage_id)
    }

    /// Recognize an item key of this kind, whatever stage it was scoped to
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| key.starts_with(kind.key_prefix()))
    }

    /// Fixed display name the template is stored under
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::MultiAgentChat => "Multi-Agent Chat",
            Self::MemoryBoard => "Memory Board",
        }
    }

    /// Short role label used when rendering
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultiAgentChat => "Coordination",
            Self::MemoryBoard => "Review",
        }
    }
}

impl std::fmt::Display for AutoPromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content record backing one auto-prompt kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPromptTemplate {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: String,
}

/// The pair of templates available to a build; a missing one disables its kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoPromptTemplates {
    pub multi_agent_chat: Option<AutoPromptTemplate>,
    pub memory_board: Option<AutoPromptTemplate>,
}

impl AutoPromptTemplates {
    pub fn get(&self, kind: AutoPromptKind) -> Option<&AutoPromptTemplate> {
        match kind {
            AutoPromptKind::MultiAgentChat => self.multi_agent_chat.as_ref(),
            AutoPromptKind::MemoryBoard => self.memory_board.as_ref(),
        }
    }

    pub fn set(&mut self, kind: AutoPromptKind, template: Option<AutoPromptTemplate>) {
        match kind {
            AutoPromptKind::MultiAgentChat => self.multi_agent_chat = template,
            AutoPromptKind::MemoryBoard => self.memory_board = template,
        }
    }
}

// ============================================================================
// Execution Plan
// ============================================================================

/// Kind of a plan item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanItemType {
    MiniPrompt,
    AutoPrompt,
    /// Stage marker; boundaries are carried by `stage_index` instead, so the
    /// builder never emits it
    Stage,
}

/// One executable step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlanItem {
    /// 0-based position in the whole plan, continuous across stages
    pub index: usize,

    #[serde(rename = "type")]
    pub item_type: PlanItemType,

    pub stage_index: usize,
    pub stage_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// True only for auto-prompt items
    pub is_auto_attached: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_prompt_type: Option<AutoPromptKind>,
}

/// The flattened, ordered steps of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub workflow_id: String,
    pub workflow_name: String,

    /// Workflow flag OR any stage flag
    pub include_multi_agent_chat: bool,

    pub total_steps: usize,
    pub items: Vec<ExecutionPlanItem>,
}

impl ExecutionPlan {
    /// Step at the given global index
    pub fn step(&self, index: usize) -> Option<&ExecutionPlanItem> {
        self.items.get(index)
    }
}
