//! Per-stage item ordering
//!
//! A stage either carries a persisted custom order (from drag-and-drop in the
//! editor) or falls back to the default interleaving:
//!
//! - **Custom**: stored keys are parsed into [`ItemKey`]s, replayed against the
//!   stage's current candidates, and any candidate the stored order does not
//!   mention is appended in candidate order.
//! - **Default**: every mini-prompt in persisted order, each followed by the
//!   coordination prompt when enabled, then one review prompt at the end.
//!
//! Auto-prompt keys are scoped to a stage id (`memory-board-<stageId>`), and
//! stage ids can change between save cycles. Parsing a stored key only looks
//! at its prefix, so a key saved under an old stage id still resolves to the
//! current stage's auto-prompt.

use std::collections::{HashMap, HashSet};

use crate::types::{AutoPromptKind, AutoPromptTemplate, AutoPromptTemplates, MiniPrompt, Stage};

/// Identity of an item within one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey<'a> {
    /// Mini-prompt, by its id
    MiniPrompt(&'a str),
    /// Auto-prompt of the current stage
    AutoPrompt(AutoPromptKind),
}

impl<'a> ItemKey<'a> {
    /// Parse a stored order entry
    ///
    /// Any entry carrying an auto-prompt prefix maps onto that kind,
    /// whatever stage id follows the prefix.
    pub fn parse(entry: &'a str) -> Self {
        match AutoPromptKind::from_key(entry) {
            Some(kind) => ItemKey::AutoPrompt(kind),
            None => ItemKey::MiniPrompt(entry),
        }
    }

    /// Canonical stored form of this key for the given stage
    pub fn to_stored(&self, stage_id: &str) -> String {
        match self {
            ItemKey::MiniPrompt(id) => (*id).to_string(),
            ItemKey::AutoPrompt(kind) => kind.scoped_key(stage_id),
        }
    }
}

/// A resolved stage item, borrowed from the aggregate or the templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageItem<'a> {
    MiniPrompt(&'a MiniPrompt),
    AutoPrompt(AutoPromptKind, &'a AutoPromptTemplate),
}

impl<'a> StageItem<'a> {
    pub fn key(&self) -> ItemKey<'a> {
        match self {
            StageItem::MiniPrompt(prompt) => ItemKey::MiniPrompt(prompt.id.as_str()),
            StageItem::AutoPrompt(kind, _) => ItemKey::AutoPrompt(*kind),
        }
    }
}

/// Insertion-ordered candidate set of one stage
struct Candidates<'a> {
    entries: Vec<StageItem<'a>>,
    positions: HashMap<ItemKey<'a>, usize>,
}

impl<'a> Candidates<'a> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Insert unless the key is already present; the first entry wins
    fn insert(&mut self, item: StageItem<'a>) {
        let key = item.key();
        if !self.positions.contains_key(&key) {
            self.positions.insert(key, self.entries.len());
            self.entries.push(item);
        }
    }

    fn get(&self, key: &ItemKey<'a>) -> Option<StageItem<'a>> {
        self.positions.get(key).map(|&pos| self.entries[pos])
    }

    /// Collect the candidates of a stage under a stored order
    ///
    /// An auto-prompt is a candidate when its template exists and either the
    /// stage flag is on or the stored order already mentions that kind. The
    /// second condition keeps a previously placed auto-prompt in the plan
    /// after its flag was switched off without the order being re-saved.
    fn collect(
        stage: &'a Stage,
        templates: &'a AutoPromptTemplates,
        stored: &'a [String],
    ) -> Self {
        let mut candidates =
            Self::with_capacity(stage.mini_prompts.len() + AutoPromptKind::ALL.len());

        for entry in &stage.mini_prompts {
            candidates.insert(StageItem::MiniPrompt(&entry.mini_prompt));
        }

        for kind in AutoPromptKind::ALL {
            let Some(template) = templates.get(kind) else {
                continue;
            };
            let previously_ordered = stored
                .iter()
                .any(|entry| ItemKey::parse(entry) == ItemKey::AutoPrompt(kind));
            if stage.auto_prompt_enabled(kind) || previously_ordered {
                candidates.insert(StageItem::AutoPrompt(kind, template));
            }
        }

        candidates
    }
}

/// Resolve the ordered items of one stage
pub fn stage_items<'a>(
    stage: &'a Stage,
    templates: &'a AutoPromptTemplates,
) -> Vec<StageItem<'a>> {
    match stage.item_order.as_deref() {
        Some(stored) if !stored.is_empty() => custom_order(stage, templates, stored),
        _ => default_order(stage, templates),
    }
}

/// Canonical stored keys for the resolved order of a custom-ordered stage
///
/// Lets a caller write back a migrated order (stale stage ids rewritten,
/// dangling entries dropped, new items appended). Returns `None` for a stage
/// without a stored order, whose default layout may repeat the coordination
/// prompt and so has no key-per-item form.
pub fn normalized_item_order(
    stage: &Stage,
    templates: &AutoPromptTemplates,
) -> Option<Vec<String>> {
    let stored = stage.item_order.as_deref().filter(|order| !order.is_empty())?;
    Some(
        custom_order(stage, templates, stored)
            .iter()
            .map(|item| item.key().to_stored(&stage.id))
            .collect(),
    )
}

fn custom_order<'a>(
    stage: &'a Stage,
    templates: &'a AutoPromptTemplates,
    stored: &'a [String],
) -> Vec<StageItem<'a>> {
    let candidates = Candidates::collect(stage, templates, stored);
    let mut placed = HashSet::with_capacity(candidates.entries.len());
    let mut items = Vec::with_capacity(candidates.entries.len());

    // Replay the stored order, skipping keys that no longer resolve and
    // repeats (two stale keys can fold onto the same auto-prompt).
    for key in stored.iter().map(|entry| ItemKey::parse(entry)) {
        if let Some(item) = candidates.get(&key) {
            if placed.insert(key) {
                items.push(item);
            }
        }
    }

    let before = items.len();
    for item in &candidates.entries {
        if !placed.contains(&item.key()) {
            items.push(*item);
        }
    }

    if items.len() > before {
        tracing::debug!(
            stage_id = %stage.id,
            appended = items.len() - before,
            "Appended items missing from stored order"
        );
    }

    items
}

fn default_order<'a>(stage: &'a Stage, templates: &'a AutoPromptTemplates) -> Vec<StageItem<'a>> {
    let enabled = |kind: AutoPromptKind| {
        templates
            .get(kind)
            .filter(|_| stage.auto_prompt_enabled(kind))
            .map(|template| StageItem::AutoPrompt(kind, template))
    };
    let coordination = enabled(AutoPromptKind::MultiAgentChat);

    let mut items = Vec::with_capacity(stage.mini_prompts.len() * 2 + 1);
    for entry in &stage.mini_prompts {
        items.push(StageItem::MiniPrompt(&entry.mini_prompt));
        if let Some(item) = coordination {
            items.push(item);
        }
    }

    if let Some(item) = enabled(AutoPromptKind::MemoryBoard) {
        items.push(item);
    }

    items
}
