//! Markdown rendering of execution plans

use crate::types::{ExecutionPlan, ExecutionPlanItem};

/// Render a plan as a Markdown report
///
/// A `## Stage N: <name>` heading is emitted each time the stage index
/// changes between consecutive items.
pub fn format_execution_plan(plan: &ExecutionPlan) -> String {
    let mut output = String::new();

    // Header
    output.push_str(&format!("# Execution Plan: {}\n\n", plan.workflow_name));
    output.push_str(&format!("- **Workflow ID:** {}\n", plan.workflow_id));
    output.push_str(&format!("- **Total Steps:** {}\n", plan.total_steps));
    output.push_str(&format!(
        "- **Multi-Agent Chat:** {}\n",
        if plan.include_multi_agent_chat {
            "enabled"
        } else {
            "disabled"
        }
    ));

    if plan.items.is_empty() {
        output.push_str("\n_This workflow has no steps._\n");
        return output;
    }

    let mut current_stage: Option<usize> = None;
    for item in &plan.items {
        if current_stage != Some(item.stage_index) {
            current_stage = Some(item.stage_index);
            output.push_str(&format!(
                "\n## Stage {}: {}\n\n",
                item.stage_index + 1,
                item.stage_name
            ));
        }
        output.push_str(&format_item_line(item));
        output.push('\n');
    }

    output
}

fn format_item_line(item: &ExecutionPlanItem) -> String {
    match item.auto_prompt_type {
        Some(kind) => format!("- Step {}: [{}] **{}**", item.index, kind.label(), item.name),
        None => match item.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => {
                format!("- Step {}: **{}** - {}", item.index, item.name, description)
            }
            None => format!("- Step {}: **{}**", item.index, item.name),
        },
    }
}

/// Render one step with its full content
///
/// `item` is expected to come from `plan`; the plan supplies the step count
/// and tells whether a next step exists.
pub fn format_step(plan: &ExecutionPlan, item: &ExecutionPlanItem) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "# Step {} of {}: {}\n\n",
        item.index + 1,
        plan.total_steps,
        item.name
    ));
    output.push_str(&format!("- **Workflow:** {}\n", plan.workflow_name));
    output.push_str(&format!(
        "- **Stage {}:** {}\n",
        item.stage_index + 1,
        item.stage_name
    ));
    match item.auto_prompt_type {
        Some(kind) => output.push_str(&format!("- **Type:** auto-prompt ({})\n", kind.label())),
        None => output.push_str("- **Type:** mini-prompt\n"),
    }
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("- **Description:** {}\n", description));
    }

    if let Some(content) = item.content.as_deref().filter(|c| !c.is_empty()) {
        output.push_str("\n## Instructions\n\n");
        output.push_str(content);
        if !content.ends_with('\n') {
            output.push('\n');
        }
    }

    output.push_str("\n---\n");
    if item.index + 1 < plan.total_steps {
        output.push_str(&format!("Next step index: {}\n", item.index + 1));
    } else {
        output.push_str("This is the last step of the plan.\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AutoPromptKind, PlanItemType};

    fn item(
        index: usize,
        stage_index: usize,
        name: &str,
        kind: Option<AutoPromptKind>,
    ) -> ExecutionPlanItem {
        ExecutionPlanItem {
            index,
            item_type: if kind.is_some() {
                PlanItemType::AutoPrompt
            } else {
                PlanItemType::MiniPrompt
            },
            stage_index,
            stage_name: format!("Stage {}", stage_index),
            name: name.to_string(),
            description: None,
            content: Some(format!("{} body", name)),
            is_auto_attached: kind.is_some(),
            auto_prompt_type: kind,
        }
    }

    fn plan(items: Vec<ExecutionPlanItem>) -> ExecutionPlan {
        ExecutionPlan {
            workflow_id: "wf-1".to_string(),
            workflow_name: "Ship Feature".to_string(),
            include_multi_agent_chat: true,
            total_steps: items.len(),
            items,
        }
    }

    #[test]
    fn test_one_heading_per_stage() {
        let mut first = item(0, 0, "Scope", None);
        first.description = Some("Define the scope".to_string());
        let plan = plan(vec![
            first,
            item(1, 0, "Memory Board", Some(AutoPromptKind::MemoryBoard)),
            item(2, 2, "Code", None),
            item(3, 2, "Multi-Agent Chat", Some(AutoPromptKind::MultiAgentChat)),
        ]);

        let text = format_execution_plan(&plan);

        assert!(text.starts_with("# Execution Plan: Ship Feature\n"));
        assert!(text.contains("- **Total Steps:** 4\n"));
        assert!(text.contains("- **Multi-Agent Chat:** enabled\n"));
        assert_eq!(text.matches("## Stage ").count(), 2);

        let first_heading = text.find("## Stage 1: Stage 0").unwrap();
        let second_heading = text.find("## Stage 3: Stage 2").unwrap();
        assert!(first_heading < second_heading);

        assert!(text.contains("- Step 0: **Scope** - Define the scope\n"));
        assert!(text.contains("- Step 1: [Review] **Memory Board**\n"));
        assert!(text.contains("- Step 3: [Coordination] **Multi-Agent Chat**\n"));
    }

    #[test]
    fn test_empty_plan() {
        let text = format_execution_plan(&plan(Vec::new()));
        assert!(text.contains("- **Total Steps:** 0\n"));
        assert!(text.contains("no steps"));
        assert!(!text.contains("## Stage"));
    }

    #[test]
    fn test_format_step() {
        let plan = plan(vec![
            item(0, 0, "Scope", None),
            item(1, 0, "Memory Board", Some(AutoPromptKind::MemoryBoard)),
        ]);

        let first = format_step(&plan, &plan.items[0]);
        assert!(first.starts_with("# Step 1 of 2: Scope\n"));
        assert!(first.contains("- **Type:** mini-prompt\n"));
        assert!(first.contains("Scope body\n"));
        assert!(first.contains("Next step index: 1\n"));

        let last = format_step(&plan, &plan.items[1]);
        assert!(last.contains("- **Type:** auto-prompt (Review)\n"));
        assert!(last.contains("last step"));
    }
}
