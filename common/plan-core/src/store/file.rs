//! File-backed workflow store
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/workflows/<workflow-id>.toml
//! <root>/templates/*.toml
//! ```
//!
//! Templates are matched by their `name` against the fixed display name of
//! each auto-prompt kind. Files are re-read on every call.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::WorkflowStore;
use crate::error::{PlanError, PlanResult};
use crate::types::{AutoPromptKind, AutoPromptTemplate, Workflow, WorkflowSummary};

/// Store reading TOML files from a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn workflows_dir(&self) -> PathBuf {
        self.root.join("workflows")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    fn workflow_path(&self, id: &str) -> Option<PathBuf> {
        // Ids map straight to file names, so anything that could escape the
        // directory is treated as unknown.
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\']);
        valid.then(|| self.workflows_dir().join(format!("{}.toml", id)))
    }
}

/// Parse a workflow file and sort it into store order
fn parse_workflow(path: &Path, content: &str) -> PlanResult<Workflow> {
    let mut workflow: Workflow = toml::from_str(content)
        .map_err(|e| PlanError::ParseError(format!("{}: {}", path.display(), e)))?;
    workflow.normalize_ordering();
    Ok(workflow)
}

/// Read a file, mapping "not found" to `None`
async fn read_optional(path: &Path) -> PlanResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PlanError::IoError(format!("{}: {}", path.display(), e))),
    }
}

/// Sorted `.toml` files in a directory; a missing directory is empty
async fn toml_files(dir: &Path) -> PlanResult<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PlanError::IoError(format!("{}: {}", dir.display(), e))),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[async_trait]
impl WorkflowStore for FileStore {
    async fn load_workflow(&self, id: &str) -> PlanResult<Option<Workflow>> {
        let Some(path) = self.workflow_path(id) else {
            return Ok(None);
        };
        let Some(content) = read_optional(&path).await? else {
            return Ok(None);
        };

        let workflow = parse_workflow(&path, &content)?;
        if workflow.id != id {
            return Err(PlanError::ParseError(format!(
                "{}: workflow id '{}' does not match file name",
                path.display(),
                workflow.id
            )));
        }

        Ok(Some(workflow))
    }

    async fn load_template(&self, kind: AutoPromptKind) -> PlanResult<Option<AutoPromptTemplate>> {
        for path in toml_files(&self.templates_dir()).await? {
            let Some(content) = read_optional(&path).await? else {
                continue;
            };
            match toml::from_str::<AutoPromptTemplate>(&content) {
                Ok(template) if template.name == kind.template_name() => return Ok(Some(template)),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Skipping invalid template {:?}: {}", path, e);
                }
            }
        }

        Ok(None)
    }

    async fn list_workflows(&self) -> PlanResult<Vec<WorkflowSummary>> {
        let mut summaries = Vec::new();

        for path in toml_files(&self.workflows_dir()).await? {
            let Some(content) = read_optional(&path).await? else {
                continue;
            };
            match parse_workflow(&path, &content) {
                Ok(workflow) => summaries.push(WorkflowSummary::from(&workflow)),
                Err(e) => {
                    tracing::warn!("Skipping invalid workflow: {}", e);
                }
            }
        }

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WORKFLOW: &str = r#"
        id = "ship"
        name = "Ship Feature"

        [[stages]]
        id = "build"
        name = "Build"
        order = 2
        include_multi_agent_chat = true

        [[stages.mini_prompts]]
        order = 1
        id = "tests"
        name = "Write tests"
        content = "Write tests."

        [[stages.mini_prompts]]
        order = 0
        id = "code"
        name = "Write code"
        content = "Write code."

        [[stages]]
        id = "plan"
        name = "Plan"
        order = 1
        with_review = true
    "#;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_load_workflow_sorts_by_order() {
        let (_dir, store) = store_with(&[("workflows/ship.toml", WORKFLOW)]);

        let workflow = store.load_workflow("ship").await.unwrap().unwrap();
        assert_eq!(workflow.stages[0].id, "plan");
        assert_eq!(workflow.stages[1].mini_prompts[0].mini_prompt.id, "code");
    }

    #[tokio::test]
    async fn test_missing_and_unsafe_ids() {
        let (_dir, store) = store_with(&[("workflows/ship.toml", WORKFLOW)]);

        assert!(store.load_workflow("nope").await.unwrap().is_none());
        assert!(store.load_workflow("../ship").await.unwrap().is_none());
        assert!(store.load_workflow("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mismatched_id_is_error() {
        let (_dir, store) = store_with(&[("workflows/other.toml", WORKFLOW)]);

        let result = store.load_workflow("other").await;
        assert!(matches!(result, Err(PlanError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_malformed_workflow_names_its_file() {
        let (_dir, store) = store_with(&[("workflows/broken.toml", "name = ")]);

        match store.load_workflow("broken").await {
            Err(PlanError::ParseError(message)) => {
                assert!(message.contains("broken.toml"), "{}", message);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_skips_invalid_files() {
        let (_dir, store) = store_with(&[
            ("workflows/ship.toml", WORKFLOW),
            ("workflows/broken.toml", "name = "),
            ("workflows/notes.txt", "ignored"),
        ]);

        let listed = store.list_workflows().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "ship");
        assert_eq!(listed[0].stage_count, 2);
    }

    #[tokio::test]
    async fn test_templates_by_display_name() {
        let (_dir, store) = store_with(&[
            (
                "templates/board.toml",
                "name = \"Memory Board\"\ncontent = \"Write a handoff note.\"\n",
            ),
            ("templates/other.toml", "name = \"Something Else\"\n"),
        ]);

        let board = store
            .load_template(AutoPromptKind::MemoryBoard)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(board.content, "Write a handoff note.");
        assert!(store
            .load_template(AutoPromptKind::MultiAgentChat)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_root() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("does-not-exist"));

        assert!(store.list_workflows().await.unwrap().is_empty());
        assert!(store
            .load_template(AutoPromptKind::MemoryBoard)
            .await
            .unwrap()
            .is_none());
    }
}
