//! Configuration loading for workflow-plan-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable WORKFLOW_PLAN_CONFIG_PATH
//! 2. ~/.workflow-plan-mcp/config.toml
//! 3. Default values
//!
//! WORKFLOW_PLAN_STORE overrides the store root in all cases.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::params::OutputFormat;

const CONFIG_PATH_ENV: &str = "WORKFLOW_PLAN_CONFIG_PATH";
const STORE_ROOT_ENV: &str = "WORKFLOW_PLAN_STORE";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Workflow store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Plan output configuration
    #[serde(default)]
    pub plan: PlanConfig,
}

/// Where workflows and templates are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory holding `workflows/` and `templates/`
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

/// Plan output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Format used when a tool call does not specify one
    #[serde(default)]
    pub default_format: OutputFormat,
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".workflow-plan-mcp")
}

fn default_store_root() -> PathBuf {
    app_dir()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_dir().join("config.toml"));

        let mut config = Self::load_from(&path)?;

        // Store root from environment (highest priority)
        if let Ok(root) = std::env::var(STORE_ROOT_ENV) {
            config.store.root = PathBuf::from(root);
        }

        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}
