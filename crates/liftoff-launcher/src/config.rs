//! Run configuration loading.
//!
//! A run is described by a single YAML file. Relative config paths resolve
//! against the workspace root (`/workspace` on a stock instance, overridable
//! via `LIFTOFF_WORKSPACE`). Unknown keys are tolerated so configs can carry
//! fields for other tools.

use crate::error::{LaunchError, LaunchResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Workspace root used on a stock training instance.
pub const DEFAULT_WORKSPACE_ROOT: &str = "/workspace";

/// Resolves the workspace root, honoring the `LIFTOFF_WORKSPACE` override.
#[must_use]
pub fn workspace_root() -> PathBuf {
    std::env::var("LIFTOFF_WORKSPACE")
        .map_or_else(|_| PathBuf::from(DEFAULT_WORKSPACE_ROOT), PathBuf::from)
}

/// Resolves a config path against the workspace root unless it is absolute.
#[must_use]
pub fn resolve_config_path(path: &Path, workspace_root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    pub repo_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Policy architecture identifier (e.g. "act", "smolvla", "groot").
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub repo_id: Option<String>,
    pub pretrained_path: Option<String>,
    #[serde(default)]
    pub push_to_hub: bool,
    #[serde(default)]
    pub compile_model: bool,
    #[serde(default)]
    pub gradient_checkpointing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WandbConfig {
    #[serde(default = "default_true")]
    pub enable: bool,
}

impl Default for WandbConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadConfig {
    #[serde(default)]
    pub enable: bool,
    pub repo_id: Option<String>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutoDeleteConfig {
    #[serde(default)]
    pub enable: bool,
    pub env_id: Option<String>,
}

/// The run configuration, read once per launch.
///
/// The only field rewritten after loading is `output_dir`, when the
/// requested directory already holds a previous run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    pub output_dir: Option<String>,
    pub job_name: Option<String>,
    #[serde(default = "default_steps")]
    pub steps: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    #[serde(default = "default_dtype")]
    pub dtype: String,
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default)]
    pub wandb: WandbConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub auto_delete: AutoDeleteConfig,
    #[serde(default)]
    pub resume: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            policy: PolicyConfig::default(),
            output_dir: None,
            job_name: None,
            steps: default_steps(),
            batch_size: default_batch_size(),
            dtype: default_dtype(),
            device: default_device(),
            wandb: WandbConfig::default(),
            upload: UploadConfig::default(),
            auto_delete: AutoDeleteConfig::default(),
            resume: false,
        }
    }
}

fn default_steps() -> u64 {
    3000
}

fn default_batch_size() -> u64 {
    8
}

fn default_dtype() -> String {
    "auto".to_string()
}

fn default_device() -> String {
    "cuda".to_string()
}

fn default_true() -> bool {
    true
}

impl RunConfig {
    /// Loads a run config from a YAML file.
    pub fn load(path: &Path) -> LaunchResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LaunchError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> LaunchResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// The declared policy type. Every launch requires one.
    pub fn policy_type(&self) -> LaunchResult<&str> {
        self.policy
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(LaunchError::MissingPolicyType)
    }
}
