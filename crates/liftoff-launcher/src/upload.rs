//! Model upload to the Hugging Face Hub.
//!
//! Runs only after a successful training exit. Delegates to the `hf` CLI
//! (create-then-upload); `HF_TOKEN` is inherited by the child when set.
//! Upload problems never change the launch's exit status.

use crate::config::RunConfig;
use crate::error::LaunchResult;
use anyhow::anyhow;
use std::path::Path;
use tokio::process::Command;
use tracing::{info, warn};

/// Patterns excluded from the uploaded tree (VCS and cache artifacts).
pub const UPLOAD_EXCLUDES: &[&str] = &[".git/*", ".cache/*", "__pycache__/*", "wandb/*"];

/// Whether a string looks like a hub repo id (`namespace/name`) rather than
/// a local path placeholder.
#[must_use]
pub fn is_hub_repo_id(value: &str) -> bool {
    let mut parts = value.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(namespace), Some(name), None) => {
            !namespace.is_empty() && !name.is_empty() && !namespace.starts_with('.')
        }
        _ => false,
    }
}

/// Turns a job name into a usable hub repo name, or `None` if nothing
/// survives sanitization.
#[must_use]
pub fn sanitize_repo_name(name: &str) -> Option<String> {
    let mut out = String::new();
    for ch in name.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches(|c: char| c == '-' || c == '.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolves the target repo id: explicit `upload.repo_id`, else the policy
/// repo id when it is hub-shaped, else the sanitized job name.
#[must_use]
pub fn resolve_upload_repo(config: &RunConfig) -> Option<String> {
    if let Some(repo_id) = &config.upload.repo_id {
        if !repo_id.trim().is_empty() {
            return Some(repo_id.clone());
        }
    }
    if let Some(repo_id) = &config.policy.repo_id {
        if is_hub_repo_id(repo_id) {
            return Some(repo_id.clone());
        }
    }
    config.job_name.as_deref().and_then(sanitize_repo_name)
}

/// Creates the target repo if absent and uploads the output directory tree.
pub async fn push_to_hub(config: &RunConfig, output_dir: &Path) -> LaunchResult<()> {
    let repo_id = resolve_upload_repo(config).ok_or_else(|| {
        anyhow!("no upload repo id could be resolved (set upload.repo_id or job_name)")
    })?;

    info!("uploading {} to {repo_id}", output_dir.display());

    let mut create = Command::new("hf");
    create.args(["repo", "create", repo_id.as_str(), "--repo-type", "model", "-y"]);
    if config.upload.private {
        create.arg("--private");
    }
    match create.status().await {
        // A nonzero exit usually means the repo already exists; the upload
        // itself will tell us if something is actually wrong.
        Ok(status) if status.success() => {}
        Ok(status) => warn!("hf repo create exited with {status}, attempting upload anyway"),
        Err(e) => return Err(anyhow!("failed to run the hf CLI: {e}").into()),
    }

    let mut upload = Command::new("hf");
    upload
        .args(["upload", repo_id.as_str()])
        .arg(output_dir)
        .args(["--repo-type", "model"]);
    for pattern in UPLOAD_EXCLUDES {
        upload.args(["--exclude", pattern]);
    }
    let status = upload
        .status()
        .await
        .map_err(|e| anyhow!("failed to run the hf CLI: {e}"))?;
    if !status.success() {
        return Err(anyhow!("hf upload exited with {status}").into());
    }

    info!("upload complete: https://huggingface.co/{repo_id}");
    Ok(())
}
