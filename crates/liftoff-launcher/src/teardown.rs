//! Instance teardown via the Brev CLI.
//!
//! Opt-in: deletes the cloud workspace that hosted the run once the model
//! is safely trained (and uploaded, when enabled). Missing credentials are
//! prompted for interactively; without a terminal the step is skipped with
//! a warning instead of blocking an unattended run.

use crate::config::RunConfig;
use crate::error::LaunchResult;
use anyhow::anyhow;
use std::io::{self, IsTerminal, Write};
use tokio::process::Command;
use tracing::{info, warn};

const BREV_INSTALL_URL: &str =
    "https://raw.githubusercontent.com/brevdev/brev-cli/main/bin/install-latest.sh";

fn brev_available() -> bool {
    std::process::Command::new("brev")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

async fn ensure_brev_installed() -> LaunchResult<()> {
    if brev_available() {
        return Ok(());
    }
    info!("brev CLI not found, installing");
    let status = Command::new("bash")
        .arg("-c")
        .arg(format!("curl -fsSL {BREV_INSTALL_URL} | bash"))
        .status()
        .await?;
    if !status.success() {
        return Err(anyhow!("brev CLI install script exited with {status}").into());
    }
    Ok(())
}

fn prompt_hidden(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    rpassword::read_password()
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;
    let line = line.trim().to_string();
    if line.is_empty() { None } else { Some(line) }
}

fn resolve_token() -> Option<String> {
    if let Ok(token) = std::env::var("BREV_TOKEN") {
        if !token.trim().is_empty() {
            return Some(token);
        }
    }
    if !io::stdin().is_terminal() {
        warn!("no BREV_TOKEN set and stdin is not a terminal, cannot prompt");
        return None;
    }
    prompt_hidden("Enter Brev API token: ")
}

fn resolve_env_id(config: &RunConfig) -> Option<String> {
    if let Some(env_id) = &config.auto_delete.env_id {
        if !env_id.trim().is_empty() {
            return Some(env_id.clone());
        }
    }
    if let Ok(env_id) = std::env::var("BREV_ENV_ID") {
        if !env_id.trim().is_empty() {
            return Some(env_id);
        }
    }
    if !io::stdin().is_terminal() {
        warn!("no Brev environment id available and stdin is not a terminal, cannot prompt");
        return None;
    }
    prompt_line("Enter Brev environment id: ")
}

/// Logs into Brev and deletes the workspace that hosted this run.
pub async fn delete_instance(config: &RunConfig) -> LaunchResult<()> {
    ensure_brev_installed().await?;

    let token = resolve_token()
        .ok_or_else(|| anyhow!("no Brev token available (set BREV_TOKEN)"))?;
    let env_id = resolve_env_id(config).ok_or_else(|| {
        anyhow!("no Brev environment id available (set auto_delete.env_id or BREV_ENV_ID)")
    })?;

    let login = Command::new("brev")
        .args(["login", "--token", token.as_str()])
        .status()
        .await?;
    if !login.success() {
        return Err(anyhow!("brev login exited with {login}").into());
    }

    info!("deleting instance {env_id}");
    let delete = Command::new("brev")
        .args(["delete", env_id.as_str()])
        .status()
        .await?;
    if !delete.success() {
        return Err(anyhow!("brev delete {env_id} exited with {delete}").into());
    }

    info!("instance {env_id} deleted");
    Ok(())
}
