//! The launch pipeline.
//!
//! Sequential, single pass. Two error tiers: config problems and the
//! training exit code are fatal; extras installation, upload, and teardown
//! log a warning and let the launch finish.

use crate::config::{self, RunConfig};
use crate::error::LaunchResult;
use crate::{accelerator, command, extras, invoke, output, teardown, upload};
use std::path::Path;
use tracing::{info, warn};

/// Runs the whole pipeline and returns the process exit code.
///
/// On success the code mirrors the training subprocess (0 included); config
/// and usage errors surface as `Err` and exit 1 at the CLI boundary.
pub async fn run(config_path: &Path, dry_run: bool) -> LaunchResult<i32> {
    let workspace_root = config::workspace_root();
    let config_path = config::resolve_config_path(config_path, &workspace_root);
    let mut config = RunConfig::load(&config_path)?;
    let policy_type = config.policy_type()?.to_string();

    let requested = config
        .output_dir
        .clone()
        .unwrap_or_else(|| workspace_root.join("outputs").display().to_string());
    let output_dir = output::prepare_output_dir(Path::new(&requested), config.resume)?;
    config.output_dir = Some(output_dir.display().to_string());

    let dtype = accelerator::resolve_dtype(&config.dtype, accelerator::cuda_compute_capability());
    let train_command = command::build_train_command(&config, &dtype);

    if dry_run {
        println!("{train_command}");
        return Ok(0);
    }

    extras::install_policy_extras(&policy_type, &command::lerobot_root()).await;

    info!("running training command: {train_command}");
    let code = invoke::run_training(&train_command).await?;
    if code != 0 {
        warn!("training exited with code {code}, skipping upload and teardown");
        return Ok(code);
    }
    info!("training finished successfully");

    if config.upload.enable {
        if let Err(e) = upload::push_to_hub(&config, &output_dir).await {
            warn!("model upload failed: {e}");
        }
    }

    if config.auto_delete.enable {
        if let Err(e) = teardown::delete_instance(&config).await {
            warn!("instance teardown failed: {e}");
        }
    }

    Ok(0)
}
