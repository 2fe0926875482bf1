//! Training command construction.
//!
//! A deterministic mapping from the run config to the argument vector for
//! the lerobot training entry point. Flags are emitted in a fixed order so
//! two launches from the same config always produce the same command line.

use crate::config::RunConfig;
use std::fmt;
use std::path::PathBuf;

/// Default location of the lerobot checkout on a training instance.
pub const DEFAULT_LEROBOT_ROOT: &str = "/opt/lerobot";

const TRAIN_SCRIPT: &str = "src/lerobot/scripts/lerobot_train.py";

/// Resolves the lerobot checkout root, honoring `LIFTOFF_LEROBOT_ROOT`.
#[must_use]
pub fn lerobot_root() -> PathBuf {
    std::env::var("LIFTOFF_LEROBOT_ROOT")
        .map_or_else(|_| PathBuf::from(DEFAULT_LEROBOT_ROOT), PathBuf::from)
}

/// The training entry point as program-plus-leading-args.
///
/// `LIFTOFF_TRAIN_ENTRYPOINT` replaces the whole entry point (whitespace
/// split), which is how alternate installs and the integration tests point
/// the launcher at a different trainer.
#[must_use]
pub fn train_entrypoint() -> Vec<String> {
    if let Ok(custom) = std::env::var("LIFTOFF_TRAIN_ENTRYPOINT") {
        let parts: Vec<String> = custom.split_whitespace().map(str::to_string).collect();
        if !parts.is_empty() {
            return parts;
        }
    }
    vec![
        "python3".to_string(),
        lerobot_root().join(TRAIN_SCRIPT).display().to_string(),
    ]
}

/// A fully built training invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for TrainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Builds the training command from the config and an already-resolved dtype.
///
/// The groot policy configures its own precision, so its command line
/// carries no `--policy.dtype` flag at all.
#[must_use]
pub fn build_train_command(config: &RunConfig, dtype: &str) -> TrainCommand {
    let mut entry = train_entrypoint();
    let program = entry.remove(0);
    let mut args = entry;

    if let Some(repo_id) = &config.dataset.repo_id {
        args.push("--dataset.repo_id".to_string());
        args.push(repo_id.clone());
    }
    if let Some(kind) = &config.policy.kind {
        args.push("--policy.type".to_string());
        args.push(kind.clone());
    }
    if let Some(output_dir) = &config.output_dir {
        args.push("--output_dir".to_string());
        args.push(output_dir.clone());
    }
    if let Some(job_name) = &config.job_name {
        args.push("--job_name".to_string());
        args.push(job_name.clone());
    }

    args.push("--steps".to_string());
    args.push(config.steps.to_string());
    args.push("--batch_size".to_string());
    args.push(config.batch_size.to_string());

    if config.policy.kind.as_deref() != Some("groot") {
        args.push("--policy.dtype".to_string());
        args.push(dtype.to_string());
    }
    args.push("--policy.device".to_string());
    args.push(config.device.clone());

    args.push(format!("--wandb.enable={}", config.wandb.enable));

    if let Some(repo_id) = &config.policy.repo_id {
        args.push("--policy.repo_id".to_string());
        args.push(repo_id.clone());
    }
    if config.policy.push_to_hub {
        args.push("--policy.push_to_hub=true".to_string());
    }
    if let Some(path) = &config.policy.pretrained_path {
        args.push("--policy.pretrained_path".to_string());
        args.push(path.clone());
    }
    if config.policy.compile_model {
        args.push("--policy.compile_model=true".to_string());
    }
    if config.policy.gradient_checkpointing {
        args.push("--policy.gradient_checkpointing=true".to_string());
    }
    if config.resume {
        args.push("--resume=true".to_string());
    }

    TrainCommand { program, args }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    fn base_config(kind: &str) -> RunConfig {
        let mut config = RunConfig::default();
        config.policy.kind = Some(kind.to_string());
        config
    }

    fn rendered(config: &RunConfig, dtype: &str) -> String {
        build_train_command(config, dtype).to_string()
    }

    #[test]
    fn test_defaults_map_to_flags() {
        let command = rendered(&base_config("act"), "float16");
        assert!(command.contains("--policy.type act"));
        assert!(command.contains("--steps 3000"));
        assert!(command.contains("--batch_size 8"));
        assert!(command.contains("--policy.dtype float16"));
        assert!(command.contains("--policy.device cuda"));
        assert!(command.contains("--wandb.enable=true"));
        assert!(!command.contains("--resume"));
    }

    #[test]
    fn test_groot_omits_the_dtype_flag() {
        let command = rendered(&base_config("groot"), "bfloat16");
        assert!(!command.contains("--policy.dtype"));
        assert!(command.contains("--policy.device cuda"));
    }

    #[test]
    fn test_conditional_flags_appear_only_when_set() {
        let mut config = base_config("smolvla");
        let before = rendered(&config, "float16");
        assert!(!before.contains("--policy.push_to_hub"));
        assert!(!before.contains("--policy.compile_model"));
        assert!(!before.contains("--policy.gradient_checkpointing"));
        assert!(!before.contains("--policy.pretrained_path"));

        config.policy.repo_id = Some("user/model".to_string());
        config.policy.push_to_hub = true;
        config.policy.pretrained_path = Some("/ckpt/last".to_string());
        config.policy.compile_model = true;
        config.policy.gradient_checkpointing = true;
        config.resume = true;
        let after = rendered(&config, "float16");
        assert!(after.contains("--policy.repo_id user/model"));
        assert!(after.contains("--policy.push_to_hub=true"));
        assert!(after.contains("--policy.pretrained_path /ckpt/last"));
        assert!(after.contains("--policy.compile_model=true"));
        assert!(after.contains("--policy.gradient_checkpointing=true"));
        assert!(after.contains("--resume=true"));
    }

    #[test]
    fn test_wandb_can_be_disabled() {
        let mut config = base_config("act");
        config.wandb.enable = false;
        assert!(rendered(&config, "float16").contains("--wandb.enable=false"));
    }

    #[test]
    fn test_dataset_and_output_flags() {
        let mut config = base_config("act");
        config.dataset.repo_id = Some("lerobot/pusht".to_string());
        config.output_dir = Some("/workspace/outputs/run1".to_string());
        config.job_name = Some("pusht_act".to_string());
        let command = rendered(&config, "float16");
        assert!(command.contains("--dataset.repo_id lerobot/pusht"));
        assert!(command.contains("--output_dir /workspace/outputs/run1"));
        assert!(command.contains("--job_name pusht_act"));
    }

    #[test]
    fn test_flag_order_is_stable() {
        let config = base_config("act");
        assert_eq!(
            build_train_command(&config, "float16"),
            build_train_command(&config, "float16")
        );
    }
}
