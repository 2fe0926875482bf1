//! Liftoff Launcher
//!
//! Config-driven launch pipeline for lerobot training runs:
//! - Loading the YAML run configuration (`RunConfig`)
//! - Installing policy-specific extras
//! - Building and invoking the training command
//! - Uploading the resulting model to the Hugging Face Hub
//! - Tearing down the hosting Brev instance

pub mod accelerator;
pub mod command;
pub mod config;
pub mod error;
pub mod extras;
pub mod invoke;
pub mod output;
pub mod pipeline;
pub mod teardown;
pub mod upload;

pub use accelerator::{cuda_compute_capability, resolve_dtype};
pub use command::{build_train_command, TrainCommand};
pub use config::{resolve_config_path, workspace_root, RunConfig};
pub use error::{LaunchError, LaunchResult};
pub use extras::{install_command, install_policy_extras, ExtrasInstall};
pub use output::prepare_output_dir;
