//! Training subprocess invocation.

use crate::command::TrainCommand;
use crate::error::LaunchResult;
use tokio::process::Command;
use tracing::warn;

/// Runs the training command with inherited stdio and returns its exit code.
///
/// No retry: the launcher mirrors whatever the trainer decides. A process
/// killed by a signal reports no code and counts as failure.
pub async fn run_training(command: &TrainCommand) -> LaunchResult<i32> {
    let status = Command::new(&command.program)
        .args(&command.args)
        .status()
        .await?;
    match status.code() {
        Some(code) => Ok(code),
        None => {
            warn!("training process was terminated by a signal");
            Ok(1)
        }
    }
}
