//! Liftoff CLI - config-driven launcher for lerobot training runs.
//!
//! Reads a YAML run config, installs policy extras, invokes the training
//! entry point, and mirrors its exit code. Upload and instance teardown
//! run afterwards when enabled, and never change the exit status.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Launch a lerobot training run from a YAML config.
#[derive(Parser, Debug)]
#[command(
    name = "liftoff",
    author,
    version,
    about = "Launch lerobot training runs from a YAML config"
)]
struct Args {
    /// Path to the run config YAML file (relative paths resolve against the
    /// workspace root)
    #[arg(short, long)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the training command without running anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber =
        FmtSubscriber::builder().with_max_level(level).without_time().with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match liftoff_launcher::pipeline::run(&args.config, args.dry_run).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
