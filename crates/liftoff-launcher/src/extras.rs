//! Policy extras installation.
//!
//! Each policy type maps to the pip command that installs its optional
//! dependencies. Failures here never abort a launch: a broken extras
//! install surfaces soon enough when training imports the policy.

use std::path::Path;
use tokio::process::Command;
use tracing::{info, warn};

/// Policy types this launcher knows how to prepare.
pub const KNOWN_POLICY_TYPES: &[&str] = &["act", "groot", "pi", "pi05", "smolvla", "xvla"];

/// How to install extras for a policy type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtrasInstall {
    /// Core lerobot is sufficient.
    None,
    /// Arguments for a `pip` invocation.
    Pip(Vec<String>),
}

/// Looks up the install command for a policy type.
///
/// Returns `None` for unknown policy types; the caller decides whether that
/// is fatal (it is not, for this launcher).
#[must_use]
pub fn install_command(policy_type: &str, lerobot_root: &Path) -> Option<ExtrasInstall> {
    let editable = |extra: &str| {
        ExtrasInstall::Pip(vec![
            "install".to_string(),
            "-e".to_string(),
            format!("{}[{extra}]", lerobot_root.display()),
        ])
    };

    match policy_type {
        "act" => Some(ExtrasInstall::None),
        "groot" => Some(ExtrasInstall::Pip(vec![
            "install".to_string(),
            "lerobot[groot]".to_string(),
        ])),
        "xvla" => Some(editable("xvla")),
        "smolvla" => Some(editable("smolvla")),
        // pi05 ships under the pi extra
        "pi" | "pi05" => Some(editable("pi")),
        _ => None,
    }
}

/// Installs extras for the given policy type. Warn-only: never fails the launch.
pub async fn install_policy_extras(policy_type: &str, lerobot_root: &Path) {
    info!("installing lerobot extras for policy type: {policy_type}");

    let Some(install) = install_command(policy_type, lerobot_root) else {
        warn!(
            "unknown policy type '{policy_type}', skipping extras installation (known: {})",
            KNOWN_POLICY_TYPES.join(", ")
        );
        return;
    };

    let args = match install {
        ExtrasInstall::None => {
            info!("policy '{policy_type}' needs no extras (core lerobot is sufficient)");
            return;
        }
        ExtrasInstall::Pip(args) => args,
    };

    info!("running: pip {}", args.join(" "));
    match Command::new("pip").args(&args).status().await {
        Ok(status) if status.success() => info!("policy extras installation complete"),
        Ok(status) => {
            warn!("extras install for '{policy_type}' exited with {status}, continuing anyway");
        }
        Err(e) => warn!("failed to run pip for '{policy_type}': {e}, continuing anyway"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("/opt/lerobot")
    }

    #[test]
    fn test_act_needs_no_install_command() {
        assert_eq!(install_command("act", &root()), Some(ExtrasInstall::None));
    }

    #[test]
    fn test_groot_installs_from_the_index() {
        assert_eq!(
            install_command("groot", &root()),
            Some(ExtrasInstall::Pip(vec![
                "install".to_string(),
                "lerobot[groot]".to_string()
            ]))
        );
    }

    #[test]
    fn test_editable_extras_point_at_the_lerobot_checkout() {
        let Some(ExtrasInstall::Pip(args)) = install_command("smolvla", &root()) else {
            panic!("expected a pip command");
        };
        assert_eq!(args, vec!["install", "-e", "/opt/lerobot[smolvla]"]);
    }

    #[test]
    fn test_pi05_shares_the_pi_extra() {
        assert_eq!(
            install_command("pi05", &root()),
            install_command("pi", &root())
        );
    }

    #[test]
    fn test_unknown_policy_type_has_no_command() {
        assert_eq!(install_command("diffusion3000", &root()), None);
    }
}
