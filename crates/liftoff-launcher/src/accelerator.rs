//! Accelerator probing for dtype auto-detection.

use tracing::debug;

/// Queries the CUDA compute capability of the first visible GPU.
///
/// Returns `None` when `nvidia-smi` is missing, errors, or prints something
/// unparseable, which all mean "no usable accelerator" for our purposes.
#[must_use]
pub fn cuda_compute_capability() -> Option<f32> {
    let output = std::process::Command::new("nvidia-smi")
        .args(["--query-gpu=compute_cap", "--format=csv,noheader"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    let cap = text.lines().next()?.trim().parse::<f32>().ok()?;
    debug!("detected CUDA compute capability {cap}");
    Some(cap)
}

/// Resolves the dtype to pass to training.
///
/// Anything other than `"auto"` is taken verbatim. For `"auto"`, bfloat16
/// requires Ampere or newer (compute capability 8.0); everything else,
/// including no accelerator at all, falls back to float16.
#[must_use]
pub fn resolve_dtype(requested: &str, compute_cap: Option<f32>) -> String {
    if requested != "auto" {
        return requested.to_string();
    }
    match compute_cap {
        Some(cap) if cap >= 8.0 => "bfloat16".to_string(),
        _ => "float16".to_string(),
    }
}
