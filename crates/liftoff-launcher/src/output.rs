//! Output directory layout.

use crate::error::LaunchResult;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ensures the run's output directory exists and is safe to write into.
///
/// A fresh or empty directory is used as-is, as is any directory when
/// resuming. A non-empty directory on a non-resume run would clobber a
/// previous run's artifacts, so the run is moved to a timestamp-suffixed
/// sibling (`<dir>_<YYYYmmdd_HHMMSS>`, then `_2`, `_3`... if needed).
pub fn prepare_output_dir(requested: &Path, resume: bool) -> LaunchResult<PathBuf> {
    if !requested.exists() {
        std::fs::create_dir_all(requested)?;
        return Ok(requested.to_path_buf());
    }
    if resume || is_empty_dir(requested)? {
        return Ok(requested.to_path_buf());
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let base = format!("{}_{stamp}", requested.display());
    let mut candidate = PathBuf::from(&base);
    let mut n = 2;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{base}_{n}"));
        n += 1;
    }
    std::fs::create_dir_all(&candidate)?;
    info!(
        "output directory {} already holds a run, using {}",
        requested.display(),
        candidate.display()
    );
    Ok(candidate)
}

fn is_empty_dir(path: &Path) -> LaunchResult<bool> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dir_is_created() {
        let tmp = TempDir::new().unwrap();
        let requested = tmp.path().join("outputs/run1");
        let result = prepare_output_dir(&requested, false).unwrap();
        assert_eq!(result, requested);
        assert!(requested.is_dir());
    }

    #[test]
    fn test_empty_dir_is_reused() {
        let tmp = TempDir::new().unwrap();
        let requested = tmp.path().join("run1");
        std::fs::create_dir(&requested).unwrap();
        assert_eq!(prepare_output_dir(&requested, false).unwrap(), requested);
    }

    #[test]
    fn test_non_empty_dir_gets_a_timestamp_suffix() {
        let tmp = TempDir::new().unwrap();
        let requested = tmp.path().join("run1");
        std::fs::create_dir(&requested).unwrap();
        std::fs::write(requested.join("checkpoint.safetensors"), b"x").unwrap();

        let result = prepare_output_dir(&requested, false).unwrap();
        assert_ne!(result, requested);
        assert!(result.is_dir());
        let name = result.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("run1_"), "unexpected name: {name}");
        assert!(name.len() > "run1_".len());
    }

    #[test]
    fn test_suffix_collisions_get_a_counter() {
        let tmp = TempDir::new().unwrap();
        let requested = tmp.path().join("run1");
        std::fs::create_dir(&requested).unwrap();
        std::fs::write(requested.join("marker"), b"x").unwrap();

        let first = prepare_output_dir(&requested, false).unwrap();
        // Same second, same stamp: the next call must still find a free path.
        let second = prepare_output_dir(&requested, false).unwrap();
        assert_ne!(first, second);
        assert!(second.is_dir());
    }

    #[test]
    fn test_resume_keeps_a_non_empty_dir() {
        let tmp = TempDir::new().unwrap();
        let requested = tmp.path().join("run1");
        std::fs::create_dir(&requested).unwrap();
        std::fs::write(requested.join("checkpoint.safetensors"), b"x").unwrap();
        assert_eq!(prepare_output_dir(&requested, true).unwrap(), requested);
    }
}
