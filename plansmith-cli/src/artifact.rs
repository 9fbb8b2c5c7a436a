//! Report artifact writing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};

/// The deterministic artifact path for a plan name.
#[must_use]
pub fn report_path(dir: &Path, plan_name: &str) -> PathBuf {
    dir.join(format!("{plan_name} Report.md"))
}

/// Write a generated report to its artifact file.
///
/// Refuses empty content; a claimed report with nothing in it must never
/// reach disk.
pub fn write_report(dir: &Path, plan_name: &str, content: &str) -> Result<PathBuf> {
    ensure!(
        !content.trim().is_empty(),
        "refusing to write an empty report for '{plan_name}'"
    );

    let path = report_path(dir, plan_name);
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "plansmith-artifact-{tag}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_deterministic_path() {
        let path = report_path(Path::new("/out"), "Northwind Standard");
        assert_eq!(path, PathBuf::from("/out/Northwind Standard Report.md"));
    }

    #[test]
    fn test_writes_content() {
        let dir = temp_dir("write");
        let path = write_report(&dir, "Northwind Standard", "# Report\nExclusions...").unwrap();

        assert_eq!(path, report_path(&dir, "Northwind Standard"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Report\nExclusions..."
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_refuses_empty_content() {
        let dir = temp_dir("empty");
        assert!(write_report(&dir, "Northwind Standard", "  \n").is_err());
        assert!(!report_path(&dir, "Northwind Standard").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
