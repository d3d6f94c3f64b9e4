//! Run output persistence

pub mod schema;

pub use schema::{RunOutput, RunRecord};

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// `output/run-<UTC timestamp>.json`
pub fn default_output_path(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(format!("run-{}.json", now.format("%Y%m%dT%H%M%SZ")))
}

/// Writes `output` as pretty-printed JSON, creating parent directories
pub async fn write_run_output(path: &Path, output: &RunOutput) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(output)?;
    tokio::fs::write(path, json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap();
        assert_eq!(
            default_output_path(now),
            PathBuf::from("output/run-20240501T093005Z.json")
        );
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/out.json");
        let output = RunOutput {
            thread_id: Some("t".to_string()),
            ci: None,
            fix_plan: None,
            runs: Vec::new(),
        };

        write_run_output(&path, &output).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"threadId\": \"t\""));
        let back: RunOutput = serde_json::from_str(&written).unwrap();
        assert_eq!(back, output);
    }
}
