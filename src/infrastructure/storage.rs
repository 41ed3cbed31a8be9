use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::error::Result;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Files written by one run, all sharing the run's timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutputs {
    pub approved_ledger: PathBuf,
    pub merged: PathBuf,
    pub unmatched: PathBuf,
}

impl RunOutputs {
    pub fn new(output_dir: &Path, started_at: &DateTime<Local>) -> Self {
        let timestamp = started_at.format(TIMESTAMP_FORMAT).to_string();
        Self {
            approved_ledger: output_path(output_dir, "approved_npo_data", &timestamp, "csv"),
            merged: output_path(output_dir, "output", &timestamp, "csv"),
            unmatched: output_path(output_dir, "unmatched", &timestamp, "json"),
        }
    }

    /// Create the output directory and resolve the run's file names
    pub fn prepare(output_dir: &Path, started_at: &DateTime<Local>) -> std::io::Result<Self> {
        ensure_dir(output_dir)?;
        Ok(Self::new(output_dir, started_at))
    }
}

pub fn output_path(output_dir: &Path, prefix: &str, timestamp: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}_{}.{}", prefix, timestamp, extension))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_run_outputs_share_timestamp() {
        let started_at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let outputs = RunOutputs::new(Path::new("output"), &started_at);
        assert_eq!(
            outputs.approved_ledger,
            PathBuf::from("output/approved_npo_data_20240309070501.csv")
        );
        assert_eq!(outputs.merged, PathBuf::from("output/output_20240309070501.csv"));
        assert_eq!(outputs.unmatched, PathBuf::from("output/unmatched_20240309070501.json"));
    }

    #[test]
    fn test_prepare_creates_directory_and_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("nested").join("output");
        let outputs = RunOutputs::prepare(&output_dir, &Local::now()).unwrap();
        assert!(output_dir.is_dir());

        write_json(&outputs.unmatched, &["1234567890123", "法人名"]).unwrap();
        let written: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&outputs.unmatched).unwrap()).unwrap();
        assert_eq!(written, vec!["1234567890123", "法人名"]);
    }
}
