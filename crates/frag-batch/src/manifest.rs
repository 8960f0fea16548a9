use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the manifest inside the output directory.
pub const RUN_MANIFEST_FILE: &str = "run_manifest.json";

/// Outcome of one sink write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkRecord {
    pub name: String,
    pub path: String,
    /// "ok" or "error"
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SinkRecord {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// An asset left out of the results, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedAsset {
    pub asset_id: String,
    pub category: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub as_of_year: i32,
    pub input: String,
    /// Rows read from the snapshot
    pub num_rows: usize,
    /// Rows rejected while reading
    pub rejected_rows: usize,
    pub assessed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub sinks: Vec<SinkRecord>,
    pub skipped_assets: Vec<SkippedAsset>,
}

pub fn write_run_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(manifest).context("serializing run manifest to JSON")?;
    fs::write(path, json).with_context(|| format!("writing run manifest '{}'", path.display()))?;
    Ok(())
}

pub fn load_run_manifest(path: &Path) -> Result<RunManifest> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening run manifest '{}'", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing run manifest '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn manifest_writes_and_reads_back() {
        let manifest = RunManifest {
            run_id: "run-1".into(),
            version: "0.1.0".into(),
            created_at: Utc::now(),
            as_of_year: 2024,
            input: "assets.csv".into(),
            num_rows: 3,
            rejected_rows: 0,
            assessed: 2,
            skipped: 1,
            duration_ms: 12,
            sinks: vec![SinkRecord {
                name: "csv".into(),
                path: "out/fragility.csv".into(),
                status: "ok".into(),
                error: None,
            }],
            skipped_assets: vec![SkippedAsset {
                asset_id: "77".into(),
                category: "design-life".into(),
                reason: "adjusted design life is 0 yr".into(),
            }],
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(RUN_MANIFEST_FILE);
        write_run_manifest(&path, &manifest).unwrap();
        let parsed = load_run_manifest(&path).unwrap();
        assert_eq!(parsed.run_id, "run-1");
        assert_eq!(parsed.skipped_assets[0].asset_id, "77");
        assert!(parsed.sinks[0].is_ok());
    }
}
