//! Result sinks.
//!
//! A run may write to several sinks. Each write is independent; the batch
//! runner records a failing sink and carries on with the others.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use frag_algo::AssetReliability;
use frag_core::AssetRecord;
use serde::Serialize;

use crate::table::{run_stamp, WideTable};

/// Everything a sink may need from one run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: WideTable,
    /// Assessed assets paired with their results, in input order
    pub assessed: Vec<(AssetRecord, AssetReliability)>,
    pub timestamp: DateTime<Utc>,
}

/// Destination for run results.
pub trait ResultSink: Send + Sync {
    /// Short name used in logs and the run manifest.
    fn name(&self) -> &str;

    fn path(&self) -> &Path;

    fn write(&self, output: &RunOutput) -> Result<()>;
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    let file =
        File::create(path).with_context(|| format!("creating output file {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// The wide table as a flat CSV file.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, output: &RunOutput) -> Result<()> {
        let mut writer = csv::Writer::from_writer(create(&self.path)?);
        writer.write_record(&output.table.headers)?;
        for row in &output.table.rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(flatten)]
    result: &'a AssetReliability,
    datetime: String,
}

/// One JSON object per asset with the structured curve.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for JsonLinesSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, output: &RunOutput) -> Result<()> {
        let mut writer = create(&self.path)?;
        let datetime = run_stamp(output.timestamp);
        for (record, result) in &output.assessed {
            let line = JsonLine {
                attributes: record
                    .attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
                result,
                datetime: datetime.clone(),
            };
            serde_json::to_writer(&mut writer, &line)?;
            writer.write_all(b"\n")?;
        }
        writer
            .flush()
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
