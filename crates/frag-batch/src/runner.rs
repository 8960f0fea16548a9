use crate::manifest::{write_run_manifest, RunManifest, SinkRecord, SkippedAsset, RUN_MANIFEST_FILE};
use anyhow::{Context, Result};
use chrono::Utc;
use frag_algo::{AssetError, AssetReliability, FragilityModel};
use frag_core::{AssetRecord, Diagnostics};
use frag_io::{AssetSnapshot, ResultSink, RunOutput, WideTable};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Settings for one batch run over an asset snapshot.
pub struct BatchRunnerConfig {
    pub model: FragilityModel,
    pub sinks: Vec<Box<dyn ResultSink>>,
    /// Directory for `run_manifest.json`; no manifest when `None`
    pub manifest_dir: Option<PathBuf>,
    /// Input description recorded in the manifest
    pub input: String,
    /// Worker threads, 0 = one per CPU
    pub threads: usize,
}

/// What the run produced. The in-memory table is returned even when a sink fails.
pub struct BatchSummary {
    pub run_id: String,
    pub assessed: usize,
    pub skipped: usize,
    pub output: RunOutput,
    pub skipped_assets: Vec<SkippedAsset>,
    pub sinks: Vec<SinkRecord>,
    /// Load, assessment and precision issues for the whole run
    pub diagnostics: Diagnostics,
    pub manifest_path: Option<PathBuf>,
}

impl BatchSummary {
    pub fn failed_sinks(&self) -> impl Iterator<Item = &SinkRecord> {
        self.sinks.iter().filter(|s| !s.is_ok())
    }
}

/// Assess every asset in parallel, write all sinks, and record the manifest.
///
/// Sink and manifest failures end up in the summary's diagnostics. Only a
/// thread pool that cannot be built is an error.
pub fn run_batch(config: &BatchRunnerConfig, snapshot: AssetSnapshot) -> Result<BatchSummary> {
    let started = Instant::now();
    let run_id = Uuid::new_v4().to_string();
    let timestamp = Utc::now();

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for assessment")?;

    let AssetSnapshot {
        assets,
        diagnostics: load,
    } = snapshot;
    let num_rows = load.stats.rows;
    let rejected_rows = load.stats.skipped_rows;

    // indexed parallel collect keeps input order
    let results: Vec<Result<AssetReliability, AssetError>> = pool.install(|| {
        assets
            .par_iter()
            .map(|asset| config.model.assess(asset))
            .collect()
    });
    info!(
        assets = assets.len(),
        threads = thread_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "assessment complete"
    );

    let mut diagnostics = load.issues;
    let mut assessed: Vec<(AssetRecord, AssetReliability)> = Vec::with_capacity(assets.len());
    let mut skipped_assets = Vec::new();
    for (asset, result) in assets.into_iter().zip(results) {
        match result {
            Ok(reliability) => assessed.push((asset, reliability)),
            Err(err) => {
                warn!(asset = %asset.id, "skipping asset: {err}");
                diagnostics.add_error_with_entity(err.category(), &err.to_string(), &asset.entity());
                skipped_assets.push(SkippedAsset {
                    asset_id: err.asset_id().to_string(),
                    category: err.category().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let table = WideTable::build(
        assessed.iter().map(|(a, r)| (a, r)),
        &config.model.constants().sweep,
        timestamp,
    );
    diagnostics.merge(table.warnings.clone());
    let output = RunOutput {
        table,
        assessed,
        timestamp,
    };

    let sinks: Vec<SinkRecord> = config
        .sinks
        .iter()
        .map(|sink| write_sink(sink.as_ref(), &output, &mut diagnostics))
        .collect();

    let assessed_count = output.assessed.len();
    let skipped = skipped_assets.len();
    let duration_ms = started.elapsed().as_millis() as u64;
    info!(
        assessed = assessed_count,
        skipped,
        elapsed_ms = duration_ms,
        "batch run finished"
    );

    let manifest_path = match &config.manifest_dir {
        Some(dir) => {
            let manifest = RunManifest {
                run_id: run_id.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: timestamp,
                as_of_year: config.model.as_of_year(),
                input: config.input.clone(),
                num_rows,
                rejected_rows,
                assessed: assessed_count,
                skipped,
                duration_ms,
                sinks: sinks.clone(),
                skipped_assets: skipped_assets.clone(),
            };
            let path = dir.join(RUN_MANIFEST_FILE);
            match write_run_manifest(&path, &manifest) {
                Ok(()) => Some(path),
                Err(err) => {
                    let message = format!("{err:#}");
                    warn!(path = %path.display(), "manifest not written: {message}");
                    diagnostics.add_error_with_entity("sink", &message, "manifest");
                    None
                }
            }
        }
        None => None,
    };

    Ok(BatchSummary {
        run_id,
        assessed: assessed_count,
        skipped,
        output,
        skipped_assets,
        sinks,
        diagnostics,
        manifest_path,
    })
}

fn write_sink(sink: &dyn ResultSink, output: &RunOutput, diagnostics: &mut Diagnostics) -> SinkRecord {
    let path = sink.path().display().to_string();
    let (status, error) = match sink.write(output) {
        Ok(()) => {
            info!(sink = sink.name(), path = %path, "wrote results");
            ("ok".to_string(), None)
        }
        Err(err) => {
            let message = format!("{err:#}");
            warn!(sink = sink.name(), path = %path, "sink failed: {message}");
            diagnostics.add_error_with_entity("sink", &message, sink.name());
            ("error".to_string(), Some(message))
        }
    };
    SinkRecord {
        name: sink.name().to_string(),
        path,
        status,
        error,
    }
}
