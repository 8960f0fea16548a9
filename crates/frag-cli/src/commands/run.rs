use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use frag_batch::{run_batch, BatchRunnerConfig};
use frag_cli::ModelArgs;
use frag_io::{read_assets, CsvSink, JsonLinesSink, ResultSink};
use tracing::{info, warn};

use crate::commands::util::{build_model, parse_threads};

/// Handle `frag run`: assess a snapshot, write the sinks and the run manifest.
pub fn handle(
    assets: &Path,
    out: &Path,
    jsonl: Option<&Path>,
    model_args: &ModelArgs,
    threads: &str,
) -> Result<()> {
    let start = Instant::now();
    let model = build_model(model_args)?;
    let snapshot = read_assets(assets)?;
    for issue in snapshot.diagnostics.issues.errors() {
        warn!("{issue}");
    }

    let mut sinks: Vec<Box<dyn ResultSink>> = vec![Box::new(CsvSink::new(out))];
    if let Some(path) = jsonl {
        sinks.push(Box::new(JsonLinesSink::new(path)));
    }
    let manifest_dir = out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = BatchRunnerConfig {
        model,
        sinks,
        manifest_dir: Some(manifest_dir.clone()),
        input: assets.display().to_string(),
        threads: parse_threads(threads),
    };
    let summary = run_batch(&config, snapshot)?;
    info!(
        "run {} finished in {:.2}s ({})",
        summary.run_id,
        start.elapsed().as_secs_f64(),
        summary.diagnostics.summary()
    );

    println!(
        "Assessed {} assets, skipped {}",
        summary.assessed, summary.skipped
    );
    for skipped in &summary.skipped_assets {
        println!("  skipped {}: {}", skipped.asset_id, skipped.reason);
    }
    for sink in &summary.sinks {
        println!("  {} -> {} [{}]", sink.name, sink.path, sink.status);
    }
    match &summary.manifest_path {
        Some(path) => println!("Recorded run manifest {}", path.display()),
        None => println!("  manifest -> not written"),
    }

    let failed = summary.failed_sinks().count();
    if failed > 0 {
        bail!("{failed} of {} sinks failed", summary.sinks.len());
    }
    if summary.manifest_path.is_none() {
        bail!("run manifest could not be written to {}", manifest_dir.display());
    }
    Ok(())
}
