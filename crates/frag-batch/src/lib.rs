pub mod manifest;
pub mod runner;

pub use manifest::{
    load_run_manifest, write_run_manifest, RunManifest, SinkRecord, SkippedAsset,
    RUN_MANIFEST_FILE,
};
pub use runner::{run_batch, BatchRunnerConfig, BatchSummary};
