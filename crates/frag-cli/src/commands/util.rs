use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use frag_algo::{FragilityModel, ModelConstants, ScoreTable};
use frag_cli::ModelArgs;
use frag_io::read_score_table;
use std::path::Path;
use tracing::info;

/// `auto` (or anything unparseable) means one worker per CPU.
pub fn parse_threads(spec: &str) -> usize {
    if spec.eq_ignore_ascii_case("auto") {
        0
    } else {
        spec.parse().unwrap_or(0)
    }
}

pub fn load_constants(path: Option<&Path>) -> Result<ModelConstants> {
    match path {
        Some(path) => {
            info!("loading model constants from {}", path.display());
            Ok(ModelConstants::load_from(path)?)
        }
        None => Ok(ModelConstants::default()),
    }
}

pub fn load_scores(path: Option<&Path>) -> Result<ScoreTable> {
    match path {
        Some(path) => {
            info!("loading score table from {}", path.display());
            read_score_table(path)
        }
        None => Ok(ScoreTable::reference()),
    }
}

pub fn build_model(args: &ModelArgs) -> Result<FragilityModel> {
    let constants = load_constants(args.config.as_deref())?;
    let scores = load_scores(args.scores.as_deref())?;
    let as_of_year = args.as_of_year.unwrap_or_else(|| Utc::now().year());
    FragilityModel::new(constants, scores, as_of_year).context("building fragility model")
}
