use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, Result};
use frag_cli::ModelArgs;
use frag_io::read_assets;
use tabwriter::TabWriter;

use crate::commands::util::build_model;

/// Handle `frag curve`: print one structure's components and curve.
pub fn handle(assets: &Path, asset_id: &str, model_args: &ModelArgs, step: u32) -> Result<()> {
    let model = build_model(model_args)?;
    let snapshot = read_assets(assets)?;
    let asset = snapshot
        .assets
        .iter()
        .find(|a| a.id == asset_id)
        .ok_or_else(|| anyhow!("asset {asset_id} not found in {}", assets.display()))?;
    let result = model.assess(asset)?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(
        writer,
        "Asset {} ({}, {} yr as of {})",
        result.asset_id,
        result.material,
        result.age.value(),
        model.as_of_year()
    )?;
    writeln!(
        writer,
        "COMPONENT\tCODE\tCONDITION\tSTRENGTH\tLIFE ADJ\tADJ LIFE (yr)\tCOV\tMEAN (mph)\tSTDDEV"
    )?;
    for c in &result.components {
        let condition = asset
            .conditions
            .get(c.code)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.3}\t{:.3}\t{:.1}\t{:.3}\t{:.1}\t{:.1}",
            c.family,
            c.code,
            condition,
            c.strength_ratio,
            c.design_life.adjustment,
            c.design_life.adjusted.value(),
            c.design_life.cov,
            c.capacity.mean,
            c.capacity.stddev
        )?;
    }
    writer.flush()?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "\nMPH\tP(FAIL)")?;
    let step = step.max(1);
    for point in &result.curve.points {
        if point.speed.whole() % step == 0 {
            writeln!(writer, "{}\t{:.6}", point.speed.whole(), point.probability)?;
        }
    }
    writer.flush()?;
    Ok(())
}
