//! Score table CSV.
//!
//! `label,agriculture,wetland,atmospheric_corrosion,wind_speed,soil_resistivity,snow_load`
//! with one row per category label. An empty cell or `N/A` means the label
//! does not apply to that dimension.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Trim};
use frag_algo::classification::CategoryScores;
use frag_algo::{ScoreDimension, ScoreTable};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ScoreRow {
    label: String,
    #[serde(default)]
    agriculture: String,
    #[serde(default)]
    wetland: String,
    #[serde(default)]
    atmospheric_corrosion: String,
    #[serde(default)]
    wind_speed: String,
    #[serde(default)]
    soil_resistivity: String,
    #[serde(default)]
    snow_load: String,
}

impl ScoreRow {
    fn cell(&self, dimension: ScoreDimension) -> &str {
        match dimension {
            ScoreDimension::Agriculture => &self.agriculture,
            ScoreDimension::Wetland => &self.wetland,
            ScoreDimension::AtmosphericCorrosion => &self.atmospheric_corrosion,
            ScoreDimension::WindSpeed => &self.wind_speed,
            ScoreDimension::SoilResistivity => &self.soil_resistivity,
            ScoreDimension::SnowLoad => &self.snow_load,
        }
    }

    fn scores(&self) -> Result<CategoryScores> {
        let mut scores: CategoryScores = [None; 6];
        for (slot, dimension) in scores.iter_mut().zip(ScoreDimension::ALL) {
            let cell = self.cell(dimension).trim();
            *slot = if cell.is_empty() || cell.eq_ignore_ascii_case("N/A") {
                None
            } else {
                Some(cell.parse::<u8>().map_err(|_| {
                    anyhow!("{dimension} score for '{}' is not 0-2: '{cell}'", self.label)
                })?)
            };
        }
        Ok(scores)
    }
}

/// Read a replacement score table.
pub fn read_score_table(path: &Path) -> Result<ScoreTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("opening score table {}", path.display()))?;
    let mut table = ScoreTable::empty();
    for result in rdr.deserialize() {
        let row: ScoreRow = result.context("parsing score table row")?;
        let scores = row.scores()?;
        table.insert(row.label, scores);
    }
    table.validate()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_scores_with_not_applicable_cells() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "label,agriculture,wetland,atmospheric_corrosion,wind_speed,soil_resistivity,snow_load\n\
             Orchard,2,N/A,,,,\n\
             Salt Marsh,,2,2,,,\n"
        )
        .unwrap();
        let table = read_score_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("Orchard", ScoreDimension::Agriculture), Some(2));
        assert_eq!(table.resolve("Orchard", ScoreDimension::Wetland), None);
        assert_eq!(
            table.resolve("Salt Marsh", ScoreDimension::AtmosphericCorrosion),
            Some(2)
        );
        // replaces, rather than extends, the built-in table
        assert_eq!(table.resolve("Prime Farmland", ScoreDimension::Agriculture), None);
    }

    #[test]
    fn rejects_out_of_band_scores() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "label,agriculture,wetland,atmospheric_corrosion,wind_speed,soil_resistivity,snow_load\n\
             Orchard,5,,,,,\n"
        )
        .unwrap();
        assert!(read_score_table(file.path()).is_err());
    }
}
