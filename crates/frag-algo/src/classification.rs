//! Categorical environment scores.
//!
//! Land-use, wetland and corrosion-zone categories are scored 0-2 per
//! dimension. A category that carries no meaning for a dimension (or a label
//! the table has never seen) resolves to `None`, "not applicable", which the
//! reduction factors treat as zero.

use frag_core::{AssetRecord, FragError, FragResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Scoring dimension (one column of the reference table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Agriculture,
    Wetland,
    AtmosphericCorrosion,
    WindSpeed,
    SoilResistivity,
    SnowLoad,
}

impl ScoreDimension {
    pub const ALL: [ScoreDimension; 6] = [
        ScoreDimension::Agriculture,
        ScoreDimension::Wetland,
        ScoreDimension::AtmosphericCorrosion,
        ScoreDimension::WindSpeed,
        ScoreDimension::SoilResistivity,
        ScoreDimension::SnowLoad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreDimension::Agriculture => "agriculture",
            ScoreDimension::Wetland => "wetland",
            ScoreDimension::AtmosphericCorrosion => "atmospheric_corrosion",
            ScoreDimension::WindSpeed => "wind_speed",
            ScoreDimension::SoilResistivity => "soil_resistivity",
            ScoreDimension::SnowLoad => "snow_load",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScoreDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreDimension {
    type Err = FragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ScoreDimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == wanted)
            .ok_or_else(|| FragError::Parse(format!("unknown score dimension '{s}'")))
    }
}

/// Scores for one category label, indexed by [`ScoreDimension`].
pub type CategoryScores = [Option<u8>; 6];

const NA: Option<u8> = None;

// label, [agriculture, wetland, atmospheric, wind speed, soil resistivity, snow load]
const REFERENCE_ROWS: &[(&str, CategoryScores)] = &[
    ("heavy", [NA, NA, NA, NA, NA, Some(2)]),
    ("intermediate", [NA, NA, NA, NA, NA, Some(1)]),
    ("light", [NA, NA, NA, NA, NA, Some(0)]),
    ("Estuarine and Marine Deepwater", [NA, Some(2), NA, NA, NA, NA]),
    ("Estuarine and Marine Wetland", [NA, Some(2), NA, NA, NA, NA]),
    ("Freshwater Emergent Wetland", [NA, Some(1), NA, NA, NA, NA]),
    ("Freshwater Forested/Shrub Wetland", [NA, Some(1), NA, NA, NA, NA]),
    ("Freshwater Pond", [NA, Some(1), NA, NA, NA, NA]),
    ("Lake", [NA, Some(1), NA, NA, NA, NA]),
    ("Riverine", [NA, Some(1), NA, NA, NA, NA]),
    ("other", [NA, Some(1), NA, NA, NA, NA]),
    ("Blank", [NA, Some(0), NA, NA, NA, NA]),
    ("None", [NA, Some(0), Some(0), NA, NA, NA]),
    ("Farmland of Local Importance", [Some(2), NA, NA, NA, NA, NA]),
    ("Farmland of Statewide Importance", [Some(2), NA, NA, NA, NA, NA]),
    ("Grazing Land", [Some(1), NA, NA, NA, NA, NA]),
    ("Irrigated Farmland (interim)", [Some(2), NA, NA, NA, NA, NA]),
    ("Local Potential", [Some(1), NA, NA, NA, NA, NA]),
    ("Nonagricultural and Natural Vegetation", [Some(1), NA, NA, NA, NA, NA]),
    ("Not Mapped", [Some(1), NA, NA, NA, NA, NA]),
    ("Other Land", [Some(1), NA, NA, NA, NA, NA]),
    ("Prime Farmland", [Some(2), NA, NA, NA, NA, NA]),
    ("Rural Residential and Rural Commercial", [Some(2), NA, NA, NA, NA, NA]),
    ("Unique Farmland", [Some(1), NA, NA, NA, NA, NA]),
    ("Urban and Built-up Land", [Some(0), NA, NA, NA, NA, NA]),
    ("Water", [Some(2), NA, NA, NA, NA, NA]),
    ("Confined Animal Agriculture", [Some(2), NA, NA, NA, NA, NA]),
    ("moderate", [NA, NA, Some(1), NA, NA, NA]),
    ("severe", [NA, NA, Some(2), NA, NA, NA]),
    ("Lower 1/3 of PG&E wind speed", [NA, NA, NA, Some(0), NA, NA]),
    ("Middle 1/3 of PG&E wind speed", [NA, NA, NA, Some(1), NA, NA]),
    ("Top 1/3 of PG&E wind speed", [NA, NA, NA, Some(2), NA, NA]),
    ("High", [NA, NA, NA, NA, Some(0), NA]),
    ("Med", [NA, NA, NA, NA, Some(1), NA]),
    ("Low", [NA, NA, NA, NA, Some(2), NA]),
    ("Vacant or Disturbed Land", [Some(0), NA, NA, NA, NA, NA]),
    ("Rural Residential Land", [Some(0), NA, NA, NA, NA, NA]),
    ("Farmland of Local Potential", [Some(0), NA, NA, NA, NA, NA]),
    ("Semi-agricultural and Rural Commercial Land", [Some(0), NA, NA, NA, NA, NA]),
    ("Water Area", [Some(0), NA, NA, NA, NA, NA]),
];

static REFERENCE_TABLE: Lazy<ScoreTable> = Lazy::new(|| {
    let mut table = ScoreTable::empty();
    for (label, scores) in REFERENCE_ROWS {
        table.insert(*label, *scores);
    }
    table
});

/// Lookup table from category label to per-dimension scores.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    rows: HashMap<String, CategoryScores>,
}

impl ScoreTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in reference table.
    pub fn reference() -> Self {
        REFERENCE_TABLE.clone()
    }

    pub fn insert(&mut self, label: impl Into<String>, scores: CategoryScores) {
        self.rows.insert(label.into().trim().to_string(), scores);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Score a category label; `None` means not applicable.
    pub fn resolve(&self, label: &str, dimension: ScoreDimension) -> Option<u8> {
        self.rows
            .get(label.trim())
            .and_then(|scores| scores[dimension.index()])
    }

    fn resolve_opt(&self, label: Option<&str>, dimension: ScoreDimension) -> Option<u8> {
        label.and_then(|l| self.resolve(l, dimension))
    }

    /// The three scores the reduction factors consume.
    pub fn scores_for(&self, asset: &AssetRecord) -> ClassificationScores {
        ClassificationScores {
            agriculture: self
                .resolve_opt(asset.agriculture.as_deref(), ScoreDimension::Agriculture),
            wetland: self.resolve_opt(asset.wetland_type.as_deref(), ScoreDimension::Wetland),
            atmospheric_corrosion: self.resolve_opt(
                asset.corrosion_zone.as_deref(),
                ScoreDimension::AtmosphericCorrosion,
            ),
        }
    }

    /// Reject scores outside the 0-2 band.
    pub fn validate(&self) -> FragResult<()> {
        for (label, scores) in &self.rows {
            for (dimension, score) in ScoreDimension::ALL.iter().zip(scores) {
                if let Some(s) = score {
                    if *s > 2 {
                        return Err(FragError::Validation(format!(
                            "score {s} for '{label}' ({dimension}) is outside 0-2"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Resolved scores for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClassificationScores {
    pub agriculture: Option<u8>,
    pub wetland: Option<u8>,
    pub atmospheric_corrosion: Option<u8>,
}
