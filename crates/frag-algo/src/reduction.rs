//! Per-asset reduction factors.
//!
//! Five dimensionless factors shorten (or, for a negative outage factor,
//! extend) a component's design life. Missing or NaN inputs always
//! normalise to zero.

use crate::classification::ClassificationScores;
use frag_core::AssetRecord;
use serde::Serialize;
use std::fmt;

/// Splice count at which the splice factor saturates.
const SPLICE_SATURATION: f64 = 5.0;

/// Which reduction factor a design-life subset draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionKind {
    Outage,
    Splice,
    SoilCorrosivity,
    AtmosphericCorrosivity,
    WearFatigue,
}

impl ReductionKind {
    pub const ALL: [ReductionKind; 5] = [
        ReductionKind::Outage,
        ReductionKind::Splice,
        ReductionKind::SoilCorrosivity,
        ReductionKind::AtmosphericCorrosivity,
        ReductionKind::WearFatigue,
    ];

    /// Output column name.
    pub fn column(&self) -> &'static str {
        match self {
            ReductionKind::Outage => "outage_density_red_fac",
            ReductionKind::Splice => "splice_density_red_fac",
            ReductionKind::SoilCorrosivity => "soil_corrosivity_red_fac",
            ReductionKind::AtmosphericCorrosivity => "atmospheric_corrosivity_red_fac",
            ReductionKind::WearFatigue => "wear_fatigue_red_fac",
        }
    }
}

impl fmt::Display for ReductionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// The five reduction factors for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReductionFactors {
    /// May be negative (an outage modifier that extends life)
    pub outage: f64,
    pub splice: f64,
    pub soil_corrosivity: f64,
    pub atmospheric_corrosivity: f64,
    pub wear_fatigue: f64,
}

impl ReductionFactors {
    /// Derive the factors from an asset and its resolved classification scores.
    pub fn for_asset(
        asset: &AssetRecord,
        scores: &ClassificationScores,
        r_spl: f64,
        r_cor: f64,
    ) -> Self {
        Self {
            // 0.0 - x rather than -x so a missing modifier stays +0.0
            outage: 0.0 - or_zero(asset.outage_designlife_mod),
            splice: splice_density_factor(asset.splices, r_spl),
            soil_corrosivity: corrosivity_factor(scores.agriculture, scores.wetland, r_cor),
            atmospheric_corrosivity: corrosivity_factor(
                scores.wetland,
                scores.atmospheric_corrosion,
                r_cor,
            ),
            wear_fatigue: or_zero(asset.wear_fatigue),
        }
    }

    pub fn get(&self, kind: ReductionKind) -> f64 {
        match kind {
            ReductionKind::Outage => self.outage,
            ReductionKind::Splice => self.splice,
            ReductionKind::SoilCorrosivity => self.soil_corrosivity,
            ReductionKind::AtmosphericCorrosivity => self.atmospheric_corrosivity,
            ReductionKind::WearFatigue => self.wear_fatigue,
        }
    }
}

/// `min(splices / 5 × R_spl, R_spl)`; zero when the count is missing.
pub fn splice_density_factor(splices: Option<f64>, r_spl: f64) -> f64 {
    let splices = or_zero(splices);
    (splices / SPLICE_SATURATION * r_spl).min(r_spl)
}

/// `max(a, b) / 2 × R_cor`, or zero when either score is not applicable.
pub fn corrosivity_factor(a: Option<u8>, b: Option<u8>, r_cor: f64) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => f64::from(a.max(b)) / 2.0 * r_cor,
        _ => 0.0,
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}
