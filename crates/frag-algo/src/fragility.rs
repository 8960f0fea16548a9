//! System fragility curve.
//!
//! The structure fails when any component fails. Treating the components as
//! independent (series system) gives an upper estimate, taking only the weakest
//! component gives a lower one; the curve reports the midpoint of the two:
//!
//! `p(v) = [(1 − Π(1 − F_i(v))) + max_i F_i(v)] / 2`

use crate::capacity::{CapacityCdf, CapacityDistribution};
use crate::constants::SweepConfig;
use frag_core::Mph;
use serde::Serialize;

/// One point of a fragility curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FragilityPoint {
    pub speed: Mph,
    pub probability: f64,
}

/// Ordered failure probabilities over the wind sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragilityCurve {
    pub points: Vec<FragilityPoint>,
}

/// Blend component failure probabilities into a system probability.
pub fn system_failure_probability(component_probabilities: &[f64]) -> f64 {
    if component_probabilities.is_empty() {
        return 0.0;
    }
    let survive: f64 = component_probabilities.iter().map(|p| 1.0 - p).product();
    let weakest = component_probabilities
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    (((1.0 - survive) + weakest) / 2.0).clamp(0.0, 1.0)
}

impl FragilityCurve {
    /// Evaluate the blended curve for a set of component distributions.
    pub fn evaluate(distributions: &[CapacityDistribution], sweep: &SweepConfig) -> Self {
        let cdfs: Vec<CapacityCdf> = distributions.iter().map(|d| d.cdf()).collect();
        let mut probabilities = Vec::with_capacity(cdfs.len());
        let points = sweep
            .speeds()
            .map(|speed| {
                probabilities.clear();
                probabilities.extend(cdfs.iter().map(|cdf| cdf.probability(speed)));
                FragilityPoint {
                    speed,
                    probability: system_failure_probability(&probabilities),
                }
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Probability at an exact sweep speed.
    pub fn at(&self, speed: Mph) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.speed == speed)
            .map(|p| p.probability)
    }

    /// Lowest swept speed whose probability reaches `threshold`.
    pub fn speed_at(&self, threshold: f64) -> Option<Mph> {
        self.points
            .iter()
            .find(|p| p.probability >= threshold)
            .map(|p| p.speed)
    }
}
