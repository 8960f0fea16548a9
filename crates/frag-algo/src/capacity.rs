//! Component capacity: condition-based strength ratio and the lognormal
//! capacity distribution built from it.

use frag_core::Mph;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, LogNormal};

/// Remaining-strength ratio for a condition code.
///
/// Missing, NaN and 0 mean "not inspected" and keep full strength. Code 2 is
/// pinned to 0.92; every other code loses a sixth per step above 1.
pub fn strength_ratio(code: Option<f64>) -> f64 {
    match code {
        None => 1.0,
        Some(c) if c.is_nan() || c == 0.0 => 1.0,
        Some(c) if c == 2.0 => 0.92,
        Some(c) => 1.0 - (c - 1.0) / 6.0,
    }
}

/// Arithmetic mean and standard deviation of a component's capacity (mph).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityDistribution {
    pub mean: f64,
    pub stddev: f64,
}

impl CapacityDistribution {
    /// `mean = strength × design × mu`, `stddev = mean × cov`
    pub fn from_ratios(strength_ratio: f64, design_ratio: f64, mu: f64, cov: f64) -> Self {
        let mean = strength_ratio * design_ratio * mu;
        Self {
            mean,
            stddev: mean * cov,
        }
    }

    /// Build the failure CDF once; evaluating it across a sweep is then cheap.
    pub fn cdf(&self) -> CapacityCdf {
        CapacityCdf::new(self.mean, self.stddev)
    }
}

/// Failure probability of one component as a function of wind speed.
#[derive(Debug, Clone)]
pub enum CapacityCdf {
    /// Zero or negative capacity: fails at every speed
    AlwaysFails,
    /// No spread: fails exactly when the wind reaches the mean
    Step(f64),
    LogNormal(LogNormal),
}

impl CapacityCdf {
    /// Parameterise from the arithmetic mean and standard deviation:
    /// `σ² = ln(1 + (sd/m)²)`, `μ = ln m − σ²/2`.
    pub fn new(mean: f64, stddev: f64) -> Self {
        if !(mean > 0.0) {
            return CapacityCdf::AlwaysFails;
        }
        if !(stddev > 0.0) {
            return CapacityCdf::Step(mean);
        }
        let cv = stddev / mean;
        let sigma2 = cv.mul_add(cv, 1.0).ln();
        let mu = mean.ln() - sigma2 / 2.0;
        match LogNormal::new(mu, sigma2.sqrt()) {
            Ok(dist) => CapacityCdf::LogNormal(dist),
            Err(_) => CapacityCdf::Step(mean),
        }
    }

    pub fn probability(&self, speed: Mph) -> f64 {
        let v = speed.value();
        match self {
            CapacityCdf::AlwaysFails => 1.0,
            CapacityCdf::Step(mean) => {
                if v >= *mean {
                    1.0
                } else {
                    0.0
                }
            }
            CapacityCdf::LogNormal(dist) => {
                if v <= 0.0 {
                    0.0
                } else {
                    dist.cdf(v)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_ratio_table() {
        assert_eq!(strength_ratio(None), 1.0);
        assert_eq!(strength_ratio(Some(f64::NAN)), 1.0);
        assert_eq!(strength_ratio(Some(0.0)), 1.0);
        assert_eq!(strength_ratio(Some(1.0)), 1.0);
        assert_eq!(strength_ratio(Some(2.0)), 0.92);
        assert!((strength_ratio(Some(4.0)) - 0.5).abs() < 1e-12);
        assert!(strength_ratio(Some(7.0)).abs() < 1e-12);
    }

    #[test]
    fn distribution_from_ratios() {
        let d = CapacityDistribution::from_ratios(0.92, 1.0, 110.0, 0.2);
        assert!((d.mean - 101.2).abs() < 1e-9);
        assert!((d.stddev - 20.24).abs() < 1e-9);
    }

    #[test]
    fn lognormal_cdf_at_the_mean() {
        let cdf = CapacityCdf::new(100.0, 10.0);
        let p = cdf.probability(Mph(100.0));
        assert!((p - 0.5198892681726252).abs() < 1e-9);
        assert_eq!(cdf.probability(Mph(0.0)), 0.0);
        assert!(cdf.probability(Mph(200.0)) > 0.999_999);
    }

    #[test]
    fn degenerate_distributions() {
        let dead = CapacityCdf::new(0.0, 0.0);
        assert_eq!(dead.probability(Mph(0.0)), 1.0);

        let step = CapacityCdf::new(90.0, 0.0);
        assert_eq!(step.probability(Mph(89.0)), 0.0);
        assert_eq!(step.probability(Mph(90.0)), 1.0);
    }
}
