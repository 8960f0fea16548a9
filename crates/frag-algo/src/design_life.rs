//! Age-adjusted design life and coefficient of variation.
//!
//! Each family draws on a fixed subset of the reduction factors. The subset is
//! combined by root-sum-of-squares into a single life adjustment. A negative
//! outage factor is kept out of the RSS and scales the result up instead.

use crate::constants::CodeConstants;
use crate::error::ComponentError;
use crate::reduction::{ReductionFactors, ReductionKind};
use frag_core::{ComponentFamily, ConditionCode, Years};
use serde::Serialize;

use ReductionKind::{
    AtmosphericCorrosivity as Atm, SoilCorrosivity as Soil, Splice, WearFatigue as Wear,
};

/// Reduction factors (besides outage) that apply to a family.
pub fn life_factors(family: ComponentFamily) -> &'static [ReductionKind] {
    match family {
        ComponentFamily::Conductor => &[Wear, Splice, Atm],
        ComponentFamily::Anchor => &[Soil],
        ComponentFamily::Guy => &[Atm],
        ComponentFamily::Ogw | ComponentFamily::HardwareInsulators => &[Soil, Atm],
        ComponentFamily::Foundation => &[Wear, Soil, Atm],
        ComponentFamily::StubSplice | ComponentFamily::StructAttach => &[Wear, Atm],
    }
}

/// Root-sum-of-squares.
pub fn rss(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Design-life adjustment from the family's factors and the outage factor.
pub fn design_life_adjustment(others: &[f64], outage: f64) -> f64 {
    if outage < 0.0 {
        (1.0 - rss(others.iter().copied())) * (1.0 - outage)
    } else {
        1.0 - rss(others.iter().copied().chain(std::iter::once(outage)))
    }
}

/// `cov_low + (cov_high − cov_low) × (age / adjusted)²`
pub fn coefficient_of_variation(constants: &CodeConstants, age: Years, adjusted: Years) -> f64 {
    let ratio = age / adjusted;
    constants.cov_low + (constants.cov_high - constants.cov_low) * ratio * ratio
}

/// Design-life results for one component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignLife {
    pub adjustment: f64,
    pub adjusted: Years,
    pub cov: f64,
}

impl DesignLife {
    /// Evaluate a family for one asset. Fails rather than produce an
    /// infinite, NaN or negative cov.
    pub fn evaluate(
        family: ComponentFamily,
        code: ConditionCode,
        constants: &CodeConstants,
        factors: &ReductionFactors,
        age: Years,
    ) -> Result<Self, ComponentError> {
        let others: Vec<f64> = life_factors(family)
            .iter()
            .map(|kind| factors.get(*kind))
            .collect();
        let adjustment = design_life_adjustment(&others, factors.outage);
        let adjusted = constants.design_life() * adjustment;

        if !(adjusted.value() > 0.0) {
            return Err(ComponentError::DegenerateDesignLife {
                code,
                adjustment,
                adjusted: adjusted.value(),
            });
        }

        let cov = coefficient_of_variation(constants, age, adjusted);
        if !cov.is_finite() {
            return Err(ComponentError::NonFiniteCov { code, cov });
        }
        if cov < 0.0 {
            return Err(ComponentError::NegativeCov { code, cov });
        }

        Ok(Self {
            adjustment,
            adjusted,
            cov,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn rss_of_three_four_is_five() {
        assert!((rss([3.0, 4.0]) - 5.0).abs() < EPS);
        assert_eq!(rss(std::iter::empty()), 0.0);
    }

    #[test]
    fn positive_outage_joins_the_rss() {
        let adj = design_life_adjustment(&[0.3], 0.4);
        assert!((adj - 0.5).abs() < EPS);
    }

    #[test]
    fn negative_outage_scales_up() {
        let adj = design_life_adjustment(&[0.1], -0.1);
        assert!((adj - 0.9 * 1.1).abs() < EPS);
        assert!(adj > design_life_adjustment(&[0.1], 0.1));
    }

    #[test]
    fn cov_grows_quadratically_with_age() {
        let c = CodeConstants::new(0.1, 0.3, 60.0);
        assert!((coefficient_of_variation(&c, Years(0.0), Years(60.0)) - 0.1).abs() < EPS);
        assert!((coefficient_of_variation(&c, Years(30.0), Years(60.0)) - 0.15).abs() < EPS);
        assert!((coefficient_of_variation(&c, Years(60.0), Years(60.0)) - 0.3).abs() < EPS);
    }

    #[test]
    fn family_subsets() {
        assert_eq!(life_factors(ComponentFamily::Anchor), &[Soil]);
        assert_eq!(life_factors(ComponentFamily::Conductor), &[Wear, Splice, Atm]);
        assert_eq!(life_factors(ComponentFamily::Foundation).len(), 3);
        for family in ComponentFamily::ALL {
            assert!(!life_factors(family).contains(&ReductionKind::Outage));
        }
    }

    #[test]
    fn zero_adjusted_life_is_an_error() {
        let factors = ReductionFactors {
            wear_fatigue: 1.0,
            ..Default::default()
        };
        let err = DesignLife::evaluate(
            ComponentFamily::StubSplice,
            ConditionCode::StubSplice,
            &CodeConstants::new(0.1, 0.3, 70.0),
            &factors,
            Years(20.0),
        )
        .unwrap_err();
        assert!(matches!(err, ComponentError::DegenerateDesignLife { .. }));
    }

    #[test]
    fn negative_cov_is_an_error() {
        // cov shrinking with age goes below zero past the design life
        let err = DesignLife::evaluate(
            ComponentFamily::Anchor,
            ConditionCode::Anchor,
            &CodeConstants::new(0.3, 0.0, 60.0),
            &ReductionFactors::default(),
            Years(120.0),
        )
        .unwrap_err();
        match err {
            ComponentError::NegativeCov { code, cov } => {
                assert_eq!(code, ConditionCode::Anchor);
                assert!((cov + 0.9).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn evaluate_uses_family_subset() {
        let factors = ReductionFactors {
            soil_corrosivity: 0.3,
            wear_fatigue: 0.9,
            ..Default::default()
        };
        // anchors ignore wear
        let life = DesignLife::evaluate(
            ComponentFamily::Anchor,
            ConditionCode::Anchor,
            &CodeConstants::new(0.1, 0.3, 60.0),
            &factors,
            Years(21.0),
        )
        .unwrap();
        assert!((life.adjustment - 0.7).abs() < EPS);
        assert!((life.adjusted.value() - 42.0).abs() < 1e-9);
        assert!((life.cov - (0.1 + 0.2 * 0.25)).abs() < 1e-9);
    }
}
