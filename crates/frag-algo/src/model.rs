//! Per-asset assessment: the full pipeline from an asset record to its
//! fragility curve.

use crate::capacity::{strength_ratio, CapacityDistribution};
use crate::classification::{ClassificationScores, ScoreTable};
use crate::constants::ModelConstants;
use crate::design_life::DesignLife;
use crate::error::{AssetError, ComponentFailure};
use crate::fragility::FragilityCurve;
use crate::reduction::ReductionFactors;
use frag_core::{AssetRecord, ComponentFamily, ConditionCode, FragResult, Material, Years};
use serde::Serialize;
use tracing::debug;

/// Derived values for one component of one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentAssessment {
    pub family: ComponentFamily,
    /// Code used for both the condition lookup and the constants
    pub code: ConditionCode,
    pub design_life: DesignLife,
    pub strength_ratio: f64,
    pub design_ratio: f64,
    pub capacity: CapacityDistribution,
}

/// Everything computed for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetReliability {
    pub asset_id: String,
    pub material: Material,
    pub age: Years,
    pub scores: ClassificationScores,
    pub factors: ReductionFactors,
    /// Nominal strength of the material-dependent components
    pub mu: f64,
    /// In [`ComponentFamily::ALL`] order
    pub components: Vec<ComponentAssessment>,
    pub curve: FragilityCurve,
}

impl AssetReliability {
    pub fn component(&self, family: ComponentFamily) -> Option<&ComponentAssessment> {
        self.components.iter().find(|c| c.family == family)
    }
}

/// Constants, score table and reference year for one run.
#[derive(Debug, Clone)]
pub struct FragilityModel {
    constants: ModelConstants,
    scores: ScoreTable,
    as_of_year: i32,
}

impl FragilityModel {
    pub fn new(constants: ModelConstants, scores: ScoreTable, as_of_year: i32) -> FragResult<Self> {
        constants.validate()?;
        scores.validate()?;
        Ok(Self {
            constants,
            scores,
            as_of_year,
        })
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn as_of_year(&self) -> i32 {
        self.as_of_year
    }

    /// Nominal strength for a family on a given material.
    pub fn nominal_strength(&self, family: ComponentFamily, material: Material) -> f64 {
        if family.strength_follows_material() && material != Material::Steel {
            self.constants.mu_wood
        } else {
            self.constants.mu_steel
        }
    }

    /// Assess one asset. Every failing component is reported, not just the first.
    pub fn assess(&self, asset: &AssetRecord) -> Result<AssetReliability, AssetError> {
        let installed = asset
            .installed_year
            .ok_or_else(|| AssetError::MissingInstallYear {
                asset_id: asset.id.clone(),
            })?;
        let age = Years::between(installed, self.as_of_year);

        let scores = self.scores.scores_for(asset);
        let factors =
            ReductionFactors::for_asset(asset, &scores, self.constants.r_spl, self.constants.r_cor);

        let mut components = Vec::with_capacity(ComponentFamily::ALL.len());
        let mut failures = Vec::new();
        for family in ComponentFamily::ALL {
            let code = family.condition_code(asset.material);
            let code_constants = self.constants.code(code);
            match DesignLife::evaluate(family, code, &code_constants, &factors, age) {
                Ok(design_life) => {
                    let strength = strength_ratio(asset.condition(family));
                    let design_ratio = self.constants.design_ratio;
                    let capacity = CapacityDistribution::from_ratios(
                        strength,
                        design_ratio,
                        self.nominal_strength(family, asset.material),
                        design_life.cov,
                    );
                    components.push(ComponentAssessment {
                        family,
                        code,
                        design_life,
                        strength_ratio: strength,
                        design_ratio,
                        capacity,
                    });
                }
                Err(error) => failures.push(ComponentFailure { family, error }),
            }
        }

        if !failures.is_empty() {
            return Err(AssetError::Components {
                asset_id: asset.id.clone(),
                failures,
            });
        }

        let distributions: Vec<CapacityDistribution> =
            components.iter().map(|c| c.capacity).collect();
        let curve = FragilityCurve::evaluate(&distributions, &self.constants.sweep);
        debug!(
            asset = %asset.id,
            material = %asset.material,
            age = age.value(),
            "assessed asset"
        );

        Ok(AssetReliability {
            asset_id: asset.id.clone(),
            material: asset.material,
            age,
            scores,
            factors,
            mu: self.nominal_strength(ComponentFamily::Foundation, asset.material),
            components,
            curve,
        })
    }
}
