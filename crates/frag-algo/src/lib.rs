//! # frag-algo: Wind Fragility Engine
//!
//! Turns one [`AssetRecord`](frag_core::AssetRecord) into a system fragility
//! curve:
//!
//! 1. [`classification`] resolves land-use / wetland / corrosion categories to 0-2 scores
//! 2. [`reduction`] derives the five reduction factors
//! 3. [`design_life`] adjusts each component's design life and ages its cov
//! 4. [`capacity`] builds a lognormal capacity per component
//! 5. [`fragility`] blends the eight components over the wind sweep
//!
//! [`FragilityModel::assess`] runs the whole chain for one asset.
//!
//! ```
//! use frag_algo::{FragilityModel, ModelConstants, ScoreTable};
//! use frag_core::{AssetRecord, Material, Mph};
//!
//! let model = FragilityModel::new(ModelConstants::default(), ScoreTable::reference(), 2024).unwrap();
//! let tower = AssetRecord::new("1001", Material::Steel, 1975);
//! let result = model.assess(&tower).unwrap();
//! assert!(result.curve.at(Mph(120.0)).unwrap() > result.curve.at(Mph(60.0)).unwrap());
//! ```

pub mod capacity;
pub mod classification;
pub mod constants;
pub mod design_life;
pub mod error;
pub mod fragility;
pub mod model;
pub mod reduction;

pub use capacity::{strength_ratio, CapacityCdf, CapacityDistribution};
pub use classification::{ClassificationScores, ScoreDimension, ScoreTable};
pub use constants::{CodeConstants, ModelConstants, SweepConfig, MIN_SWEEP_MPH};
pub use design_life::{design_life_adjustment, life_factors, DesignLife};
pub use error::{AssetError, ComponentError, ComponentFailure};
pub use fragility::{system_failure_probability, FragilityCurve, FragilityPoint};
pub use model::{AssetReliability, ComponentAssessment, FragilityModel};
pub use reduction::{ReductionFactors, ReductionKind};
