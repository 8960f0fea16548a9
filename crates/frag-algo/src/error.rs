//! Engine errors, attributed to an asset and (where relevant) a component.

use frag_core::{ComponentFamily, ConditionCode, FragError};
use thiserror::Error;

/// A component whose distribution cannot be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("adjusted design life for {code} is {adjusted} yr (adjustment {adjustment})")]
    DegenerateDesignLife {
        code: ConditionCode,
        adjustment: f64,
        adjusted: f64,
    },

    #[error("coefficient of variation for {code} is not finite ({cov})")]
    NonFiniteCov { code: ConditionCode, cov: f64 },

    #[error("coefficient of variation for {code} is negative ({cov})")]
    NegativeCov { code: ConditionCode, cov: f64 },
}

/// A component failure tagged with its family.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentFailure {
    pub family: ComponentFamily,
    pub error: ComponentError,
}

/// Why an asset was excluded from the results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("asset {asset_id} has no installation year")]
    MissingInstallYear { asset_id: String },

    #[error("asset {}: {}", .asset_id, describe(.failures))]
    Components {
        asset_id: String,
        failures: Vec<ComponentFailure>,
    },
}

impl AssetError {
    pub fn asset_id(&self) -> &str {
        match self {
            AssetError::MissingInstallYear { asset_id } => asset_id,
            AssetError::Components { asset_id, .. } => asset_id,
        }
    }

    /// Short category used in diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            AssetError::MissingInstallYear { .. } => "install-year",
            AssetError::Components { failures, .. } => match failures.first() {
                Some(ComponentFailure {
                    error: ComponentError::NonFiniteCov { .. } | ComponentError::NegativeCov { .. },
                    ..
                }) => "cov",
                _ => "design-life",
            },
        }
    }
}

fn describe(failures: &[ComponentFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.family, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<AssetError> for FragError {
    fn from(err: AssetError) -> Self {
        FragError::Data(err.to_string())
    }
}
