//! Model constants.
//!
//! Every constant has a built-in default. A TOML file may override any subset
//! of them; fields (and condition codes) it leaves out keep their defaults.
//!
//! ```toml
//! r_spl = 0.2
//! mu_wood = 85.0
//!
//! [sweep]
//! max_mph = 150
//!
//! [codes.STRUCTURE_CD]
//! cov_low = 0.15
//! cov_high = 0.45
//! design_life_years = 45.0
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use frag_core::{ConditionCode, FragError, FragResult, Mph, Years};
use serde::{Deserialize, Serialize};

/// The sweep must reach at least this speed.
pub const MIN_SWEEP_MPH: u32 = 120;

/// Per-code constants: cov at zero age, cov at full design life, nominal life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodeConstants {
    pub cov_low: f64,
    pub cov_high: f64,
    pub design_life_years: f64,
}

impl CodeConstants {
    pub const fn new(cov_low: f64, cov_high: f64, design_life_years: f64) -> Self {
        Self {
            cov_low,
            cov_high,
            design_life_years,
        }
    }

    /// Built-in constants for a code.
    pub fn default_for(code: ConditionCode) -> Self {
        match code {
            ConditionCode::Anchor => Self::new(0.10, 0.30, 60.0),
            ConditionCode::Guy => Self::new(0.10, 0.30, 50.0),
            ConditionCode::Foundation => Self::new(0.10, 0.30, 80.0),
            ConditionCode::Structure => Self::new(0.15, 0.40, 50.0),
            ConditionCode::StubSplice => Self::new(0.10, 0.30, 70.0),
            ConditionCode::Crossarms => Self::new(0.15, 0.40, 40.0),
            ConditionCode::StructAttach => Self::new(0.10, 0.30, 60.0),
            ConditionCode::FrameAttach => Self::new(0.15, 0.40, 40.0),
            ConditionCode::Conductor => Self::new(0.08, 0.25, 60.0),
            ConditionCode::Ogw => Self::new(0.08, 0.25, 50.0),
            ConditionCode::HardwareInsulators => Self::new(0.12, 0.35, 40.0),
        }
    }

    pub fn design_life(&self) -> Years {
        Years(self.design_life_years)
    }
}

/// Wind-speed sweep settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Highest evaluated speed (inclusive), in whole mph
    pub max_mph: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_mph: MIN_SWEEP_MPH,
        }
    }
}

impl SweepConfig {
    /// Integer speeds `0..=max_mph`.
    pub fn speeds(&self) -> impl Iterator<Item = Mph> + '_ {
        (0..=self.max_mph).map(|v| Mph(f64::from(v)))
    }

    pub fn len(&self) -> usize {
        self.max_mph as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// All tunable constants of the fragility model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConstants {
    /// Splice reduction ceiling
    pub r_spl: f64,
    /// Corrosivity reduction ceiling
    pub r_cor: f64,
    /// Nominal strength of steel-bodied components (mph)
    pub mu_steel: f64,
    /// Nominal strength of wood-bodied components (mph)
    pub mu_wood: f64,
    /// Design-to-actual capacity ratio applied to every component
    pub design_ratio: f64,
    pub sweep: SweepConfig,
    /// Keyed by condition-code label, e.g. `ANCHOR_CD`
    pub codes: BTreeMap<String, CodeConstants>,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            r_spl: 0.2,
            r_cor: 0.3,
            mu_steel: 110.0,
            mu_wood: 90.0,
            design_ratio: 1.0,
            sweep: SweepConfig::default(),
            codes: ConditionCode::ALL
                .iter()
                .map(|code| (code.label().to_string(), CodeConstants::default_for(*code)))
                .collect(),
        }
    }
}

impl ModelConstants {
    /// Load from a TOML file and validate.
    pub fn load_from(path: &Path) -> FragResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let constants: Self = toml::from_str(&contents)
            .map_err(|e| FragError::Config(format!("{}: {e}", path.display())))?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn from_toml(contents: &str) -> FragResult<Self> {
        let constants: Self =
            toml::from_str(contents).map_err(|e| FragError::Config(e.to_string()))?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn to_toml(&self) -> FragResult<String> {
        toml::to_string_pretty(self).map_err(|e| FragError::Config(e.to_string()))
    }

    /// Constants for a code; codes absent from the file use the built-ins.
    pub fn code(&self, code: ConditionCode) -> CodeConstants {
        self.codes
            .get(code.label())
            .copied()
            .unwrap_or_else(|| CodeConstants::default_for(code))
    }

    pub fn validate(&self) -> FragResult<()> {
        for (name, value) in [("r_spl", self.r_spl), ("r_cor", self.r_cor)] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(FragError::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("mu_steel", self.mu_steel),
            ("mu_wood", self.mu_wood),
            ("design_ratio", self.design_ratio),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(FragError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.sweep.max_mph < MIN_SWEEP_MPH {
            return Err(FragError::Config(format!(
                "sweep.max_mph must be at least {MIN_SWEEP_MPH}, got {}",
                self.sweep.max_mph
            )));
        }
        for (label, c) in &self.codes {
            label.parse::<ConditionCode>().map_err(|_| {
                FragError::Config(format!("unknown condition code '{label}' in [codes]"))
            })?;
            if !(c.design_life_years > 0.0) {
                return Err(FragError::Config(format!(
                    "{label}: design_life_years must be positive, got {}",
                    c.design_life_years
                )));
            }
            if !(c.cov_low >= 0.0) || !(c.cov_high >= 0.0) {
                return Err(FragError::Config(format!(
                    "{label}: cov_low and cov_high must be non-negative"
                )));
            }
            if c.cov_high < c.cov_low {
                return Err(FragError::Config(format!(
                    "{label}: cov_high ({}) must not be below cov_low ({})",
                    c.cov_high, c.cov_low
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_every_code() {
        let c = ModelConstants::default();
        assert_eq!(c.codes.len(), ConditionCode::COUNT);
        assert!(c.validate().is_ok());
        assert_eq!(c.code(ConditionCode::Guy).design_life_years, 50.0);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = ModelConstants::from_toml(
            r#"
mu_wood = 85.0

[codes.STRUCTURE_CD]
cov_low = 0.2
cov_high = 0.5
design_life_years = 45.0
"#,
        )
        .unwrap();
        assert_eq!(c.mu_wood, 85.0);
        assert_eq!(c.mu_steel, 110.0);
        assert_eq!(c.sweep.max_mph, 120);
        assert_eq!(c.code(ConditionCode::Structure).design_life_years, 45.0);
        // the [codes] table replaces the map; other codes fall back
        assert_eq!(
            c.code(ConditionCode::Anchor),
            CodeConstants::default_for(ConditionCode::Anchor)
        );
    }

    #[test]
    fn rejects_short_sweep() {
        let err = ModelConstants::from_toml("[sweep]\nmax_mph = 100\n").unwrap_err();
        assert!(err.to_string().contains("max_mph"));
    }

    #[test]
    fn rejects_unknown_code_and_bad_life() {
        assert!(ModelConstants::from_toml(
            "[codes.POLE_CD]\ncov_low = 0.1\ncov_high = 0.2\ndesign_life_years = 10.0\n"
        )
        .is_err());
        assert!(ModelConstants::from_toml(
            "[codes.GUY_CD]\ncov_low = 0.1\ncov_high = 0.2\ndesign_life_years = 0.0\n"
        )
        .is_err());
        assert!(ModelConstants::from_toml("mu_steel = -1.0\n").is_err());
    }

    #[test]
    fn rejects_cov_that_shrinks_with_age() {
        let err = ModelConstants::from_toml(
            "[codes.ANCHOR_CD]\ncov_low = 0.3\ncov_high = 0.0\ndesign_life_years = 60.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("cov_high"));
    }

    #[test]
    fn toml_round_trip_through_file() {
        let c = ModelConstants::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(c.to_toml().unwrap().as_bytes()).unwrap();
        let loaded = ModelConstants::load_from(file.path()).unwrap();
        assert_eq!(loaded, c);
    }

    #[test]
    fn sweep_is_inclusive() {
        let sweep = SweepConfig { max_mph: 130 };
        let speeds: Vec<_> = sweep.speeds().collect();
        assert_eq!(speeds.len(), 131);
        assert_eq!(sweep.len(), 131);
        assert_eq!(speeds[0], Mph(0.0));
        assert_eq!(speeds[130], Mph(130.0));
    }
}
