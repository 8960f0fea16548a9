//! # frag-core: Structure Fragility Core Types
//!
//! Shared data model for the wind fragility toolkit: the asset record read
//! from the structure snapshot, the eight component families a structure is
//! decomposed into, and the canonical condition-code columns used to look up
//! both observed condition and per-component constants.
//!
//! ## Material aliasing
//!
//! Steel towers and wood poles report three of their components under
//! different column names. The mapping is resolved once, here, by
//! [`ComponentFamily::condition_code`]:
//!
//! | Family          | STEEL / OTHER       | WOOD               |
//! |-----------------|---------------------|--------------------|
//! | Foundation      | `FOUNDATION_CD`     | `STRUCTURE_CD`     |
//! | Stub splice     | `STUB_SPLICE_CD`    | `CROSSARMS_CD`     |
//! | Struct attach   | `STRUCT_ATTACH_CD`  | `FRAME_ATTACH_CD`  |
//!
//! Every other family uses the same code for all materials. Structures with
//! an unknown or other material flag follow the steel mapping.
//!
//! ## Modules
//!
//! - [`diagnostics`] - Per-asset warning/error collection
//! - [`error`] - [`FragError`] and [`FragResult`]
//! - [`units`] - [`Mph`] and [`Years`] newtypes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod diagnostics;
pub mod error;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, LoadDiagnostics, LoadStats, Severity};
pub use error::{FragError, FragResult};
pub use units::{Mph, Years};

/// Structure material as reported by `MATERIAL_FLAG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Material {
    Steel,
    Wood,
    /// UNKNOWN, OTHER, blank, or any unrecognised flag
    Other,
}

impl Material {
    /// Parse a material flag. Never fails: unrecognised flags are [`Material::Other`].
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_uppercase().as_str() {
            "STEEL" => Material::Steel,
            "WOOD" => Material::Wood,
            _ => Material::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Steel => "STEEL",
            Material::Wood => "WOOD",
            Material::Other => "OTHER",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical condition-code column. Also the key for per-component constants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ConditionCode {
    #[serde(rename = "ANCHOR_CD")]
    Anchor,
    #[serde(rename = "GUY_CD")]
    Guy,
    #[serde(rename = "FOUNDATION_CD")]
    Foundation,
    #[serde(rename = "STRUCTURE_CD")]
    Structure,
    #[serde(rename = "STUB_SPLICE_CD")]
    StubSplice,
    #[serde(rename = "CROSSARMS_CD")]
    Crossarms,
    #[serde(rename = "STRUCT_ATTACH_CD")]
    StructAttach,
    #[serde(rename = "FRAME_ATTACH_CD")]
    FrameAttach,
    #[serde(rename = "CONDUCTOR_CD")]
    Conductor,
    #[serde(rename = "OGW_CD")]
    Ogw,
    #[serde(rename = "HARDWARE_INSUL_CD")]
    HardwareInsulators,
}

impl ConditionCode {
    pub const COUNT: usize = 11;

    pub const ALL: [ConditionCode; Self::COUNT] = [
        ConditionCode::Anchor,
        ConditionCode::Guy,
        ConditionCode::Foundation,
        ConditionCode::Structure,
        ConditionCode::StubSplice,
        ConditionCode::Crossarms,
        ConditionCode::StructAttach,
        ConditionCode::FrameAttach,
        ConditionCode::Conductor,
        ConditionCode::Ogw,
        ConditionCode::HardwareInsulators,
    ];

    /// Column label in the asset snapshot.
    pub fn label(&self) -> &'static str {
        match self {
            ConditionCode::Anchor => "ANCHOR_CD",
            ConditionCode::Guy => "GUY_CD",
            ConditionCode::Foundation => "FOUNDATION_CD",
            ConditionCode::Structure => "STRUCTURE_CD",
            ConditionCode::StubSplice => "STUB_SPLICE_CD",
            ConditionCode::Crossarms => "CROSSARMS_CD",
            ConditionCode::StructAttach => "STRUCT_ATTACH_CD",
            ConditionCode::FrameAttach => "FRAME_ATTACH_CD",
            ConditionCode::Conductor => "CONDUCTOR_CD",
            ConditionCode::Ogw => "OGW_CD",
            ConditionCode::HardwareInsulators => "HARDWARE_INSUL_CD",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConditionCode {
    type Err = FragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ConditionCode::ALL
            .iter()
            .copied()
            .find(|code| code.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FragError::Parse(format!("unknown condition code column '{s}'")))
    }
}

/// One structural sub-component modelled as an independent capacity variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentFamily {
    Anchor,
    Guy,
    /// FOUNDATION on steel, STRUCTURE on wood
    Foundation,
    /// STUB_SPLICE on steel, CROSSARMS on wood
    StubSplice,
    /// STRUCT_ATTACH on steel, FRAME_ATTACH on wood
    StructAttach,
    Conductor,
    /// Overhead guard wire
    Ogw,
    HardwareInsulators,
}

impl ComponentFamily {
    pub const ALL: [ComponentFamily; 8] = [
        ComponentFamily::Anchor,
        ComponentFamily::Guy,
        ComponentFamily::Foundation,
        ComponentFamily::StubSplice,
        ComponentFamily::StructAttach,
        ComponentFamily::Conductor,
        ComponentFamily::Ogw,
        ComponentFamily::HardwareInsulators,
    ];

    /// Resolve the condition-code column (and constants key) for a material.
    pub fn condition_code(&self, material: Material) -> ConditionCode {
        match (self, material) {
            (ComponentFamily::Foundation, Material::Wood) => ConditionCode::Structure,
            (ComponentFamily::StubSplice, Material::Wood) => ConditionCode::Crossarms,
            (ComponentFamily::StructAttach, Material::Wood) => ConditionCode::FrameAttach,
            (ComponentFamily::Anchor, _) => ConditionCode::Anchor,
            (ComponentFamily::Guy, _) => ConditionCode::Guy,
            (ComponentFamily::Foundation, _) => ConditionCode::Foundation,
            (ComponentFamily::StubSplice, _) => ConditionCode::StubSplice,
            (ComponentFamily::StructAttach, _) => ConditionCode::StructAttach,
            (ComponentFamily::Conductor, _) => ConditionCode::Conductor,
            (ComponentFamily::Ogw, _) => ConditionCode::Ogw,
            (ComponentFamily::HardwareInsulators, _) => ConditionCode::HardwareInsulators,
        }
    }

    /// Output column prefix. Always the steel code, whatever the material.
    pub fn column_prefix(&self) -> &'static str {
        self.condition_code(Material::Steel).label()
    }

    /// Suffix used by the `mean_*` / `stddev_*` output columns.
    pub fn short_name(&self) -> &'static str {
        match self {
            ComponentFamily::Anchor => "ANCHOR",
            ComponentFamily::Guy => "GUY",
            ComponentFamily::Foundation => "FOUNDATION",
            ComponentFamily::StubSplice => "STUB_SPLICE",
            ComponentFamily::StructAttach => "STRUCT_ATTACH",
            ComponentFamily::Conductor => "CONDUCTOR",
            ComponentFamily::Ogw => "OGW",
            ComponentFamily::HardwareInsulators => "HI",
        }
    }

    /// Whether the nominal strength follows the structure material.
    ///
    /// Anchors, guys, conductor, guard wire and hardware are steel-bodied on
    /// every structure type.
    pub fn strength_follows_material(&self) -> bool {
        matches!(
            self,
            ComponentFamily::Foundation
                | ComponentFamily::StubSplice
                | ComponentFamily::StructAttach
        )
    }
}

impl fmt::Display for ComponentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Observed condition code per canonical column; `None` is a blank cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionCodes([Option<f64>; ConditionCode::COUNT]);

impl ConditionCodes {
    pub fn get(&self, code: ConditionCode) -> Option<f64> {
        self.0[code.index()]
    }

    pub fn set(&mut self, code: ConditionCode, value: Option<f64>) {
        self.0[code.index()] = value;
    }

    pub fn with(mut self, code: ConditionCode, value: f64) -> Self {
        self.set(code, Some(value));
        self
    }
}

/// One structure from the asset snapshot. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Unique asset key (`SAP_EQUIP_ID`)
    pub id: String,
    pub material: Material,
    pub installed_year: Option<i32>,
    pub conditions: ConditionCodes,
    /// Land-use / farmland category (`AGRICULTURE`)
    pub agriculture: Option<String>,
    pub wetland_type: Option<String>,
    pub corrosion_zone: Option<String>,
    /// Splice count (`SPLICES`)
    pub splices: Option<f64>,
    /// `WEAR_FATIGUE_RED_FAC`
    pub wear_fatigue: Option<f64>,
    /// Line-level `OUTAGE_DESIGNLIFE_MOD`; positive values extend life
    pub outage_designlife_mod: Option<f64>,
    /// Identity columns carried through to the output, in input order
    pub attributes: Vec<(String, String)>,
}

impl AssetRecord {
    /// A record with no condition or environment data.
    pub fn new(id: impl Into<String>, material: Material, installed_year: i32) -> Self {
        Self {
            id: id.into(),
            material,
            installed_year: Some(installed_year),
            conditions: ConditionCodes::default(),
            agriculture: None,
            wetland_type: None,
            corrosion_zone: None,
            splices: None,
            wear_fatigue: None,
            outage_designlife_mod: None,
            attributes: Vec::new(),
        }
    }

    /// Condition code for a family, after material aliasing.
    pub fn condition(&self, family: ComponentFamily) -> Option<f64> {
        self.conditions.get(family.condition_code(self.material))
    }

    /// Entity label used in diagnostics.
    pub fn entity(&self) -> String {
        format!("Asset {}", self.id)
    }
}
