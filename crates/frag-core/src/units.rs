//! Unit newtypes for fragility quantities.
//!
//! Wind speeds and lifetimes are both plain `f64` in the source data, and the
//! design-life model divides one age by another. Wrapping them keeps a wind
//! speed from ever being used where a lifetime is expected.
//!
//! # Usage
//!
//! ```
//! use frag_core::units::{Mph, Years};
//!
//! let life = Years(60.0) * 0.8;
//! let age = Years(24.0);
//! let ratio = age / life; // plain f64
//! assert!((ratio - 0.5).abs() < 1e-12);
//!
//! let gust = Mph(85.0);
//! assert_eq!(gust.value(), 85.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// Wind speed in miles per hour.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Mph(pub f64);

impl Mph {
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whole-number speed, used for column labels such as `_85_mph`.
    pub fn whole(self) -> u32 {
        self.0.round().max(0.0) as u32
    }
}

/// Durations in years (component age, design life).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Years(pub f64);

impl Years {
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Age in whole calendar years between an installation year and a reference year.
    pub fn between(installed_year: i32, as_of_year: i32) -> Self {
        Self(f64::from(as_of_year - installed_year))
    }
}

/// Scaling a life by a dimensionless adjustment.
impl Mul<f64> for Years {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Age over life is dimensionless.
impl Div for Years {
    type Output = f64;
    fn div(self, rhs: Years) -> Self::Output {
        self.0 / rhs.0
    }
}
