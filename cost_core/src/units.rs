//! # Unit Types
//!
//! Type-safe wrappers for the physical quantities that drive printing cost.
//! These are plain `f64` newtypes that serialize as bare numbers.
//!
//! The catalog records and calculation inputs store raw `f64` fields so the
//! JSON stays flat; these wrappers are used at the formula boundary where
//! mixing watts with kilowatts or percentages with fractions would be easy.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::units::{Hours, Kilowatts, Percent, Watts};
//!
//! let draw: Kilowatts = Watts(200.0).into();
//! assert_eq!(draw.0, 0.2);
//! assert_eq!((draw * Hours(2.0)).0, 0.4);
//!
//! assert_eq!(Percent(5.0).fraction(), 0.05);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Mul;

// ============================================================================
// Mass
// ============================================================================

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

// ============================================================================
// Power Units
// ============================================================================

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

/// Power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

impl From<Watts> for Kilowatts {
    fn from(w: Watts) -> Self {
        Kilowatts(w.0 / 1000.0)
    }
}

// ============================================================================
// Time and Energy
// ============================================================================

/// Duration in fractional hours (3.5 = three and a half hours)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(pub f64);

/// Energy in kilowatt-hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KilowattHours(pub f64);

impl Mul<Hours> for Kilowatts {
    type Output = KilowattHours;
    fn mul(self, rhs: Hours) -> KilowattHours {
        KilowattHours(self.0 * rhs.0)
    }
}

// ============================================================================
// Ratios
// ============================================================================

/// A percentage as entered by users (5.0 means 5 %)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub f64);

impl Percent {
    /// The percentage as a fraction (5 % -> 0.05)
    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }

    /// Multiplier for a markup of this percentage (30 % -> 1.30)
    pub fn markup_factor(self) -> f64 {
        1.0 + self.fraction()
    }
}

// ============================================================================
// Currency Display
// ============================================================================

/// Most decimal places [`round_currency`] honours
pub const MAX_DISPLAY_DECIMALS: u32 = 10;

/// Round a currency amount for display.
///
/// Calculations never round intermediate values; call this only when
/// presenting a result. `decimals` is capped at [`MAX_DISPLAY_DECIMALS`].
pub fn round_currency(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_DISPLAY_DECIMALS) as i32);
    (value * factor).round() / factor
}
