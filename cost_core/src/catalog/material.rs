//! Filament materials.
//!
//! Only `cost_per_kg` enters the cost formulas. Density, diameter and spool
//! weight are descriptive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require_non_negative};
use crate::errors::CalcResult;
use crate::units::Grams;

/// Default weight of a purchased spool in grams
pub const DEFAULT_SPOOL_WEIGHT_G: f64 = 1000.0;

fn default_spool_weight() -> f64 {
    DEFAULT_SPOOL_WEIGHT_G
}

/// A printable material and its purchase cost.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "pla-white",
///   "name": "PLA Generic White",
///   "cost_per_kg": 15000.0,
///   "spool_weight_g": 1000.0,
///   "density_g_cm3": 1.24,
///   "diameter_mm": 1.75,
///   "cost_updated_at": "2025-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,

    pub name: String,

    /// Purchase cost per kilogram, in the workbook currency
    pub cost_per_kg: f64,

    /// Weight of the spool this price was taken from (grams)
    #[serde(default = "default_spool_weight")]
    pub spool_weight_g: f64,

    /// Density in g/cm³
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_g_cm3: Option<f64>,

    /// Filament diameter in mm (e.g. 1.75 or 2.85)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_mm: Option<f64>,

    /// Where the material is bought
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When `cost_per_kg` was last changed
    pub cost_updated_at: DateTime<Utc>,
}

impl Material {
    /// Create a material with a fresh id.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cost_core::catalog::Material;
    ///
    /// let pla = Material::new("PLA", 15000.0).unwrap().with_diameter(1.75);
    /// assert_eq!(pla.diameter_mm, Some(1.75));
    /// ```
    pub fn new(name: impl Into<String>, cost_per_kg: f64) -> CalcResult<Self> {
        require_non_negative("cost_per_kg", cost_per_kg)?;
        Ok(Material {
            id: new_id(),
            name: name.into(),
            cost_per_kg,
            spool_weight_g: DEFAULT_SPOOL_WEIGHT_G,
            density_g_cm3: None,
            diameter_mm: None,
            product_url: None,
            notes: None,
            cost_updated_at: Utc::now(),
        })
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_density(mut self, density_g_cm3: f64) -> Self {
        self.density_g_cm3 = Some(density_g_cm3);
        self
    }

    pub fn with_diameter(mut self, diameter_mm: f64) -> Self {
        self.diameter_mm = Some(diameter_mm);
        self
    }

    pub fn with_spool_weight(mut self, spool_weight_g: f64) -> Self {
        self.spool_weight_g = spool_weight_g;
        self
    }

    /// Update the purchase cost and stamp the change time.
    pub fn set_cost_per_kg(&mut self, cost_per_kg: f64) -> CalcResult<()> {
        require_non_negative("cost_per_kg", cost_per_kg)?;
        self.cost_per_kg = cost_per_kg;
        self.cost_updated_at = Utc::now();
        Ok(())
    }

    /// Check the stored values (used when records come from outside).
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("cost_per_kg", self.cost_per_kg)
    }

    /// Cost of `weight` of this material: `(cost_per_kg / 1000) * grams`
    pub fn cost_for(&self, weight: Grams) -> f64 {
        (self.cost_per_kg / 1000.0) * weight.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_for_weight() {
        let pla = Material::new("PLA", 15000.0).unwrap();
        assert!((pla.cost_for(Grams(25.0)) - 375.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert!(Material::new("Bad", -1.0).is_err());
        let mut pla = Material::new("PLA", 10.0).unwrap();
        assert!(pla.set_cost_per_kg(f64::NAN).is_err());
        assert_eq!(pla.cost_per_kg, 10.0);
    }

    #[test]
    fn test_optional_fields_omitted_from_json() {
        let pla = Material::new("PLA", 15000.0).unwrap().with_id("m1");
        let json = serde_json::to_string(&pla).unwrap();
        assert!(!json.contains("density_g_cm3"));

        let roundtrip: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, pla);
    }
}
