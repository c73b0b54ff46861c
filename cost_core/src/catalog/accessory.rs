//! Accessories bought in packages (key rings, magnets, screws).
//!
//! The unit cost is derived from the package price whenever either the price
//! or the package size changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require_non_negative};
use crate::errors::{CalcError, CalcResult};

/// An accessory added to printed pieces.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "acc2",
///   "name": "Neodymium magnet 6x2mm",
///   "package_price": 200.0,
///   "units_per_package": 10,
///   "cost_per_unit": 20.0,
///   "cost_updated_at": "2025-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub id: String,
    pub name: String,
    /// Price paid for one package
    pub package_price: f64,
    /// Units contained in one package
    pub units_per_package: u32,
    /// Derived: `package_price / units_per_package`
    pub cost_per_unit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub cost_updated_at: DateTime<Utc>,
}

impl Accessory {
    /// Create an accessory from its package price.
    ///
    /// ```rust
    /// use cost_core::catalog::Accessory;
    ///
    /// let ring = Accessory::from_package("Key ring", 50.0, 100).unwrap();
    /// assert_eq!(ring.cost_per_unit, 0.5);
    /// assert!(Accessory::from_package("Empty box", 50.0, 0).is_err());
    /// ```
    pub fn from_package(name: impl Into<String>, package_price: f64, units_per_package: u32) -> CalcResult<Self> {
        let cost_per_unit = unit_cost(package_price, units_per_package)?;
        Ok(Accessory {
            id: new_id(),
            name: name.into(),
            package_price,
            units_per_package,
            cost_per_unit,
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

    pub fn with_product_url(mut self, url: impl Into<String>) -> Self {
        self.product_url = Some(url.into());
        self
    }

    /// Change the package price and/or size and re-derive the unit cost.
    pub fn update_package(&mut self, package_price: Option<f64>, units_per_package: Option<u32>) -> CalcResult<()> {
        let price = package_price.unwrap_or(self.package_price);
        let units = units_per_package.unwrap_or(self.units_per_package);
        self.cost_per_unit = unit_cost(price, units)?;
        self.package_price = price;
        self.units_per_package = units;
        self.cost_updated_at = Utc::now();
        Ok(())
    }

    pub fn validate(&self) -> CalcResult<()> {
        unit_cost(self.package_price, self.units_per_package)?;
        require_non_negative("cost_per_unit", self.cost_per_unit)
    }

    /// Cost of `quantity` units
    pub fn cost_for(&self, quantity: f64) -> f64 {
        self.cost_per_unit * quantity
    }
}

fn unit_cost(package_price: f64, units_per_package: u32) -> CalcResult<f64> {
    require_non_negative("package_price", package_price)?;
    if units_per_package == 0 {
        return Err(CalcError::degenerate_divisor(
            "units_per_package",
            "0",
            "A package must contain at least one unit",
        ));
    }
    Ok(package_price / f64::from(units_per_package))
}
