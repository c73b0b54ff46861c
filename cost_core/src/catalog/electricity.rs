//! Electricity tariffs.
//!
//! A tariff is entered as one month's bill and the consumption it covers;
//! the per-kWh rate is derived from those two numbers and never stored.

use serde::{Deserialize, Serialize};

use super::{new_id, require_non_negative};
use crate::errors::{CalcError, CalcResult};

/// A monthly electricity bill used to derive a cost per kWh.
///
/// ## JSON Example
///
/// ```json
/// { "id": "ep1", "name": "General Tariff", "monthly_consumption_kwh": 150.0, "monthly_bill": 6825.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityProfile {
    pub id: String,
    pub name: String,
    /// Energy billed in one month (kWh)
    pub monthly_consumption_kwh: f64,
    /// Total amount of that month's bill
    pub monthly_bill: f64,
}

impl ElectricityProfile {
    /// Create a tariff. Consumption must be positive so the rate is defined.
    ///
    /// ```rust
    /// use cost_core::catalog::ElectricityProfile;
    ///
    /// let tariff = ElectricityProfile::new("General", 150.0, 6825.0).unwrap();
    /// assert_eq!(tariff.cost_per_kwh().unwrap(), 45.5);
    /// assert!(ElectricityProfile::new("Empty", 0.0, 100.0).is_err());
    /// ```
    pub fn new(name: impl Into<String>, monthly_consumption_kwh: f64, monthly_bill: f64) -> CalcResult<Self> {
        let profile = ElectricityProfile {
            id: new_id(),
            name: name.into(),
            monthly_consumption_kwh,
            monthly_bill,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Update the bill and consumption together. On error nothing changes.
    pub fn set_bill_and_consumption(&mut self, monthly_consumption_kwh: f64, monthly_bill: f64) -> CalcResult<()> {
        check_consumption(monthly_consumption_kwh)?;
        require_non_negative("monthly_bill", monthly_bill)?;
        self.monthly_consumption_kwh = monthly_consumption_kwh;
        self.monthly_bill = monthly_bill;
        Ok(())
    }

    pub fn validate(&self) -> CalcResult<()> {
        check_consumption(self.monthly_consumption_kwh)?;
        require_non_negative("monthly_bill", self.monthly_bill)
    }

    /// Derived rate: `monthly_bill / monthly_consumption_kwh`.
    ///
    /// Fails on a zero or negative consumption instead of returning an
    /// infinite or negative rate.
    pub fn cost_per_kwh(&self) -> CalcResult<f64> {
        check_consumption(self.monthly_consumption_kwh)?;
        Ok(self.monthly_bill / self.monthly_consumption_kwh)
    }
}

fn check_consumption(kwh: f64) -> CalcResult<()> {
    if kwh.is_finite() && kwh > 0.0 {
        Ok(())
    } else {
        Err(CalcError::degenerate_divisor(
            "monthly_consumption_kwh",
            kwh.to_string(),
            "Monthly consumption must be greater than zero",
        ))
    }
}
