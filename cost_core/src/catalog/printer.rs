//! Printer profiles: power draw, amortization, failure rate and labor rates.
//!
//! Two schema generations exist for the electricity rate. Newer profiles
//! point at an [`ElectricityProfile`](super::ElectricityProfile) by id; older
//! ones carry their own per-kWh cost. [`ElectricitySource`] holds either, and
//! the calculator turns it into a single rate before any formula runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, require_non_negative};
use crate::errors::{CalcError, CalcResult};
use crate::units::{Hours, Kilowatts, Watts};

/// Where a printer profile gets its electricity rate from.
///
/// ```json
/// { "source": "profile", "id": "ep1" }
/// { "source": "inline_rate", "cost_per_kwh": 40.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ElectricitySource {
    /// Rate derived from a catalog electricity profile
    Profile { id: String },
    /// Rate stored directly on the printer profile (legacy records)
    InlineRate { cost_per_kwh: f64 },
}

/// A printer and the operating costs charged per print.
///
/// Optional numeric fields default to zero when absent from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterProfile {
    pub id: String,

    pub name: String,

    /// Printer model (e.g. "Creality Ender 3 Pro")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Average power draw while printing (W)
    #[serde(default)]
    pub power_watts: f64,

    pub electricity: ElectricitySource,

    /// Purchase price of the printer
    #[serde(default)]
    pub acquisition_cost: f64,

    /// Expected printing hours before the printer is written off
    #[serde(default)]
    pub useful_life_hours: f64,

    /// Expected share of failed prints, as a percentage (5.0 = 5 %)
    #[serde(default)]
    pub failure_rate_percent: f64,

    /// Hourly rate for hands-on operator time
    #[serde(default)]
    pub operative_labor_rate: f64,

    /// Hourly rate for post-processing (support removal, sanding, painting)
    #[serde(default)]
    pub post_processing_labor_rate: f64,

    pub config_updated_at: DateTime<Utc>,
}

impl PrinterProfile {
    /// Create a profile with zeroed rates; fill them in with the `with_*` builders.
    ///
    /// ```rust
    /// use cost_core::catalog::{ElectricitySource, PrinterProfile};
    ///
    /// let ender = PrinterProfile::new("Ender 3", ElectricitySource::InlineRate { cost_per_kwh: 40.0 })
    ///     .with_power_watts(200.0)
    ///     .with_amortization(1_200_000.0, 4000.0)
    ///     .with_failure_rate(5.0);
    /// assert_eq!(ender.amortization_rate_per_hour(), 300.0);
    /// assert!(ender.validate().is_ok());
    /// ```
    pub fn new(name: impl Into<String>, electricity: ElectricitySource) -> Self {
        PrinterProfile {
            id: new_id(),
            name: name.into(),
            model: None,
            power_watts: 0.0,
            electricity,
            acquisition_cost: 0.0,
            useful_life_hours: 0.0,
            failure_rate_percent: 0.0,
            operative_labor_rate: 0.0,
            post_processing_labor_rate: 0.0,
            config_updated_at: Utc::now(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_power_watts(mut self, watts: f64) -> Self {
        self.power_watts = watts;
        self
    }

    pub fn with_amortization(mut self, acquisition_cost: f64, useful_life_hours: f64) -> Self {
        self.acquisition_cost = acquisition_cost;
        self.useful_life_hours = useful_life_hours;
        self
    }

    pub fn with_failure_rate(mut self, percent: f64) -> Self {
        self.failure_rate_percent = percent;
        self
    }

    pub fn with_labor_rates(mut self, operative: f64, post_processing: f64) -> Self {
        self.operative_labor_rate = operative;
        self.post_processing_labor_rate = post_processing;
        self
    }

    /// Validate a profile before it enters the catalog.
    ///
    /// Useful life must be positive here even though the calculator
    /// tolerates a zero value in records that skipped this check.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.useful_life_hours.is_finite() && self.useful_life_hours > 0.0) {
            return Err(CalcError::invalid_input(
                "useful_life_hours",
                self.useful_life_hours.to_string(),
                "Useful life must be greater than zero hours",
            ));
        }
        self.validate_rates()
    }

    /// The checks a stored profile must pass before it is used in a
    /// calculation: every rate non-negative and the failure rate a percentage.
    pub fn validate_rates(&self) -> CalcResult<()> {
        require_non_negative("power_watts", self.power_watts)?;
        require_non_negative("acquisition_cost", self.acquisition_cost)?;
        require_non_negative("operative_labor_rate", self.operative_labor_rate)?;
        require_non_negative("post_processing_labor_rate", self.post_processing_labor_rate)?;

        if !(0.0..=100.0).contains(&self.failure_rate_percent) {
            return Err(CalcError::invalid_input(
                "failure_rate_percent",
                self.failure_rate_percent.to_string(),
                "Failure rate must be between 0 and 100",
            ));
        }
        if let ElectricitySource::InlineRate { cost_per_kwh } = self.electricity {
            require_non_negative("cost_per_kwh", cost_per_kwh)?;
        }
        Ok(())
    }

    /// Power draw in kilowatts
    pub fn power(&self) -> Kilowatts {
        Watts(self.power_watts).into()
    }

    /// `acquisition_cost / useful_life_hours`, with a divisor of 1 when the
    /// useful life is zero, negative or missing.
    pub fn amortization_rate_per_hour(&self) -> f64 {
        let divisor = if self.useful_life_hours > 0.0 {
            self.useful_life_hours
        } else {
            1.0
        };
        self.acquisition_cost / divisor
    }

    /// Energy cost of running this printer for `time` at `rate_per_kwh`
    pub fn electricity_cost(&self, time: Hours, rate_per_kwh: f64) -> f64 {
        (self.power() * time).0 * rate_per_kwh
    }

    /// Id of the referenced electricity profile, if any
    pub fn electricity_profile_id(&self) -> Option<&str> {
        match &self.electricity {
            ElectricitySource::Profile { id } => Some(id),
            ElectricitySource::InlineRate { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ender() -> PrinterProfile {
        PrinterProfile::new("Ender 3 Pro", ElectricitySource::Profile { id: "ep1".into() })
            .with_power_watts(200.0)
            .with_amortization(1_200_000.0, 4000.0)
            .with_failure_rate(5.0)
            .with_labor_rates(2500.0, 2000.0)
    }

    #[test]
    fn test_amortization_rate() {
        assert_eq!(ender().amortization_rate_per_hour(), 300.0);
    }

    #[test]
    fn test_zero_useful_life_uses_unit_divisor() {
        let printer = ender().with_amortization(1000.0, 0.0);
        assert_eq!(printer.amortization_rate_per_hour(), 1000.0);
    }

    #[test]
    fn test_zero_useful_life_rejected_by_validation() {
        let printer = ender().with_amortization(1000.0, 0.0);
        let err = printer.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "useful_life_hours"));
    }

    #[test]
    fn test_failure_rate_range() {
        assert!(ender().with_failure_rate(101.0).validate().is_err());
        assert!(ender().with_failure_rate(-1.0).validate().is_err());
        assert!(ender().with_failure_rate(100.0).validate().is_ok());
    }

    #[test]
    fn test_stored_rates_checked_without_useful_life() {
        let legacy = ender().with_amortization(1000.0, 0.0);
        assert!(legacy.validate_rates().is_ok());

        assert!(ender().with_failure_rate(-50.0).validate_rates().is_err());
        assert!(ender().with_labor_rates(-1.0, 0.0).validate_rates().is_err());

        let mut negative_rate = ender();
        negative_rate.electricity = ElectricitySource::InlineRate { cost_per_kwh: -45.5 };
        assert!(negative_rate.validate_rates().is_err());
    }

    #[test]
    fn test_electricity_cost() {
        let cost = ender().electricity_cost(Hours(2.0), 45.5);
        assert!((cost - 18.2).abs() < 1e-9);
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&ElectricitySource::InlineRate { cost_per_kwh: 40.0 }).unwrap();
        assert_eq!(json, r#"{"source":"inline_rate","cost_per_kwh":40.0}"#);
        assert_eq!(ender().electricity_profile_id(), Some("ep1"));
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let json = r#"{
            "id": "pp1",
            "name": "Minimal",
            "electricity": { "source": "inline_rate", "cost_per_kwh": 40.0 },
            "config_updated_at": "2025-01-01T00:00:00Z"
        }"#;
        let printer: PrinterProfile = serde_json::from_str(json).unwrap();
        assert_eq!(printer.power_watts, 0.0);
        assert_eq!(printer.useful_life_hours, 0.0);
        assert_eq!(printer.amortization_rate_per_hour(), 0.0);
    }
}
