//! Sales profiles: the margin for direct sales and the marketplace's cut.

use serde::{Deserialize, Serialize};

use super::{new_id, require_non_negative};
use crate::errors::{CalcError, CalcResult};

/// How a piece is priced for direct sale and for a marketplace listing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "sp1",
///   "name": "General",
///   "direct_margin_percent": 30.0,
///   "marketplace_commission_percent": 15.0,
///   "marketplace_fixed_fee": 800.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesProfile {
    pub id: String,
    pub name: String,
    /// Profit margin over total cost for direct sales (30.0 = 30 %)
    pub direct_margin_percent: f64,
    /// Percentage the marketplace keeps from the sale price
    pub marketplace_commission_percent: f64,
    /// Fixed amount the marketplace charges per sale
    pub marketplace_fixed_fee: f64,
}

impl SalesProfile {
    pub fn new(
        name: impl Into<String>,
        direct_margin_percent: f64,
        marketplace_commission_percent: f64,
        marketplace_fixed_fee: f64,
    ) -> CalcResult<Self> {
        let profile = SalesProfile {
            id: new_id(),
            name: name.into(),
            direct_margin_percent,
            marketplace_commission_percent,
            marketplace_fixed_fee,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Commission must leave something for the seller: 0 <= commission < 100.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("direct_margin_percent", self.direct_margin_percent)?;
        require_non_negative("marketplace_fixed_fee", self.marketplace_fixed_fee)?;
        let commission = self.marketplace_commission_percent;
        // Written as !(x < 100) so NaN is rejected too.
        if !(commission < 100.0) {
            return Err(CalcError::degenerate_divisor(
                "marketplace_commission_percent",
                commission.to_string(),
                "Commission of 100% or more leaves no sale price",
            ));
        }
        if commission < 0.0 {
            return Err(CalcError::invalid_input(
                "marketplace_commission_percent",
                commission.to_string(),
                "Commission must be at least 0 and below 100 percent",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile() {
        let profile = SalesProfile::new("General", 30.0, 15.0, 800.0).unwrap();
        assert_eq!(profile.direct_margin_percent, 30.0);
    }

    #[test]
    fn test_full_commission_rejected() {
        assert!(SalesProfile::new("Greedy", 30.0, 100.0, 0.0).is_err());
        assert!(SalesProfile::new("Odd", 30.0, -1.0, 0.0).is_err());
    }

    #[test]
    fn test_commission_error_kinds() {
        let greedy = SalesProfile::new("Greedy", 30.0, 100.0, 0.0).unwrap_err();
        assert_eq!(greedy.error_code(), "DEGENERATE_DIVISOR");
        let nan = SalesProfile::new("Nan", 30.0, f64::NAN, 0.0).unwrap_err();
        assert_eq!(nan.error_code(), "DEGENERATE_DIVISOR");
        let negative = SalesProfile::new("Odd", 30.0, -1.0, 0.0).unwrap_err();
        assert_eq!(negative.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_negative_fee_rejected() {
        assert!(SalesProfile::new("Refund", 30.0, 15.0, -5000.0).is_err());
    }
}
