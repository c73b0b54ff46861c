//! # Sale Pricing
//!
//! Turns a finished cost breakdown into sale prices. Two strategies exist:
//!
//! - [`FlatMargin`]: one margin applied to piece and batch cost.
//! - [`ChannelPricing`]: a direct-sale price plus a marketplace price solved
//!   so the seller still nets cost + margin after the marketplace's
//!   percentage commission and fixed fee.
//!
//! Both read the same `piece_total`/`batch_total`; the cost layers never
//! depend on which one is chosen.

use serde::{Deserialize, Serialize};

use super::cost::CostBreakdown;
use crate::catalog::{require_non_negative, CatalogSnapshot, SalesProfile};
use crate::errors::{CalcError, CalcResult, ReferenceKind};
use crate::units::Percent;

/// Which pricing strategy a calculation uses.
///
/// ```json
/// { "mode": "sales_profile", "id": "sp1" }
/// { "mode": "flat_margin", "margin_percent": 40.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingSelection {
    /// Channel-aware prices from a catalog sales profile
    SalesProfile { id: String },
    /// A caller-supplied margin over cost
    FlatMargin { margin_percent: f64 },
}

impl PricingSelection {
    /// Resolve the selection against a catalog snapshot.
    pub fn resolve(&self, catalog: &CatalogSnapshot<'_>) -> CalcResult<Box<dyn PricingStrategy>> {
        match self {
            PricingSelection::SalesProfile { id } => {
                let profile = catalog
                    .sales_profile(id)
                    .ok_or_else(|| CalcError::not_found(ReferenceKind::SalesProfile, id.as_str()))?;
                profile.validate()?;
                Ok(Box::new(ChannelPricing::from(profile)))
            }
            PricingSelection::FlatMargin { margin_percent } => {
                require_non_negative("margin_percent", *margin_percent)?;
                Ok(Box::new(FlatMargin {
                    margin_percent: *margin_percent,
                }))
            }
        }
    }
}

/// Sale prices produced by a [`PricingStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SalePrices {
    /// Flat margin over piece and batch cost
    SimpleMargin {
        suggested_piece: f64,
        suggested_batch: f64,
    },
    /// Direct-sale and marketplace prices, both per piece
    ChannelAware { direct: f64, marketplace: f64 },
}

impl SalePrices {
    /// The price asked for one piece when selling directly
    pub fn piece_price(&self) -> f64 {
        match *self {
            SalePrices::SimpleMargin { suggested_piece, .. } => suggested_piece,
            SalePrices::ChannelAware { direct, .. } => direct,
        }
    }

    /// Marketplace listing price, when the strategy computes one
    pub fn marketplace_price(&self) -> Option<f64> {
        match *self {
            SalePrices::SimpleMargin { .. } => None,
            SalePrices::ChannelAware { marketplace, .. } => Some(marketplace),
        }
    }

    pub(crate) fn rounded(&self, decimals: u32) -> Self {
        let r = |v: f64| crate::units::round_currency(v, decimals);
        match *self {
            SalePrices::SimpleMargin {
                suggested_piece,
                suggested_batch,
            } => SalePrices::SimpleMargin {
                suggested_piece: r(suggested_piece),
                suggested_batch: r(suggested_batch),
            },
            SalePrices::ChannelAware { direct, marketplace } => SalePrices::ChannelAware {
                direct: r(direct),
                marketplace: r(marketplace),
            },
        }
    }
}

/// Computes sale prices from a cost breakdown.
pub trait PricingStrategy {
    fn sale_prices(&self, costs: &CostBreakdown) -> CalcResult<SalePrices>;
}

/// `price = cost * (1 + margin / 100)` for both piece and batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatMargin {
    pub margin_percent: f64,
}

impl PricingStrategy for FlatMargin {
    fn sale_prices(&self, costs: &CostBreakdown) -> CalcResult<SalePrices> {
        let factor = Percent(self.margin_percent).markup_factor();
        Ok(SalePrices::SimpleMargin {
            suggested_piece: costs.piece_total * factor,
            suggested_batch: costs.batch_total * factor,
        })
    }
}

/// Direct and marketplace prices from a sales profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelPricing {
    pub direct_margin_percent: f64,
    pub commission_percent: f64,
    pub fixed_fee: f64,
}

impl From<&SalesProfile> for ChannelPricing {
    fn from(profile: &SalesProfile) -> Self {
        ChannelPricing {
            direct_margin_percent: profile.direct_margin_percent,
            commission_percent: profile.marketplace_commission_percent,
            fixed_fee: profile.marketplace_fixed_fee,
        }
    }
}

impl ChannelPricing {
    /// Solve for the listing price `P` such that
    /// `P - P * commission - fixed_fee = piece_total + desired_profit`:
    ///
    /// `P = (piece_total + desired_profit + fixed_fee) / (1 - commission / 100)`
    pub fn marketplace_price(&self, piece_total: f64) -> CalcResult<f64> {
        // Written as !(x < 100) so NaN is rejected too.
        if !(self.commission_percent < 100.0) {
            return Err(CalcError::degenerate_divisor(
                "marketplace_commission_percent",
                self.commission_percent.to_string(),
                "Commission of 100% or more leaves no sale price",
            ));
        }
        let desired_profit = piece_total * Percent(self.direct_margin_percent).fraction();
        let keep = 1.0 - Percent(self.commission_percent).fraction();
        let price = (piece_total + desired_profit + self.fixed_fee) / keep;
        if !(price.is_finite() && price > 0.0) {
            return Err(CalcError::degenerate_divisor(
                "marketplace_price",
                price.to_string(),
                "Marketplace price must be greater than zero",
            ));
        }
        Ok(price)
    }
}

impl PricingStrategy for ChannelPricing {
    fn sale_prices(&self, costs: &CostBreakdown) -> CalcResult<SalePrices> {
        let direct = costs.piece_total * Percent(self.direct_margin_percent).markup_factor();
        let marketplace = self.marketplace_price(costs.piece_total)?;
        Ok(SalePrices::ChannelAware { direct, marketplace })
    }
}
