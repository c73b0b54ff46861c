//! # Cost Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, catalog) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`cost`] - Per-piece and per-batch production cost
//! - [`pricing`] - Sale price strategies applied to a cost breakdown

pub mod cost;
pub mod pricing;

pub use cost::{
    calculate, calculate_with, AccessoryCostLine, AccessoryUsage, CalculationInput, CalculationResult,
    CostBreakdown,
};
pub use pricing::{ChannelPricing, FlatMargin, PricingSelection, PricingStrategy, SalePrices};
