//! # Production Cost Calculation
//!
//! Computes the cost of one printed piece and of a batch, then sale prices.
//!
//! ## Cost layers (per piece, in this order)
//!
//! 1. material = `cost_per_kg / 1000 * piece_weight_g`
//! 2. electricity = `power_watts / 1000 * print_time_hours * rate_per_kwh`
//! 3. amortization = `acquisition_cost / useful_life_hours * print_time_hours`
//! 4. operative labor = `operative_labor_rate * operative_labor_hours`
//! 5. post-processing labor = `post_processing_labor_rate * post_processing_hours`
//! 6. accessories = `Σ cost_per_unit * quantity_per_piece`
//! 7. direct subtotal = sum of 1-6
//! 8. failure contingency = `direct_subtotal * failure_rate_percent / 100`
//! 9. piece total = direct subtotal + contingency
//! 10. batch total = piece total * batch quantity
//!
//! No value is rounded here. Use [`CalculationResult::rounded`] for display.
//!
//! ## Failure policy
//!
//! Every referenced record is resolved before any arithmetic. If one is
//! missing the whole calculation fails; there is no partial result.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::calculations::{calculate, CalculationInput, PricingSelection};
//! use cost_core::catalog::Catalog;
//!
//! let catalog = Catalog::with_defaults().unwrap();
//! let input = CalculationInput::new(
//!     catalog.materials[0].id.clone(),
//!     catalog.printer_profiles[0].id.clone(),
//!     PricingSelection::SalesProfile { id: catalog.sales_profiles[0].id.clone() },
//! )
//! .with_weight_g(25.0)
//! .with_print_time_hhmm("02:00")
//! .with_batch_quantity(10);
//!
//! let result = calculate(&input, &catalog).unwrap();
//! assert_eq!(result.costs.batch_total, result.costs.piece_total * 10.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::pricing::{PricingSelection, PricingStrategy, SalePrices};
use crate::catalog::{
    require_non_negative, Accessory, CatalogSnapshot, ElectricityProfile, ElectricitySource, Material,
    PrinterProfile, SalesProfile,
};
use crate::errors::{CalcError, CalcResult, ReferenceKind};
use crate::time::hhmm_to_hours;
use crate::units::{Grams, Hours, Percent};

fn default_batch_quantity() -> u32 {
    1
}

/// One accessory line: which accessory and how many go into each piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryUsage {
    pub accessory_id: String,
    pub quantity_per_piece: f64,
}

/// Cost-driving inputs for one project.
///
/// ## JSON Example
///
/// ```json
/// {
///   "material_id": "pla-white",
///   "printer_profile_id": "ender3",
///   "pricing": { "mode": "sales_profile", "id": "general" },
///   "piece_weight_g": 25.0,
///   "print_time_hours": 2.0,
///   "operative_labor_hours": 0.25,
///   "post_processing_hours": 0.5,
///   "batch_quantity": 10,
///   "accessories": [ { "accessory_id": "magnet", "quantity_per_piece": 2.0 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub material_id: String,

    pub printer_profile_id: String,

    /// Sales profile reference or inline margin
    pub pricing: PricingSelection,

    /// Weight of one piece in grams
    pub piece_weight_g: f64,

    /// Printer time for one piece (fractional hours)
    pub print_time_hours: f64,

    /// Hands-on operator time for one piece (fractional hours)
    #[serde(default)]
    pub operative_labor_hours: f64,

    /// Post-processing time for one piece (fractional hours)
    #[serde(default)]
    pub post_processing_hours: f64,

    /// Pieces produced together
    #[serde(default = "default_batch_quantity")]
    pub batch_quantity: u32,

    #[serde(default)]
    pub accessories: Vec<AccessoryUsage>,
}

impl CalculationInput {
    /// Start an input with zero weight and times and a batch of one.
    pub fn new(
        material_id: impl Into<String>,
        printer_profile_id: impl Into<String>,
        pricing: PricingSelection,
    ) -> Self {
        CalculationInput {
            material_id: material_id.into(),
            printer_profile_id: printer_profile_id.into(),
            pricing,
            piece_weight_g: 0.0,
            print_time_hours: 0.0,
            operative_labor_hours: 0.0,
            post_processing_hours: 0.0,
            batch_quantity: 1,
            accessories: Vec::new(),
        }
    }

    pub fn with_weight_g(mut self, grams: f64) -> Self {
        self.piece_weight_g = grams;
        self
    }

    pub fn with_print_time(mut self, time: Hours) -> Self {
        self.print_time_hours = time.0;
        self
    }

    /// Print time from `HH:MM` text (malformed text counts as zero)
    pub fn with_print_time_hhmm(self, text: &str) -> Self {
        self.with_print_time(hhmm_to_hours(text))
    }

    pub fn with_operative_labor(mut self, time: Hours) -> Self {
        self.operative_labor_hours = time.0;
        self
    }

    pub fn with_operative_labor_hhmm(self, text: &str) -> Self {
        self.with_operative_labor(hhmm_to_hours(text))
    }

    pub fn with_post_processing(mut self, time: Hours) -> Self {
        self.post_processing_hours = time.0;
        self
    }

    pub fn with_post_processing_hhmm(self, text: &str) -> Self {
        self.with_post_processing(hhmm_to_hours(text))
    }

    pub fn with_batch_quantity(mut self, quantity: u32) -> Self {
        self.batch_quantity = quantity;
        self
    }

    pub fn with_accessory(mut self, accessory_id: impl Into<String>, quantity_per_piece: f64) -> Self {
        self.accessories.push(AccessoryUsage {
            accessory_id: accessory_id.into(),
            quantity_per_piece,
        });
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("piece_weight_g", self.piece_weight_g)?;
        require_non_negative("print_time_hours", self.print_time_hours)?;
        require_non_negative("operative_labor_hours", self.operative_labor_hours)?;
        require_non_negative("post_processing_hours", self.post_processing_hours)?;
        if self.batch_quantity == 0 {
            return Err(CalcError::invalid_input(
                "batch_quantity",
                "0",
                "A batch must contain at least one piece",
            ));
        }
        for line in &self.accessories {
            require_non_negative("quantity_per_piece", line.quantity_per_piece)?;
        }
        if let PricingSelection::FlatMargin { margin_percent } = self.pricing {
            require_non_negative("margin_percent", margin_percent)?;
        }
        Ok(())
    }
}

/// An accessory line as priced in this calculation.
///
/// Kept with the result so a stored project shows the unit cost it was
/// calculated with, even after the catalog price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryCostLine {
    pub accessory_id: String,
    pub name: String,
    pub unit_cost: f64,
    pub quantity_per_piece: f64,
    pub line_cost: f64,
}

/// The ten cost layers. All amounts are per piece except `batch_total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub electricity_cost: f64,
    pub amortization_cost: f64,
    pub operative_labor_cost: f64,
    pub post_processing_labor_cost: f64,
    pub accessories_cost: f64,
    /// Sum of the six direct cost layers
    pub direct_subtotal: f64,
    /// Surcharge covering failed prints
    pub failure_contingency: f64,
    /// `direct_subtotal + failure_contingency`
    pub piece_total: f64,
    /// `piece_total * batch_quantity`
    pub batch_total: f64,
}

impl CostBreakdown {
    fn rounded(&self, decimals: u32) -> Self {
        let r = |v: f64| crate::units::round_currency(v, decimals);
        CostBreakdown {
            material_cost: r(self.material_cost),
            electricity_cost: r(self.electricity_cost),
            amortization_cost: r(self.amortization_cost),
            operative_labor_cost: r(self.operative_labor_cost),
            post_processing_labor_cost: r(self.post_processing_labor_cost),
            accessories_cost: r(self.accessories_cost),
            direct_subtotal: r(self.direct_subtotal),
            failure_contingency: r(self.failure_contingency),
            piece_total: r(self.piece_total),
            batch_total: r(self.batch_total),
        }
    }
}

/// Results of a cost calculation.
///
/// A pure projection of the input and the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub costs: CostBreakdown,

    pub sale_prices: SalePrices,

    // === Rates Used ===
    /// Electricity rate after resolving the printer's source
    pub rate_per_kwh: f64,

    /// Printer amortization charged per print hour
    pub amortization_rate_per_hour: f64,

    /// Accessory unit costs at calculation time
    #[serde(default)]
    pub accessory_lines: Vec<AccessoryCostLine>,
}

impl CalculationResult {
    /// A copy with every currency amount rounded for display.
    pub fn rounded(&self, decimals: u32) -> Self {
        let r = |v: f64| crate::units::round_currency(v, decimals);
        CalculationResult {
            costs: self.costs.rounded(decimals),
            sale_prices: self.sale_prices.rounded(decimals),
            rate_per_kwh: r(self.rate_per_kwh),
            amortization_rate_per_hour: r(self.amortization_rate_per_hour),
            accessory_lines: self
                .accessory_lines
                .iter()
                .map(|line| AccessoryCostLine {
                    unit_cost: r(line.unit_cost),
                    line_cost: r(line.line_cost),
                    ..line.clone()
                })
                .collect(),
        }
    }
}

/// Everything a calculation reads, resolved from the catalog.
struct Resolved<'a> {
    material: &'a Material,
    printer: &'a PrinterProfile,
    rate_per_kwh: f64,
    accessories: Vec<(&'a Accessory, f64)>,
    pricing: Box<dyn PricingStrategy>,
}

fn missing(kind: ReferenceKind, id: &str) -> CalcError {
    warn!(%kind, id, "cannot calculate: reference not found");
    CalcError::not_found(kind, id)
}

fn rejected(kind: ReferenceKind, id: &str, error: CalcError) -> CalcError {
    warn!(%kind, id, error = %error, "cannot calculate: catalog record out of range");
    error
}

fn resolve_rate(printer: &PrinterProfile, catalog: &CatalogSnapshot<'_>) -> CalcResult<f64> {
    match &printer.electricity {
        // Range checked with the printer profile
        ElectricitySource::InlineRate { cost_per_kwh } => Ok(*cost_per_kwh),
        ElectricitySource::Profile { id } => {
            let profile = catalog
                .electricity_profile(id)
                .ok_or_else(|| missing(ReferenceKind::ElectricityProfile, id))?;
            profile
                .validate()
                .and_then(|()| profile.cost_per_kwh())
                .map_err(|e| rejected(ReferenceKind::ElectricityProfile, id, e))
        }
    }
}

/// Look up every referenced record and check its stored values.
///
/// Records can reach the calculator without passing through the catalog's
/// `add_*` checks (deserialized workbooks, [`calculate_with`] slices), so
/// each one is validated here. Printer useful life is the exception: a
/// non-positive value falls back to a divisor of 1.
fn resolve<'a>(input: &CalculationInput, catalog: &CatalogSnapshot<'a>) -> CalcResult<Resolved<'a>> {
    let material = catalog
        .material(&input.material_id)
        .ok_or_else(|| missing(ReferenceKind::Material, &input.material_id))?;
    material
        .validate()
        .map_err(|e| rejected(ReferenceKind::Material, &material.id, e))?;

    let printer = catalog
        .printer_profile(&input.printer_profile_id)
        .ok_or_else(|| missing(ReferenceKind::PrinterProfile, &input.printer_profile_id))?;
    printer
        .validate_rates()
        .map_err(|e| rejected(ReferenceKind::PrinterProfile, &printer.id, e))?;

    let pricing = input.pricing.resolve(catalog).inspect_err(|e| {
        warn!(error = %e, "cannot calculate: pricing could not be resolved");
    })?;

    let rate_per_kwh = resolve_rate(printer, catalog)?;

    let accessories = input
        .accessories
        .iter()
        .map(|line| -> CalcResult<(&'a Accessory, f64)> {
            let accessory = catalog
                .accessory(&line.accessory_id)
                .ok_or_else(|| missing(ReferenceKind::Accessory, &line.accessory_id))?;
            accessory
                .validate()
                .map_err(|e| rejected(ReferenceKind::Accessory, &accessory.id, e))?;
            Ok((accessory, line.quantity_per_piece))
        })
        .collect::<CalcResult<Vec<_>>>()?;

    Ok(Resolved {
        material,
        printer,
        rate_per_kwh,
        accessories,
        pricing,
    })
}

fn compute_costs(input: &CalculationInput, resolved: &Resolved<'_>) -> CostBreakdown {
    let printer = resolved.printer;
    let print_time = Hours(input.print_time_hours);

    let material_cost = resolved.material.cost_for(Grams(input.piece_weight_g));
    let electricity_cost = printer.electricity_cost(print_time, resolved.rate_per_kwh);
    let amortization_cost = printer.amortization_rate_per_hour() * print_time.0;
    let operative_labor_cost = printer.operative_labor_rate * input.operative_labor_hours;
    let post_processing_labor_cost = printer.post_processing_labor_rate * input.post_processing_hours;
    let accessories_cost: f64 = resolved
        .accessories
        .iter()
        .map(|(accessory, quantity)| accessory.cost_for(*quantity))
        .sum();

    let direct_subtotal = material_cost
        + electricity_cost
        + amortization_cost
        + operative_labor_cost
        + post_processing_labor_cost
        + accessories_cost;
    let failure_contingency = direct_subtotal * Percent(printer.failure_rate_percent).fraction();
    let piece_total = direct_subtotal + failure_contingency;
    let batch_total = piece_total * f64::from(input.batch_quantity);

    CostBreakdown {
        material_cost,
        electricity_cost,
        amortization_cost,
        operative_labor_cost,
        post_processing_labor_cost,
        accessories_cost,
        direct_subtotal,
        failure_contingency,
        piece_total,
        batch_total,
    }
}

/// Calculate piece and batch costs and sale prices.
///
/// This is a pure function: it reads the input and the catalog snapshot and
/// mutates nothing, so it may run concurrently over a shared catalog.
///
/// # Arguments
///
/// * `input` - Cost-driving inputs of one project
/// * `catalog` - A [`Catalog`](crate::catalog::Catalog) reference or any
///   [`CatalogSnapshot`]
///
/// # Returns
///
/// * `Ok(CalculationResult)` - All cost layers and sale prices
/// * `Err(CalcError)` - A reference is missing, an input is invalid, or a
///   divisor is degenerate; see [`CalcError::is_cannot_calculate`]
pub fn calculate<'a>(
    input: &CalculationInput,
    catalog: impl Into<CatalogSnapshot<'a>>,
) -> CalcResult<CalculationResult> {
    let catalog = catalog.into();

    input.validate().inspect_err(|e| {
        warn!(error = %e, "cannot calculate: invalid input");
    })?;

    let resolved = resolve(input, &catalog)?;
    let costs = compute_costs(input, &resolved);
    let sale_prices = resolved.pricing.sale_prices(&costs).inspect_err(|e| {
        warn!(error = %e, "cannot calculate: sale price undefined");
    })?;

    debug!(
        material_id = %input.material_id,
        printer_profile_id = %input.printer_profile_id,
        piece_total = costs.piece_total,
        batch_total = costs.batch_total,
        "cost calculated"
    );

    let accessory_lines = resolved
        .accessories
        .iter()
        .map(|(accessory, quantity)| AccessoryCostLine {
            accessory_id: accessory.id.clone(),
            name: accessory.name.clone(),
            unit_cost: accessory.cost_per_unit,
            quantity_per_piece: *quantity,
            line_cost: accessory.cost_for(*quantity),
        })
        .collect();

    Ok(CalculationResult {
        costs,
        sale_prices,
        rate_per_kwh: resolved.rate_per_kwh,
        amortization_rate_per_hour: resolved.printer.amortization_rate_per_hour(),
        accessory_lines,
    })
}

/// [`calculate`] over five separately loaded catalog slices.
pub fn calculate_with(
    input: &CalculationInput,
    materials: &[Material],
    printer_profiles: &[PrinterProfile],
    accessories: &[Accessory],
    electricity_profiles: &[ElectricityProfile],
    sales_profiles: &[SalesProfile],
) -> CalcResult<CalculationResult> {
    calculate(
        input,
        CatalogSnapshot {
            materials,
            printer_profiles,
            accessories,
            electricity_profiles,
            sales_profiles,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    const TOL: f64 = 1e-9;

    /// The worked example: PLA at 15000/kg, 25 g, 2 h on a 200 W printer at
    /// 45.5/kWh, 1.2M over 4000 h, 5 % failures, 30 % margin.
    fn scenario() -> (Catalog, CalculationInput) {
        let mut catalog = Catalog::default();
        catalog
            .add_electricity_profile(ElectricityProfile::new("Tariff", 150.0, 6825.0).unwrap().with_id("ep1"))
            .unwrap();
        catalog
            .add_printer_profile(
                PrinterProfile::new("Ender", ElectricitySource::Profile { id: "ep1".into() })
                    .with_id("pp1")
                    .with_power_watts(200.0)
                    .with_amortization(1_200_000.0, 4000.0)
                    .with_failure_rate(5.0)
                    .with_labor_rates(2500.0, 2000.0),
            )
            .unwrap();
        catalog
            .add_material(Material::new("PLA", 15000.0).unwrap().with_id("m1"))
            .unwrap();
        catalog
            .add_sales_profile(SalesProfile::new("General", 30.0, 15.0, 800.0).unwrap().with_id("sp1"))
            .unwrap();
        catalog
            .add_accessory(Accessory::from_package("Magnet", 200.0, 10).unwrap().with_id("acc2"))
            .unwrap();

        let input = CalculationInput::new("m1", "pp1", PricingSelection::SalesProfile { id: "sp1".into() })
            .with_weight_g(25.0)
            .with_print_time(Hours(2.0))
            .with_batch_quantity(10);
        (catalog, input)
    }

    #[test]
    fn test_worked_example() {
        let (catalog, input) = scenario();
        let result = calculate(&input, &catalog).unwrap();
        let c = result.costs;

        assert!((c.material_cost - 375.0).abs() < TOL);
        assert!((c.electricity_cost - 18.2).abs() < TOL);
        assert!((c.amortization_cost - 600.0).abs() < TOL);
        assert_eq!(c.operative_labor_cost, 0.0);
        assert_eq!(c.post_processing_labor_cost, 0.0);
        assert_eq!(c.accessories_cost, 0.0);
        assert!((c.direct_subtotal - 993.2).abs() < TOL);
        assert!((c.failure_contingency - 49.66).abs() < TOL);
        assert!((c.piece_total - 1042.86).abs() < TOL);
        assert!((c.batch_total - 10428.6).abs() < 1e-8);

        let direct = result.sale_prices.piece_price();
        assert!((direct - 1355.718).abs() < 1e-8);
        assert_eq!(result.rounded(2).sale_prices.piece_price(), 1355.72);
        assert_eq!(result.rate_per_kwh, 45.5);
        assert_eq!(result.amortization_rate_per_hour, 300.0);
    }

    #[test]
    fn test_subtotal_is_exact_sum_of_layers() {
        let (catalog, input) = scenario();
        let input = input
            .with_operative_labor(Hours(0.25))
            .with_post_processing(Hours(0.5))
            .with_accessory("acc2", 2.0);
        let c = calculate(&input, &catalog).unwrap().costs;

        assert_eq!(
            c.direct_subtotal,
            c.material_cost
                + c.electricity_cost
                + c.amortization_cost
                + c.operative_labor_cost
                + c.post_processing_labor_cost
                + c.accessories_cost
        );
        assert_eq!(c.piece_total, c.direct_subtotal + c.failure_contingency);
        assert_eq!(c.operative_labor_cost, 625.0);
        assert_eq!(c.post_processing_labor_cost, 1000.0);
        assert_eq!(c.accessories_cost, 40.0);
    }

    #[test]
    fn test_batch_of_one_equals_piece() {
        let (catalog, input) = scenario();
        let c = calculate(&input.with_batch_quantity(1), &catalog).unwrap().costs;
        assert_eq!(c.batch_total, c.piece_total);
    }

    #[test]
    fn test_zero_batch_rejected() {
        let (catalog, input) = scenario();
        let err = calculate(&input.with_batch_quantity(0), &catalog).unwrap_err();
        assert!(err.is_cannot_calculate());
    }

    #[test]
    fn test_unknown_material_fails() {
        let (catalog, mut input) = scenario();
        input.material_id = "nope".into();
        let err = calculate(&input, &catalog).unwrap_err();
        assert_eq!(err, CalcError::not_found(ReferenceKind::Material, "nope"));
    }

    #[test]
    fn test_unknown_accessory_fails_whole_calculation() {
        let (catalog, input) = scenario();
        let input = input.with_accessory("acc2", 1.0).with_accessory("ghost", 1.0);
        let err = calculate(&input, &catalog).unwrap_err();
        assert_eq!(err, CalcError::not_found(ReferenceKind::Accessory, "ghost"));
    }

    #[test]
    fn test_missing_electricity_profile_fails() {
        let (mut catalog, input) = scenario();
        catalog.electricity_profiles.clear();
        let err = calculate(&input, &catalog).unwrap_err();
        assert_eq!(err, CalcError::not_found(ReferenceKind::ElectricityProfile, "ep1"));
    }

    #[test]
    fn test_zero_consumption_fails_at_calculation() {
        let (mut catalog, input) = scenario();
        catalog.electricity_profiles[0].monthly_consumption_kwh = 0.0;
        let err = calculate(&input, &catalog).unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_DIVISOR");
    }

    #[test]
    fn test_inline_rate_matches_profile_rate() {
        let (mut catalog, input) = scenario();
        let by_profile = calculate(&input, &catalog).unwrap();
        catalog.printer_profiles[0].electricity = ElectricitySource::InlineRate { cost_per_kwh: 45.5 };
        catalog.electricity_profiles.clear();
        let inline = calculate(&input, &catalog).unwrap();
        assert_eq!(by_profile.costs, inline.costs);
    }

    #[test]
    fn test_flat_margin_mode() {
        let (catalog, mut input) = scenario();
        input.pricing = PricingSelection::FlatMargin { margin_percent: 30.0 };
        let result = calculate(&input, &catalog).unwrap();
        match result.sale_prices {
            SalePrices::SimpleMargin {
                suggested_piece,
                suggested_batch,
            } => {
                assert!((suggested_piece - result.costs.piece_total * 1.3).abs() < TOL);
                assert!((suggested_batch - result.costs.batch_total * 1.3).abs() < 1e-8);
            }
            other => panic!("expected simple margin prices, got {:?}", other),
        }
    }

    #[test]
    fn test_calculate_with_slices() {
        let (catalog, input) = scenario();
        let from_slices = calculate_with(
            &input,
            &catalog.materials,
            &catalog.printer_profiles,
            &catalog.accessories,
            &catalog.electricity_profiles,
            &catalog.sales_profiles,
        )
        .unwrap();
        assert_eq!(from_slices, calculate(&input, &catalog).unwrap());
    }

    #[test]
    fn test_accessory_lines_snapshot() {
        let (catalog, input) = scenario();
        let result = calculate(&input.with_accessory("acc2", 3.0), &catalog).unwrap();
        assert_eq!(result.accessory_lines.len(), 1);
        assert_eq!(result.accessory_lines[0].unit_cost, 20.0);
        assert_eq!(result.accessory_lines[0].line_cost, 60.0);
        assert_eq!(result.accessory_lines[0].name, "Magnet");
    }

    #[test]
    fn test_input_defaults_from_json() {
        let json = r#"{
            "material_id": "m1",
            "printer_profile_id": "pp1",
            "pricing": { "mode": "sales_profile", "id": "sp1" },
            "piece_weight_g": 25.0,
            "print_time_hours": 2.0
        }"#;
        let input: CalculationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.batch_quantity, 1);
        assert_eq!(input.operative_labor_hours, 0.0);
        assert!(input.accessories.is_empty());
    }

    #[test]
    fn test_stored_records_out_of_range_fail() {
        let (catalog, input) = scenario();

        let mut negative_material = catalog.clone();
        negative_material.materials[0].cost_per_kg = -15000.0;
        assert!(calculate(&input, &negative_material).unwrap_err().is_cannot_calculate());

        let mut negative_failure = catalog.clone();
        negative_failure.printer_profiles[0].failure_rate_percent = -50.0;
        assert!(calculate(&input, &negative_failure).is_err());

        let mut negative_bill = catalog.clone();
        negative_bill.electricity_profiles[0].monthly_bill = -6825.0;
        assert!(calculate(&input, &negative_bill).is_err());

        let mut negative_accessory = catalog;
        negative_accessory.accessories[0].cost_per_unit = -20.0;
        let err = calculate(&input.with_accessory("acc2", 1.0), &negative_accessory).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_stored_zero_useful_life_still_calculates() {
        let (mut catalog, input) = scenario();
        catalog.printer_profiles[0].useful_life_hours = 0.0;
        let result = calculate(&input, &catalog).unwrap();
        assert_eq!(result.amortization_rate_per_hour, 1_200_000.0);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let (catalog, input) = scenario();
        let err = calculate(&input.with_weight_g(-1.0), &catalog).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
