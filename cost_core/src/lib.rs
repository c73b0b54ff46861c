//! # cost_core - 3D-Printing Cost Engine
//!
//! `cost_core` is the computational heart of PrintCost. It estimates what a
//! printed piece costs to produce (material, electricity, printer
//! amortization, labor, accessories, failure contingency) and what to sell
//! it for, directly or through a marketplace.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: [`calculate`] is a pure function over an input and a catalog snapshot
//! - **All-or-nothing**: a missing reference fails the whole calculation, never a partial result
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use cost_core::{calculate, CalculationInput, Catalog, PricingSelection};
//!
//! let catalog = Catalog::with_defaults().unwrap();
//! let input = CalculationInput::new(
//!     catalog.materials[0].id.clone(),
//!     catalog.printer_profiles[0].id.clone(),
//!     PricingSelection::SalesProfile { id: catalog.sales_profiles[0].id.clone() },
//! )
//! .with_weight_g(25.0)
//! .with_print_time_hhmm("02:00");
//!
//! let result = calculate(&input, &catalog).unwrap();
//! println!("Cost per piece: {:.2}", result.costs.piece_total);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The cost calculator and sale pricing strategies
//! - [`catalog`] - Materials, printer/electricity/sales profiles, accessories
//! - [`project`] - Stored projects and batch recalculation
//! - [`workbook`] - Root container with settings
//! - [`file_io`] - Workbook files with atomic saves and locking
//! - [`time`] - `HH:MM` duration text
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod time;
pub mod units;
pub mod workbook;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_with, CalculationInput, CalculationResult, PricingSelection, SalePrices};
pub use catalog::{Catalog, CatalogSnapshot};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_workbook, save_workbook, FileLock};
pub use project::Project;
pub use workbook::{Workbook, WorkbookSettings};
