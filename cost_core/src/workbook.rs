//! # Workbook Data Structures
//!
//! The `Workbook` struct is the root container for everything a user keeps:
//! the reference catalog, workbook settings, and all costed projects.
//! Workbooks serialize to `.pcw` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Workbook
//! ├── meta: WorkbookMetadata (version, owner, timestamps)
//! ├── settings: WorkbookSettings (currency, display, defaults)
//! ├── catalog: Catalog (materials, printers, accessories, tariffs, sales profiles)
//! └── projects: HashMap<Uuid, Project>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cost_core::workbook::Workbook;
//!
//! let workbook = Workbook::with_defaults("Maker Shop").unwrap();
//! let json = serde_json::to_string_pretty(&workbook).unwrap();
//! assert!(json.contains("Maker Shop"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationInput, PricingSelection};
use crate::catalog::Catalog;
use crate::errors::CalcResult;
use crate::project::{recalculate_all, Project, RecalculationSummary};

/// Current schema version for .pcw files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root workbook container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub meta: WorkbookMetadata,

    #[serde(default)]
    pub settings: WorkbookSettings,

    #[serde(default)]
    pub catalog: Catalog,

    /// All projects, keyed by UUID
    #[serde(default)]
    pub projects: HashMap<Uuid, Project>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new(owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Workbook {
            meta: WorkbookMetadata {
                version: SCHEMA_VERSION.to_string(),
                owner: owner.into(),
                created: now,
                modified: now,
            },
            settings: WorkbookSettings::default(),
            catalog: Catalog::default(),
            projects: HashMap::new(),
        }
    }

    /// Create a workbook whose catalog holds the default records, with the
    /// default sales profile preselected for new projects.
    pub fn with_defaults(owner: impl Into<String>) -> CalcResult<Self> {
        let mut workbook = Workbook::new(owner);
        workbook.catalog = Catalog::with_defaults()?;
        workbook.settings.default_sales_profile_id =
            workbook.catalog.sales_profiles.first().map(|s| s.id.clone());
        Ok(workbook)
    }

    /// Pricing for a new project when the user picks none: the default sales
    /// profile if one is set, otherwise the fallback flat margin.
    pub fn default_pricing(&self) -> PricingSelection {
        match &self.settings.default_sales_profile_id {
            Some(id) => PricingSelection::SalesProfile { id: id.clone() },
            None => PricingSelection::FlatMargin {
                margin_percent: self.settings.fallback_margin_percent,
            },
        }
    }

    /// Add a project; returns the UUID assigned to it.
    pub fn add_project(&mut self, project: Project) -> Uuid {
        let id = Uuid::new_v4();
        self.projects.insert(id, project);
        self.touch();
        id
    }

    /// Create a project from `input`, calculate it, and add it.
    ///
    /// Nothing is added when the calculation fails.
    pub fn add_calculated_project(&mut self, name: impl Into<String>, input: CalculationInput) -> CalcResult<Uuid> {
        let mut project = Project::new(name, input);
        project.recalculate(&self.catalog)?;
        Ok(self.add_project(project))
    }

    /// Remove a project by UUID.
    pub fn remove_project(&mut self, id: &Uuid) -> Option<Project> {
        let project = self.projects.remove(id);
        if project.is_some() {
            self.touch();
        }
        project
    }

    pub fn get_project(&self, id: &Uuid) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Recalculate every project against this workbook's catalog.
    pub fn recalculate_all(&mut self) -> RecalculationSummary {
        let summary = recalculate_all(&mut self.projects, &self.catalog);
        if !summary.updated.is_empty() {
            self.touch();
        }
        summary
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Workbook::new("")
    }
}

/// Workbook metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Shop or person owning the workbook
    pub owner: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Workbook settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookSettings {
    /// ISO currency code all amounts are expressed in
    pub currency: String,

    /// Decimal places used when displaying amounts
    pub display_decimals: u32,

    /// Sales profile preselected for new projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sales_profile_id: Option<String>,

    /// Margin used when no sales profile is selected
    pub fallback_margin_percent: f64,

    /// Batch size preselected for new projects
    pub default_batch_quantity: u32,
}

impl Default for WorkbookSettings {
    fn default() -> Self {
        WorkbookSettings {
            currency: "ARS".to_string(),
            display_decimals: 2,
            default_sales_profile_id: None,
            fallback_margin_percent: 30.0,
            default_batch_quantity: 1,
        }
    }
}
