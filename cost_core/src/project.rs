//! # Projects
//!
//! A project is one printable item: its calculation inputs, descriptive
//! metadata, and the last results the calculator produced for it.
//!
//! When catalog prices change, stored results go stale. [`recalculate_all`]
//! re-runs the calculator for every project against the current catalog and
//! reports which ones could not be recalculated.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::calculations::{CalculationInput, PricingSelection};
//! use cost_core::catalog::Catalog;
//! use cost_core::project::Project;
//!
//! let catalog = Catalog::with_defaults().unwrap();
//! let input = CalculationInput::new(
//!     catalog.materials[0].id.clone(),
//!     catalog.printer_profiles[0].id.clone(),
//!     PricingSelection::FlatMargin { margin_percent: 40.0 },
//! )
//! .with_weight_g(12.0)
//! .with_print_time_hhmm("01:15");
//!
//! let mut project = Project::new("Keychain", input);
//! project.recalculate(&catalog).unwrap();
//! assert!(project.results.is_some());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculations::{calculate, CalculationInput, CalculationResult};
use crate::catalog::Catalog;
use crate::errors::{CalcError, CalcResult};

/// A costed project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form tag names used for filtering
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub image_urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created: DateTime<Utc>,

    /// When `results` was last produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_calculated: Option<DateTime<Utc>>,

    pub input: CalculationInput,

    /// Results of the last successful calculation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<CalculationResult>,
}

impl Project {
    pub fn new(name: impl Into<String>, input: CalculationInput) -> Self {
        Project {
            name: name.into(),
            description: None,
            tags: Vec::new(),
            image_urls: Vec::new(),
            notes: None,
            created: Utc::now(),
            last_calculated: None,
            input,
            results: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Case-insensitive tag check
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Re-run the calculator against `catalog`.
    ///
    /// On success the results and the calculation time are replaced. On
    /// failure the previous results are kept and the error is returned.
    pub fn recalculate(&mut self, catalog: &Catalog) -> CalcResult<&CalculationResult> {
        let results = calculate(&self.input, catalog)?;
        self.last_calculated = Some(Utc::now());
        Ok(&*self.results.insert(results))
    }
}

/// Outcome of [`recalculate_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecalculationSummary {
    /// Projects whose results were refreshed
    pub updated: Vec<Uuid>,
    /// Projects that could not be recalculated, with the reason
    pub failed: Vec<(Uuid, CalcError)>,
}

impl RecalculationSummary {
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Recalculate every project against the current catalog.
///
/// One project failing does not stop the others.
pub fn recalculate_all(projects: &mut HashMap<Uuid, Project>, catalog: &Catalog) -> RecalculationSummary {
    let mut summary = RecalculationSummary::default();
    for (id, project) in projects.iter_mut() {
        match project.recalculate(catalog) {
            Ok(_) => summary.updated.push(*id),
            Err(e) => {
                warn!(project_id = %id, project = %project.name, error = %e, "recalculation failed");
                summary.failed.push((*id, e));
            }
        }
    }
    summary.updated.sort();
    summary.failed.sort_by_key(|(id, _)| *id);
    info!(
        updated = summary.updated.len(),
        failed = summary.failed.len(),
        "recalculated all projects"
    );
    summary
}

/// Projects carrying `tag` whose name contains `search` (both case-insensitive).
///
/// Either filter may be omitted.
pub fn filter_projects<'a>(
    projects: &'a HashMap<Uuid, Project>,
    tag: Option<&str>,
    search: Option<&str>,
) -> Vec<(&'a Uuid, &'a Project)> {
    let needle = search.map(str::to_lowercase);
    let mut matches: Vec<_> = projects
        .iter()
        .filter(|(_, p)| tag.map_or(true, |t| p.has_tag(t)))
        .filter(|(_, p)| {
            needle
                .as_deref()
                .map_or(true, |n| p.name.to_lowercase().contains(n))
        })
        .collect();
    matches.sort_by(|a, b| a.1.name.cmp(&b.1.name));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::PricingSelection;

    fn default_input(catalog: &Catalog) -> CalculationInput {
        CalculationInput::new(
            catalog.materials[0].id.clone(),
            catalog.printer_profiles[0].id.clone(),
            PricingSelection::SalesProfile {
                id: catalog.sales_profiles[0].id.clone(),
            },
        )
        .with_weight_g(30.0)
        .with_print_time_hhmm("03:30")
    }

    #[test]
    fn test_recalculate_stores_results() {
        let catalog = Catalog::with_defaults().unwrap();
        let mut project = Project::new("Vase", default_input(&catalog));
        let piece_total = project.recalculate(&catalog).unwrap().costs.piece_total;
        assert!(piece_total > 0.0);
        assert!(project.last_calculated.is_some());
    }

    #[test]
    fn test_failed_recalculation_keeps_previous_results() {
        let mut catalog = Catalog::with_defaults().unwrap();
        let mut project = Project::new("Vase", default_input(&catalog));
        project.recalculate(&catalog).unwrap();
        let before = project.results.clone();

        catalog.materials.clear();
        assert!(project.recalculate(&catalog).is_err());
        assert_eq!(project.results, before);
    }

    #[test]
    fn test_recalculate_all_picks_up_price_change() {
        let mut catalog = Catalog::with_defaults().unwrap();
        let mut projects = HashMap::new();
        let ok_id = Uuid::new_v4();
        let broken_id = Uuid::new_v4();
        projects.insert(ok_id, Project::new("Ok", default_input(&catalog)));

        let mut broken_input = default_input(&catalog);
        broken_input.material_id = "deleted".into();
        projects.insert(broken_id, Project::new("Broken", broken_input));

        recalculate_all(&mut projects, &catalog);
        let old_material = projects[&ok_id].results.as_ref().unwrap().costs.material_cost;

        let material_id = catalog.materials[0].id.clone();
        catalog
            .material_mut(&material_id)
            .unwrap()
            .set_cost_per_kg(30000.0)
            .unwrap();

        let summary = recalculate_all(&mut projects, &catalog);
        assert_eq!(summary.updated, vec![ok_id]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, broken_id);
        assert!(!summary.is_complete());

        let new_material = projects[&ok_id].results.as_ref().unwrap().costs.material_cost;
        assert!((new_material - 2.0 * old_material).abs() < 1e-9);
    }

    #[test]
    fn test_filter_by_tag_and_name() {
        let catalog = Catalog::with_defaults().unwrap();
        let mut projects = HashMap::new();
        projects.insert(
            Uuid::new_v4(),
            Project::new("Dragon Keychain", default_input(&catalog)).with_tag("keychains"),
        );
        projects.insert(
            Uuid::new_v4(),
            Project::new("Cat Keychain", default_input(&catalog)).with_tag("Keychains"),
        );
        projects.insert(Uuid::new_v4(), Project::new("Dragon Lamp", default_input(&catalog)));

        let keychains = filter_projects(&projects, Some("KEYCHAINS"), None);
        assert_eq!(keychains.len(), 2);
        assert_eq!(keychains[0].1.name, "Cat Keychain");

        let dragons = filter_projects(&projects, None, Some("dragon"));
        assert_eq!(dragons.len(), 2);

        let both = filter_projects(&projects, Some("keychains"), Some("dragon"));
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn test_duplicate_tags_ignored() {
        let catalog = Catalog::with_defaults().unwrap();
        let project = Project::new("X", default_input(&catalog))
            .with_tag("gift")
            .with_tag("Gift");
        assert_eq!(project.tags, vec!["gift".to_string()]);
    }
}
