//! # Reference Catalogs
//!
//! The reference data a cost calculation reads: materials, printer profiles,
//! accessories, electricity profiles and sales profiles.
//!
//! [`Catalog`] owns the records and offers the maintenance operations
//! (add, remove, lookup, sorted listings). [`CatalogSnapshot`] is a borrowed
//! view over five plain slices; it is what the calculator actually reads, so
//! any storage that can hand out slices can drive a calculation.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::catalog::{Catalog, Material};
//!
//! let mut catalog = Catalog::default();
//! let id = catalog.add_material(Material::new("PLA", 15000.0).unwrap()).unwrap();
//! assert_eq!(catalog.material(&id).unwrap().name, "PLA");
//! ```

pub mod accessory;
pub mod electricity;
pub mod material;
pub mod printer;
pub mod sales;

pub use accessory::Accessory;
pub use electricity::ElectricityProfile;
pub use material::Material;
pub use printer::{ElectricitySource, PrinterProfile};
pub use sales::SalesProfile;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult, ReferenceKind};

/// Generate a new record id
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reject negative and non-finite values
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite number, zero or greater",
        ))
    }
}

/// Borrowed view over one consistent set of catalog records.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogSnapshot<'a> {
    pub materials: &'a [Material],
    pub printer_profiles: &'a [PrinterProfile],
    pub accessories: &'a [Accessory],
    pub electricity_profiles: &'a [ElectricityProfile],
    pub sales_profiles: &'a [SalesProfile],
}

impl<'a> CatalogSnapshot<'a> {
    pub fn material(&self, id: &str) -> Option<&'a Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn printer_profile(&self, id: &str) -> Option<&'a PrinterProfile> {
        self.printer_profiles.iter().find(|p| p.id == id)
    }

    pub fn accessory(&self, id: &str) -> Option<&'a Accessory> {
        self.accessories.iter().find(|a| a.id == id)
    }

    pub fn electricity_profile(&self, id: &str) -> Option<&'a ElectricityProfile> {
        self.electricity_profiles.iter().find(|e| e.id == id)
    }

    pub fn sales_profile(&self, id: &str) -> Option<&'a SalesProfile> {
        self.sales_profiles.iter().find(|s| s.id == id)
    }
}

impl<'a> From<&'a Catalog> for CatalogSnapshot<'a> {
    fn from(catalog: &'a Catalog) -> Self {
        catalog.snapshot()
    }
}

/// Owned reference catalogs.
///
/// Fields are public plain vectors so the catalog can be filled from any
/// store; the `add_*` methods additionally validate and check id uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub printer_profiles: Vec<PrinterProfile>,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
    #[serde(default)]
    pub electricity_profiles: Vec<ElectricityProfile>,
    #[serde(default)]
    pub sales_profiles: Vec<SalesProfile>,
}

impl Catalog {
    /// A catalog seeded with one record of each kind, ready to calculate with.
    ///
    /// Defaults: a general tariff (150 kWh / 8500), an Ender 3 Pro profile
    /// (200 W, 1 200 000 over 4000 h, 5 % failures, labor 2500/2000 per hour),
    /// a general sales profile (30 % margin, 15 % + 800 marketplace), white PLA
    /// at 15 000/kg, and two accessories.
    pub fn with_defaults() -> CalcResult<Self> {
        let tariff = ElectricityProfile::new("General Tariff", 150.0, 8500.0)?;
        let printer = PrinterProfile::new(
            "Default Printer",
            ElectricitySource::Profile { id: tariff.id.clone() },
        )
        .with_model("Ender 3 Pro")
        .with_power_watts(200.0)
        .with_amortization(1_200_000.0, 4000.0)
        .with_failure_rate(5.0)
        .with_labor_rates(2500.0, 2000.0);

        let mut catalog = Catalog::default();
        catalog.add_electricity_profile(tariff)?;
        catalog.add_printer_profile(printer)?;
        catalog.add_sales_profile(SalesProfile::new("General Profile", 30.0, 15.0, 800.0)?)?;
        catalog.add_material(
            Material::new("PLA Generic White", 15000.0)?
                .with_density(1.24)
                .with_diameter(1.75),
        )?;
        catalog.add_accessory(Accessory::from_package("Key ring", 50.0, 100)?)?;
        catalog.add_accessory(Accessory::from_package("Neodymium magnet 6x2mm", 200.0, 10)?)?;
        Ok(catalog)
    }

    /// Borrow all records as a snapshot for calculation
    pub fn snapshot(&self) -> CatalogSnapshot<'_> {
        CatalogSnapshot {
            materials: &self.materials,
            printer_profiles: &self.printer_profiles,
            accessories: &self.accessories,
            electricity_profiles: &self.electricity_profiles,
            sales_profiles: &self.sales_profiles,
        }
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn material(&self, id: &str) -> Option<&Material> {
        self.snapshot().material(id)
    }

    pub fn printer_profile(&self, id: &str) -> Option<&PrinterProfile> {
        self.snapshot().printer_profile(id)
    }

    pub fn accessory(&self, id: &str) -> Option<&Accessory> {
        self.snapshot().accessory(id)
    }

    pub fn electricity_profile(&self, id: &str) -> Option<&ElectricityProfile> {
        self.snapshot().electricity_profile(id)
    }

    pub fn sales_profile(&self, id: &str) -> Option<&SalesProfile> {
        self.snapshot().sales_profile(id)
    }

    pub fn accessory_mut(&mut self, id: &str) -> Option<&mut Accessory> {
        self.accessories.iter_mut().find(|a| a.id == id)
    }

    pub fn material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.iter_mut().find(|m| m.id == id)
    }

    pub fn electricity_profile_mut(&mut self, id: &str) -> Option<&mut ElectricityProfile> {
        self.electricity_profiles.iter_mut().find(|e| e.id == id)
    }

    // ------------------------------------------------------------------
    // Sorted listings (for display)
    // ------------------------------------------------------------------

    pub fn materials_by_name(&self) -> Vec<&Material> {
        sorted_by_name(&self.materials, |m| &m.name)
    }

    pub fn printer_profiles_by_name(&self) -> Vec<&PrinterProfile> {
        sorted_by_name(&self.printer_profiles, |p| &p.name)
    }

    pub fn accessories_by_name(&self) -> Vec<&Accessory> {
        sorted_by_name(&self.accessories, |a| &a.name)
    }

    pub fn electricity_profiles_by_name(&self) -> Vec<&ElectricityProfile> {
        sorted_by_name(&self.electricity_profiles, |e| &e.name)
    }

    pub fn sales_profiles_by_name(&self) -> Vec<&SalesProfile> {
        sorted_by_name(&self.sales_profiles, |s| &s.name)
    }

    /// Check every stored record, as `add_*` would.
    ///
    /// Printer profiles get the stored-record checks only, so an old profile
    /// with no useful life still loads.
    pub fn validate(&self) -> CalcResult<()> {
        fn check(kind: ReferenceKind, id: &str, result: CalcResult<()>) -> CalcResult<()> {
            result.inspect_err(|e| warn!(%kind, id, error = %e, "invalid catalog record"))
        }

        for m in &self.materials {
            check(ReferenceKind::Material, &m.id, m.validate())?;
        }
        for p in &self.printer_profiles {
            check(ReferenceKind::PrinterProfile, &p.id, p.validate_rates())?;
        }
        for a in &self.accessories {
            check(ReferenceKind::Accessory, &a.id, a.validate())?;
        }
        for e in &self.electricity_profiles {
            check(ReferenceKind::ElectricityProfile, &e.id, e.validate())?;
        }
        for s in &self.sales_profiles {
            check(ReferenceKind::SalesProfile, &s.id, s.validate())?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Additions (validated, ids unique per kind)
    // ------------------------------------------------------------------

    /// Add a material; returns its id.
    pub fn add_material(&mut self, material: Material) -> CalcResult<String> {
        material.validate()?;
        ensure_unique(self.material(&material.id).is_some(), &material.id)?;
        let id = material.id.clone();
        self.materials.push(material);
        Ok(id)
    }

    /// Add a printer profile; a referenced electricity profile must already exist.
    pub fn add_printer_profile(&mut self, profile: PrinterProfile) -> CalcResult<String> {
        profile.validate()?;
        ensure_unique(self.printer_profile(&profile.id).is_some(), &profile.id)?;
        if let Some(tariff_id) = profile.electricity_profile_id() {
            if self.electricity_profile(tariff_id).is_none() {
                return Err(CalcError::not_found(ReferenceKind::ElectricityProfile, tariff_id));
            }
        }
        let id = profile.id.clone();
        self.printer_profiles.push(profile);
        Ok(id)
    }

    pub fn add_accessory(&mut self, accessory: Accessory) -> CalcResult<String> {
        accessory.validate()?;
        ensure_unique(self.accessory(&accessory.id).is_some(), &accessory.id)?;
        let id = accessory.id.clone();
        self.accessories.push(accessory);
        Ok(id)
    }

    pub fn add_electricity_profile(&mut self, profile: ElectricityProfile) -> CalcResult<String> {
        profile.validate()?;
        ensure_unique(self.electricity_profile(&profile.id).is_some(), &profile.id)?;
        let id = profile.id.clone();
        self.electricity_profiles.push(profile);
        Ok(id)
    }

    pub fn add_sales_profile(&mut self, profile: SalesProfile) -> CalcResult<String> {
        profile.validate()?;
        ensure_unique(self.sales_profile(&profile.id).is_some(), &profile.id)?;
        let id = profile.id.clone();
        self.sales_profiles.push(profile);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Removals
    // ------------------------------------------------------------------

    pub fn remove_material(&mut self, id: &str) -> Option<Material> {
        take_by(&mut self.materials, |m| m.id == id)
    }

    pub fn remove_printer_profile(&mut self, id: &str) -> Option<PrinterProfile> {
        take_by(&mut self.printer_profiles, |p| p.id == id)
    }

    pub fn remove_accessory(&mut self, id: &str) -> Option<Accessory> {
        take_by(&mut self.accessories, |a| a.id == id)
    }

    pub fn remove_sales_profile(&mut self, id: &str) -> Option<SalesProfile> {
        take_by(&mut self.sales_profiles, |s| s.id == id)
    }

    /// Remove an electricity profile unless a printer profile still uses it.
    pub fn remove_electricity_profile(&mut self, id: &str) -> CalcResult<Option<ElectricityProfile>> {
        let users: Vec<&str> = self
            .printer_profiles
            .iter()
            .filter(|p| p.electricity_profile_id() == Some(id))
            .map(|p| p.name.as_str())
            .collect();
        if !users.is_empty() {
            return Err(CalcError::StillReferenced {
                kind: ReferenceKind::ElectricityProfile,
                id: id.to_string(),
                referenced_by: users.join(", "),
            });
        }
        Ok(take_by(&mut self.electricity_profiles, |e| e.id == id))
    }
}

fn sorted_by_name<'a, T>(items: &'a [T], name: impl Fn(&T) -> &String) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| name(a).to_lowercase().cmp(&name(b).to_lowercase()));
    sorted
}

fn take_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> Option<T> {
    let index = items.iter().position(pred)?;
    Some(items.remove(index))
}

fn ensure_unique(exists: bool, id: &str) -> CalcResult<()> {
    if exists {
        Err(CalcError::invalid_input("id", id, "A record with this id already exists"))
    } else {
        Ok(())
    }
}
