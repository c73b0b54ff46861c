//! # PrintCost CLI Application
//!
//! Command line front end over a `.pcw` workbook: seed a workbook, list its
//! catalog, cost a piece, and keep stored projects in step with catalog
//! price changes.

mod cli;
mod logging;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use cost_core::file_io::{load_workbook, load_workbook_with_lock_check, save_workbook, FileLock};
use cost_core::project::{filter_projects, Project};
use cost_core::time::{format_hours_hhmm, parse_hhmm};
use cost_core::{calculate, CalculationInput, CalculationResult, PricingSelection, SalePrices, Workbook};

use cli::{CalculateArgs, Cli, Commands};

const RULE: &str = "═══════════════════════════════════════";

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Init { ref owner, force } => init(&cli.workbook, &cli.user, owner, force),
        Commands::Catalog => show_catalog(&cli.workbook),
        Commands::Calculate(ref args) => run_calculation(&cli.workbook, &cli.user, args),
        Commands::Projects { ref tag, ref search } => {
            list_projects(&cli.workbook, tag.as_deref(), search.as_deref())
        }
        Commands::Recalculate => recalculate(&cli.workbook, &cli.user),
    }
}

fn open(path: &Path) -> Result<Workbook> {
    load_workbook(path).with_context(|| format!("cannot open workbook {}", path.display()))
}

/// Open for reading only; a held lock just means the data may be about to change.
fn open_read_only(path: &Path) -> Result<Workbook> {
    let (workbook, lock) = load_workbook_with_lock_check(path)
        .with_context(|| format!("cannot open workbook {}", path.display()))?;
    if let Some(lock) = lock {
        println!("[NOTE] {} is being updated by {} since {}", path.display(), lock.holder(), lock.locked_at);
    }
    Ok(workbook)
}

fn init(path: &Path, user: &str, owner: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let _lock = FileLock::acquire(path, user)?;
    let workbook = Workbook::with_defaults(owner)?;
    save_workbook(&workbook, path)?;
    info!(path = %path.display(), "workbook created");
    println!("[OK] Created {} with the default catalog", path.display());
    Ok(())
}

fn show_catalog(path: &Path) -> Result<()> {
    let workbook = open_read_only(path)?;
    let catalog = &workbook.catalog;
    let currency = &workbook.settings.currency;

    println!("{}", RULE);
    println!("  CATALOG ({})", currency);
    println!("{}", RULE);

    println!();
    println!("Materials:");
    for m in catalog.materials_by_name() {
        println!("  {:<38} {:<24} {:>10.2}/kg", m.id, m.name, m.cost_per_kg);
    }

    println!();
    println!("Printer profiles:");
    for p in catalog.printer_profiles_by_name() {
        println!(
            "  {:<38} {:<24} {:>5.0} W  life {:.0} h  failure {:.1}%",
            p.id, p.name, p.power_watts, p.useful_life_hours, p.failure_rate_percent
        );
    }

    println!();
    println!("Electricity profiles:");
    for e in catalog.electricity_profiles_by_name() {
        let rate = match e.cost_per_kwh() {
            Ok(rate) => format!("{:.4}/kWh", rate),
            Err(_) => "rate undefined".to_string(),
        };
        println!("  {:<38} {:<24} {}", e.id, e.name, rate);
    }

    println!();
    println!("Accessories:");
    for a in catalog.accessories_by_name() {
        println!(
            "  {:<38} {:<24} {:>10.2}/unit ({} per package)",
            a.id, a.name, a.cost_per_unit, a.units_per_package
        );
    }

    println!();
    println!("Sales profiles:");
    for s in catalog.sales_profiles_by_name() {
        println!(
            "  {:<38} {:<24} margin {:.1}%  commission {:.1}%  fee {:.2}",
            s.id, s.name, s.direct_margin_percent, s.marketplace_commission_percent, s.marketplace_fixed_fee
        );
    }
    Ok(())
}

fn build_input(workbook: &Workbook, args: &CalculateArgs) -> Result<CalculationInput> {
    let pricing = match (&args.sales_profile, args.margin) {
        (Some(id), _) => PricingSelection::SalesProfile { id: id.clone() },
        (None, Some(margin_percent)) => PricingSelection::FlatMargin { margin_percent },
        (None, None) => workbook.default_pricing(),
    };

    let mut input = CalculationInput::new(args.material.clone(), args.printer.clone(), pricing)
        .with_weight_g(args.weight)
        .with_print_time(parse_hhmm(&args.print_time).context("--print-time")?)
        .with_operative_labor(parse_hhmm(&args.labor).context("--labor")?)
        .with_post_processing(parse_hhmm(&args.post_processing).context("--post-processing")?)
        .with_batch_quantity(args.batch.unwrap_or(workbook.settings.default_batch_quantity));
    for (id, quantity) in &args.accessories {
        input = input.with_accessory(id.clone(), *quantity);
    }
    Ok(input)
}

fn run_calculation(path: &Path, user: &str, args: &CalculateArgs) -> Result<()> {
    let workbook = open(path)?;
    let input = build_input(&workbook, args)?;
    debug!(?input, "calculation input");

    let result = match calculate(&input, &workbook.catalog) {
        Ok(result) => result,
        Err(e) => {
            if args.json {
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!("{}", json);
                }
            }
            return Err(e.into());
        }
    };

    let display = result.rounded(workbook.settings.display_decimals);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&display)?);
    } else {
        print_report(&workbook, &input, &display);
    }

    if let Some(name) = &args.save_as {
        save_project(path, user, name, &args.tags, input)?;
    }
    Ok(())
}

fn save_project(path: &Path, user: &str, name: &str, tags: &[String], input: CalculationInput) -> Result<()> {
    let _lock = FileLock::acquire(path, user)?;
    // Reload under the lock so concurrent edits are not overwritten.
    let mut workbook = open(path)?;
    let id = workbook.add_calculated_project(name, input)?;
    if let Some(project) = workbook.projects.get_mut(&id) {
        for tag in tags {
            if !project.has_tag(tag) {
                project.tags.push(tag.clone());
            }
        }
    }
    save_workbook(&workbook, path)?;
    println!("[OK] Saved project '{}' ({})", name, id);
    Ok(())
}

fn print_report(workbook: &Workbook, input: &CalculationInput, result: &CalculationResult) {
    let currency = &workbook.settings.currency;
    let decimals = workbook.settings.display_decimals as usize;
    let line = |label: &str, value: f64| println!("  {:<22} {:>12.*} {}", label, decimals, value, currency);
    let costs = &result.costs;

    println!("{}", RULE);
    println!("  COST CALCULATION");
    println!("{}", RULE);
    println!();
    println!("Input:");
    println!("  Weight:          {:.1} g", input.piece_weight_g);
    println!("  Print time:      {}", format_hours_hhmm(input.print_time_hours));
    println!("  Labor:           {}", format_hours_hhmm(input.operative_labor_hours));
    println!("  Post-processing: {}", format_hours_hhmm(input.post_processing_hours));
    println!("  Batch:           {} pcs", input.batch_quantity);
    println!();
    println!("Rates:");
    println!("  Electricity:     {:.4} {}/kWh", result.rate_per_kwh, currency);
    println!("  Amortization:    {:.4} {}/h", result.amortization_rate_per_hour, currency);
    println!();
    println!("Cost per piece:");
    line("Material", costs.material_cost);
    line("Electricity", costs.electricity_cost);
    line("Amortization", costs.amortization_cost);
    line("Labor", costs.operative_labor_cost);
    line("Post-processing", costs.post_processing_labor_cost);
    line("Accessories", costs.accessories_cost);
    for acc in &result.accessory_lines {
        println!("    {} x{} @ {:.*}", acc.name, acc.quantity_per_piece, decimals, acc.unit_cost);
    }
    line("Subtotal", costs.direct_subtotal);
    line("Failure contingency", costs.failure_contingency);
    line("Piece total", costs.piece_total);
    line("Batch total", costs.batch_total);
    println!();
    println!("{}", RULE);
    match result.sale_prices {
        SalePrices::SimpleMargin {
            suggested_piece,
            suggested_batch,
        } => {
            println!("  PRICE: {:.*} {} per piece", decimals, suggested_piece, currency);
            println!("         {:.*} {} per batch", decimals, suggested_batch, currency);
        }
        SalePrices::ChannelAware { direct, marketplace } => {
            println!("  DIRECT:      {:.*} {}", decimals, direct, currency);
            println!("  MARKETPLACE: {:.*} {}", decimals, marketplace, currency);
        }
    }
    println!("{}", RULE);
}

fn list_projects(path: &Path, tag: Option<&str>, search: Option<&str>) -> Result<()> {
    let workbook = open_read_only(path)?;
    let currency = &workbook.settings.currency;
    let decimals = workbook.settings.display_decimals as usize;

    let matches = filter_projects(&workbook.projects, tag, search);
    if matches.is_empty() {
        println!("No projects found");
        return Ok(());
    }
    for (id, project) in matches {
        println!("  {}  {:<30} {}", id, project.name, price_summary(project, decimals, currency));
    }
    Ok(())
}

fn price_summary(project: &Project, decimals: usize, currency: &str) -> String {
    match &project.results {
        Some(r) => format!(
            "cost {:.*} / price {:.*} {}",
            decimals,
            r.costs.piece_total,
            decimals,
            r.sale_prices.piece_price(),
            currency
        ),
        None => "not calculated".to_string(),
    }
}

fn recalculate(path: &Path, user: &str) -> Result<()> {
    let _lock = FileLock::acquire(path, user)?;
    let mut workbook = open(path)?;
    let summary = workbook.recalculate_all();
    save_workbook(&workbook, path)?;

    println!("[OK] Recalculated {} project(s)", summary.updated_count());
    for (id, error) in &summary.failed {
        let name = workbook.get_project(id).map(|p| p.name.as_str()).unwrap_or("?");
        println!("[FAIL] {} ({}): {}", name, id, error);
    }
    if !summary.is_complete() {
        bail!("{} project(s) could not be recalculated", summary.failed.len());
    }
    Ok(())
}
