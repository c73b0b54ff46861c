use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "printcost", version, about = "3D printing cost and pricing calculator")]
pub struct Cli {
    /// Workbook file
    #[arg(short, long, env = "PRINTCOST_WORKBOOK", default_value = "workbook.pcw", global = true)]
    pub workbook: PathBuf,

    /// Name recorded in the lock file while the workbook is being written
    #[arg(long, env = "PRINTCOST_USER", default_value = "printcost", global = true)]
    pub user: String,

    /// Debug logging for the calculator (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a workbook seeded with the default catalog
    Init {
        /// Shop or person owning the workbook
        #[arg(long, default_value = "")]
        owner: String,

        /// Overwrite an existing workbook
        #[arg(long)]
        force: bool,
    },

    /// List the workbook catalog
    Catalog,

    /// Cost a piece against the workbook catalog
    Calculate(CalculateArgs),

    /// List stored projects
    Projects {
        /// Only projects carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only projects whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Recalculate every stored project against the current catalog
    Recalculate,
}

#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// Material id
    #[arg(short, long)]
    pub material: String,

    /// Printer profile id
    #[arg(short, long)]
    pub printer: String,

    /// Weight of one piece in grams
    #[arg(short = 'g', long)]
    pub weight: f64,

    /// Print time per piece, HH:MM
    #[arg(short = 't', long, default_value = "00:00")]
    pub print_time: String,

    /// Hands-on labor per piece, HH:MM
    #[arg(long, default_value = "00:00")]
    pub labor: String,

    /// Post-processing per piece, HH:MM
    #[arg(long, default_value = "00:00")]
    pub post_processing: String,

    /// Pieces in the batch (defaults to the workbook setting)
    #[arg(short, long)]
    pub batch: Option<u32>,

    /// Sales profile id used for pricing
    #[arg(long, conflicts_with = "margin")]
    pub sales_profile: Option<String>,

    /// Flat margin percent used for pricing
    #[arg(long)]
    pub margin: Option<f64>,

    /// Accessory per piece as `id=quantity` (repeatable)
    #[arg(short, long = "accessory", value_parser = parse_accessory)]
    pub accessories: Vec<(String, f64)>,

    /// Store the calculation as a project with this name
    #[arg(long)]
    pub save_as: Option<String>,

    /// Tag for the saved project (repeatable)
    #[arg(long = "tag", requires = "save_as")]
    pub tags: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_accessory(text: &str) -> Result<(String, f64), String> {
    let (id, quantity) = text
        .split_once('=')
        .ok_or_else(|| format!("expected id=quantity, got '{}'", text))?;
    let quantity: f64 = quantity
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", quantity))?;
    if id.trim().is_empty() {
        return Err("accessory id is empty".to_string());
    }
    Ok((id.trim().to_string(), quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_accessory() {
        assert_eq!(parse_accessory("acc1=2").unwrap(), ("acc1".to_string(), 2.0));
        assert_eq!(parse_accessory(" ring = 0.5").unwrap(), ("ring".to_string(), 0.5));
        assert!(parse_accessory("acc1").is_err());
        assert!(parse_accessory("acc1=x").is_err());
        assert!(parse_accessory("=1").is_err());
    }

    #[test]
    fn test_margin_conflicts_with_sales_profile() {
        let parsed = Cli::try_parse_from([
            "printcost", "calculate", "-m", "m1", "-p", "p1", "-g", "10",
            "--margin", "30", "--sales-profile", "s1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_calculate_args() {
        let cli = Cli::try_parse_from([
            "printcost", "calculate", "-m", "m1", "-p", "p1", "-g", "25",
            "-t", "02:00", "-a", "acc1=2", "-a", "acc2=1", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Calculate(args) => {
                assert_eq!(args.weight, 25.0);
                assert_eq!(args.print_time, "02:00");
                assert_eq!(args.accessories.len(), 2);
                assert!(args.json);
                assert!(args.batch.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
