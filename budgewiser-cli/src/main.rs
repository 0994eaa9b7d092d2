//! BudgeWiser CLI — capital cost estimates from the terminal.
//!
//! Commands:
//! - `estimate` — run the direct → EPC → installed cost cascade for a material cost
//! - `equipment` — power-law purchased equipment cost, optionally fed into `estimate`
//! - `catalog` — list the equipment and family types of a cost database
//! - `percentages` — show the coefficient tables a settings file resolves to

mod display;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use budgewiser_core::{purchased_equipment_cost, EquipmentReference};
use budgewiser_runner::{run_estimate, Estimate, EquipmentDatabase, ReportWriter, Settings};

use crate::display::{format_usd, render_breakdown, render_settings};

const DEFAULT_PROJECT: &str = "BudgeWiser";
const DEFAULT_OUTPUT_DIR: &str = "reports";

#[derive(Parser, Debug)]
#[command(
    name = "budgewiser",
    about = "BudgeWiser CLI — process-plant capital cost estimation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Settings file (TOML, or JSON by extension). Defaults to the built-in percentages.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project name recorded in the report [default: BudgeWiser]
    #[arg(long)]
    project: Option<String>,

    /// Directory for report bundles [default: reports]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the estimate without writing a report bundle.
    #[arg(long, default_value_t = false)]
    no_report: bool,
}

impl ReportArgs {
    fn project(&self) -> &str {
        self.project.as_deref().unwrap_or(DEFAULT_PROJECT)
    }

    fn output_dir(&self) -> &Path {
        self.output_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_OUTPUT_DIR))
    }

    fn any_given(&self) -> bool {
        self.config.is_some() || self.project.is_some() || self.output_dir.is_some() || self.no_report
    }
}

/// Where the reference row comes from: a database lookup or explicit values.
#[derive(Args, Debug)]
struct ReferenceArgs {
    /// Capital equipment cost database (CSV).
    #[arg(long, requires_all = ["equipment", "family_type"])]
    database: Option<PathBuf>,

    /// Equipment name in the database (e.g. Tank).
    #[arg(long, requires = "database")]
    equipment: Option<String>,

    /// Family type of that equipment (e.g. Cone roof).
    #[arg(long, requires = "database")]
    family_type: Option<String>,

    /// Reference cost at the minimum scale, USD.
    #[arg(long, required_unless_present = "database", conflicts_with = "database")]
    min_cost: Option<f64>,

    #[arg(long, required_unless_present = "database", conflicts_with = "database")]
    min_scale: Option<f64>,

    #[arg(long, required_unless_present = "database", conflicts_with = "database")]
    max_scale: Option<f64>,

    /// Power-law exponent.
    #[arg(long, required_unless_present = "database", conflicts_with = "database")]
    scaling_factor: Option<f64>,

    /// Cost index of the reference row.
    #[arg(long, required_unless_present = "database", conflicts_with = "database")]
    cepci: Option<f64>,

    /// What the size measures (e.g. Volume) [default: Size]
    #[arg(long, conflicts_with = "database")]
    quantity: Option<String>,

    #[arg(long, conflicts_with = "database")]
    unit: Option<String>,
}

impl ReferenceArgs {
    fn resolve(&self) -> Result<EquipmentReference> {
        if let Some(path) = &self.database {
            let equipment = self
                .equipment
                .as_deref()
                .context("--equipment is required with --database")?;
            let family_type = self
                .family_type
                .as_deref()
                .context("--family-type is required with --database")?;
            let database = EquipmentDatabase::load(path)?;
            return Ok(database.lookup(equipment, family_type)?.clone());
        }

        Ok(EquipmentReference {
            equipment: String::new(),
            family_type: String::new(),
            scaling_quantity: self.quantity.clone().unwrap_or_else(|| "Size".to_string()),
            unit: self.unit.clone().unwrap_or_default(),
            min_cost: required(self.min_cost, "--min-cost")?,
            min_scale: required(self.min_scale, "--min-scale")?,
            max_scale: required(self.max_scale, "--max-scale")?,
            scaling_factor: required(self.scaling_factor, "--scaling-factor")?,
            cepci: required(self.cepci, "--cepci")?,
        })
    }
}

fn required(value: Option<f64>, flag: &str) -> Result<f64> {
    value.with_context(|| format!("{flag} is required without --database"))
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Escalate a material cost to a total installed cost.
    Estimate {
        /// Purchased material cost in USD.
        #[arg(long, allow_hyphen_values = true)]
        material_cost: f64,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Purchased equipment cost from a reference row and a size.
    Equipment {
        #[command(flatten)]
        reference: ReferenceArgs,

        /// Equipment size, in the reference row's unit.
        #[arg(long)]
        size: f64,

        /// Feed the result into the cost cascade as material cost.
        #[arg(long, default_value_t = false)]
        estimate: bool,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// List the equipment in a cost database, or the family types of one.
    Catalog {
        #[arg(long)]
        database: PathBuf,

        #[arg(long)]
        equipment: Option<String>,
    },
    /// Show the percentage tables a settings file resolves to.
    Percentages {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

/// Parse arguments, rejecting report options that `equipment` would ignore.
fn parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    if let Commands::Equipment {
        estimate: false,
        report,
        ..
    } = &cli.command
    {
        if report.any_given() {
            return Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "--config, --project, --output-dir and --no-report require --estimate",
            ));
        }
    }
    Ok(cli)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = parse_cli(std::env::args_os()).unwrap_or_else(|err| err.exit());

    match cli.command {
        Commands::Estimate {
            material_cost,
            report,
        } => run_estimate_cmd(material_cost, &report),
        Commands::Equipment {
            reference,
            size,
            estimate,
            report,
        } => {
            let reference = reference.resolve()?;
            let cost = purchased_equipment_cost(&reference, size)?;
            if !reference.equipment.is_empty() {
                println!(
                    "{} ({}): {} {size} {}",
                    reference.equipment, reference.family_type, reference.scaling_quantity, reference.unit
                );
            }
            println!("Purchased equipment cost: {}", format_usd(cost));
            if estimate {
                run_estimate_cmd(cost, &report)?;
            }
            Ok(())
        }
        Commands::Catalog {
            database,
            equipment,
        } => {
            let database = EquipmentDatabase::load(&database)?;
            let names = match equipment.as_deref() {
                Some(equipment) => database.family_types(equipment)?,
                None => database.equipment(),
            };
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Percentages { config } => {
            let settings = Settings::load_or_default(config.as_deref())?;
            print!("{}", render_settings(&settings));
            Ok(())
        }
    }
}

fn run_estimate_cmd(material_cost: f64, args: &ReportArgs) -> Result<()> {
    let settings = Settings::load_or_default(args.config.as_deref())?;
    let estimate = run_estimate(args.project(), material_cost, &settings)
        .context("estimate failed")?;

    print_estimate(&estimate);

    if !args.no_report {
        let writer = ReportWriter::new(args.output_dir())?;
        let paths = writer.write(&estimate)?;
        println!("\nReport written to {}", paths.run_dir.display());
        println!("Archive: {}", paths.archive.display());
    }
    Ok(())
}

fn print_estimate(estimate: &Estimate) {
    let output = &estimate.output;
    let titles = ["Direct Cost", "EPC Cost", "Total Installed Cost"];
    for (title, breakdown) in titles.iter().zip(output.breakdowns()) {
        println!("\n{title}\n{}", render_breakdown(breakdown));
    }
    println!(
        "Total installed cost: {}",
        format_usd(output.total_installed_cost)
    );
}
