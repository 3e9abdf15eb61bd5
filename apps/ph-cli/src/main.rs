use clap::{Parser, Subcommand, ValueEnum};
use ph_chem::{Acid, Base, ChemError, ChemResult, HarnedOwen, SoluteKind};
use ph_core::{celsius, pk_to_k};
use ph_project::{ProjectError, Scenario};
use ph_titration::{TitrationCurve, TitrationError, export};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "ph-cli")]
#[command(about = "Acid-base equilibrium and titration curve calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// pH of an acid dissolved in water
    Acid(SoluteArgs),
    /// pH of a base dissolved in water
    Base(SoluteArgs),
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Generate a titration curve from a scenario file
    Curve {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Solve samples in parallel regardless of the scenario setting
        #[arg(long)]
        parallel: bool,
    },
}

#[derive(clap::Args)]
struct SoluteArgs {
    /// Dissociation constants, repeated or comma separated (K1, K2, ...)
    #[arg(long = "k", required = true, value_delimiter = ',', allow_negative_numbers = true)]
    constants: Vec<f64>,
    /// Interpret the constants as pK values
    #[arg(long)]
    pk: bool,
    /// Stock concentration in mol/L
    #[arg(short, long)]
    concentration: f64,
    /// Temperature in °C; enables the temperature-dependent water model
    #[arg(short, long)]
    temperature: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Chem(#[from] ChemError),

    #[error("{0}")]
    Titration(#[from] TitrationError),

    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Acid(args) => cmd_solute(SoluteKind::Acid, &args),
        Commands::Base(args) => cmd_solute(SoluteKind::Base, &args),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Curve {
            scenario_path,
            output,
            format,
            parallel,
        } => cmd_curve(&scenario_path, output.as_deref(), format, parallel),
    }
}

fn cmd_solute(kind: SoluteKind, args: &SoluteArgs) -> CliResult<()> {
    let constants: Vec<f64> = if args.pk {
        args.constants.iter().copied().map(pk_to_k).collect()
    } else {
        args.constants.clone()
    };

    debug!(?constants, concentration = args.concentration, "solving single solute");
    let ph = solute_ph(kind, &constants, args.concentration, args.temperature)?;
    info!(ph, temperature_c = ?args.temperature, "solute pH solved");
    println!("pH = {:.4}", ph);
    Ok(())
}

fn solute_ph(
    kind: SoluteKind,
    constants: &[f64],
    concentration: f64,
    temperature_c: Option<f64>,
) -> ChemResult<f64> {
    match (kind, temperature_c) {
        (SoluteKind::Acid, None) => Acid::new(constants, concentration)?.ph(),
        (SoluteKind::Base, None) => Base::new(constants, concentration)?.ph(),
        (SoluteKind::Acid, Some(t)) => {
            Acid::with_temperature(constants, concentration, Arc::new(HarnedOwen), celsius(t))?
                .ph()
        }
        (SoluteKind::Base, Some(t)) => {
            Base::with_temperature(constants, concentration, Arc::new(HarnedOwen), celsius(t))?
                .ph()
        }
    }
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = ph_project::load(scenario_path)?;
    scenario.build_titration()?;
    info!(name = %scenario.name, analytes = scenario.analytes.len(), "scenario validated");
    println!("✓ Scenario is valid");
    println!("  Name: {}", scenario.name);
    println!("  Analytes: {}", scenario.analytes.len());
    Ok(())
}

fn cmd_curve(
    scenario_path: &Path,
    output: Option<&Path>,
    format: Format,
    parallel: bool,
) -> CliResult<()> {
    let mut scenario: Scenario = ph_project::load(scenario_path)?;
    scenario.parallel |= parallel;
    info!(name = %scenario.name, parallel = scenario.parallel, "running scenario");
    let curve = scenario.run()?;

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_curve(&curve, format, &mut writer)?;
            info!(points = curve.len(), path = %path.display(), "wrote titration curve");
            println!("✓ Wrote {} points to {}", curve.len(), path.display());
            print_summary(&curve);
        }
        None => {
            let stdout = io::stdout();
            write_curve(&curve, format, stdout.lock())?;
        }
    }
    Ok(())
}

fn write_curve<W: Write>(curve: &TitrationCurve, format: Format, mut writer: W) -> CliResult<()> {
    match format {
        Format::Csv => export::write_csv(curve, writer)?,
        Format::Json => {
            writeln!(writer, "{}", export::to_json(curve)?)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn print_summary(curve: &TitrationCurve) {
    let markers = &curve.markers;
    println!("  Half equivalence: {:.4}", markers.half_equivalence);
    println!("  Full equivalence: {:.4}", markers.full_equivalence);
    for region in curve.steepest_regions(markers.equivalence_volumes.len()) {
        println!(
            "  Steep region: volume {:.4}, pH {:.3}, slope {:.3}",
            region.volume, region.ph, region.slope
        );
    }
}
