//! Command line tool to write simulation input files
//!
//! Reads a JSON study describing any number of simulations, writes the full
//! set of input files for each, and a batch file running the engine over all
//! of them.
//!
//! # Usage
//!
//! ```text
//! Usage: mcxsim <study> [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Study files
//!
//! Only the specimen is required for a simulation. Every other record falls
//! back on the defaults of the engine for anything left out.
//!
//! ```json
//! {
//!   "version": "2.2.0",
//!   "engine": "C:/MCXRay/McXRay.exe",
//!   "batch": "gold_particles",
//!   "simulations": [
//!     {
//!       "name": "Au_d50nm_E20keV",
//!       "specimen": {
//!         "regions": [
//!           {
//!             "elements": [{ "atomic_number": 6, "mass_fraction": 1.0 }],
//!             "dimensions": {
//!               "type": "BOX",
//!               "min_x": -1e10, "max_x": 1e10,
//!               "min_y": -1e10, "max_y": 1e10,
//!               "min_z": 0.0, "max_z": 1e10
//!             }
//!           }
//!         ]
//!       },
//!       "microscope": { "beam_energy_kev": 20.0 },
//!       "parameters": { "number_electrons": 10000 }
//!     }
//!   ]
//! }
//! ```
//!
//! ## Options
//!
//! ### > How to target an older engine
//!
//! The `--format` option overrides the version of the study, and files are
//! written with the keys that existed at that release.
//!
//! ```bash
//! mcxsim study.json --format 1.4.2
//! ```
//!
//! ### > How to split the runs over several machines
//!
//! ```bash
//! # batch files of at most 20 runs each
//! mcxsim study.json --batch-size 20
//! ```
//!

// crate modules
use mcxray::batch::{BatchFile, DEFAULT_ENGINE};
use mcxray::readers::get_reader;
use mcxray::utils::f;
use mcxray::{Simulation, Version};

// standard libraries
use std::path::{Path, PathBuf};

// external crates
use anyhow::{anyhow, Context, Result};
use clap::{arg, Parser};
use kdam::{BarBuilder, BarExt};
use log::*;
use serde::Deserialize;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    info!("Reading study \"{}\"", cli.study.display());
    let mut study = read_study(&cli.study)?;

    // command line takes priority over the study file
    if let Some(version) = cli.format {
        study.version = version;
    }
    if let Some(engine) = &cli.engine {
        study.engine = engine.clone();
    }
    debug!("  - format version {}", study.version);
    debug!("  - {} simulation(s)", study.simulations.len());

    std::fs::create_dir_all(&cli.output)
        .with_context(|| f!("Could not create {}", cli.output.display()))?;

    let sim_files = write_simulations(&mut study, &cli)?;
    write_batch_files(&study, &sim_files, &cli)
}

/// Write simulation input files from a JSON study
///
/// Every simulation of the study gets its `.sam`, `.mdl`, `.mic`, `.par`,
/// `.rp` and `.sim` files in the output directory, and a batch file lists
/// one engine run per `.sim` file.
///
/// Records left out of the study take the engine defaults, as do any fields
/// left out of a record.
///
/// Examples
/// --------
///
///  Typical use
///     $ mcxsim study.json
///
///  Write files for an older engine into ./runs
///     $ mcxsim study.json --format 1.4.2 --output runs
///
///  Split the batch into files of 20 runs
///     $ mcxsim study.json --batch-size 20
///
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help("Typical use: mcxsim study.json\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("mcxsim <study> [options]")
)]
struct Cli {
    // * Positional
    /// Path to the JSON study file
    #[arg(name = "study")]
    study: PathBuf,

    /// Directory for all written files ('.' default)
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "dir")]
    #[arg(default_value = ".")]
    output: PathBuf,

    /// Format version to write (overrides the study)
    ///
    /// Files only hold the keys that existed at that release, from 1.1.1 for
    /// the oldest positional specimen files up to the current version.
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "X.Y.Z")]
    format: Option<Version>,

    /// Engine executable used in batch files (overrides the study)
    #[arg(help_heading("Batch options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    engine: Option<String>,

    /// Maximum number of runs per batch file
    ///
    /// By default a single batch file holds every run. Split files are named
    /// `<batch>_<index>.bat`.
    #[arg(help_heading("Batch options"))]
    #[arg(short, long)]
    #[arg(value_name = "n")]
    batch_size: Option<usize>,

    // * Flags
    /// Do not print the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

/// Everything a study file may hold
#[doc(hidden)]
#[derive(Debug, Deserialize)]
struct Study {
    #[serde(default)]
    version: Version,
    #[serde(default = "default_engine")]
    engine: String,
    #[serde(default = "default_batch")]
    batch: String,
    simulations: Vec<Simulation>,
}

#[doc(hidden)]
fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}

#[doc(hidden)]
fn default_batch() -> String {
    "simulations".to_string()
}

/// Sets up logging at runtime to allow for multiple verbosity levels
#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) {
    stderrlog::new()
        .modules(vec![module_path!(), "mcxray"])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .unwrap();
}

/// Creates a banner for the command line
#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "MCXRay :: Simulation files");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
fn read_study(path: &Path) -> Result<Study> {
    let reader = get_reader(path)?;
    let study: Study = serde_json::from_reader(reader)
        .with_context(|| f!("Invalid study file {}", path.display()))?;

    if study.simulations.is_empty() {
        return Err(anyhow!("No simulations in {}", path.display()));
    }
    Ok(study)
}

#[doc(hidden)]
/// Writes the input files of every simulation, returning the `.sim` names
fn write_simulations(study: &mut Study, cli: &Cli) -> Result<Vec<String>> {
    let mut progress_bar = BarBuilder::default()
        .total(study.simulations.len())
        .desc("Writing")
        .unit(" sims")
        .disable(cli.no_progress || cli.quiet)
        .build()
        .map_err(|e| anyhow!(e))?;

    let mut sim_files = Vec::with_capacity(study.simulations.len());
    for simulation in study.simulations.iter_mut() {
        simulation.set_version(study.version);
        let path = simulation.create_simulation_files(&cli.output)?;
        trace!("  - {}", path.display());

        let filename = path
            .file_name()
            .ok_or_else(|| anyhow!("No file name in {}", path.display()))?;
        sim_files.push(filename.to_string_lossy().into_owned());
        progress_bar.update(1)?;
    }
    eprintln!();

    info!("Wrote {} simulation(s) to {}", sim_files.len(), cli.output.display());
    Ok(sim_files)
}

#[doc(hidden)]
/// Batch files running the engine over every `.sim` file
fn write_batch_files(study: &Study, sim_files: &[String], cli: &Cli) -> Result<()> {
    let mut batch = BatchFile::new(&study.batch).with_engine(&study.engine);
    for sim in sim_files {
        batch.add_simulation(sim);
    }

    let batches = match cli.batch_size {
        Some(size) => batch.split(size),
        None => vec![batch],
    };

    for batch in batches {
        let path = batch.write(&cli.output)?;
        info!("  - {}", path.display());
    }
    Ok(())
}
