//! Command line tool to inspect the results of a simulation
//!
//! Reads the `.sim` manifest and every input file of a simulation, then
//! collects whatever result files the engine wrote next to them.
//!
//! # Usage
//!
//! ```text
//! Usage: mcxresults <sim> [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Options
//!
//! By default a summary is printed to the terminal.
//!
//! ### > How to export the results
//!
//! ```bash
//! # inputs and results as a single JSON file
//! mcxresults run/Au_d50nm.sim --json Au_d50nm
//!
//! # inputs and results as an HDF5 container (needs the hdf5 feature)
//! mcxresults run/Au_d50nm.sim --hdf5 Au_d50nm
//! ```
//!
//! ### > How to list the format versions
//!
//! ```bash
//! mcxresults --history
//! ```
//!

// crate modules
use mcxray::readers::get_writer;
use mcxray::utils::f;
use mcxray::version::HISTORY;
use mcxray::{Simulation, SimulationResults};

// standard libraries
use std::path::{Path, PathBuf};

// external crates
use anyhow::{anyhow, Result};
use clap::{arg, Parser};
use log::*;
use serde::Serialize;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    if cli.history {
        print_history();
        return Ok(());
    }

    let sim = cli
        .sim
        .as_ref()
        .ok_or_else(|| anyhow!("A .sim file is required"))?;

    info!("Reading \"{}\"", sim.display());
    let simulation = Simulation::read(sim)?;
    let directory = sim.parent().unwrap_or_else(|| Path::new(""));
    let results = SimulationResults::read(directory, &simulation.parameters.base_filename)?;

    if results.is_empty() {
        warn!(
            "No result files found for \"{}\"",
            simulation.parameters.base_filename
        );
    }

    if let Some(output) = &cli.json {
        write_json(&simulation, &results, output)?;
    }

    if let Some(output) = &cli.hdf5 {
        write_hdf5(&simulation, &results, output)?;
    }

    if cli.json.is_none() && cli.hdf5.is_none() {
        print_summary(&simulation, &results);
    }
    Ok(())
}

/// Inspect the results of a simulation
///
/// The `.sim` manifest is read along with every input file it names, and
/// result files are found from the base file name of the simulation
/// parameters. Missing result files are skipped, broken ones are errors.
///
/// Without an export option a summary is printed to the terminal.
///
/// Examples
/// --------
///
///  Typical use
///     $ mcxresults run/Au_d50nm.sim
///
///  Export everything to Au_d50nm.json
///     $ mcxresults run/Au_d50nm.sim --json Au_d50nm
///
///  Export everything to Au_d50nm.h5
///     $ mcxresults run/Au_d50nm.sim --hdf5 Au_d50nm
///
///  List the format versions and what changed
///     $ mcxresults --history
///
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help("Typical use: mcxresults run/Au_d50nm.sim\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("mcxresults <sim> [options]")
)]
struct Cli {
    // * Positional
    /// Path to the .sim file of the simulation
    #[arg(name = "sim")]
    #[arg(required_unless_present = "history")]
    sim: Option<PathBuf>,

    /// Export inputs and results to <path>.json
    #[arg(help_heading("Export options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    json: Option<String>,

    /// Export inputs and results to <path>.h5
    ///
    /// Only available when built with the `hdf5` feature.
    #[arg(help_heading("Export options"))]
    #[arg(long)]
    #[arg(value_name = "path")]
    hdf5: Option<String>,

    // * Flags
    /// List the format versions and exit
    #[arg(long)]
    history: bool,

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
    s += &f!("{:^70}\n", "MCXRay :: Results");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
#[derive(Serialize)]
struct Export<'a> {
    simulation: &'a Simulation,
    version: String,
    results: &'a SimulationResults,
}

#[doc(hidden)]
/// Write inputs and results to json
fn write_json(simulation: &Simulation, results: &SimulationResults, output: &str) -> Result<()> {
    let output = f!("{output}.json");
    debug!("Writing JSON format to {}", output);

    let writer = get_writer(Path::new(&output))?;
    let export = Export {
        simulation,
        version: simulation.version.to_string(),
        results,
    };
    Ok(serde_json::to_writer_pretty(writer, &export)?)
}

#[doc(hidden)]
#[cfg(feature = "hdf5")]
/// Write inputs and results to an HDF5 container
fn write_hdf5(simulation: &Simulation, results: &SimulationResults, output: &str) -> Result<()> {
    let output = f!("{output}.h5");
    debug!("Writing HDF5 container to {}", output);
    mcxray::container::write_simulation(Path::new(&output), simulation, Some(results))
}

#[doc(hidden)]
#[cfg(not(feature = "hdf5"))]
fn write_hdf5(_: &Simulation, _: &SimulationResults, _: &str) -> Result<()> {
    Err(anyhow!(
        "HDF5 export is not available, rebuild with --features hdf5"
    ))
}

#[doc(hidden)]
/// Write summary to the terminal
fn print_summary(simulation: &Simulation, results: &SimulationResults) {
    let mut s = f!("Simulation \"{}\"\n", simulation.name);
    s += &f!("  - format version:  {}\n", simulation.version);
    s += &f!("  - regions:         {}\n", simulation.specimen.regions.len());
    s += &f!(
        "  - beam energy:     {} keV\n",
        simulation.microscope.beam_energy_kev
    );
    s += &f!(
        "  - electrons:       {}\n",
        simulation.parameters.number_electrons
    );

    if let Some(version) = results.program_version {
        s += &f!("\nEngine version {version}\n");
    }

    if let Some(electron) = &results.electron {
        s += "\nElectron results\n";
        for (key, value) in electron.entries() {
            s += &f!("  - {key:<34} {value}\n");
        }
    }

    if let Some(intensities) = &results.intensities {
        s += "\nX-ray intensities (emitted detected)\n";
        for z in intensities.atomic_numbers() {
            s += &f!(
                "  - Z = {z:<3} {:>14.6e}\n",
                intensities.element_emitted_detected(z)
            );
        }
    }

    if let Some(spectrum) = &results.spectrum {
        s += &f!(
            "\nSpectrum: {} channels, {:.6e} total counts\n",
            spectrum.channels.len(),
            spectrum.integrated_total()
        );
    }

    for (name, phirhoz) in [
        ("generated", &results.phirhoz_generated),
        ("emitted", &results.phirhoz_emitted),
    ] {
        if let Some(phirhoz) = phirhoz {
            s += &f!("\nPhi-rho-z {name}: {} curve(s)\n", phirhoz.curves.len());
        }
    }

    println!("{s}");
}

#[doc(hidden)]
/// Every known format version, with notes wrapped to the terminal
fn print_history() {
    let options = textwrap::Options::new(70)
        .initial_indent("")
        .subsequent_indent("        ");
    for entry in HISTORY {
        let s = f!("{:<8}{}", entry.version.to_string(), entry.note);
        println!("{}", textwrap::fill(&s, &options));
    }
}
