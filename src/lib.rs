//! # The MCXRay crate
//!
//! Readers and writers for the file formats of the MCXRay Monte Carlo X-ray
//! simulation engine
//!
//! ## Installation
//!
//! Install both command line tools from a checkout of this repository:
//!
//! ```shell
//! cargo install --path .
//! ```
//!
//! The HDF5 container is optional, and needs the HDF5 library installed:
//!
//! ```shell
//! cargo install --path . --features hdf5
//! ```
//!
//! ## Overview
//!
//! The engine itself is an external executable. It reads a set of plain-text
//! input files tied together by a `.sim` manifest, and writes its results as
//! `.dat` and `.csv` files. This crate builds those inputs, and reads the
//! outputs back.
//!
//! | Command line | Description                                               |
//! | ------------ | --------------------------------------------------------- |
//! | `mcxsim`     | Write simulation input files and a batch file from a JSON study |
//! | `mcxresults` | Summarise or export the result files of one simulation    |
//!
//! ### Supported input files
//!
//! Every input file has been through about twenty format revisions. All of
//! them are read and written, with keys added, renamed, or dropped at the
//! exact release they changed. See [HISTORY](crate::version::HISTORY).
//!
//! | Extension | Record                                                |
//! | --------- | ----------------------------------------------------- |
//! | `.sam`    | [Specimen](crate::specimen::Specimen)                 |
//! | `.mdl`    | [Models](crate::parameters::Models)                   |
//! | `.mic`    | [MicroscopeParameters](crate::parameters::MicroscopeParameters) |
//! | `.par`    | [SimulationParameters](crate::parameters::SimulationParameters) |
//! | `.rp`     | [ResultsParameters](crate::parameters::ResultsParameters) |
//! | `.sim`    | [SimulationInputs](crate::inputs::SimulationInputs)   |
//! | `.bat`    | [BatchFile](crate::batch::BatchFile)                  |
//!
//! ### Supported result files
//!
//! Result files are read only. The [results] module lists every suffix.
//!
//! ## Advanced use
//!
//! A [Simulation](crate::simulation::Simulation) holds everything for one run.
//! Writing the whole set of files is a one-liner.
//!
//! ```rust,no_run
//! use mcxray::specimen::{Element, Region, RegionDimensions, RegionType, Specimen};
//! use mcxray::{Simulation, CURRENT_VERSION};
//!
//! let substrate = Region::new(
//!     vec![Element::pure(6)],
//!     RegionDimensions::new(RegionType::Box, &[-1e10, 1e10, -1e10, 1e10, 0.0, 1e10]).unwrap(),
//! );
//!
//! let mut simulation = Simulation::new("C", Specimen::new("C", vec![substrate]))
//!     .with_version(CURRENT_VERSION);
//! simulation.microscope.beam_energy_kev = 5.0;
//!
//! let sim_path = simulation.create_simulation_files("./runs".as_ref()).unwrap();
//! ```
//!
//! As an overview:
//! - The [version] module holds the format revisions everything is gated on.
//! - The [keyed] module is the `Key=Value` codec shared by the parameter
//! records.
//! - The [specimen] module encodes regions, elements, and their geometry.
//! - The [parameters] module contains the flat parameter records.
//! - The [results] module parses the engine outputs.
//!
//! In the background, the `nom` parser combinator library handles the line
//! formats, `csv` the tabular results, and `clap` the command line interface.

// Public facing modules
pub mod batch;
pub mod inputs;
pub mod keyed;
pub mod parameters;
pub mod results;
pub mod simulation;
pub mod specimen;
pub mod utils;
pub mod version;

#[cfg(feature = "hdf5")]
pub mod container;

// note that docs are hidden to prevent confusing the current simple API
#[doc(hidden)]
pub mod readers;

// Re-exports of useful data structures
#[doc(inline)]
pub use crate::keyed::KeyedRecord;
#[doc(inline)]
pub use crate::results::SimulationResults;
#[doc(inline)]
pub use crate::simulation::Simulation;
#[doc(inline)]
pub use crate::version::{Version, BEFORE_VERSION, CURRENT_VERSION};

// standard library
use std::path::{Path, PathBuf};

/// Load a simulation back from its `.sim` file
pub fn read_simulation(path: impl AsRef<Path>) -> anyhow::Result<Simulation> {
    Simulation::read(path.as_ref())
}

/// Write every input file of a simulation, returning the `.sim` path
pub fn write_simulation(
    simulation: &mut Simulation,
    directory: impl AsRef<Path>,
) -> anyhow::Result<PathBuf> {
    simulation.create_simulation_files(directory.as_ref())
}

/// Collect whatever result files exist for a base file name
pub fn read_results(
    directory: impl AsRef<Path>,
    base_filename: &str,
) -> anyhow::Result<SimulationResults> {
    SimulationResults::read(directory.as_ref(), base_filename)
}
