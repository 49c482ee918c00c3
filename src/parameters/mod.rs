//! Flat parameter blocks of a simulation
//!
//! | Record                                      | File   | Banner title            |
//! | ------------------------------------------- | ------ | ----------------------- |
//! | [MicroscopeParameters]                      | `.mic` | `MICROSCOPE PARAMETERS` |
//! | [SimulationParameters]                      | `.par` | `SIMULATION PARAMETERS` |
//! | [ResultsParameters]                         | `.rp`  | `RESULTS PARAMETERS`    |
//! | [Models]                                    | `.mdl` | `MODELS`                |
//!
//! All of them implement [KeyedRecord](crate::keyed::KeyedRecord), so reading
//! and writing works the same way for every block:
//!
//! ```rust, no_run
//! # use mcxray::keyed::KeyedRecord;
//! # use mcxray::parameters::MicroscopeParameters;
//! # use std::path::Path;
//! let mut microscope = MicroscopeParameters::default();
//! microscope.read(Path::new("./sim/AuC.mic")).unwrap();
//! microscope.beam_energy_kev = 5.0;
//! microscope.write(Path::new("./sim/AuC_5keV.mic")).unwrap();
//! ```

// files under the parameters module
mod microscope;
mod models;
mod results;
mod simulation;

pub use microscope::MicroscopeParameters;
pub use models::{ModelKind, Models};
pub use results::ResultsParameters;
pub use simulation::SimulationParameters;
