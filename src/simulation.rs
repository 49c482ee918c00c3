//! One complete simulation and its set of input files

// internal modules
use crate::inputs::SimulationInputs;
use crate::keyed::KeyedRecord;
use crate::parameters::{MicroscopeParameters, Models, ResultsParameters, SimulationParameters};
use crate::specimen::Specimen;
use crate::version::Version;

// standard library
use std::path::{Path, PathBuf};

// external crates
use anyhow::{anyhow, Result};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Everything the engine needs for one run, under a common name
///
/// The records each carry a version, which [Simulation::set_version] keeps
/// in step with the simulation's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Stem of every file name
    pub name: String,
    #[serde(skip)]
    pub version: Version,
    pub specimen: Specimen,
    #[serde(default)]
    pub models: Models,
    #[serde(default)]
    pub microscope: MicroscopeParameters,
    #[serde(default)]
    pub parameters: SimulationParameters,
    #[serde(default)]
    pub results: ResultsParameters,
}

impl Simulation {
    pub fn new(name: impl Into<String>, specimen: Specimen) -> Self {
        let mut simulation = Self {
            name: name.into(),
            version: Version::default(),
            specimen,
            models: Models::default(),
            microscope: MicroscopeParameters::default(),
            parameters: SimulationParameters::default(),
            results: ResultsParameters::default(),
        };
        simulation.set_version(Version::default());
        simulation
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.set_version(version);
        self
    }

    /// Set the format version of the simulation and every record in it
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
        self.specimen.version = version;
        self.models.set_version(version);
        self.microscope.set_version(version);
        self.parameters.set_version(version);
        self.results.set_version(version);
    }

    /// Manifest naming the files of this simulation
    pub fn inputs(&self) -> SimulationInputs {
        SimulationInputs::new(&self.name, self.version)
    }

    /// Write every input file into `directory`, returning the `.sim` path
    ///
    /// Empty specimen and base file names are filled with the simulation
    /// name. The `.rp` file is only written for versions that have one.
    pub fn create_simulation_files(&mut self, directory: &Path) -> Result<PathBuf> {
        self.set_version(self.version);
        if self.specimen.name.is_empty() {
            self.specimen.name = self.name.clone();
        }
        if self.parameters.base_filename.is_empty() {
            self.parameters.base_filename = self.name.clone();
        }
        for (kind, id) in self.models.unnamed() {
            warn!("Simulation \"{}\" selects unnamed {kind} id {id}", self.name);
        }

        let inputs = self.inputs();
        debug!("Writing simulation \"{}\" at {}", self.name, self.version);

        self.specimen
            .write(&directory.join(&inputs.specimen_filename))?;
        self.models.write(&directory.join(&inputs.model_filename))?;
        self.microscope
            .write(&directory.join(&inputs.microscope_filename))?;
        self.parameters
            .write(&directory.join(&inputs.simulation_parameters_filename))?;
        if inputs.has_result_parameters() {
            self.results
                .write(&directory.join(&inputs.result_parameters_filename))?;
        } else {
            trace!("No result parameters file before 1.4.0");
        }

        let path = directory.join(inputs.filename());
        inputs.write(&path)?;
        Ok(path)
    }

    /// Load a simulation back from its `.sim` manifest
    ///
    /// The simulation takes the version of the manifest and its name from the
    /// manifest file stem. Each record keeps the version of its own file.
    pub fn read(path: &Path) -> Result<Self> {
        let title = path
            .file_stem()
            .ok_or_else(|| anyhow!("No file name in {}", path.display()))?
            .to_string_lossy()
            .into_owned();
        let directory = path.parent().unwrap_or_else(|| Path::new(""));

        let mut inputs = SimulationInputs::new(&title, Version::default());
        inputs.read(path)?;

        let mut simulation = Simulation::new(&title, Specimen::default());
        simulation.version = inputs.version;

        simulation
            .specimen
            .read(&directory.join(&inputs.specimen_filename))?;
        simulation
            .models
            .read(&directory.join(&inputs.model_filename))?;
        simulation
            .microscope
            .read(&directory.join(&inputs.microscope_filename))?;
        simulation
            .parameters
            .read(&directory.join(&inputs.simulation_parameters_filename))?;

        if inputs.has_result_parameters() {
            simulation
                .results
                .read(&directory.join(&inputs.result_parameters_filename))?;
        } else {
            simulation.results.set_version(inputs.version);
        }

        debug!("Read simulation \"{title}\" at {}", simulation.version);
        Ok(simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specimen::{Element, Region, RegionDimensions, RegionType};
    use crate::version::{CURRENT_VERSION, VERSION_1_3_0};
    use rstest::rstest;

    fn film() -> Simulation {
        let region = Region::new(
            vec![Element::pure(14)],
            RegionDimensions::new(
                RegionType::Box,
                &[-1.0e10, 1.0e10, -1.0e10, 1.0e10, 0.0, 1.0e10],
            )
            .unwrap(),
        );
        Simulation::new("Si_bulk", Specimen::new("", vec![region]))
    }

    #[rstest]
    #[case(VERSION_1_3_0, false)]
    #[case(CURRENT_VERSION, true)]
    fn files_written_and_read_back(#[case] version: Version, #[case] has_rp: bool) {
        let directory = tempfile::tempdir().unwrap();
        let mut simulation = film().with_version(version);
        simulation.microscope.beam_energy_kev = 15.0;
        simulation.parameters.number_electrons = 500;

        let path = simulation.create_simulation_files(directory.path()).unwrap();
        assert_eq!(path, directory.path().join("Si_bulk.sim"));
        assert_eq!(directory.path().join("Si_bulk.rp").exists(), has_rp);
        assert_eq!(simulation.specimen.name, "Si_bulk");
        assert_eq!(simulation.parameters.base_filename, "Si_bulk");

        let read = Simulation::read(&path).unwrap();
        assert_eq!(read, simulation);
    }

    #[test]
    fn unnamed_models_are_written() {
        let directory = tempfile::tempdir().unwrap();
        let mut simulation = film();
        simulation.models.atom_screening = 40;
        let path = simulation.create_simulation_files(directory.path()).unwrap();

        let read = Simulation::read(&path).unwrap();
        assert_eq!(read.models.atom_screening, 40);
    }

    #[test]
    fn missing_files_fail() {
        let directory = tempfile::tempdir().unwrap();
        assert!(Simulation::read(&directory.path().join("nothing.sim")).is_err());
    }
}
