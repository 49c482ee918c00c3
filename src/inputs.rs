//! The `.sim` manifest handed to the engine
//!
//! A manifest names every input file of one simulation. File names are
//! relative to the directory of the `.sim` file.
//!
//! ```text
//! Version=2.2.0
//! Specimen=AuC.sam
//! Model=AuC.mdl
//! Microscope=AuC.mic
//! SimulationParameters=AuC.par
//! ResultParameters=AuC.rp
//! ```

// internal modules
use crate::keyed::{keyed_field, Field, KeyedRecord};
use crate::utils::f;
use crate::version::{
    Version, BEFORE_VERSION, VERSION_1_2_2, VERSION_1_4_0, VERSION_2_0_0,
};

// external crates
use serde::{Deserialize, Serialize};

/// File names making up one simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInputs {
    /// Common stem of the file names, not written to the file
    pub title: String,
    pub version: Version,
    pub specimen_filename: String,
    pub model_filename: String,
    pub microscope_filename: String,
    pub simulation_parameters_filename: String,
    /// Only written when set
    pub map_filename: Option<String>,
    pub result_parameters_filename: String,
    /// Only written when set
    pub snr_filename: Option<String>,
}

impl SimulationInputs {
    /// Conventional `{title}.ext` names for every file produced by this crate
    pub fn new(title: impl Into<String>, version: Version) -> Self {
        let title = title.into();
        Self {
            specimen_filename: f!("{title}.sam"),
            model_filename: f!("{title}.mdl"),
            microscope_filename: f!("{title}.mic"),
            simulation_parameters_filename: f!("{title}.par"),
            map_filename: None,
            result_parameters_filename: f!("{title}.rp"),
            snr_filename: None,
            version,
            title,
        }
    }

    /// Name of the manifest itself
    pub fn filename(&self) -> String {
        f!("{}.sim", self.title)
    }

    /// Does the manifest reference a result parameters file
    pub fn has_result_parameters(&self) -> bool {
        self.version >= VERSION_1_4_0
    }
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self::new("simulation", Version::default())
    }
}

#[rustfmt::skip]
static INPUTS_FIELDS: &[Field<SimulationInputs>] = &[
    keyed_field!("Specimen", "Specimen file", Text, BEFORE_VERSION, None, specimen_filename as text),
    keyed_field!("Model", "Models file", Text, BEFORE_VERSION, None, model_filename as text),
    keyed_field!("Microscope", "Microscope file", Text, BEFORE_VERSION, None, microscope_filename as text),
    keyed_field!("SimulationParameters", "Simulation parameters file", Text, BEFORE_VERSION, None, simulation_parameters_filename as text),
    keyed_field!("Map", "Map file", Text, VERSION_1_2_2, None, map_filename as optional_text),
    keyed_field!("ResultParameters", "Result parameters file", Text, VERSION_1_4_0, None, result_parameters_filename as text),
    keyed_field!("SNR", "Signal to noise file", Text, VERSION_2_0_0, None, snr_filename as optional_text),
];

impl KeyedRecord for SimulationInputs {
    const TITLE: &'static str = "";

    fn schedule() -> &'static [Field<Self>] {
        INPUTS_FIELDS
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{CURRENT_VERSION, VERSION_1_2_0, VERSION_1_4_3};

    #[test]
    fn manifest_layout() {
        let inputs = SimulationInputs::new("AuC", VERSION_1_4_3);
        let lines = inputs.create_lines().unwrap();
        assert_eq!(
            lines,
            vec![
                "Version=1.4.3",
                "Specimen=AuC.sam",
                "Model=AuC.mdl",
                "Microscope=AuC.mic",
                "SimulationParameters=AuC.par",
                "ResultParameters=AuC.rp",
            ]
        );
    }

    #[test]
    fn optional_files_follow_version() {
        let mut inputs = SimulationInputs::new("AuC", VERSION_1_2_0);
        inputs.map_filename = Some("AuC.mpp".to_string());
        inputs.snr_filename = Some("AuC.snr".to_string());
        let lines = inputs.create_lines().unwrap();
        assert_eq!(lines.len(), 5);
        assert!(!inputs.has_result_parameters());

        inputs.version = CURRENT_VERSION;
        let lines = inputs.create_lines().unwrap();
        assert!(lines.contains(&"Map=AuC.mpp".to_string()));
        assert!(lines.contains(&"SNR=AuC.snr".to_string()));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn lines_read_back() {
        let mut inputs = SimulationInputs::new("Si_film", CURRENT_VERSION);
        inputs.snr_filename = Some("Si_film.snr".to_string());
        let lines = inputs.create_lines().unwrap();

        let mut read = SimulationInputs::new("Si_film", CURRENT_VERSION);
        read.specimen_filename.clear();
        read.extract_from_lines(&lines).unwrap();
        assert_eq!(read, inputs);
        assert_eq!(read.filename(), "Si_film.sim");
    }
}
