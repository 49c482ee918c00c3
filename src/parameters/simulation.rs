//! Monte Carlo settings of the `.par` file

// internal modules
use crate::keyed::{keyed_field, Field, KeyedRecord};
use crate::version::{Version, BEFORE_VERSION, VERSION_1_2_4, VERSION_1_4_4};

// external crates
use serde::{Deserialize, Serialize};

/// Trajectory and photon counts, map resolution, and spectrum binning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    #[serde(skip)]
    pub version: Version,
    /// Prefix of every result file the engine writes
    pub base_filename: String,
    pub number_electrons: u64,
    pub number_photons: u64,
    pub number_windows: u32,
    pub number_film_x: u32,
    pub number_film_y: u32,
    pub number_film_z: u32,
    pub number_channels: u32,
    pub energy_channel_width_ev: f64,
    pub spectra_interpolation_model: u32,
    pub elastic_cross_section_scaling_factor: f64,
    pub energy_loss_scaling_factor: f64,
}

impl SimulationParameters {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            version: Version::default(),
            base_filename: String::new(),
            number_electrons: 1000,
            number_photons: 10000,
            number_windows: 64,
            number_film_x: 128,
            number_film_y: 128,
            number_film_z: 128,
            number_channels: 1024,
            energy_channel_width_ev: 5.0,
            spectra_interpolation_model: 1,
            elastic_cross_section_scaling_factor: 1.0,
            energy_loss_scaling_factor: 1.0,
        }
    }
}

#[rustfmt::skip]
static SIMULATION_FIELDS: &[Field<SimulationParameters>] = &[
    keyed_field!("BaseFileName", "Base name of the result files", Text, BEFORE_VERSION, None, base_filename as text),
    keyed_field!("ElectronNbr", "Number of electron trajectories", Integer, BEFORE_VERSION, None, number_electrons as integer),
    keyed_field!("PhotonNbr", "Number of photons per interaction", Integer, BEFORE_VERSION, None, number_photons as integer),
    keyed_field!("WindowNbr", "Number of detector window points", Integer, BEFORE_VERSION, None, number_windows as integer),
    keyed_field!("FilmNbrX", "Number of film points along x", Integer, BEFORE_VERSION, None, number_film_x as integer),
    keyed_field!("FilmNbrY", "Number of film points along y", Integer, BEFORE_VERSION, None, number_film_y as integer),
    keyed_field!("FilmNbrZ", "Number of film points along z", Integer, BEFORE_VERSION, None, number_film_z as integer),
    keyed_field!("SpectraChannel", "Number of spectrum channels", Integer, BEFORE_VERSION, None, number_channels as integer),
    keyed_field!("EnergyChannelWidth", "Channel width in eV", Fixed, VERSION_1_2_4, None, energy_channel_width_ev as real),
    keyed_field!("SpectraInterpolation", "Spectrum interpolation model", Integer, VERSION_1_2_4, None, spectra_interpolation_model as integer),
    keyed_field!("ElasticCrossSectionScalingFactor", "Scaling of the elastic cross section", Fixed, VERSION_1_4_4, None, elastic_cross_section_scaling_factor as real),
    keyed_field!("EnergyLossScalingFactor", "Scaling of the energy loss", Fixed, VERSION_1_4_4, None, energy_loss_scaling_factor as real),
];

impl KeyedRecord for SimulationParameters {
    const TITLE: &'static str = "SIMULATION PARAMETERS";

    fn schedule() -> &'static [Field<Self>] {
        SIMULATION_FIELDS
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
    use crate::version::{VERSION_1_2_3, VERSION_1_4_3};
    use rstest::rstest;

    fn scaled() -> Vec<&'static str> {
        vec![
            "ElectronNbr=2000",
            "EnergyChannelWidth=10.0",
            "ElasticCrossSectionScalingFactor=1.3",
            "EnergyLossScalingFactor=0.7",
        ]
    }

    #[test]
    fn scaling_factors_ignored_before_1_4_4() {
        let mut record = SimulationParameters::new(VERSION_1_4_3);
        record.extract_from_lines(&scaled()).unwrap();
        assert_eq!(record.number_electrons, 2000);
        assert_eq!(record.energy_channel_width_ev, 10.0);
        assert_eq!(record.elastic_cross_section_scaling_factor, 1.0);
        assert_eq!(record.energy_loss_scaling_factor, 1.0);
    }

    #[test]
    fn scaling_factors_read_from_1_4_4() {
        let mut record = SimulationParameters::new(VERSION_1_4_4);
        record.extract_from_lines(&scaled()).unwrap();
        assert_eq!(record.elastic_cross_section_scaling_factor, 1.3);
        assert_eq!(record.energy_loss_scaling_factor, 0.7);
    }

    #[rstest]
    #[case(BEFORE_VERSION, 8)]
    #[case(VERSION_1_2_3, 8)]
    #[case(VERSION_1_2_4, 10)]
    #[case(VERSION_1_4_3, 10)]
    #[case(VERSION_1_4_4, 12)]
    fn key_count(#[case] version: Version, #[case] expected: usize) {
        assert_eq!(SimulationParameters::active_fields(version).len(), expected);
        assert_eq!(SimulationParameters::new(version).values().len(), expected);
    }

    #[test]
    fn negative_counts_fail() {
        let mut record = SimulationParameters::default();
        assert!(record.extract_from_lines(&["ElectronNbr=-5"]).is_err());
    }

    #[test]
    fn layout() {
        let record = SimulationParameters {
            base_filename: "AuC".to_string(),
            ..Default::default()
        };
        let lines = record.create_lines().unwrap();
        assert!(lines.contains(&"BaseFileName=AuC".to_string()));
        assert!(lines.contains(&"EnergyChannelWidth=5.0".to_string()));
        assert!(lines.contains(&"EnergyLossScalingFactor=1.0".to_string()));
    }

    #[test]
    fn counts_beyond_the_file_range_are_bounded() {
        let record = SimulationParameters {
            number_electrons: u64::MAX,
            number_photons: i64::MAX as u64 + 1,
            ..Default::default()
        };
        let lines = record.create_lines().unwrap();
        assert!(lines.contains(&"ElectronNbr=9223372036854775807".to_string()));
        assert!(lines.contains(&"PhotonNbr=9223372036854775807".to_string()));
        assert!(!lines.iter().any(|l| l.contains("=-")));

        let mut read = SimulationParameters::default();
        read.extract_from_lines(&lines).unwrap();
        assert_eq!(read.number_electrons, i64::MAX as u64);
    }
}
