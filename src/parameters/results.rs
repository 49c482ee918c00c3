//! Result switches of the `.rp` file
//!
//! The file only exists from 1.4.0. Reading an older file leaves every switch
//! at its default, since no key is valid for those versions.

// internal modules
use crate::keyed::{keyed_field, Field, KeyedRecord};
use crate::version::{Version, VERSION_1_4_0, VERSION_1_4_3};

// external crates
use serde::{Deserialize, Serialize};

/// Which X-ray results the engine computes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsParameters {
    #[serde(skip)]
    pub version: Version,
    pub compute_xray_characteristic: bool,
    pub compute_xray_bremsstrahlung: bool,
    pub compute_xray_phirhoz: bool,
    pub compute_xray_simulated_spectrum: bool,
}

impl ResultsParameters {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }
}

impl Default for ResultsParameters {
    fn default() -> Self {
        Self {
            version: Version::default(),
            compute_xray_characteristic: true,
            compute_xray_bremsstrahlung: true,
            compute_xray_phirhoz: true,
            compute_xray_simulated_spectrum: false,
        }
    }
}

#[rustfmt::skip]
static RESULTS_FIELDS: &[Field<ResultsParameters>] = &[
    keyed_field!("ComputeXrayCharacteristic", "Characteristic X-ray intensities (0 or 1)", Flag, VERSION_1_4_0, None, compute_xray_characteristic as flag),
    keyed_field!("ComputeXrayBremsstrahlung", "Bremsstrahlung X-ray intensities (0 or 1)", Flag, VERSION_1_4_0, None, compute_xray_bremsstrahlung as flag),
    keyed_field!("ComputeXrayPhirhoz", "Phi-rho-z distributions (0 or 1)", Flag, VERSION_1_4_0, None, compute_xray_phirhoz as flag),
    keyed_field!("ComputeXraySimulatedSpectrum", "Simulated EDS spectrum (0 or 1)", Flag, VERSION_1_4_3, None, compute_xray_simulated_spectrum as flag),
];

impl KeyedRecord for ResultsParameters {
    const TITLE: &'static str = "RESULTS PARAMETERS";

    fn schedule() -> &'static [Field<Self>] {
        RESULTS_FIELDS
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
    use crate::version::{CURRENT_VERSION, VERSION_1_3_1, VERSION_1_4_2};

    const ALL_OFF: [&str; 4] = [
        "ComputeXrayCharacteristic=0",
        "ComputeXrayBremsstrahlung=0",
        "ComputeXrayPhirhoz=0",
        "ComputeXraySimulatedSpectrum=1",
    ];

    #[test]
    fn defaults() {
        let record = ResultsParameters::default();
        assert!(record.compute_xray_characteristic);
        assert!(record.compute_xray_bremsstrahlung);
        assert!(record.compute_xray_phirhoz);
        assert!(!record.compute_xray_simulated_spectrum);
    }

    #[test]
    fn nothing_read_before_1_4_0() {
        let mut record = ResultsParameters::new(VERSION_1_3_1);
        record.extract_from_lines(&ALL_OFF).unwrap();
        assert_eq!(record, ResultsParameters::new(VERSION_1_3_1));
    }

    #[test]
    fn simulated_spectrum_from_1_4_3() {
        let mut record = ResultsParameters::new(VERSION_1_4_2);
        record.extract_from_lines(&ALL_OFF).unwrap();
        assert!(!record.compute_xray_characteristic);
        assert!(!record.compute_xray_simulated_spectrum);

        let mut record = ResultsParameters::new(CURRENT_VERSION);
        record.extract_from_lines(&ALL_OFF).unwrap();
        assert!(record.compute_xray_simulated_spectrum);
    }

    #[test]
    fn flags_written_as_digits() {
        let lines = ResultsParameters::default().create_lines().unwrap();
        let tail = &lines[lines.len() - 4..];
        assert_eq!(
            tail,
            &[
                "ComputeXrayCharacteristic=1",
                "ComputeXrayBremsstrahlung=1",
                "ComputeXrayPhirhoz=1",
                "ComputeXraySimulatedSpectrum=0",
            ]
        );
    }
}
