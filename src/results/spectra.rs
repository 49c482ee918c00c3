//! Simulated EDS spectra of the whole specimen

// internal modules
use crate::utils::f;

// standard library
use std::io::Read;
use std::path::Path;

// external crates
use anyhow::{ensure, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Spectrum as generated in the specimen
pub const SUFFIX: &str = "_SpectraSpecimen.csv";

/// Spectrum after absorption and detector response
pub const SUFFIX_EMITTED_DETECTED: &str = "_SpectraSpecimenEmittedDetected.csv";

/// One energy channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumChannel {
    #[serde(rename = "Energy (keV)")]
    pub energy_kev: f64,
    #[serde(rename = "Spectra Total")]
    pub total: f64,
    #[serde(rename = "Spectra Characteristic")]
    pub characteristic: f64,
    #[serde(rename = "Spectra Bremsstrahlung")]
    pub bremsstrahlung: f64,
}

/// Spectrum of the specimen, channels sorted by energy as written
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XraySpectraSpecimen {
    pub channels: Vec<SpectrumChannel>,
}

impl XraySpectraSpecimen {
    pub fn read(path: &Path) -> Result<Self> {
        debug!("Reading {}", path.display());
        let file = std::fs::File::open(path)
            .with_context(|| f!("Could not open {}", path.display()))?;
        Self::from_reader(file).with_context(|| f!("In {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut channels = Vec::new();
        for (i, record) in reader.deserialize::<SpectrumChannel>().enumerate() {
            channels.push(record.with_context(|| f!("Invalid spectrum channel {}", i + 1))?);
        }

        ensure!(
            channels
                .windows(2)
                .all(|pair| pair[0].energy_kev <= pair[1].energy_kev),
            "Spectrum energies are not increasing"
        );
        Ok(Self { channels })
    }

    pub fn energies_kev(&self) -> Vec<f64> {
        self.channels.iter().map(|c| c.energy_kev).collect()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.channels.iter().map(|c| c.total).collect()
    }

    /// Sum of the total counts of every channel
    pub fn integrated_total(&self) -> f64 {
        self.channels.iter().map(|c| c.total).sum()
    }

    /// Channel holding a given energy, the closest one below it
    pub fn channel_at(&self, energy_kev: f64) -> Option<&SpectrumChannel> {
        let index = self
            .channels
            .partition_point(|c| c.energy_kev <= energy_kev);
        index.checked_sub(1).map(|i| &self.channels[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
Energy (keV), Spectra Total, Spectra Characteristic, Spectra Bremsstrahlung
0.005, 10.0, 0.0, 10.0
0.010, 12.5, 2.5, 10.0
0.015, 9.0, 0.0, 9.0
";

    #[test]
    fn channels_by_header() {
        let spectrum = XraySpectraSpecimen::from_reader(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(spectrum.channels.len(), 3);
        assert_eq!(spectrum.integrated_total(), 31.5);
        assert_eq!(spectrum.totals(), vec![10.0, 12.5, 9.0]);
        assert_eq!(spectrum.channel_at(0.012).unwrap().characteristic, 2.5);
        assert!(spectrum.channel_at(0.001).is_none());
    }

    #[test]
    fn energies_must_increase() {
        let text = "Energy (keV), Spectra Total, Spectra Characteristic, Spectra Bremsstrahlung\n2, 1, 0, 1\n1, 1, 0, 1\n";
        assert!(XraySpectraSpecimen::from_reader(text.as_bytes()).is_err());
    }
}
