//! Read-only parsers for the files the engine writes after a run
//!
//! Every result file is named `{base}{suffix}`, where `base` is the
//! `BaseFileName` of the simulation parameters.
//!
//! | Suffix                                | Reader                                 |
//! | ------------------------------------- | -------------------------------------- |
//! | `_ProgramVersion.dat`                 | [read_program_version]                 |
//! | `_ElectronResults.dat`                | [ElectronResults]                      |
//! | `_XrayIntensities.csv`                | [XrayIntensities]                      |
//! | `_SpectraSpecimen.csv`                | [XraySpectraSpecimen]                  |
//! | `_SpectraSpecimenEmittedDetected.csv` | [XraySpectraSpecimen]                  |
//! | `_PhirhozGenerated.csv`               | [Phirhoz]                              |
//! | `_PhirhozEmitted.csv`                 | [Phirhoz]                              |

// internal modules
use crate::utils::f;
use crate::version::Version;

// standard library
use std::path::{Path, PathBuf};

// external crates
use anyhow::Result;
use log::{debug, trace};
use serde::Serialize;

// files under the results module
pub mod electron;
pub mod intensities;
pub mod phirhoz;
pub mod program;
pub mod spectra;

pub use electron::ElectronResults;
pub use intensities::{XrayIntensities, XrayIntensity};
pub use phirhoz::{Phirhoz, PhirhozCurve};
pub use program::read_program_version;
pub use spectra::{SpectrumChannel, XraySpectraSpecimen};

/// Path of a result file
pub fn result_path(directory: &Path, base_filename: &str, suffix: &str) -> PathBuf {
    directory.join(f!("{base_filename}{suffix}"))
}

/// Everything found for one run
///
/// Files are optional since the result parameters decide what the engine
/// writes. A file that exists but cannot be parsed is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationResults {
    pub base_filename: String,
    pub program_version: Option<Version>,
    pub electron: Option<ElectronResults>,
    pub intensities: Option<XrayIntensities>,
    pub spectrum: Option<XraySpectraSpecimen>,
    pub spectrum_emitted_detected: Option<XraySpectraSpecimen>,
    pub phirhoz_generated: Option<Phirhoz>,
    pub phirhoz_emitted: Option<Phirhoz>,
}

impl SimulationResults {
    pub fn read(directory: &Path, base_filename: &str) -> Result<Self> {
        debug!("Collecting results of \"{base_filename}\" in {}", directory.display());
        let path = |suffix: &str| result_path(directory, base_filename, suffix);

        Ok(Self {
            base_filename: base_filename.to_string(),
            program_version: read_optional(&path(program::SUFFIX), read_program_version)?,
            electron: read_optional(&path(electron::SUFFIX), ElectronResults::read)?,
            intensities: read_optional(&path(intensities::SUFFIX), XrayIntensities::read)?,
            spectrum: read_optional(&path(spectra::SUFFIX), XraySpectraSpecimen::read)?,
            spectrum_emitted_detected: read_optional(
                &path(spectra::SUFFIX_EMITTED_DETECTED),
                XraySpectraSpecimen::read,
            )?,
            phirhoz_generated: read_optional(&path(phirhoz::SUFFIX_GENERATED), Phirhoz::read)?,
            phirhoz_emitted: read_optional(&path(phirhoz::SUFFIX_EMITTED), Phirhoz::read)?,
        })
    }

    /// Nothing was found at all
    pub fn is_empty(&self) -> bool {
        self.program_version.is_none()
            && self.electron.is_none()
            && self.intensities.is_none()
            && self.spectrum.is_none()
            && self.spectrum_emitted_detected.is_none()
            && self.phirhoz_generated.is_none()
            && self.phirhoz_emitted.is_none()
    }
}

fn read_optional<T, F>(path: &Path, reader: F) -> Result<Option<T>>
where
    F: Fn(&Path) -> Result<T>,
{
    if path.exists() {
        reader(path).map(Some)
    } else {
        trace!("No {}", path.display());
        Ok(None)
    }
}
