//! Format versions of the engine input files
//!
//! Every input file written since 1.2.0 carries a `Version=X.Y.Z` line, and the
//! version decides which keys exist in a file. Older files have no such line
//! and are treated as [BEFORE_VERSION].
//!
//! The full list of releases is kept in [HISTORY] along with a short note on
//! what changed in the files. The key schedules in the
//! [parameters](crate::parameters) module refer to these constants when
//! declaring when a key appeared or was renamed.
//!
//! ```rust
//! # use mcxray::version::{Version, CURRENT_VERSION, VERSION_1_4_4};
//! let version: Version = "1.4.4".parse().unwrap();
//! assert_eq!(version, VERSION_1_4_4);
//! assert!(version < CURRENT_VERSION);
//! assert_eq!(version.to_string(), "1.4.4");
//! ```

// internal modules
use crate::readers::{self, parsers};
use crate::utils::f;

// standard library
use std::path::Path;
use std::str::FromStr;

// external crates
use anyhow::{anyhow, Result};
use log::trace;
use serde::{Deserialize, Serialize};

/// Key used for the version line in every input file
pub const KEY_VERSION: &str = "Version";

/// Three part `major.minor.revision` version
///
/// Ordering is lexicographic on the three components, which the derived
/// implementations give for free through the field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Find the `Version=` line in a block of lines
    ///
    /// Files written before versioning have no such line, so a missing or
    /// unparsable version falls back to [BEFORE_VERSION] rather than failing.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let value = lines
            .iter()
            .find_map(|line| parsers::keyed_value(line.as_ref(), KEY_VERSION));

        match value.map(str::parse::<Version>) {
            Some(Ok(version)) => version,
            Some(Err(e)) => {
                trace!("Unreadable version line ({e}), assuming {BEFORE_VERSION}");
                BEFORE_VERSION
            }
            None => {
                trace!("No version line, assuming {BEFORE_VERSION}");
                BEFORE_VERSION
            }
        }
    }

    /// Read the version of any input file
    ///
    /// I/O errors propagate, a missing `Version=` line does not.
    pub fn read_from_file(path: &Path) -> Result<Self> {
        let lines = readers::read_lines(path)?;
        Ok(Self::from_lines(&lines))
    }

    /// The `Version=X.Y.Z` line as written in the files
    pub fn create_line(&self) -> String {
        f!("{KEY_VERSION}={self}")
    }

    /// Note attached to this exact release, if it is a known one
    pub fn note(&self) -> Option<&'static str> {
        HISTORY
            .iter()
            .find(|entry| entry.version == *self)
            .map(|entry| entry.note)
    }
}

impl Default for Version {
    fn default() -> Self {
        CURRENT_VERSION
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut items = s.trim().split('.');
        let mut next = |name: &str| -> Result<u32> {
            let item = items
                .next()
                .ok_or_else(|| anyhow!("Missing {name} component in version \"{s}\""))?;
            item.trim()
                .parse::<u32>()
                .map_err(|e| anyhow!("Invalid {name} component in version \"{s}\": {e}"))
        };

        let major = next("major")?;
        let minor = next("minor")?;
        let revision = next("revision")?;
        Ok(Self::new(major, minor, revision))
    }
}

impl TryFrom<String> for Version {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// One entry of the release history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionNote {
    pub version: Version,
    pub note: &'static str,
}

pub const VERSION_1_1_1: Version = Version::new(1, 1, 1);
pub const VERSION_1_2_0: Version = Version::new(1, 2, 0);
pub const VERSION_1_2_1: Version = Version::new(1, 2, 1);
pub const VERSION_1_2_2: Version = Version::new(1, 2, 2);
pub const VERSION_1_2_3: Version = Version::new(1, 2, 3);
pub const VERSION_1_2_4: Version = Version::new(1, 2, 4);
pub const VERSION_1_2_5: Version = Version::new(1, 2, 5);
pub const VERSION_1_3_0: Version = Version::new(1, 3, 0);
pub const VERSION_1_3_1: Version = Version::new(1, 3, 1);
pub const VERSION_1_4_0: Version = Version::new(1, 4, 0);
pub const VERSION_1_4_1: Version = Version::new(1, 4, 1);
pub const VERSION_1_4_2: Version = Version::new(1, 4, 2);
pub const VERSION_1_4_3: Version = Version::new(1, 4, 3);
pub const VERSION_1_4_4: Version = Version::new(1, 4, 4);
pub const VERSION_1_4_5: Version = Version::new(1, 4, 5);
pub const VERSION_1_4_6: Version = Version::new(1, 4, 6);
pub const VERSION_1_5_0: Version = Version::new(1, 5, 0);
pub const VERSION_2_0_0: Version = Version::new(2, 0, 0);
pub const VERSION_2_1_0: Version = Version::new(2, 1, 0);
pub const VERSION_2_2_0: Version = Version::new(2, 2, 0);

/// Files without a `Version=` line
pub const BEFORE_VERSION: Version = VERSION_1_1_1;

/// Newest format, used for everything written by default
pub const CURRENT_VERSION: Version = VERSION_2_2_0;

/// Every release, oldest first, with what it changed in the files
pub const HISTORY: &[VersionNote] = &[
    VersionNote {
        version: VERSION_1_1_1,
        note: "No Version= line. Specimen regions are positional lines.",
    },
    VersionNote {
        version: VERSION_1_2_0,
        note: "Version= line in every input file, keyed region blocks in the specimen.",
    },
    VersionNote {
        version: VERSION_1_2_1,
        note: "Engine only, no change to the files.",
    },
    VersionNote {
        version: VERSION_1_2_2,
        note: "Map file name added to the simulation inputs.",
    },
    VersionNote {
        version: VERSION_1_2_3,
        note: "Specimen header describes the keyed region block.",
    },
    VersionNote {
        version: VERSION_1_2_4,
        note: "EnergyChannelWidth and SpectraInterpolation added to the simulation parameters.",
    },
    VersionNote {
        version: VERSION_1_2_5,
        note: "MassAbsorptionCoefficientModel added to the models.",
    },
    VersionNote {
        version: VERSION_1_3_0,
        note: "Bright field, dark field and HAADF detector angles added to the microscope.",
    },
    VersionNote {
        version: VERSION_1_3_1,
        note: "Engine only, no change to the files.",
    },
    VersionNote {
        version: VERSION_1_4_0,
        note: "Result parameters file added, with its name in the simulation inputs.",
    },
    VersionNote {
        version: VERSION_1_4_1,
        note: "DetectorDiffusionLenght renamed DetectorDiffusionLength in the microscope.",
    },
    VersionNote {
        version: VERSION_1_4_2,
        note: "XRayCSBremsstrahlungModel added to the models.",
    },
    VersionNote {
        version: VERSION_1_4_3,
        note: "ComputeXraySimulatedSpectrum added to the result parameters.",
    },
    VersionNote {
        version: VERSION_1_4_4,
        note: "ElasticCrossSectionScalingFactor and EnergyLossScalingFactor added to the simulation parameters.",
    },
    VersionNote {
        version: VERSION_1_4_5,
        note: "Engine only, phi-rho-z written per region.",
    },
    VersionNote {
        version: VERSION_1_4_6,
        note: "Engine only, no change to the files.",
    },
    VersionNote {
        version: VERSION_1_5_0,
        note: "AtomElectronRangeModel added to the models.",
    },
    VersionNote {
        version: VERSION_2_0_0,
        note: "SNR file name added to the simulation inputs.",
    },
    VersionNote {
        version: VERSION_2_1_0,
        note: "Engine only, HDF5 result container.",
    },
    VersionNote {
        version: VERSION_2_2_0,
        note: "Engine only, no change to the files.",
    },
];
