//! Specimen geometry and its `.sam` file
//!
//! A [Specimen] is an ordered list of [Region]s, each made of [Element]s and
//! shaped by a [RegionDimensions]. The first region is usually the ambient
//! medium or substrate the others sit in.
//!
//! Two layouts exist on disk:
//! - files without a `Version=` line hold positional region blocks
//! - versioned files hold keyed region blocks behind `NumberRegions=`
//!
//! ```rust, no_run
//! # use mcxray::specimen::{Element, Region, RegionDimensions, RegionType, Specimen};
//! # use std::path::Path;
//! let substrate = Region::new(
//!     vec![Element::pure(6)],
//!     RegionDimensions::new(RegionType::Box, &[-1e10, 1e10, -1e10, 1e10, 0.0, 1e10]).unwrap(),
//! );
//! let specimen = Specimen::new("C_substrate", vec![substrate]);
//! specimen.write(Path::new("C_substrate.sam")).unwrap();
//! ```

// internal modules
use crate::keyed::banner;
use crate::readers::{self, parsers};
use crate::utils::f;
use crate::version::{Version, BEFORE_VERSION, VERSION_1_2_3};

// standard library
use std::path::Path;

// external crates
use anyhow::{anyhow, ensure, Context, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

// files under the specimen module
mod dimensions;
mod element;
mod region;

pub use dimensions::{RegionDimensions, RegionType, KEY_REGION_PARAMETERS};
pub use element::{Element, KEY_ATOMIC_NUMBER, KEY_MASS_FRACTION};
pub use region::{Region, KEY_MASS_DENSITY, KEY_NUMBER_ELEMENTS, KEY_REGION_TYPE};

pub const KEY_NUMBER_REGIONS: &str = "NumberRegions";

const TITLE: &str = "SPECIMEN";

const LEGACY_ROWS: &[&str] = &[
    "Number of regions",
    "For each region:",
    "  Number of elements",
    "  Atomic number and mass fraction of each element",
    "  Mass density in g/cm3 (optional)",
    "  Region type (BOX, CYLINDER or SPHERE)",
    "  Region parameters in angstrom",
];

const KEYED_ROWS: &[&str] = &[
    "NumberRegions = number of regions",
    "For each region:",
    "  NumberElements = number of elements",
    "  AtomicNumber = atomic number of an element",
    "  WeightFraction = mass fraction of the same element",
    "  UserDefinedMassDensity = mass density in g/cm3, 0 to let the engine compute it",
    "  RegionType = BOX, CYLINDER or SPHERE",
    "  RegionParameters = geometry in angstrom",
    "    BOX: minX maxX minY maxY minZ maxZ",
    "    CYLINDER: posX posY posZ dirX dirY dirZ length radius",
    "    SPHERE: posX posY posZ radius",
];

/// Full sample geometry written to the `.sam` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpecimenConfig", into = "SpecimenConfig")]
pub struct Specimen {
    /// Used verbatim for file names
    pub name: String,
    pub version: Version,
    pub number_regions: usize,
    pub regions: Vec<Region>,
    /// Write only the title in the banner
    pub short_header: bool,
}

impl Specimen {
    pub fn new(name: impl Into<String>, regions: Vec<Region>) -> Self {
        Self {
            name: name.into(),
            version: Version::default(),
            number_regions: regions.len(),
            regions,
            short_header: false,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Append a region, keeping the region count in step
    pub fn push(&mut self, region: Region) {
        self.regions.push(region);
        self.number_regions = self.regions.len();
    }

    /// Banner for the current version and header style
    pub fn header_lines(&self) -> Vec<String> {
        if self.short_header {
            banner::<&str>(TITLE, &[])
        } else if self.version < VERSION_1_2_3 {
            banner(TITLE, LEGACY_ROWS)
        } else {
            banner(TITLE, KEYED_ROWS)
        }
    }

    /// Every line of the `.sam` file
    ///
    /// Files at [BEFORE_VERSION] get the positional layout, so they can be
    /// read back by the legacy path.
    pub fn create_lines(&self) -> Result<Vec<String>> {
        ensure!(
            self.number_regions == self.regions.len(),
            "Specimen \"{}\" declares {} region(s) but holds {}",
            self.name,
            self.number_regions,
            self.regions.len()
        );

        let mut lines = self.header_lines();

        if self.version <= BEFORE_VERSION {
            lines.push(self.number_regions.to_string());
            for region in &self.regions {
                lines.push(String::new());
                lines.extend(region.create_lines_without_version()?);
            }
        } else {
            lines.push(self.version.create_line());
            lines.push(f!("{KEY_NUMBER_REGIONS}={}", self.number_regions));
            for region in &self.regions {
                lines.extend(region.create_lines_with_version()?);
                lines.push(String::new());
            }
        }

        Ok(lines)
    }

    /// Fill the regions from the lines of a file at `self.version`
    pub fn extract_from_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        self.regions = if self.version <= BEFORE_VERSION {
            extract_regions_without_version(lines)?
        } else {
            extract_regions_with_version(lines)?
        };
        self.number_regions = self.regions.len();
        Ok(())
    }

    /// Read a `.sam` file, taking the version from the file itself
    ///
    /// An empty name is replaced by the file stem.
    pub fn read(&mut self, path: &Path) -> Result<()> {
        debug!("Reading {}", path.display());
        let lines = readers::read_lines(path)?;
        self.version = Version::from_lines(&lines);
        self.extract_from_lines(&lines)
            .with_context(|| f!("Could not read specimen from {}", path.display()))?;

        if self.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                self.name = stem.to_string_lossy().into_owned();
            }
        }
        Ok(())
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        debug!("Writing {}", path.display());
        let lines = self.create_lines()?;
        readers::write_lines(path, &lines)
    }
}

impl Default for Specimen {
    fn default() -> Self {
        Self::new(String::new(), Vec::new())
    }
}

/// Index of the first line at or after `start` that is not skipped
fn skip_while<S, P>(lines: &[S], start: usize, skip: P) -> usize
where
    S: AsRef<str>,
    P: Fn(&str) -> bool,
{
    lines[start.min(lines.len())..]
        .iter()
        .position(|line| !skip(line.as_ref()))
        .map_or(lines.len(), |offset| start + offset)
}

fn is_filler(line: &str) -> bool {
    parsers::is_comment(line) || parsers::is_blank(line)
}

fn extract_regions_without_version<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Region>> {
    let mut index = skip_while(lines, 0, is_filler);
    let line = lines
        .get(index)
        .ok_or_else(|| anyhow!("No region count found in specimen"))?
        .as_ref();
    let number_regions = line
        .trim()
        .parse::<usize>()
        .with_context(|| f!("Invalid region count \"{}\"", line.trim()))?;
    index += 1;
    trace!("Legacy specimen with {number_regions} region(s)");

    let mut regions = Vec::with_capacity(number_regions);
    for i in 0..number_regions {
        index = skip_while(lines, index, parsers::is_blank);
        let (region, consumed) = Region::extract_from_lines_without_version(&lines[index..])
            .with_context(|| f!("Could not read region {i}"))?;
        regions.push(region);
        index += consumed;
    }
    Ok(regions)
}

fn extract_regions_with_version<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Region>> {
    let (mut index, number_regions) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| {
            parsers::keyed_parse::<usize>(line.as_ref(), KEY_NUMBER_REGIONS).map(|n| (i, n))
        })
        .ok_or_else(|| anyhow!("No {KEY_NUMBER_REGIONS}= line found in specimen"))?;
    let number_regions = number_regions?;
    index += 1;
    trace!("Specimen with {number_regions} region(s)");

    let mut regions = Vec::with_capacity(number_regions);
    for i in 0..number_regions {
        index = skip_while(lines, index, is_filler);
        let (region, consumed) = Region::extract_from_lines_with_version(&lines[index..])
            .with_context(|| f!("Could not read region {i}"))?;
        regions.push(region);
        index += consumed;
    }
    Ok(regions)
}

/// Serialised form, version and header style come from the simulation
#[derive(Serialize, Deserialize)]
struct SpecimenConfig {
    #[serde(default)]
    name: String,
    regions: Vec<Region>,
}

impl From<SpecimenConfig> for Specimen {
    fn from(config: SpecimenConfig) -> Self {
        Specimen::new(config.name, config.regions)
    }
}

impl From<Specimen> for SpecimenConfig {
    fn from(specimen: Specimen) -> Self {
        Self {
            name: specimen.name,
            regions: specimen.regions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{CURRENT_VERSION, VERSION_1_2_0};
    use rstest::rstest;

    fn particle_on_substrate() -> Specimen {
        let substrate = Region::new(
            vec![Element::pure(6)],
            RegionDimensions::new(
                RegionType::Box,
                &[-1.0e10, 1.0e10, -1.0e10, 1.0e10, 0.0, 1.0e10],
            )
            .unwrap(),
        );
        let particle = Region::new(
            vec![Element::new(79, 0.8), Element::new(47, 0.2)],
            RegionDimensions::new(RegionType::Sphere, &[0.0, 0.0, 500.0, 500.0]).unwrap(),
        )
        .with_mass_density(17.5);
        let wire = Region::new(
            vec![Element::pure(29)],
            RegionDimensions::new(
                RegionType::Cylinder,
                &[-2000.0, 0.0, 100.0, 1.0, 0.0, 0.0, 4000.0, 100.0],
            )
            .unwrap(),
        );
        Specimen::new("AuAg_particle", vec![substrate, particle, wire])
    }

    #[rstest]
    #[case(BEFORE_VERSION)]
    #[case(VERSION_1_2_0)]
    #[case(CURRENT_VERSION)]
    fn lines_read_back(#[case] version: Version) {
        let specimen = particle_on_substrate().with_version(version);
        let lines = specimen.create_lines().unwrap();
        assert_eq!(Version::from_lines(&lines), version);

        let mut read = Specimen::new("AuAg_particle", Vec::new()).with_version(version);
        read.extract_from_lines(&lines).unwrap();
        assert_eq!(read.regions[2].region_type(), RegionType::Cylinder);
        assert_eq!(read, specimen);
    }

    #[test]
    fn versioned_layout() {
        let lines = particle_on_substrate().create_lines().unwrap();
        let body: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|l| !parsers::is_comment(l))
            .collect();
        assert_eq!(body[0], "Version=2.2.0");
        assert_eq!(body[1], "NumberRegions=3");
        assert_eq!(body[2], "NumberElements=1");
        assert_eq!(*body.last().unwrap(), "");
    }

    #[test]
    fn legacy_layout_has_no_keys() {
        let specimen = particle_on_substrate().with_version(BEFORE_VERSION);
        let lines = specimen.create_lines().unwrap();
        assert!(!lines.iter().any(|l| l.contains('=')));
        assert!(lines.iter().any(|l| l == "SPHERE"));
        assert!(lines.iter().any(|l| l == "17.500000"));
    }

    #[test]
    fn header_styles() {
        let mut specimen = particle_on_substrate();
        let keyed = specimen.header_lines();
        assert!(keyed.iter().any(|l| l.contains("RegionParameters")));

        specimen.version = VERSION_1_2_0;
        let legacy = specimen.header_lines();
        assert!(!legacy.iter().any(|l| l.contains("RegionParameters")));

        specimen.short_header = true;
        assert_eq!(specimen.header_lines().len(), 3);
    }

    #[test]
    fn region_count_is_checked_before_writing() {
        let mut specimen = particle_on_substrate();
        specimen.number_regions = 1;
        assert!(specimen.create_lines().is_err());
    }

    #[test]
    fn blank_lines_between_regions_are_tolerated() {
        let lines = particle_on_substrate().create_lines().unwrap();
        let padded: Vec<String> = lines
            .into_iter()
            .flat_map(|l| {
                if l.starts_with("NumberElements=") {
                    vec![String::new(), String::new(), l]
                } else {
                    vec![l]
                }
            })
            .collect();
        let mut read = Specimen::default();
        read.extract_from_lines(&padded).unwrap();
        assert_eq!(read.number_regions, 3);
        assert_eq!(read.regions[1].region_type(), RegionType::Sphere);
    }

    #[test]
    fn missing_region_count_fails() {
        let mut read = Specimen::default();
        assert!(read.extract_from_lines(&["Version=2.2.0"]).is_err());
    }
}
