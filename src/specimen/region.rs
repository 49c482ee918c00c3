//! Homogeneous volumes of a specimen

// internal modules
use crate::readers::parsers;
use crate::specimen::dimensions::{RegionDimensions, RegionType};
use crate::specimen::element::Element;
use crate::utils::{f, NumberFmt};

// external crates
use anyhow::{anyhow, ensure, Context, Result};
use log::trace;
use serde::{Deserialize, Serialize};

pub const KEY_NUMBER_ELEMENTS: &str = "NumberElements";
pub const KEY_MASS_DENSITY: &str = "UserDefinedMassDensity";
pub const KEY_REGION_TYPE: &str = "RegionType";

/// Decimal places written for the mass density
const DENSITY_PRECISION: usize = 6;

/// One region of a specimen
///
/// A region is a list of elements filling a geometry, with an optional user
/// defined mass density overriding the one computed by the engine.
///
/// The element count is stored separately from the list as it is in the
/// files, and the two must agree before anything is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegionConfig", into = "RegionConfig")]
pub struct Region {
    pub number_elements: usize,
    pub elements: Vec<Element>,
    /// User defined density in g/cm3, `None` lets the engine compute it
    pub mass_density_g_cm3: Option<f64>,
    pub dimensions: RegionDimensions,
}

impl Region {
    pub fn new(elements: Vec<Element>, dimensions: RegionDimensions) -> Self {
        Self {
            number_elements: elements.len(),
            elements,
            mass_density_g_cm3: None,
            dimensions,
        }
    }

    pub fn with_mass_density(mut self, density_g_cm3: f64) -> Self {
        self.mass_density_g_cm3 = Some(density_g_cm3);
        self
    }

    pub fn region_type(&self) -> RegionType {
        self.dimensions.region_type()
    }

    /// Legacy positional block, returns the region and the lines consumed
    ///
    /// ```text
    /// 2                  <- element count
    /// 6 0.5              <- Z fraction, one per element
    /// 8 0.5
    /// 1.9                <- optional density
    /// BOX                <- region type
    /// -1 1 -1 1 0 1      <- dimensions
    /// ```
    pub fn extract_from_lines_without_version<S: AsRef<str>>(lines: &[S]) -> Result<(Self, usize)> {
        let mut index = 0;

        let line = line_at(lines, index)?;
        let number_elements = line
            .trim()
            .parse::<usize>()
            .with_context(|| f!("Invalid element count \"{}\"", line.trim()))?;
        index += 1;

        let mut elements = Vec::with_capacity(number_elements);
        for _ in 0..number_elements {
            elements.push(Element::extract_from_line_old_version(line_at(lines, index)?)?);
            index += 1;
        }

        // the density line is optional and only told apart by being a number
        let mass_density_g_cm3 = try_parse_float(line_at(lines, index)?);
        if mass_density_g_cm3.is_some() {
            index += 1;
        }

        let region_type = line_at(lines, index)?.parse::<RegionType>()?;
        index += 1;

        let dimensions =
            RegionDimensions::extract_from_line_old_version(region_type, line_at(lines, index)?)?;
        index += 1;

        trace!("Legacy {region_type} region with {number_elements} element(s)");
        let region = Self {
            number_elements,
            elements,
            mass_density_g_cm3,
            dimensions,
        };
        Ok((region, index))
    }

    /// Keyed block, returns the region and the lines consumed
    ///
    /// A `UserDefinedMassDensity` of exactly zero means no user density.
    pub fn extract_from_lines_with_version<S: AsRef<str>>(lines: &[S]) -> Result<(Self, usize)> {
        let mut index = 0;

        let line = line_at(lines, index)?;
        let number_elements = parsers::keyed_parse::<usize>(line, KEY_NUMBER_ELEMENTS)
            .ok_or_else(|| anyhow!("Expected {KEY_NUMBER_ELEMENTS}= in \"{}\"", line.trim()))??;
        index += 1;

        let mut elements = Vec::with_capacity(number_elements);
        for _ in 0..number_elements {
            let mut element = Element::default();
            index += element.extract_from_lines_with_key(&lines[index..])?;
            elements.push(element);
        }

        let mut mass_density_g_cm3 = None;
        if let Some(density) = parsers::keyed_parse::<f64>(line_at(lines, index)?, KEY_MASS_DENSITY)
        {
            let density = density?;
            mass_density_g_cm3 = (density != 0.0).then_some(density);
            index += 1;
        }

        let line = line_at(lines, index)?;
        let region_type = parsers::keyed_value(line, KEY_REGION_TYPE)
            .ok_or_else(|| anyhow!("Expected {KEY_REGION_TYPE}= in \"{}\"", line.trim()))?
            .parse::<RegionType>()?;
        index += 1;

        let dimensions =
            RegionDimensions::extract_from_line_with_key(region_type, line_at(lines, index)?)?;
        index += 1;

        trace!("{region_type} region with {number_elements} element(s)");
        let region = Self {
            number_elements,
            elements,
            mass_density_g_cm3,
            dimensions,
        };
        Ok((region, index))
    }

    pub fn create_lines_without_version(&self) -> Result<Vec<String>> {
        self.check_element_count()?;

        let mut lines = vec![self.number_elements.to_string()];
        lines.extend(self.elements.iter().map(Element::create_line_old_version));
        if let Some(density) = self.mass_density_g_cm3 {
            lines.push(density.fixed(DENSITY_PRECISION));
        }
        lines.push(self.region_type().to_string());
        lines.push(self.dimensions.create_line_old_version());
        Ok(lines)
    }

    pub fn create_lines_with_version(&self) -> Result<Vec<String>> {
        self.check_element_count()?;

        let mut lines = vec![f!("{KEY_NUMBER_ELEMENTS}={}", self.number_elements)];
        for element in &self.elements {
            lines.extend(element.create_lines_with_key());
        }
        lines.push(f!(
            "{KEY_MASS_DENSITY}={}",
            self.mass_density_g_cm3
                .unwrap_or(0.0)
                .fixed(DENSITY_PRECISION)
        ));
        lines.push(f!("{KEY_REGION_TYPE}={}", self.region_type()));
        lines.push(self.dimensions.create_line_with_key());
        Ok(lines)
    }

    fn check_element_count(&self) -> Result<()> {
        ensure!(
            self.number_elements == self.elements.len(),
            "Region declares {} element(s) but holds {}",
            self.number_elements,
            self.elements.len()
        );
        Ok(())
    }
}

/// Lookahead for the optional legacy density line
fn try_parse_float(line: &str) -> Option<f64> {
    line.trim().parse::<f64>().ok()
}

fn line_at<S: AsRef<str>>(lines: &[S], index: usize) -> Result<&str> {
    lines
        .get(index)
        .map(|line| line.as_ref())
        .ok_or_else(|| anyhow!("Region block ends early, expected line {}", index + 1))
}

/// Serialised form, the element count always follows the list
#[derive(Serialize, Deserialize)]
struct RegionConfig {
    elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mass_density_g_cm3: Option<f64>,
    dimensions: RegionDimensions,
}

impl From<RegionConfig> for Region {
    fn from(config: RegionConfig) -> Self {
        let region = Region::new(config.elements, config.dimensions);
        Self {
            mass_density_g_cm3: config.mass_density_g_cm3,
            ..region
        }
    }
}

impl From<Region> for RegionConfig {
    fn from(region: Region) -> Self {
        Self {
            elements: region.elements,
            mass_density_g_cm3: region.mass_density_g_cm3,
            dimensions: region.dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn film() -> Region {
        let dimensions = RegionDimensions::new(
            RegionType::Box,
            &[-1.0e10, 1.0e10, -1.0e10, 1.0e10, 0.0, 200.0],
        )
        .unwrap();
        Region::new(vec![Element::new(6, 0.4), Element::new(8, 0.6)], dimensions)
    }

    fn region_of(region_type: RegionType) -> Region {
        let values: &[f64] = match region_type {
            RegionType::Box => &[-500.0, 500.0, -500.0, 500.0, 0.0, 250.0],
            RegionType::Cylinder => &[0.0, 0.0, 100.0, 0.0, 1.0, 0.0, 2000.0, 75.5],
            RegionType::Sphere => &[0.0, 0.0, 50.0, 50.0],
        };
        let dimensions = RegionDimensions::new(region_type, values).unwrap();
        Region::new(vec![Element::new(29, 0.9), Element::new(30, 0.1)], dimensions)
    }

    #[rstest]
    #[case(RegionType::Box)]
    #[case(RegionType::Cylinder)]
    #[case(RegionType::Sphere)]
    fn every_region_type_in_both_layouts(#[case] region_type: RegionType) {
        let arity = region_type.keys().len();
        let region = region_of(region_type);

        let legacy = region.create_lines_without_version().unwrap();
        assert_eq!(legacy[3], region_type.to_string());
        assert_eq!(legacy[4].split_whitespace().count(), arity);
        let (read, consumed) = Region::extract_from_lines_without_version(&legacy).unwrap();
        assert_eq!((read, consumed), (region.clone(), legacy.len()));

        let keyed = region.create_lines_with_version().unwrap();
        assert_eq!(keyed[6], f!("RegionType={region_type}"));
        assert_eq!(
            keyed[7]
                .trim_start_matches("RegionParameters=")
                .split_whitespace()
                .count(),
            arity
        );
        let (read, consumed) = Region::extract_from_lines_with_version(&keyed).unwrap();
        assert_eq!((read, consumed), (region.clone(), keyed.len()));

        let region = region.with_mass_density(8.9);
        let keyed = region.create_lines_with_version().unwrap();
        let (read, _) = Region::extract_from_lines_with_version(&keyed).unwrap();
        assert_eq!(read, region);
    }

    #[test]
    fn legacy_dimensions_ignore_trailing_names() {
        let lines = ["1", "79 1.0", "SPHERE", "0 0 50 50 gold"];
        let (region, consumed) = Region::extract_from_lines_without_version(&lines).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(region.dimensions.values(), vec![0.0, 0.0, 50.0, 50.0]);

        let lines = ["1", "79 1.0", "CYLINDER", "0 0 0 0 0 1 100 10 ; wire"];
        let (region, _) = Region::extract_from_lines_without_version(&lines).unwrap();
        assert_eq!(region.region_type(), RegionType::Cylinder);
        assert_eq!(region.dimensions.values()[7], 10.0);
    }

    #[test]
    fn versioned_block_layout() {
        let lines = film().create_lines_with_version().unwrap();
        assert_eq!(lines[0], "NumberElements=2");
        assert_eq!(lines[1], "AtomicNumber=6");
        assert_eq!(lines[4], "WeightFraction=0.600000000000000");
        assert_eq!(lines[5], "UserDefinedMassDensity=0.000000");
        assert_eq!(lines[6], "RegionType=BOX");
        assert!(lines[7].starts_with("RegionParameters=-10000000000.000000 "));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn versioned_block_reads_back() {
        let region = film().with_mass_density(2.25);
        let mut lines = region.create_lines_with_version().unwrap();
        lines.push("NumberElements=1".to_string());

        let (read, consumed) = Region::extract_from_lines_with_version(&lines).unwrap();
        assert_eq!(consumed, lines.len() - 1);
        assert_eq!(read, region);
    }

    #[test]
    fn zero_density_means_unset() {
        let lines = film().create_lines_with_version().unwrap();
        let (read, _) = Region::extract_from_lines_with_version(&lines).unwrap();
        assert_eq!(read.mass_density_g_cm3, None);
    }

    #[test]
    fn legacy_block_with_and_without_density() {
        let region = film();
        let lines = region.create_lines_without_version().unwrap();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "BOX");
        let (read, consumed) = Region::extract_from_lines_without_version(&lines).unwrap();
        assert_eq!((read, consumed), (region.clone(), 5));

        let region = region.with_mass_density(1.9);
        let lines = region.create_lines_without_version().unwrap();
        assert_eq!(lines[3], "1.900000");
        let (read, consumed) = Region::extract_from_lines_without_version(&lines).unwrap();
        assert_eq!((read, consumed), (region, 6));
    }

    #[test]
    fn element_count_is_checked_before_writing() {
        let mut region = film();
        region.number_elements = 3;
        assert!(region.create_lines_with_version().is_err());
        assert!(region.create_lines_without_version().is_err());
    }

    #[test]
    fn truncated_blocks_fail() {
        let lines = film().create_lines_with_version().unwrap();
        assert!(Region::extract_from_lines_with_version(&lines[..6]).is_err());
        assert!(Region::extract_from_lines_without_version(&["1", "79 1.0"]).is_err());
    }

    #[test]
    fn unknown_region_type_fails() {
        let lines = ["1", "79 1.0", "CONE", "0 0 0 1"];
        let error = Region::extract_from_lines_without_version(&lines).unwrap_err();
        assert!(error.to_string().contains("CONE"));
    }

    #[test]
    fn json_fills_the_element_count() {
        let json = r#"{
            "elements": [{"atomic_number": 79, "mass_fraction": 1.0}],
            "dimensions": {"type": "SPHERE", "pos_x": 0, "pos_y": 0, "pos_z": 50, "radius": 50}
        }"#;
        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region.number_elements, 1);
        assert_eq!(region.region_type(), RegionType::Sphere);
        assert_eq!(region.mass_density_g_cm3, None);
    }
}
