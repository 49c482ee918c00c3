//! Geometry of a region
//!
//! Each [RegionType] has a fixed, ordered list of numeric parameters written
//! as a single whitespace separated line, optionally behind a
//! `RegionParameters=` key. All lengths are in angstrom.
//!
//! | Type       | Parameters                                         |
//! | ---------- | -------------------------------------------------- |
//! | `BOX`      | minX maxX minY maxY minZ maxZ                      |
//! | `SPHERE`   | posX posY posZ radius                              |
//! | `CYLINDER` | posX posY posZ dirX dirY dirZ length radius        |

// internal modules
use crate::readers::parsers;
use crate::utils::{f, NumberFmt};

// standard library
use std::str::FromStr;

// external crates
use anyhow::{anyhow, bail, ensure, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const KEY_REGION_PARAMETERS: &str = "RegionParameters";

/// Decimal places written for every geometry parameter
const PARAMETER_PRECISION: usize = 6;

const BOX_KEYS: &[&str] = &["minX", "maxX", "minY", "maxY", "minZ", "maxZ"];
const SPHERE_KEYS: &[&str] = &["posX", "posY", "posZ", "radius"];
const CYLINDER_KEYS: &[&str] = &[
    "posX", "posY", "posZ", "dirX", "dirY", "dirZ", "length", "radius",
];

/// Geometry tag written on the `RegionType=` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionType {
    Box,
    Cylinder,
    Sphere,
}

impl RegionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            RegionType::Box => "BOX",
            RegionType::Cylinder => "CYLINDER",
            RegionType::Sphere => "SPHERE",
        }
    }

    /// Ordered parameter names of the geometry
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            RegionType::Box => BOX_KEYS,
            RegionType::Cylinder => CYLINDER_KEYS,
            RegionType::Sphere => SPHERE_KEYS,
        }
    }
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "BOX" => Ok(RegionType::Box),
            "CYLINDER" => Ok(RegionType::Cylinder),
            "SPHERE" => Ok(RegionType::Sphere),
            _ => Err(anyhow!("Unknown region type \"{}\"", s.trim())),
        }
    }
}

/// Parameters of a region geometry
///
/// Two dimensions are equal when they describe the same geometry with the
/// same values for every parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum RegionDimensions {
    Box {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        min_z: f64,
        max_z: f64,
    },
    Cylinder {
        pos_x: f64,
        pos_y: f64,
        pos_z: f64,
        dir_x: f64,
        dir_y: f64,
        dir_z: f64,
        length: f64,
        radius: f64,
    },
    Sphere {
        pos_x: f64,
        pos_y: f64,
        pos_z: f64,
        radius: f64,
    },
}

impl RegionDimensions {
    /// Build from an ordered parameter list
    ///
    /// The list must have exactly as many values as the geometry has
    /// parameters, see [RegionType::keys].
    pub fn new(region_type: RegionType, values: &[f64]) -> Result<Self> {
        let expected = region_type.keys().len();
        ensure!(
            values.len() == expected,
            "{region_type} needs {expected} parameters, {} given",
            values.len()
        );

        let dimensions = match (region_type, values) {
            (RegionType::Box, &[min_x, max_x, min_y, max_y, min_z, max_z]) => {
                RegionDimensions::Box {
                    min_x,
                    max_x,
                    min_y,
                    max_y,
                    min_z,
                    max_z,
                }
            }
            (
                RegionType::Cylinder,
                &[pos_x, pos_y, pos_z, dir_x, dir_y, dir_z, length, radius],
            ) => RegionDimensions::Cylinder {
                pos_x,
                pos_y,
                pos_z,
                dir_x,
                dir_y,
                dir_z,
                length,
                radius,
            },
            (RegionType::Sphere, &[pos_x, pos_y, pos_z, radius]) => RegionDimensions::Sphere {
                pos_x,
                pos_y,
                pos_z,
                radius,
            },
            _ => bail!("Parameters do not match a {region_type}"),
        };
        Ok(dimensions)
    }

    /// Geometry of the given type with every parameter at zero
    pub fn zeroed(region_type: RegionType) -> Self {
        match region_type {
            RegionType::Box => RegionDimensions::Box {
                min_x: 0.0,
                max_x: 0.0,
                min_y: 0.0,
                max_y: 0.0,
                min_z: 0.0,
                max_z: 0.0,
            },
            RegionType::Cylinder => RegionDimensions::Cylinder {
                pos_x: 0.0,
                pos_y: 0.0,
                pos_z: 0.0,
                dir_x: 0.0,
                dir_y: 0.0,
                dir_z: 0.0,
                length: 0.0,
                radius: 0.0,
            },
            RegionType::Sphere => RegionDimensions::Sphere {
                pos_x: 0.0,
                pos_y: 0.0,
                pos_z: 0.0,
                radius: 0.0,
            },
        }
    }

    pub fn region_type(&self) -> RegionType {
        match self {
            RegionDimensions::Box { .. } => RegionType::Box,
            RegionDimensions::Cylinder { .. } => RegionType::Cylinder,
            RegionDimensions::Sphere { .. } => RegionType::Sphere,
        }
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.region_type().keys()
    }

    /// Parameters in file order
    pub fn values(&self) -> Vec<f64> {
        match *self {
            RegionDimensions::Box {
                min_x,
                max_x,
                min_y,
                max_y,
                min_z,
                max_z,
            } => vec![min_x, max_x, min_y, max_y, min_z, max_z],
            RegionDimensions::Cylinder {
                pos_x,
                pos_y,
                pos_z,
                dir_x,
                dir_y,
                dir_z,
                length,
                radius,
            } => vec![pos_x, pos_y, pos_z, dir_x, dir_y, dir_z, length, radius],
            RegionDimensions::Sphere {
                pos_x,
                pos_y,
                pos_z,
                radius,
            } => vec![pos_x, pos_y, pos_z, radius],
        }
    }

    /// Named parameters, in file order
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.keys()
            .iter()
            .copied()
            .zip(self.values())
            .collect()
    }

    /// Positional parameter line
    ///
    /// Tokens are matched to the parameters in order, and any surplus tokens
    /// at the end of the line are ignored.
    pub fn extract_from_line_old_version(region_type: RegionType, line: &str) -> Result<Self> {
        let expected = region_type.keys().len();
        let values: Vec<f64> = parsers::leading_values(line, expected)?;
        ensure!(
            values.len() >= expected,
            "Expected {expected} {region_type} parameters in \"{}\"",
            line.trim()
        );
        Self::new(region_type, &values[..expected])
    }

    /// `RegionParameters=` line
    pub fn extract_from_line_with_key(region_type: RegionType, line: &str) -> Result<Self> {
        let values = parsers::keyed_value(line, KEY_REGION_PARAMETERS)
            .ok_or_else(|| anyhow!("Expected {KEY_REGION_PARAMETERS}= in \"{}\"", line.trim()))?;
        Self::extract_from_line_old_version(region_type, values)
    }

    pub fn create_line_old_version(&self) -> String {
        self.values()
            .iter()
            .map(|value| value.fixed(PARAMETER_PRECISION))
            .join(" ")
    }

    pub fn create_line_with_key(&self) -> String {
        f!("{KEY_REGION_PARAMETERS}={}", self.create_line_old_version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn sphere_line_with_key() {
        let sphere =
            RegionDimensions::new(RegionType::Sphere, &[500.0, 500.0, 300.0, 300.0]).unwrap();
        assert_eq!(
            sphere.create_line_with_key(),
            "RegionParameters=500.000000 500.000000 300.000000 300.000000"
        );
    }

    #[rstest]
    #[case(RegionType::Box, 6)]
    #[case(RegionType::Cylinder, 8)]
    #[case(RegionType::Sphere, 4)]
    fn arity_is_enforced(#[case] region_type: RegionType, #[case] arity: usize) {
        let values: Vec<f64> = (0..arity).map(|i| i as f64 * 1.5 - 2.0).collect();
        let dimensions = RegionDimensions::new(region_type, &values).unwrap();
        assert_eq!(dimensions.region_type(), region_type);
        assert_eq!(dimensions.values(), values);
        assert_eq!(dimensions.keys().len(), arity);

        assert!(RegionDimensions::new(region_type, &values[1..]).is_err());
        let mut longer = values.clone();
        longer.push(1.0);
        assert!(RegionDimensions::new(region_type, &longer).is_err());
    }

    #[rstest]
    #[case(RegionType::Box)]
    #[case(RegionType::Cylinder)]
    #[case(RegionType::Sphere)]
    fn lines_read_back(#[case] region_type: RegionType) {
        let values: Vec<f64> = (0..region_type.keys().len())
            .map(|i| -1.0e10 + i as f64 * 0.125)
            .collect();
        let dimensions = RegionDimensions::new(region_type, &values).unwrap();

        let line = dimensions.create_line_with_key();
        let read = RegionDimensions::extract_from_line_with_key(region_type, &line).unwrap();
        assert_eq!(read, dimensions);

        let line = dimensions.create_line_old_version();
        let read = RegionDimensions::extract_from_line_old_version(region_type, &line).unwrap();
        assert_eq!(read, dimensions);
    }

    #[test]
    fn old_version_line_ignores_surplus_tokens() {
        let read =
            RegionDimensions::extract_from_line_old_version(RegionType::Sphere, "1 2 3 4 5 6")
                .unwrap();
        assert_eq!(read.values(), vec![1.0, 2.0, 3.0, 4.0]);

        let read = RegionDimensions::extract_from_line_old_version(
            RegionType::Sphere,
            "0 0 50 50 ; particle",
        )
        .unwrap();
        assert_eq!(read.values(), vec![0.0, 0.0, 50.0, 50.0]);
        assert!(
            RegionDimensions::extract_from_line_old_version(RegionType::Sphere, "0 0 x 50").is_err()
        );

        assert!(
            RegionDimensions::extract_from_line_old_version(RegionType::Sphere, "1 2 3").is_err()
        );
        assert!(
            RegionDimensions::extract_from_line_with_key(RegionType::Sphere, "1 2 3 4").is_err()
        );
    }

    #[test]
    fn equality_is_by_parameters() {
        let a = RegionDimensions::new(RegionType::Sphere, &[0.0, 0.0, 0.0, 1.0]).unwrap();
        let b = RegionDimensions::new(RegionType::Sphere, &[0.0, 0.0, 0.0, 1.0]).unwrap();
        let c = RegionDimensions::new(RegionType::Sphere, &[0.0, 0.0, 0.0, 2.0]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, RegionDimensions::zeroed(RegionType::Box));
        assert_eq!(
            a.parameters(),
            vec![("posX", 0.0), ("posY", 0.0), ("posZ", 0.0), ("radius", 1.0)]
        );
    }

    #[test]
    fn region_type_tags() {
        assert_eq!("BOX".parse::<RegionType>().unwrap(), RegionType::Box);
        assert_eq!(" cylinder ".parse::<RegionType>().unwrap(), RegionType::Cylinder);
        assert!("CONE".parse::<RegionType>().is_err());
        assert_eq!(RegionType::Sphere.to_string(), "SPHERE");
    }
}
