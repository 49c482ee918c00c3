//! Chemical constituents of a region

// internal modules
use crate::readers::parsers;
use crate::utils::{f, NumberFmt};

// external crates
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const KEY_ATOMIC_NUMBER: &str = "AtomicNumber";
pub const KEY_MASS_FRACTION: &str = "WeightFraction";

/// Decimal places written for the mass fraction
const FRACTION_PRECISION: usize = 15;

/// One element of a region, by atomic number and mass fraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub atomic_number: u32,
    pub mass_fraction: f64,
}

impl Element {
    pub fn new(atomic_number: u32, mass_fraction: f64) -> Self {
        Self {
            atomic_number,
            mass_fraction,
        }
    }

    /// Pure element, mass fraction of 1
    pub fn pure(atomic_number: u32) -> Self {
        Self::new(atomic_number, 1.0)
    }

    /// Legacy `Z fraction` line
    ///
    /// Anything after the first two tokens is ignored.
    pub fn extract_from_line_old_version(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let atomic_number = tokens
            .next()
            .ok_or_else(|| anyhow!("Missing atomic number in \"{line}\""))?
            .parse::<u32>()
            .with_context(|| f!("Invalid atomic number in \"{line}\""))?;
        let mass_fraction = tokens
            .next()
            .ok_or_else(|| anyhow!("Missing mass fraction in \"{line}\""))?
            .parse::<f64>()
            .with_context(|| f!("Invalid mass fraction in \"{line}\""))?;
        Ok(Self::new(atomic_number, mass_fraction))
    }

    /// Keyed `AtomicNumber=`/`WeightFraction=` lines from the front of `lines`
    ///
    /// A line that does not carry the expected key is left alone and that
    /// field keeps its current value. Returns the number of lines consumed so
    /// the caller can move its cursor along.
    pub fn extract_from_lines_with_key<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<usize> {
        let mut consumed = 0;

        if let Some(line) = lines.get(consumed) {
            if let Some(value) = parsers::keyed_parse::<u32>(line.as_ref(), KEY_ATOMIC_NUMBER) {
                self.atomic_number = value?;
                consumed += 1;
            }
        }

        if let Some(line) = lines.get(consumed) {
            if let Some(value) = parsers::keyed_parse::<f64>(line.as_ref(), KEY_MASS_FRACTION) {
                self.mass_fraction = value?;
                consumed += 1;
            }
        }

        Ok(consumed)
    }

    pub fn create_line_old_version(&self) -> String {
        f!(
            "{} {}",
            self.atomic_number,
            self.mass_fraction.fixed(FRACTION_PRECISION)
        )
    }

    pub fn create_lines_with_key(&self) -> Vec<String> {
        vec![
            f!("{KEY_ATOMIC_NUMBER}={}", self.atomic_number),
            f!(
                "{KEY_MASS_FRACTION}={}",
                self.mass_fraction.fixed(FRACTION_PRECISION)
            ),
        ]
    }
}

impl Default for Element {
    fn default() -> Self {
        Self {
            atomic_number: 0,
            mass_fraction: 1.0,
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Z={} ({:.4})", self.atomic_number, self.mass_fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_version_line() {
        let gold = Element::pure(79);
        assert_eq!(gold.create_line_old_version(), "79 1.000000000000000");

        let element = Element::extract_from_line_old_version("  6 0.25 extra").unwrap();
        assert_eq!(element, Element::new(6, 0.25));

        assert!(Element::extract_from_line_old_version("6").is_err());
        assert!(Element::extract_from_line_old_version("C 0.25").is_err());
    }

    #[test]
    fn keyed_lines() {
        let element = Element::new(14, 0.467434);
        let lines = element.create_lines_with_key();
        assert_eq!(lines[0], "AtomicNumber=14");
        assert_eq!(lines[1], "WeightFraction=0.467434000000000");

        let mut read = Element::default();
        assert_eq!(read.extract_from_lines_with_key(&lines).unwrap(), 2);
        assert_eq!(read, element);
    }

    #[test]
    fn keyed_lines_are_lenient() {
        let mut element = Element::new(1, 0.5);
        let consumed = element
            .extract_from_lines_with_key(&["WeightFraction=0.75", "RegionType=BOX"])
            .unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(element, Element::new(1, 0.75));

        let consumed = element
            .extract_from_lines_with_key(&["RegionType=BOX", "AtomicNumber=3"])
            .unwrap();
        assert_eq!(consumed, 0);

        let lines: [&str; 0] = [];
        assert_eq!(element.extract_from_lines_with_key(&lines).unwrap(), 0);
    }

    #[test]
    fn keyed_lines_reject_bad_values() {
        let mut element = Element::default();
        assert!(element
            .extract_from_lines_with_key(&["AtomicNumber=gold"])
            .is_err());
    }
}
