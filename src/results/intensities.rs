//! Characteristic X-ray intensities per region, element and line

// internal modules
use crate::utils::f;

// standard library
use std::io::Read;
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

pub const SUFFIX: &str = "_XrayIntensities.csv";

/// One row of the `_XrayIntensities.csv` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XrayIntensity {
    #[serde(rename = "Region ID")]
    pub region: u32,
    #[serde(rename = "Atomic Number")]
    pub atomic_number: u32,
    /// Line label such as `Ka` or `La`
    #[serde(rename = "Line")]
    pub line: String,
    #[serde(rename = "Intensity Generated")]
    pub generated: f64,
    #[serde(rename = "Intensity Generated Detected")]
    pub generated_detected: f64,
    #[serde(rename = "Intensity Emitted")]
    pub emitted: f64,
    #[serde(rename = "Intensity Emitted Detected")]
    pub emitted_detected: f64,
}

/// Full intensity table of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XrayIntensities {
    pub rows: Vec<XrayIntensity>,
}

impl XrayIntensities {
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

        let mut rows = Vec::new();
        for (i, record) in reader.deserialize::<XrayIntensity>().enumerate() {
            rows.push(record.with_context(|| f!("Invalid intensity row {}", i + 1))?);
        }
        Ok(Self { rows })
    }

    /// Row for one region, element and line
    pub fn get(&self, region: u32, atomic_number: u32, line: &str) -> Option<&XrayIntensity> {
        self.rows.iter().find(|row| {
            row.region == region && row.atomic_number == atomic_number && row.line == line
        })
    }

    /// Elements present in the table, sorted
    pub fn atomic_numbers(&self) -> Vec<u32> {
        self.rows
            .iter()
            .map(|row| row.atomic_number)
            .sorted()
            .dedup()
            .collect()
    }

    /// Emitted and detected intensity of an element over every region and line
    pub fn element_emitted_detected(&self, atomic_number: u32) -> f64 {
        self.rows
            .iter()
            .filter(|row| row.atomic_number == atomic_number)
            .map(|row| row.emitted_detected)
            .sum()
    }

    /// Generated intensity of an element over every region and line
    pub fn element_generated(&self, atomic_number: u32) -> f64 {
        self.rows
            .iter()
            .filter(|row| row.atomic_number == atomic_number)
            .map(|row| row.generated)
            .sum()
    }
}
