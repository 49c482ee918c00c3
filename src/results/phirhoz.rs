//! Depth distributions of X-ray generation and emission
//!
//! The table starts with a `Depth (A)` column followed by one column per
//! curve, each labelled `{Z}-{Line}`:
//!
//! ```text
//! Depth (A), 6-Ka, 79-La
//! 0.0, 1.20, 1.05
//! 10.0, 1.35, 1.10
//! ```

// internal modules
use crate::readers::parsers;
use crate::utils::f;

// standard library
use std::io::Read;
use std::path::Path;

// external crates
use anyhow::{anyhow, ensure, Context, Result};
use log::{debug, trace};
use serde::Serialize;

pub const SUFFIX_GENERATED: &str = "_PhirhozGenerated.csv";
pub const SUFFIX_EMITTED: &str = "_PhirhozEmitted.csv";

const DEPTH_HEADER: &str = "Depth (A)";

/// One phi-rho-z curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhirhozCurve {
    pub atomic_number: u32,
    pub line: String,
    pub values: Vec<f64>,
}

impl PhirhozCurve {
    pub fn label(&self) -> String {
        f!("{}-{}", self.atomic_number, self.line)
    }
}

/// Every curve of a phi-rho-z file over a shared depth axis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Phirhoz {
    pub depths_a: Vec<f64>,
    pub curves: Vec<PhirhozCurve>,
}

impl Phirhoz {
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

        let headers = reader.headers()?.clone();
        ensure!(
            headers.get(0) == Some(DEPTH_HEADER),
            "Expected \"{DEPTH_HEADER}\" as first column, found {:?}",
            headers.get(0)
        );

        let mut curves = headers
            .iter()
            .skip(1)
            .map(|label| -> Result<PhirhozCurve> {
                let (_, (atomic_number, line)) = parsers::curve_label(label)
                    .map_err(|_| anyhow!("Invalid curve label \"{label}\""))?;
                Ok(PhirhozCurve {
                    atomic_number,
                    line: line.to_string(),
                    values: Vec::new(),
                })
            })
            .collect::<Result<Vec<PhirhozCurve>>>()?;
        trace!("{} phi-rho-z curve(s)", curves.len());

        let mut depths_a = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| f!("Invalid phi-rho-z row {}", i + 1))?;
            let values = record
                .iter()
                .map(|v| v.parse::<f64>())
                .collect::<std::result::Result<Vec<f64>, _>>()
                .with_context(|| f!("Invalid number in phi-rho-z row {}", i + 1))?;
            ensure!(
                values.len() == curves.len() + 1,
                "Row {} has {} values, expected {}",
                i + 1,
                values.len(),
                curves.len() + 1
            );

            depths_a.push(values[0]);
            for (curve, value) in curves.iter_mut().zip(&values[1..]) {
                curve.values.push(*value);
            }
        }

        Ok(Self { depths_a, curves })
    }

    pub fn curve(&self, atomic_number: u32, line: &str) -> Option<&PhirhozCurve> {
        self.curves
            .iter()
            .find(|c| c.atomic_number == atomic_number && c.line == line)
    }

    /// Trapezoidal integral of a curve over depth, in the curve units times angstrom
    pub fn integral(&self, atomic_number: u32, line: &str) -> Option<f64> {
        let curve = self.curve(atomic_number, line)?;
        let area: f64 = self
            .depths_a
            .windows(2)
            .zip(curve.values.windows(2))
            .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
            .sum();
        Some(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
Depth (A), 6-Ka, 79-La
0.0, 1.0, 2.0
10.0, 2.0, 2.0
20.0, 0.0, 2.0
";

    #[test]
    fn curves_by_label() {
        let phirhoz = Phirhoz::from_reader(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(phirhoz.depths_a, vec![0.0, 10.0, 20.0]);
        assert_eq!(phirhoz.curves.len(), 2);
        assert_eq!(phirhoz.curves[1].label(), "79-La");
        assert_eq!(phirhoz.curve(6, "Ka").unwrap().values, vec![1.0, 2.0, 0.0]);
        assert!(phirhoz.curve(6, "La").is_none());
    }

    #[test]
    fn trapezoid_integral() {
        let phirhoz = Phirhoz::from_reader(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(phirhoz.integral(6, "Ka"), Some(25.0));
        assert_eq!(phirhoz.integral(79, "La"), Some(40.0));
        assert_eq!(phirhoz.integral(8, "Ka"), None);
    }

    #[rstest::rstest]
    #[case("Depth, 6-Ka\n0, 1\n")]
    #[case("Depth (A), Carbon\n0, 1\n")]
    #[case("Depth (A), 6-Ka\n0, one\n")]
    fn malformed_tables_fail(#[case] text: &str) {
        assert!(Phirhoz::from_reader(text.as_bytes()).is_err());
    }
}
