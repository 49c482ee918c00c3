//! Electron scattering summary of a finished run

// internal modules
use crate::readers::{self, parsers};
use crate::utils::f;

// standard library
use std::path::Path;
use std::str::FromStr;

// external crates
use anyhow::{anyhow, Context, Result};
use log::trace;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const SUFFIX: &str = "_ElectronResults.dat";

pub const KEY_NUMBER_ELECTRONS: &str = "Number of electrons";
pub const KEY_BACKSCATTERED: &str = "Backscattered coefficient";
pub const KEY_BACKSCATTERED_ENERGY: &str = "Backscattered energy coefficient";
pub const KEY_TRANSMITTED: &str = "Transmitted coefficient";
pub const KEY_TRANSMITTED_ENERGY: &str = "Transmitted energy coefficient";
pub const KEY_SECONDARY: &str = "Secondary coefficient";
pub const KEY_SKIRTED: &str = "Skirted coefficient";

/// Every `Key = Value` line of an `_ElectronResults.dat` file, in file order
///
/// The engine has added entries over time, so all of them are kept as text
/// and the well known ones have typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElectronResults {
    entries: Vec<(String, String)>,
}

impl ElectronResults {
    pub fn read(path: &Path) -> Result<Self> {
        let lines = readers::read_lines(path)?;
        Self::from_lines(&lines).with_context(|| f!("In {}", path.display()))
    }

    /// Lines without a `=` are titles and are skipped
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut entries = Vec::new();
        for line in lines.iter().map(AsRef::as_ref) {
            if parsers::is_blank(line) || !line.contains('=') {
                continue;
            }
            let (_, (key, value)) = parsers::spaced_key_value(line)
                .map_err(|e| anyhow!("Unreadable result line \"{line}\": {e}"))?;
            trace!("[{key}] {value}");
            entries.push((key.to_string(), value.to_string()));
        }
        Ok(Self { entries })
    }

    /// Entries already split into key and value, order is kept
    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Raw text of an entry
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parsed value of an entry, missing entries are errors
    pub fn value<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self
            .get(key)
            .ok_or_else(|| anyhow!("No \"{key}\" in electron results"))?;
        raw.parse::<T>()
            .map_err(|e| anyhow!("Invalid \"{key}\" value \"{raw}\": {e}"))
    }

    pub fn number_electrons(&self) -> Result<u64> {
        self.value(KEY_NUMBER_ELECTRONS)
    }

    pub fn backscattered_coefficient(&self) -> Result<f64> {
        self.value(KEY_BACKSCATTERED)
    }

    pub fn backscattered_energy_coefficient(&self) -> Result<f64> {
        self.value(KEY_BACKSCATTERED_ENERGY)
    }

    pub fn transmitted_coefficient(&self) -> Result<f64> {
        self.value(KEY_TRANSMITTED)
    }

    pub fn transmitted_energy_coefficient(&self) -> Result<f64> {
        self.value(KEY_TRANSMITTED_ENERGY)
    }

    pub fn secondary_coefficient(&self) -> Result<f64> {
        self.value(KEY_SECONDARY)
    }

    pub fn skirted_coefficient(&self) -> Result<f64> {
        self.value(KEY_SKIRTED)
    }
}

impl Serialize for ElectronResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &[&str] = &[
        "Electron results",
        "",
        "Number of electrons = 10000",
        "Backscattered coefficient = 0.4931",
        "Backscattered energy coefficient = 0.4012",
        "Transmitted coefficient = 0",
        "Transmitted energy coefficient = 0",
        "Secondary coefficient = 0.1112",
        "Skirted coefficient = 0.0",
        "Simulation time = 12 s",
    ];

    #[test]
    fn typed_values() {
        let results = ElectronResults::from_lines(EXAMPLE).unwrap();
        assert_eq!(results.entries().len(), 8);
        assert_eq!(results.number_electrons().unwrap(), 10000);
        assert_eq!(results.backscattered_coefficient().unwrap(), 0.4931);
        assert_eq!(results.backscattered_energy_coefficient().unwrap(), 0.4012);
        assert_eq!(results.transmitted_coefficient().unwrap(), 0.0);
        assert_eq!(results.secondary_coefficient().unwrap(), 0.1112);
        assert_eq!(results.skirted_coefficient().unwrap(), 0.0);
        assert_eq!(results.get("Simulation time"), Some("12 s"));
    }

    #[test]
    fn missing_and_bad_values() {
        let results = ElectronResults::from_lines(&["Number of electrons = many"]).unwrap();
        assert!(results.number_electrons().is_err());
        let error = results.skirted_coefficient().unwrap_err();
        assert!(error.to_string().contains(KEY_SKIRTED));
    }

    #[test]
    fn serialised_as_a_map() {
        let results = ElectronResults::from_lines(&EXAMPLE[2..4]).unwrap();
        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(
            json,
            r#"{"Number of electrons":"10000","Backscattered coefficient":"0.4931"}"#
        );
    }
}
