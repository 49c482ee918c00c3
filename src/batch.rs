//! Batch file running the engine over many simulations
//!
//! The batch file is a plain list of engine invocations, one per `.sim`
//! manifest, run in order from the directory holding the simulation files.

// internal modules
use crate::readers;
use crate::utils::f;

// standard library
use std::path::{Path, PathBuf};

// external crates
use anyhow::{ensure, Result};
use itertools::Itertools;
use log::debug;

/// Engine executable used when none is given
pub const DEFAULT_ENGINE: &str = "McXRay.exe";

/// Ordered list of simulations to hand to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    /// File name of the batch file, `.bat` is added if missing
    pub name: String,
    /// Path or name of the engine executable
    pub engine: String,
    simulations: Vec<String>,
}

impl BatchFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: DEFAULT_ENGINE.to_string(),
            simulations: Vec::new(),
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Queue a `.sim` file, duplicates are only run once
    pub fn add_simulation(&mut self, sim_filename: impl Into<String>) {
        self.simulations.push(sim_filename.into());
    }

    pub fn simulations(&self) -> impl Iterator<Item = &str> {
        self.simulations.iter().map(String::as_str).unique()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    pub fn filename(&self) -> String {
        match self.name.ends_with(".bat") {
            true => self.name.clone(),
            false => f!("{}.bat", self.name),
        }
    }

    pub fn create_lines(&self) -> Vec<String> {
        self.simulations()
            .map(|sim| f!("{} {}", self.engine, sim))
            .collect()
    }

    /// Write the batch file in `directory`, returning its path
    pub fn write(&self, directory: &Path) -> Result<PathBuf> {
        ensure!(!self.is_empty(), "No simulations in batch file {}", self.name);
        let path = directory.join(self.filename());
        let lines = self.create_lines();
        debug!("Writing {} engine runs to {}", lines.len(), path.display());
        readers::write_lines(&path, &lines)?;
        Ok(path)
    }

    /// Split into batch files of at most `size` simulations each
    ///
    /// Parts are named `{name}_{index}` starting from 1.
    pub fn split(&self, size: usize) -> Vec<BatchFile> {
        let size = size.max(1);
        let stem = self.name.trim_end_matches(".bat");
        self.simulations()
            .chunks(size)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| BatchFile {
                name: f!("{stem}_{}", i + 1),
                engine: self.engine.clone(),
                simulations: chunk.map(str::to_string).collect(),
            })
            .collect()
    }
}
