#![doc(hidden)]
//! Library of readers and common functions for the various file formats

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

// internal modules
use crate::utils::f;

// external crates
use anyhow::{Context, Result};
use log::trace;

// files under the readers module
pub mod parsers;

/// Read every line of a text file
///
/// Line endings are stripped, including the `\r` of files written on Windows.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let reader = get_reader(path)?;
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| f!("Could not read {}", path.display()))?;
        lines.push(line.trim_end_matches('\r').to_string());
    }
    trace!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Write lines to a text file, each terminated by a newline
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    let mut writer = get_writer(path)?;
    for line in lines {
        writeln!(writer, "{}", line.as_ref())
            .with_context(|| f!("Could not write to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| f!("Could not write to {}", path.display()))?;
    trace!("Wrote {} lines to {}", lines.len(), path.display());
    Ok(())
}

/// Helper function for cleaning up file IO boilerplate
pub fn get_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| f!("Could not open {}", path.display()))?;
    trace!("New bufreader for {}", path.display());
    Ok(BufReader::new(file))
}

/// Helper function for cleaning up file IO boilerplate
pub fn get_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| f!("Could not create {}", path.display()))?;
    trace!("New bufwriter for {}", path.display());
    Ok(BufWriter::new(file))
}
