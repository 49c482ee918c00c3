//! Engine version of a finished run

// internal modules
use crate::readers::{self, parsers};
use crate::utils::f;
use crate::version::{Version, KEY_VERSION};

// standard library
use std::path::Path;

// external crates
use anyhow::{anyhow, Context, Result};

pub const SUFFIX: &str = "_ProgramVersion.dat";

/// Read the `Version=X.Y.Z` line of a `_ProgramVersion.dat` file
///
/// Unlike the input files, a missing version is an error here.
pub fn read_program_version(path: &Path) -> Result<Version> {
    let lines = readers::read_lines(path)?;
    program_version_from_lines(&lines).with_context(|| f!("In {}", path.display()))
}

pub fn program_version_from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Version> {
    lines
        .iter()
        .find_map(|line| parsers::keyed_value(line.as_ref(), KEY_VERSION))
        .ok_or_else(|| anyhow!("No {KEY_VERSION}= line in program version"))?
        .parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::VERSION_1_4_6;

    #[test]
    fn version_line() {
        assert_eq!(
            program_version_from_lines(&["Version=1.4.6"]).unwrap(),
            VERSION_1_4_6
        );
        assert!(program_version_from_lines(&["1.4.6"]).is_err());
        assert!(program_version_from_lines(&["Version=1.4"]).is_err());
    }
}
