//! Small `nom` parsers for the line formats
//!
//! Input files use tight `Key=Value` lines, the engine's result summaries use
//! spaced `Key = Value` lines, and everything else is whitespace separated
//! numbers. None of it needs a full grammar, so these are deliberately small.

// internal modules
use crate::utils::f;

// standard library
use std::str::FromStr;

// external crates
use anyhow::{anyhow, Context, Result};
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{alphanumeric1, char, space0, u32 as nom_u32};
use nom::combinator::{all_consuming, rest};
use nom::sequence::{separated_pair, terminated, tuple};
use nom::IResult;

/// Lines of the decorative banners start with this
pub const COMMENT_PREFIX: &str = "***";

/// Value of a `Key=Value` line if the trimmed line starts with `{key}=`
///
/// ```rust
/// # use mcxray::readers::parsers::keyed_value;
/// assert_eq!(keyed_value("  BeamEnergy=10.0 ", "BeamEnergy"), Some("10.0"));
/// assert_eq!(keyed_value("BeamEnergyX=10.0", "BeamEnergy"), None);
/// ```
pub fn keyed_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let result: IResult<&str, &str> = terminated(tag(key), char('='))(line.trim());
    match result {
        Ok((value, _)) => Some(value.trim()),
        Err(_) => None,
    }
}

/// Same as [keyed_value] but parsed into a type, erroring on bad values
pub fn keyed_parse<T>(line: &str, key: &str) -> Option<Result<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    keyed_value(line, key).map(|value| {
        value
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid value \"{value}\" for {key}: {e}"))
    })
}

/// Spaced `Key = Value` pair as written in the engine result summaries
///
/// ```rust
/// # use mcxray::readers::parsers::spaced_key_value;
/// let (_, (key, value)) = spaced_key_value("Backscattered coefficient = 0.25").unwrap();
/// assert_eq!(key, "Backscattered coefficient");
/// assert_eq!(value, "0.25");
/// ```
pub fn spaced_key_value(i: &str) -> IResult<&str, (&str, &str)> {
    let (i, (key, value)) = separated_pair(
        take_till1(|c| c == '='),
        tuple((char('='), space0)),
        rest,
    )(i.trim())?;
    Ok((i, (key.trim(), value.trim())))
}

/// Curve label of a phi-rho-z column, e.g. `79-La` => (79, "La")
pub fn curve_label(i: &str) -> IResult<&str, (u32, &str)> {
    all_consuming(separated_pair(nom_u32, char('-'), alphanumeric1))(i.trim())
}

/// Parse the first `count` whitespace separated values of a line
///
/// Tokens after the first `count` are never looked at. Fewer tokens than
/// `count` is not an error here, the caller decides what is enough.
pub fn leading_values<T>(line: &str, count: usize) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    line.split_whitespace()
        .take(count)
        .map(|token| {
            token
                .parse::<T>()
                .with_context(|| f!("Could not parse \"{token}\" in \"{}\"", line.trim()))
        })
        .collect()
}

/// Banner line check
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_PREFIX)
}

/// Blank or whitespace-only line
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
