//! Keyed record protocol shared by all flat input files
//!
//! The `.mic`, `.par`, `.rp`, `.mdl` and `.sim` files are all blocks of
//! `Key=Value` lines. Each record type declares its keys once as a static
//! schedule of [Field] entries, and the [KeyedRecord] trait derives the read
//! and write logic from it.
//!
//! A [Field] carries:
//! - the key as written in the file, and a description for the banner
//! - the [Format] used to extract and render the value
//! - the window of versions `[since, until)` in which the key exists
//! - accessors to move a [Value] in and out of the record
//!
//! Reading is best-effort. Every active key is looked up by prefix in the
//! lines of the file, and a key that is not found simply keeps its default.
//! Malformed values are errors.
//!
//! Writing emits the banner, the `Version=` line (omitted for files older than
//! versioning), and one line per active key in schedule order.

// internal modules
use crate::readers::{self, parsers};
use crate::utils::{f, NumberFmt, EXPONENT_DIGITS};
use crate::version::{Version, BEFORE_VERSION};

// standard library
use std::path::Path;

// external crates
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};

/// Width of the decorative banners
const BANNER_WIDTH: usize = 80;

/// Decimal places or significant digits for floats in keyed files
const FLOAT_PRECISION: usize = 6;

/// A typed value moving between a record and its text representation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Flag(bool),
    Text(String),
}

impl Value {
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            Value::Integer(v) => Ok(*v),
            other => bail!("Expected an integer, found {other:?}"),
        }
    }

    /// Integers are accepted and widened
    pub fn as_real(&self) -> Result<f64> {
        match self {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => bail!("Expected a real number, found {other:?}"),
        }
    }

    pub fn as_flag(&self) -> Result<bool> {
        match self {
            Value::Flag(v) => Ok(*v),
            Value::Integer(v) => Ok(*v != 0),
            other => bail!("Expected a 0/1 flag, found {other:?}"),
        }
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Value::Text(v) => Ok(v),
            other => bail!("Expected text, found {other:?}"),
        }
    }

    /// Counts stored as integers in the file but unsigned in the records
    pub fn as_count(&self) -> Result<u64> {
        let value = self.as_integer()?;
        u64::try_from(value).map_err(|_| anyhow!("Expected a positive count, found {value}"))
    }
}

/// How a value is extracted from, and rendered to, the text of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain integer
    Integer,
    /// `%.6f` with trailing zeros trimmed
    Fixed,
    /// `%.6g` with three digit exponents
    General,
    /// Boolean written as `0`/`1`
    Flag,
    /// Verbatim text
    Text,
}

impl Format {
    /// Convert the raw text after `Key=` into a value
    pub fn extract(self, raw: &str) -> Result<Value> {
        let raw = raw.trim();
        let value = match self {
            Format::Integer => Value::Integer(raw.parse()?),
            Format::Fixed | Format::General => Value::Real(raw.parse()?),
            Format::Flag => Value::Flag(raw.parse::<i64>()? != 0),
            Format::Text => Value::Text(raw.to_string()),
        };
        Ok(value)
    }

    /// Render a value as it should appear after `Key=`
    pub fn render(self, value: &Value) -> Result<String> {
        let text = match self {
            Format::Integer => value.as_integer()?.to_string(),
            Format::Fixed => value.as_real()?.fixed_trimmed(FLOAT_PRECISION),
            Format::General => value.as_real()?.general(FLOAT_PRECISION, EXPONENT_DIGITS),
            Format::Flag => u8::from(value.as_flag()?).to_string(),
            Format::Text => value.clone().into_text()?,
        };
        Ok(text)
    }
}

/// One key of a record schedule
pub struct Field<T> {
    /// Key exactly as written in the file
    pub key: &'static str,
    /// Short description used in the banner
    pub description: &'static str,
    pub format: Format,
    /// First version where the key exists
    pub since: Version,
    /// First version where the key no longer exists
    pub until: Option<Version>,
    /// Current value, `None` if nothing should be written
    pub get: fn(&T) -> Option<Value>,
    /// Store an extracted value
    pub set: fn(&mut T, Value) -> Result<()>,
}

impl<T> Field<T> {
    /// Is the key part of files at `version`
    pub fn is_active(&self, version: Version) -> bool {
        version >= self.since && self.until.map_or(true, |until| version < until)
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("format", &self.format)
            .field("since", &self.since)
            .field("until", &self.until)
            .finish()
    }
}

/// Read/write protocol for flat `Key=Value` files
///
/// Implementors only provide the schedule, a banner title, and access to
/// their version. Everything else has a default implementation.
pub trait KeyedRecord: Sized + 'static {
    /// Banner title, no banner is written when empty
    const TITLE: &'static str;

    /// Every key that ever existed for this record, in file order
    fn schedule() -> &'static [Field<Self>];

    fn version(&self) -> Version;

    fn set_version(&mut self, version: Version);

    /// Keys valid for a given version, in file order
    fn active_fields(version: Version) -> Vec<&'static Field<Self>> {
        Self::schedule()
            .iter()
            .filter(|field| field.is_active(version))
            .collect()
    }

    /// Banner describing the keys of the current version
    fn header_lines(&self) -> Vec<String> {
        if Self::TITLE.is_empty() {
            return Vec::new();
        }
        let rows = Self::active_fields(self.version())
            .iter()
            .map(|field| f!("{} = {}", field.key, field.description))
            .collect::<Vec<String>>();
        banner(Self::TITLE, &rows)
    }

    /// Fill the record from lines of text, leaving absent keys untouched
    fn extract_from_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        for field in Self::active_fields(self.version()) {
            let raw = lines
                .iter()
                .find_map(|line| parsers::keyed_value(line.as_ref(), field.key));

            match raw {
                Some(raw) => {
                    trace!("[{}] {raw}", field.key);
                    let value = field
                        .format
                        .extract(raw)
                        .with_context(|| f!("Invalid value \"{raw}\" for {}", field.key))?;
                    (field.set)(self, value)
                        .with_context(|| f!("Could not set {} from \"{raw}\"", field.key))?;
                }
                None => trace!("[{}] not found, keeping default", field.key),
            }
        }
        Ok(())
    }

    /// All lines of the file, banner included
    fn create_lines(&self) -> Result<Vec<String>> {
        let mut lines = self.header_lines();
        if self.version() > BEFORE_VERSION {
            lines.push(self.version().create_line());
        }
        for field in Self::active_fields(self.version()) {
            if let Some(value) = (field.get)(self) {
                let text = field
                    .format
                    .render(&value)
                    .with_context(|| f!("Could not format {}", field.key))?;
                lines.push(f!("{}={}", field.key, text));
            }
        }
        Ok(lines)
    }

    /// Current values of the active keys
    fn values(&self) -> Vec<(&'static str, Value)> {
        Self::active_fields(self.version())
            .into_iter()
            .filter_map(|field| (field.get)(self).map(|value| (field.key, value)))
            .collect()
    }

    /// Read the record from a file, taking the version from the file itself
    fn read(&mut self, path: &Path) -> Result<()> {
        debug!("Reading {}", path.display());
        let lines = readers::read_lines(path)?;
        self.set_version(Version::from_lines(&lines));
        self.extract_from_lines(&lines)
            .with_context(|| f!("Could not read {}", path.display()))
    }

    fn write(&self, path: &Path) -> Result<()> {
        debug!("Writing {}", path.display());
        let lines = self.create_lines()?;
        readers::write_lines(path, &lines)
    }
}

/// Decorative banner written at the top of the input files
///
/// ```text
/// ********************************************************************************
/// ***                              TITLE
/// ***
/// ***    row
/// ********************************************************************************
/// ```
pub fn banner<S: AsRef<str>>(title: &str, rows: &[S]) -> Vec<String> {
    let rule = "*".repeat(BANNER_WIDTH);
    let prefix = parsers::COMMENT_PREFIX;
    let width = BANNER_WIDTH - 2 * prefix.len();

    let mut lines = vec![rule.clone()];
    lines.push(f!("{prefix}{:^width$}", title).trim_end().to_string());
    if !rows.is_empty() {
        lines.push(prefix.to_string());
        for row in rows {
            lines.push(f!("{prefix}    {}", row.as_ref()).trim_end().to_string());
        }
    }
    lines.push(rule);
    lines
}

/// Schedule entry bound to a plain field of the record
///
/// The last argument names the record field and how it maps to a [Value]:
/// `as real`, `as integer`, `as flag`, `as text`, `as optional_text`, or
/// `as model Kind` for ids checked against a model family.
///
/// Unsigned counts above `i64::MAX` are written as `i64::MAX`.
macro_rules! keyed_field {
    (@entry $key:expr, $description:expr, $format:ident, $since:expr, $until:expr, $get:expr, $set:expr) => {
        $crate::keyed::Field {
            key: $key,
            description: $description,
            format: $crate::keyed::Format::$format,
            since: $since,
            until: $until,
            get: $get,
            set: $set,
        }
    };
    ($key:expr, $description:expr, $format:ident, $since:expr, $until:expr, $field:ident as real) => {
        $crate::keyed::keyed_field!(@entry $key, $description, $format, $since, $until,
            |r| Some($crate::keyed::Value::Real(r.$field)),
            |r, v| {
                r.$field = v.as_real()?;
                Ok(())
            })
    };
    ($key:expr, $description:expr, $format:ident, $since:expr, $until:expr, $field:ident as integer) => {
        $crate::keyed::keyed_field!(@entry $key, $description, $format, $since, $until,
            |r| Some($crate::keyed::Value::Integer(
                i64::try_from(r.$field).unwrap_or(i64::MAX),
            )),
            |r, v| {
                r.$field = v.as_count()?.try_into()?;
                Ok(())
            })
    };
    ($key:expr, $description:expr, $format:ident, $since:expr, $until:expr, $field:ident as flag) => {
        $crate::keyed::keyed_field!(@entry $key, $description, $format, $since, $until,
            |r| Some($crate::keyed::Value::Flag(r.$field)),
            |r, v| {
                r.$field = v.as_flag()?;
                Ok(())
            })
    };
    ($key:expr, $description:expr, $format:ident, $since:expr, $until:expr, $field:ident as text) => {
        $crate::keyed::keyed_field!(@entry $key, $description, $format, $since, $until,
            |r| Some($crate::keyed::Value::Text(r.$field.clone())),
            |r, v| {
                r.$field = v.into_text()?;
                Ok(())
            })
    };
    ($key:expr, $description:expr, $format:ident, $since:expr, $until:expr, $field:ident as optional_text) => {
        $crate::keyed::keyed_field!(@entry $key, $description, $format, $since, $until,
            |r| r.$field.clone().map($crate::keyed::Value::Text),
            |r, v| {
                r.$field = Some(v.into_text()?);
                Ok(())
            })
    };
    ($key:expr, $description:expr, $format:ident, $since:expr, $until:expr, $field:ident as model $kind:expr) => {
        $crate::keyed::keyed_field!(@entry $key, $description, $format, $since, $until,
            |r| Some($crate::keyed::Value::Integer(i64::from(r.$field))),
            |r, v| {
                r.$field = $kind.check(v.as_integer()?)?;
                Ok(())
            })
    };
}

pub(crate) use keyed_field;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{VERSION_1_2_0, VERSION_1_4_0};

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        version: Version,
        energy: f64,
        count: i64,
        enabled: bool,
        name: String,
    }

    static SAMPLE_FIELDS: &[Field<Sample>] = &[
        Field {
            key: "Energy",
            description: "Energy in keV",
            format: Format::Fixed,
            since: BEFORE_VERSION,
            until: None,
            get: |p| Some(Value::Real(p.energy)),
            set: |p, v| {
                p.energy = v.as_real()?;
                Ok(())
            },
        },
        Field {
            key: "Count",
            description: "Number of things",
            format: Format::Integer,
            since: VERSION_1_2_0,
            until: Some(VERSION_1_4_0),
            get: |p| Some(Value::Integer(p.count)),
            set: |p, v| {
                p.count = v.as_integer()?;
                Ok(())
            },
        },
        Field {
            key: "Enabled",
            description: "Switch",
            format: Format::Flag,
            since: VERSION_1_4_0,
            until: None,
            get: |p| Some(Value::Flag(p.enabled)),
            set: |p, v| {
                p.enabled = v.as_flag()?;
                Ok(())
            },
        },
        Field {
            key: "Name",
            description: "Optional name",
            format: Format::Text,
            since: BEFORE_VERSION,
            until: None,
            get: |p| (!p.name.is_empty()).then(|| Value::Text(p.name.clone())),
            set: |p, v| {
                p.name = v.into_text()?;
                Ok(())
            },
        },
    ];

    impl KeyedRecord for Sample {
        const TITLE: &'static str = "SAMPLE";

        fn schedule() -> &'static [Field<Self>] {
            SAMPLE_FIELDS
        }

        fn version(&self) -> Version {
            self.version
        }

        fn set_version(&mut self, version: Version) {
            self.version = version;
        }
    }

    #[test]
    fn active_fields_follow_windows() {
        let keys = |v| {
            Sample::active_fields(v)
                .iter()
                .map(|field| field.key)
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(BEFORE_VERSION), vec!["Energy", "Name"]);
        assert_eq!(keys(VERSION_1_2_0), vec!["Energy", "Count", "Name"]);
        assert_eq!(keys(VERSION_1_4_0), vec!["Energy", "Enabled", "Name"]);
    }

    #[test]
    fn create_lines_layout() {
        let sample = Sample {
            version: VERSION_1_2_0,
            energy: 20.0,
            count: 3,
            ..Default::default()
        };
        let lines = sample.create_lines().unwrap();
        let body: Vec<&str> = lines
            .iter()
            .filter(|l| !parsers::is_comment(l))
            .map(String::as_str)
            .collect();
        assert_eq!(body, vec!["Version=1.2.0", "Energy=20.0", "Count=3"]);
        assert!(lines[0].starts_with("*****"));
        assert!(lines.iter().any(|l| l.contains("Energy = Energy in keV")));
    }

    #[test]
    fn no_version_line_before_versioning() {
        let sample = Sample {
            version: BEFORE_VERSION,
            ..Default::default()
        };
        let lines = sample.create_lines().unwrap();
        assert!(!lines.iter().any(|l| l.starts_with("Version=")));
    }

    #[test]
    fn extract_is_best_effort() {
        let mut sample = Sample {
            version: VERSION_1_4_0,
            energy: 5.0,
            count: 7,
            ..Default::default()
        };
        // count is not valid at 1.4.0 and must be ignored
        let lines = ["Enabled=1", "Count=99", "Unknown=4"];
        sample.extract_from_lines(&lines).unwrap();
        assert_eq!(sample.energy, 5.0);
        assert_eq!(sample.count, 7);
        assert!(sample.enabled);
    }

    #[test]
    fn extract_propagates_bad_values() {
        let mut sample = Sample::default();
        let error = sample.extract_from_lines(&["Energy=ten"]).unwrap_err();
        assert!(f!("{error:#}").contains("Energy"));
    }

    #[test]
    fn flags_read_any_integer() {
        assert_eq!(Format::Flag.extract("0").unwrap(), Value::Flag(false));
        assert_eq!(Format::Flag.extract("2").unwrap(), Value::Flag(true));
        assert!(Format::Flag.extract("yes").is_err());
        assert_eq!(Format::Flag.render(&Value::Flag(true)).unwrap(), "1");
    }

    #[test]
    fn render_checks_types() {
        assert_eq!(Format::General.render(&Value::Real(1e-10)).unwrap(), "1e-010");
        assert_eq!(Format::Fixed.render(&Value::Integer(3)).unwrap(), "3.0");
        assert!(Format::Integer.render(&Value::Real(1.5)).is_err());
        assert!(Value::Integer(-1).as_count().is_err());
    }

    #[test]
    fn banner_layout() {
        let lines = banner("TITLE", &["row"]);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[2], "***");
        assert_eq!(lines[3], "***    row");
        assert_eq!(lines[1].trim_start_matches("***").trim(), "TITLE");
    }
}
