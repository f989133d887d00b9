//! Column headers handed to type constraints
//!
//! The lattice never looks inside headers itself. Constraints receive the input
//! and output header slices and decide on their own what a compatible shape is.
//! This module only provides the small vocabulary those constraints share:
//!
//! - [`Header`]: a column's name and declared [`DataKind`]
//! - [`KindSet`]: a set of data kinds, for "any of these" requirements
//!
//! Headers parse from the `name:kind` form used on the command line:
//!
//! ```
//! use learner_lattice::header::{parse_headers, DataKind};
//!
//! let headers = parse_headers("age:numeric, colour:nominal").unwrap();
//! assert_eq!(headers[1].kind, DataKind::Nominal);
//! ```

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::Deserialize;
use thiserror::Error;

/// Declared data kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Finite set of labels
    Nominal,
    /// Real-valued
    Numeric,
    /// Free text
    String,
    /// Timestamp
    Date,
    /// Nested table
    Relational,
}

impl DataKind {
    pub const ALL: [DataKind; 5] = [
        DataKind::Nominal,
        DataKind::Numeric,
        DataKind::String,
        DataKind::Date,
        DataKind::Relational,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Nominal => "nominal",
            DataKind::Numeric => "numeric",
            DataKind::String => "string",
            DataKind::Date => "date",
            DataKind::Relational => "relational",
        }
    }

    /// Single-member kind set
    pub fn as_set(self) -> KindSet {
        match self {
            DataKind::Nominal => KindSet::NOMINAL,
            DataKind::Numeric => KindSet::NUMERIC,
            DataKind::String => KindSet::STRING,
            DataKind::Date => KindSet::DATE,
            DataKind::Relational => KindSet::RELATIONAL,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = HeaderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DataKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HeaderParseError::UnknownKind(s.to_string()))
    }
}

bitflags! {
    /// Set of data kinds a column may have
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindSet: u8 {
        const NOMINAL = 1 << 0;
        const NUMERIC = 1 << 1;
        const STRING = 1 << 2;
        const DATE = 1 << 3;
        const RELATIONAL = 1 << 4;
    }
}

impl KindSet {
    pub fn admits(self, kind: DataKind) -> bool {
        self.contains(kind.as_set())
    }

    /// Human-readable listing, e.g. `nominal or numeric`
    pub fn describe(self) -> String {
        let names: Vec<&str> = DataKind::ALL
            .into_iter()
            .filter(|kind| self.admits(*kind))
            .map(DataKind::as_str)
            .collect();
        if names.is_empty() {
            "no kind".to_string()
        } else {
            names.join(" or ")
        }
    }
}

impl FromIterator<DataKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = DataKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(KindSet::empty(), |set, kind| set | kind.as_set())
    }
}

/// Structural description of one column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    pub name: String,
    pub kind: DataKind,
}

impl Header {
    pub fn new(name: impl Into<String>, kind: DataKind) -> Self {
        Header {
            name: name.into(),
            kind,
        }
    }

    pub fn nominal(name: impl Into<String>) -> Self {
        Self::new(name, DataKind::Nominal)
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, DataKind::Numeric)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.kind)
    }
}

impl FromStr for Header {
    type Err = HeaderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, kind) = s
            .rsplit_once(':')
            .ok_or_else(|| HeaderParseError::MissingKind(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(HeaderParseError::MissingName(s.to_string()));
        }
        Ok(Header::new(name, kind.parse()?))
    }
}

/// Parses a comma-separated header list; an empty string is an empty list
pub fn parse_headers(s: &str) -> Result<Vec<Header>, HeaderParseError> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Error type for header parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    #[error("expected 'name:kind', found '{0}'")]
    MissingKind(String),

    #[error("missing column name in '{0}'")]
    MissingName(String),

    #[error("unknown data kind '{0}'")]
    UnknownKind(String),
}
