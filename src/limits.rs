// Lattice safety limits module
//
// Bounds the work a registry will accept or perform:
// - Nesting depth of a single header check (guards runaway constraint recursion)
// - Length of type names
// - Number of members in one union or intersection
//
// All limits have defaults and can be overridden from the [limits] table of a
// definitions file.

use serde::Deserialize;
use thiserror::Error;

/// Registry limits with permissive defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeLimits {
    pub max_check_depth: usize,       // Maximum nested evaluations in one check
    pub max_name_length: usize,       // Maximum type name length in bytes
    pub max_composite_members: usize, // Maximum members of a union or intersection
}

impl Default for LatticeLimits {
    fn default() -> Self {
        Self {
            max_check_depth: 256,
            max_name_length: 1_000,
            max_composite_members: 1_024,
        }
    }
}

impl LatticeLimits {
    /// Parse the [limits] table of a TOML document; other tables are ignored
    ///
    /// A document without a [limits] table yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, LimitError> {
        let config: LimitsFile = toml::from_str(content)?;

        Ok(config
            .limits
            .map(|overrides| overrides.apply(Self::default()))
            .unwrap_or_default())
    }

    /// Validate that all limits are positive and not absurdly large
    pub fn validate(&self) -> Result<(), LimitError> {
        if self.max_check_depth == 0 || self.max_check_depth > 10_000 {
            return Err(LimitError::invalid("max_check_depth", self.max_check_depth));
        }

        if self.max_name_length == 0 || self.max_name_length > 100_000 {
            return Err(LimitError::invalid("max_name_length", self.max_name_length));
        }

        if self.max_composite_members < 2 || self.max_composite_members > 1_000_000 {
            return Err(LimitError::invalid(
                "max_composite_members",
                self.max_composite_members,
            ));
        }

        Ok(())
    }
}

/// TOML structures for deserialization
#[derive(Debug, Deserialize)]
struct LimitsFile {
    limits: Option<LimitsConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsConfig {
    max_check_depth: Option<usize>,
    max_name_length: Option<usize>,
    max_composite_members: Option<usize>,
}

impl LimitsConfig {
    // Only override specified values
    fn apply(self, mut limits: LatticeLimits) -> LatticeLimits {
        if let Some(v) = self.max_check_depth {
            limits.max_check_depth = v;
        }
        if let Some(v) = self.max_name_length {
            limits.max_name_length = v;
        }
        if let Some(v) = self.max_composite_members {
            limits.max_composite_members = v;
        }
        limits
    }
}

/// Error type for limit validation and loading
#[derive(Debug, Error)]
pub enum LimitError {
    #[error("failed to parse limits: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid limit '{name}': {value} (must be positive and reasonable)")]
    Invalid { name: &'static str, value: usize },
}

impl LimitError {
    fn invalid(name: &'static str, value: usize) -> Self {
        LimitError::Invalid { name, value }
    }
}
