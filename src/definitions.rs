//! Type definition files
//!
//! A definitions file declares extension types in TOML instead of code. Each
//! `[[types]]` entry names a base (any name or expression the registry can
//! resolve) and a set of column requirements that become its constraint:
//!
//! ```toml
//! [limits]
//! max_check_depth = 64
//!
//! [[types]]
//! name = "BinaryClassifying"
//! base = "Classifying"
//! input_kinds = ["numeric", "nominal"]
//! min_input_count = 1
//! ```
//!
//! Entries are registered in file order, after the standard categories, so
//! later entries may extend earlier ones.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{StandardTypes, column_count, columns_of_kinds};
use crate::header::{DataKind, Header, KindSet};
use crate::lattice::{TypeError, TypeRegistry};
use crate::limits::{LatticeLimits, LimitError};

/// Errors raised while loading or applying a definitions file
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse definitions: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Limits(#[from] LimitError),

    #[error("type '{name}': {source}")]
    Type {
        name: String,
        #[source]
        source: TypeError,
    },
}

/// One declared extension type and the columns it demands
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default = "default_base")]
    pub base: String,
    pub input_count: Option<usize>,
    pub min_input_count: Option<usize>,
    pub output_count: Option<usize>,
    pub input_kinds: Option<Vec<DataKind>>,
    pub output_kinds: Option<Vec<DataKind>>,
}

fn default_base() -> String {
    "Any".to_string()
}

impl TypeDefinition {
    /// Compiles the column requirements into a check over a header pair
    ///
    /// Requirements are tested in declaration order; the first failure wins.
    pub fn requirement(
        &self,
    ) -> impl Fn(&[Header], &[Header]) -> Option<String> + Send + Sync + 'static {
        let input_count = self.input_count;
        let min_input_count = self.min_input_count;
        let output_count = self.output_count;
        let input_kinds: Option<KindSet> = self
            .input_kinds
            .as_ref()
            .map(|kinds| kinds.iter().copied().collect());
        let output_kinds: Option<KindSet> = self
            .output_kinds
            .as_ref()
            .map(|kinds| kinds.iter().copied().collect());

        move |input: &[Header], output: &[Header]| {
            input_count
                .and_then(|n| {
                    column_count("input", input, input.len() == n, &format!("exactly {}", n))
                })
                .or_else(|| {
                    min_input_count.and_then(|n| {
                        column_count("input", input, input.len() >= n, &format!("at least {}", n))
                    })
                })
                .or_else(|| {
                    output_count.and_then(|n| {
                        column_count("output", output, output.len() == n, &format!("exactly {}", n))
                    })
                })
                .or_else(|| input_kinds.and_then(|kinds| columns_of_kinds("input", input, kinds)))
                .or_else(|| {
                    output_kinds.and_then(|kinds| columns_of_kinds("output", output, kinds))
                })
        }
    }
}

#[derive(Debug, Deserialize)]
struct DefinitionsFile {
    #[serde(default)]
    types: Vec<TypeDefinition>,
}

/// Parsed definitions file
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub limits: LatticeLimits,
    pub types: Vec<TypeDefinition>,
}

impl Definitions {
    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionError> {
        let file: DefinitionsFile = toml::from_str(content)?;
        let limits = LatticeLimits::from_toml_str(content)?;
        limits.validate()?;
        Ok(Definitions {
            limits,
            types: file.types,
        })
    }

    /// Unlike limits alone, a definitions file that is named must exist
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definitions = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            types = definitions.types.len(),
            "loaded type definitions"
        );
        Ok(definitions)
    }

    /// Builds a registry with the standard categories plus every definition
    pub fn build_registry(&self) -> Result<(TypeRegistry, StandardTypes), DefinitionError> {
        let mut registry = TypeRegistry::with_limits(self.limits.clone());
        let standard =
            StandardTypes::register(&mut registry).map_err(|source| DefinitionError::Type {
                name: "standard types".to_string(),
                source,
            })?;
        self.apply(&mut registry)?;
        Ok((registry, standard))
    }

    /// Registers every definition in file order
    pub fn apply(&self, registry: &mut TypeRegistry) -> Result<(), DefinitionError> {
        for definition in &self.types {
            let wrap = |source| DefinitionError::Type {
                name: definition.name.clone(),
                source,
            };
            let base = registry.resolve_expr(&definition.base).map_err(wrap)?;
            let requirement = definition.requirement();
            registry
                .extend(base, &definition.name, move |ctx| requirement(ctx.input(), ctx.output()))
                .map_err(wrap)?;
            debug!(type_name = %definition.name, base = %definition.base, "defined type from file");
        }
        Ok(())
    }
}
