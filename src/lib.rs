//! Structural types for machine-learning learners
//!
//! Learners are classified by the shape of the tables they consume and
//! produce. See [`lattice`] for the type system itself, [`domain`] for the
//! standard categories and [`definitions`] for declaring types in TOML.

pub mod definitions;
pub mod domain;
pub mod expr;
pub mod header;
pub mod lattice;
pub mod limits;

pub use domain::StandardTypes;
pub use header::{DataKind, Header, KindSet};
pub use lattice::{CheckContext, TypeError, TypeId, TypeRegistry};
