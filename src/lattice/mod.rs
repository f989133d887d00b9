//! Structural type lattice for learners
//!
//! A learner's type describes the shape of the tables it consumes and produces.
//! Types form a lattice with four syntactic forms:
//!
//! - `Any`: the top, accepted by every header pair
//! - `Extended`: a base type plus one header constraint
//! - `Intersection`: all members must hold
//! - `Union`: at least one member must hold
//!
//! All types live in a [`TypeRegistry`], which owns the name table and the
//! canonical composite table. Types are addressed by [`TypeId`] handles, so
//! composite membership and identity are handle comparisons.
//!
//! # Example
//!
//! ```
//! use learner_lattice::header::{DataKind, Header};
//! use learner_lattice::lattice::{TypeId, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! let classifying = registry
//!     .extend(TypeId::ANY, "Classifying", |ctx| match ctx.output() {
//!         [h] if h.kind == DataKind::Nominal => None,
//!         _ => Some("expected one nominal output column".to_string()),
//!     })
//!     .unwrap();
//!
//! let input = [Header::numeric("x")];
//! assert_eq!(registry.check_headers(classifying, &input, &[Header::nominal("y")]), None);
//! assert!(registry.check_headers(classifying, &input, &[Header::numeric("y")]).is_some());
//! assert!(registry.is_sub_type_of(classifying, TypeId::ANY));
//! ```

mod ancestry;
mod check;
mod compose;
mod subtype;
mod types;

pub use check::CheckContext;
pub use types::{
    CompositeKind, Constraint, LearnerType, RESERVED_CHARS, TypeForm, TypeId, TypeRegistry,
};

use thiserror::Error;

/// Construction and lookup failures
///
/// Header incompatibility is not an error: `check_headers` reports it as
/// `Some(message)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type name '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("type name '{name}' contains reserved character '{ch}'")]
    ReservedCharacter { name: String, ch: char },

    #[error("type name must not be empty")]
    EmptyName,

    #[error("type name '{name}…' is longer than {max} bytes")]
    NameTooLong { name: String, max: usize },

    #[error("type '{name}' cannot be extended; only Any and extended types can be")]
    NotExtensible { name: String },

    #[error("{operation} requires at least one type")]
    EmptyComposition { operation: &'static str },

    #[error("intersection_of cannot contain union '{name}'")]
    UnionInIntersection { name: String },

    #[error("{kind} would have {count} members, more than the limit of {max}")]
    TooManyMembers {
        kind: CompositeKind,
        count: usize,
        max: usize,
    },

    #[error("type '{name}' is not Any or an extended type")]
    NotAnExtension { name: String },

    #[error("no type named '{name}'")]
    UnknownType { name: String },

    #[error("invalid type expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },
}
