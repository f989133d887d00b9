//! Standard learner categories
//!
//! These are ordinary extensions of `Any`, registered the same way a user
//! would register their own:
//!
//! - `Classifying`: exactly one nominal output column
//! - `Regressing`: exactly one numeric output column
//! - `NumericInput`: every input column is numeric
//!
//! The column helpers are public so custom constraints can reuse them.

use crate::header::{DataKind, Header, KindSet};
use crate::lattice::{TypeError, TypeId, TypeRegistry};

/// Handles of the standard categories in one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardTypes {
    pub classifying: TypeId,
    pub regressing: TypeId,
    pub numeric_input: TypeId,
}

impl StandardTypes {
    pub fn register(registry: &mut TypeRegistry) -> Result<Self, TypeError> {
        let classifying = registry.extend(TypeId::ANY, "Classifying", |ctx| {
            single_column_of_kind("output", ctx.output(), DataKind::Nominal)
        })?;
        let regressing = registry.extend(TypeId::ANY, "Regressing", |ctx| {
            single_column_of_kind("output", ctx.output(), DataKind::Numeric)
        })?;
        let numeric_input = registry.extend(TypeId::ANY, "NumericInput", |ctx| {
            columns_of_kinds("input", ctx.input(), KindSet::NUMERIC)
        })?;

        Ok(StandardTypes {
            classifying,
            regressing,
            numeric_input,
        })
    }
}

/// Requires exactly one column, of the given kind
pub fn single_column_of_kind(side: &str, headers: &[Header], kind: DataKind) -> Option<String> {
    if let Some(failure) = column_count(side, headers, headers.len() == 1, "exactly 1") {
        return Some(failure);
    }
    columns_of_kinds(side, headers, kind.as_set())
}

/// Requires every column to have one of `kinds`; names the first offender
pub fn columns_of_kinds(side: &str, headers: &[Header], kinds: KindSet) -> Option<String> {
    headers
        .iter()
        .find(|header| !kinds.admits(header.kind))
        .map(|header| {
            format!(
                "{} column '{}' is {}, expected {}",
                side,
                header.name,
                header.kind,
                kinds.describe()
            )
        })
}

/// Formats a column count failure when `ok` is false
pub fn column_count(side: &str, headers: &[Header], ok: bool, expected: &str) -> Option<String> {
    (!ok).then(|| {
        format!(
            "expected {} {} column(s), found {}",
            expected,
            side,
            headers.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> (TypeRegistry, StandardTypes) {
        let mut registry = TypeRegistry::new();
        let types = StandardTypes::register(&mut registry).unwrap();
        (registry, types)
    }

    #[test]
    fn test_classifier_accepts_single_nominal_output() {
        let (registry, types) = standard();
        let input = [Header::numeric("petal_length"), Header::numeric("petal_width")];
        let output = [Header::nominal("species")];
        assert_eq!(registry.check_headers(types.classifying, &input, &output), None);
    }

    #[test]
    fn test_classifier_names_offending_column() {
        let (registry, types) = standard();
        let input = [Header::numeric("x")];
        let output = [Header::numeric("price")];
        let failure = registry
            .check_headers(types.classifying, &input, &output)
            .unwrap();
        assert!(failure.contains("'price'"), "got: {}", failure);
        assert!(failure.contains("nominal"), "got: {}", failure);
    }

    #[test]
    fn test_classifier_rejects_multiple_outputs() {
        let (registry, types) = standard();
        let output = [Header::nominal("a"), Header::nominal("b")];
        assert_eq!(
            registry.check_headers(types.classifying, &[], &output).as_deref(),
            Some("expected exactly 1 output column(s), found 2")
        );
    }

    #[test]
    fn test_regressor() {
        let (registry, types) = standard();
        assert_eq!(
            registry.check_headers(types.regressing, &[], &[Header::numeric("y")]),
            None
        );
        assert!(registry
            .check_headers(types.regressing, &[], &[Header::nominal("y")])
            .is_some());
    }

    #[test]
    fn test_numeric_input() {
        let (registry, types) = standard();
        let mixed = [Header::numeric("a"), Header::new("b", DataKind::Date)];
        assert_eq!(
            registry.check_headers(types.numeric_input, &mixed, &[]).as_deref(),
            Some("input column 'b' is date, expected numeric")
        );
        assert_eq!(registry.check_headers(types.numeric_input, &[], &[]), None);
    }

    #[test]
    fn test_registering_twice_fails() {
        let (mut registry, _) = standard();
        assert!(matches!(
            StandardTypes::register(&mut registry),
            Err(TypeError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_predictor_union() {
        let (mut registry, types) = standard();
        let predicting = registry
            .union_of(&[types.classifying, types.regressing])
            .unwrap();

        assert_eq!(registry.check_headers(predicting, &[], &[Header::numeric("y")]), None);
        assert_eq!(registry.check_headers(predicting, &[], &[Header::nominal("y")]), None);

        let failure = registry
            .check_headers(predicting, &[], &[Header::new("y", DataKind::String)])
            .unwrap();
        assert!(failure.contains("expected nominal"), "got: {}", failure);
        assert!(failure.contains("expected numeric"), "got: {}", failure);
    }
}
