//! Header compatibility checking
//!
//! A check evaluates one type against one (input, output) header pair. Each
//! call builds a fresh [`CheckContext`] which memoizes results per type, so a
//! base shared by several union branches or intersection members is evaluated
//! once per call.
//!
//! # Rules
//!
//! - `Any` always passes
//! - `Extended` checks its base first and only then runs its own constraint
//! - `Intersection` passes if every member passes; reports the first failure
//! - `Union` passes if any member passes; reports every distinct failure,
//!   one per line
//!
//! A constraint that queries its own type, directly or through other
//! constraints, gets a "cyclic constraint" failure rather than recursing
//! forever. Nesting beyond `max_check_depth` fails the same way. Neither
//! guard failure is memoized, nor is anything evaluated beneath one.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{trace, warn};

use super::types::{LearnerType, TypeId, TypeRegistry};
use crate::header::Header;

/// Per-call evaluation state handed to constraints
pub struct CheckContext<'a> {
    registry: &'a TypeRegistry,
    input: &'a [Header],
    output: &'a [Header],
    /// Finished evaluations: None = passed
    results: FxHashMap<TypeId, Option<String>>,
    /// Types currently being evaluated further up the stack
    in_progress: FxHashSet<TypeId>,
    depth: usize,
    /// Cycle and depth guard failures so far; these depend on the call path
    guard_trips: usize,
}

impl<'a> CheckContext<'a> {
    fn new(registry: &'a TypeRegistry, input: &'a [Header], output: &'a [Header]) -> Self {
        CheckContext {
            registry,
            input,
            output,
            results: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            depth: 0,
            guard_trips: 0,
        }
    }

    pub fn input(&self) -> &'a [Header] {
        self.input
    }

    pub fn output(&self) -> &'a [Header] {
        self.output
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Checks `id` against this context's headers, reusing earlier results
    pub fn check(&mut self, id: TypeId) -> Option<String> {
        if let Some(result) = self.results.get(&id) {
            trace!(type_name = self.registry.name(id), "check cache hit");
            return result.clone();
        }

        let name = self.registry.name(id);
        if self.in_progress.contains(&id) {
            warn!(type_name = name, "constraint cycle detected");
            self.guard_trips += 1;
            return Some(format!(
                "cyclic constraint: type '{}' depends on its own check result",
                name
            ));
        }
        let max_depth = self.registry.limits().max_check_depth;
        if self.depth >= max_depth {
            warn!(type_name = name, max_depth, "check depth limit reached");
            self.guard_trips += 1;
            return Some(format!(
                "check depth limit of {} exceeded while evaluating '{}'",
                max_depth, name
            ));
        }

        let trips_before = self.guard_trips;
        self.in_progress.insert(id);
        self.depth += 1;
        let result = self.evaluate(id);
        self.depth -= 1;
        self.in_progress.remove(&id);

        // A result shaped by a guard may differ when reached by another path
        if self.guard_trips == trips_before {
            self.results.insert(id, result.clone());
        }
        result
    }

    fn evaluate(&mut self, id: TypeId) -> Option<String> {
        let registry = self.registry;
        match registry.get(id) {
            LearnerType::Any => None,
            LearnerType::Extended { base, constraint } => {
                if let Some(failure) = self.check(*base) {
                    return Some(failure);
                }
                constraint(self)
            }
            LearnerType::Intersection(members) => {
                members.iter().find_map(|&member| self.check(member))
            }
            LearnerType::Union(members) => {
                let mut failures = IndexSet::new();
                for &member in members.iter() {
                    match self.check(member) {
                        None => return None,
                        Some(failure) => {
                            failures.insert(failure);
                        }
                    }
                }
                Some(failures.into_iter().collect::<Vec<_>>().join("\n"))
            }
        }
    }
}

impl TypeRegistry {
    /// Checks whether `ty` accepts the given input and output headers
    ///
    /// Returns `None` on success, otherwise a human-readable reason.
    pub fn check_headers(&self, ty: TypeId, input: &[Header], output: &[Header]) -> Option<String> {
        CheckContext::new(self, input, output).check(ty)
    }
}
