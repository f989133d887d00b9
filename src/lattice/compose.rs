//! Union and intersection builders
//!
//! Both builders normalize their input before interning:
//!
//! 1. Collect into an identity set
//! 2. Flatten: unions splice in nested unions, intersections nested intersections
//! 3. Reject unions inside an intersection
//! 4. Drop redundant members: for a union, any member below another member;
//!    for an intersection, any member above another member
//! 5. Return a lone survivor as is, otherwise the canonical composite
//!
//! Intersections of unions are not representable. The subtype table relies
//! on intersections holding only extended types.

use indexmap::IndexSet;

use super::TypeError;
use super::types::{CompositeKind, LearnerType, TypeId, TypeRegistry};

impl TypeRegistry {
    /// Builds the canonical "any of" type for `types`
    pub fn union_of(&mut self, types: &[TypeId]) -> Result<TypeId, TypeError> {
        self.compose(CompositeKind::Union, types)
    }

    /// Builds the canonical "all of" type for `types`
    ///
    /// Fails if any input is, or flattens to, a union.
    pub fn intersection_of(&mut self, types: &[TypeId]) -> Result<TypeId, TypeError> {
        self.compose(CompositeKind::Intersection, types)
    }

    fn compose(&mut self, kind: CompositeKind, types: &[TypeId]) -> Result<TypeId, TypeError> {
        if types.is_empty() {
            return Err(TypeError::EmptyComposition {
                operation: kind.builder_name(),
            });
        }

        let mut members = IndexSet::with_capacity(types.len());
        for &ty in types {
            match (kind, self.get(ty)) {
                (CompositeKind::Union, LearnerType::Union(inner))
                | (CompositeKind::Intersection, LearnerType::Intersection(inner)) => {
                    members.extend(inner.iter().copied());
                }
                _ => {
                    members.insert(ty);
                }
            }
        }

        if kind == CompositeKind::Intersection {
            if let Some(&nested) = members
                .iter()
                .find(|&&member| matches!(self.get(member), LearnerType::Union(_)))
            {
                return Err(TypeError::UnionInIntersection {
                    name: self.name(nested).to_string(),
                });
            }
        }

        let members = self.drop_redundant(kind, members);
        if let [single] = members[..] {
            return Ok(single);
        }

        let max = self.limits().max_composite_members;
        if members.len() > max {
            return Err(TypeError::TooManyMembers {
                kind,
                count: members.len(),
                max,
            });
        }

        Ok(self.intern_composite(kind, members))
    }

    // Removes members one at a time so two mutually subsuming members
    // cannot both disappear.
    fn drop_redundant(&self, kind: CompositeKind, mut members: IndexSet<TypeId>) -> Vec<TypeId> {
        let mut i = 0;
        while i < members.len() {
            let candidate = members[i];
            let subsumed = members.iter().any(|&other| {
                other != candidate
                    && match kind {
                        CompositeKind::Union => self.is_sub_type_of(candidate, other),
                        CompositeKind::Intersection => self.is_sub_type_of(other, candidate),
                    }
            });
            if subsumed {
                members.shift_remove_index(i);
            } else {
                i += 1;
            }
        }
        members.into_iter().collect()
    }
}
