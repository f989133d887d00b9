//! Type representation and the owning registry
//!
//! # Architecture
//!
//! - [`LearnerType`]: closed enum of the four type forms
//! - [`TypeId`]: opaque handle into the registry
//! - [`TypeRegistry`]: arena of types plus two identity tables
//!
//! The name table makes every type name unique. The composite table maps a
//! (kind, member set) key to the one union or intersection built from it, so
//! building the same composite twice returns the same handle.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::TypeError;
use super::check::CheckContext;
use crate::limits::LatticeLimits;

/// Characters used by composite names; extended type names may not contain them
pub const RESERVED_CHARS: [char; 3] = ['[', ']', '|'];

// ========== TypeId ==========

/// Opaque identifier for types in the registry
///
/// Handles compare by identity: two extended types with the same constraint
/// are still different types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    /// Handle of the top type, present in every registry
    pub const ANY: TypeId = TypeId(0);

    pub(crate) fn new(id: usize) -> Self {
        TypeId(id)
    }

    /// Gets the raw index (for debugging)
    pub fn index(&self) -> usize {
        self.0
    }
}

// ========== LearnerType ==========

/// Header constraint attached to an extended type
///
/// Returns `None` when the headers in the context are acceptable, or a
/// human-readable reason otherwise. A constraint may query other types through
/// the context, but must not query the type it belongs to.
pub type Constraint = Box<dyn Fn(&mut CheckContext<'_>) -> Option<String> + Send + Sync>;

/// The four type forms
pub enum LearnerType {
    /// Top of the lattice
    Any,
    /// Base type plus one additional header constraint
    Extended { base: TypeId, constraint: Constraint },
    /// All members must hold; members sorted by handle, at least two
    Intersection(Box<[TypeId]>),
    /// Some member must hold; members sorted by handle, at least two
    Union(Box<[TypeId]>),
}

impl LearnerType {
    pub fn form(&self) -> TypeForm {
        match self {
            LearnerType::Any => TypeForm::Any,
            LearnerType::Extended { .. } => TypeForm::Extended,
            LearnerType::Intersection(_) => TypeForm::Intersection,
            LearnerType::Union(_) => TypeForm::Union,
        }
    }

    /// Direct base of an extended type
    pub fn base(&self) -> Option<TypeId> {
        match self {
            LearnerType::Extended { base, .. } => Some(*base),
            _ => None,
        }
    }

    /// Members of a composite; empty for Any and extended types
    pub fn members(&self) -> &[TypeId] {
        match self {
            LearnerType::Intersection(members) | LearnerType::Union(members) => members,
            LearnerType::Any | LearnerType::Extended { .. } => &[],
        }
    }

    pub fn is_extensible(&self) -> bool {
        matches!(self, LearnerType::Any | LearnerType::Extended { .. })
    }
}

impl fmt::Debug for LearnerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LearnerType::Any => f.write_str("Any"),
            LearnerType::Extended { base, .. } => {
                f.debug_struct("Extended").field("base", base).finish_non_exhaustive()
            }
            LearnerType::Intersection(members) => {
                f.debug_tuple("Intersection").field(members).finish()
            }
            LearnerType::Union(members) => f.debug_tuple("Union").field(members).finish(),
        }
    }
}

/// Fieldless mirror of [`LearnerType`], for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeForm {
    Any,
    Extended,
    Intersection,
    Union,
}

impl fmt::Display for TypeForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TypeForm::Any => "any",
            TypeForm::Extended => "extended",
            TypeForm::Intersection => "intersection",
            TypeForm::Union => "union",
        };
        f.write_str(s)
    }
}

/// Which composite a builder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    Union,
    Intersection,
}

impl CompositeKind {
    pub(super) fn builder_name(self) -> &'static str {
        match self {
            CompositeKind::Union => "union_of",
            CompositeKind::Intersection => "intersection_of",
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompositeKind::Union => f.write_str("union"),
            CompositeKind::Intersection => f.write_str("intersection"),
        }
    }
}

// ========== TypeRegistry ==========

struct TypeEntry {
    name: String,
    ty: LearnerType,
}

/// Frozen member set of a composite; members are sorted
#[derive(Debug, PartialEq, Eq, Hash)]
struct CompositeKey {
    kind: CompositeKind,
    members: Box<[TypeId]>,
}

/// Owner of every type in one lattice
///
/// Construction takes `&mut self`; queries take `&self`. A fully built
/// registry is `Sync`, so checks may run from several threads at once.
///
/// # Example
///
/// ```
/// use learner_lattice::lattice::{TypeId, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// let a = registry.extend(TypeId::ANY, "A", |_| None).unwrap();
/// let b = registry.extend(TypeId::ANY, "B", |_| None).unwrap();
///
/// let ab = registry.union_of(&[a, b]).unwrap();
/// assert_eq!(registry.union_of(&[b, a]).unwrap(), ab);
/// assert_eq!(registry.lookup("A|B").unwrap(), ab);
/// ```
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    names: FxHashMap<String, TypeId>,
    composites: FxHashMap<CompositeKey, TypeId>,
    limits: LatticeLimits,
}

impl TypeRegistry {
    /// Creates a registry holding only `Any`, with default limits
    pub fn new() -> Self {
        Self::with_limits(LatticeLimits::default())
    }

    pub fn with_limits(limits: LatticeLimits) -> Self {
        let mut registry = TypeRegistry {
            entries: Vec::new(),
            names: FxHashMap::default(),
            composites: FxHashMap::default(),
            limits,
        };
        let any = registry.register("Any".to_string(), LearnerType::Any);
        debug_assert_eq!(any, TypeId::ANY);
        registry
    }

    pub fn limits(&self) -> &LatticeLimits {
        &self.limits
    }

    /// Gets type by ID
    ///
    /// # Panics
    ///
    /// Panics if the TypeId was not produced by this registry.
    pub fn get(&self, id: TypeId) -> &LearnerType {
        &self.entries[id.0].ty
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.entries[id.0].name
    }

    /// Resolves a registered type by its unique name
    pub fn lookup(&self, name: &str) -> Result<TypeId, TypeError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| TypeError::UnknownType {
                name: name.to_string(),
            })
    }

    /// Number of types, `Any` included
    pub fn type_count(&self) -> usize {
        self.entries.len()
    }

    /// All handles in registration order
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.entries.len()).map(TypeId::new)
    }

    /// Defines a new type as `base` plus `constraint`
    ///
    /// `base` must be `Any` or another extended type. The name must be unique,
    /// non-empty, within the length limit and free of [`RESERVED_CHARS`].
    pub fn extend<F>(
        &mut self,
        base: TypeId,
        name: &str,
        constraint: F,
    ) -> Result<TypeId, TypeError>
    where
        F: Fn(&mut CheckContext<'_>) -> Option<String> + Send + Sync + 'static,
    {
        if !self.get(base).is_extensible() {
            return Err(TypeError::NotExtensible {
                name: self.name(base).to_string(),
            });
        }
        self.validate_name(name)?;

        let id = self.register(
            name.to_string(),
            LearnerType::Extended {
                base,
                constraint: Box::new(constraint),
            },
        );
        debug!(
            type_name = name,
            base = self.name(base),
            id = id.index(),
            "registered extended type"
        );
        Ok(id)
    }

    fn validate_name(&self, name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::EmptyName);
        }
        if name.len() > self.limits.max_name_length {
            let mut cut = self.limits.max_name_length.min(32);
            while !name.is_char_boundary(cut) {
                cut -= 1;
            }
            return Err(TypeError::NameTooLong {
                name: name[..cut].to_string(),
                max: self.limits.max_name_length,
            });
        }
        if let Some(ch) = name.chars().find(|c| RESERVED_CHARS.contains(c)) {
            return Err(TypeError::ReservedCharacter {
                name: name.to_string(),
                ch,
            });
        }
        if self.names.contains_key(name) {
            return Err(TypeError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn register(&mut self, name: String, ty: LearnerType) -> TypeId {
        let id = TypeId::new(self.entries.len());
        self.names.insert(name.clone(), id);
        self.entries.push(TypeEntry { name, ty });
        id
    }

    /// Returns the canonical composite for a normalized member list
    ///
    /// Callers guarantee at least two members, already flattened and reduced.
    pub(super) fn intern_composite(
        &mut self,
        kind: CompositeKind,
        mut members: Vec<TypeId>,
    ) -> TypeId {
        debug_assert!(members.len() >= 2);
        members.sort_unstable();
        let key = CompositeKey {
            kind,
            members: members.into_boxed_slice(),
        };

        if let Some(&id) = self.composites.get(&key) {
            trace!(type_name = self.name(id), "reusing canonical {}", kind);
            return id;
        }

        let name = self.composite_name(kind, &key.members);
        debug_assert!(!self.names.contains_key(&name));
        let ty = match kind {
            CompositeKind::Union => LearnerType::Union(key.members.clone()),
            CompositeKind::Intersection => LearnerType::Intersection(key.members.clone()),
        };
        let id = self.register(name, ty);
        debug!(type_name = self.name(id), id = id.index(), "registered {}", kind);
        self.composites.insert(key, id);
        id
    }

    // Union: A|B. Intersection: [A][B].
    fn composite_name(&self, kind: CompositeKind, members: &[TypeId]) -> String {
        let names = members.iter().map(|&m| self.name(m));
        match kind {
            CompositeKind::Union => names.collect::<Vec<_>>().join("|"),
            CompositeKind::Intersection => names.map(|n| format!("[{}]", n)).collect(),
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.name, &e.ty)))
            .finish()
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    fn accept(_: &mut CheckContext<'_>) -> Option<String> {
        None
    }

    // ========== Test Group 1: Registry Basics ==========

    #[test]
    fn test_new_registry_holds_any() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.type_count(), 1);
        assert_eq!(registry.name(TypeId::ANY), "Any");
        assert_eq!(registry.get(TypeId::ANY).form(), TypeForm::Any);
        assert_eq!(registry.lookup("Any").unwrap(), TypeId::ANY);
    }

    #[test]
    fn test_default_registry() {
        let registry = TypeRegistry::default();
        assert_eq!(registry.type_count(), 1);
        assert_eq!(registry.limits(), &LatticeLimits::default());
    }

    #[test]
    fn test_extend_records_base() {
        let mut registry = TypeRegistry::new();
        let a = registry.extend(TypeId::ANY, "A", accept).unwrap();
        let b = registry.extend(a, "B", accept).unwrap();

        assert_eq!(registry.get(a).base(), Some(TypeId::ANY));
        assert_eq!(registry.get(b).base(), Some(a));
        assert_eq!(registry.lookup("B").unwrap(), b);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![TypeId::ANY, a, b]);
    }

    #[test]
    fn test_lookup_unknown_name() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.lookup("Missing"),
            Err(TypeError::UnknownType {
                name: "Missing".to_string()
            })
        );
    }

    // ========== Test Group 2: Naming Rules ==========

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = TypeRegistry::new();
        registry.extend(TypeId::ANY, "A", accept).unwrap();
        let err = registry.extend(TypeId::ANY, "A", accept).unwrap_err();
        assert_eq!(err, TypeError::DuplicateName { name: "A".to_string() });
        assert_eq!(registry.type_count(), 2);
    }

    #[test]
    fn test_any_name_is_taken() {
        let mut registry = TypeRegistry::new();
        assert!(matches!(
            registry.extend(TypeId::ANY, "Any", accept),
            Err(TypeError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_reserved_characters_rejected() {
        let mut registry = TypeRegistry::new();
        for (name, ch) in [("A|B", '|'), ("[A", '['), ("A]", ']')] {
            let err = registry.extend(TypeId::ANY, name, accept).unwrap_err();
            assert_eq!(
                err,
                TypeError::ReservedCharacter {
                    name: name.to_string(),
                    ch
                }
            );
        }
    }

    #[test]
    fn test_empty_and_long_names_rejected() {
        let limits = LatticeLimits {
            max_name_length: 8,
            ..LatticeLimits::default()
        };
        let mut registry = TypeRegistry::with_limits(limits);
        assert_eq!(registry.extend(TypeId::ANY, "", accept), Err(TypeError::EmptyName));
        assert!(matches!(
            registry.extend(TypeId::ANY, "VeryLongName", accept),
            Err(TypeError::NameTooLong { max: 8, .. })
        ));
        assert!(registry.extend(TypeId::ANY, "Short", accept).is_ok());
    }

    // ========== Test Group 3: Composites ==========

    #[test]
    fn test_composite_not_extensible() {
        let mut registry = TypeRegistry::new();
        let a = registry.extend(TypeId::ANY, "A", accept).unwrap();
        let b = registry.extend(TypeId::ANY, "B", accept).unwrap();
        let ab = registry.union_of(&[a, b]).unwrap();

        assert_eq!(
            registry.extend(ab, "C", accept).unwrap_err(),
            TypeError::NotExtensible {
                name: "A|B".to_string()
            }
        );
    }

    #[test]
    fn test_composite_names() {
        let mut registry = TypeRegistry::new();
        let a = registry.extend(TypeId::ANY, "A", accept).unwrap();
        let b = registry.extend(TypeId::ANY, "B", accept).unwrap();
        let c = registry.extend(TypeId::ANY, "C", accept).unwrap();

        let ab = registry.intersection_of(&[b, a]).unwrap();
        assert_eq!(registry.name(ab), "[A][B]");

        let u = registry.union_of(&[c, ab]).unwrap();
        assert_eq!(registry.name(u), "C|[A][B]");
        assert_eq!(registry.get(u).members(), &[c, ab]);
    }

    #[test]
    fn test_debug_hides_constraint() {
        let mut registry = TypeRegistry::new();
        let a = registry.extend(TypeId::ANY, "A", accept).unwrap();
        let rendered = format!("{:?}", registry.get(a));
        assert!(rendered.starts_with("Extended"), "got: {}", rendered);
    }
}
