//! Subtype relation
//!
//! `T <: U` means every header pair accepted by `T` is accepted by `U`. The
//! relation is decided structurally, one arm per (T form, U form) pair:
//!
//! ```text
//! T \ U         Any    Extended          Intersection     Union
//! Any           true   false             false            false
//! Extended      true   T == U or T ext U false            T <: some member
//! Intersection  true   some member <: U  T <: every member T <: some member
//! Union         true   false             false            every member <: U
//! ```
//!
//! An intersection is stronger than any one member, so one strong enough
//! member suffices. A union is weaker than each member, so every branch must
//! qualify on its own.

use super::types::{LearnerType, TypeId, TypeRegistry};

impl TypeRegistry {
    /// Returns true if `ty` is a subtype of `other`
    pub fn is_sub_type_of(&self, ty: TypeId, other: TypeId) -> bool {
        use LearnerType::{Any, Extended, Intersection, Union};

        match (self.get(ty), self.get(other)) {
            // ========== Any ==========
            (Any, Any) => true,
            (Any, Extended { .. } | Intersection(_) | Union(_)) => false,

            // ========== Extended ==========
            (Extended { .. }, Any) => true,
            (Extended { .. }, Extended { .. }) => ty == other || self.is_extension_of(ty, other),
            (Extended { .. }, Intersection(_)) => false,
            (Extended { .. }, Union(targets)) => {
                targets.iter().any(|&target| self.is_sub_type_of(ty, target))
            }

            // ========== Intersection ==========
            (Intersection(_), Any) => true,
            (Intersection(members), Extended { .. }) => {
                members.iter().any(|&member| self.is_sub_type_of(member, other))
            }
            (Intersection(_), Intersection(targets)) => {
                targets.iter().all(|&target| self.is_sub_type_of(ty, target))
            }
            (Intersection(_), Union(targets)) => {
                targets.iter().any(|&target| self.is_sub_type_of(ty, target))
            }

            // ========== Union ==========
            (Union(_), Any) => true,
            (Union(_), Extended { .. } | Intersection(_)) => false,
            (Union(members), Union(_)) => {
                members.iter().all(|&member| self.is_sub_type_of(member, other))
            }
        }
    }

    pub fn is_not_sub_type_of(&self, ty: TypeId, other: TypeId) -> bool {
        !self.is_sub_type_of(ty, other)
    }

    /// Optimistic subtype test for types whose branch is not chosen yet
    ///
    /// A union qualifies if any one of its members is a subtype of `other`;
    /// every other form falls back to [`is_sub_type_of`](Self::is_sub_type_of).
    pub fn is_potential_sub_type_of(&self, ty: TypeId, other: TypeId) -> bool {
        match self.get(ty) {
            LearnerType::Union(members) => {
                members.iter().any(|&member| self.is_sub_type_of(member, other))
            }
            _ => self.is_sub_type_of(ty, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A <- B <- C chain plus unrelated D and E
    struct Lattice {
        registry: TypeRegistry,
        a: TypeId,
        b: TypeId,
        c: TypeId,
        d: TypeId,
        e: TypeId,
    }

    fn lattice() -> Lattice {
        let mut registry = TypeRegistry::new();
        let a = registry.extend(TypeId::ANY, "A", |_| None).unwrap();
        let b = registry.extend(a, "B", |_| None).unwrap();
        let c = registry.extend(b, "C", |_| None).unwrap();
        let d = registry.extend(TypeId::ANY, "D", |_| None).unwrap();
        let e = registry.extend(TypeId::ANY, "E", |_| None).unwrap();
        Lattice {
            registry,
            a,
            b,
            c,
            d,
            e,
        }
    }

    // ========== Test Group 1: Any and Extended ==========

    #[test]
    fn test_any_is_top() {
        let l = lattice();
        for ty in [TypeId::ANY, l.a, l.b, l.c, l.d] {
            assert!(l.registry.is_sub_type_of(ty, TypeId::ANY));
        }
        assert!(l.registry.is_not_sub_type_of(TypeId::ANY, l.a));
    }

    #[test]
    fn test_extension_transitivity() {
        let l = lattice();
        assert!(l.registry.is_sub_type_of(l.c, l.b));
        assert!(l.registry.is_sub_type_of(l.c, l.a));
        assert!(l.registry.is_not_sub_type_of(l.a, l.c));
        assert!(l.registry.is_not_sub_type_of(l.c, l.d));
    }

    #[test]
    fn test_extended_never_below_intersection() {
        let mut l = lattice();
        let ad = l.registry.intersection_of(&[l.a, l.d]).unwrap();
        assert!(l.registry.is_not_sub_type_of(l.c, ad));
        assert!(l.registry.is_not_sub_type_of(l.a, ad));
    }

    #[test]
    fn test_extended_below_union_member() {
        let mut l = lattice();
        let bd = l.registry.union_of(&[l.b, l.d]).unwrap();
        assert!(l.registry.is_sub_type_of(l.c, bd));
        assert!(l.registry.is_sub_type_of(l.d, bd));
        assert!(l.registry.is_not_sub_type_of(l.a, bd));
    }

    // ========== Test Group 2: Intersection ==========

    #[test]
    fn test_intersection_below_each_member() {
        let mut l = lattice();
        let cd = l.registry.intersection_of(&[l.c, l.d]).unwrap();
        assert!(l.registry.is_sub_type_of(cd, l.a));
        assert!(l.registry.is_sub_type_of(cd, l.d));
        assert!(l.registry.is_not_sub_type_of(cd, l.e));
    }

    #[test]
    fn test_intersection_below_weaker_intersection() {
        let mut l = lattice();
        let cde = l.registry.intersection_of(&[l.c, l.d, l.e]).unwrap();
        let ad = l.registry.intersection_of(&[l.a, l.d]).unwrap();
        assert!(l.registry.is_sub_type_of(cde, ad));
        assert!(l.registry.is_not_sub_type_of(ad, cde));
    }

    #[test]
    fn test_intersection_below_union() {
        let mut l = lattice();
        let cd = l.registry.intersection_of(&[l.c, l.d]).unwrap();
        let ae = l.registry.union_of(&[l.a, l.e]).unwrap();
        assert!(l.registry.is_sub_type_of(cd, ae));
    }

    // ========== Test Group 3: Union ==========

    #[test]
    fn test_union_never_below_extended_or_intersection() {
        let mut l = lattice();
        let cd = l.registry.union_of(&[l.c, l.d]).unwrap();
        let ad = l.registry.intersection_of(&[l.a, l.d]).unwrap();
        assert!(l.registry.is_not_sub_type_of(cd, l.a));
        assert!(l.registry.is_not_sub_type_of(cd, ad));
        assert!(l.registry.is_sub_type_of(cd, TypeId::ANY));
    }

    #[test]
    fn test_union_below_wider_union() {
        let mut l = lattice();
        let cd = l.registry.union_of(&[l.c, l.d]).unwrap();
        let ade = l.registry.union_of(&[l.a, l.d, l.e]).unwrap();
        assert!(l.registry.is_sub_type_of(cd, ade));
        assert!(l.registry.is_not_sub_type_of(ade, cd));
    }

    #[test]
    fn test_reflexivity() {
        let mut l = lattice();
        let cd = l.registry.intersection_of(&[l.c, l.d]).unwrap();
        let ae = l.registry.union_of(&[l.a, l.e]).unwrap();
        let mixed = l.registry.union_of(&[cd, l.e]).unwrap();
        for ty in [TypeId::ANY, l.a, l.c, cd, ae, mixed] {
            assert!(l.registry.is_sub_type_of(ty, ty), "{}", l.registry.name(ty));
        }
    }

    // ========== Test Group 4: Potential Subtypes ==========

    #[test]
    fn test_potential_subtype_of_union() {
        let mut l = lattice();
        let cd = l.registry.union_of(&[l.c, l.d]).unwrap();
        assert!(l.registry.is_potential_sub_type_of(cd, l.a));
        assert!(l.registry.is_not_sub_type_of(cd, l.a));
        assert!(!l.registry.is_potential_sub_type_of(cd, l.e));
    }

    #[test]
    fn test_potential_subtype_of_non_union() {
        let l = lattice();
        assert!(l.registry.is_potential_sub_type_of(l.c, l.a));
        assert!(!l.registry.is_potential_sub_type_of(l.a, l.c));
    }
}
