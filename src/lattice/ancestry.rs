//! Extension chains and common bases

use super::TypeError;
use super::types::{LearnerType, TypeId, TypeRegistry};

impl TypeRegistry {
    /// Returns true if `base` lies on the base chain of extended type `ty`
    ///
    /// The walk starts at the direct base and stops before `Any`, so no type
    /// counts as an extension of `Any` here; [`is_sub_type_of`] covers that.
    ///
    /// [`is_sub_type_of`]: TypeRegistry::is_sub_type_of
    pub fn is_extension_of(&self, ty: TypeId, base: TypeId) -> bool {
        let mut current = self.get(ty).base();
        while let Some(ancestor) = current {
            if ancestor == TypeId::ANY {
                break;
            }
            if ancestor == base {
                return true;
            }
            current = self.get(ancestor).base();
        }
        false
    }

    /// `ty` followed by each of its bases; ends at `Any` for extended types
    ///
    /// Composites have no base, so their chain is just themselves.
    pub fn extension_chain(&self, ty: TypeId) -> Vec<TypeId> {
        let mut chain = vec![ty];
        let mut current = self.get(ty).base();
        while let Some(ancestor) = current {
            chain.push(ancestor);
            current = self.get(ancestor).base();
        }
        chain
    }

    /// Most specific type that both `first` and `second` extend
    ///
    /// Both inputs must be `Any` or extended types.
    pub fn common_base(&self, first: TypeId, second: TypeId) -> Result<TypeId, TypeError> {
        self.require_extension(first)?;
        self.require_extension(second)?;

        let (mut a, mut b) = (first, second);
        loop {
            if a == b {
                return Ok(a);
            }
            if a == TypeId::ANY || b == TypeId::ANY {
                return Ok(TypeId::ANY);
            }
            if self.is_extension_of(a, b) {
                return Ok(b);
            }
            if self.is_extension_of(b, a) {
                return Ok(a);
            }
            // Extended types always have a base
            a = self.get(a).base().unwrap_or(TypeId::ANY);
            b = self.get(b).base().unwrap_or(TypeId::ANY);
        }
    }

    /// [`common_base`](Self::common_base) folded over a list
    pub fn common_base_of(&self, types: &[TypeId]) -> Result<TypeId, TypeError> {
        let (&first, rest) = types.split_first().ok_or(TypeError::EmptyComposition {
            operation: "common_base_of",
        })?;
        self.require_extension(first)?;
        rest.iter()
            .try_fold(first, |acc, &ty| self.common_base(acc, ty))
    }

    fn require_extension(&self, ty: TypeId) -> Result<(), TypeError> {
        match self.get(ty) {
            LearnerType::Any | LearnerType::Extended { .. } => Ok(()),
            LearnerType::Intersection(_) | LearnerType::Union(_) => Err(TypeError::NotAnExtension {
                name: self.name(ty).to_string(),
            }),
        }
    }
}
