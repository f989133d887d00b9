//! Type expressions
//!
//! The inverse of composite naming. An expression is one or more alternatives
//! separated by `|`; each alternative is either a type name or a run of
//! bracketed names forming an intersection:
//!
//! ```text
//! Classifying
//! Classifying|Regressing
//! [Classifying][NumericInput]|Regressing
//! ```
//!
//! Resolving an expression builds the composites it describes, so
//! `resolve_expr(name(t)) == t` for every registered type.

use crate::lattice::{TypeError, TypeId, TypeRegistry};

impl TypeRegistry {
    /// Resolves a name or composite expression to a type
    pub fn resolve_expr(&mut self, expr: &str) -> Result<TypeId, TypeError> {
        let mut alternatives = Vec::new();
        for part in expr.split('|') {
            let part = part.trim();
            if part.is_empty() {
                return Err(invalid(expr, "empty alternative"));
            }
            alternatives.push(self.resolve_alternative(expr, part)?);
        }
        self.union_of(&alternatives)
    }

    fn resolve_alternative(&mut self, expr: &str, part: &str) -> Result<TypeId, TypeError> {
        if !part.starts_with('[') {
            if part.contains(['[', ']']) {
                return Err(invalid(expr, "brackets must enclose whole names"));
            }
            return self.lookup(part);
        }

        let mut members = Vec::new();
        let mut rest = part;
        while !rest.is_empty() {
            let inner = rest
                .strip_prefix('[')
                .ok_or_else(|| invalid(expr, "expected '[' between intersection members"))?;
            let (name, after) = inner
                .split_once(']')
                .ok_or_else(|| invalid(expr, "unclosed '['"))?;
            if name.contains('[') {
                return Err(invalid(expr, "nested '['"));
            }
            members.push(self.lookup(name.trim())?);
            rest = after.trim_start();
        }
        self.intersection_of(&members)
    }
}

fn invalid(expr: &str, reason: &str) -> TypeError {
    TypeError::InvalidExpression {
        expr: expr.to_string(),
        reason: reason.to_string(),
    }
}
