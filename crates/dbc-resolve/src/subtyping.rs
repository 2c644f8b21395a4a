use dbc_types::{ClassType, PrimitiveType, Type, WildcardType, CLONEABLE, OBJECT, SERIALIZABLE};

use crate::Resolver;

/// Conversion contexts for method invocation (JLS 5.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Identity, widening primitive, widening reference and unchecked conversions.
    Strict,
    /// `Strict` plus boxing and unboxing, each optionally followed by widening.
    Loose,
}

impl Resolver<'_> {
    /// Subtyping among types (JLS 4.10), primitive widening included.
    ///
    /// A raw target accepts any parameterization of the same class; a parameterized target
    /// requires type-argument containment.
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        if sub == sup {
            return true;
        }

        match (sub, sup) {
            (Type::TypeVar(a), Type::TypeVar(b)) if a.name == b.name => true,
            (_, Type::Intersection(parts)) => parts.iter().all(|part| self.is_subtype(sub, part)),
            (Type::Union(alternatives), _) => {
                alternatives.iter().all(|alt| self.is_subtype(alt, sup))
            }
            (_, Type::Union(alternatives)) => {
                alternatives.iter().any(|alt| self.is_subtype(sub, alt))
            }
            (Type::Primitive(a), Type::Primitive(b)) => a.widens_to(*b),
            (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
            (Type::Null, _) => sup.is_reference(),
            (_, Type::Null) => false,
            (_, Type::TypeVar(tv)) => {
                let via_lower = tv
                    .effective_lower_bound()
                    .is_some_and(|lower| self.is_subtype(sub, lower));
                via_lower
                    || match sub {
                        Type::TypeVar(inner) => self.is_subtype(&inner.upper_bound, sup),
                        Type::Intersection(parts) => {
                            parts.iter().any(|part| self.is_subtype(part, sup))
                        }
                        _ => false,
                    }
            }
            (Type::TypeVar(tv), _) => self.is_subtype(&tv.upper_bound, sup),
            (Type::Intersection(parts), _) => parts.iter().any(|part| self.is_subtype(part, sup)),
            (Type::Wildcard(w), _) => match &w.extends_bound {
                Some(upper) => self.is_subtype(upper, sup),
                None => self.is_subtype(&Type::object(), sup),
            },
            (_, Type::Wildcard(_)) => false,
            (Type::Array(a), Type::Array(b)) => match (a.as_ref(), b.as_ref()) {
                (Type::Primitive(x), Type::Primitive(y)) => x == y,
                (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
                (a, b) => self.is_subtype(a, b),
            },
            (Type::Array(_), Type::Class(ct)) => {
                ct.args.is_empty() && matches!(ct.name.as_str(), OBJECT | CLONEABLE | SERIALIZABLE)
            }
            (Type::Class(_), Type::Array(_)) => false,
            (Type::Class(_), Type::Class(target)) => match self.as_super(sub, &target.name) {
                Some(Type::Class(view)) => self.arguments_compatible(&view, target),
                _ => false,
            },
        }
    }

    fn arguments_compatible(&self, view: &ClassType, target: &ClassType) -> bool {
        if target.args.is_empty() {
            return true;
        }
        if view.args.len() != target.args.len() {
            return false;
        }
        if let (Some(a), Some(b)) = (view.enclosing.as_deref(), target.enclosing.as_deref()) {
            if !self.is_subtype(a, b) {
                return false;
            }
        }
        target
            .args
            .iter()
            .zip(&view.args)
            .all(|(t, s)| self.contains(t, s))
    }

    /// Type-argument containment (JLS 4.5.1): does `outer` contain `inner`?
    pub(crate) fn contains(&self, outer: &Type, inner: &Type) -> bool {
        let Type::Wildcard(WildcardType {
            extends_bound,
            super_bound,
        }) = outer
        else {
            return self.same_type(outer, inner);
        };

        match (extends_bound.as_deref(), super_bound.as_deref()) {
            (None, None) => true,
            (Some(upper), _) => match inner {
                Type::Wildcard(w) => match (&w.extends_bound, &w.super_bound) {
                    (Some(inner_upper), _) => self.is_subtype(inner_upper, upper),
                    _ => upper.is_object(),
                },
                _ => self.is_subtype(inner, upper),
            },
            (None, Some(lower)) => match inner {
                Type::Wildcard(w) => w
                    .super_bound
                    .as_deref()
                    .is_some_and(|inner_lower| self.is_subtype(lower, inner_lower)),
                _ => self.is_subtype(lower, inner),
            },
        }
    }

    /// Structural identity that compares type variables by name.
    pub(crate) fn same_type(&self, a: &Type, b: &Type) -> bool {
        match (a, b) {
            (Type::TypeVar(x), Type::TypeVar(y)) => x.name == y.name,
            (Type::Class(x), Type::Class(y)) => {
                x.name == y.name
                    && x.args.len() == y.args.len()
                    && x.args.iter().zip(&y.args).all(|(p, q)| self.same_type(p, q))
            }
            (Type::Array(x), Type::Array(y)) => self.same_type(x, y),
            (Type::Wildcard(x), Type::Wildcard(y)) => {
                bounds_match(self, &x.extends_bound, &y.extends_bound)
                    && bounds_match(self, &x.super_bound, &y.super_bound)
            }
            _ => a == b,
        }
    }

    /// Method invocation conversion from `from` to `to`.
    pub fn is_assignable(&self, from: &Type, to: &Type, conversion: Conversion) -> bool {
        if self.is_subtype(from, to) || self.is_unchecked_conversion(from, to) {
            return true;
        }
        if conversion == Conversion::Strict {
            return false;
        }

        match (from, to) {
            (Type::Primitive(p), _) if to.is_reference() => {
                if *p == PrimitiveType::Void {
                    return false;
                }
                let boxed = Type::class(p.boxed_name(), vec![]);
                self.is_subtype(&boxed, to)
            }
            (_, Type::Primitive(target)) if from.is_reference() => {
                match self.unboxed(from) {
                    Some(p) => p == *target || p.widens_to(*target),
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// A raw view of `from` assigned to a parameterization of the same class.
    fn is_unchecked_conversion(&self, from: &Type, to: &Type) -> bool {
        let Type::Class(target) = to else {
            return false;
        };
        if target.args.is_empty() || !from.is_reference() || matches!(from, Type::Null) {
            return false;
        }
        matches!(
            self.as_super(from, &target.name),
            Some(Type::Class(view)) if view.args.is_empty()
        )
    }

    /// Primitive obtained by unboxing `ty`, looking through type variable bounds.
    pub(crate) fn unboxed(&self, ty: &Type) -> Option<PrimitiveType> {
        match ty {
            Type::Class(ct) if ct.args.is_empty() => PrimitiveType::from_boxed_name(&ct.name),
            Type::TypeVar(tv) => self.unboxed(&tv.upper_bound),
            Type::Intersection(parts) => parts.iter().find_map(|part| self.unboxed(part)),
            _ => None,
        }
    }
}

fn bounds_match(resolver: &Resolver<'_>, a: &Option<Box<Type>>, b: &Option<Box<Type>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => resolver.same_type(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbc_types::{TypeStore, TypeVariable};

    fn with_resolver(f: impl FnOnce(&Resolver<'_>)) {
        let store = TypeStore::with_minimal_jdk();
        let resolver = Resolver::new(&store);
        f(&resolver);
    }

    fn class(name: &str, args: Vec<Type>) -> Type {
        Type::class(name, args)
    }

    #[test]
    fn containment_with_wildcards() {
        with_resolver(|r| {
            let integer = class("java.lang.Integer", vec![]);
            let number = class("java.lang.Number", vec![]);
            assert!(r.contains(&Type::wildcard_extends(number.clone()), &integer));
            assert!(!r.contains(&Type::wildcard_super(integer.clone()), &Type::string()));
            assert!(r.contains(&Type::wildcard_super(integer.clone()), &number));
            assert!(r.contains(&Type::wildcard(), &Type::string()));
            assert!(!r.contains(&number, &integer));
        });
    }

    #[test]
    fn generic_class_subtyping_goes_through_supertypes() {
        with_resolver(|r| {
            let array_list = class("java.util.ArrayList", vec![Type::string()]);
            assert!(r.is_subtype(&array_list, &class("java.util.List", vec![Type::string()])));
            assert!(r.is_subtype(
                &array_list,
                &class("java.util.Collection", vec![Type::wildcard_extends(Type::object())])
            ));
            assert!(r.is_subtype(&array_list, &class("java.util.List", vec![])));
            assert!(!r.is_subtype(&array_list, &class("java.util.List", vec![Type::object()])));
            assert!(r.is_subtype(
                &class("java.util.List", vec![Type::string()]),
                &Type::object()
            ));
        });
    }

    #[test]
    fn raw_to_parameterized_needs_unchecked_conversion() {
        with_resolver(|r| {
            let raw = class("java.util.ArrayList", vec![]);
            let target = class("java.util.List", vec![Type::string()]);
            assert!(!r.is_subtype(&raw, &target));
            assert!(r.is_assignable(&raw, &target, Conversion::Strict));
        });
    }

    #[test]
    fn arrays_are_covariant_for_references_only() {
        with_resolver(|r| {
            let strings = Type::array(Type::string());
            assert!(r.is_subtype(&strings, &Type::array(Type::object())));
            assert!(r.is_subtype(&strings, &class(CLONEABLE, vec![])));
            assert!(!r.is_subtype(&Type::array(Type::int()), &Type::array(Type::long())));
            assert!(!r.is_subtype(&Type::array(Type::int()), &Type::array(Type::object())));
        });
    }

    #[test]
    fn type_variables_use_bounds() {
        with_resolver(|r| {
            let n = Type::TypeVar(TypeVariable::new("N", class("java.lang.Number", vec![])));
            assert!(r.is_subtype(&n, &class("java.lang.Number", vec![])));
            assert!(!r.is_subtype(&class("java.lang.Integer", vec![]), &n));
            let captured = Type::TypeVar(
                TypeVariable::unbounded("CAP#1").with_lower_bound(class("java.lang.Integer", vec![])),
            );
            assert!(r.is_subtype(&class("java.lang.Integer", vec![]), &captured));
            assert!(r.is_subtype(&n, &Type::TypeVar(TypeVariable::reference("N"))));
        });
    }

    #[test]
    fn boxing_only_in_loose_context() {
        with_resolver(|r| {
            let integer = class("java.lang.Integer", vec![]);
            assert!(!r.is_assignable(&Type::int(), &integer, Conversion::Strict));
            assert!(r.is_assignable(&Type::int(), &integer, Conversion::Loose));
            assert!(r.is_assignable(&Type::int(), &Type::object(), Conversion::Loose));
            assert!(r.is_assignable(&integer, &Type::long(), Conversion::Loose));
            assert!(!r.is_assignable(&integer, &Type::char(), Conversion::Loose));
            assert!(!r.is_assignable(&Type::int(), &class("java.lang.Long", vec![]), Conversion::Loose));
        });
    }

    #[test]
    fn null_is_assignable_to_references_only() {
        with_resolver(|r| {
            assert!(r.is_subtype(&Type::Null, &Type::string()));
            assert!(r.is_subtype(&Type::Null, &Type::array(Type::int())));
            assert!(!r.is_subtype(&Type::Null, &Type::int()));
        });
    }
}
