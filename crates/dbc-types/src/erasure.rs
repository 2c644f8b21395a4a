use crate::{ClassType, Type};

/// Model-free type erasure (JLS 4.6).
///
/// Class types lose their type arguments and enclosing instantiation (the qualified name alone
/// identifies the raw type). A type variable erases to the erasure of its upper bound, an
/// intersection to the erasure of its first component. Computing the erasure of a union needs the
/// supertype graph, so here a union only has its alternatives erased; the resolver completes it
/// to their least upper bound.
pub fn erasure(ty: &Type) -> Type {
    match ty {
        Type::Primitive(_) | Type::Null => ty.clone(),
        Type::Class(ct) => Type::Class(ClassType {
            name: ct.name.clone(),
            args: Vec::new(),
            enclosing: None,
        }),
        Type::Array(component) => Type::Array(Box::new(erasure(component))),
        Type::TypeVar(tv) => erasure(&tv.upper_bound),
        Type::Wildcard(w) => match &w.extends_bound {
            Some(bound) => erasure(bound),
            None => Type::object(),
        },
        Type::Intersection(parts) => match parts.first() {
            Some(first) => erasure(first),
            None => Type::object(),
        },
        Type::Union(alternatives) => {
            let mut erased: Vec<Type> = Vec::with_capacity(alternatives.len());
            for alt in alternatives {
                let alt = erasure(alt);
                if !erased.contains(&alt) {
                    erased.push(alt);
                }
            }
            if erased.len() == 1 {
                erased.pop().unwrap_or_else(Type::object)
            } else {
                Type::Union(erased)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeVariable;

    #[test]
    fn erasure_strips_arguments_and_enclosing() {
        let outer = Type::class("com.example.Outer", vec![Type::string()]);
        let inner = Type::nested(outer, "com.example.Outer.Inner", vec![Type::int()]);
        assert_eq!(erasure(&inner), Type::class("com.example.Outer.Inner", vec![]));
    }

    #[test]
    fn type_var_erases_to_leftmost_bound() {
        let bound = Type::Intersection(vec![
            Type::class("java.lang.Number", vec![]),
            Type::class(
                "java.lang.Comparable",
                vec![Type::TypeVar(TypeVariable::reference("T"))],
            ),
        ]);
        let t = Type::TypeVar(TypeVariable::new("T", bound));
        assert_eq!(erasure(&t), Type::class("java.lang.Number", vec![]));
        assert_eq!(erasure(&Type::array(t)), Type::array(Type::class("java.lang.Number", vec![])));
    }

    #[test]
    fn erasure_is_idempotent_for_unions() {
        let union = Type::Union(vec![
            Type::class("java.util.List", vec![Type::string()]),
            Type::class("java.util.List", vec![Type::object()]),
            Type::class("java.util.Set", vec![]),
        ]);
        let once = erasure(&union);
        assert_eq!(
            once,
            Type::Union(vec![
                Type::class("java.util.List", vec![]),
                Type::class("java.util.Set", vec![]),
            ])
        );
        assert_eq!(erasure(&once), once);
    }
}
