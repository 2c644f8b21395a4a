use std::collections::{HashMap, HashSet};

use crate::{erasure, ClassType, Type, TypeVariable, WildcardType};

/// Type variable bindings keyed by variable name.
pub type Bindings = HashMap<String, Type>;

/// Replace bound type variables in `ty`, recursing through class arguments, enclosing types,
/// arrays, wildcard bounds, unions and intersections.
///
/// Unbound variables are left untouched, including their bounds: a bound belongs to the
/// variable's declaration site, not to the type being rewritten.
pub fn substitute(ty: &Type, bindings: &Bindings) -> Type {
    if bindings.is_empty() {
        return ty.clone();
    }

    match ty {
        Type::Primitive(_) | Type::Null => ty.clone(),
        Type::TypeVar(tv) => bindings
            .get(&tv.name)
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        Type::Class(ct) => Type::Class(ClassType {
            name: ct.name.clone(),
            args: ct.args.iter().map(|a| substitute(a, bindings)).collect(),
            enclosing: ct
                .enclosing
                .as_ref()
                .map(|e| Box::new(substitute(e, bindings))),
        }),
        Type::Array(component) => Type::Array(Box::new(substitute(component, bindings))),
        Type::Wildcard(w) => Type::Wildcard(WildcardType {
            extends_bound: w
                .extends_bound
                .as_ref()
                .map(|b| Box::new(substitute(b, bindings))),
            super_bound: w
                .super_bound
                .as_ref()
                .map(|b| Box::new(substitute(b, bindings))),
        }),
        Type::Union(alternatives) => Type::Union(
            alternatives
                .iter()
                .map(|a| substitute(a, bindings))
                .collect(),
        ),
        Type::Intersection(parts) => {
            Type::Intersection(parts.iter().map(|p| substitute(p, bindings)).collect())
        }
    }
}

/// Names of the type variables mentioned anywhere in `ty`, bounds of variables included.
pub fn type_var_names(ty: &Type) -> HashSet<String> {
    let mut names = HashSet::new();
    collect_type_var_names(ty, &mut names);
    names
}

fn collect_type_var_names(ty: &Type, out: &mut HashSet<String>) {
    match ty {
        Type::Primitive(_) | Type::Null => {}
        Type::TypeVar(tv) => {
            if out.insert(tv.name.clone()) {
                collect_type_var_names(&tv.upper_bound, out);
                if let Some(lower) = tv.lower_bound.as_deref() {
                    collect_type_var_names(lower, out);
                }
            }
        }
        Type::Class(ct) => {
            for arg in &ct.args {
                collect_type_var_names(arg, out);
            }
            if let Some(enclosing) = ct.enclosing.as_deref() {
                collect_type_var_names(enclosing, out);
            }
        }
        Type::Array(component) => collect_type_var_names(component, out),
        Type::Wildcard(w) => {
            for bound in [w.extends_bound.as_deref(), w.super_bound.as_deref()]
                .into_iter()
                .flatten()
            {
                collect_type_var_names(bound, out);
            }
        }
        Type::Union(parts) | Type::Intersection(parts) => {
            for part in parts {
                collect_type_var_names(part, out);
            }
        }
    }
}

/// Bindings implied by instantiating a generic declaration with `args`.
///
/// A raw instantiation (no arguments for a generic declaration) binds every parameter to the
/// erasure of its upper bound. Bindings contributed by a parameterized enclosing type are the
/// caller's business: only the enclosing declaration knows its parameter names.
pub fn class_bindings(type_params: &[TypeVariable], args: &[Type]) -> Bindings {
    let mut bindings = Bindings::with_capacity(type_params.len());
    if args.is_empty() {
        for tp in type_params {
            bindings.insert(tp.name.clone(), erasure(&tp.upper_bound));
        }
    } else {
        for (tp, arg) in type_params.iter().zip(args) {
            bindings.insert(tp.name.clone(), arg.clone());
        }
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Type {
        Type::TypeVar(TypeVariable::unbounded(name))
    }

    #[test]
    fn substitutes_through_nested_structure() {
        let mut bindings = Bindings::new();
        bindings.insert("E".to_string(), Type::string());

        let ty = Type::class(
            "java.util.Map",
            vec![
                Type::wildcard_extends(var("E")),
                Type::array(Type::class("java.util.List", vec![var("E")])),
            ],
        );
        assert_eq!(
            substitute(&ty, &bindings),
            Type::class(
                "java.util.Map",
                vec![
                    Type::wildcard_extends(Type::string()),
                    Type::array(Type::class("java.util.List", vec![Type::string()])),
                ],
            )
        );
    }

    #[test]
    fn unbound_variables_are_left_alone() {
        let mut bindings = Bindings::new();
        bindings.insert("K".to_string(), Type::string());
        assert_eq!(substitute(&var("V"), &bindings), var("V"));
    }

    #[test]
    fn collects_variables_inside_bounds() {
        let u = TypeVariable::new("U", Type::class("java.util.List", vec![var("E")]));
        let ty = Type::class(
            "java.util.Map",
            vec![Type::TypeVar(u), Type::wildcard_super(var("K"))],
        );
        let mut names: Vec<String> = type_var_names(&ty).into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["E", "K", "U"]);
        assert!(type_var_names(&Type::array(Type::int())).is_empty());
    }

    #[test]
    fn raw_instantiation_binds_erased_bounds() {
        let t = TypeVariable::new("T", Type::class("java.lang.Number", vec![]));
        let bindings = class_bindings(&[t], &[]);
        assert_eq!(
            bindings.get("T"),
            Some(&Type::class("java.lang.Number", vec![]))
        );
    }
}
