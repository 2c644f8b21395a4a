use std::collections::{HashMap, HashSet};

use dbc_types::{Bindings, PrimitiveType, Type, TypeVariable, WildcardType};

use crate::Resolver;

impl Resolver<'_> {
    /// Infer method type arguments from `(formal, actual)` argument pairs by structural matching.
    ///
    /// Only variables that received at least one constraint are bound. Primitive actuals are
    /// boxed; conflicting constraints join to their least upper bound.
    pub(crate) fn infer_type_arguments(
        &self,
        type_params: &[TypeVariable],
        pairs: &[(&Type, &Type)],
    ) -> Bindings {
        let names: HashSet<&str> = type_params.iter().map(|tp| tp.name.as_str()).collect();
        let mut constraints: HashMap<String, Vec<Type>> = HashMap::new();
        for (formal, actual) in pairs {
            self.collect_constraints(formal, actual, &names, &mut constraints);
        }

        let mut bindings = Bindings::with_capacity(constraints.len());
        for tp in type_params {
            if let Some(found) = constraints.remove(&tp.name) {
                if !found.is_empty() {
                    bindings.insert(tp.name.clone(), self.join(found));
                }
            }
        }
        bindings
    }

    fn collect_constraints(
        &self,
        formal: &Type,
        actual: &Type,
        names: &HashSet<&str>,
        out: &mut HashMap<String, Vec<Type>>,
    ) {
        match formal {
            Type::TypeVar(tv) if names.contains(tv.name.as_str()) => {
                let bound = match actual {
                    Type::Null | Type::Primitive(PrimitiveType::Void) => return,
                    Type::Primitive(p) => Type::class(p.boxed_name(), vec![]),
                    other => other.clone(),
                };
                let entry = out.entry(tv.name.clone()).or_default();
                if !entry.contains(&bound) {
                    entry.push(bound);
                }
            }
            Type::Array(formal_component) => {
                if let Type::Array(actual_component) = actual {
                    if !actual_component.is_primitive() || formal_component.is_primitive() {
                        self.collect_constraints(formal_component, actual_component, names, out);
                    }
                }
            }
            Type::Class(formal_class) if !formal_class.args.is_empty() => {
                let actual = match actual {
                    Type::Primitive(p) if *p != PrimitiveType::Void => {
                        Type::class(p.boxed_name(), vec![])
                    }
                    other => other.clone(),
                };
                let Some(Type::Class(view)) = self.as_super(&actual, &formal_class.name) else {
                    return;
                };
                if view.args.len() != formal_class.args.len() {
                    return;
                }
                for (formal_arg, actual_arg) in formal_class.args.iter().zip(&view.args) {
                    self.collect_argument_constraints(formal_arg, actual_arg, names, out);
                }
            }
            Type::Wildcard(WildcardType {
                extends_bound: Some(bound),
                ..
            }) => self.collect_constraints(bound, actual, names, out),
            _ => {}
        }
    }

    fn collect_argument_constraints(
        &self,
        formal: &Type,
        actual: &Type,
        names: &HashSet<&str>,
        out: &mut HashMap<String, Vec<Type>>,
    ) {
        match (formal, actual) {
            (Type::Wildcard(f), Type::Wildcard(a)) => {
                match (&f.extends_bound, &a.extends_bound) {
                    (Some(fb), Some(ab)) => self.collect_constraints(fb, ab, names, out),
                    _ => {
                        if let (Some(fb), Some(ab)) = (&f.super_bound, &a.super_bound) {
                            self.collect_constraints(fb, ab, names, out);
                        }
                    }
                }
            }
            (Type::Wildcard(f), _) => {
                if let Some(bound) = f.extends_bound.as_deref().or(f.super_bound.as_deref()) {
                    self.collect_constraints(bound, actual, names, out);
                }
            }
            (_, Type::Wildcard(_)) => {}
            _ => self.collect_constraints(formal, actual, names, out),
        }
    }

    /// A single type for several constraints on one variable.
    fn join(&self, mut found: Vec<Type>) -> Type {
        if found.len() == 1 {
            return found.remove(0);
        }
        if let Some(widest) = found
            .iter()
            .find(|candidate| found.iter().all(|other| self.is_subtype(other, candidate)))
        {
            return widest.clone();
        }
        let erased: Vec<Type> = found.iter().map(|ty| self.erase(ty)).collect();
        self.lub(&erased)
    }
}
