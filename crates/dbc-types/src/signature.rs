use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::{substitute, type_var_names, Bindings, Type, TypeVariable};

/// Member modifiers.
///
/// Declaration order is the canonical Java modifier order, so iterating a `BTreeSet<Modifier>`
/// yields modifiers the way javac prints them. `Varargs` and `Field` are markers, not source
/// keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Final,
    Synchronized,
    Native,
    Varargs,
    Field,
}

impl Modifier {
    /// The source keyword, or `None` for marker modifiers.
    pub fn keyword(self) -> Option<&'static str> {
        Some(match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Varargs | Modifier::Field => return None,
        })
    }
}

/// A method, constructor or field as seen from a particular declaring type.
///
/// Fields are zero-argument signatures carrying [`Modifier::Field`]; their `return_type` is the
/// field type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub declaring_type: Type,
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<TypeVariable>,
    #[serde(default)]
    pub params: Vec<Type>,
    pub return_type: Type,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
}

impl MethodSignature {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn is_field(&self) -> bool {
        self.modifiers.contains(&Modifier::Field)
    }

    /// Variable arity: flagged as such and ending in an array parameter.
    pub fn is_varargs(&self) -> bool {
        self.modifiers.contains(&Modifier::Varargs)
            && matches!(self.params.last(), Some(Type::Array(_)))
    }

    /// Component type of the trailing variable-arity parameter.
    pub fn varargs_component(&self) -> Option<&Type> {
        if !self.is_varargs() {
            return None;
        }
        self.params.last().and_then(Type::array_component)
    }

    /// Apply `bindings` to parameter and return types.
    ///
    /// The signature's own type parameters shadow bindings with the same name, so substituting a
    /// class-level `T` never captures a method-level `<T>`. Substitution is capture-avoiding: a
    /// method type parameter whose name occurs in a binding's value is renamed (`U` to `U'`)
    /// first, so the substituted type keeps referring to the outer variable.
    pub fn substitute(&self, bindings: &Bindings) -> MethodSignature {
        if self.type_params.is_empty() {
            return MethodSignature {
                params: self.params.iter().map(|p| substitute(p, bindings)).collect(),
                return_type: substitute(&self.return_type, bindings),
                ..self.clone()
            };
        }

        let scoped: Bindings = bindings
            .iter()
            .filter(|(name, _)| !self.type_params.iter().any(|tp| &tp.name == *name))
            .map(|(name, ty)| (name.clone(), ty.clone()))
            .collect();

        let mut free = HashSet::new();
        for value in scoped.values() {
            free.extend(type_var_names(value));
        }
        let mut taken: HashSet<String> = free.clone();
        taken.extend(scoped.keys().cloned());
        taken.extend(self.type_params.iter().map(|tp| tp.name.clone()));

        let names: Vec<String> = self
            .type_params
            .iter()
            .map(|tp| {
                if !free.contains(&tp.name) {
                    return tp.name.clone();
                }
                let mut fresh = format!("{}'", tp.name);
                while taken.contains(&fresh) {
                    fresh.push('\'');
                }
                taken.insert(fresh.clone());
                fresh
            })
            .collect();

        // Bounds see renamed parameters as back-references.
        let mut bound_bindings = scoped.clone();
        for (tp, name) in self.type_params.iter().zip(&names) {
            if &tp.name != name {
                bound_bindings.insert(
                    tp.name.clone(),
                    Type::TypeVar(TypeVariable::reference(name.clone())),
                );
            }
        }
        let type_params: Vec<TypeVariable> = self
            .type_params
            .iter()
            .zip(&names)
            .map(|(tp, name)| TypeVariable {
                name: name.clone(),
                upper_bound: Box::new(substitute(&tp.upper_bound, &bound_bindings)),
                lower_bound: tp
                    .lower_bound
                    .as_ref()
                    .map(|lb| Box::new(substitute(lb, &bound_bindings))),
            })
            .collect();

        let mut all = scoped;
        for (tp, renamed) in self.type_params.iter().zip(&type_params) {
            if tp.name != renamed.name {
                all.insert(tp.name.clone(), Type::TypeVar(renamed.clone()));
            }
        }

        MethodSignature {
            declaring_type: self.declaring_type.clone(),
            name: self.name.clone(),
            params: self.params.iter().map(|p| substitute(p, &all)).collect(),
            return_type: substitute(&self.return_type, &all),
            type_params,
            is_constructor: self.is_constructor,
            modifiers: self.modifiers.clone(),
        }
    }
}
