//! Symbolic model of a Java-like type system.
//!
//! Every [`Type`] is an immutable value compared structurally: two types with the same shape are
//! equal and hash identically, which lets downstream caches key on them directly. Declarations
//! ([`ClassDecl`], [`MemberDecl`]) describe the read-only snapshot handed over by the front end
//! through [`TypeModel`]; [`TypeStore`] is the in-memory implementation used by tests and tools.

#![forbid(unsafe_code)]

mod erasure;
mod model;
mod signature;
mod store;
mod subst;

use serde::{Deserialize, Serialize};

pub use crate::erasure::erasure;
pub use crate::model::{ClassDecl, ClassKind, MemberDecl, MemberKind, TypeModel};
pub use crate::signature::{MethodSignature, Modifier};
pub use crate::store::TypeStore;
pub use crate::subst::{class_bindings, substitute, type_var_names, Bindings};

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";
pub const CLONEABLE: &str = "java.lang.Cloneable";
pub const SERIALIZABLE: &str = "java.io.Serializable";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Char,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Qualified name of the wrapper class used by boxing conversion.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
            PrimitiveType::Void => "java.lang.Void",
        }
    }

    /// Inverse of [`PrimitiveType::boxed_name`]. `java.lang.Void` is not unboxable.
    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|p| *p != PrimitiveType::Void)
            .find(|p| p.boxed_name() == name)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean | PrimitiveType::Void)
    }

    /// Widening primitive conversion (JLS 5.1.2). Identity is not a widening.
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Double | Boolean | Void => false,
        }
    }
}

/// A declared class or interface type, possibly parameterized and possibly nested inside a
/// parameterized enclosing type (`Outer<String>.Inner`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Type>,
    #[serde(default)]
    pub enclosing: Option<Box<Type>>,
}

impl ClassType {
    /// The last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_raw(&self) -> bool {
        self.args.is_empty()
    }
}

/// A type variable. Variables are identified by name; a bound that mentions the variable itself
/// (`T extends Comparable<T>`) uses [`TypeVariable::reference`] for the inner occurrence so the
/// value stays acyclic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeVariable {
    pub name: String,
    pub upper_bound: Box<Type>,
    #[serde(default)]
    pub lower_bound: Option<Box<Type>>,
}

impl TypeVariable {
    pub fn new(name: impl Into<String>, upper_bound: Type) -> Self {
        Self {
            name: name.into(),
            upper_bound: Box::new(upper_bound),
            lower_bound: None,
        }
    }

    /// A variable bounded only by the root object type.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::new(name, Type::object())
    }

    /// Back-reference to a variable declared elsewhere, used inside its own bounds.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::unbounded(name)
    }

    pub fn with_lower_bound(mut self, lower: Type) -> Self {
        self.lower_bound = Some(Box::new(lower));
        self
    }

    /// The lower bound, treating an explicit null-type bound as absent.
    pub fn effective_lower_bound(&self) -> Option<&Type> {
        self.lower_bound
            .as_deref()
            .filter(|lower| !matches!(lower, Type::Null))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardType {
    #[serde(default)]
    pub extends_bound: Option<Box<Type>>,
    #[serde(default)]
    pub super_bound: Option<Box<Type>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    TypeVar(TypeVariable),
    Wildcard(WildcardType),
    Union(Vec<Type>),
    Intersection(Vec<Type>),
    Null,
}

impl Type {
    pub fn class(name: impl Into<String>, args: Vec<Type>) -> Type {
        Type::Class(ClassType {
            name: name.into(),
            args,
            enclosing: None,
        })
    }

    /// A member type of a parameterized enclosing type, e.g. `Outer<String>.Inner`.
    pub fn nested(enclosing: Type, name: impl Into<String>, args: Vec<Type>) -> Type {
        Type::Class(ClassType {
            name: name.into(),
            args,
            enclosing: Some(Box::new(enclosing)),
        })
    }

    pub fn object() -> Type {
        Type::class(OBJECT, vec![])
    }

    pub fn string() -> Type {
        Type::class(STRING, vec![])
    }

    pub fn primitive(kind: PrimitiveType) -> Type {
        Type::Primitive(kind)
    }

    pub fn boolean() -> Type {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Type {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn long() -> Type {
        Type::Primitive(PrimitiveType::Long)
    }

    pub fn char() -> Type {
        Type::Primitive(PrimitiveType::Char)
    }

    pub fn double() -> Type {
        Type::Primitive(PrimitiveType::Double)
    }

    pub fn void() -> Type {
        Type::Primitive(PrimitiveType::Void)
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    pub fn type_var(var: TypeVariable) -> Type {
        Type::TypeVar(var)
    }

    pub fn wildcard() -> Type {
        Type::Wildcard(WildcardType::default())
    }

    pub fn wildcard_extends(bound: Type) -> Type {
        Type::Wildcard(WildcardType {
            extends_bound: Some(Box::new(bound)),
            super_bound: None,
        })
    }

    pub fn wildcard_super(bound: Type) -> Type {
        Type::Wildcard(WildcardType {
            extends_bound: None,
            super_bound: Some(Box::new(bound)),
        })
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Void))
    }

    /// Reference types: everything that can hold `null`.
    pub fn is_reference(&self) -> bool {
        match self {
            Type::Primitive(_) | Type::Wildcard(_) => false,
            Type::Class(_)
            | Type::Array(_)
            | Type::TypeVar(_)
            | Type::Union(_)
            | Type::Intersection(_)
            | Type::Null => true,
        }
    }

    /// `true` for the unparameterized root object type.
    pub fn is_object(&self) -> bool {
        matches!(self, Type::Class(ct) if ct.name == OBJECT && ct.args.is_empty())
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(ct) => Some(&ct.name),
            _ => None,
        }
    }

    pub fn array_component(&self) -> Option<&Type> {
        match self {
            Type::Array(component) => Some(component),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxing_table_round_trips() {
        for p in PrimitiveType::ALL {
            if p == PrimitiveType::Void {
                assert_eq!(PrimitiveType::from_boxed_name(p.boxed_name()), None);
                continue;
            }
            assert_eq!(PrimitiveType::from_boxed_name(p.boxed_name()), Some(p));
        }
    }

    #[test]
    fn primitive_widening_follows_jls() {
        assert!(PrimitiveType::Int.widens_to(PrimitiveType::Long));
        assert!(PrimitiveType::Char.widens_to(PrimitiveType::Int));
        assert!(PrimitiveType::Long.widens_to(PrimitiveType::Float));
        assert!(!PrimitiveType::Int.widens_to(PrimitiveType::Int));
        assert!(!PrimitiveType::Short.widens_to(PrimitiveType::Char));
        assert!(!PrimitiveType::Char.widens_to(PrimitiveType::Short));
        assert!(!PrimitiveType::Boolean.widens_to(PrimitiveType::Int));
    }

    #[test]
    fn simple_name_of_nested_class() {
        let Type::Class(entry) = Type::class("java.util.Map.Entry", vec![]) else {
            unreachable!()
        };
        assert_eq!(entry.simple_name(), "Entry");
    }

    #[test]
    fn null_lower_bound_is_treated_as_absent() {
        let t = TypeVariable::unbounded("T").with_lower_bound(Type::Null);
        assert_eq!(t.effective_lower_bound(), None);
    }
}
