use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{MethodSignature, Modifier, Type, TypeVariable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
    Field,
    Constructor,
}

/// A member as declared, in terms of its declaring class's type parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub type_params: Vec<TypeVariable>,
    #[serde(default)]
    pub params: Vec<Type>,
    pub return_type: Type,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
}

impl MemberDecl {
    pub fn method(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            type_params: Vec::new(),
            params,
            return_type,
            modifiers: [Modifier::Public].into_iter().collect(),
        }
    }

    pub fn field(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: ty,
            modifiers: [Modifier::Public].into_iter().collect(),
        }
    }

    pub fn constructor(params: Vec<Type>) -> Self {
        Self {
            name: "<init>".to_string(),
            kind: MemberKind::Constructor,
            type_params: Vec::new(),
            params,
            return_type: Type::void(),
            modifiers: [Modifier::Public].into_iter().collect(),
        }
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeVariable>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    /// The member as a signature on `declaring_type`, without any substitution applied.
    pub fn to_signature(&self, declaring_type: Type) -> MethodSignature {
        let mut modifiers = self.modifiers.clone();
        if self.kind == MemberKind::Field {
            modifiers.insert(Modifier::Field);
        }
        MethodSignature {
            declaring_type,
            name: self.name.clone(),
            type_params: self.type_params.clone(),
            params: self.params.clone(),
            return_type: self.return_type.clone(),
            is_constructor: self.kind == MemberKind::Constructor,
            modifiers,
        }
    }
}

/// A class or interface declaration from the external type model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: ClassKind,
    #[serde(default)]
    pub type_params: Vec<TypeVariable>,
    #[serde(default)]
    pub super_class: Option<Type>,
    #[serde(default)]
    pub interfaces: Vec<Type>,
    /// Qualified name of the enclosing declaration for member types.
    #[serde(default)]
    pub enclosing: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
            members: Vec::new(),
        }
    }

    /// The generic declaration viewed as a type: `List<E>` for `interface List<E>`.
    pub fn declared_type(&self) -> Type {
        Type::class(
            self.name.clone(),
            self.type_params
                .iter()
                .cloned()
                .map(Type::TypeVar)
                .collect(),
        )
    }

    pub fn raw_type(&self) -> Type {
        Type::class(self.name.clone(), vec![])
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}

/// Read-only view of the compiled and source types known to the front end.
///
/// Implementations must not change while a resolver is using them. Only
/// [`TypeModel::lookup_type`] is required; the remaining accessors read the declaration.
pub trait TypeModel: Send + Sync {
    fn lookup_type(&self, qualified_name: &str) -> Option<&ClassDecl>;

    fn members_of<'a>(&'a self, decl: &'a ClassDecl) -> &'a [MemberDecl] {
        &decl.members
    }

    /// Direct superclass (if any) followed by the direct interfaces, in declaration order.
    fn direct_supertypes(&self, decl: &ClassDecl) -> Vec<Type> {
        decl.super_class
            .iter()
            .chain(decl.interfaces.iter())
            .cloned()
            .collect()
    }

    fn erasure_of(&self, decl: &ClassDecl) -> Type {
        decl.raw_type()
    }
}
