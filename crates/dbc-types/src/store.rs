use std::collections::HashMap;

use crate::{
    ClassDecl, ClassKind, MemberDecl, Modifier, PrimitiveType, Type, TypeModel, TypeVariable,
    CLONEABLE, OBJECT, SERIALIZABLE, STRING,
};

/// In-memory [`TypeModel`].
///
/// `TypeStore::with_minimal_jdk()` preloads the handful of `java.lang` / `java.util` types binding
/// expressions lean on (boxes, `String`, the collection interfaces) so callers and tests don't need
/// a real JDK.
#[derive(Clone, Debug, Default)]
pub struct TypeStore {
    classes: HashMap<String, ClassDecl>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a declaration, returning its raw type.
    pub fn add_class(&mut self, decl: ClassDecl) -> Type {
        let raw = decl.raw_type();
        self.classes.insert(decl.name.clone(), decl);
        raw
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassDecl> {
        self.classes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Qualified names of all declarations, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::default();
        store.add_java_lang();
        store.add_java_util();
        store
    }

    fn add_java_lang(&mut self) {
        let object = Type::object();
        let string = Type::string();

        self.add_class(ClassDecl {
            members: vec![
                MemberDecl::constructor(vec![]),
                method("toString", vec![], string.clone()),
                method("hashCode", vec![], Type::int()),
                method("equals", vec![object.clone()], Type::boolean()),
            ],
            ..ClassDecl::new(OBJECT, ClassKind::Class)
        });
        self.add_class(ClassDecl::new(SERIALIZABLE, ClassKind::Interface));
        self.add_class(ClassDecl::new(CLONEABLE, ClassKind::Interface));

        self.add_class(ClassDecl {
            members: vec![
                abstract_method("length", vec![], Type::int()),
                abstract_method("charAt", vec![Type::int()], Type::char()),
            ],
            ..ClassDecl::new("java.lang.CharSequence", ClassKind::Interface)
        });

        let t = TypeVariable::unbounded("T");
        self.add_class(ClassDecl {
            type_params: vec![t.clone()],
            members: vec![abstract_method(
                "compareTo",
                vec![Type::TypeVar(t)],
                Type::int(),
            )],
            ..ClassDecl::new("java.lang.Comparable", ClassKind::Interface)
        });

        self.add_class(ClassDecl {
            super_class: Some(object.clone()),
            interfaces: vec![
                cls(SERIALIZABLE),
                Type::class("java.lang.Comparable", vec![string.clone()]),
                cls("java.lang.CharSequence"),
            ],
            members: vec![
                MemberDecl::constructor(vec![]),
                MemberDecl::constructor(vec![string.clone()]),
                method("length", vec![], Type::int()),
                method("charAt", vec![Type::int()], Type::char()),
                method("isEmpty", vec![], Type::boolean()),
                method("substring", vec![Type::int()], string.clone()),
                method("substring", vec![Type::int(), Type::int()], string.clone()),
                method("concat", vec![string.clone()], string.clone()),
                method("indexOf", vec![Type::int()], Type::int()),
                method("indexOf", vec![string.clone()], Type::int()),
                method("compareTo", vec![string.clone()], Type::int()),
                static_method("valueOf", vec![object.clone()], string.clone()),
                static_method("valueOf", vec![Type::boolean()], string.clone()),
                static_method("valueOf", vec![Type::char()], string.clone()),
                static_method("valueOf", vec![Type::int()], string.clone()),
                static_method("valueOf", vec![Type::long()], string.clone()),
                static_method("valueOf", vec![Type::double()], string.clone()),
                static_method(
                    "format",
                    vec![string.clone(), Type::array(object.clone())],
                    string.clone(),
                )
                .with_modifier(Modifier::Varargs),
            ],
            ..ClassDecl::new(STRING, ClassKind::Class)
        });

        self.add_class(ClassDecl {
            super_class: Some(object.clone()),
            interfaces: vec![cls(SERIALIZABLE)],
            members: vec![
                abstract_method("intValue", vec![], Type::int()),
                abstract_method("longValue", vec![], Type::long()),
                abstract_method("floatValue", vec![], Type::primitive(PrimitiveType::Float)),
                abstract_method("doubleValue", vec![], Type::double()),
            ],
            ..ClassDecl::new("java.lang.Number", ClassKind::Class)
        });

        for p in [
            PrimitiveType::Byte,
            PrimitiveType::Short,
            PrimitiveType::Int,
            PrimitiveType::Long,
            PrimitiveType::Float,
            PrimitiveType::Double,
        ] {
            let boxed = cls(p.boxed_name());
            let prim = Type::primitive(p);
            let mut members = vec![
                MemberDecl::constructor(vec![prim.clone()]),
                static_method("valueOf", vec![prim.clone()], boxed.clone()),
                static_method("toString", vec![prim.clone()], string.clone()),
                method(format!("{}Value", p.name()), vec![], prim.clone()),
                method("compareTo", vec![boxed.clone()], Type::int()),
                constant("MAX_VALUE", prim.clone()),
                constant("MIN_VALUE", prim.clone()),
            ];
            if p == PrimitiveType::Int {
                members.push(static_method("parseInt", vec![string.clone()], Type::int()));
            }
            self.add_class(ClassDecl {
                super_class: Some(cls("java.lang.Number")),
                interfaces: vec![Type::class("java.lang.Comparable", vec![boxed])],
                members,
                ..ClassDecl::new(p.boxed_name(), ClassKind::Class)
            });
        }

        let boolean = cls(PrimitiveType::Boolean.boxed_name());
        self.add_class(ClassDecl {
            super_class: Some(object.clone()),
            interfaces: vec![
                cls(SERIALIZABLE),
                Type::class("java.lang.Comparable", vec![boolean.clone()]),
            ],
            members: vec![
                MemberDecl::constructor(vec![Type::boolean()]),
                method("booleanValue", vec![], Type::boolean()),
                static_method("valueOf", vec![Type::boolean()], boolean.clone()),
                static_method("parseBoolean", vec![string.clone()], Type::boolean()),
                constant("TRUE", boolean.clone()),
                constant("FALSE", boolean.clone()),
            ],
            ..ClassDecl::new(PrimitiveType::Boolean.boxed_name(), ClassKind::Class)
        });

        let character = cls(PrimitiveType::Char.boxed_name());
        self.add_class(ClassDecl {
            super_class: Some(object.clone()),
            interfaces: vec![
                cls(SERIALIZABLE),
                Type::class("java.lang.Comparable", vec![character.clone()]),
            ],
            members: vec![
                MemberDecl::constructor(vec![Type::char()]),
                method("charValue", vec![], Type::char()),
                static_method("valueOf", vec![Type::char()], character.clone()),
                static_method("isDigit", vec![Type::char()], Type::boolean()),
            ],
            ..ClassDecl::new(PrimitiveType::Char.boxed_name(), ClassKind::Class)
        });

        self.add_class(ClassDecl {
            super_class: Some(object.clone()),
            ..ClassDecl::new(PrimitiveType::Void.boxed_name(), ClassKind::Class)
        });

        // abstract class Enum<E extends Enum<E>> implements Comparable<E>, Serializable
        let e_ref = Type::TypeVar(TypeVariable::reference("E"));
        let e = TypeVariable::new("E", Type::class("java.lang.Enum", vec![e_ref.clone()]));
        self.add_class(ClassDecl {
            type_params: vec![e],
            super_class: Some(object),
            interfaces: vec![
                Type::class("java.lang.Comparable", vec![e_ref]),
                cls(SERIALIZABLE),
            ],
            members: vec![
                method("name", vec![], string.clone()),
                method("ordinal", vec![], Type::int()),
            ],
            ..ClassDecl::new("java.lang.Enum", ClassKind::Class)
        });
    }

    fn add_java_util(&mut self) {
        let object = Type::object();
        let string = Type::string();

        let t = var("T");
        self.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("T")],
            members: vec![abstract_method(
                "iterator",
                vec![],
                Type::class("java.util.Iterator", vec![t.clone()]),
            )],
            ..ClassDecl::new("java.lang.Iterable", ClassKind::Interface)
        });

        let e = var("E");
        self.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("E")],
            members: vec![
                abstract_method("hasNext", vec![], Type::boolean()),
                abstract_method("next", vec![], e.clone()),
            ],
            ..ClassDecl::new("java.util.Iterator", ClassKind::Interface)
        });

        self.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("E")],
            interfaces: vec![Type::class("java.lang.Iterable", vec![e.clone()])],
            members: vec![
                abstract_method("size", vec![], Type::int()),
                abstract_method("isEmpty", vec![], Type::boolean()),
                abstract_method("contains", vec![object.clone()], Type::boolean()),
                abstract_method("add", vec![e.clone()], Type::boolean()),
            ],
            ..ClassDecl::new("java.util.Collection", ClassKind::Interface)
        });

        let list_e = Type::class("java.util.List", vec![e.clone()]);
        self.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("E")],
            interfaces: vec![Type::class("java.util.Collection", vec![e.clone()])],
            members: vec![
                abstract_method("get", vec![Type::int()], e.clone()),
                abstract_method("set", vec![Type::int(), e.clone()], e.clone()),
                abstract_method("add", vec![Type::int(), e.clone()], Type::void()),
                abstract_method("remove", vec![Type::int()], e.clone()),
                abstract_method("remove", vec![object.clone()], Type::boolean()),
                abstract_method("indexOf", vec![object.clone()], Type::int()),
                abstract_method("subList", vec![Type::int(), Type::int()], list_e.clone()),
            ],
            ..ClassDecl::new("java.util.List", ClassKind::Interface)
        });

        self.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("E")],
            super_class: Some(object.clone()),
            interfaces: vec![list_e.clone(), cls(CLONEABLE), cls(SERIALIZABLE)],
            members: vec![
                MemberDecl::constructor(vec![]),
                MemberDecl::constructor(vec![Type::int()]),
                MemberDecl::constructor(vec![Type::class(
                    "java.util.Collection",
                    vec![Type::wildcard_extends(e.clone())],
                )]),
                method("get", vec![Type::int()], e.clone()),
                method("add", vec![e.clone()], Type::boolean()),
                method("size", vec![], Type::int()),
                method("trimToSize", vec![], Type::void()),
            ],
            ..ClassDecl::new("java.util.ArrayList", ClassKind::Class)
        });

        self.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("E")],
            interfaces: vec![Type::class("java.util.Collection", vec![e.clone()])],
            ..ClassDecl::new("java.util.Set", ClassKind::Interface)
        });

        let (k, v) = (var("K"), var("V"));
        let map_params = vec![TypeVariable::unbounded("K"), TypeVariable::unbounded("V")];
        let entry = Type::class("java.util.Map.Entry", vec![k.clone(), v.clone()]);
        self.add_class(ClassDecl {
            type_params: map_params.clone(),
            members: vec![
                abstract_method("size", vec![], Type::int()),
                abstract_method("isEmpty", vec![], Type::boolean()),
                abstract_method("get", vec![object.clone()], v.clone()),
                abstract_method("put", vec![k.clone(), v.clone()], v.clone()),
                abstract_method("containsKey", vec![object.clone()], Type::boolean()),
                abstract_method(
                    "keySet",
                    vec![],
                    Type::class("java.util.Set", vec![k.clone()]),
                ),
                abstract_method(
                    "values",
                    vec![],
                    Type::class("java.util.Collection", vec![v.clone()]),
                ),
                abstract_method("entrySet", vec![], Type::class("java.util.Set", vec![entry])),
            ],
            ..ClassDecl::new("java.util.Map", ClassKind::Interface)
        });

        self.add_class(ClassDecl {
            type_params: map_params.clone(),
            enclosing: Some("java.util.Map".to_string()),
            members: vec![
                abstract_method("getKey", vec![], k.clone()),
                abstract_method("getValue", vec![], v.clone()),
                abstract_method("setValue", vec![v.clone()], v.clone()),
            ],
            ..ClassDecl::new("java.util.Map.Entry", ClassKind::Interface)
        });

        self.add_class(ClassDecl {
            type_params: map_params,
            super_class: Some(object.clone()),
            interfaces: vec![
                Type::class("java.util.Map", vec![k, v]),
                cls(CLONEABLE),
                cls(SERIALIZABLE),
            ],
            members: vec![
                MemberDecl::constructor(vec![]),
                MemberDecl::constructor(vec![Type::int()]),
            ],
            ..ClassDecl::new("java.util.HashMap", ClassKind::Class)
        });

        // public static <T> List<T> asList(T... a)
        self.add_class(ClassDecl {
            super_class: Some(object.clone()),
            members: vec![
                static_method(
                    "asList",
                    vec![Type::array(t.clone())],
                    Type::class("java.util.List", vec![t]),
                )
                .with_type_params(vec![TypeVariable::unbounded("T")])
                .with_modifier(Modifier::Varargs),
                static_method("toString", vec![Type::array(Type::int())], string.clone()),
                static_method("toString", vec![Type::array(object)], string),
            ],
            ..ClassDecl::new("java.util.Arrays", ClassKind::Class)
        });
    }
}

impl TypeModel for TypeStore {
    fn lookup_type(&self, qualified_name: &str) -> Option<&ClassDecl> {
        self.classes.get(qualified_name)
    }
}

fn cls(name: &str) -> Type {
    Type::class(name, vec![])
}

fn var(name: &str) -> Type {
    Type::TypeVar(TypeVariable::unbounded(name))
}

fn method(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> MemberDecl {
    MemberDecl::method(name, params, return_type)
}

fn abstract_method(name: &str, params: Vec<Type>, return_type: Type) -> MemberDecl {
    MemberDecl::method(name, params, return_type).with_modifier(Modifier::Abstract)
}

fn static_method(name: &str, params: Vec<Type>, return_type: Type) -> MemberDecl {
    MemberDecl::method(name, params, return_type).with_modifier(Modifier::Static)
}

fn constant(name: &str, ty: Type) -> MemberDecl {
    MemberDecl::field(name, ty).with_modifiers([Modifier::Public, Modifier::Static, Modifier::Final])
}
