use dbc_types::{
    ClassDecl, ClassKind, MemberDecl, MemberKind, Modifier, Type, TypeModel, TypeStore,
    TypeVariable,
};

use pretty_assertions::assert_eq;

#[test]
fn minimal_jdk_defines_core_types() {
    let store = TypeStore::with_minimal_jdk();
    for name in [
        "java.lang.Object",
        "java.lang.String",
        "java.lang.Integer",
        "java.lang.Number",
        "java.io.Serializable",
        "java.util.List",
        "java.util.ArrayList",
        "java.util.Map.Entry",
    ] {
        assert!(store.lookup_type(name).is_some(), "{name} should be defined");
    }
}

#[test]
fn direct_supertypes_list_superclass_before_interfaces() {
    let store = TypeStore::with_minimal_jdk();
    let string = store.lookup_type("java.lang.String").unwrap();
    assert_eq!(
        store.direct_supertypes(string),
        vec![
            Type::object(),
            Type::class("java.io.Serializable", vec![]),
            Type::class("java.lang.Comparable", vec![Type::string()]),
            Type::class("java.lang.CharSequence", vec![]),
        ]
    );
}

#[test]
fn add_class_replaces_existing_declaration() {
    let mut store = TypeStore::new();
    store.add_class(ClassDecl::new("com.example.Foo", ClassKind::Class));
    let raw = store.add_class(ClassDecl {
        members: vec![MemberDecl::method("m", vec![Type::int()], Type::void())],
        ..ClassDecl::new("com.example.Foo", ClassKind::Class)
    });

    assert_eq!(raw, Type::class("com.example.Foo", vec![]));
    assert_eq!(store.len(), 1);
    let foo = store.lookup_type("com.example.Foo").unwrap();
    assert_eq!(store.members_of(foo).len(), 1);
    assert_eq!(store.erasure_of(foo), raw);
}

#[test]
fn declared_type_uses_type_parameters_as_arguments() {
    let store = TypeStore::with_minimal_jdk();
    let list = store.lookup_type("java.util.List").unwrap();
    assert_eq!(
        list.declared_type(),
        Type::class(
            "java.util.List",
            vec![Type::TypeVar(TypeVariable::unbounded("E"))]
        )
    );
}

#[test]
fn field_members_become_field_signatures() {
    let store = TypeStore::with_minimal_jdk();
    let integer = store.lookup_type("java.lang.Integer").unwrap();
    let max = integer
        .members
        .iter()
        .find(|m| m.name == "MAX_VALUE")
        .expect("Integer.MAX_VALUE");
    assert_eq!(max.kind, MemberKind::Field);

    let sig = max.to_signature(integer.raw_type());
    assert!(sig.is_field());
    assert!(sig.is_static());
    assert!(sig.params.is_empty());
    assert_eq!(sig.return_type, Type::int());
    assert!(sig.modifiers.contains(&Modifier::Final));
}

#[test]
fn declarations_deserialize_from_json() {
    let json = r#"{
        "name": "com.example.User",
        "kind": "class",
        "super_class": {"kind": "class", "data": {"name": "java.lang.Object"}},
        "members": [
            {
                "name": "getName",
                "kind": "method",
                "return_type": {"kind": "class", "data": {"name": "java.lang.String"}},
                "modifiers": ["public"]
            },
            {
                "name": "age",
                "kind": "field",
                "return_type": {"kind": "primitive", "data": "int"}
            }
        ]
    }"#;

    let decl: ClassDecl = serde_json::from_str(json).expect("declaration should parse");
    assert_eq!(decl.super_class, Some(Type::object()));
    assert_eq!(decl.members[0].return_type, Type::string());
    assert_eq!(decl.members[1].kind, MemberKind::Field);
    assert_eq!(decl.members[1].return_type, Type::int());
}
