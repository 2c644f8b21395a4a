use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use dbc_descriptor::{
    method_descriptor, method_source, to_binary_descriptor, to_canonical_source, DescriptorCache,
};
use dbc_types::{
    class_bindings, erasure, Bindings, ClassDecl, ClassType, MethodSignature, Type, TypeModel,
    WildcardType, CLONEABLE, OBJECT, SERIALIZABLE,
};
use tracing::{debug, error};

use crate::error::{ResolveError, Result};
use crate::name::{parse_type_name, Segment, TypeArg, TypeName};
use crate::ResolverConfig;

/// Upper bound on the number of types visited by a single supertype walk. Substitution through
/// pathological declarations (`class A<T> extends B<A<A<T>>>`) can grow without bound.
const MAX_SUPERTYPE_WALK: usize = 512;

/// Type registry and resolver for one compilation unit.
///
/// Wraps a read-only [`TypeModel`] snapshot; all operations are pure apart from the descriptor
/// cache and `tracing` events. Construct one per compilation unit and pass it explicitly.
pub struct Resolver<'m> {
    model: &'m dyn TypeModel,
    config: ResolverConfig,
    descriptors: DescriptorCache,
}

impl fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("cached_descriptors", &self.descriptors.len())
            .finish_non_exhaustive()
    }
}

impl<'m> Resolver<'m> {
    pub fn new(model: &'m dyn TypeModel) -> Self {
        Self::with_config(model, ResolverConfig::default())
    }

    pub fn with_config(model: &'m dyn TypeModel, config: ResolverConfig) -> Self {
        Self {
            model,
            config,
            descriptors: DescriptorCache::new(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn model(&self) -> &'m dyn TypeModel {
        self.model
    }

    /// Look up a declaration by qualified name. Binary names (`java.util.Map$Entry`) are accepted
    /// as well.
    pub fn lookup_class(&self, name: &str) -> Option<&'m ClassDecl> {
        let model = self.model;
        model.lookup_type(name).or_else(|| {
            if name.contains('$') {
                model.lookup_type(&name.replace('$', "."))
            } else {
                None
            }
        })
    }

    pub(crate) fn declaration(&self, ct: &ClassType) -> Result<&'m ClassDecl> {
        self.lookup_class(&ct.name)
            .ok_or_else(|| ResolveError::UnresolvedType {
                name: ct.name.clone(),
            })
    }

    /// Resolve a type name written in source form.
    ///
    /// Accepts primitives, qualified names, simple names found through
    /// [`ResolverConfig::implicit_imports`], dotted member types, type arguments (including
    /// wildcards) and array suffixes.
    pub fn resolve(&self, text: &str) -> Result<Type> {
        let parsed = parse_type_name(text).map_err(|reason| ResolveError::MalformedTypeName {
            text: text.to_string(),
            reason,
        })?;
        let resolved = self.resolve_parsed(text, &parsed);
        match &resolved {
            Ok(ty) => debug!(text, resolved = ?ty, "resolved type name"),
            Err(err) => debug!(text, error = %err, "type name did not resolve"),
        }
        resolved
    }

    fn resolve_parsed(&self, text: &str, parsed: &TypeName) -> Result<Type> {
        match parsed {
            TypeName::Primitive(p) => Ok(Type::Primitive(*p)),
            TypeName::Array(component) => Ok(Type::array(self.resolve_parsed(text, component)?)),
            TypeName::Named(segments) => {
                let prefixes = std::iter::once("").chain(
                    self.config
                        .implicit_imports
                        .iter()
                        .map(String::as_str),
                );
                for prefix in prefixes {
                    if let Some(ty) = self.resolve_segments(text, prefix, segments)? {
                        return Ok(ty);
                    }
                }
                Err(ResolveError::UnresolvedType {
                    name: parsed.plain_name(),
                })
            }
        }
    }

    /// Walk dotted segments: leading segments form a package until one names a class, every
    /// segment after that names a member type of the previous one.
    fn resolve_segments(
        &self,
        text: &str,
        prefix: &str,
        segments: &[Segment],
    ) -> Result<Option<Type>> {
        let mut qualified = prefix.to_string();
        let mut current: Option<Type> = None;

        for segment in segments {
            if !qualified.is_empty() {
                qualified.push('.');
            }
            qualified.push_str(&segment.ident);

            let Some(decl) = self.lookup_class(&qualified) else {
                if current.is_some() || !segment.args.is_empty() {
                    return Ok(None);
                }
                continue;
            };
            qualified = decl.name.clone();

            let args = segment
                .args
                .iter()
                .map(|arg| self.resolve_arg(text, arg))
                .collect::<Result<Vec<_>>>()?;
            if !args.is_empty() && args.len() != decl.type_params.len() {
                return Err(ResolveError::MalformedTypeName {
                    text: text.to_string(),
                    reason: format!(
                        "`{}` expects {} type argument(s), found {}",
                        decl.name,
                        decl.type_params.len(),
                        args.len()
                    ),
                });
            }

            // Only a parameterized enclosing instantiation carries information.
            let enclosing = current.take().filter(|outer| {
                matches!(outer, Type::Class(ct) if !ct.args.is_empty() || ct.enclosing.is_some())
            });
            current = Some(match enclosing {
                Some(outer) => Type::nested(outer, decl.name.clone(), args),
                None => Type::class(decl.name.clone(), args),
            });
        }

        Ok(current)
    }

    fn resolve_arg(&self, text: &str, arg: &TypeArg) -> Result<Type> {
        Ok(match arg {
            TypeArg::Type(name) => self.resolve_parsed(text, name)?,
            TypeArg::Wildcard => Type::wildcard(),
            TypeArg::Extends(bound) => Type::wildcard_extends(self.resolve_parsed(text, bound)?),
            TypeArg::Super(bound) => Type::wildcard_super(self.resolve_parsed(text, bound)?),
        })
    }

    /// JLS erasure. Unions erase to the least upper bound of their alternatives.
    ///
    /// That bound is a single erased type found breadth-first with superclasses ahead of
    /// interfaces, not the JLS intersection: `String | Integer` erases to `java.lang.Object`
    /// even though both implement `java.io.Serializable`.
    pub fn erase(&self, ty: &Type) -> Type {
        match ty {
            Type::Primitive(_) | Type::Null => ty.clone(),
            Type::Class(ct) => match self.lookup_class(&ct.name) {
                Some(decl) => self.model.erasure_of(decl),
                None => erasure(ty),
            },
            Type::Array(component) => Type::array(self.erase(component)),
            Type::TypeVar(tv) => self.erase(&tv.upper_bound),
            Type::Wildcard(w) => match &w.extends_bound {
                Some(bound) => self.erase(bound),
                None => Type::object(),
            },
            Type::Intersection(parts) => match parts.first() {
                Some(first) => self.erase(first),
                None => Type::object(),
            },
            Type::Union(alternatives) => {
                let erased: Vec<Type> = alternatives.iter().map(|alt| self.erase(alt)).collect();
                self.lub(&erased)
            }
        }
    }

    /// Least upper bound of erased types: the first type reachable breadth-first from the first
    /// alternative that every alternative is a subtype of.
    pub(crate) fn lub(&self, types: &[Type]) -> Type {
        let Some(first) = types.first() else {
            return Type::object();
        };
        if types.iter().all(|ty| ty == first) {
            return first.clone();
        }

        let mut queue = VecDeque::from([first.clone()]);
        let mut seen = HashSet::new();
        while let Some(candidate) = queue.pop_front() {
            if !seen.insert(candidate.clone()) || seen.len() > MAX_SUPERTYPE_WALK {
                continue;
            }
            if types.iter().all(|ty| self.is_subtype(ty, &candidate)) {
                return candidate;
            }
            if let Ok(supers) = self.supertypes_of(&candidate) {
                queue.extend(supers.iter().map(|s| self.erase(s)));
            }
        }
        Type::object()
    }

    /// Direct supertypes, superclass first then interfaces in declaration order, instantiated
    /// for `ty`'s type arguments.
    pub fn supertypes_of(&self, ty: &Type) -> Result<Vec<Type>> {
        match ty {
            Type::Primitive(_) | Type::Null => Ok(Vec::new()),
            Type::Class(ct) => {
                let (super_class, mut interfaces) = self.direct_supertypes(ct)?;
                let mut out: Vec<Type> = super_class.into_iter().collect();
                out.append(&mut interfaces);
                if out.is_empty() && ct.name != OBJECT {
                    out.push(Type::object());
                }
                Ok(out)
            }
            Type::Array(_) => Ok(vec![
                Type::object(),
                Type::class(CLONEABLE, vec![]),
                Type::class(SERIALIZABLE, vec![]),
            ]),
            Type::TypeVar(tv) => Ok(match tv.upper_bound.as_ref() {
                Type::Intersection(parts) => parts.clone(),
                bound => vec![bound.clone()],
            }),
            Type::Intersection(parts) => Ok(parts.clone()),
            Type::Wildcard(WildcardType { extends_bound, .. }) => Ok(vec![extends_bound
                .as_deref()
                .cloned()
                .unwrap_or_else(Type::object)]),
            Type::Union(alternatives) => {
                let erased: Vec<Type> = alternatives.iter().map(|alt| self.erase(alt)).collect();
                Ok(vec![self.lub(&erased)])
            }
        }
    }

    /// Superclass and interfaces of a class type, substituted with its bindings. Raw receivers
    /// of generic declarations see erased supertypes.
    pub(crate) fn direct_supertypes(&self, ct: &ClassType) -> Result<(Option<Type>, Vec<Type>)> {
        let decl = self.declaration(ct)?;
        let raw = self.is_raw(ct, decl);
        let bindings = self.bindings_for(ct, decl);
        let instantiate = |ty: &Type| {
            if raw {
                self.erase(ty)
            } else {
                dbc_types::substitute(ty, &bindings)
            }
        };

        // The model lists the superclass (if any) ahead of the interfaces.
        let mut supers = self.model.direct_supertypes(decl).into_iter();
        let super_class = if !decl.kind.is_interface() && decl.super_class.is_some() {
            supers.next().map(|ty| instantiate(&ty))
        } else {
            None
        };
        let interfaces = supers.map(|ty| instantiate(&ty)).collect();
        Ok((super_class, interfaces))
    }

    /// Generic declaration used without type arguments.
    pub(crate) fn is_raw(&self, ct: &ClassType, decl: &ClassDecl) -> bool {
        ct.args.is_empty() && decl.is_generic()
    }

    /// Bindings for `ct`'s own type parameters plus those of a parameterized enclosing type.
    pub(crate) fn bindings_for(&self, ct: &ClassType, decl: &ClassDecl) -> Bindings {
        let mut bindings = class_bindings(&decl.type_params, &ct.args);
        if let Some(Type::Class(outer)) = ct.enclosing.as_deref() {
            if let Some(outer_decl) = self.lookup_class(&outer.name) {
                for (name, ty) in self.bindings_for(outer, outer_decl) {
                    bindings.entry(name).or_insert(ty);
                }
            }
        }
        bindings
    }

    pub fn substitute(&self, ty: &Type, bindings: &Bindings) -> Type {
        dbc_types::substitute(ty, bindings)
    }

    /// Breadth-first search for `ty`'s view as the class named `target`, e.g. `ArrayList<String>`
    /// as `java.util.List` is `List<String>`.
    pub fn as_super(&self, ty: &Type, target: &str) -> Option<Type> {
        let mut queue = VecDeque::from([ty.clone()]);
        let mut seen = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if let Type::Class(ct) = &current {
                if ct.name == target {
                    return Some(current);
                }
            }
            if !seen.insert(current.clone()) || seen.len() > MAX_SUPERTYPE_WALK {
                continue;
            }
            match self.supertypes_of(&current) {
                Ok(supers) => queue.extend(supers),
                Err(err) => debug!(ty = ?current, error = %err, "skipping unresolved supertype"),
            }
        }
        None
    }

    /// Binary descriptor of the erasure of `ty`, memoised when
    /// [`ResolverConfig::cache_descriptors`] is set. Unlike [`to_binary_descriptor`], unions and
    /// wildcards are accepted here since their erasure is a class.
    pub fn descriptor(&self, ty: &Type) -> Result<Arc<str>> {
        let erased = self.erase(ty);
        let rendered = if self.config.cache_descriptors {
            self.descriptors.descriptor(&erased)
        } else {
            to_binary_descriptor(&erased).map(Arc::from)
        };
        rendered.map_err(|err| self.shape_error(ty, err.into()))
    }

    pub fn canonical_source(&self, ty: &Type) -> Result<String> {
        to_canonical_source(ty).map_err(|err| self.shape_error(ty, err.into()))
    }

    pub fn method_descriptor(&self, sig: &MethodSignature) -> Result<String> {
        method_descriptor(sig).map_err(|err| self.shape_error(&sig.declaring_type, err.into()))
    }

    fn shape_error(&self, ty: &Type, err: ResolveError) -> ResolveError {
        error!(ty = ?ty, error = %err, "type model produced an unrenderable type");
        err
    }

    /// Source rendering for diagnostics; never fails.
    pub(crate) fn display(&self, ty: &Type) -> String {
        to_canonical_source(ty).unwrap_or_else(|_| format!("{ty:?}"))
    }

    pub(crate) fn display_signature(&self, sig: &MethodSignature) -> String {
        method_source(sig).unwrap_or_else(|_| format!("{}(..)", sig.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbc_types::{ClassKind, TypeStore, TypeVariable};
    use pretty_assertions::assert_eq;

    #[test]
    fn binary_names_resolve_through_dollar_fallback() {
        let store = TypeStore::with_minimal_jdk();
        let resolver = Resolver::new(&store);
        let decl = resolver.lookup_class("java.util.Map$Entry").expect("Map.Entry");
        assert_eq!(decl.name, "java.util.Map.Entry");
    }

    #[test]
    fn nested_type_of_parameterized_outer_records_enclosing() {
        let mut store = TypeStore::with_minimal_jdk();
        store.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("T")],
            ..ClassDecl::new("com.example.Outer", ClassKind::Class)
        });
        store.add_class(ClassDecl {
            enclosing: Some("com.example.Outer".to_string()),
            ..ClassDecl::new("com.example.Outer.Inner", ClassKind::Class)
        });
        let resolver = Resolver::new(&store);

        assert_eq!(
            resolver.resolve("com.example.Outer<String>.Inner").unwrap(),
            Type::nested(
                Type::class("com.example.Outer", vec![Type::string()]),
                "com.example.Outer.Inner",
                vec![]
            )
        );
        assert_eq!(
            resolver.resolve("com.example.Outer.Inner").unwrap(),
            Type::class("com.example.Outer.Inner", vec![])
        );
    }

    #[test]
    fn enclosing_bindings_reach_member_types() {
        let mut store = TypeStore::with_minimal_jdk();
        let t = Type::TypeVar(TypeVariable::unbounded("T"));
        store.add_class(ClassDecl {
            type_params: vec![TypeVariable::unbounded("T")],
            ..ClassDecl::new("com.example.Outer", ClassKind::Class)
        });
        store.add_class(ClassDecl {
            enclosing: Some("com.example.Outer".to_string()),
            super_class: Some(Type::object()),
            interfaces: vec![Type::class("java.lang.Comparable", vec![t])],
            ..ClassDecl::new("com.example.Outer.Inner", ClassKind::Class)
        });
        let resolver = Resolver::new(&store);

        let inner = resolver.resolve("com.example.Outer<String>.Inner").unwrap();
        assert_eq!(
            resolver.supertypes_of(&inner).unwrap(),
            vec![
                Type::object(),
                Type::class("java.lang.Comparable", vec![Type::string()])
            ]
        );
    }

    #[test]
    fn cached_and_uncached_descriptors_agree() {
        let store = TypeStore::with_minimal_jdk();
        let cached = Resolver::new(&store);
        let uncached = Resolver::with_config(
            &store,
            ResolverConfig {
                cache_descriptors: false,
                ..ResolverConfig::default()
            },
        );
        let ty = Type::class("java.util.List", vec![Type::string()]);
        assert_eq!(
            cached.descriptor(&ty).unwrap(),
            uncached.descriptor(&ty).unwrap()
        );
        assert_eq!(&*cached.descriptor(&ty).unwrap(), "Ljava/util/List;");
    }

    #[test]
    fn unrenderable_types_surface_shape_errors() {
        let store = TypeStore::with_minimal_jdk();
        let resolver = Resolver::new(&store);
        let err = resolver.canonical_source(&Type::Union(vec![])).unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedTypeShape { .. }));
        assert!(!err.is_user_error());
    }
}
