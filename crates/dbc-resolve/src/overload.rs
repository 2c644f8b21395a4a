//! Method, field and constructor lookup with static overload resolution.
//!
//! Candidates are gathered from the receiver and its supertypes (superclass chain first, then
//! interfaces breadth-first) and tried in three phases: strict invocation, loose invocation
//! (boxing and unboxing) and variable arity. The first phase with an applicable candidate decides
//! and its most specific candidate wins.

use std::collections::{HashSet, VecDeque};

use dbc_types::{
    ClassDecl, ClassType, MemberDecl, MemberKind, MethodSignature, Modifier, Type, OBJECT,
};
use tracing::{debug, trace};

use crate::error::{ResolveError, Result};
use crate::{Conversion, Resolver};

const CONSTRUCTOR_NAME: &str = "<init>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Strict,
    Loose,
    VariableArity,
}

impl Phase {
    const ALL: [Phase; 3] = [Phase::Strict, Phase::Loose, Phase::VariableArity];

    fn conversion(self) -> Conversion {
        match self {
            Phase::Strict => Conversion::Strict,
            Phase::Loose | Phase::VariableArity => Conversion::Loose,
        }
    }
}

/// Formal parameter type matched by argument `idx`. In the variable-arity phase trailing
/// arguments match the component of the last parameter.
fn formal_at(sig: &MethodSignature, idx: usize, phase: Phase) -> Option<&Type> {
    if phase == Phase::VariableArity && idx + 1 >= sig.params.len() {
        return sig.varargs_component();
    }
    sig.params.get(idx)
}

/// Primitives and the null type have no members.
fn has_members(ty: &Type) -> bool {
    !matches!(ty, Type::Primitive(_) | Type::Null)
}

impl<'m> Resolver<'m> {
    /// Select the method `name` on `declaring` for `args`.
    ///
    /// With `is_static` only static methods qualify. When no method of that name exists and no
    /// arguments were given, a field of that name is returned instead.
    pub fn find_member(
        &self,
        declaring: &Type,
        name: &str,
        args: &[Type],
        is_static: bool,
    ) -> Result<MethodSignature> {
        debug!(
            declaring = %self.display(declaring),
            name,
            args = args.len(),
            is_static,
            "finding member"
        );
        if !has_members(declaring) {
            return Err(self.not_found(declaring, name, args));
        }
        if let Type::Class(ct) = declaring {
            self.declaration(ct)?;
        }

        let candidates = self.collect_members(declaring, name, MemberKind::Method, is_static)?;
        if candidates.is_empty() && args.is_empty() {
            if let Some(field) = self.lookup_field(declaring, name, is_static)? {
                return Ok(field);
            }
        }
        self.select(declaring, name, args, candidates)
    }

    /// The first field named `name` on `declaring` or its supertypes, as a zero-argument
    /// signature carrying [`Modifier::Field`].
    pub fn find_field(
        &self,
        declaring: &Type,
        name: &str,
        is_static: bool,
    ) -> Result<MethodSignature> {
        if !has_members(declaring) {
            return Err(self.not_found(declaring, name, &[]));
        }
        if let Type::Class(ct) = declaring {
            self.declaration(ct)?;
        }
        self.lookup_field(declaring, name, is_static)?
            .ok_or_else(|| self.not_found(declaring, name, &[]))
    }

    /// Select a constructor declared by `declaring` itself.
    pub fn find_constructor(&self, declaring: &Type, args: &[Type]) -> Result<MethodSignature> {
        let Type::Class(ct) = declaring else {
            return Err(self.not_found(declaring, CONSTRUCTOR_NAME, args));
        };
        let decl = self.declaration(ct)?;
        let candidates = self
            .model()
            .members_of(decl)
            .iter()
            .filter(|member| member.kind == MemberKind::Constructor)
            .map(|member| self.member_signature(declaring, ct, decl, member))
            .collect();
        self.select(declaring, CONSTRUCTOR_NAME, args, candidates)
    }

    fn lookup_field(
        &self,
        declaring: &Type,
        name: &str,
        is_static: bool,
    ) -> Result<Option<MethodSignature>> {
        if matches!(declaring, Type::Array(_)) && name == "length" && !is_static {
            return Ok(Some(MethodSignature {
                declaring_type: declaring.clone(),
                name: "length".to_string(),
                type_params: Vec::new(),
                params: Vec::new(),
                return_type: Type::int(),
                is_constructor: false,
                modifiers: [Modifier::Public, Modifier::Final, Modifier::Field]
                    .into_iter()
                    .collect(),
            }));
        }
        Ok(self
            .collect_members(declaring, name, MemberKind::Field, is_static)?
            .into_iter()
            .next())
    }

    /// Class types whose members are visible on `declaring`, in lookup order.
    fn search_order(&self, declaring: &Type) -> Vec<Type> {
        let mut roots = Vec::new();
        self.member_roots(declaring, &mut roots);

        let mut order = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut interfaces: VecDeque<Type> = VecDeque::new();

        for root in roots {
            let mut next = Some(root);
            while let Some(current) = next.take() {
                let Type::Class(ct) = &current else {
                    break;
                };
                if !seen.insert(ct.name.clone()) {
                    break;
                }
                match self.direct_supertypes(ct) {
                    Ok((super_class, ifaces)) => {
                        next = super_class;
                        interfaces.extend(ifaces);
                        order.push(current);
                    }
                    Err(err) => debug!(error = %err, "skipping supertype without declaration"),
                }
            }
        }

        while let Some(current) = interfaces.pop_front() {
            let Type::Class(ct) = &current else {
                continue;
            };
            if !seen.insert(ct.name.clone()) {
                continue;
            }
            match self.direct_supertypes(ct) {
                Ok((_, ifaces)) => {
                    interfaces.extend(ifaces);
                    order.push(current);
                }
                Err(err) => debug!(error = %err, "skipping supertype without declaration"),
            }
        }

        // Interfaces, arrays and type variables still see the members of Object.
        let has_object = self.lookup_class(OBJECT).is_some();
        if !order.is_empty() && !seen.contains(OBJECT) && has_object {
            order.push(Type::object());
        }
        order
    }

    fn member_roots(&self, ty: &Type, out: &mut Vec<Type>) {
        match ty {
            Type::Class(_) => out.push(ty.clone()),
            Type::Array(_) => out.push(Type::object()),
            Type::TypeVar(tv) => self.member_roots(&tv.upper_bound, out),
            Type::Intersection(parts) => {
                for part in parts {
                    self.member_roots(part, out);
                }
            }
            Type::Wildcard(w) => match &w.extends_bound {
                Some(bound) => self.member_roots(bound, out),
                None => out.push(Type::object()),
            },
            Type::Union(_) => out.push(self.erase(ty)),
            Type::Primitive(_) | Type::Null => {}
        }
    }

    /// Members of `kind` named `name`, each viewed from the supertype that declares it.
    ///
    /// A member whose erased parameter types match one already collected is overridden or hidden
    /// by it and skipped.
    fn collect_members(
        &self,
        declaring: &Type,
        name: &str,
        kind: MemberKind,
        is_static: bool,
    ) -> Result<Vec<MethodSignature>> {
        let mut found = Vec::new();
        let mut signatures: Vec<Vec<Type>> = Vec::new();

        for owner in self.search_order(declaring) {
            let Type::Class(ct) = &owner else {
                continue;
            };
            let decl = self.declaration(ct)?;
            for member in self
                .model()
                .members_of(decl)
                .iter()
                .filter(|member| member.kind == kind && member.name == name)
            {
                let sig = self.member_signature(&owner, ct, decl, member);
                let erased: Vec<Type> = sig.params.iter().map(|p| self.erase(p)).collect();
                if signatures.contains(&erased) {
                    trace!(owner = %ct.name, name, "skipping overridden member");
                    continue;
                }
                signatures.push(erased);
                if is_static && !sig.is_static() {
                    continue;
                }
                found.push(sig);
            }
        }
        Ok(found)
    }

    /// `member` as seen on `owner`: class type arguments substituted, or everything erased when
    /// `owner` is a raw type.
    fn member_signature(
        &self,
        owner: &Type,
        ct: &ClassType,
        decl: &ClassDecl,
        member: &MemberDecl,
    ) -> MethodSignature {
        let sig = member.to_signature(owner.clone());
        if self.is_raw(ct, decl) && !member.is_static() {
            return MethodSignature {
                type_params: Vec::new(),
                params: sig.params.iter().map(|p| self.erase(p)).collect(),
                return_type: self.erase(&sig.return_type),
                ..sig
            };
        }
        sig.substitute(&self.bindings_for(ct, decl))
    }

    fn select(
        &self,
        declaring: &Type,
        name: &str,
        args: &[Type],
        candidates: Vec<MethodSignature>,
    ) -> Result<MethodSignature> {
        for phase in Phase::ALL {
            let applicable: Vec<MethodSignature> = candidates
                .iter()
                .filter_map(|candidate| self.applicable(candidate, args, phase))
                .collect();
            trace!(
                ?phase,
                candidates = candidates.len(),
                applicable = applicable.len(),
                "overload phase"
            );
            if applicable.is_empty() {
                continue;
            }
            let chosen = self.most_specific(applicable, args.len(), phase)?;
            debug!(member = %self.display_signature(&chosen), ?phase, "selected member");
            return Ok(chosen);
        }
        Err(self.not_found(declaring, name, args))
    }

    /// `candidate` instantiated for `args`, if applicable in `phase`.
    fn applicable(
        &self,
        candidate: &MethodSignature,
        args: &[Type],
        phase: Phase,
    ) -> Option<MethodSignature> {
        let arity = candidate.params.len();
        let arity_matches = match phase {
            Phase::Strict | Phase::Loose => arity == args.len(),
            Phase::VariableArity => candidate.is_varargs() && args.len() + 1 >= arity,
        };
        if !arity_matches {
            return None;
        }

        let sig = if candidate.type_params.is_empty() {
            candidate.clone()
        } else {
            self.instantiate_generic(candidate, args, phase)?
        };

        let conversion = phase.conversion();
        for (idx, arg) in args.iter().enumerate() {
            let formal = formal_at(&sig, idx, phase)?;
            if !self.is_assignable(arg, formal, conversion) {
                return None;
            }
        }
        Some(sig)
    }

    /// Infer the method's type arguments and substitute them. Returns `None` when an inferred
    /// argument violates its bound.
    fn instantiate_generic(
        &self,
        candidate: &MethodSignature,
        args: &[Type],
        phase: Phase,
    ) -> Option<MethodSignature> {
        let pairs: Vec<(&Type, &Type)> = args
            .iter()
            .enumerate()
            .filter_map(|(idx, arg)| formal_at(candidate, idx, phase).map(|formal| (formal, arg)))
            .collect();
        let mut bindings = self.infer_type_arguments(&candidate.type_params, &pairs);

        for tp in &candidate.type_params {
            let Some(inferred) = bindings.get(&tp.name) else {
                continue;
            };
            let bound = self.substitute(&tp.upper_bound, &bindings);
            if !self.is_assignable(inferred, &bound, Conversion::Strict) {
                trace!(type_param = %tp.name, "inferred type argument violates its bound");
                return None;
            }
        }
        for tp in &candidate.type_params {
            if !bindings.contains_key(&tp.name) {
                let bound = self.substitute(&tp.upper_bound, &bindings);
                bindings.insert(tp.name.clone(), self.erase(&bound));
            }
        }

        let generic = MethodSignature {
            type_params: Vec::new(),
            ..candidate.clone()
        };
        Some(generic.substitute(&bindings))
    }

    fn most_specific(
        &self,
        mut applicable: Vec<MethodSignature>,
        arity: usize,
        phase: Phase,
    ) -> Result<MethodSignature> {
        if applicable.len() == 1 {
            return Ok(applicable.remove(0));
        }

        let maximal: Vec<usize> = (0..applicable.len())
            .filter(|&i| {
                (0..applicable.len()).all(|j| {
                    i == j || self.more_specific(&applicable[i], &applicable[j], arity, phase)
                })
            })
            .collect();

        if let [winner] = maximal.as_slice() {
            return Ok(applicable.swap_remove(*winner));
        }

        let reported: Vec<String> = if maximal.is_empty() {
            applicable.iter().map(|sig| self.display_signature(sig)).collect()
        } else {
            maximal
                .iter()
                .map(|&idx| self.display_signature(&applicable[idx]))
                .collect()
        };
        debug!(candidates = ?reported, "ambiguous member reference");
        Err(ResolveError::AmbiguousMember {
            candidates: reported,
        })
    }

    /// `a` is more specific than `b` when each of its parameter types is a subtype of `b`'s.
    /// When both parameter lists are equally specific, a method declared on a proper supertype
    /// of the other's declaring type loses.
    fn more_specific(
        &self,
        a: &MethodSignature,
        b: &MethodSignature,
        arity: usize,
        phase: Phase,
    ) -> bool {
        let width = match phase {
            Phase::VariableArity => arity.max(a.params.len()).max(b.params.len()),
            Phase::Strict | Phase::Loose => a.params.len(),
        };
        let params_within = |x: &MethodSignature, y: &MethodSignature| {
            (0..width).all(|idx| match (formal_at(x, idx, phase), formal_at(y, idx, phase)) {
                (Some(px), Some(py)) => self.is_subtype(px, py),
                _ => false,
            })
        };

        if !params_within(a, b) {
            return false;
        }
        if !params_within(b, a) {
            return true;
        }
        !self.is_proper_supertype(&a.declaring_type, &b.declaring_type)
    }

    fn is_proper_supertype(&self, sup: &Type, sub: &Type) -> bool {
        let (sup, sub) = (self.erase(sup), self.erase(sub));
        sup != sub && self.is_subtype(&sub, &sup)
    }

    fn not_found(&self, declaring: &Type, name: &str, args: &[Type]) -> ResolveError {
        let err = ResolveError::MemberNotFound {
            declaring_type: self.display(declaring),
            member_name: name.to_string(),
            argument_types: args.iter().map(|arg| self.display(arg)).collect(),
        };
        debug!(error = %err, "member lookup failed");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbc_types::TypeStore;

    fn sig(declaring: Type, params: Vec<Type>) -> MethodSignature {
        MethodSignature {
            declaring_type: declaring,
            name: "m".to_string(),
            type_params: Vec::new(),
            params,
            return_type: Type::void(),
            is_constructor: false,
            modifiers: [Modifier::Public].into_iter().collect(),
        }
    }

    #[test]
    fn equally_specific_parameters_prefer_the_subtype_declaration() {
        let store = TypeStore::with_minimal_jdk();
        let resolver = Resolver::new(&store);
        let on_object = sig(Type::object(), vec![Type::string()]);
        let on_string = sig(Type::string(), vec![Type::string()]);

        assert!(resolver.more_specific(&on_string, &on_object, 1, Phase::Strict));
        assert!(!resolver.more_specific(&on_object, &on_string, 1, Phase::Strict));

        let chosen = resolver
            .most_specific(vec![on_object, on_string.clone()], 1, Phase::Strict)
            .unwrap();
        assert_eq!(chosen, on_string);
    }

    #[test]
    fn search_order_is_empty_for_memberless_receivers() {
        let store = TypeStore::with_minimal_jdk();
        let resolver = Resolver::new(&store);
        assert!(resolver.search_order(&Type::int()).is_empty());
        assert!(resolver.search_order(&Type::Null).is_empty());
        assert_eq!(
            resolver.search_order(&Type::array(Type::int())),
            vec![Type::object()]
        );
    }

    #[test]
    fn variable_arity_formals_expand_to_the_component() {
        let varargs = MethodSignature {
            modifiers: [Modifier::Public, Modifier::Varargs].into_iter().collect(),
            ..sig(Type::object(), vec![Type::string(), Type::array(Type::int())])
        };
        assert_eq!(formal_at(&varargs, 0, Phase::VariableArity), Some(&Type::string()));
        assert_eq!(formal_at(&varargs, 3, Phase::VariableArity), Some(&Type::int()));
        assert_eq!(
            formal_at(&varargs, 1, Phase::Strict),
            Some(&Type::array(Type::int()))
        );
        assert_eq!(formal_at(&varargs, 2, Phase::Strict), None);
    }
}
