use dbc_types::{ClassType, MethodSignature, Type, TypeVariable, WildcardType, OBJECT};

use crate::error::{DescriptorError, Result};

/// Render `ty` in fully-qualified source form, e.g. `java.util.Map<K,java.util.List<V>>`.
///
/// Type arguments are comma-joined without spaces. A member type of a parameterized enclosing
/// type renders as `Enclosing.Simple`. Type variables always carry their bounds (`T extends
/// java.lang.Number`), except an upper bound that is exactly `java.lang.Object`.
pub fn to_canonical_source(ty: &Type) -> Result<String> {
    let mut out = String::new();
    write_type(&mut out, ty)?;
    Ok(out)
}

fn write_type(out: &mut String, ty: &Type) -> Result<()> {
    match ty {
        Type::Primitive(p) => out.push_str(p.name()),
        Type::Null => out.push_str("null"),
        Type::Class(ct) => write_class(out, ct)?,
        Type::Array(component) => {
            write_type(out, component)?;
            out.push_str("[]");
        }
        Type::TypeVar(tv) => write_type_var(out, tv)?,
        Type::Wildcard(w) => write_wildcard(out, w)?,
        Type::Union(alternatives) => write_joined(out, alternatives, " | ", "union")?,
        Type::Intersection(bounds) => write_joined(out, bounds, " & ", "intersection")?,
    }
    Ok(())
}

fn write_class(out: &mut String, ct: &ClassType) -> Result<()> {
    match ct.enclosing.as_deref() {
        Some(enclosing) => {
            write_type(out, enclosing)?;
            out.push('.');
            out.push_str(ct.simple_name());
        }
        None => out.push_str(&ct.name),
    }

    if !ct.args.is_empty() {
        out.push('<');
        for (idx, arg) in ct.args.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            write_type(out, arg)?;
        }
        out.push('>');
    }
    Ok(())
}

fn write_type_var(out: &mut String, tv: &TypeVariable) -> Result<()> {
    out.push_str(&tv.name);
    let upper = to_canonical_source(&tv.upper_bound)?;
    if upper != OBJECT {
        out.push_str(" extends ");
        out.push_str(&upper);
    }
    if let Some(lower) = tv.effective_lower_bound() {
        out.push_str(" super ");
        write_type(out, lower)?;
    }
    Ok(())
}

fn write_wildcard(out: &mut String, w: &WildcardType) -> Result<()> {
    out.push('?');
    match (&w.extends_bound, &w.super_bound) {
        (Some(_), Some(_)) => {
            return Err(DescriptorError::shape("wildcard with both extends and super bounds"))
        }
        (Some(upper), None) => {
            out.push_str(" extends ");
            write_type(out, upper)?;
        }
        (None, Some(lower)) => {
            out.push_str(" super ");
            write_type(out, lower)?;
        }
        (None, None) => {}
    }
    Ok(())
}

fn write_joined(out: &mut String, parts: &[Type], sep: &str, what: &str) -> Result<()> {
    if parts.is_empty() {
        return Err(DescriptorError::shape(format!("empty {what} type")));
    }
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            out.push_str(sep);
        }
        write_type(out, part)?;
    }
    Ok(())
}

/// Human readable member signature, e.g. `public static <T> java.util.List<T> asList(T[])`.
///
/// Modifiers come first in canonical order, then type parameters, then the return type (methods
/// only). Constructors are named after their declaring class; fields render as `type name`.
pub fn method_source(sig: &MethodSignature) -> Result<String> {
    let mut out = String::new();
    for keyword in sig.modifiers.iter().filter_map(|m| m.keyword()) {
        out.push_str(keyword);
        out.push(' ');
    }

    if sig.is_field() {
        write_type(&mut out, &sig.return_type)?;
        out.push(' ');
        out.push_str(&sig.name);
        return Ok(out);
    }

    if !sig.type_params.is_empty() {
        out.push('<');
        for (idx, tp) in sig.type_params.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            write_type_var(&mut out, tp)?;
        }
        out.push_str("> ");
    }

    if sig.is_constructor {
        match &sig.declaring_type {
            Type::Class(ct) => out.push_str(ct.simple_name()),
            _ => out.push_str(&sig.name),
        }
    } else {
        write_type(&mut out, &sig.return_type)?;
        out.push(' ');
        out.push_str(&sig.name);
    }

    out.push('(');
    for (idx, param) in sig.params.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_type(&mut out, param)?;
    }
    out.push(')');
    Ok(out)
}
