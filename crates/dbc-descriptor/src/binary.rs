use dbc_types::{erasure, MethodSignature, PrimitiveType, Type};

use crate::error::{DescriptorError, Result};

pub fn primitive_descriptor(kind: PrimitiveType) -> char {
    match kind {
        PrimitiveType::Boolean => 'Z',
        PrimitiveType::Byte => 'B',
        PrimitiveType::Short => 'S',
        PrimitiveType::Int => 'I',
        PrimitiveType::Long => 'J',
        PrimitiveType::Char => 'C',
        PrimitiveType::Float => 'F',
        PrimitiveType::Double => 'D',
        PrimitiveType::Void => 'V',
    }
}

/// Compact erased form of `ty`: `I`, `Ljava/lang/String;`, `[[J`.
///
/// Type variables render as the descriptor of their erasure, which keeps the mapping injective
/// over erased types. Wildcards, unions, intersections and the null type have no binary form.
pub fn to_binary_descriptor(ty: &Type) -> Result<String> {
    let mut out = String::new();
    write_descriptor(&mut out, ty)?;
    Ok(out)
}

fn write_descriptor(out: &mut String, ty: &Type) -> Result<()> {
    match ty {
        Type::Primitive(p) => out.push(primitive_descriptor(*p)),
        Type::Class(ct) => {
            out.push('L');
            push_slashed(out, &ct.name);
            out.push(';');
        }
        Type::Array(component) => {
            out.push('[');
            write_descriptor(out, component)?;
        }
        Type::TypeVar(tv) => match erasure(&tv.upper_bound) {
            erased @ (Type::Class(_) | Type::Array(_)) => write_descriptor(out, &erased)?,
            _ => {
                return Err(DescriptorError::shape(format!(
                    "type variable {} with a non-class bound",
                    tv.name
                )))
            }
        },
        Type::Wildcard(_) => return Err(DescriptorError::shape("wildcard")),
        Type::Union(_) => return Err(DescriptorError::shape("union")),
        Type::Intersection(_) => return Err(DescriptorError::shape("intersection")),
        Type::Null => return Err(DescriptorError::shape("null type")),
    }
    Ok(())
}

fn push_slashed(out: &mut String, qualified: &str) {
    out.extend(qualified.chars().map(|c| if c == '.' { '/' } else { c }));
}

/// `name(params)ret`, with no separators between parameters.
///
/// Constructors are always named `<init>` and return `V`. Fields render as a bare `name:type`
/// pair since they carry no parameter list.
pub fn method_descriptor(sig: &MethodSignature) -> Result<String> {
    let mut out = String::new();
    if sig.is_field() {
        out.push_str(&sig.name);
        out.push(':');
        write_descriptor(&mut out, &sig.return_type)?;
        return Ok(out);
    }

    if sig.is_constructor {
        out.push_str("<init>");
    } else {
        out.push_str(&sig.name);
    }
    out.push('(');
    for param in &sig.params {
        write_descriptor(&mut out, param)?;
    }
    out.push(')');
    if sig.is_constructor {
        out.push('V');
    } else {
        write_descriptor(&mut out, &sig.return_type)?;
    }
    Ok(out)
}

/// Slashed name of the erased class, e.g. `java/util/Map/Entry`.
pub fn internal_name(ty: &Type) -> Result<String> {
    match erasure(ty) {
        Type::Class(ct) => {
            let mut out = String::with_capacity(ct.name.len());
            push_slashed(&mut out, &ct.name);
            Ok(out)
        }
        // Array classes are named by their descriptor.
        erased @ Type::Array(_) => to_binary_descriptor(&erased),
        other => Err(DescriptorError::shape(format!(
            "no internal name for {other:?}"
        ))),
    }
}
