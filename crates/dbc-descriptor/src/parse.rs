use dbc_types::{PrimitiveType, Type};

use crate::error::{DescriptorError, Result};

/// A parsed `name(params)ret` descriptor. `name` is empty for a bare `(params)ret`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
}

pub fn parse_field_descriptor(desc: &str) -> Result<Type> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(DescriptorError::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let Some(open) = desc.find('(') else {
        return Err(DescriptorError::InvalidDescriptor(desc.to_string()));
    };
    let name = &desc[..open];

    let mut rest = &desc[open + 1..];
    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(DescriptorError::InvalidDescriptor(desc.to_string()));
        }
        let (param, after) = parse_field_type(rest)?;
        if param.is_void() {
            return Err(DescriptorError::InvalidDescriptor(desc.to_string()));
        }
        params.push(param);
        rest = after;
    }

    if rest.is_empty() {
        return Err(DescriptorError::InvalidDescriptor(desc.to_string()));
    }
    let (return_type, rest) = parse_field_type(rest)?;
    if !rest.is_empty() {
        return Err(DescriptorError::InvalidDescriptor(desc.to_string()));
    }

    Ok(MethodDescriptor {
        name: name.to_string(),
        params,
        return_type,
    })
}

fn parse_field_type(input: &str) -> Result<(Type, &str)> {
    let Some(first) = input.chars().next() else {
        return Err(DescriptorError::InvalidDescriptor(input.to_string()));
    };
    let primitive = match first {
        'Z' => Some(PrimitiveType::Boolean),
        'B' => Some(PrimitiveType::Byte),
        'S' => Some(PrimitiveType::Short),
        'I' => Some(PrimitiveType::Int),
        'J' => Some(PrimitiveType::Long),
        'C' => Some(PrimitiveType::Char),
        'F' => Some(PrimitiveType::Float),
        'D' => Some(PrimitiveType::Double),
        'V' => Some(PrimitiveType::Void),
        _ => None,
    };
    if let Some(p) = primitive {
        return Ok((Type::Primitive(p), &input[1..]));
    }

    match first {
        'L' => {
            let Some(end) = input.find(';') else {
                return Err(DescriptorError::InvalidDescriptor(input.to_string()));
            };
            let name = &input[1..end];
            if name.is_empty() {
                return Err(DescriptorError::InvalidDescriptor(input.to_string()));
            }
            Ok((Type::class(name.replace('/', "."), vec![]), &input[end + 1..]))
        }
        '[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            if component.is_void() {
                return Err(DescriptorError::InvalidDescriptor(input.to_string()));
            }
            Ok((Type::array(component), rest))
        }
        _ => Err(DescriptorError::InvalidDescriptor(input.to_string())),
    }
}
