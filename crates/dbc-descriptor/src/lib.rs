//! Canonical string forms of types and member signatures.
//!
//! Two renderings exist for every [`dbc_types::Type`]:
//!
//! - the *source* form (`java.util.Set<java.lang.String>`), readable and fully qualified;
//! - the *binary descriptor* form (`Ljava/util/Set;`, `(I)V`), compact, erased and injective over
//!   erased types. Generated code uses descriptor strings as identity keys, so they must be stable
//!   across runs for identical input.

#![forbid(unsafe_code)]

mod binary;
mod cache;
mod error;
mod parse;
mod source;

pub use crate::binary::{internal_name, method_descriptor, primitive_descriptor, to_binary_descriptor};
pub use crate::cache::DescriptorCache;
pub use crate::error::{DescriptorError, Result};
pub use crate::parse::{parse_field_descriptor, parse_method_descriptor, MethodDescriptor};
pub use crate::source::{method_source, to_canonical_source};
