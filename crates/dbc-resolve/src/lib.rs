//! Type registry, subtyping and overload resolution for binding expressions.
//!
//! A [`Resolver`] is created per compilation unit over a read-only [`dbc_types::TypeModel`]
//! snapshot. It resolves type names written in binding expressions, walks the supertype graph
//! with generic substitution, and selects the method, field or constructor a binding expression
//! refers to using the same three-phase precedence a Java compiler uses (strict, loose, variable
//! arity).
//!
//! ```
//! use dbc_resolve::Resolver;
//! use dbc_types::{Type, TypeStore};
//!
//! let store = TypeStore::with_minimal_jdk();
//! let resolver = Resolver::new(&store);
//! let list = resolver.resolve("java.util.List<String>").unwrap();
//! let get = resolver.find_member(&list, "get", &[Type::int()], false).unwrap();
//! assert_eq!(get.return_type, Type::string());
//! ```

#![forbid(unsafe_code)]

mod config;
mod error;
mod infer;
mod name;
mod overload;
mod resolver;
mod subtyping;

pub use crate::config::ResolverConfig;
pub use crate::error::{ResolveError, Result};
pub use crate::resolver::Resolver;
pub use crate::subtyping::Conversion;
