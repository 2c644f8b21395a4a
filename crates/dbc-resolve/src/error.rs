use dbc_descriptor::DescriptorError;
use serde::Serialize;
use thiserror::Error;

use crate::ResolverConfig;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Resolution failures. None of these are retried: the inputs are immutable, so a second attempt
/// always reaches the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveError {
    /// The name does not resolve against the type model. Usually a typo in a binding expression.
    #[error("cannot resolve type `{name}`")]
    UnresolvedType { name: String },

    #[error("malformed type name `{text}`: {reason}")]
    MalformedTypeName { text: String, reason: String },

    /// The type model produced a shape nothing here can handle. Always an upstream defect.
    #[error("unsupported type shape: {shape}")]
    UnsupportedTypeShape { shape: String },

    #[error(
        "cannot find member `{member_name}({})` on `{declaring_type}`",
        .argument_types.join(",")
    )]
    MemberNotFound {
        declaring_type: String,
        member_name: String,
        argument_types: Vec<String>,
    },

    #[error("ambiguous member reference, candidates: {}", .candidates.join("; "))]
    AmbiguousMember { candidates: Vec<String> },
}

impl ResolveError {
    /// Single-line JSON record: `kind`, `message` and the variant's own fields.
    pub fn encode(&self) -> String {
        let mut value = match serde_json::to_value(self) {
            Ok(value) => value,
            Err(_) => serde_json::Value::Object(serde_json::Map::new()),
        };
        if let Some(fields) = value.as_object_mut() {
            fields.insert(
                "message".to_string(),
                serde_json::Value::String(self.to_string()),
            );
        }
        value.to_string()
    }

    /// Render for a diagnostic sink, honouring [`ResolverConfig::encode_errors`].
    pub fn render(&self, config: &ResolverConfig) -> String {
        if config.encode_errors {
            self.encode()
        } else {
            self.to_string()
        }
    }

    /// `true` for errors caused by user input rather than by a broken type model.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ResolveError::UnsupportedTypeShape { .. })
    }
}

impl From<DescriptorError> for ResolveError {
    fn from(err: DescriptorError) -> Self {
        match err {
            DescriptorError::UnsupportedTypeShape { shape } => {
                ResolveError::UnsupportedTypeShape { shape }
            }
            DescriptorError::InvalidDescriptor(desc) => ResolveError::UnsupportedTypeShape {
                shape: format!("invalid descriptor {desc}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encoded_errors_are_single_line_json() {
        let err = ResolveError::UnresolvedType {
            name: "com.does.not.Exist".to_string(),
        };
        let encoded = err.encode();
        assert!(!encoded.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["kind"], "unresolved_type");
        assert_eq!(value["name"], "com.does.not.Exist");
        assert_eq!(value["message"], "cannot resolve type `com.does.not.Exist`");
    }

    #[test]
    fn render_follows_config() {
        let err = ResolveError::MemberNotFound {
            declaring_type: "java.lang.String".to_string(),
            member_name: "frobnicate".to_string(),
            argument_types: vec!["int".to_string(), "java.lang.Object".to_string()],
        };
        assert_eq!(
            err.render(&ResolverConfig::default()),
            "cannot find member `frobnicate(int,java.lang.Object)` on `java.lang.String`"
        );

        let config = ResolverConfig {
            encode_errors: true,
            ..ResolverConfig::default()
        };
        assert!(err.render(&config).starts_with('{'));
    }

    #[test]
    fn descriptor_errors_map_to_shape_errors() {
        let err: ResolveError = DescriptorError::UnsupportedTypeShape {
            shape: "wildcard".to_string(),
        }
        .into();
        assert!(!err.is_user_error());
        assert_eq!(err.to_string(), "unsupported type shape: wildcard");
    }
}
