use serde::{Deserialize, Serialize};

/// Per-compilation-unit resolver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Packages searched, in order, when a simple type name is not found as written.
    pub implicit_imports: Vec<String>,
    /// Render diagnostics as single-line JSON records instead of plain text.
    pub encode_errors: bool,
    /// Memoise binary descriptors per resolver.
    pub cache_descriptors: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            implicit_imports: vec!["java.lang".to_string()],
            encode_errors: false,
            cache_descriptors: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_import_java_lang() {
        let config = ResolverConfig::default();
        assert_eq!(config.implicit_imports, vec!["java.lang".to_string()]);
        assert!(!config.encode_errors);
        assert!(config.cache_descriptors);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"encode_errors": true}"#).expect("config should parse");
        assert!(config.encode_errors);
        assert_eq!(config.implicit_imports, ResolverConfig::default().implicit_imports);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ResolverConfig>(r#"{"imports": []}"#).is_err());
    }
}
