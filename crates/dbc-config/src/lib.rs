//! Configuration for the binding compiler's type resolution core.
//!
//! A [`BinderConfig`] is read from TOML and split into the resolver settings handed to
//! [`dbc_resolve::Resolver::with_config`] and the logging settings used by [`init_tracing`].

#![forbid(unsafe_code)]

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;

pub use dbc_resolve::ResolverConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinderConfig {
    pub logging: LoggingConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Either a simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Force `debug` regardless of `level`.
    #[serde(default)]
    pub enable_debug_logs: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    /// Directives from the configuration alone.
    pub fn config_directives(&self) -> String {
        if self.enable_debug_logs {
            return "debug".to_owned();
        }
        Self::normalize_level_directives(&self.level)
    }

    /// Configured directives with `env` (usually `RUST_LOG`) appended so it can refine them.
    pub fn directives(&self, env: Option<&str>) -> String {
        let config = self.config_directives();
        match env.map(str::trim).filter(|value| !value.is_empty()) {
            Some(env) => format!("{config},{env}"),
            None => config,
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        tracing_subscriber::EnvFilter::try_new(self.config_directives()).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter, with `RUST_LOG` merged in when set.
    ///
    /// Invalid combined directives fall back to `RUST_LOG` alone, then to the configured level,
    /// then to `info`.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env = std::env::var("RUST_LOG").ok();
        match env.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
            Some(env_directives) => {
                tracing_subscriber::EnvFilter::try_new(self.directives(Some(env_directives)))
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            enable_debug_logs: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl BinderConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: BinderConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded binder config");
        Ok(config)
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// Returns `false` when a global subscriber was already installed; the existing one is kept.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = config.env_filter();

    let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed()
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(layer);
    let installed = tracing::subscriber::set_global_default(subscriber).is_ok();
    if installed {
        tracing::debug!(
            target: "dbc.config",
            level = %config.config_directives(),
            json = config.json,
            "tracing initialized"
        );
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_levels_are_normalized() {
        assert_eq!(LoggingConfig::normalize_level_directives(" WARNING "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives("Debug"), "debug");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
        assert_eq!(
            LoggingConfig::normalize_level_directives("dbc_resolve=trace,info"),
            "dbc_resolve=trace,info"
        );
    }

    #[test]
    fn debug_flag_overrides_level() {
        let config = LoggingConfig {
            level: "error".to_owned(),
            enable_debug_logs: true,
            ..LoggingConfig::default()
        };
        assert_eq!(config.config_directives(), "debug");
    }

    #[test]
    fn env_directives_are_appended() {
        let config = LoggingConfig::default();
        assert_eq!(config.directives(None), "info");
        assert_eq!(config.directives(Some("  ")), "info");
        assert_eq!(
            config.directives(Some("dbc_resolve=trace")),
            "info,dbc_resolve=trace"
        );
    }

    #[test]
    fn toml_errors_omit_source_snippet() {
        let err = BinderConfig::load_from_str("[logging]\njson = \"yes\"\n").unwrap_err();
        let ConfigError::Toml(message) = err else {
            panic!("expected toml error, got {err:?}");
        };
        assert!(!message.contains("json = "), "{message}");
    }
}
