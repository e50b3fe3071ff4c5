//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ShellConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the deployment mode ("development" / "production").
pub const ENV_MODE: &str = "MEDISCOPE_MODE";
/// Overrides the backend origin.
pub const ENV_BACKEND_ORIGIN: &str = "MEDISCOPE_BACKEND_ORIGIN";
/// Overrides `deployment.same_origin` ("true" / "false").
pub const ENV_SAME_ORIGIN: &str = "MEDISCOPE_SAME_ORIGIN";
/// Overrides the listener bind address.
pub const ENV_BIND_ADDRESS: &str = "MEDISCOPE_BIND_ADDRESS";

/// Error type for configuration loading. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Validation(vec![e])
    }
}

/// Load and validate configuration from a TOML file, then apply environment overrides.
///
/// A missing file is not an error when `optional` is set: defaults are used instead.
pub fn load_config(path: &Path, optional: bool) -> Result<ShellConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)?,
        Err(e) if optional && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            ShellConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse configuration from a TOML string without touching the environment.
pub fn parse_config(content: &str) -> Result<ShellConfig, ConfigError> {
    let config: ShellConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `MEDISCOPE_*` overrides read through `lookup`.
pub fn apply_env_overrides(
    config: &mut ShellConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(mode) = lookup(ENV_MODE) {
        config.deployment.mode = mode
            .parse()
            .map_err(|reason| ConfigError::Env { var: ENV_MODE, reason })?;
    }

    if let Some(origin) = lookup(ENV_BACKEND_ORIGIN) {
        let origin = origin.trim();
        config.deployment.backend_origin = if origin.is_empty() {
            None
        } else {
            Some(origin.to_string())
        };
    }

    if let Some(same_origin) = lookup(ENV_SAME_ORIGIN) {
        config.deployment.same_origin = match same_origin.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            other => {
                return Err(ConfigError::Env {
                    var: ENV_SAME_ORIGIN,
                    reason: format!("expected a boolean, got '{}'", other),
                })
            }
        };
    }

    if let Some(bind) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Mode;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn env_overrides_deployment() {
        let mut config = ShellConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_MODE, "production"),
                (ENV_BACKEND_ORIGIN, "https://mediscope-2-server.onrender.com"),
                (ENV_SAME_ORIGIN, "false"),
            ]),
        )
        .unwrap();

        assert_eq!(config.deployment.mode, Mode::Production);
        assert!(!config.deployment.same_origin);
        assert_eq!(
            config.deployment.backend_origin.as_deref(),
            Some("https://mediscope-2-server.onrender.com")
        );
    }

    #[test]
    fn bad_env_value_is_reported() {
        let mut config = ShellConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(ENV_SAME_ORIGIN, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(ENV_SAME_ORIGIN));
    }

    #[test]
    fn missing_optional_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("mediscope-shell-does-not-exist.toml");
        assert!(!matches!(load_config(&path, true), Err(ConfigError::Io { .. })));
        assert!(matches!(load_config(&path, false), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = parse_config(
            r#"
            [deployment]
            backend_origin = "not a url"
            [pages]
            render_timeout_ms = 0
            "#,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("render_timeout_ms"));
    }
}
