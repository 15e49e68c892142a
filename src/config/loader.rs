//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{GatewayConfig, UpstreamConfig, PUBLIC_UPSTREAM, SERVER_UPSTREAM};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the public upstream base address.
pub const ENV_PUBLIC_BASE: &str = "GATEWAY_PUBLIC_BASE";
/// Environment variable holding the server upstream base address.
pub const ENV_SERVER_BASE: &str = "GATEWAY_SERVER_BASE";
/// Environment variable overriding the bind address.
pub const ENV_BIND: &str = "GATEWAY_BIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Resolve the startup configuration: optional file, then environment
/// overrides, then validation. This is the only place the environment is read.
pub fn resolve_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay environment-style variables onto a configuration.
///
/// Base address variables fill the named slot, creating it at the end of the
/// chain if the file did not declare it.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (var, slot) in [(ENV_PUBLIC_BASE, PUBLIC_UPSTREAM), (ENV_SERVER_BASE, SERVER_UPSTREAM)] {
        let Some(value) = lookup(var) else { continue };
        let value = value.trim().to_string();
        match config.upstream_mut(slot) {
            Some(upstream) => upstream.base_address = value,
            None => {
                let priority = config
                    .upstreams
                    .iter()
                    .map(|u| u.priority.saturating_add(1))
                    .max()
                    .unwrap_or(0);
                config.upstreams.push(UpstreamConfig::new(slot, value, priority));
            }
        }
    }

    if let Some(bind) = lookup(ENV_BIND) {
        config.listener.bind_address = bind;
    }
}
