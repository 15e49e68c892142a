//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check upstream slots are uniquely named and ordered
//! - Validate value ranges (statuses, timeouts, prefixes)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duplicate upstream name `{0}`")]
    DuplicateUpstreamName(String),

    #[error("upstream `{name}` reuses priority {priority}")]
    DuplicatePriority { name: String, priority: u32 },

    #[error("upstream `{name}` has invalid base address `{address}`")]
    InvalidBaseAddress { name: String, address: String },

    #[error("{field} contains invalid HTTP status {status}")]
    InvalidStatus { field: &'static str, status: u16 },

    #[error("route prefix `{0}` must start with `/` and name a segment")]
    InvalidRoutePrefix(String),

    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    let mut priorities = HashSet::new();
    for upstream in &config.upstreams {
        if !names.insert(upstream.name.as_str()) {
            errors.push(ValidationError::DuplicateUpstreamName(upstream.name.clone()));
        }
        if !priorities.insert(upstream.priority) {
            errors.push(ValidationError::DuplicatePriority {
                name: upstream.name.clone(),
                priority: upstream.priority,
            });
        }
        if !upstream.base_address.trim().is_empty() && !is_http_url(&upstream.base_address) {
            errors.push(ValidationError::InvalidBaseAddress {
                name: upstream.name.clone(),
                address: upstream.base_address.clone(),
            });
        }
    }

    if !is_valid_status(config.retries.retry_status) {
        errors.push(ValidationError::InvalidStatus {
            field: "retries.retry_status",
            status: config.retries.retry_status,
        });
    }
    for &status in &config.fallback.try_next_statuses {
        if !is_valid_status(status) {
            errors.push(ValidationError::InvalidStatus {
                field: "fallback.try_next_statuses",
                status,
            });
        }
    }

    let prefix = &config.listener.route_prefix;
    if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
        errors.push(ValidationError::InvalidRoutePrefix(prefix.clone()));
    }

    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(address: &str) -> bool {
    Url::parse(address)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn is_valid_status(status: u16) -> bool {
    (100..=599).contains(&status)
}
