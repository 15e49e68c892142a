//! Upstream candidates and the ordered candidate set.
//!
//! # Responsibilities
//! - Represent one network path to the shared backend
//! - Skip slots without a base address
//! - Fix the attempt order once, at startup

use crate::config::UpstreamConfig;

/// One configured network path to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCandidate {
    /// Label for diagnostics.
    pub name: String,
    /// Absolute URL prefix; may carry its own query string.
    pub base_address: String,
    /// Lower is tried first.
    pub priority: u32,
}

impl UpstreamCandidate {
    pub fn new(name: impl Into<String>, base_address: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            base_address: base_address.into(),
            priority,
        }
    }

    /// True when the slot has a base address to call.
    pub fn is_configured(&self) -> bool {
        !self.base_address.trim().is_empty()
    }
}

impl From<&UpstreamConfig> for UpstreamCandidate {
    fn from(config: &UpstreamConfig) -> Self {
        Self::new(config.name.clone(), config.base_address.trim(), config.priority)
    }
}

/// Usable candidates in attempt order.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<UpstreamCandidate>,
    skipped: usize,
}

impl CandidateSet {
    /// Build the set, dropping unconfigured slots and sorting by priority.
    /// Equal priorities keep their declaration order.
    pub fn new(candidates: impl IntoIterator<Item = UpstreamCandidate>) -> Self {
        let (mut usable, unusable): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(UpstreamCandidate::is_configured);

        for candidate in &unusable {
            tracing::debug!(candidate = %candidate.name, "Upstream slot has no base address, skipping");
        }

        usable.sort_by_key(|c| c.priority);
        Self {
            candidates: usable,
            skipped: unusable.len(),
        }
    }

    pub fn from_config(configs: &[UpstreamConfig]) -> Self {
        Self::new(configs.iter().map(UpstreamCandidate::from))
    }

    /// Candidates in the order they are attempted.
    pub fn usable(&self) -> &[UpstreamCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of slots dropped for lack of a base address.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
