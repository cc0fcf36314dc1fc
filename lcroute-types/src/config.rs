//! Configuration for the route-selection engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Headroom formula used by the load-distribution strategy.
///
/// The exact normalization is an operator policy choice, so it is
/// configurable rather than hard-wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LoadPolicy {
    /// Rank by `used / share` ascending: the candidate least loaded
    /// relative to its share comes first.
    #[default]
    UsageOverShare,
    /// Rank by `share - used` descending: the candidate with the most
    /// absolute free share comes first.
    FreeShare,
}

/// Global configuration for a `RouteService`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteServiceConfig {
    /// Timeout for individual adapter calls (filters, rating, stats).
    pub provider_timeout: Duration,
    /// Optional overall deadline for one selection. Exceeding it abandons
    /// in-flight adapter calls and fails the selection as canceled.
    pub request_timeout: Option<Duration>,
    /// Usage rated when the event carries none; ranking only, never billed.
    pub nominal_usage: Duration,
    /// Headroom formula for the load-distribution strategy.
    pub load_policy: LoadPolicy,
}

impl Default for RouteServiceConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(5),
            request_timeout: None,
            nominal_usage: Duration::from_secs(60),
            load_policy: LoadPolicy::default(),
        }
    }
}
