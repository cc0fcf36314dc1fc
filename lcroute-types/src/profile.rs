//! Route profiles: the tenant-scoped configuration binding an event match
//! to a ranking strategy and a list of candidate routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Strategy;

/// Optional activation window limiting when a profile may match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationInterval {
    /// Profile becomes eligible at this instant (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_time: Option<DateTime<Utc>>,
    /// Profile stops matching at this instant (exclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<DateTime<Utc>>,
}

impl ActivationInterval {
    /// Whether `t` falls inside the window. Unset bounds are open.
    #[must_use]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        if let Some(start) = self.activation_time
            && t < start
        {
            return false;
        }
        if let Some(end) = self.expiry_time
            && t >= end
        {
            return false;
        }
        true
    }
}

/// One candidate carrier/path inside a profile.
///
/// `id` need not be unique in the raw definition list: several entries may
/// share an ID and differ only in their filter sets; candidate resolution
/// keeps the first passing variant per ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route identifier, unique within the resolved candidate set.
    pub id: String,
    /// Eligibility filter references gating this definition.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_ids: Vec<String>,
    /// Prepaid accounts consumed before falling back to tariff cost.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_ids: Vec<String>,
    /// Tariff plans used to rate usage not covered by a balance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rating_plan_ids: Vec<String>,
    /// Resource references feeding load-distribution usage counts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_ids: Vec<String>,
    /// Stat queues feeding QOS metrics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stat_ids: Vec<String>,
    /// Static weight; primary key for `*weight`, tie-break elsewhere.
    #[serde(default)]
    pub weight: f64,
    /// When true, the caller should not attempt routes ranked after this
    /// one; the ranking itself still lists them.
    #[serde(default)]
    pub blocker: bool,
    /// Opaque parameter string passed through to the caller unmodified.
    #[serde(default)]
    pub route_parameters: String,
}

impl Route {
    /// Minimal route with only an ID and weight; other fields default.
    #[must_use]
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            filter_ids: Vec::new(),
            account_ids: Vec::new(),
            rating_plan_ids: Vec::new(),
            resource_ids: Vec::new(),
            stat_ids: Vec::new(),
            weight,
            blocker: false,
            route_parameters: String::new(),
        }
    }
}

/// A named, tenant-scoped route selection profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProfile {
    /// Owning tenant.
    pub tenant: String,
    /// Unique profile ID within the tenant.
    pub id: String,
    /// Eligibility filters the event must pass for this profile to match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_ids: Vec<String>,
    /// Optional activation window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_interval: Option<ActivationInterval>,
    /// Ranking strategy applied to the resolved candidates.
    pub sorting: Strategy,
    /// Ordered strategy parameters (QOS metric names, load shares, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting_parameters: Vec<String>,
    /// Ordered route definitions; duplicate IDs allowed, see [`Route`].
    pub routes: Vec<Route>,
    /// Profile-level weight; highest weight wins when several profiles
    /// match one event.
    #[serde(default)]
    pub weight: f64,
}

impl RouteProfile {
    /// Whether the profile's activation window admits `t`.
    #[must_use]
    pub fn active_at(&self, t: DateTime<Utc>) -> bool {
        self.activation_interval.is_none_or(|ai| ai.contains(t))
    }
}
