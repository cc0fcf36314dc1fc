//! Traits for the external capabilities the engine consumes.
//!
//! The engine treats every collaborator — filter evaluation, cost rating,
//! stats aggregation, profile lookup — as an async adapter behind one of
//! these traits. Adapters own their transport, retries and locking; the
//! engine only fans out calls, applies timeouts and joins results.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::RouteError;
use lcroute_types::{RouteEvent, RouteProfile};

/// Boolean pass/fail evaluation of a rule set against an event.
#[async_trait]
pub trait FilterEvaluator: Send + Sync {
    /// Whether the event passes all of `filter_ids` for `tenant`.
    ///
    /// An empty filter list passes by definition; adapters may assume
    /// `filter_ids` is non-empty.
    async fn pass(
        &self,
        tenant: &str,
        filter_ids: &[String],
        ev: &RouteEvent,
    ) -> Result<bool, RouteError>;
}

/// Cost of rating a usage against a tariff plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    /// Monetary cost of the rated usage.
    pub cost: Decimal,
    /// Tariff plan that produced the price.
    pub rating_plan_id: String,
}

/// Prepaid-balance coverage for a usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    /// Account whose balance was applied.
    pub account_id: String,
    /// Portion of the queried usage the balance covers at zero cost.
    pub covered: Duration,
    /// Usage the balance can still absorb in total, even if unused by
    /// this call.
    pub max_usage: Duration,
}

/// Rating and prepaid-balance queries.
///
/// Balance-touching calls may reserve or debit-simulate against a live
/// ledger; they are stateful, at most once per candidate per selection,
/// and not idempotent across selections.
#[async_trait]
pub trait CostRater: Send + Sync {
    /// Rate `usage` for the event against the first applicable plan in
    /// `rating_plan_ids`.
    async fn rate(
        &self,
        ev: &RouteEvent,
        rating_plan_ids: &[String],
        usage: Duration,
    ) -> Result<Rate, RouteError>;

    /// How much of `usage` the prepaid balances of `account_ids` cover.
    async fn coverage(
        &self,
        ev: &RouteEvent,
        account_ids: &[String],
        usage: Duration,
    ) -> Result<Coverage, RouteError>;

    /// Cost of the event itself, rated through the caller's own account or
    /// subject. Supports the `*event_cost` ceiling sentinel.
    async fn event_cost(&self, ev: &RouteEvent, usage: Duration) -> Result<Decimal, RouteError>;
}

/// Aggregated metric values per stat queue: `stat_id -> metric -> value`.
pub type MetricValues = HashMap<String, HashMap<String, f64>>;

/// Live aggregated statistics consumed by the QOS and load-distribution
/// strategies.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Current values of `metric_ids` for each of `stat_ids`.
    ///
    /// Queues or metrics with no recorded samples are simply absent from
    /// the result; only a total adapter failure is an error.
    async fn metrics(
        &self,
        tenant: &str,
        stat_ids: &[String],
        metric_ids: &[String],
    ) -> Result<MetricValues, RouteError>;

    /// Live usage counts for the given stat/resource references.
    async fn usages(
        &self,
        tenant: &str,
        resource_ids: &[String],
    ) -> Result<HashMap<String, f64>, RouteError>;
}

/// Profile definitions, consumed by the engine as a read path.
///
/// The write half is the external management surface; it lives on the
/// same trait so one store implementation serves both. `get`/`remove` of a
/// missing profile fail with [`RouteError::NotFound`].
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch one profile by tenant and ID.
    async fn profile(&self, tenant: &str, id: &str) -> Result<RouteProfile, RouteError>;

    /// All profiles of a tenant, in a deterministic order; this order is
    /// the secondary key when equally-weighted profiles match one event.
    async fn profiles_for_tenant(&self, tenant: &str) -> Result<Vec<RouteProfile>, RouteError>;

    /// Create or replace a profile.
    async fn set_profile(&self, profile: RouteProfile) -> Result<(), RouteError>;

    /// Remove a profile; NotFound if absent.
    async fn remove_profile(&self, tenant: &str, id: &str) -> Result<(), RouteError>;

    /// IDs of all profiles of a tenant, same order as
    /// [`profiles_for_tenant`](Self::profiles_for_tenant).
    async fn profile_ids(&self, tenant: &str) -> Result<Vec<String>, RouteError>;
}
