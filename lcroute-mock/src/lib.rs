//! Deterministic in-memory adapters for examples and integration tests.
//!
//! Every mock starts with a harmless default (filters pass, no rates, no
//! balances, no samples) and can be tailored per test, either through the
//! table fields or by installing a closure that overrides the whole call.
#![allow(clippy::type_complexity)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use lcroute_core::{
    CostRater, Coverage, FilterEvaluator, MetricValues, ProfileStore, Rate, RouteError,
    StatsProvider,
};
use lcroute_types::{RouteEvent, RouteProfile};

type PassFn = dyn Fn(&str, &[String], &RouteEvent) -> Result<bool, RouteError> + Send + Sync;
type RateFn = dyn Fn(&RouteEvent, &[String], Duration) -> Result<Rate, RouteError> + Send + Sync;
type CoverageFn =
    dyn Fn(&RouteEvent, &[String], Duration) -> Result<Coverage, RouteError> + Send + Sync;
type EventCostFn = dyn Fn(&RouteEvent, Duration) -> Result<Decimal, RouteError> + Send + Sync;

async fn maybe_delay(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Filter adapter whose default is to pass everything.
///
/// Set `passing` to restrict which filter IDs evaluate to true, or install
/// `pass_fn` to script arbitrary behavior.
#[derive(Default)]
pub struct MockFilters {
    /// When set, a rule set passes only if every referenced ID is in here.
    pub passing: Option<Vec<String>>,
    /// Full override; wins over `passing`.
    pub pass_fn: Option<Box<PassFn>>,
    /// Artificial latency per call, for timeout tests.
    pub delay_ms: u64,
}

impl MockFilters {
    /// Adapter that passes every rule set.
    #[must_use]
    pub fn pass_all() -> Self {
        Self::default()
    }

    /// Adapter that passes only the listed filter IDs.
    #[must_use]
    pub fn passing_only(ids: &[&str]) -> Self {
        Self {
            passing: Some(ids.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl FilterEvaluator for MockFilters {
    async fn pass(
        &self,
        tenant: &str,
        filter_ids: &[String],
        ev: &RouteEvent,
    ) -> Result<bool, RouteError> {
        maybe_delay(self.delay_ms).await;
        if let Some(f) = &self.pass_fn {
            return f(tenant, filter_ids, ev);
        }
        match &self.passing {
            Some(known) => Ok(filter_ids.iter().all(|id| known.contains(id))),
            None => Ok(true),
        }
    }
}

/// Cost adapter backed by per-second prices and prepaid balances.
///
/// `rate` picks the first plan present in `per_second` and charges
/// `price * seconds`; `coverage` picks the first account present in
/// `balances`. Closures override the table lookups entirely.
#[derive(Default)]
pub struct MockRater {
    /// Price per second of usage, keyed by rating plan ID.
    pub per_second: HashMap<String, Decimal>,
    /// Remaining prepaid time, keyed by account ID.
    pub balances: HashMap<String, Duration>,
    /// Fixed answer for `event_cost`; absent means the call fails.
    pub event_cost: Option<Decimal>,
    /// Full overrides.
    pub rate_fn: Option<Box<RateFn>>,
    /// See `rate_fn`.
    pub coverage_fn: Option<Box<CoverageFn>>,
    /// See `rate_fn`.
    pub event_cost_fn: Option<Box<EventCostFn>>,
    /// Artificial latency per call, for timeout tests.
    pub delay_ms: u64,
}

impl MockRater {
    /// Rater with the given per-second plan prices and no balances.
    #[must_use]
    pub fn with_plans(plans: &[(&str, Decimal)]) -> Self {
        Self {
            per_second: plans
                .iter()
                .map(|(id, p)| ((*id).to_string(), *p))
                .collect(),
            ..Self::default()
        }
    }

    /// Add a prepaid balance, consuming and returning the rater.
    #[must_use]
    pub fn with_balance(mut self, account: &str, remaining: Duration) -> Self {
        self.balances.insert(account.to_string(), remaining);
        self
    }

    fn price_for<'a>(&self, rating_plan_ids: &'a [String]) -> Option<(&'a str, Decimal)> {
        rating_plan_ids
            .iter()
            .find_map(|id| self.per_second.get(id).map(|p| (id.as_str(), *p)))
    }
}

/// Charge a per-second price for a usage, at millisecond resolution.
#[must_use]
pub fn charge(per_second: Decimal, usage: Duration) -> Decimal {
    let ms = i64::try_from(usage.as_millis()).unwrap_or(i64::MAX);
    per_second * Decimal::new(ms, 3)
}

#[async_trait]
impl CostRater for MockRater {
    async fn rate(
        &self,
        ev: &RouteEvent,
        rating_plan_ids: &[String],
        usage: Duration,
    ) -> Result<Rate, RouteError> {
        maybe_delay(self.delay_ms).await;
        if let Some(f) = &self.rate_fn {
            return f(ev, rating_plan_ids, usage);
        }
        let (id, price) = self
            .price_for(rating_plan_ids)
            .ok_or_else(|| RouteError::InvalidArg(format!("no rate for {rating_plan_ids:?}")))?;
        Ok(Rate {
            cost: charge(price, usage),
            rating_plan_id: id.to_string(),
        })
    }

    async fn coverage(
        &self,
        ev: &RouteEvent,
        account_ids: &[String],
        usage: Duration,
    ) -> Result<Coverage, RouteError> {
        maybe_delay(self.delay_ms).await;
        if let Some(f) = &self.coverage_fn {
            return f(ev, account_ids, usage);
        }
        let (id, remaining) = account_ids
            .iter()
            .find_map(|id| self.balances.get(id).map(|b| (id.clone(), *b)))
            .ok_or_else(|| RouteError::InvalidArg(format!("no balance for {account_ids:?}")))?;
        Ok(Coverage {
            account_id: id,
            covered: remaining.min(usage),
            max_usage: remaining,
        })
    }

    async fn event_cost(&self, ev: &RouteEvent, usage: Duration) -> Result<Decimal, RouteError> {
        maybe_delay(self.delay_ms).await;
        if let Some(f) = &self.event_cost_fn {
            return f(ev, usage);
        }
        self.event_cost
            .ok_or_else(|| RouteError::InvalidArg("no event cost configured".to_string()))
    }
}

/// Stats adapter answering from fixed tables.
#[derive(Default)]
pub struct MockStats {
    /// `stat_id -> metric -> value`; absent entries model queues with no
    /// recorded samples.
    pub metrics: MetricValues,
    /// Live usage counts keyed by stat/resource ID.
    pub usages: HashMap<String, f64>,
    /// When set, every call fails with this message.
    pub fail_with: Option<String>,
    /// Artificial latency per call, for timeout tests.
    pub delay_ms: u64,
}

impl MockStats {
    /// Record one metric sample for a stat queue.
    #[must_use]
    pub fn with_metric(mut self, stat_id: &str, metric: &str, value: f64) -> Self {
        self.metrics
            .entry(stat_id.to_string())
            .or_default()
            .insert(metric.to_string(), value);
        self
    }

    /// Record a live usage count.
    #[must_use]
    pub fn with_usage(mut self, id: &str, value: f64) -> Self {
        self.usages.insert(id.to_string(), value);
        self
    }
}

#[async_trait]
impl StatsProvider for MockStats {
    async fn metrics(
        &self,
        _tenant: &str,
        stat_ids: &[String],
        metric_ids: &[String],
    ) -> Result<MetricValues, RouteError> {
        maybe_delay(self.delay_ms).await;
        if let Some(msg) = &self.fail_with {
            return Err(RouteError::Stats(msg.clone()));
        }
        let mut out = MetricValues::new();
        for stat in stat_ids {
            if let Some(all) = self.metrics.get(stat) {
                let wanted: HashMap<String, f64> = all
                    .iter()
                    .filter(|(m, _)| metric_ids.contains(m))
                    .map(|(m, v)| (m.clone(), *v))
                    .collect();
                if !wanted.is_empty() {
                    out.insert(stat.clone(), wanted);
                }
            }
        }
        Ok(out)
    }

    async fn usages(
        &self,
        _tenant: &str,
        resource_ids: &[String],
    ) -> Result<HashMap<String, f64>, RouteError> {
        maybe_delay(self.delay_ms).await;
        if let Some(msg) = &self.fail_with {
            return Err(RouteError::Stats(msg.clone()));
        }
        Ok(resource_ids
            .iter()
            .filter_map(|id| self.usages.get(id).map(|v| (id.clone(), *v)))
            .collect())
    }
}

/// In-memory profile store preserving insertion order per tenant.
///
/// Insertion order is the deterministic order `profiles_for_tenant`
/// promises, which makes equally-weighted profile ties reproducible in
/// tests.
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<Vec<RouteProfile>>,
}

impl MemoryProfileStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with profiles, kept in the given order.
    #[must_use]
    pub fn with_profiles(profiles: Vec<RouteProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn profile(&self, tenant: &str, id: &str) -> Result<RouteProfile, RouteError> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|p| p.tenant == tenant && p.id == id)
            .cloned()
            .ok_or(RouteError::NotFound)
    }

    async fn profiles_for_tenant(&self, tenant: &str) -> Result<Vec<RouteProfile>, RouteError> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .filter(|p| p.tenant == tenant)
            .cloned()
            .collect())
    }

    async fn set_profile(&self, profile: RouteProfile) -> Result<(), RouteError> {
        let mut guard = self.profiles.write().await;
        match guard
            .iter_mut()
            .find(|p| p.tenant == profile.tenant && p.id == profile.id)
        {
            Some(slot) => *slot = profile,
            None => guard.push(profile),
        }
        Ok(())
    }

    async fn remove_profile(&self, tenant: &str, id: &str) -> Result<(), RouteError> {
        let mut guard = self.profiles.write().await;
        let before = guard.len();
        guard.retain(|p| !(p.tenant == tenant && p.id == id));
        if guard.len() == before {
            return Err(RouteError::NotFound);
        }
        Ok(())
    }

    async fn profile_ids(&self, tenant: &str) -> Result<Vec<String>, RouteError> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .filter(|p| p.tenant == tenant)
            .map(|p| p.id.clone())
            .collect())
    }
}
