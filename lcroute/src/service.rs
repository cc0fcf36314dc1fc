use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use lcroute_core::{CostRater, FilterEvaluator, ProfileStore, RouteError, StatsProvider};
use lcroute_types::{LoadPolicy, MaxCost, RouteEvent, RouteProfile, RouteServiceConfig};

/// Engine that ranks candidate routes for events according to the
/// matching profile's strategy.
pub struct RouteService {
    pub(crate) store: Arc<dyn ProfileStore>,
    pub(crate) filters: Arc<dyn FilterEvaluator>,
    pub(crate) rater: Arc<dyn CostRater>,
    pub(crate) stats: Arc<dyn StatsProvider>,
    pub(crate) cfg: RouteServiceConfig,
}

impl std::fmt::Debug for RouteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteService")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a `RouteService` with custom configuration.
pub struct RouteServiceBuilder {
    store: Option<Arc<dyn ProfileStore>>,
    filters: Option<Arc<dyn FilterEvaluator>>,
    rater: Option<Arc<dyn CostRater>>,
    stats: Option<Arc<dyn StatsProvider>>,
    cfg: RouteServiceConfig,
}

impl Default for RouteServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteServiceBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Defaults are conservative: 5s per-adapter timeout, no overall
    /// request deadline, one minute of nominal usage, usage-over-share
    /// load policy. All four adapters must be registered before `build`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            filters: None,
            rater: None,
            stats: None,
            cfg: RouteServiceConfig::default(),
        }
    }

    /// Register the profile store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register the filter evaluator.
    #[must_use]
    pub fn with_filters(mut self, filters: Arc<dyn FilterEvaluator>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Register the cost rater.
    #[must_use]
    pub fn with_rater(mut self, rater: Arc<dyn CostRater>) -> Self {
        self.rater = Some(rater);
        self
    }

    /// Register the stats provider.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<dyn StatsProvider>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Timeout applied to each individual adapter call.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Overall deadline for one selection; exceeding it abandons in-flight
    /// adapter calls and fails the selection as canceled.
    #[must_use]
    pub const fn request_timeout(mut self, deadline: Duration) -> Self {
        self.cfg.request_timeout = Some(deadline);
        self
    }

    /// Usage rated for ranking when the event carries none.
    #[must_use]
    pub const fn nominal_usage(mut self, usage: Duration) -> Self {
        self.cfg.nominal_usage = usage;
        self
    }

    /// Headroom formula for the load-distribution strategy.
    #[must_use]
    pub const fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.cfg.load_policy = policy;
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: RouteServiceConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Finalize the service.
    ///
    /// # Errors
    /// `InvalidArg` if any adapter is missing.
    pub fn build(self) -> Result<RouteService, RouteError> {
        let missing = |what: &str| RouteError::InvalidArg(format!("no {what} adapter registered"));
        Ok(RouteService {
            store: self.store.ok_or_else(|| missing("profile store"))?,
            filters: self.filters.ok_or_else(|| missing("filter"))?,
            rater: self.rater.ok_or_else(|| missing("cost"))?,
            stats: self.stats.ok_or_else(|| missing("stats"))?,
            cfg: self.cfg,
        })
    }
}

/// Wrap an adapter future with the per-call timeout.
///
/// A timed-out call surfaces as `Canceled` carrying the capability label;
/// per-candidate call sites remap it into their candidate-scoped kind so
/// `ignore_errors` can absorb it.
pub(crate) async fn adapter_call<T, Fut>(
    capability: &'static str,
    timeout: Duration,
    fut: Fut,
) -> Result<T, RouteError>
where
    Fut: Future<Output = Result<T, RouteError>>,
{
    (tokio::time::timeout(timeout, fut).await)
        .unwrap_or_else(|_| Err(RouteError::Canceled(capability)))
}

/// Apply an optional request-level deadline to a whole selection.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, RouteError>
where
    Fut: Future<Output = Result<T, RouteError>>,
{
    match deadline {
        Some(d) => (tokio::time::timeout(d, fut).await)
            .unwrap_or_else(|_| Err(RouteError::Canceled("request deadline exceeded"))),
        None => fut.await,
    }
}

impl RouteService {
    /// Start building a new `RouteService`.
    #[must_use]
    pub fn builder() -> RouteServiceBuilder {
        RouteServiceBuilder::new()
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &RouteServiceConfig {
        &self.cfg
    }

    /// Resolve the ceiling for a `MaxCost` post-filter.
    pub(crate) async fn cost_ceiling(
        &self,
        ev: &RouteEvent,
        max_cost: &MaxCost,
    ) -> Result<Decimal, RouteError> {
        match max_cost {
            MaxCost::Absolute(ceiling) => Ok(*ceiling),
            MaxCost::EventCost => {
                let usage = ev.usage().unwrap_or(self.cfg.nominal_usage);
                adapter_call(
                    "event cost",
                    self.cfg.provider_timeout,
                    self.rater.event_cost(ev, usage),
                )
                .await
            }
        }
    }

    /// Fetch one profile by tenant and ID.
    ///
    /// # Errors
    /// `NotFound` if absent; store failures propagate.
    pub async fn profile(&self, tenant: &str, id: &str) -> Result<RouteProfile, RouteError> {
        adapter_call(
            "profile store",
            self.cfg.provider_timeout,
            self.store.profile(tenant, id),
        )
        .await
    }

    /// Create or replace a profile after validating it.
    ///
    /// # Errors
    /// `InvalidArg` for an unusable definition; store failures propagate.
    pub async fn set_profile(&self, profile: RouteProfile) -> Result<(), RouteError> {
        validate_profile(&profile)?;
        tracing::debug!(tenant = %profile.tenant, profile = %profile.id, "storing profile");
        adapter_call(
            "profile store",
            self.cfg.provider_timeout,
            self.store.set_profile(profile),
        )
        .await
    }

    /// Remove a profile.
    ///
    /// # Errors
    /// `NotFound` if absent; store failures propagate.
    pub async fn remove_profile(&self, tenant: &str, id: &str) -> Result<(), RouteError> {
        tracing::debug!(tenant, profile = id, "removing profile");
        adapter_call(
            "profile store",
            self.cfg.provider_timeout,
            self.store.remove_profile(tenant, id),
        )
        .await
    }

    /// IDs of all profiles of a tenant, in store order.
    pub async fn profile_ids(&self, tenant: &str) -> Result<Vec<String>, RouteError> {
        adapter_call(
            "profile store",
            self.cfg.provider_timeout,
            self.store.profile_ids(tenant),
        )
        .await
    }
}

fn validate_profile(profile: &RouteProfile) -> Result<(), RouteError> {
    if profile.tenant.is_empty() {
        return Err(RouteError::InvalidArg("profile tenant is empty".to_string()));
    }
    if profile.id.is_empty() {
        return Err(RouteError::InvalidArg("profile ID is empty".to_string()));
    }
    if profile.routes.iter().any(|r| r.id.is_empty()) {
        return Err(RouteError::InvalidArg(format!(
            "profile {} has a route with an empty ID",
            profile.id
        )));
    }
    Ok(())
}
