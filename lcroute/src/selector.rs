use std::collections::HashSet;

use chrono::Utc;

use lcroute_core::RouteError;
use lcroute_types::{Route, RouteEvent, RouteProfile, RoutesOptions, SortedRoutes};

use crate::service::{RouteService, adapter_call, with_request_deadline};
use crate::sorters;

impl RouteService {
    /// Rank the viable routes for an event.
    ///
    /// Matches profiles, resolves duplicate-ID candidates, applies the
    /// profile's strategy, then the optional cost ceiling and pagination.
    /// Either a full ranking or an error; never a partial result.
    ///
    /// # Errors
    /// `NotFound` when no profile matches or no candidate survives;
    /// adapter failures propagate unless absorbed by
    /// [`ignore_errors`](RoutesOptions::ignore_errors).
    #[tracing::instrument(
        name = "lcroute::get_routes",
        skip(self, ev, opts),
        fields(tenant = %ev.tenant, event = %ev.id),
    )]
    pub async fn get_routes(
        &self,
        ev: &RouteEvent,
        opts: &RoutesOptions,
    ) -> Result<SortedRoutes, RouteError> {
        with_request_deadline(self.cfg.request_timeout, self.select(ev, opts)).await
    }

    async fn select(
        &self,
        ev: &RouteEvent,
        opts: &RoutesOptions,
    ) -> Result<SortedRoutes, RouteError> {
        let profile = self.matching_profile(ev).await?;
        tracing::debug!(
            profile = %profile.id,
            strategy = %profile.sorting,
            "selected profile"
        );

        let candidates = self.resolve_candidates(&profile, ev, opts).await?;
        if candidates.is_empty() {
            return Err(RouteError::NotFound);
        }

        let mut ranked = sorters::sort(self, &profile, &candidates, ev, opts).await?;

        if let Some(max_cost) = &opts.max_cost
            && profile.sorting.produces_cost()
        {
            let ceiling = self.cost_ceiling(ev, max_cost).await?;
            ranked.retain(|r| r.sorting_data.cost.is_some_and(|c| c <= ceiling));
            tracing::debug!(%ceiling, kept = ranked.len(), "applied cost ceiling");
        }
        if ranked.is_empty() {
            return Err(RouteError::NotFound);
        }

        let count = ranked.len();
        opts.paginator.paginate(&mut ranked);

        Ok(SortedRoutes {
            profile_id: profile.id,
            sorting: profile.sorting,
            count,
            routes: ranked,
        })
    }

    /// All profiles matching an event: owned by its tenant, active at the
    /// event time and passing their eligibility filters, in store order.
    ///
    /// # Errors
    /// `NotFound` when none match.
    pub async fn profiles_for_event(
        &self,
        ev: &RouteEvent,
    ) -> Result<Vec<RouteProfile>, RouteError> {
        let at = ev.time.unwrap_or_else(Utc::now);
        let all = adapter_call(
            "profile store",
            self.cfg.provider_timeout,
            self.store.profiles_for_tenant(&ev.tenant),
        )
        .await?;

        let mut matched = Vec::new();
        for profile in all {
            if !profile.active_at(at) {
                continue;
            }
            if !profile.filter_ids.is_empty() {
                let pass = adapter_call(
                    "filters",
                    self.cfg.provider_timeout,
                    self.filters.pass(&ev.tenant, &profile.filter_ids, ev),
                )
                .await
                .map_err(into_filter)?;
                if !pass {
                    continue;
                }
            }
            matched.push(profile);
        }
        if matched.is_empty() {
            return Err(RouteError::NotFound);
        }
        Ok(matched)
    }

    /// The single profile governing this event: highest weight among the
    /// matches, earliest in store order on ties.
    async fn matching_profile(&self, ev: &RouteEvent) -> Result<RouteProfile, RouteError> {
        let mut matched = self.profiles_for_event(ev).await?.into_iter();
        let Some(mut best) = matched.next() else {
            return Err(RouteError::NotFound);
        };
        for profile in matched {
            if profile.weight > best.weight {
                best = profile;
            }
        }
        Ok(best)
    }

    /// Collapse the profile's route definitions into one candidate per
    /// RouteID.
    ///
    /// Definitions are scanned in order; for each distinct ID the first
    /// variant whose filters pass becomes the candidate, later variants of
    /// a decided ID are skipped without evaluation. A failing filter
    /// adapter aborts the selection unless `ignore_errors` is set, in
    /// which case the variant is treated as non-passing.
    pub(crate) async fn resolve_candidates(
        &self,
        profile: &RouteProfile,
        ev: &RouteEvent,
        opts: &RoutesOptions,
    ) -> Result<Vec<Route>, RouteError> {
        let mut decided: HashSet<&str> = HashSet::new();
        let mut resolved = Vec::new();
        for route in &profile.routes {
            if decided.contains(route.id.as_str()) {
                continue;
            }
            let pass = if route.filter_ids.is_empty() {
                true
            } else {
                match adapter_call(
                    "filters",
                    self.cfg.provider_timeout,
                    self.filters.pass(&ev.tenant, &route.filter_ids, ev),
                )
                .await
                {
                    Ok(pass) => pass,
                    Err(e) if opts.ignore_errors => {
                        tracing::warn!(route = %route.id, error = %e, "skipping route variant");
                        false
                    }
                    Err(e) => return Err(into_filter(e)),
                }
            };
            if pass {
                decided.insert(route.id.as_str());
                resolved.push(route.clone());
            }
        }
        tracing::debug!(
            profile = %profile.id,
            defined = profile.routes.len(),
            resolved = resolved.len(),
            "resolved candidates"
        );
        Ok(resolved)
    }
}

fn into_filter(e: RouteError) -> RouteError {
    match e {
        e @ RouteError::Filter(_) => e,
        other => RouteError::Filter(other.to_string()),
    }
}
