//! Strategy implementations producing the ranked candidate list.
//!
//! Each sorter takes the resolved candidates in definition order and
//! returns `SortedRoute` entries in rank order. All sorts are stable, so
//! candidates equal under every key keep their definition order.

use lcroute_core::RouteError;
use lcroute_types::{Route, RouteEvent, RouteProfile, RoutesOptions, SortedRoute, SortingData, Strategy};

use crate::service::RouteService;

mod cost;
mod load;
mod qos;
mod weight;

pub(crate) async fn sort(
    svc: &RouteService,
    profile: &RouteProfile,
    candidates: &[Route],
    ev: &RouteEvent,
    opts: &RoutesOptions,
) -> Result<Vec<SortedRoute>, RouteError> {
    match profile.sorting {
        Strategy::Weight => Ok(weight::sort(candidates)),
        Strategy::LeastCost => cost::sort(svc, candidates, ev, opts, cost::Order::Ascending).await,
        Strategy::HighestCost => {
            cost::sort(svc, candidates, ev, opts, cost::Order::Descending).await
        }
        Strategy::Qos => qos::sort(svc, profile, candidates, ev).await,
        Strategy::LoadDistribution => load::sort(svc, profile, candidates, ev).await,
        other => Err(RouteError::InvalidArg(format!(
            "unsupported sorting strategy: {other}"
        ))),
    }
}

fn into_stats(e: RouteError) -> RouteError {
    match e {
        e @ RouteError::Stats(_) => e,
        other => RouteError::Stats(other.to_string()),
    }
}

/// Deduplicated union of per-route reference IDs, first occurrence wins.
fn collect_ids<'a>(
    candidates: &'a [Route],
    pick: impl Fn(&'a Route) -> &'a [String],
) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for route in candidates {
        for id in pick(route) {
            if seen.insert(id.as_str()) {
                out.push(id.clone());
            }
        }
    }
    out
}

fn entry(route: &Route, data: SortingData) -> SortedRoute {
    SortedRoute {
        route_id: route.id.clone(),
        route_parameters: route.route_parameters.clone(),
        blocker: route.blocker,
        sorting_data: data,
    }
}
