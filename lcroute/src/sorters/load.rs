use std::collections::HashMap;

use lcroute_core::RouteError;
use lcroute_types::{LoadPolicy, Route, RouteEvent, RouteProfile, SortedRoute, SortingData};

use super::{collect_ids, into_stats};
use crate::service::{RouteService, adapter_call};

/// Rank to spread traffic relative to configured shares.
///
/// A candidate's live usage is the sum of the counts reported for its
/// stat and resource references; its share comes from the profile's
/// sorting parameters (`route_id:share`, `*default:share`) and falls back
/// to the route weight. The configured [`LoadPolicy`] decides whether
/// relative load or absolute headroom drives the order; ties fall back to
/// descending weight.
pub(crate) async fn sort(
    svc: &RouteService,
    profile: &RouteProfile,
    candidates: &[Route],
    ev: &RouteEvent,
) -> Result<Vec<SortedRoute>, RouteError> {
    let shares = parse_shares(&profile.sorting_parameters)?;

    let mut ids = collect_ids(candidates, |r| &r.stat_ids);
    for id in collect_ids(candidates, |r| &r.resource_ids) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    let counts = adapter_call(
        "stats",
        svc.cfg.provider_timeout,
        svc.stats.usages(&ev.tenant, &ids),
    )
    .await
    .map_err(into_stats)?;

    let mut scored: Vec<(f64, f64, SortedRoute)> = Vec::with_capacity(candidates.len());
    for route in candidates {
        let used: f64 = route
            .stat_ids
            .iter()
            .chain(&route.resource_ids)
            .filter_map(|id| counts.get(id))
            .sum();
        let share = shares.share_for(route);

        let mut data = SortingData {
            weight: Some(route.weight),
            load: Some(used),
            ..SortingData::default()
        };
        let key = match svc.cfg.load_policy {
            LoadPolicy::UsageOverShare => {
                if share > 0.0 {
                    let ratio = used / share;
                    data.ratio = Some(ratio);
                    ratio
                } else {
                    // Shareless candidates take traffic last.
                    f64::INFINITY
                }
            }
            LoadPolicy::FreeShare => {
                if share > 0.0 {
                    data.ratio = Some(used / share);
                }
                -(share - used)
            }
            _ => {
                return Err(RouteError::InvalidArg(format!(
                    "unsupported load policy: {:?}",
                    svc.cfg.load_policy
                )));
            }
        };
        scored.push((key, route.weight, super::entry(route, data)));
    }

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.1.total_cmp(&a.1)));
    Ok(scored.into_iter().map(|(_, _, sr)| sr).collect())
}

struct Shares {
    per_route: HashMap<String, f64>,
    default: Option<f64>,
}

impl Shares {
    fn share_for(&self, route: &Route) -> f64 {
        self.per_route
            .get(&route.id)
            .copied()
            .or(self.default)
            .unwrap_or(route.weight)
    }
}

fn parse_shares(params: &[String]) -> Result<Shares, RouteError> {
    let mut per_route = HashMap::new();
    let mut default = None;
    for param in params {
        let Some((id, share_str)) = param.split_once(':') else {
            return Err(RouteError::InvalidArg(format!(
                "malformed load share (want id:share): {param}"
            )));
        };
        let share: f64 = share_str.trim().parse().map_err(|_| {
            RouteError::InvalidArg(format!("malformed load share (want id:share): {param}"))
        })?;
        if id == "*default" {
            default = Some(share);
        } else {
            per_route.insert(id.to_string(), share);
        }
    }
    Ok(Shares { per_route, default })
}
