use std::cmp::Ordering;

use lcroute_core::{MetricValues, RouteError};
use lcroute_types::{Route, RouteEvent, RouteProfile, SortedRoute, SortingData};

use super::{collect_ids, into_stats};
use crate::service::{RouteService, adapter_call};

/// Metrics where a larger value means a better route.
const HIGHER_BETTER: &[&str] = &["*asr", "*acd", "*tcd", "*ddc"];
/// Metrics where a smaller value means a better route.
const LOWER_BETTER: &[&str] = &["*acc", "*tcc", "*pdd"];

#[derive(Clone, Copy)]
enum Cmp {
    Ge,
    Gt,
    Le,
    Lt,
}

impl Cmp {
    fn holds(self, value: f64, bound: f64) -> bool {
        match self {
            Self::Ge => value >= bound,
            Self::Gt => value > bound,
            Self::Le => value <= bound,
            Self::Lt => value < bound,
        }
    }
}

struct MetricSpec {
    name: String,
    higher_better: bool,
    threshold: Option<(Cmp, f64)>,
}

/// Rank by live quality metrics, in the order the profile lists them.
///
/// Each sorting parameter names a metric, optionally suffixed with a
/// comparison (`*asr>=35`) that excludes candidates whose recorded value
/// fails it. Candidates without samples for a metric rank after all
/// candidates that have one; final ties fall back to descending weight.
pub(crate) async fn sort(
    svc: &RouteService,
    profile: &RouteProfile,
    candidates: &[Route],
    ev: &RouteEvent,
) -> Result<Vec<SortedRoute>, RouteError> {
    let specs = parse_params(&profile.sorting_parameters)?;

    let metric_ids: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();
    let stat_ids = collect_ids(candidates, |r| &r.stat_ids);
    let values = adapter_call(
        "stats",
        svc.cfg.provider_timeout,
        svc.stats.metrics(&ev.tenant, &stat_ids, &metric_ids),
    )
    .await
    .map_err(into_stats)?;

    let mut scored: Vec<(Vec<Option<f64>>, f64, SortedRoute)> = Vec::new();
    'candidates: for route in candidates {
        let mut keys = Vec::with_capacity(specs.len());
        let mut data = SortingData {
            weight: Some(route.weight),
            ..SortingData::default()
        };
        for spec in &specs {
            let value = aggregate(&values, &route.stat_ids, &spec.name);
            if let Some((cmp, bound)) = spec.threshold
                && let Some(v) = value
                && !cmp.holds(v, bound)
            {
                tracing::debug!(route = %route.id, metric = %spec.name, value = v, "excluded by threshold");
                continue 'candidates;
            }
            if let Some(v) = value {
                data.metrics.insert(spec.name.clone(), v);
            }
            keys.push(value);
        }
        scored.push((keys, route.weight, super::entry(route, data)));
    }

    scored.sort_by(|a, b| {
        for (i, spec) in specs.iter().enumerate() {
            let ord = match (a.0[i], b.0[i]) {
                (Some(x), Some(y)) if spec.higher_better => y.total_cmp(&x),
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        b.1.total_cmp(&a.1)
    });
    Ok(scored.into_iter().map(|(_, _, sr)| sr).collect())
}

/// Average a metric across the candidate's stat queues; `None` when no
/// queue has a sample.
#[allow(clippy::cast_precision_loss)]
fn aggregate(values: &MetricValues, stat_ids: &[String], metric: &str) -> Option<f64> {
    let samples: Vec<f64> = stat_ids
        .iter()
        .filter_map(|stat| values.get(stat).and_then(|m| m.get(metric)).copied())
        .collect();
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

fn parse_params(params: &[String]) -> Result<Vec<MetricSpec>, RouteError> {
    if params.is_empty() {
        return Err(RouteError::InvalidArg(
            "*qos requires at least one metric in sorting_parameters".to_string(),
        ));
    }
    params.iter().map(|p| parse_param(p)).collect()
}

fn parse_param(param: &str) -> Result<MetricSpec, RouteError> {
    let (name, threshold) = match param.find(['>', '<']) {
        Some(pos) => {
            let (name, expr) = param.split_at(pos);
            let (cmp, bound_str) = if let Some(rest) = expr.strip_prefix(">=") {
                (Cmp::Ge, rest)
            } else if let Some(rest) = expr.strip_prefix("<=") {
                (Cmp::Le, rest)
            } else if let Some(rest) = expr.strip_prefix('>') {
                (Cmp::Gt, rest)
            } else if let Some(rest) = expr.strip_prefix('<') {
                (Cmp::Lt, rest)
            } else {
                return Err(invalid(param));
            };
            let bound: f64 = bound_str.trim().parse().map_err(|_| invalid(param))?;
            (name, Some((cmp, bound)))
        }
        None => (param, None),
    };
    let higher_better = if HIGHER_BETTER.contains(&name) {
        true
    } else if LOWER_BETTER.contains(&name) {
        false
    } else {
        return Err(RouteError::InvalidArg(format!("unknown QOS metric: {name}")));
    };
    Ok(MetricSpec {
        name: name.to_string(),
        higher_better,
        threshold,
    })
}

fn invalid(param: &str) -> RouteError {
    RouteError::InvalidArg(format!("malformed QOS parameter: {param}"))
}
