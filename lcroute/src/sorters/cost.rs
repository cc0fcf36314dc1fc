use std::time::Duration;

use rust_decimal::Decimal;

use lcroute_core::RouteError;
use lcroute_types::{Route, RouteEvent, RoutesOptions, SortedRoute, SortingData};

use crate::service::{RouteService, adapter_call};

#[derive(Clone, Copy)]
pub(crate) enum Order {
    Ascending,
    Descending,
}

/// Rank by computed monetary cost, ties broken by descending weight.
///
/// Candidates are priced concurrently. A candidate whose rating fails is
/// dropped when `ignore_errors` is set, otherwise the failure aborts the
/// whole selection.
pub(crate) async fn sort(
    svc: &RouteService,
    candidates: &[Route],
    ev: &RouteEvent,
    opts: &RoutesOptions,
    order: Order,
) -> Result<Vec<SortedRoute>, RouteError> {
    let usage = ev.usage().unwrap_or(svc.cfg.nominal_usage);
    let tasks = candidates.iter().map(|route| price(svc, route, ev, usage));
    let results = futures::future::join_all(tasks).await;

    let mut priced: Vec<(Decimal, f64, SortedRoute)> = Vec::with_capacity(candidates.len());
    for (route, result) in candidates.iter().zip(results) {
        match result {
            Ok((cost, sr)) => priced.push((cost, route.weight, sr)),
            Err(e) if opts.ignore_errors && e.is_candidate_scoped() => {
                tracing::warn!(route = %route.id, error = %e, "dropping unpriceable candidate");
            }
            Err(e) => return Err(e),
        }
    }

    priced.sort_by(|a, b| {
        let by_cost = match order {
            Order::Ascending => a.0.cmp(&b.0),
            Order::Descending => b.0.cmp(&a.0),
        };
        by_cost.then_with(|| b.1.total_cmp(&a.1))
    });
    Ok(priced.into_iter().map(|(_, _, sr)| sr).collect())
}

/// Price one candidate: prepaid balances first, tariff for the rest.
async fn price(
    svc: &RouteService,
    route: &Route,
    ev: &RouteEvent,
    usage: Duration,
) -> Result<(Decimal, SortedRoute), RouteError> {
    let timeout = svc.cfg.provider_timeout;
    let mut data = SortingData {
        weight: Some(route.weight),
        ..SortingData::default()
    };

    let cost = if route.account_ids.is_empty() {
        if route.rating_plan_ids.is_empty() {
            return Err(RouteError::cost(
                &route.id,
                "neither accounts nor rating plans configured",
            ));
        }
        let rate = adapter_call(
            "rate",
            timeout,
            svc.rater.rate(ev, &route.rating_plan_ids, usage),
        )
        .await
        .map_err(|e| scoped(route, e))?;
        data.rating_plan_id = Some(rate.rating_plan_id);
        rate.cost
    } else {
        let coverage = adapter_call(
            "coverage",
            timeout,
            svc.rater.coverage(ev, &route.account_ids, usage),
        )
        .await
        .map_err(|e| scoped(route, e))?;
        data.account_id = Some(coverage.account_id);
        data.max_usage = Some(coverage.max_usage);
        if coverage.covered >= usage {
            Decimal::ZERO
        } else {
            let rate = adapter_call(
                "rate",
                timeout,
                svc.rater
                    .rate(ev, &route.rating_plan_ids, usage - coverage.covered),
            )
            .await
            .map_err(|e| scoped(route, e))?;
            data.rating_plan_id = Some(rate.rating_plan_id);
            rate.cost
        }
    };

    data.cost = Some(cost);
    Ok((cost, super::entry(route, data)))
}

fn scoped(route: &Route, e: RouteError) -> RouteError {
    match e {
        e @ RouteError::Cost { .. } => e,
        other => RouteError::cost(&route.id, other.to_string()),
    }
}
