use std::sync::Arc;

use rust_decimal::Decimal;

use lcroute::{MaxCost, Route, RouteError, RoutesOptions, Strategy};
use lcroute_mock::MockRater;

use crate::helpers::{builder_with, event, ids, profile};

fn plan_route(id: &str, plan: &str, weight: f64) -> Route {
    let mut r = Route::new(id, weight);
    r.rating_plan_ids = vec![plan.to_string()];
    r
}

fn svc_with_plans(profile_id: &str, event_cost: Option<Decimal>) -> lcroute::RouteService {
    let p = profile(
        profile_id,
        Strategy::LeastCost,
        vec![
            plan_route("route_cheap", "RP_CHEAP", 10.0),
            plan_route("route_mid", "RP_MID", 10.0),
            plan_route("route_dear", "RP_DEAR", 10.0),
        ],
    );
    let mut rater = MockRater::with_plans(&[
        ("RP_CHEAP", Decimal::new(1, 2)),
        ("RP_MID", Decimal::new(2, 2)),
        ("RP_DEAR", Decimal::new(4, 2)),
    ]);
    rater.event_cost = event_cost;
    builder_with(vec![p]).with_rater(Arc::new(rater)).build().unwrap()
}

fn with_ceiling(max_cost: MaxCost) -> RoutesOptions {
    RoutesOptions {
        max_cost: Some(max_cost),
        ..RoutesOptions::default()
    }
}

#[tokio::test]
async fn ceiling_drops_expensive_routes_keeping_order() {
    let svc = svc_with_plans("ROUTE_MC_1", None);
    let ev = event("mc-1").with_field("Usage", "1m");

    // 1m rates at 0.60 / 1.20 / 2.40; a 1.50 ceiling keeps the first two.
    let opts = with_ceiling(MaxCost::Absolute(Decimal::new(150, 2)));
    let ranked = svc.get_routes(&ev, &opts).await.unwrap();
    assert_eq!(ids(&ranked), vec!["route_cheap", "route_mid"]);
    assert_eq!(ranked.count, 2);
}

#[tokio::test]
async fn ceiling_below_every_cost_is_not_found() {
    let svc = svc_with_plans("ROUTE_MC_2", None);
    let ev = event("mc-2").with_field("Usage", "1m");

    let opts = with_ceiling(MaxCost::Absolute(Decimal::new(1, 2)));
    let err = svc.get_routes(&ev, &opts).await.unwrap_err();
    assert!(matches!(err, RouteError::NotFound));
}

#[tokio::test]
async fn event_cost_sentinel_uses_the_rated_event() {
    // The event itself rates at 1.20, so routes costing more drop out.
    let svc = svc_with_plans("ROUTE_MC_3", Some(Decimal::new(120, 2)));
    let ev = event("mc-3").with_field("Usage", "1m");

    let ranked = svc.get_routes(&ev, &with_ceiling(MaxCost::EventCost)).await.unwrap();
    assert_eq!(ids(&ranked), vec!["route_cheap", "route_mid"]);
}

#[tokio::test]
async fn ceiling_is_ignored_for_non_cost_strategies() {
    let p = profile(
        "ROUTE_MC_4",
        Strategy::Weight,
        vec![Route::new("route1", 10.0), Route::new("route2", 20.0)],
    );
    let svc = builder_with(vec![p]).build().unwrap();

    let opts = with_ceiling(MaxCost::Absolute(Decimal::ZERO));
    let ranked = svc.get_routes(&event("mc-4"), &opts).await.unwrap();
    assert_eq!(ids(&ranked), vec!["route2", "route1"]);
}
