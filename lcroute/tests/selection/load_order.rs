use std::sync::Arc;

use lcroute::{LoadPolicy, Route, RoutesOptions, Strategy};
use lcroute_mock::MockStats;

use crate::helpers::{builder_with, event, ids, profile};

fn counted_route(id: &str, stat: &str, weight: f64) -> Route {
    let mut r = Route::new(id, weight);
    r.stat_ids = vec![stat.to_string()];
    r
}

fn load_profile(id: &str, params: &[&str], routes: Vec<Route>) -> lcroute::RouteProfile {
    let mut p = profile(id, Strategy::LoadDistribution, routes);
    p.sorting_parameters = params.iter().map(ToString::to_string).collect();
    p
}

#[tokio::test]
async fn least_loaded_share_ranks_first() {
    // carrier1 runs at 4/2 of its share, carrier2 at 1/2.
    let p = load_profile(
        "ROUTE_LOAD_1",
        &["carrier1:2", "carrier2:2"],
        vec![
            counted_route("carrier1", "Stat_C1", 10.0),
            counted_route("carrier2", "Stat_C2", 10.0),
        ],
    );
    let stats = MockStats::default()
        .with_usage("Stat_C1", 4.0)
        .with_usage("Stat_C2", 1.0);
    let svc = builder_with(vec![p]).with_stats(Arc::new(stats)).build().unwrap();

    let ranked = svc
        .get_routes(&event("load-1"), &RoutesOptions::default())
        .await
        .unwrap();
    assert_eq!(ids(&ranked), vec!["carrier2", "carrier1"]);
    let data = &ranked.routes[0].sorting_data;
    assert_eq!(data.load, Some(1.0));
    assert_eq!(data.ratio, Some(0.5));
}

#[tokio::test]
async fn default_share_and_weight_fallback() {
    // carrier1 gets the *default share, carrier2 falls back to its weight.
    let p = load_profile(
        "ROUTE_LOAD_2",
        &["*default:10"],
        vec![
            counted_route("carrier1", "Stat_C1", 10.0),
            counted_route("carrier2", "Stat_C2", 2.0),
        ],
    );
    let stats = MockStats::default()
        .with_usage("Stat_C1", 5.0)
        .with_usage("Stat_C2", 4.0);
    let svc = builder_with(vec![p]).with_stats(Arc::new(stats)).build().unwrap();

    let ranked = svc
        .get_routes(&event("load-2"), &RoutesOptions::default())
        .await
        .unwrap();
    // 5/10 = 0.5 beats 4/2 = 2.0 despite the higher absolute count.
    assert_eq!(ids(&ranked), vec!["carrier1", "carrier2"]);
}

#[tokio::test]
async fn unreported_candidates_count_as_idle() {
    let p = load_profile(
        "ROUTE_LOAD_3",
        &["*default:2"],
        vec![
            counted_route("carrier_busy", "Stat_Busy", 10.0),
            counted_route("carrier_idle", "Stat_Missing", 10.0),
        ],
    );
    let stats = MockStats::default().with_usage("Stat_Busy", 3.0);
    let svc = builder_with(vec![p]).with_stats(Arc::new(stats)).build().unwrap();

    let ranked = svc
        .get_routes(&event("load-3"), &RoutesOptions::default())
        .await
        .unwrap();
    assert_eq!(ids(&ranked), vec!["carrier_idle", "carrier_busy"]);
    assert_eq!(ranked.routes[0].sorting_data.load, Some(0.0));
}

#[tokio::test]
async fn free_share_policy_prefers_absolute_headroom() {
    // Relative load favors carrier_small (1/4 < 6/20), absolute headroom
    // favors carrier_big (14 free vs 3 free).
    let p = load_profile(
        "ROUTE_LOAD_4",
        &["carrier_big:20", "carrier_small:4"],
        vec![
            counted_route("carrier_big", "Stat_Big", 10.0),
            counted_route("carrier_small", "Stat_Small", 10.0),
        ],
    );
    let stats = MockStats::default()
        .with_usage("Stat_Big", 6.0)
        .with_usage("Stat_Small", 1.0);

    let svc = builder_with(vec![p.clone()])
        .with_stats(Arc::new(
            MockStats::default()
                .with_usage("Stat_Big", 6.0)
                .with_usage("Stat_Small", 1.0),
        ))
        .build()
        .unwrap();
    let ranked = svc
        .get_routes(&event("load-4"), &RoutesOptions::default())
        .await
        .unwrap();
    assert_eq!(ids(&ranked), vec!["carrier_small", "carrier_big"]);

    let svc = builder_with(vec![p])
        .with_stats(Arc::new(stats))
        .load_policy(LoadPolicy::FreeShare)
        .build()
        .unwrap();
    let ranked = svc
        .get_routes(&event("load-4"), &RoutesOptions::default())
        .await
        .unwrap();
    assert_eq!(ids(&ranked), vec!["carrier_big", "carrier_small"]);
}

#[tokio::test]
async fn equal_load_breaks_ties_by_descending_weight() {
    let p = load_profile(
        "ROUTE_LOAD_5",
        &["*default:2"],
        vec![
            counted_route("carrier_light", "Stat_A", 10.0),
            counted_route("carrier_heavy", "Stat_B", 30.0),
        ],
    );
    let stats = MockStats::default()
        .with_usage("Stat_A", 1.0)
        .with_usage("Stat_B", 1.0);
    let svc = builder_with(vec![p]).with_stats(Arc::new(stats)).build().unwrap();

    let ranked = svc
        .get_routes(&event("load-5"), &RoutesOptions::default())
        .await
        .unwrap();
    assert_eq!(ids(&ranked), vec!["carrier_heavy", "carrier_light"]);
}
