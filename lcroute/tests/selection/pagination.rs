use lcroute::{Paginator, Route, RoutesOptions, Strategy};
use proptest::prelude::*;

use crate::helpers::{builder_with, event, ids, profile};

fn five_routes() -> Vec<Route> {
    (1..=5)
        .map(|i| Route::new(format!("route{i}"), f64::from(60 - i * 10)))
        .collect()
}

fn paged(limit: Option<usize>, offset: Option<usize>) -> RoutesOptions {
    RoutesOptions {
        paginator: Paginator { limit, offset },
        ..RoutesOptions::default()
    }
}

#[tokio::test]
async fn window_applies_after_count_is_fixed() {
    let p = profile("ROUTE_PAGE_1", Strategy::Weight, five_routes());
    let svc = builder_with(vec![p]).build().unwrap();

    let ranked = svc
        .get_routes(&event("page-1"), &paged(Some(2), Some(1)))
        .await
        .unwrap();
    assert_eq!(ranked.count, 5);
    assert_eq!(ids(&ranked), vec!["route2", "route3"]);
}

#[tokio::test]
async fn offset_past_the_end_yields_an_empty_page() {
    let p = profile("ROUTE_PAGE_2", Strategy::Weight, five_routes());
    let svc = builder_with(vec![p]).build().unwrap();

    let ranked = svc
        .get_routes(&event("page-2"), &paged(None, Some(10)))
        .await
        .unwrap();
    assert_eq!(ranked.count, 5);
    assert!(ranked.routes.is_empty());
}

proptest! {
    #[test]
    fn window_is_always_a_contiguous_slice(
        items in proptest::collection::vec(0usize..100, 0..20),
        limit in proptest::option::of(0usize..25),
        offset in proptest::option::of(0usize..25),
    ) {
        let mut windowed = items.clone();
        Paginator { limit, offset }.paginate(&mut windowed);

        let start = offset.unwrap_or(0).min(items.len());
        let end = limit.map_or(items.len(), |l| (start + l).min(items.len()));
        prop_assert_eq!(windowed, items[start..end].to_vec());
    }
}

#[tokio::test]
async fn limit_zero_is_honored() {
    let p = profile("ROUTE_PAGE_3", Strategy::Weight, five_routes());
    let svc = builder_with(vec![p]).build().unwrap();

    let ranked = svc
        .get_routes(&event("page-3"), &paged(Some(0), None))
        .await
        .unwrap();
    assert_eq!(ranked.count, 5);
    assert!(ranked.routes.is_empty());
}
