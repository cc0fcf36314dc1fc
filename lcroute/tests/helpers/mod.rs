#![allow(dead_code)]

use std::sync::Arc;

use lcroute::{
    Route, RouteEvent, RouteProfile, RouteService, RouteServiceBuilder, SortedRoutes, Strategy,
};
use lcroute_mock::{MemoryProfileStore, MockFilters, MockRater, MockStats};

pub const TENANT: &str = "cgrates.org";

static TRACING: std::sync::Once = std::sync::Once::new();

/// Honor `RUST_LOG` when debugging a failing test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn profile(id: &str, sorting: Strategy, routes: Vec<Route>) -> RouteProfile {
    RouteProfile {
        tenant: TENANT.to_string(),
        id: id.to_string(),
        filter_ids: vec![],
        activation_interval: None,
        sorting,
        sorting_parameters: vec![],
        routes,
        weight: 10.0,
    }
}

/// Builder pre-wired with permissive mocks; tests override what they need.
pub fn builder_with(profiles: Vec<RouteProfile>) -> RouteServiceBuilder {
    init_tracing();
    RouteService::builder()
        .with_store(Arc::new(MemoryProfileStore::with_profiles(profiles)))
        .with_filters(Arc::new(MockFilters::pass_all()))
        .with_rater(Arc::new(MockRater::default()))
        .with_stats(Arc::new(MockStats::default()))
}

pub fn event(id: &str) -> RouteEvent {
    RouteEvent::new(TENANT, id)
}

pub fn ids(ranked: &SortedRoutes) -> Vec<&str> {
    ranked.route_ids()
}
