//! lcroute ranks the viable outbound routes for real-time telecom events.
//!
//! Overview
//! - Matches tenant-scoped route profiles against incoming call/session
//!   events, picking the heaviest active profile whose filters pass.
//! - Collapses duplicate route IDs to one candidate each (first variant
//!   whose filters pass wins) and ranks the candidates with the profile's
//!   strategy: static weight, least/highest computed cost, live QOS
//!   metrics or load distribution.
//! - Cost strategies price every candidate concurrently, consuming
//!   prepaid balances before tariff plans; an optional `MaxCost` ceiling
//!   and a paginator post-process the ranking.
//! - External collaborators (filters, rating, stats, profile storage) sit
//!   behind the `lcroute_core` adapter traits, each call bounded by a
//!   per-adapter timeout and the whole selection by an optional deadline.
//!
//! Key behaviors and trade-offs
//! - Either a full ranking or an error; a failing candidate aborts the
//!   selection unless `ignore_errors` drops it instead.
//! - All sorts are stable: candidates equal under every key keep their
//!   definition order, so results are reproducible.
//! - The `NOT_FOUND` error text is a wire contract with existing clients.
//!
//! Building a service and ranking an event:
//! ```rust,ignore
//! use std::sync::Arc;
//! use lcroute::{RouteService, RouteEvent, RoutesOptions};
//!
//! let service = RouteService::builder()
//!     .with_store(store)
//!     .with_filters(filters)
//!     .with_rater(rater)
//!     .with_stats(stats)
//!     .request_timeout(std::time::Duration::from_millis(200))
//!     .build()?;
//!
//! let ev = RouteEvent::new("cgrates.org", "call-1")
//!     .with_field("Account", "1001")
//!     .with_field("Destination", "+4986517174963")
//!     .with_field("Usage", "1m20s");
//! let ranked = service.get_routes(&ev, &RoutesOptions::default()).await?;
//! for route in &ranked.routes {
//!     println!("{} {:?}", route.route_id, route.sorting_data.cost);
//! }
//! ```
#![warn(missing_docs)]

mod selector;
pub(crate) mod service;
mod sorters;

pub use service::{RouteService, RouteServiceBuilder};

// Re-export the adapter contracts and domain types for convenience.
pub use lcroute_core::{
    CostRater, Coverage, FilterEvaluator, MetricValues, ProfileStore, Rate, RouteError,
    StatsProvider,
};
pub use lcroute_types::{
    ActivationInterval, LoadPolicy, MaxCost, Paginator, Route, RouteEvent, RouteProfile,
    RouteServiceConfig, RoutesOptions, SortedRoute, SortedRoutes, SortingData, Strategy,
};
