//! lcroute-core
//!
//! Adapter traits and the unified error model shared across the lcroute
//! workspace.
//!
//! - `adapters`: the `FilterEvaluator`, `CostRater`, `StatsProvider` and
//!   `ProfileStore` traits the engine consumes.
//! - `error`: the `RouteError` enum every operation returns.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Adapter traits are `async_trait` traits with `Send + Sync` bounds and
//! are expected to run under a Tokio 1.x runtime; the engine bounds each
//! adapter call with `tokio::time::timeout`.
#![warn(missing_docs)]

/// Adapter traits for the engine's external collaborators.
pub mod adapters;
mod error;

pub use adapters::{Coverage, CostRater, FilterEvaluator, MetricValues, ProfileStore, Rate, StatsProvider};
pub use error::RouteError;
