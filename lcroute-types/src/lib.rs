//! Data model shared across the lcroute route-selection workspace.
#![warn(missing_docs)]

mod config;
mod event;
mod options;
mod profile;
mod sorted;
mod strategy;

pub use config::{LoadPolicy, RouteServiceConfig};
pub use event::{DurationParseError, RouteEvent, parse_duration};
pub use options::{MaxCost, Paginator, RoutesOptions};
pub use profile::{ActivationInterval, Route, RouteProfile};
pub use sorted::{SortedRoute, SortedRoutes, SortingData};
pub use strategy::{Strategy, StrategyParseError};
