//! Ranked selection results.

use std::collections::BTreeMap;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Strategy;

/// Strategy-specific computed annotations attached to one ranked route.
///
/// Serialized as a sparse map: only the values the strategy actually
/// computed appear, so the key set varies by strategy and by whether a
/// prepaid balance covered the usage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortingData {
    /// Computed monetary cost (least/highest-cost strategies).
    #[serde(rename = "Cost", default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    /// Static route weight used for ranking or tie-breaking.
    #[serde(rename = "Weight", default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Tariff plan that priced the (remainder of the) usage.
    #[serde(
        rename = "RatingPlanID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rating_plan_id: Option<String>,
    /// Prepaid account whose balance covered (part of) the usage.
    #[serde(rename = "Account", default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Usage the covering balance can still absorb, in nanoseconds.
    #[serde(
        rename = "MaxUsage",
        default,
        skip_serializing_if = "Option::is_none",
        with = "opt_duration_ns"
    )]
    pub max_usage: Option<Duration>,
    /// Live usage count observed by the load-distribution strategy.
    #[serde(rename = "Load", default, skip_serializing_if = "Option::is_none")]
    pub load: Option<f64>,
    /// Load relative to the configured share.
    #[serde(rename = "Ratio", default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// QOS metric values actually used to rank this candidate, keyed by
    /// metric wire name. Candidates without samples carry no entries.
    #[serde(flatten, default)]
    pub metrics: BTreeMap<String, f64>,
}

/// One ranked candidate in a selection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortedRoute {
    /// Resolved route identifier; unique within one result.
    #[serde(rename = "RouteID")]
    pub route_id: String,
    /// Opaque parameter string from the route definition.
    #[serde(rename = "RouteParameters", default, skip_serializing_if = "String::is_empty")]
    pub route_parameters: String,
    /// When true, the caller should stop after this route fails.
    #[serde(rename = "Blocker", default, skip_serializing_if = "std::ops::Not::not")]
    pub blocker: bool,
    /// Strategy-specific annotations.
    #[serde(rename = "SortingData")]
    pub sorting_data: SortingData,
}

/// The ordered outcome of one route selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortedRoutes {
    /// Profile that produced this ranking.
    #[serde(rename = "ProfileID")]
    pub profile_id: String,
    /// Strategy that ordered it.
    #[serde(rename = "Sorting")]
    pub sorting: Strategy,
    /// Number of entries surviving post-filtering (before pagination).
    #[serde(rename = "Count")]
    pub count: usize,
    /// Ranked candidates.
    #[serde(rename = "SortedRoutes")]
    pub routes: Vec<SortedRoute>,
}

impl SortedRoutes {
    /// RouteIDs in rank order, mostly for assertions and logging.
    #[must_use]
    pub fn route_ids(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.route_id.as_str()).collect()
    }
}

mod opt_duration_ns {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(d) => s.serialize_some(&u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_nanos))
    }
}
