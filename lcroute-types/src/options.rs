//! Per-request selection options.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost ceiling applied after ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxCost {
    /// Literal monetary ceiling.
    #[serde(rename = "absolute")]
    Absolute(Decimal),
    /// Use the cost of the event itself, rated through the cost adapter,
    /// as the ceiling (wire sentinel `*event_cost`).
    #[serde(rename = "*event_cost")]
    EventCost,
}

/// Result-size window applied last, after `count` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    /// Maximum number of entries returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Entries skipped from the top of the ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Paginator {
    /// Apply the window to an already-ranked list.
    pub fn paginate<T>(&self, items: &mut Vec<T>) {
        if let Some(off) = self.offset {
            if off >= items.len() {
                items.clear();
            } else {
                items.drain(..off);
            }
        }
        if let Some(lim) = self.limit {
            items.truncate(lim);
        }
    }
}

/// Options accepted by `get_routes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutesOptions {
    /// Optional post-ranking cost ceiling; cost-producing strategies only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<MaxCost>,
    /// Drop candidates whose per-candidate adapter work fails instead of
    /// aborting the whole selection.
    #[serde(default)]
    pub ignore_errors: bool,
    /// Result-size window.
    #[serde(default)]
    pub paginator: Paginator,
}
