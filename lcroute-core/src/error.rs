use thiserror::Error;

/// Unified error type for the lcroute workspace.
///
/// Covers the selection-level failure kinds plus adapter propagation. A
/// failed selection surfaces exactly one of these; partial rankings are
/// never returned.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No profile matched, or no candidate survived filtering, resolution
    /// or cost thresholding. The literal message is part of the wire
    /// contract with existing clients.
    #[error("NOT_FOUND")]
    NotFound,

    /// The filter adapter failed while evaluating eligibility rules.
    #[error("filter evaluation failed: {0}")]
    Filter(String),

    /// The cost adapter failed while rating a candidate.
    #[error("cost computation failed for route {route_id}: {msg}")]
    Cost {
        /// Candidate whose rating failed.
        route_id: String,
        /// Human-readable adapter message.
        msg: String,
    },

    /// The stats adapter failed as a whole; missing samples for single
    /// candidates are not an error.
    #[error("stats query failed: {0}")]
    Stats(String),

    /// The enclosing request was canceled or its deadline elapsed
    /// mid-selection.
    #[error("selection canceled: {0}")]
    Canceled(&'static str),

    /// Invalid input (malformed option, unusable profile definition).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The profile store failed on a read or write.
    #[error("profile store failure: {0}")]
    Store(String),
}

impl RouteError {
    /// Helper: build a `Cost` error for a candidate.
    pub fn cost(route_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Cost {
            route_id: route_id.into(),
            msg: msg.into(),
        }
    }

    /// Whether the error may be absorbed by `ignore_errors` (the failing
    /// candidate is dropped instead of aborting the selection).
    #[must_use]
    pub const fn is_candidate_scoped(&self) -> bool {
        matches!(self, Self::Filter(_) | Self::Cost { .. })
    }
}
