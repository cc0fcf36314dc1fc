//! Ranking strategy names stored on route profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ranking strategy applied to a profile's resolved candidate set.
///
/// The wire names (`*weight`, `*least_cost`, ...) match what operators put
/// in profile definitions and what the result echoes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Strategy {
    /// Order by descending static route weight; no external calls.
    #[serde(rename = "*weight")]
    Weight,
    /// Order by ascending computed monetary cost.
    #[serde(rename = "*least_cost")]
    LeastCost,
    /// Order by descending computed monetary cost.
    #[serde(rename = "*highest_cost")]
    HighestCost,
    /// Order by live quality-of-service metrics.
    #[serde(rename = "*qos")]
    Qos,
    /// Order to spread load relative to configured shares.
    #[serde(rename = "*load")]
    LoadDistribution,
}

impl Strategy {
    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weight => "*weight",
            Self::LeastCost => "*least_cost",
            Self::HighestCost => "*highest_cost",
            Self::Qos => "*qos",
            Self::LoadDistribution => "*load",
        }
    }

    /// Whether the strategy produces a per-candidate `Cost` value, making
    /// it subject to `MaxCost` post-filtering.
    #[must_use]
    pub const fn produces_cost(self) -> bool {
        matches!(self, Self::LeastCost | Self::HighestCost)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sorting strategy: {0}")]
pub struct StrategyParseError(pub String);

impl FromStr for Strategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*weight" => Ok(Self::Weight),
            "*least_cost" => Ok(Self::LeastCost),
            "*highest_cost" => Ok(Self::HighestCost),
            "*qos" => Ok(Self::Qos),
            "*load" => Ok(Self::LoadDistribution),
            other => Err(StrategyParseError(other.to_string())),
        }
    }
}
