//! The event describing one call/session to be routed.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known event field names shared with the surrounding stack.
pub(crate) mod fields {
    pub const ACCOUNT: &str = "Account";
    pub const DESTINATION: &str = "Destination";
    pub const USAGE: &str = "Usage";
}

/// A call/session description submitted for route selection.
///
/// Beyond the fixed tenant/ID/time header, the event carries an open
/// attribute map: accounts, destinations, setup times, usage estimates and
/// arbitrary custom fields referenced by eligibility filters. The event is
/// immutable for the duration of one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEvent {
    /// Tenant owning the event.
    pub tenant: String,
    /// Caller-chosen identifier, echoed in logs only.
    pub id: String,
    /// Event timestamp used for activation-window matching. `None` means
    /// "now" from the matcher's point of view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    /// Open attribute map.
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl RouteEvent {
    /// Create an event with an empty attribute map.
    #[must_use]
    pub fn new(tenant: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            id: id.into(),
            time: None,
            fields: BTreeMap::new(),
        }
    }

    /// Set a field, consuming and returning the event (builder style).
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the event timestamp.
    #[must_use]
    pub const fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Borrow a field as a string, if present and string-valued.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(serde_json::Value::as_str)
    }

    /// The `Account` field, if present.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.field_str(fields::ACCOUNT)
    }

    /// The `Destination` field, if present.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        self.field_str(fields::DESTINATION)
    }

    /// The usage estimate, if present and parseable.
    ///
    /// Accepts either a duration string (`"1m20s"`, `"30s"`, `"250ms"`) or
    /// an integer number of nanoseconds. A present but malformed value is
    /// treated as absent; validation belongs to the transport layer.
    #[must_use]
    pub fn usage(&self) -> Option<Duration> {
        match self.fields.get(fields::USAGE)? {
            serde_json::Value::String(s) => parse_duration(s).ok(),
            v => v.as_u64().map(Duration::from_nanos),
        }
    }
}

/// Error returned by [`parse_duration`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid duration: {0}")]
pub struct DurationParseError(pub String);

/// Parse a compact duration string (`"1h2m3s"`, `"80s"`, `"150ms"`).
///
/// Units: `h`, `m`, `s`, `ms`, `us`, `ns`; at least one component is
/// required and components are summed in the order given.
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let err = || DurationParseError(s.to_string());
    let s = s.trim();
    if s.is_empty() {
        return Err(err());
    }
    let mut total = Duration::ZERO;
    let mut num = String::new();
    let mut chars = s.chars().peekable();
    let mut any = false;
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            num.push(c);
            continue;
        }
        let value: u64 = num.parse().map_err(|_| err())?;
        num.clear();
        let unit = match c {
            'h' => Duration::from_secs(3600),
            'm' => {
                if chars.peek() == Some(&'s') {
                    chars.next();
                    Duration::from_millis(1)
                } else {
                    Duration::from_secs(60)
                }
            }
            's' => Duration::from_secs(1),
            'u' | 'µ' => {
                if chars.next() != Some('s') {
                    return Err(err());
                }
                Duration::from_micros(1)
            }
            'n' => {
                if chars.next() != Some('s') {
                    return Err(err());
                }
                Duration::from_nanos(1)
            }
            _ => return Err(err()),
        };
        total += unit * u32::try_from(value).map_err(|_| err())?;
        any = true;
    }
    if !num.is_empty() || !any {
        return Err(err());
    }
    Ok(total)
}
