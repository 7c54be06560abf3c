//! Stop identifiers and stop records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id {id:?}: {reason}")]
pub struct InvalidStopId {
    id: String,
    reason: &'static str,
}

/// An upstream-assigned stop identifier (e.g. `70061`, `place-cntsq`).
///
/// Identifiers are opaque non-empty strings and may contain spaces
/// (`Oak Grove-01`). Commas are reserved because batched lookups join ids
/// with them.
///
/// # Examples
///
/// ```
/// use transit_server::domain::StopId;
///
/// let central = StopId::parse("70061").unwrap();
/// assert_eq!(central.as_str(), "70061");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("70061,70063").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let invalid = |reason| InvalidStopId {
            id: s.to_string(),
            reason,
        };

        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }

        if s.contains(',') {
            return Err(invalid("must not contain commas"));
        }

        Ok(StopId(s.to_string()))
    }

    /// Parse after trimming surrounding whitespace (for user input).
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStopId> {
        Self::parse(s.trim())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rail stop: a platform, or a station when it has no parent.
///
/// `parent_station` always names a station. For a stop that is itself a
/// station it equals `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub description: Option<String>,
    pub line: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub parent_station: StopId,
}

impl Stop {
    /// Whether two stops belong to the same station.
    pub fn same_station(&self, other: &Stop) -> bool {
        self.parent_station == other.parent_station
    }

    /// Whether this stop is itself a station.
    pub fn is_station(&self) -> bool {
        self.id == self.parent_station
    }
}
