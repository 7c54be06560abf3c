//! Route pattern types.

/// Marker the upstream API embeds in representative trip ids of canonical patterns.
const CANONICAL_TRIP_MARKER: &str = "canonical";

/// One variant of a line, represented by a single trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    /// Trip whose stop list describes this variant.
    pub representative_trip_id: String,

    /// Line (route) this pattern belongs to, e.g. `Red`.
    pub line_name: String,

    /// Structured canonical flag, when the upstream API sends one.
    pub canonical: Option<bool>,
}

impl RoutePattern {
    /// Create a pattern with no structured canonical flag.
    pub fn new(representative_trip_id: impl Into<String>, line_name: impl Into<String>) -> Self {
        Self {
            representative_trip_id: representative_trip_id.into(),
            line_name: line_name.into(),
            canonical: None,
        }
    }

    /// Set the structured canonical flag.
    pub fn with_canonical(mut self, canonical: bool) -> Self {
        self.canonical = Some(canonical);
        self
    }

    /// Whether this pattern is the full-coverage variant of its line.
    ///
    /// The structured flag wins when present. Otherwise the representative
    /// trip id must carry the `canonical` marker.
    pub fn is_canonical(&self) -> bool {
        match self.canonical {
            Some(flag) => flag,
            None => is_canonical_trip_id(&self.representative_trip_id),
        }
    }
}

/// Whether a representative trip id denotes a canonical pattern.
pub fn is_canonical_trip_id(trip_id: &str) -> bool {
    trip_id.contains(CANONICAL_TRIP_MARKER)
}
