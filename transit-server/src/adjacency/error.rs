//! Adjacency query error types.

use crate::domain::StopId;
use crate::mbta::MbtaError;

/// Why an adjacency query failed.
///
/// The pipeline classifies failures; it does not retry them and never
/// turns them into empty results. Callers decide how to present them.
#[derive(Debug, thiserror::Error)]
pub enum AdjacencyError {
    /// The target id is not a known rail stop
    #[error("stop not found: {0}")]
    StopNotFound(StopId),

    /// An upstream call failed (network error or non-success status)
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] MbtaError),

    /// An upstream response was missing or contradicted expected data.
    /// `source` is set when a gateway error was classified as malformed.
    #[error("malformed upstream data: {message}")]
    MalformedUpstreamData {
        message: String,
        #[source]
        source: Option<MbtaError>,
    },
}

impl AdjacencyError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        AdjacencyError::MalformedUpstreamData {
            message: message.into(),
            source: None,
        }
    }
}

impl From<MbtaError> for AdjacencyError {
    fn from(e: MbtaError) -> Self {
        if e.is_malformed() {
            AdjacencyError::MalformedUpstreamData {
                message: e.to_string(),
                source: Some(e),
            }
        } else {
            AdjacencyError::UpstreamUnavailable(e)
        }
    }
}
