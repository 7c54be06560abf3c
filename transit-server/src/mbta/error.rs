//! MBTA gateway error types.

use std::fmt;

use crate::domain::InvalidStopId;

/// Errors from the MBTA gateway.
#[derive(Debug)]
pub enum MbtaError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// API returned an error status code
    Api { status: u16, message: String },

    /// Rate limited by the API
    RateLimited,

    /// Invalid API key or forbidden
    Unauthorized,

    /// Response body was not the expected JSON document
    Json {
        message: String,
        body: Option<String>,
    },

    /// A resource lacked a relationship the conversion needs
    MissingRelationship {
        resource: &'static str,
        id: String,
        relationship: &'static str,
    },

    /// The API sent an identifier we cannot represent
    InvalidId(InvalidStopId),
}

impl MbtaError {
    /// Whether the upstream answered, but with data we could not use.
    ///
    /// Everything else means the upstream was unreachable or refused.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            MbtaError::Json { .. } | MbtaError::MissingRelationship { .. } | MbtaError::InvalidId(_)
        )
    }
}

impl fmt::Display for MbtaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MbtaError::Http(e) => write!(f, "HTTP error: {e}"),
            MbtaError::Api { status, message } => write!(f, "API error {status}: {message}"),
            MbtaError::RateLimited => write!(f, "rate limited by MBTA API"),
            MbtaError::Unauthorized => write!(f, "unauthorized (check MBTA_API_KEY)"),
            MbtaError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            MbtaError::MissingRelationship {
                resource,
                id,
                relationship,
            } => write!(f, "{resource} {id} has no {relationship} relationship"),
            MbtaError::InvalidId(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MbtaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MbtaError::Http(e) => Some(e),
            MbtaError::InvalidId(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MbtaError {
    fn from(err: reqwest::Error) -> Self {
        MbtaError::Http(err)
    }
}

impl From<InvalidStopId> for MbtaError {
    fn from(err: InvalidStopId) -> Self {
        MbtaError::InvalidId(err)
    }
}
