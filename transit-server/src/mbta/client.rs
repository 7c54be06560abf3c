//! MBTA V3 API HTTP client.
//!
//! Provides async methods for the read-only queries the adjacency
//! pipeline needs. Handles authentication, concurrency limiting, status
//! classification and conversion to domain types.

use std::sync::Arc;

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{RoutePattern, Stop, StopId};

use super::convert::{
    convert_route_names, convert_route_patterns, convert_stops, convert_trip_stop_ids,
};
use super::error::MbtaError;
use super::gateway::TransitGateway;
use super::types::{Document, RoutePatternResource, RouteResource, StopResource, TripResource};

/// Default base URL for the MBTA V3 API.
pub const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// GTFS route types served: 0 light rail (tram, streetcar), 1 heavy rail (subway).
const RAIL_STOPS_QUERY: &[(&str, &str)] = &[("filter[route_type]", "0,1")];

/// How much of an undecodable body to keep for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the MBTA client.
#[derive(Debug, Clone)]
pub struct MbtaConfig {
    /// API key sent as `x-api-key`. The API works without one, at a lower rate limit.
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MbtaConfig {
    /// Create a new config, optionally with an API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MbtaConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// MBTA V3 API client.
///
/// Uses a semaphore to limit concurrent requests and stay under the
/// API's rate limit when lines are expanded in parallel.
#[derive(Debug, Clone)]
pub struct MbtaClient {
    http: reqwest::Client,
    base_url: Url,
    semaphore: Arc<Semaphore>,
}

impl MbtaClient {
    /// Create a new MBTA client with the given configuration.
    pub fn new(config: MbtaConfig) -> Result<Self, MbtaError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let api_key = HeaderValue::from_str(key).map_err(|_| MbtaError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert("x-api-key", api_key);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| MbtaError::Api {
            status: 0,
            message: format!("Invalid base URL {:?}: {e}", config.base_url),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MbtaError::Api {
                status: 0,
                message: format!("Base URL {:?} cannot take a path", config.base_url),
            });
        }

        Ok(Self {
            http,
            base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Endpoint URL under the base URL. Each segment is percent-encoded,
    /// so upstream ids containing `/`, `?` or spaces stay one segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a JSON:API document and decode its `data` member.
    async fn get_document<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, MbtaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MbtaError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.endpoint(segments);
        debug!(%url, ?query, "MBTA request");

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MbtaError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MbtaError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MbtaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let document: Document<T> = serde_json::from_str(&body).map_err(|e| MbtaError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
        })?;

        Ok(document.data)
    }
}

impl TransitGateway for MbtaClient {
    async fn fetch_all_rail_stops(&self) -> Result<Vec<Stop>, MbtaError> {
        let resources: Vec<StopResource> = self
            .get_document(&["stops"], RAIL_STOPS_QUERY)
            .await?;
        debug!(count = resources.len(), "fetched rail stops");
        convert_stops(&resources)
    }

    async fn fetch_route_patterns(&self, station: &StopId) -> Result<Vec<RoutePattern>, MbtaError> {
        let resources: Vec<RoutePatternResource> = self
            .get_document(&["route_patterns"], &[("filter[stop]", station.as_str())])
            .await?;
        convert_route_patterns(&resources)
    }

    async fn fetch_routes_for_station(&self, station: &StopId) -> Result<Vec<String>, MbtaError> {
        let resources: Vec<RouteResource> = self
            .get_document(&["routes"], &[("filter[stop]", station.as_str())])
            .await?;
        Ok(convert_route_names(&resources))
    }

    async fn fetch_trip_stop_ids(&self, trip_id: &str) -> Result<Vec<StopId>, MbtaError> {
        let resource: TripResource = self
            .get_document(&["trips", trip_id], &[("include", "stops")])
            .await?;
        convert_trip_stop_ids(&resource)
    }

    async fn fetch_stops_by_ids(&self, ids: &[StopId]) -> Result<Vec<Stop>, MbtaError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids
            .iter()
            .map(StopId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let resources: Vec<StopResource> = self
            .get_document(&["stops"], &[("filter[id]", joined.as_str())])
            .await?;
        convert_stops(&resources)
    }
}
