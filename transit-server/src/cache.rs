//! Caching layer for upstream API responses.
//!
//! Route patterns per station and stop sequences per trip change only
//! with schedule updates, so repeated adjacency queries can reuse them.
//! The full stop list is owned by the stop registry and batched stop
//! lookups are cheap, so those pass straight through.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{RoutePattern, Stop, StopId};
use crate::mbta::{MbtaError, TransitGateway};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Gateway wrapper that caches route patterns and trip stop ids.
///
/// Only successful responses are cached; errors always reach the caller
/// and the next query asks upstream again.
pub struct CachedGateway<G> {
    inner: G,
    patterns: MokaCache<StopId, Arc<Vec<RoutePattern>>>,
    trips: MokaCache<String, Arc<Vec<StopId>>>,
}

impl<G: TransitGateway> CachedGateway<G> {
    /// Create a new cached gateway.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        Self {
            inner,
            patterns: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
            trips: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
        }
    }

    /// Access the underlying gateway for operations that bypass cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.patterns.invalidate_all();
        self.trips.invalidate_all();
    }
}

impl<G: TransitGateway> TransitGateway for CachedGateway<G> {
    async fn fetch_all_rail_stops(&self) -> Result<Vec<Stop>, MbtaError> {
        self.inner.fetch_all_rail_stops().await
    }

    async fn fetch_route_patterns(&self, station: &StopId) -> Result<Vec<RoutePattern>, MbtaError> {
        if let Some(cached) = self.patterns.get(station).await {
            trace!(%station, "route patterns cache hit");
            return Ok(cached.as_ref().clone());
        }

        let patterns = self.inner.fetch_route_patterns(station).await?;
        self.patterns
            .insert(station.clone(), Arc::new(patterns.clone()))
            .await;
        Ok(patterns)
    }

    async fn fetch_routes_for_station(&self, station: &StopId) -> Result<Vec<String>, MbtaError> {
        self.inner.fetch_routes_for_station(station).await
    }

    async fn fetch_trip_stop_ids(&self, trip_id: &str) -> Result<Vec<StopId>, MbtaError> {
        if let Some(cached) = self.trips.get(trip_id).await {
            trace!(trip = trip_id, "trip stops cache hit");
            return Ok(cached.as_ref().clone());
        }

        let stops = self.inner.fetch_trip_stop_ids(trip_id).await?;
        self.trips
            .insert(trip_id.to_string(), Arc::new(stops.clone()))
            .await;
        Ok(stops)
    }

    async fn fetch_stops_by_ids(&self, ids: &[StopId]) -> Result<Vec<Stop>, MbtaError> {
        self.inner.fetch_stops_by_ids(ids).await
    }
}
