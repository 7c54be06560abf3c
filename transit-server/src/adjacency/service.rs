//! Adjacency queries end to end.
//!
//! Resolves the target in the stop registry, finds one canonical pattern
//! per line, expands those trips concurrently and hands the sequences to
//! the adjacency engine.

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::domain::{AdjacencyResult, Stop, StopId};
use crate::mbta::TransitGateway;
use crate::registry::StopRegistry;

use super::config::AdjacencyConfig;
use super::error::AdjacencyError;
use super::lines::resolve_canonical_patterns;
use super::neighbors::compute_adjacency;
use super::trips::expand_trip;

/// Answers stop, line and adjacency queries against one gateway.
pub struct AdjacencyService<'a, G: TransitGateway> {
    gateway: &'a G,
    registry: &'a StopRegistry<G>,
    config: &'a AdjacencyConfig,
}

impl<'a, G: TransitGateway> AdjacencyService<'a, G> {
    /// Create a new service.
    pub fn new(
        gateway: &'a G,
        registry: &'a StopRegistry<G>,
        config: &'a AdjacencyConfig,
    ) -> Self {
        Self {
            gateway,
            registry,
            config,
        }
    }

    /// Resolve a stop id to a known rail stop.
    pub async fn find_stop(&self, stop_id: &StopId) -> Result<Stop, AdjacencyError> {
        self.registry
            .find_by_id(stop_id)
            .await?
            .ok_or_else(|| AdjacencyError::StopNotFound(stop_id.clone()))
    }

    /// The stops adjacent to `stop_id` on every rail line through it.
    ///
    /// Unknown stops fail before any line-resolution call is made.
    pub async fn compute_adjacent_stops(
        &self,
        stop_id: &StopId,
    ) -> Result<Vec<AdjacencyResult>, AdjacencyError> {
        let target = self.find_stop(stop_id).await?;
        self.adjacent_to(&target).await
    }

    /// The stops adjacent to an already resolved stop.
    ///
    /// Trips for distinct lines are expanded concurrently, in batches of
    /// `batch_size`. The first failure fails the whole query.
    pub async fn adjacent_to(&self, target: &Stop) -> Result<Vec<AdjacencyResult>, AdjacencyError> {
        info!(stop = %target.id, station = %target.parent_station, "computing adjacent stops");

        let patterns = resolve_canonical_patterns(self.gateway, target).await?;

        let mut lines = Vec::with_capacity(patterns.len());
        for batch in patterns.chunks(self.config.effective_batch_size()) {
            let expanded = try_join_all(batch.iter().map(|pattern| async move {
                let stops = expand_trip(self.gateway, pattern).await?;
                Ok::<_, AdjacencyError>((pattern.line_name.clone(), stops))
            }))
            .await?;
            lines.extend(expanded);
        }

        let results = compute_adjacency(target, &lines);
        for result in &results {
            debug!(
                stop = %target.id,
                line = %result.line_name,
                neighbors = ?result.neighbor_names(),
                "adjacent stops"
            );
        }

        Ok(results)
    }

    /// Display names of the lines serving `stop_id`'s station.
    pub async fn lines_through_stop(&self, stop_id: &StopId) -> Result<Vec<String>, AdjacencyError> {
        let stop = self.find_stop(stop_id).await?;
        debug!(stop = %stop.id, station = %stop.parent_station, "fetching lines");

        let names = self
            .gateway
            .fetch_routes_for_station(&stop.parent_station)
            .await?;
        Ok(names)
    }
}
