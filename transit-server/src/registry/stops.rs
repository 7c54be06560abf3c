//! The stop registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{Stop, StopId};
use crate::mbta::{MbtaError, TransitGateway};

use super::snapshot::StopSnapshot;

/// An immutable, indexed view of all known rail stops.
#[derive(Debug)]
pub struct StopIndex {
    stops: Vec<Stop>,
    by_id: HashMap<StopId, usize>,
    fetched_at: DateTime<Utc>,
}

impl StopIndex {
    /// Index stops by id. The first stop wins when ids repeat.
    pub fn new(stops: Vec<Stop>, fetched_at: DateTime<Utc>) -> Self {
        let mut by_id = HashMap::with_capacity(stops.len());
        for (idx, stop) in stops.iter().enumerate() {
            by_id.entry(stop.id.clone()).or_insert(idx);
        }

        Self {
            stops,
            by_id,
            fetched_at,
        }
    }

    /// All stops, in upstream response order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Look up a stop by id.
    pub fn get(&self, id: &StopId) -> Option<&Stop> {
        self.by_id.get(id).map(|&idx| &self.stops[idx])
    }

    /// When this stop list was fetched from upstream.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Thread-safe registry of all rail stops.
///
/// Populated lazily on first use and then served from memory. Concurrent
/// first accesses share a single upstream fetch. A failed fetch leaves
/// the registry empty, so the next access tries again.
pub struct StopRegistry<G> {
    gateway: Arc<G>,
    inner: RwLock<Option<Arc<StopIndex>>>,
    /// Serializes fetches so population happens exactly once.
    fetch_lock: Mutex<()>,
    snapshot: Option<StopSnapshot>,
}

impl<G: TransitGateway> StopRegistry<G> {
    /// Create an empty registry that fetches through `gateway`.
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            inner: RwLock::new(None),
            fetch_lock: Mutex::new(()),
            snapshot: None,
        }
    }

    /// Seed population from a disk snapshot, and keep it up to date.
    pub fn with_snapshot(mut self, snapshot: StopSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// All rail stops, fetching them on first use.
    pub async fn all_stops(&self) -> Result<Arc<StopIndex>, MbtaError> {
        if let Some(index) = self.cached().await {
            debug!("using cached stops");
            return Ok(index);
        }

        let _guard = self.fetch_lock.lock().await;

        // Another caller may have populated while we waited.
        if let Some(index) = self.cached().await {
            return Ok(index);
        }

        let index = match self.load_snapshot() {
            Some(index) => index,
            None => self.fetch().await?,
        };

        *self.inner.write().await = Some(index.clone());
        Ok(index)
    }

    /// Look up a stop by id, populating the registry if needed.
    pub async fn find_by_id(&self, id: &StopId) -> Result<Option<Stop>, MbtaError> {
        let index = self.all_stops().await?;
        Ok(index.get(id).cloned())
    }

    /// Re-fetch all stops from upstream, replacing the current list.
    ///
    /// Bypasses the snapshot. On failure the current list is kept and the
    /// error is returned.
    pub async fn refresh(&self) -> Result<Arc<StopIndex>, MbtaError> {
        let _guard = self.fetch_lock.lock().await;

        let index = self.fetch().await?;
        *self.inner.write().await = Some(index.clone());
        Ok(index)
    }

    /// Whether the registry currently holds a stop list.
    pub async fn is_populated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    async fn cached(&self) -> Option<Arc<StopIndex>> {
        self.inner.read().await.clone()
    }

    fn load_snapshot(&self) -> Option<Arc<StopIndex>> {
        let snapshot = self.snapshot.as_ref()?;
        let loaded = snapshot.load()?;
        info!(
            count = loaded.stops.len(),
            path = %snapshot.path().display(),
            "loaded stops from snapshot"
        );
        Some(Arc::new(StopIndex::new(loaded.stops, loaded.fetched_at)))
    }

    async fn fetch(&self) -> Result<Arc<StopIndex>, MbtaError> {
        let stops = self.gateway.fetch_all_rail_stops().await?;
        let fetched_at = Utc::now();
        info!(count = stops.len(), "fetched rail stops from upstream");

        if let Some(snapshot) = &self.snapshot
            && let Err(e) = snapshot.save(&stops, fetched_at)
        {
            warn!(error = %e, "failed to write stop snapshot");
        }

        Ok(Arc::new(StopIndex::new(stops, fetched_at)))
    }
}
