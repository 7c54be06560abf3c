//! Registry of known rail stops.
//!
//! Holds every light and heavy rail stop, fetched from the upstream API
//! on first use and optionally persisted to a disk snapshot.

mod error;
mod snapshot;
mod stops;

pub use error::SnapshotError;
pub use snapshot::{LoadedSnapshot, StopSnapshot, StopSnapshotConfig};
pub use stops::{StopIndex, StopRegistry};
