//! Domain types for the rail adjacency service.
//!
//! These are the validated shapes the rest of the crate works with. The
//! upstream JSON:API documents are flattened into them at the gateway
//! boundary, so code that receives them can trust their invariants.

mod adjacency;
mod route_pattern;
mod stop;

pub use adjacency::AdjacencyResult;
pub use route_pattern::{RoutePattern, is_canonical_trip_id};
pub use stop::{InvalidStopId, Stop, StopId};
