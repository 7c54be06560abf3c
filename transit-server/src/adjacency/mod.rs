//! Adjacency resolution.
//!
//! This module answers: "which stops come immediately before and after
//! this stop, on each rail line through it?"
//!
//! A query resolves the stop in the registry, picks one canonical route
//! pattern per line at its station, expands each pattern's trip into an
//! ordered stop sequence, and locates the stop's station in each one.

mod config;
mod error;
mod lines;
mod neighbors;
mod service;
mod trips;

#[cfg(test)]
mod service_tests;

pub use config::AdjacencyConfig;
pub use error::AdjacencyError;
pub use lines::{canonical_per_line, resolve_canonical_patterns};
pub use neighbors::{compute_adjacency, neighbors_on_line};
pub use service::AdjacencyService;
pub use trips::{expand_trip, order_by_trip};
