//! MBTA V3 API gateway.
//!
//! This module provides the upstream side of the service: an HTTP
//! client for the MBTA V3 API, the DTOs for its JSON:API documents, and
//! the conversion that flattens them into domain types.
//!
//! Key characteristics of the API:
//! - Relationships are nested `{ "data": { "type", "id" } }` objects, not
//!   flat fields; a stop's parent station is one of them
//! - Route patterns are keyed by station, so queries use the parent
//!   station id rather than a platform id
//! - Filters accept comma-joined id lists, which keeps batch lookups to
//!   a single request

mod client;
mod convert;
mod error;
mod gateway;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, MbtaClient, MbtaConfig};
pub use error::MbtaError;
pub use gateway::TransitGateway;
pub use mock::{MockCall, MockGateway};
pub use types::{
    Document, Relationship, ResourceIdentifier, RoutePatternResource, RouteResource,
    StopResource, ToManyRelationship, TripResource,
};
