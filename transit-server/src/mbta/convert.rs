//! Conversion from MBTA DTOs to domain types.
//!
//! Conversion is all-or-nothing: one unusable resource fails the whole
//! document, so a caller never sees a partially flattened stop list.

use crate::domain::{RoutePattern, Stop, StopId};

use super::error::MbtaError;
use super::types::{RoutePatternResource, RouteResource, StopResource, TripResource};

/// Flatten a stop resource.
///
/// A `parent_station` relationship with null data marks the stop as a
/// station in its own right, so it becomes its own parent. A missing
/// relationship is an error.
pub fn convert_stop(resource: &StopResource) -> Result<Stop, MbtaError> {
    let id = StopId::parse(&resource.id)?;

    let parent = resource
        .relationships
        .parent_station
        .as_ref()
        .ok_or_else(|| MbtaError::MissingRelationship {
            resource: "stop",
            id: resource.id.clone(),
            relationship: "parent_station",
        })?;

    let parent_station = match &parent.data {
        Some(parent) => StopId::parse(&parent.id)?,
        None => id.clone(),
    };

    let attributes = &resource.attributes;
    Ok(Stop {
        id,
        name: attributes.name.clone(),
        description: attributes.description.clone(),
        line: attributes.line.clone(),
        latitude: attributes.latitude,
        longitude: attributes.longitude,
        parent_station,
    })
}

/// Flatten a list of stop resources, preserving order.
pub fn convert_stops(resources: &[StopResource]) -> Result<Vec<Stop>, MbtaError> {
    resources.iter().map(convert_stop).collect()
}

/// Flatten a route pattern resource.
pub fn convert_route_pattern(resource: &RoutePatternResource) -> Result<RoutePattern, MbtaError> {
    let missing = |relationship| MbtaError::MissingRelationship {
        resource: "route_pattern",
        id: resource.id.clone(),
        relationship,
    };

    let trip = resource
        .relationships
        .representative_trip
        .as_ref()
        .and_then(|r| r.data.as_ref())
        .ok_or_else(|| missing("representative_trip"))?;

    let route = resource
        .relationships
        .route
        .as_ref()
        .and_then(|r| r.data.as_ref())
        .ok_or_else(|| missing("route"))?;

    Ok(RoutePattern {
        representative_trip_id: trip.id.clone(),
        line_name: route.id.clone(),
        canonical: resource.attributes.canonical,
    })
}

/// Flatten route pattern resources, preserving response order.
pub fn convert_route_patterns(
    resources: &[RoutePatternResource],
) -> Result<Vec<RoutePattern>, MbtaError> {
    resources.iter().map(convert_route_pattern).collect()
}

/// Extract the ordered stop ids of a trip.
pub fn convert_trip_stop_ids(resource: &TripResource) -> Result<Vec<StopId>, MbtaError> {
    let stops = resource
        .relationships
        .stops
        .as_ref()
        .ok_or_else(|| MbtaError::MissingRelationship {
            resource: "trip",
            id: resource.id.clone(),
            relationship: "stops",
        })?;

    stops
        .data
        .iter()
        .map(|r| StopId::parse(&r.id).map_err(MbtaError::from))
        .collect()
}

/// Display names of routes, in response order.
pub fn convert_route_names(resources: &[RouteResource]) -> Vec<String> {
    resources
        .iter()
        .map(|r| r.attributes.long_name.clone())
        .collect()
}
