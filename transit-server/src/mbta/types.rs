//! MBTA V3 API response DTOs.
//!
//! The API speaks JSON:API: every resource has an `id`, an `attributes`
//! object and a `relationships` object whose entries hold `{ "data": ... }`
//! linkage. These types map the parts of those documents we read.
//! Relationships are `Option` because the API omits them depending on the
//! endpoint and the `include` parameter.

use serde::Deserialize;

/// Top-level JSON:API document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// Reference to another resource (`{ "type": "stop", "id": "70061" }`).
/// Only the id is read; the type is implied by the relationship.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,
}

/// To-one relationship. `data` is null when the relation is empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<ResourceIdentifier>,
}

/// To-many relationship, in the order the API lists the members.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToManyRelationship {
    #[serde(default)]
    pub data: Vec<ResourceIdentifier>,
}

/// A stop from `/stops`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopResource {
    pub id: String,
    pub attributes: StopAttributes,
    #[serde(default)]
    pub relationships: StopRelationships,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopAttributes {
    pub name: String,

    /// Platform-level detail, e.g. "Central - Red Line - Alewife".
    pub description: Option<String>,

    /// Not sent by every API version.
    #[serde(default)]
    pub line: Option<String>,

    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopRelationships {
    pub parent_station: Option<Relationship>,
}

/// A route pattern from `/route_patterns`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutePatternResource {
    pub id: String,
    #[serde(default)]
    pub attributes: RoutePatternAttributes,
    #[serde(default)]
    pub relationships: RoutePatternRelationships,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutePatternAttributes {
    /// Whether this is the canonical variant of its route.
    pub canonical: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutePatternRelationships {
    pub route: Option<Relationship>,
    pub representative_trip: Option<Relationship>,
}

/// A route from `/routes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResource {
    pub id: String,
    pub attributes: RouteAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteAttributes {
    pub long_name: String,
}

/// A trip from `/trips/{id}?include=stops`.
#[derive(Debug, Clone, Deserialize)]
pub struct TripResource {
    pub id: String,
    #[serde(default)]
    pub relationships: TripRelationships,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripRelationships {
    pub stops: Option<ToManyRelationship>,
}
