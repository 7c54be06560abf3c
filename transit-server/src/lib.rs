//! Rail stop adjacency service.
//!
//! Answers: "on each rail line through this stop, which stops come
//! immediately before and after it?" by aggregating calls to the MBTA
//! V3 API.

pub mod adjacency;
pub mod cache;
pub mod domain;
pub mod mbta;
pub mod registry;
