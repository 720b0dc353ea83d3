//! Aggregation engine: snapshot collection and pure bottom-up rollups.

pub mod engine;
pub mod model;
pub mod rollup;
pub mod snapshot;

pub use engine::AggregationEngine;
pub use model::*;
pub use rollup::{age_bracket, average};
pub use snapshot::{MunicipalitySnapshot, SnapshotCollector};
