pub mod grid;
pub mod point;

pub use grid::{GridAttributes, GridField, ProjectionMetadata};
pub use point::{QcFlag, StationRecord};
