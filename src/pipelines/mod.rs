pub mod grid;
pub mod station;

pub use grid::{GridOptions, GridPipeline};
pub use station::{StationOptions, StationPipeline};
