pub mod grid_source;
pub mod station_source;

pub use grid_source::GridSource;
pub use station_source::StationSource;
