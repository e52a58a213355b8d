pub mod constants;
pub mod time;

pub use constants::*;
pub use time::{decode_time_axis, format_met_time, parse_wrf_time};
