pub mod calc;
pub mod cli;
pub mod error;
pub mod models;
pub mod pipelines;
pub mod readers;
pub mod units;
pub mod utils;
pub mod variables;
pub mod writers;

pub use error::{ConvertError, Result};
