pub mod met_writer;

pub use met_writer::MetWriter;
