//! JSON handoff writer for the MET consumer.
//!
//! Station output is `{"point_data": [[...11 columns...], ...]}`; grid
//! output is `{"attrs": {...}, "met_data": [[...], ...]}`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::models::{GridAttributes, GridField, StationRecord};

#[derive(Serialize)]
struct PointDocument<'a> {
    point_data: &'a [StationRecord],
}

#[derive(Serialize)]
struct GridDocument<'a> {
    attrs: &'a GridAttributes,
    met_data: &'a [Vec<f64>],
}

#[derive(Debug, Default)]
pub struct MetWriter {
    pretty: bool,
}

impl MetWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write_points<W: Write>(&self, records: &[StationRecord], writer: W) -> Result<()> {
        self.write_document(&PointDocument { point_data: records }, writer)
    }

    pub fn write_grid<W: Write>(&self, field: &GridField, writer: W) -> Result<()> {
        self.write_document(
            &GridDocument {
                attrs: &field.attrs,
                met_data: &field.data,
            },
            writer,
        )
    }

    pub fn write_points_to_path(&self, records: &[StationRecord], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.write_points(records, BufWriter::new(File::create(path)?))
    }

    pub fn write_grid_to_path(&self, field: &GridField, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.write_grid(field, BufWriter::new(File::create(path)?))
    }

    fn write_document<T: Serialize, W: Write>(&self, document: &T, mut writer: W) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, document)?;
        } else {
            serde_json::to_writer(&mut writer, document)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}
