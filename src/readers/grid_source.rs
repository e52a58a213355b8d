//! Reader for gridded model output sources.
//!
//! Consumes a JSON dump of a WRF-style surface file: the `Times` string,
//! grid dimensions, 2-D fields with declared units, and the global
//! projection/resolution attributes.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConvertError, Result};
use crate::units::{PhysicalQuantity, Unit};
use crate::utils::time::parse_wrf_time;
use crate::variables::FieldSet;

#[derive(Debug, Deserialize)]
struct RawGridField {
    values: Vec<Vec<f64>>,
    units: String,
}

#[derive(Debug, Deserialize)]
struct Dimensions {
    west_east: usize,
    south_north: usize,
}

#[derive(Debug, Deserialize)]
struct GridSourceFile {
    times: String,
    dimensions: Dimensions,
    #[serde(default)]
    fields: HashMap<String, RawGridField>,
    #[serde(default)]
    attributes: HashMap<String, Value>,
}

/// In-memory grid source: one model time, flattened unit-tagged fields,
/// and the raw global attributes.
pub struct GridSource {
    valid_time: NaiveDateTime,
    nx: usize,
    ny: usize,
    fields: HashMap<String, PhysicalQuantity>,
    attributes: HashMap<String, Value>,
}

impl GridSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ConvertError::SourceRead(format!("cannot open '{}': {}", path.display(), e))
        })?;
        let parsed: GridSourceFile = serde_json::from_reader(BufReader::new(file))?;
        Self::build(parsed)
    }

    fn build(file: GridSourceFile) -> Result<Self> {
        let nx = file.dimensions.west_east;
        let ny = file.dimensions.south_north;
        if nx == 0 || ny == 0 {
            return Err(ConvertError::SourceRead(format!(
                "grid dimensions {}x{} are degenerate",
                nx, ny
            )));
        }
        let valid_time = parse_wrf_time(&file.times)?;

        let mut fields = HashMap::with_capacity(file.fields.len());
        for (name, raw) in file.fields {
            if raw.values.len() != ny {
                return Err(ConvertError::SourceRead(format!(
                    "field '{}' has {} rows for south_north = {}",
                    name,
                    raw.values.len(),
                    ny
                )));
            }
            let mut flat = Vec::with_capacity(nx * ny);
            for (row_idx, row) in raw.values.iter().enumerate() {
                if row.len() != nx {
                    return Err(ConvertError::SourceRead(format!(
                        "field '{}' row {} has {} columns for west_east = {}",
                        name,
                        row_idx,
                        row.len(),
                        nx
                    )));
                }
                flat.extend_from_slice(row);
            }
            let unit = Unit::parse(&raw.units)?;
            fields.insert(name, PhysicalQuantity::new(flat, unit));
        }

        Ok(Self {
            valid_time,
            nx,
            ny,
            fields,
            attributes: file.attributes,
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn valid_time(&self) -> &NaiveDateTime {
        &self.valid_time
    }

    /// Collect the named raw fields for a derivation.
    pub fn gather(&self, names: &[&str]) -> Result<FieldSet> {
        let mut set = FieldSet::new();
        for &name in names {
            let quantity = self.fields.get(name).ok_or_else(|| {
                ConvertError::SourceRead(format!("source has no field '{}'", name))
            })?;
            set.insert(name, quantity.clone());
        }
        Ok(set)
    }

    /// Numeric global attribute; absent or mistyped is `MissingMetadata`.
    pub fn attr_f64(&self, name: &str) -> Result<f64> {
        self.attributes
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| ConvertError::MissingMetadata(name.to_string()))
    }

    /// String global attribute; absent or mistyped is `MissingMetadata`.
    pub fn attr_str(&self, name: &str) -> Result<&str> {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ConvertError::MissingMetadata(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_source(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = r#"{
        "times": "2023-07-15_12:00:00",
        "dimensions": { "west_east": 3, "south_north": 2 },
        "fields": {
            "T2": { "values": [[290.0, 291.0, 292.0], [293.0, 294.0, 295.0]], "units": "K" }
        },
        "attributes": {
            "DX": 3000.0,
            "MAP_PROJ_CHAR": "Lambert Conformal"
        }
    }"#;

    #[test]
    fn test_read_grid_source() {
        let file = write_source(SAMPLE);
        let source = GridSource::from_path(file.path()).unwrap();

        assert_eq!(source.nx(), 3);
        assert_eq!(source.ny(), 2);
        assert_eq!(
            source.valid_time().format("%Y%m%d_%H%M%S").to_string(),
            "20230715_120000"
        );

        let fields = source.gather(&["T2"]).unwrap();
        let t2 = fields.get("T2").unwrap();
        assert_eq!(t2.unit(), Unit::Kelvin);
        // Row-major flattening, native row order.
        assert_eq!(t2.values(), &[290.0, 291.0, 292.0, 293.0, 294.0, 295.0]);
    }

    #[test]
    fn test_attributes() {
        let file = write_source(SAMPLE);
        let source = GridSource::from_path(file.path()).unwrap();

        assert!((source.attr_f64("DX").unwrap() - 3000.0).abs() < 1e-12);
        assert_eq!(source.attr_str("MAP_PROJ_CHAR").unwrap(), "Lambert Conformal");

        assert!(matches!(
            source.attr_f64("CEN_LAT"),
            Err(ConvertError::MissingMetadata(_))
        ));
        // Mistyped attribute is missing, not silently coerced.
        assert!(matches!(
            source.attr_str("DX"),
            Err(ConvertError::MissingMetadata(_))
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let json = SAMPLE.replace("[293.0, 294.0, 295.0]", "[293.0, 294.0]");
        let file = write_source(&json);
        assert!(matches!(
            GridSource::from_path(file.path()),
            Err(ConvertError::SourceRead(_))
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        // A 0-wide declaration is self-consistent (every field has zero
        // rows) but must not reach the pipelines.
        let json = r#"{
            "times": "2023-07-15_12:00:00",
            "dimensions": { "west_east": 0, "south_north": 0 },
            "fields": {
                "T2": { "values": [], "units": "K" }
            },
            "attributes": { "DX": 3000.0 }
        }"#;
        let file = write_source(json);
        assert!(matches!(
            GridSource::from_path(file.path()),
            Err(ConvertError::SourceRead(_))
        ));
    }

    #[test]
    fn test_missing_field_is_source_read_failure() {
        let file = write_source(SAMPLE);
        let source = GridSource::from_path(file.path()).unwrap();
        assert!(matches!(
            source.gather(&["Q2"]),
            Err(ConvertError::SourceRead(_))
        ));
    }
}
