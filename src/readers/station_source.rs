//! Reader for station observation sources.
//!
//! Consumes a JSON dump of the MADIS-style surface dataset: per-record
//! arrays for position, station name, and observation time, plus one entry
//! per raw variable carrying its values, declared units, and QC flags.
//! Byte-padded strings are decoded here, at the source boundary; nothing
//! downstream sees a NUL terminator.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::units::{PhysicalQuantity, Unit};
use crate::utils::time::decode_time_axis;
use crate::variables::FieldSet;

#[derive(Debug, Deserialize)]
struct RawAxis {
    values: Vec<f64>,
    units: String,
}

#[derive(Debug, Deserialize)]
struct RawVariable {
    values: Vec<f64>,
    units: String,
    #[serde(default)]
    qc: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct StationSourceFile {
    latitude: Vec<f64>,
    longitude: Vec<f64>,
    elevation: RawAxis,
    station_name: Vec<String>,
    time_obs: RawAxis,
    #[serde(default)]
    variables: HashMap<String, RawVariable>,
}

struct StationVariableData {
    quantity: PhysicalQuantity,
    qc: Option<Vec<char>>,
}

/// In-memory station source with units parsed, names decoded, and the time
/// axis resolved to calendar times.
pub struct StationSource {
    station_ids: Vec<String>,
    latitude: Vec<f64>,
    longitude: Vec<f64>,
    elevation: PhysicalQuantity,
    valid_times: Vec<NaiveDateTime>,
    variables: HashMap<String, StationVariableData>,
}

impl StationSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ConvertError::SourceRead(format!("cannot open '{}': {}", path.display(), e))
        })?;
        let parsed: StationSourceFile = serde_json::from_reader(BufReader::new(file))?;
        Self::build(parsed)
    }

    fn build(file: StationSourceFile) -> Result<Self> {
        let len = file.latitude.len();
        for (name, actual) in [
            ("longitude", file.longitude.len()),
            ("elevation", file.elevation.values.len()),
            ("station_name", file.station_name.len()),
            ("time_obs", file.time_obs.values.len()),
        ] {
            if actual != len {
                return Err(ConvertError::SourceRead(format!(
                    "record count mismatch: latitude has {}, {} has {}",
                    len, name, actual
                )));
            }
        }

        let station_ids = file
            .station_name
            .iter()
            .map(|s| decode_fixed_width(s))
            .collect();

        let elevation_unit = Unit::parse(&file.elevation.units)?;
        let elevation = PhysicalQuantity::new(file.elevation.values, elevation_unit);

        let valid_times = decode_time_axis(&file.time_obs.values, &file.time_obs.units)?;

        let mut variables = HashMap::with_capacity(file.variables.len());
        for (name, raw) in file.variables {
            if raw.values.len() != len {
                return Err(ConvertError::SourceRead(format!(
                    "variable '{}' has {} values for {} records",
                    name,
                    raw.values.len(),
                    len
                )));
            }
            let qc = match raw.qc {
                Some(flags) => {
                    if flags.len() != len {
                        return Err(ConvertError::SourceRead(format!(
                            "variable '{}' has {} QC flags for {} records",
                            name,
                            flags.len(),
                            len
                        )));
                    }
                    Some(
                        flags
                            .iter()
                            .map(|f| decode_fixed_width(f).chars().next().unwrap_or('\0'))
                            .collect(),
                    )
                }
                None => None,
            };
            let unit = Unit::parse(&raw.units)?;
            variables.insert(
                name,
                StationVariableData {
                    quantity: PhysicalQuantity::new(raw.values, unit),
                    qc,
                },
            );
        }

        Ok(Self {
            station_ids,
            latitude: file.latitude,
            longitude: file.longitude,
            elevation,
            valid_times,
            variables,
        })
    }

    pub fn len(&self) -> usize {
        self.station_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.station_ids.is_empty()
    }

    pub fn station_id(&self, idx: usize) -> &str {
        &self.station_ids[idx]
    }

    pub fn latitude(&self, idx: usize) -> f64 {
        self.latitude[idx]
    }

    pub fn longitude(&self, idx: usize) -> f64 {
        self.longitude[idx]
    }

    pub fn elevation_value(&self, idx: usize) -> f64 {
        self.elevation.values()[idx]
    }

    pub fn valid_time(&self, idx: usize) -> &NaiveDateTime {
        &self.valid_times[idx]
    }

    /// Collect the named raw fields for a derivation. `elevation` resolves
    /// to the per-station elevation axis; everything else must be a source
    /// variable.
    pub fn gather(&self, names: &[&str]) -> Result<FieldSet> {
        let mut fields = FieldSet::new();
        for &name in names {
            if name == "elevation" {
                fields.insert(name, self.elevation.clone());
                continue;
            }
            let data = self.variables.get(name).ok_or_else(|| {
                ConvertError::SourceRead(format!("source has no variable '{}'", name))
            })?;
            fields.insert(name, data.quantity.clone());
        }
        Ok(fields)
    }

    /// QC flags of the named variable, one char per record.
    pub fn qc_flags(&self, name: &str) -> Result<&[char]> {
        let data = self
            .variables
            .get(name)
            .ok_or_else(|| ConvertError::SourceRead(format!("source has no variable '{}'", name)))?;
        data.qc.as_deref().ok_or_else(|| {
            ConvertError::SourceRead(format!("variable '{}' carries no QC flags", name))
        })
    }
}

/// Trim a fixed-width byte-decoded string at its first NUL terminator and
/// drop trailing blank padding.
fn decode_fixed_width(s: &str) -> String {
    s.split('\0').next().unwrap_or_default().trim_end().to_string()
}
