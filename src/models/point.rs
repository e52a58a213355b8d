use serde::ser::{Serialize, SerializeTuple, Serializer};
use validator::Validate;

use crate::utils::constants::{ACCEPTED_QC_FLAGS, MESSAGE_TYPE_ADPSFC, REJECTED_QC_FLAGS};

/// Single-character quality-control code attached to a raw observation.
///
/// MADIS marks records with `Z` (no QC applied) or `X` (failed QC); those
/// always reject. The positive accept set is the documented QC levels in
/// [`ACCEPTED_QC_FLAGS`]; any other character, including malformed or empty
/// flags, is treated as untrusted and the record is dropped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QcFlag(char);

impl QcFlag {
    pub fn new(flag: char) -> Self {
        Self(flag)
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    pub fn is_rejected(&self) -> bool {
        REJECTED_QC_FLAGS.contains(&self.0)
    }

    pub fn is_accepted(&self) -> bool {
        ACCEPTED_QC_FLAGS.contains(&self.0)
    }
}

impl Serialize for QcFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.0)
    }
}

/// One verification-ready observation: a single variable at a single
/// station and valid time.
///
/// Immutable once assembled; serializes as the positional 11-column row the
/// MET point-data interface reads.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct StationRecord {
    pub message_type: String,
    pub station_id: String,
    pub valid_time: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub elevation: f64,
    pub variable: String,
    pub level: i64,
    /// Observation height; surface obs repeat the station elevation.
    pub height: f64,
    pub qc_flag: QcFlag,
    pub value: f64,
}

impl StationRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        station_id: String,
        valid_time: String,
        latitude: f64,
        longitude: f64,
        elevation: f64,
        variable: String,
        level: i64,
        qc_flag: QcFlag,
        value: f64,
    ) -> Self {
        Self {
            message_type: MESSAGE_TYPE_ADPSFC.to_string(),
            station_id,
            valid_time,
            latitude,
            longitude,
            elevation,
            variable,
            level,
            height: elevation,
            qc_flag,
            value,
        }
    }
}

impl Serialize for StationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Column order is fixed by the MET point-data contract:
        // (typ, sid, vld, lat, lon, elv, var, lvl, hgt, qc, obs)
        let mut row = serializer.serialize_tuple(11)?;
        row.serialize_element(&self.message_type)?;
        row.serialize_element(&self.station_id)?;
        row.serialize_element(&self.valid_time)?;
        row.serialize_element(&self.latitude)?;
        row.serialize_element(&self.longitude)?;
        row.serialize_element(&self.elevation)?;
        row.serialize_element(&self.variable)?;
        row.serialize_element(&self.level)?;
        row.serialize_element(&self.height)?;
        row.serialize_element(&self.qc_flag)?;
        row.serialize_element(&self.value)?;
        row.end()
    }
}
