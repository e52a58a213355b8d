//! Station pipeline: derive requested variables from a point-observation
//! source, gate each record on its driving QC flag, and assemble the MET
//! point records.

use tracing::{debug, info};
use validator::Validate;

use crate::error::{ConvertError, Result};
use crate::models::{QcFlag, StationRecord};
use crate::readers::StationSource;
use crate::utils::constants::ACCEPTED_QC_FLAGS;
use crate::utils::time::format_met_time;
use crate::variables::station_spec;

/// Explicit configuration for the station pipeline; nothing is read from
/// the process environment.
#[derive(Debug, Clone)]
pub struct StationOptions {
    /// QC flags that allow a record to be emitted. Everything else,
    /// including the hard-reject codes Z and X, is dropped.
    pub accepted_flags: Vec<char>,
}

impl Default for StationOptions {
    fn default() -> Self {
        Self {
            accepted_flags: ACCEPTED_QC_FLAGS.to_vec(),
        }
    }
}

pub struct StationPipeline {
    options: StationOptions,
}

impl StationPipeline {
    pub fn new() -> Self {
        Self {
            options: StationOptions::default(),
        }
    }

    pub fn with_options(options: StationOptions) -> Self {
        Self { options }
    }

    /// Run the pipeline for the requested variables, in order. Records are
    /// emitted in station iteration order within each variable. An
    /// unsupported variable name aborts the whole run; an untrusted QC flag
    /// only skips its record.
    pub fn run(&self, source: &StationSource, variables: &[String]) -> Result<Vec<StationRecord>> {
        if variables.is_empty() {
            return Err(ConvertError::InvalidInvocation(
                "at least one variable must be requested".to_string(),
            ));
        }

        let mut records = Vec::new();
        for name in variables {
            let spec = station_spec(name)?;
            let fields = source.gather(spec.required_fields)?;
            let derived = (spec.derive)(&fields)?;
            if derived.len() != source.len() {
                return Err(ConvertError::ShapeMismatch(format!(
                    "derived '{}' has {} values for {} records",
                    name,
                    derived.len(),
                    source.len()
                )));
            }
            let values = derived.into_magnitude();
            let qc_flags = source.qc_flags(spec.qc_field)?;

            let mut kept = 0usize;
            for idx in 0..source.len() {
                let flag = QcFlag::new(qc_flags[idx]);
                if !self.is_trusted(flag) {
                    continue;
                }
                let record = StationRecord::new(
                    source.station_id(idx).to_string(),
                    format_met_time(source.valid_time(idx)),
                    source.latitude(idx),
                    source.longitude(idx),
                    source.elevation_value(idx),
                    spec.name.to_string(),
                    spec.level,
                    flag,
                    values[idx],
                );
                record.validate()?;
                records.push(record);
                kept += 1;
            }
            debug!(
                variable = spec.name,
                kept,
                total = source.len(),
                "assembled point records"
            );
        }

        info!(
            records = records.len(),
            variables = variables.len(),
            "station conversion complete"
        );
        Ok(records)
    }

    fn is_trusted(&self, flag: QcFlag) -> bool {
        !flag.is_rejected() && self.options.accepted_flags.contains(&flag.as_char())
    }
}

impl Default for StationPipeline {
    fn default() -> Self {
        Self::new()
    }
}
