/// Message type tagging every surface point record.
pub const MESSAGE_TYPE_ADPSFC: &str = "ADPSFC";

/// QC flags that always reject a record.
pub const REJECTED_QC_FLAGS: [char; 2] = ['Z', 'X'];

/// QC flags accepted for record emission (MADIS QC levels: stage 1-3
/// passes, subjective good, and kept/override codes). Anything outside this
/// set is dropped without aborting the run.
pub const ACCEPTED_QC_FLAGS: [char; 6] = ['C', 'S', 'V', 'G', 'K', 'O'];

/// Timestamp format MET expects on point records and grid attributes.
pub const MET_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp format of the WRF `Times` variable.
pub const WRF_TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Fixed lead/accumulation duration for analysis-time surface fields.
pub const ZERO_DURATION: &str = "000000";

/// Spherical earth radius used by the supported projection family, km.
pub const EARTH_RADIUS_KM: f64 = 6371.2;

/// Default grid pin coordinates for the wrfmet domain.
pub const DEFAULT_X_PIN: f64 = 87.5;
pub const DEFAULT_Y_PIN: f64 = 77.0;

/// Vertical level tags for grid fields.
pub const LEVEL_SURFACE: &str = "Z0";
pub const LEVEL_2M: &str = "Z2";
pub const LEVEL_10M: &str = "Z10";
