use serde::Serialize;

/// Map projection and grid geometry parameters, passed through from the
/// model output. Every field is required: a source missing any of them
/// fails with `MissingMetadata` rather than defaulting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionMetadata {
    #[serde(rename = "type")]
    pub projection: String,
    pub hemisphere: String,
    pub name: String,
    pub nx: usize,
    pub ny: usize,
    pub lat_pin: f64,
    pub lon_pin: f64,
    pub x_pin: f64,
    pub y_pin: f64,
    pub lon_orient: f64,
    pub d_km: f64,
    pub r_km: f64,
    pub scale_lat_1: f64,
    pub scale_lat_2: f64,
}

/// Identity, timing, level, and unit attributes for one derived grid
/// field, in the key layout the MET gridded-data interface reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridAttributes {
    pub valid: String,
    pub init: String,
    pub lead: String,
    pub accum: String,
    pub name: String,
    pub long_name: String,
    pub level: String,
    pub units: String,
    pub grid: ProjectionMetadata,
}

/// One derived 2-D field (north-up row order) plus its attribute bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    pub data: Vec<Vec<f64>>,
    pub attrs: GridAttributes,
}
