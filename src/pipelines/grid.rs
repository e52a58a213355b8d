//! Grid pipeline: derive one requested variable from a gridded model
//! source and assemble the field plus its fully populated attributes.

use tracing::info;

use crate::error::{ConvertError, Result};
use crate::models::{GridAttributes, GridField, ProjectionMetadata};
use crate::readers::GridSource;
use crate::units::{PhysicalQuantity, Unit};
use crate::utils::constants::{DEFAULT_X_PIN, DEFAULT_Y_PIN, EARTH_RADIUS_KM, ZERO_DURATION};
use crate::utils::time::format_met_time;
use crate::variables::grid_spec;

/// Explicit configuration for the grid pipeline. The pin coordinates are a
/// property of the verification domain, not of the source file, so they are
/// supplied by the caller.
#[derive(Debug, Clone)]
pub struct GridOptions {
    pub x_pin: f64,
    pub y_pin: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            x_pin: DEFAULT_X_PIN,
            y_pin: DEFAULT_Y_PIN,
        }
    }
}

pub struct GridPipeline {
    options: GridOptions,
}

impl GridPipeline {
    pub fn new() -> Self {
        Self {
            options: GridOptions::default(),
        }
    }

    pub fn with_options(options: GridOptions) -> Self {
        Self { options }
    }

    /// Derive `variable` from the source and assemble the output field.
    pub fn run(&self, source: &GridSource, variable: &str) -> Result<GridField> {
        let spec = grid_spec(variable)?;
        let fields = source.gather(spec.required_fields)?;
        let derived = (spec.derive)(&fields)?;

        let nx = source.nx();
        let ny = source.ny();
        if derived.len() != nx * ny {
            return Err(ConvertError::ShapeMismatch(format!(
                "derived '{}' has {} values for a {}x{} grid",
                variable,
                derived.len(),
                nx,
                ny
            )));
        }

        let units = derived.unit().to_string();
        let values = derived.into_magnitude();
        let mut rows: Vec<Vec<f64>> = values.chunks(nx).map(|chunk| chunk.to_vec()).collect();
        // Native storage runs south to north; MET wants north-up.
        rows.reverse();

        let valid = format_met_time(source.valid_time());
        let attrs = GridAttributes {
            valid: valid.clone(),
            init: valid,
            lead: ZERO_DURATION.to_string(),
            accum: ZERO_DURATION.to_string(),
            name: spec.output_name.to_string(),
            long_name: spec.long_name.to_string(),
            level: spec.level.to_string(),
            units,
            grid: self.projection(source, spec.output_name)?,
        };

        info!(
            variable = spec.output_name,
            level = spec.level,
            nx,
            ny,
            "grid conversion complete"
        );
        Ok(GridField { data: rows, attrs })
    }

    /// Assemble projection metadata from the source's global attributes.
    /// Every attribute is required; nothing is default-filled.
    fn projection(&self, source: &GridSource, name: &str) -> Result<ProjectionMetadata> {
        let spacing = PhysicalQuantity::scalar(source.attr_f64("DX")?, Unit::Meter);
        let d_km = spacing.to(Unit::Kilometer)?.into_magnitude()[0];
        let hemisphere = if source.attr_f64("POLE_LAT")? > 0.0 {
            "N"
        } else {
            "S"
        };

        Ok(ProjectionMetadata {
            projection: source.attr_str("MAP_PROJ_CHAR")?.to_string(),
            hemisphere: hemisphere.to_string(),
            name: name.to_string(),
            nx: source.nx(),
            ny: source.ny(),
            lat_pin: source.attr_f64("CEN_LAT")?,
            lon_pin: source.attr_f64("CEN_LON")?,
            x_pin: self.options.x_pin,
            y_pin: self.options.y_pin,
            lon_orient: source.attr_f64("STAND_LON")?,
            d_km,
            r_km: EARTH_RADIUS_KM,
            scale_lat_1: source.attr_f64("TRUELAT1")?,
            scale_lat_2: source.attr_f64("TRUELAT2")?,
        })
    }
}

impl Default for GridPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn source_from(json: &str) -> GridSource {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        GridSource::from_path(file.path()).unwrap()
    }

    const SAMPLE: &str = r#"{
        "times": "2023-07-15_12:00:00",
        "dimensions": { "west_east": 2, "south_north": 2 },
        "fields": {
            "T2": { "values": [[290.0, 291.0], [293.0, 294.0]], "units": "K" },
            "Q2": { "values": [[0.008, 0.008], [0.008, 0.008]], "units": "kg kg-1" },
            "PSFC": { "values": [[101325.0, 101325.0], [101325.0, 101325.0]], "units": "Pa" },
            "U10": { "values": [[3.0, 3.0], [0.0, 0.0]], "units": "m s-1" },
            "V10": { "values": [[4.0, 4.0], [0.0, 0.0]], "units": "m s-1" }
        },
        "attributes": {
            "DX": 3000.0,
            "MAP_PROJ_CHAR": "Lambert Conformal",
            "POLE_LAT": 90.0,
            "CEN_LAT": 39.5,
            "CEN_LON": -104.8,
            "STAND_LON": -105.0,
            "TRUELAT1": 30.0,
            "TRUELAT2": 60.0
        }
    }"#;

    #[test]
    fn test_passthrough_field_is_flipped_north_up() {
        let source = source_from(SAMPLE);
        let field = GridPipeline::new().run(&source, "T2").unwrap();

        // Native southernmost row [290, 291] ends up last.
        assert_eq!(field.data, vec![vec![293.0, 294.0], vec![290.0, 291.0]]);
        assert_eq!(field.attrs.name, "T2");
        assert_eq!(field.attrs.long_name, "Temperature");
        assert_eq!(field.attrs.level, "Z2");
        assert_eq!(field.attrs.units, "K");
        assert_eq!(field.attrs.valid, "20230715_120000");
        assert_eq!(field.attrs.init, "20230715_120000");
        assert_eq!(field.attrs.lead, "000000");
        assert_eq!(field.attrs.accum, "000000");
    }

    #[test]
    fn test_projection_assembly() {
        let source = source_from(SAMPLE);
        let field = GridPipeline::new().run(&source, "T2").unwrap();
        let grid = &field.attrs.grid;

        assert_eq!(grid.projection, "Lambert Conformal");
        assert_eq!(grid.hemisphere, "N");
        assert_eq!(grid.nx, 2);
        assert_eq!(grid.ny, 2);
        assert!((grid.d_km - 3.0).abs() < 1e-12);
        assert!((grid.r_km - 6371.2).abs() < 1e-12);
        assert!((grid.x_pin - 87.5).abs() < 1e-12);
        assert!((grid.y_pin - 77.0).abs() < 1e-12);
        assert!((grid.lat_pin - 39.5).abs() < 1e-12);
        assert!((grid.lon_orient + 105.0).abs() < 1e-12);
    }

    #[test]
    fn test_rh_reference_case() {
        let source = source_from(SAMPLE);
        let field = GridPipeline::new().run(&source, "RH").unwrap();

        assert_eq!(field.attrs.units, "%");
        assert_eq!(field.attrs.level, "Z2");
        for row in &field.data {
            for &rh in row {
                assert!(rh > 0.0 && rh < 100.0, "rh {}", rh);
            }
        }
        // Warmest cell holds the lowest relative humidity.
        let rh_cold = field.data[1][0]; // 290.0 K cell
        let rh_warm = field.data[0][1]; // 294.0 K cell
        assert!(rh_warm < rh_cold);
    }

    #[test]
    fn test_dewpoint_output() {
        let source = source_from(SAMPLE);
        let field = GridPipeline::new().run(&source, "DPT").unwrap();

        assert_eq!(field.attrs.name, "DPT");
        assert_eq!(field.attrs.units, "K");
        assert_eq!(field.attrs.level, "Z2");
        // Dewpoint in kelvin, below each cell's temperature.
        assert!(field.data[1][0] < 290.0);
        assert!(field.data[1][0] > 270.0);
    }

    #[test]
    fn test_wind_speed_output() {
        let source = source_from(SAMPLE);
        let field = GridPipeline::new().run(&source, "WIND").unwrap();

        assert_eq!(field.attrs.name, "WIND");
        assert_eq!(field.attrs.level, "Z10");
        assert_eq!(field.attrs.units, "m s-1");
        // Southern row (3,4) -> 5; northern row zero wind. North-up puts
        // the zero row first.
        assert_eq!(field.data[0], vec![0.0, 0.0]);
        assert!((field.data[1][0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_component_renaming() {
        let source = source_from(SAMPLE);
        let field = GridPipeline::new().run(&source, "U10").unwrap();
        assert_eq!(field.attrs.name, "U");
        assert_eq!(field.attrs.grid.name, "U");
        assert_eq!(field.attrs.level, "Z10");
    }

    #[test]
    fn test_unsupported_variable() {
        let source = source_from(SAMPLE);
        assert!(matches!(
            GridPipeline::new().run(&source, "BOGUS"),
            Err(ConvertError::UnsupportedVariable(_))
        ));
    }

    #[test]
    fn test_missing_projection_attribute_is_hard_failure() {
        let json = SAMPLE.replace(r#""TRUELAT2": 60.0"#, r#""IRRELEVANT": 0.0"#);
        let source = source_from(&json);
        assert!(matches!(
            GridPipeline::new().run(&source, "T2"),
            Err(ConvertError::MissingMetadata(name)) if name == "TRUELAT2"
        ));
    }

    #[test]
    fn test_pin_override() {
        let source = source_from(SAMPLE);
        let pipeline = GridPipeline::with_options(GridOptions {
            x_pin: 109.0,
            y_pin: 88.0,
        });
        let field = pipeline.run(&source, "T2").unwrap();
        assert!((field.attrs.grid.x_pin - 109.0).abs() < 1e-12);
        assert!((field.attrs.grid.y_pin - 88.0).abs() < 1e-12);
    }
}
