//! Dispatch table for the grid (model field) pipeline.

use crate::calc;
use crate::error::{ConvertError, Result};
use crate::units::PhysicalQuantity;
use crate::utils::constants::{LEVEL_10M, LEVEL_2M, LEVEL_SURFACE};
use crate::variables::{DeriveFn, FieldSet};

/// One supported grid variable: requested name, output identity, vertical
/// level tag, required raw fields, and derivation. The output unit is
/// whatever the derivation returns (source unit for passthroughs, canonical
/// unit for computed quantities).
pub struct GridVariableSpec {
    /// Name the variable is requested by (the raw WRF field name for
    /// passthroughs).
    pub request_name: &'static str,
    /// Name the field is published under.
    pub output_name: &'static str,
    pub long_name: &'static str,
    pub level: &'static str,
    pub required_fields: &'static [&'static str],
    pub derive: DeriveFn,
}

pub const GRID_VARIABLES: &[GridVariableSpec] = &[
    GridVariableSpec {
        request_name: "T2",
        output_name: "T2",
        long_name: "Temperature",
        level: LEVEL_2M,
        required_fields: &["T2"],
        derive: derive_t2,
    },
    GridVariableSpec {
        request_name: "DPT",
        output_name: "DPT",
        long_name: "Dew Point Temperature",
        level: LEVEL_2M,
        required_fields: &["PSFC", "T2", "Q2"],
        derive: derive_dewpoint,
    },
    GridVariableSpec {
        request_name: "U10",
        output_name: "U",
        long_name: "U Wind",
        level: LEVEL_10M,
        required_fields: &["U10"],
        derive: derive_u10,
    },
    GridVariableSpec {
        request_name: "V10",
        output_name: "V",
        // Lowercase "wind" is the published spelling, unlike U's.
        long_name: "V wind",
        level: LEVEL_10M,
        required_fields: &["V10"],
        derive: derive_v10,
    },
    GridVariableSpec {
        request_name: "RH",
        output_name: "RH",
        long_name: "Relative Humidity",
        level: LEVEL_2M,
        required_fields: &["PSFC", "T2", "Q2"],
        derive: derive_relative_humidity,
    },
    GridVariableSpec {
        request_name: "PSFC",
        output_name: "PSFC",
        long_name: "Surface Pressure",
        level: LEVEL_SURFACE,
        required_fields: &["PSFC"],
        derive: derive_psfc,
    },
    GridVariableSpec {
        request_name: "WIND",
        output_name: "WIND",
        long_name: "Wind Speed",
        level: LEVEL_10M,
        required_fields: &["U10", "V10"],
        derive: derive_wind_speed,
    },
];

pub fn grid_spec(name: &str) -> Result<&'static GridVariableSpec> {
    GRID_VARIABLES
        .iter()
        .find(|spec| spec.request_name == name)
        .ok_or_else(|| ConvertError::UnsupportedVariable(name.to_string()))
}

fn derive_t2(fields: &FieldSet) -> Result<PhysicalQuantity> {
    Ok(fields.get("T2")?.clone())
}

fn derive_u10(fields: &FieldSet) -> Result<PhysicalQuantity> {
    Ok(fields.get("U10")?.clone())
}

fn derive_v10(fields: &FieldSet) -> Result<PhysicalQuantity> {
    Ok(fields.get("V10")?.clone())
}

fn derive_psfc(fields: &FieldSet) -> Result<PhysicalQuantity> {
    Ok(fields.get("PSFC")?.clone())
}

fn derive_dewpoint(fields: &FieldSet) -> Result<PhysicalQuantity> {
    calc::dewpoint_from_specific_humidity(
        fields.get("PSFC")?,
        fields.get("T2")?,
        fields.get("Q2")?,
    )
}

fn derive_relative_humidity(fields: &FieldSet) -> Result<PhysicalQuantity> {
    calc::relative_humidity_from_specific_humidity(
        fields.get("PSFC")?,
        fields.get("T2")?,
        fields.get("Q2")?,
    )
}

fn derive_wind_speed(fields: &FieldSet) -> Result<PhysicalQuantity> {
    calc::wind_speed(fields.get("U10")?, fields.get("V10")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_lookup_is_total_over_supported_names() {
        for name in ["T2", "DPT", "U10", "V10", "RH", "PSFC", "WIND"] {
            assert!(grid_spec(name).is_ok(), "missing spec for {}", name);
        }
    }

    #[test]
    fn test_unsupported_name_fails() {
        assert!(matches!(
            grid_spec("BOGUS"),
            Err(ConvertError::UnsupportedVariable(_))
        ));
    }

    #[test]
    fn test_wind_fields_publish_component_names() {
        assert_eq!(grid_spec("U10").unwrap().output_name, "U");
        assert_eq!(grid_spec("V10").unwrap().output_name, "V");
        assert_eq!(grid_spec("U10").unwrap().level, "Z10");
    }

    #[test]
    fn test_long_names_match_published_spellings() {
        // Downstream consumers match on these strings verbatim, including
        // the uneven wind-component casing.
        assert_eq!(grid_spec("U10").unwrap().long_name, "U Wind");
        assert_eq!(grid_spec("V10").unwrap().long_name, "V wind");
        assert_eq!(grid_spec("DPT").unwrap().long_name, "Dew Point Temperature");
        assert_eq!(grid_spec("WIND").unwrap().long_name, "Wind Speed");
    }

    #[test]
    fn test_level_tagging_convention() {
        assert_eq!(grid_spec("T2").unwrap().level, "Z2");
        assert_eq!(grid_spec("RH").unwrap().level, "Z2");
        assert_eq!(grid_spec("PSFC").unwrap().level, "Z0");
        assert_eq!(grid_spec("WIND").unwrap().level, "Z10");
    }

    #[test]
    fn test_wind_speed_through_table() {
        let mut fields = FieldSet::new();
        fields.insert("U10", PhysicalQuantity::scalar(3.0, Unit::MeterPerSecond));
        fields.insert("V10", PhysicalQuantity::scalar(4.0, Unit::MeterPerSecond));

        let spec = grid_spec("WIND").unwrap();
        let speed = (spec.derive)(&fields).unwrap();
        assert!((speed.values()[0] - 5.0).abs() < 1e-12);
        assert_eq!(speed.unit(), Unit::MeterPerSecond);
    }
}
