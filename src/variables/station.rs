//! Dispatch table for the station (point observation) pipeline.

use crate::calc;
use crate::error::{ConvertError, Result};
use crate::units::PhysicalQuantity;
use crate::variables::{DeriveFn, FieldSet};

/// One supported station variable: the raw fields it needs, the field whose
/// QC flag gates its records, the MET vertical level, and its derivation.
pub struct StationVariableSpec {
    pub name: &'static str,
    pub required_fields: &'static [&'static str],
    /// Raw field whose QC flag decides record emission.
    pub qc_field: &'static str,
    pub level: i64,
    pub derive: DeriveFn,
}

pub const STATION_VARIABLES: &[StationVariableSpec] = &[
    StationVariableSpec {
        name: "temperature",
        required_fields: &["temperature"],
        qc_field: "temperature",
        level: 2,
        derive: derive_temperature,
    },
    StationVariableSpec {
        name: "dewpoint",
        required_fields: &["dewpoint"],
        qc_field: "dewpoint",
        level: 2,
        derive: derive_dewpoint,
    },
    StationVariableSpec {
        name: "U",
        required_fields: &["windSpeed", "windDir"],
        qc_field: "windSpeed",
        level: 10,
        derive: derive_wind_u,
    },
    StationVariableSpec {
        name: "V",
        required_fields: &["windSpeed", "windDir"],
        qc_field: "windSpeed",
        level: 10,
        derive: derive_wind_v,
    },
    StationVariableSpec {
        name: "RH",
        required_fields: &["temperature", "dewpoint"],
        qc_field: "dewpoint",
        level: 2,
        derive: derive_relative_humidity,
    },
    StationVariableSpec {
        name: "PSFC",
        required_fields: &["altimeter", "elevation"],
        qc_field: "altimeter",
        level: 0,
        derive: derive_station_pressure,
    },
];

pub fn station_spec(name: &str) -> Result<&'static StationVariableSpec> {
    STATION_VARIABLES
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| ConvertError::UnsupportedVariable(name.to_string()))
}

fn derive_temperature(fields: &FieldSet) -> Result<PhysicalQuantity> {
    Ok(fields.get("temperature")?.clone())
}

fn derive_dewpoint(fields: &FieldSet) -> Result<PhysicalQuantity> {
    Ok(fields.get("dewpoint")?.clone())
}

fn derive_wind_u(fields: &FieldSet) -> Result<PhysicalQuantity> {
    let (u, _) = calc::wind_components(fields.get("windSpeed")?, fields.get("windDir")?)?;
    Ok(u)
}

fn derive_wind_v(fields: &FieldSet) -> Result<PhysicalQuantity> {
    let (_, v) = calc::wind_components(fields.get("windSpeed")?, fields.get("windDir")?)?;
    Ok(v)
}

fn derive_relative_humidity(fields: &FieldSet) -> Result<PhysicalQuantity> {
    calc::relative_humidity_from_dewpoint(fields.get("temperature")?, fields.get("dewpoint")?)
}

fn derive_station_pressure(fields: &FieldSet) -> Result<PhysicalQuantity> {
    calc::altimeter_to_station_pressure(fields.get("altimeter")?, fields.get("elevation")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_lookup_is_total_over_supported_names() {
        for name in ["temperature", "dewpoint", "U", "V", "RH", "PSFC"] {
            assert!(station_spec(name).is_ok(), "missing spec for {}", name);
        }
    }

    #[test]
    fn test_unsupported_name_fails() {
        assert!(matches!(
            station_spec("BOGUS"),
            Err(ConvertError::UnsupportedVariable(_))
        ));
    }

    #[test]
    fn test_wind_levels_and_qc_gating() {
        let u = station_spec("U").unwrap();
        let v = station_spec("V").unwrap();
        // Both components sit at 10 m and are gated by the speed's flag.
        assert_eq!(u.level, 10);
        assert_eq!(v.level, 10);
        assert_eq!(u.qc_field, "windSpeed");
        assert_eq!(v.qc_field, "windSpeed");

        assert_eq!(station_spec("PSFC").unwrap().level, 0);
        assert_eq!(station_spec("RH").unwrap().qc_field, "dewpoint");
    }

    #[test]
    fn test_wind_component_derivation_through_table() {
        let mut fields = FieldSet::new();
        fields.insert(
            "windSpeed",
            PhysicalQuantity::scalar(10.0, Unit::MeterPerSecond),
        );
        fields.insert("windDir", PhysicalQuantity::scalar(180.0, Unit::Degree));

        let spec = station_spec("V").unwrap();
        let v = (spec.derive)(&fields).unwrap();
        // Southerly wind blows northward: v = +speed.
        assert!((v.values()[0] - 10.0).abs() < 1e-10);
    }
}
