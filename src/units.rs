use std::fmt;

use crate::error::{ConvertError, Result};

/// Dimension family a unit belongs to. Conversions are only defined within
/// a family; crossing families is a [`ConvertError::UnitMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Temperature,
    Pressure,
    Speed,
    Angle,
    Ratio,
    MassRatio,
    Length,
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitFamily::Temperature => "temperature",
            UnitFamily::Pressure => "pressure",
            UnitFamily::Speed => "speed",
            UnitFamily::Angle => "angle",
            UnitFamily::Ratio => "ratio",
            UnitFamily::MassRatio => "mass ratio",
            UnitFamily::Length => "length",
        };
        write!(f, "{}", name)
    }
}

/// Closed set of units the raw sources declare.
///
/// Parsing accepts the netCDF spelling variants found in MADIS and WRF
/// output ("kelvin", "K", "hPa", "millibar", "m/s", "m s-1", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kelvin,
    Celsius,
    Fahrenheit,
    Pascal,
    Hectopascal,
    InchesOfMercury,
    MeterPerSecond,
    Knot,
    Degree,
    Percent,
    Fraction,
    KilogramPerKilogram,
    GramPerKilogram,
    Meter,
    Kilometer,
    Foot,
}

impl Unit {
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "k" | "kelvin" | "kelvins" | "degk" | "deg_k" => Ok(Unit::Kelvin),
            "c" | "celsius" | "degc" | "deg_c" | "degree_celsius" => Ok(Unit::Celsius),
            "f" | "fahrenheit" | "degf" | "deg_f" => Ok(Unit::Fahrenheit),
            "pa" | "pascal" | "pascals" => Ok(Unit::Pascal),
            "hpa" | "hectopascal" | "hectopascals" | "mb" | "mbar" | "millibar" | "millibars" => {
                Ok(Unit::Hectopascal)
            }
            "inhg" | "inch_hg" | "inches_of_mercury" => Ok(Unit::InchesOfMercury),
            "m/s" | "m s-1" | "m_s-1" | "meter/sec" | "meters/second" | "meter_per_second"
            | "meters_per_second" => Ok(Unit::MeterPerSecond),
            "kt" | "knot" | "knots" => Ok(Unit::Knot),
            "degree" | "degrees" | "deg" | "degree_true" | "degrees_true" => Ok(Unit::Degree),
            "%" | "percent" => Ok(Unit::Percent),
            "1" | "fraction" | "dimensionless" => Ok(Unit::Fraction),
            "kg/kg" | "kg kg-1" | "kg_kg-1" => Ok(Unit::KilogramPerKilogram),
            "g/kg" | "g kg-1" | "g_kg-1" => Ok(Unit::GramPerKilogram),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Unit::Meter),
            "km" | "kilometer" | "kilometers" => Ok(Unit::Kilometer),
            "ft" | "foot" | "feet" => Ok(Unit::Foot),
            _ => Err(ConvertError::UnknownUnit(s.to_string())),
        }
    }

    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Kelvin | Unit::Celsius | Unit::Fahrenheit => UnitFamily::Temperature,
            Unit::Pascal | Unit::Hectopascal | Unit::InchesOfMercury => UnitFamily::Pressure,
            Unit::MeterPerSecond | Unit::Knot => UnitFamily::Speed,
            Unit::Degree => UnitFamily::Angle,
            Unit::Percent | Unit::Fraction => UnitFamily::Ratio,
            Unit::KilogramPerKilogram | Unit::GramPerKilogram => UnitFamily::MassRatio,
            Unit::Meter | Unit::Kilometer | Unit::Foot => UnitFamily::Length,
        }
    }

    /// Convert a value in this unit to the family's base unit
    /// (K, Pa, m/s, degree, fraction, kg/kg, m).
    fn to_base(&self, value: f64) -> f64 {
        match self {
            Unit::Kelvin => value,
            Unit::Celsius => value + 273.15,
            Unit::Fahrenheit => (value + 459.67) * 5.0 / 9.0,
            Unit::Pascal => value,
            Unit::Hectopascal => value * 100.0,
            Unit::InchesOfMercury => value * 3386.389,
            Unit::MeterPerSecond => value,
            Unit::Knot => value * 0.514_444_444,
            Unit::Degree => value,
            Unit::Percent => value / 100.0,
            Unit::Fraction => value,
            Unit::KilogramPerKilogram => value,
            Unit::GramPerKilogram => value / 1000.0,
            Unit::Meter => value,
            Unit::Kilometer => value * 1000.0,
            Unit::Foot => value * 0.3048,
        }
    }

    fn from_base(&self, value: f64) -> f64 {
        match self {
            Unit::Kelvin => value,
            Unit::Celsius => value - 273.15,
            Unit::Fahrenheit => value * 9.0 / 5.0 - 459.67,
            Unit::Pascal => value,
            Unit::Hectopascal => value / 100.0,
            Unit::InchesOfMercury => value / 3386.389,
            Unit::MeterPerSecond => value,
            Unit::Knot => value / 0.514_444_444,
            Unit::Degree => value,
            Unit::Percent => value * 100.0,
            Unit::Fraction => value,
            Unit::KilogramPerKilogram => value,
            Unit::GramPerKilogram => value * 1000.0,
            Unit::Meter => value,
            Unit::Kilometer => value / 1000.0,
            Unit::Foot => value / 0.3048,
        }
    }

    pub fn convert(&self, value: f64, target: Unit) -> Result<f64> {
        if self.family() != target.family() {
            return Err(ConvertError::UnitMismatch {
                expected: target.family().to_string(),
                found: self.family().to_string(),
            });
        }
        Ok(target.from_base(self.to_base(value)))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Unit::Kelvin => "K",
            Unit::Celsius => "degC",
            Unit::Fahrenheit => "degF",
            Unit::Pascal => "Pa",
            Unit::Hectopascal => "hPa",
            Unit::InchesOfMercury => "inHg",
            Unit::MeterPerSecond => "m s-1",
            Unit::Knot => "knot",
            Unit::Degree => "degree",
            Unit::Percent => "%",
            Unit::Fraction => "1",
            Unit::KilogramPerKilogram => "kg kg-1",
            Unit::GramPerKilogram => "g kg-1",
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Foot => "ft",
        };
        write!(f, "{}", label)
    }
}

/// A numeric array paired with its unit tag.
///
/// All derivation functions take and return `PhysicalQuantity`; the unit tag
/// is only dropped at [`PhysicalQuantity::into_magnitude`], the single point
/// where values cross into the unit-free output assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalQuantity {
    values: Vec<f64>,
    unit: Unit,
}

impl PhysicalQuantity {
    pub fn new(values: Vec<f64>, unit: Unit) -> Self {
        Self { values, unit }
    }

    pub fn scalar(value: f64, unit: Unit) -> Self {
        Self::new(vec![value], unit)
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert every element to `target`, failing across unit families.
    pub fn to(&self, target: Unit) -> Result<PhysicalQuantity> {
        if self.unit == target {
            return Ok(self.clone());
        }
        let converted = self
            .values
            .iter()
            .map(|&v| self.unit.convert(v, target))
            .collect::<Result<Vec<f64>>>()?;
        Ok(PhysicalQuantity::new(converted, target))
    }

    /// Strip the unit tag. This is the only sanctioned exit from the
    /// unit-aware world; downstream record assembly works on bare numbers.
    pub fn into_magnitude(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spelling_variants() {
        assert_eq!(Unit::parse("kelvin").unwrap(), Unit::Kelvin);
        assert_eq!(Unit::parse("K").unwrap(), Unit::Kelvin);
        assert_eq!(Unit::parse(" hPa ").unwrap(), Unit::Hectopascal);
        assert_eq!(Unit::parse("millibar").unwrap(), Unit::Hectopascal);
        assert_eq!(Unit::parse("m s-1").unwrap(), Unit::MeterPerSecond);
        assert_eq!(Unit::parse("m/s").unwrap(), Unit::MeterPerSecond);
        assert_eq!(Unit::parse("degrees_true").unwrap(), Unit::Degree);
        assert_eq!(Unit::parse("kg kg-1").unwrap(), Unit::KilogramPerKilogram);
        assert_eq!(Unit::parse("%").unwrap(), Unit::Percent);
    }

    #[test]
    fn test_parse_unknown_unit() {
        assert!(matches!(
            Unit::parse("furlongs"),
            Err(ConvertError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_temperature_conversion() {
        let t = PhysicalQuantity::scalar(20.0, Unit::Celsius);
        let k = t.to(Unit::Kelvin).unwrap();
        assert!((k.values()[0] - 293.15).abs() < 1e-9);

        let f = PhysicalQuantity::scalar(32.0, Unit::Fahrenheit);
        let k = f.to(Unit::Kelvin).unwrap();
        assert!((k.values()[0] - 273.15).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_conversion() {
        let p = PhysicalQuantity::scalar(1013.25, Unit::Hectopascal);
        let pa = p.to(Unit::Pascal).unwrap();
        assert!((pa.values()[0] - 101325.0).abs() < 1e-6);

        let inhg = p.to(Unit::InchesOfMercury).unwrap();
        assert!((inhg.values()[0] - 29.92).abs() < 0.01);
    }

    #[test]
    fn test_cross_family_conversion_fails() {
        let t = PhysicalQuantity::scalar(293.15, Unit::Kelvin);
        assert!(matches!(
            t.to(Unit::Pascal),
            Err(ConvertError::UnitMismatch { .. })
        ));
    }

    #[test]
    fn test_same_unit_is_identity() {
        let q = PhysicalQuantity::new(vec![1.0, 2.0, 3.0], Unit::Meter);
        let same = q.to(Unit::Meter).unwrap();
        assert_eq!(same.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_meters_to_kilometers() {
        let d = PhysicalQuantity::scalar(3000.0, Unit::Meter);
        let km = d.to(Unit::Kilometer).unwrap();
        assert!((km.values()[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Unit::MeterPerSecond.to_string(), "m s-1");
        assert_eq!(Unit::Percent.to_string(), "%");
        assert_eq!(Unit::Kelvin.to_string(), "K");
    }
}
