//! Derivation functions for verification variables.
//!
//! Pure, unit-aware translations of the calculations the conversion scripts
//! need: wind component resolution, humidity from dewpoint or specific
//! humidity, dewpoint inversion, and altimeter-to-station-pressure
//! reduction. Saturation vapor pressure follows Bolton (1980).

use crate::error::{ConvertError, Result};
use crate::units::{PhysicalQuantity, Unit, UnitFamily};

/// Ratio of dry-air to water-vapor gas constants (Rd/Rv).
const EPSILON: f64 = 0.621_956_91;

/// Saturation vapor pressure at 0 degC, Pa.
const SAT_PRESSURE_0C_PA: f64 = 611.2;

/// Standard-atmosphere constants for the altimeter reduction.
const STANDARD_PRESSURE_PA: f64 = 101_325.0;
const STANDARD_TEMPERATURE_K: f64 = 288.0;
const LAPSE_RATE_K_PER_M: f64 = 0.0065;
const DRY_AIR_GAS_CONSTANT: f64 = 287.047;
const GRAVITY_M_PER_S2: f64 = 9.80665;

/// Bolton (1980) saturation vapor pressure, Pa, for temperature in K.
fn saturation_vapor_pressure_pa(t_k: f64) -> f64 {
    SAT_PRESSURE_0C_PA * (17.67 * (t_k - 273.15) / (t_k - 29.65)).exp()
}

/// Invert Bolton's formula: dewpoint in K from vapor pressure in Pa.
fn dewpoint_from_vapor_pressure_k(e_pa: f64) -> f64 {
    let val = (e_pa / SAT_PRESSURE_0C_PA).ln();
    243.5 * val / (17.67 - val) + 273.15
}

fn check_lengths(a: &PhysicalQuantity, b: &PhysicalQuantity, what: &str) -> Result<()> {
    if a.len() != b.len() {
        return Err(ConvertError::ShapeMismatch(format!(
            "{}: {} vs {} elements",
            what,
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// Resolve wind speed and meteorological direction (degrees from north the
/// wind blows from) into U and V components, in the speed's unit.
pub fn wind_components(
    speed: &PhysicalQuantity,
    direction: &PhysicalQuantity,
) -> Result<(PhysicalQuantity, PhysicalQuantity)> {
    check_lengths(speed, direction, "wind speed / direction")?;
    let dir = direction.to(Unit::Degree)?;

    let mut u = Vec::with_capacity(speed.len());
    let mut v = Vec::with_capacity(speed.len());
    for (&s, &d) in speed.values().iter().zip(dir.values()) {
        let theta = d.to_radians();
        u.push(-s * theta.sin());
        v.push(-s * theta.cos());
    }

    Ok((
        PhysicalQuantity::new(u, speed.unit()),
        PhysicalQuantity::new(v, speed.unit()),
    ))
}

/// Vector magnitude of U and V, in U's unit.
pub fn wind_speed(u: &PhysicalQuantity, v: &PhysicalQuantity) -> Result<PhysicalQuantity> {
    check_lengths(u, v, "wind components")?;
    let v_conv = v.to(u.unit())?;
    let speed = u
        .values()
        .iter()
        .zip(v_conv.values())
        .map(|(&uu, &vv)| uu.hypot(vv))
        .collect();
    Ok(PhysicalQuantity::new(speed, u.unit()))
}

/// Relative humidity in percent from temperature and dewpoint.
pub fn relative_humidity_from_dewpoint(
    temperature: &PhysicalQuantity,
    dewpoint: &PhysicalQuantity,
) -> Result<PhysicalQuantity> {
    check_lengths(temperature, dewpoint, "temperature / dewpoint")?;
    let t = temperature.to(Unit::Kelvin)?;
    let td = dewpoint.to(Unit::Kelvin)?;

    let rh = t
        .values()
        .iter()
        .zip(td.values())
        .map(|(&tk, &tdk)| {
            100.0 * saturation_vapor_pressure_pa(tdk) / saturation_vapor_pressure_pa(tk)
        })
        .collect();
    Ok(PhysicalQuantity::new(rh, Unit::Percent))
}

/// Relative humidity in percent from pressure, temperature, and specific
/// humidity: the ratio of the actual to the saturation mixing ratio.
pub fn relative_humidity_from_specific_humidity(
    pressure: &PhysicalQuantity,
    temperature: &PhysicalQuantity,
    specific_humidity: &PhysicalQuantity,
) -> Result<PhysicalQuantity> {
    check_lengths(pressure, temperature, "pressure / temperature")?;
    check_lengths(pressure, specific_humidity, "pressure / specific humidity")?;
    let p = pressure.to(Unit::Pascal)?;
    let t = temperature.to(Unit::Kelvin)?;
    let q = specific_humidity.to(Unit::KilogramPerKilogram)?;

    let mut rh = Vec::with_capacity(p.len());
    for ((&p_pa, &t_k), &q_kgkg) in p.values().iter().zip(t.values()).zip(q.values()) {
        let mixing_ratio = q_kgkg / (1.0 - q_kgkg);
        let es = saturation_vapor_pressure_pa(t_k);
        let saturation_mixing_ratio = EPSILON * es / (p_pa - es);
        rh.push(100.0 * mixing_ratio / saturation_mixing_ratio);
    }
    Ok(PhysicalQuantity::new(rh, Unit::Percent))
}

/// Dewpoint in K from pressure, temperature, and specific humidity, by
/// inverting the saturation relation at the implied vapor pressure.
pub fn dewpoint_from_specific_humidity(
    pressure: &PhysicalQuantity,
    temperature: &PhysicalQuantity,
    specific_humidity: &PhysicalQuantity,
) -> Result<PhysicalQuantity> {
    let rh = relative_humidity_from_specific_humidity(pressure, temperature, specific_humidity)?;
    let t = temperature.to(Unit::Kelvin)?;

    let dewpoint = rh
        .values()
        .iter()
        .zip(t.values())
        .map(|(&rh_pct, &t_k)| {
            let e = (rh_pct / 100.0) * saturation_vapor_pressure_pa(t_k);
            dewpoint_from_vapor_pressure_k(e)
        })
        .collect();
    Ok(PhysicalQuantity::new(dewpoint, Unit::Kelvin))
}

/// Reduce an altimeter setting to station pressure using station elevation.
///
/// Standard-atmosphere reduction: p = (a^n - p0^n * gamma * h / T0)^(1/n)
/// with n = Rd * gamma / g. The output stays in the altimeter's unit.
pub fn altimeter_to_station_pressure(
    altimeter: &PhysicalQuantity,
    elevation: &PhysicalQuantity,
) -> Result<PhysicalQuantity> {
    check_lengths(altimeter, elevation, "altimeter / elevation")?;
    if altimeter.unit().family() != UnitFamily::Pressure {
        return Err(ConvertError::UnitMismatch {
            expected: UnitFamily::Pressure.to_string(),
            found: altimeter.unit().family().to_string(),
        });
    }
    let height = elevation.to(Unit::Meter)?;

    let n = DRY_AIR_GAS_CONSTANT * LAPSE_RATE_K_PER_M / GRAVITY_M_PER_S2;
    let p0 = Unit::Pascal.convert(STANDARD_PRESSURE_PA, altimeter.unit())?;

    let mut station_pressure = Vec::with_capacity(altimeter.len());
    for (&a, &h) in altimeter.values().iter().zip(height.values()) {
        let reduced =
            (a.powf(n) - p0.powf(n) * LAPSE_RATE_K_PER_M * h / STANDARD_TEMPERATURE_K).powf(1.0 / n);
        station_pressure.push(reduced);
    }
    Ok(PhysicalQuantity::new(station_pressure, altimeter.unit()))
}
