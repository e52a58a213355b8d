use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ConvertError, Result};
use crate::utils::constants::{MET_TIME_FORMAT, WRF_TIME_FORMAT};

/// Formats accepted for the base date in a "<unit> since <base>" string.
const BASE_DATE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Decode a CF-style time axis ("seconds since 1970-01-01 00:00:00") into
/// calendar times.
pub fn decode_time_axis(offsets: &[f64], units: &str) -> Result<Vec<NaiveDateTime>> {
    let (step, base) = parse_time_units(units)?;
    Ok(offsets
        .iter()
        .map(|&off| base + Duration::milliseconds((off * step * 1000.0).round() as i64))
        .collect())
}

/// Split a CF time-units string into the step length in seconds and the
/// base datetime.
fn parse_time_units(units: &str) -> Result<(f64, NaiveDateTime)> {
    let mut parts = units.splitn(2, " since ");
    let step_name = parts.next().unwrap_or_default().trim().to_lowercase();
    let base_str = parts
        .next()
        .ok_or_else(|| {
            ConvertError::SourceRead(format!("time units '{}' lack a 'since' clause", units))
        })?
        .trim()
        // MADIS writes a trailing fractional second on the epoch.
        .trim_end_matches(".0");

    let step = match step_name.as_str() {
        "second" | "seconds" | "sec" | "secs" | "s" => 1.0,
        "minute" | "minutes" | "min" | "mins" => 60.0,
        "hour" | "hours" | "hr" | "hrs" | "h" => 3600.0,
        "day" | "days" | "d" => 86_400.0,
        _ => {
            return Err(ConvertError::SourceRead(format!(
                "unsupported time step '{}' in units '{}'",
                step_name, units
            )))
        }
    };

    for fmt in BASE_DATE_FORMATS {
        if let Ok(base) = NaiveDateTime::parse_from_str(base_str, fmt) {
            return Ok((step, base));
        }
    }
    // Date-only bases need an explicit midnight.
    if let Ok(date) = NaiveDate::parse_from_str(base_str, "%Y-%m-%d") {
        return Ok((step, NaiveDateTime::new(date, NaiveTime::MIN)));
    }
    Err(ConvertError::SourceRead(format!(
        "unparseable time base '{}' in units '{}'",
        base_str, units
    )))
}

/// Parse the WRF `Times` string (`YYYY-MM-DD_HH:MM:SS`).
pub fn parse_wrf_time(s: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(s.trim(), WRF_TIME_FORMAT)?)
}

/// Render a calendar time in the fixed `YYYYMMDD_HHMMSS` pattern MET reads.
pub fn format_met_time(dt: &NaiveDateTime) -> String {
    dt.format(MET_TIME_FORMAT).to_string()
}
