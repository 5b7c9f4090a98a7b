//! Rendering of the JSON weather payload into sentences.

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};
use thiserror::Error;

use crate::args::{Arg, ArgumentError, ArgumentModel, TemperatureUnit};

const KELVIN_OFFSET: f64 = 273.15;
const MPS_TO_KMH: f64 = 3.6;
const SECONDS_PER_HOUR: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("weather response is missing field '{0}'")]
    MissingField(String),

    #[error("weather response field '{path}' is not {expected}")]
    InvalidField { path: String, expected: &'static str },

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

/// Build the output text for every requested flag.
///
/// Sentences always come out in the same order (time, sunrise, sunset,
/// pressure, cloud, humidity, wind, temp), each followed by two spaces.
pub fn format_weather(weather: &Value, model: &ArgumentModel) -> Result<String, FormatError> {
    let mut out = String::new();

    if model.contains(Arg::Time) {
        out.push_str(&timezone_sentence(lookup_i64(weather, &["timezone"])?));
    }

    if model.contains(Arg::Sunrise) {
        let at = utc_hhmm(lookup_timestamp(weather, &["sys", "sunrise"])?)?;
        out.push_str(&format!("The sun rises at {at} GMT.  "));
    }

    if model.contains(Arg::Sunset) {
        let at = utc_hhmm(lookup_timestamp(weather, &["sys", "sunset"])?)?;
        out.push_str(&format!("The sun sets at {at} GMT.  "));
    }

    if model.contains(Arg::Pressure) {
        let pressure = lookup_number(weather, &["main", "pressure"])?;
        out.push_str(&format!("The pressure is {pressure}hPa.  "));
    }

    if model.contains(Arg::Cloud) {
        let clouds = lookup_number(weather, &["clouds", "all"])?;
        out.push_str(&format!("There is a {clouds}% chance of clouds.  "));
    }

    if model.contains(Arg::Humidity) {
        let humidity = lookup_number(weather, &["main", "humidity"])?;
        out.push_str(&format!("The humidity is at {humidity}%.  "));
    }

    if model.contains(Arg::Wind) {
        let speed = lookup_f64(weather, &["wind", "speed"])? * MPS_TO_KMH;
        let deg = lookup_number(weather, &["wind", "deg"])?;
        out.push_str(&format!(
            "The wind is moving at {}km/h, in a direction of {deg} degrees.  ",
            render_float(speed)
        ));
    }

    if let Some(unit) = model.temperature_unit() {
        let unit = unit?;
        let high = convert_kelvin(lookup_f64(weather, &["main", "temp_max"])?, unit);
        let low = convert_kelvin(lookup_f64(weather, &["main", "temp_min"])?, unit);
        out.push_str(&format!(
            "The temperature has a high of {high:.1} and a low of {low:.1} degrees {}.  ",
            unit.as_str()
        ));
    }

    Ok(out)
}

/// Offsets are whole hours rounded towards negative infinity; zero reads "before".
fn timezone_sentence(timezone_secs: i64) -> String {
    let offset = timezone_secs.div_euclid(SECONDS_PER_HOUR);
    let hours = offset.abs();

    let suffix = if hours == 1 { " " } else { "s " };
    let direction = if offset > 0 { "past" } else { "before" };

    format!("The timezone is {hours} hour{suffix}{direction} GMT.  ")
}

fn utc_hhmm(ts: i64) -> Result<String, FormatError> {
    let at: DateTime<Utc> =
        DateTime::from_timestamp(ts, 0).ok_or(FormatError::InvalidTimestamp(ts))?;
    Ok(at.format("%H:%M").to_string())
}

fn convert_kelvin(kelvin: f64, unit: TemperatureUnit) -> f64 {
    let celsius = kelvin - KELVIN_OFFSET;
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Shortest round-trip decimal that always keeps a fractional part (`72.0`, not `72`).
///
/// Exponents below -4 or at 16 and above switch to scientific form with a
/// signed, two-digit exponent (`3.6e-05`, `1e+16`).
fn render_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let sci = format!("{:e}", value.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return value.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return value.to_string();
    };

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if !(-4..16).contains(&exp) {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{exp_sign}{:02}", exp.abs())
    } else if exp < 0 {
        format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{digits}{}.0", "0".repeat(int_len - digits.len()))
        } else {
            let (int, frac) = digits.split_at(int_len);
            format!("{int}.{frac}")
        }
    };

    format!("{sign}{body}")
}

fn lookup<'a>(weather: &'a Value, path: &[&str]) -> Result<&'a Value, FormatError> {
    path.iter()
        .try_fold(weather, |node, key| node.get(*key))
        .ok_or_else(|| FormatError::MissingField(path.join(".")))
}

fn lookup_number<'a>(weather: &'a Value, path: &[&str]) -> Result<&'a Number, FormatError> {
    match lookup(weather, path)? {
        Value::Number(n) => Ok(n),
        _ => Err(invalid(path, "a number")),
    }
}

fn lookup_f64(weather: &Value, path: &[&str]) -> Result<f64, FormatError> {
    lookup_number(weather, path)?
        .as_f64()
        .ok_or_else(|| invalid(path, "a number"))
}

fn lookup_i64(weather: &Value, path: &[&str]) -> Result<i64, FormatError> {
    let n = lookup_number(weather, path)?;
    n.as_i64()
        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| invalid(path, "an integer"))
}

/// Unix seconds; fractional timestamps are floored to the whole second.
fn lookup_timestamp(weather: &Value, path: &[&str]) -> Result<i64, FormatError> {
    let n = lookup_number(weather, path)?;
    n.as_i64()
        .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
        .ok_or_else(|| invalid(path, "a timestamp"))
}

fn invalid(path: &[&str], expected: &'static str) -> FormatError {
    FormatError::InvalidField { path: path.join("."), expected }
}
