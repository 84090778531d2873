//! Per-cycle report and its flat JSON wire form.
//!
//! A [`Report`] is assembled once after the sample window closes and the
//! sensors have been read, serialised once by the publisher, then dropped.
//! Every float is rounded to two decimal places before serialisation, and
//! the safety classification is computed from those rounded values so the
//! published `SAFESTAT` always agrees with the published numbers.

use serde::Serialize;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::config::StationConfig;
use crate::metrics::{self, Safety};
use crate::sampler::WindowSummary;
use crate::sensors::wind_vane::WindSector;
use crate::sensors::{RawSample, round2};

/// Flat key/value payload published to the data topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(rename = "DATETIME", skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(rename = "TEMP")]
    pub temperature_c: f64,
    #[serde(rename = "DEWPNT")]
    pub dew_point_c: f64,
    #[serde(rename = "HUMID")]
    pub humidity_pct: f64,
    #[serde(rename = "PRESS")]
    pub pressure_hpa: f64,
    #[serde(rename = "LIGHT")]
    pub light_raw: u16,
    #[serde(rename = "LUX")]
    pub lux: f64,
    #[serde(rename = "FREEMEM")]
    pub free_mem_bytes: u32,
    #[serde(rename = "WINDDIR")]
    pub wind_direction: WindSector,
    #[serde(rename = "WINDDEG")]
    pub wind_degrees: f64,
    #[serde(rename = "RAIN")]
    pub rain_mm: f64,
    #[serde(rename = "WINDSPEED")]
    pub wind_speed_mph: f64,
    #[serde(rename = "BATVOLT")]
    pub battery_volts: f64,
    #[serde(rename = "BATPERC")]
    pub battery_pct: u8,
    #[serde(rename = "SAFESTAT")]
    pub safety: Safety,
}

/// Everything a report is derived from, gathered by the cycle runner.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs {
    pub sample: RawSample,
    pub window: WindowSummary,
    pub vane: (WindSector, f32),
    pub free_heap_bytes: u32,
    pub timestamp: Option<OffsetDateTime>,
}

impl Report {
    pub fn build(inputs: &ReportInputs, config: &StationConfig) -> Self {
        let s = &inputs.sample;
        let temperature = round2(f64::from(s.temperature_c));
        let humidity = round2(f64::from(s.relative_humidity_pct));
        let pressure = round2(f64::from(s.pressure_hpa));
        let lux = round2(f64::from(s.lux));

        let wind_speed = if config.record_interval_secs == 0 {
            0.0
        } else {
            round2(metrics::wind_speed_mph(
                inputs.window.wind_count,
                f64::from(config.record_interval_secs),
                config.anemometer_radius_cm,
            ))
        };
        let rain = metrics::rainfall_mm(inputs.window.rain_count, config.bucket_size_mm);
        let (sector, degrees) = inputs.vane;

        let datetime = if config.include_timestamp {
            inputs
                .timestamp
                .and_then(|t| format_timestamp(t, config.tz_offset_hours))
        } else {
            None
        };

        Self {
            datetime,
            temperature_c: temperature,
            dew_point_c: round2(metrics::dew_point_c(temperature, humidity)),
            humidity_pct: humidity,
            pressure_hpa: round2(metrics::adjusted_pressure_at(
                pressure,
                temperature,
                config.station_altitude_m,
            )),
            light_raw: s.ambient_light_raw,
            lux,
            free_mem_bytes: inputs.free_heap_bytes,
            wind_direction: sector,
            wind_degrees: round2(f64::from(degrees)),
            rain_mm: rain,
            wind_speed_mph: wind_speed,
            battery_volts: round2(f64::from(s.battery_volts)),
            battery_pct: s.battery_pct,
            safety: metrics::classify_safety(lux, wind_speed, rain),
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` in the configured local offset.
///
/// Returns `None` for an offset outside ±23 h or a date that cannot be
/// formatted; the report then simply omits `DATETIME`.
pub fn format_timestamp(utc: OffsetDateTime, tz_offset_hours: i8) -> Option<String> {
    let offset = UtcOffset::from_hms(tz_offset_hours, 0, 0).ok()?;
    utc.to_offset(offset)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .ok()
}

/// Payload published to the alarm topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmPayload {
    #[serde(rename = "ALARM")]
    pub alarm: String,
}

impl AlarmPayload {
    pub fn for_subsystem(subsystem: &str) -> Self {
        Self {
            alarm: format!("{subsystem} exception occurred"),
        }
    }
}
