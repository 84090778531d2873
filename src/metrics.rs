//! Derived meteorological quantities.
//!
//! Pure conversions from raw counts and readings to the physical values
//! the report carries. No I/O, no state.

use core::f64::consts::PI;

use serde::Serialize;

use crate::sensors::round2;

/// Empirical calibration of the cup anemometer (cup drag losses).
pub const ANEMOMETER_FACTOR: f64 = 1.18;
/// Anemometer reed closures per full rotation.
pub const PULSES_PER_ROTATION: f64 = 2.0;
pub const MPH_PER_KMH: f64 = 0.621_371_192_2;

/// Altitude proxy (m) for the sea-level pressure correction.
pub const STATION_ALTITUDE_M: f64 = 100.0;

// Safety thresholds: fixed, not configurable.
pub const SAFE_LUX_BELOW: f64 = 1.0;
pub const SAFE_WIND_MPH_BELOW: f64 = 10.0;

/// Mean wind speed over a window.
///
/// `window_seconds` must be positive; callers guarantee it.
pub fn wind_speed_mph(pulse_count: u32, window_seconds: f64, radius_cm: f64) -> f64 {
    debug_assert!(window_seconds > 0.0, "wind window must be positive");
    let circumference_cm = 2.0 * PI * radius_cm;
    let rotations = f64::from(pulse_count) / PULSES_PER_ROTATION;
    let distance_km = circumference_cm * rotations / 100_000.0;
    let km_per_hour = distance_km / window_seconds * 3600.0 * ANEMOMETER_FACTOR;
    km_per_hour * MPH_PER_KMH
}

/// Dew point (°C). Defined for any `rh`; only meaningful for 0 < rh ≤ 100.
pub fn dew_point_c(temp_c: f64, relative_humidity_pct: f64) -> f64 {
    (relative_humidity_pct / 100.0).powf(0.125) * (112.0 + 0.9 * temp_c) + 0.1 * temp_c - 112.0
}

/// Sea-level-adjusted pressure (hPa) at the fixed altitude proxy.
pub fn adjusted_pressure(raw_hpa: f64, temp_c: f64) -> f64 {
    adjusted_pressure_at(raw_hpa, temp_c, STATION_ALTITUDE_M)
}

/// Barometric correction for an explicit station altitude.
pub fn adjusted_pressure_at(raw_hpa: f64, temp_c: f64, altitude_m: f64) -> f64 {
    let lapse = 0.0065 * altitude_m;
    raw_hpa * (1.0 - lapse / (temp_c + lapse + 273.15)).powf(-5.257)
}

/// Rainfall (mm) over the window, rounded to 2 decimal places.
pub fn rainfall_mm(tip_count: u32, bucket_size_mm: f64) -> f64 {
    round2(f64::from(tip_count) * bucket_size_mm)
}

/// Outdoor-work safety classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Safety {
    Safe,
    Unsafe,
}

/// SAFE only when it is dark, calm and dry.
pub fn classify_safety(lux: f64, wind_mph: f64, rainfall: f64) -> Safety {
    if lux < SAFE_LUX_BELOW && wind_mph < SAFE_WIND_MPH_BELOW && rainfall == 0.0 {
        Safety::Safe
    } else {
        Safety::Unsafe
    }
}
