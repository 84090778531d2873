//! Sensor subsystem: drivers, decoders and the aggregating [`SensorHub`].
//!
//! The hub owns the three I²C sensors and produces one [`RawSample`] per
//! cycle, read once after the sample window closes. The pulse counter and
//! wind vane decoder are pure logic fed by the line ports.

pub mod bme280;
pub mod max17048;
pub mod pulse;
pub mod veml7700;
pub mod wind_vane;

#[cfg(test)]
pub(crate) mod fake_i2c;

use log::info;

use crate::app::ports::{BatteryMonitor, EnvironmentSensor, LightSensor};
use crate::error::{Error, Sensor};

/// Every one-shot measurement of a cycle. Each field came from a fallible
/// read; a failed read never produces a `RawSample` at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub temperature_c: f32,
    pub relative_humidity_pct: f32,
    pub pressure_hpa: f32,
    pub ambient_light_raw: u16,
    pub lux: f32,
    pub battery_volts: f32,
    pub battery_pct: u8,
}

/// Aggregates the three I²C sensors.
pub struct SensorHub<E, L, B> {
    pub environment: E,
    pub light: L,
    pub battery: B,
}

impl<E, L, B> SensorHub<E, L, B>
where
    E: EnvironmentSensor,
    L: LightSensor,
    B: BatteryMonitor,
{
    pub fn new(environment: E, light: L, battery: B) -> Self {
        Self {
            environment,
            light,
            battery,
        }
    }

    /// Read every sensor once. The first failure aborts the read and names
    /// the sensor; nothing is substituted.
    pub fn read_all(&mut self) -> Result<RawSample, Error> {
        let env = self
            .environment
            .read()
            .map_err(|e| Error::Sensor(Sensor::Environment, e))?;
        let light = self
            .light
            .read()
            .map_err(|e| Error::Sensor(Sensor::Light, e))?;
        let battery = self
            .battery
            .read()
            .map_err(|e| Error::Sensor(Sensor::Battery, e))?;

        info!(
            "Sensors: T={:.2}\u{00b0}C RH={:.2}% P={:.2}hPa lux={:.2} bat={:.2}V/{}%",
            env.temperature_c,
            env.relative_humidity_pct,
            env.pressure_hpa,
            light.lux,
            battery.volts,
            battery.percent,
        );

        Ok(RawSample {
            temperature_c: env.temperature_c,
            relative_humidity_pct: env.relative_humidity_pct,
            pressure_hpa: env.pressure_hpa,
            ambient_light_raw: light.ambient_light_raw,
            lux: light.lux,
            battery_volts: battery.volts,
            battery_pct: battery.percent,
        })
    }
}

/// Round to two decimal places, as every published reading is.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
