//! Bosch BME280 temperature / humidity / pressure sensor (I²C).
//!
//! Thin [`EnvironmentSensor`] adapter over the `bme280` crate, which owns
//! the register protocol and the datasheet compensation. Each read is one
//! forced-mode measurement.

use bme280::i2c::BME280;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::{EnvironmentReading, EnvironmentSensor};
use crate::error::SensorError;

pub struct Bme280<I2C, D> {
    dev: BME280<I2C>,
    delay: D,
}

impl<I2C, D> Bme280<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Reset the chip, verify its id and load the factory calibration.
    pub fn new(i2c: I2C, address: u8, mut delay: D) -> Result<Self, SensorError> {
        let mut dev = BME280::new(i2c, address);
        dev.init(&mut delay).map_err(map_error)?;
        Ok(Self { dev, delay })
    }
}

fn map_error<E>(e: bme280::Error<E>) -> SensorError {
    match e {
        bme280::Error::Bus(_) => SensorError::BusFault,
        bme280::Error::UnsupportedChip => SensorError::NotDetected,
        _ => SensorError::InvalidReading,
    }
}

impl<I2C, D> EnvironmentSensor for Bme280<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn read(&mut self) -> Result<EnvironmentReading, SensorError> {
        let m = self.dev.measure(&mut self.delay).map_err(map_error)?;
        let (t, rh, p_pa) = (
            f64::from(m.temperature),
            f64::from(m.humidity),
            f64::from(m.pressure),
        );
        if !(t.is_finite() && rh.is_finite() && p_pa.is_finite()) || p_pa <= 0.0 {
            return Err(SensorError::InvalidReading);
        }
        Ok(EnvironmentReading {
            temperature_c: super::round2(t) as f32,
            relative_humidity_pct: super::round2(rh.clamp(0.0, 100.0)) as f32,
            pressure_hpa: super::round2(p_pa / 100.0) as f32,
        })
    }
}
