//! Vishay VEML7700 ambient light sensor (I²C).
//!
//! Fixed at gain ×1 and 100 ms integration, which gives a resolution of
//! 0.0576 lx per count and covers 0–3775 lx. The station only needs to
//! tell night from day, so no auto-ranging.

use embedded_hal::i2c::I2c;

use crate::app::ports::{LightReading, LightSensor};
use crate::error::SensorError;

const REG_ALS_CONF: u8 = 0x00;
const REG_ALS: u8 = 0x04;
const REG_ID: u8 = 0x07;

const DEVICE_ID_LOW: u8 = 0x81;
/// Gain ×1, IT 100 ms, interrupts off, powered on.
const ALS_CONF: u16 = 0x0000;
/// lx per count at gain ×1 / 100 ms.
const LUX_PER_COUNT: f64 = 0.0576;

pub struct Veml7700<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Veml7700<I2C> {
    /// Check the device id and power the sensor on.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, SensorError> {
        let mut dev = Self { i2c, address };
        let id = dev.read_word(REG_ID)?;
        if id.to_le_bytes()[0] != DEVICE_ID_LOW {
            return Err(SensorError::NotDetected);
        }
        let [lo, hi] = ALS_CONF.to_le_bytes();
        dev.i2c
            .write(dev.address, &[REG_ALS_CONF, lo, hi])
            .map_err(|_| SensorError::BusFault)?;
        Ok(dev)
    }

    fn read_word(&mut self, reg: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|_| SensorError::BusFault)?;
        Ok(u16::from_le_bytes(buf))
    }
}

impl<I2C: I2c> LightSensor for Veml7700<I2C> {
    fn read(&mut self) -> Result<LightReading, SensorError> {
        let raw = self.read_word(REG_ALS)?;
        Ok(LightReading {
            ambient_light_raw: raw,
            lux: super::round2(f64::from(raw) * LUX_PER_COUNT) as f32,
        })
    }
}
