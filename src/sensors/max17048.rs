//! Maxim MAX17048 single-cell fuel gauge (I²C).
//!
//! Registers are big-endian. VCELL is 78.125 µV per LSB, SOC is 1/256 %
//! per LSB. No configuration is written; the ModelGauge algorithm runs
//! from power-on defaults.

use embedded_hal::i2c::I2c;

use crate::app::ports::{BatteryMonitor, BatteryReading};
use crate::error::SensorError;

const REG_VCELL: u8 = 0x02;
const REG_SOC: u8 = 0x04;
const REG_VERSION: u8 = 0x08;

const VOLTS_PER_LSB: f64 = 78.125e-6;

pub struct Max17048<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Max17048<I2C> {
    /// Check the silicon version (0x001X family).
    pub fn new(i2c: I2C, address: u8) -> Result<Self, SensorError> {
        let mut dev = Self { i2c, address };
        if dev.read_word(REG_VERSION)? & 0xFFF0 != 0x0010 {
            return Err(SensorError::NotDetected);
        }
        Ok(dev)
    }

    fn read_word(&mut self, reg: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|_| SensorError::BusFault)?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<I2C: I2c> BatteryMonitor for Max17048<I2C> {
    fn read(&mut self) -> Result<BatteryReading, SensorError> {
        let vcell = self.read_word(REG_VCELL)?;
        let soc = self.read_word(REG_SOC)?;
        Ok(BatteryReading {
            volts: super::round2(f64::from(vcell) * VOLTS_PER_LSB) as f32,
            // Whole percent, truncated.
            percent: (f64::from(soc) / 256.0) as u8,
        })
    }
}
