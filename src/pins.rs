//! GPIO / peripheral pin assignments for the weather station board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Mechanical inputs (reed switches, active-low with pull-up)
// ---------------------------------------------------------------------------

/// Tipping-bucket rain gauge. Each tip closes the reed switch briefly.
pub const RAIN_GPIO: i32 = 3;
/// Cup anemometer. Two closures per rotation.
pub const WIND_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Wind vane (resistor ladder → ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const WIND_VANE_ADC_CHANNEL: u32 = 5;

// ---------------------------------------------------------------------------
// I²C bus 0: BME280 + VEML7700
// ---------------------------------------------------------------------------

pub const I2C0_SDA_GPIO: i32 = 16;
pub const I2C0_SCL_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// I²C bus 1: MAX17048 fuel gauge
// ---------------------------------------------------------------------------

pub const I2C1_SDA_GPIO: i32 = 18;
pub const I2C1_SCL_GPIO: i32 = 19;

/// Both buses run at 200 kHz.
pub const I2C_BAUDRATE_HZ: u32 = 200_000;

// ---------------------------------------------------------------------------
// I²C addresses
// ---------------------------------------------------------------------------

pub const BME280_ADDR: u8 = 0x77;
pub const VEML7700_ADDR: u8 = 0x10;
pub const MAX17048_ADDR: u8 = 0x36;
