//! Hardware line adapters: bridge configured GPIO and ADC inputs to the
//! [`DigitalLine`] and [`AnalogLine`] ports.
//!
//! Both go through [`hw_init`](crate::drivers::hw_init), so on non-espidf
//! targets they read the simulation levels set with `sim_set_gpio` and
//! `sim_set_adc_raw`.

use embedded_hal::digital::PinState;

use crate::app::ports::{AnalogLine, DigitalLine};
use crate::drivers::hw_init;

/// ESP32-S3 ADC1 resolution.
const ADC_BITS: u32 = 12;

/// One reed-switch input, read by level.
pub struct GpioLine {
    pin: i32,
}

impl GpioLine {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }

    pub const fn pin(&self) -> i32 {
        self.pin
    }
}

impl DigitalLine for GpioLine {
    #[inline]
    fn level(&mut self) -> PinState {
        PinState::from(hw_init::gpio_read(self.pin))
    }
}

/// One ADC1 channel, scaled to the 16-bit range the vane decoder expects.
pub struct AdcLine {
    channel: u32,
}

impl AdcLine {
    pub const fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl AnalogLine for AdcLine {
    fn value(&mut self) -> u16 {
        scale_to_u16(hw_init::adc1_read(self.channel))
    }
}

/// Left-align a 12-bit conversion in 16 bits.
fn scale_to_u16(raw: u16) -> u16 {
    (raw.min((1 << ADC_BITS) - 1)) << (16 - ADC_BITS)
}
