//! Level-polled falling-edge counter for the reed-switch inputs.
//!
//! The rain gauge and the anemometer both pull their line LOW for a moment
//! on each actuation. Instead of a GPIO interrupt, the sample window reads
//! the line level on every loop iteration and hands it to [`PulseCounter::poll`],
//! which counts HIGH→LOW transitions. One counter per physical line.

use embedded_hal::digital::PinState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseCounter {
    last_level: PinState,
    count: u32,
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseCounter {
    /// A fresh counter. The previous level starts LOW, so a line that is
    /// already LOW at window start does not count as an edge.
    pub const fn new() -> Self {
        Self {
            last_level: PinState::Low,
            count: 0,
        }
    }

    /// Feed the current line level. Counts one pulse per HIGH→LOW transition.
    pub fn poll(&mut self, current_level: PinState) {
        if current_level == PinState::Low && self.last_level == PinState::High {
            self.count = self.count.saturating_add(1);
        }
        self.last_level = current_level;
    }

    /// Zero the count. Called once at window start, never mid-window.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_level(&self) -> PinState {
        self.last_level
    }
}
