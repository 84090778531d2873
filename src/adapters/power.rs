//! Deep-sleep adapter.
//!
//! Implements [`Suspend`]. On hardware the timer wakeup is armed and the
//! chip enters deep sleep; RAM is lost and the next wake boots from the
//! top of `main()`. The simulation records each request and returns.

use log::info;

use crate::app::ports::Suspend;

#[derive(Default)]
pub struct DeepSleep {
    #[cfg(not(target_os = "espidf"))]
    requests: Vec<u32>,
}

impl DeepSleep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation: every duration passed to `sleep_for`, in order.
    #[cfg(not(target_os = "espidf"))]
    pub fn requests(&self) -> &[u32] {
        &self.requests
    }
}

impl Suspend for DeepSleep {
    #[cfg(target_os = "espidf")]
    fn sleep_for(&mut self, duration_secs: u32) {
        info!("Power: deep sleep for {}s", duration_secs);
        unsafe {
            esp_idf_svc::sys::esp_sleep_enable_timer_wakeup(u64::from(duration_secs) * 1_000_000);
            esp_idf_svc::sys::esp_deep_sleep_start();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn sleep_for(&mut self, duration_secs: u32) {
        info!("Power(sim): would deep sleep for {}s", duration_secs);
        self.requests.push(duration_secs);
    }
}
