//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API. The station arms it once the sample window
//! closes, so a hung sensor read or broker exchange resets the device
//! instead of draining the battery. The timeout is set at arm time.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::app::ports::TaskWatchdog;

pub struct Watchdog {
    subscribed: bool,
    timeout_secs: u32,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Unarmed watchdog. Nothing is configured until [`TaskWatchdog::arm`].
    pub const fn new() -> Self {
        Self {
            subscribed: false,
            timeout_secs: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.subscribed
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    #[cfg(target_os = "espidf")]
    fn platform_arm(&mut self, timeout_secs: u32) -> bool {
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms: timeout_secs.saturating_mul(1000),
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
            }

            let ret = esp_task_wdt_add(core::ptr::null_mut());
            if ret != ESP_OK {
                log::warn!("Watchdog: failed to subscribe ({})", ret);
            }
            ret == ESP_OK
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_arm(&mut self, _timeout_secs: u32) -> bool {
        true
    }
}

impl TaskWatchdog for Watchdog {
    fn arm(&mut self, timeout_secs: u32) {
        if self.subscribed {
            self.feed();
            return;
        }
        self.timeout_secs = timeout_secs;
        self.subscribed = self.platform_arm(timeout_secs);
        if self.subscribed {
            info!("Watchdog: armed ({}s timeout, panic on trigger)", timeout_secs);
        }
    }

    /// Reset the countdown. No-op while unarmed.
    fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
