//! ESP32 time adapter.
//!
//! Provides the monotonic clock that bounds the sample window, the wall
//! clock behind the report timestamp, and the free-heap probe.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` (monotonic,
//!   microsecond precision), the newlib system clock set by SNTP, and
//!   `esp_get_free_heap_size()`.
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` and the
//!   host clock for host-side testing and simulation.

use log::{info, warn};
use time::OffsetDateTime;

use crate::app::ports::{HeapMonitor, MonotonicClock, WallClock};

/// Anything before 2020-01-01 means the RTC was never set.
const EPOCH_2020: i64 = 1_577_836_800;

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32Clock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    synced: bool,
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32Clock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            synced: false,
        }
    }

    /// Whether the last [`sync_time`](Self::sync_time) succeeded.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Block until SNTP reports a completed sync or `timeout_secs` passes.
    ///
    /// Failure is never fatal: the station keeps whatever time the RTC
    /// carried through deep sleep.
    #[cfg(target_os = "espidf")]
    pub fn sync_time(&mut self, timeout_secs: u32) -> bool {
        use esp_idf_svc::sntp::{EspSntp, SyncStatus};

        let sntp = match EspSntp::new_default() {
            Ok(s) => s,
            Err(e) => {
                warn!("Time: SNTP start failed ({:?}), using system clock", e);
                return false;
            }
        };
        let deadline = self.uptime_us() + u64::from(timeout_secs) * 1_000_000;
        while sntp.get_sync_status() != SyncStatus::Completed {
            if self.uptime_us() >= deadline {
                warn!("Time: SNTP sync timed out after {}s, using system clock", timeout_secs);
                return false;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
        self.synced = true;
        info!("Time: synchronised via SNTP");
        true
    }

    /// Simulation: the host clock is always considered synced.
    #[cfg(not(target_os = "espidf"))]
    pub fn sync_time(&mut self, _timeout_secs: u32) -> bool {
        self.synced = true;
        info!("Time(sim): using host clock");
        true
    }
}

impl MonotonicClock for Esp32Clock {
    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    #[inline]
    fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl WallClock for Esp32Clock {
    fn now(&self) -> Option<OffsetDateTime> {
        let now = OffsetDateTime::now_utc();
        if now.unix_timestamp() < EPOCH_2020 {
            if self.synced {
                warn!("Time: clock reports {} after sync", now.unix_timestamp());
            }
            return None;
        }
        Some(now)
    }
}

impl HeapMonitor for Esp32Clock {
    #[cfg(target_os = "espidf")]
    fn free_heap_bytes(&self) -> u32 {
        unsafe { esp_idf_svc::sys::esp_get_free_heap_size() }
    }

    #[cfg(not(target_os = "espidf"))]
    fn free_heap_bytes(&self) -> u32 {
        SIM_FREE_HEAP.load(core::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(not(target_os = "espidf"))]
static SIM_FREE_HEAP: core::sync::atomic::AtomicU32 =
    core::sync::atomic::AtomicU32::new(200_000);

/// Simulation: set the value the heap probe reports.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_free_heap(bytes: u32) {
    SIM_FREE_HEAP.store(bytes, core::sync::atomic::Ordering::Relaxed);
}
