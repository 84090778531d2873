//! Port traits: the hexagonal boundary between the measurement cycle and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! Driven adapters (sensors, lines, clocks, network, MQTT, power) implement
//! these traits. The [`StationService`](super::service::StationService)
//! consumes them via generics, so the cycle logic never touches hardware
//! directly and runs unchanged against the mocks in `tests/`.

use embedded_hal::digital::PinState;
use time::OffsetDateTime;

use crate::error::{NetworkError, SensorError, TransportError};

// ───────────────────────────────────────────────────────────────
// Sensor ports (one-shot reads after the window closes)
// ───────────────────────────────────────────────────────────────

/// Temperature, humidity and station pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentReading {
    pub temperature_c: f32,
    pub relative_humidity_pct: f32,
    pub pressure_hpa: f32,
}

/// Raw ambient-light count and its lux conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightReading {
    pub ambient_light_raw: u16,
    pub lux: f32,
}

/// Cell voltage and state of charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    pub volts: f32,
    pub percent: u8,
}

pub trait EnvironmentSensor {
    fn read(&mut self) -> Result<EnvironmentReading, SensorError>;
}

pub trait LightSensor {
    fn read(&mut self) -> Result<LightReading, SensorError>;
}

pub trait BatteryMonitor {
    fn read(&mut self) -> Result<BatteryReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Line ports (polled inside the sample window)
// ───────────────────────────────────────────────────────────────

/// A digital input sampled by level. Infallible: a pin read cannot fail.
pub trait DigitalLine {
    fn level(&mut self) -> PinState;
}

/// A 16-bit-normalised analog input.
pub trait AnalogLine {
    fn value(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Time, diagnostics and watchdog ports
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot. Drives the sample-window deadline.
pub trait MonotonicClock {
    fn uptime_us(&self) -> u64;
}

/// Synchronised wall clock. `None` when time sync never succeeded.
pub trait WallClock {
    fn now(&self) -> Option<OffsetDateTime>;
}

/// Free-heap probe for the `FREEMEM` diagnostic.
pub trait HeapMonitor {
    fn free_heap_bytes(&self) -> u32;
}

/// Hang guard for the read-and-publish phase. Expiry resets the device.
pub trait TaskWatchdog {
    fn arm(&mut self, timeout_secs: u32);
    fn feed(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Network ports
// ───────────────────────────────────────────────────────────────

/// Station-mode WiFi link.
pub trait NetworkLink {
    fn connect(&mut self, ssid: &str, password: &str) -> Result<(), NetworkError>;
    fn is_connected(&self) -> bool;
}

/// Lightweight pub-sub client (MQTT semantics).
pub trait PublishClient {
    /// Open (or confirm) the broker session.
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Drive one protocol-maintenance tick (keep-alive, pending acks).
    fn maintain_once(&mut self) -> Result<(), TransportError>;

    /// Publish `payload` to `topic`. Returns the broker message id.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<u32, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Power port
// ───────────────────────────────────────────────────────────────

/// Process-wide timed suspend.
///
/// On hardware this enters deep sleep and never returns: the chip resets on
/// wake and bring-up starts over. Host implementations record the request
/// and return so tests can inspect it.
pub trait Suspend {
    fn sleep_for(&mut self, duration_secs: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`StationEvent`](super::events::StationEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::StationEvent);
}
