//! Mock hardware adapters for integration tests.
//!
//! Every mock records what it was asked to do, so tests can assert on the
//! full history (publishes, suspends, events) without real peripherals.

use std::cell::Cell;

use embedded_hal::digital::PinState::{self, High, Low};
use time::OffsetDateTime;
use weatherstation::app::events::StationEvent;
use weatherstation::app::ports::{
    AnalogLine, BatteryMonitor, BatteryReading, DigitalLine, EnvironmentReading,
    EnvironmentSensor, EventSink, HeapMonitor, LightReading, LightSensor, MonotonicClock,
    PublishClient, Suspend, TaskWatchdog, WallClock,
};
use weatherstation::app::service::StationPorts;
use weatherstation::error::{SensorError, TransportError};
use weatherstation::sensors::SensorHub;

// ── Clock ─────────────────────────────────────────────────────

/// Advances a fixed step on every monotonic read.
pub struct FakeClock {
    pub now_us: Cell<u64>,
    pub step_us: u64,
    pub wall: Option<OffsetDateTime>,
    pub free_heap: u32,
}

impl FakeClock {
    pub fn new(step_us: u64) -> Self {
        Self {
            now_us: Cell::new(0),
            step_us,
            wall: None,
            free_heap: 151_232,
        }
    }
}

impl MonotonicClock for FakeClock {
    fn uptime_us(&self) -> u64 {
        let t = self.now_us.get();
        self.now_us.set(t + self.step_us);
        t
    }
}

impl WallClock for FakeClock {
    fn now(&self) -> Option<OffsetDateTime> {
        self.wall
    }
}

impl HeapMonitor for FakeClock {
    fn free_heap_bytes(&self) -> u32 {
        self.free_heap
    }
}

// ── Lines ─────────────────────────────────────────────────────

/// Plays back a level script, then idles HIGH.
pub struct ScriptedLine {
    script: Vec<PinState>,
    pos: usize,
}

impl ScriptedLine {
    pub fn new(script: Vec<PinState>) -> Self {
        Self { script, pos: 0 }
    }

    /// `n` clean closures: HIGH, LOW repeated.
    pub fn pulses(n: usize) -> Self {
        Self::new([High, Low].repeat(n))
    }

    pub fn idle() -> Self {
        Self::new(Vec::new())
    }
}

impl DigitalLine for ScriptedLine {
    fn level(&mut self) -> PinState {
        let level = self.script.get(self.pos).copied().unwrap_or(High);
        self.pos += 1;
        level
    }
}

pub struct FixedAnalog(pub u16);

impl AnalogLine for FixedAnalog {
    fn value(&mut self) -> u16 {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingWatchdog {
    pub armed_with: Vec<u32>,
    pub feeds: u32,
}

impl TaskWatchdog for RecordingWatchdog {
    fn arm(&mut self, timeout_secs: u32) {
        self.armed_with.push(timeout_secs);
    }

    fn feed(&mut self) {
        self.feeds += 1;
    }
}

pub type MockPorts = StationPorts<ScriptedLine, ScriptedLine, FixedAnalog, FakeClock, RecordingWatchdog>;

pub fn ports(rain: ScriptedLine, wind: ScriptedLine, vane_raw: u16) -> MockPorts {
    StationPorts {
        rain,
        wind,
        vane: FixedAnalog(vane_raw),
        clock: FakeClock::new(1_000),
        watchdog: RecordingWatchdog::default(),
    }
}

// ── Sensors ───────────────────────────────────────────────────

pub struct MockEnv(pub Result<EnvironmentReading, SensorError>);
pub struct MockLight(pub Result<LightReading, SensorError>);
pub struct MockBattery(pub Result<BatteryReading, SensorError>);

impl EnvironmentSensor for MockEnv {
    fn read(&mut self) -> Result<EnvironmentReading, SensorError> {
        self.0
    }
}

impl LightSensor for MockLight {
    fn read(&mut self) -> Result<LightReading, SensorError> {
        self.0
    }
}

impl BatteryMonitor for MockBattery {
    fn read(&mut self) -> Result<BatteryReading, SensorError> {
        self.0
    }
}

pub type MockHub = SensorHub<MockEnv, MockLight, MockBattery>;

/// 18.5 °C, 72.3 %RH, 1001.2 hPa, 0.5 lux, 4.12 V / 87 %.
pub fn healthy_hub() -> MockHub {
    SensorHub::new(
        MockEnv(Ok(EnvironmentReading {
            temperature_c: 18.5,
            relative_humidity_pct: 72.3,
            pressure_hpa: 1001.2,
        })),
        MockLight(Ok(LightReading {
            ambient_light_raw: 9,
            lux: 0.5,
        })),
        MockBattery(Ok(BatteryReading {
            volts: 4.12,
            percent: 87,
        })),
    )
}

// ── Publish client ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingClient {
    pub fail_connect: bool,
    pub fail_publish: bool,
    pub connects: u32,
    /// Every attempted publish, including failed ones.
    pub attempts: Vec<String>,
    pub sent: Vec<(String, Vec<u8>)>,
}

#[allow(dead_code)]
impl RecordingClient {
    pub fn sent_to(&self, topic: &str) -> Vec<serde_json::Value> {
        self.sent
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, body)| serde_json::from_slice(body).expect("payload is JSON"))
            .collect()
    }
}

impl PublishClient for RecordingClient {
    fn connect(&mut self) -> Result<(), TransportError> {
        self.connects += 1;
        if self.fail_connect {
            Err(TransportError::ConnectFailed)
        } else {
            Ok(())
        }
    }

    fn maintain_once(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<u32, TransportError> {
        self.attempts.push(topic.to_owned());
        if self.fail_publish {
            return Err(TransportError::PublishFailed);
        }
        self.sent.push((topic.to_owned(), payload.to_vec()));
        Ok(self.sent.len() as u32)
    }
}

// ── Suspend and events ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSuspend {
    pub requests: Vec<u32>,
}

impl Suspend for RecordingSuspend {
    fn sleep_for(&mut self, duration_secs: u32) {
        self.requests.push(duration_secs);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<StationEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &StationEvent) {
        self.events.push(event.clone());
    }
}
