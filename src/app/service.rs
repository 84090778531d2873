//! Station service: the hexagonal core.
//!
//! [`StationService`] runs one wake of the duty cycle: count pulses for the
//! record interval, read the sensors once, build and publish a report, then
//! suspend. Any failure goes to [`FaultEscalation`] and the station suspends
//! for the backoff instead. All I/O flows through port traits, so the whole
//! cycle runs against mock adapters on the host.
//!
//! ```text
//!  DigitalLine ×2 ──▶ ┌────────────────────────┐ ──▶ PublishClient
//!  AnalogLine     ──▶ │     StationService     │ ──▶ EventSink
//!  SensorHub      ──▶ │ Window · Report · Fault│ ──▶ Suspend
//!                     └────────────────────────┘
//! ```

use log::info;

use crate::config::StationConfig;
use crate::error::Error;
use crate::fault::{Escalation, FaultEscalation};
use crate::publisher::{Ack, ReportPublisher};
use crate::report::{Report, ReportInputs};
use crate::sampler::{CycleState, SampleWindow};
use crate::sensors::SensorHub;
use crate::sensors::wind_vane;

use super::events::StationEvent;
use super::ports::{
    AnalogLine, BatteryMonitor, DigitalLine, EnvironmentSensor, EventSink, HeapMonitor,
    LightSensor, MonotonicClock, PublishClient, Suspend, TaskWatchdog, WallClock,
};

/// The polled inputs and platform services one cycle needs.
///
/// `clock` provides monotonic time, wall time and the heap probe together,
/// since on hardware they are all thin wrappers over the same system calls.
pub struct StationPorts<R, W, V, K, D> {
    pub rain: R,
    pub wind: W,
    pub vane: V,
    pub clock: K,
    pub watchdog: D,
}

/// How a wake ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Reported(Ack),
    Faulted(Escalation),
}

impl CycleOutcome {
    pub fn sleep_secs(&self, config: &StationConfig) -> u32 {
        match self {
            Self::Reported(_) => config.reporting_interval_secs,
            Self::Faulted(esc) => esc.sleep_secs,
        }
    }
}

pub struct StationService {
    config: StationConfig,
    state: CycleState,
    escalation: FaultEscalation,
}

impl StationService {
    /// Fresh service for this wake. Counters start at zero.
    pub fn new(config: StationConfig) -> Self {
        let escalation = FaultEscalation::new(config.fault_backoff_secs);
        Self {
            config,
            state: CycleState::new(),
            escalation,
        }
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    /// Counter state left by the last window.
    pub fn cycle_state(&self) -> &CycleState {
        &self.state
    }

    // ── One cycle ─────────────────────────────────────────────

    /// Window → sensors → vane → report → publish. Stops at the first error.
    pub fn run_cycle<R, W, V, K, D, E, L, B, C>(
        &mut self,
        ports: &mut StationPorts<R, W, V, K, D>,
        hub: &mut SensorHub<E, L, B>,
        publisher: &mut ReportPublisher<C>,
        sink: &mut impl EventSink,
    ) -> Result<Ack, Error>
    where
        R: DigitalLine,
        W: DigitalLine,
        V: AnalogLine,
        K: MonotonicClock + WallClock + HeapMonitor,
        D: TaskWatchdog,
        E: EnvironmentSensor,
        L: LightSensor,
        B: BatteryMonitor,
        C: PublishClient,
    {
        let duration = self.config.record_interval_secs;
        sink.emit(&StationEvent::WindowOpened {
            duration_secs: duration,
        });
        let window = SampleWindow::new(&ports.clock).run(
            duration,
            &mut self.state,
            &mut ports.rain,
            &mut ports.wind,
        );
        sink.emit(&StationEvent::WindowClosed(window));

        // From here on a hang is a reset, not a stuck station.
        ports.watchdog.arm(self.config.post_window_budget_secs);

        let sample = hub.read_all()?;
        let vane = wind_vane::decode_raw(ports.vane.value());
        info!("Vane: {} ({:.1}\u{00b0})", vane.0.label(), vane.1);

        let inputs = ReportInputs {
            sample,
            window,
            vane,
            free_heap_bytes: ports.clock.free_heap_bytes(),
            timestamp: ports.clock.now(),
        };
        let report = Report::build(&inputs, &self.config);
        ports.watchdog.feed();

        let ack = publisher.publish(&report)?;
        sink.emit(&StationEvent::ReportPublished {
            message_id: ack.message_id,
            payload_len: ack.payload_len,
        });
        Ok(ack)
    }

    /// Run one cycle, escalate any failure, then suspend exactly once.
    ///
    /// On hardware the suspend never returns. Host suspends return, and the
    /// outcome is handed back for inspection.
    pub fn run_and_suspend<R, W, V, K, D, E, L, B, C>(
        &mut self,
        ports: &mut StationPorts<R, W, V, K, D>,
        hub: &mut SensorHub<E, L, B>,
        publisher: &mut ReportPublisher<C>,
        suspend: &mut impl Suspend,
        sink: &mut impl EventSink,
    ) -> CycleOutcome
    where
        R: DigitalLine,
        W: DigitalLine,
        V: AnalogLine,
        K: MonotonicClock + WallClock + HeapMonitor,
        D: TaskWatchdog,
        E: EnvironmentSensor,
        L: LightSensor,
        B: BatteryMonitor,
        C: PublishClient,
    {
        let outcome = match self.run_cycle(ports, hub, publisher, sink) {
            Ok(ack) => CycleOutcome::Reported(ack),
            Err(fault) => {
                CycleOutcome::Faulted(self.escalation.escalate(fault, Some(publisher), sink))
            }
        };
        self.suspend(outcome.sleep_secs(&self.config), suspend, sink);
        outcome
    }

    /// Escalate a fault raised before a cycle could start (bring-up) and
    /// suspend. `publisher` is `None` when the publish path is not up yet.
    pub fn fail_and_suspend<C: PublishClient>(
        &self,
        fault: Error,
        publisher: Option<&mut ReportPublisher<C>>,
        suspend: &mut impl Suspend,
        sink: &mut impl EventSink,
    ) -> Escalation {
        let esc = self.escalation.escalate(fault, publisher, sink);
        self.suspend(esc.sleep_secs, suspend, sink);
        esc
    }

    // ── Internal ──────────────────────────────────────────────

    fn suspend(&self, duration_secs: u32, suspend: &mut impl Suspend, sink: &mut impl EventSink) {
        info!("Power: suspending for {}s", duration_secs);
        sink.emit(&StationEvent::Suspending { duration_secs });
        suspend.sleep_for(duration_secs);
    }
}
