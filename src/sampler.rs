//! Fixed-duration pulse sampling window.
//!
//! The window busy-polls the rain and wind lines for its full duration and
//! feeds each level to that line's [`PulseCounter`]. There is no sleep
//! between polls: the loop rate is the only thing standing between a short
//! reed closure and a missed pulse. The window ends on elapsed time only,
//! never on a pulse count, and cannot be cancelled.
//!
//! ## Poll latency
//!
//! The shortest pulse expected is the anemometer reed closure at ~100 mph,
//! about 5 ms ([`MIN_PULSE_WIDTH_US`]). The window records the worst gap
//! between consecutive polls and warns when it exceeds that width, since
//! counts from such a window may be low.

use log::{info, warn};

use crate::app::ports::{DigitalLine, MonotonicClock};
use crate::sensors::pulse::PulseCounter;

/// Assumed minimum pulse width of either mechanical input (µs).
pub const MIN_PULSE_WIDTH_US: u64 = 5_000;

/// Per-wake counter state. Zeroed at bring-up; never survives deep sleep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleState {
    pub rain_count: PulseCounter,
    pub wind_count: PulseCounter,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What one window produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSummary {
    pub rain_count: u32,
    pub wind_count: u32,
    /// Loop iterations completed.
    pub polls: u64,
    /// Worst observed time between two polls (µs).
    pub max_poll_gap_us: u64,
}

impl WindowSummary {
    /// Whether every pulse of [`MIN_PULSE_WIDTH_US`] was guaranteed a sample.
    pub fn latency_ok(&self) -> bool {
        self.max_poll_gap_us < MIN_PULSE_WIDTH_US
    }
}

/// The duty-cycle scheduler's sampling phase.
pub struct SampleWindow<'a, C: MonotonicClock> {
    clock: &'a C,
}

impl<'a, C: MonotonicClock> SampleWindow<'a, C> {
    pub fn new(clock: &'a C) -> Self {
        Self { clock }
    }

    /// Poll both lines until `duration_secs` of monotonic time has elapsed.
    ///
    /// Both counters are reset first, so `state` holds exactly this
    /// window's pulses afterwards. Returns the totals plus poll statistics.
    pub fn run(
        &self,
        duration_secs: u32,
        state: &mut CycleState,
        rain_line: &mut impl DigitalLine,
        wind_line: &mut impl DigitalLine,
    ) -> WindowSummary {
        let duration_us = u64::from(duration_secs) * 1_000_000;
        state.rain_count.reset();
        state.wind_count.reset();

        info!("Window: sampling rain/wind for {}s", duration_secs);
        let start = self.clock.uptime_us();
        let mut last_poll = start;
        let mut polls: u64 = 0;
        let mut max_gap: u64 = 0;

        loop {
            let now = self.clock.uptime_us();
            if now.saturating_sub(start) >= duration_us {
                break;
            }
            max_gap = max_gap.max(now.saturating_sub(last_poll));
            last_poll = now;

            state.rain_count.poll(rain_line.level());
            state.wind_count.poll(wind_line.level());
            polls += 1;
        }

        let summary = WindowSummary {
            rain_count: state.rain_count.count(),
            wind_count: state.wind_count.count(),
            polls,
            max_poll_gap_us: max_gap,
        };

        info!(
            "Window: closed, rain tips={} wind pulses={} ({} polls, worst gap {}us)",
            summary.rain_count, summary.wind_count, summary.polls, summary.max_poll_gap_us
        );
        if !summary.latency_ok() {
            warn!(
                "Window: poll gap {}us exceeds minimum pulse width {}us, counts may be low",
                summary.max_poll_gap_us, MIN_PULSE_WIDTH_US
            );
        }
        summary
    }
}
