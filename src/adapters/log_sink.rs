//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured station events to the
//! ESP-IDF logger (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::StationEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`StationEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &StationEvent) {
        match event {
            StationEvent::WindowOpened { duration_secs } => {
                info!("WINDOW | open | {}s", duration_secs);
            }
            StationEvent::WindowClosed(s) => {
                info!(
                    "WINDOW | closed | rain={} wind={} | polls={} max_gap={}us",
                    s.rain_count, s.wind_count, s.polls, s.max_poll_gap_us
                );
            }
            StationEvent::ReportPublished {
                message_id,
                payload_len,
            } => {
                info!("REPORT | sent | id={} len={}B", message_id, payload_len);
            }
            StationEvent::FaultEscalated { error, alarm_sent } => {
                warn!(
                    "FAULT | {} | {} | alarm={}",
                    error.subsystem(),
                    error,
                    if *alarm_sent { "sent" } else { "none" }
                );
            }
            StationEvent::Suspending { duration_secs } => {
                info!("SLEEP | {}s", duration_secs);
            }
        }
    }
}
