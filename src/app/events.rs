//! Outbound station events.
//!
//! The [`StationService`](super::service::StationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port at each phase
//! boundary of a cycle.

use crate::error::Error;
use crate::sampler::WindowSummary;

/// Structured events emitted by the cycle runner.
#[derive(Debug, Clone)]
pub enum StationEvent {
    /// The pulse-counting window opened.
    WindowOpened { duration_secs: u32 },

    /// The window closed with these totals.
    WindowClosed(WindowSummary),

    /// A report was published to the data topic.
    ReportPublished { message_id: u32, payload_len: usize },

    /// A fault was escalated; `alarm_sent` tells whether the alarm made it out.
    FaultEscalated { error: Error, alarm_sent: bool },

    /// The process is about to suspend.
    Suspending { duration_secs: u32 },
}
