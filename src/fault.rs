//! Fault escalation policy.
//!
//! Every failure in a cycle is handled the same way: log it, make at most
//! one alarm publish naming the failing subsystem, then hand back a fixed
//! backoff for the suspend. Recovery is the cold restart that follows the
//! wake; nothing here retries.

use log::{error, warn};

use crate::app::events::StationEvent;
use crate::app::ports::{EventSink, PublishClient};
use crate::error::Error;
use crate::publisher::ReportPublisher;

/// Outcome of escalating one fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalation {
    pub alarm_sent: bool,
    pub sleep_secs: u32,
}

pub struct FaultEscalation {
    backoff_secs: u32,
}

impl FaultEscalation {
    pub const fn new(backoff_secs: u32) -> Self {
        Self { backoff_secs }
    }

    pub const fn backoff_secs(&self) -> u32 {
        self.backoff_secs
    }

    /// Log, try one alarm, and return the suspend plan.
    ///
    /// The alarm is skipped when `publisher` is `None` (the publish path was
    /// never brought up) or when the fault lies on the publish path itself.
    /// A failed alarm is logged and otherwise ignored.
    pub fn escalate<C: PublishClient>(
        &self,
        fault: Error,
        publisher: Option<&mut ReportPublisher<C>>,
        sink: &mut impl EventSink,
    ) -> Escalation {
        error!("Fault: {} ({} exception occurred)", fault, fault.subsystem());

        let alarm_sent = match publisher {
            Some(p) if fault.allows_alarm() => match p.publish_alarm(fault.subsystem()) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Fault: alarm publish failed: {}", e);
                    false
                }
            },
            _ => false,
        };

        sink.emit(&StationEvent::FaultEscalated {
            error: fault,
            alarm_sent,
        });

        Escalation {
            alarm_sent,
            sleep_secs: self.backoff_secs,
        }
    }
}
