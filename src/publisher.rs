//! Report publisher: one data publish or one alarm publish per call.
//!
//! Every call is fail-fast. The first failing step returns its
//! [`TransportError`] and nothing is retried; the cycle's fault path
//! decides what happens next.

use log::info;

use crate::app::ports::PublishClient;
use crate::config::StationConfig;
use crate::error::TransportError;
use crate::report::{AlarmPayload, Report};

/// Broker acknowledgement of a data publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub message_id: u32,
    pub payload_len: usize,
}

pub struct ReportPublisher<C: PublishClient> {
    client: C,
    data_topic: String,
    alarm_topic: String,
}

impl<C: PublishClient> ReportPublisher<C> {
    pub fn new(client: C, config: &StationConfig) -> Self {
        Self {
            client,
            data_topic: config.data_topic_path(),
            alarm_topic: config.alarm_topic_path(),
        }
    }

    /// Connect, run one maintenance tick, then publish the report as flat
    /// JSON to the data topic.
    pub fn publish(&mut self, report: &Report) -> Result<Ack, TransportError> {
        self.client.connect()?;
        self.client.maintain_once()?;
        let payload = serde_json::to_vec(report).map_err(|_| TransportError::Encode)?;
        let message_id = self.client.publish(&self.data_topic, &payload)?;
        info!(
            "MQTT: published {} bytes to {} (msg id {})",
            payload.len(),
            self.data_topic,
            message_id
        );
        Ok(Ack {
            message_id,
            payload_len: payload.len(),
        })
    }

    /// Publish `{"ALARM": "<subsystem> exception occurred"}` to the alarm
    /// topic. Same steps and failure semantics as [`publish`](Self::publish).
    pub fn publish_alarm(&mut self, subsystem: &str) -> Result<u32, TransportError> {
        self.client.connect()?;
        self.client.maintain_once()?;
        let payload = serde_json::to_vec(&AlarmPayload::for_subsystem(subsystem))
            .map_err(|_| TransportError::Encode)?;
        let message_id = self.client.publish(&self.alarm_topic, &payload)?;
        info!("MQTT: alarm sent to {} ({})", self.alarm_topic, subsystem);
        Ok(message_id)
    }

    pub fn data_topic(&self) -> &str {
        &self.data_topic
    }

    pub fn alarm_topic(&self) -> &str {
        &self.alarm_topic
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }
}
