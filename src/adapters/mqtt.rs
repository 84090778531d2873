//! MQTT publish-client adapter.
//!
//! Implements [`PublishClient`] over the ESP-IDF MQTT client. The client
//! runs its own network task; connection state is tracked by the event
//! callback in a static flag that [`connect`](PublishClient::connect) and
//! [`maintain_once`](PublishClient::maintain_once) poll.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: an in-memory broker that records every publish.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::adapters::device_id::ClientIdString;
use crate::app::ports::PublishClient;
use crate::config::NetworkConfig;
use crate::error::TransportError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

/// How long `connect()` waits for the broker's CONNACK.
pub const CONNECT_TIMEOUT_MS: u32 = 10_000;

/// Set from the MQTT event callback (runs on the client's own task).
static BROKER_CONNECTED: AtomicBool = AtomicBool::new(false);

pub struct MqttAdapter {
    url: String,
    client_id: ClientIdString,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    username: Option<String>,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    password: Option<String>,
    #[cfg(target_os = "espidf")]
    client: Option<EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    published: Vec<(String, Vec<u8>)>,
}

impl MqttAdapter {
    pub fn new(network: &NetworkConfig, client_id: ClientIdString) -> Self {
        Self {
            url: network.broker_url(),
            client_id,
            username: network.broker_user.clone(),
            password: network.broker_password.clone(),
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            published: Vec::new(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn broker_url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        BROKER_CONNECTED.load(Ordering::Acquire)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), TransportError> {
        if self.client.is_some() {
            return Ok(());
        }
        let conf = MqttClientConfiguration {
            client_id: Some(self.client_id.as_str()),
            username: self.username.as_deref(),
            password: self.password.as_deref(),
            ..Default::default()
        };
        let client = EspMqttClient::new_cb(&self.url, &conf, |event| match event.payload() {
            EventPayload::Connected(_) => BROKER_CONNECTED.store(true, Ordering::Release),
            EventPayload::Disconnected => BROKER_CONNECTED.store(false, Ordering::Release),
            EventPayload::Error(e) => log::warn!("MQTT: client error {:?}", e),
            _ => {}
        })
        .map_err(|e| {
            warn!("MQTT: client init failed ({:?})", e);
            TransportError::ConnectFailed
        })?;
        self.client = Some(client);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_wait_connected(&self) -> bool {
        let mut waited_ms = 0;
        while !self.is_connected() {
            if waited_ms >= CONNECT_TIMEOUT_MS {
                return false;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
            waited_ms += 50;
        }
        true
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &[u8]) -> Result<u32, TransportError> {
        let client = self.client.as_mut().ok_or(TransportError::NotConnected)?;
        client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .map_err(|e| {
                warn!("MQTT: publish to {} failed ({:?})", topic, e);
                TransportError::PublishFailed
            })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), TransportError> {
        if SIM_BROKER_DOWN.load(Ordering::Relaxed) {
            return Err(TransportError::ConnectFailed);
        }
        BROKER_CONNECTED.store(true, Ordering::Release);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_wait_connected(&self) -> bool {
        self.is_connected()
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &[u8]) -> Result<u32, TransportError> {
        if SIM_BROKER_DOWN.load(Ordering::Relaxed) {
            return Err(TransportError::PublishFailed);
        }
        self.published.push((topic.to_owned(), payload.to_vec()));
        Ok(self.published.len() as u32)
    }

    /// Simulation: everything published so far, in order.
    #[cfg(not(target_os = "espidf"))]
    pub fn published(&self) -> &[(String, Vec<u8>)] {
        &self.published
    }
}

#[cfg(not(target_os = "espidf"))]
static SIM_BROKER_DOWN: AtomicBool = AtomicBool::new(false);

/// Simulation: make the broker unreachable (or reachable again).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_broker_down(down: bool) {
    SIM_BROKER_DOWN.store(down, Ordering::Relaxed);
    if down {
        BROKER_CONNECTED.store(false, Ordering::Release);
    }
}

impl PublishClient for MqttAdapter {
    fn connect(&mut self) -> Result<(), TransportError> {
        if self.is_connected() {
            return Ok(());
        }
        info!("MQTT: connecting to {} as {}", self.url, self.client_id);
        self.platform_start()?;
        if !self.platform_wait_connected() {
            warn!("MQTT: no CONNACK within {}ms", CONNECT_TIMEOUT_MS);
            return Err(TransportError::ConnectFailed);
        }
        info!("MQTT: connected");
        Ok(())
    }

    /// The ESP-IDF client services keep-alive on its own task, so a tick
    /// only confirms the session is still up.
    fn maintain_once(&mut self) -> Result<(), TransportError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<u32, TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        self.platform_publish(topic, payload)
    }
}
