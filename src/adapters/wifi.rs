//! WiFi station-mode adapter.
//!
//! Implements [`NetworkLink`], the hexagonal boundary for the network link.
//! The station connects once per wake; there is no reconnect loop, since a
//! failed link is escalated and the next wake starts from scratch.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use log::{error, info};

use crate::app::ports::NetworkLink;
use crate::config::{validate_password, validate_ssid};
use crate::error::NetworkError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
}

#[cfg(not(target_os = "espidf"))]
static SIM_CONNECT_FAILS: AtomicBool = AtomicBool::new(false);

/// Simulation: make every subsequent connect attempt fail.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_connect_fails(fail: bool) {
    SIM_CONNECT_FAILS.store(fail, Ordering::Relaxed);
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self {
            state: WifiState::Disconnected,
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, ssid: &str, password: &str) -> Result<(), NetworkError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| NetworkError::InvalidSsid)?,
            password: password
                .try_into()
                .map_err(|_| NetworkError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });

        self.wifi
            .set_configuration(&config)
            .map_err(|_| NetworkError::ConnectFailed)?;
        if !self.wifi.is_started().unwrap_or(false) {
            self.wifi.start().map_err(|_| NetworkError::ConnectFailed)?;
        }
        self.wifi.connect().map_err(|_| NetworkError::ConnectFailed)?;
        self.wifi.wait_netif_up().map_err(|_| NetworkError::NoAddress)?;

        if let Ok(ip) = self.wifi.wifi().sta_netif().get_ip_info() {
            info!("WiFi: address {}", ip.ip);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, ssid: &str, _password: &str) -> Result<(), NetworkError> {
        if SIM_CONNECT_FAILS.load(Ordering::Relaxed) {
            return Err(NetworkError::ConnectFailed);
        }
        info!("WiFi(sim): connected to '{}'", ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkLink
// ───────────────────────────────────────────────────────────────

impl NetworkLink for WifiAdapter {
    fn connect(&mut self, ssid: &str, password: &str) -> Result<(), NetworkError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        if self.platform_is_connected() {
            return Ok(());
        }

        info!("WiFi: connecting to '{}'", ssid);

        match self.platform_connect(ssid, password) {
            Ok(()) => {
                self.state = WifiState::Connected;
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                self.state = WifiState::Failed;
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }
}
