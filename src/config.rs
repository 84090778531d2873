//! Station configuration parameters
//!
//! Cycle timing, calibration constants and MQTT topic names live in
//! [`StationConfig`]. Network credentials come from the build environment
//! through [`NetworkConfig`]; nothing is configurable over the air.

use serde::{Deserialize, Serialize};

use crate::error::{Error, NetworkError};

/// Core station configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    // --- Timing ---
    /// Pulse-counting window length (seconds).
    pub record_interval_secs: u32,
    /// Deep-sleep duration after a successful report (seconds).
    pub reporting_interval_secs: u32,
    /// Deep-sleep duration after any fault (seconds).
    pub fault_backoff_secs: u32,
    /// Upper bound on the read-and-publish phase before the watchdog resets.
    pub post_window_budget_secs: u32,

    // --- Calibration ---
    /// Anemometer cup arm radius (cm).
    pub anemometer_radius_cm: f64,
    /// Rainfall per bucket tip (mm).
    pub bucket_size_mm: f64,
    /// Altitude proxy used for the sea-level pressure correction (m).
    pub station_altitude_m: f64,

    // --- Time ---
    /// Whether the report carries a `DATETIME` field.
    pub include_timestamp: bool,
    /// Local offset from UTC (hours).
    pub tz_offset_hours: i8,

    // --- MQTT ---
    pub topic_root: heapless::String<32>,
    pub data_topic: heapless::String<32>,
    pub alarm_topic: heapless::String<32>,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            // Timing
            record_interval_secs: 60,
            reporting_interval_secs: 510,
            fault_backoff_secs: 300,
            post_window_budget_secs: 60,

            // Calibration
            anemometer_radius_cm: 9.0,
            bucket_size_mm: 0.2794,
            station_altitude_m: 100.0,

            // Time
            include_timestamp: true,
            tz_offset_hours: 0, // GMT

            // MQTT
            topic_root: short_str("pico_sensor/"),
            data_topic: short_str("pico_data"),
            alarm_topic: short_str("pico_alarm"),
        }
    }
}

impl StationConfig {
    /// Full data topic (`root` + `data`).
    pub fn data_topic_path(&self) -> String {
        format!("{}{}", self.topic_root, self.data_topic)
    }

    /// Full alarm topic (`root` + `alarm`).
    pub fn alarm_topic_path(&self) -> String {
        format!("{}{}", self.topic_root, self.alarm_topic)
    }
}

fn short_str(s: &str) -> heapless::String<32> {
    let mut out = heapless::String::new();
    let _ = out.push_str(s);
    out
}

// ---------------------------------------------------------------------------
// Network configuration
// ---------------------------------------------------------------------------

/// WiFi and broker credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
    pub broker_host: String,
    pub broker_port: u16,
    pub broker_user: Option<String>,
    pub broker_password: Option<String>,
}

impl NetworkConfig {
    /// Load credentials baked in at build time
    /// (`WIFI_SSID`, `WIFI_PASSWORD`, `BROKER_IP`, `BROKER_PORT`,
    /// `BROKER_USR`, `BROKER_PASSWD`).
    pub fn from_build_env() -> Result<Self, Error> {
        Self::from_lookup(|key| match key {
            "WIFI_SSID" => option_env!("WIFI_SSID"),
            "WIFI_PASSWORD" => option_env!("WIFI_PASSWORD"),
            "BROKER_IP" => option_env!("BROKER_IP"),
            "BROKER_PORT" => option_env!("BROKER_PORT"),
            "BROKER_USR" => option_env!("BROKER_USR"),
            "BROKER_PASSWD" => option_env!("BROKER_PASSWD"),
            _ => None,
        })
    }

    /// Build from an arbitrary key lookup, validating every field.
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Result<Self, Error> {
        let ssid = lookup("WIFI_SSID").ok_or(Error::Config("WIFI_SSID not set"))?;
        let password = lookup("WIFI_PASSWORD").unwrap_or("");
        validate_ssid(ssid)?;
        validate_password(password)?;

        let broker_host = lookup("BROKER_IP").ok_or(Error::Config("BROKER_IP not set"))?;
        let broker_port = match lookup("BROKER_PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| Error::Config("BROKER_PORT is not a port number"))?,
            None => 1883,
        };

        let mut wifi_ssid = heapless::String::new();
        wifi_ssid
            .push_str(ssid)
            .map_err(|_| NetworkError::InvalidSsid)?;
        let mut wifi_password = heapless::String::new();
        wifi_password
            .push_str(password)
            .map_err(|_| NetworkError::InvalidPassword)?;

        Ok(Self {
            wifi_ssid,
            wifi_password,
            broker_host: broker_host.to_owned(),
            broker_port,
            broker_user: lookup("BROKER_USR").filter(|s| !s.is_empty()).map(str::to_owned),
            broker_password: lookup("BROKER_PASSWD")
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        })
    }

    /// `mqtt://host:port` URL for the publish client.
    pub fn broker_url(&self) -> String {
        format!("mqtt://{}:{}", self.broker_host, self.broker_port)
    }
}

/// SSID must be 1-32 printable ASCII bytes.
pub fn validate_ssid(ssid: &str) -> Result<(), NetworkError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(NetworkError::InvalidSsid);
    }
    Ok(())
}

/// Empty (open network) or 8-64 bytes (WPA2).
pub fn validate_password(password: &str) -> Result<(), NetworkError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(NetworkError::InvalidPassword);
    }
    Ok(())
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}
