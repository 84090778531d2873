//! Unified error types for the weather station firmware.
//!
//! A single `Error` enum that every fallible step converts into, so the
//! cycle runner can hand any failure to the fault escalation policy
//! without caring which subsystem produced it. All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in a measurement cycle funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// One of the three I²C sensors failed to produce a reading.
    Sensor(Sensor, SensorError),
    /// An I²C bus or device could not be brought up.
    Bus(Sensor),
    /// The pulse or vane inputs could not be configured.
    Peripheral,
    /// The WiFi link could not be established.
    Network(NetworkError),
    /// The publish client failed to connect, maintain or publish.
    Transport(TransportError),
    /// Build-time configuration is missing or invalid.
    Config(&'static str),
}

impl Error {
    /// Subsystem label used in the alarm payload
    /// (`"<subsystem> exception occurred"`).
    pub fn subsystem(&self) -> &'static str {
        match self {
            Self::Sensor(sensor, _) => sensor.label(),
            Self::Bus(_) => "I2C",
            Self::Peripheral => "GPIO",
            Self::Network(_) => "WiFi",
            Self::Transport(_) => "MQTT",
            Self::Config(_) => "Config",
        }
    }

    /// Whether an alarm publish may be attempted for this fault.
    ///
    /// Faults on the network or publish path cannot carry their own alarm;
    /// attempting one would recurse into the failing subsystem.
    pub fn allows_alarm(&self) -> bool {
        matches!(self, Self::Sensor(..) | Self::Bus(_) | Self::Peripheral)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(sensor, e) => write!(f, "sensor {}: {e}", sensor.label()),
            Self::Bus(sensor) => write!(f, "bus: {} not responding", sensor.label()),
            Self::Peripheral => write!(f, "GPIO/ADC input configuration failed"),
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor identity
// ---------------------------------------------------------------------------

/// The three I²C devices the station reads once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    /// BME280 temperature / humidity / pressure.
    Environment,
    /// VEML7700 ambient light.
    Light,
    /// MAX17048 fuel gauge.
    Battery,
}

impl Sensor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Environment => "BME280",
            Self::Light => "VEML7700",
            Self::Battery => "MAX17048",
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// An I²C transaction returned an error.
    BusFault,
    /// The device answered with an unexpected chip id.
    NotDetected,
    /// The device returned a value that cannot be a real measurement.
    InvalidReading,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFault => write!(f, "I2C transaction failed"),
            Self::NotDetected => write!(f, "device not detected"),
            Self::InvalidReading => write!(f, "invalid reading"),
        }
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    InvalidSsid,
    InvalidPassword,
    ConnectFailed,
    NoAddress,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectFailed => write!(f, "WiFi connection failed"),
            Self::NoAddress => write!(f, "no IP address acquired"),
        }
    }
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    ConnectFailed,
    NotConnected,
    PublishFailed,
    Encode,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "MQTT connect failed"),
            Self::NotConnected => write!(f, "MQTT broker not connected"),
            Self::PublishFailed => write!(f, "MQTT publish failed"),
            Self::Encode => write!(f, "payload serialisation failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
