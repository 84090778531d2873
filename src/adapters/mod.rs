//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                           | Connects to            |
//! |-------------|--------------------------------------|------------------------|
//! | `hardware`  | DigitalLine, AnalogLine              | ESP32 GPIO, ADC1       |
//! | `time`      | MonotonicClock, WallClock, HeapMonitor | esp_timer, SNTP, heap |
//! | `wifi`      | NetworkLink                          | ESP-IDF WiFi STA       |
//! | `mqtt`      | PublishClient                        | ESP-IDF MQTT client    |
//! | `power`     | Suspend                              | Deep sleep + RTC timer |
//! | `log_sink`  | EventSink                            | Serial log output      |
//! | `device_id` | (MQTT client id)                     | eFuse MAC              |

pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod power;
pub mod time;
pub mod wifi;
