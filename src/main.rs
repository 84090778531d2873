//! Weather station firmware entry point.
//!
//! One pass through `main()` is one wake of the duty cycle. Deep sleep
//! resets the chip, so nothing below ever loops.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  WifiAdapter     MqttAdapter      Esp32Clock      DeepSleep    │
//! │  (NetworkLink)   (PublishClient)  (Clock+Heap)    (Suspend)    │
//! │  GpioLine ×2     AdcLine          Bme280 · Veml7700 · Max17048 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            StationService (pure logic)                 │    │
//! │  │  SampleWindow · Report · ReportPublisher · Fault       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bring-up order: WiFi → SNTP → MQTT → I²C sensors → GPIO/ADC. Faults
//! before MQTT is up suspend without an alarm; later faults alarm first.

#![deny(unused_must_use)]

use core::cell::RefCell;

use anyhow::Result;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::info;

use weatherstation::adapters::device_id;
use weatherstation::adapters::hardware::{AdcLine, GpioLine};
use weatherstation::adapters::log_sink::LogEventSink;
use weatherstation::adapters::mqtt::MqttAdapter;
use weatherstation::adapters::power::DeepSleep;
use weatherstation::adapters::time::Esp32Clock;
use weatherstation::adapters::wifi::WifiAdapter;
use weatherstation::app::ports::{NetworkLink, PublishClient};
use weatherstation::app::service::{StationPorts, StationService};
use weatherstation::config::{NetworkConfig, StationConfig};
use weatherstation::drivers::hw_init;
use weatherstation::drivers::watchdog::Watchdog;
use weatherstation::error::{Error, Sensor};
use weatherstation::pins;
use weatherstation::publisher::ReportPublisher;
use weatherstation::sensors::SensorHub;
use weatherstation::sensors::bme280::Bme280;
use weatherstation::sensors::max17048::Max17048;
use weatherstation::sensors::veml7700::Veml7700;

/// Upper bound on the SNTP wait at bring-up.
const NTP_TIMEOUT_SECS: u32 = 10;

// The I²C drivers below take typed pins; keep them in step with `pins`.
const _: () = assert!(
    pins::I2C0_SDA_GPIO == 16
        && pins::I2C0_SCL_GPIO == 17
        && pins::I2C1_SDA_GPIO == 18
        && pins::I2C1_SCL_GPIO == 19
);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Weather station v{} waking", env!("CARGO_PKG_VERSION"));

    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut sink = LogEventSink::new();
    let mut sleep = DeepSleep::new();

    // ── 2. Credentials ────────────────────────────────────────
    let network = match NetworkConfig::from_build_env() {
        Ok(n) => n,
        Err(e) => {
            service.fail_and_suspend::<MqttAdapter>(e, None, &mut sleep, &mut sink);
            return Ok(());
        }
    };

    // ── 3. WiFi ───────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sysloop)?);
    if let Err(e) = wifi.connect(&network.wifi_ssid, &network.wifi_password) {
        service.fail_and_suspend::<MqttAdapter>(e.into(), None, &mut sleep, &mut sink);
        return Ok(());
    }

    // ── 4. Time ───────────────────────────────────────────────
    let mut clock = Esp32Clock::new();
    clock.sync_time(NTP_TIMEOUT_SECS);

    // ── 5. MQTT ───────────────────────────────────────────────
    let client_id = device_id::client_id(&device_id::read_mac());
    let mut mqtt = MqttAdapter::new(&network, client_id);
    if let Err(e) = mqtt.connect() {
        service.fail_and_suspend::<MqttAdapter>(e.into(), None, &mut sleep, &mut sink);
        return Ok(());
    }
    let mut publisher = ReportPublisher::new(mqtt, &config);

    // ── 6. I²C sensors ────────────────────────────────────────
    let i2c_config = I2cConfig::new().baudrate(pins::I2C_BAUDRATE_HZ.Hz().into());
    let bus0 = match I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio16,
        peripherals.pins.gpio17,
        &i2c_config,
    ) {
        Ok(d) => RefCell::new(d),
        Err(_) => {
            service.fail_and_suspend(Error::Bus(Sensor::Environment), Some(&mut publisher), &mut sleep, &mut sink);
            return Ok(());
        }
    };
    let bus1 = match I2cDriver::new(
        peripherals.i2c1,
        peripherals.pins.gpio18,
        peripherals.pins.gpio19,
        &i2c_config,
    ) {
        Ok(d) => d,
        Err(_) => {
            service.fail_and_suspend(Error::Bus(Sensor::Battery), Some(&mut publisher), &mut sleep, &mut sink);
            return Ok(());
        }
    };

    let environment = Bme280::new(RefCellDevice::new(&bus0), pins::BME280_ADDR, Ets)
        .map_err(|_| Error::Bus(Sensor::Environment));
    let light = Veml7700::new(RefCellDevice::new(&bus0), pins::VEML7700_ADDR)
        .map_err(|_| Error::Bus(Sensor::Light));
    let battery = Max17048::new(bus1, pins::MAX17048_ADDR).map_err(|_| Error::Bus(Sensor::Battery));
    let mut hub = match (environment, light, battery) {
        (Ok(e), Ok(l), Ok(b)) => SensorHub::new(e, l, b),
        (Err(fault), _, _) | (_, Err(fault), _) | (_, _, Err(fault)) => {
            service.fail_and_suspend(fault, Some(&mut publisher), &mut sleep, &mut sink);
            return Ok(());
        }
    };

    // ── 7. Pulse and vane inputs ──────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        log::error!("HAL init failed: {}", e);
        service.fail_and_suspend(Error::Peripheral, Some(&mut publisher), &mut sleep, &mut sink);
        return Ok(());
    }
    let mut ports = StationPorts {
        rain: GpioLine::new(pins::RAIN_GPIO),
        wind: GpioLine::new(pins::WIND_GPIO),
        vane: AdcLine::new(pins::WIND_VANE_ADC_CHANNEL),
        clock,
        watchdog: Watchdog::new(),
    };

    // ── 8. Cycle ──────────────────────────────────────────────
    service.run_and_suspend(&mut ports, &mut hub, &mut publisher, &mut sleep, &mut sink);
    Ok(())
}
