//! The real adapters, running on their host simulation stubs.
//!
//! The simulation levers are process-wide statics, so every test here
//! holds `SIM_LOCK` and starts from [`reset_sim`].

use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use weatherstation::adapters::device_id;
use weatherstation::adapters::hardware::{AdcLine, GpioLine};
use weatherstation::adapters::log_sink::LogEventSink;
use weatherstation::adapters::mqtt::{self, MqttAdapter};
use weatherstation::adapters::power::DeepSleep;
use weatherstation::adapters::time::{self, Esp32Clock};
use weatherstation::adapters::wifi::{self, WifiAdapter, WifiState};
use weatherstation::app::ports::{NetworkLink, PublishClient};
use weatherstation::app::service::{CycleOutcome, StationPorts, StationService};
use weatherstation::config::{NetworkConfig, StationConfig};
use weatherstation::drivers::hw_init;
use weatherstation::drivers::watchdog::Watchdog;
use weatherstation::error::{Error, NetworkError, TransportError};
use weatherstation::pins;
use weatherstation::publisher::ReportPublisher;

use crate::mock_hw::healthy_hub;

static SIM_LOCK: Mutex<()> = Mutex::new(());

fn sim_guard() -> MutexGuard<'static, ()> {
    let guard = SIM_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    reset_sim();
    guard
}

fn reset_sim() {
    wifi::sim_set_connect_fails(false);
    mqtt::sim_set_broker_down(false);
    hw_init::sim_set_gpio(pins::RAIN_GPIO, true);
    hw_init::sim_set_gpio(pins::WIND_GPIO, true);
    // 12-bit 2400 → normalised 600 → NNE.
    hw_init::sim_set_adc_raw(2400);
    time::sim_set_free_heap(123_456);
}

fn one_second_config() -> StationConfig {
    StationConfig {
        record_interval_secs: 1,
        ..StationConfig::default()
    }
}

fn network() -> NetworkConfig {
    NetworkConfig::from_lookup(|k| match k {
        "WIFI_SSID" => Some("HomeWiFi"),
        "WIFI_PASSWORD" => Some("password1"),
        "BROKER_IP" => Some("192.168.1.20"),
        _ => None,
    })
    .unwrap()
}

fn connected_mqtt(network: &NetworkConfig) -> MqttAdapter {
    let mut mqtt = MqttAdapter::new(network, device_id::client_id(&device_id::read_mac()));
    mqtt.connect().unwrap();
    mqtt
}

type SimPorts = StationPorts<GpioLine, GpioLine, AdcLine, Esp32Clock, Watchdog>;

fn sim_ports() -> SimPorts {
    let mut clock = Esp32Clock::new();
    assert!(clock.sync_time(1));
    assert!(clock.is_synced());
    hw_init::init_peripherals().unwrap();
    StationPorts {
        rain: GpioLine::new(pins::RAIN_GPIO),
        wind: GpioLine::new(pins::WIND_GPIO),
        vane: AdcLine::new(pins::WIND_VANE_ADC_CHANNEL),
        clock,
        watchdog: Watchdog::new(),
    }
}

fn sent_reports(publisher: &ReportPublisher<MqttAdapter>) -> Vec<serde_json::Value> {
    publisher
        .client()
        .published()
        .iter()
        .filter(|(topic, _)| topic == "pico_sensor/pico_data")
        .map(|(_, body)| serde_json::from_slice(body).unwrap())
        .collect()
}

#[test]
fn simulated_station_publishes_one_report() {
    let _sim = sim_guard();
    let config = one_second_config();
    let network = network();

    let mut wifi = WifiAdapter::new();
    wifi.connect(&network.wifi_ssid, &network.wifi_password).unwrap();

    let mut publisher = ReportPublisher::new(connected_mqtt(&network), &config);
    let mut ports = sim_ports();
    let mut sleep = DeepSleep::new();
    let mut service = StationService::new(config);

    let outcome = service.run_and_suspend(
        &mut ports,
        &mut healthy_hub(),
        &mut publisher,
        &mut sleep,
        &mut LogEventSink::new(),
    );

    assert!(matches!(outcome, CycleOutcome::Reported(_)));
    assert_eq!(sleep.requests(), &[510]);
    assert!(ports.watchdog.is_armed());

    assert_eq!(publisher.client().published().len(), 1);
    let report = &sent_reports(&publisher)[0];
    assert_eq!(report["WINDDIR"], "NNE");
    assert_eq!(report["FREEMEM"], 123_456);
    // Lines idle HIGH: no pulses.
    assert_eq!(report["RAIN"], 0.0);
    assert_eq!(report["WINDSPEED"], 0.0);
    assert!(report["DATETIME"].is_string());
}

#[test]
fn reed_switch_closures_reach_the_report() {
    let _sim = sim_guard();
    let config = one_second_config();
    let mut publisher = ReportPublisher::new(connected_mqtt(&network()), &config);
    let mut ports = sim_ports();
    let mut sleep = DeepSleep::new();
    let mut service = StationService::new(config);

    // Five closures on both switches, well inside the one-second window.
    let switches = thread::spawn(|| {
        thread::sleep(Duration::from_millis(100));
        for _ in 0..5 {
            hw_init::sim_set_gpio(pins::RAIN_GPIO, false);
            hw_init::sim_set_gpio(pins::WIND_GPIO, false);
            thread::sleep(Duration::from_millis(10));
            hw_init::sim_set_gpio(pins::RAIN_GPIO, true);
            hw_init::sim_set_gpio(pins::WIND_GPIO, true);
            thread::sleep(Duration::from_millis(10));
        }
    });

    let outcome = service.run_and_suspend(
        &mut ports,
        &mut healthy_hub(),
        &mut publisher,
        &mut sleep,
        &mut LogEventSink::new(),
    );
    switches.join().unwrap();

    assert!(matches!(outcome, CycleOutcome::Reported(_)));
    assert_eq!(service.cycle_state().rain_count.count(), 5);
    assert_eq!(service.cycle_state().wind_count.count(), 5);

    let report = &sent_reports(&publisher)[0];
    assert_eq!(report["RAIN"], 1.4);
    assert!(report["WINDSPEED"].as_f64().unwrap() > 0.0);
    assert_eq!(report["SAFESTAT"], "UNSAFE");
}

#[test]
fn wifi_failure_suspends_for_backoff_without_alarm() {
    let _sim = sim_guard();
    wifi::sim_set_connect_fails(true);
    let network = network();
    let service = StationService::new(one_second_config());
    let mut sleep = DeepSleep::new();

    let mut wifi = WifiAdapter::new();
    let err = wifi
        .connect(&network.wifi_ssid, &network.wifi_password)
        .unwrap_err();
    assert_eq!(err, NetworkError::ConnectFailed);
    assert_eq!(wifi.state(), WifiState::Failed);
    assert!(!wifi.is_connected());

    let esc = service.fail_and_suspend::<MqttAdapter>(
        Error::from(err),
        None,
        &mut sleep,
        &mut LogEventSink::new(),
    );

    assert!(!esc.alarm_sent);
    assert_eq!(sleep.requests(), &[300]);
}

#[test]
fn unreachable_broker_at_bring_up_suspends_without_alarm() {
    let _sim = sim_guard();
    mqtt::sim_set_broker_down(true);
    let network = network();
    let service = StationService::new(one_second_config());
    let mut sleep = DeepSleep::new();

    let mut mqtt = MqttAdapter::new(&network, device_id::client_id(&device_id::read_mac()));
    assert_eq!(mqtt.connect(), Err(TransportError::ConnectFailed));
    assert!(!mqtt.is_connected());

    let esc = service.fail_and_suspend::<MqttAdapter>(
        Error::from(TransportError::ConnectFailed),
        None,
        &mut sleep,
        &mut LogEventSink::new(),
    );

    assert!(!esc.alarm_sent);
    assert_eq!(sleep.requests(), &[300]);
    assert!(mqtt.published().is_empty());
}

#[test]
fn broker_lost_during_window_backs_off_without_alarm() {
    let _sim = sim_guard();
    let config = one_second_config();
    let mut publisher = ReportPublisher::new(connected_mqtt(&network()), &config);
    let mut ports = sim_ports();
    let mut sleep = DeepSleep::new();
    let mut service = StationService::new(config);

    mqtt::sim_set_broker_down(true);
    let outcome = service.run_and_suspend(
        &mut ports,
        &mut healthy_hub(),
        &mut publisher,
        &mut sleep,
        &mut LogEventSink::new(),
    );

    assert!(matches!(outcome, CycleOutcome::Faulted(e) if !e.alarm_sent));
    assert_eq!(sleep.requests(), &[300]);
    assert!(publisher.client().published().is_empty());
}
