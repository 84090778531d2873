//! Full measurement cycle: window → sensors → report → publish → suspend.

use time::macros::datetime;
use weatherstation::app::events::StationEvent;
use weatherstation::app::service::{CycleOutcome, StationService};
use weatherstation::config::StationConfig;
use weatherstation::publisher::ReportPublisher;

use crate::mock_hw::{
    RecordingClient, RecordingSink, RecordingSuspend, ScriptedLine, healthy_hub, ports,
};

const DATA: &str = "pico_sensor/pico_data";
const ALARM: &str = "pico_sensor/pico_alarm";

/// Vane reading that normalises to 600 (NNE).
const VANE_NNE: u16 = 600 * 64;

#[test]
fn end_to_end_report_values() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut ports = ports(ScriptedLine::pulses(2), ScriptedLine::pulses(20), VANE_NNE);
    ports.clock.wall = Some(datetime!(2024-06-01 14:03:09 UTC));
    let mut hub = healthy_hub();
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);
    let mut sleep = RecordingSuspend::default();
    let mut sink = RecordingSink::default();

    let outcome = service.run_and_suspend(&mut ports, &mut hub, &mut publisher, &mut sleep, &mut sink);

    assert!(matches!(outcome, CycleOutcome::Reported(_)));
    assert_eq!(sleep.requests, vec![510]);

    let client = publisher.client();
    assert!(client.sent_to(ALARM).is_empty());
    let reports = client.sent_to(DATA);
    assert_eq!(reports.len(), 1);
    let r = &reports[0];

    assert_eq!(r["DATETIME"], "2024-06-01 14:03:09");
    assert_eq!(r["TEMP"], 18.5);
    assert_eq!(r["DEWPNT"], 13.39);
    assert_eq!(r["HUMID"], 72.3);
    assert_eq!(r["PRESS"], 1012.99);
    assert_eq!(r["LIGHT"], 9);
    assert_eq!(r["LUX"], 0.5);
    assert_eq!(r["FREEMEM"], 151_232);
    assert_eq!(r["WINDDIR"], "NNE");
    assert_eq!(r["WINDDEG"], 22.5);
    assert_eq!(r["RAIN"], 0.56);
    assert_eq!(r["WINDSPEED"], 0.25);
    assert_eq!(r["BATVOLT"], 4.12);
    assert_eq!(r["BATPERC"], 87);
    assert_eq!(r["SAFESTAT"], "UNSAFE");
}

#[test]
fn events_follow_cycle_phases() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut ports = ports(ScriptedLine::pulses(1), ScriptedLine::idle(), VANE_NNE);
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);
    let mut sink = RecordingSink::default();

    service.run_and_suspend(
        &mut ports,
        &mut healthy_hub(),
        &mut publisher,
        &mut RecordingSuspend::default(),
        &mut sink,
    );

    let kinds: Vec<&str> = sink
        .events
        .iter()
        .map(|e| match e {
            StationEvent::WindowOpened { .. } => "open",
            StationEvent::WindowClosed(_) => "closed",
            StationEvent::ReportPublished { .. } => "published",
            StationEvent::FaultEscalated { .. } => "fault",
            StationEvent::Suspending { .. } => "sleep",
        })
        .collect();
    assert_eq!(kinds, ["open", "closed", "published", "sleep"]);

    match &sink.events[1] {
        StationEvent::WindowClosed(s) => {
            assert_eq!(s.rain_count, 1);
            assert_eq!(s.wind_count, 0);
            assert!(s.latency_ok());
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn dry_calm_dark_night_is_safe() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut ports = ports(ScriptedLine::idle(), ScriptedLine::pulses(20), VANE_NNE);
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);

    service
        .run_cycle(&mut ports, &mut healthy_hub(), &mut publisher, &mut RecordingSink::default())
        .unwrap();

    let r = &publisher.client().sent_to(DATA)[0];
    assert_eq!(r["RAIN"], 0.0);
    assert_eq!(r["SAFESTAT"], "SAFE");
}

#[test]
fn no_pulses_reports_zero_wind_and_rain() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut ports = ports(ScriptedLine::idle(), ScriptedLine::idle(), VANE_NNE);
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);

    service
        .run_cycle(&mut ports, &mut healthy_hub(), &mut publisher, &mut RecordingSink::default())
        .unwrap();

    let r = &publisher.client().sent_to(DATA)[0];
    assert_eq!(r["WINDSPEED"], 0.0);
    assert_eq!(r["RAIN"], 0.0);
}

#[test]
fn floating_vane_reports_sentinel() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut ports = ports(ScriptedLine::idle(), ScriptedLine::idle(), 0);
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);

    service
        .run_cycle(&mut ports, &mut healthy_hub(), &mut publisher, &mut RecordingSink::default())
        .unwrap();

    let r = &publisher.client().sent_to(DATA)[0];
    assert_eq!(r["WINDDIR"], "N/A");
    assert_eq!(r["WINDDEG"], 999.9);
}

#[test]
fn unsynced_clock_omits_datetime() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut ports = ports(ScriptedLine::idle(), ScriptedLine::idle(), VANE_NNE);
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);

    service
        .run_cycle(&mut ports, &mut healthy_hub(), &mut publisher, &mut RecordingSink::default())
        .unwrap();

    let r = &publisher.client().sent_to(DATA)[0];
    assert!(r.get("DATETIME").is_none());
    assert_eq!(r.as_object().unwrap().len(), 14);
}

#[test]
fn window_runs_for_record_interval_then_arms_watchdog() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut ports = ports(ScriptedLine::idle(), ScriptedLine::idle(), VANE_NNE);
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);

    service
        .run_cycle(&mut ports, &mut healthy_hub(), &mut publisher, &mut RecordingSink::default())
        .unwrap();

    // One read at start, 60 000 polls at 1 ms, one read that ends the window.
    assert!(ports.clock.now_us.get() >= 60_000_000);
    assert_eq!(ports.watchdog.armed_with, vec![config.post_window_budget_secs]);
}

#[test]
fn second_window_starts_from_zero() {
    let config = StationConfig::default();
    let mut service = StationService::new(config.clone());
    let mut publisher = ReportPublisher::new(RecordingClient::default(), &config);
    let mut sink = RecordingSink::default();

    let mut first = ports(ScriptedLine::pulses(5), ScriptedLine::idle(), VANE_NNE);
    service.run_cycle(&mut first, &mut healthy_hub(), &mut publisher, &mut sink).unwrap();
    assert_eq!(service.cycle_state().rain_count.count(), 5);

    let mut second = ports(ScriptedLine::pulses(1), ScriptedLine::idle(), VANE_NNE);
    service.run_cycle(&mut second, &mut healthy_hub(), &mut publisher, &mut sink).unwrap();
    assert_eq!(service.cycle_state().rain_count.count(), 1);

    let reports = publisher.client().sent_to(DATA);
    assert_eq!(reports[0]["RAIN"], 1.4);
    assert_eq!(reports[1]["RAIN"], 0.28);
}
