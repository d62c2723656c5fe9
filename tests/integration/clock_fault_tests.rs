//! RTC fault detection, startup correction, in-place repair and the
//! operator acknowledgement beep.

use super::mock_hw::{MockHardware, MockRtc, RecordingSink, dt};

use nightguard::app::events::AppEvent;
use nightguard::app::service::AlarmService;
use nightguard::config::AlarmConfig;
use nightguard::error::ClockFault;
use nightguard::fsm::AlarmState;

const BUILD: &str = "2024-01-01 00:00:00";
const CHECK: u32 = 600_000;
const HEALTH: u32 = 1_800_000;

fn start(app: &mut AlarmService, hw: &mut MockHardware, rtc: &mut MockRtc, sink: &mut RecordingSink) {
    app.start(0, Some(dt(BUILD)), rtc, hw, sink);
}

fn press(app: &mut AlarmService, hw: &mut MockHardware, rtc: &mut MockRtc, sink: &mut RecordingSink, at: u32) {
    hw.inputs.remote_active = true;
    app.tick(at, hw, rtc, sink);
    hw.inputs.remote_active = false;
    app.tick(at + 10, hw, rtc, sink);
}

#[test]
fn broken_clock_is_corrected_at_boot_and_still_triggers() {
    let mut app = AlarmService::new(AlarmConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut rtc = MockRtc {
        valid: false,
        write_protected: true,
        running: false,
        now: dt("2000-01-01 00:00:00"),
        writes: 0,
    };

    start(&mut app, &mut hw, &mut rtc, &mut sink);

    assert_eq!(app.state(), AlarmState::Triggered);
    assert!(hw.siren_on());

    assert!(!rtc.write_protected, "write-protect latch cleared");
    assert!(rtc.running, "oscillator restarted");
    assert_eq!(rtc.now, dt(BUILD), "time set from the build stamp");
    assert_eq!(rtc.writes, 1);

    let faults = match sink.events.last() {
        Some(AppEvent::Started { clock_faults, .. }) => *clock_faults,
        other => panic!("expected Started last, got {:?}", other),
    };
    assert!(faults.contains(ClockFault::InvalidDateTime));
    assert!(faults.contains(ClockFault::WriteProtected));
    assert!(faults.contains(ClockFault::Stopped));

    let clock = &app.controller().clock;
    assert!(!clock.is_reliable(), "untrusted until the next health probe");
    assert!(clock.error_pending());
}

#[test]
fn stale_time_behind_build_is_corrected() {
    let mut app = AlarmService::new(AlarmConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut rtc = MockRtc::healthy_at("2023-05-05 10:00:00");

    start(&mut app, &mut hw, &mut rtc, &mut sink);

    assert_eq!(rtc.now, dt(BUILD));
    assert!(app.controller().clock.error_pending());
    assert_eq!(app.status_report().hour, None);
}

#[test]
fn pending_fault_is_signalled_on_disarm_exactly_once() {
    let mut app = AlarmService::new(AlarmConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut rtc = MockRtc::healthy_at("2030-01-01 10:00:00");
    rtc.write_protected = true;

    start(&mut app, &mut hw, &mut rtc, &mut sink);
    hw.clear();

    press(&mut app, &mut hw, &mut rtc, &mut sink, 1_000);
    assert_eq!(app.state(), AlarmState::Off);
    assert_eq!(hw.beeps(), vec![(2, 200), (5, 80)], "disarm then clock-fault beep");
    assert_eq!(sink.count(|e| *e == AppEvent::ClockFaultAcknowledged), 1);
    assert!(!app.controller().clock.error_pending());

    press(&mut app, &mut hw, &mut rtc, &mut sink, 2_000);
    press(&mut app, &mut hw, &mut rtc, &mut sink, 3_000);
    assert_eq!(app.state(), AlarmState::Off);
    assert_eq!(sink.count(|e| *e == AppEvent::ClockFaultAcknowledged), 1);
}

#[test]
fn unrepairable_clock_blocks_auto_arm() {
    let mut app = AlarmService::new(AlarmConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut rtc = MockRtc::healthy_at("2030-01-01 20:00:00");

    start(&mut app, &mut hw, &mut rtc, &mut sink);
    press(&mut app, &mut hw, &mut rtc, &mut sink, 1_000);
    assert_eq!(app.state(), AlarmState::Off);

    // Backup battery gone: the chip reports garbage that happens to read 23:00.
    rtc.now = dt("2030-01-01 23:00:00");
    rtc.valid = false;

    app.tick(HEALTH, &mut hw, &mut rtc, &mut sink);
    app.tick(HEALTH + CHECK, &mut hw, &mut rtc, &mut sink);

    assert_eq!(app.state(), AlarmState::Off);
    assert_eq!(sink.count(|e| *e == AppEvent::AutoArmed), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ClockFault(_))), 1);
    assert!(!app.controller().clock.is_reliable());
    assert_eq!(app.status_report().hour, None);
}

#[test]
fn write_protect_latch_is_repaired_in_place_and_auto_arm_proceeds() {
    let mut app = AlarmService::new(AlarmConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut rtc = MockRtc::healthy_at("2030-01-01 20:00:00");

    start(&mut app, &mut hw, &mut rtc, &mut sink);
    press(&mut app, &mut hw, &mut rtc, &mut sink, 1_000);

    rtc.now = dt("2030-01-01 23:00:00");
    rtc.write_protected = true;

    app.tick(HEALTH, &mut hw, &mut rtc, &mut sink);

    assert!(!rtc.write_protected);
    assert!(app.controller().clock.is_reliable());
    assert!(app.controller().clock.error_pending(), "operator still told on next disarm");
    assert_eq!(app.state(), AlarmState::Armed);
    assert_eq!(sink.count(|e| *e == AppEvent::AutoArmed), 1);
}

#[test]
fn clock_corrected_at_boot_is_trusted_after_next_probe() {
    let mut app = AlarmService::new(AlarmConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut rtc = MockRtc::healthy_at("2030-01-01 10:00:00");
    rtc.running = false;

    start(&mut app, &mut hw, &mut rtc, &mut sink);
    assert!(!app.controller().clock.is_reliable());

    app.tick(CHECK, &mut hw, &mut rtc, &mut sink);
    assert!(!app.controller().clock.is_reliable(), "probe is cached");

    app.tick(HEALTH, &mut hw, &mut rtc, &mut sink);
    assert!(app.controller().clock.is_reliable());
    assert_eq!(sink.count(|e| *e == AppEvent::ClockRestored), 1);
    assert_eq!(app.status_report().hour, Some(10));
}
