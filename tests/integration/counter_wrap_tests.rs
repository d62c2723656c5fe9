//! Every interval the service keeps must survive the millisecond counter
//! wrapping through zero.
//!
//! Each test starts the service 30 s before `u32::MAX` so the deadline
//! under test lands after the wrap.

use super::mock_hw::{MockHardware, MockRtc, RecordingSink, dt};

use nightguard::app::events::AppEvent;
use nightguard::app::service::AlarmService;
use nightguard::config::AlarmConfig;
use nightguard::fsm::AlarmState;

const T0: u32 = u32::MAX - 30_000;
const BUILD: &str = "2024-01-01 00:00:00";
const SIREN: u32 = 180_000;
const CHECK: u32 = 600_000;
const HEALTH: u32 = 1_800_000;
const STATUS: u32 = 60_000;

struct Rig {
    app: AlarmService,
    hw: MockHardware,
    rtc: MockRtc,
    sink: RecordingSink,
}

impl Rig {
    fn boot(rtc: MockRtc) -> Self {
        let mut rig = Self {
            app: AlarmService::new(AlarmConfig::default()),
            hw: MockHardware::new(),
            rtc,
            sink: RecordingSink::new(),
        };
        rig.app
            .start(T0, Some(dt(BUILD)), &mut rig.rtc, &mut rig.hw, &mut rig.sink);
        rig
    }

    /// Tick at `T0 + offset`, wrapping like the hardware counter.
    fn tick(&mut self, offset: u32) {
        self.app
            .tick(T0.wrapping_add(offset), &mut self.hw, &mut self.rtc, &mut self.sink);
    }

    fn press(&mut self, offset: u32) {
        self.hw.inputs.remote_active = true;
        self.tick(offset);
        self.hw.inputs.remote_active = false;
        self.tick(offset + 10);
    }
}

#[test]
fn siren_times_out_exactly_once_across_the_wrap() {
    let mut rig = Rig::boot(MockRtc::healthy_at("2030-06-01 12:00:00"));
    assert_eq!(rig.app.state(), AlarmState::Triggered);

    rig.tick(20_000);
    rig.tick(40_000);
    assert!(T0.wrapping_add(40_000) < T0, "counter has wrapped");
    assert_eq!(rig.app.state(), AlarmState::Triggered);

    rig.tick(SIREN - 1);
    assert_eq!(rig.app.state(), AlarmState::Triggered);
    assert!(rig.hw.siren_on());

    rig.tick(SIREN);
    assert_eq!(rig.app.state(), AlarmState::Armed);
    assert!(!rig.hw.siren_on());
}

#[test]
fn auto_arm_check_fires_on_its_interval_across_the_wrap() {
    let mut rig = Rig::boot(MockRtc::healthy_at("2030-06-01 21:00:00"));
    rig.press(1_000);
    assert_eq!(rig.app.state(), AlarmState::Off);

    rig.rtc.now = dt("2030-06-01 22:30:00");
    rig.tick(CHECK - 1);
    assert_eq!(rig.app.state(), AlarmState::Off, "not due yet");

    rig.tick(CHECK);
    assert_eq!(rig.app.state(), AlarmState::Armed);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AutoArmed), 1);
}

#[test]
fn health_recheck_fires_on_its_interval_across_the_wrap() {
    let mut rtc = MockRtc::healthy_at("2030-06-01 10:00:00");
    rtc.running = false;
    let mut rig = Rig::boot(rtc);
    assert!(!rig.app.controller().clock.is_reliable());

    rig.tick(CHECK);
    rig.tick(2 * CHECK);
    assert!(!rig.app.controller().clock.is_reliable(), "health result is cached");

    rig.tick(HEALTH);
    assert!(rig.app.controller().clock.is_reliable());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ClockRestored), 1);
}

#[test]
fn status_report_keeps_its_cadence_across_the_wrap() {
    let mut rig = Rig::boot(MockRtc::healthy_at("2030-06-01 12:00:00"));
    let reports = |sink: &RecordingSink| sink.count(|e| matches!(e, AppEvent::Status(_)));

    rig.tick(STATUS - 1);
    assert_eq!(reports(&rig.sink), 0);

    rig.tick(STATUS);
    assert_eq!(reports(&rig.sink), 1);

    rig.tick(2 * STATUS - 1);
    assert_eq!(reports(&rig.sink), 1);
    rig.tick(2 * STATUS);
    assert_eq!(reports(&rig.sink), 2);
}
