//! Pin-level tests: the service driving a real `HardwareAdapter` built on
//! shared-state fake pins, so the assertions are on electrical levels
//! (remote and PIR pull low, door floats high when open, loads are
//! engaged by driving their pin low).

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::mock_hw::{MockRtc, RecordingSink, dt};

use nightguard::adapters::hardware::{HardwareAdapter, InputLines};
use nightguard::app::service::AlarmService;
use nightguard::config::AlarmConfig;
use nightguard::fsm::AlarmState;

/// A wire whose level the test and the adapter both see.
#[derive(Clone)]
struct Line(Rc<Cell<bool>>);

impl Line {
    fn new(high: bool) -> Self {
        Self(Rc::new(Cell::new(high)))
    }

    fn level(&self) -> bool {
        self.0.get()
    }

    fn drive(&self, high: bool) {
        self.0.set(high);
    }
}

impl ErrorType for Line {
    type Error = Infallible;
}

impl InputPin for Line {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

impl OutputPin for Line {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

/// Delay that only accumulates the requested time.
#[derive(Clone, Default)]
struct VirtualDelay(Rc<RefCell<u64>>);

impl DelayNs for VirtualDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.0.borrow_mut() += u64::from(ns);
    }
}

struct Board {
    remote: Line,
    pir: Line,
    door: Line,
    siren: Line,
    led: Line,
    buzzer: Line,
    delayed_ns: Rc<RefCell<u64>>,
}

type Adapter = HardwareAdapter<Line, Line, VirtualDelay>;

fn board() -> (Board, Adapter) {
    let board = Board {
        remote: Line::new(true),
        pir: Line::new(true),
        door: Line::new(false),
        siren: Line::new(false),
        led: Line::new(false),
        buzzer: Line::new(false),
        delayed_ns: Rc::default(),
    };
    let inputs = InputLines {
        remote: board.remote.clone(),
        pir: board.pir.clone(),
        door: board.door.clone(),
        mains: None,
    };
    let hw = HardwareAdapter::new(
        inputs,
        board.siren.clone(),
        board.led.clone(),
        board.buzzer.clone(),
        VirtualDelay(board.delayed_ns.clone()),
    );
    (board, hw)
}

fn press(app: &mut AlarmService, board: &Board, hw: &mut Adapter, rtc: &mut MockRtc, sink: &mut RecordingSink, at: u32) {
    board.remote.drive(false);
    app.tick(at, hw, rtc, sink);
    board.remote.drive(true);
    app.tick(at + 10, hw, rtc, sink);
}

#[test]
fn outputs_are_released_when_the_adapter_is_built() {
    let (board, hw) = board();
    assert!(board.siren.level());
    assert!(board.led.level());
    assert!(board.buzzer.level());
    assert!(!hw.siren_engaged());
}

#[test]
fn full_cycle_at_pin_level() {
    let (board, mut hw) = board();
    let mut rtc = MockRtc::healthy_at("2030-06-01 12:00:00");
    let mut sink = RecordingSink::new();
    let mut app = AlarmService::new(AlarmConfig::default());

    app.start(0, Some(dt("2024-01-01 00:00:00")), &mut rtc, &mut hw, &mut sink);
    assert_eq!(app.state(), AlarmState::Triggered);
    assert!(!board.siren.level(), "siren relay engaged (low)");
    assert!(!board.led.level());

    press(&mut app, &board, &mut hw, &mut rtc, &mut sink, 1_000);
    assert_eq!(app.state(), AlarmState::Off);
    assert!(board.siren.level());
    assert!(board.led.level());
    assert!(board.buzzer.level(), "buzzer idle after the disarm beep");

    press(&mut app, &board, &mut hw, &mut rtc, &mut sink, 2_000);
    assert_eq!(app.state(), AlarmState::Armed);
    assert!(!board.led.level());
    assert!(board.siren.level());

    board.pir.drive(false);
    app.tick(2_500, &mut hw, &mut rtc, &mut sink);
    assert_eq!(app.state(), AlarmState::Triggered);
    assert!(!board.siren.level());
    assert!(hw.siren_engaged());
}

#[test]
fn open_door_line_blocks_arming() {
    let (board, mut hw) = board();
    let mut rtc = MockRtc::healthy_at("2030-06-01 12:00:00");
    let mut sink = RecordingSink::new();
    let mut app = AlarmService::new(AlarmConfig::default());
    app.start(0, Some(dt("2024-01-01 00:00:00")), &mut rtc, &mut hw, &mut sink);
    press(&mut app, &board, &mut hw, &mut rtc, &mut sink, 1_000);
    let before = *board.delayed_ns.borrow();

    board.door.drive(true);
    press(&mut app, &board, &mut hw, &mut rtc, &mut sink, 2_000);

    assert_eq!(app.state(), AlarmState::Off);
    assert!(board.led.level());
    let beeped_ms = (*board.delayed_ns.borrow() - before) / 1_000_000;
    assert_eq!(beeped_ms, 1_000, "one 1 s rejection beep");
}
