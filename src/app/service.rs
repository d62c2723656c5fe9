//! Application service: the hexagonal core.
//!
//! [`AlarmService`] owns the FSM, the auto-arm schedule, and the shared
//! controller state.  It exposes a clean, hardware-agnostic API.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ───▶ ┌──────────────────────────┐ ──▶ EventSink
//!  RtcPort    ◀──▶ │       AlarmService       │
//! ActuatorPort ◀── │  FSM · Schedule · Clock  │
//! FeedbackPort ◀── └──────────────────────────┘
//! ```
//!
//! ## Cycle order
//!
//! 1. Read inputs, emit mains edges, debounce the remote.  A press is
//!    dispatched and **ends the cycle**, so a disarm always wins over an
//!    auto-arm or trigger decided in the same cycle.
//! 2. Scheduling check (clock health, hour, midnight reset); dispatch
//!    `AutoArm` when it says so and the alarm is `Off`.
//! 3. `Armed` / `Triggered`: dispatch `Tick` (intrusion check, siren
//!    timeout).
//!
//! No step sleeps; the only blocking is inside beep emission.

use log::info;

use crate::clock::RtcDateTime;
use crate::config::AlarmConfig;
use crate::drivers::button::ButtonEvent;
use crate::fsm::context::{ControllerState, Effect, Notice};
use crate::fsm::states::build_state_table;
use crate::fsm::{AlarmEvent, AlarmState, Fsm};
use crate::scheduler::{AutoArmSchedule, ScheduleDecision};
use crate::timing::has_elapsed;

use super::events::{AppEvent, StatusReport};
use super::ports::{ActuatorPort, EventSink, FeedbackPort, RtcPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// AlarmService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AlarmService {
    fsm: Fsm,
    ctx: ControllerState,
    schedule: AutoArmSchedule,
    tick_count: u64,
}

impl AlarmService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware: call [`start`](Self::start) next.
    pub fn new(config: AlarmConfig) -> Self {
        let schedule = AutoArmSchedule::new(config.schedule_check_interval_ms);
        let ctx = ControllerState::new(config);
        let fsm = Fsm::new(build_state_table(), AlarmState::Off);

        Self {
            fsm,
            ctx,
            schedule,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring up the clock, take the first input reading, and go to the
    /// fail-safe `Triggered` state.
    ///
    /// A remote button held during boot is latched and does not count as
    /// a press until it has been released.  Silencing this power-up
    /// trigger does not spend tonight's auto-arm.
    pub fn start(
        &mut self,
        now_ms: u32,
        build_time: Option<RtcDateTime>,
        rtc: &mut impl RtcPort,
        hw: &mut (impl SensorPort + ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
    ) {
        hw.all_off();

        self.ctx.now_ms = now_ms;
        self.ctx.last_schedule_check_ms = now_ms;
        self.ctx.last_status_ms = now_ms;

        let clock_faults = self.ctx.clock.initialize(rtc, build_time, now_ms);
        if self.ctx.clock.is_reliable() {
            self.ctx.hour = Some(self.ctx.clock.current_time(rtc).hour());
        }

        let snapshot = hw.read_inputs();
        self.ctx.sensors = snapshot;
        self.ctx.mains_present_last = snapshot.mains_present;
        self.ctx.remote.update(snapshot.remote_active, now_ms);
        if !snapshot.mains_present {
            sink.emit(&AppEvent::MainsLost);
        }

        self.fsm.force_transition(AlarmState::Triggered, &mut self.ctx);
        self.ctx.boot_failsafe = true;
        self.apply_effects(hw, sink);

        let state = self.fsm.current_state();
        sink.emit(&AppEvent::Started { state, clock_faults });
        info!("AlarmService started in {:?} (clock faults: {})", state, clock_faults);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies the sensor, actuator **and** feedback
    /// ports, which avoids a triple mutable borrow while keeping the port
    /// boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort + FeedbackPort),
        rtc: &mut impl RtcPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.ctx.now_ms = now_ms;
        let clock_trusted_before = self.ctx.clock.is_reliable();

        // 1. Inputs and remote button
        let snapshot = hw.read_inputs();
        self.ctx.sensors = snapshot;
        self.track_mains(sink);

        if self.ctx.remote.update(snapshot.remote_active, now_ms) == Some(ButtonEvent::Pressed) {
            self.observe_hour(rtc);
            self.dispatch(AlarmEvent::ButtonPress, hw, sink);
            self.finish_cycle(clock_trusted_before, sink);
            return;
        }

        // 2. Scheduled auto-arm
        if self.schedule.check(&mut self.ctx, rtc) == ScheduleDecision::Arm
            && self.fsm.current_state() == AlarmState::Off
        {
            self.dispatch(AlarmEvent::AutoArm, hw, sink);
        }

        // 3–4. Intrusion check / siren timeout
        if matches!(self.fsm.current_state(), AlarmState::Armed | AlarmState::Triggered) {
            self.dispatch(AlarmEvent::Tick, hw, sink);
        }

        self.finish_cycle(clock_trusted_before, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> AlarmState {
        self.fsm.current_state()
    }

    /// Total control cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Read-only view of the controller state.
    pub fn controller(&self) -> &ControllerState {
        &self.ctx
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.ctx.config
    }

    /// Build a status snapshot from the current context.
    pub fn status_report(&self) -> StatusReport {
        let c = &self.ctx;
        StatusReport {
            state: self.fsm.current_state(),
            door_open: c.sensors.door_open,
            motion: c.sensors.motion,
            mains_present: c.sensors.mains_present,
            siren: c.outputs.siren,
            clock_reliable: c.clock.is_reliable(),
            clock_fault_pending: c.clock.error_pending(),
            auto_armed_today: c.auto_armed_today,
            hour: c.hour,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Dispatch one event, execute the resulting effects, report the move.
    fn dispatch(
        &mut self,
        event: AlarmEvent,
        hw: &mut (impl ActuatorPort + FeedbackPort),
        sink: &mut impl EventSink,
    ) {
        let transition = self.fsm.handle(event, &mut self.ctx);
        self.apply_effects(hw, sink);
        if let Some(t) = transition {
            sink.emit(&AppEvent::StateChanged { from: t.from, to: t.to });
        }
    }

    /// Translate queued FSM effects into port calls, in order.
    fn apply_effects(&mut self, hw: &mut (impl ActuatorPort + FeedbackPort), sink: &mut impl EventSink) {
        for effect in self.ctx.take_effects() {
            match effect {
                Effect::Siren(on) => hw.set_siren(on),
                Effect::StatusLed(on) => hw.set_status_led(on),
                Effect::Beep(p) => hw.beep(p.count, p.duration_ms),
                Effect::Pause(ms) => hw.pause(ms),
                Effect::Notice(Notice::ArmRejected(reason)) => sink.emit(&AppEvent::ArmRejected(reason)),
                Effect::Notice(Notice::ClockFaultAcknowledged) => sink.emit(&AppEvent::ClockFaultAcknowledged),
                Effect::Notice(Notice::AutoArmed) => sink.emit(&AppEvent::AutoArmed),
            }
        }
    }

    /// Refresh the hour for handlers that care (late-disarm bookkeeping).
    fn observe_hour(&mut self, rtc: &mut impl RtcPort) {
        self.ctx.hour = self
            .ctx
            .clock
            .is_reliable()
            .then(|| self.ctx.clock.current_time(rtc).hour());
    }

    fn track_mains(&mut self, sink: &mut impl EventSink) {
        let present = self.ctx.sensors.mains_present;
        if present != self.ctx.mains_present_last {
            self.ctx.mains_present_last = present;
            let event = if present { AppEvent::MainsRestored } else { AppEvent::MainsLost };
            sink.emit(&event);
        }
    }

    /// Clock trust edges and the periodic status report.
    fn finish_cycle(&mut self, clock_trusted_before: bool, sink: &mut impl EventSink) {
        let trusted = self.ctx.clock.is_reliable();
        if clock_trusted_before && !trusted {
            sink.emit(&AppEvent::ClockFault(self.ctx.clock.faults()));
        } else if !clock_trusted_before && trusted {
            sink.emit(&AppEvent::ClockRestored);
        }

        if has_elapsed(self.ctx.now_ms, self.ctx.last_status_ms, self.ctx.config.status_interval_ms) {
            self.ctx.last_status_ms = self.ctx.now_ms;
            sink.emit(&AppEvent::Status(self.status_report()));
        }
    }
}
