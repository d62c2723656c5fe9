//! Night-time auto-arm scheduler.
//!
//! Runs alongside the button-driven FSM.  Every scheduling interval
//! (10 min by default) it observes the wall clock through the
//! [`ClockSupervisor`](crate::clock::ClockSupervisor) health gate, resets
//! the daily auto-arm flag at midnight, and decides whether the controller
//! should arm itself.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  AutoArmSchedule::check                      │
//! │                                                              │
//! │   interval due? ──no──▶ NotDue                               │
//! │        │                                                     │
//! │        ▼                                                     │
//! │   clock healthy? ──no──▶ record fault ─▶ try repair          │
//! │        │                                    │                │
//! │        ▼                                    ▼                │
//! │   clock trusted? ◀──────────────────────────┘                │
//! │        │ no ──▶ ClockUntrusted                               │
//! │        ▼                                                     │
//! │   read hour ─▶ midnight reset ─▶ guards ─▶ Hold(..) / Arm    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler only decides.  The orchestrator dispatches
//! [`AlarmEvent::AutoArm`](crate::fsm::AlarmEvent::AutoArm) on `Arm`.

use crate::app::ports::RtcPort;
use crate::error::ClockFaults;
use crate::fsm::AlarmState;
use crate::fsm::context::ControllerState;
use crate::timing::has_elapsed;
use log::{debug, info};

/// Why a due scheduling check did not arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    /// Auto-arm switched off in the configuration.
    Disabled,
    /// Alarm is already armed or sounding.
    NotOff,
    /// Hour is before the auto-arm window.
    TooEarly,
    /// Tonight's auto-arm already happened (or a late disarm spent it).
    AlreadyArmedToday,
    DoorOpen,
}

/// Outcome of one [`AutoArmSchedule::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Interval has not elapsed; nothing was observed.
    NotDue,
    /// Clock is not trusted; no time-based action taken.
    ClockUntrusted(ClockFaults),
    Hold(HoldReason),
    Arm,
}

/// Periodic auto-arm decision engine.
///
/// The interval anchor lives in [`ControllerState::last_schedule_check_ms`]
/// so that all mutable controller state stays in one place.
#[derive(Debug, Clone, Copy)]
pub struct AutoArmSchedule {
    interval_ms: u32,
}

impl AutoArmSchedule {
    pub const fn new(interval_ms: u32) -> Self {
        Self { interval_ms }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Run one scheduling check if the interval has elapsed.
    pub fn check(&self, ctx: &mut ControllerState, rtc: &mut impl RtcPort) -> ScheduleDecision {
        let now = ctx.now_ms;
        if !has_elapsed(now, ctx.last_schedule_check_ms, self.interval_ms) {
            return ScheduleDecision::NotDue;
        }
        ctx.last_schedule_check_ms = now;

        if !ctx.clock.is_healthy(rtc, now) {
            ctx.clock.record_fault();
            ctx.clock.try_repair(rtc, now);
        }
        if !ctx.clock.is_reliable() {
            ctx.hour = None;
            debug!("Scheduler: clock untrusted [{}], skipping", ctx.clock.faults());
            return ScheduleDecision::ClockUntrusted(ctx.clock.faults());
        }

        let hour = ctx.clock.current_time(rtc).hour();
        ctx.hour = Some(hour);

        if hour == 0 && ctx.auto_armed_today {
            info!("Scheduler: midnight, auto-arm re-enabled");
            ctx.auto_armed_today = false;
        }

        let decision = match Self::hold_reason(ctx) {
            Some(reason) => ScheduleDecision::Hold(reason),
            None => ScheduleDecision::Arm,
        };
        debug!("Scheduler: hour {} -> {:?}", hour, decision);
        decision
    }

    fn hold_reason(ctx: &ControllerState) -> Option<HoldReason> {
        if !ctx.config.auto_arm_enabled {
            Some(HoldReason::Disabled)
        } else if ctx.alarm_state != AlarmState::Off {
            Some(HoldReason::NotOff)
        } else if !ctx.in_auto_arm_window() {
            Some(HoldReason::TooEarly)
        } else if ctx.auto_armed_today {
            Some(HoldReason::AlreadyArmedToday)
        } else if ctx.sensors.door_open {
            Some(HoldReason::DoorOpen)
        } else {
            debug_assert!(ctx.auto_arm_allowed());
            None
        }
    }
}
