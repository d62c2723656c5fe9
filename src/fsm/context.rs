//! Shared mutable context threaded through every FSM handler.
//!
//! `ControllerState` is the single struct that state handlers read from and
//! write to.  It contains the latest input snapshot, the debouncer and
//! clock supervisor, timing anchors, configuration, and the list of side
//! effects the current transition wants executed.  Think of it as the
//! "blackboard" in a blackboard architecture.
//!
//! Handlers never touch hardware.  They push [`Effect`]s; the orchestrator
//! drains and executes them in order after each dispatch.

use heapless::Vec;
use log::warn;

use super::AlarmState;
use crate::clock::ClockSupervisor;
use crate::config::{AlarmConfig, BeepPattern};
use crate::drivers::button::Debouncer;
use crate::error::ArmRejection;

/// Upper bound on effects from one dispatch (disarm out of `Triggered`
/// is the longest at six).
pub const MAX_EFFECTS: usize = 8;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by the orchestrator)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every input line, polarity already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Remote button line is at its active level.
    pub remote_active: bool,
    /// PIR reports motion.
    pub motion: bool,
    /// Door reed reports open.
    pub door_open: bool,
    /// Mains supply present.
    pub mains_present: bool,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            remote_active: false,
            motion: false,
            door_open: false,
            mains_present: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Output commands and effects
// ---------------------------------------------------------------------------

/// Last commanded output levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputCommands {
    pub siren: bool,
    pub status_led: bool,
}

/// Something a handler wants the outside world told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ArmRejected(ArmRejection),
    /// A pending clock fault was signalled to the operator on disarm.
    ClockFaultAcknowledged,
    AutoArmed,
}

/// One ordered side effect produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Siren(bool),
    StatusLed(bool),
    Beep(BeepPattern),
    Pause(u32),
    Notice(Notice),
}

// ---------------------------------------------------------------------------
// ControllerState
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct ControllerState {
    // -- Lifecycle --
    /// Mirror of the FSM's current state, updated on every transition.
    pub alarm_state: AlarmState,
    /// Set while the alarm is still in the `Triggered` state forced at
    /// startup.  Cleared by the first `Off` or `Armed` entry.
    pub boot_failsafe: bool,

    // -- Timing --
    /// Millisecond counter value for the cycle in progress.
    pub now_ms: u32,
    /// Anchor for the siren auto-reset timer.
    pub alarm_trigger_ms: u32,
    /// Anchor for the periodic auto-arm scheduling check.
    pub last_schedule_check_ms: u32,
    /// Anchor for the periodic status report.
    pub last_status_ms: u32,

    // -- Inputs --
    pub sensors: SensorSnapshot,
    pub remote: Debouncer,
    /// Mains level seen on the previous cycle, for edge detection.
    pub mains_present_last: bool,

    // -- Clock --
    pub clock: ClockSupervisor,
    /// Hour of day observed by the last scheduling check, when trusted.
    pub hour: Option<u8>,
    /// Auto-arm already fired (or was pre-empted by a late disarm) today.
    pub auto_armed_today: bool,

    // -- Outputs --
    pub outputs: OutputCommands,
    pub effects: Vec<Effect, MAX_EFFECTS>,

    // -- Configuration --
    pub config: AlarmConfig,
}

impl ControllerState {
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            alarm_state: AlarmState::Off,
            boot_failsafe: false,
            now_ms: 0,
            alarm_trigger_ms: 0,
            last_schedule_check_ms: 0,
            last_status_ms: 0,
            sensors: SensorSnapshot::default(),
            remote: Debouncer::new(config.debounce_ms),
            mains_present_last: true,
            clock: ClockSupervisor::new(config.clock_health_interval_ms),
            hour: None,
            auto_armed_today: false,
            outputs: OutputCommands::default(),
            effects: Vec::new(),
            config,
        }
    }

    pub fn set_siren(&mut self, on: bool) {
        self.outputs.siren = on;
        self.push(Effect::Siren(on));
    }

    pub fn set_status_led(&mut self, on: bool) {
        self.outputs.status_led = on;
        self.push(Effect::StatusLed(on));
    }

    pub fn beep(&mut self, pattern: BeepPattern) {
        self.push(Effect::Beep(pattern));
    }

    pub fn pause(&mut self, ms: u32) {
        self.push(Effect::Pause(ms));
    }

    pub fn notify(&mut self, notice: Notice) {
        self.push(Effect::Notice(notice));
    }

    /// `true` once the hour has reached the auto-arm window.
    pub fn in_auto_arm_window(&self) -> bool {
        self.hour.is_some_and(|h| h >= self.config.auto_arm_hour)
    }

    /// Every auto-arm guard except the schedule interval itself.
    pub fn auto_arm_allowed(&self) -> bool {
        self.config.auto_arm_enabled
            && self.alarm_state == AlarmState::Off
            && !self.sensors.door_open
            && !self.auto_armed_today
            && self.clock.is_reliable()
            && self.in_auto_arm_window()
    }

    /// Take every queued effect, leaving the queue empty.
    pub fn take_effects(&mut self) -> Vec<Effect, MAX_EFFECTS> {
        core::mem::take(&mut self.effects)
    }

    fn push(&mut self, effect: Effect) {
        if self.effects.push(effect).is_err() {
            warn!("effect queue full, dropped {:?}", effect);
        }
    }
}
