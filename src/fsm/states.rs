//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!          ┌──────[press, door closed / auto-arm]──────┐
//!          │                                           ▼
//!         OFF ◀─────────────[press]───────────────── ARMED
//!          ▲                                         │   ▲
//!          │                    [motion / door open] │   │ [siren timeout]
//!          │                                         ▼   │
//!          └─────────────────[press]─────────────── TRIGGERED
//! ```
//!
//! `Triggered` never falls back to `Off` on its own.

use super::context::{ControllerState, Notice};
use super::{AlarmEvent, AlarmState, StateDescriptor};
use crate::error::ArmRejection;
use crate::timing::has_elapsed;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; AlarmState::COUNT] {
    [
        // Index 0: Off
        StateDescriptor {
            id: AlarmState::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_event: off_event,
        },
        // Index 1: Armed
        StateDescriptor {
            id: AlarmState::Armed,
            name: "Armed",
            on_enter: Some(armed_enter),
            on_exit: None,
            on_event: armed_event,
        },
        // Index 2: Triggered
        StateDescriptor {
            id: AlarmState::Triggered,
            name: "Triggered",
            on_enter: Some(triggered_enter),
            on_exit: Some(triggered_exit),
            on_event: triggered_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF state: disarmed
// ═══════════════════════════════════════════════════════════════════════════

/// Disarm: outputs off, acknowledgement beeps, pending clock fault signalled.
fn off_enter(ctx: &mut ControllerState) {
    ctx.set_siren(false);
    ctx.set_status_led(false);
    ctx.beep(ctx.config.disarm_beep);

    if ctx.clock.acknowledge_fault() {
        ctx.beep(ctx.config.clock_fault_beep);
        ctx.notify(Notice::ClockFaultAcknowledged);
    }

    // Disarming inside the auto-arm window counts as tonight's arm, so the
    // scheduler does not re-arm behind the operator's back.  Silencing the
    // power-up siren is not a disarm decision and leaves the night alone.
    let boot_failsafe = core::mem::take(&mut ctx.boot_failsafe);
    if ctx.in_auto_arm_window() && !boot_failsafe {
        ctx.auto_armed_today = true;
    }
    info!("OFF: disarmed");
}

fn off_event(ctx: &mut ControllerState, event: AlarmEvent) -> Option<AlarmState> {
    match event {
        AlarmEvent::ButtonPress => {
            if ctx.sensors.door_open {
                warn!("OFF: arm rejected, door open");
                ctx.beep(ctx.config.door_open_beep);
                ctx.notify(Notice::ArmRejected(ArmRejection::DoorOpen));
                return None;
            }
            ctx.beep(ctx.config.arm_beep);
            Some(AlarmState::Armed)
        }
        AlarmEvent::AutoArm => {
            // Sensor state may have moved since the scheduler looked.
            if ctx.sensors.door_open || ctx.auto_armed_today {
                return None;
            }
            info!("OFF: auto-arming for the night");
            ctx.beep(ctx.config.auto_arm_beep);
            ctx.pause(ctx.config.auto_arm_pause_ms);
            ctx.auto_armed_today = true;
            ctx.notify(Notice::AutoArmed);
            Some(AlarmState::Armed)
        }
        AlarmEvent::Tick => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMED state: watching PIR, door, and optionally mains
// ═══════════════════════════════════════════════════════════════════════════

fn armed_enter(ctx: &mut ControllerState) {
    ctx.boot_failsafe = false;
    ctx.set_status_led(true);
    info!("ARMED: watching sensors");
}

fn armed_event(ctx: &mut ControllerState, event: AlarmEvent) -> Option<AlarmState> {
    match event {
        AlarmEvent::ButtonPress => Some(AlarmState::Off),
        AlarmEvent::Tick => {
            let s = ctx.sensors;
            let mains_lost = !s.mains_present && ctx.config.mains_loss_triggers_alarm;
            if s.motion || s.door_open || mains_lost {
                warn!(
                    "ARMED: intrusion (motion={}, door_open={}, mains_lost={})",
                    s.motion, s.door_open, mains_lost
                );
                return Some(AlarmState::Triggered);
            }
            None
        }
        AlarmEvent::AutoArm => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  TRIGGERED state: siren sounding
// ═══════════════════════════════════════════════════════════════════════════

fn triggered_enter(ctx: &mut ControllerState) {
    ctx.set_siren(true);
    ctx.set_status_led(true);
    ctx.alarm_trigger_ms = ctx.now_ms;
    warn!("TRIGGERED: siren on for {} ms", ctx.config.siren_duration_ms);
}

fn triggered_exit(ctx: &mut ControllerState) {
    ctx.set_siren(false);
}

fn triggered_event(ctx: &mut ControllerState, event: AlarmEvent) -> Option<AlarmState> {
    match event {
        AlarmEvent::ButtonPress => Some(AlarmState::Off),
        AlarmEvent::Tick => {
            if has_elapsed(ctx.now_ms, ctx.alarm_trigger_ms, ctx.config.siren_duration_ms) {
                info!("TRIGGERED: siren timeout, re-arming");
                return Some(AlarmState::Armed);
            }
            None
        }
        AlarmEvent::AutoArm => None,
    }
}
