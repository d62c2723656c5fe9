//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AlarmService (domain)
//! ```
//!
//! Driven adapters (pins, the real-time clock, the beeper, event sinks)
//! implement these traits.  The [`AlarmService`](super::service::AlarmService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! None of the ports return errors.  Pin-level failures are absorbed by the
//! adapters (inputs read inactive, outputs are best-effort) and clock
//! failures surface through the health queries on [`RtcPort`].

use crate::clock::RtcDateTime;
use crate::fsm::context::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait SensorPort {
    /// Sample every input line and return a decoded snapshot
    /// (polarities already resolved to "active" booleans).
    fn read_inputs(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command outputs.
pub trait ActuatorPort {
    fn set_siren(&mut self, on: bool);

    fn set_status_led(&mut self, on: bool);

    /// Release every output (siren, LED, buzzer).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Feedback port (driven adapter: domain → buzzer)
// ───────────────────────────────────────────────────────────────

/// Audible operator feedback.
///
/// Both calls block the control loop for their full duration.  Callers
/// keep every sequence bounded: pulses are capped at
/// [`MAX_BEEP_MS`](crate::config::MAX_BEEP_MS) and separated by
/// [`BEEP_GAP_MS`](crate::config::BEEP_GAP_MS).
pub trait FeedbackPort {
    /// Emit `count` pulses of `duration_ms` each.
    fn beep(&mut self, count: u8, duration_ms: u32);

    /// Hold the loop silently for `ms`.
    fn pause(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Real-time clock port
// ───────────────────────────────────────────────────────────────

/// Minimal interface to a battery-backed real-time clock chip.
///
/// Reads never fail: a broken chip shows up as `is_date_time_valid() ==
/// false`, a set write-protect latch, or a halted oscillator, which
/// [`ClockSupervisor`](crate::clock::ClockSupervisor) turns into faults.
pub trait RtcPort {
    /// Bring up the chip interface.  Called once at startup.
    fn begin(&mut self);

    fn is_date_time_valid(&mut self) -> bool;

    fn is_write_protected(&mut self) -> bool;

    fn set_write_protected(&mut self, protected: bool);

    /// `true` while the oscillator is running.
    fn is_running(&mut self) -> bool;

    fn set_running(&mut self, running: bool);

    fn date_time(&mut self) -> RtcDateTime;

    /// Ignored by the chip while write-protected.
    fn set_date_time(&mut self, dt: RtcDateTime);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a test
/// recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
