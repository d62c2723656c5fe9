//! Outbound application events.
//!
//! The [`AlarmService`](super::service::AlarmService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, record them in a
//! test, etc.

use crate::error::{ArmRejection, ClockFaults};
use crate::fsm::AlarmState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the fail-safe initial state and
    /// the clock faults found during bring-up).
    Started { state: AlarmState, clock_faults: ClockFaults },

    /// The FSM transitioned between states.
    StateChanged { from: AlarmState, to: AlarmState },

    /// An arm request was refused; state unchanged.
    ArmRejected(ArmRejection),

    /// The scheduler armed the system for the night.
    AutoArmed,

    /// The clock lost trust.
    ClockFault(ClockFaults),

    /// The clock is trusted again.
    ClockRestored,

    /// The operator was signalled about a pending clock fault.
    ClockFaultAcknowledged,

    MainsLost,

    MainsRestored,

    /// Periodic status snapshot.
    Status(StatusReport),
}

/// A point-in-time status snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub state: AlarmState,
    pub door_open: bool,
    pub motion: bool,
    pub mains_present: bool,
    pub siren: bool,
    pub clock_reliable: bool,
    pub clock_fault_pending: bool,
    pub auto_armed_today: bool,
    /// Last trusted hour-of-day, if any.
    pub hour: Option<u8>,
}
