//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌───────────┬───────────┬──────────┬──────────────────────┐ │
//! │  │ AlarmState│ on_enter  │ on_exit  │ on_event             │ │
//! │  ├───────────┼───────────┼──────────┼──────────────────────┤ │
//! │  │ Off       │ fn(ctx)   │ -        │ fn(ctx, ev)->Option<>│ │
//! │  │ Armed     │ fn(ctx)   │ -        │ fn(ctx, ev)->Option<>│ │
//! │  │ Triggered │ fn(ctx)   │ fn(ctx)  │ fn(ctx, ev)->Option<>│ │
//! │  └───────────┴───────────┴──────────┴──────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Fsm::handle`] calls `on_event` for the **current** state.  If it
//! returns `Some(next)`, the engine runs `on_exit` for the current state,
//! then `on_enter` for the next, and updates the current pointer.  All
//! handlers receive `&mut ControllerState` and express every side effect as
//! an [`Effect`](context::Effect) pushed onto it.

pub mod context;
pub mod states;

use context::ControllerState;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Alarm lifecycle phase.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlarmState {
    /// Disarmed; siren and LED inactive.
    Off = 0,
    /// Watching the sensors; LED on.
    Armed = 1,
    /// Siren sounding; returns to `Armed` after the siren duration.
    Triggered = 2,
}

impl AlarmState {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `AlarmState`.  Out-of-range indices
    /// assert in debug builds and fall back to `Triggered` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Armed,
            2 => Self::Triggered,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Triggered
            }
        }
    }
}

/// Inputs the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEvent {
    /// Debounced remote-button press.
    ButtonPress,
    /// The scheduler decided it is time to arm for the night.
    AutoArm,
    /// Periodic evaluation of sensors and timers.
    Tick,
}

/// A completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: AlarmState,
    pub to: AlarmState,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut ControllerState);

/// Signature for the event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEventFn = fn(&mut ControllerState, AlarmEvent) -> Option<AlarmState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: AlarmState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_event: StateEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `AlarmState as usize`.
    table: [StateDescriptor; AlarmState::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, resting in `initial`.
    ///
    /// No `on_enter` runs here; the controller moves out of its declared
    /// default with [`force_transition`](Self::force_transition) at startup.
    pub fn new(table: [StateDescriptor; AlarmState::COUNT], initial: AlarmState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Dispatch one event to the current state.
    pub fn handle(&mut self, event: AlarmEvent, ctx: &mut ControllerState) -> Option<Transition> {
        let next = (self.table[self.current].on_event)(ctx, event)?;
        if next as usize == self.current {
            return None;
        }
        Some(self.transition(next, ctx))
    }

    /// Force an immediate transition regardless of what the handlers say.
    pub fn force_transition(&mut self, next: AlarmState, ctx: &mut ControllerState) -> Option<Transition> {
        (next as usize != self.current).then(|| self.transition(next, ctx))
    }

    /// The current state's identity.
    pub fn current_state(&self) -> AlarmState {
        AlarmState::from_index(self.current)
    }

    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: AlarmState, ctx: &mut ControllerState) -> Transition {
        let from = self.current_state();
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.alarm_state = next;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }

        Transition { from, to: next }
    }
}
