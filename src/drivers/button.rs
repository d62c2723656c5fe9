//! Polled, latched debouncer for the remote-control input.
//!
//! ## Hardware
//!
//! The remote receiver pulls its output low while a button is held.  The
//! hardware adapter decodes the polarity, so [`Debouncer::update`] only
//! sees "active" / "inactive" once per control cycle.
//!
//! ## Rules
//!
//! | Condition                                             | Result     |
//! |-------------------------------------------------------|------------|
//! | active, not latched, first press or window elapsed    | `Pressed`  |
//! | active, not latched, inside the debounce window       | ignored    |
//! | active, latched                                       | ignored    |
//! | inactive, latched                                     | `Released` |
//!
//! The window is measured between *accepted* presses, so contact bounce
//! that drops the line for a moment cannot produce a second press.

use crate::timing::has_elapsed;

/// Edges reported by [`Debouncer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    debounce_ms: u32,
    last_press_ms: Option<u32>,
    pressed: bool,
}

impl Debouncer {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_press_ms: None,
            pressed: false,
        }
    }

    /// Feed one sample of the decoded line level.
    /// `now_ms` is the current monotonic time in milliseconds.
    pub fn update(&mut self, active: bool, now_ms: u32) -> Option<ButtonEvent> {
        if active {
            if self.pressed {
                return None;
            }
            let window_open = match self.last_press_ms {
                None => true,
                Some(last) => has_elapsed(now_ms, last, self.debounce_ms),
            };
            if window_open {
                self.pressed = true;
                self.last_press_ms = Some(now_ms);
                return Some(ButtonEvent::Pressed);
            }
            None
        } else if self.pressed {
            self.pressed = false;
            Some(ButtonEvent::Released)
        } else {
            None
        }
    }

    /// Latched between an accepted press and the following release.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn last_press_ms(&self) -> Option<u32> {
        self.last_press_ms
    }
}
