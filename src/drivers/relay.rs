//! Active-low digital output (siren driver, buzzer, status LED).
//!
//! Every output on the board sinks current: driving the pin low engages
//! the load.  Pin errors are logged and the output keeps its previous
//! logical state, so a flaky GPIO never takes the control loop down.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct ActiveLowOutput<P: OutputPin> {
    pin: P,
    name: &'static str,
    engaged: bool,
}

impl<P: OutputPin> ActiveLowOutput<P> {
    /// Wrap `pin` and drive it to the released (high) level.
    pub fn new(pin: P, name: &'static str) -> Self {
        let mut out = Self {
            pin,
            name,
            engaged: true,
        };
        out.release();
        out
    }

    pub fn set(&mut self, engaged: bool) {
        let result = if engaged {
            self.pin.set_low()
        } else {
            self.pin.set_high()
        };
        match result {
            Ok(()) => self.engaged = engaged,
            Err(e) => warn!("{}: pin write failed: {:?}", self.name, e),
        }
    }

    pub fn engage(&mut self) {
        self.set(true);
    }

    pub fn release(&mut self) {
        self.set(false);
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    #[cfg(test)]
    pub(crate) fn pin(&self) -> &P {
        &self.pin
    }
}
