//! Blocking buzzer sequencer.
//!
//! Drives the active-low buzzer output through a fixed pulse train:
//! `count` pulses of `duration_ms` (capped at [`MAX_BEEP_MS`]), separated
//! by [`BEEP_GAP_MS`] of silence.  The caller's loop is blocked for the
//! whole sequence; the configuration layer keeps the longest sequence
//! inside the watchdog timeout.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::relay::ActiveLowOutput;
use crate::config::{BEEP_GAP_MS, MAX_BEEP_MS};

pub struct Beeper<P: OutputPin, D: DelayNs> {
    buzzer: ActiveLowOutput<P>,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Beeper<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            buzzer: ActiveLowOutput::new(pin, "buzzer"),
            delay,
        }
    }

    pub fn beep(&mut self, count: u8, duration_ms: u32) {
        let pulse = duration_ms.min(MAX_BEEP_MS);
        for i in 0..count {
            if i > 0 {
                self.delay.delay_ms(BEEP_GAP_MS);
            }
            self.buzzer.engage();
            self.delay.delay_ms(pulse);
            self.buzzer.release();
        }
    }

    pub fn pause(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Force the buzzer silent.
    pub fn silence(&mut self) {
        self.buzzer.release();
    }

    pub fn is_sounding(&self) -> bool {
        self.buzzer.is_engaged()
    }

    #[cfg(test)]
    fn parts(&self) -> (&ActiveLowOutput<P>, &D) {
        (&self.buzzer, &self.delay)
    }
}
