//! Hardware adapter: bridges real pins to domain port traits.
//!
//! Owns every input pin, the siren and LED outputs, and the beeper,
//! exposing them through [`SensorPort`], [`ActuatorPort`] and
//! [`FeedbackPort`].  This is the only module in the system that decodes
//! pin polarity.
//!
//! | Line    | Active level | Meaning             |
//! |---------|--------------|---------------------|
//! | remote  | LOW          | button held         |
//! | PIR     | LOW          | motion              |
//! | door    | HIGH         | door open           |
//! | mains   | LOW          | mains lost          |
//! | outputs | LOW          | engaged             |
//!
//! A pin read that fails is treated as the line's *inactive* level, so a
//! broken sensor reads as "nothing happening".  That is a known gap: a
//! disconnected PIR cannot trigger the alarm.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ActuatorPort, FeedbackPort, SensorPort};
use crate::drivers::beeper::Beeper;
use crate::drivers::relay::ActiveLowOutput;
use crate::fsm::context::SensorSnapshot;

/// The controller's input lines.
pub struct InputLines<In: InputPin> {
    pub remote: In,
    pub pir: In,
    pub door: In,
    /// Boards without a UPS leave this out; mains then reads as present.
    pub mains: Option<In>,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<In: InputPin, Out: OutputPin, D: DelayNs> {
    inputs: InputLines<In>,
    siren: ActiveLowOutput<Out>,
    led: ActiveLowOutput<Out>,
    beeper: Beeper<Out, D>,
}

impl<In: InputPin, Out: OutputPin, D: DelayNs> HardwareAdapter<In, Out, D> {
    /// Every output starts released.
    pub fn new(inputs: InputLines<In>, siren: Out, led: Out, buzzer: Out, delay: D) -> Self {
        Self {
            inputs,
            siren: ActiveLowOutput::new(siren, "siren"),
            led: ActiveLowOutput::new(led, "led"),
            beeper: Beeper::new(buzzer, delay),
        }
    }

    pub fn siren_engaged(&self) -> bool {
        self.siren.is_engaged()
    }

    pub fn led_engaged(&self) -> bool {
        self.led.is_engaged()
    }
}

fn read_low(pin: &mut impl InputPin, name: &str) -> bool {
    pin.is_low().unwrap_or_else(|e| {
        warn!("{}: read failed ({:?}), treating as inactive", name, e);
        false
    })
}

fn read_high(pin: &mut impl InputPin, name: &str) -> bool {
    pin.is_high().unwrap_or_else(|e| {
        warn!("{}: read failed ({:?}), treating as inactive", name, e);
        false
    })
}

// ── SensorPort implementation ─────────────────────────────────

impl<In: InputPin, Out: OutputPin, D: DelayNs> SensorPort for HardwareAdapter<In, Out, D> {
    fn read_inputs(&mut self) -> SensorSnapshot {
        let lines = &mut self.inputs;
        SensorSnapshot {
            remote_active: read_low(&mut lines.remote, "remote"),
            motion: read_low(&mut lines.pir, "pir"),
            door_open: read_high(&mut lines.door, "door"),
            mains_present: match lines.mains.as_mut() {
                Some(pin) => !read_low(pin, "mains"),
                None => true,
            },
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<In: InputPin, Out: OutputPin, D: DelayNs> ActuatorPort for HardwareAdapter<In, Out, D> {
    fn set_siren(&mut self, on: bool) {
        self.siren.set(on);
    }

    fn set_status_led(&mut self, on: bool) {
        self.led.set(on);
    }

    fn all_off(&mut self) {
        self.siren.release();
        self.led.release();
        self.beeper.silence();
    }
}

// ── FeedbackPort implementation ───────────────────────────────

impl<In: InputPin, Out: OutputPin, D: DelayNs> FeedbackPort for HardwareAdapter<In, Out, D> {
    fn beep(&mut self, count: u8, duration_ms: u32) {
        self.beeper.beep(count, duration_ms);
    }

    fn pause(&mut self, ms: u32) {
        self.beeper.pause(ms);
    }
}
