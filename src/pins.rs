//! GPIO pin assignments for the NightGuard controller board.
//!
//! Single source of truth: `main.rs` builds every pin driver from this
//! module rather than hard-coding numbers.  Change a pin here and it
//! propagates everywhere.

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Remote-control receiver output.  LOW while a remote button is held.
/// Internal pull-up enabled.
pub const REMOTE_GPIO: i32 = 4;

/// PIR motion sensor.  LOW = motion detected.
pub const PIR_GPIO: i32 = 5;

/// Door reed switch to GND, internal pull-up.  HIGH = door open
/// (magnet away, contact open).
pub const DOOR_GPIO: i32 = 6;

/// Mains-present opto from the UPS board.  LOW = mains lost.
/// Internal pull-up enabled.
pub const MAINS_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Outputs (all active LOW: driving the pin low engages the load)
// ---------------------------------------------------------------------------

/// Siren relay coil driver.
pub const SIREN_GPIO: i32 = 15;

/// Piezo buzzer for operator feedback beeps.
pub const BUZZER_GPIO: i32 = 16;

/// Armed-status LED.
pub const LED_GPIO: i32 = 17;
