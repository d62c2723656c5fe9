//! System configuration parameters
//!
//! All tunable parameters for the NightGuard controller.
//! Defaults reproduce the shipped behaviour; a JSON override can be baked
//! in at build time (see `main.rs`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Hard cap on a single beep pulse (ms).  Keeps every feedback sequence
/// bounded no matter what the configuration says.
pub const MAX_BEEP_MS: u32 = 5_000;
/// Silent gap between consecutive pulses of one beep pattern (ms).
pub const BEEP_GAP_MS: u32 = 100;

/// A fixed-count beep pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeepPattern {
    /// Number of pulses.
    pub count: u8,
    /// Length of each pulse in ms (capped at [`MAX_BEEP_MS`] on emission).
    pub duration_ms: u32,
}

impl BeepPattern {
    pub const fn new(count: u8, duration_ms: u32) -> Self {
        Self { count, duration_ms }
    }

    /// Worst-case wall time spent emitting this pattern.
    pub fn total_ms(&self) -> u32 {
        let pulses = u32::from(self.count);
        let pulse = self.duration_ms.min(MAX_BEEP_MS);
        pulses * pulse + pulses.saturating_sub(1) * BEEP_GAP_MS
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    // --- Timing ---
    /// Minimum spacing between accepted remote presses (ms)
    pub debounce_ms: u32,
    /// How long the siren sounds before the alarm re-arms (ms)
    pub siren_duration_ms: u32,
    /// Interval between auto-arm scheduling checks (ms)
    pub schedule_check_interval_ms: u32,
    /// Interval between real-time-clock health re-probes (ms)
    pub clock_health_interval_ms: u32,
    /// Status report interval (ms)
    pub status_interval_ms: u32,

    // --- Auto-arm ---
    /// Master switch for night-time auto-arming
    pub auto_arm_enabled: bool,
    /// First hour of day (0-23) at which auto-arm may fire
    pub auto_arm_hour: u8,
    /// Pause between the auto-arm beeps and the LED coming on (ms)
    pub auto_arm_pause_ms: u32,

    // --- Feedback ---
    pub arm_beep: BeepPattern,
    pub disarm_beep: BeepPattern,
    /// Arm refused because the door is open
    pub door_open_beep: BeepPattern,
    /// Extra pattern on disarm when a clock fault is waiting to be acknowledged
    pub clock_fault_beep: BeepPattern,
    pub auto_arm_beep: BeepPattern,

    // --- Supervision ---
    /// Treat loss of mains power while armed as an intrusion
    pub mains_loss_triggers_alarm: bool,
    /// Task watchdog timeout (ms)
    pub watchdog_timeout_ms: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            // Timing
            debounce_ms: 100,
            siren_duration_ms: 180_000,          // 3 min
            schedule_check_interval_ms: 600_000, // 10 min
            clock_health_interval_ms: 1_800_000, // 30 min
            status_interval_ms: 60_000,          // 1/min

            // Auto-arm
            auto_arm_enabled: true,
            auto_arm_hour: 22,
            auto_arm_pause_ms: 500,

            // Feedback
            arm_beep: BeepPattern::new(1, 200),
            disarm_beep: BeepPattern::new(2, 200),
            door_open_beep: BeepPattern::new(1, 1_000),
            clock_fault_beep: BeepPattern::new(5, 80),
            auto_arm_beep: BeepPattern::new(3, 200),

            // Supervision
            mains_loss_triggers_alarm: true,
            watchdog_timeout_ms: 15_000,
        }
    }
}

impl AlarmConfig {
    /// Parse a JSON override.  Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auto_arm_hour > 23 {
            return Err(ConfigError::ValidationFailed("auto_arm_hour must be 0-23"));
        }
        if self.siren_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("siren_duration_ms must be non-zero"));
        }
        if self.schedule_check_interval_ms == 0 || self.clock_health_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("check intervals must be non-zero"));
        }
        if self.status_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("status_interval_ms must be non-zero"));
        }
        let patterns = [
            self.arm_beep,
            self.disarm_beep,
            self.door_open_beep,
            self.clock_fault_beep,
            self.auto_arm_beep,
        ];
        if patterns.iter().any(|p| p.count == 0 || p.duration_ms == 0) {
            return Err(ConfigError::ValidationFailed("beep patterns need at least one non-empty pulse"));
        }
        if patterns.iter().any(|p| p.duration_ms > MAX_BEEP_MS) {
            return Err(ConfigError::ValidationFailed("beep pulse exceeds 5000 ms cap"));
        }
        if self.worst_case_feedback_ms() >= self.watchdog_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "longest feedback sequence must finish inside the watchdog timeout",
            ));
        }
        Ok(())
    }

    /// Longest blocking feedback a single control cycle can emit.
    ///
    /// Disarm with a pending clock fault plays two patterns back to back;
    /// auto-arm plays its pattern plus the pause.
    pub fn worst_case_feedback_ms(&self) -> u32 {
        let disarm = self.disarm_beep.total_ms() + self.clock_fault_beep.total_ms();
        let auto_arm = self.auto_arm_beep.total_ms() + self.auto_arm_pause_ms;
        disarm
            .max(auto_arm)
            .max(self.arm_beep.total_ms())
            .max(self.door_open_beep.total_ms())
    }
}

/// Errors from configuration loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Override text is not valid JSON for [`AlarmConfig`].
    Malformed,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
