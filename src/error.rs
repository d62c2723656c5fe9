//! Fault and rejection types for the NightGuard firmware.
//!
//! Nothing here is fatal: every type describes a condition the
//! controller degrades around (suppressing auto-arm, rejecting an arm
//! request) rather than a reason to halt.  All types are `Copy` so they
//! can travel through the FSM context and event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Clock faults
// ---------------------------------------------------------------------------

/// A single real-time-clock fault condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClockFault {
    /// Stored date/time failed the chip's validity check.
    InvalidDateTime = 0b0000_0001,
    /// Write-protect latch is set; time cannot be corrected.
    WriteProtected = 0b0000_0010,
    /// Oscillator halted; time is frozen.
    Stopped = 0b0000_0100,
    /// Stored time predates the firmware build (battery loss, corruption).
    BehindBuildTime = 0b0000_1000,
}

impl ClockFault {
    pub const ALL: [Self; 4] = [
        Self::InvalidDateTime,
        Self::WriteProtected,
        Self::Stopped,
        Self::BehindBuildTime,
    ];

    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Faults that [`ClockSupervisor::try_repair`](crate::clock::ClockSupervisor::try_repair)
    /// can fix without operator help.
    pub const fn is_repairable(self) -> bool {
        matches!(self, Self::WriteProtected | Self::Stopped)
    }
}

impl fmt::Display for ClockFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDateTime => write!(f, "invalid date/time"),
            Self::WriteProtected => write!(f, "write-protected"),
            Self::Stopped => write!(f, "oscillator stopped"),
            Self::BehindBuildTime => write!(f, "time behind firmware build"),
        }
    }
}

/// Set of simultaneous [`ClockFault`]s, packed into a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockFaults(u8);

impl ClockFaults {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, fault: ClockFault) -> bool {
        self.0 & fault.mask() != 0
    }

    pub fn insert(&mut self, fault: ClockFault) {
        self.0 |= fault.mask();
    }

    pub fn remove(&mut self, fault: ClockFault) {
        self.0 &= !fault.mask();
    }

    /// The subset that can be repaired in place.
    pub fn repairable(self) -> Self {
        let mut out = Self::empty();
        for fault in ClockFault::ALL {
            if fault.is_repairable() && self.contains(fault) {
                out.insert(fault);
            }
        }
        out
    }

    pub fn iter(self) -> impl Iterator<Item = ClockFault> {
        ClockFault::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<ClockFault> for ClockFaults {
    fn from(fault: ClockFault) -> Self {
        Self(fault.mask())
    }
}

impl fmt::Display for ClockFaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        for (i, fault) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{fault}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Arm rejection
// ---------------------------------------------------------------------------

/// Why an arm request was refused.  Reported to the operator as a
/// distinct beep; the alarm state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmRejection {
    /// Door reed sensor reads open.
    DoorOpen,
}

impl fmt::Display for ArmRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoorOpen => write!(f, "door open"),
        }
    }
}
