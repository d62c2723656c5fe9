//! Real-time clock supervision.
//!
//! The RTC is an unreliable external resource: the backup battery drains,
//! the oscillator halts, the write-protect latch gets stuck.  Every consumer
//! of wall-clock time goes through [`ClockSupervisor`], which caches a
//! health probe, repairs what it can in place, and remembers that a fault
//! happened until the operator has heard about it.
//!
//! ## Trust model
//!
//! | flag            | set by                              | cleared by                         |
//! |-----------------|-------------------------------------|------------------------------------|
//! | `reliable`      | a fresh probe with no faults        | any detected fault                 |
//! | `error_pending` | any detected fault                  | [`ClockSupervisor::acknowledge_fault`] |
//!
//! A clock whose faults were corrected at startup stays untrusted until the
//! next scheduled health probe confirms it.

pub mod datetime;

pub use datetime::RtcDateTime;

use log::{info, warn};

use crate::app::ports::RtcPort;
use crate::error::{ClockFault, ClockFaults};
use crate::timing::has_elapsed;

/// Build timestamp stamped by `build.rs`, or `None` if it does not parse.
pub fn firmware_build_time() -> Option<RtcDateTime> {
    RtcDateTime::parse(env!("FIRMWARE_BUILD_TIME"))
}

/// Cached health, repair and fault bookkeeping for one RTC.
#[derive(Debug, Clone)]
pub struct ClockSupervisor {
    health_interval_ms: u32,
    last_health_check_ms: u32,
    faults: ClockFaults,
    reliable: bool,
    error_pending: bool,
}

impl ClockSupervisor {
    /// Untrusted until [`initialize`](Self::initialize) has run.
    pub const fn new(health_interval_ms: u32) -> Self {
        Self {
            health_interval_ms,
            last_health_check_ms: 0,
            faults: ClockFaults::empty(),
            reliable: false,
            error_pending: false,
        }
    }

    /// Query the chip for the faults it can report about itself.
    pub fn probe(rtc: &mut impl RtcPort) -> ClockFaults {
        let mut faults = ClockFaults::empty();
        if !rtc.is_date_time_valid() {
            faults.insert(ClockFault::InvalidDateTime);
        }
        if rtc.is_write_protected() {
            faults.insert(ClockFault::WriteProtected);
        }
        if !rtc.is_running() {
            faults.insert(ClockFault::Stopped);
        }
        faults
    }

    /// Startup bring-up: probe, correct, and record whatever was wrong.
    ///
    /// Latches are cleared before the time is written, since a
    /// write-protected chip ignores `set_date_time`.  An invalid stored time,
    /// or one older than `build_time`, is replaced by `build_time`.
    ///
    /// Returns the faults found *before* correction.
    pub fn initialize(
        &mut self,
        rtc: &mut impl RtcPort,
        build_time: Option<RtcDateTime>,
        now_ms: u32,
    ) -> ClockFaults {
        rtc.begin();

        let mut detected = Self::probe(rtc);
        if detected.contains(ClockFault::WriteProtected) {
            rtc.set_write_protected(false);
        }
        if detected.contains(ClockFault::Stopped) {
            rtc.set_running(true);
        }
        if let Some(build) = build_time {
            if detected.contains(ClockFault::InvalidDateTime) {
                rtc.set_date_time(build);
            } else if rtc.date_time() < build {
                detected.insert(ClockFault::BehindBuildTime);
                rtc.set_date_time(build);
            }
        }

        let mut remaining = Self::probe(rtc);
        if let Some(build) = build_time {
            if !remaining.contains(ClockFault::InvalidDateTime) && rtc.date_time() < build {
                remaining.insert(ClockFault::BehindBuildTime);
            }
        }
        self.faults = remaining;
        self.last_health_check_ms = now_ms;

        if detected.is_empty() {
            self.reliable = remaining.is_empty();
            info!("RTC: healthy at {}", rtc.date_time());
        } else {
            self.reliable = false;
            self.error_pending = true;
            warn!("RTC: startup faults [{}], remaining [{}]", detected, remaining);
        }
        detected
    }

    /// Health gate, re-probing the chip at most once per health interval.
    ///
    /// A fresh probe that comes back clean restores trust.
    pub fn is_healthy(&mut self, rtc: &mut impl RtcPort, now_ms: u32) -> bool {
        if has_elapsed(now_ms, self.last_health_check_ms, self.health_interval_ms) {
            self.last_health_check_ms = now_ms;
            self.faults = Self::probe(rtc);
            if self.faults.is_empty() && !self.reliable {
                info!("RTC: health probe clean, trust restored");
                self.reliable = true;
            }
        }
        self.faults.is_empty()
    }

    /// Mark the clock untrusted and leave a fault for the operator.
    pub fn record_fault(&mut self) {
        if self.reliable || !self.error_pending {
            warn!("RTC: fault recorded [{}]", self.faults);
        }
        self.reliable = false;
        self.error_pending = true;
    }

    /// Clear the write-protect and halt latches if either is a cached fault.
    ///
    /// After a fix the chip is re-probed immediately, bypassing the health
    /// interval.  Returns whether any fix was applied.
    pub fn try_repair(&mut self, rtc: &mut impl RtcPort, now_ms: u32) -> bool {
        let fixable = self.faults.repairable();
        if fixable.is_empty() {
            return false;
        }
        if fixable.contains(ClockFault::WriteProtected) {
            rtc.set_write_protected(false);
        }
        if fixable.contains(ClockFault::Stopped) {
            rtc.set_running(true);
        }

        self.last_health_check_ms = now_ms;
        self.faults = Self::probe(rtc);
        if self.faults.is_empty() {
            info!("RTC: repaired [{}]", fixable);
            self.reliable = true;
        } else {
            warn!("RTC: repair left [{}]", self.faults);
            self.reliable = false;
            self.error_pending = true;
        }
        true
    }

    /// Consume the pending-fault flag.  Returns whether one was pending.
    pub fn acknowledge_fault(&mut self) -> bool {
        core::mem::take(&mut self.error_pending)
    }

    /// Raw chip time.  Never fails; trust it only when
    /// [`is_reliable`](Self::is_reliable).
    pub fn current_time(&self, rtc: &mut impl RtcPort) -> RtcDateTime {
        rtc.date_time()
    }

    pub fn is_reliable(&self) -> bool {
        self.reliable
    }

    pub fn error_pending(&self) -> bool {
        self.error_pending
    }

    /// Faults from the most recent probe.
    pub fn faults(&self) -> ClockFaults {
        self.faults
    }
}
