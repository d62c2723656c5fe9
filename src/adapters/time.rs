//! ESP32 time adapter.
//!
//! Provides the wrapping millisecond counter the control loop runs on, and
//! an [`RtcPort`] backed by the system wall clock.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` for uptime
//!   and `gettimeofday` / `settimeofday` for wall time.  The ESP32 RTC
//!   domain keeps the system time across deep sleep and soft resets.
//! - **`not(target_os = "espidf")`**: uses `std::time` for host-side
//!   testing and simulation.
//!
//! The system clock has no write-protect or oscillator-halt latch of its
//! own.  Both are emulated so that the supervision logic behaves the same
//! as with a discrete RTC chip: while "write-protected" every
//! `set_date_time` is dropped, and while "halted" reads return the time
//! frozen at the moment of the halt.

use log::warn;

use crate::app::ports::RtcPort;
use crate::clock::RtcDateTime;

/// Wall time before 2020-01-01 means the clock was never set.
const EPOCH_2020: i64 = 1_577_836_800;

/// Time adapter for the ESP32 platform.
pub struct SystemClock {
    write_protected: bool,
    /// `Some(t)` while halted: the frozen Unix time.
    halted_at: Option<i64>,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    /// Host only: offset applied on top of the host wall clock by `set`.
    #[cfg(not(target_os = "espidf"))]
    offset_secs: i64,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            write_protected: false,
            halted_at: None,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(not(target_os = "espidf"))]
            offset_secs: 0,
        }
    }

    /// Milliseconds since boot, truncated to `u32` (wraps every ~49.7 days).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    /// Milliseconds since boot, truncated to `u32` (wraps every ~49.7 days).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Current Unix time in seconds from the underlying clock.
    #[cfg(target_os = "espidf")]
    fn raw_unix_secs(&self) -> i64 {
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            warn!("SystemClock: gettimeofday failed");
            return 0;
        }
        tv.tv_sec as i64
    }

    #[cfg(not(target_os = "espidf"))]
    fn raw_unix_secs(&self) -> i64 {
        let host = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        host + self.offset_secs
    }

    #[cfg(target_os = "espidf")]
    fn write_unix_secs(&mut self, secs: i64) {
        let tv = esp_idf_svc::sys::timeval {
            tv_sec: secs as esp_idf_svc::sys::time_t,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::settimeofday(&tv, core::ptr::null()) } != 0 {
            warn!("SystemClock: settimeofday failed");
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_unix_secs(&mut self, secs: i64) {
        self.offset_secs = 0;
        self.offset_secs = secs - self.raw_unix_secs();
    }

    fn unix_secs(&self) -> i64 {
        self.halted_at.unwrap_or_else(|| self.raw_unix_secs())
    }
}

impl RtcPort for SystemClock {
    fn begin(&mut self) {}

    fn is_date_time_valid(&mut self) -> bool {
        self.unix_secs() >= EPOCH_2020
    }

    fn is_write_protected(&mut self) -> bool {
        self.write_protected
    }

    fn set_write_protected(&mut self, protected: bool) {
        self.write_protected = protected;
    }

    fn is_running(&mut self) -> bool {
        self.halted_at.is_none()
    }

    fn set_running(&mut self, running: bool) {
        match (running, self.halted_at) {
            (false, None) => self.halted_at = Some(self.raw_unix_secs()),
            (true, Some(frozen)) => {
                self.halted_at = None;
                self.write_unix_secs(frozen);
            }
            _ => {}
        }
    }

    /// Out-of-range system time reads as the epoch, which is invalid.
    fn date_time(&mut self) -> RtcDateTime {
        RtcDateTime::from_unix_secs(self.unix_secs()).unwrap_or_default()
    }

    fn set_date_time(&mut self, dt: RtcDateTime) {
        if self.write_protected {
            warn!("SystemClock: write ignored, write-protected");
            return;
        }
        let secs = dt.to_unix_secs();
        if self.halted_at.is_some() {
            self.halted_at = Some(secs);
        } else {
            self.write_unix_secs(secs);
        }
    }
}
