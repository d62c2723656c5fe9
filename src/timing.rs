//! Millisecond tick arithmetic.
//!
//! The controller runs on a free-running `u32` millisecond counter that
//! wraps roughly every 49.7 days.  Every interval comparison in the crate
//! goes through these helpers so that subtraction is always modular:
//! `now - anchor` stays correct across the wrap as long as the real
//! interval is shorter than `u32::MAX` ms.

/// Milliseconds elapsed from `since` to `now`, wraparound-safe.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// `true` once at least `duration` ms have passed since `since`.
#[inline]
pub const fn has_elapsed(now: u32, since: u32, duration: u32) -> bool {
    elapsed_ms(now, since) >= duration
}
