//! Input/output drivers and peripheral helpers.

pub mod beeper;
pub mod button;
pub mod relay;
pub mod watchdog;
