//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the orchestration for the NightGuard controller:
//! the per-cycle control loop around the alarm FSM, auto-arm scheduling,
//! and clock supervision.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
