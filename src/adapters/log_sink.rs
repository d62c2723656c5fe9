//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

fn on_off(v: bool) -> &'static str {
    if v { "ON" } else { "off" }
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { state, clock_faults } => {
                info!("START | initial_state={:?} | clock_faults=[{}]", state, clock_faults);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::ArmRejected(reason) => {
                warn!("ARM   | rejected: {}", reason);
            }
            AppEvent::AutoArmed => {
                info!("ARM   | auto-armed for the night");
            }
            AppEvent::ClockFault(faults) => {
                warn!("CLOCK | fault [{}], auto-arm suspended", faults);
            }
            AppEvent::ClockRestored => {
                info!("CLOCK | trusted again");
            }
            AppEvent::ClockFaultAcknowledged => {
                info!("CLOCK | fault acknowledged by operator");
            }
            AppEvent::MainsLost => {
                warn!("POWER | mains lost, on battery");
            }
            AppEvent::MainsRestored => {
                info!("POWER | mains restored");
            }
            AppEvent::Status(s) => {
                let hour = match s.hour {
                    Some(h) => h as i16,
                    None => -1,
                };
                info!(
                    "STATUS | state={:?} | door={} motion={} mains={} | siren={} | \
                     clock={}{} | hour={} | auto_armed_today={}",
                    s.state,
                    if s.door_open { "OPEN" } else { "closed" },
                    on_off(s.motion),
                    if s.mains_present { "OK" } else { "LOST" },
                    on_off(s.siren),
                    if s.clock_reliable { "OK" } else { "UNTRUSTED" },
                    if s.clock_fault_pending { " (fault pending)" } else { "" },
                    hour,
                    s.auto_armed_today,
                );
            }
        }
    }
}
