//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                        |
//! |------------|----------------|------------------------------------|
//! | `hardware` | SensorPort     | embedded-hal input pins            |
//! |            | ActuatorPort   | embedded-hal output pins           |
//! |            | FeedbackPort   | buzzer pin + delay                 |
//! | `log_sink` | EventSink      | Serial log output                  |
//! | `time`     | RtcPort        | ESP32 system time / host clock     |

pub mod hardware;
pub mod log_sink;
pub mod time;
