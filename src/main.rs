//! NightGuard Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            SystemClock      LogEventSink      │
//! │  (Sensor+Actuator+Feedback) (RtcPort)        (EventSink)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AlarmService (pure logic)                 │    │
//! │  │  FSM · AutoArmSchedule · ClockSupervisor               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Watchdog (fed every cycle)                                    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, Input, Output, PinDriver, Pull};
use log::{info, warn};

use nightguard::adapters::hardware::{HardwareAdapter, InputLines};
use nightguard::adapters::log_sink::LogEventSink;
use nightguard::adapters::time::SystemClock;
use nightguard::app::service::AlarmService;
use nightguard::clock::firmware_build_time;
use nightguard::config::AlarmConfig;
use nightguard::drivers::watchdog::Watchdog;
use nightguard::pins;

type InPin = PinDriver<'static, AnyIOPin, Input>;
type OutPin = PinDriver<'static, AnyIOPin, Output>;

fn input(gpio: i32, pull: Pull) -> Result<InPin> {
    // SAFETY: every GPIO number in `pins` is claimed exactly once, here.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(pull)?;
    Ok(pin)
}

fn output(gpio: i32) -> Result<OutPin> {
    // SAFETY: see `input`.
    let mut pin = PinDriver::output(unsafe { AnyIOPin::new(gpio) })?;
    // Active-low loads: release before anything else can run.
    pin.set_high()?;
    Ok(pin)
}

fn load_config() -> AlarmConfig {
    match option_env!("NIGHTGUARD_CONFIG_JSON") {
        None => {
            info!("Config: built-in defaults");
            AlarmConfig::default()
        }
        Some(json) => match AlarmConfig::from_json(json) {
            Ok(cfg) => {
                info!("Config: build-time override applied");
                cfg
            }
            Err(e) => {
                warn!("Config override rejected ({}), using defaults", e);
                AlarmConfig::default()
            }
        },
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  NightGuard v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!("Built {}", env!("FIRMWARE_BUILD_TIME"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    config.validate()?;

    // ── 3. Pins and adapters ──────────────────────────────────
    let inputs = InputLines {
        remote: input(pins::REMOTE_GPIO, Pull::Up)?,
        pir: input(pins::PIR_GPIO, Pull::Floating)?,
        door: input(pins::DOOR_GPIO, Pull::Up)?,
        mains: Some(input(pins::MAINS_GPIO, Pull::Up)?),
    };
    let mut hw = HardwareAdapter::new(
        inputs,
        output(pins::SIREN_GPIO)?,
        output(pins::LED_GPIO)?,
        output(pins::BUZZER_GPIO)?,
        FreeRtos,
    );
    let mut rtc = SystemClock::new();
    let mut log_sink = LogEventSink::new();
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 4. Application service ────────────────────────────────
    let mut app = AlarmService::new(config);
    app.start(rtc.uptime_ms(), firmware_build_time(), &mut rtc, &mut hw, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(rtc.uptime_ms(), &mut hw, &mut rtc, &mut log_sink);
        watchdog.feed();
    }
}
