//! # doneness-monitor
//!
//! A single-board meat doneness monitor. A DS18B20 one-wire probe is
//! polled for temperature, a single pushbutton selects the meat and its
//! cook target, and a buzzer plus spoken alerts fire once the target is
//! reached.
//!
//! ## Features
//!
//! - **Sensor Reader**: DS18B20 reads through the kernel `w1-therm` sysfs
//!   interface, waiting out unfinished conversions
//! - **Tier Classifier**: per-meat doneness tables (beef, pork, poultry,
//!   lamb, seafood)
//! - **Target State**: per-meat target tier, cycled from the cook menu
//! - **Gestures**: debounced short and long press detection
//! - **Alerts**: buzzer and text-to-speech announcements
//!
//! ## Controls
//!
//! | Gesture                 | Menu closed      | Menu open          |
//! |-------------------------|------------------|--------------------|
//! | Short press             | Next meat        | Next target tier   |
//! | Long press (>= 2 s)     | Open cook menu   | Close cook menu    |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doneness_monitor::{
//!     LogAlertSink, Monitor, MonitorConfig, Result, SensorReader, SysfsGpio, W1Bus,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = MonitorConfig::default();
//!     let bus = W1Bus::new(&config.w1_base_dir);
//!     let device = bus.find_first("28-").await.ok();
//!     let gpio = Arc::new(SysfsGpio::new(&config.gpio_base_dir));
//!
//!     let reader = SensorReader::new(bus, device);
//!     let mut monitor = Monitor::new(config, gpio, reader, Arc::new(LogAlertSink));
//!     monitor
//!         .run(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

pub mod alert;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod hardware;
pub mod input;
pub mod monitor;
pub mod sensor;
pub mod utils;

// Re-exports for convenience
pub use alert::{AlertSink, LogAlertSink, SpeechAlertSink};
pub use config::MonitorConfig;
pub use controller::{AlertPolicy, CookController, CookSessionState};
pub use error::{Error, Result};
pub use hardware::{Buzzer, DigitalIo, Direction, Polarity, SysfsGpio};
pub use input::{InputEvent, InputStateMachine};
pub use monitor::Monitor;
pub use sensor::{BusDriver, DeviceHandle, SensorReader, W1Bus};
pub use utils::{celsius_to_fahrenheit, millicelsius_to_fahrenheit};

pub use data::{classify, MeatType, TargetState, TemperatureSample, Tier};
