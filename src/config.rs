//! Compile-time configuration.
//!
//! The monitor has no config file and no command line flags. Every tunable
//! lives here as a constant; [`MonitorConfig`] bundles them so tests can
//! shorten the timings.

use std::path::PathBuf;
use std::time::Duration;

use crate::controller::AlertPolicy;
use crate::hardware::Polarity;

/// Button input, BCM 17 (physical pin 11). Pulled up, low while pressed.
pub const BUTTON_PIN: u8 = 17;

/// Buzzer output, BCM 27 (physical pin 13).
pub const BUZZER_PIN: u8 = 27;

/// Buzzer drive polarity, fixed for the whole session.
pub const BUZZER_POLARITY: Polarity = Polarity::ActiveHigh;

/// Minimum hold time for a press to count as a long press.
pub const HOLD_THRESHOLD: Duration = Duration::from_millis(2000);

/// A level change must persist this long before it is accepted.
pub const SETTLE_WINDOW: Duration = Duration::from_millis(150);

/// Button polling period (~100 Hz).
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Temperature evaluation period.
pub const EVALUATION_PERIOD: Duration = Duration::from_millis(1500);

/// Maximum raw reads while waiting for a finished conversion.
pub const SENSOR_MAX_ATTEMPTS: u32 = 40;

/// Sleep between raw reads of an unfinished conversion.
pub const SENSOR_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Root of the kernel one-wire sysfs tree.
pub const W1_BASE_DIR: &str = "/sys/bus/w1/devices";

/// DS18B20 family code prefix.
pub const DS18B20_PREFIX: &str = "28-";

/// Root of the sysfs GPIO tree.
pub const GPIO_BASE_DIR: &str = "/sys/class/gpio";

/// Text-to-speech program invoked with the utterance as its only argument.
pub const SPEECH_PROGRAM: &str = "espeak";

/// Maximum number of utterances waiting to be spoken.
pub const SPEECH_QUEUE_DEPTH: usize = 8;

/// Runtime bundle of the constants above.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Button input pin.
    pub button_pin: u8,
    /// Buzzer output pin.
    pub buzzer_pin: u8,
    /// Buzzer drive polarity.
    pub buzzer_polarity: Polarity,
    /// Long press threshold.
    pub hold_threshold: Duration,
    /// Debounce settle window.
    pub settle_window: Duration,
    /// Button polling period.
    pub tick_period: Duration,
    /// Temperature evaluation period.
    pub evaluation_period: Duration,
    /// Sensor retry ceiling.
    pub sensor_max_attempts: u32,
    /// Sensor retry backoff.
    pub sensor_retry_backoff: Duration,
    /// One-wire sysfs root.
    pub w1_base_dir: PathBuf,
    /// GPIO sysfs root.
    pub gpio_base_dir: PathBuf,
    /// Whether target alerts repeat on every evaluation.
    pub alert_policy: AlertPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            button_pin: BUTTON_PIN,
            buzzer_pin: BUZZER_PIN,
            buzzer_polarity: BUZZER_POLARITY,
            hold_threshold: HOLD_THRESHOLD,
            settle_window: SETTLE_WINDOW,
            tick_period: TICK_PERIOD,
            evaluation_period: EVALUATION_PERIOD,
            sensor_max_attempts: SENSOR_MAX_ATTEMPTS,
            sensor_retry_backoff: SENSOR_RETRY_BACKOFF,
            w1_base_dir: PathBuf::from(W1_BASE_DIR),
            gpio_base_dir: PathBuf::from(GPIO_BASE_DIR),
            alert_policy: AlertPolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Worst-case time a single temperature read can stall the loop.
    pub fn sensor_read_ceiling(&self) -> Duration {
        self.sensor_retry_backoff * self.sensor_max_attempts.saturating_sub(1)
    }
}
