//! Doneness monitor entry point.
//!
//! Loads the one-wire drivers, locates the probe, configures the button
//! and buzzer pins, then runs the control loop until Ctrl+C.

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use doneness_monitor::config::{DS18B20_PREFIX, SPEECH_PROGRAM, SPEECH_QUEUE_DEPTH};
use doneness_monitor::{
    DeviceHandle, Direction, Monitor, MonitorConfig, Result, SensorReader, SpeechAlertSink,
    SysfsGpio, W1Bus,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = MonitorConfig::default();

    W1Bus::load_kernel_modules().await;
    let bus = W1Bus::new(&config.w1_base_dir);
    let device = locate_sensor(&bus).await;

    let gpio = Arc::new(SysfsGpio::new(&config.gpio_base_dir));
    if let Err(e) = setup_pins(&gpio, &config) {
        gpio.release();
        return Err(e);
    }

    let speech = Arc::new(SpeechAlertSink::spawn(SPEECH_PROGRAM, SPEECH_QUEUE_DEPTH));
    let reader = SensorReader::new(bus, device)
        .with_retry(config.sensor_max_attempts, config.sensor_retry_backoff);

    let mut monitor = Monitor::new(config, gpio.clone(), reader, speech.clone());
    monitor.run(interrupted()).await;

    speech.shutdown().await;
    gpio.release();
    info!("Stopped");

    Ok(())
}

/// Find the first DS18B20 and log its ROM. Missing sensors are not fatal.
async fn locate_sensor(bus: &W1Bus) -> Option<DeviceHandle> {
    match bus.find_first(DS18B20_PREFIX).await {
        Ok(device) => {
            match bus.read_rom(&device).await {
                Ok(rom) => info!("Sensor ROM: {}", rom),
                Err(e) => warn!("Could not read sensor ROM: {}", e),
            }
            Some(device)
        }
        Err(e) => {
            warn!("No DS18B20 sensor detected: {}", e);
            None
        }
    }
}

fn setup_pins(gpio: &SysfsGpio, config: &MonitorConfig) -> Result<()> {
    gpio.setup(config.button_pin, Direction::In)?;
    gpio.setup(
        config.buzzer_pin,
        Direction::Out {
            initial: config.buzzer_polarity.level(false),
        },
    )
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
