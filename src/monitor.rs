//! The cooperative control loop.
//!
//! One task polls the button every tick and, once the evaluation period
//! has elapsed, reads the sensor in-line and hands the sample to the
//! controller. The sensor read may stall button polling for up to the
//! retry ceiling; nothing else blocks.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::alert::AlertSink;
use crate::config::MonitorConfig;
use crate::controller::{CookController, CookSessionState};
use crate::hardware::{Buzzer, DigitalIo};
use crate::input::{InputStateMachine, RELEASED};
use crate::sensor::{BusDriver, SensorReader};

/// Everything the control loop owns.
pub struct Monitor<B> {
    config: MonitorConfig,
    io: Arc<dyn DigitalIo>,
    input: InputStateMachine,
    reader: SensorReader<B>,
    controller: CookController,
    next_evaluation: Instant,
    button_fault: bool,
}

impl<B: BusDriver> Monitor<B> {
    /// Assemble the loop. Pins must already be configured.
    pub fn new(
        config: MonitorConfig,
        io: Arc<dyn DigitalIo>,
        reader: SensorReader<B>,
        alert: Arc<dyn AlertSink>,
    ) -> Self {
        let initial_level = io.read_level(config.button_pin).unwrap_or_else(|e| {
            warn!("Initial button read failed: {}", e);
            RELEASED
        });

        let input = InputStateMachine::new(initial_level)
            .with_timing(config.hold_threshold, config.settle_window);
        let buzzer = Buzzer::new(io.clone(), config.buzzer_pin, config.buzzer_polarity);
        let controller = CookController::new(CookSessionState::default(), alert, buzzer)
            .with_alert_policy(config.alert_policy);

        Self {
            config,
            io,
            input,
            reader,
            controller,
            next_evaluation: Instant::now(),
            button_fault: false,
        }
    }

    /// The cook controller.
    pub fn controller(&self) -> &CookController {
        &self.controller
    }

    /// Run until `shutdown` resolves, then silence the buzzer.
    ///
    /// A temperature read already in progress when shutdown is requested
    /// is finished first.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = tokio::time::interval(self.config.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Ready. Short press: cycle meat. Long press (>=2s): toggle cook menu.");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => self.step(Instant::now()).await,
            }
        }

        self.controller.shutdown();
    }

    /// One control tick at `now`.
    pub async fn step(&mut self, now: Instant) {
        let level = self.read_button();
        let event = self.input.poll(level, now);
        self.controller.tick(event, now);

        if now >= self.next_evaluation {
            let sample = self.reader.read_temperature().await;
            self.controller.on_temperature(sample);
            self.next_evaluation = now + self.config.evaluation_period;
        }
    }

    // A failing read counts as released; only the first failure is logged.
    fn read_button(&mut self) -> bool {
        match self.io.read_level(self.config.button_pin) {
            Ok(level) => {
                if self.button_fault {
                    info!("Button input recovered");
                    self.button_fault = false;
                }
                level
            }
            Err(e) => {
                if !self.button_fault {
                    warn!("Button read failed: {}", e);
                    self.button_fault = true;
                }
                RELEASED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::LogAlertSink;
    use crate::data::MeatType;
    use crate::error::{Error, Result};
    use crate::sensor::DeviceHandle;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Duration;

    const BUTTON: u8 = 17;
    const BUZZER: u8 = 27;

    #[derive(Default)]
    struct FakeIo {
        pressed: AtomicBool,
        broken: AtomicBool,
        buzzer_writes: Mutex<Vec<bool>>,
    }

    impl DigitalIo for FakeIo {
        fn read_level(&self, pin: u8) -> Result<bool> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(Error::Gpio {
                    pin,
                    reason: "unplugged".to_string(),
                });
            }
            Ok(!self.pressed.load(Ordering::SeqCst))
        }

        fn write_level(&self, pin: u8, level: bool) -> Result<()> {
            assert_eq!(pin, BUZZER);
            self.buzzer_writes.lock().push(level);
            Ok(())
        }
    }

    /// Always-ready sensor at a fixed reading.
    struct FixedBus {
        millicelsius: i32,
        reads: AtomicU32,
    }

    impl FixedBus {
        fn new(millicelsius: i32) -> Self {
            Self {
                millicelsius,
                reads: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl BusDriver for FixedBus {
        async fn read_raw(&self, _device: &DeviceHandle) -> Result<Vec<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                "50 05 4b 46 7f ff 0c 10 1c : crc=1c YES".to_string(),
                format!("50 05 4b 46 7f ff 0c 10 1c t={}", self.millicelsius),
            ])
        }

        async fn enumerate_devices(&self, _prefix: &str) -> Result<Vec<DeviceHandle>> {
            Ok(Vec::new())
        }
    }

    fn test_config() -> MonitorConfig {
        MonitorConfig {
            button_pin: BUTTON,
            buzzer_pin: BUZZER,
            settle_window: Duration::ZERO,
            tick_period: Duration::from_millis(1),
            sensor_retry_backoff: Duration::ZERO,
            ..MonitorConfig::default()
        }
    }

    fn monitor(io: Arc<FakeIo>, millicelsius: i32) -> Monitor<FixedBus> {
        let reader = SensorReader::new(
            FixedBus::new(millicelsius),
            Some(DeviceHandle::new("28-test", "/tmp/28-test")),
        );
        Monitor::new(test_config(), io, reader, Arc::new(LogAlertSink))
    }

    #[tokio::test]
    async fn test_first_step_evaluates_and_period_gates_reads() {
        let io = Arc::new(FakeIo::default());
        // 63.0 C = 145.4 F, above the default beef target (rare, 125 F).
        let mut monitor = monitor(io.clone(), 63_000);
        let t0 = Instant::now();

        monitor.step(t0).await;
        assert!(monitor.controller().buzzer_on());
        assert_eq!(monitor.reader.bus().reads.load(Ordering::SeqCst), 1);

        monitor.step(t0 + Duration::from_millis(10)).await;
        monitor.step(t0 + Duration::from_millis(1400)).await;
        assert_eq!(monitor.reader.bus().reads.load(Ordering::SeqCst), 1);

        monitor.step(t0 + Duration::from_millis(1500)).await;
        assert_eq!(monitor.reader.bus().reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_button_press_switches_meat() {
        let io = Arc::new(FakeIo::default());
        let mut monitor = monitor(io.clone(), 20_000);
        let t0 = Instant::now();

        monitor.step(t0).await;
        io.pressed.store(true, Ordering::SeqCst);
        monitor.step(t0 + Duration::from_millis(10)).await;
        io.pressed.store(false, Ordering::SeqCst);
        monitor.step(t0 + Duration::from_millis(300)).await;

        assert_eq!(monitor.controller().session().meat, MeatType::Pork);
        assert!(!monitor.controller().session().menu_open);
    }

    #[tokio::test]
    async fn test_long_press_opens_menu() {
        let io = Arc::new(FakeIo::default());
        let mut monitor = monitor(io.clone(), 20_000);
        let t0 = Instant::now();

        io.pressed.store(true, Ordering::SeqCst);
        monitor.step(t0).await;
        monitor.step(t0 + Duration::from_millis(1000)).await;
        io.pressed.store(false, Ordering::SeqCst);
        monitor.step(t0 + Duration::from_millis(2100)).await;

        assert!(monitor.controller().session().menu_open);
        assert_eq!(monitor.controller().session().meat, MeatType::Beef);
    }

    #[tokio::test]
    async fn test_broken_button_reads_as_released() {
        let io = Arc::new(FakeIo::default());
        let mut monitor = monitor(io.clone(), 20_000);
        let t0 = Instant::now();

        io.pressed.store(true, Ordering::SeqCst);
        monitor.step(t0).await;
        io.broken.store(true, Ordering::SeqCst);
        monitor.step(t0 + Duration::from_millis(100)).await;
        monitor.step(t0 + Duration::from_millis(110)).await;

        // The failed read looked like a release, ending the press.
        assert_eq!(monitor.controller().session().meat, MeatType::Pork);
        assert!(monitor.button_fault);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown_and_silences_buzzer() {
        let io = Arc::new(FakeIo::default());
        let mut monitor = monitor(io.clone(), 63_000);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(());
        });

        monitor
            .run(async {
                let _ = rx.await;
            })
            .await;

        let writes = io.buzzer_writes.lock().clone();
        assert_eq!(writes.first(), Some(&true));
        assert_eq!(writes.last(), Some(&false));
        assert!(!monitor.controller().buzzer_on());
    }

    #[tokio::test]
    async fn test_held_at_startup_does_not_fire() {
        let io = Arc::new(FakeIo::default());
        io.pressed.store(true, Ordering::SeqCst);
        let mut monitor = monitor(io.clone(), 20_000);
        let t0 = Instant::now();

        monitor.step(t0).await;
        io.pressed.store(false, Ordering::SeqCst);
        monitor.step(t0 + Duration::from_millis(500)).await;

        assert_eq!(monitor.controller().session().meat, MeatType::Beef);
    }
}
