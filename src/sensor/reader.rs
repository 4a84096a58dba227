//! DS18B20 temperature reader.
//!
//! A raw record from the `w1-therm` driver looks like:
//!
//! ```text
//! 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
//! 72 01 4b 46 7f ff 0e 10 57 t=23125
//! ```
//!
//! The trailing `YES`/`NO` on the first line reports whether the
//! conversion finished; the second line carries the reading in
//! millidegrees Celsius after `t=`.

use std::time::Duration;
use tracing::{debug, trace};

use crate::config::{SENSOR_MAX_ATTEMPTS, SENSOR_RETRY_BACKOFF};
use crate::data::TemperatureSample;
use crate::error::{Error, Result};
use crate::sensor::bus::{BusDriver, DeviceHandle};

/// Status token of a finished conversion.
const READY_TOKEN: &str = "YES";

/// Marker preceding the reading on the second line.
const READING_MARKER: &str = "t=";

/// Check whether a raw record reports a finished conversion.
pub fn conversion_ready(lines: &[String]) -> bool {
    lines
        .first()
        .map(|line| line.trim_end().ends_with(READY_TOKEN))
        .unwrap_or(false)
}

/// Extract the millidegree-Celsius reading from a finished record.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] if the record has fewer than two
/// lines, no `t=` marker, or a non-integer reading.
pub fn parse_record(lines: &[String]) -> Result<i32> {
    let line = lines.get(1).ok_or_else(|| Error::MalformedRecord {
        context: format!("expected 2 lines, got {}", lines.len()),
    })?;

    let pos = line
        .find(READING_MARKER)
        .ok_or_else(|| Error::MalformedRecord {
            context: "missing t= marker".to_string(),
        })?;

    let value = line[pos + READING_MARKER.len()..].trim();
    value.parse::<i32>().map_err(|_| Error::MalformedRecord {
        context: format!("invalid reading {:?}", value),
    })
}

/// Reads temperature samples, waiting out unfinished conversions.
pub struct SensorReader<B> {
    /// Bus the sensor hangs off.
    bus: B,
    /// The sensor, if one was found at startup.
    device: Option<DeviceHandle>,
    /// Raw reads allowed per sample.
    max_attempts: u32,
    /// Sleep between raw reads.
    backoff: Duration,
}

impl<B: BusDriver> SensorReader<B> {
    /// Create a reader for `device` with the default retry policy.
    ///
    /// A `None` device yields [`TemperatureSample::Unavailable`] on every read.
    pub fn new(bus: B, device: Option<DeviceHandle>) -> Self {
        Self {
            bus,
            device,
            max_attempts: SENSOR_MAX_ATTEMPTS,
            backoff: SENSOR_RETRY_BACKOFF,
        }
    }

    /// Override the retry ceiling and backoff.
    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff = backoff;
        self
    }

    /// The underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// The sensor being read, if any.
    pub fn device(&self) -> Option<&DeviceHandle> {
        self.device.as_ref()
    }

    /// Read one sample.
    ///
    /// Never fails: a missing sensor, an unfinished conversion after the
    /// retry ceiling, a bus error or a malformed record all yield
    /// [`TemperatureSample::Unavailable`].
    pub async fn read_temperature(&self) -> TemperatureSample {
        match self.try_read().await {
            Ok(millicelsius) => TemperatureSample::from_millicelsius(millicelsius),
            Err(e) => {
                debug!("Temperature read failed: {}", e);
                TemperatureSample::Unavailable
            }
        }
    }

    async fn try_read(&self) -> Result<i32> {
        let device = self.device.as_ref().ok_or(Error::SensorUnavailable)?;
        let mut attempt = 1;

        loop {
            let lines = self.bus.read_raw(device).await?;
            if lines.is_empty() {
                return Err(Error::MalformedRecord {
                    context: "empty record".to_string(),
                });
            }

            if conversion_ready(&lines) {
                trace!("Conversion ready after {} attempt(s)", attempt);
                return parse_record(&lines);
            }

            if attempt >= self.max_attempts {
                return Err(Error::SensorUnavailable);
            }

            attempt += 1;
            tokio::time::sleep(self.backoff).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Bus that reports `NO` until the `ready_on`th read.
    struct ScriptedBus {
        ready_on: Option<u32>,
        reading: &'static str,
        calls: Arc<AtomicU32>,
    }

    impl ScriptedBus {
        fn new(ready_on: Option<u32>, reading: &'static str) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            let bus = Self {
                ready_on,
                reading,
                calls: calls.clone(),
            };
            (bus, calls)
        }
    }

    #[async_trait]
    impl BusDriver for ScriptedBus {
        async fn read_raw(&self, _device: &DeviceHandle) -> Result<Vec<String>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let status = if self.ready_on.is_some_and(|n| call >= n) {
                "YES"
            } else {
                "NO"
            };
            Ok(vec![
                format!("72 01 4b 46 7f ff 0e 10 57 : crc=57 {}", status),
                format!("72 01 4b 46 7f ff 0e 10 57 {}", self.reading),
            ])
        }

        async fn enumerate_devices(&self, _prefix: &str) -> Result<Vec<DeviceHandle>> {
            Ok(vec![device()])
        }
    }

    struct FailingBus;

    #[async_trait]
    impl BusDriver for FailingBus {
        async fn read_raw(&self, _device: &DeviceHandle) -> Result<Vec<String>> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "w1_slave").into())
        }

        async fn enumerate_devices(&self, _prefix: &str) -> Result<Vec<DeviceHandle>> {
            Ok(Vec::new())
        }
    }

    fn device() -> DeviceHandle {
        DeviceHandle::new("28-test", "/tmp/28-test")
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_ready_on_fortieth_attempt() {
        let (bus, calls) = ScriptedBus::new(Some(40), "t=23000");
        let reader = SensorReader::new(bus, Some(device())).with_retry(40, Duration::ZERO);

        let sample = reader.read_temperature().await;
        assert!((sample.fahrenheit().unwrap() - 73.4).abs() < 0.001);
        assert_eq!(calls.load(Ordering::SeqCst), 40);
    }

    #[tokio::test]
    async fn test_never_ready_gives_up_after_exactly_forty_attempts() {
        let (bus, calls) = ScriptedBus::new(None, "t=23000");
        let reader = SensorReader::new(bus, Some(device())).with_retry(40, Duration::ZERO);

        assert_eq!(reader.read_temperature().await, TemperatureSample::Unavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 40);
    }

    #[tokio::test]
    async fn test_ready_immediately_reads_once() {
        let (bus, calls) = ScriptedBus::new(Some(1), "t=62778");
        let reader = SensorReader::new(bus, Some(device()));

        let sample = reader.read_temperature().await;
        assert!((sample.fahrenheit().unwrap() - 145.0).abs() < 0.01);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backoff_is_applied_between_attempts() {
        let (bus, _calls) = ScriptedBus::new(Some(3), "t=0");
        let reader =
            SensorReader::new(bus, Some(device())).with_retry(40, Duration::from_millis(20));

        let start = std::time::Instant::now();
        let sample = reader.read_temperature().await;
        assert_eq!(sample, TemperatureSample::Fahrenheit(32.0));
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_missing_marker_is_unavailable() {
        let (bus, _calls) = ScriptedBus::new(Some(1), "crc=57");
        let reader = SensorReader::new(bus, Some(device()));
        assert_eq!(reader.read_temperature().await, TemperatureSample::Unavailable);
    }

    #[tokio::test]
    async fn test_no_device_is_unavailable() {
        let (bus, calls) = ScriptedBus::new(Some(1), "t=23000");
        let reader = SensorReader::new(bus, None);
        assert_eq!(reader.read_temperature().await, TemperatureSample::Unavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bus_error_is_unavailable() {
        let reader = SensorReader::new(FailingBus, Some(device()));
        assert_eq!(reader.read_temperature().await, TemperatureSample::Unavailable);
    }

    #[test]
    fn test_conversion_ready() {
        assert!(conversion_ready(&lines(&["aa : crc=57 YES  "])));
        assert!(!conversion_ready(&lines(&["aa : crc=57 NO"])));
        assert!(!conversion_ready(&[]));
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(parse_record(&lines(&["x YES", "x t=23125"])).unwrap(), 23125);
        assert_eq!(parse_record(&lines(&["x YES", "x t=-1062\n"])).unwrap(), -1062);
        assert!(matches!(
            parse_record(&lines(&["x YES"])),
            Err(Error::MalformedRecord { .. })
        ));
        assert!(matches!(
            parse_record(&lines(&["x YES", "x t=abc"])),
            Err(Error::MalformedRecord { .. })
        ));
    }
}
