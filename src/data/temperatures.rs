//! Temperature sample type.

use std::fmt;

use crate::utils::millicelsius_to_fahrenheit;

/// One temperature reading, or the explicit "sensor not ready" marker.
///
/// Samples are produced fresh on every read and never retained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemperatureSample {
    /// A valid reading in degrees Fahrenheit.
    Fahrenheit(f64),
    /// The sensor is absent, busy, or returned a malformed record.
    #[default]
    Unavailable,
}

impl TemperatureSample {
    /// Create a sample from a DS18B20 millidegree-Celsius value.
    pub fn from_millicelsius(millicelsius: i32) -> Self {
        Self::Fahrenheit(millicelsius_to_fahrenheit(millicelsius))
    }

    /// The reading in Fahrenheit.
    ///
    /// # Returns
    ///
    /// `Some(temperature)` if available, `None` otherwise.
    pub fn fahrenheit(&self) -> Option<f64> {
        match self {
            Self::Fahrenheit(value) => Some(*value),
            Self::Unavailable => None,
        }
    }

    /// Check if this sample carries a reading.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Fahrenheit(_))
    }
}

impl From<Option<f64>> for TemperatureSample {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::Fahrenheit)
    }
}

impl fmt::Display for TemperatureSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fahrenheit(value) => write!(f, "{:.1}°F", value),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}
