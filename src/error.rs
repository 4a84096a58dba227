//! Error types for the doneness-monitor crate.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the sysfs one-wire or GPIO interfaces.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No one-wire device matching the prefix was found.
    #[error("No device found with prefix: {prefix}")]
    DeviceNotFound {
        /// The device name prefix that was searched for.
        prefix: String,
    },

    /// The sensor is absent or its conversion did not finish in time.
    #[error("Sensor not ready")]
    SensorUnavailable,

    /// A raw sensor record could not be parsed.
    #[error("Malformed sensor record: {context}")]
    MalformedRecord {
        /// Description of what was wrong with the record.
        context: String,
    },

    /// A GPIO operation failed.
    #[error("GPIO {pin} error: {reason}")]
    Gpio {
        /// The BCM pin number.
        pin: u8,
        /// Description of the failure.
        reason: String,
    },

    /// The alert sink could not deliver an announcement.
    #[error("Alert sink failed: {reason}")]
    AlertSink {
        /// Description of the failure.
        reason: String,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Gpio {
            pin: 17,
            reason: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "GPIO 17 error: busy");

        let err = Error::MalformedRecord {
            context: "missing t= marker".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed sensor record: missing t= marker");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "w1_slave");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
