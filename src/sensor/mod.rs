//! Temperature acquisition.
//!
//! Provides the one-wire bus seam, the kernel sysfs implementation of it,
//! and the DS18B20 reader that waits out unfinished conversions.

pub mod bus;
pub mod reader;

pub use bus::{BusDriver, DeviceHandle, W1Bus};
pub use reader::{conversion_ready, parse_record, SensorReader};
