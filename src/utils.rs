//! Utility functions for the doneness-monitor crate.

/// Convert Celsius to Fahrenheit.
///
/// # Arguments
///
/// * `celsius` - Temperature in degrees Celsius
///
/// # Returns
///
/// Temperature in degrees Fahrenheit
///
/// # Example
///
/// ```
/// use doneness_monitor::celsius_to_fahrenheit;
///
/// let fahrenheit = celsius_to_fahrenheit(100.0);
/// assert!((fahrenheit - 212.0).abs() < 0.001);
/// ```
#[inline]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert a DS18B20 millidegree-Celsius reading to Fahrenheit.
///
/// # Example
///
/// ```
/// use doneness_monitor::millicelsius_to_fahrenheit;
///
/// let fahrenheit = millicelsius_to_fahrenheit(23000);
/// assert!((fahrenheit - 73.4).abs() < 0.001);
/// ```
#[inline]
pub fn millicelsius_to_fahrenheit(millicelsius: i32) -> f64 {
    celsius_to_fahrenheit(millicelsius as f64 / 1000.0)
}
