//! Digital I/O for the button and buzzer.
//!
//! [`DigitalIo`] is the seam the control loop talks to. [`SysfsGpio`]
//! implements it on the Linux `/sys/class/gpio` interface; the button's
//! pull-up has to come from the board or the device tree, sysfs cannot
//! configure it.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Pin level access.
#[cfg_attr(test, mockall::automock)]
pub trait DigitalIo: Send + Sync {
    /// Read the level of an input pin (`true` = high).
    fn read_level(&self, pin: u8) -> Result<bool>;

    /// Drive an output pin.
    fn write_level(&self, pin: u8, level: bool) -> Result<()>;
}

/// How an output is driven when active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    /// High turns the device on.
    #[default]
    ActiveHigh,
    /// Low turns the device on.
    ActiveLow,
}

impl Polarity {
    /// Pin level for the given on/off state.
    pub fn level(&self, active: bool) -> bool {
        match self {
            Self::ActiveHigh => active,
            Self::ActiveLow => !active,
        }
    }
}

/// Pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Input pin.
    In,
    /// Output pin starting at the given level.
    Out {
        /// Initial level.
        initial: bool,
    },
}

impl Direction {
    fn sysfs_value(&self) -> &'static str {
        match self {
            Self::In => "in",
            // "high"/"low" set direction and level in one write, without a glitch.
            Self::Out { initial: true } => "high",
            Self::Out { initial: false } => "low",
        }
    }
}

/// GPIO through the kernel sysfs interface, using BCM numbering.
pub struct SysfsGpio {
    base_dir: PathBuf,
    exported: Mutex<Vec<u8>>,
}

impl SysfsGpio {
    /// Create a GPIO controller rooted at `base_dir` (normally `/sys/class/gpio`).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            exported: Mutex::new(Vec::new()),
        }
    }

    fn pin_dir(&self, pin: u8) -> PathBuf {
        self.base_dir.join(format!("gpio{}", pin))
    }

    fn gpio_error(pin: u8, action: &str, e: std::io::Error) -> Error {
        Error::Gpio {
            pin,
            reason: format!("{}: {}", action, e),
        }
    }

    /// Export `pin` if needed and set its direction.
    pub fn setup(&self, pin: u8, direction: Direction) -> Result<()> {
        let dir = self.pin_dir(pin);
        if !dir.exists() {
            std::fs::write(self.base_dir.join("export"), pin.to_string())
                .map_err(|e| Self::gpio_error(pin, "export", e))?;
            self.exported.lock().push(pin);
        }

        std::fs::write(dir.join("direction"), direction.sysfs_value())
            .map_err(|e| Self::gpio_error(pin, "set direction", e))?;

        debug!("GPIO {} configured as {:?}", pin, direction);
        Ok(())
    }

    /// Unexport every pin this controller exported.
    pub fn release(&self) {
        let pins: Vec<u8> = std::mem::take(&mut *self.exported.lock());
        for pin in pins {
            if let Err(e) = std::fs::write(self.base_dir.join("unexport"), pin.to_string()) {
                warn!("Failed to unexport GPIO {}: {}", pin, e);
            } else {
                debug!("GPIO {} released", pin);
            }
        }
    }

    /// Root directory of the GPIO tree.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl DigitalIo for SysfsGpio {
    fn read_level(&self, pin: u8) -> Result<bool> {
        let value = std::fs::read_to_string(self.pin_dir(pin).join("value"))
            .map_err(|e| Self::gpio_error(pin, "read", e))?;
        match value.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(Error::Gpio {
                pin,
                reason: format!("unexpected value {:?}", other),
            }),
        }
    }

    fn write_level(&self, pin: u8, level: bool) -> Result<()> {
        std::fs::write(self.pin_dir(pin).join("value"), if level { "1" } else { "0" })
            .map_err(|e| Self::gpio_error(pin, "write", e))
    }
}

/// A buzzer on one output pin with fixed polarity.
pub struct Buzzer {
    io: Arc<dyn DigitalIo>,
    pin: u8,
    polarity: Polarity,
    active: bool,
}

impl Buzzer {
    /// Create a buzzer. The pin is not touched until the first `set`.
    pub fn new(io: Arc<dyn DigitalIo>, pin: u8, polarity: Polarity) -> Self {
        Self {
            io,
            pin,
            polarity,
            active: false,
        }
    }

    /// Turn the buzzer on or off. Write failures are logged, not returned.
    pub fn set(&mut self, active: bool) {
        if let Err(e) = self.io.write_level(self.pin, self.polarity.level(active)) {
            warn!("Buzzer write failed: {}", e);
        }
        self.active = active;
    }

    /// Turn the buzzer on.
    pub fn on(&mut self) {
        self.set(true);
    }

    /// Turn the buzzer off.
    pub fn off(&mut self) {
        self.set(false);
    }

    /// Check if the buzzer was last commanded on.
    pub fn is_on(&self) -> bool {
        self.active
    }
}
