//! One-wire bus access.
//!
//! The kernel `w1-gpio`/`w1-therm` drivers expose every DS18B20 as a
//! directory under `/sys/bus/w1/devices/28-*` holding a `w1_slave` record
//! file and a `name` file with the ROM identifier.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Raw record file inside a device directory.
const RECORD_FILE: &str = "w1_slave";

/// ROM identifier file inside a device directory.
const NAME_FILE: &str = "name";

/// Kernel modules needed for GPIO-bitbanged one-wire and the thermometer family.
const KERNEL_MODULES: [&str; 2] = ["w1-gpio", "w1-therm"];

/// A located one-wire device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceHandle {
    /// Device directory name, e.g. `28-0316a2794aff`.
    pub id: String,
    /// Full path of the device directory.
    pub path: PathBuf,
}

impl DeviceHandle {
    /// Create a handle for a device directory.
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// Path of the raw record file.
    pub fn record_path(&self) -> PathBuf {
        self.path.join(RECORD_FILE)
    }
}

/// Access to raw sensor records.
#[async_trait]
pub trait BusDriver: Send + Sync {
    /// Read the device's raw record as an ordered list of lines.
    async fn read_raw(&self, device: &DeviceHandle) -> Result<Vec<String>>;

    /// List devices whose name starts with `prefix`, sorted by name.
    async fn enumerate_devices(&self, prefix: &str) -> Result<Vec<DeviceHandle>>;
}

/// Kernel sysfs one-wire bus.
#[derive(Debug, Clone)]
pub struct W1Bus {
    base_dir: PathBuf,
}

impl W1Bus {
    /// Create a bus rooted at `base_dir` (normally `/sys/bus/w1/devices`).
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root directory of the bus.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load the one-wire kernel modules.
    ///
    /// Best effort: failures are logged and ignored, since the modules are
    /// often built in or loaded from the device tree.
    pub async fn load_kernel_modules() {
        for module in KERNEL_MODULES {
            match tokio::process::Command::new("modprobe")
                .arg(module)
                .status()
                .await
            {
                Ok(status) if status.success() => debug!("Loaded kernel module {}", module),
                Ok(status) => warn!("modprobe {} exited with {}", module, status),
                Err(e) => warn!("modprobe {} failed: {}", module, e),
            }
        }
    }

    /// Read the device's ROM identifier from its `name` file.
    pub async fn read_rom(&self, device: &DeviceHandle) -> Result<String> {
        let contents = tokio::fs::read_to_string(device.path.join(NAME_FILE)).await?;
        let rom = contents.lines().next().unwrap_or_default().trim().to_string();
        if rom.is_empty() {
            return Err(Error::MalformedRecord {
                context: format!("empty name file for {}", device.id),
            });
        }
        Ok(rom)
    }

    /// Find the first device with the given prefix.
    pub async fn find_first(&self, prefix: &str) -> Result<DeviceHandle> {
        self.enumerate_devices(prefix)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::DeviceNotFound {
                prefix: prefix.to_string(),
            })
    }
}

#[async_trait]
impl BusDriver for W1Bus {
    async fn read_raw(&self, device: &DeviceHandle) -> Result<Vec<String>> {
        let contents = tokio::fs::read_to_string(device.record_path()).await?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    async fn enumerate_devices(&self, prefix: &str) -> Result<Vec<DeviceHandle>> {
        let mut entries = tokio::fs::read_dir(&self.base_dir).await?;
        let mut devices = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(prefix) {
                devices.push(DeviceHandle::new(name, entry.path()));
            }
        }

        devices.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Found {} device(s) with prefix {}", devices.len(), prefix);
        Ok(devices)
    }
}
