//! Configuration for the proxy device.

use std::time::Duration;

/// Fixed settings applied to every output stream the device opens.
///
/// Use [`DeviceConfig::default()`] for sensible defaults, or customize as needed.
///
/// # Example
///
/// ```
/// use audio_proxy::DeviceConfig;
///
/// let config = DeviceConfig {
///     latency_ms: 40,
///     ..Default::default()
/// };
/// assert_eq!(config.buffer_size_ms, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Size of each stream's buffer in milliseconds.
    ///
    /// Default: 10ms
    pub buffer_size_ms: u32,

    /// Latency reported to the framework for each stream, in milliseconds.
    ///
    /// Default: 20ms
    pub latency_ms: u32,
}

impl DeviceConfig {
    /// Buffer size as a duration.
    #[must_use]
    pub fn buffer_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.buffer_size_ms))
    }

    /// Latency as a duration.
    #[must_use]
    pub fn latency(&self) -> Duration {
        Duration::from_millis(u64::from(self.latency_ms))
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            buffer_size_ms: 10,
            latency_ms: 20,
        }
    }
}
