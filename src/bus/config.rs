//! Bus-side stream configuration.

use std::fmt;

/// Sample format as encoded by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusFormat(pub i32);

/// Channel mask as encoded by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusChannelMask(pub i32);

/// Stream configuration in the bus representation.
///
/// Produced from a framework [`AudioConfig`](crate::AudioConfig) by
/// [`to_bus_config`](crate::format::to_bus_config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusConfig {
    /// Sample format.
    pub format: BusFormat,
    /// Sample rate in Hz.
    pub sample_rate_hz: i32,
    /// Channel layout.
    pub channel_mask: BusChannelMask,
}

impl BusConfig {
    /// Channels present in the mask.
    #[must_use]
    pub fn channel_count(&self) -> u32 {
        self.channel_mask.0.count_ones()
    }
}

impl fmt::Display for BusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format={} rate={}Hz mask={:#x}",
            self.format.0, self.sample_rate_hz, self.channel_mask.0
        )
    }
}
