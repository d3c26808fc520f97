//! Framework-side audio formats and the translation to bus configuration.
//!
//! The framework encodes formats and channel masks as unsigned bitfields.
//! The bus uses signed 32-bit integers for the same values. Translation
//! between the two keeps the bit patterns and never validates them.

mod convert;

pub use convert::{to_bus_config, to_bus_flags};

use std::fmt;

/// Audio sample format as encoded by the framework.
///
/// Unknown values are carried as-is; the proxy never rejects a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AudioFormat(pub u32);

impl AudioFormat {
    /// Format left for the device to choose.
    pub const DEFAULT: Self = Self(0x0);
    /// Signed 16-bit PCM.
    pub const PCM_16_BIT: Self = Self(0x1);
    /// Unsigned 8-bit PCM.
    pub const PCM_8_BIT: Self = Self(0x2);
    /// Signed 32-bit PCM.
    pub const PCM_32_BIT: Self = Self(0x3);
    /// Signed 8.24 fixed point PCM.
    pub const PCM_8_24_BIT: Self = Self(0x4);
    /// 32-bit float PCM.
    pub const PCM_FLOAT: Self = Self(0x5);
    /// Signed 24-bit packed PCM.
    pub const PCM_24_BIT_PACKED: Self = Self(0x6);

    /// Returns the raw framework encoding.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Channel mask as encoded by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AudioChannelMask(pub u32);

impl AudioChannelMask {
    /// No channels.
    pub const NONE: Self = Self(0x0);
    /// Front left only.
    pub const OUT_MONO: Self = Self(0x1);
    /// Front left and front right.
    pub const OUT_STEREO: Self = Self(0x3);
    /// Quad layout (front and back pairs).
    pub const OUT_QUAD: Self = Self(0x33);
    /// 5.1 layout.
    pub const OUT_5POINT1: Self = Self(0x3f);
    /// 7.1 layout.
    pub const OUT_7POINT1: Self = Self(0x63f);

    /// Returns the raw framework encoding.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Number of channels set in the mask.
    #[must_use]
    pub fn channel_count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Stream configuration requested by the framework.
///
/// # Example
///
/// ```
/// use audio_proxy::{AudioChannelMask, AudioConfig, AudioFormat};
///
/// let config = AudioConfig::new(AudioFormat::PCM_16_BIT, 48_000, AudioChannelMask::OUT_STEREO);
/// assert_eq!(config.channel_mask.channel_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AudioConfig {
    /// Sample format.
    pub format: AudioFormat,
    /// Sample rate in Hz.
    pub sample_rate_hz: u32,
    /// Channel layout.
    pub channel_mask: AudioChannelMask,
}

impl AudioConfig {
    /// Creates a configuration from its three fields.
    #[must_use]
    pub fn new(format: AudioFormat, sample_rate_hz: u32, channel_mask: AudioChannelMask) -> Self {
        Self {
            format,
            sample_rate_hz,
            channel_mask,
        }
    }
}

impl fmt::Display for AudioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format={:#x} rate={}Hz mask={:#x}",
            self.format.0, self.sample_rate_hz, self.channel_mask.0
        )
    }
}
