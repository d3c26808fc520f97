//! Framework to bus configuration translation.

use crate::bus::{BusChannelMask, BusConfig, BusFormat};
use crate::format::AudioConfig;
use crate::types::AudioOutputFlags;

/// Re-encodes a framework configuration for the bus.
///
/// Format and channel mask keep their bit patterns; the sample rate keeps its
/// numeric value. Nothing is validated.
#[must_use]
pub fn to_bus_config(config: &AudioConfig) -> BusConfig {
    BusConfig {
        format: BusFormat(config.format.0 as i32),
        sample_rate_hz: config.sample_rate_hz as i32,
        channel_mask: BusChannelMask(config.channel_mask.0 as i32),
    }
}

/// Re-encodes framework output flags for the bus.
#[inline]
#[must_use]
pub fn to_bus_flags(flags: AudioOutputFlags) -> i32 {
    flags.bits() as i32
}

impl From<&AudioConfig> for BusConfig {
    fn from(config: &AudioConfig) -> Self {
        to_bus_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{AudioChannelMask, AudioFormat};

    #[test]
    fn test_translate_keeps_values() {
        let config = AudioConfig::new(AudioFormat::PCM_16_BIT, 48_000, AudioChannelMask::OUT_STEREO);
        let bus = to_bus_config(&config);

        assert_eq!(bus.format, BusFormat(0x1));
        assert_eq!(bus.sample_rate_hz, 48_000);
        assert_eq!(bus.channel_mask, BusChannelMask(0x3));
    }

    #[test]
    fn test_translate_passes_unknown_values_through() {
        let config = AudioConfig::new(AudioFormat(0x1234_0000), 7, AudioChannelMask(0x8000_0001));
        let bus = to_bus_config(&config);

        assert_eq!(bus.format.0 as u32, 0x1234_0000);
        assert_eq!(bus.sample_rate_hz, 7);
        // High bit survives as the sign bit.
        assert_eq!(bus.channel_mask.0 as u32, 0x8000_0001);
        assert!(bus.channel_mask.0 < 0);
    }

    #[test]
    fn test_from_impl_matches_function() {
        let config = AudioConfig::new(AudioFormat::PCM_FLOAT, 44_100, AudioChannelMask::OUT_MONO);
        assert_eq!(BusConfig::from(&config), to_bus_config(&config));
    }

    #[test]
    fn test_flags_keep_bits() {
        let flags = AudioOutputFlags::PRIMARY | AudioOutputFlags::DIRECT;
        assert_eq!(to_bus_flags(flags), 0x3);
        assert_eq!(to_bus_flags(AudioOutputFlags::NONE), 0);
    }
}
