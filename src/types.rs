//! Framework value types passed through the device surface.
//!
//! Most of these are accepted opaquely: the proxy routes nothing itself, so
//! port configurations, parameters and effects only need to exist at the
//! call boundary.

use std::ops::BitOr;

use crate::format::AudioConfig;

/// Address of a device endpoint. Only the bus address matters to the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DeviceAddress {
    /// Framework device type bits.
    pub device: u32,
    /// Name of the bus the stream is routed to.
    pub bus_address: String,
}

impl DeviceAddress {
    /// Creates an address for the named bus.
    pub fn bus(bus_address: impl Into<String>) -> Self {
        Self {
            device: 0,
            bus_address: bus_address.into(),
        }
    }
}

/// Output stream flags as encoded by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AudioOutputFlags(pub u32);

impl AudioOutputFlags {
    /// No flags.
    pub const NONE: Self = Self(0x0);
    /// Stream is routed through the direct output path.
    pub const DIRECT: Self = Self(0x1);
    /// Primary output of the device.
    pub const PRIMARY: Self = Self(0x2);
    /// Low latency path.
    pub const FAST: Self = Self(0x4);
    /// Deep buffer path.
    pub const DEEP_BUFFER: Self = Self(0x8);
    /// Compressed offload path.
    pub const COMPRESS_OFFLOAD: Self = Self(0x10);
    /// Non-blocking writes.
    pub const NON_BLOCKING: Self = Self(0x20);
    /// Hardware A/V sync.
    pub const HW_AV_SYNC: Self = Self(0x40);

    /// Returns the raw framework encoding.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit in `other` is set.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AudioOutputFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Input stream flags as encoded by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AudioInputFlags(pub u32);

/// Handle of a framework audio port.
pub type AudioPortHandle = i32;

/// One end of an audio patch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioPortConfig {
    /// Port the configuration applies to.
    pub id: AudioPortHandle,
    /// Stream configuration of the port.
    pub config: AudioConfig,
}

/// Description of a framework audio port.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioPort {
    /// Port handle.
    pub id: AudioPortHandle,
    /// Human-readable port name.
    pub name: String,
}

/// A key/value parameter pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterValue {
    /// Parameter key.
    pub key: String,
    /// Parameter value.
    pub value: String,
}

/// Description of a microphone attached to the device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MicrophoneInfo {
    /// Unique microphone identifier.
    pub device_id: String,
    /// Address of the microphone.
    pub address: DeviceAddress,
}

/// Identifier of an audio effect instance.
pub type EffectId = u64;
