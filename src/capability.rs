//! Capabilities the proxy device declines.
//!
//! The proxy only implements stream opening, patches and close. Everything
//! else the framework may ask for is listed in [`UNSUPPORTED`] and answered
//! through [`unsupported`], which never touches device state.

use std::fmt;

use crate::error::{DeviceError, DeviceResult};

/// A device operation the proxy does not implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Set the mixer master volume. The software mixer emulates it.
    SetMasterVolume,
    /// Read the mixer master volume.
    GetMasterVolume,
    /// Mute or unmute the microphone.
    SetMicMute,
    /// Read the microphone mute state.
    GetMicMute,
    /// Mute or unmute all output.
    SetMasterMute,
    /// Read the master mute state.
    GetMasterMute,
    /// Query the buffer size for an input stream.
    GetInputBufferSize,
    /// Open a capture stream.
    OpenInputStream,
    /// Query an audio port.
    GetAudioPort,
    /// Apply an audio port configuration.
    SetAudioPortConfig,
    /// Query the hardware A/V sync id.
    GetHwAvSync,
    /// Report the screen state.
    SetScreenState,
    /// Read vendor parameters.
    GetParameters,
    /// Write vendor parameters.
    SetParameters,
    /// Enumerate microphones.
    GetMicrophones,
    /// Attach an effect to a device port.
    AddDeviceEffect,
    /// Detach an effect from a device port.
    RemoveDeviceEffect,
}

/// Every capability the proxy declines.
pub const UNSUPPORTED: &[Capability] = &[
    Capability::SetMasterVolume,
    Capability::GetMasterVolume,
    Capability::SetMicMute,
    Capability::GetMicMute,
    Capability::SetMasterMute,
    Capability::GetMasterMute,
    Capability::GetInputBufferSize,
    Capability::OpenInputStream,
    Capability::GetAudioPort,
    Capability::SetAudioPortConfig,
    Capability::GetHwAvSync,
    Capability::SetScreenState,
    Capability::GetParameters,
    Capability::SetParameters,
    Capability::GetMicrophones,
    Capability::AddDeviceEffect,
    Capability::RemoveDeviceEffect,
];

impl Capability {
    /// Framework name of the operation.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SetMasterVolume => "setMasterVolume",
            Self::GetMasterVolume => "getMasterVolume",
            Self::SetMicMute => "setMicMute",
            Self::GetMicMute => "getMicMute",
            Self::SetMasterMute => "setMasterMute",
            Self::GetMasterMute => "getMasterMute",
            Self::GetInputBufferSize => "getInputBufferSize",
            Self::OpenInputStream => "openInputStream",
            Self::GetAudioPort => "getAudioPort",
            Self::SetAudioPortConfig => "setAudioPortConfig",
            Self::GetHwAvSync => "getHwAvSync",
            Self::SetScreenState => "setScreenState",
            Self::GetParameters => "getParameters",
            Self::SetParameters => "setParameters",
            Self::GetMicrophones => "getMicrophones",
            Self::AddDeviceEffect => "addDeviceEffect",
            Self::RemoveDeviceEffect => "removeDeviceEffect",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declines `capability`.
///
/// The payload type only fixes the signature of the caller; the reply layer
/// supplies the default value the framework receives.
pub fn unsupported<T>(capability: Capability) -> DeviceResult<T> {
    tracing::debug!(%capability, "declined unsupported capability");
    Err(DeviceError::NotSupported { capability })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_no_duplicates() {
        let unique: HashSet<_> = UNSUPPORTED.iter().collect();
        assert_eq!(unique.len(), UNSUPPORTED.len());
        assert_eq!(UNSUPPORTED.len(), 17);
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = UNSUPPORTED.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), UNSUPPORTED.len());
    }

    #[test]
    fn test_unsupported_returns_not_supported() {
        let result: DeviceResult<bool> = unsupported(Capability::GetMicMute);
        assert_eq!(
            result,
            Err(DeviceError::NotSupported {
                capability: Capability::GetMicMute
            })
        );
    }
}
