//! Error types for audio-proxy.
//!
//! Every expected failure is a [`DeviceError`] and maps onto a framework
//! [`Status`] code. Operations that fail leave the device untouched.
//!
//! A provider that hands back no bus stream breaks its contract with the
//! device. That is not an error value: [`ProxyDevice::open_output_stream`]
//! panics instead, since no status code describes it.
//!
//! [`ProxyDevice::open_output_stream`]: crate::ProxyDevice::open_output_stream

use crate::capability::Capability;
use crate::patch::PatchHandle;
use crate::reply::Status;

/// Errors returned by [`ProxyDevice`](crate::ProxyDevice) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// The device intentionally does not implement this capability.
    #[error("{capability} is not supported by the proxy device")]
    NotSupported {
        /// The declined capability.
        capability: Capability,
    },

    /// The referenced audio patch is not currently open.
    #[error("audio patch {handle} is not open")]
    InvalidArgument {
        /// Handle passed by the caller.
        handle: PatchHandle,
    },

    /// The device cannot close while output streams are still registered.
    #[error("device still owns {live_streams} live output stream(s)")]
    InvalidState {
        /// Live streams reported by the provider at the time of the check.
        live_streams: usize,
    },

    /// The device was closed and no longer accepts new streams.
    #[error("device is closed")]
    DeviceClosed,

    /// Every positive patch handle has already been handed out.
    #[error("audio patch handle space exhausted")]
    PatchHandlesExhausted,
}

impl DeviceError {
    /// Returns the framework status code reported for this error.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::NotSupported { .. } => Status::NotSupported,
            Self::InvalidArgument { .. } => Status::InvalidArguments,
            Self::InvalidState { .. } | Self::DeviceClosed | Self::PatchHandlesExhausted => {
                Status::InvalidState
            }
        }
    }
}

/// Result alias for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
